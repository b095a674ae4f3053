use std::{fs, path::PathBuf, process::Command};

use crate::error::OhNo;

/// Runtime files of the server: socket, PID file and daemon output.
#[derive(Clone, Debug)]
pub struct ServerResources {
  pub runtime_dir: PathBuf,
}

impl ServerResources {
  /// Directory holding the runtime files; shared by the server and its clients.
  pub fn runtime_dir() -> Result<PathBuf, OhNo> {
    let dir = dirs::runtime_dir()
      .or_else(||
        // macOS doesn’t implement XDG, yay…
        std::env::var("TMPDIR").map(PathBuf::from).ok())
      .ok_or(OhNo::NoRuntimeDir)?;

    Ok(dir.join("case-search"))
  }

  pub fn socket_path_in(runtime_dir: impl Into<PathBuf>) -> PathBuf {
    runtime_dir.into().join("socket")
  }

  pub fn new() -> Result<Self, OhNo> {
    let runtime_dir = Self::runtime_dir()?;
    let sr = Self { runtime_dir };
    sr.io_create()?;

    Ok(sr)
  }

  /// Create resources, if not already there, and clean up after a dead server.
  fn io_create(&self) -> Result<(), OhNo> {
    log::info!("running in {}", self.runtime_dir.display());

    fs::create_dir_all(&self.runtime_dir).map_err(|err| OhNo::CannotCreateDir {
      dir: self.runtime_dir.clone(),
      err,
    })?;

    if self.is_running() {
      return Err(OhNo::CannotStartDaemon {
        err: "case-search is already running".to_owned(),
      });
    }

    for file in [self.pid_path(), self.socket_path()] {
      if file.exists() {
        log::debug!("removing stale {}", file.display());
        fs::remove_file(&file).map_err(|err| OhNo::CannotStartDaemon {
          err: format!("cannot remove previous {path}: {err}", path = file.display()),
        })?;
      }
    }

    Ok(())
  }

  /// Whether the PID file points to a live process.
  pub fn is_running(&self) -> bool {
    match fs::read_to_string(self.pid_path()) {
      Ok(pid) => {
        let pid = pid.trim();
        log::debug!("checking whether PID {pid} is still up…");

        Command::new("ps")
          .args(["-p", pid])
          .output()
          .is_ok_and(|o| o.status.success())
      }

      Err(_) => false,
    }
  }

  /// Socket used by the server to receive requests.
  pub fn socket_path(&self) -> PathBuf {
    Self::socket_path_in(&self.runtime_dir)
  }

  pub fn pid_path(&self) -> PathBuf {
    self.runtime_dir.join("pid")
  }
}

impl Drop for ServerResources {
  fn drop(&mut self) {
    let _ = fs::remove_file(self.pid_path());
    let _ = fs::remove_file(self.socket_path());
  }
}
