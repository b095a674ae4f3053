mod event_loop;
pub mod resources;

use std::{
  fs::{self, File},
  io::{self, Read, Write},
  os::{
    fd::AsRawFd,
    unix::net::{UnixListener, UnixStream},
  },
  time::Duration,
};

use mio::unix::SourceFd;

use crate::{
  error::OhNo,
  protocol::request::Request,
  search::SearchExecutor,
  session::Controller,
  store::Store,
};

use self::{
  event_loop::{Await, EventLoop, UNIX_LISTENER_TOKEN},
  resources::ServerResources,
};

/// Maximum time a client has to send its request.
const READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Feedback provided after a request has finished. Mainly used to shutdown.
#[derive(Debug, Eq, PartialEq)]
pub enum Feedback {
  Ok,
  ShouldExit,
}

pub struct Server<S, E> {
  resources: ServerResources,
  event_loop: EventLoop,
  unix_listener: UnixListener,
  controller: Controller<S, E>,
}

impl<S, E> Server<S, E>
where
  S: Store,
  E: SearchExecutor,
{
  pub fn new(resources: ServerResources, controller: Controller<S, E>) -> Result<Self, OhNo> {
    let event_loop = EventLoop::new()?;

    let unix_listener = UnixListener::bind(resources.socket_path())
      .and_then(|listener| listener.set_nonblocking(true).map(|_| listener))
      .map_err(|err| OhNo::CannotStartServer { err })?;
    event_loop.register(
      &mut SourceFd(&unix_listener.as_raw_fd()),
      UNIX_LISTENER_TOKEN,
    )?;

    Ok(Server {
      resources,
      event_loop,
      unix_listener,
      controller,
    })
  }

  /// Prepare the server, daemonizing if required, and writing the PID file.
  pub fn prepare(&self, daemonize: bool) -> Result<(), OhNo> {
    let pid_file = self.resources.pid_path();

    if daemonize {
      // create stdout / stderr files
      let stdout_path = self.resources.runtime_dir.join("stdout.txt");
      let stderr_path = self.resources.runtime_dir.join("stderr.txt");
      let stdout = File::create(&stdout_path).map_err(|err| OhNo::CannotCreateFile {
        file: stdout_path,
        err,
      })?;
      let stderr = File::create(&stderr_path).map_err(|err| OhNo::CannotCreateFile {
        file: stderr_path,
        err,
      })?;

      daemonize::Daemonize::new()
        .stdout(stdout)
        .stderr(stderr)
        .pid_file(pid_file)
        .start()
        .map_err(|err| OhNo::CannotStartDaemon {
          err: err.to_string(),
        })?;
    } else {
      fs::write(&pid_file, format!("{}", std::process::id())).map_err(|err| {
        OhNo::CannotWriteFile {
          file: pid_file,
          err,
        }
      })?;
    }

    Ok(())
  }

  /// Wait for requests and handle them one at a time, in arrival order.
  pub fn start(mut self) -> Result<(), OhNo> {
    log::info!("starting server");

    while !self.event_loop.is_stopped() {
      let Await::Readable(tokens) = self.event_loop.wait()? else {
        break;
      };

      if !tokens.contains(&UNIX_LISTENER_TOKEN) {
        continue;
      }

      match self.accept() {
        Ok(Feedback::ShouldExit) => self.event_loop.stop(),
        Ok(Feedback::Ok) => (),
        Err(err) => log::error!("{err}"),
      }
    }

    log::info!("shutting down");
    Ok(())
  }

  /// Accept every pending connection.
  fn accept(&mut self) -> Result<Feedback, OhNo> {
    loop {
      let client = match self.unix_listener.accept() {
        Ok((client, _)) => client,
        Err(err) if err.kind() == io::ErrorKind::WouldBlock => return Ok(Feedback::Ok),
        Err(err) => return Err(OhNo::UnixConnectionError { err }),
      };

      log::debug!("client connected: {client:?}");

      match self.handle_client(client) {
        Ok(Feedback::ShouldExit) => return Ok(Feedback::ShouldExit),
        Ok(Feedback::Ok) => (),
        Err(err) => log::error!("{err}"),
      }
    }
  }

  fn handle_client(&mut self, mut client: UnixStream) -> Result<Feedback, OhNo> {
    client
      .set_nonblocking(false)
      .and_then(|_| client.set_read_timeout(Some(READ_TIMEOUT)))
      .map_err(|err| OhNo::UnixConnectionError { err })?;

    // read the request and parse it
    let mut req_str = String::new();
    client
      .read_to_string(&mut req_str)
      .map_err(|err| OhNo::InvalidRequest {
        req: req_str.clone(),
        err: err.to_string(),
      })?;
    log::info!("UNIX socket request: {req_str}");

    let req = Request::from_json(&req_str)?;
    let feedback = if let Request::Shutdown = req {
      Feedback::ShouldExit
    } else {
      Feedback::Ok
    };

    for resp in self.controller.handle(req) {
      let mut line = resp.to_json()?;
      line.push('\n');

      client
        .write_all(line.as_bytes())
        .map_err(|err| OhNo::CannotSendResponse {
          err: err.to_string(),
        })?;
    }

    Ok(feedback)
  }
}
