//! Connection to the daemon.
//!
//! Every action starts from a fresh [`Display`] rebuilt from the state the daemon holds; the action is applied locally,
//! then the resulting request is sent and the replies are applied back.

use std::path::PathBuf;

use case_search::{
  client::Client,
  display::Display,
  protocol::{request::Request, response::Response},
  server::resources::ServerResources,
};

use crate::error::HellNo;

#[derive(Debug)]
pub struct Remote {
  socket_path: PathBuf,
}

impl Remote {
  pub fn new() -> Result<Self, HellNo> {
    let socket_path = ServerResources::socket_path_in(ServerResources::runtime_dir()?);
    log::debug!("daemon socket: {}", socket_path.display());

    Ok(Self { socket_path })
  }

  /// Send a request and return the replies, failing on rejections.
  pub fn send(&self, req: &Request) -> Result<Vec<Response>, HellNo> {
    log::debug!("sending {req:?}");
    let resps = Client::connect(&self.socket_path)?.send(req)?;

    for resp in &resps {
      log::trace!("received {resp:?}");

      if let Response::Rejected { reason } = resp {
        return Err(HellNo::Rejected {
          reason: reason.clone(),
        });
      }
    }

    Ok(resps)
  }

  /// Display mirroring the open panel.
  pub fn display(&self) -> Result<Display, HellNo> {
    let resps = self.send(&Request::Snapshot)?;

    let Some(snapshot) = resps.iter().find_map(|resp| match resp {
      Response::State(snapshot) => Some(snapshot),
      _ => None,
    }) else {
      return Err(HellNo::NoPanel);
    };

    let mut display = Display::from_snapshot(snapshot);
    for resp in &resps {
      display.apply(resp);
    }

    Ok(display)
  }

  /// Send the request produced by a local change and bring the display up to date.
  pub fn sync(&self, display: &mut Display, req: &Request) -> Result<(), HellNo> {
    for resp in self.send(req)? {
      display.apply(&resp);
    }

    Ok(())
  }
}
