//! Client implementation.
//!
//! This module exports the [`Client`] type that is used to send requests to the server and read its responses.

use std::{
  io::{BufRead, BufReader, Write},
  net::Shutdown,
  os::unix::net::UnixStream,
  path::Path,
};

use crate::{
  error::OhNo,
  protocol::{request::Request, response::Response},
};

/// Connected client (UNIX socket).
#[derive(Debug)]
pub struct Client {
  stream: UnixStream,
}

impl Client {
  pub fn connect(socket_path: impl AsRef<Path>) -> Result<Self, OhNo> {
    let stream =
      UnixStream::connect(socket_path).map_err(|err| OhNo::CannotConnectToServer { err })?;

    Ok(Self { stream })
  }

  /// Send a request and wait for every response.
  ///
  /// A connection carries a single request, so the client is consumed.
  pub fn send(mut self, req: &Request) -> Result<Vec<Response>, OhNo> {
    let json = req.to_json()?;

    self
      .stream
      .write_all(json.as_bytes())
      .and_then(|_| self.stream.shutdown(Shutdown::Write))
      .map_err(|err| OhNo::CannotSendRequest {
        err: err.to_string(),
      })?;

    BufReader::new(self.stream)
      .lines()
      .map(|line| {
        let line = line.map_err(|err| OhNo::UnixConnectionError { err })?;
        Response::from_json(line)
      })
      .collect()
  }
}
