use std::{
  io,
  sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
  },
};

use mio::{unix::SourceFd, Events, Interest, Poll, Token, Waker};

use crate::error::OhNo;

const WAKER_TOKEN: Token = Token(0);
pub const UNIX_LISTENER_TOKEN: Token = Token(1);

/// Poll-based event loop, stopped either explicitly or by SIGINT.
#[derive(Debug)]
pub struct EventLoop {
  poll: Poll,
  events: Events,
  stopped: Arc<AtomicBool>,

  // kept alive for the SIGINT handler
  _waker: Arc<Waker>,
}

impl EventLoop {
  pub fn new() -> Result<Self, OhNo> {
    let poll = Poll::new().map_err(|err| OhNo::CannotStartPoll { err })?;
    let waker = Waker::new(poll.registry(), WAKER_TOKEN)
      .map(Arc::new)
      .map_err(|err| OhNo::CannotStartServer { err })?;
    let stopped = Arc::new(AtomicBool::new(false));

    let handler_waker = Arc::clone(&waker);
    let handler_stopped = Arc::clone(&stopped);
    ctrlc::set_handler(move || {
      log::warn!("received SIGINT");
      handler_stopped.store(true, Ordering::Relaxed);

      if let Err(err) = handler_waker.wake() {
        log::error!("cannot wake the event loop: {err}");
      }
    })?;

    Ok(Self {
      poll,
      events: Events::with_capacity(16),
      stopped,
      _waker: waker,
    })
  }

  pub fn stop(&self) {
    self.stopped.store(true, Ordering::Relaxed);
  }

  pub fn is_stopped(&self) -> bool {
    self.stopped.load(Ordering::Relaxed)
  }

  pub fn register(&self, source: &mut SourceFd, token: Token) -> Result<(), OhNo> {
    self
      .poll
      .registry()
      .register(source, token, Interest::READABLE)
      .map_err(|err| OhNo::PollError { err })
  }

  /// Block until something is readable or the loop is stopped.
  pub fn wait(&mut self) -> Result<Await, OhNo> {
    log::trace!("waiting on poll…");

    match self.poll.poll(&mut self.events, None) {
      Ok(()) => (),
      Err(err) if err.kind() == io::ErrorKind::Interrupted => log::debug!("poll interrupted"),
      Err(err) => return Err(OhNo::PollError { err }),
    }

    if self.is_stopped() {
      return Ok(Await::Shutdown);
    }

    let tokens = self
      .events
      .iter()
      .filter(|event| event.is_readable() && event.token() != WAKER_TOKEN)
      .map(|event| event.token())
      .collect();

    Ok(Await::Readable(tokens))
  }
}

/// Outcome of waiting on the event loop.
#[derive(Debug)]
pub enum Await {
  Readable(Vec<Token>),
  Shutdown,
}
