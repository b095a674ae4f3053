//! Logging setup shared by the daemon and the controller.

use log::{Level, SetLoggerError};

/// Verbosity derived from the number of `-v` flags.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Verbosity {
  #[default]
  Off,
  Error,
  Warn,
  Info,
  Debug,
  Trace,
}

impl Verbosity {
  pub fn from_count(count: u8) -> Self {
    match count {
      0 => Self::Off,
      1 => Self::Error,
      2 => Self::Warn,
      3 => Self::Info,
      4 => Self::Debug,
      _ => Self::Trace,
    }
  }

  pub fn to_level(self) -> Option<Level> {
    match self {
      Verbosity::Off => None,
      Verbosity::Error => Some(Level::Error),
      Verbosity::Warn => Some(Level::Warn),
      Verbosity::Info => Some(Level::Info),
      Verbosity::Debug => Some(Level::Debug),
      Verbosity::Trace => Some(Level::Trace),
    }
  }
}

/// Install the logger for `count` applications of `-v`; nothing is installed without the flag.
pub fn init(count: u8) -> Result<(), SetLoggerError> {
  match Verbosity::from_count(count).to_level() {
    Some(level) => simple_logger::init_with_level(level),
    None => Ok(()),
  }
}
