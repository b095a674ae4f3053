use case_search::error::{IntentError, OhNo};
use case_search_config::ConfigError;
use thiserror::Error;

/// Hell no!
#[derive(Debug, Error)]
pub enum HellNo {
  #[error("logger failed to initialize: {err}")]
  LoggerError {
    #[from]
    err: log::SetLoggerError,
  },

  #[error("configuration error: {err}")]
  ConfigError {
    #[from]
    err: ConfigError,
  },

  #[error("{err}")]
  Daemon {
    #[from]
    err: OhNo,
  },

  #[error("no panel open; open one with csctl open")]
  NoPanel,

  #[error("the daemon replied nothing to {command}")]
  NoReply { command: String },

  #[error("cannot {action}: {err}")]
  Refused {
    action: &'static str,
    err: IntentError,
  },

  #[error("rejected by the daemon: {reason}")]
  Rejected { reason: String },
}
