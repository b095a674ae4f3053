use std::{io, path::PathBuf};

use case_search_config::ConfigError;
use log::SetLoggerError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OhNo {
  #[error("nothing to do; please either use --server or --request")]
  NothingToDo,

  #[error("no runtime directory")]
  NoRuntimeDir,

  #[error("no data directory to hold the persisted state; please use --state")]
  NoDataDir,

  #[error("cannot initialize logging: {err}")]
  LoggerInit {
    #[from]
    err: SetLoggerError,
  },

  #[error("configuration error: {err}")]
  Config {
    #[from]
    err: ConfigError,
  },

  #[error("cannot create directory {dir}: {err}")]
  CannotCreateDir { dir: PathBuf, err: io::Error },

  #[error("cannot create file {file}: {err}")]
  CannotCreateFile { file: PathBuf, err: io::Error },

  #[error("cannot read file {file}: {err}")]
  CannotReadFile { file: PathBuf, err: io::Error },

  #[error("cannot write to file {file}: {err}")]
  CannotWriteFile { file: PathBuf, err: io::Error },

  #[error("corrupted state file {file}: {err}")]
  CorruptedState { file: PathBuf, err: String },

  #[error("cannot start daemon: {err}")]
  CannotStartDaemon { err: String },

  #[error("cannot start poll: {err}")]
  CannotStartPoll { err: io::Error },

  #[error("poll error: {err}")]
  PollError { err: io::Error },

  #[error("cannot set SIGINT handler: {err}")]
  SigIntHandlerError {
    #[from]
    err: ctrlc::Error,
  },

  #[error("cannot start server: {err}")]
  CannotStartServer { err: io::Error },

  #[error("UNIX connection error: {err}")]
  UnixConnectionError { err: io::Error },

  #[error("invalid request {req}: {err}")]
  InvalidRequest { req: String, err: String },

  #[error("invalid response {resp}: {err}")]
  InvalidResponse { resp: String, err: String },

  #[error("cannot connect to server; is it running?: {err}")]
  CannotConnectToServer { err: io::Error },

  #[error("cannot send request: {err}")]
  CannotSendRequest { err: String },

  #[error("cannot send response: {err}")]
  CannotSendResponse { err: String },

  #[error("cannot run search command {program}: {err}")]
  CannotRunSearch { program: String, err: String },
}

/// Reasons for an intent to be dropped.
///
/// None of them is fatal: the offending intent is logged and ignored, and the state is left untouched.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum IntentError {
  #[error("no element {elt_id} in group {group}")]
  ReferenceNotFound { group: String, elt_id: String },

  #[error("no checkbox {id}")]
  UnknownCheckbox { id: String },

  #[error("no group {group}")]
  UnknownGroup { group: String },

  #[error("group {group} does not support adding, removing or reordering elements")]
  NotDynamic { group: String },

  #[error("rejected: {reason}")]
  ValidationRejected { reason: String },
}

impl IntentError {
  pub fn not_found(group: impl Into<String>, elt_id: impl Into<String>) -> Self {
    Self::ReferenceNotFound {
      group: group.into(),
      elt_id: elt_id.into(),
    }
  }

  pub fn unknown_group(group: impl Into<String>) -> Self {
    Self::UnknownGroup {
      group: group.into(),
    }
  }

  pub fn rejected(reason: impl Into<String>) -> Self {
    Self::ValidationRejected {
      reason: reason.into(),
    }
  }
}
