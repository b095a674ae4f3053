//! Search collaborator.
//!
//! Compiled queries are not executed here: they are handed to a [`SearchExecutor`] along with the search options and
//! the file filters.

use std::{
  io::Write,
  process::{Command, Stdio},
};

use serde::{Deserialize, Serialize};

use crate::error::OhNo;

/// Everything the search collaborator needs to run a search.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
  pub query: String,
  pub trigger_search: bool,
  pub is_regex: bool,
  pub is_case_sensitive: bool,
  pub match_whole_word: bool,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub files_to_include: Option<String>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub files_to_exclude: Option<String>,
}

/// Fire-and-forget search execution.
pub trait SearchExecutor {
  fn execute(&mut self, req: &SearchRequest) -> Result<(), OhNo>;
}

impl<T> SearchExecutor for Box<T>
where
  T: ?Sized + SearchExecutor,
{
  fn execute(&mut self, req: &SearchRequest) -> Result<(), OhNo> {
    (**self).execute(req)
  }
}

/// Record every request; mostly useful to inspect what would have been searched.
impl SearchExecutor for Vec<SearchRequest> {
  fn execute(&mut self, req: &SearchRequest) -> Result<(), OhNo> {
    self.push(req.clone());
    Ok(())
  }
}

/// Write requests as JSON lines on stdout.
#[derive(Debug, Default)]
pub struct StdoutExecutor;

impl SearchExecutor for StdoutExecutor {
  fn execute(&mut self, req: &SearchRequest) -> Result<(), OhNo> {
    let json = serde_json::to_string(req).map_err(|err| OhNo::CannotRunSearch {
      program: "stdout".to_owned(),
      err: err.to_string(),
    })?;

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{json}")
      .and_then(|_| stdout.flush())
      .map_err(|err| OhNo::CannotRunSearch {
        program: "stdout".to_owned(),
        err: err.to_string(),
      })
  }
}

/// Spawn a program for every request and feed it the request as JSON on stdin.
#[derive(Debug)]
pub struct CommandExecutor {
  program: String,
  args: Vec<String>,
}

impl CommandExecutor {
  /// Build from a program followed by its arguments; `None` if `command` is empty.
  pub fn new(command: &[String]) -> Option<Self> {
    let (program, args) = command.split_first()?;

    Some(Self {
      program: program.clone(),
      args: args.to_vec(),
    })
  }
}

impl SearchExecutor for CommandExecutor {
  fn execute(&mut self, req: &SearchRequest) -> Result<(), OhNo> {
    let err = |err: String| OhNo::CannotRunSearch {
      program: self.program.clone(),
      err,
    };

    let json = serde_json::to_string(req).map_err(|e| err(e.to_string()))?;

    log::debug!("running {} for {}", self.program, req.query);

    let mut child = Command::new(&self.program)
      .args(&self.args)
      .stdin(Stdio::piped())
      .spawn()
      .map_err(|e| err(e.to_string()))?;

    if let Some(mut stdin) = child.stdin.take() {
      stdin
        .write_all(json.as_bytes())
        .and_then(|_| stdin.flush())
        .map_err(|e| err(e.to_string()))?;
    }

    // reap in the background; searches are fire-and-forget
    std::thread::spawn(move || {
      if let Err(err) = child.wait() {
        log::warn!("search process failed: {err}");
      }
    });

    Ok(())
  }
}

/// Executor selected by the `[search]` configuration.
pub fn from_config(config: &case_search_config::SearchConfig) -> Box<dyn SearchExecutor> {
  match config.command.as_deref().and_then(CommandExecutor::new) {
    Some(executor) => Box::new(executor),
    None => Box::new(StdoutExecutor),
  }
}

#[cfg(test)]
mod tests {
  use super::{CommandExecutor, SearchExecutor, SearchRequest};

  #[test]
  fn wire_format() {
    let req = SearchRequest {
      query: "a|b".to_owned(),
      trigger_search: true,
      is_regex: true,
      is_case_sensitive: false,
      match_whole_word: false,
      files_to_include: Some("*.ts,*.rs".to_owned()),
      files_to_exclude: None,
    };

    assert_eq!(
      serde_json::to_value(&req).unwrap(),
      serde_json::json!({
        "query": "a|b",
        "triggerSearch": true,
        "isRegex": true,
        "isCaseSensitive": false,
        "matchWholeWord": false,
        "filesToInclude": "*.ts,*.rs",
      })
    );
  }

  #[test]
  fn recording() {
    let mut recorded: Vec<SearchRequest> = Vec::new();
    let mut boxed: Box<dyn SearchExecutor> = Box::new(Vec::<SearchRequest>::new());

    recorded.execute(&SearchRequest::default()).unwrap();
    boxed.execute(&SearchRequest::default()).unwrap();

    assert_eq!(recorded.len(), 1);
  }

  #[test]
  fn empty_command() {
    assert!(CommandExecutor::new(&[]).is_none());

    let executor = CommandExecutor::new(&["rg".to_owned(), "--json".to_owned()]).unwrap();
    assert_eq!(executor.program, "rg");
    assert_eq!(executor.args, ["--json"]);
  }
}
