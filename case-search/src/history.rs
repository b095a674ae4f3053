//! Free-text history.

use serde::{Deserialize, Serialize};

/// Recent free-text values, most recent first, without duplicates.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct History {
  entries: Vec<String>,
}

impl History {
  pub fn new(entries: Vec<String>, max_len: usize) -> Self {
    let mut history = Self::default();

    // oldest first, so that pushing keeps the most recent on top
    for entry in entries.into_iter().rev() {
      history.push(entry, max_len);
    }

    history
  }

  pub fn entries(&self) -> &[String] {
    &self.entries
  }

  /// Put `entry` on top; empty entries are ignored.
  pub fn push(&mut self, entry: impl Into<String>, max_len: usize) {
    let entry = entry.into();

    if entry.is_empty() {
      return;
    }

    self.entries.retain(|e| *e != entry);
    self.entries.insert(0, entry);
    self.entries.truncate(max_len);
  }
}

#[cfg(test)]
mod tests {
  use super::History;

  #[test]
  fn most_recent_first() {
    let mut history = History::default();
    history.push("a", 3);
    history.push("b", 3);
    history.push("a", 3);
    history.push("", 3);

    assert_eq!(history.entries(), ["a", "b"]);

    history.push("c", 3);
    history.push("d", 3);
    assert_eq!(history.entries(), ["d", "c", "a"]);
  }

  #[test]
  fn normalized() {
    let history = History::new(
      vec!["x".to_owned(), "y".to_owned(), "x".to_owned(), "z".to_owned()],
      2,
    );

    assert_eq!(history.entries(), ["x", "y"]);
  }
}
