//! Checkboxes and checkbox groups.

pub mod board;
pub mod group;

use serde::{Deserialize, Serialize};

/// A single boolean option.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkbox {
  pub id: String,
  pub label: String,
  pub selected: bool,

  /// Whether the label can be changed by the user.
  pub editable: bool,
}

impl Checkbox {
  pub fn new(
    id: impl Into<String>,
    label: impl Into<String>,
    selected: bool,
    editable: bool,
  ) -> Self {
    Self {
      id: id.into(),
      label: label.into(),
      selected,
      editable,
    }
  }

  /// Key under which the label of this checkbox is persisted.
  pub fn label_key(&self) -> String {
    label_key(&self.id)
  }
}

pub fn label_key(id: &str) -> String {
  format!("{id}-label")
}
