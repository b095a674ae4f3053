//! Responses sent from the authority to the display side.

use serde::{Deserialize, Serialize};

use crate::{
  checkbox::{
    board::Rule,
    group::{CheckboxGroup, MainCheckbox},
    Checkbox,
  },
  error::OhNo,
};

/// Field the free-text history belongs to.
pub const TEXT_FIELD_ID: &str = "text-to-search";

/// Response.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "command", rename_all = "kebab-case")]
pub enum Response {
  /// Give the keyboard focus back to the free-text field.
  Focus,

  /// Free-text history.
  #[serde(rename_all = "camelCase")]
  History {
    field_id: String,
    history: Vec<String>,
  },

  /// Authoritative state; the display side rebuilds itself from it.
  State(Snapshot),

  /// The panel was already open; bring it to front.
  Reveal,

  /// The request was dropped.
  Rejected { reason: String },
}

impl Response {
  pub fn history(history: impl Into<Vec<String>>) -> Self {
    Response::History {
      field_id: TEXT_FIELD_ID.to_owned(),
      history: history.into(),
    }
  }

  pub fn from_json(s: impl AsRef<str>) -> Result<Self, OhNo> {
    let s = s.as_ref();
    serde_json::from_str(s).map_err(|err| OhNo::InvalidResponse {
      resp: s.to_owned(),
      err: err.to_string(),
    })
  }

  pub fn to_json(&self) -> Result<String, OhNo> {
    serde_json::to_string(self).map_err(|err| OhNo::CannotSendResponse {
      err: err.to_string(),
    })
  }
}

/// Everything needed to rebuild the display side.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
  pub text: String,
  pub sensitive_case: bool,
  pub groups: Vec<GroupSnapshot>,

  #[serde(default)]
  pub rules: Vec<Rule>,
}

impl Snapshot {
  pub fn group(&self, id: &str) -> Option<&GroupSnapshot> {
    self.groups.iter().find(|group| group.id == id)
  }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSnapshot {
  pub id: String,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub main: Option<MainCheckbox>,

  pub enabled: bool,
  pub dynamic: bool,

  /// Whether the elements of this group were never persisted.
  #[serde(default)]
  pub first_start: bool,

  pub elts: Vec<Checkbox>,
}

impl GroupSnapshot {
  pub fn new(group: &CheckboxGroup, first_start: bool) -> Self {
    Self {
      id: group.id().to_owned(),
      main: group.main().cloned(),
      enabled: group.enabled(),
      dynamic: group.is_dynamic(),
      first_start,
      elts: group.elts().to_vec(),
    }
  }

  /// Rebuild the group this snapshot was taken from.
  pub fn to_group(&self) -> CheckboxGroup {
    let main_label = self.main.as_ref().map(|main| main.label.as_str());
    let mut group = if self.dynamic {
      CheckboxGroup::dynamic(&self.id, main_label, self.elts.clone())
    } else {
      CheckboxGroup::fixed(&self.id, main_label, self.elts.clone())
    };

    group.set_enabled(self.enabled);
    group
  }
}

#[cfg(test)]
mod tests {
  use super::{GroupSnapshot, Response, Snapshot};
  use crate::checkbox::{group::CheckboxGroup, Checkbox};

  #[test]
  fn focus_and_history() {
    assert_eq!(Response::Focus.to_json().unwrap(), r#"{"command":"focus"}"#);
    assert_eq!(
      Response::history(vec!["a".to_owned()]).to_json().unwrap(),
      r#"{"command":"history","fieldId":"text-to-search","history":["a"]}"#
    );
  }

  #[test]
  fn state() {
    let mut group = CheckboxGroup::dynamic("filesToInclude", Some("All"), Vec::new());
    group.add("*.ts", true, None).unwrap();

    let resp = Response::State(Snapshot {
      text: "hello".to_owned(),
      sensitive_case: false,
      groups: vec![GroupSnapshot::new(&group, false)],
      rules: Vec::new(),
    });
    let json = serde_json::to_value(&resp).unwrap();

    assert_eq!(
      json,
      serde_json::json!({
        "command": "state",
        "text": "hello",
        "sensitiveCase": false,
        "groups": [{
          "id": "filesToInclude",
          "main": { "label": "All", "selected": true },
          "enabled": true,
          "dynamic": true,
          "firstStart": false,
          "elts": [{ "id": "filesToInclude-0", "label": "*.ts", "selected": true, "editable": true }],
        }],
        "rules": [],
      })
    );

    let back = Response::from_json(json.to_string()).unwrap();
    assert_eq!(back, resp);
  }

  #[test]
  fn group_rebuilt() {
    let group = CheckboxGroup::fixed(
      "word",
      Some("Whole word"),
      vec![Checkbox::new("beginWord", "Begin word", true, false)],
    );

    assert_eq!(GroupSnapshot::new(&group, false).to_group(), group);
  }
}
