//! Requests sent from the display side to the authority.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::OhNo;

/// Request.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "command", rename_all = "kebab-case")]
pub enum Request {
  /// Open the panel, or reveal it if already open.
  Open,

  /// Close the panel; nothing is handled until the next [`Request::Open`].
  Close,

  /// Ask for the current authoritative state.
  Snapshot,

  /// Ask the server to shutdown.
  Shutdown,

  /// Free text or fixed checkboxes changed; compile and search.
  MainInstant(MainQuery),

  /// Replace the free-text history.
  #[serde(rename_all = "camelCase")]
  History {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    field_id: Option<String>,
    history: Vec<String>,
  },

  /// Checkboxes of a dynamic group were toggled.
  Exec {
    manager: String,
    values: BTreeMap<String, bool>,
  },

  /// Add an element to a dynamic group.
  #[serde(rename_all = "camelCase")]
  Add {
    manager: String,
    label: String,

    #[serde(default)]
    selected: bool,

    /// Id the display side used for the element while waiting for the authority.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    elt_id_to_add: Option<String>,
  },

  /// Relabel and set an element of a dynamic group.
  #[serde(rename_all = "camelCase")]
  Mod {
    manager: String,
    elt_id: String,
    label: String,
    selected: bool,
  },

  /// Remove an element from a dynamic group.
  #[serde(rename_all = "camelCase")]
  Remove { manager: String, elt_id: String },

  /// Reorder the elements of a dynamic group.
  #[serde(rename_all = "camelCase")]
  ListOrder { manager: String, elt_ids: Vec<String> },
}

impl Request {
  /// Parse a [`Request`] from a JSON string.
  pub fn from_json(s: impl AsRef<str>) -> Result<Self, OhNo> {
    let s = s.as_ref();
    serde_json::from_str(s).map_err(|err| OhNo::InvalidRequest {
      req: s.to_owned(),
      err: err.to_string(),
    })
  }

  pub fn to_json(&self) -> Result<String, OhNo> {
    serde_json::to_string(self).map_err(|err| OhNo::CannotSendRequest {
      err: err.to_string(),
    })
  }

  /// Dynamic group targeted by the request, if any.
  pub fn manager(&self) -> Option<&str> {
    match self {
      Request::Exec { manager, .. }
      | Request::Add { manager, .. }
      | Request::Mod { manager, .. }
      | Request::Remove { manager, .. }
      | Request::ListOrder { manager, .. } => Some(manager.as_str()),

      _ => None,
    }
  }
}

/// Content of the main form: free text, case sensitivity and every fixed checkbox.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MainQuery {
  pub text: String,
  pub sensitive_case: bool,

  /// Fixed checkboxes, by id (`kebabCase`, `beginWord`, …).
  #[serde(flatten)]
  pub checks: BTreeMap<String, bool>,
}

#[cfg(test)]
mod tests {
  use std::collections::BTreeMap;

  use super::{MainQuery, Request};
  use crate::error::OhNo;

  #[test]
  fn main_instant() {
    let req = Request::from_json(
      r#"{"command":"main-instant","text":"hello world","sensitiveCase":true,"kebabCase":true,"beginWord":false}"#,
    )
    .unwrap();

    let checks: BTreeMap<String, bool> = [("kebabCase".to_owned(), true), ("beginWord".to_owned(), false)]
      .into_iter()
      .collect();
    assert_eq!(
      req,
      Request::MainInstant(MainQuery {
        text: "hello world".to_owned(),
        sensitive_case: true,
        checks,
      })
    );

    let json = serde_json::to_value(&req).unwrap();
    assert_eq!(json["command"], "main-instant");
    assert_eq!(json["kebabCase"], true);
  }

  #[test]
  fn manager_commands() {
    let req = Request::from_json(
      r#"{"command":"add","manager":"filesToInclude","label":"*.ts","eltIdToAdd":"filesToInclude-3"}"#,
    )
    .unwrap();
    assert_eq!(
      req,
      Request::Add {
        manager: "filesToInclude".to_owned(),
        label: "*.ts".to_owned(),
        selected: false,
        elt_id_to_add: Some("filesToInclude-3".to_owned()),
      }
    );
    assert_eq!(req.manager(), Some("filesToInclude"));

    let req = Request::from_json(
      r#"{"command":"list-order","manager":"filesToExclude","eltIds":["filesToExclude-1","filesToExclude-0"]}"#,
    )
    .unwrap();
    assert!(matches!(req, Request::ListOrder { ref elt_ids, .. } if elt_ids.len() == 2));

    let req = Request::from_json(
      r#"{"command":"mod","manager":"filesToExclude","eltId":"filesToExclude-1","label":"target","selected":true}"#,
    )
    .unwrap();
    assert!(matches!(req, Request::Mod { selected: true, .. }));

    let req = Request::from_json(r#"{"command":"history","history":["a","b"]}"#).unwrap();
    assert!(matches!(req, Request::History { field_id: None, .. }));
    assert_eq!(req.manager(), None);
  }

  #[test]
  fn malformed() {
    assert!(matches!(
      Request::from_json(r#"{"command":"remove","eltId":"filesToInclude-0"}"#),
      Err(OhNo::InvalidRequest { .. })
    ));
    assert!(matches!(
      Request::from_json(r#"{"command":"explode"}"#),
      Err(OhNo::InvalidRequest { .. })
    ));
    assert!(Request::from_json("not json").is_err());
  }

  #[test]
  fn round_trip_through_json() {
    let req = Request::Remove {
      manager: "filesToInclude".to_owned(),
      elt_id: "filesToInclude-0".to_owned(),
    };
    let json = req.to_json().unwrap();

    assert_eq!(
      json,
      r#"{"command":"remove","manager":"filesToInclude","eltId":"filesToInclude-0"}"#
    );
    assert_eq!(Request::from_json(json).unwrap(), req);
  }
}
