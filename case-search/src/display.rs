//! Display side of a session.
//!
//! A [`Display`] mirrors the authoritative state for rendering. User actions are applied locally first, with the same
//! rules as the authority, and turned into the [`Request`] to send. The display never persists anything: it can be
//! thrown away and rebuilt from the next [`Snapshot`] at any time.

use std::collections::BTreeMap;

use crate::{
  checkbox::{board::Board, group::CheckboxGroup},
  error::IntentError,
  history::History,
  protocol::{
    request::{MainQuery, Request},
    response::{Response, Snapshot, TEXT_FIELD_ID},
  },
};

/// Whether the add candidate of a dynamic group can be added.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AddAvailability {
  Empty,

  /// Another element of the group has the same label.
  Duplicate,

  Ready,
}

#[derive(Clone, Debug)]
pub struct Display {
  text: String,
  sensitive_case: bool,
  board: Board,
  first_start: BTreeMap<String, bool>,
  history: History,

  /// Label being typed in the add slot of each dynamic group.
  candidates: BTreeMap<String, String>,
}

impl Display {
  pub fn from_snapshot(snapshot: &Snapshot) -> Self {
    let groups = snapshot.groups.iter().map(|group| group.to_group()).collect();
    let first_start = snapshot
      .groups
      .iter()
      .map(|group| (group.id.clone(), group.first_start))
      .collect();

    Self {
      text: snapshot.text.clone(),
      sensitive_case: snapshot.sensitive_case,
      board: Board::new(groups, snapshot.rules.iter().cloned()),
      first_start,
      history: History::default(),
      candidates: BTreeMap::new(),
    }
  }

  /// Rebuild from a snapshot, keeping what the authority does not know about.
  pub fn rebuild(&mut self, snapshot: &Snapshot) {
    let history = std::mem::take(&mut self.history);
    let candidates = std::mem::take(&mut self.candidates);

    *self = Self::from_snapshot(snapshot);
    self.history = history;
    self.candidates = candidates;
  }

  /// Apply a response from the authority.
  pub fn apply(&mut self, resp: &Response) {
    match resp {
      Response::State(snapshot) => self.rebuild(snapshot),
      Response::History { history, .. } => self.history = History::new(history.clone(), usize::MAX),
      Response::Focus | Response::Reveal | Response::Rejected { .. } => (),
    }
  }

  pub fn text(&self) -> &str {
    &self.text
  }

  pub fn sensitive_case(&self) -> bool {
    self.sensitive_case
  }

  pub fn board(&self) -> &Board {
    &self.board
  }

  pub fn history(&self) -> &[String] {
    self.history.entries()
  }

  pub fn first_start(&self, group: &str) -> bool {
    self.first_start.get(group).copied().unwrap_or(false)
  }

  fn group_of(&self, id: &str) -> Option<&CheckboxGroup> {
    self
      .board
      .groups()
      .iter()
      .find(|group| group.id() == id || group.contains(id))
  }

  fn dynamic_group_mut(&mut self, group: &str) -> Result<&mut CheckboxGroup, IntentError> {
    let target = self.board.group_mut(group)?;

    if !target.is_dynamic() {
      return Err(IntentError::NotDynamic {
        group: group.to_owned(),
      });
    }

    Ok(target)
  }

  /// Main form as it currently is.
  pub fn main_query(&self) -> MainQuery {
    MainQuery {
      text: self.text.clone(),
      sensitive_case: self.sensitive_case,
      checks: self
        .board
        .groups()
        .iter()
        .filter(|group| !group.is_dynamic())
        .flat_map(|group| group.elts())
        .map(|elt| (elt.id.clone(), elt.selected))
        .collect(),
    }
  }

  pub fn set_text(&mut self, text: impl Into<String>) -> Request {
    self.text = text.into();
    Request::MainInstant(self.main_query())
  }

  pub fn toggle_sensitive_case(&mut self) -> Request {
    self.sensitive_case = !self.sensitive_case;
    Request::MainInstant(self.main_query())
  }

  /// Put `text` on top of the history and return the request replacing it.
  pub fn push_history(&mut self, text: &str, max_len: usize) -> Request {
    self.history.push(text, max_len);

    Request::History {
      field_id: Some(TEXT_FIELD_ID.to_owned()),
      history: self.history.entries().to_vec(),
    }
  }

  /// Toggle a checkbox; a main checkbox is designated by the id of its group.
  pub fn toggle(&mut self, id: &str) -> Result<Request, IntentError> {
    let group = self
      .group_of(id)
      .ok_or_else(|| IntentError::UnknownCheckbox { id: id.to_owned() })?;
    let (group_id, dynamic) = (group.id().to_owned(), group.is_dynamic());

    self.board.toggle(id)?;

    if dynamic {
      let values: BTreeMap<String, bool> = self
        .board
        .group(&group_id)
        .map(|group| {
          group
            .elts()
            .iter()
            .map(|elt| (elt.id.clone(), elt.selected))
            .collect()
        })
        .unwrap_or_default();

      Ok(Request::Exec {
        manager: group_id,
        values,
      })
    } else {
      Ok(Request::MainInstant(self.main_query()))
    }
  }

  pub fn set_candidate(&mut self, group: &str, label: impl Into<String>) {
    self.candidates.insert(group.to_owned(), label.into());
  }

  pub fn candidate(&self, group: &str) -> &str {
    self.candidates.get(group).map_or("", String::as_str)
  }

  pub fn add_availability(&self, group: &str) -> AddAvailability {
    let candidate = self.candidate(group);

    if candidate.is_empty() {
      AddAvailability::Empty
    } else if self
      .board
      .group(group)
      .is_some_and(|group| group.has_label(candidate))
    {
      AddAvailability::Duplicate
    } else {
      AddAvailability::Ready
    }
  }

  /// Add the candidate of `group` locally, proposing the local id to the authority.
  ///
  /// The candidate is kept, so adding it twice in a row is refused as a duplicate.
  pub fn add(&mut self, group: &str, selected: bool) -> Result<Request, IntentError> {
    match self.add_availability(group) {
      AddAvailability::Empty => {
        return Err(IntentError::rejected("nothing to add"));
      }

      AddAvailability::Duplicate => {
        return Err(IntentError::rejected(format!(
          "{label} is already in {group}",
          label = self.candidate(group)
        )));
      }

      AddAvailability::Ready => (),
    }

    let label = self.candidate(group).to_owned();
    let id = self.dynamic_group_mut(group)?.add(&label, selected, None)?;
    self.board.propagate(group, selected);

    Ok(Request::Add {
      manager: group.to_owned(),
      label,
      selected,
      elt_id_to_add: Some(id),
    })
  }

  pub fn edit(
    &mut self,
    group: &str,
    elt_id: &str,
    label: &str,
    selected: bool,
  ) -> Result<Request, IntentError> {
    let target = self.dynamic_group_mut(group)?;
    target.relabel(elt_id, label)?;
    target.set_member(elt_id, selected)?;
    self.board.propagate(group, selected);

    Ok(Request::Mod {
      manager: group.to_owned(),
      elt_id: elt_id.to_owned(),
      label: label.to_owned(),
      selected,
    })
  }

  pub fn remove(&mut self, group: &str, elt_id: &str) -> Result<Request, IntentError> {
    self.dynamic_group_mut(group)?.remove(elt_id)?;
    self.board.propagate(group, false);

    Ok(Request::Remove {
      manager: group.to_owned(),
      elt_id: elt_id.to_owned(),
    })
  }

  pub fn reorder(&mut self, group: &str, elt_ids: &[String]) -> Result<Request, IntentError> {
    let target = self.dynamic_group_mut(group)?;
    target.reorder(elt_ids)?;

    Ok(Request::ListOrder {
      manager: group.to_owned(),
      elt_ids: target.order(),
    })
  }

  /// Move an element to `index`, clamped to the last position.
  pub fn move_elt(&mut self, group: &str, elt_id: &str, index: usize) -> Result<Request, IntentError> {
    let mut order = self.check_order(group)?;
    let from = order
      .iter()
      .position(|id| id == elt_id)
      .ok_or_else(|| IntentError::not_found(group, elt_id))?;

    let id = order.remove(from);
    order.insert(index.min(order.len()), id);

    self.reorder(group, &order)
  }

  /// Ids of the elements of a dynamic group, in display order.
  pub fn check_order(&self, group: &str) -> Result<Vec<String>, IntentError> {
    self
      .board
      .group(group)
      .map(CheckboxGroup::order)
      .ok_or_else(|| IntentError::unknown_group(group))
  }
}

#[cfg(test)]
mod tests {
  use case_search_config::Config;

  use super::{AddAvailability, Display};
  use crate::{
    authority::{Authority, FILES_TO_EXCLUDE, FILES_TO_INCLUDE},
    error::IntentError,
    protocol::request::Request,
    store::MemoryStore,
  };

  fn display() -> Display {
    let authority = Authority::hydrate(
      MemoryStore::default(),
      &Config::load_default_config().unwrap(),
    );
    Display::from_snapshot(&authority.snapshot())
  }

  #[test]
  fn add_slot() {
    let mut display = display();
    assert_eq!(display.add_availability(FILES_TO_INCLUDE), AddAvailability::Empty);
    assert!(display.first_start(FILES_TO_INCLUDE));

    display.set_candidate(FILES_TO_INCLUDE, "*.ts");
    assert_eq!(display.add_availability(FILES_TO_INCLUDE), AddAvailability::Ready);

    let req = display.add(FILES_TO_INCLUDE, true).unwrap();
    assert_eq!(
      req,
      Request::Add {
        manager: FILES_TO_INCLUDE.to_owned(),
        label: "*.ts".to_owned(),
        selected: true,
        elt_id_to_add: Some("filesToInclude-0".to_owned()),
      }
    );

    assert_eq!(display.add_availability(FILES_TO_INCLUDE), AddAvailability::Duplicate);
    assert!(matches!(
      display.add(FILES_TO_INCLUDE, true),
      Err(IntentError::ValidationRejected { .. })
    ));

    // case-sensitive comparison
    display.set_candidate(FILES_TO_INCLUDE, "*.TS");
    assert_eq!(display.add_availability(FILES_TO_INCLUDE), AddAvailability::Ready);
    assert_eq!(display.add_availability(FILES_TO_EXCLUDE), AddAvailability::Empty);
  }

  #[test]
  fn toggle_fixed_sends_main_form() {
    let mut display = display();
    display.set_text("hello");

    let Request::MainInstant(query) = display.toggle("case").unwrap() else {
      panic!("expected main-instant");
    };

    assert_eq!(query.text, "hello");
    assert_eq!(query.checks.len(), 9);
    assert!(!query.checks["kebabCase"]);
    assert!(!query.checks["beginWord"]);
  }

  #[test]
  fn toggle_dynamic_sends_exec() {
    let mut display = display();
    display.set_candidate(FILES_TO_EXCLUDE, "target");
    display.add(FILES_TO_EXCLUDE, false).unwrap();

    let req = display.toggle(FILES_TO_EXCLUDE).unwrap();
    assert_eq!(
      req,
      Request::Exec {
        manager: FILES_TO_EXCLUDE.to_owned(),
        values: [("filesToExclude-0".to_owned(), true)].into_iter().collect(),
      }
    );
  }

  #[test]
  fn ordering() {
    let mut display = display();
    for label in ["a", "b", "c"] {
      display.set_candidate(FILES_TO_INCLUDE, label);
      display.add(FILES_TO_INCLUDE, false).unwrap();
    }

    let req = display
      .move_elt(FILES_TO_INCLUDE, "filesToInclude-2", 0)
      .unwrap();
    assert_eq!(
      req,
      Request::ListOrder {
        manager: FILES_TO_INCLUDE.to_owned(),
        elt_ids: vec![
          "filesToInclude-2".to_owned(),
          "filesToInclude-0".to_owned(),
          "filesToInclude-1".to_owned()
        ],
      }
    );

    display.remove(FILES_TO_INCLUDE, "filesToInclude-0").unwrap();
    assert_eq!(
      display.check_order(FILES_TO_INCLUDE).unwrap(),
      ["filesToInclude-2", "filesToInclude-1"]
    );

    display.move_elt(FILES_TO_INCLUDE, "filesToInclude-2", 9).unwrap();
    assert_eq!(
      display.check_order(FILES_TO_INCLUDE).unwrap(),
      ["filesToInclude-1", "filesToInclude-2"]
    );
  }

  #[test]
  fn fixed_groups_are_not_editable() {
    let mut display = display();

    assert!(matches!(
      display.remove("case", "kebabCase"),
      Err(IntentError::NotDynamic { .. })
    ));
  }

  #[test]
  fn history() {
    let mut display = display();
    display.push_history("a", 2);
    display.push_history("b", 2);
    let req = display.push_history("a", 2);

    assert_eq!(
      req,
      Request::History {
        field_id: Some("text-to-search".to_owned()),
        history: vec!["a".to_owned(), "b".to_owned()],
      }
    );
  }
}
