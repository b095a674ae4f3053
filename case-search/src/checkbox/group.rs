//! Checkbox groups.
//!
//! A group is an ordered collection of [`Checkbox`], with an optional main checkbox aggregating its members. Dynamic
//! groups additionally allow adding, removing, relabeling and reordering their members at runtime.

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{checkbox::Checkbox, error::IntentError};

/// Aggregator of a group.
///
/// Selected iff the group is non-empty and all of its members are selected.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct MainCheckbox {
  pub label: String,
  pub selected: bool,
}

/// Allocator of member ids of a dynamic group.
///
/// Ids are `<group>-<n>`. `n` is monotonic and never handed out twice in the lifetime of the allocator, even after the
/// member using it is removed.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SubIds {
  next: usize,
}

impl SubIds {
  /// Allocator continuing after every id already in `elts`.
  pub fn seeded<'a>(group: &str, elts: impl IntoIterator<Item = &'a Checkbox>) -> Self {
    let next = elts
      .into_iter()
      .filter_map(|elt| Self::parse(group, &elt.id))
      .max()
      .map_or(0, |max| max + 1);

    Self { next }
  }

  pub fn allocate(&mut self, group: &str) -> String {
    let n = self.next;
    self.next += 1;
    format!("{group}-{n}")
  }

  /// Accept `proposed` if it is a well-formed id for `group` that was not handed out yet.
  pub fn claim(&mut self, group: &str, proposed: &str) -> Option<String> {
    let n = Self::parse(group, proposed)?;

    if n < self.next {
      return None;
    }

    self.next = n + 1;
    Some(proposed.to_owned())
  }

  fn parse(group: &str, id: &str) -> Option<usize> {
    let suffix = id.strip_prefix(group)?.strip_prefix('-')?;
    let n = suffix.parse::<usize>().ok()?;

    // reject leading zeros and signs, so that an id has a single spelling
    (n.to_string() == suffix).then_some(n)
  }
}

/// How members of a group come and go.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Membership {
  /// Members are declared once and never change.
  Fixed,

  /// Members are created and removed by the user.
  Dynamic(SubIds),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CheckboxGroup {
  id: String,
  main: Option<MainCheckbox>,
  elts: Vec<Checkbox>,
  enabled: bool,
  membership: Membership,
}

impl CheckboxGroup {
  pub fn fixed(id: impl Into<String>, main_label: Option<&str>, elts: Vec<Checkbox>) -> Self {
    Self::new(id.into(), main_label, elts, Membership::Fixed)
  }

  pub fn dynamic(id: impl Into<String>, main_label: Option<&str>, elts: Vec<Checkbox>) -> Self {
    let id = id.into();
    let sub_ids = SubIds::seeded(&id, &elts);
    Self::new(id, main_label, elts, Membership::Dynamic(sub_ids))
  }

  fn new(id: String, main_label: Option<&str>, elts: Vec<Checkbox>, membership: Membership) -> Self {
    let main = main_label.map(|label| MainCheckbox {
      label: label.to_owned(),
      selected: false,
    });
    let mut group = Self {
      id,
      main,
      elts,
      enabled: true,
      membership,
    };
    group.recompute_main();
    group
  }

  pub fn id(&self) -> &str {
    &self.id
  }

  pub fn main(&self) -> Option<&MainCheckbox> {
    self.main.as_ref()
  }

  pub fn elts(&self) -> &[Checkbox] {
    &self.elts
  }

  pub fn enabled(&self) -> bool {
    self.enabled
  }

  pub fn set_enabled(&mut self, enabled: bool) {
    self.enabled = enabled;
  }

  pub fn is_dynamic(&self) -> bool {
    matches!(self.membership, Membership::Dynamic(_))
  }

  pub fn get(&self, elt_id: &str) -> Option<&Checkbox> {
    self.elts.iter().find(|elt| elt.id == elt_id)
  }

  pub fn contains(&self, elt_id: &str) -> bool {
    self.get(elt_id).is_some()
  }

  fn get_mut(&mut self, elt_id: &str) -> Result<&mut Checkbox, IntentError> {
    let group = &self.id;
    self
      .elts
      .iter_mut()
      .find(|elt| elt.id == elt_id)
      .ok_or_else(|| IntentError::not_found(group, elt_id))
  }

  pub fn any_selected(&self) -> bool {
    self.elts.iter().any(|elt| elt.selected)
  }

  pub fn has_label(&self, label: &str) -> bool {
    self.elts.iter().any(|elt| elt.label == label)
  }

  /// Ids of the members, in order.
  pub fn order(&self) -> Vec<String> {
    self.elts.iter().map(|elt| elt.id.clone()).collect()
  }

  /// Labels of the selected members, in order, separated with commas.
  pub fn filter_string(&self) -> String {
    self
      .elts
      .iter()
      .filter(|elt| elt.selected)
      .map(|elt| elt.label.as_str())
      .join(",")
  }

  /// Set a member and recompute the main checkbox.
  pub fn set_member(&mut self, elt_id: &str, selected: bool) -> Result<(), IntentError> {
    self.get_mut(elt_id)?.selected = selected;
    self.recompute_main();
    Ok(())
  }

  pub fn set_all(&mut self, selected: bool) {
    for elt in &mut self.elts {
      elt.selected = selected;
    }

    self.recompute_main();
  }

  pub fn select_all(&mut self) {
    self.set_all(true);
  }

  pub fn unselect_all(&mut self) {
    self.set_all(false);
  }

  pub fn recompute_main(&mut self) {
    let all = !self.elts.is_empty() && self.elts.iter().all(|elt| elt.selected);

    if let Some(ref mut main) = self.main {
      main.selected = all;
    }
  }

  /// Values of the members, and of the main checkbox under the id of the group.
  pub fn current_state(&self) -> impl '_ + Iterator<Item = (String, bool)> {
    self
      .main
      .iter()
      .map(|main| (self.id.clone(), main.selected))
      .chain(self.elts.iter().map(|elt| (elt.id.clone(), elt.selected)))
  }

  fn sub_ids(&mut self) -> Result<&mut SubIds, IntentError> {
    match self.membership {
      Membership::Dynamic(ref mut sub_ids) => Ok(sub_ids),
      Membership::Fixed => Err(IntentError::NotDynamic {
        group: self.id.clone(),
      }),
    }
  }

  /// Append a new member and return its id.
  ///
  /// `proposed` is used as id if it is valid and was never used; otherwise a fresh id is allocated.
  pub fn add(
    &mut self,
    label: &str,
    selected: bool,
    proposed: Option<&str>,
  ) -> Result<String, IntentError> {
    let group = self.id.clone();
    let sub_ids = self.sub_ids()?;

    if label.is_empty() {
      return Err(IntentError::rejected(format!(
        "cannot add an element with an empty label to {group}"
      )));
    }

    let id = match proposed.and_then(|proposed| sub_ids.claim(&group, proposed)) {
      Some(id) => id,
      None => {
        if let Some(proposed) = proposed {
          log::debug!("{group}: ignoring proposed id {proposed}");
        }

        sub_ids.allocate(&group)
      }
    };

    if self.has_label(label) {
      log::warn!("{group}: label {label} is used more than once");
    }

    self.elts.push(Checkbox::new(&id, label, selected, true));
    self.recompute_main();

    Ok(id)
  }

  /// Remove a member; the ids of the other members are unchanged.
  pub fn remove(&mut self, elt_id: &str) -> Result<Checkbox, IntentError> {
    self.sub_ids()?;

    let index = self
      .elts
      .iter()
      .position(|elt| elt.id == elt_id)
      .ok_or_else(|| IntentError::not_found(&self.id, elt_id))?;
    let elt = self.elts.remove(index);
    self.recompute_main();

    Ok(elt)
  }

  pub fn relabel(&mut self, elt_id: &str, label: &str) -> Result<(), IntentError> {
    let elt = self.get_mut(elt_id)?;

    if !elt.editable {
      return Err(IntentError::rejected(format!("{elt_id} cannot be relabeled")));
    }

    if label.is_empty() {
      return Err(IntentError::rejected(format!(
        "cannot give an empty label to {elt_id}"
      )));
    }

    elt.label = label.to_owned();
    Ok(())
  }

  /// Move the members listed in `elt_ids` first, in that order.
  ///
  /// Members not listed keep their relative order after the listed ones. Nothing changes if an id is unknown.
  pub fn reorder(&mut self, elt_ids: &[String]) -> Result<(), IntentError> {
    self.sub_ids()?;

    if let Some(unknown) = elt_ids.iter().find(|id| !self.contains(id)) {
      return Err(IntentError::not_found(&self.id, unknown.as_str()));
    }

    let mut rest = std::mem::take(&mut self.elts);
    for id in elt_ids {
      if let Some(index) = rest.iter().position(|elt| &elt.id == id) {
        self.elts.push(rest.remove(index));
      }
    }
    self.elts.append(&mut rest);

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::{CheckboxGroup, SubIds};
  use crate::{checkbox::Checkbox, error::IntentError};

  fn files() -> CheckboxGroup {
    CheckboxGroup::dynamic("files", Some("All"), Vec::new())
  }

  fn ids(group: &CheckboxGroup) -> Vec<String> {
    group.order()
  }

  #[test]
  fn empty_main_unselected() {
    let mut group = files();
    assert_eq!(group.main().map(|main| main.selected), Some(false));

    group.select_all();
    assert_eq!(group.main().map(|main| main.selected), Some(false));
  }

  #[test]
  fn aggregation() {
    let mut group = CheckboxGroup::fixed(
      "word",
      Some("Whole word"),
      vec![
        Checkbox::new("beginWord", "Begin word", true, false),
        Checkbox::new("endWord", "End word", false, false),
      ],
    );
    assert!(!group.main().unwrap().selected);

    group.set_member("endWord", true).unwrap();
    assert!(group.main().unwrap().selected);

    group.set_member("beginWord", false).unwrap();
    assert!(!group.main().unwrap().selected);

    group.select_all();
    assert!(group.main().unwrap().selected);
    assert!(group.elts().iter().all(|elt| elt.selected));

    group.unselect_all();
    assert!(!group.any_selected());
  }

  #[test]
  fn sequential_ids_never_reused() {
    let mut group = files();

    assert_eq!(group.add("*.ts", false, None).unwrap(), "files-0");
    assert_eq!(group.add("*.rs", false, None).unwrap(), "files-1");

    group.remove("files-1").unwrap();
    assert_eq!(group.add("*.md", false, None).unwrap(), "files-2");
  }

  #[test]
  fn seeded_ids() {
    let mut group = CheckboxGroup::dynamic(
      "files",
      None,
      vec![
        Checkbox::new("files-3", "a", false, true),
        Checkbox::new("files-1", "b", false, true),
      ],
    );

    assert_eq!(group.add("c", false, None).unwrap(), "files-4");
  }

  #[test]
  fn proposed_ids() {
    let mut sub_ids = SubIds::default();

    assert_eq!(sub_ids.claim("files", "files-2"), Some("files-2".to_owned()));
    assert_eq!(sub_ids.claim("files", "files-2"), None);
    assert_eq!(sub_ids.claim("files", "files-1"), None);
    assert_eq!(sub_ids.claim("files", "files-03"), None);
    assert_eq!(sub_ids.claim("files", "other-5"), None);
    assert_eq!(sub_ids.claim("files", "files-x"), None);
    assert_eq!(sub_ids.allocate("files"), "files-3");

    let mut group = files();
    assert_eq!(group.add("a", false, Some("files-7")).unwrap(), "files-7");
    assert_eq!(group.add("b", false, Some("files-7")).unwrap(), "files-8");
  }

  #[test]
  fn empty_label_rejected() {
    let mut group = files();

    assert!(matches!(
      group.add("", true, None),
      Err(IntentError::ValidationRejected { .. })
    ));
    assert!(group.elts().is_empty());
  }

  #[test]
  fn duplicate_label_accepted() {
    let mut group = files();
    group.add("*.ts", true, None).unwrap();
    group.add("*.ts", true, None).unwrap();

    assert_eq!(group.elts().len(), 2);
    assert_eq!(group.filter_string(), "*.ts,*.ts");
  }

  #[test]
  fn fixed_group_is_not_dynamic() {
    let mut group = CheckboxGroup::fixed("case", Some("All"), Vec::new());

    assert_eq!(
      group.add("x", false, None),
      Err(IntentError::NotDynamic {
        group: "case".to_owned()
      })
    );
    assert!(matches!(
      group.reorder(&[]),
      Err(IntentError::NotDynamic { .. })
    ));
  }

  #[test]
  fn filter_string() {
    let mut group = files();
    group.add("*.ts", true, None).unwrap();
    group.add("*.rs", false, None).unwrap();
    group.add("src/**", true, None).unwrap();

    assert_eq!(group.filter_string(), "*.ts,src/**");

    group.unselect_all();
    assert_eq!(group.filter_string(), "");
  }

  #[test]
  fn reorder() {
    let mut group = files();
    for label in ["a", "b", "c"] {
      group.add(label, true, None).unwrap();
    }

    group
      .reorder(&["files-2".to_owned(), "files-0".to_owned(), "files-1".to_owned()])
      .unwrap();
    assert_eq!(ids(&group), ["files-2", "files-0", "files-1"]);
    assert_eq!(group.filter_string(), "c,a,b");

    group.remove("files-0").unwrap();
    assert_eq!(ids(&group), ["files-2", "files-1"]);
  }

  #[test]
  fn partial_reorder() {
    let mut group = files();
    for label in ["a", "b", "c", "d"] {
      group.add(label, false, None).unwrap();
    }

    group.reorder(&["files-3".to_owned()]).unwrap();
    assert_eq!(ids(&group), ["files-3", "files-0", "files-1", "files-2"]);
  }

  #[test]
  fn reorder_unknown() {
    let mut group = files();
    group.add("a", false, None).unwrap();
    group.add("b", false, None).unwrap();

    assert_eq!(
      group.reorder(&["files-1".to_owned(), "files-9".to_owned()]),
      Err(IntentError::not_found("files", "files-9"))
    );
    assert_eq!(ids(&group), ["files-0", "files-1"]);
  }

  #[test]
  fn relabel() {
    let mut group = files();
    group.add("a", true, None).unwrap();

    group.relabel("files-0", "b").unwrap();
    assert_eq!(group.get("files-0").unwrap().label, "b");

    assert!(group.relabel("files-0", "").is_err());
    assert_eq!(
      group.relabel("files-4", "c"),
      Err(IntentError::not_found("files", "files-4"))
    );
  }

  #[test]
  fn remove_unknown() {
    let mut group = files();

    assert_eq!(
      group.remove("files-0"),
      Err(IntentError::not_found("files", "files-0"))
    );
  }
}
