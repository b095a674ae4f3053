//! Constraint engine over checkbox groups.
//!
//! A [`Board`] holds every group of a session along with a list of declarative [`Rule`]s. After each change, rules
//! are evaluated in three phases, always in the same order:
//!
//! 1. mutual exclusion: selecting something in a group unselects everything in the groups it excludes;
//! 2. aggregation: main checkboxes are recomputed from their members (after exclusion, which might have changed them);
//! 3. enablement: groups depending on the selection of other groups are enabled or disabled.

use std::collections::BTreeMap;

use case_search_config::RuleConfig;
use serde::{Deserialize, Serialize};

use crate::{checkbox::group::CheckboxGroup, error::IntentError};

/// Declarative constraint between two groups.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Rule {
  Exclusive { a: String, b: String },
  EnabledWhenAny { group: String, target: String },
  DisabledWhenAny { group: String, target: String },
}

impl From<RuleConfig> for Rule {
  fn from(config: RuleConfig) -> Self {
    match config {
      RuleConfig::Exclusive { a, b } => Rule::Exclusive { a, b },
      RuleConfig::EnabledWhenAny { group, target } => Rule::EnabledWhenAny { group, target },
      RuleConfig::DisabledWhenAny { group, target } => Rule::DisabledWhenAny { group, target },
    }
  }
}

impl Rule {
  fn groups(&self) -> [&str; 2] {
    match self {
      Rule::Exclusive { a, b } => [a.as_str(), b.as_str()],
      Rule::EnabledWhenAny { group, target } | Rule::DisabledWhenAny { group, target } => {
        [group.as_str(), target.as_str()]
      }
    }
  }

  /// Group excluded by `group`, if this rule is an exclusion involving it.
  fn excluded_by(&self, group: &str) -> Option<&str> {
    match self {
      Rule::Exclusive { a, b } if a == group => Some(b.as_str()),
      Rule::Exclusive { a, b } if b == group => Some(a.as_str()),
      _ => None,
    }
  }
}

/// Whether an id designates the main checkbox of a group or one of its members.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Target {
  Main,
  Member,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Board {
  groups: Vec<CheckboxGroup>,
  rules: Vec<Rule>,
}

impl Board {
  /// Build a board and bring it into a consistent state.
  ///
  /// Rules referring to groups that are not part of the board are ignored.
  pub fn new(groups: Vec<CheckboxGroup>, rules: impl IntoIterator<Item = Rule>) -> Self {
    let rules = rules
      .into_iter()
      .filter(|rule| {
        let known = rule
          .groups()
          .iter()
          .all(|id| groups.iter().any(|group| group.id() == *id));

        if !known {
          log::warn!("ignoring rule {rule:?}: unknown group");
        }

        known
      })
      .collect();

    let mut board = Self { groups, rules };
    board.settle();
    board
  }

  pub fn groups(&self) -> &[CheckboxGroup] {
    &self.groups
  }

  pub fn rules(&self) -> &[Rule] {
    &self.rules
  }

  pub fn group(&self, id: &str) -> Option<&CheckboxGroup> {
    self.groups.iter().find(|group| group.id() == id)
  }

  pub fn group_mut(&mut self, id: &str) -> Result<&mut CheckboxGroup, IntentError> {
    self
      .groups
      .iter_mut()
      .find(|group| group.id() == id)
      .ok_or_else(|| IntentError::unknown_group(id))
  }

  fn locate(&self, id: &str) -> Option<(usize, Target)> {
    self.groups.iter().enumerate().find_map(|(i, group)| {
      if group.id() == id && group.main().is_some() {
        Some((i, Target::Main))
      } else if group.contains(id) {
        Some((i, Target::Member))
      } else {
        None
      }
    })
  }

  /// Value of a checkbox; main checkboxes are designated by the id of their group.
  pub fn is_selected(&self, id: &str) -> Option<bool> {
    let (index, target) = self.locate(id)?;
    let group = &self.groups[index];

    match target {
      Target::Main => group.main().map(|main| main.selected),
      Target::Member => group.get(id).map(|elt| elt.selected),
    }
  }

  /// Whether a member is selected and its group is enabled.
  pub fn is_active(&self, id: &str) -> bool {
    match self.locate(id) {
      Some((index, Target::Member)) => {
        let group = &self.groups[index];
        group.enabled() && group.get(id).is_some_and(|elt| elt.selected)
      }

      _ => false,
    }
  }

  pub fn any_selected(&self, group: &str) -> bool {
    self.group(group).is_some_and(CheckboxGroup::any_selected)
  }

  pub fn toggle(&mut self, id: &str) -> Result<(), IntentError> {
    let selected = self
      .is_selected(id)
      .ok_or_else(|| IntentError::UnknownCheckbox { id: id.to_owned() })?;
    self.set(id, !selected)
  }

  /// Set a checkbox and evaluate the rules.
  ///
  /// Setting the main checkbox of a group sets all of its members.
  pub fn set(&mut self, id: &str, selected: bool) -> Result<(), IntentError> {
    let (index, target) = self
      .locate(id)
      .ok_or_else(|| IntentError::UnknownCheckbox { id: id.to_owned() })?;
    let group = &mut self.groups[index];

    if !group.enabled() {
      return Err(IntentError::rejected(format!(
        "{id} belongs to the disabled group {group}",
        group = group.id()
      )));
    }

    match target {
      Target::Main => group.set_all(selected),
      Target::Member => group.set_member(id, selected)?,
    }

    let origin = group.id().to_owned();
    let any = group.any_selected();
    self.propagate(&origin, any);

    Ok(())
  }

  pub fn select_all(&mut self, group: &str) -> Result<(), IntentError> {
    self.set_group(group, true)
  }

  pub fn unselect_all(&mut self, group: &str) -> Result<(), IntentError> {
    self.set_group(group, false)
  }

  fn set_group(&mut self, group: &str, selected: bool) -> Result<(), IntentError> {
    let target = self.group_mut(group)?;
    target.set_all(selected);
    let any = target.any_selected();
    self.propagate(group, any);
    Ok(())
  }

  /// Evaluate the rules after a checkbox of `origin` was set to `selected`.
  pub fn propagate(&mut self, origin: &str, selected: bool) {
    if selected {
      let excluded = self
        .rules
        .iter()
        .filter_map(|rule| rule.excluded_by(origin))
        .map(str::to_owned)
        .collect::<Vec<_>>();

      for id in excluded {
        if let Ok(group) = self.group_mut(&id) {
          log::trace!("{origin} excludes {id}");
          group.unselect_all();
        }
      }
    }

    self.aggregate();
    self.enable();
  }

  /// Bring the board into a consistent state without knowing what changed.
  ///
  /// When both sides of an exclusion have selected members, the first side wins.
  pub fn settle(&mut self) {
    let conflicts = self
      .rules
      .iter()
      .filter_map(|rule| match rule {
        Rule::Exclusive { a, b } if self.any_selected(a) && self.any_selected(b) => Some(b.clone()),
        _ => None,
      })
      .collect::<Vec<_>>();

    for id in conflicts {
      if let Ok(group) = self.group_mut(&id) {
        log::warn!("{id} conflicts with an exclusive group; unselecting it");
        group.unselect_all();
      }
    }

    self.aggregate();
    self.enable();
  }

  fn aggregate(&mut self) {
    for group in &mut self.groups {
      group.recompute_main();
    }
  }

  fn enable(&mut self) {
    let enabled = self
      .groups
      .iter()
      .map(|group| {
        self.rules.iter().all(|rule| match rule {
          Rule::EnabledWhenAny { group: id, target } if id == group.id() => self.any_selected(target),
          Rule::DisabledWhenAny { group: id, target } if id == group.id() => {
            !self.any_selected(target)
          }
          _ => true,
        })
      })
      .collect::<Vec<_>>();

    for (group, enabled) in self.groups.iter_mut().zip(enabled) {
      group.set_enabled(enabled);
    }
  }

  /// Values of every checkbox, main checkboxes included under the id of their group.
  pub fn current_state(&self) -> BTreeMap<String, bool> {
    self
      .groups
      .iter()
      .flat_map(|group| group.current_state())
      .collect()
  }

  /// Overwrite member values and settle.
  ///
  /// Main checkboxes are derived, so their ids are ignored, as are unknown ids.
  pub fn assign(&mut self, values: &BTreeMap<String, bool>) {
    for (id, &selected) in values {
      match self.locate(id) {
        Some((index, Target::Member)) => {
          let _ = self.groups[index].set_member(id, selected);
        }

        Some((_, Target::Main)) => (),

        None => log::debug!("ignoring unknown checkbox {id}"),
      }
    }

    self.settle();
  }
}
