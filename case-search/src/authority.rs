//! Authoritative state of a session.
//!
//! The [`Authority`] owns the persisted state and is its only writer. It is hydrated from the store when a session
//! starts, validates and applies every intent coming from the display side, and decides whether a new search must be
//! run.
//!
//! Persisted keys:
//!
//! - `text`, `sensitiveCase` and `textToSearchHistory`;
//! - one boolean per member of every group, under the id of the member (`kebabCase`, `beginWord`, `filesToInclude-0`);
//! - for dynamic groups, `<group>Elts` (ordered member ids) and `<id>-label` per member.
//!
//! Main checkboxes are derived from their members and never persisted.

use std::collections::{BTreeMap, BTreeSet};

use case_search_config::Config;

use crate::{
  cases::CaseKind,
  checkbox::{
    board::{Board, Rule},
    group::CheckboxGroup,
    label_key, Checkbox,
  },
  error::IntentError,
  history::History,
  protocol::{
    request::MainQuery,
    response::{GroupSnapshot, Snapshot},
  },
  regex_query::{self, CompiledQuery, WordBoundaries},
  search::SearchRequest,
  store::Store,
};

pub const CASE_GROUP: &str = "case";
pub const WORD_GROUP: &str = "word";
pub const BEGIN_WORD: &str = "beginWord";
pub const END_WORD: &str = "endWord";
pub const FILES_TO_INCLUDE: &str = "filesToInclude";
pub const FILES_TO_EXCLUDE: &str = "filesToExclude";

/// Dynamic groups; their ids double as the names of the search filters.
pub const FILTER_GROUPS: [&str; 2] = [FILES_TO_INCLUDE, FILES_TO_EXCLUDE];

pub const TEXT_KEY: &str = "text";
pub const SENSITIVE_CASE_KEY: &str = "sensitiveCase";
pub const HISTORY_KEY: &str = "textToSearchHistory";

/// Key of the ordered member ids of a dynamic group.
pub fn elts_key(group: &str) -> String {
  format!("{group}Elts")
}

/// Change requested on a dynamic group.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Intent {
  /// Members were toggled.
  Exec { values: BTreeMap<String, bool> },

  Add {
    label: String,
    selected: bool,
    proposed_id: Option<String>,
  },

  Mod {
    elt_id: String,
    label: String,
    selected: bool,
  },

  Remove { elt_id: String },

  Reorder { elt_ids: Vec<String> },
}

/// What the caller must do after an intent was applied.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Effect {
  /// Whether the search must be run again.
  pub search: bool,
}

#[derive(Debug)]
pub struct Authority<S> {
  store: S,
  board: Board,
  text: String,
  sensitive_case: bool,
  history: History,
  history_max_len: usize,

  /// Dynamic groups whose members were never persisted.
  first_start: BTreeSet<String>,
}

impl<S> Authority<S>
where
  S: Store,
{
  /// Load the state of a new session from `store`, falling back to the configured defaults.
  pub fn hydrate(store: S, config: &Config) -> Self {
    log::debug!("hydrating from {} persisted keys", store.keys().len());
    let defaults = &config.defaults;

    let case = CheckboxGroup::fixed(
      CASE_GROUP,
      Some("All"),
      CaseKind::ALL
        .into_iter()
        .map(|kind| {
          let transform = kind.transform();
          let selected = store.get(transform.id, defaults.case(transform.id));
          Checkbox::new(transform.id, transform.label, selected, false)
        })
        .collect(),
    );

    let word = CheckboxGroup::fixed(
      WORD_GROUP,
      Some("Whole word"),
      vec![
        Checkbox::new(
          BEGIN_WORD,
          "Begin word",
          store.get(BEGIN_WORD, defaults.begin_word),
          false,
        ),
        Checkbox::new(
          END_WORD,
          "End word",
          store.get(END_WORD, defaults.end_word),
          false,
        ),
      ],
    );

    let mut first_start = BTreeSet::new();
    let mut groups = vec![case, word];
    for group in FILTER_GROUPS {
      let key = elts_key(group);

      if !store.contains(&key) {
        first_start.insert(group.to_owned());
      }

      let elts = store
        .get(&key, Vec::<String>::new())
        .into_iter()
        .filter_map(|id| {
          let label = store.get(&label_key(&id), String::new());

          if label.is_empty() {
            log::warn!("{group}: dropping {id}, which has no label");
            return None;
          }

          let selected = store.get(&id, false);
          Some(Checkbox::new(id, label, selected, true))
        })
        .collect();

      groups.push(CheckboxGroup::dynamic(group, Some("All"), elts));
    }

    let loaded = values(&groups);
    let board = Board::new(groups, config.rules.iter().cloned().map(Rule::from));

    let text = store.get(TEXT_KEY, String::new());
    let sensitive_case = store.get(SENSITIVE_CASE_KEY, defaults.sensitive_case);
    let history_max_len = config.history.max_len;
    let history = History::new(store.get(HISTORY_KEY, Vec::new()), history_max_len);

    let mut authority = Self {
      store,
      board,
      text,
      sensitive_case,
      history,
      history_max_len,
      first_start,
    };

    // rules might have changed what was loaded
    authority.persist_changes(&loaded);
    authority
  }

  pub fn board(&self) -> &Board {
    &self.board
  }

  pub fn text(&self) -> &str {
    &self.text
  }

  pub fn sensitive_case(&self) -> bool {
    self.sensitive_case
  }

  pub fn history(&self) -> &[String] {
    self.history.entries()
  }

  pub fn store(&self) -> &S {
    &self.store
  }

  pub fn into_store(self) -> S {
    self.store
  }

  /// Replace the free-text history.
  pub fn set_history(&mut self, entries: Vec<String>) {
    self.history = History::new(entries, self.history_max_len);
    self.store.set(HISTORY_KEY, Some(self.history.entries()));
  }

  /// Apply the main form and return the search to run.
  pub fn apply_main(&mut self, query: &MainQuery) -> SearchRequest {
    self.text = query.text.clone();
    self.sensitive_case = query.sensitive_case;
    self.store.set(TEXT_KEY, Some(&self.text));
    self.store.set(SENSITIVE_CASE_KEY, Some(self.sensitive_case));

    let before = self.board.current_state();
    self.board.assign(&query.checks);

    // the form is saved as a whole
    for group in [CASE_GROUP, WORD_GROUP] {
      if let Some(group) = self.board.group(group) {
        for elt in group.elts() {
          self.store.set(&elt.id, Some(elt.selected));
        }
      }
    }
    self.persist_changes(&before);

    self.search_request()
  }

  /// Selected case transforms, in table order.
  pub fn selected_cases(&self) -> Vec<CaseKind> {
    CaseKind::ALL
      .into_iter()
      .filter(|kind| self.board.is_active(kind.id()))
      .collect()
  }

  pub fn compiled_query(&self) -> CompiledQuery {
    let bounds = WordBoundaries::new(
      self.board.is_active(BEGIN_WORD),
      self.board.is_active(END_WORD),
    );

    regex_query::compile(&self.text, &self.selected_cases(), bounds)
  }

  /// Filter string of a dynamic group; empty when the group is disabled.
  pub fn filter(&self, group: &str) -> String {
    self
      .board
      .group(group)
      .filter(|group| group.enabled())
      .map(CheckboxGroup::filter_string)
      .unwrap_or_default()
  }

  fn filters(&self) -> [String; 2] {
    FILTER_GROUPS.map(|group| self.filter(group))
  }

  /// Search reflecting the current state.
  pub fn search_request(&self) -> SearchRequest {
    let compiled = self.compiled_query();
    let [files_to_include, files_to_exclude] = self.filters().map(|filter| {
      if filter.is_empty() {
        None
      } else {
        Some(filter)
      }
    });

    SearchRequest {
      query: compiled.pattern,
      trigger_search: true,
      is_regex: true,
      is_case_sensitive: self.sensitive_case,
      match_whole_word: compiled.host_whole_word,
      files_to_include,
      files_to_exclude,
    }
  }

  pub fn snapshot(&self) -> Snapshot {
    Snapshot {
      text: self.text.clone(),
      sensitive_case: self.sensitive_case,
      groups: self
        .board
        .groups()
        .iter()
        .map(|group| GroupSnapshot::new(group, self.first_start.contains(group.id())))
        .collect(),
      rules: self.board.rules().to_vec(),
    }
  }

  /// Apply an intent on the dynamic group `group`.
  ///
  /// On error, nothing has changed.
  pub fn handle_intent(&mut self, group: &str, intent: Intent) -> Result<Effect, IntentError> {
    let target = self
      .board
      .group(group)
      .ok_or_else(|| IntentError::unknown_group(group))?;

    if !target.is_dynamic() {
      return Err(IntentError::NotDynamic {
        group: group.to_owned(),
      });
    }

    let before = self.board.current_state();
    let filters = self.filters();
    let is_mod = matches!(intent, Intent::Mod { .. });

    let search = match intent {
      Intent::Exec { values } => {
        self.exec(group, &values)?;
        true
      }

      Intent::Add {
        label,
        selected,
        proposed_id,
      } => {
        let id = self
          .board
          .group_mut(group)?
          .add(&label, selected, proposed_id.as_deref())?;
        log::info!("{group}: added {id} ({label})");

        self.store.set(&label_key(&id), Some(&label));
        self.board.propagate(group, selected);
        self.persist_elts(group);
        true
      }

      Intent::Mod {
        elt_id,
        label,
        selected,
      } => {
        let target = self.board.group_mut(group)?;
        let was_selected = target
          .get(&elt_id)
          .map(|elt| elt.selected)
          .ok_or_else(|| IntentError::not_found(group, elt_id.as_str()))?;

        target.relabel(&elt_id, &label)?;
        target.set_member(&elt_id, selected)?;
        log::info!("{group}: {elt_id} is now {label} ({selected})");

        self.store.set(&label_key(&elt_id), Some(&label));
        self.board.propagate(group, selected);
        was_selected
      }

      Intent::Remove { elt_id } => {
        let removed = self.board.group_mut(group)?.remove(&elt_id)?;
        log::info!("{group}: removed {elt_id} ({label})", label = removed.label);

        self.store.set::<bool>(&removed.id, None);
        self.store.set::<String>(&removed.label_key(), None);
        self.board.propagate(group, false);
        self.persist_elts(group);
        removed.selected
      }

      Intent::Reorder { elt_ids } => {
        self.board.group_mut(group)?.reorder(&elt_ids)?;
        self.persist_elts(group);
        false
      }
    };

    self.persist_changes(&before);

    // a mod only searches when the element was selected before it
    let search = if is_mod {
      search
    } else {
      search || filters != self.filters()
    };

    Ok(Effect { search })
  }

  /// Set members of `group`, all or nothing.
  fn exec(&mut self, group: &str, values: &BTreeMap<String, bool>) -> Result<(), IntentError> {
    let target = self.board.group_mut(group)?;

    if !target.enabled() {
      return Err(IntentError::rejected(format!(
        "cannot set members of the disabled group {group}"
      )));
    }

    // main checkbox is derived
    let values = values
      .iter()
      .filter(|(id, _)| id.as_str() != group)
      .collect::<Vec<_>>();

    if let Some((unknown, _)) = values.iter().find(|(id, _)| !target.contains(id)) {
      return Err(IntentError::not_found(group, unknown.as_str()));
    }

    for &(id, &selected) in &values {
      target.set_member(id, selected)?;
    }

    let any = values.iter().any(|&(_, &selected)| selected);
    self.board.propagate(group, any);
    Ok(())
  }

  fn persist_elts(&mut self, group: &str) {
    if let Some(target) = self.board.group(group) {
      let order = target.order();
      self.store.set(&elts_key(group), Some(order));
      self.first_start.remove(group);
    }
  }

  /// Persist every member whose value differs from `before`.
  fn persist_changes(&mut self, before: &BTreeMap<String, bool>) {
    let changed = self
      .board
      .groups()
      .iter()
      .flat_map(|group| group.elts())
      .filter(|elt| before.get(&elt.id) != Some(&elt.selected))
      .map(|elt| (elt.id.clone(), elt.selected))
      .collect::<Vec<_>>();

    for (id, selected) in changed {
      self.store.set(&id, Some(selected));
    }
  }
}

fn values(groups: &[CheckboxGroup]) -> BTreeMap<String, bool> {
  groups
    .iter()
    .flat_map(|group| group.current_state())
    .collect()
}
