//! Rendering of a panel.

use case_search::{
  authority::{BEGIN_WORD, END_WORD},
  cases::CaseKind,
  checkbox::group::CheckboxGroup,
  display::{AddAvailability, Display},
  regex_query::{self, WordBoundaries},
};
use colored::Colorize;

use super::{
  section::{Field, FieldValue, Section},
  status_icon::StatusIcon,
  table::{Cell, Row, Table},
};

/// Sections describing the whole panel.
pub fn panel_sections(display: &Display, with_pattern: bool) -> Vec<Section> {
  let mut sections = vec![search_section(display, with_pattern)];
  sections.extend(display.board().groups().iter().map(|group| {
    if group.is_dynamic() {
      dynamic_group_section(display, group)
    } else {
      fixed_group_section(group)
    }
  }));

  sections
}

fn search_section(display: &Display, with_pattern: bool) -> Section {
  let mut section = Section::new("Search");
  section
    .push(Field::kv("Text".blue(), display.text().green()))
    .push(Field::status_line(
      StatusIcon::checkbox(display.sensitive_case(), true),
      "Case sensitive (sensitiveCase)",
    ));

  if with_pattern {
    section.push(Field::kv("Pattern".blue(), preview(display).cyan()));
  }

  section
}

/// Pattern the daemon compiles for the current state of the display.
fn preview(display: &Display) -> String {
  let board = display.board();
  let cases = CaseKind::ALL
    .into_iter()
    .filter(|kind| board.is_active(kind.id()))
    .collect::<Vec<_>>();
  let bounds = WordBoundaries::new(board.is_active(BEGIN_WORD), board.is_active(END_WORD));

  regex_query::compile(display.text(), &cases, bounds).pattern
}

fn group_title(group: &CheckboxGroup) -> String {
  match group.main() {
    Some(main) => format!(
      "{id} {status} {label}",
      id = group.id(),
      status = StatusIcon::checkbox(main.selected, group.enabled()),
      label = main.label
    ),
    None => group.id().to_owned(),
  }
}

fn fixed_group_section(group: &CheckboxGroup) -> Section {
  let mut section = Section::new(group_title(group));
  section.extend(group.elts().iter().map(|elt| {
    Field::status_line(
      StatusIcon::checkbox(elt.selected, group.enabled()),
      format!("{label} {id}", label = elt.label, id = format!("({})", elt.id).black()),
    )
  }));

  section
}

fn dynamic_group_section(display: &Display, group: &CheckboxGroup) -> Section {
  let mut section = Section::new(group_title(group));

  if group.elts().is_empty() {
    let hint = if display.first_start(group.id()) {
      format!("nothing yet; add a filter with {}", format!("csctl add {} <glob>", group.id()).bold())
    } else {
      "empty".to_owned()
    };
    section.push(Field::status_line(StatusIcon::Info, hint));
  } else {
    let mut table = Table::new(
      Row::default()
        .with("#".bold())
        .with("".bold())
        .with("Id".bold())
        .with("Label".bold()),
    );

    for (i, elt) in group.elts().iter().enumerate() {
      table.push(
        Row::default()
          .with(Cell::new(i.to_string().black()))
          .with(Cell::new(StatusIcon::checkbox(elt.selected, group.enabled())))
          .with(elt.id.as_str())
          .with(elt.label.as_str().green()),
      );
    }

    section.push(Field::Table(table));

    let filter = group.filter_string();
    if !filter.is_empty() {
      section.push(Field::kv("Filter".blue(), filter.cyan()));
    }
  }

  if display.add_availability(group.id()) == AddAvailability::Duplicate {
    section.push(Field::status_line(
      StatusIcon::Warn,
      format!("{} is already in the group", display.candidate(group.id())),
    ));
  }

  section
}

/// Section listing the text history, most recent first.
pub fn history_section(display: &Display) -> Section {
  let mut section = Section::new("History");
  section.push(Field::kv(
    "Texts".blue(),
    FieldValue::list(
      display
        .history()
        .iter()
        .map(|entry| entry.as_str().green())
        .collect::<Vec<_>>(),
    ),
  ));

  section
}
