use std::fmt::Display;

use colored::{ColoredString, Colorize};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StatusIcon {
  Checked,
  Unchecked,
  Disabled,
  Success,
  Error,
  Warn,
  Info,
}

impl StatusIcon {
  pub fn checkbox(selected: bool, enabled: bool) -> Self {
    match (selected, enabled) {
      (_, false) => StatusIcon::Disabled,
      (true, true) => StatusIcon::Checked,
      (false, true) => StatusIcon::Unchecked,
    }
  }
}

impl From<StatusIcon> for ColoredString {
  fn from(value: StatusIcon) -> Self {
    match value {
      StatusIcon::Checked => "[x]".green(),
      StatusIcon::Unchecked => "[ ]".normal(),
      StatusIcon::Disabled => "[-]".black(),
      StatusIcon::Success => "✔".green(),
      StatusIcon::Error => "✘".red(),
      StatusIcon::Warn => "⚠".yellow(),
      StatusIcon::Info => "ℹ".blue(),
    }
  }
}

impl Display for StatusIcon {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    ColoredString::from(*self).fmt(f)
  }
}
