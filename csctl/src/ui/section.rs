//! Titled blocks of fields.

use std::fmt::Display;

use colored::{ColoredString, Colorize};

use super::{status_icon::StatusIcon, table::Table};

#[derive(Debug)]
pub struct Section {
  name: ColoredString,
  fields: Vec<Field>,
}

impl Section {
  pub fn new(name: impl Into<ColoredString>) -> Self {
    Self {
      name: name.into(),
      fields: Vec::default(),
    }
  }

  pub fn push(&mut self, field: Field) -> &mut Self {
    self.fields.push(field);
    self
  }
}

impl Display for Section {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    writeln!(f, "{} {}", "·".bold(), self.name.clone().bold())?;

    for fld in &self.fields {
      match fld {
        // tables span several lines; indent each of them
        Field::Table(table) => {
          for line in table.to_string().lines() {
            writeln!(f, "    {line}")?;
          }
        }

        fld => writeln!(f, "  {fld}")?,
      }
    }

    Ok(())
  }
}

impl Extend<Field> for Section {
  fn extend<T: IntoIterator<Item = Field>>(&mut self, iter: T) {
    self.fields.extend(iter);
  }
}

/// Section field.
#[derive(Debug)]
pub enum Field {
  KeyValue {
    key: ColoredString,
    value: FieldValue,
    indent: usize,
  },

  StatusLine {
    status: StatusIcon,
    value: FieldValue,
    indent: usize,
  },

  Table(Table),
}

impl Field {
  pub fn kv(key: ColoredString, value: impl Into<FieldValue>) -> Self {
    Self::KeyValue {
      key,
      value: value.into(),
      indent: 0,
    }
  }

  pub fn status_line(status: StatusIcon, value: impl Into<FieldValue>) -> Self {
    Self::StatusLine {
      status,
      value: value.into(),
      indent: 0,
    }
  }

  pub fn indented(mut self) -> Self {
    match self {
      Self::KeyValue { ref mut indent, .. } | Self::StatusLine { ref mut indent, .. } => *indent += 1,
      Self::Table(_) => (),
    }

    self
  }
}

impl Display for Field {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Field::KeyValue { key, value, indent } => write!(
        f,
        "{indent}{key}{delim} {value}",
        delim = ":".black(),
        indent = " ".repeat(*indent * 2)
      ),

      Field::StatusLine {
        status,
        value,
        indent,
      } => write!(
        f,
        "{indent}{status} {value}",
        indent = " ".repeat(*indent * 2)
      ),

      Field::Table(table) => table.fmt(f),
    }
  }
}

#[derive(Debug)]
pub enum FieldValue {
  String(ColoredString),
  List(Vec<ColoredString>),
}

impl FieldValue {
  pub fn list(v: impl Into<Vec<ColoredString>>) -> Self {
    Self::List(v.into())
  }
}

impl Display for FieldValue {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      FieldValue::String(s) => s.fmt(f),
      FieldValue::List(ss) => {
        write!(f, "{}", "[".black())?;

        for (i, s) in ss.iter().enumerate() {
          if i > 0 {
            write!(f, "{} ", ",".black())?;
          }

          write!(f, "{s}")?;
        }

        write!(f, "{}", "]".black())
      }
    }
  }
}

impl<T> From<T> for FieldValue
where
  T: Into<ColoredString>,
{
  fn from(value: T) -> Self {
    FieldValue::String(value.into())
  }
}
