//! Output table with header and rows.

use std::fmt::Display;

use colored::ColoredString;
use unicode_segmentation::UnicodeSegmentation;

/// A table containing a header and rows.
///
/// Columns are padded to the width, in graphemes, of their widest cell. Use the [`Display`] implementor to write it to
/// a string.
#[derive(Debug, Default)]
pub struct Table {
  header: Row,
  rows: Vec<Row>,
}

impl Table {
  pub fn new(header: Row) -> Self {
    Self {
      header,
      rows: Vec::new(),
    }
  }

  /// Add a row to the table.
  pub fn push(&mut self, row: Row) -> &mut Self {
    self.rows.push(row);
    self
  }

  fn widths(&self) -> Vec<usize> {
    let cols = self.header.cells.len();

    (0..cols)
      .map(|i| {
        self
          .rows
          .iter()
          .chain([&self.header])
          .filter_map(|row| row.cells.get(i))
          .map(Cell::width)
          .max()
          .unwrap_or(0)
      })
      .collect()
  }
}

impl Display for Table {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let widths = self.widths();

    self.header.display_with_widths(&widths, f)?;

    let delim = Row {
      cells: vec![Cell::new("").fill('-'); widths.len()],
    };
    delim.display_with_widths(&widths, f)?;

    for row in &self.rows {
      row.display_with_widths(&widths, f)?;
    }

    Ok(())
  }
}

/// A cell inside a table.
///
/// It can be used as header or row values.
#[derive(Clone, Debug)]
pub struct Cell {
  content: ColoredString,
  filling: char,
}

impl Cell {
  pub fn new(content: impl Into<ColoredString>) -> Self {
    Self {
      content: content.into(),
      filling: ' ',
    }
  }

  pub fn fill(mut self, filling: char) -> Self {
    self.filling = filling;
    self
  }

  /// Width of the content, ignoring styling.
  fn width(&self) -> usize {
    self.content.graphemes(true).count()
  }

  fn display_with_width(&self, width: usize, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.content)?;

    for _ in 0..width.saturating_sub(self.width()) {
      write!(f, "{}", self.filling)?;
    }

    Ok(())
  }
}

impl<'a> From<&'a str> for Cell {
  fn from(s: &'a str) -> Self {
    Self::new(s)
  }
}

impl From<ColoredString> for Cell {
  fn from(s: ColoredString) -> Self {
    Self::new(s)
  }
}

/// A row of cells.
#[derive(Debug, Default)]
pub struct Row {
  cells: Vec<Cell>,
}

impl Row {
  pub fn with(mut self, cell: impl Into<Cell>) -> Self {
    self.cells.push(cell.into());
    self
  }

  fn display_with_widths(&self, widths: &[usize], f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    for (i, (cell, &width)) in self.cells.iter().zip(widths).enumerate() {
      if i > 0 {
        f.write_str(" | ")?;
      }

      cell.display_with_width(width, f)?;
    }

    f.write_str("\n")
  }
}

#[cfg(test)]
mod tests {
  use super::{Row, Table};

  #[test]
  fn columns_are_aligned() {
    colored::control::set_override(false);

    let mut table = Table::new(Row::default().with("#").with("Label"));
    table
      .push(Row::default().with("0").with("*.ts"))
      .push(Row::default().with("1").with("été/**"));

    assert_eq!(
      table.to_string(),
      "# | Label \n- | ------\n0 | *.ts  \n1 | été/**\n"
    );
  }
}
