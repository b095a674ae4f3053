use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[clap(name = "csctl", version, about = "CLI controller for case-search")]
pub struct Cli {
  #[clap(subcommand)]
  pub cmd: Cmd,

  /// Verbosity.
  ///
  /// Can be accumulated to get more verbosity: error, warn, info, debug, trace.
  #[arg(short, long, action = clap::ArgAction::Count, global = true)]
  pub verbose: u8,
}

#[derive(Debug, Subcommand)]
pub enum Cmd {
  /// Open the panel, or reveal it if already open.
  Open,

  /// Close the panel.
  Close,

  /// Show the state of the panel.
  Show {
    /// Also show the generated regular expression.
    #[clap(short, long)]
    pattern: bool,
  },

  /// Set the text to search for, and run the search.
  Text {
    text: String,

    /// Do not remember the text in the history.
    #[clap(long)]
    no_history: bool,
  },

  /// Toggle a checkbox.
  ///
  /// Use the id of a group to toggle its main checkbox, and `sensitiveCase` for case sensitivity.
  Toggle { id: String },

  /// Add an element to a filter group.
  Add {
    /// Filter group (filesToInclude, filesToExclude).
    group: String,

    label: String,

    /// Add the element unselected.
    #[clap(short, long)]
    unselected: bool,
  },

  /// Relabel an element of a filter group.
  Edit {
    group: String,
    elt_id: String,
    label: String,

    /// Whether the element is selected afterwards; unchanged if absent.
    #[clap(short, long)]
    selected: Option<bool>,
  },

  /// Remove an element from a filter group.
  Remove { group: String, elt_id: String },

  /// Move an element of a filter group to a new position.
  Order {
    group: String,
    elt_id: String,

    /// Position, starting at 0; clamped to the last position.
    index: usize,
  },

  /// Show the text history.
  History,
}
