//! User Interface in the terminal.
//!
//! This module exports everything that is needed to render a panel to the user.

pub mod panel;
pub mod section;
pub mod status_icon;
pub mod table;
