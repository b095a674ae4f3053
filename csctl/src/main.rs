mod cli;
mod error;
mod remote;
mod ui;

use case_search::{
  authority::SENSITIVE_CASE_KEY,
  display::Display,
  error::IntentError,
  logging,
  protocol::{request::Request, response::Response},
};
use case_search_config::Config;
use clap::Parser;
use cli::{Cli, Cmd};
use error::HellNo;
use remote::Remote;
use ui::{
  panel::{history_section, panel_sections},
  section::{Field, Section},
  status_icon::StatusIcon,
};

fn main() {
  if let Err(err) = start() {
    eprintln!("{} {err}", StatusIcon::Error);
    std::process::exit(1);
  }
}

fn start() -> Result<(), HellNo> {
  let cli = Cli::parse();
  logging::init(cli.verbose)?;

  let remote = Remote::new()?;

  match cli.cmd {
    Cmd::Open => open(&remote),

    Cmd::Close => {
      remote.send(&Request::Close)?;
      print_status(StatusIcon::Success, "panel closed");
      Ok(())
    }

    Cmd::Show { pattern } => {
      print_panel(&remote.display()?, pattern);
      Ok(())
    }

    Cmd::Text { text, no_history } => {
      let mut display = remote.display()?;
      let req = display.set_text(text.as_str());
      remote.sync(&mut display, &req)?;

      if !no_history {
        let config = Config::load_default_user()?;
        let req = display.push_history(&text, config.history.max_len);
        remote.sync(&mut display, &req)?;
      }

      print_panel(&display, true);
      Ok(())
    }

    Cmd::Toggle { id } => {
      let mut display = remote.display()?;
      let req = if id == SENSITIVE_CASE_KEY {
        display.toggle_sensitive_case()
      } else {
        display
          .toggle(&id)
          .map_err(|err| HellNo::Refused {
            action: "toggle",
            err,
          })?
      };

      apply(&remote, display, req)
    }

    Cmd::Add {
      group,
      label,
      unselected,
    } => {
      let mut display = remote.display()?;
      display.set_candidate(&group, label);
      let req = display
        .add(&group, !unselected)
        .map_err(|err| HellNo::Refused { action: "add", err })?;

      apply(&remote, display, req)
    }

    Cmd::Edit {
      group,
      elt_id,
      label,
      selected,
    } => {
      let mut display = remote.display()?;
      let selected = match selected {
        Some(selected) => selected,
        None => display
          .board()
          .group(&group)
          .and_then(|group| group.get(&elt_id))
          .map(|elt| elt.selected)
          .ok_or_else(|| HellNo::Refused {
            action: "edit",
            err: IntentError::not_found(group.as_str(), elt_id.as_str()),
          })?,
      };
      let req = display
        .edit(&group, &elt_id, &label, selected)
        .map_err(|err| HellNo::Refused {
          action: "edit",
          err,
        })?;

      apply(&remote, display, req)
    }

    Cmd::Remove { group, elt_id } => {
      let mut display = remote.display()?;
      let req = display
        .remove(&group, &elt_id)
        .map_err(|err| HellNo::Refused {
          action: "remove",
          err,
        })?;

      apply(&remote, display, req)
    }

    Cmd::Order {
      group,
      elt_id,
      index,
    } => {
      let mut display = remote.display()?;
      let req = display
        .move_elt(&group, &elt_id, index)
        .map_err(|err| HellNo::Refused {
          action: "reorder",
          err,
        })?;

      apply(&remote, display, req)
    }

    Cmd::History => {
      print!("{}", history_section(&remote.display()?));
      Ok(())
    }
  }
}

fn open(remote: &Remote) -> Result<(), HellNo> {
  let resps = remote.send(&Request::Open)?;

  if resps.contains(&Response::Reveal) {
    print_status(StatusIcon::Info, "panel already open");
  }

  let snapshot = resps
    .iter()
    .find_map(|resp| match resp {
      Response::State(snapshot) => Some(snapshot),
      _ => None,
    })
    .ok_or_else(|| HellNo::NoReply {
      command: "open".to_owned(),
    })?;

  let mut display = Display::from_snapshot(snapshot);
  for resp in &resps {
    display.apply(resp);
  }

  print_panel(&display, false);
  Ok(())
}

/// Send a request built from a local change, then show the resulting panel.
fn apply(remote: &Remote, mut display: Display, req: Request) -> Result<(), HellNo> {
  remote.sync(&mut display, &req)?;
  print_panel(&display, false);
  Ok(())
}

fn print_panel(display: &Display, with_pattern: bool) {
  for section in panel_sections(display, with_pattern) {
    print!("{section}");
  }
}

fn print_status(status: StatusIcon, msg: &str) {
  let mut section = Section::new("csctl");
  section.push(Field::status_line(status, msg));
  print!("{section}");
}
