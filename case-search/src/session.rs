//! Session controller.
//!
//! A [`Controller`] routes requests to the authoritative state of the open panel, runs searches when needed, and
//! builds the responses. There is at most one panel at a time; while no panel is open, only [`Request::Open`] has an
//! effect.

use case_search_config::Config;

use crate::{
  authority::{Authority, Intent},
  protocol::{request::Request, response::Response},
  search::{SearchExecutor, SearchRequest},
  store::Store,
};

#[derive(Debug)]
pub struct Controller<S, E> {
  config: Config,
  executor: E,

  // exactly one of these is set: the store while idle, the authority (owning the store) while a panel is open
  store: Option<S>,
  authority: Option<Authority<S>>,
}

impl<S, E> Controller<S, E>
where
  S: Store,
  E: SearchExecutor,
{
  pub fn new(config: Config, store: S, executor: E) -> Self {
    Self {
      config,
      executor,
      store: Some(store),
      authority: None,
    }
  }

  pub fn is_active(&self) -> bool {
    self.authority.is_some()
  }

  pub fn authority(&self) -> Option<&Authority<S>> {
    self.authority.as_ref()
  }

  pub fn executor(&self) -> &E {
    &self.executor
  }

  /// Handle a request and return the responses to send back, in order.
  pub fn handle(&mut self, req: Request) -> Vec<Response> {
    log::debug!("handling {req:?}");

    if let Some(manager) = req.manager() {
      log::trace!("routing to the {manager} group");
    }

    match req {
      Request::Open => self.open(),

      Request::Close | Request::Shutdown => {
        self.close();
        Vec::new()
      }

      req => match self.authority {
        Some(ref mut authority) => Self::handle_active(authority, &mut self.executor, req),

        None => {
          log::warn!("no panel open; dropping {req:?}");
          Vec::new()
        }
      },
    }
  }

  fn open(&mut self) -> Vec<Response> {
    if let Some(ref authority) = self.authority {
      log::debug!("panel already open");
      return vec![Response::Reveal, Response::State(authority.snapshot())];
    }

    let Some(store) = self.store.take() else {
      log::error!("no state to open a panel with");
      return Vec::new();
    };

    log::info!("opening panel");
    let authority = Authority::hydrate(store, &self.config);
    let resp = vec![
      Response::State(authority.snapshot()),
      Response::history(authority.history().to_vec()),
    ];
    self.authority = Some(authority);

    resp
  }

  fn close(&mut self) {
    if let Some(authority) = self.authority.take() {
      log::info!("closing panel");
      self.store = Some(authority.into_store());
    }
  }

  fn handle_active(authority: &mut Authority<S>, executor: &mut E, req: Request) -> Vec<Response> {
    let (group, intent) = match req {
      Request::Snapshot => {
        return vec![
          Response::State(authority.snapshot()),
          Response::history(authority.history().to_vec()),
        ];
      }

      Request::MainInstant(query) => {
        let search = authority.apply_main(&query);
        run_search(executor, &search);
        return vec![Response::Focus];
      }

      Request::History { history, .. } => {
        authority.set_history(history);
        return vec![Response::Focus];
      }

      Request::Exec { manager, values } => (manager, Intent::Exec { values }),

      Request::Add {
        manager,
        label,
        selected,
        elt_id_to_add,
      } => (
        manager,
        Intent::Add {
          label,
          selected,
          proposed_id: elt_id_to_add,
        },
      ),

      Request::Mod {
        manager,
        elt_id,
        label,
        selected,
      } => (
        manager,
        Intent::Mod {
          elt_id,
          label,
          selected,
        },
      ),

      Request::Remove { manager, elt_id } => (manager, Intent::Remove { elt_id }),

      Request::ListOrder { manager, elt_ids } => (manager, Intent::Reorder { elt_ids }),

      Request::Open | Request::Close | Request::Shutdown => return Vec::new(),
    };

    match authority.handle_intent(&group, intent) {
      Ok(effect) => {
        if effect.search {
          run_search(executor, &authority.search_request());
        }

        vec![Response::State(authority.snapshot())]
      }

      Err(err) => {
        log::warn!("dropping intent: {err}");
        vec![Response::Rejected {
          reason: err.to_string(),
        }]
      }
    }
  }
}

fn run_search(executor: &mut impl SearchExecutor, req: &SearchRequest) {
  log::debug!("searching {req:?}");

  if let Err(err) = executor.execute(req) {
    log::error!("{err}");
  }
}

#[cfg(test)]
mod tests {
  use case_search_config::Config;

  use super::Controller;
  use crate::{
    protocol::{
      request::{MainQuery, Request},
      response::Response,
    },
    search::SearchRequest,
    store::MemoryStore,
  };

  fn controller() -> Controller<MemoryStore, Vec<SearchRequest>> {
    Controller::new(
      Config::load_default_config().unwrap(),
      MemoryStore::default(),
      Vec::new(),
    )
  }

  #[test]
  fn idle_drops_everything_but_open() {
    let mut controller = controller();

    assert!(controller.handle(Request::Snapshot).is_empty());
    assert!(controller
      .handle(Request::MainInstant(MainQuery::default()))
      .is_empty());
    assert!(controller.executor().is_empty());
    assert!(!controller.is_active());
  }

  #[test]
  fn single_panel() {
    let mut controller = controller();

    let resp = controller.handle(Request::Open);
    assert!(matches!(
      resp.as_slice(),
      [Response::State(_), Response::History { .. }]
    ));

    let resp = controller.handle(Request::Open);
    assert!(matches!(resp.as_slice(), [Response::Reveal, Response::State(_)]));

    controller.handle(Request::Close);
    assert!(!controller.is_active());
    assert!(controller.handle(Request::Snapshot).is_empty());

    controller.handle(Request::Open);
    assert!(controller.is_active());
  }

  #[test]
  fn main_instant_searches_and_focuses() {
    let mut controller = controller();
    controller.handle(Request::Open);

    let resp = controller.handle(Request::MainInstant(MainQuery {
      text: "hello".to_owned(),
      sensitive_case: false,
      ..Default::default()
    }));

    assert_eq!(resp, [Response::Focus]);
    assert_eq!(controller.executor().len(), 1);
    assert!(!controller.executor()[0].is_case_sensitive);
  }

  #[test]
  fn rejected_intent() {
    let mut controller = controller();
    controller.handle(Request::Open);

    let resp = controller.handle(Request::Remove {
      manager: "filesToInclude".to_owned(),
      elt_id: "filesToInclude-0".to_owned(),
    });

    assert!(matches!(resp.as_slice(), [Response::Rejected { .. }]));
    assert!(controller.executor().is_empty());
  }
}
