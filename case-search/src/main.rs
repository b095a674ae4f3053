mod cli;

use case_search::{
  client::Client,
  error::OhNo,
  logging,
  protocol::request::Request,
  search,
  server::{resources::ServerResources, Server},
  session::Controller,
  store::FileStore,
};
use case_search_config::Config;
use clap::Parser;
use cli::Cli;

fn main() {
  if let Err(err) = start() {
    log::error!("{err}");
    eprintln!("{err}");
    std::process::exit(1);
  }
}

fn start() -> Result<(), OhNo> {
  let cli = Cli::parse();
  logging::init(cli.verbose)?;

  if let Some(request) = cli.request {
    let req = Request::from_json(request)?;
    let socket_path = ServerResources::socket_path_in(ServerResources::runtime_dir()?);

    for resp in Client::connect(socket_path)?.send(&req)? {
      println!("{}", resp.to_json()?);
    }

    return Ok(());
  }

  if cli.server {
    let config = Config::load_default_user()?;
    log::trace!("running with configuration:\n{config:#?}");

    let state_path = cli
      .state
      .or_else(|| config.state.resolve_path())
      .ok_or(OhNo::NoDataDir)?;
    let store = FileStore::open(state_path)?;
    log::info!("state persisted in {}", store.path().display());
    let executor = search::from_config(&config.search);
    let controller = Controller::new(config, store, executor);

    let resources = ServerResources::new()?;
    let server = Server::new(resources, controller)?;
    server.prepare(cli.daemonize)?;
    return server.start();
  }

  Err(OhNo::NothingToDo)
}
