use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[clap(version, about = "Authority daemon for case-variant searches.")]
pub struct Cli {
  /// Start the server, if not already started.
  #[clap(short, long)]
  pub server: bool,

  /// Try to daemonize, if not already done.
  #[clap(short, long)]
  pub daemonize: bool,

  /// JSON-serialized request; responses are printed one per line.
  #[clap(short, long)]
  pub request: Option<String>,

  /// Path of the persisted state, overriding the configuration.
  #[clap(long)]
  pub state: Option<PathBuf>,

  /// Verbosity.
  ///
  /// Can be accumulated to get more verbosity. Without this flag, logging is disabled. Then, for each application of
  /// the flag, the obtained verbosity follows this order: error, warn, info, debug, trace. Thus, if you use -v, you
  /// will only get error messages. If you use -vv, you will also see warnings. The maximum verbosity is achieved with
  /// -vvvvv for trace logs.
  #[arg(short, long, action = clap::ArgAction::Count)]
  pub verbose: u8,
}
