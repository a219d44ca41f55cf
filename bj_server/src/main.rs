//! UDP blackjack round server.
//!
//! Binds a single UDP socket and runs one table until interrupted.

mod config;

use std::net::SocketAddr;

use anyhow::Error;
use ctrlc::set_handler;
use log::info;
use pico_args::Arguments;
use udp_blackjack::server::RoundServer;

use config::ServerConfig;

const HELP: &str = "\
Run a UDP blackjack server

USAGE:
  bj_server [OPTIONS]

OPTIONS:
  --bind       IP:PORT     Server socket bind address  [default: env BLACKJACK_BIND or 0.0.0.0:5000]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  BLACKJACK_BIND           Server bind address (e.g., 0.0.0.0:5000)
  BLACKJACK_MIN_PLAYERS    Players needed to start a round  [default: 2]
  BLACKJACK_MAX_PLAYERS    Most players in a round          [default: 4]
  RUST_LOG                 Log filter                       [default: info]
";

struct Args {
    bind: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        bind: pargs.opt_value_from_str("--bind")?,
    };

    // Catching signals for exit.
    set_handler(|| std::process::exit(0))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_target(false)
        .init();

    let config = ServerConfig::from_env(args.bind)?;
    config.validate()?;

    info!(
        "Starting blackjack server at {} ({}-{} players per round)",
        config.bind, config.round.min_players, config.round.max_players
    );

    let server = RoundServer::bind(config.bind, config.round).await?;
    server.run().await;

    Ok(())
}
