//! A terminal client for the UDP blackjack server.
//!
//! Asks for a name, joins the next round and plays it from a numbered menu.

use anyhow::{Context, Result};
use ctrlc::set_handler;
use pico_args::Arguments;
use std::io::{self, Write};

use bj_client::session;
use udp_blackjack::{Client, DEFAULT_PORT};

const HELP: &str = "\
Play blackjack on a UDP blackjack server

USAGE:
  bj_client [OPTIONS]

OPTIONS:
  --server HOST:PORT    Server address  [default: localhost:5000]
  --name NAME           Display name    [default: prompt, then OS user name]

FLAGS:
  -h, --help            Print help information
";

struct Args {
    server: String,
    name: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut pargs = Arguments::from_env();

    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        server: pargs
            .opt_value_from_str("--server")?
            .unwrap_or_else(|| format!("localhost:{DEFAULT_PORT}")),
        name: pargs.opt_value_from_str("--name")?,
    };

    set_handler(|| {
        println!("\nSaindo...");
        std::process::exit(0);
    })?;

    let name = match args.name {
        Some(name) => name,
        None => {
            print!("Digite seu nome: ");
            io::stdout().flush()?;
            let mut input = String::new();
            io::stdin().read_line(&mut input)?;
            input
        }
    };
    let name = match name.trim() {
        "" => whoami::username(),
        name => name.to_string(),
    };

    let client = Client::connect(args.server.as_str())
        .await
        .with_context(|| format!("Failed to resolve {}", args.server))?;

    session::play(client, &name).await
}
