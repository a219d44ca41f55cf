//! An interactive round: the receive task and the menu loop.

use anyhow::{Context, Result};
use std::{
    io::{self, Write},
    sync::Arc,
};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::watch,
};
use udp_blackjack::{Client, net::errors::ProtocolError};

use super::{
    commands::{MENU, MenuChoice, PROMPT},
    hand::{HandView, RULES},
};

/// Print every server message until a result arrives. Returns the final
/// view of the hand.
async fn receive(client: Arc<Client>, done: watch::Sender<bool>) -> HandView {
    let mut view = HandView::new();
    loop {
        match client.recv().await {
            Ok(message) => {
                println!("{}", view.apply(&message));
                if message.is_result() {
                    let _ = done.send(true);
                    return view;
                }
            }
            Err(e) if e.downcast_ref::<ProtocolError>().is_some() => {
                eprintln!("Mensagem ignorada: {e}");
            }
            Err(e) => {
                eprintln!("Erro ao receber mensagem: {e}");
                let _ = done.send(true);
                return view;
            }
        }
    }
}

/// Join as `name` and play until a result arrives or the user quits.
pub async fn play(client: Client, name: &str) -> Result<()> {
    let client = Arc::new(client);
    client
        .join(name)
        .await
        .with_context(|| format!("Failed to reach {}", client.server))?;

    let (done_tx, mut done_rx) = watch::channel(false);
    let receiver = tokio::spawn(receive(Arc::clone(&client), done_tx));

    println!("\n=== BLACKJACK UDP CLIENT ===");
    println!("{MENU}");
    println!("{RULES}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{PROMPT}");
        io::stdout().flush()?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = done_rx.changed() => break,
        };
        let Some(line) = line else {
            break;
        };

        match line.parse::<MenuChoice>() {
            Ok(choice) => match choice.command() {
                Some(command) => {
                    if let Err(e) = client.send(&command).await {
                        eprintln!("Erro ao enviar mensagem: {e}");
                    }
                }
                None => {
                    println!("Saindo...");
                    break;
                }
            },
            Err(e) => println!("{e}"),
        }
    }

    receiver.abort();
    Ok(())
}
