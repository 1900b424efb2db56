use std::env;
use std::error::Error;
use std::time::Duration;

use frame_core::{Action, ServerEvent};
use frame_protocol::decode_server;
use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::timeout;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Where to connect: env override or default.
    let addr = env::var("FRAME_CLIENT_ADDR").unwrap_or_else(|_| "ws://127.0.0.1:8765".to_string());

    println!("Connecting to {}...", addr);
    let (ws, _) = connect_async(addr.as_str()).await?;
    let (mut ws_tx, mut ws_rx) = ws.split();
    println!("Connected.");
    println!("Type one action per line: W, A, S, D or none.");
    println!("Type 'quit' or 'exit' to leave.\n");

    let printer = tokio::spawn(async move {
        while let Some(Ok(msg)) = ws_rx.next().await {
            let Message::Text(text) = msg else { continue };
            match decode_server(&text) {
                Ok(ServerEvent::Status { message }) => println!("<< status: {}", message),
                Ok(ServerEvent::FrameUpdate(update)) => {
                    println!("<< frame {} -> {}", update.frame, update.artifact_ref)
                }
                Ok(ServerEvent::Error { message }) => println!("<< error: {}", message),
                Err(e) => println!("<< undecodable: {} ({})", text, e),
            }
        }
        println!("Server closed the connection.");
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.eq_ignore_ascii_case("quit") || trimmed.eq_ignore_ascii_case("exit") {
            break;
        }

        let action = match trimmed.parse::<Action>() {
            Ok(action) => action,
            Err(e) => {
                println!("!! {}", e);
                continue;
            }
        };

        let payload = format!(r#"{{"type":"action","action":"{}"}}"#, action);
        ws_tx.send(Message::Text(payload)).await?;
    }

    println!("Exiting client.");
    let _ = ws_tx.close().await;
    let _ = timeout(Duration::from_secs(1), printer).await;
    Ok(())
}
