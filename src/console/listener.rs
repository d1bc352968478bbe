// console/listener.rs

use crate::console::Console;
use crate::console::command_handler::handle_command;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

/// Reads commands from stdin until EOF and prints each reply.
pub async fn listen_for_commands(console: Arc<Console>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let reply = handle_command(line, &console).await;
                println!("{reply}");
            }
            Ok(None) => break,
            Err(e) => {
                warn!("stdin read error: {:?}", e);
                break;
            }
        }
    }
}
