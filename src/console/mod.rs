pub mod command_handler;
pub mod listener;

use crate::widget::Widget;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tokio::sync::Notify;

/// Line-oriented front end over the configured widgets.
pub struct Console {
    pub widgets: Vec<Widget>,
    pub active: AtomicUsize,
    pub refresh_notify: Arc<Notify>,
    pub snapshot_dir: String,
    pub start_time: Instant,
}

impl Console {
    pub fn new(widgets: Vec<Widget>, refresh_notify: Arc<Notify>, snapshot_dir: String) -> Self {
        Self {
            widgets,
            active: AtomicUsize::new(0),
            refresh_notify,
            snapshot_dir,
            start_time: Instant::now(),
        }
    }

    pub fn active_index(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    pub fn active_widget(&self) -> Option<&Widget> {
        self.widgets.get(self.active_index())
    }

    pub fn spawn_listener(console: Arc<Console>) {
        tokio::spawn(async move {
            tracing::info!("▶️ Starting console listener...");
            listener::listen_for_commands(console).await;
            tracing::info!("🛑 Console listener ended.");
        });
    }
}
