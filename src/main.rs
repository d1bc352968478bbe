mod catalog;
mod config;
mod console;
mod enquiry;
mod feed;
mod model;
mod normalizer;
mod parser;
mod utils;
mod widget;

use config::{load_config, AppConfig, WidgetConfig};
use console::Console;
use enquiry::EnquiryClient;
use feed::SheetLoader;
use feed::fetcher::build_client;
use futures::future::join_all;
use reqwest::Client;
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::{error, info, warn};
use widget::Widget;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Set panic hook to log details about any panic
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("😱 Panic occurred: {:?}", panic_info);
    }));

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.json".to_string());

    // Load configuration from file
    let config: AppConfig = match load_config(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config load error: {}", e);
            return;
        }
    };

    // One HTTP client shared by every feed loader and enquiry sender
    let client = match build_client() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to create HTTP client: {}", e);
            return;
        }
    };

    let widgets: Vec<Widget> = config
        .widgets
        .iter()
        .map(|widget_cfg| build_widget(widget_cfg, &client))
        .collect();

    if widgets.is_empty() {
        warn!("No widgets configured in {}", config_path);
    }

    // Initial load of every feed, concurrently
    info!("Loading {} product feed(s)...", widgets.len());
    load_all(&widgets, false).await;

    let refresh_notify = Arc::new(Notify::new());
    let console = Arc::new(Console::new(
        widgets.clone(),
        refresh_notify.clone(),
        config.snapshot_dir.clone(),
    ));

    // Spawn stdin listener for commands (e.g. /search, /submit, /refresh)
    Console::spawn_listener(console.clone());

    loop {
        tokio::select! {
            _ = refresh_notify.notified() => {
                info!("Manual refresh triggered.");
                load_all(&widgets, true).await;
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down.");
                break;
            }
        }
    }
}

fn build_widget(widget_cfg: &WidgetConfig, client: &Client) -> Widget {
    let source = Arc::new(SheetLoader::new(
        client.clone(),
        &widget_cfg.sheet_url,
        &widget_cfg.ajax_endpoint,
        widget_cfg.use_proxy,
    ));
    let transport = Arc::new(EnquiryClient::new(client.clone(), &widget_cfg.ajax_endpoint));
    Widget::new(widget_cfg.clone(), source, transport)
}

/// Loads (or reloads) every widget's feed. Failures are logged per widget.
async fn load_all(widgets: &[Widget], refresh: bool) {
    let tasks: Vec<_> = widgets
        .iter()
        .map(|widget| async move {
            if refresh {
                widget.refresh().await
            } else {
                widget.load().await
            }
        })
        .collect();

    for (i, result) in join_all(tasks).await.into_iter().enumerate() {
        match result {
            Ok(count) => info!("Widget {}: {} products", i, count),
            Err(e) => warn!("Widget {}: could not load products: {}", i, e),
        }
    }
}
