// console/command_handler.rs

use crate::console::Console;
use crate::model::{EnquiryForm, EnquiryOutcome};
use crate::widget::Widget;
use crate::widget::render::render_widget;
use crate::widget::state::{EnquiryView, ResultsView, StatusKind};
use std::fs;
use std::path::Path;
use std::sync::atomic::Ordering;
use tracing::{info, warn};

const HELP: &str = "📋 Available commands:\n\
    /search <text> — search the catalog\n\
    /details <index> — show a product by catalog index\n\
    /details-enquire — enquire about the product shown\n\
    /close-details — hide the product details\n\
    /enquire <name> — add a product and open the enquiry\n\
    /suggest <text> — look up products to add\n\
    /pick [name] — add a suggestion (first one by default)\n\
    /remove <name> — remove a selected product\n\
    /open, /close — show or hide the enquiry\n\
    /form name|email|message — fill the enquiry form\n\
    /submit — send the enquiry\n\
    /status — current enquiry\n\
    /snapshot — write the widget markup to disk\n\
    /widgets, /use <n> — list or switch widgets\n\
    /refresh — reload every product feed\n\
    /uptime — console uptime";

pub fn describe_results(results: &ResultsView) -> String {
    match results {
        ResultsView::Idle => "(no search)".to_string(),
        ResultsView::Loading { placeholders } => format!("⏳ loading ({placeholders})"),
        ResultsView::Empty => "No results found.".to_string(),
        ResultsView::Error(msg) => format!("❌ {msg}"),
        ResultsView::Cards(cards) => cards
            .iter()
            .map(|card| match &card.price {
                Some(price) => format!("[{}] {} — {}", card.index, card.title, price),
                None => format!("[{}] {}", card.index, card.title),
            })
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

pub fn describe_enquiry(enquiry: &EnquiryView) -> String {
    let mut msg = format!(
        "📨 Enquiry ({})\nProducts: {}\nName: {}\nEmail: {}\nMessage: {}",
        if enquiry.open { "open" } else { "closed" },
        if enquiry.chips.is_empty() {
            "No products selected".to_string()
        } else {
            enquiry.products_field.clone()
        },
        enquiry.form.name,
        enquiry.form.email,
        enquiry.form.message,
    );
    if !enquiry.suggestions.is_empty() {
        msg.push_str(&format!("\nSuggestions: {}", enquiry.suggestions.join(" | ")));
    }
    if let Some(status) = &enquiry.status {
        let icon = match status.kind {
            StatusKind::Success => "✅",
            StatusKind::Error => "❌",
        };
        msg.push_str(&format!("\n{icon} {}", status.text));
    }
    msg
}

/// Parses `name|email|message`; the message part is optional.
pub fn parse_form(args: &str) -> EnquiryForm {
    let mut parts = args.splitn(3, '|').map(str::trim);
    EnquiryForm {
        name: parts.next().unwrap_or("").to_string(),
        email: parts.next().unwrap_or("").to_string(),
        message: parts.next().unwrap_or("").to_string(),
    }
}

fn save_snapshot(dir: &str, index: usize, html: &str) -> Result<String, std::io::Error> {
    let folder = Path::new(dir);
    fs::create_dir_all(folder)?;
    let filename = folder.join(format!("widget-{index}.html"));
    fs::write(&filename, html)?;
    Ok(filename.display().to_string())
}

async fn widget_command(cmd: &str, args: &str, widget: &Widget, console: &Console) -> String {
    match cmd {
        "/search" => {
            let widget = widget.clone();
            let query = args.to_string();
            tokio::spawn(async move {
                if widget.search(&query).await {
                    println!("{}", describe_results(&widget.view().await.results));
                }
            });
            "🔎 Searching...".to_string()
        }
        "/suggest" => {
            let widget = widget.clone();
            let query = args.to_string();
            tokio::spawn(async move {
                if widget.suggest(&query).await {
                    let suggestions = widget.view().await.enquiry.suggestions;
                    if suggestions.is_empty() {
                        println!("(no suggestions)");
                    } else {
                        println!("💡 {}", suggestions.join(" | "));
                    }
                }
            });
            "🔎 Looking up...".to_string()
        }
        "/pick" => {
            let picked = if args.is_empty() {
                widget.pick_first_suggestion().await
            } else {
                widget.pick_suggestion(args).await;
                Some(args.to_string())
            };
            match picked {
                Some(_) => describe_enquiry(&widget.view().await.enquiry),
                None => "📭 No suggestion to pick.".to_string(),
            }
        }
        "/enquire" => {
            widget.enquire(args).await;
            describe_enquiry(&widget.view().await.enquiry)
        }
        "/details" => match args.parse::<usize>() {
            Ok(index) => match widget.open_details(index).await {
                Some(d) => format!("🛈 [{}] {}\n{}\n{}", d.index, d.title, d.description, d.image),
                None => format!("📭 No product at index {index}."),
            },
            Err(_) => "⚠️ Usage: /details <index>".to_string(),
        },
        "/details-enquire" => {
            widget.enquire_from_details().await;
            describe_enquiry(&widget.view().await.enquiry)
        }
        "/close-details" => {
            widget.close_details().await;
            "Closed.".to_string()
        }
        "/remove" => {
            if widget.remove_selected(args).await {
                describe_enquiry(&widget.view().await.enquiry)
            } else {
                format!("📭 '{args}' is not selected.")
            }
        }
        "/open" => {
            widget.open_modal().await;
            describe_enquiry(&widget.view().await.enquiry)
        }
        "/close" => {
            widget.close_modal().await;
            "Enquiry closed.".to_string()
        }
        "/form" => {
            widget.set_form(parse_form(args)).await;
            describe_enquiry(&widget.view().await.enquiry)
        }
        "/submit" => match widget.submit().await {
            Ok(EnquiryOutcome::Sent(msg)) => format!("✅ {msg}"),
            Ok(EnquiryOutcome::Rejected(msg)) => format!("❌ {msg}"),
            Ok(EnquiryOutcome::NetworkError) => "❌ Network error".to_string(),
            Err(e) => format!("⚠️ {e}"),
        },
        "/status" => {
            let view = widget.view().await;
            format!(
                "{}\n\n{}",
                describe_results(&view.results),
                describe_enquiry(&view.enquiry)
            )
        }
        "/snapshot" => {
            let view = widget.view().await;
            let html = render_widget(&view, &widget.config().nonce);
            match save_snapshot(&console.snapshot_dir, console.active_index(), &html) {
                Ok(path) => {
                    info!("Saved widget HTML: {}", path);
                    format!("💾 Saved {path}")
                }
                Err(e) => {
                    warn!("Failed to write widget HTML: {}", e);
                    format!("❌ Snapshot failed: {e}")
                }
            }
        }
        _ => "🤖 Unknown command. Type /help for a list of commands.".to_string(),
    }
}

/// Handles one console line and returns the reply.
pub async fn handle_command(command_text: &str, console: &Console) -> String {
    info!("Handling command: {}", command_text);
    let (cmd, args) = match command_text.split_once(char::is_whitespace) {
        Some((cmd, args)) => (cmd, args.trim()),
        None => (command_text, ""),
    };

    match cmd {
        "/help" => HELP.to_string(),
        "/uptime" => {
            let uptime = console.start_time.elapsed();
            format!(
                "⏱ Uptime: {:02}:{:02}:{:02}",
                uptime.as_secs() / 3600,
                (uptime.as_secs() % 3600) / 60,
                uptime.as_secs() % 60
            )
        }
        "/refresh" => {
            info!("/refresh command received, triggering refresh...");
            console.refresh_notify.notify_one();
            "🔄 Refresh requested.".to_string()
        }
        "/widgets" => {
            let mut msg = String::from("⚙️ Widgets:\n");
            for (i, widget) in console.widgets.iter().enumerate() {
                let marker = if i == console.active_index() { "▶" } else { " " };
                msg.push_str(&format!(
                    "{} {}: {} ({} products{})\n",
                    marker,
                    i,
                    widget.config().sheet_url,
                    widget.product_count().await,
                    if widget.config().use_proxy { ", proxy" } else { "" }
                ));
            }
            msg
        }
        "/use" => match args.parse::<usize>() {
            Ok(i) if i < console.widgets.len() => {
                console.active.store(i, Ordering::SeqCst);
                format!("Using widget {i}.")
            }
            _ => format!("⚠️ Usage: /use <0..{}>", console.widgets.len().saturating_sub(1)),
        },
        _ => match console.active_widget() {
            Some(widget) => widget_command(cmd, args, widget, console).await,
            None => "⚠️ No widgets configured.".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WidgetConfig;
    use crate::enquiry::{EnquiryPayload, EnquiryTransport};
    use crate::feed::CatalogSource;
    use crate::model::{LoadError, ProductRecord};
    use std::sync::Arc;
    use tokio::sync::Notify;

    struct StaticSource;

    #[async_trait::async_trait]
    impl CatalogSource for StaticSource {
        async fn load(&self) -> Result<Vec<ProductRecord>, LoadError> {
            Ok(vec![
                [("title", "Chair"), ("price", "30")].into_iter().collect(),
                [("title", "Desk Lamp"), ("description", "LED")].into_iter().collect(),
            ])
        }
    }

    struct Rejecting;

    #[async_trait::async_trait]
    impl EnquiryTransport for Rejecting {
        async fn submit(&self, _payload: &EnquiryPayload) -> EnquiryOutcome {
            EnquiryOutcome::Rejected("Please supply name, email and at least one product.".into())
        }
    }

    async fn console(widgets: usize, snapshot_dir: &str) -> Console {
        let mut list = Vec::new();
        for i in 0..widgets {
            let widget = Widget::new(
                WidgetConfig::new(format!("https://example.com/{i}.csv"), "http://backend/ajax"),
                Arc::new(StaticSource),
                Arc::new(Rejecting),
            );
            widget.load().await.expect("load");
            list.push(widget);
        }
        Console::new(list, Arc::new(Notify::new()), snapshot_dir.to_string())
    }

    #[test]
    fn form_arguments_split_on_pipes() {
        let form = parse_form("Ann | ann@example.com | Is it | in stock?");
        assert_eq!(form.name, "Ann");
        assert_eq!(form.email, "ann@example.com");
        assert_eq!(form.message, "Is it | in stock?");
        assert_eq!(parse_form("Bob").email, "");
    }

    #[test]
    fn cards_are_listed_with_indices() {
        use crate::widget::state::Card;
        let text = describe_results(&ResultsView::Cards(vec![
            Card {
                index: 2,
                title: "Desk Lamp".into(),
                summary: String::new(),
                price: Some("19".into()),
                image: None,
            },
            Card {
                index: 9,
                title: "Lampshade".into(),
                summary: String::new(),
                price: None,
                image: None,
            },
        ]));
        assert_eq!(text, "[2] Desk Lamp — 19\n[9] Lampshade");
        assert_eq!(describe_results(&ResultsView::Empty), "No results found.");
    }

    #[tokio::test]
    async fn enquire_then_status_lists_products() {
        let console = console(1, "unused").await;
        handle_command("/enquire Chair", &console).await;
        handle_command("/enquire Desk Lamp", &console).await;
        let reply = handle_command("/status", &console).await;
        assert!(reply.contains("Products: Chair, Desk Lamp"));
        assert!(reply.contains("(open)"));
    }

    #[tokio::test]
    async fn submit_reports_server_message() {
        let console = console(1, "unused").await;
        let reply = handle_command("/submit", &console).await;
        assert_eq!(reply, "⚠️ Please enter your name.");

        handle_command("/form Ann|ann@example.com|hi", &console).await;
        let reply = handle_command("/submit", &console).await;
        assert_eq!(reply, "❌ Please supply name, email and at least one product.");
    }

    #[tokio::test]
    async fn use_switches_between_widgets() {
        let console = console(2, "unused").await;
        assert_eq!(handle_command("/use 1", &console).await, "Using widget 1.");
        assert_eq!(console.active_index(), 1);
        assert!(handle_command("/use 5", &console).await.starts_with("⚠️"));
        let listing = handle_command("/widgets", &console).await;
        assert!(listing.contains("▶ 1: https://example.com/1.csv (2 products)"));
    }

    #[tokio::test]
    async fn refresh_wakes_the_main_loop() {
        let console = console(1, "unused").await;
        handle_command("/refresh", &console).await;
        tokio::time::timeout(
            std::time::Duration::from_secs(1),
            console.refresh_notify.notified(),
        )
        .await
        .expect("refresh notified");
    }

    #[tokio::test]
    async fn details_by_index() {
        let console = console(1, "unused").await;
        let reply = handle_command("/details 1", &console).await;
        assert!(reply.starts_with("🛈 [1] Desk Lamp"));
        assert_eq!(handle_command("/details 9", &console).await, "📭 No product at index 9.");
        assert!(handle_command("/details x", &console).await.starts_with("⚠️"));
    }

    #[tokio::test]
    async fn snapshot_writes_widget_markup() {
        let dir = tempfile::tempdir().expect("tempdir");
        let snapshot_dir = dir.path().join("html");
        let console = console(1, snapshot_dir.to_str().expect("utf-8 path")).await;
        handle_command("/enquire Chair", &console).await;

        let reply = handle_command("/snapshot", &console).await;
        assert!(reply.starts_with("💾 Saved"));
        let html = std::fs::read_to_string(snapshot_dir.join("widget-0.html")).expect("snapshot");
        assert!(html.contains(r#"name="products" value="Chair""#));
    }

    #[tokio::test]
    async fn unknown_commands_point_to_help() {
        let console = console(1, "unused").await;
        assert!(handle_command("/dance", &console).await.contains("/help"));
        assert!(handle_command("/help", &console).await.contains("/submit"));
    }
}
