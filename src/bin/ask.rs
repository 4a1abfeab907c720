//! z360-ask: terminal chat client for a running docs server
//!
//! Each line is sent as a question. `/copy <page>` prints a page's
//! export text (cached per URL), `/quit` exits.

use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use z360_docs::corpus::DOCS_BASE_URL;
use z360_docs::export::export_path;
use z360_docs::export_cache::{CopyAction, ExportCache, HttpExportFetcher};
use z360_docs::runtime::{HttpTransport, SessionHandle, SessionRuntime};
use z360_docs::state_machine::SessionStatus;

const DEFAULT_URL: &str = "http://localhost:3000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "z360_docs=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let origin = std::env::var("Z360_DOCS_URL")
        .ok()
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_URL.to_string());

    let handle = SessionRuntime::spawn(HttpTransport::new(&origin)?);
    let copy = CopyAction::new(
        &origin,
        ExportCache::new(),
        Arc::new(HttpExportFetcher::new()?),
    );

    println!("Ask about the docs at {origin}. /copy /docs/<page> prints a page export, /quit exits.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();

        if line.is_empty() {
            continue;
        }
        if line == "/quit" {
            break;
        }
        if let Some(target) = line.strip_prefix("/copy") {
            let target = target.trim();
            // Accept a docs page URL as well as an export path
            let path = if target.starts_with(DOCS_BASE_URL) {
                export_path(target)
            } else {
                target.to_string()
            };
            match copy.copy(&path).await {
                Ok(text) => println!("{text}"),
                Err(e) => eprintln!("[copy failed] {e}"),
            }
            continue;
        }

        let request_id = handle.snapshot().request_id + 1;
        let answer_index = handle.snapshot().conversation.len() + 1;
        handle.submit(line).await;
        render_response(&handle, request_id, answer_index).await?;
    }

    handle.shutdown().await;
    Ok(())
}

/// Print the answer as it streams until the request settles
async fn render_response(
    handle: &SessionHandle,
    request_id: u64,
    answer_index: usize,
) -> std::io::Result<()> {
    let mut rx = handle.subscribe();
    let mut printed = 0;
    let mut stdout = std::io::stdout();

    loop {
        let state = rx.borrow_and_update().clone();

        if state.request_id >= request_id {
            if let Some(turn) = state.conversation.get(answer_index) {
                let text = turn.text();
                if let Some(delta) = text.get(printed..) {
                    stdout.write_all(delta.as_bytes())?;
                    stdout.flush()?;
                }
                printed = text.len();
            }

            match state.status {
                SessionStatus::Submitted | SessionStatus::Streaming => {}
                SessionStatus::Idle => {
                    writeln!(stdout)?;
                    return Ok(());
                }
                SessionStatus::Error { message } => {
                    writeln!(stdout)?;
                    eprintln!("[error] {message}");
                    return Ok(());
                }
            }
        }

        if rx.changed().await.is_err() {
            return Ok(());
        }
    }
}
