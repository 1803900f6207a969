//! Evaluate an expression against a live target and print its structure.
//!
//! Demonstrates:
//! - Connecting with the client builder
//! - Subscribing to console events
//! - Global evaluation and bounded inspection
//!
//! Start a target first, e.g. `node --inspect=9229 app.js`, then copy the
//! `ws://` URL it prints.
//!
//! Usage:
//!   cargo run --example evaluate -- ws://127.0.0.1:9229/<id>
//!   cargo run --example evaluate -- ws://127.0.0.1:9229/<id> "process.versions" --depth 3
//!   cargo run --example evaluate -- ws://127.0.0.1:9229/<id> --debug

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use anyhow::{Context, bail};
use devtools_inspector::{Client, ParsedEvent, RuntimeCommand};
use tracing_subscriber::EnvFilter;

// ============================================================================
// Constants
// ============================================================================

const DEFAULT_EXPRESSION: &str = "globalThis";

// ============================================================================
// Args
// ============================================================================

/// Command-line arguments.
#[derive(Debug, Clone)]
struct Args {
    endpoint: String,
    expression: String,
    depth: usize,
    debug: bool,
}

impl Args {
    fn parse() -> anyhow::Result<Self> {
        let mut positional = Vec::new();
        let mut depth = 2;
        let mut debug = false;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--debug" => debug = true,
                "--depth" => {
                    depth = args
                        .next()
                        .context("--depth needs a value")?
                        .parse()
                        .context("--depth must be a number")?;
                }
                _ => positional.push(arg),
            }
        }

        let mut positional = positional.into_iter();
        let Some(endpoint) = positional.next() else {
            bail!("usage: evaluate <ws-endpoint> [expression] [--depth N] [--debug]");
        };

        Ok(Self {
            endpoint,
            expression: positional
                .next()
                .unwrap_or_else(|| DEFAULT_EXPRESSION.to_string()),
            depth,
            debug,
        })
    }
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("\n[ERROR] {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let args = Args::parse()?;
    init_logging(args.debug);

    println!("=== Evaluate ===\n");

    // ========================================================================
    // Connect
    // ========================================================================

    println!("[1] Connecting to {}...", args.endpoint);
    let client = Client::builder()
        .endpoint(&args.endpoint)
        .request_timeout(Duration::from_secs(10))
        .max_depth(args.depth)
        .connect()
        .await
        .context("failed to connect")?;
    println!("    ✓ Connected\n");

    client.on_error(|fault| eprintln!("    ! {fault}"));
    client.on("Runtime.consoleAPICalled", |event| {
        if let ParsedEvent::ConsoleApiCalled { call_type, .. } = event.parse() {
            println!("    [console.{call_type}]");
        }
    });

    client.send_command(RuntimeCommand::Enable).await?;
    // No-op unless the target was started with --inspect-brk.
    client
        .send_command(RuntimeCommand::RunIfWaitingForDebugger)
        .await?;

    // ========================================================================
    // Evaluate
    // ========================================================================

    println!("[2] Evaluating `{}`...", args.expression);
    let value = client.evaluate_global(&args.expression).await?;
    println!("    ✓ {} {}\n", value.kind(), value.description().unwrap_or(""));

    // ========================================================================
    // Inspect
    // ========================================================================

    println!("[3] Inspecting to depth {}...", client.max_depth());
    let tree = client.inspect(&value).await?;
    println!("{}", serde_json::to_string_pretty(&tree.to_json())?);

    client.disconnect().await;
    println!("\n=== Done ===");
    Ok(())
}

/// Initialize tracing/logging.
fn init_logging(debug: bool) {
    let filter = if debug {
        "devtools_inspector=debug"
    } else {
        "devtools_inspector=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();
}
