//! ShopEase CLI — run the support gateway and poke at it locally.
//!
//! Usage:
//!   shopease serve          — Start the HTTP gateway (default)
//!   shopease ask "<text>"   — Answer one message and print the reply
//!   shopease status         — Show configuration and data health
//!   shopease onboard        — Create a default configuration

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use shopease_core::agent::SupportAgent;
use shopease_core::config::Config;
use shopease_core::gateway::run_gateway;
use shopease_core::provider::Responder;
use shopease_core::store::{DataKind, DataStore, FaqEntry, Order, Product};

#[derive(Parser)]
#[command(
    name = "shopease",
    version,
    about = "Support chat backend for the ShopEase storefront"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP gateway
    Serve {
        /// Bind address (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port (overrides config and PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Directory holding orders.json, products.json and faq.json
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
    },

    /// Answer a single message and print the reply
    Ask {
        /// The shopper's message
        message: String,

        /// Directory holding the data files (overrides config)
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
    },

    /// Show configuration status and data health
    Status,

    /// Create or reset the default configuration
    Onboard,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve {
            host,
            port,
            data_dir,
        }) => cmd_serve(host, port, data_dir).await?,
        Some(Commands::Ask { message, data_dir }) => cmd_ask(&message, data_dir).await?,
        Some(Commands::Status) => cmd_status().await?,
        Some(Commands::Onboard) => cmd_onboard()?,
        None => cmd_serve(None, None, None).await?,
    }

    Ok(())
}

// ── Shared Setup ────────────────────────────────────────────────────

fn validate_config(config: &Config) -> Result<()> {
    if let Err(errors) = config.validate() {
        eprintln!("\n  \x1b[31m❌ Configuration errors:\x1b[0m");
        for e in &errors {
            eprintln!("     • {}", e);
        }
        eprintln!();
        anyhow::bail!("Fix the above {} error(s) in the config file", errors.len());
    }
    Ok(())
}

/// Build the support agent from config, resolving the LLM provider once.
fn setup_agent(config: &Config, data_dir: Option<PathBuf>) -> SupportAgent {
    let responder = Responder::from_config(config);
    let store = DataStore::new(data_dir.unwrap_or_else(|| config.data_path()));
    tracing::debug!(data_dir = %store.dir().display(), "Support agent configured");
    SupportAgent::new(store, responder, config.support.clone())
}

// ── Serve Command ───────────────────────────────────────────────────

async fn cmd_serve(
    host: Option<String>,
    port: Option<u16>,
    data_dir: Option<PathBuf>,
) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(host) = host {
        config.gateway.host = host;
    }
    if let Some(port) = port {
        config.gateway.port = port;
    }
    validate_config(&config)?;

    let agent = Arc::new(setup_agent(&config, data_dir));

    println!();
    println!("  🛒 shopease v{}", env!("CARGO_PKG_VERSION"));
    println!(
        "  Listening on http://{}:{} | Provider: {} ({})",
        config.gateway.host,
        config.gateway.port,
        agent.responder().provider_name(),
        agent.responder().model().unwrap_or("canned replies")
    );
    println!("  Press Ctrl+C to stop.\n");

    let cancel = CancellationToken::new();
    let mut server = {
        let gateway = config.gateway.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move { run_gateway(&gateway, agent, cancel).await })
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            println!("\n  ⏳ Shutting down gracefully...");
            cancel.cancel();
            server.await??;
        }
        // Bind failures and server errors end up here.
        res = &mut server => res??,
    }

    println!("  ✅ Shutdown complete.");
    Ok(())
}

// ── Ask Command ─────────────────────────────────────────────────────

async fn cmd_ask(message: &str, data_dir: Option<PathBuf>) -> Result<()> {
    let config = Config::load()?;
    validate_config(&config)?;

    let agent = setup_agent(&config, data_dir);
    let reply = agent.respond(message).await?;

    println!();
    println!("  [{}]", reply.intent);
    for line in reply.reply.lines() {
        println!("  {}", line);
    }
    println!();
    Ok(())
}

// ── Onboard Command ─────────────────────────────────────────────────

fn cmd_onboard() -> Result<()> {
    let path = Config::write_default_template()?;
    println!();
    println!("  ✅ Configuration created at:");
    println!("     {}", path.display());
    println!();
    println!("  Next steps:");
    println!("  1. Add an OpenAI or Groq key, or point providers.ollama at a local server");
    println!("  2. Set data.dir to the folder holding orders.json, products.json, faq.json");
    println!("  3. Run `shopease serve`");
    println!();
    Ok(())
}

// ── Status Command ──────────────────────────────────────────────────

async fn cmd_status() -> Result<()> {
    let config_path = Config::default_path();
    let config = Config::load()?;

    println!();
    println!("  🛒 shopease status");
    println!("  ─────────────────────────────────────");

    if PathBuf::from("shopease.json").exists() {
        println!("  Config:    ./shopease.json");
    } else if config_path.exists() {
        println!("  Config:    {}", config_path.display());
    } else {
        println!("  Config:    ⚠️  Not found, using defaults (run `shopease onboard`)");
    }

    let choice = config.providers.select();
    match choice.name() {
        "offline" => println!("  Provider:  ⚠️  offline (canned fallback replies)"),
        name => println!("  Provider:  ✅ {}", name),
    }

    println!(
        "  Gateway:   {}:{}",
        config.gateway.host, config.gateway.port
    );

    let store = DataStore::new(config.data_path());
    println!("  Data dir:  {}", store.dir().display());
    report_kind(&store.try_load::<Order>(DataKind::Orders).await, DataKind::Orders);
    report_kind(&store.try_load::<Product>(DataKind::Products).await, DataKind::Products);
    report_kind(&store.try_load::<FaqEntry>(DataKind::Faqs).await, DataKind::Faqs);

    if let Err(errors) = config.validate() {
        println!();
        for e in errors {
            println!("  ❌ {}", e);
        }
    }
    println!();
    Ok(())
}

fn report_kind<T>(result: &Result<Vec<T>, shopease_core::store::LoadError>, kind: DataKind) {
    match result {
        Ok(records) => println!("    {:<9} ✅ {} records", kind.as_str(), records.len()),
        Err(e) => println!("    {:<9} ❌ {}", kind.as_str(), e),
    }
}
