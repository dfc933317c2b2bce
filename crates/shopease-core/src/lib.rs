//! shopease-core: Core library for the ShopEase support chat backend.
//!
//! - [`config`] — Typed configuration loading from JSON and the environment
//! - [`store`] — Read-only JSON data store (orders, products, FAQs)
//! - [`agent`] — Intent routing, order lookup, recommendations, FAQ matching
//! - [`provider`] — LLM provider trait, OpenAI/Groq/Ollama clients, fallback responder
//! - [`gateway`] — axum HTTP server
//!
//! # Quick Start
//!
//! ```no_run
//! use shopease_core::agent::SupportAgent;
//! use shopease_core::config::Config;
//! use shopease_core::provider::Responder;
//! use shopease_core::store::DataStore;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config::load()?;
//! let responder = Responder::from_config(&config);
//! let agent = SupportAgent::new(
//!     DataStore::new(config.data_path()),
//!     responder,
//!     config.support.clone(),
//! );
//!
//! let reply = agent.respond("Where is my order ORD12345?").await?;
//! println!("[{}] {}", reply.intent, reply.reply);
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod config;
pub mod gateway;
pub mod provider;
pub mod store;
