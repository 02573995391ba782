//! # dbxserver - Serveur web haut niveau basé sur Axum
//!
//! Cette crate fournit une abstraction simple pour exposer la passerelle
//! DramaBox en HTTP.
//!
//! ## Architecture
//!
//! - [`server`] : serveur principal et builder
//! - [`logs`] : initialisation de `tracing` depuis la configuration
//!
//! ## Exemple d'utilisation
//!
//! ```rust,no_run
//! use dbxserver::{ServerBuilder, logs::{init_logging, LoggingOptions}};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     init_logging(LoggingOptions::default())?;
//!
//!     let mut server = ServerBuilder::new("MyServer", "localhost", 8080).build();
//!     server.add_route("/api/status", || async {
//!         serde_json::json!({"status": "ok"})
//!     }).await;
//!
//!     server.start().await?;
//!     server.wait().await;
//!     Ok(())
//! }
//! ```

pub mod logs;
pub mod server;

pub use logs::{LoggingOptions, init_logging};
pub use server::{Server, ServerBuilder, ServerInfo};
