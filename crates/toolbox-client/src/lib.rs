//! HTTP client library for the API Server Toolbox.
//!
//! This crate provides a typed HTTP client for every endpoint of the toolbox
//! backend. Endpoints that answer `204 No Content` for missing records map to
//! `Ok(None)`.
//!
//! # Example
//!
//! ```no_run
//! use toolbox_client::{ClientConfig, NoteRequest, ToolboxClient};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), toolbox_client::Error> {
//!     let client = ToolboxClient::new(ClientConfig {
//!         base_url: "http://localhost:9393".into(),
//!         timeout: Duration::from_secs(30),
//!     })?;
//!
//!     let note = client.create_note(&NoteRequest::new("prova", "corpo")).await?;
//!     println!("Created note {}", note.id);
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod types;

pub use client::{ClientConfig, ToolboxClient};
pub use error::Error;
pub use types::*;
