//! HTTP protocol implementation.
//!
//! This module implements a deliberately small HTTP/1.1 server: one GET
//! request per connection, answered and closed.
//!
//! # Architecture
//!
//! The HTTP layer is organized into several submodules:
//!
//! - **`request`**: the parsed request-line representation
//! - **`response`**: HTTP response representation with builder pattern
//! - **`parser`**: extracts the request line from a raw receive buffer
//! - **`router`**: maps request paths to routing outcomes
//! - **`connection`**: the per-connection request-response state machine
//! - **`writer`**: serializes and writes HTTP responses to the client
//! - **`mime`**: MIME type detection based on file extensions
//!
//! # Connection State Machine
//!
//! Each client connection goes through a state machine:
//!
//! ```text
//!        ┌─────────────┐
//!        │  Receiving  │ ← One capped read, then request-line parsing
//!        └──────┬──────┘
//!               │ Parsed a GET ── otherwise ──▶ Closed (nothing sent)
//!               ▼
//!        ┌──────────────────┐
//!        │     Routing      │ ← Decide redirect / file / fallback,
//!        └──────┬───────────┘   read content, build the response
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │     Writing      │ ← Send response to client
//!        └──────┬───────────┘
//!               │ Response sent
//!               ▼
//!             Closed (always; the server never keeps a connection alive)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use staticd::config::StaticFilesConfig;
//! use staticd::http::connection::Connection;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let listener = TcpListener::bind("127.0.0.1:8080").await?;
//!
//!     loop {
//!         let (socket, _addr) = listener.accept().await?;
//!         tokio::spawn(async move {
//!             let mut conn = Connection::new(socket, StaticFilesConfig::default());
//!             if let Err(e) = conn.run().await {
//!                 eprintln!("Connection error: {}", e);
//!             }
//!         });
//!     }
//! }
//! ```

pub mod request;
pub mod response;
pub mod parser;
pub mod router;
pub mod connection;
pub mod writer;
pub mod mime;
