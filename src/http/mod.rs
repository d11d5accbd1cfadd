//! HTTP protocol implementation.
//!
//! Just enough HTTP/1.1 to serve files: one request line in, one response
//! out, then the connection is closed.
//!
//! # Architecture
//!
//! - **`connection`**: The per-connection state machine and request dispatch
//! - **`parser`**: Parses the request line out of the read buffer
//! - **`request`**: HTTP method and request representation
//! - **`response`**: Status codes and the fixed-shape response
//! - **`writer`**: Frames and writes a response to the client
//! - **`mime`**: MIME type detection based on file extensions
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Buffer until a full request line arrives
//!        └──────┬──────┘
//!               │ Request line parsed       (malformed → 400 ─┐)
//!               ▼                                             │
//!        ┌──────────────────┐                                 │
//!        │   Processing     │ ← GET → file / 404, else 405    │
//!        └──────┬───────────┘                                 │
//!               │ Response ready                              │
//!               ▼                                             │
//!        ┌──────────────────┐                                 │
//!        │    Writing       │ ← Head, then body ◄─────────────┘
//!        └──────┬───────────┘
//!               │ Always
//!               ▼
//!        ┌──────────────────┐
//!        │    Closed        │ ← Shut down and drop the stream
//!        └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use lantern::http::connection::{Connection, ConnectionLimits};
//! use lantern::static_files::FileResolver;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let listener = TcpListener::bind("127.0.0.1:8080").await?;
//!     let resolver = Arc::new(FileResolver::new("./www", "index.html"));
//!
//!     loop {
//!         let (socket, _addr) = listener.accept().await?;
//!         let resolver = Arc::clone(&resolver);
//!         tokio::spawn(async move {
//!             let mut conn = Connection::new(socket, resolver, ConnectionLimits::default());
//!             if let Err(e) = conn.run().await {
//!                 eprintln!("Connection error: {}", e);
//!             }
//!         });
//!     }
//! }
//! ```

pub mod connection;
pub mod mime;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
