//! Lantern - Concurrent Static File Server
//!
//! Core library: request-line parsing, file resolution under a web root,
//! response framing, and the accept loop.

pub mod config;
pub mod http;
pub mod server;
pub mod static_files;
