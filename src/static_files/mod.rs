//! Static file serving
//!
//! Maps request paths onto files below the web root and loads them.

pub mod resolver;

pub use resolver::{FileResolver, ResolveError, ResolvedFile};
