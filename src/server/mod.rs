//! Accept loop and connection dispatch.

pub mod listener;

pub use listener::{AcceptBackoff, Admission, run, serve};
