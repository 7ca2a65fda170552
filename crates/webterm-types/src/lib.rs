//! Foundation types for webterm.
//!
//! This crate contains the error enum and `Result` alias shared by all
//! webterm crates. Every recoverable failure in the engine is a
//! [`error::WebtermError`]; the dispatcher turns them into report lines on
//! the output sink, so none of them ever terminates a session.

pub mod error;
