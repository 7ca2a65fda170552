//! Command interpreter and terminal subsystem.
//!
//! The terminal is a registry-based dispatch system. Commands implement the
//! `Command` trait and are registered by name (and aliases). A `Session`
//! owns the virtual file system, the registry, the command history, and the
//! addon host; `Session::dispatch` turns one raw input line into command
//! execution or addon forwarding, writing all output to an `OutputSink`.

mod addon;
mod commands;
mod interpreter;
mod sink;

/// A pluggable mini-program that can take exclusive control of input.
pub use addon::Addon;
/// Mutable state handed to addon hooks (filesystem + sink).
pub use addon::AddonContext;
/// Registry and exclusive-session state machine for addons.
pub use addon::AddonHost;
/// Register all built-in commands into a registry.
pub use commands::register_builtins;
/// A single executable command trait.
pub use interpreter::Command;
/// Registry of available commands with alias support.
pub use interpreter::CommandRegistry;
/// Shared mutable environment passed to every command.
pub use interpreter::Environment;
/// One terminal session: filesystem, registry, history, addons.
pub use interpreter::Session;
/// Quote-aware input line tokenizer.
pub use interpreter::tokenize;
/// In-memory sink recording an event stream (for tests and embedders).
pub use sink::BufferSink;
/// Rendering collaborator contract: lines, rich embeds, clear.
pub use sink::OutputSink;
/// One recorded sink write.
pub use sink::SinkEvent;
