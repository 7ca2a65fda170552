//! In-memory virtual file system for webterm.
//!
//! The entire tree lives in memory: a single root directory owns its
//! children, children own theirs, and so on. Nothing is persisted; a
//! [`Filesystem`] is created per terminal session and discarded with it.
//!
//! Paths are `/`-separated. A leading `/` resolves from the root, anything
//! else from the current working directory. `.` is a no-op segment and `..`
//! steps to the parent (the root is its own parent). Sibling names are
//! unique and listing order is insertion order.

mod fs;
mod node;

pub use fs::Filesystem;
pub use node::{Directory, File, FileKind, Node};
