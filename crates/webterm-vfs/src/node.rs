//! Tree node model: files, directories, and the polymorphic [`Node`].

use webterm_types::error::{Result, WebtermError};

/// How a file's content should be rendered by `cat` and friends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Plain text, printed line by line.
    Text,
    /// Content is an image reference, rendered as a rich embed.
    Image,
    /// Content is an audio reference, rendered as a rich embed.
    Audio,
    /// Content names an addon that can be launched with `run`.
    Program,
    /// Anything else; viewers report it as unsupported.
    Other,
}

/// A leaf node holding a content payload.
#[derive(Debug, Clone)]
pub struct File {
    name: String,
    content: String,
    kind: FileKind,
}

impl File {
    /// Create a file node. The name must be non-empty.
    pub fn new(name: &str, content: &str, kind: FileKind) -> Self {
        debug_assert!(!name.is_empty());
        Self {
            name: name.to_string(),
            content: content.to_string(),
            kind,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn kind(&self) -> FileKind {
        self.kind
    }
}

/// An interior node owning an ordered set of uniquely-named children.
#[derive(Debug, Clone)]
pub struct Directory {
    name: String,
    children: Vec<Node>,
}

impl Directory {
    /// Create an empty directory node.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Children in insertion order.
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Look up a direct child by name.
    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.name() == name)
    }

    /// Insert a child, rejecting sibling name collisions. The tree is left
    /// untouched on failure.
    pub fn insert(&mut self, node: Node) -> Result<()> {
        if self.child(node.name()).is_some() {
            return Err(WebtermError::NameCollision(node.name().to_string()));
        }
        self.children.push(node);
        Ok(())
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<Node> {
        &mut self.children
    }

    /// Remove and return the direct child with the given name.
    pub(crate) fn remove_child(&mut self, name: &str) -> Option<Node> {
        let idx = self.children.iter().position(|c| c.name() == name)?;
        Some(self.children.remove(idx))
    }
}

/// A single entry in the simulated filesystem tree.
#[derive(Debug, Clone)]
pub enum Node {
    File(File),
    Directory(Directory),
}

impl Node {
    pub fn name(&self) -> &str {
        match self {
            Node::File(f) => f.name(),
            Node::Directory(d) => d.name(),
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, Node::Directory(_))
    }

    pub fn as_dir(&self) -> Option<&Directory> {
        match self {
            Node::Directory(d) => Some(d),
            Node::File(_) => None,
        }
    }

    pub(crate) fn as_dir_mut(&mut self) -> Option<&mut Directory> {
        match self {
            Node::Directory(d) => Some(d),
            Node::File(_) => None,
        }
    }

    pub fn as_file(&self) -> Option<&File> {
        match self {
            Node::File(f) => Some(f),
            Node::Directory(_) => None,
        }
    }

    /// Display name for directory listings: `name` for files, `name/` for
    /// directories.
    pub fn display_name(&self) -> String {
        match self {
            Node::File(f) => f.name().to_string(),
            Node::Directory(d) => format!("{}/", d.name()),
        }
    }
}
