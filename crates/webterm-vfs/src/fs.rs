//! The virtual file system: path resolution and tree CRUD.

use webterm_types::error::{Result, WebtermError};

use crate::node::{Directory, File, FileKind, Node};

/// A fully in-memory virtual file system with a current working directory.
///
/// The root directory is named `/` and has no parent; every other node is
/// exclusively owned by exactly one parent directory. The cwd is kept as a
/// normalized segment path rather than a node reference, so `..` is a
/// segment pop and the root is its own parent. No operation can delete a
/// directory, so the cwd always points at a live node.
#[derive(Debug, Clone)]
pub struct Filesystem {
    /// Invariant: always a `Node::Directory`.
    root: Node,
    /// Current working directory as segments from the root (empty = root).
    cwd: Vec<String>,
}

impl Filesystem {
    /// Create a filesystem containing only the root directory.
    pub fn new() -> Self {
        Self {
            root: Node::Directory(Directory::new("/")),
            cwd: Vec::new(),
        }
    }

    /// Create a filesystem pre-populated with the standard session layout:
    /// `/C`, `/C/Users`, `/C/Program Files`, `/D`, and `/readme.txt`.
    ///
    /// Embedders rely on this layout being reproduced exactly, including
    /// listing order.
    pub fn with_default_layout() -> Self {
        let mut fs = Self::new();
        for dir in ["/C", "/C/Users", "/C/Program Files", "/D"] {
            fs.create_directory(dir).expect("fixed layout never collides");
        }
        fs.create_file("/readme.txt", "Welcome to the terminal!", FileKind::Text)
            .expect("fixed layout never collides");
        fs
    }

    // -- Resolution --

    /// Resolve a path to a node.
    ///
    /// Fails with `PathNotFound` the moment a segment cannot be found as a
    /// child of the current node, or a file is reached with segments still
    /// remaining.
    pub fn resolve(&self, path: &str) -> Result<&Node> {
        let segs = self.resolve_segments(path)?;
        self.node_at(&segs)
            .ok_or_else(|| WebtermError::PathNotFound(path.to_string()))
    }

    /// Resolve a path into its normalized absolute segment form, checking
    /// every named segment against the tree.
    fn resolve_segments(&self, path: &str) -> Result<Vec<String>> {
        let mut segs: Vec<String> = if path.starts_with('/') {
            Vec::new()
        } else {
            self.cwd.clone()
        };
        for seg in path.split('/') {
            match seg {
                "" | "." => {},
                ".." => {
                    // Root's parent is root: popping an empty stack stays put.
                    segs.pop();
                },
                name => {
                    let exists = self
                        .dir_at(&segs)
                        .is_some_and(|dir| dir.child(name).is_some());
                    if !exists {
                        return Err(WebtermError::PathNotFound(path.to_string()));
                    }
                    segs.push(name.to_string());
                },
            }
        }
        Ok(segs)
    }

    fn node_at(&self, segs: &[String]) -> Option<&Node> {
        let mut cur = &self.root;
        for seg in segs {
            cur = cur.as_dir()?.child(seg)?;
        }
        Some(cur)
    }

    fn dir_at(&self, segs: &[String]) -> Option<&Directory> {
        self.node_at(segs)?.as_dir()
    }

    fn dir_at_mut(&mut self, segs: &[String]) -> Option<&mut Directory> {
        let mut cur = &mut self.root;
        for seg in segs {
            let dir = cur.as_dir_mut()?;
            let idx = dir
                .children()
                .iter()
                .position(|c| c.name() == seg.as_str())?;
            cur = &mut dir.children_mut()[idx];
        }
        cur.as_dir_mut()
    }

    // -- CRUD --

    /// Create a file at `path`. The parent must resolve to a directory and
    /// no sibling with the same name may exist.
    pub fn create_file(&mut self, path: &str, content: &str, kind: FileKind) -> Result<()> {
        let (parent, name) = self.locate_new_entry(path)?;
        let dir = self
            .dir_at_mut(&parent)
            .ok_or_else(|| WebtermError::PathNotFound(path.to_string()))?;
        dir.insert(Node::File(File::new(&name, content, kind)))
            .map_err(|_| WebtermError::NameCollision(render_path_child(&parent, &name)))
    }

    /// Create an empty directory at `path`. Same parent/collision rules as
    /// [`Filesystem::create_file`].
    pub fn create_directory(&mut self, path: &str) -> Result<()> {
        let (parent, name) = self.locate_new_entry(path)?;
        let dir = self
            .dir_at_mut(&parent)
            .ok_or_else(|| WebtermError::PathNotFound(path.to_string()))?;
        dir.insert(Node::Directory(Directory::new(&name)))
            .map_err(|_| WebtermError::NameCollision(render_path_child(&parent, &name)))
    }

    /// Delete the file at `path`. Directories are rejected; there is no
    /// directory deletion operation.
    pub fn delete_file(&mut self, path: &str) -> Result<()> {
        let mut segs = self.resolve_segments(path)?;
        let Some(name) = segs.pop() else {
            return Err(WebtermError::WrongNodeType("not a file: /".to_string()));
        };
        let target_is_dir = self
            .node_at(&joined(&segs, &name))
            .is_some_and(Node::is_dir);
        if target_is_dir {
            return Err(WebtermError::WrongNodeType(format!(
                "not a file: {}",
                render_path_child(&segs, &name)
            )));
        }
        let dir = self
            .dir_at_mut(&segs)
            .ok_or_else(|| WebtermError::PathNotFound(path.to_string()))?;
        dir.remove_child(&name)
            .map(|_| ())
            .ok_or_else(|| WebtermError::PathNotFound(path.to_string()))
    }

    // -- Queries --

    /// List the entries of the directory at `path` as display names
    /// (`name` for files, `name/` for directories), in insertion order.
    pub fn list(&self, path: &str) -> Result<Vec<String>> {
        let node = self.resolve(path)?;
        let dir = node.as_dir().ok_or_else(|| {
            WebtermError::WrongNodeType(format!("not a directory: {path}"))
        })?;
        Ok(dir.children().iter().map(Node::display_name).collect())
    }

    /// Resolve `path` and return it as a file, or a `WrongNodeType` error.
    pub fn read_file(&self, path: &str) -> Result<&File> {
        self.resolve(path)?
            .as_file()
            .ok_or_else(|| WebtermError::WrongNodeType(format!("not a file: {path}")))
    }

    /// Change the current working directory. The cwd is only mutated if
    /// `path` resolves to a directory.
    pub fn change_directory(&mut self, path: &str) -> Result<()> {
        let segs = self.resolve_segments(path)?;
        if self.dir_at(&segs).is_none() {
            return Err(WebtermError::WrongNodeType(format!(
                "not a directory: {path}"
            )));
        }
        self.cwd = segs;
        Ok(())
    }

    /// Absolute path of the current working directory. Root renders as `/`.
    pub fn cwd_path(&self) -> String {
        render_path(&self.cwd)
    }

    /// Resolve `path` and render it as a normalized absolute path.
    pub fn full_path(&self, path: &str) -> Result<String> {
        Ok(render_path(&self.resolve_segments(path)?))
    }

    /// Split a creation path into (existing parent segments, new leaf name).
    ///
    /// The leaf must not already resolve: `.`, `..`, and trailing-slash-only
    /// paths all name existing directories and are reported as collisions.
    fn locate_new_entry(&self, path: &str) -> Result<(Vec<String>, String)> {
        let trimmed = path.trim_end_matches('/');
        if trimmed.is_empty() {
            if path.is_empty() {
                return Err(WebtermError::PathNotFound(String::new()));
            }
            return Err(WebtermError::NameCollision("/".to_string()));
        }
        let (dir_part, leaf) = match trimmed.rfind('/') {
            Some(i) => (&trimmed[..=i], &trimmed[i + 1..]),
            None => ("", trimmed),
        };
        if leaf == "." || leaf == ".." {
            return Err(WebtermError::NameCollision(path.to_string()));
        }
        let parent = self.resolve_segments(dir_part)?;
        if self.dir_at(&parent).is_none() {
            return Err(WebtermError::PathNotFound(path.to_string()));
        }
        Ok((parent, leaf.to_string()))
    }
}

impl Default for Filesystem {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a segment path as an absolute path string.
fn render_path(segs: &[String]) -> String {
    if segs.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", segs.join("/"))
    }
}

fn render_path_child(parent: &[String], name: &str) -> String {
    if parent.is_empty() {
        format!("/{name}")
    } else {
        format!("/{}/{name}", parent.join("/"))
    }
}

fn joined(segs: &[String], name: &str) -> Vec<String> {
    let mut v = segs.to_vec();
    v.push(name.to_string());
    v
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_resolves() {
        let fs = Filesystem::new();
        assert!(fs.resolve("/").unwrap().is_dir());
    }

    #[test]
    fn default_layout_listing_order() {
        let fs = Filesystem::with_default_layout();
        assert_eq!(fs.list("/").unwrap(), vec!["C/", "D/", "readme.txt"]);
        assert_eq!(fs.list("/C").unwrap(), vec!["Users/", "Program Files/"]);
    }

    #[test]
    fn default_layout_readme_content() {
        let fs = Filesystem::with_default_layout();
        let f = fs.read_file("/readme.txt").unwrap();
        assert_eq!(f.content(), "Welcome to the terminal!");
        assert_eq!(f.kind(), FileKind::Text);
    }

    #[test]
    fn create_then_resolve() {
        let mut fs = Filesystem::new();
        fs.create_directory("/docs").unwrap();
        fs.create_file("/docs/a.txt", "hi", FileKind::Text).unwrap();
        assert!(fs.resolve("/docs").unwrap().is_dir());
        assert_eq!(
            fs.read_file("/docs/a.txt").unwrap().content(),
            "hi"
        );
    }

    #[test]
    fn create_collision_leaves_tree_unchanged() {
        let mut fs = Filesystem::with_default_layout();
        let before = fs.list("/C").unwrap().len();
        let err = fs.create_directory("/C/Users").unwrap_err();
        assert!(matches!(err, WebtermError::NameCollision(_)));
        let err = fs.create_file("/C/Users", "", FileKind::Text).unwrap_err();
        assert!(matches!(err, WebtermError::NameCollision(_)));
        assert_eq!(fs.list("/C").unwrap().len(), before);
    }

    #[test]
    fn create_under_missing_parent_fails() {
        let mut fs = Filesystem::new();
        let err = fs.create_file("/no/such/file.txt", "", FileKind::Text).unwrap_err();
        assert!(matches!(err, WebtermError::PathNotFound(_)));
    }

    #[test]
    fn create_under_file_parent_fails() {
        let mut fs = Filesystem::with_default_layout();
        let err = fs.create_file("/readme.txt/x", "", FileKind::Text).unwrap_err();
        assert!(matches!(err, WebtermError::PathNotFound(_)));
    }

    #[test]
    fn relative_resolution_uses_cwd() {
        let mut fs = Filesystem::with_default_layout();
        fs.change_directory("/C").unwrap();
        assert!(fs.resolve("Users").unwrap().is_dir());
        fs.create_file("notes.txt", "", FileKind::Text).unwrap();
        assert!(fs.resolve("/C/notes.txt").is_ok());
    }

    #[test]
    fn dot_is_a_no_op_segment() {
        let fs = Filesystem::with_default_layout();
        assert_eq!(fs.full_path("/C/./Users").unwrap(), "/C/Users");
    }

    #[test]
    fn dotdot_from_root_stays_at_root() {
        let fs = Filesystem::with_default_layout();
        assert_eq!(fs.full_path("..").unwrap(), "/");
        assert_eq!(fs.full_path("/../../C").unwrap(), "/C");
    }

    #[test]
    fn dotdot_steps_to_parent() {
        let mut fs = Filesystem::with_default_layout();
        fs.change_directory("/C/Users").unwrap();
        assert_eq!(fs.full_path("..").unwrap(), "/C");
        fs.change_directory("..").unwrap();
        assert_eq!(fs.cwd_path(), "/C");
    }

    #[test]
    fn resolution_stops_at_file() {
        let fs = Filesystem::with_default_layout();
        let err = fs.resolve("/readme.txt/extra").unwrap_err();
        assert!(matches!(err, WebtermError::PathNotFound(_)));
    }

    #[test]
    fn empty_segments_are_collapsed() {
        let fs = Filesystem::with_default_layout();
        assert_eq!(fs.full_path("//C//Users").unwrap(), "/C/Users");
    }

    #[test]
    fn delete_file_removes_node() {
        let mut fs = Filesystem::with_default_layout();
        fs.delete_file("/readme.txt").unwrap();
        assert!(fs.resolve("/readme.txt").is_err());
        assert_eq!(fs.list("/").unwrap(), vec!["C/", "D/"]);
    }

    #[test]
    fn delete_directory_always_fails() {
        let mut fs = Filesystem::with_default_layout();
        let before = fs.list("/").unwrap();
        let err = fs.delete_file("/C").unwrap_err();
        assert!(matches!(err, WebtermError::WrongNodeType(_)));
        assert_eq!(fs.list("/").unwrap(), before);
    }

    #[test]
    fn delete_missing_file_fails() {
        let mut fs = Filesystem::with_default_layout();
        let before = fs.list("/").unwrap();
        let err = fs.delete_file("/ghost.txt").unwrap_err();
        assert!(matches!(err, WebtermError::PathNotFound(_)));
        assert_eq!(fs.list("/").unwrap(), before);
    }

    #[test]
    fn delete_root_fails() {
        let mut fs = Filesystem::with_default_layout();
        assert!(fs.delete_file("/").is_err());
    }

    #[test]
    fn change_directory_to_file_fails_and_keeps_cwd() {
        let mut fs = Filesystem::with_default_layout();
        fs.change_directory("/C").unwrap();
        let err = fs.change_directory("/readme.txt").unwrap_err();
        assert!(matches!(err, WebtermError::WrongNodeType(_)));
        assert_eq!(fs.cwd_path(), "/C");
    }

    #[test]
    fn change_directory_to_missing_fails_and_keeps_cwd() {
        let mut fs = Filesystem::with_default_layout();
        assert!(fs.change_directory("/nope").is_err());
        assert_eq!(fs.cwd_path(), "/");
    }

    #[test]
    fn list_on_file_fails() {
        let fs = Filesystem::with_default_layout();
        assert!(matches!(
            fs.list("/readme.txt").unwrap_err(),
            WebtermError::WrongNodeType(_)
        ));
    }

    #[test]
    fn full_path_round_trips() {
        let mut fs = Filesystem::new();
        fs.create_directory("/a").unwrap();
        fs.create_directory("/a/b").unwrap();
        fs.create_file("/a/b/c.txt", "", FileKind::Text).unwrap();
        assert_eq!(fs.full_path("/a/b/c.txt").unwrap(), "/a/b/c.txt");
        fs.change_directory("/a").unwrap();
        assert_eq!(fs.full_path("b/c.txt").unwrap(), "/a/b/c.txt");
    }

    #[test]
    fn creation_with_dot_leaf_is_a_collision() {
        let mut fs = Filesystem::with_default_layout();
        assert!(matches!(
            fs.create_directory("/C/.").unwrap_err(),
            WebtermError::NameCollision(_)
        ));
        assert!(matches!(
            fs.create_directory("/C/..").unwrap_err(),
            WebtermError::NameCollision(_)
        ));
    }

    #[test]
    fn names_with_spaces() {
        let mut fs = Filesystem::with_default_layout();
        assert_eq!(
            fs.list("/C/Program Files").unwrap(),
            Vec::<String>::new()
        );
        fs.create_file("/C/Program Files/read me.txt", "x", FileKind::Text)
            .unwrap();
        assert!(fs.resolve("/C/Program Files/read me.txt").is_ok());
    }

    #[test]
    fn cloned_tree_is_independent() {
        let mut fs = Filesystem::with_default_layout();
        let snapshot = fs.clone();
        fs.delete_file("/readme.txt").unwrap();
        assert!(snapshot.resolve("/readme.txt").is_ok());
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn create_then_resolve_file(
                dir in "[a-z]{1,8}",
                file in "[a-z]{1,8}",
                content in ".{0,64}",
            ) {
                let mut fs = Filesystem::new();
                fs.create_directory(&format!("/{dir}")).unwrap();
                let path = format!("/{dir}/{file}");
                fs.create_file(&path, &content, FileKind::Text).unwrap();
                let f = fs.read_file(&path).unwrap();
                prop_assert_eq!(f.content(), content.as_str());
            }

            #[test]
            fn full_path_is_normalized(segments in proptest::collection::vec("[a-z]{1,6}", 1..5)) {
                let mut fs = Filesystem::new();
                let mut path = String::new();
                for seg in &segments {
                    path.push('/');
                    path.push_str(seg);
                    fs.create_directory(&path).unwrap();
                }
                let rendered = fs.full_path(&path).unwrap();
                prop_assert_eq!(&rendered, &path);
                // A second pass through resolution is a fixed point.
                prop_assert_eq!(fs.full_path(&rendered).unwrap(), path);
            }

            #[test]
            fn collision_never_mutates(name in "[a-z]{1,8}") {
                let mut fs = Filesystem::new();
                let path = format!("/{name}");
                fs.create_directory(&path).unwrap();
                let before = fs.list("/").unwrap();
                prop_assert!(fs.create_directory(&path).is_err());
                prop_assert!(fs.create_file(&path, "", FileKind::Text).is_err());
                prop_assert_eq!(fs.list("/").unwrap(), before);
            }

            #[test]
            fn delete_then_unresolvable(name in "[a-z]{1,8}") {
                let mut fs = Filesystem::new();
                let path = format!("/{name}");
                fs.create_file(&path, "x", FileKind::Text).unwrap();
                fs.delete_file(&path).unwrap();
                prop_assert!(fs.resolve(&path).is_err());
            }
        }
    }
}
