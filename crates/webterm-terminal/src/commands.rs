//! Built-in commands for the webterm terminal.
//!
//! Each built-in is a thin adapter over the virtual file system; all output
//! goes through the environment's sink. `help`, `history`, `run`, and
//! `exit` need session state and are intercepted by the dispatcher instead
//! of living here.

use webterm_types::error::{Result, WebtermError};
use webterm_vfs::{Directory, FileKind, Node};

use crate::interpreter::{Command, CommandRegistry, Environment};
use crate::sink::OutputSink;

/// Register all built-in commands into a registry.
pub fn register_builtins(reg: &mut CommandRegistry) {
    reg.register(Box::new(PwdCmd));
    reg.register(Box::new(LsCmd));
    reg.register(Box::new(CdCmd));
    reg.register(Box::new(CatCmd));
    reg.register(Box::new(MkdirCmd));
    reg.register(Box::new(TouchCmd));
    reg.register(Box::new(RmCmd));
    reg.register(Box::new(EchoCmd));
    reg.register(Box::new(DateCmd));
    reg.register(Box::new(TreeCmd));
    reg.register(Box::new(ClearCmd));
}

fn require_arg<'a>(args: &[&'a str], usage: &str) -> Result<&'a str> {
    args.first()
        .copied()
        .ok_or_else(|| WebtermError::Command(format!("usage: {usage}")))
}

// ---------------------------------------------------------------------------
// pwd
// ---------------------------------------------------------------------------

struct PwdCmd;
impl Command for PwdCmd {
    fn name(&self) -> &str {
        "pwd"
    }
    fn description(&self) -> &str {
        "Print the current directory"
    }
    fn execute(&self, _args: &[&str], env: &mut Environment<'_>) -> Result<()> {
        env.sink.write_line(&env.vfs.cwd_path());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ls
// ---------------------------------------------------------------------------

struct LsCmd;
impl Command for LsCmd {
    fn name(&self) -> &str {
        "ls"
    }
    fn description(&self) -> &str {
        "List directory contents"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<()> {
        let path = args.first().copied().unwrap_or(".");
        let entries = env.vfs.list(path)?;
        if entries.is_empty() {
            env.sink.write_line("Empty directory.");
            return Ok(());
        }
        for entry in &entries {
            env.sink.write_line(entry);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// cd
// ---------------------------------------------------------------------------

struct CdCmd;
impl Command for CdCmd {
    fn name(&self) -> &str {
        "cd"
    }
    fn description(&self) -> &str {
        "Change the working directory"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<()> {
        let path = require_arg(args, "cd <dir>")?;
        env.vfs.change_directory(path)
    }
}

// ---------------------------------------------------------------------------
// cat
// ---------------------------------------------------------------------------

struct CatCmd;
impl Command for CatCmd {
    fn name(&self) -> &str {
        "cat"
    }
    fn description(&self) -> &str {
        "Display a file"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<()> {
        let path = require_arg(args, "cat <file>")?;
        let file = env.vfs.read_file(path)?;
        match file.kind() {
            FileKind::Text => {
                for line in file.content().lines() {
                    env.sink.write_line(line);
                }
            },
            FileKind::Image => {
                env.sink.write_rich(&format!(
                    r#"<img src="{}" alt="{}">"#,
                    file.content(),
                    file.name()
                ));
            },
            FileKind::Audio => {
                env.sink
                    .write_rich(&format!(r#"<audio controls src="{}"></audio>"#, file.content()));
            },
            FileKind::Program => {
                // Program files carry the addon name as content.
                let target = if file.content().is_empty() {
                    file.name().split('.').next().unwrap_or(file.name())
                } else {
                    file.content()
                };
                env.sink.write_line(&format!(
                    "{} is a program. Type 'run {target}' to launch it.",
                    file.name()
                ));
            },
            FileKind::Other => {
                env.sink
                    .write_line(&format!("cat: {}: unsupported file type", file.name()));
            },
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// mkdir
// ---------------------------------------------------------------------------

struct MkdirCmd;
impl Command for MkdirCmd {
    fn name(&self) -> &str {
        "mkdir"
    }
    fn description(&self) -> &str {
        "Create a directory"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<()> {
        let path = require_arg(args, "mkdir <dir>")?;
        env.vfs.create_directory(path)
    }
}

// ---------------------------------------------------------------------------
// touch
// ---------------------------------------------------------------------------

struct TouchCmd;
impl Command for TouchCmd {
    fn name(&self) -> &str {
        "touch"
    }
    fn description(&self) -> &str {
        "Create an empty text file"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<()> {
        let path = require_arg(args, "touch <file>")?;
        env.vfs.create_file(path, "", FileKind::Text)
    }
}

// ---------------------------------------------------------------------------
// rm
// ---------------------------------------------------------------------------

struct RmCmd;
impl Command for RmCmd {
    fn name(&self) -> &str {
        "rm"
    }
    fn description(&self) -> &str {
        "Delete a file"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<()> {
        let path = require_arg(args, "rm <file>")?;
        env.vfs.delete_file(path)
    }
}

// ---------------------------------------------------------------------------
// echo
// ---------------------------------------------------------------------------

struct EchoCmd;
impl Command for EchoCmd {
    fn name(&self) -> &str {
        "echo"
    }
    fn description(&self) -> &str {
        "Print arguments"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<()> {
        env.sink.write_line(&args.join(" "));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// date (alias: time)
// ---------------------------------------------------------------------------

struct DateCmd;
impl Command for DateCmd {
    fn name(&self) -> &str {
        "date"
    }
    fn description(&self) -> &str {
        "Print the current date and time"
    }
    fn aliases(&self) -> &[&str] {
        &["time"]
    }
    fn execute(&self, _args: &[&str], env: &mut Environment<'_>) -> Result<()> {
        env.sink
            .write_line(&chrono::Local::now().format("%c").to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// tree
// ---------------------------------------------------------------------------

struct TreeCmd;
impl Command for TreeCmd {
    fn name(&self) -> &str {
        "tree"
    }
    fn description(&self) -> &str {
        "Display a directory tree"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<()> {
        let path = args.first().copied().unwrap_or(".");
        let full = env.vfs.full_path(path)?;
        let dir = env
            .vfs
            .resolve(path)?
            .as_dir()
            .ok_or_else(|| WebtermError::WrongNodeType(format!("not a directory: {path}")))?;
        env.sink.write_line(&full);
        let mut dirs = 0u32;
        let mut files = 0u32;
        tree_recursive(dir, "", env.sink, &mut dirs, &mut files);
        env.sink
            .write_line(&format!("{dirs} directories, {files} files"));
        Ok(())
    }
}

fn tree_recursive(
    dir: &Directory,
    prefix: &str,
    sink: &mut dyn OutputSink,
    dirs: &mut u32,
    files: &mut u32,
) {
    let count = dir.children().len();
    for (i, child) in dir.children().iter().enumerate() {
        let is_last = i == count - 1;
        let connector = if is_last { "└── " } else { "├── " };
        sink.write_line(&format!("{prefix}{connector}{}", child.display_name()));
        match child {
            Node::Directory(sub) => {
                *dirs += 1;
                let child_prefix = if is_last {
                    format!("{prefix}    ")
                } else {
                    format!("{prefix}│   ")
                };
                tree_recursive(sub, &child_prefix, sink, dirs, files);
            },
            Node::File(_) => *files += 1,
        }
    }
}

// ---------------------------------------------------------------------------
// clear
// ---------------------------------------------------------------------------

struct ClearCmd;
impl Command for ClearCmd {
    fn name(&self) -> &str {
        "clear"
    }
    fn description(&self) -> &str {
        "Clear the terminal display"
    }
    fn execute(&self, _args: &[&str], env: &mut Environment<'_>) -> Result<()> {
        env.sink.clear();
        Ok(())
    }
}
