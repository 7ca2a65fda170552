//! Command trait, registry, session, and dispatch logic.
//!
//! Supports quoted arguments, command aliases, bounded command history with
//! `!n` recall, and addon input takeover.

use std::collections::HashMap;
use std::rc::Rc;

use webterm_types::error::{Result, WebtermError};
use webterm_vfs::Filesystem;

use crate::addon::{AddonContext, AddonHost};
use crate::sink::OutputSink;

/// Shared mutable environment passed to every command.
pub struct Environment<'a> {
    /// The virtual file system (owns the current working directory).
    pub vfs: &'a mut Filesystem,
    /// Where all command output goes.
    pub sink: &'a mut dyn OutputSink,
}

/// A single executable command.
pub trait Command {
    /// The primary command name (what the user types).
    fn name(&self) -> &str;

    /// One-line description for `help`.
    fn description(&self) -> &str;

    /// Additional names dispatching to this same command.
    fn aliases(&self) -> &[&str] {
        &[]
    }

    /// Execute the command with the given positional arguments.
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<()>;
}

/// Maximum number of history entries to retain by default.
const MAX_HISTORY: usize = 100;

/// Column width for command names in `help` output.
const HELP_NAME_WIDTH: usize = 12;

/// Registry of available commands.
///
/// A command is registered under its primary name and every alias; all keys
/// share one handler instance. Keys are lower-cased. Re-registering an
/// existing key silently replaces it (a `warn!` is logged so embedders can
/// detect accidental shadowing).
#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<String, Rc<dyn Command>>,
}

impl CommandRegistry {
    /// Create an empty command registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command under its name and aliases.
    pub fn register(&mut self, cmd: Box<dyn Command>) {
        let cmd: Rc<dyn Command> = Rc::from(cmd);
        let mut keys = vec![cmd.name().to_ascii_lowercase()];
        keys.extend(cmd.aliases().iter().map(|a| a.to_ascii_lowercase()));
        for key in keys {
            if self.commands.insert(key.clone(), Rc::clone(&cmd)).is_some() {
                log::warn!("command '{key}' re-registered; previous handler replaced");
            }
        }
    }

    /// Look up a command by name or alias (lower-cased key).
    pub fn get(&self, name: &str) -> Option<Rc<dyn Command>> {
        self.commands.get(name).map(Rc::clone)
    }

    /// Unique commands (deduplicated across aliases) as sorted
    /// (name, description) pairs.
    pub fn list_commands(&self) -> Vec<(String, String)> {
        let mut seen: HashMap<&str, &str> = HashMap::new();
        for cmd in self.commands.values() {
            seen.insert(cmd.name(), cmd.description());
        }
        let mut cmds: Vec<(String, String)> = seen
            .into_iter()
            .map(|(n, d)| (n.to_string(), d.to_string()))
            .collect();
        cmds.sort();
        cmds
    }
}

/// One terminal session.
///
/// Owns the filesystem, the command registry, the command history, and the
/// addon host; everything a dispatch touches is single-owner state on this
/// struct, so one session is one unit of mutation and independent sessions
/// can coexist.
pub struct Session {
    vfs: Filesystem,
    registry: CommandRegistry,
    addons: AddonHost,
    history: Vec<String>,
    history_cap: usize,
}

impl Session {
    /// Create a session around an existing filesystem with an empty
    /// registry and no addons.
    pub fn new(vfs: Filesystem) -> Self {
        Self {
            vfs,
            registry: CommandRegistry::new(),
            addons: AddonHost::new(),
            history: Vec::new(),
            history_cap: MAX_HISTORY,
        }
    }

    /// Create a session with the standard filesystem layout and all
    /// built-in commands registered.
    pub fn with_defaults() -> Self {
        let mut session = Self::new(Filesystem::with_default_layout());
        crate::commands::register_builtins(&mut session.registry);
        session
    }

    /// Override the history capacity (oldest entries are dropped first).
    pub fn set_history_capacity(&mut self, cap: usize) {
        self.history_cap = cap.max(1);
        let len = self.history.len();
        if len > self.history_cap {
            self.history.drain(..len - self.history_cap);
        }
    }

    pub fn registry_mut(&mut self) -> &mut CommandRegistry {
        &mut self.registry
    }

    pub fn addons_mut(&mut self) -> &mut AddonHost {
        &mut self.addons
    }

    pub fn vfs(&self) -> &Filesystem {
        &self.vfs
    }

    pub fn vfs_mut(&mut self) -> &mut Filesystem {
        &mut self.vfs
    }

    /// Executed lines, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Whether an addon currently owns the input channel.
    pub fn addon_active(&self) -> bool {
        self.addons.is_active()
    }

    /// Parse and execute one raw input line.
    ///
    /// Every failure is converted into a report line on the sink; dispatch
    /// never panics or aborts the session.
    pub fn dispatch(&mut self, line: &str, sink: &mut dyn OutputSink) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        log::debug!("dispatch: {line}");

        // History recall: `!n` replays the nth stored line through the full
        // dispatch path. The shorthand itself is never stored, so a recalled
        // line can never be a recall.
        if let Some(digits) = line.strip_prefix('!')
            && !digits.is_empty()
            && digits.bytes().all(|b| b.is_ascii_digit())
        {
            match self.recall(digits) {
                Ok(stored) => {
                    sink.write_line(&stored);
                    self.dispatch(&stored, sink);
                },
                Err(e) => sink.write_line(&e.to_string()),
            }
            return;
        }

        self.push_history(line);

        // An active addon owns the input channel; only `exit` is intercepted.
        if self.addons.is_active() {
            let mut ctx = AddonContext {
                vfs: &mut self.vfs,
                sink,
            };
            if line.eq_ignore_ascii_case("exit") {
                self.addons.stop(&mut ctx);
            } else {
                self.addons.forward(line, &mut ctx);
            }
            return;
        }

        let tokens = tokenize(line);
        let Some((verb, rest)) = tokens.split_first() else {
            return;
        };
        let verb = verb.to_ascii_lowercase();
        let args: Vec<&str> = rest.iter().map(String::as_str).collect();

        // Built-ins that need session state (registry, history, addon host)
        // are intercepted here instead of living in the registry.
        let result = match verb.as_str() {
            "help" => {
                self.print_help(sink);
                Ok(())
            },
            "history" => {
                self.print_history(sink);
                Ok(())
            },
            "run" => self.start_addon(&args, sink),
            "exit" => {
                sink.write_line("No addon is running.");
                Ok(())
            },
            _ => self.invoke(&verb, &args, sink),
        };
        if let Err(e) = result {
            sink.write_line(&e.to_string());
        }
    }

    fn invoke(&mut self, verb: &str, args: &[&str], sink: &mut dyn OutputSink) -> Result<()> {
        let cmd = self
            .registry
            .get(verb)
            .ok_or_else(|| WebtermError::UnknownCommand(verb.to_string()))?;
        let mut env = Environment {
            vfs: &mut self.vfs,
            sink,
        };
        cmd.execute(args, &mut env)
    }

    fn recall(&self, digits: &str) -> Result<String> {
        let out_of_range = || WebtermError::InvalidHistoryIndex(digits.to_string());
        let n: usize = digits.parse().map_err(|_| out_of_range())?;
        if n == 0 || n > self.history.len() {
            return Err(out_of_range());
        }
        Ok(self.history[n - 1].clone())
    }

    fn push_history(&mut self, line: &str) {
        // Don't duplicate the immediately preceding entry.
        if self.history.last().is_none_or(|last| last != line) {
            self.history.push(line.to_string());
            if self.history.len() > self.history_cap {
                self.history.remove(0);
            }
        }
    }

    fn start_addon(&mut self, args: &[&str], sink: &mut dyn OutputSink) -> Result<()> {
        let name = args
            .first()
            .copied()
            .ok_or_else(|| WebtermError::Command("usage: run <addon>".to_string()))?;
        let mut ctx = AddonContext {
            vfs: &mut self.vfs,
            sink,
        };
        self.addons.start(name, &mut ctx)
    }

    fn print_help(&self, sink: &mut dyn OutputSink) {
        // Intercepted built-ins are listed alongside registry commands.
        let mut cmds = vec![
            ("exit".to_string(), "Leave the active addon".to_string()),
            ("help".to_string(), "List available commands".to_string()),
            ("history".to_string(), "Show command history".to_string()),
            ("run".to_string(), "Launch an addon by name".to_string()),
        ];
        cmds.extend(self.registry.list_commands());
        cmds.sort();
        for (name, desc) in &cmds {
            sink.write_line(&format!("{name:<width$} {desc}", width = HELP_NAME_WIDTH));
        }
    }

    fn print_history(&self, sink: &mut dyn OutputSink) {
        for (i, entry) in self.history.iter().enumerate() {
            sink.write_line(&format!("  {:4}  {entry}", i + 1));
        }
    }
}

// ---------------------------------------------------------------------------
// Tokenizer: double-quoted substrings are single tokens, quotes stripped.
// ---------------------------------------------------------------------------

/// Tokenize a command line.
///
/// Whitespace separates tokens; a double-quoted substring is one token with
/// the quotes stripped. An unterminated quote runs to the end of the line.
pub fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in input.chars() {
        if in_quotes {
            if ch == '"' {
                in_quotes = false;
            } else {
                current.push(ch);
            }
        } else {
            match ch {
                '"' => in_quotes = true,
                c if c.is_whitespace() => {
                    if !current.is_empty() {
                        tokens.push(std::mem::take(&mut current));
                    }
                },
                _ => current.push(ch),
            }
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}
