//! Addon registry and exclusive-session state machine.
//!
//! An addon is a mini-program that takes over the input channel: once
//! started, every line the user types is forwarded to it verbatim until the
//! session ends with `exit`. At most one addon is active per terminal
//! session.

use std::collections::HashMap;

use webterm_types::error::{Result, WebtermError};
use webterm_vfs::Filesystem;

use crate::sink::OutputSink;

/// Mutable state handed to every addon hook.
pub struct AddonContext<'a> {
    /// The session's virtual file system.
    pub vfs: &'a mut Filesystem,
    /// The session's output sink.
    pub sink: &'a mut dyn OutputSink,
}

/// A pluggable mini-program.
///
/// The host never parses input on an addon's behalf: between `start` and
/// `stop`, raw lines arrive through `on_input` and the addon is solely
/// responsible for interpreting them.
pub trait Addon {
    /// Registration name (looked up case-insensitively by `run`).
    fn name(&self) -> &str;

    /// Called once when the addon takes over the session.
    fn start(&mut self, ctx: &mut AddonContext<'_>);

    /// Called for every input line while active (`exit` excepted).
    fn on_input(&mut self, line: &str, ctx: &mut AddonContext<'_>);

    /// Called once when the session ends.
    fn stop(&mut self, ctx: &mut AddonContext<'_>);
}

/// Registry of addons plus the single-active-session state machine.
///
/// States are Idle and Active(name); `start` and `stop` are the only
/// transitions.
#[derive(Default)]
pub struct AddonHost {
    /// Keys are lower-cased addon names.
    addons: HashMap<String, Box<dyn Addon>>,
    active: Option<String>,
}

impl AddonHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an addon under its name (case-insensitive). Re-registering
    /// a name replaces the previous addon.
    pub fn register(&mut self, addon: Box<dyn Addon>) {
        let key = addon.name().to_ascii_lowercase();
        if self.addons.insert(key.clone(), addon).is_some() {
            log::warn!("addon '{key}' re-registered; previous handler replaced");
        }
    }

    /// Whether an addon session is active.
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Lower-cased name of the active addon, if any.
    pub fn active_name(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Idle -> Active transition.
    ///
    /// Rejected with `AddonAlreadyActive` if a session is in progress (the
    /// active addon is unchanged), and with `AddonNotFound` if the name is
    /// not registered.
    pub fn start(&mut self, name: &str, ctx: &mut AddonContext<'_>) -> Result<()> {
        if let Some(active) = &self.active {
            return Err(WebtermError::AddonAlreadyActive(active.clone()));
        }
        let key = name.to_ascii_lowercase();
        let addon = self
            .addons
            .get_mut(&key)
            .ok_or_else(|| WebtermError::AddonNotFound(name.to_string()))?;
        log::debug!("starting addon '{key}'");
        addon.start(ctx);
        self.active = Some(key);
        Ok(())
    }

    /// Active -> Idle transition. No-op when idle.
    pub fn stop(&mut self, ctx: &mut AddonContext<'_>) {
        if let Some(key) = self.active.take() {
            if let Some(addon) = self.addons.get_mut(&key) {
                addon.stop(ctx);
            }
            ctx.sink.write_line("Addon closed. Back at the main terminal.");
        }
    }

    /// Forward one raw input line to the active addon.
    pub fn forward(&mut self, line: &str, ctx: &mut AddonContext<'_>) {
        if let Some(key) = self.active.clone()
            && let Some(addon) = self.addons.get_mut(&key)
        {
            addon.on_input(line, ctx);
        }
    }
}
