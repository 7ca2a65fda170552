//! Demo addons for the reference host.

use webterm_terminal::{Addon, AddonContext, Session};
use webterm_vfs::FileKind;

/// Path the notepad addon saves to when a session ends.
const NOTES_PATH: &str = "/C/Users/notes.txt";

/// A minimal line-buffer editor: every input line is appended to a buffer,
/// and `exit` writes the buffer to [`NOTES_PATH`].
#[derive(Default)]
pub struct Notepad {
    lines: Vec<String>,
}

impl Addon for Notepad {
    fn name(&self) -> &str {
        "notepad"
    }

    fn start(&mut self, ctx: &mut AddonContext<'_>) {
        ctx.sink
            .write_line("notepad: type lines to append; 'exit' saves and returns.");
    }

    fn on_input(&mut self, line: &str, ctx: &mut AddonContext<'_>) {
        self.lines.push(line.to_string());
        ctx.sink.write_line(&format!("  [{}]", self.lines.len()));
    }

    fn stop(&mut self, ctx: &mut AddonContext<'_>) {
        // Overwrite semantics: replace any previous note file.
        let _ = ctx.vfs.delete_file(NOTES_PATH);
        let content = self.lines.join("\n");
        match ctx.vfs.create_file(NOTES_PATH, &content, FileKind::Text) {
            Ok(()) => ctx.sink.write_line(&format!(
                "notepad: saved {} line(s) to {NOTES_PATH}",
                self.lines.len()
            )),
            Err(e) => ctx.sink.write_line(&format!("notepad: save failed: {e}")),
        }
        self.lines.clear();
    }
}

/// Register the demo addons and their launcher files.
pub fn register_demo_addons(session: &mut Session) {
    session.addons_mut().register(Box::new(Notepad::default()));
    // `cat` on the launcher points the user at `run notepad`.
    if let Err(e) = session.vfs_mut().create_file(
        "/C/Program Files/notepad.exe",
        "notepad",
        FileKind::Program,
    ) {
        log::warn!("could not seed notepad launcher: {e}");
    }
}
