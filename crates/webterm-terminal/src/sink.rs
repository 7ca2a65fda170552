//! Output sink contract and an in-memory implementation.
//!
//! Rendering is a collaborator, not part of the engine: the dispatcher and
//! every command write through [`OutputSink`] and never touch a display
//! directly. Writes must be rendered in call order.

/// Receives terminal output for rendering.
pub trait OutputSink {
    /// Append one line of plain text.
    fn write_line(&mut self, text: &str);

    /// Append pre-formatted embeddable content (image/audio markup).
    fn write_rich(&mut self, markup: &str);

    /// Clear the display buffer. Command history is unaffected.
    fn clear(&mut self);
}

/// One recorded sink write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    Line(String),
    Rich(String),
    Clear,
}

/// An in-memory sink recording the full event stream.
///
/// Used by tests and by embedders that render asynchronously from a buffer.
#[derive(Debug, Default)]
pub struct BufferSink {
    events: Vec<SinkEvent>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every write since creation, including clears.
    pub fn events(&self) -> &[SinkEvent] {
        &self.events
    }

    /// Plain-text lines currently visible, i.e. written since the last
    /// clear.
    pub fn lines(&self) -> Vec<&str> {
        let mut lines = Vec::new();
        for event in &self.events {
            match event {
                SinkEvent::Line(text) => lines.push(text.as_str()),
                SinkEvent::Clear => lines.clear(),
                SinkEvent::Rich(_) => {},
            }
        }
        lines
    }

    /// The most recent visible line, if any.
    pub fn last_line(&self) -> Option<&str> {
        self.lines().last().copied()
    }
}

impl OutputSink for BufferSink {
    fn write_line(&mut self, text: &str) {
        self.events.push(SinkEvent::Line(text.to_string()));
    }

    fn write_rich(&mut self, markup: &str) {
        self.events.push(SinkEvent::Rich(markup.to_string()));
    }

    fn clear(&mut self) {
        self.events.push(SinkEvent::Clear);
    }
}
