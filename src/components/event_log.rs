use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, OnceLock};

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Text};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::components::Component;
use crate::ui::UiFrame;

const DEFAULT_MAX_LINES: usize = 500;
static GLOBAL_LOG: OnceLock<EventLogHandle> = OnceLock::new();

/// Route tracing output into `handle` from now on. Only the first call wins.
pub fn set_global_event_log(handle: EventLogHandle) -> bool {
    GLOBAL_LOG.set(handle).is_ok()
}

pub fn global_event_log() -> Option<EventLogHandle> {
    GLOBAL_LOG.get().cloned()
}

#[derive(Debug)]
struct EventLogBuffer {
    lines: VecDeque<String>,
    max_lines: usize,
}

impl EventLogBuffer {
    fn new(max_lines: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            max_lines: max_lines.max(1),
        }
    }

    fn push_line(&mut self, line: String) {
        self.lines.push_back(line);
        while self.lines.len() > self.max_lines {
            self.lines.pop_front();
        }
    }
}

#[derive(Clone, Debug)]
pub struct EventLogHandle {
    inner: Arc<Mutex<EventLogBuffer>>,
}

impl EventLogHandle {
    pub fn push(&self, line: impl Into<String>) {
        if let Ok(mut buffer) = self.inner.lock() {
            buffer.push_line(line.into());
        }
    }

    pub fn lines(&self) -> Vec<String> {
        self.inner
            .lock()
            .map(|buffer| buffer.lines.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// The last `count` lines, oldest first.
    pub fn tail(&self, count: usize) -> Vec<String> {
        self.inner
            .lock()
            .map(|buffer| {
                let skip = buffer.lines.len().saturating_sub(count);
                buffer.lines.iter().skip(skip).cloned().collect()
            })
            .unwrap_or_default()
    }

    pub fn writer(&self) -> EventLogWriter {
        EventLogWriter::new(self.clone())
    }
}

/// `io::Write` adapter that turns a byte stream into log lines.
#[derive(Debug)]
pub struct EventLogWriter {
    handle: EventLogHandle,
    pending: Vec<u8>,
}

impl EventLogWriter {
    pub fn new(handle: EventLogHandle) -> Self {
        Self {
            handle,
            pending: Vec::new(),
        }
    }

    fn push_text(&self, bytes: &[u8]) {
        let text = String::from_utf8_lossy(bytes);
        for line in text.split('\n') {
            let line = line.trim_end_matches('\r');
            if !line.is_empty() {
                self.handle.push(line.to_string());
            }
        }
    }
}

impl Write for EventLogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        if let Some(pos) = self.pending.iter().rposition(|b| *b == b'\n') {
            let complete: Vec<u8> = self.pending.drain(..=pos).collect();
            self.push_text(&complete);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.pending.is_empty() {
            let rest = std::mem::take(&mut self.pending);
            self.push_text(&rest);
        }
        Ok(())
    }
}

impl Drop for EventLogWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

/// Shows the newest log lines, always following the tail.
#[derive(Debug)]
pub struct EventLogComponent {
    handle: EventLogHandle,
}

impl EventLogComponent {
    pub fn new(max_lines: usize) -> (Self, EventLogHandle) {
        let handle = EventLogHandle {
            inner: Arc::new(Mutex::new(EventLogBuffer::new(max_lines))),
        };
        (
            Self {
                handle: handle.clone(),
            },
            handle,
        )
    }

    pub fn new_default() -> (Self, EventLogHandle) {
        Self::new(DEFAULT_MAX_LINES)
    }

    pub fn handle(&self) -> &EventLogHandle {
        &self.handle
    }
}

impl Component for EventLogComponent {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, _focused: bool) {
        let block = Block::default().borders(Borders::TOP).title("Events");
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.width == 0 || inner.height == 0 {
            return;
        }
        let lines = self.handle.tail(inner.height as usize);
        let text = Text::from(lines.into_iter().map(Line::from).collect::<Vec<_>>());
        frame.render_widget(Paragraph::new(text).style(Style::default()), inner);
    }
}
