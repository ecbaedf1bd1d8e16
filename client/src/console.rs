//! Console: the client's line buffer and `log` backend.
//!
//! Every diagnostic goes through the [`log`] macros. [`Console::install`]
//! registers the console as the global logger; records are then stored in
//! the buffer (drawn under the maze by the terminal front-end) and, in
//! headless mode, echoed to standard error.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// Default number of lines kept before the oldest are dropped.
pub const DEFAULT_CAPACITY: usize = 512;

const INDENT: &str = "  ";

#[derive(Debug)]
struct Shared {
    lines: Mutex<VecDeque<String>>,
    indent: AtomicUsize,
    echo: AtomicBool,
    capacity: usize,
}

/// A bounded, shareable buffer of console lines.
///
/// Clones share the same buffer, so one handle can be installed as the
/// logger while another is kept for drawing.
#[derive(Debug, Clone)]
pub struct Console {
    shared: Arc<Shared>,
}

impl Default for Console {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl Console {
    /// Create an empty console keeping at most `capacity` lines.
    pub fn new(capacity: usize) -> Self {
        Self {
            shared: Arc::new(Shared {
                lines: Mutex::new(VecDeque::new()),
                indent: AtomicUsize::new(0),
                echo: AtomicBool::new(false),
                capacity: capacity.max(1),
            }),
        }
    }

    /// Also write every line to standard error. Shared by all clones.
    pub fn set_echo(&self, echo: bool) {
        self.shared.echo.store(echo, Ordering::Relaxed);
    }

    fn buffer(&self) -> MutexGuard<'_, VecDeque<String>> {
        // A panic while holding the lock leaves the buffer intact.
        self.shared
            .lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Append one line at the current indentation.
    pub fn print(&self, text: &str) {
        let depth = self.shared.indent.load(Ordering::Relaxed);
        let line = format!("{}{}", INDENT.repeat(depth), text);
        if self.shared.echo.load(Ordering::Relaxed) {
            eprintln!("{line}");
        }
        let mut lines = self.buffer();
        if lines.len() == self.shared.capacity {
            lines.pop_front();
        }
        lines.push_back(line);
    }

    /// Indent every line printed until the returned guard is dropped.
    pub fn indent(&self) -> IndentGuard {
        self.shared.indent.fetch_add(1, Ordering::Relaxed);
        IndentGuard {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Current indentation depth.
    pub fn depth(&self) -> usize {
        self.shared.indent.load(Ordering::Relaxed)
    }

    /// Number of buffered lines.
    pub fn len(&self) -> usize {
        self.buffer().len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer().is_empty()
    }

    /// A copy of every buffered line, oldest first.
    pub fn lines(&self) -> Vec<String> {
        self.buffer().iter().cloned().collect()
    }

    /// The last `n` lines, oldest first.
    pub fn recent(&self, n: usize) -> Vec<String> {
        let lines = self.buffer();
        let skip = lines.len().saturating_sub(n);
        lines.iter().skip(skip).cloned().collect()
    }

    /// Drop every buffered line.
    pub fn clear(&self) {
        self.buffer().clear();
    }

    /// Register a clone of this console as the global logger.
    pub fn install(&self, level: log::LevelFilter) -> Result<(), log::SetLoggerError> {
        log::set_boxed_logger(Box::new(self.clone()))?;
        log::set_max_level(level);
        Ok(())
    }
}

impl log::Log for Console {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let text = record.args().to_string();
        match record.level() {
            log::Level::Error => self.print(&format!("ERROR: {text}")),
            log::Level::Warn => self.print(&format!("WARNING: {text}")),
            _ => self.print(&text),
        }
    }

    fn flush(&self) {}
}

/// Restores the console indentation when dropped.
#[derive(Debug)]
pub struct IndentGuard {
    shared: Arc<Shared>,
}

impl Drop for IndentGuard {
    fn drop(&mut self) {
        let _ = self
            .shared
            .indent
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |d| d.checked_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Log;

    #[test]
    fn print_and_recent() {
        let c = Console::new(8);
        assert!(c.is_empty());
        c.print("one");
        c.print("two");
        c.print("three");
        assert_eq!(c.len(), 3);
        assert_eq!(c.recent(2), vec!["two".to_string(), "three".to_string()]);
        assert_eq!(c.recent(10).len(), 3);
        c.clear();
        assert!(c.is_empty());
    }

    #[test]
    fn capacity_drops_oldest() {
        let c = Console::new(2);
        c.print("a");
        c.print("b");
        c.print("c");
        assert_eq!(c.lines(), vec!["b".to_string(), "c".to_string()]);
    }

    #[test]
    fn indentation_is_scoped() {
        let c = Console::default();
        c.print("Generating maze");
        {
            let _g = c.indent();
            c.print("start (3, 4)");
            {
                let _g = c.indent();
                c.print("opening N");
            }
            c.print("goal (20, 10)");
        }
        c.print("done");
        assert_eq!(c.depth(), 0);
        assert_eq!(
            c.lines(),
            vec![
                "Generating maze",
                "  start (3, 4)",
                "    opening N",
                "  goal (20, 10)",
                "done",
            ]
        );
    }

    #[test]
    fn clones_share_buffer() {
        let c = Console::default();
        let other = c.clone();
        other.print("shared");
        assert_eq!(c.lines(), vec!["shared".to_string()]);
    }

    #[test]
    fn log_records_are_prefixed() {
        let c = Console::default();
        // Records are filtered against the global max level, which defaults
        // to Off until a logger is installed.
        log::set_max_level(log::LevelFilter::Trace);
        c.log(
            &log::Record::builder()
                .level(log::Level::Warn)
                .args(format_args!("no path"))
                .build(),
        );
        c.log(
            &log::Record::builder()
                .level(log::Level::Info)
                .args(format_args!("seed {}", 42))
                .build(),
        );
        assert_eq!(c.lines(), vec!["WARNING: no path", "seed 42"]);
    }
}
