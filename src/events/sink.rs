//! Where shop events go
//!
//! An [`EventSink`] persists every event it is given. [`EventLog`] wraps a sink
//! and decides, from the detail level and verbosity, whether an event is also
//! echoed to the console through `tracing`.

use std::cell::RefCell;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tracing::{debug, info};

use crate::events::ShopEvent;
use crate::simulation::{SimulationError, SimulationResult};
use crate::types::LogDetailLevel;

/// Persistent destination for shop events
pub trait EventSink: std::fmt::Debug {
    /// Store one event
    fn record(&mut self, event: &ShopEvent) -> SimulationResult<()>;

    /// Push buffered output to its destination
    fn flush(&mut self) -> SimulationResult<()> {
        Ok(())
    }
}

/// Sink writing one `[t] message` line per event to a text file
///
/// Each line is flushed as it is written so the file stays readable while a
/// long run is still going.
#[derive(Debug)]
pub struct FileEventLog {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl FileEventLog {
    /// Create (or truncate) the log file, making parent directories as needed
    pub fn create<P: AsRef<Path>>(path: P) -> SimulationResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| SimulationError::log_sink_error(&path, e))?;
        }
        let file = File::create(&path).map_err(|e| SimulationError::log_sink_error(&path, e))?;

        debug!("Writing shop events to {}", path.display());
        Ok(Self { path, writer: BufWriter::new(file) })
    }

    /// Path of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EventSink for FileEventLog {
    fn record(&mut self, event: &ShopEvent) -> SimulationResult<()> {
        writeln!(self.writer, "{}", event)
            .and_then(|_| self.writer.flush())
            .map_err(|e| SimulationError::log_sink_error(&self.path, e))
    }

    fn flush(&mut self) -> SimulationResult<()> {
        self.writer.flush().map_err(|e| SimulationError::log_sink_error(&self.path, e))
    }
}

/// In-memory sink; clones share the same buffer
#[derive(Debug, Clone, Default)]
pub struct MemoryEventLog {
    events: Rc<RefCell<Vec<ShopEvent>>>,
}

impl MemoryEventLog {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far
    pub fn events(&self) -> Vec<ShopEvent> {
        self.events.borrow().clone()
    }

    /// Messages recorded so far, without timestamps
    pub fn messages(&self) -> Vec<String> {
        self.events.borrow().iter().map(|e| e.message.clone()).collect()
    }

    /// Rendered `[t] message` lines
    pub fn lines(&self) -> Vec<String> {
        self.events.borrow().iter().map(ToString::to_string).collect()
    }

    /// Number of recorded events
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    /// Whether nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}

impl EventSink for MemoryEventLog {
    fn record(&mut self, event: &ShopEvent) -> SimulationResult<()> {
        self.events.borrow_mut().push(event.clone());
        Ok(())
    }
}

/// Event stream of one run: persist everything, echo what the level admits
#[derive(Debug)]
pub struct EventLog {
    sink: Box<dyn EventSink>,
    level: LogDetailLevel,
    echo_console: bool,
    recorded: usize,
}

impl EventLog {
    /// Wrap a sink with console filtering
    pub fn new(sink: Box<dyn EventSink>, level: LogDetailLevel, echo_console: bool) -> Self {
        Self { sink, level, echo_console, recorded: 0 }
    }

    /// Persist the event and echo it if admitted
    pub fn record(&mut self, event: ShopEvent) -> SimulationResult<()> {
        if self.echo_console && self.level.admits(event.kind) {
            info!(target: "paint_shop_simulator::events", "{}", event);
        } else {
            debug!(target: "paint_shop_simulator::events", "{}", event);
        }

        self.sink.record(&event)?;
        self.recorded += 1;
        Ok(())
    }

    /// Flush the underlying sink
    pub fn flush(&mut self) -> SimulationResult<()> {
        self.sink.flush()
    }

    /// Detail level used for console filtering
    pub fn level(&self) -> LogDetailLevel {
        self.level
    }

    /// Events persisted so far
    pub fn recorded(&self) -> usize {
        self.recorded
    }
}
