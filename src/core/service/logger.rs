//! Logger interface (spec §6): append-only sinks with a bounded in-memory
//! ring plus an optional file. Layered on top of the crate's global
//! `tracing` subscriber, not a replacement for it — this is the domain's own
//! named concept (`system.log`, `mismatch.log`, `<profile>.log`).

use std::fs::{File, OpenOptions};
use std::io::Write as _;
use std::path::{Path, PathBuf};

use chrono::Utc;
use parking_lot::RwLock;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn as_str(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}

const DEFAULT_RING_CAPACITY: usize = 2_000;

struct Ring {
    lines: Vec<String>,
    capacity: usize,
    next: usize,
    len: usize,
}

impl Ring {
    fn new(capacity: usize) -> Self {
        Self {
            lines: Vec::with_capacity(capacity),
            capacity,
            next: 0,
            len: 0,
        }
    }

    fn push(&mut self, line: String) {
        if self.lines.len() < self.capacity {
            self.lines.push(line);
        } else {
            self.lines[self.next] = line;
        }
        self.next = (self.next + 1) % self.capacity;
        self.len = (self.len + 1).min(self.capacity);
    }

    fn snapshot(&self) -> Vec<String> {
        if self.lines.len() < self.capacity {
            return self.lines.clone();
        }
        let mut out = Vec::with_capacity(self.len);
        out.extend_from_slice(&self.lines[self.next..]);
        out.extend_from_slice(&self.lines[..self.next]);
        out
    }
}

/// A named append-only sink: a bounded ring buffer plus an optional file.
pub struct Logger {
    name: String,
    ring: RwLock<Ring>,
    file: Option<RwLock<File>>,
}

impl Logger {
    /// A sink with no file backing — used in tests and for the `mismatch`
    /// sink before a run directory has been chosen.
    #[must_use]
    pub fn new_ring_only(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ring: RwLock::new(Ring::new(DEFAULT_RING_CAPACITY)),
            file: None,
        }
    }

    /// A sink that also appends to `path`, created if missing.
    pub fn with_file(name: impl Into<String>, path: impl AsRef<Path>) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            name: name.into(),
            ring: RwLock::new(Ring::new(DEFAULT_RING_CAPACITY)),
            file: Some(RwLock::new(file)),
        })
    }

    pub fn log(&self, level: LogLevel, message: &str) {
        let line = format!("{} [{}] {}: {}", Utc::now().to_rfc3339(), level.as_str(), self.name, message);
        self.ring.write().push(line.clone());
        if let Some(file) = &self.file {
            let mut file = file.write();
            let _ = writeln!(file, "{line}");
        }
    }

    /// Appends a single JSON line instead of the plain `[LEVEL] name:
    /// message` format — used for `mismatch.log`, which downstream tooling
    /// parses record-by-record rather than greps as free text.
    pub fn log_json<T: Serialize>(&self, record: &T) {
        match serde_json::to_string(record) {
            Ok(line) => {
                self.ring.write().push(line.clone());
                if let Some(file) = &self.file {
                    let mut file = file.write();
                    let _ = writeln!(file, "{line}");
                }
            }
            Err(e) => self.log(LogLevel::Error, &format!("failed to serialize mismatch record: {e}")),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> Vec<String> {
        self.ring.read().snapshot()
    }
}

/// Chooses the first non-existent `run`, `run2`, `run3`, … directory under
/// `base` and creates it (spec §6: "Run directory name is `run`, `run2`,
/// `run3`, … — the first non-existent one is chosen").
pub fn next_run_dir(base: impl AsRef<Path>) -> std::io::Result<PathBuf> {
    let base = base.as_ref();
    std::fs::create_dir_all(base)?;

    let mut n = 1;
    loop {
        let candidate = if n == 1 {
            base.join("run")
        } else {
            base.join(format!("run{n}"))
        };
        if !candidate.exists() {
            std::fs::create_dir_all(&candidate)?;
            return Ok(candidate);
        }
        n += 1;
    }
}

/// The three run-scoped log sinks named in spec §6: `system.log`,
/// `mismatch.log`, and one `<profile>.log` per profile.
pub struct RunLoggers {
    pub system: Logger,
    pub mismatch: Logger,
    pub profiles: Vec<Logger>,
}

impl RunLoggers {
    pub fn create(run_dir: &Path, profile_names: &[String]) -> std::io::Result<Self> {
        let system = Logger::with_file("system", run_dir.join("system.log"))?;
        let mismatch = Logger::with_file("mismatch", run_dir.join("mismatch.log"))?;
        let profiles = profile_names
            .iter()
            .map(|name| Logger::with_file(name.clone(), run_dir.join(format!("{name}.log"))))
            .collect::<std::io::Result<Vec<_>>>()?;
        Ok(Self { system, mismatch, profiles })
    }
}
