//! Per-invocation log file with secret redaction
//!
//! Each run writes its tracing output to a fresh file whose name starts with
//! the operation's prefix. Secrets are replaced before any byte reaches disk.
//!
//! # Modules
//!
//! - [`rotation`]: Removes log files left behind by earlier runs

pub mod rotation;

use std::borrow::Cow;
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::subscriber::DefaultGuard;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::DEFAULT_LOG_FILTER;

/// Immutable mapping from secret literal to the token logged in its place
#[derive(Debug, Clone, Default)]
pub struct Sanitizer {
    // Longest secret first so a secret containing another is replaced whole
    redactions: Vec<(String, String)>,
}

impl Sanitizer {
    pub fn new(redactions: HashMap<String, String>) -> Self {
        let mut redactions: Vec<(String, String)> = redactions
            .into_iter()
            .filter(|(secret, _)| !secret.is_empty())
            .collect();
        redactions.sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        Self { redactions }
    }

    /// Replaces every occurrence of every secret in `input`
    pub fn sanitize<'a>(&self, input: &'a str) -> Cow<'a, str> {
        let mut output = Cow::Borrowed(input);
        for (secret, token) in &self.redactions {
            if output.contains(secret.as_str()) {
                output = Cow::Owned(output.replace(secret.as_str(), token));
            }
        }
        output
    }
}

/// Writer that redacts secrets from every buffer before forwarding it
pub struct SanitizingWriter<W> {
    inner: W,
    sanitizer: Arc<Sanitizer>,
}

impl<W: Write> SanitizingWriter<W> {
    pub fn new(inner: W, sanitizer: Arc<Sanitizer>) -> Self {
        Self { inner, sanitizer }
    }
}

impl<W: Write> Write for SanitizingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let text = String::from_utf8_lossy(buf);
        self.inner
            .write_all(self.sanitizer.sanitize(&text).as_bytes())?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Logging for one process run
///
/// While the session is alive, tracing events on this thread go to its log
/// file. Dropping it uninstalls the subscriber, then flushes and closes the file.
pub struct LogSession {
    path: PathBuf,
    _subscriber: DefaultGuard,
    _worker: WorkerGuard,
}

impl LogSession {
    /// Creates a log file named `<prefix><random>` in `dir` and routes tracing to it
    pub fn start(prefix: &str, dir: &Path, sanitizer: Arc<Sanitizer>) -> io::Result<Self> {
        let (file, path) = create_log_file(prefix, dir)?;

        let (writer, worker) =
            tracing_appender::non_blocking(SanitizingWriter::new(file, sanitizer));

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(writer)
            .with_ansi(false)
            .with_target(false)
            .finish();

        Ok(Self {
            path,
            _subscriber: tracing::subscriber::set_default(subscriber),
            _worker: worker,
        })
    }

    /// Path of the active log file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn create_log_file(prefix: &str, dir: &Path) -> io::Result<(File, PathBuf)> {
    let file = tempfile::Builder::new().prefix(prefix).tempfile_in(dir)?;
    Ok(file.keep()?)
}
