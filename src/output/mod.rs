//! Output sinks for generated content.
//!
//! An invocation that produces output writes to exactly one [`OutputSink`]:
//!
//! - `Shared`: the process-wide standard output supplied by the caller. It is
//!   flushed on close but never closed or replaced.
//! - `File`: a file owned by the sink, opened with the configured encoding
//!   after creating missing parent directories. It is flushed and closed
//!   exactly once.
//!
//! Closing never fails: flush/close errors are logged so they cannot mask an
//! error raised by the task itself.

mod encoding;
mod footer;


pub use encoding::Encoding;
pub use footer::{format_template, format_timestamp, render_footer, unescape_newlines};

use crate::error::{GitMetaError, Result};
use chrono::{DateTime, TimeZone};
use std::cell::RefCell;
use std::fmt::Display;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{debug, warn};

/// Writer shared across invocations, typically standard output.
pub type SharedWriter = Rc<RefCell<dyn Write>>;

/// Shared writer wrapping the process's standard output.
pub fn stdout_writer() -> SharedWriter {
    Rc::new(RefCell::new(std::io::stdout()))
}

/// Owned, file-backed sink state.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    encoding: Encoding,
    writer: Option<BufWriter<File>>,
}

/// Destination for generated text.
pub enum OutputSink {
    Shared(SharedWriter),
    File(FileSink),
}

impl OutputSink {
    /// Choose the sink for `output_file`.
    ///
    /// Without a path the caller's shared writer is used. Otherwise missing
    /// parent directories are created and the file is created (truncated).
    ///
    /// # Returns
    ///
    /// * `Err(GitMetaError::Config)` - Unsupported encoding
    /// * `Err(GitMetaError::Output)` - The file or its parents cannot be created
    pub fn open(output_file: Option<&Path>, encoding: &str, shared: &SharedWriter) -> Result<Self> {
        let Some(path) = output_file else {
            debug!("writing output to shared stdout");
            return Ok(OutputSink::Shared(Rc::clone(shared)));
        };

        let encoding: Encoding = encoding.parse()?;
        let path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        let output_error = |source| GitMetaError::Output {
            path: path.clone(),
            source,
        };

        if let Some(parent) = path.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(output_error)?;
        }
        let file = File::create(&path).map_err(output_error)?;

        debug!(path = %path.display(), encoding = %encoding, "opened output file");
        Ok(OutputSink::File(FileSink {
            path,
            encoding,
            writer: Some(BufWriter::new(file)),
        }))
    }

    pub fn is_shared(&self) -> bool {
        matches!(self, OutputSink::Shared(_))
    }

    /// True once a file-backed sink has been closed. Shared sinks never close.
    pub fn is_closed(&self) -> bool {
        match self {
            OutputSink::Shared(_) => false,
            OutputSink::File(sink) => sink.writer.is_none(),
        }
    }

    /// Path of a file-backed sink.
    pub fn path(&self) -> Option<&Path> {
        match self {
            OutputSink::Shared(_) => None,
            OutputSink::File(sink) => Some(&sink.path),
        }
    }

    /// Write `text` as is.
    pub fn write_str(&mut self, text: &str) -> Result<()> {
        match self {
            OutputSink::Shared(writer) => writer.borrow_mut().write_all(text.as_bytes())?,
            OutputSink::File(sink) => {
                let writer = sink.writer.as_mut().ok_or_else(|| {
                    GitMetaError::Write(std::io::Error::other(format!(
                        "output file '{}' is already closed",
                        sink.path.display()
                    )))
                })?;
                writer.write_all(&sink.encoding.encode(text))?;
            }
        }
        Ok(())
    }

    /// Write `line` followed by a line terminator.
    pub fn write_line(&mut self, line: &str) -> Result<()> {
        self.write_str(line)?;
        self.write_str("\n")
    }

    /// Append the rendered footer, if the template is non-empty.
    pub fn footer<Tz>(
        &mut self,
        template: &str,
        version: Option<&str>,
        now: &DateTime<Tz>,
        date_format: &str,
    ) -> Result<()>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        if let Some(footer) = render_footer(template, version, now, date_format)? {
            self.write_line(&footer)?;
        }
        Ok(())
    }

    /// Flush the sink and close it if it is file-backed.
    ///
    /// Idempotent. Errors are logged, not returned.
    pub fn close(&mut self) {
        match self {
            OutputSink::Shared(writer) => {
                if let Err(e) = writer.borrow_mut().flush() {
                    warn!(error = %e, "failed to flush stdout");
                }
            }
            OutputSink::File(sink) => {
                let Some(mut writer) = sink.writer.take() else {
                    return;
                };
                if let Err(e) = writer.flush() {
                    warn!(path = %sink.path.display(), error = %e, "failed to flush output file");
                }
                // Dropping the writer closes the file.
                drop(writer);
                debug!(path = %sink.path.display(), "closed output file");
            }
        }
    }
}

impl std::fmt::Debug for OutputSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputSink::Shared(_) => f.write_str("OutputSink::Shared"),
            OutputSink::File(sink) => f.debug_tuple("OutputSink::File").field(sink).finish(),
        }
    }
}
