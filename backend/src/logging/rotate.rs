//! Date-rotating file sink.
//!
//! Files are named `YYYYMMDD.<suffix>` under the log directory and roll over
//! lazily: the first write after local midnight opens the new day's file.
//! Nothing renames or truncates, so restarting mid-day appends to the
//! existing file.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Local, NaiveDate};
use tracing_subscriber::fmt::MakeWriter;

/// Sink writing to one dated file per local day.
pub struct RotatingFileWriter {
    dir: PathBuf,
    suffix: String,
    inner: Mutex<Inner>,
}

struct Inner {
    file: Option<File>,
    day: Option<NaiveDate>,
}

impl RotatingFileWriter {
    /// Sink writing `YYYYMMDD.<suffix>` files under `dir`.
    ///
    /// The directory must already exist; the current day's file is opened on
    /// first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, suffix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            suffix: suffix.into(),
            inner: Mutex::new(Inner {
                file: None,
                day: None,
            }),
        }
    }

    /// Path of the file serving the given day.
    #[must_use]
    pub fn path_for(&self, day: NaiveDate) -> PathBuf {
        self.dir
            .join(format!("{}.{}", day.format("%Y%m%d"), self.suffix))
    }

    /// Write with an explicit clock; the seam the rotation tests use.
    pub fn write_with_now(&self, buf: &[u8], now: DateTime<Local>) -> io::Result<usize> {
        let day = now.date_naive();
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| io::Error::other("log sink lock poisoned"))?;
        if inner.day != Some(day) || inner.file.is_none() {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(self.path_for(day))?;
            inner.file = Some(file);
            inner.day = Some(day);
        }
        match inner.file.as_mut() {
            Some(file) => file.write(buf),
            None => Ok(0),
        }
    }

    fn flush_inner(&self) -> io::Result<()> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| io::Error::other("log sink lock poisoned"))?;
        match inner.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

/// Borrowed write handle handed out per event.
pub struct RotatingHandle<'a>(&'a RotatingFileWriter);

impl Write for RotatingHandle<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.write_with_now(buf, Local::now())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush_inner()
    }
}

impl<'a> MakeWriter<'a> for RotatingFileWriter {
    type Writer = RotatingHandle<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        RotatingHandle(self)
    }
}

/// Ensure the log directory exists.
pub fn prepare_dir(dir: &Path) -> io::Result<()> {
    std::fs::create_dir_all(dir)
}
