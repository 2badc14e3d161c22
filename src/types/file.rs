//! File handles that open on first use.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Stdin, Stdout, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::ValueHint;

use crate::error::ValueError;
use crate::spec::{ArgSpec, Completer, Converter};
use crate::value::AnyValue;

/// Path that stands for stdin (read modes) or stdout (write modes).
pub const STDIO_PATH: &str = "-";

/// How a [`LazyFile`] is opened: `r`, `w`, `a` or `x`, optionally followed
/// by `b` (accepted, no effect) and `+` (read and write).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileMode {
    kind: ModeKind,
    update: bool,
    binary: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModeKind {
    Read,
    Write,
    Append,
    Exclusive,
}

impl FileMode {
    /// `r`
    pub const READ: FileMode = FileMode::new(ModeKind::Read);
    /// `w`: create or truncate.
    pub const WRITE: FileMode = FileMode::new(ModeKind::Write);
    /// `a`: create or append.
    pub const APPEND: FileMode = FileMode::new(ModeKind::Append);
    /// `x`: create, failing when the file exists.
    pub const EXCLUSIVE: FileMode = FileMode::new(ModeKind::Exclusive);

    const fn new(kind: ModeKind) -> Self {
        Self {
            kind,
            update: false,
            binary: false,
        }
    }

    /// Whether reads are allowed.
    pub fn readable(&self) -> bool {
        self.kind == ModeKind::Read || self.update
    }

    /// Whether writes are allowed.
    pub fn writable(&self) -> bool {
        self.kind != ModeKind::Read || self.update
    }

    fn open_options(&self) -> OpenOptions {
        let mut options = OpenOptions::new();
        options.read(self.readable());
        match self.kind {
            ModeKind::Read => {
                options.write(self.update);
            }
            ModeKind::Write => {
                options.write(true).create(true).truncate(true);
            }
            ModeKind::Append => {
                options.append(true).create(true);
            }
            ModeKind::Exclusive => {
                options.write(true).create_new(true);
            }
        }
        options
    }
}

impl FromStr for FileMode {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let kind = match chars.next() {
            Some('r') => ModeKind::Read,
            Some('w') => ModeKind::Write,
            Some('a') => ModeKind::Append,
            Some('x') => ModeKind::Exclusive,
            _ => return Err(ValueError::new(format!("invalid file mode '{s}'"))),
        };
        let mut mode = FileMode::new(kind);
        for c in chars {
            match c {
                '+' if !mode.update => mode.update = true,
                'b' if !mode.binary => mode.binary = true,
                't' if !mode.binary => {}
                _ => return Err(ValueError::new(format!("invalid file mode '{s}'"))),
            }
        }
        Ok(mode)
    }
}

impl fmt::Display for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            ModeKind::Read => "r",
            ModeKind::Write => "w",
            ModeKind::Append => "a",
            ModeKind::Exclusive => "x",
        };
        f.write_str(kind)?;
        if self.binary {
            f.write_str("b")?;
        }
        if self.update {
            f.write_str("+")?;
        }
        Ok(())
    }
}

#[derive(Debug)]
enum Handle {
    File(File),
    Stdin(Stdin),
    Stdout(Stdout),
}

/// A file reference that is opened by the first read or write.
///
/// Creating one touches nothing on disk, so a write-mode path does not
/// exist (or get truncated) until something is written.
#[derive(Debug)]
pub struct LazyFile {
    path: PathBuf,
    mode: FileMode,
    handle: Option<Handle>,
}

impl LazyFile {
    pub fn new(path: impl Into<PathBuf>, mode: FileMode) -> Self {
        Self {
            path: path.into(),
            mode,
            handle: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mode(&self) -> FileMode {
        self.mode
    }

    /// Whether the underlying file has been opened.
    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    /// Whether this handle stands for stdin/stdout.
    pub fn is_stdio(&self) -> bool {
        self.path.as_os_str() == STDIO_PATH
    }

    fn handle(&mut self) -> io::Result<&mut Handle> {
        if self.handle.is_none() {
            let handle = if self.is_stdio() {
                if self.mode.readable() {
                    Handle::Stdin(io::stdin())
                } else {
                    Handle::Stdout(io::stdout())
                }
            } else {
                Handle::File(self.mode.open_options().open(&self.path)?)
            };
            tracing::debug!(path = %self.path.display(), mode = %self.mode, "Opened lazy file");
            self.handle = Some(handle);
        }
        self.handle
            .as_mut()
            .ok_or_else(|| io::Error::other("file handle missing after open"))
    }

    /// Flush and close. Closing a handle that was never opened does nothing.
    pub fn close(&mut self) -> io::Result<()> {
        match self.handle.take() {
            Some(Handle::File(mut file)) => file.flush(),
            Some(Handle::Stdout(mut out)) => out.flush(),
            Some(Handle::Stdin(_)) | None => Ok(()),
        }
    }
}

impl Read for LazyFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if !self.mode.readable() {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                format!("'{}' is not open for reading", self.path.display()),
            ));
        }
        match self.handle()? {
            Handle::File(file) => file.read(buf),
            Handle::Stdin(stdin) => stdin.read(buf),
            Handle::Stdout(_) => Err(io::Error::from(io::ErrorKind::Unsupported)),
        }
    }
}

impl Write for LazyFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if !self.mode.writable() {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                format!("'{}' is not open for writing", self.path.display()),
            ));
        }
        match self.handle()? {
            Handle::File(file) => file.write(buf),
            Handle::Stdout(out) => out.write(buf),
            Handle::Stdin(_) => Err(io::Error::from(io::ErrorKind::Unsupported)),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.handle {
            Some(Handle::File(file)) => file.flush(),
            Some(Handle::Stdout(out)) => out.flush(),
            Some(Handle::Stdin(_)) | None => Ok(()),
        }
    }
}

/// Spec for a lazily opened file in the given mode.
pub fn lazy_file(mode: FileMode) -> ArgSpec {
    let (metavar, help) = if mode.writable() && !mode.readable() {
        ("OUTFILE", "output file, created on first write ('-' for stdout)")
    } else {
        ("INFILE", "input file, opened on first read ('-' for stdin)")
    };
    ArgSpec::new(Converter::new(move |token| {
        Ok(AnyValue::opaque(LazyFile::new(token, mode)).with_label(token))
    }))
    .metavar(metavar)
    .help(help)
    .completer(Completer::Hint(ValueHint::FilePath))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parsing() {
        assert_eq!("w".parse::<FileMode>().unwrap(), FileMode::WRITE);
        let rw: FileMode = "rb+".parse().unwrap();
        assert!(rw.readable() && rw.writable());
        assert_eq!(rw.to_string(), "rb+");
        assert!("q".parse::<FileMode>().is_err());
        assert!("w++".parse::<FileMode>().is_err());
        assert!("".parse::<FileMode>().is_err());
    }

    #[test]
    fn test_write_mode_creates_on_first_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");

        let mut file = LazyFile::new(&path, FileMode::WRITE);
        assert!(!path.exists());
        assert!(!file.is_open());

        file.write_all(b"hello").unwrap();
        assert!(file.is_open());
        file.close().unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello");
    }

    #[test]
    fn test_close_unopened_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("never.txt");
        let mut file = LazyFile::new(&path, FileMode::WRITE);
        file.close().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_read_only_rejects_write() {
        let mut file = LazyFile::new("/nonexistent/x", FileMode::READ);
        let err = file.write(b"x").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Unsupported);
        assert!(!file.is_open());
    }

    #[test]
    fn test_spec_converter_is_lazy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spec.txt");
        let spec = lazy_file(FileMode::WRITE);
        assert_eq!(spec.metavar.as_deref(), Some("OUTFILE"));

        let token = path.to_string_lossy().into_owned();
        let value = spec.converter.unwrap().convert(&token).unwrap();
        assert!(value.is::<LazyFile>());
        assert!(!path.exists());
    }
}
