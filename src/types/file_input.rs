//! Line input over a sequence of files.

use std::collections::VecDeque;
use std::convert::Infallible;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use clap::ValueHint;

use crate::error::ValueError;
use crate::spec::{ArgSpec, Completer, Converter, PostProcess};
use crate::types::file::STDIO_PATH;
use crate::value::{AnyValue, ArgValue};

/// Reads the lines of several files in order, opening each one when the
/// previous is exhausted. An empty path list, or the path `-`, reads stdin.
///
/// Yields lines without their terminator. A file that cannot be opened
/// yields one error and is skipped.
pub struct FileInput {
    pending: VecDeque<PathBuf>,
    current: Option<(PathBuf, Box<dyn BufRead + Send + Sync>)>,
    line_number: usize,
    file_line_number: usize,
}

impl FileInput {
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut pending: VecDeque<PathBuf> = paths.into_iter().map(Into::into).collect();
        if pending.is_empty() {
            pending.push_back(PathBuf::from(STDIO_PATH));
        }
        Self {
            pending,
            current: None,
            line_number: 0,
            file_line_number: 0,
        }
    }

    /// Path of the file being read, once reading has started.
    pub fn filename(&self) -> Option<&Path> {
        self.current.as_ref().map(|(path, _)| path.as_path())
    }

    /// Lines read so far across all files.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Lines read so far from the current file.
    pub fn file_line_number(&self) -> usize {
        self.file_line_number
    }

    fn open(path: &Path) -> io::Result<Box<dyn BufRead + Send + Sync>> {
        if path.as_os_str() == STDIO_PATH {
            Ok(Box::new(BufReader::new(io::stdin())))
        } else {
            Ok(Box::new(BufReader::new(File::open(path)?)))
        }
    }
}

impl Iterator for FileInput {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((_, reader)) = self.current.as_mut() {
                let mut line = String::new();
                match reader.read_line(&mut line) {
                    Ok(0) => self.current = None,
                    Ok(_) => {
                        self.line_number += 1;
                        self.file_line_number += 1;
                        let trimmed = line.strip_suffix('\n').unwrap_or(&line);
                        let trimmed = trimmed.strip_suffix('\r').unwrap_or(trimmed);
                        return Some(Ok(trimmed.to_string()));
                    }
                    Err(e) => {
                        self.current = None;
                        return Some(Err(e));
                    }
                }
            }

            let path = self.pending.pop_front()?;
            self.file_line_number = 0;
            match Self::open(&path) {
                Ok(reader) => {
                    tracing::debug!(path = %path.display(), "Reading input file");
                    self.current = Some((path, reader));
                }
                Err(e) => {
                    return Some(Err(io::Error::new(
                        e.kind(),
                        format!("{}: {e}", path.display()),
                    )))
                }
            }
        }
    }
}

impl fmt::Debug for FileInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileInput")
            .field("current", &self.filename())
            .field("pending", &self.pending)
            .field("line_number", &self.line_number)
            .finish()
    }
}

/// Collect the paths of a parsed path list.
fn paths_of(value: &ArgValue) -> Result<Vec<PathBuf>, ValueError> {
    match value {
        ArgValue::Missing => Ok(Vec::new()),
        ArgValue::One(v) => v
            .downcast_ref::<PathBuf>()
            .map(|p| vec![p.clone()])
            .ok_or_else(|| ValueError::new("input files must be paths")),
        ArgValue::List(items) => items.iter().try_fold(Vec::new(), |mut acc, item| {
            acc.extend(paths_of(item)?);
            Ok(acc)
        }),
        ArgValue::Dict(_) => Err(ValueError::new("input files must be paths")),
    }
}

/// Spec for input-file arguments. The parsed paths are replaced by a
/// [`FileInput`] reading them in order.
///
/// Usually declared as a positional with `nargs = *`.
pub fn file_input() -> ArgSpec {
    ArgSpec::new(Converter::parse(|token: &str| {
        Ok::<_, Infallible>(PathBuf::from(token))
    }))
    .names(["infiles"])
    .metavar("INFILE")
    .help("input files ('-' for stdin)")
    .completer(Completer::Hint(ValueHint::FilePath))
    .post_process(PostProcess::new(|value| {
        let paths = paths_of(&value)?;
        Ok(ArgValue::One(AnyValue::opaque(FileInput::new(paths))))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_reads_files_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        std::fs::File::create(&a).unwrap().write_all(b"1\n2\n").unwrap();
        std::fs::File::create(&b).unwrap().write_all(b"3\r\n").unwrap();

        let mut input = FileInput::new([&a, &b]);
        let lines: Vec<String> = input.by_ref().map(Result::unwrap).collect();
        assert_eq!(lines, vec!["1", "2", "3"]);
        assert_eq!(input.line_number(), 3);
    }

    #[test]
    fn test_missing_file_yields_error_then_continues() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.txt");
        std::fs::write(&good, "x\n").unwrap();

        let mut input = FileInput::new([dir.path().join("missing.txt"), good]);
        assert!(input.next().unwrap().is_err());
        assert_eq!(input.next().unwrap().unwrap(), "x");
        assert!(input.next().is_none());
    }

    #[test]
    fn test_post_process_builds_file_input() {
        let spec = file_input();
        let conv = spec.converter.clone().unwrap();
        let list = ArgValue::List(vec![ArgValue::One(conv.convert("a").unwrap())]);
        let out = spec.post_process.unwrap().apply(list).unwrap();
        match out {
            ArgValue::One(v) => assert!(v.is::<FileInput>()),
            other => panic!("unexpected {other:?}"),
        }
    }
}
