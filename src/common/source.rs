use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Represents a single unit of RPAL source code: some text, plus
/// (optionally) the path it was read from.
///
/// A `Source` is held behind an `Rc` everywhere it's used so that
/// `Span`s can cheaply refer back to the text they were lexed from
/// without cloning it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub contents: String,
    pub path: Option<PathBuf>,
}

impl Source {
    /// Reads a `Source` in from a file.
    pub fn path(path: &Path) -> Result<Source, std::io::Error> {
        let contents = fs::read_to_string(path)?;
        Ok(Source { contents, path: Some(path.to_path_buf()) })
    }

    /// Builds a `Source` directly from a string, with no backing file.
    /// Mostly used for tests and the `-ast`/`-st` debug flags.
    pub fn source(contents: &str) -> Source {
        Source { contents: contents.to_string(), path: None }
    }

    pub fn name(&self) -> String {
        match &self.path {
            Some(p) => p.display().to_string(),
            None => "<source>".to_string(),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
