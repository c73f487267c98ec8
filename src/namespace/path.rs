use std::str::FromStr;

use derive_more::Display;
use snafu::{Snafu, ensure};

const SEPARATOR: char = '/';

/// Absolute path inside a namespace, reduced to its non-empty segments.
///
/// `/a//b/` and `/a/b` parse to the same value. The root path `/` has no
/// segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Display)]
#[display("/{}", segments.join("/"))]
pub struct NamespacePath {
    segments: Vec<String>,
}

impl NamespacePath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Last segment, `None` for the root
    pub fn file_name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// The path made of the first `len` segments
    pub fn prefix(&self, len: usize) -> Self {
        Self {
            segments: self.segments[..len.min(self.segments.len())].to_vec(),
        }
    }
}

/// Parses an absolute path. The empty string is rejected as
/// [`PathParseError::Empty`] rather than read as the root, input not starting
/// with `/` is [`PathParseError::NotAbsolute`], and `/`, `//` and similar
/// resolve to the root.
impl FromStr for NamespacePath {
    type Err = PathParseError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        ensure!(!path.is_empty(), EmptySnafu);
        ensure!(path.starts_with(SEPARATOR), NotAbsoluteSnafu { path });

        let segments = path
            .split(SEPARATOR)
            .filter(|segment| !segment.is_empty())
            .map(str::to_owned)
            .collect();

        Ok(Self { segments })
    }
}

impl TryFrom<&str> for NamespacePath {
    type Error = PathParseError;

    fn try_from(path: &str) -> Result<Self, Self::Error> {
        path.parse()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum PathParseError {
    #[snafu(display("Path is empty"))]
    Empty,
    #[snafu(display("Path '{}' is not absolute", path))]
    NotAbsolute { path: String },
}
