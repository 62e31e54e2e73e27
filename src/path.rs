//! Entity paths in dot notation (`author.profile.bio`) and their HTML form
//! encoding in bracket notation (`author[profile][bio]`).

use crate::errors::PanelError;
use std::fmt;

/// A validated, non-empty dotted path of relation and attribute names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityPath {
    segments: Vec<String>,
}

impl EntityPath {
    /// Parse a dotted path.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::InvalidPath`] for an empty path or a path with an
    /// empty segment (`a..b`, `.a`, `a.`).
    pub fn parse(path: &str) -> Result<Self, PanelError> {
        if path.trim().is_empty() {
            return Err(PanelError::invalid_path(path, "path is empty"));
        }

        let segments: Vec<String> = path.split('.').map(str::to_string).collect();
        if let Some(position) = segments.iter().position(|s| s.trim().is_empty()) {
            return Err(PanelError::invalid_path(
                path,
                format!("segment {} is empty", position + 1),
            ));
        }

        Ok(Self { segments })
    }

    /// Decode an HTML bracket name (`a[b][c]`) into a path.
    ///
    /// The array suffix `[]` carries no segment and is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::InvalidPath`] when nothing but brackets remain.
    pub fn from_bracket_notation(name: &str) -> Result<Self, PanelError> {
        Self::parse(&square_brackets_to_dots(name))
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false; a parsed path has at least one segment.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    #[must_use]
    pub fn is_nested(&self) -> bool {
        self.segments.len() > 1
    }

    #[must_use]
    pub fn first(&self) -> &str {
        &self.segments[0]
    }

    #[must_use]
    pub fn last(&self) -> &str {
        &self.segments[self.segments.len() - 1]
    }

    /// The path without its last segment, `None` for a single segment.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.is_nested() {
            Some(Self {
                segments: self.segments[..self.segments.len() - 1].to_vec(),
            })
        } else {
            None
        }
    }

    /// Encode as an HTML input name: `a.b.c` becomes `a[b][c]`.
    #[must_use]
    pub fn to_bracket_notation(&self) -> String {
        let mut name = self.segments[0].clone();
        for segment in &self.segments[1..] {
            name.push('[');
            name.push_str(segment);
            name.push(']');
        }
        name
    }
}

impl fmt::Display for EntityPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

impl std::str::FromStr for EntityPath {
    type Err = PanelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Convert an HTML bracket name into dot notation.
///
/// Splits on `[`, strips `]` from every chunk and joins with `.`. Chunks that
/// end up empty (the `[]` array suffix) are skipped. Names without brackets
/// come back unchanged.
///
/// - `"parent[child][grandchild]"` -> `"parent.child.grandchild"`
/// - `"tags[]"` -> `"tags"`
/// - `"a[][b]"` -> `"a.b"`
#[must_use]
pub fn square_brackets_to_dots(name: &str) -> String {
    if !contains_brackets(name) {
        return name.to_string();
    }

    name.split('[')
        .map(|chunk| chunk.replace(']', ""))
        .filter(|chunk| !chunk.is_empty())
        .collect::<Vec<_>>()
        .join(".")
}

/// Convert dot notation into an HTML bracket name.
#[must_use]
pub fn dots_to_square_brackets(path: &str) -> String {
    let mut parts = path.split('.');
    let mut name = parts.next().unwrap_or_default().to_string();
    for part in parts {
        name.push('[');
        name.push_str(part);
        name.push(']');
    }
    name
}

pub(crate) fn contains_brackets(name: &str) -> bool {
    name.contains(['[', ']'])
}
