//! Route pattern parsing.
//!
//! A pattern is a `/`-separated list of segments. A segment starting with
//! `:` binds exactly one request segment, a segment starting with `*` binds
//! the rest of the request path.

use thiserror::Error;

/// Errors reported by [`validate_pattern`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    /// Segments were declared after a wildcard and can never be reached.
    #[error("pattern '{pattern}': segment '{segment}' follows wildcard '{wildcard}'")]
    TrailingAfterWildcard {
        pattern: String,
        wildcard: String,
        segment: String,
    },

    /// A `:` parameter with no name.
    #[error("pattern '{0}': parameter segment has no name")]
    UnnamedParam(String),
}

/// Kind of a single pattern segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Literal text, matched exactly.
    Static(&'a str),
    /// `:name`, binds one segment.
    Param(&'a str),
    /// `*name` (or bare `*`), binds the remaining path.
    Wildcard(&'a str),
}

impl<'a> Segment<'a> {
    /// Classify a segment by its leading sigil.
    pub fn classify(part: &'a str) -> Self {
        if let Some(name) = part.strip_prefix(':') {
            Segment::Param(name)
        } else if let Some(name) = part.strip_prefix('*') {
            Segment::Wildcard(name)
        } else {
            Segment::Static(part)
        }
    }

    /// Matching priority at one trie depth; lower is tried first.
    pub(crate) fn priority(self) -> u8 {
        match self {
            Segment::Static(_) => 0,
            Segment::Param(_) => 1,
            Segment::Wildcard(_) => 2,
        }
    }
}

/// Whether a segment is a parameter or wildcard placeholder.
pub fn is_wild(part: &str) -> bool {
    part.starts_with(':') || part.starts_with('*')
}

/// Split a pattern (or request path) into its non-empty segments.
///
/// Scanning stops right after the first wildcard segment: anything declared
/// behind it is dropped.
pub fn parse_pattern(pattern: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    for item in pattern.split('/').filter(|s| !s.is_empty()) {
        parts.push(item);
        if item.starts_with('*') {
            break;
        }
    }
    parts
}

/// Strict check for patterns that [`parse_pattern`] would silently alter.
pub fn validate_pattern(pattern: &str) -> Result<(), PatternError> {
    let mut wildcard: Option<&str> = None;
    for item in pattern.split('/').filter(|s| !s.is_empty()) {
        if let Some(wildcard) = wildcard {
            return Err(PatternError::TrailingAfterWildcard {
                pattern: pattern.to_string(),
                wildcard: wildcard.to_string(),
                segment: item.to_string(),
            });
        }
        match Segment::classify(item) {
            Segment::Param("") => return Err(PatternError::UnnamedParam(pattern.to_string())),
            Segment::Wildcard(_) => wildcard = Some(item),
            _ => {}
        }
    }
    Ok(())
}
