use std::borrow::Cow;

use percent_encoding::percent_decode_str;

use crate::error::RouteError;

/// How a single path segment matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// Matches by exact string equality.
    Static,
    /// `:name`, matches any one segment.
    Param,
    /// `*name`, matches the rest of the path.
    CatchAll,
}

impl SegmentKind {
    pub fn of(segment: &str) -> SegmentKind {
        if segment.starts_with(':') {
            SegmentKind::Param
        } else if segment.starts_with('*') {
            SegmentKind::CatchAll
        } else {
            SegmentKind::Static
        }
    }

    pub fn is_wild(self) -> bool {
        self != SegmentKind::Static
    }
}

/// Splits a path on `/`, dropping empty tokens so leading, trailing and
/// repeated slashes are ignored.
pub fn split(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Splits a request path like [`split`], then percent-decodes each segment.
///
/// Decoding after the split keeps an encoded `%2F` inside its segment.
pub fn split_decoded(path: &str) -> Vec<Cow<'_, str>> {
    split(path)
        .into_iter()
        .map(|s| percent_decode_str(s).decode_utf8_lossy())
        .collect()
}

/// Splits a route pattern into segments, rejecting a catch-all anywhere but
/// the end.
pub fn parse_pattern(pattern: &str) -> Result<Vec<&str>, RouteError> {
    let segments = split(pattern);
    let last = segments.len().saturating_sub(1);
    if segments
        .iter()
        .enumerate()
        .any(|(i, s)| i != last && SegmentKind::of(s) == SegmentKind::CatchAll)
    {
        return Err(RouteError::CatchAllNotLast(pattern.to_string()));
    }
    Ok(segments)
}
