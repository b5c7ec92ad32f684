//! `Range` header handling: parsing against a known object size,
//! satisfiability checks and chunk capping.
//!
//! Everything here is pure; nothing touches the network.

use std::fmt;

const BYTES_UNIT: &str = "bytes=";

/// Inclusive byte window in absolute offsets into an object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    /// Number of bytes covered, or 0 for an inverted range.
    pub fn len(&self) -> u64 {
        if self.end < self.start {
            0
        } else {
            self.end - self.start + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A range is serviceable iff `start < size`, `end < size` and `start <= end`.
    pub fn is_satisfiable(&self, total_size: u64) -> bool {
        self.start < total_size && self.end < total_size && self.start <= self.end
    }

    /// Shrink the range so it spans at most `chunk_size` bytes from `start`.
    pub fn capped(&self, chunk_size: u64) -> Self {
        let chunk_size = chunk_size.max(1);
        let chunk_end = self.start.saturating_add(chunk_size - 1);
        Self {
            start: self.start,
            end: self.end.min(chunk_end),
        }
    }

    /// `Content-Range` value for a 206 response.
    pub fn content_range(&self, total_size: u64) -> String {
        format!("bytes {}-{}/{}", self.start, self.end, total_size)
    }

    /// `Range` value for the upstream request.
    pub fn to_header_value(&self) -> String {
        format!("bytes={}-{}", self.start, self.end)
    }
}

impl fmt::Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// `Content-Range` value for a 416 response.
pub fn unsatisfied_content_range(total_size: u64) -> String {
    format!("bytes */{}", total_size)
}

/// Outcome of reading a client's `Range` header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeRequest {
    /// No header: the whole object was asked for.
    Absent,
    /// A header was sent but could not be read. Served like `Absent`.
    Malformed,
    /// A parsed range, not yet checked for satisfiability.
    Range(ByteRange),
}

impl RangeRequest {
    /// Parse `header` against an object of `total_size` bytes.
    ///
    /// Accepted forms are `bytes=a-b`, `bytes=a-` and `bytes=-n`. A closed
    /// range has its end clamped to the last byte. Only the first range of a
    /// multi-range header is read.
    pub fn parse(header: Option<&str>, total_size: u64) -> Self {
        let Some(header) = header else {
            return RangeRequest::Absent;
        };

        match parse_spec(header, total_size) {
            Some(range) => RangeRequest::Range(range),
            None => RangeRequest::Malformed,
        }
    }

    /// The requested range, if one was successfully parsed.
    pub fn range(&self) -> Option<ByteRange> {
        match self {
            RangeRequest::Range(range) => Some(*range),
            RangeRequest::Absent | RangeRequest::Malformed => None,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, RangeRequest::Malformed)
    }
}

fn parse_spec(header: &str, total_size: u64) -> Option<ByteRange> {
    let header = header.trim();
    let unit = header.get(..BYTES_UNIT.len())?;
    if !unit.eq_ignore_ascii_case(BYTES_UNIT) {
        return None;
    }

    let first = header[BYTES_UNIT.len()..].split(',').next()?.trim();
    let (start, end) = first.split_once('-')?;
    let (start, end) = (start.trim(), end.trim());
    let last_byte = total_size.saturating_sub(1);

    if start.is_empty() {
        // suffix form: the last `n` bytes
        let suffix = parse_offset(end)?;
        return Some(ByteRange::new(total_size.saturating_sub(suffix), last_byte));
    }

    let start = parse_offset(start)?;
    let end = if end.is_empty() {
        last_byte
    } else {
        parse_offset(end)?.min(last_byte)
    };

    Some(ByteRange::new(start, end))
}

fn parse_offset(raw: &str) -> Option<u64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}
