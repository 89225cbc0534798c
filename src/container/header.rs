use std::io::{BufRead, Read};

use crate::foundation::{
    core::{DEFAULT_MAX_LINE_LEN, SIGNATURE},
    error::{Y4mError, Y4mResult},
};

/// One whitespace-separated parameter of the stream header, in input order.
///
/// Only `W` and `H` are interpreted. Every other token is kept verbatim as [`HeaderToken::Ignored`]
/// so it can be reported or written back out unchanged.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderToken {
    Width(u32),
    Height(u32),
    Ignored(String),
}

impl HeaderToken {
    /// Leading tag character of the token (`'W'`, `'H'`, `'F'`, `'C'`, ...).
    pub fn tag(&self) -> Option<char> {
        match self {
            Self::Width(_) => Some('W'),
            Self::Height(_) => Some('H'),
            Self::Ignored(raw) => raw.chars().next(),
        }
    }

    fn write_to(&self, out: &mut Vec<u8>) {
        match self {
            Self::Width(v) => out.extend_from_slice(format!("W{v}").as_bytes()),
            Self::Height(v) => out.extend_from_slice(format!("H{v}").as_bytes()),
            Self::Ignored(raw) => out.extend_from_slice(raw.as_bytes()),
        }
    }
}

/// Parsed first line of a Y4M stream. Immutable once parsed.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StreamHeader {
    pub width: u32,
    pub height: u32,
    /// All parameters after the signature, including the `W`/`H` tokens.
    pub tokens: Vec<HeaderToken>,
}

impl StreamHeader {
    /// Minimal header carrying only the dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            tokens: vec![HeaderToken::Width(width), HeaderToken::Height(height)],
        }
    }

    /// Append an uninterpreted parameter (e.g. `F25:1`, `C420jpeg`).
    pub fn with_param(mut self, raw: impl Into<String>) -> Self {
        self.tokens.push(HeaderToken::Ignored(raw.into()));
        self
    }

    pub fn ignored(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().filter_map(|t| match t {
            HeaderToken::Ignored(raw) => Some(raw.as_str()),
            _ => None,
        })
    }

    /// Serialize back into a header line, trailing newline included.
    pub fn to_line(&self) -> Vec<u8> {
        let mut out = SIGNATURE.to_vec();
        for token in &self.tokens {
            out.push(b' ');
            token.write_to(&mut out);
        }
        out.push(b'\n');
        out
    }
}

/// Outcome of [`read_line_bounded`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Line {
    /// Nothing left to read.
    Eof,
    /// `buf` holds one line without its newline. The last line of a stream may lack one.
    Complete,
    /// `limit` bytes were consumed without finding a newline, and more input follows.
    Overlong,
}

pub(crate) fn read_line_bounded<R: BufRead>(
    input: &mut R,
    buf: &mut Vec<u8>,
    limit: usize,
) -> std::io::Result<Line> {
    buf.clear();
    let n = input.by_ref().take(limit as u64).read_until(b'\n', buf)?;
    if n == 0 {
        return Ok(Line::Eof);
    }
    if buf.last() == Some(&b'\n') {
        buf.pop();
        return Ok(Line::Complete);
    }
    // A full-length line is only complete if nothing follows it.
    if n >= limit && !input.fill_buf()?.is_empty() {
        Ok(Line::Overlong)
    } else {
        Ok(Line::Complete)
    }
}

/// Read and parse the stream header (first line) from `input`.
pub fn parse_header<R: BufRead>(input: &mut R) -> Y4mResult<StreamHeader> {
    parse_header_with_limit(input, DEFAULT_MAX_LINE_LEN)
}

/// [`parse_header`] with an explicit line length bound.
pub fn parse_header_with_limit<R: BufRead>(
    input: &mut R,
    limit: usize,
) -> Y4mResult<StreamHeader> {
    let mut line = Vec::new();
    let read = read_line_bounded(input, &mut line, limit).map_err(Y4mError::header_io)?;

    // A missing signature wins over a missing newline.
    if !has_signature(&line) {
        return Err(Y4mError::InvalidSignature);
    }
    if read == Line::Overlong {
        return Err(Y4mError::HeaderTooLong { limit });
    }

    let header = parse_header_line(&line)?;
    tracing::debug!(
        width = header.width,
        height = header.height,
        ignored = header.ignored().count(),
        "parsed y4m stream header"
    );
    Ok(header)
}

/// Parse a header line that has already been read (newline optional).
pub fn parse_header_line(line: &[u8]) -> Y4mResult<StreamHeader> {
    let mut parts = line
        .split(|b| b.is_ascii_whitespace())
        .filter(|p| !p.is_empty());

    if !has_signature(line) || parts.next() != Some(SIGNATURE) {
        return Err(Y4mError::InvalidSignature);
    }

    let mut width = None;
    let mut height = None;
    let mut tokens = Vec::new();

    for part in parts {
        let token = match part.split_first() {
            Some((b'W', digits)) => {
                let v = parse_dimension('W', digits)?;
                width = Some(v);
                HeaderToken::Width(v)
            }
            Some((b'H', digits)) => {
                let v = parse_dimension('H', digits)?;
                height = Some(v);
                HeaderToken::Height(v)
            }
            _ => HeaderToken::Ignored(String::from_utf8_lossy(part).into_owned()),
        };
        tokens.push(token);
    }

    match (width, height) {
        (Some(width), Some(height)) => Ok(StreamHeader {
            width,
            height,
            tokens,
        }),
        (width, height) => Err(Y4mError::MissingDimensions {
            width_missing: width.is_none(),
            height_missing: height.is_none(),
        }),
    }
}

fn has_signature(line: &[u8]) -> bool {
    line.starts_with(SIGNATURE)
        && line
            .get(SIGNATURE.len())
            .is_none_or(|b| b.is_ascii_whitespace())
}

fn parse_dimension(tag: char, digits: &[u8]) -> Y4mResult<u32> {
    let malformed = || Y4mError::MalformedDimension {
        tag,
        value: String::from_utf8_lossy(digits).into_owned(),
    };

    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return Err(malformed());
    }
    let text = std::str::from_utf8(digits).map_err(|_| malformed())?;
    match text.parse::<u32>() {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(malformed()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/container/header.rs"]
mod tests;
