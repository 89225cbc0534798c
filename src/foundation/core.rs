/// Literal first token of every Y4M stream header.
pub const SIGNATURE: &[u8] = b"YUV4MPEG2";

/// Literal prefix of every per-frame marker line.
pub const FRAME_MARKER: &[u8] = b"FRAME";

/// Default upper bound (in bytes, newline included) for header and marker lines.
pub const DEFAULT_MAX_LINE_LEN: usize = 4096;

/// Number of frames fully written to a sink.
pub type FrameCount = u64;

/// 0-based position of a frame within the input stream.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

impl std::fmt::Display for FrameIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
