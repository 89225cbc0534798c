use crate::foundation::core::FrameCount;

/// Convenience alias used across the crate.
pub type Y4mResult<T> = Result<T, Y4mError>;

/// Everything that can stop a header parse or an extraction run.
///
/// Header variants are raised before any frame is read. Frame-loop variants carry the number of
/// frames already handed to the sink; those frames are never rolled back.
#[derive(thiserror::Error, Debug)]
pub enum Y4mError {
    #[error("invalid signature: input does not start with YUV4MPEG2")]
    InvalidSignature,

    #[error("missing dimensions: stream header has no {}", missing_label(.width_missing, .height_missing))]
    MissingDimensions {
        width_missing: bool,
        height_missing: bool,
    },

    #[error("malformed dimension: '{tag}{value}' is not a positive integer")]
    MalformedDimension { tag: char, value: String },

    #[error("odd dimensions: {width}x{height} cannot be split into 4:2:0 planes exactly")]
    OddDimensions { width: u32, height: u32 },

    #[error("header too long: no newline within {limit} bytes")]
    HeaderTooLong { limit: usize },

    #[error("line too long: frame marker has no newline within {limit} bytes (after {frames} frame(s))")]
    LineTooLong { limit: usize, frames: FrameCount },

    #[error("invalid frame marker after {frames} frame(s): expected FRAME, got '{marker}'")]
    InvalidFrameMarker { frames: FrameCount, marker: String },

    #[error("io failure after {frames} frame(s): {source}")]
    IoFailure {
        frames: FrameCount,
        /// Raised while reading the stream header, before the sink saw anything.
        during_header: bool,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn missing_label(width_missing: &bool, height_missing: &bool) -> &'static str {
    match (*width_missing, *height_missing) {
        (true, true) => "width (W) or height (H)",
        (true, false) => "width (W)",
        _ => "height (H)",
    }
}

impl Y4mError {
    pub fn io(frames: FrameCount, source: std::io::Error) -> Self {
        Self::IoFailure {
            frames,
            during_header: false,
            source,
        }
    }

    pub fn header_io(source: std::io::Error) -> Self {
        Self::IoFailure {
            frames: 0,
            during_header: true,
            source,
        }
    }

    pub fn invalid_marker(frames: FrameCount, line: &[u8]) -> Self {
        const SHOWN: usize = 32;
        let shown = &line[..line.len().min(SHOWN)];
        Self::InvalidFrameMarker {
            frames,
            marker: String::from_utf8_lossy(shown).trim_end().to_string(),
        }
    }

    /// Frames fully written before this error was raised.
    pub fn frames_completed(&self) -> FrameCount {
        match self {
            Self::LineTooLong { frames, .. }
            | Self::InvalidFrameMarker { frames, .. }
            | Self::IoFailure { frames, .. } => *frames,
            _ => 0,
        }
    }

    /// `true` for errors detected while reading the stream header.
    pub fn is_header_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidSignature
                | Self::MissingDimensions { .. }
                | Self::MalformedDimension { .. }
                | Self::OddDimensions { .. }
                | Self::HeaderTooLong { .. }
                | Self::IoFailure {
                    during_header: true,
                    ..
                }
        )
    }

    /// Short stable name of the error kind, for machine-readable reports.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::InvalidSignature => "InvalidSignature",
            Self::MissingDimensions { .. } => "MissingDimensions",
            Self::MalformedDimension { .. } => "MalformedDimension",
            Self::OddDimensions { .. } => "OddDimensions",
            Self::HeaderTooLong { .. } => "HeaderTooLong",
            Self::LineTooLong { .. } => "LineTooLong",
            Self::InvalidFrameMarker { .. } => "InvalidFrameMarker",
            Self::IoFailure { .. } => "IoFailure",
            Self::Other(_) => "Other",
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
