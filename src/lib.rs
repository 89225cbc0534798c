//! yuvstrip turns a YUV4MPEG2 (Y4M) stream into the raw planar YUV 4:2:0 stream it wraps.
//!
//! The pipeline is strictly sequential:
//!
//! 1. **Header**: `parse_header` reads the first line, checks the `YUV4MPEG2` signature and picks
//!    up `W`/`H`. Other parameters are kept as ignored tokens.
//! 2. **Geometry**: `derive_geometry` computes the fixed payload size of every frame.
//! 3. **Frames**: `Y4mExtractor::run` reads a `FRAME` marker, buffers one full payload and hands
//!    it to a [`FrameSink`], until the input ends.
//!
//! A cut-off trailing frame and a clean end of input both end a run successfully; malformed
//! markers and I/O failures surface as [`Y4mError`] together with the number of frames already
//! written.
#![forbid(unsafe_code)]

mod container;
mod extract;
mod foundation;

/// Frame sinks consumed by the extractor.
pub mod encode;

pub use container::geometry::{FrameGeometry, OddDimensionPolicy, derive_geometry};
pub use container::header::{
    HeaderToken, StreamHeader, parse_header, parse_header_line, parse_header_with_limit,
};
pub use encode::sink::{FrameSink, InMemorySink, RawYuvSink};
pub use encode::y4m::Y4mSink;
pub use extract::files::{ExtractFileOpts, Probe, ensure_parent_dir, extract_file, probe_file};
pub use extract::reader::{ExtractOpts, ExtractStats, Y4mExtractor, run_extraction};
pub use foundation::core::{
    DEFAULT_MAX_LINE_LEN, FRAME_MARKER, FrameCount, FrameIndex, SIGNATURE,
};
pub use foundation::error::{Y4mError, Y4mResult};
