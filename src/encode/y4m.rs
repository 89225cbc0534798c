use std::io::Write;

use crate::container::{geometry::FrameGeometry, header::StreamHeader};
use crate::foundation::core::{FRAME_MARKER, FrameIndex};

/// Writes a Y4M container: the header line, then `FRAME\n` before every payload.
///
/// Only the tokens kept in [`StreamHeader::tokens`] are written back, so the frame region is
/// reproduced byte for byte while the header may differ from the original text (per-frame
/// marker parameters are not carried).
#[derive(Debug)]
pub struct Y4mSink<W> {
    out: W,
}

impl<W: Write> Y4mSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> super::sink::FrameSink for Y4mSink<W> {
    fn begin(&mut self, header: &StreamHeader, _geometry: &FrameGeometry) -> std::io::Result<()> {
        self.out.write_all(&header.to_line())
    }

    fn push_frame(&mut self, _idx: FrameIndex, payload: &[u8]) -> std::io::Result<()> {
        self.out.write_all(FRAME_MARKER)?;
        self.out.write_all(b"\n")?;
        self.out.write_all(payload)
    }

    fn end(&mut self) -> std::io::Result<()> {
        self.out.flush()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/y4m.rs"]
mod tests;
