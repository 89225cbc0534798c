use std::io::Write;

use crate::container::{geometry::FrameGeometry, header::StreamHeader};
use crate::foundation::core::FrameIndex;

/// Sink contract for consuming frame payloads in stream order.
///
/// Ordering contract: `begin` is called once after the header is parsed, `push_frame` is called
/// with strictly increasing `FrameIndex` values starting at 0, and every payload is exactly
/// `geometry.frame_size` bytes. `end` is called once when the run stops, also after a frame-loop
/// format error, so completed frames can be flushed.
pub trait FrameSink {
    /// Called once before any frames are pushed.
    fn begin(&mut self, header: &StreamHeader, geometry: &FrameGeometry) -> std::io::Result<()>;
    /// Push one complete frame payload.
    fn push_frame(&mut self, idx: FrameIndex, payload: &[u8]) -> std::io::Result<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> std::io::Result<()>;
}

impl<S: FrameSink + ?Sized> FrameSink for &mut S {
    fn begin(&mut self, header: &StreamHeader, geometry: &FrameGeometry) -> std::io::Result<()> {
        (**self).begin(header, geometry)
    }

    fn push_frame(&mut self, idx: FrameIndex, payload: &[u8]) -> std::io::Result<()> {
        (**self).push_frame(idx, payload)
    }

    fn end(&mut self) -> std::io::Result<()> {
        (**self).end()
    }
}

/// Writes payloads back to back: the unwrapped planar YUV stream.
#[derive(Debug)]
pub struct RawYuvSink<W> {
    out: W,
    bytes_written: u64,
}

impl<W: Write> RawYuvSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            bytes_written: 0,
        }
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> FrameSink for RawYuvSink<W> {
    fn begin(&mut self, _header: &StreamHeader, _geometry: &FrameGeometry) -> std::io::Result<()> {
        Ok(())
    }

    fn push_frame(&mut self, _idx: FrameIndex, payload: &[u8]) -> std::io::Result<()> {
        self.out.write_all(payload)?;
        self.bytes_written += payload.len() as u64;
        Ok(())
    }

    fn end(&mut self) -> std::io::Result<()> {
        self.out.flush()
    }
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    header: Option<StreamHeader>,
    geometry: Option<FrameGeometry>,
    frames: Vec<(FrameIndex, Vec<u8>)>,
    ended: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Header captured in `begin`, if any.
    pub fn header(&self) -> Option<&StreamHeader> {
        self.header.as_ref()
    }

    /// Geometry captured in `begin`, if any.
    pub fn geometry(&self) -> Option<FrameGeometry> {
        self.geometry
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[(FrameIndex, Vec<u8>)] {
        &self.frames
    }

    /// All payloads concatenated, i.e. what a [`RawYuvSink`] would have written.
    pub fn concat(&self) -> Vec<u8> {
        self.frames
            .iter()
            .flat_map(|(_, payload)| payload.iter().copied())
            .collect()
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, header: &StreamHeader, geometry: &FrameGeometry) -> std::io::Result<()> {
        self.header = Some(header.clone());
        self.geometry = Some(*geometry);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, payload: &[u8]) -> std::io::Result<()> {
        self.frames.push((idx, payload.to_vec()));
        Ok(())
    }

    fn end(&mut self) -> std::io::Result<()> {
        self.ended = true;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
