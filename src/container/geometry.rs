use crate::{
    container::header::StreamHeader,
    foundation::error::{Y4mError, Y4mResult},
};

/// Byte layout of one 4:2:0 frame payload, derived once from the header.
///
/// Chroma planes are `luma_size / 4` bytes each (integer division), so odd dimensions yield a
/// slightly short chroma plane. Sizes saturate at `u64::MAX` rather than wrap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct FrameGeometry {
    pub width: u32,
    pub height: u32,
    pub luma_size: u64,
    pub chroma_plane_size: u64,
    pub frame_size: u64,
}

impl FrameGeometry {
    pub fn new(width: u32, height: u32) -> Self {
        let luma_size = u64::from(width) * u64::from(height);
        let chroma_plane_size = luma_size / 4;
        Self {
            width,
            height,
            luma_size,
            chroma_plane_size,
            frame_size: luma_size.saturating_add(chroma_plane_size.saturating_mul(2)),
        }
    }

    /// `true` when both dimensions are even, i.e. the chroma planes hold exactly
    /// `(width / 2) * (height / 2)` samples.
    pub fn is_exact(&self) -> bool {
        self.width.is_multiple_of(2) && self.height.is_multiple_of(2)
    }

    /// Split one payload into its Y, U and V planes.
    ///
    /// Returns `None` if `payload` is not exactly `frame_size` bytes long.
    pub fn planes<'a>(&self, payload: &'a [u8]) -> Option<(&'a [u8], &'a [u8], &'a [u8])> {
        if payload.len() as u64 != self.frame_size {
            return None;
        }
        let luma = usize::try_from(self.luma_size).ok()?;
        let chroma = usize::try_from(self.chroma_plane_size).ok()?;
        let (y, rest) = payload.split_at(luma);
        let (u, v) = rest.split_at(chroma);
        Some((y, u, v))
    }
}

/// Derive the per-frame layout from a parsed header. Never fails.
pub fn derive_geometry(header: &StreamHeader) -> FrameGeometry {
    FrameGeometry::new(header.width, header.height)
}

/// What to do with dimensions that cannot be split into 4:2:0 planes exactly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OddDimensionPolicy {
    /// Keep the truncated chroma size and log a warning.
    #[default]
    Truncate,
    /// Fail with [`Y4mError::OddDimensions`] before any frame is read.
    Reject,
}

impl OddDimensionPolicy {
    pub fn check(self, geometry: &FrameGeometry) -> Y4mResult<()> {
        if geometry.is_exact() {
            return Ok(());
        }
        match self {
            Self::Truncate => {
                tracing::warn!(
                    width = geometry.width,
                    height = geometry.height,
                    chroma_plane_size = geometry.chroma_plane_size,
                    "odd dimensions; chroma plane size truncated"
                );
                Ok(())
            }
            Self::Reject => Err(Y4mError::OddDimensions {
                width: geometry.width,
                height: geometry.height,
            }),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/container/geometry.rs"]
mod tests;
