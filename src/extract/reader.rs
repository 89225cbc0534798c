use std::io::{BufRead, BufReader, Read, Write};

use crate::{
    container::{
        geometry::{FrameGeometry, OddDimensionPolicy, derive_geometry},
        header::{Line, StreamHeader, parse_header_with_limit, read_line_bounded},
    },
    encode::sink::{FrameSink, RawYuvSink},
    foundation::{
        core::{DEFAULT_MAX_LINE_LEN, FRAME_MARKER, FrameCount, FrameIndex, SIGNATURE},
        error::{Y4mError, Y4mResult},
    },
};

/// Knobs for a single extraction run.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ExtractOpts {
    /// Handling of dimensions that do not split evenly into 4:2:0 planes.
    pub odd_dimensions: OddDimensionPolicy,
    /// Upper bound in bytes for the header line and each frame marker line.
    pub max_line_len: usize,
}

impl Default for ExtractOpts {
    fn default() -> Self {
        Self {
            odd_dimensions: OddDimensionPolicy::Truncate,
            max_line_len: DEFAULT_MAX_LINE_LEN,
        }
    }
}

impl ExtractOpts {
    pub fn validate(&self) -> Y4mResult<()> {
        let min = SIGNATURE.len() + 1;
        if self.max_line_len < min {
            return Err(Y4mError::Other(anyhow::anyhow!(
                "max_line_len must be at least {min} bytes (got {})",
                self.max_line_len
            )));
        }
        Ok(())
    }
}

/// Summary of a finished run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ExtractStats {
    pub geometry: FrameGeometry,
    pub frames: FrameCount,
    pub bytes_written: u64,
    /// Bytes of a cut-off trailing frame that were dropped, if the input ended mid-frame.
    pub truncated_tail_bytes: Option<u64>,
}

/// Single-pass Y4M demultiplexer.
///
/// Owns the input and the sink for the duration of the run. Frames are handed to the sink one at
/// a time and only once fully buffered, so a sink never sees a partial frame.
pub struct Y4mExtractor<R, S> {
    input: R,
    sink: S,
    opts: ExtractOpts,
}

impl<R: BufRead, S: FrameSink> Y4mExtractor<R, S> {
    pub fn new(input: R, sink: S) -> Self {
        Self {
            input,
            sink,
            opts: ExtractOpts::default(),
        }
    }

    pub fn with_opts(mut self, opts: ExtractOpts) -> Self {
        self.opts = opts;
        self
    }

    pub fn into_parts(self) -> (R, S) {
        (self.input, self.sink)
    }

    /// Parse the header, then copy every complete frame payload to the sink.
    ///
    /// End of input before a marker, or in the middle of a payload, ends the run successfully.
    #[tracing::instrument(skip_all)]
    pub fn run(&mut self) -> Y4mResult<ExtractStats> {
        self.opts.validate()?;
        let limit = self.opts.max_line_len;

        let header = parse_header_with_limit(&mut self.input, limit)?;
        let geometry = derive_geometry(&header);
        self.opts.odd_dimensions.check(&geometry)?;
        self.begin(&header, &geometry)?;

        let mut marker = Vec::new();
        let mut payload = Vec::new();
        let mut frames: FrameCount = 0;
        let mut truncated_tail_bytes = None;

        loop {
            let line = read_line_bounded(&mut self.input, &mut marker, limit)
                .map_err(|e| Y4mError::io(frames, e))?;
            if line == Line::Eof {
                break;
            }
            // A wrong marker wins over a missing newline.
            if !marker.starts_with(FRAME_MARKER) {
                return Err(self.abort(Y4mError::invalid_marker(frames, &marker)));
            }
            if line == Line::Overlong {
                return Err(self.abort(Y4mError::LineTooLong { limit, frames }));
            }

            payload.clear();
            let got = (&mut self.input)
                .take(geometry.frame_size)
                .read_to_end(&mut payload)
                .map_err(|e| Y4mError::io(frames, e))? as u64;
            if got < geometry.frame_size {
                tracing::warn!(
                    frame = frames,
                    got,
                    expected = geometry.frame_size,
                    "input ends inside a frame payload; dropping partial frame"
                );
                truncated_tail_bytes = Some(got);
                break;
            }

            self.sink
                .push_frame(FrameIndex(frames), &payload)
                .map_err(|e| Y4mError::io(frames, e))?;
            frames += 1;
            tracing::trace!(frame = frames - 1, bytes = got, "frame extracted");
        }

        self.sink.end().map_err(|e| Y4mError::io(frames, e))?;

        let stats = ExtractStats {
            geometry,
            frames,
            bytes_written: frames.saturating_mul(geometry.frame_size),
            truncated_tail_bytes,
        };
        tracing::info!(
            frames = stats.frames,
            bytes = stats.bytes_written,
            width = geometry.width,
            height = geometry.height,
            "extraction finished"
        );
        Ok(stats)
    }

    fn begin(&mut self, header: &StreamHeader, geometry: &FrameGeometry) -> Y4mResult<()> {
        self.sink
            .begin(header, geometry)
            .map_err(|e| Y4mError::io(0, e))
    }

    /// Flush what was already written, then hand back `err`.
    fn abort(&mut self, err: Y4mError) -> Y4mError {
        if let Err(flush_err) = self.sink.end() {
            tracing::warn!(error = %flush_err, "failed to flush sink after format error");
        }
        err
    }
}

/// Strip Y4M framing from `input` and write the raw planar stream to `output`.
///
/// Returns the number of complete frames written.
pub fn run_extraction<R: Read, W: Write>(input: R, output: W) -> Y4mResult<FrameCount> {
    let mut extractor = Y4mExtractor::new(BufReader::new(input), RawYuvSink::new(output));
    extractor.run().map(|stats| stats.frames)
}

#[cfg(test)]
#[path = "../../tests/unit/extract/reader.rs"]
mod tests;
