use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

use anyhow::Context as _;

use crate::{
    container::{
        geometry::{FrameGeometry, derive_geometry},
        header::{StreamHeader, parse_header_with_limit},
    },
    encode::sink::RawYuvSink,
    extract::reader::{ExtractOpts, ExtractStats, Y4mExtractor},
    foundation::error::{Y4mError, Y4mResult},
};

/// Options for [`extract_file`].
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ExtractFileOpts {
    pub extract: ExtractOpts,
    /// Replace `out_path` if it already exists.
    pub overwrite: bool,
}

/// Header and derived layout of a Y4M file, without reading any frame.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Probe {
    pub header: StreamHeader,
    pub geometry: FrameGeometry,
}

pub fn ensure_parent_dir(path: &Path) -> Y4mResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Extract `in_path` into a raw `.yuv` file at `out_path`.
///
/// If the header is rejected, the freshly created output file is removed again. Frame-loop errors
/// leave the already written frames in place.
pub fn extract_file(
    in_path: &Path,
    out_path: &Path,
    opts: &ExtractFileOpts,
) -> Y4mResult<ExtractStats> {
    opts.extract.validate()?;

    if !opts.overwrite && out_path.exists() {
        return Err(Y4mError::Other(anyhow::anyhow!(
            "output file '{}' already exists",
            out_path.display()
        )));
    }

    let input = File::open(in_path)
        .with_context(|| format!("failed to open input '{}'", in_path.display()))?;
    ensure_parent_dir(out_path)?;
    let output = File::create(out_path)
        .with_context(|| format!("failed to create output '{}'", out_path.display()))?;

    let sink = RawYuvSink::new(BufWriter::new(output));
    let mut extractor =
        Y4mExtractor::new(BufReader::new(input), sink).with_opts(opts.extract.clone());
    let res = extractor.run();
    drop(extractor);

    if let Err(err) = &res
        && err.is_header_error()
        && let Err(rm_err) = std::fs::remove_file(out_path)
    {
        tracing::warn!(
            path = %out_path.display(),
            error = %rm_err,
            "failed to remove empty output after header error"
        );
    }
    res
}

/// Read only the stream header of `path`.
pub fn probe_file(path: &Path, max_line_len: usize) -> Y4mResult<Probe> {
    let file =
        File::open(path).with_context(|| format!("failed to open input '{}'", path.display()))?;
    let header = parse_header_with_limit(&mut BufReader::new(file), max_line_len)?;
    let geometry = derive_geometry(&header);
    Ok(Probe { header, geometry })
}

#[cfg(test)]
#[path = "../../tests/unit/extract/files.rs"]
mod tests;
