use std::io::Cursor;

use super::*;
use crate::encode::sink::InMemorySink;

const HEADER: &[u8] = b"YUV4MPEG2 W4 H2 F25:1\n";

fn stream(frames: &[&[u8]]) -> Vec<u8> {
    let mut out = HEADER.to_vec();
    for payload in frames {
        out.extend_from_slice(b"FRAME\n");
        out.extend_from_slice(payload);
    }
    out
}

fn extract(input: Vec<u8>) -> (Y4mResult<ExtractStats>, InMemorySink) {
    let mut ex = Y4mExtractor::new(Cursor::new(input), InMemorySink::new());
    let res = ex.run();
    (res, ex.into_parts().1)
}

/// Sink whose writes fail after `ok_frames` frames.
struct FailingSink {
    ok_frames: usize,
    pushed: usize,
}

impl FrameSink for FailingSink {
    fn begin(&mut self, _: &StreamHeader, _: &FrameGeometry) -> std::io::Result<()> {
        Ok(())
    }

    fn push_frame(&mut self, _: FrameIndex, _: &[u8]) -> std::io::Result<()> {
        if self.pushed == self.ok_frames {
            return Err(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "sink closed",
            ));
        }
        self.pushed += 1;
        Ok(())
    }

    fn end(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn single_frame_is_extracted() {
    let payload: Vec<u8> = (0..12).collect();
    let mut out = Vec::new();
    let n = run_extraction(Cursor::new(stream(&[&payload[..]])), &mut out).unwrap();
    assert_eq!(n, 1);
    assert_eq!(out, payload);
}

#[test]
fn two_frames_are_written_in_marker_order() {
    let a = [0xAAu8; 12];
    let b = [0xBBu8; 12];
    let mut out = Vec::new();
    let n = run_extraction(Cursor::new(stream(&[&a[..], &b[..]])), &mut out).unwrap();
    assert_eq!(n, 2);
    assert_eq!(out.len(), 24);
    assert_eq!(&out[..12], &a);
    assert_eq!(&out[12..], &b);
}

#[test]
fn every_payload_has_frame_size_bytes() {
    let frames: Vec<Vec<u8>> = (0..5u8).map(|i| vec![i; 12]).collect();
    let refs: Vec<&[u8]> = frames.iter().map(Vec::as_slice).collect();
    let (res, sink) = extract(stream(&refs));

    let stats = res.unwrap();
    assert_eq!(stats.frames, 5);
    assert_eq!(stats.bytes_written, 60);
    assert_eq!(stats.truncated_tail_bytes, None);
    assert!(sink.is_ended());
    for (i, (idx, payload)) in sink.frames().iter().enumerate() {
        assert_eq!(*idx, FrameIndex(i as u64));
        assert_eq!(payload.len() as u64, stats.geometry.frame_size);
    }
}

#[test]
fn header_only_yields_zero_frames() {
    let (res, sink) = extract(HEADER.to_vec());
    let stats = res.unwrap();
    assert_eq!(stats.frames, 0);
    assert!(sink.frames().is_empty());
    assert_eq!(sink.geometry(), Some(FrameGeometry::new(4, 2)));
}

#[test]
fn truncated_trailing_frame_is_dropped_without_error() {
    let mut input = stream(&[&[1u8; 12][..], &[2u8; 12][..]]);
    input.extend_from_slice(b"FRAME\n");
    input.extend_from_slice(&[3u8; 5]);

    let (res, sink) = extract(input);
    let stats = res.unwrap();
    assert_eq!(stats.frames, 2);
    assert_eq!(stats.truncated_tail_bytes, Some(5));
    assert_eq!(sink.concat().len(), 24);
}

#[test]
fn marker_at_end_of_input_without_payload_is_not_a_frame() {
    let mut input = stream(&[&[1u8; 12][..]]);
    input.extend_from_slice(b"FRAME");

    let (res, _) = extract(input);
    let stats = res.unwrap();
    assert_eq!(stats.frames, 1);
    assert_eq!(stats.truncated_tail_bytes, Some(0));
}

#[test]
fn marker_parameters_are_ignored() {
    let mut input = HEADER.to_vec();
    input.extend_from_slice(b"FRAME Ip XYSCSS=420JPEG\n");
    input.extend_from_slice(&[4u8; 12]);

    let (res, sink) = extract(input);
    assert_eq!(res.unwrap().frames, 1);
    assert_eq!(sink.concat(), vec![4u8; 12]);
}

#[test]
fn bad_marker_stops_the_run_and_keeps_earlier_frames() {
    let mut input = stream(&[&[1u8; 12][..]]);
    input.extend_from_slice(b"FRAMX\n");
    input.extend_from_slice(&[2u8; 12]);

    let (res, sink) = extract(input);
    let err = res.unwrap_err();
    assert!(matches!(err, Y4mError::InvalidFrameMarker { frames: 1, .. }));
    assert_eq!(err.frames_completed(), 1);
    assert_eq!(sink.frames().len(), 1);
    assert!(sink.is_ended());
}

#[test]
fn blank_line_where_marker_expected_is_invalid() {
    let mut input = HEADER.to_vec();
    input.extend_from_slice(b"\n");

    let (res, _) = extract(input);
    assert!(matches!(
        res.unwrap_err(),
        Y4mError::InvalidFrameMarker { frames: 0, .. }
    ));
}

#[test]
fn overlong_marker_line_is_rejected() {
    let mut input = stream(&[&[1u8; 12][..]]);
    input.extend_from_slice(b"FRAME ");
    input.extend(std::iter::repeat_n(b'X', 100));

    let mut ex = Y4mExtractor::new(Cursor::new(input), InMemorySink::new()).with_opts(
        ExtractOpts {
            max_line_len: 64,
            ..ExtractOpts::default()
        },
    );
    let err = ex.run().unwrap_err();
    assert!(matches!(
        err,
        Y4mError::LineTooLong {
            limit: 64,
            frames: 1
        }
    ));
}

#[test]
fn undersized_header_runs_into_payload_as_invalid_marker() {
    // W4 H2 declares 12-byte frames; the real payload keeps going without a newline.
    let mut input = HEADER.to_vec();
    input.extend_from_slice(b"FRAME\n");
    input.extend(std::iter::repeat_n(0x10u8, 5000));

    let (res, sink) = extract(input);
    let err = res.unwrap_err();
    assert!(
        matches!(err, Y4mError::InvalidFrameMarker { frames: 1, .. }),
        "got {err}"
    );
    assert_eq!(sink.frames().len(), 1);
    assert!(sink.is_ended());
}

#[test]
fn header_read_failure_is_a_header_error() {
    struct BrokenReader;

    impl Read for BrokenReader {
        fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("device gone"))
        }
    }

    let mut ex = Y4mExtractor::new(BufReader::new(BrokenReader), InMemorySink::new());
    let err = ex.run().unwrap_err();
    assert!(matches!(
        err,
        Y4mError::IoFailure {
            frames: 0,
            during_header: true,
            ..
        }
    ));
    assert!(err.is_header_error());
    assert!(ex.into_parts().1.geometry().is_none());
}

#[test]
fn missing_signature_writes_nothing() {
    let input = b"YUV4MPEG W4 H2\nFRAME\n000000000000".to_vec();
    let mut out = Vec::new();
    let err = run_extraction(Cursor::new(input), &mut out).unwrap_err();
    assert!(matches!(err, Y4mError::InvalidSignature));
    assert_eq!(err.frames_completed(), 0);
    assert!(out.is_empty());
}

#[test]
fn header_errors_never_reach_the_sink() {
    let (res, sink) = extract(b"YUV4MPEG2 W4\nFRAME\n".to_vec());
    assert!(res.unwrap_err().is_header_error());
    assert!(sink.geometry().is_none());
    assert!(!sink.is_ended());
}

#[test]
fn strict_policy_rejects_odd_dimensions() {
    let mut input = b"YUV4MPEG2 W3 H3\nFRAME\n".to_vec();
    input.extend_from_slice(&[0u8; 13]);

    let (res, _) = extract(input.clone());
    assert_eq!(res.unwrap().frames, 1);

    let mut ex = Y4mExtractor::new(Cursor::new(input), InMemorySink::new()).with_opts(
        ExtractOpts {
            odd_dimensions: OddDimensionPolicy::Reject,
            ..ExtractOpts::default()
        },
    );
    assert!(matches!(
        ex.run().unwrap_err(),
        Y4mError::OddDimensions {
            width: 3,
            height: 3
        }
    ));
}

#[test]
fn sink_failure_reports_completed_frames() {
    let input = stream(&[&[1u8; 12][..], &[2u8; 12][..], &[3u8; 12][..]]);
    let mut ex = Y4mExtractor::new(
        Cursor::new(input),
        FailingSink {
            ok_frames: 2,
            pushed: 0,
        },
    );
    let err = ex.run().unwrap_err();
    assert!(matches!(err, Y4mError::IoFailure { frames: 2, .. }));
    assert_eq!(err.frames_completed(), 2);
}

#[test]
fn lying_header_on_short_input_does_not_fail() {
    let mut input = b"YUV4MPEG2 W65535 H65535\nFRAME\n".to_vec();
    input.extend_from_slice(&[0u8; 100]);

    let (res, _) = extract(input);
    let stats = res.unwrap();
    assert_eq!(stats.frames, 0);
    assert_eq!(stats.truncated_tail_bytes, Some(100));
}

#[test]
fn opts_reject_tiny_line_limit() {
    let opts = ExtractOpts {
        max_line_len: 4,
        ..ExtractOpts::default()
    };
    assert!(opts.validate().is_err());
    ExtractOpts::default().validate().unwrap();
}
