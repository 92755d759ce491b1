use std::io::Cursor;

use super::*;

fn frame(w: u32, h: u32, px: [u8; 4]) -> FrameRGBA {
    FrameRGBA {
        width: w,
        height: h,
        data: px.repeat((w * h) as usize),
        premultiplied: true,
    }
}

fn cfg(frame_count: u64) -> SinkConfig {
    SinkConfig {
        width: 4,
        height: 4,
        frame_count,
    }
}

fn decode_delays(bytes: &[u8]) -> (Vec<u16>, gif::Repeat) {
    let mut opts = gif::DecodeOptions::new();
    opts.set_color_output(gif::ColorOutput::RGBA);
    let mut decoder = opts.read_info(Cursor::new(bytes)).unwrap();
    let mut delays = Vec::new();
    while let Some(f) = decoder.read_next_frame().unwrap() {
        delays.push(f.delay);
    }
    (delays, decoder.repeat())
}

#[test]
fn delay_is_rounded_to_centiseconds_with_floor_of_one() {
    assert_eq!(delay_centis(50), 5);
    assert_eq!(delay_centis(33), 3);
    assert_eq!(delay_centis(35), 4);
    assert_eq!(delay_centis(0), 1);
    assert_eq!(delay_centis(1000), 100);
}

#[test]
fn opts_are_validated() {
    assert!(GifSinkOpts::default().validate().is_ok());
    let bad = GifSinkOpts {
        quality: 31,
        ..GifSinkOpts::default()
    };
    assert!(bad.validate().is_err());
    let bad = GifSinkOpts {
        workers: 0,
        ..GifSinkOpts::default()
    };
    assert!(GifSink::new("x.gif", bad).is_err());
}

#[test]
fn encodes_all_frames_in_order_with_delays() {
    let dir = tempfile::tempdir().unwrap();
    let opts = GifSinkOpts {
        workers: 2,
        ..GifSinkOpts::default()
    };
    let mut sink = GifSink::new(dir.path().join("out.gif"), opts).unwrap();
    sink.begin(cfg(5)).unwrap();
    let colors = [
        [255, 0, 0, 255],
        [0, 255, 0, 255],
        [0, 0, 255, 255],
        [255, 255, 255, 255],
        [0, 0, 0, 255],
    ];
    for (i, c) in colors.iter().enumerate() {
        let delay = if i == 4 { 100 } else { 50 };
        sink.push_frame(FrameIndex(i as u64), &frame(4, 4, *c), delay)
            .unwrap();
    }
    let EncodeOutcome::Finished(gif) = sink.end().unwrap() else {
        panic!("expected finished encode");
    };
    assert_eq!(gif.frame_count, 5);
    assert_eq!((gif.width, gif.height), (4, 4));
    assert_eq!(&gif.bytes[..6], b"GIF89a");

    let (delays, repeat) = decode_delays(&gif.bytes);
    assert_eq!(delays, vec![5, 5, 5, 5, 10]);
    assert_eq!(repeat, gif::Repeat::Infinite);
}

#[test]
fn finite_repeat_is_written() {
    let dir = tempfile::tempdir().unwrap();
    let opts = GifSinkOpts {
        repeat: Some(2),
        ..GifSinkOpts::default()
    };
    let mut sink = GifSink::new(dir.path().join("out.gif"), opts).unwrap();
    sink.begin(cfg(1)).unwrap();
    sink.push_frame(FrameIndex(0), &frame(4, 4, [9, 9, 9, 255]), 50)
        .unwrap();
    let EncodeOutcome::Finished(gif) = sink.end().unwrap() else {
        panic!("expected finished encode");
    };
    assert_eq!(decode_delays(&gif.bytes).1, gif::Repeat::Finite(2));
}

#[test]
fn abort_handle_turns_end_into_aborted() {
    let dir = tempfile::tempdir().unwrap();
    let mut sink = GifSink::new(dir.path().join("out.gif"), GifSinkOpts::default()).unwrap();
    let abort = sink.abort_handle();
    sink.begin(cfg(2)).unwrap();
    sink.push_frame(FrameIndex(0), &frame(4, 4, [1, 2, 3, 255]), 50)
        .unwrap();
    assert!(!sink.aborted());
    abort.abort();
    assert!(sink.aborted());
    sink.push_frame(FrameIndex(1), &frame(4, 4, [1, 2, 3, 255]), 50)
        .unwrap();
    assert_eq!(sink.end().unwrap(), EncodeOutcome::Aborted);
}

#[test]
fn mismatched_frame_size_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut sink = GifSink::new(dir.path().join("out.gif"), GifSinkOpts::default()).unwrap();
    sink.begin(cfg(1)).unwrap();
    assert!(
        sink.push_frame(FrameIndex(0), &frame(2, 2, [0, 0, 0, 255]), 50)
            .is_err()
    );
}

#[test]
fn push_before_begin_is_an_error() {
    let mut sink = GifSink::new("unused.gif", GifSinkOpts::default()).unwrap();
    assert!(
        sink.push_frame(FrameIndex(0), &frame(4, 4, [0, 0, 0, 255]), 50)
            .is_err()
    );
}
