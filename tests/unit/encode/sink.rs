use super::*;

fn frame() -> FrameRGBA {
    FrameRGBA {
        width: 1,
        height: 1,
        data: vec![0, 0, 0, 255],
        premultiplied: true,
    }
}

#[test]
fn in_memory_sink_records_frames_and_delays() {
    let mut sink = InMemorySink::new();
    let cfg = SinkConfig {
        width: 1,
        height: 1,
        frame_count: 2,
    };
    sink.begin(cfg).unwrap();
    sink.push_frame(FrameIndex(0), &frame(), 50).unwrap();
    sink.push_frame(FrameIndex(1), &frame(), 50).unwrap();
    assert_eq!(sink.config(), Some(cfg));
    assert_eq!(sink.frames().len(), 2);
    assert_eq!(sink.frames()[1].0, FrameIndex(1));
    assert_eq!(sink.frames()[1].2, 50);

    let EncodeOutcome::Finished(gif) = sink.end().unwrap() else {
        panic!("expected finished");
    };
    assert_eq!(gif.frame_count, 2);
    assert_eq!(sink.end_calls(), 1);
}

#[test]
fn aborting_sink_reports_abort_after_threshold() {
    let mut sink = InMemorySink::aborting_after(1);
    sink.begin(SinkConfig {
        width: 1,
        height: 1,
        frame_count: 3,
    })
    .unwrap();
    assert!(!sink.aborted());
    sink.push_frame(FrameIndex(0), &frame(), 50).unwrap();
    assert!(sink.aborted());
    assert_eq!(sink.end().unwrap(), EncodeOutcome::Aborted);
}

#[test]
fn abort_handle_is_shared_between_clones() {
    let a = AbortHandle::new();
    let b = a.clone();
    assert!(!b.is_aborted());
    a.abort();
    assert!(b.is_aborted());
}
