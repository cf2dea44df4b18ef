use super::*;

fn tiny_frame() -> FrameRGBA {
    FrameRGBA {
        width: 2,
        height: 1,
        data: vec![128, 0, 0, 128, 0, 0, 0, 0],
        premultiplied: true,
    }
}

#[test]
fn pad_width_grows_past_five_digits() {
    assert_eq!(frame_pad_width(0), 5);
    assert_eq!(frame_pad_width(40), 5);
    assert_eq!(frame_pad_width(100_000), 5);
    assert_eq!(frame_pad_width(100_001), 6);
}

#[test]
fn names_are_zero_padded_and_sort_in_frame_order() {
    let root = tempfile::tempdir().unwrap();
    let scratch = ScratchDir::create(Some(root.path()), 40).unwrap();
    assert_eq!(scratch.frame_file_name(FrameIndex(7)), "frame_00007.png");
    assert_eq!(scratch.input_pattern(), "frame_%05d.png");
    assert!(scratch.frame_file_name(FrameIndex(9)) < scratch.frame_file_name(FrameIndex(10)));
}

#[test]
fn written_frames_are_straight_alpha_pngs() {
    let root = tempfile::tempdir().unwrap();
    let scratch = ScratchDir::create(Some(root.path()), 2).unwrap();
    let frame = tiny_frame();
    let asset = scratch.write_frame(FrameIndex(1), &frame).unwrap();
    assert_eq!(asset.index, FrameIndex(1));
    assert_eq!(asset.content_hash, frame.content_hash());
    assert!(asset.path.ends_with("frame_00001.png"));

    let decoded = image::open(&asset.path).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (2, 1));
    assert_eq!(decoded.get_pixel(0, 0).0, [255, 0, 0, 128]);
    assert_eq!(decoded.get_pixel(1, 0).0, [0, 0, 0, 0]);

    assert_eq!(scratch.frame_files().unwrap(), vec![asset.path]);
}

#[test]
fn cleanup_removes_frames_and_directory() {
    let root = tempfile::tempdir().unwrap();
    let scratch = ScratchDir::create(Some(root.path()), 3).unwrap();
    let dir = scratch.path().to_path_buf();
    for i in 0..3 {
        scratch.write_frame(FrameIndex(i), &tiny_frame()).unwrap();
    }
    let report = scratch.cleanup();
    assert_eq!(report, CleanupReport { removed: 3, failed: 0 });
    assert!(!dir.exists());
    assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
}

#[test]
fn drop_cleans_up_too() {
    let root = tempfile::tempdir().unwrap();
    let dir = {
        let scratch = ScratchDir::create(Some(root.path()), 1).unwrap();
        scratch.write_frame(FrameIndex(0), &tiny_frame()).unwrap();
        scratch.path().to_path_buf()
    };
    assert!(!dir.exists());
}

#[test]
fn concurrent_requests_get_distinct_directories() {
    let root = tempfile::tempdir().unwrap();
    let a = ScratchDir::create(Some(root.path()), 1).unwrap();
    let b = ScratchDir::create(Some(root.path()), 1).unwrap();
    assert_ne!(a.path(), b.path());
}
