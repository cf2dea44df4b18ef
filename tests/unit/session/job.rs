use super::*;
use crate::scene::model::SceneFrame;

struct CountingEncoder {
    frames_present: Mutex<Option<usize>>,
}

impl CountingEncoder {
    fn new() -> Self {
        Self {
            frames_present: Mutex::new(None),
        }
    }
}

impl SequenceEncoder for CountingEncoder {
    fn name(&self) -> &str {
        "counting"
    }

    fn encode(&self, seq: &FrameSequence, out_path: &Path) -> StarloopResult<()> {
        let present = seq.frames.iter().filter(|p| p.exists()).count();
        *self.frames_present.lock().unwrap() = Some(present);
        std::fs::write(out_path, b"video").map_err(|e| StarloopError::storage(e.to_string()))
    }
}

struct BrokenEncoder;

impl SequenceEncoder for BrokenEncoder {
    fn name(&self) -> &str {
        "broken"
    }

    fn encode(&self, _seq: &FrameSequence, _out_path: &Path) -> StarloopResult<()> {
        Err(StarloopError::encoding("encoder exited with status 1"))
    }
}

struct BlankBackend;

impl RasterBackend for BlankBackend {
    fn rasterize(&mut self, _scene: &SceneFrame, canvas: Canvas) -> StarloopResult<FrameRGBA> {
        Ok(FrameRGBA {
            width: canvas.width,
            height: canvas.height,
            data: vec![0; (canvas.width * canvas.height * 4) as usize],
            premultiplied: true,
        })
    }
}

struct FailAt(f64);

impl RasterBackend for FailAt {
    fn rasterize(&mut self, scene: &SceneFrame, canvas: Canvas) -> StarloopResult<FrameRGBA> {
        if (scene.time_secs - self.0).abs() < 1e-9 {
            return Err(StarloopError::rasterization("path fill failed"));
        }
        BlankBackend.rasterize(scene, canvas)
    }
}

fn opts_in(root: &Path) -> GenerateOpts {
    GenerateOpts {
        scratch_root: Some(root.to_path_buf()),
        ..GenerateOpts::default()
    }
}

#[test]
fn request_validation() {
    assert!(LoopRequest::new("s", 1080, 1920, 4.0).validate().is_ok());
    assert!(LoopRequest::new("s", 0, 1920, 4.0).validate().is_err());
    assert!(LoopRequest::new("s", 70_000, 10, 4.0).validate().is_err());
    assert!(LoopRequest::new("s", 10, 10, 0.0).validate().is_err());
    assert!(LoopRequest::new("s", 10, 10, f64::NAN).validate().is_err());
    assert!(LoopRequest::new("s", 10, 10, 1e-12).validate().is_err());

    let mut bad_fps = LoopRequest::new("s", 10, 10, 1.0);
    bad_fps.fps = Fps { num: 30, den: 0 };
    assert!(bad_fps.validate().is_err());

    let r = LoopRequest::new("s", 10, 10, 4.0).with_fps(Fps::integer(10).unwrap());
    assert_eq!(r.frame_count(), 40);
    assert_eq!(r.star_count, DEFAULT_STAR_COUNT);
}

#[test]
fn frame_count_is_bounded() {
    let huge = LoopRequest::new("s", 10, 10, 1e12);
    let err = huge.validate().unwrap_err();
    assert!(matches!(err, StarloopError::Validation(_)));
    assert!(err.to_string().contains("limit"), "{err}");
    assert!(LoopJob::new(huge, GenerateOpts::default()).is_err());

    // One hour at 60 fps is exactly the limit.
    let hour = LoopRequest::new("s", 10, 10, 3600.0).with_fps(Fps::integer(60).unwrap());
    assert_eq!(hour.frame_count(), MAX_FRAME_COUNT);
    assert!(hour.validate().is_ok());
    let over = LoopRequest::new("s", 10, 10, 3600.1).with_fps(Fps::integer(60).unwrap());
    assert!(over.validate().is_err());
}

#[test]
fn cancel_token_is_shared_between_clones() {
    let token = CancelToken::new();
    let other = token.clone();
    assert!(token.check().is_ok());
    other.cancel();
    assert!(token.is_cancelled());
    assert!(matches!(token.check(), Err(StarloopError::Cancelled)));
}

#[test]
fn successful_job_walks_to_completed_and_cleans_scratch() {
    let root = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let out_path = out.path().join("loop.mov");
    let request = LoopRequest::new("job-ok", 16, 16, 1.0).with_fps(Fps::integer(8).unwrap());
    let job = LoopJob::new(request, opts_in(root.path())).unwrap();
    assert_eq!(job.state(), GenerationState::Scheduled);

    let encoder = CountingEncoder::new();
    let asset = job.run(&encoder, &out_path).unwrap();

    assert_eq!(job.state(), GenerationState::Completed);
    assert!(job.state().is_terminal());
    assert_eq!(*encoder.frames_present.lock().unwrap(), Some(8));
    assert_eq!(asset.frame_count, 8);
    assert_eq!(asset.frame_hashes.len(), 8);
    assert_eq!(asset.encoder, "counting");
    assert!(out_path.exists());
    assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);

    let again = job.run(&encoder, &out_path).unwrap_err();
    assert!(matches!(again, StarloopError::Validation(_)));
}

#[test]
fn encoder_failure_marks_failed_and_still_cleans_scratch() {
    let root = tempfile::tempdir().unwrap();
    let request = LoopRequest::new("job-bad", 8, 8, 0.5).with_fps(Fps::integer(10).unwrap());
    let job = LoopJob::new(request, opts_in(root.path())).unwrap();
    let handle = job.state_handle();
    let make_backend = || -> Box<dyn RasterBackend> { Box::new(BlankBackend) };

    let err = job
        .run_with_backends(&BrokenEncoder, Path::new("unused.mov"), &make_backend)
        .unwrap_err();

    assert!(err.is_encoding());
    assert_eq!(handle.get(), GenerationState::Failed);
    assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
}

#[test]
fn rasterization_failure_marks_failed_and_skips_encoding() {
    let root = tempfile::tempdir().unwrap();
    let request = LoopRequest::new("job-raster", 8, 8, 1.0).with_fps(Fps::integer(10).unwrap());
    let mut opts = opts_in(root.path());
    for parallel in [false, true] {
        opts.threading.parallel = parallel;
        let job = LoopJob::new(request.clone(), opts.clone()).unwrap();
        let encoder = CountingEncoder::new();
        let make_backend = || -> Box<dyn RasterBackend> { Box::new(FailAt(0.3)) };

        let err = job
            .run_with_backends(&encoder, Path::new("unused.mov"), &make_backend)
            .unwrap_err();

        assert!(err.is_rasterization(), "{err}");
        assert!(err.to_string().contains("frame 3"), "{err}");
        assert_eq!(job.state(), GenerationState::Failed);
        assert_eq!(*encoder.frames_present.lock().unwrap(), None);
        assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
    }
}

#[test]
fn cancelled_job_fails_without_encoding() {
    let root = tempfile::tempdir().unwrap();
    let opts = opts_in(root.path());
    opts.cancel.cancel();
    let job = LoopJob::new(LoopRequest::new("job-cancel", 8, 8, 1.0), opts).unwrap();
    let encoder = CountingEncoder::new();

    let err = job.run(&encoder, Path::new("unused.mov")).unwrap_err();

    assert!(matches!(err, StarloopError::Cancelled));
    assert_eq!(job.state(), GenerationState::Failed);
    assert_eq!(*encoder.frames_present.lock().unwrap(), None);
}

#[test]
fn encoder_canvas_check_runs_before_rendering() {
    let root = tempfile::tempdir().unwrap();
    let job = LoopJob::new(LoopRequest::new("odd", 9, 8, 1.0), opts_in(root.path())).unwrap();
    let encoder = FfmpegEncoder::new(VideoCodec::Vp9Alpha);
    let err = job.run(&encoder, Path::new("unused.webm")).unwrap_err();
    assert!(matches!(err, StarloopError::Validation(_)));
    assert_eq!(job.state(), GenerationState::Failed);
}

#[test]
fn scene_params_follow_options() {
    let request = LoopRequest::new("params", 10, 10, 6.0).with_star_count(5);
    let aligned = LoopJob::new(request.clone(), GenerateOpts::default()).unwrap();
    let p = aligned.scene_params();
    assert_eq!(p.stars.len(), 5);
    assert_eq!(p.twinkle_loop_secs, Some(6.0));

    let opts = GenerateOpts {
        loop_align_twinkle: false,
        star_tint: Rgba8::rgb(10, 20, 30),
        ..GenerateOpts::default()
    };
    let free = LoopJob::new(request, opts).unwrap().scene_params();
    assert_eq!(free.twinkle_loop_secs, None);
    assert_eq!(free.star_tint, Rgba8::rgb(10, 20, 30));
    assert_eq!(free.meteors, p.meteors);
}

#[test]
fn static_frame_is_stars_only_and_deterministic() {
    let canvas = Canvas {
        width: 270,
        height: 480,
    };
    let settings = RenderSettings::default();
    let a = generate_static_frame("preview", canvas, None, &settings).unwrap();
    let b = generate_static_frame("preview", canvas, None, &settings).unwrap();
    assert_eq!(a, b);
    assert_eq!((a.width, a.height), (270, 480));
    assert!(!a.is_fully_transparent());

    let none = generate_static_frame("preview", canvas, Some(0), &settings).unwrap();
    assert!(none.is_fully_transparent());

    let err = generate_static_frame(
        "preview",
        Canvas {
            width: 0,
            height: 10,
        },
        None,
        &settings,
    )
    .unwrap_err();
    assert!(matches!(err, StarloopError::Validation(_)));
}
