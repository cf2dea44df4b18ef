use super::*;
use crate::foundation::core::Fps;

#[test]
fn minimal_json_fills_defaults() {
    let cfg = GenerateConfig::from_json(
        r#"{ "request": { "seed": "aurora", "canvas": { "width": 1080, "height": 1920 }, "duration_secs": 4.0 } }"#,
    )
    .unwrap();
    assert_eq!(cfg.request.seed, "aurora");
    assert_eq!(cfg.request.fps, Fps::default());
    assert_eq!(cfg.request.star_count, 80);
    assert_eq!(cfg.codec, VideoCodec::ProRes4444);
    assert!(cfg.loop_align_twinkle);
    assert_eq!(cfg, GenerateConfig::new(cfg.request.clone()));
}

#[test]
fn explicit_fields_are_honored() {
    let cfg = GenerateConfig::from_json(
        r#"{
            "request": {
                "seed": "s", "canvas": { "width": 64, "height": 64 }, "duration_secs": 2.0,
                "fps": { "num": 24, "den": 1 }, "star_count": 12
            },
            "codec": "vp9_alpha",
            "threading": { "parallel": false },
            "star_tint": { "r": 200, "g": 220, "b": 255, "a": 255 },
            "loop_align_twinkle": false
        }"#,
    )
    .unwrap();
    assert_eq!(cfg.request.fps.num, 24);
    assert_eq!(cfg.request.star_count, 12);
    assert_eq!(cfg.codec, VideoCodec::Vp9Alpha);
    assert!(!cfg.threading.parallel);
    assert_eq!(cfg.threading.chunk_size, RenderThreading::default().chunk_size);

    let cancel = CancelToken::new();
    let (request, opts) = cfg.into_parts(cancel.clone());
    assert_eq!(request.star_count, 12);
    assert_eq!(opts.star_tint, Rgba8::rgb(200, 220, 255));
    assert!(!opts.loop_align_twinkle);
    cancel.cancel();
    assert!(opts.cancel.is_cancelled());
}

#[test]
fn malformed_json_is_a_validation_error() {
    let err = GenerateConfig::from_json("{ \"request\": 3 }").unwrap_err();
    assert!(matches!(err, StarloopError::Validation(_)));
}
