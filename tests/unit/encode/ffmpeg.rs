use super::*;
use crate::foundation::core::Fps;

fn seq(width: u32, height: u32) -> FrameSequence {
    FrameSequence {
        dir: PathBuf::from("/scratch/req"),
        pattern: "frame_%05d.png".to_owned(),
        frames: vec![PathBuf::from("/scratch/req/frame_00000.png")],
        fps: Fps::new(30000, 1001).unwrap(),
        canvas: Canvas { width, height },
    }
}

#[test]
fn prores_args_carry_alpha_settings() {
    let enc = FfmpegEncoder::new(VideoCodec::ProRes4444);
    let args = enc.command_args(&seq(1080, 1920), Path::new("out/loop.mov"));
    let joined = args.join(" ");
    assert!(joined.contains("-framerate 30000/1001"));
    assert!(joined.contains("-start_number 0"));
    assert!(joined.contains("-i /scratch/req/frame_%05d.png"));
    assert!(joined.contains("-c:v prores_ks -profile:v 4444 -pix_fmt yuva444p10le"));
    assert!(joined.contains("-alpha_bits 16"));
    assert_eq!(args[3], "-y");
    assert_eq!(args.last().map(String::as_str), Some("out/loop.mov"));
}

#[test]
fn vp9_args_use_yuva420p_and_one_second_gop() {
    let enc = FfmpegEncoder::new(VideoCodec::Vp9Alpha).with_overwrite(false);
    let args = enc.command_args(&seq(1080, 1920), Path::new("loop.webm"));
    let joined = args.join(" ");
    assert!(joined.contains("-c:v libvpx-vp9 -pix_fmt yuva420p -auto-alt-ref 0"));
    assert!(joined.contains("-g 30"));
    assert_eq!(args[3], "-n");
}

#[test]
fn vp9_rejects_odd_dimensions() {
    assert!(VideoCodec::Vp9Alpha.check_canvas(seq(101, 200).canvas).is_err());
    assert!(VideoCodec::ProRes4444.check_canvas(seq(101, 200).canvas).is_ok());
}

#[test]
fn extensions_match_containers() {
    assert_eq!(VideoCodec::ProRes4444.extension(), "mov");
    assert_eq!(VideoCodec::Vp9Alpha.extension(), "webm");
    assert_eq!(VideoCodec::default(), VideoCodec::ProRes4444);
}

#[test]
fn missing_executable_is_an_encoding_error() {
    let enc = FfmpegEncoder::new(VideoCodec::ProRes4444)
        .with_program("/definitely/not/a/real/ffmpeg-binary");
    let out = tempfile::tempdir().unwrap();
    let err = enc
        .encode(&seq(2, 2), &out.path().join("x.mov"))
        .unwrap_err();
    assert!(err.is_encoding());
    assert!(err.to_string().contains("not found"));
}

#[test]
fn empty_sequence_is_an_encoding_error() {
    let mut s = seq(2, 2);
    s.frames.clear();
    let err = FfmpegEncoder::new(VideoCodec::ProRes4444)
        .encode(&s, Path::new("never.mov"))
        .unwrap_err();
    assert!(err.is_encoding());
}

#[test]
fn stderr_tail_keeps_the_end() {
    assert_eq!(last_n_chars("  abcdef  ", 4), "ef");
    assert_eq!(last_n_chars("abc", 10), "abc");
}
