use super::*;

fn frame(data: Vec<u8>) -> FrameRGBA {
    FrameRGBA {
        width: 1,
        height: (data.len() / 4) as u32,
        data,
        premultiplied: true,
    }
}

#[test]
fn point_scale_defaults_to_short_side_over_540() {
    let settings = RenderSettings::default();
    let portrait = Canvas {
        width: 1080,
        height: 1920,
    };
    assert_eq!(settings.resolve_point_scale(portrait), 2.0);

    let explicit = RenderSettings {
        point_scale: Some(3.0),
        ..RenderSettings::default()
    };
    assert_eq!(explicit.resolve_point_scale(portrait), 3.0);

    let bogus = RenderSettings {
        point_scale: Some(-1.0),
        ..RenderSettings::default()
    };
    assert_eq!(bogus.resolve_point_scale(portrait), 2.0);
}

#[test]
fn create_backend_rejects_bad_point_scale() {
    let settings = RenderSettings {
        point_scale: Some(f64::NAN),
        ..RenderSettings::default()
    };
    assert!(create_backend(BackendKind::Cpu, &settings).is_err());
    assert!(create_backend(BackendKind::Cpu, &RenderSettings::default()).is_ok());
}

#[test]
fn straight_alpha_bytes_unpremultiply() {
    let f = frame(vec![64, 0, 0, 128, 0, 0, 0, 0]);
    let straight = f.straight_alpha_bytes();
    assert_eq!(&straight[4..], &[0, 0, 0, 0]);
    assert_eq!(straight[3], 128);
    assert_eq!(straight[0], 128);
}

#[test]
fn content_hash_tracks_pixels_and_dims() {
    let a = frame(vec![1, 2, 3, 4]);
    let b = frame(vec![1, 2, 3, 4]);
    let c = frame(vec![1, 2, 3, 5]);
    assert_eq!(a.content_hash(), b.content_hash());
    assert_ne!(a.content_hash(), c.content_hash());

    let wide = FrameRGBA {
        width: 2,
        height: 1,
        data: vec![0; 8],
        premultiplied: true,
    };
    let tall = FrameRGBA {
        width: 1,
        height: 2,
        data: vec![0; 8],
        premultiplied: true,
    };
    assert_ne!(wide.content_hash(), tall.content_hash());
}
