use super::*;

#[test]
fn ease_endpoints_are_fixed() {
    for e in [
        Ease::Linear,
        Ease::InQuad,
        Ease::OutQuad,
        Ease::InOutQuad,
        Ease::InCubic,
        Ease::OutCubic,
    ] {
        assert!((e.apply(0.0) - 0.0).abs() < 1e-12);
        assert!((e.apply(1.0) - 1.0).abs() < 1e-12);
    }
}

#[test]
fn ease_clamps_input() {
    assert_eq!(Ease::Linear.apply(-1.0), 0.0);
    assert_eq!(Ease::OutCubic.apply(2.0), 1.0);
}

#[test]
fn out_cubic_front_loads_progress() {
    assert!(Ease::OutCubic.apply(0.25) > 0.25);
    assert!(Ease::InQuad.apply(0.25) < 0.25);
}

#[test]
fn in_cubic_mirrors_out_cubic() {
    for i in 0..=20 {
        let t = f64::from(i) / 20.0;
        let mirrored = 1.0 - Ease::OutCubic.apply(1.0 - t);
        assert!((Ease::InCubic.apply(t) - mirrored).abs() < 1e-12);
    }
}
