use super::*;

fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-9, "{a} != {b}");
}

#[test]
fn trail_envelope_hits_its_keys() {
    assert_close(TRAIL_LENGTH_ENVELOPE.sample(0.0), 0.3);
    assert_close(TRAIL_LENGTH_ENVELOPE.sample(0.2), 1.0);
    assert_close(TRAIL_LENGTH_ENVELOPE.sample(0.5), 1.0);
    assert_close(TRAIL_LENGTH_ENVELOPE.sample(0.8), 1.0);
    assert_close(TRAIL_LENGTH_ENVELOPE.sample(1.0), 0.3);
}

#[test]
fn trail_envelope_has_no_pops() {
    let mut prev = TRAIL_LENGTH_ENVELOPE.sample(0.0);
    for i in 1..=2000 {
        let v = TRAIL_LENGTH_ENVELOPE.sample(f64::from(i) / 2000.0);
        assert!((v - prev).abs() < 0.01, "jump at step {i}: {prev} -> {v}");
        prev = v;
    }
}

#[test]
fn trail_envelope_shrink_mirrors_growth() {
    for i in 0..=1000 {
        let p = f64::from(i) / 1000.0;
        let grow = TRAIL_LENGTH_ENVELOPE.sample(p);
        let shrink = TRAIL_LENGTH_ENVELOPE.sample(1.0 - p);
        assert!((0.3..=1.0).contains(&grow));
        assert_close(grow, shrink);
    }
    assert_close(
        TRAIL_LENGTH_ENVELOPE.sample(0.1),
        TRAIL_LENGTH_ENVELOPE.sample(0.9),
    );
}

#[test]
fn brightness_envelope_keys() {
    assert_close(BRIGHTNESS_ENVELOPE.sample(0.0), 0.3);
    assert_close(BRIGHTNESS_ENVELOPE.sample(0.15), 0.7);
    assert_close(BRIGHTNESS_ENVELOPE.sample(0.5), 1.0);
    assert_close(BRIGHTNESS_ENVELOPE.sample(0.75), 0.9);
    assert_close(BRIGHTNESS_ENVELOPE.sample(1.0), 0.0);
}

#[test]
fn brightness_is_non_negative_and_peaks_mid_flight() {
    let mut best = (0.0, f64::MIN);
    for i in 0..=10_000 {
        let p = f64::from(i) / 10_000.0;
        let v = BRIGHTNESS_ENVELOPE.sample(p);
        assert!(v >= 0.0, "negative brightness at {p}");
        if v > best.1 {
            best = (p, v);
        }
    }
    assert!(best.0 > 0.4 && best.0 < 0.6, "peak at {}", best.0);
}

#[test]
fn envelope_clamps_outside_unit_range() {
    assert_close(BRIGHTNESS_ENVELOPE.sample(-0.5), 0.3);
    assert_close(BRIGHTNESS_ENVELOPE.sample(1.5), 0.0);
    assert_close(BRIGHTNESS_ENVELOPE.sample(f64::NAN), 0.3);
}
