pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Convert premultiplied RGBA8 bytes to straight alpha in place.
///
/// Fully transparent pixels become `0,0,0,0`.
pub(crate) fn unpremultiply_rgba8_in_place(data: &mut [u8]) {
    for px in data.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        match a {
            0 => px.copy_from_slice(&[0, 0, 0, 0]),
            255 => {}
            _ => {
                for c in &mut px[..3] {
                    let v = (u16::from(*c) * 255 + a / 2) / a;
                    *c = v.min(255) as u8;
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
