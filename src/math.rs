/// Normalizes an angle in degrees to a number in (-180, 180]
pub fn normalize_angle(angle: f32) -> f32 {
    // Remainder and the single correction below are both exact, so in range values come back unchanged
    let temp = angle % 360.0;

    if temp > 180.0 {
        temp - 360.0
    } else if temp <= -180.0 {
        temp + 360.0
    } else {
        temp
    }
}

/// Caculates the signed distance in degrees from `b` to `a`
pub fn subtract_angles(a: f32, b: f32) -> f32 {
    normalize_angle(a - b)
}

pub fn add_angles(a: f32, b: f32) -> f32 {
    normalize_angle(a + b)
}

pub fn clampf(val: f32, max: f32, min: f32) -> f32 {
    debug_assert!(max >= min, "Max must be greater then min!");
    val.min(max).max(min)
}

/// Like `f32::signum` but returns 0 for 0
pub fn sign(val: f32) -> f32 {
    if val > 0.0 {
        1.0
    } else if val < 0.0 {
        -1.0
    } else {
        0.0
    }
}
