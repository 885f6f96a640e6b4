//! Small numeric helpers shared by the resampling and filtering code.

/// Converts degrees to radians.
pub(crate) fn deg_to_rad(angle_deg: f32) -> f32 {
    angle_deg.to_radians()
}

/// Computes sine and cosine for an angle in degrees.
pub(crate) fn sin_cos_deg(angle_deg: f32) -> (f32, f32) {
    let radians = deg_to_rad(angle_deg);
    radians.sin_cos()
}

/// Rounds a filtered sample to the nearest `u8`, saturating at both ends.
#[inline]
pub(crate) fn saturate_u8(value: f32) -> u8 {
    if !value.is_finite() {
        return 0;
    }
    value.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::{deg_to_rad, saturate_u8, sin_cos_deg};

    #[test]
    fn deg_to_rad_matches_pi() {
        let radians = deg_to_rad(180.0);
        assert!((radians - std::f32::consts::PI).abs() < 1e-6);
    }

    #[test]
    fn sin_cos_deg_matches_quadrants() {
        let (sin, cos) = sin_cos_deg(90.0);
        assert!(sin > 0.999);
        assert!(cos.abs() < 1e-6);
    }

    #[test]
    fn saturate_u8_rounds_and_clamps() {
        assert_eq!(saturate_u8(-3.0), 0);
        assert_eq!(saturate_u8(12.5), 13);
        assert_eq!(saturate_u8(254.4), 254);
        assert_eq!(saturate_u8(400.0), 255);
        assert_eq!(saturate_u8(f32::NAN), 0);
    }
}
