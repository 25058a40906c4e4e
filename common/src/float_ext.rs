/// Tolerance comparisons for floating point results.
pub trait FloatExt: Copy {
    /// Absolute difference below [`crate::EPSILON`].
    fn approximately_eq(self, other: Self) -> bool;

    /// Absolute difference below `tolerance`.
    fn abs_diff_le(self, other: Self, tolerance: Self) -> bool;

    /// Difference relative to the larger magnitude below `tolerance`.
    ///
    /// Two exact zeros compare equal.
    fn relative_eq(self, other: Self, tolerance: Self) -> bool;
}

impl FloatExt for f32 {
    fn approximately_eq(self, other: Self) -> bool {
        (self - other).abs() < crate::EPSILON as f32
    }

    fn abs_diff_le(self, other: Self, tolerance: Self) -> bool {
        (self - other).abs() <= tolerance
    }

    fn relative_eq(self, other: Self, tolerance: Self) -> bool {
        let scale = self.abs().max(other.abs());
        scale == 0.0 || (self - other).abs() <= tolerance * scale
    }
}

impl FloatExt for f64 {
    fn approximately_eq(self, other: Self) -> bool {
        (self - other).abs() < crate::EPSILON
    }

    fn abs_diff_le(self, other: Self, tolerance: Self) -> bool {
        (self - other).abs() <= tolerance
    }

    fn relative_eq(self, other: Self, tolerance: Self) -> bool {
        let scale = self.abs().max(other.abs());
        scale == 0.0 || (self - other).abs() <= tolerance * scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn f64_approximately_eq() {
        assert!(1.0_f64.approximately_eq(1.0));
        assert!((0.1_f64 + 0.2_f64).approximately_eq(0.3));
        assert!(!1.0_f64.approximately_eq(1.0001));
    }

    #[test]
    fn nan_is_never_equal() {
        assert!(!f64::NAN.approximately_eq(f64::NAN));
        assert!(!f64::NAN.relative_eq(1.0, 1e-3));
        assert!(!0.0_f32.abs_diff_le(f32::NAN, 1.0));
    }

    #[test]
    fn relative_eq_scales_with_magnitude() {
        assert!(1.0e150_f64.relative_eq(1.0e150 * (1.0 + 1e-16), 1e-15));
        assert!(!1.0e150_f64.relative_eq(1.01e150, 1e-3));
        assert!(0.0_f64.relative_eq(0.0, 0.0));
        assert!(!0.0_f64.relative_eq(1e-300, 1e-15));
    }

    #[test]
    fn abs_diff_le_is_inclusive() {
        assert!(1.0_f32.abs_diff_le(1.5, 0.5));
        assert!(!1.0_f32.abs_diff_le(1.6, 0.5));
    }
}
