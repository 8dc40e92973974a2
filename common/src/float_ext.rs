pub trait FloatExt: Copy {
    /// Absolute comparison against [`crate::EPSILON`].
    fn approximately_eq(self, other: Self) -> bool;

    /// Absolute comparison with a caller-supplied tolerance.
    fn approximately_eq_eps(self, other: Self, eps: Self) -> bool;

    /// Relative comparison, scaled by the larger magnitude of the two operands.
    /// Falls back to the absolute tolerance near zero.
    fn relative_eq(self, other: Self, rel: Self) -> bool;
}

impl FloatExt for f32 {
    fn approximately_eq(self, other: Self) -> bool {
        self.approximately_eq_eps(other, crate::EPSILON)
    }

    fn approximately_eq_eps(self, other: Self, eps: Self) -> bool {
        (self - other).abs() < eps
    }

    fn relative_eq(self, other: Self, rel: Self) -> bool {
        if self == other {
            return true;
        }
        let scale = self.abs().max(other.abs());
        (self - other).abs() <= (rel * scale).max(crate::EPSILON)
    }
}

impl FloatExt for f64 {
    fn approximately_eq(self, other: Self) -> bool {
        self.approximately_eq_eps(other, crate::EPSILON as f64)
    }

    fn approximately_eq_eps(self, other: Self, eps: Self) -> bool {
        (self - other).abs() < eps
    }

    fn relative_eq(self, other: Self, rel: Self) -> bool {
        if self == other {
            return true;
        }
        let scale = self.abs().max(other.abs());
        (self - other).abs() <= (rel * scale).max(crate::EPSILON as f64)
    }
}
