// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mathematical helper functions.

use crate::kurbo::Affine;

// Same tolerance as tiny-skia's `SCALAR_NEARLY_ZERO`.
const SCALAR_NEARLY_ZERO: f64 = 1.0 / (1 << 12) as f64;

/// A number of useful methods for f64 numbers.
pub(crate) trait FloatExt: Sized {
    /// Whether the number is approximately 0.
    fn is_nearly_zero(&self) -> bool {
        self.is_nearly_zero_within_tolerance(SCALAR_NEARLY_ZERO)
    }

    /// Whether the number is approximately 0, with a given tolerance.
    fn is_nearly_zero_within_tolerance(&self, tolerance: f64) -> bool;
}

impl FloatExt for f64 {
    #[inline(always)]
    fn is_nearly_zero_within_tolerance(&self, tolerance: f64) -> bool {
        debug_assert!(tolerance >= 0.0, "tolerance must be positive");

        self.abs() <= tolerance
    }
}

/// Returns the inverse of `transform`, or `None` if it is degenerate.
pub(crate) fn invert(transform: Affine) -> Option<Affine> {
    let det = transform.determinant();
    if det.is_nearly_zero() || !det.is_finite() {
        return None;
    }
    Some(transform.inverse())
}

/// Returns the inverse of `transform`, falling back to the identity when it can't be inverted.
#[inline]
pub(crate) fn invert_or_identity(transform: Affine) -> Affine {
    invert(transform).unwrap_or(Affine::IDENTITY)
}

/// Returns `transform` with its translation removed.
#[inline]
pub(crate) fn without_translation(transform: Affine) -> Affine {
    let [a, b, c, d, _, _] = transform.as_coeffs();
    Affine::new([a, b, c, d, 0.0, 0.0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_transform_has_no_inverse() {
        assert!(invert(Affine::scale_non_uniform(1.0, 0.0)).is_none());
        assert_eq!(
            invert_or_identity(Affine::scale_non_uniform(0.0, 2.0)),
            Affine::IDENTITY
        );
    }

    #[test]
    fn inverse_round_trips() {
        let m = Affine::new([2.0, 0.5, -0.25, 3.0, 10.0, -4.0]);
        let inv = invert(m).unwrap();
        let product = (m * inv).as_coeffs();
        let identity = Affine::IDENTITY.as_coeffs();
        for (got, expected) in product.iter().zip(identity) {
            assert!((got - expected).is_nearly_zero(), "{product:?}");
        }
    }

    #[test]
    fn translation_is_stripped() {
        let m = Affine::new([1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(
            without_translation(m).as_coeffs(),
            [1.0, 2.0, 3.0, 4.0, 0.0, 0.0]
        );
    }
}
