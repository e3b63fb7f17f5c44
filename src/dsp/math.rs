//! # Mapping and Interpolation Helpers
//!
//! Small pure functions shared by the DSP stages: a linear range remap,
//! the two interpolators used for fractional delay reads, and the
//! "expo rounder" transfer curve that shapes every macro knob.
//!
//! ## The Expo Rounder
//!
//! A raw linear knob feels wrong for most audio parameters: the first
//! half of the travel does almost nothing and the last few degrees do
//! everything (or the reverse). The expo rounder bends a [0, 1] control
//! into an s-shaped response before it is remapped onto the target range:
//!
//! ```text
//! y = x(1 + c) / (cx + 1)        for x in (0, 1]
//! ```
//!
//! Positive curve values push the response toward 1 early (fast rise),
//! negative values hold it near 0 longer (slow rise). The endpoints are
//! fixed: 0 maps to 0 and 1 maps to 1 for every curve setting, so the
//! knob extremes always mean "off" and "fully on".

/// Map `value` from the range `[in_min, in_max]` onto `[out_min, out_max]`.
///
/// No clamping is applied; callers constrain their inputs first. The
/// output range may be inverted (`out_min > out_max`), which is used for
/// controls that close a filter as the knob opens.
pub fn map(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    ((value - in_min) / (in_max - in_min)) * (out_max - out_min) + out_min
}

/// Shorthand for [`map`] from a normalized [0, 1] input.
pub fn map_unit(value: f32, out_min: f32, out_max: f32) -> f32 {
    map(value, 0.0, 1.0, out_min, out_max)
}

/// Linear interpolation between `a` and `b`, clamped so that `t <= 0`
/// returns exactly `a` and `t >= 1` returns exactly `b`.
///
/// The exact endpoints matter for the delay line: a whole-sample read
/// offset must reproduce the stored sample bit-for-bit, not a blend
/// that is merely close to it.
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    if t <= 0.0 {
        a
    } else if t >= 1.0 {
        b
    } else {
        a + t * (b - a)
    }
}

/// Catmull-Rom cubic interpolation across four neighboring samples,
/// blending between `b` and `c` as `t` runs from 0 to 1.
///
/// `a` and `d` are the samples on either side of the `b..c` span; they
/// steer the curve's tangents so consecutive reads join smoothly. Like
/// [`lerp`], the endpoints are exact: `t <= 0` returns `b`, `t >= 1`
/// returns `c`.
pub fn catmull_rom(a: f32, b: f32, c: f32, d: f32, t: f32) -> f32 {
    if t <= 0.0 {
        return b;
    }
    if t >= 1.0 {
        return c;
    }

    let t2 = t * t;
    let a0 = -0.5 * a + 1.5 * b - 1.5 * c + 0.5 * d;
    let a1 = a - 2.5 * b + 2.0 * c - 0.5 * d;
    let a2 = -0.5 * a + 0.5 * c;

    a0 * t * t2 + a1 * t2 + a2 * t + b
}

/// The s-curve transfer function used to shape macro controls.
///
/// `input` is clamped to [-1, 1] and mapped through a rational curve
/// whose bend is set by `curve` (also clamped to [-1, 1]):
///
/// - `curve = 0` is the identity: the control stays linear.
/// - `curve > 0` is remapped onto [0, 20]: the response rises quickly
///   and saturates toward 1.
/// - `curve < 0` is remapped onto [-0.95, 0]: the response hugs 0 and
///   rises late.
///
/// Negative inputs mirror the positive branch around the origin.
pub fn expo_rounder(input: f32, curve: f32) -> f32 {
    let x = input.clamp(-1.0, 1.0);
    let c = curve.clamp(-1.0, 1.0);

    // The useful bend range is asymmetric: saturating curves need far
    // larger coefficients than starving ones before they are audible.
    let c = if c >= 0.0 {
        map(c, 0.0, 1.0, 0.0, 20.0)
    } else {
        map(c, -1.0, 0.0, -0.95, 0.0)
    };

    if x > 0.0 {
        (x * (1.0 + c)) / (c * x + 1.0)
    } else if x < 0.0 {
        (-x * (1.0 + c)) / (c * x - 1.0)
    } else {
        0.0
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_remaps_ranges() {
        assert!((map(0.5, 0.0, 1.0, 0.0, 100.0) - 50.0).abs() < 1e-6);
        assert!((map(5.0, 0.0, 10.0, 20.0, 280.0) - 150.0).abs() < 1e-6);

        // Inverted output ranges are allowed: opening the control
        // closes the target range.
        assert!((map(1.0, 0.0, 1.0, 20000.0, 4000.0) - 4000.0).abs() < 1e-3);
        assert!((map(0.0, 0.0, 1.0, 20000.0, 4000.0) - 20000.0).abs() < 1e-3);
    }

    #[test]
    fn test_lerp_endpoints_are_exact() {
        assert_eq!(lerp(0.25, 0.75, 0.0), 0.25);
        assert_eq!(lerp(0.25, 0.75, 1.0), 0.75);
        assert_eq!(lerp(0.25, 0.75, -2.0), 0.25);
        assert_eq!(lerp(0.25, 0.75, 3.0), 0.75);
        assert!((lerp(0.0, 1.0, 0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_catmull_rom_endpoints_are_exact() {
        // Blending runs between the two middle samples.
        assert_eq!(catmull_rom(0.0, 0.3, 0.9, 1.0, 0.0), 0.3);
        assert_eq!(catmull_rom(0.0, 0.3, 0.9, 1.0, 1.0), 0.9);
    }

    #[test]
    fn test_catmull_rom_is_exact_on_a_line() {
        // Four collinear points must interpolate linearly: the curve's
        // tangent steering cannot add curvature where there is none.
        let result = catmull_rom(0.0, 1.0, 2.0, 3.0, 0.5);
        assert!((result - 1.5).abs() < 1e-6, "Expected 1.5, got {result}");
    }

    #[test]
    fn test_expo_rounder_fixed_points() {
        for curve in [-1.0, -0.4, 0.0, 0.3, 0.8, 1.0] {
            assert_eq!(expo_rounder(0.0, curve), 0.0);
            assert!((expo_rounder(1.0, curve) - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_expo_rounder_identity_at_zero_curve() {
        for x in [0.1, 0.25, 0.5, 0.75, 0.9] {
            assert!((expo_rounder(x, 0.0) - x).abs() < 1e-6);
        }
    }

    #[test]
    fn test_expo_rounder_bends_the_expected_way() {
        // Positive curve saturates early, negative curve starves early.
        assert!(expo_rounder(0.5, 0.8) > 0.5);
        assert!(expo_rounder(0.5, -0.6) < 0.5);
    }

    #[test]
    fn test_expo_rounder_is_monotonic() {
        for curve in [-0.6, 0.3, 0.8] {
            let mut prev = 0.0;
            for i in 1..=100 {
                let x = i as f32 / 100.0;
                let y = expo_rounder(x, curve);
                assert!(y >= prev, "non-monotonic at x={x}, curve={curve}");
                prev = y;
            }
        }
    }

    #[test]
    fn test_expo_rounder_mirrors_negative_inputs() {
        for curve in [-0.5, 0.0, 0.7] {
            let pos = expo_rounder(0.6, curve);
            let neg = expo_rounder(-0.6, curve);
            assert!(
                (pos + neg).abs() < 1e-6,
                "expected odd symmetry, got {pos} and {neg}"
            );
        }
    }
}
