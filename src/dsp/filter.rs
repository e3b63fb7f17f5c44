//! # One-Pole Damping Filter
//!
//! A one-pole lowpass is the simplest possible IIR filter: a weighted
//! average between the new input and the previous output. The reverb
//! runs one of these inside every early comb's feedback loop so that
//! each recirculation loses a little high-frequency content, the way
//! air and soft surfaces swallow treble between reflections.
//!
//! ## The Filter Equation
//!
//! ```text
//! y[n] = x[n] + a * (y[n-1] - x[n])
//! ```
//!
//! which is the same thing as `(1 - a) * x[n] + a * y[n-1]`, just
//! arranged with one multiply. The coefficient `a` sets the balance:
//!
//! - `a = 0.0` passes the input through unchanged (no damping)
//! - `a = 0.5` averages input and history (moderate damping)
//! - `a → 1.0` barely lets new input in (heavy damping, very dark)
//!
//! Unlike a cutoff-tuned filter, the coefficient here *is* the control:
//! it arrives pre-smoothed from the reverb's damping parameter, so it
//! is passed in per call instead of being cached behind a setter.

/// A one-pole (6 dB/octave) lowpass used for high-frequency damping.
///
/// The only state is the previous output sample, the filter's "memory".
/// That memory is what makes it IIR: the output depends on previous
/// *outputs*, not just previous inputs.
pub struct DampingFilter {
    /// The previous output sample.
    prev_output: f32,
}

impl Default for DampingFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl DampingFilter {
    /// Create a filter with silent history.
    pub fn new() -> Self {
        Self { prev_output: 0.0 }
    }

    /// Process one sample with the given damping amount.
    ///
    /// `amount` is expected in [0, 1]; 0 is a passthrough, values near
    /// 1 freeze the output at its history.
    pub fn process(&mut self, input: f32, amount: f32) -> f32 {
        let output = input + amount * (self.prev_output - input);
        self.prev_output = output;
        output
    }

    /// Forget the previous output.
    ///
    /// Called when playback stops so the filter's memory does not leak
    /// into the next playback session.
    pub fn reset(&mut self) {
        self.prev_output = 0.0;
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    /// With amount = 0 the filter must pass input through unchanged.
    #[test]
    fn test_passthrough_at_zero_amount() {
        let mut filter = DampingFilter::new();

        for input in [1.0, 0.5, -0.3] {
            let output = filter.process(input, 0.0);
            assert!(
                (output - input).abs() < 1e-6,
                "Expected {input} through unchanged, got {output}"
            );
        }
    }

    /// Heavy damping should crush a Nyquist-rate alternation, the
    /// highest frequency a sample stream can carry.
    #[test]
    fn test_heavy_damping_attenuates_alternation() {
        let mut filter = DampingFilter::new();

        let mut max_output = 0.0_f32;
        for i in 0..1000 {
            let input = if i % 2 == 0 { 1.0 } else { -1.0 };
            // Skip the brief settle-in before measuring.
            let output = filter.process(input, 0.95);
            if i > 50 {
                max_output = max_output.max(output.abs());
            }
        }

        assert!(
            max_output < 0.05,
            "Expected heavy attenuation, got max output {max_output}"
        );
    }

    /// A DC signal passes through at any damping amount; damping only
    /// eats frequencies, not steady level.
    #[test]
    fn test_dc_passes_through() {
        let mut filter = DampingFilter::new();

        let mut output = 0.0;
        for _ in 0..10_000 {
            output = filter.process(1.0, 0.9);
        }

        assert!(
            (output - 1.0).abs() < 1e-4,
            "DC should converge to 1.0, got {output}"
        );
    }

    /// Verify that reset() clears the filter's memory.
    #[test]
    fn test_reset_clears_state() {
        let mut filter = DampingFilter::new();

        filter.process(1.0, 0.5);
        filter.reset();

        // With silent history, damping a zero input stays zero.
        let output = filter.process(0.0, 0.9);
        assert!(
            output.abs() < 1e-6,
            "Expected silence after reset, got {output}"
        );
    }
}
