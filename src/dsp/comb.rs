//! # Comb Filter (Doubler)
//!
//! A comb filter is a short delay mixed back onto the signal. The
//! superposition of a signal and a delayed copy of itself notches out
//! every frequency whose period divides the delay time; on a spectrum
//! plot the response looks like the teeth of a comb. With delays in the
//! few-milliseconds range and a little feedback, the ear hears it as a
//! "doubled" or flanged voice rather than as an echo.
//!
//! ## Structure
//!
//! ```text
//!          ┌────────────────────────────── × wet ──┐
//!          │                                       │
//! input ──┬┴─► [delay line] ──► delayed            ▼
//!         │        ▲              │   └──────────►(+)──► output
//!         │        │              ▼
//!         └──────►(+)◄─── × feedback
//! ```
//!
//! The wet tap reads the *delayed* signal directly; the feedback path
//! only shapes what future reads will see. Pushing the feedback sum
//! while tapping the raw delayed sample for output gives the doubler
//! its slightly hollow, pitchy character. This is the voicing the whole
//! effect is tuned around, so keep the two paths distinct.
//!
//! Tuning is by frequency rather than time: `delay = 1 / freq`, so a
//! 200 Hz setting is a 5 ms comb. The per-channel `freq_offset_hz`
//! detunes one channel against the other, which decorrelates the stereo
//! image the same way two singers never double each other exactly.

use super::delay_line::{DelayLine, Interpolation};

/// Delay-time smoothing window. Frequency sweeps from the macro mapping
/// glide over this window instead of zipper-stepping.
const TIME_SMOOTH_SECS: f32 = 0.03;

/// Control values for one comb instance.
#[derive(Debug, Clone, Copy, Default)]
pub struct CombParams {
    /// Comb frequency in Hz; the delay time is its reciprocal.
    pub freq: f32,
    /// Gain of the delayed signal in the output sum.
    pub wet: f32,
    /// Gain of the recirculating path. Clamped to [0, 1] on the way in;
    /// anything above 1 would grow without bound.
    pub feedback: f32,
    /// Reconstruction mode for the fractional delay read.
    pub interpolation: Interpolation,
}

/// A single feed-forward comb filter with a recirculating delay line.
pub struct CombFilter {
    delay: DelayLine,
    params: CombParams,
}

impl Default for CombFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl CombFilter {
    pub fn new() -> Self {
        Self {
            delay: DelayLine::new(),
            params: CombParams::default(),
        }
    }

    /// Allocate one second of delay capacity and start with the read
    /// head on top of the write head.
    pub fn prepare(&mut self, sample_rate: f32) {
        self.delay.prepare(1.0, sample_rate);
        self.delay.set_delay_time(0.0, 0.0);
    }

    /// Drop any audio still circulating in the delay line.
    pub fn clear(&mut self) {
        self.delay.clear();
    }

    /// Apply a new parameter set.
    ///
    /// `freq_offset_hz` shifts this instance's tuning relative to the
    /// shared parameters; giving each stereo channel a different offset
    /// is what spreads the doubler across the image.
    pub fn set_parameters(&mut self, params: CombParams, freq_offset_hz: f32) {
        self.params = params;
        self.params.feedback = self.params.feedback.clamp(0.0, 1.0);

        self.delay
            .set_delay_time(1.0 / (self.params.freq + freq_offset_hz), TIME_SMOOTH_SECS);
    }

    /// Process one sample.
    ///
    /// Reads the delayed sample, recirculates `input + delayed *
    /// feedback` into the line, and returns `input + delayed * wet`.
    pub fn process(&mut self, input: f32) -> f32 {
        let delayed = self.delay.read(self.params.interpolation);

        let feedback_line = input + delayed * self.params.feedback;
        self.delay.push(feedback_line);

        input + delayed * self.params.wet
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f32 = 1024.0;

    /// A comb tuned to `SR / period` with instant (unsmoothed) delay,
    /// so impulse responses line up on exact sample counts.
    fn tuned_comb(period_samples: f32, feedback: f32, wet: f32) -> CombFilter {
        let mut comb = CombFilter::new();
        comb.prepare(SR);
        comb.set_parameters(
            CombParams {
                freq: SR / period_samples,
                wet,
                feedback,
                interpolation: Interpolation::None,
            },
            0.0,
        );
        // Walk the 30 ms tuning ramp to its target before measuring.
        for _ in 0..100 {
            comb.process(0.0);
        }
        comb
    }

    /// With wet = 0 the comb contributes nothing to the output, no
    /// matter what circulates inside.
    #[test]
    fn test_zero_wet_is_transparent() {
        let mut comb = tuned_comb(16.0, 0.9, 0.0);

        for i in 0..200 {
            let input = (i as f32 * 0.37).sin();
            let output = comb.process(input);
            assert!(
                (output - input).abs() < 1e-6,
                "sample {i}: expected {input}, got {output}"
            );
        }
    }

    /// The first echo of an impulse arrives one comb period late at
    /// exactly wet gain.
    #[test]
    fn test_impulse_first_echo_arrives_on_time() {
        let mut comb = tuned_comb(16.0, 0.5, 1.0);

        let first = comb.process(1.0);
        assert!((first - 1.0).abs() < 1e-6, "dry impulse altered: {first}");

        // The wet tap reads the raw delayed sample, so the first echo
        // carries the full impulse; only later passes have been scaled
        // by the feedback on their way back into the line.
        for step in 1..40 {
            let output = comb.process(0.0);
            let expected = match step {
                16 => 1.0,
                32 => 0.5,
                _ => 0.0,
            };
            assert!(
                (output - expected).abs() < 1e-6,
                "step {step}: expected {expected}, got {output}"
            );
        }
    }

    /// For feedback below 1 the recirculating energy must decay under
    /// a small epsilon within a bounded number of periods.
    #[test]
    fn test_feedback_below_one_decays() {
        for feedback in [0.3, 0.6, 0.9] {
            let mut comb = tuned_comb(16.0, feedback, 1.0);

            comb.process(1.0);
            let mut tail_max = 0.0_f32;
            for step in 1..2000 {
                let output = comb.process(0.0).abs();
                if step > 1500 {
                    tail_max = tail_max.max(output);
                }
            }

            assert!(
                tail_max < 1e-3,
                "feedback {feedback}: tail still at {tail_max}"
            );
        }
    }

    /// Feedback of exactly 1 sustains without growing.
    #[test]
    fn test_unity_feedback_sustains_without_growth() {
        let mut comb = tuned_comb(16.0, 1.0, 1.0);

        comb.process(1.0);
        let mut max_output = 0.0_f32;
        for _ in 1..2000 {
            max_output = max_output.max(comb.process(0.0).abs());
        }

        assert!(
            max_output <= 1.0 + 1e-4,
            "unity feedback grew to {max_output}"
        );
        // The loop must still be ringing at full level, not decaying.
        let mut late_max = 0.0_f32;
        for _ in 0..32 {
            late_max = late_max.max(comb.process(0.0).abs());
        }
        assert!(late_max > 0.9, "unity feedback decayed to {late_max}");
    }

    /// Feedback requests above 1 are clamped rather than honored.
    #[test]
    fn test_feedback_above_one_is_clamped() {
        let mut comb = tuned_comb(16.0, 4.0, 1.0);

        comb.process(1.0);
        let mut max_output = 0.0_f32;
        for _ in 1..4000 {
            max_output = max_output.max(comb.process(0.0).abs());
        }

        assert!(max_output <= 1.0 + 1e-4, "clamped comb grew to {max_output}");
    }

    /// Stereo detune: a nonzero frequency offset retunes the delay.
    #[test]
    fn test_frequency_offset_retunes_the_delay() {
        let mut comb = CombFilter::new();
        comb.prepare(SR);
        comb.set_parameters(
            CombParams {
                freq: SR / 32.0,
                wet: 1.0,
                feedback: 0.0,
                interpolation: Interpolation::None,
            },
            SR / 32.0, // doubles the frequency: 16-sample period
        );
        for _ in 0..100 {
            comb.process(0.0);
        }

        comb.process(1.0);
        for step in 1..=16 {
            let output = comb.process(0.0);
            let expected = if step == 16 { 1.0 } else { 0.0 };
            assert!(
                (output - expected).abs() < 1e-6,
                "step {step}: expected {expected}, got {output}"
            );
        }
    }
}
