//! # Biquad Filter
//!
//! A second-order (12 dB/octave) recursive filter, configurable as
//! lowpass or highpass. Five coefficients fully describe it:
//!
//! ```text
//! y[n] = a0*x[n] + a1*x[n-1] + a2*x[n-2] - b1*y[n-1] - b2*y[n-2]
//! ```
//!
//! We run the transposed direct-form-II arrangement of that equation,
//! which folds the four history samples into two running registers.
//! Fewer state variables, and the intermediate sums stay closer to the
//! output's magnitude, which is kinder to floating point.
//!
//! ## Coefficients
//!
//! Both filter types start from the tangent-warped frequency
//!
//! ```text
//! k = tan(π * cutoff / sample_rate)
//! ```
//!
//! which maps the analog prototype's cutoff onto the digital frequency
//! axis, and share the normalization `n = 1 / (1 + k/Q + k²)` and the
//! same feedback pair `b1, b2`. Lowpass and highpass differ only in
//! the numerator: `k²·n` scaled by {1, 2, 1} for lowpass, `n` scaled
//! by {1, -2, 1} for highpass.
//!
//! The tangent and the divisions are not free, so coefficients are only
//! recomputed when cutoff, Q or sample rate actually changed since the
//! last computation. Callers are expected to keep Q above zero and the
//! cutoff below Nyquist; the chain's mapping ranges guarantee both.
//!
//! All coefficient math runs in f64. The recurrence feeds outputs back
//! on themselves, so single-precision rounding would accumulate where
//! it hurts most; the samples crossing the API stay f32.

/// Which response the filter implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterKind {
    #[default]
    Lowpass,
    Highpass,
}

/// Control values for one biquad instance.
#[derive(Debug, Clone, Copy)]
pub struct BiquadParams {
    pub kind: FilterKind,
    /// Cutoff frequency in Hz. Must sit below the Nyquist frequency.
    pub cutoff: f64,
    /// Resonance. 1/√2 is the flattest (Butterworth) response; higher
    /// values peak at the cutoff. Must be positive.
    pub q: f64,
    /// A disabled filter passes audio through untouched and skips all
    /// coefficient work.
    pub enabled: bool,
}

impl Default for BiquadParams {
    fn default() -> Self {
        Self {
            kind: FilterKind::Lowpass,
            cutoff: 500.0,
            q: std::f64::consts::FRAC_1_SQRT_2,
            enabled: true,
        }
    }
}

/// A lowpass/highpass biquad with lazily recomputed coefficients.
pub struct BiquadFilter {
    params: BiquadParams,
    sample_rate: f64,

    // Numerator, feedback coefficients, and the two transposed-form
    // delay registers.
    a0: f64,
    a1: f64,
    a2: f64,
    b1: f64,
    b2: f64,
    z1: f64,
    z2: f64,

    // Intermediates kept across partial recomputations: `k` survives a
    // Q-only change, `n` survives a cutoff-only change.
    k: f64,
    k2: f64,
    n: f64,

    // Change tracking for the lazy recompute.
    prev_cutoff: f64,
    prev_q: f64,
    prev_sample_rate: f64,
}

impl Default for BiquadFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl BiquadFilter {
    /// Create a filter in its passthrough state (`a0 = 1`, everything
    /// else zero) with default parameters.
    pub fn new() -> Self {
        Self {
            params: BiquadParams::default(),
            sample_rate: 0.0,
            a0: 1.0,
            a1: 0.0,
            a2: 0.0,
            b1: 0.0,
            b2: 0.0,
            z1: 0.0,
            z2: 0.0,
            k: 0.0,
            k2: 0.0,
            n: 0.0,
            prev_cutoff: 0.0,
            prev_q: 0.0,
            prev_sample_rate: 0.0,
        }
    }

    /// Record the sample rate used by the next coefficient update.
    pub fn prepare(&mut self, sample_rate: f32) {
        self.sample_rate = f64::from(sample_rate);
    }

    /// Zero the delay registers.
    ///
    /// Called when playback stops so the filter's history does not
    /// ring into the next session.
    pub fn reset(&mut self) {
        self.z1 = 0.0;
        self.z2 = 0.0;
    }

    /// Apply a new parameter set, recomputing coefficients as needed.
    ///
    /// A disabled filter skips the update entirely; the coefficients
    /// are refreshed when it is next enabled.
    pub fn set_parameters(&mut self, params: BiquadParams) {
        self.params = params;

        if !self.params.enabled {
            return;
        }

        self.update_coefficients();
    }

    /// Process one sample through the two-register recurrence.
    pub fn process(&mut self, input: f32) -> f32 {
        if !self.params.enabled {
            return input;
        }

        let input = f64::from(input);
        let output = input * self.a0 + self.z1;
        self.z1 = input * self.a1 + self.z2 - self.b1 * output;
        self.z2 = input * self.a2 - self.b2 * output;

        output as f32
    }

    fn update_coefficients(&mut self) {
        let p = &self.params;

        // The tangent is the expensive part; skip it unless the warped
        // frequency actually moved.
        if p.cutoff != self.prev_cutoff || self.sample_rate != self.prev_sample_rate {
            nih_plug::nih_debug_assert!(self.sample_rate > 0.0);

            self.k = (std::f64::consts::PI * (p.cutoff / self.sample_rate)).tan();
            self.k2 = self.k * self.k;

            self.prev_cutoff = p.cutoff;
            self.prev_sample_rate = self.sample_rate;
        }
        if p.q != self.prev_q {
            self.n = 1.0 / (1.0 + self.k / p.q + self.k2);

            self.prev_q = p.q;
        }

        match p.kind {
            FilterKind::Lowpass => {
                self.a0 = self.k2 * self.n;
                self.a1 = 2.0 * self.a0;
                self.a2 = self.a0;
            }
            FilterKind::Highpass => {
                self.a0 = self.n;
                self.a1 = -2.0 * self.a0;
                self.a2 = self.a0;
            }
        }
        self.b1 = 2.0 * (self.k2 - 1.0) * self.n;
        self.b2 = (1.0 - self.k / p.q + self.k2) * self.n;
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f32 = 44_100.0;

    fn filter(kind: FilterKind, cutoff: f64, q: f64) -> BiquadFilter {
        let mut f = BiquadFilter::new();
        f.prepare(SR);
        f.set_parameters(BiquadParams {
            kind,
            cutoff,
            q,
            enabled: true,
        });
        f
    }

    /// A disabled filter returns its input unchanged for any sequence.
    #[test]
    fn test_disabled_filter_is_passthrough() {
        let mut f = BiquadFilter::new();
        f.prepare(SR);
        f.set_parameters(BiquadParams {
            enabled: false,
            ..BiquadParams::default()
        });

        for i in 0..500 {
            let input = (i as f32 * 0.13).sin() * 0.8;
            assert_eq!(f.process(input), input);
        }
    }

    /// A lowpass passes DC at unity gain: the recurrence must converge
    /// to the input level for a constant signal.
    #[test]
    fn test_lowpass_dc_gain_is_unity() {
        let mut f = filter(FilterKind::Lowpass, 1000.0, std::f64::consts::FRAC_1_SQRT_2);

        let mut output = 0.0;
        for _ in 0..20_000 {
            output = f.process(1.0);
        }

        assert!(
            (output - 1.0).abs() < 1e-4,
            "lowpass DC gain should be 1, got {output}"
        );
    }

    /// A highpass blocks DC entirely.
    #[test]
    fn test_highpass_blocks_dc() {
        let mut f = filter(FilterKind::Highpass, 200.0, std::f64::consts::FRAC_1_SQRT_2);

        let mut output = 1.0;
        for _ in 0..20_000 {
            output = f.process(1.0);
        }

        assert!(
            output.abs() < 1e-4,
            "highpass should remove DC, got {output}"
        );
    }

    /// A lowpass well below a tone's frequency attenuates it heavily; a
    /// lowpass well above passes it nearly untouched.
    #[test]
    fn test_lowpass_separates_bands() {
        let tone_hz = 8_000.0;
        let amplitude = |mut f: BiquadFilter| {
            let mut peak = 0.0_f32;
            for i in 0..8_192 {
                let phase = i as f32 * tone_hz * std::f32::consts::TAU / SR;
                let out = f.process(phase.sin());
                // Measure after the transient settles.
                if i > 4_096 {
                    peak = peak.max(out.abs());
                }
            }
            peak
        };

        let open = amplitude(filter(
            FilterKind::Lowpass,
            20_000.0,
            std::f64::consts::FRAC_1_SQRT_2,
        ));
        let closed = amplitude(filter(
            FilterKind::Lowpass,
            500.0,
            std::f64::consts::FRAC_1_SQRT_2,
        ));

        assert!(open > 0.8, "open filter should pass the tone, got {open}");
        assert!(
            closed < 0.05,
            "closed filter should crush the tone, got {closed}"
        );
    }

    /// Output stays finite and bounded for a stable configuration fed
    /// with a full-scale signal, over a long run.
    #[test]
    fn test_filter_is_stable() {
        let mut f = filter(FilterKind::Lowpass, 4_000.0, 0.85);

        for i in 0..100_000 {
            let input = if i % 2 == 0 { 1.0 } else { -1.0 };
            let out = f.process(input);
            assert!(out.is_finite(), "output went non-finite at sample {i}");
            assert!(out.abs() < 10.0, "output blew up at sample {i}: {out}");
        }
    }

    /// Changing only Q keeps the cached tangent; the filter must still
    /// track the new resonance (no stale-cache passthrough).
    #[test]
    fn test_q_only_change_updates_response() {
        let mut f = filter(FilterKind::Lowpass, 1000.0, 0.5);

        // Same cutoff, higher Q: the response near the cutoff peaks.
        f.set_parameters(BiquadParams {
            kind: FilterKind::Lowpass,
            cutoff: 1000.0,
            q: 4.0,
            enabled: true,
        });

        let mut peak = 0.0_f32;
        for i in 0..32_768 {
            let phase = i as f32 * 1000.0 * std::f32::consts::TAU / SR;
            let out = f.process(phase.sin());
            if i > 16_384 {
                peak = peak.max(out.abs());
            }
        }

        // Q = 4 means roughly 12 dB of gain at the cutoff.
        assert!(peak > 2.0, "expected resonant peak, got {peak}");
    }

    /// reset() silences the registers: after a loud burst and a reset,
    /// zero input produces zero output immediately.
    #[test]
    fn test_reset_clears_registers() {
        let mut f = filter(FilterKind::Lowpass, 1000.0, std::f64::consts::FRAC_1_SQRT_2);

        for _ in 0..100 {
            f.process(1.0);
        }
        f.reset();

        let out = f.process(0.0);
        assert!(out.abs() < 1e-9, "registers not cleared, got {out}");
    }
}
