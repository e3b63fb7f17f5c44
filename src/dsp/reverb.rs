//! # Reverb Engine
//!
//! A stereo reverb built entirely out of comb filters, split into two
//! stages the way real rooms behave:
//!
//! - **Early reflections**: 8 parallel combs per channel, each with
//!   one-pole damping in its feedback loop. Parallel combs at mutually
//!   unrelated delay times pile up into the dense cluster of first
//!   bounces you hear right after a sound.
//! - **Late reflections**: 4 serial combs per channel with a fixed 0.5
//!   feedback and no damping, each feeding the next. Chaining them
//!   multiplies their echo patterns into the long diffuse tail.
//!
//! ```text
//! (L + R) * pre_gain ──┬─► early[0] ─┐
//!                      ├─► early[1] ─┤
//!                      │    ...      (+)──► late[0] ─► late[1] ─► late[2] ─► late[3] ─┐
//!                      └─► early[7] ─┘                                                │
//!                                             dry*in + wet1*own + wet2*other ◄────────┘
//! ```
//!
//! Per channel the comb delay times are offset by ± half the spread
//! value, so the two channels' reflection patterns never line up
//! exactly. That decorrelation, plus the width control's cross-feed of
//! each channel's wet signal into the other (`wet1 = 1 + width`,
//! `wet2 = 1 - width`), is what makes the tail feel wide instead of
//! mono-in-the-middle.
//!
//! Every audible gain (damping, feedback, dry, and the two wet gains)
//! is an independently smoothed value stepped once per sample, so knob
//! movements land without clicks.

use nih_plug::prelude::{Smoother, SmoothingStyle};

use super::delay_line::{DelayLine, Interpolation};
use super::filter::DampingFilter;
use super::math;

/// Parallel damped combs per channel.
pub const NUM_EARLY_COMBS: usize = 8;
/// Serial undamped combs per channel.
pub const NUM_LATE_COMBS: usize = 4;

/// Capacity of each comb's delay line, in seconds. Comfortably above
/// the longest seed time plus the widest spread.
const COMB_CAPACITY_SECS: f32 = 0.1;

/// Smoothing window for comb delay-time changes.
const COMB_TIME_SMOOTH_SECS: f32 = 0.1;

/// Smoothing window for the five gain values, in milliseconds.
const GAIN_SMOOTH_MS: f32 = 50.0;

/// Extra headroom on the wet path; the expo-rounded mix curve tops out
/// below unity without it.
const WET_GAIN_SCALE: f32 = 1.2;

/// Control values for the reverb.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReverbParams {
    /// High-frequency damping inside the early combs, [0, 1].
    pub damping: f32,
    /// Room size; maps onto the early combs' feedback gain.
    pub size: f32,
    /// Dry/wet balance, [0, 1]. The wet level follows a rounded curve,
    /// not a linear crossfade.
    pub mix: f32,
    /// Stereo width, [0, 1]: how much of each channel's wet signal
    /// stays on its own side versus bleeding into the other.
    pub width: f32,
    /// Stereo spread in seconds, applied ± per channel to every comb's
    /// delay time. Clamped to a hair's width (10 ms total) internally.
    pub spread: f32,
}

/// One comb inside the reverb: a delay line plus the damping history
/// used by the early stage.
struct ReverbComb {
    buffer: DelayLine,
    damper: DampingFilter,
}

impl ReverbComb {
    fn new() -> Self {
        let mut comb = Self {
            buffer: DelayLine::new(),
            damper: DampingFilter::new(),
        };
        // Give the line a buffer immediately so delay times set before
        // the host's first prepare still have something to clamp
        // against; prepare() re-sizes it for the real rate.
        comb.prepare(44_100.0);
        comb
    }

    fn prepare(&mut self, sample_rate: f32) {
        self.buffer.prepare(COMB_CAPACITY_SECS, sample_rate);
        self.clear();
    }

    fn clear(&mut self) {
        self.damper.reset();
        self.buffer.clear();
    }

    fn set_time(&mut self, seconds: f32) {
        self.buffer
            .set_delay_time(seconds.clamp(0.001, 1.0), COMB_TIME_SMOOTH_SECS);
    }

    /// Early-reflection pass: damped recirculation, raw delayed sample
    /// to the output sum.
    fn process_early(&mut self, input: f32, damping: f32, feedback: f32) -> f32 {
        let delayed = self.buffer.read(Interpolation::None);
        let damped = self.damper.process(delayed, damping);

        self.buffer.push(input + damped * feedback);

        delayed
    }

    /// Late-reflection pass: fixed 0.5 feedback, and the output has the
    /// raw input subtracted. The polarity flip keeps the serial chain
    /// from reinforcing itself into a midrange honk; leave it as is.
    fn process_late(&mut self, input: f32) -> f32 {
        let delayed = self.buffer.read(Interpolation::None);

        self.buffer.push(input + delayed * 0.5);

        delayed - input
    }
}

/// The full stereo reverb.
pub struct Reverb {
    sample_rate: f32,
    params: ReverbParams,

    /// Input attenuation compensating for the parallel comb sum.
    pre_gain: f32,
    /// Wet/dry split derived from `mix` via the rounded transfer curve.
    wet: f32,
    dry: f32,

    damping_smooth: Smoother<f32>,
    feedback_smooth: Smoother<f32>,
    dry_smooth: Smoother<f32>,
    wet1_smooth: Smoother<f32>,
    wet2_smooth: Smoother<f32>,

    /// Comb banks indexed [channel][instance].
    early: [[ReverbComb; NUM_EARLY_COMBS]; 2],
    late: [[ReverbComb; NUM_LATE_COMBS]; 2],

    /// Seed delay times before the per-channel spread is applied.
    early_times: [f32; NUM_EARLY_COMBS],
    late_times: [f32; NUM_LATE_COMBS],
}

impl Default for Reverb {
    fn default() -> Self {
        Self::new()
    }
}

impl Reverb {
    pub fn new() -> Self {
        let mut reverb = Self {
            sample_rate: 44_100.0,
            params: ReverbParams::default(),
            pre_gain: 0.0,
            wet: 0.0,
            dry: 0.0,
            damping_smooth: Smoother::new(SmoothingStyle::Linear(GAIN_SMOOTH_MS)),
            feedback_smooth: Smoother::new(SmoothingStyle::Linear(GAIN_SMOOTH_MS)),
            dry_smooth: Smoother::new(SmoothingStyle::Linear(GAIN_SMOOTH_MS)),
            wet1_smooth: Smoother::new(SmoothingStyle::Linear(GAIN_SMOOTH_MS)),
            wet2_smooth: Smoother::new(SmoothingStyle::Linear(GAIN_SMOOTH_MS)),
            early: [
                std::array::from_fn(|_| ReverbComb::new()),
                std::array::from_fn(|_| ReverbComb::new()),
            ],
            late: [
                std::array::from_fn(|_| ReverbComb::new()),
                std::array::from_fn(|_| ReverbComb::new()),
            ],
            // Workable defaults in case no tuning is ever applied.
            early_times: [0.06, 0.04, 0.02, 0.01, 0.052, 0.036, 0.042, 0.024],
            late_times: [0.011, 0.054, 0.033, 0.023],
        };

        reverb.set_combs();
        // Seed the dry/wet split for the default mix of 0 (dry 1, wet
        // 0); the change detection in set_parameters works from this
        // baseline, and a mix that never moves must still pass dry.
        reverb.set_mix_values();
        reverb.prepare(44_100.0);
        reverb
    }

    /// Size every comb for the sample rate, re-apply the comb delay
    /// times at that rate, and clear all audio.
    pub fn prepare(&mut self, sample_rate: f32) {
        if sample_rate != self.sample_rate && sample_rate > 0.0 {
            self.sample_rate = sample_rate;
        }

        for channel in &mut self.early {
            for comb in channel {
                comb.prepare(self.sample_rate);
            }
        }
        for channel in &mut self.late {
            for comb in channel {
                comb.prepare(self.sample_rate);
            }
        }

        self.set_combs();
        self.clear();
    }

    /// Silence every comb without touching parameters.
    pub fn clear(&mut self) {
        for channel in &mut self.early {
            for comb in channel {
                comb.clear();
            }
        }
        for channel in &mut self.late {
            for comb in channel {
                comb.clear();
            }
        }
    }

    /// Apply a new parameter set, recomputing only what the changed
    /// values actually touch.
    pub fn set_parameters(&mut self, params: ReverbParams) {
        let old = self.params;
        self.params = params;

        if self.params.mix != old.mix {
            self.set_mix_values();
        }

        self.pre_gain = 0.1 / (NUM_EARLY_COMBS + NUM_LATE_COMBS) as f32;
        self.dry_smooth.set_target(self.sample_rate, self.dry);
        self.wet1_smooth.set_target(
            self.sample_rate,
            WET_GAIN_SCALE * self.wet * (1.0 + self.params.width),
        );
        self.wet2_smooth.set_target(
            self.sample_rate,
            WET_GAIN_SCALE * self.wet * (1.0 - self.params.width),
        );

        if self.params.spread != old.spread {
            self.set_combs();
        }

        if self.params.damping != old.damping || self.params.size != old.size {
            self.set_damping();
        }
    }

    /// Replace one early comb's seed delay time.
    pub fn set_early_comb_time(&mut self, seconds: f32, index: usize) {
        self.early_times[index.min(NUM_EARLY_COMBS - 1)] = seconds;
        self.set_combs();
    }

    /// Replace one late comb's seed delay time.
    pub fn set_late_comb_time(&mut self, seconds: f32, index: usize) {
        self.late_times[index.min(NUM_LATE_COMBS - 1)] = seconds;
        self.set_combs();
    }

    /// Process one stereo sample pair in place.
    pub fn process(&mut self, left: &mut f32, right: &mut f32) {
        let input = (*left + *right) * self.pre_gain;
        let damping = self.damping_smooth.next();
        let feedback = self.feedback_smooth.next();

        // Early reflections accumulate in parallel; the sum order does
        // not matter.
        let mut out_l = 0.0;
        let mut out_r = 0.0;
        for i in 0..NUM_EARLY_COMBS {
            out_l += self.early[0][i].process_early(input, damping, feedback);
            out_r += self.early[1][i].process_early(input, damping, feedback);
        }

        // Late reflections run strictly in series: each comb eats the
        // previous one's output.
        for i in 0..NUM_LATE_COMBS {
            out_l = self.late[0][i].process_late(out_l);
            out_r = self.late[1][i].process_late(out_r);
        }

        let dry = self.dry_smooth.next();
        let wet1 = self.wet1_smooth.next();
        let wet2 = self.wet2_smooth.next();

        // Width control: each channel keeps `wet1` of its own wet
        // signal and takes `wet2` of the other channel's.
        *left = dry * *left + wet1 * out_l + wet2 * out_r;
        *right = dry * *right + wet1 * out_r + wet2 * out_l;
    }

    /// Rough decay time: how long the longest early comb loop takes to
    /// fall 60 dB at the current feedback. Hosts use it to keep the
    /// tail alive after the input stops.
    pub fn tail_seconds(&self) -> f32 {
        let feedback = (self.params.size * FEEDBACK_SCALE + FEEDBACK_OFFSET).clamp(0.01, 0.98);
        let longest = self
            .early_times
            .iter()
            .fold(0.0_f32, |acc, &time| acc.max(time));

        // level after n loops = feedback^n; solve feedback^n = 0.001.
        let loops = -3.0 / feedback.log10();
        longest * loops
    }

    fn set_combs(&mut self) {
        let spread_amount = self.params.spread.clamp(0.0, 0.01) / 2.0;

        for (channel_idx, sign) in [(0, 1.0_f32), (1, -1.0_f32)] {
            let spread = spread_amount * sign;

            for i in 0..NUM_EARLY_COMBS {
                self.early[channel_idx][i].set_time(self.early_times[i] + spread);
            }
            for i in 0..NUM_LATE_COMBS {
                self.late[channel_idx][i].set_time(self.late_times[i] + spread);
            }
        }
    }

    fn set_mix_values(&mut self) {
        let mix = self.params.mix.clamp(0.0, 1.0);
        self.dry = 1.0 - mix;
        // The wet level rises on a rounded curve so the reverb blooms
        // through the middle of the control instead of arriving all at
        // the top.
        self.wet = math::expo_rounder(mix, 0.8) * 1.55;
    }

    fn set_damping(&mut self) {
        self.damping_smooth
            .set_target(self.sample_rate, self.params.damping * DAMP_SCALE);
        self.feedback_smooth.set_target(
            self.sample_rate,
            self.params.size * FEEDBACK_SCALE + FEEDBACK_OFFSET,
        );
    }
}

/// Scale factors mapping the user-facing damping/size controls onto
/// the combs' internal gains. Feedback never reaches 1: even a
/// full-size room decays.
const DAMP_SCALE: f32 = 0.9;
const FEEDBACK_SCALE: f32 = 0.78;
const FEEDBACK_OFFSET: f32 = 0.2;

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f32 = 44_100.0;

    fn prepared_reverb() -> Reverb {
        let mut reverb = Reverb::new();
        reverb.prepare(SR);
        reverb.set_parameters(ReverbParams {
            damping: 0.5,
            size: 0.3,
            mix: 0.6,
            width: 1.0,
            spread: 0.6,
        });
        reverb
    }

    fn process_stereo(reverb: &mut Reverb, left: f32, right: f32) -> (f32, f32) {
        let mut l = left;
        let mut r = right;
        reverb.process(&mut l, &mut r);
        (l, r)
    }

    /// Silence in, silence out: an idle reverb must not generate
    /// noise, offsets or denormal junk of its own.
    #[test]
    fn test_silence_in_silence_out() {
        let mut reverb = prepared_reverb();

        for _ in 0..10_000 {
            let (l, r) = process_stereo(&mut reverb, 0.0, 0.0);
            assert_eq!(l, 0.0);
            assert_eq!(r, 0.0);
        }
    }

    /// An impulse produces a non-silent wet response.
    #[test]
    fn test_impulse_produces_reverb() {
        let mut reverb = prepared_reverb();

        process_stereo(&mut reverb, 1.0, 1.0);
        let mut energy = 0.0_f32;
        for _ in 0..SR as usize {
            let (l, r) = process_stereo(&mut reverb, 0.0, 0.0);
            energy += l * l + r * r;
        }

        assert!(energy > 1e-6, "no tail energy after an impulse: {energy}");
    }

    /// The tail of an impulse decays: energy measured over successive
    /// half-second windows trends strictly downward after the early
    /// cluster, and never diverges.
    #[test]
    fn test_impulse_tail_decays() {
        let mut reverb = prepared_reverb();

        process_stereo(&mut reverb, 1.0, 1.0);

        let window = (SR / 2.0) as usize;
        let mut energies = Vec::new();
        for _ in 0..4 {
            let mut energy = 0.0_f64;
            for _ in 0..window {
                let (l, r) = process_stereo(&mut reverb, 0.0, 0.0);
                assert!(l.is_finite() && r.is_finite(), "tail went non-finite");
                energy += f64::from(l * l + r * r);
            }
            energies.push(energy);
        }

        // 2 seconds of tail in half-second windows: each must carry
        // less energy than the one before it. Once a window has fully
        // underflowed to zero, only require it not to come back.
        for pair in energies.windows(2) {
            if pair[0] > 1e-30 {
                assert!(
                    pair[1] < pair[0],
                    "tail energy rose between windows: {energies:?}"
                );
            } else {
                assert!(pair[1] <= pair[0], "dead tail revived: {energies:?}");
            }
        }
        assert!(
            energies[3] < energies[0] * 0.1,
            "tail barely decayed: {energies:?}"
        );
    }

    /// With mix = 0 the wet gains are zero: after the gain smoothing
    /// settles, output equals the dry input exactly.
    #[test]
    fn test_zero_mix_is_dry() {
        let mut reverb = Reverb::new();
        reverb.prepare(SR);
        reverb.set_parameters(ReverbParams {
            damping: 0.5,
            size: 0.3,
            mix: 0.0,
            width: 1.0,
            spread: 0.6,
        });

        // Let the dry gain ramp from its initial 0 to 1.
        for _ in 0..10_000 {
            process_stereo(&mut reverb, 0.3, -0.2);
        }

        let (l, r) = process_stereo(&mut reverb, 0.5, -0.25);
        assert!((l - 0.5).abs() < 1e-4, "left not dry: {l}");
        assert!((r + 0.25).abs() < 1e-4, "right not dry: {r}");
    }

    /// Full width keeps the cross-feed gain at zero; zero width sends
    /// both channels the same wet signal.
    #[test]
    fn test_width_controls_cross_feed() {
        // Zero width: wet1 == wet2, so a mono input must produce an
        // identical wet signal on both channels even though the comb
        // banks are detuned against each other.
        let mut reverb = Reverb::new();
        reverb.prepare(SR);
        reverb.set_parameters(ReverbParams {
            damping: 0.2,
            size: 0.4,
            mix: 1.0,
            width: 0.0,
            spread: 0.8,
        });

        process_stereo(&mut reverb, 1.0, 1.0);
        for _ in 0..20_000 {
            let (l, r) = process_stereo(&mut reverb, 0.0, 0.0);
            assert!(
                (l - r).abs() < 1e-5,
                "zero width should collapse the wet image: {l} vs {r}"
            );
        }
    }

    /// Clearing kills the tail outright.
    #[test]
    fn test_clear_silences_tail() {
        let mut reverb = prepared_reverb();

        process_stereo(&mut reverb, 1.0, 1.0);
        for _ in 0..1_000 {
            process_stereo(&mut reverb, 0.0, 0.0);
        }
        reverb.clear();

        // The gain smoothers keep their values; only audio is gone.
        for _ in 0..1_000 {
            let (l, r) = process_stereo(&mut reverb, 0.0, 0.0);
            assert_eq!(l, 0.0);
            assert_eq!(r, 0.0);
        }
    }

    /// The tail estimate grows with the room size and stays positive.
    #[test]
    fn test_tail_estimate_tracks_size() {
        let mut small = Reverb::new();
        small.prepare(SR);
        small.set_parameters(ReverbParams {
            size: 0.05,
            ..ReverbParams::default()
        });

        let mut large = Reverb::new();
        large.prepare(SR);
        large.set_parameters(ReverbParams {
            size: 0.9,
            ..ReverbParams::default()
        });

        assert!(small.tail_seconds() > 0.0);
        assert!(large.tail_seconds() > small.tail_seconds());
    }
}
