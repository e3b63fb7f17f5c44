//! # Delay Line (Ring Buffer)
//!
//! A delay line stores audio samples and lets you read them back after a
//! specified time delay. This is the fundamental building block of the
//! doubler and of every comb inside the reverb.
//!
//! ## How a Ring Buffer Works
//!
//! Imagine a circular tape loop. A "write head" records incoming audio
//! onto the tape, and a "read head" plays it back from a position further
//! behind on the tape. The distance between the two heads determines the
//! delay time.
//!
//! In code, we use a `Vec<f32>` as our "tape" and an integer index as the
//! write head position. Reading N samples behind the write head means:
//!
//! ```text
//! read_index = (write_pos + buffer_len - N) % buffer_len
//! ```
//!
//! We add `buffer_len` before subtracting so the arithmetic never goes
//! negative (`usize` can't), and the modulo wraps the result back into
//! the valid range. The wrap must also hold for the *neighbors* of the
//! read index that interpolation touches: one step past index 0 lands on
//! the last slot of the buffer, not out of bounds.
//!
//! ## Fractional Delays
//!
//! The delay time is set in seconds, so the read offset in samples is
//! rarely a whole number. Three reconstruction modes are offered:
//!
//! - **None**: truncate to the nearest lower sample. Cheapest; fine for
//!   fixed delays like the reverb combs.
//! - **Linear**: blend the two neighboring samples by the fractional
//!   part. Smooth enough for slowly moving delays.
//! - **Cubic**: Catmull-Rom over four neighbors. Used where the delay
//!   time sweeps audibly and a two-point blend would dull the signal.
//!
//! The delay time itself is a smoothed value: every `read()` advances a
//! linear ramp one step toward the most recent target, so a parameter
//! jump glides over the smoothing window instead of snapping (which
//! would click).

use nih_plug::prelude::{Smoother, SmoothingStyle};

use super::math;

/// Hard upper bound on buffer capacity, in seconds of audio. Keeps a
/// bad `prepare` call from requesting gigabytes.
pub const MAX_CAPACITY_SECONDS: f32 = 600.0;

/// Reconstruction mode for fractional delay reads.
///
/// The set is closed and known at every call site, so this is a plain
/// enum dispatched with a `match`; no trait objects involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interpolation {
    /// Nearest-lower sample, no blending.
    #[default]
    None,
    /// Two-point blend by the fractional offset.
    Linear,
    /// Four-point Catmull-Rom blend.
    Cubic,
}

/// A ring buffer that functions as an audio delay line.
///
/// The buffer is allocated in [`prepare`](Self::prepare), never during
/// processing. This is critical for real-time audio: memory allocation
/// can block (waiting for a lock), causing audio dropouts.
pub struct DelayLine {
    /// The circular buffer storing audio samples.
    buffer: Vec<f32>,

    /// Current write position. Advances by 1 each push, wrapping to 0
    /// at `buffer_len`.
    write_pos: usize,

    /// Cached buffer length, stored to keep the modular arithmetic
    /// readable and to detect capacity changes in `prepare`.
    buffer_len: usize,

    /// Sample rate the line was last prepared at. Converts the delay
    /// time in seconds into a read offset in samples.
    sample_rate: f32,

    /// Smoothed delay time in seconds. The atomic ramp lets a control
    /// thread retarget the delay while the audio thread reads it.
    delay_time: Smoother<f32>,

    /// Current ramp target, cached so that re-sending an unchanged
    /// target does not restart an in-flight ramp.
    target_secs: f32,

    /// Length of the smoothing window in seconds. Changing it rebuilds
    /// the ramp from the current value.
    smooth_secs: f32,
}

impl Default for DelayLine {
    fn default() -> Self {
        Self::new()
    }
}

impl DelayLine {
    /// Create an empty, unprepared delay line. Reads return silence and
    /// writes are dropped until [`prepare`](Self::prepare) allocates a
    /// buffer.
    pub fn new() -> Self {
        Self {
            buffer: Vec::new(),
            write_pos: 0,
            buffer_len: 0,
            sample_rate: 44_100.0,
            delay_time: Smoother::new(SmoothingStyle::None),
            target_secs: 0.0,
            smooth_secs: 0.0,
        }
    }

    /// Allocate capacity for `capacity_seconds` of audio at the given
    /// sample rate. See [`prepare_samples`](Self::prepare_samples).
    pub fn prepare(&mut self, capacity_seconds: f32, sample_rate: f32) {
        let samples = (capacity_seconds.max(0.0) * sample_rate.max(0.0)) as usize;
        self.prepare_samples(samples, sample_rate);
    }

    /// Allocate a buffer of `capacity_samples` slots.
    ///
    /// Safe to call repeatedly: the backing buffer is only reallocated
    /// when the requested capacity actually changes (a sample-rate
    /// change with the same capacity keeps the allocation). The line is
    /// always cleared to silence afterwards, and the delay ramp snaps
    /// to its current target so a stale ramp from the previous rate
    /// can't keep stepping at the wrong speed.
    pub fn prepare_samples(&mut self, capacity_samples: usize, sample_rate: f32) {
        let sample_rate = if sample_rate > 0.0 { sample_rate } else { 1.0 };
        let capacity = capacity_samples.min((sample_rate * MAX_CAPACITY_SECONDS) as usize);

        if capacity != self.buffer_len {
            self.buffer = vec![0.0; capacity];
            self.buffer_len = capacity;
            self.write_pos = 0;
        }

        self.sample_rate = sample_rate;
        self.delay_time.reset(self.target_secs);
        self.clear();
    }

    /// Fill the buffer with silence. The write position and the delay
    /// target are untouched; only the stored audio is discarded.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
    }

    /// Capacity of the line, in samples.
    pub fn capacity(&self) -> usize {
        self.buffer_len
    }

    /// Retarget the delay time, ramping there over `smoothing_secs`.
    ///
    /// The requested time is clamped to what the buffer can hold. If
    /// the smoothing window itself changed, the ramp is rebuilt from
    /// the current value (not snapped) so the change stays click-free.
    /// Re-sending an unchanged target is a no-op and does not restart
    /// the ramp.
    pub fn set_delay_time(&mut self, seconds: f32, smoothing_secs: f32) {
        let smoothing_secs = smoothing_secs.max(0.0);
        let window_changed = smoothing_secs != self.smooth_secs;
        if window_changed {
            let current = self.delay_time.previous_value();
            self.delay_time = Smoother::new(ramp_style(smoothing_secs));
            self.delay_time.reset(current);
            self.smooth_secs = smoothing_secs;
        }

        let max_delay = self.buffer_len as f32 / self.sample_rate;
        let target = seconds.abs().clamp(0.0, max_delay);
        if !window_changed && target == self.target_secs {
            return;
        }

        self.target_secs = target;
        self.delay_time.set_target(self.sample_rate, target);
    }

    /// Write one sample at the write head and advance it.
    pub fn push(&mut self, sample: f32) {
        if self.buffer_len == 0 {
            return;
        }

        self.buffer[self.write_pos] = sample;
        self.write_pos += 1;
        if self.write_pos >= self.buffer_len {
            self.write_pos = 0;
        }
    }

    /// Read the currently delayed sample.
    ///
    /// Advances the delay-time ramp exactly one step, converts the
    /// smoothed time to a (possibly fractional) sample offset, and
    /// reconstructs the sample in the requested mode. An unprepared
    /// line reads as silence.
    pub fn read(&mut self, interpolation: Interpolation) -> f32 {
        if self.buffer_len == 0 {
            return 0.0;
        }

        let offset = self.delay_time.next() * self.sample_rate;
        match interpolation {
            Interpolation::None => self.buffer[self.read_index(offset as usize)],
            Interpolation::Linear => self.read_linear(offset),
            Interpolation::Cubic => self.read_cubic(offset),
        }
    }

    /// Push, then read: the single-pass form used where one call per
    /// sample does all the I/O a stage needs.
    pub fn push_and_read(&mut self, sample: f32, interpolation: Interpolation) -> f32 {
        self.push(sample);
        self.read(interpolation)
    }

    fn read_linear(&self, offset: f32) -> f32 {
        let index = self.read_index(offset as usize);
        // One step further back in time; wraps past index 0.
        let older = self.wrap_sub(index, 1);

        math::lerp(self.buffer[index], self.buffer[older], offset.fract())
    }

    fn read_cubic(&self, offset: f32) -> f32 {
        // Four taps span [index + 1, index - 2]; keeping the offset at
        // two samples or more keeps the newest tap behind the write
        // head instead of reading a slot that has not been written yet.
        let offset = offset.max(2.0);
        let index = self.read_index(offset as usize);

        let newer = self.wrap_add(index, 1);
        let older = self.wrap_sub(index, 1);
        let oldest = self.wrap_sub(index, 2);

        math::catmull_rom(
            self.buffer[newer],
            self.buffer[index],
            self.buffer[older],
            self.buffer[oldest],
            offset.fract(),
        )
    }

    /// Map a whole-sample offset behind the write head to a buffer
    /// index: `(write_pos + len - offset) % len`.
    fn read_index(&self, offset_samples: usize) -> usize {
        let offset = offset_samples.min(self.buffer_len);
        (self.write_pos + self.buffer_len - offset) % self.buffer_len
    }

    fn wrap_sub(&self, index: usize, steps: usize) -> usize {
        (index + self.buffer_len - steps) % self.buffer_len
    }

    fn wrap_add(&self, index: usize, steps: usize) -> usize {
        (index + steps) % self.buffer_len
    }
}

/// A zero-length window degrades to an unsmoothed snap; nih-plug's
/// `Linear(0.0)` would produce a zero-step ramp that never lands.
fn ramp_style(smoothing_secs: f32) -> SmoothingStyle {
    if smoothing_secs > 0.0 {
        SmoothingStyle::Linear(smoothing_secs * 1000.0)
    } else {
        SmoothingStyle::None
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    /// Test sample rate. A power of two keeps every `k / SR` delay time
    /// exactly representable, so `seconds * rate` reproduces the exact
    /// sample offset and truncation cannot land one slot short.
    const SR: f32 = 64.0;

    /// Delay time in seconds for an exact whole or fractional sample
    /// offset at the test rate.
    fn samples(n: f32) -> f32 {
        n / SR
    }

    /// A line prepared for 1 second at the test rate: 64 slots, small
    /// enough to reason about exactly.
    fn test_line() -> DelayLine {
        let mut dl = DelayLine::new();
        dl.prepare(1.0, SR);
        dl
    }

    /// Verify basic write-then-read at an exact sample position.
    #[test]
    fn test_write_and_read_exact() {
        let mut dl = test_line();
        dl.set_delay_time(samples(1.0), 0.0);

        dl.push(0.75);

        let result = dl.read(Interpolation::None);
        assert!((result - 0.75).abs() < 1e-6, "Expected 0.75, got {result}");
    }

    /// An impulse configured for an N-sample delay must come back on
    /// exactly the Nth read and nowhere else.
    #[test]
    fn test_delay_accuracy_without_interpolation() {
        let mut dl = test_line();
        dl.set_delay_time(samples(5.0), 0.0);

        // Per-sample pattern of the comb stages: read first, then push.
        for step in 0..20 {
            let out = dl.read(Interpolation::None);
            let expected = if step == 5 { 1.0 } else { 0.0 };
            assert!(
                (out - expected).abs() < 1e-6,
                "step {step}: expected {expected}, got {out}"
            );

            dl.push(if step == 0 { 1.0 } else { 0.0 });
        }
    }

    /// Verify linear interpolation between two samples.
    #[test]
    fn test_linear_interpolation_midpoint() {
        let mut dl = test_line();
        dl.set_delay_time(samples(1.5), 0.0);

        dl.push(0.0);
        dl.push(1.0);

        // 1.5 samples behind the write head: halfway between the 1.0
        // written last and the 0.0 before it.
        let result = dl.read(Interpolation::Linear);
        assert!((result - 0.5).abs() < 1e-6, "Expected 0.5, got {result}");
    }

    /// A whole-sample fractional offset must be an exact passthrough of
    /// the stored sample (the t = 0 boundary of the blend).
    #[test]
    fn test_linear_interpolation_integer_offset_is_exact() {
        let mut dl = test_line();
        dl.set_delay_time(samples(5.0), 0.0);

        for i in 0..10 {
            dl.push(i as f32 * 0.1);
        }

        // 5 samples behind the write head is the value 0.5 pushed at
        // step 5; the blend weight is exactly zero.
        let result = dl.read(Interpolation::Linear);
        assert!((result - 0.5).abs() < 1e-6, "Expected 0.5, got {result}");
    }

    /// Cubic reads at whole-sample offsets are exact passthroughs too.
    #[test]
    fn test_cubic_interpolation_integer_offset_is_exact() {
        let mut dl = test_line();
        dl.set_delay_time(samples(5.0), 0.0);

        for i in 0..10 {
            dl.push(i as f32 * 0.1);
        }

        let result = dl.read(Interpolation::Cubic);
        assert!((result - 0.5).abs() < 1e-6, "Expected 0.5, got {result}");
    }

    /// Interpolation neighbors must wrap around index 0 instead of
    /// reading out of bounds.
    #[test]
    fn test_interpolation_wraps_at_buffer_start() {
        let mut dl = DelayLine::new();
        dl.prepare_samples(8, SR);
        dl.set_delay_time(samples(1.5), 0.0);

        // One push: the write head sits at index 1, so the older
        // neighbor of read index 0 is the last slot of the buffer.
        dl.push(0.8);
        let result = dl.read(Interpolation::Linear);

        // The older neighbor (slot 7) is silent, so the blend halves
        // the stored sample.
        assert!((result - 0.4).abs() < 1e-6, "Expected 0.4, got {result}");
    }

    /// Cubic reads clamp the offset to two samples so the four taps
    /// never reach past the write head.
    #[test]
    fn test_cubic_guards_short_offsets() {
        let mut dl = test_line();
        dl.set_delay_time(0.0, 0.0);

        dl.push(0.3);
        dl.push(0.6);
        dl.push(0.9);

        // Offset 0 is forced up to 2: two samples behind the write
        // head is the 0.6 pushed second.
        let result = dl.read(Interpolation::Cubic);
        assert!((result - 0.6).abs() < 1e-6, "Expected 0.6, got {result}");
    }

    /// The smoothed delay time glides toward a new target one step per
    /// read instead of jumping.
    #[test]
    fn test_delay_time_ramps_per_read() {
        let mut dl = test_line();

        // Slots 0..8 hold the values 1..8; the write head sits at 8.
        for i in 1..=8 {
            dl.push(i as f32);
        }

        // Settle at a 2-sample delay: reads the 7.0 two slots back.
        dl.set_delay_time(samples(2.0), 0.0);
        let settled = dl.read(Interpolation::None);
        assert!((settled - 7.0).abs() < 1e-6, "Expected 7.0, got {settled}");

        // Retarget to 6 samples over a 4-step window. Each read must
        // step one sample further back through 6, 5, 4 toward 3, never
        // jumping straight to the 3.0 at the target offset.
        dl.set_delay_time(samples(6.0), samples(4.0));
        let ramp: Vec<f32> = (0..6).map(|_| dl.read(Interpolation::None)).collect();

        assert!(
            ramp[0] >= 6.0 - 1e-6 && ramp[0] <= 7.0 + 1e-6,
            "first read jumped: {ramp:?}"
        );
        for pair in ramp.windows(2) {
            assert!(pair[1] <= pair[0] + 1e-6, "ramp not monotonic: {ramp:?}");
        }
        assert!(
            (ramp[4] - 3.0).abs() < 1e-6 && (ramp[5] - 3.0).abs() < 1e-6,
            "ramp did not land on target: {ramp:?}"
        );
    }

    /// The combined push-then-read pass: with an N-sample delay, each
    /// call returns the value pushed N - 1 calls earlier (the read
    /// happens after the write head has advanced past the new sample).
    #[test]
    fn test_push_and_read_single_pass() {
        let mut dl = test_line();
        dl.set_delay_time(samples(3.0), 0.0);

        let outputs: Vec<f32> = (1..=5)
            .map(|v| dl.push_and_read(v as f32, Interpolation::None))
            .collect();

        assert_eq!(outputs, [0.0, 0.0, 1.0, 2.0, 3.0]);
    }

    /// Requested delay times beyond the capacity clamp to the buffer
    /// length instead of wrapping into nonsense.
    #[test]
    fn test_delay_time_clamps_to_capacity() {
        let mut dl = test_line();
        dl.set_delay_time(1_000.0, 0.0);

        dl.push(0.5);
        // A full-capacity offset is valid and must not panic.
        let _ = dl.read(Interpolation::None);
    }

    /// Preparing twice with identical arguments keeps the allocation
    /// and the read/write geometry; the audio is cleared both times.
    #[test]
    fn test_prepare_is_idempotent() {
        let mut dl = test_line();
        dl.set_delay_time(samples(3.0), 0.0);

        for i in 0..5 {
            dl.push(i as f32);
        }
        dl.prepare(1.0, SR);

        assert_eq!(dl.capacity(), 64);

        // Audio is gone after the second prepare.
        let result = dl.read(Interpolation::None);
        assert!(result.abs() < 1e-6, "Expected silence, got {result}");

        // Geometry still works: a fresh impulse comes back on time.
        dl.set_delay_time(samples(2.0), 0.0);
        dl.push(1.0);
        dl.push(0.0);
        let result = dl.read(Interpolation::None);
        assert!((result - 1.0).abs() < 1e-6, "Expected 1.0, got {result}");
    }

    /// An unprepared (zero-capacity) line must not read or write out
    /// of bounds; it is simply silent.
    #[test]
    fn test_zero_capacity_is_silent() {
        let mut dl = DelayLine::new();
        dl.set_delay_time(0.5, 0.0);

        dl.push(1.0);
        for interp in [Interpolation::None, Interpolation::Linear, Interpolation::Cubic] {
            assert_eq!(dl.read(interp), 0.0);
        }
    }

    /// A buffer initialized to silence outputs silence at any delay.
    #[test]
    fn test_silence_in_silence_out() {
        let mut dl = test_line();

        for delay in [0.01, 0.1, 0.5, 0.99] {
            dl.set_delay_time(delay, 0.0);
            let result = dl.read(Interpolation::Linear);
            assert!(
                result.abs() < 1e-6,
                "Expected silence at delay {delay}, got {result}"
            );
        }
    }

    /// Writing a sequence and reading it back produces the correct
    /// order (FIFO behavior).
    #[test]
    fn test_fifo_sequence() {
        let mut dl = test_line();

        for i in 1..=5 {
            dl.push(i as f32);
        }

        // Most recent first: 1 sample back is the last value written.
        for (delay_samples, expected) in [(1, 5.0), (2, 4.0), (3, 3.0), (4, 2.0), (5, 1.0)] {
            dl.set_delay_time(samples(delay_samples as f32), 0.0);
            let result = dl.read(Interpolation::None);
            assert!(
                (result - expected).abs() < 1e-6,
                "{delay_samples} back: expected {expected}, got {result}"
            );
        }
    }
}
