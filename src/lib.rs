//! # Swell — An AU/VST3/CLAP Riser Effect
//!
//! A build-up/riser macro effect built with
//! [nih-plug](https://github.com/robbert-vdh/nih-plug). Four knobs
//! (doubler, filter, reverb, master) drive a fixed stereo chain; the
//! master amount scales the other three, so automating it alone
//! performs a complete rise.
//!
//! ## Signal Flow
//!
//! ```text
//! L ──► [comb "doubler"] ──► [lowpass] ──► [highpass] ──┐
//!                                                       ├──► [comb reverb] ──► clip ──► L, R
//! R ──► [comb "doubler"] ──► [lowpass] ──► [highpass] ──┘
//!       (detuned vs. L)      (closing)     (rising)           (mix/size/width open)
//! ```
//!
//! All of the actual DSP lives in [`dsp`]; this file is the shell that
//! adapts it to the plugin world: parameter delivery, buffer plumbing,
//! lifecycle calls, and the format export macros.

mod dsp;
mod params;

use std::num::NonZeroU32;
use std::sync::Arc;

use dsp::chain::EffectChain;
use nih_plug::prelude::*;
use params::SwellParams;

/// The main plugin struct.
///
/// Parameters (`SwellParams`) are shared with the host via `Arc` and
/// can be read from any thread; their smoothers deliver values to the
/// audio thread through atomics. The effect chain is owned exclusively
/// by the audio thread and only touched in `process()` (and in the
/// lifecycle callbacks the host serializes against it). That split is
/// what makes the design thread-safe without a single lock.
struct Swell {
    params: Arc<SwellParams>,

    /// Current sample rate in Hz. Set during `initialize()` and used
    /// to convert the chain's tail estimate into samples.
    sample_rate: f32,

    /// The complete macro-driven signal chain, both channels included.
    chain: EffectChain,
}

impl Default for Swell {
    fn default() -> Self {
        Self {
            params: Arc::new(SwellParams::default()),
            // Placeholder until initialize() reports the real rate.
            sample_rate: 44_100.0,
            chain: EffectChain::new(),
        }
    }
}

impl Plugin for Swell {
    const NAME: &'static str = "Swell";
    const VENDOR: &'static str = "Pale Blue Audio";
    const URL: &'static str = "";
    const EMAIL: &'static str = "hello@paleblue.audio";
    const VERSION: &'static str = env!("CARGO_PKG_VERSION");

    // The chain is inherently two-channel: the doubler detunes the
    // right comb against the left and the reverb cross-feeds the
    // channels, so only a stereo layout is offered.
    const AUDIO_IO_LAYOUTS: &'static [AudioIOLayout] = &[AudioIOLayout {
        main_input_channels: NonZeroU32::new(2),
        main_output_channels: NonZeroU32::new(2),
        aux_input_ports: &[],
        aux_output_ports: &[],
        names: PortNames::const_default(),
    }];

    // No MIDI; the effect is driven entirely by parameter automation.
    const MIDI_INPUT: MidiConfig = MidiConfig::None;

    const SAMPLE_ACCURATE_AUTOMATION: bool = true;

    type SysExMessage = ();
    type BackgroundTask = ();

    fn params(&self) -> Arc<dyn Params> {
        self.params.clone()
    }

    /// Called when the plugin loads and whenever the audio
    /// configuration changes. This is the only place the chain
    /// allocates: every delay buffer is sized here, so `process()` can
    /// run allocation-free forever after.
    fn initialize(
        &mut self,
        _audio_io_layout: &AudioIOLayout,
        buffer_config: &BufferConfig,
        _context: &mut impl InitContext<Self>,
    ) -> bool {
        self.sample_rate = buffer_config.sample_rate;
        self.chain.prepare(self.sample_rate);

        true
    }

    /// Called when playback stops or the plugin is bypassed. Clears
    /// all delay lines and filter registers so stale audio does not
    /// bleed into the next play session.
    fn reset(&mut self) {
        self.chain.reset();
    }

    /// The audio callback. Runs a few hundred times per second with a
    /// small buffer of samples each time.
    fn process(
        &mut self,
        buffer: &mut Buffer,
        _aux: &mut AuxiliaryBuffers,
        _context: &mut impl ProcessContext<Self>,
    ) -> ProcessStatus {
        let num_samples = buffer.samples();
        if num_samples == 0 {
            return ProcessStatus::Normal;
        }

        // Advance each macro's smoother across the whole block and
        // feed the chain once. Block-rate delivery is enough here:
        // every audibly exposed value downstream (delay times, reverb
        // gains) has its own per-sample ramp, and the chain ignores
        // unchanged tuples outright.
        let doubler = self.params.doubler_amount.smoothed.next_step(num_samples as u32);
        let filter = self.params.filter_amount.smoothed.next_step(num_samples as u32);
        let reverb = self.params.reverb_amount.smoothed.next_step(num_samples as u32);
        let master = self.params.master_amount.smoothed.next_step(num_samples as u32);
        self.chain.set_parameters(doubler, filter, reverb, master);

        // Hand the two channel slices to the chain for the in-place
        // series processing.
        if let [left, right] = buffer.as_slice() {
            self.chain.process(left, right);
        }

        // Report how long the reverb keeps ringing so hosts keep
        // calling process() after the input goes silent; otherwise the
        // tail would be cut off when a region ends.
        let tail_samples = (self.chain.tail_seconds() * self.sample_rate) as u32;
        ProcessStatus::Tail(tail_samples)
    }
}

// ─────────────────────────────────────────────────────────────────────
// Plugin format trait implementations
// ─────────────────────────────────────────────────────────────────────
//
// These traits tell nih-plug how to package the plugin for different
// plugin formats. We support both CLAP and VST3.

impl ClapPlugin for Swell {
    const CLAP_ID: &'static str = "audio.paleblue.swell";
    const CLAP_DESCRIPTION: Option<&'static str> =
        Some("A riser macro effect: doubler, filters and comb reverb on four knobs");
    const CLAP_MANUAL_URL: Option<&'static str> = None;
    const CLAP_SUPPORT_URL: Option<&'static str> = None;
    const CLAP_FEATURES: &'static [ClapFeature] = &[
        ClapFeature::AudioEffect,
        ClapFeature::Stereo,
        ClapFeature::Filter,
        ClapFeature::Reverb,
    ];
}

impl Vst3Plugin for Swell {
    // A 16-byte class ID that must be globally unique across all VST3
    // plugins. The `*b"..."` syntax turns a 16-character ASCII string
    // literal into a `[u8; 16]`.
    const VST3_CLASS_ID: [u8; 16] = *b"PaleBlueSwell_v1";

    const VST3_SUBCATEGORIES: &'static [Vst3SubCategory] =
        &[Vst3SubCategory::Fx, Vst3SubCategory::Filter, Vst3SubCategory::Reverb];
}

// ─────────────────────────────────────────────────────────────────────
// Export macros
// ─────────────────────────────────────────────────────────────────────
//
// These macros generate the C-compatible entry points that the host
// DAW uses to discover and load the plugin.
//
// nih_export_clap! exports the `clap_entry` symbol for CLAP hosts.
// nih_export_vst3! exports `GetPluginFactory` for VST3 hosts.
// clap_wrapper re-exports the CLAP entry point as AUv2 via the
// clap-wrapper crate, so Logic Pro (Audio Units only) can load it.

nih_export_clap!(Swell);
nih_export_vst3!(Swell);

clap_wrapper::export_auv2!();
