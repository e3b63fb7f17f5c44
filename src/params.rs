//! # Plugin Parameters
//!
//! The entire effect is played from four macro knobs, each a normalized
//! [0, 1] amount. Every internal stage parameter (comb tuning, filter
//! cutoffs, reverb mix and size) is derived from these four values by
//! the effect chain's mapping curves; nothing else is exposed. One
//! swept macro can therefore move a dozen internal parameters in a
//! voiced, coordinated way, which is the whole point of a riser effect.
//!
//! Each parameter has a **unique string ID** (`#[id = "..."]`) that the
//! host uses to save and recall presets. Once published, never change
//! these IDs or existing presets will break.
//!
//! ## Parameter Smoothing
//!
//! When a user moves a knob, the raw value jumps instantly, and
//! discontinuities sound like clicks or "zipper noise". Each macro
//! ramps over 20 ms here; the stages downstream add their own, longer
//! smoothing where the parameter is more exposed (delay times, reverb
//! gains).

use nih_plug::prelude::*;

/// The four macro amounts, shared with the host.
///
/// The `#[derive(Params)]` macro generates the code that registers
/// these parameters with the host DAW, handles preset serialization,
/// and manages parameter smoothing.
#[derive(Params)]
pub struct SwellParams {
    /// **Doubler** — the comb-filter voice thickener.
    ///
    /// Opening it raises the comb's wet level and feedback while the
    /// comb frequency climbs from 20 Hz to 280 Hz; the right channel
    /// detunes against the left on the way up. Subtle settings thicken,
    /// high settings turn metallic and hollow.
    #[id = "doublr"]
    pub doubler_amount: FloatParam,

    /// **Filter** — the band-narrowing sweep.
    ///
    /// Closes a lowpass from wide open down to 4 kHz while a highpass
    /// creeps up to 200 Hz, with both resonances sharpening. At full
    /// tilt the signal is squeezed into a focused, tense midrange band.
    #[id = "filter"]
    pub filter_amount: FloatParam,

    /// **Reverb** — the comb reverb's mix, size, width and spread,
    /// opened together on voiced curves.
    #[id = "reverb"]
    pub reverb_amount: FloatParam,

    /// **Master** — the intensity of the whole effect.
    ///
    /// Scales the other three amounts before they are mapped, so
    /// automating this one knob performs the entire rise. At zero the
    /// plugin is (near-)transparent regardless of the other settings.
    #[id = "master"]
    pub master_amount: FloatParam,
}

impl Default for SwellParams {
    fn default() -> Self {
        Self {
            doubler_amount: macro_param("Doubler Amount", 0.65),
            filter_amount: macro_param("Filter Amount", 1.0),
            reverb_amount: macro_param("Reverb Amount", 0.70),
            // Master starts silent-handed: the effect only engages as
            // the user (or their automation) pushes it up.
            master_amount: macro_param("Master Amount", 0.0),
        }
    }
}

/// All four macros share the same construction: a linear [0, 1] range,
/// 20 ms smoothing, and percentage display.
fn macro_param(name: &str, default: f32) -> FloatParam {
    FloatParam::new(name, default, FloatRange::Linear { min: 0.0, max: 1.0 })
        .with_smoother(SmoothingStyle::Linear(20.0))
        .with_unit("%")
        .with_value_to_string(formatters::v2s_f32_percentage(1))
        .with_string_to_value(formatters::s2v_f32_percentage())
}
