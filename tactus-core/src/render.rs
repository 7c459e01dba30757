//! Render model
//!
//! The core never draws. It exposes what the presentation layer needs as
//! plain values: the tempo digits, the status label and a color hint the
//! display maps onto its own palette.

use core::fmt::Write;

use heapless::String;

use crate::state::RunState;
use crate::tempo::Tempo;

/// Capacity of the tempo text ("512" plus headroom)
pub const TEMPO_TEXT_LEN: usize = 4;

/// Palette-independent color hint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ColorHint {
    /// Running / good (green on color screens)
    Positive,
    /// Stopped / attention (red on color screens)
    Negative,
    /// Plain foreground
    Neutral,
}

impl ColorHint {
    /// Stable name of the hint
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorHint::Positive => "positive",
            ColorHint::Negative => "negative",
            ColorHint::Neutral => "neutral",
        }
    }
}

/// Everything the presentation layer shows
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RenderState {
    /// Tempo as decimal digits
    pub tempo_text: String<TEMPO_TEXT_LEN>,
    /// "ON" or "OFF"
    pub run_label: &'static str,
    /// Color of the run label
    pub run_color: ColorHint,
}

impl RenderState {
    /// Build the render state for a tempo and run state
    pub fn new(tempo: Tempo, run: RunState) -> Self {
        Self {
            tempo_text: tempo_text(tempo),
            run_label: run.label(),
            run_color: run.color(),
        }
    }
}

/// Format a tempo as decimal digits
pub fn tempo_text(tempo: Tempo) -> String<TEMPO_TEXT_LEN> {
    let mut text = String::new();
    // At most three digits, always fits
    let _ = write!(text, "{}", tempo.bpm());
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tempo_text() {
        assert_eq!(tempo_text(Tempo::MIN).as_str(), "16");
        assert_eq!(tempo_text(Tempo::DEFAULT).as_str(), "128");
        assert_eq!(tempo_text(Tempo::MAX).as_str(), "512");
    }

    #[test]
    fn test_render_state() {
        let on = RenderState::new(Tempo::DEFAULT, RunState::On);
        assert_eq!(on.tempo_text.as_str(), "128");
        assert_eq!(on.run_label, "ON");
        assert_eq!(on.run_color.as_str(), "positive");

        let off = RenderState::new(Tempo::DEFAULT, RunState::Off);
        assert_eq!(off.run_label, "OFF");
        assert_eq!(off.run_color, ColorHint::Negative);
    }
}
