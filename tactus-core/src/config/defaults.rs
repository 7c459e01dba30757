//! Default values and limits

/// Slowest selectable tempo (BPM)
pub const MIN_TEMPO: u16 = 16;

/// Fastest selectable tempo (BPM)
pub const MAX_TEMPO: u16 = 512;

/// Tempo change per accepted increase/decrease (BPM)
pub const TEMPO_STEP: u16 = 2;

/// Tempo used when nothing is stored
pub const DEFAULT_TEMPO: u16 = 128;

/// Milliseconds in one minute, used to turn BPM into a beat interval
pub const MS_PER_MINUTE: u32 = 60_000;

/// Pulse length used by the configured policy when nothing is stored
pub const DEFAULT_VIBE_DURATION_MS: u32 = 48;

/// Shortest pulse accepted from configuration
pub const MIN_VIBE_DURATION_MS: u32 = 1;

/// Longest pulse accepted from configuration
///
/// Even at 16 BPM a longer pulse would blur into a continuous buzz on an ERM.
pub const MAX_VIBE_DURATION_MS: u32 = 1_000;

/// Threshold policy: tempos at or above this get the short pulse
pub const THRESHOLD_TEMPO: u16 = 256;

/// Threshold policy: pulse length at fast tempos
pub const SHORT_PULSE_MS: u32 = 64;

/// Threshold policy: pulse length at slow tempos
pub const LONG_PULSE_MS: u32 = 96;
