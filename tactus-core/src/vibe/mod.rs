//! Haptic pulse patterns and the policy that picks them

pub mod pattern;
pub mod policy;

pub use pattern::{VibePattern, MAX_SEGMENTS};
pub use policy::{clamp_vibe_duration, parse_vibe_duration, PolicyKind, VibrationPolicy};
