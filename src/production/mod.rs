//! Production documents written alongside the cut: the sound design sheet
//! and per-shot prompts for video generation services.

pub mod prompts;
pub mod sound;

pub use prompts::{StyleGuide, TechnicalSpecs, VideoPrompt};
pub use sound::{timecode, SoundCue, SoundDesign};
