//! Platform abstraction layer
//!
//! The host engine owns the window, devices and mixer. This layer defines
//! the narrow interfaces the core uses to reach them:
//! - Input (keyboard/gamepad state → `TickInput`)
//! - Audio (sound effect playback)

pub mod audio;
pub mod input;

pub use audio::{AudioSink, LogAudio};
pub use input::{Button, DEADZONE, InputProvider, InputSnapshot, gather_input};
