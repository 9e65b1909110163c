//! Input provider
//!
//! The host reports keyboard and gamepad state through [`InputProvider`];
//! [`gather_input`] folds it into the per-tick [`TickInput`].

use crate::sim::TickInput;

/// Stick deflection below this reads as centred
pub const DEADZONE: f32 = 0.25;

/// Logical buttons the game reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Left,
    Right,
    Jump,
    Action,
}

impl Button {
    pub const ALL: [Button; 4] = [Button::Left, Button::Right, Button::Jump, Button::Action];

    fn index(self) -> usize {
        self as usize
    }
}

/// Device state as the host engine sees it this frame
pub trait InputProvider {
    /// Key currently held
    fn key_down(&self, button: Button) -> bool;
    /// Key went down this frame
    fn key_pressed(&self, button: Button) -> bool;

    fn pad_down(&self, _button: Button) -> bool {
        false
    }

    fn pad_pressed(&self, _button: Button) -> bool {
        false
    }

    /// Raw left stick X in `[-1, 1]`
    fn stick_x(&self) -> f32 {
        0.0
    }
}

/// Zero out small deflections and rescale the rest to the full range
pub fn apply_deadzone(v: f32, deadzone: f32) -> f32 {
    let av = v.abs();
    if av < deadzone {
        0.0
    } else {
        let scaled = (av - deadzone) / (1.0 - deadzone);
        scaled.min(1.0) * v.signum()
    }
}

/// Build this frame's tick input from device state
pub fn gather_input(provider: &impl InputProvider) -> TickInput {
    let stick = apply_deadzone(provider.stick_x(), DEADZONE);
    let down = |b| provider.key_down(b) || provider.pad_down(b);
    let pressed = |b| provider.key_pressed(b) || provider.pad_pressed(b);

    TickInput {
        left: down(Button::Left) || stick < 0.0,
        right: down(Button::Right) || stick > 0.0,
        jump: pressed(Button::Jump),
        action: pressed(Button::Action),
    }
}

/// Plain recorded device state, used by scripted runs and tests
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSnapshot {
    pub down: [bool; 4],
    pub pressed: [bool; 4],
    pub stick_x: f32,
}

impl InputSnapshot {
    /// Hold `button`
    pub fn hold(mut self, button: Button) -> Self {
        self.down[button.index()] = true;
        self
    }

    /// Press `button` this frame (also counts as held)
    pub fn press(mut self, button: Button) -> Self {
        self.down[button.index()] = true;
        self.pressed[button.index()] = true;
        self
    }

    pub fn with_stick(mut self, x: f32) -> Self {
        self.stick_x = x;
        self
    }
}

impl InputProvider for InputSnapshot {
    fn key_down(&self, button: Button) -> bool {
        self.down[button.index()]
    }

    fn key_pressed(&self, button: Button) -> bool {
        self.pressed[button.index()]
    }

    fn stick_x(&self) -> f32 {
        self.stick_x
    }
}
