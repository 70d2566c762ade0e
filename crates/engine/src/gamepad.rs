// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared gamepad state and the triggers read from it

use crate::error::EngineError;
use rl_core::Trigger;
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};

/// Analog triggers count as pressed past this deflection
const TRIGGER_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Button {
    A,
    B,
    X,
    Y,
    LeftBumper,
    RightBumper,
    Start,
    Back,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    LeftX,
    LeftY,
    RightX,
    RightY,
    LeftTrigger,
    RightTrigger,
}

/// Anything an operator can hold down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Button(Button),
    /// Directional pad angle in degrees, 0 is up
    Pov(u16),
    LeftTrigger,
    RightTrigger,
}

impl FromStr for Control {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let control = match s.to_ascii_lowercase().as_str() {
            "a" => Control::Button(Button::A),
            "b" => Control::Button(Button::B),
            "x" => Control::Button(Button::X),
            "y" => Control::Button(Button::Y),
            "left-bumper" | "lb" => Control::Button(Button::LeftBumper),
            "right-bumper" | "rb" => Control::Button(Button::RightBumper),
            "start" => Control::Button(Button::Start),
            "back" => Control::Button(Button::Back),
            "pov-up" => Control::Pov(0),
            "pov-right" => Control::Pov(90),
            "pov-down" => Control::Pov(180),
            "pov-left" => Control::Pov(270),
            "left-trigger" | "lt" => Control::LeftTrigger,
            "right-trigger" | "rt" => Control::RightTrigger,
            _ => return Err(EngineError::UnknownInput(s.to_string())),
        };
        Ok(control)
    }
}

#[derive(Default)]
struct PadState {
    pressed: BTreeSet<Button>,
    pov: Option<u16>,
    axes: BTreeMap<Axis, f64>,
}

/// A controller whose state is written by the driver station (or a script)
/// and read by triggers
#[derive(Clone)]
pub struct Gamepad {
    name: Arc<str>,
    state: Arc<Mutex<PadState>>,
}

impl Gamepad {
    pub fn new(name: &str) -> Self {
        Self {
            name: Arc::from(name),
            state: Arc::new(Mutex::new(PadState::default())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn lock(&self) -> MutexGuard<'_, PadState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn press(&self, button: Button) {
        self.lock().pressed.insert(button);
    }

    pub fn release(&self, button: Button) {
        self.lock().pressed.remove(&button);
    }

    pub fn is_pressed(&self, button: Button) -> bool {
        self.lock().pressed.contains(&button)
    }

    pub fn set_pov(&self, angle: Option<u16>) {
        self.lock().pov = angle;
    }

    pub fn set_axis(&self, axis: Axis, value: f64) {
        self.lock().axes.insert(axis, value.clamp(-1.0, 1.0));
    }

    pub fn axis(&self, axis: Axis) -> f64 {
        self.lock().axes.get(&axis).copied().unwrap_or(0.0)
    }

    pub fn hold(&self, control: Control) {
        match control {
            Control::Button(button) => self.press(button),
            Control::Pov(angle) => self.set_pov(Some(angle)),
            Control::LeftTrigger => self.set_axis(Axis::LeftTrigger, 1.0),
            Control::RightTrigger => self.set_axis(Axis::RightTrigger, 1.0),
        }
    }

    pub fn let_go(&self, control: Control) {
        match control {
            Control::Button(button) => self.release(button),
            Control::Pov(angle) => {
                let mut state = self.lock();
                if state.pov == Some(angle) {
                    state.pov = None;
                }
            }
            Control::LeftTrigger => self.set_axis(Axis::LeftTrigger, 0.0),
            Control::RightTrigger => self.set_axis(Axis::RightTrigger, 0.0),
        }
    }

    pub fn button(&self, button: Button) -> Trigger {
        let pad = self.clone();
        Trigger::new(move || pad.is_pressed(button)).named(format!("{}.{button:?}", self.name))
    }

    pub fn pov(&self, angle: u16) -> Trigger {
        let pad = self.clone();
        Trigger::new(move || pad.lock().pov == Some(angle))
            .named(format!("{}.pov({angle})", self.name))
    }

    pub fn left_trigger(&self) -> Trigger {
        self.axis_trigger(Axis::LeftTrigger)
    }

    pub fn right_trigger(&self) -> Trigger {
        self.axis_trigger(Axis::RightTrigger)
    }

    fn axis_trigger(&self, axis: Axis) -> Trigger {
        let pad = self.clone();
        Trigger::new(move || pad.axis(axis) > TRIGGER_THRESHOLD)
            .named(format!("{}.{axis:?}", self.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yare::parameterized;

    #[parameterized(
        face = { "b", Control::Button(Button::B) },
        bumper = { "left-bumper", Control::Button(Button::LeftBumper) },
        short = { "RT", Control::RightTrigger },
        pov = { "pov-left", Control::Pov(270) },
    )]
    fn parses_control_names(input: &str, expected: Control) {
        assert_eq!(input.parse::<Control>().unwrap(), expected);
    }

    #[test]
    fn unknown_control_is_an_error() {
        assert!(matches!(
            "turbo".parse::<Control>(),
            Err(EngineError::UnknownInput(name)) if name == "turbo"
        ));
    }

    #[test]
    fn triggers_follow_shared_state() {
        let pad = Gamepad::new("operator");
        let a = pad.button(Button::A);
        let up = pad.pov(0);
        let lt = pad.left_trigger();
        assert_eq!(a.name(), "operator.A");
        assert!(!a.get() && !up.get() && !lt.get());

        let writer = pad.clone();
        writer.hold(Control::Button(Button::A));
        writer.hold(Control::Pov(0));
        writer.hold(Control::LeftTrigger);
        assert!(a.get() && up.get() && lt.get());

        writer.let_go(Control::Button(Button::A));
        writer.let_go(Control::Pov(0));
        writer.let_go(Control::LeftTrigger);
        assert!(!a.get() && !up.get() && !lt.get());
    }

    #[test]
    fn axes_are_clamped() {
        let pad = Gamepad::new("driver");
        pad.set_axis(Axis::LeftY, -3.0);
        assert_eq!(pad.axis(Axis::LeftY), -1.0);
        assert_eq!(pad.axis(Axis::RightX), 0.0);
    }
}
