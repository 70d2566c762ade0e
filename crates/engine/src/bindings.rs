// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operator and driver control bindings

use crate::error::EngineError;
use crate::gamepad::{Axis, Button, Gamepad};
use crate::level::Level;
use crate::superstructure::{Jog, SuperStructure};
use rl_adapters::{Actuator, ChassisSpeeds, Drivebase, PieceSensor, PoseSelector, SpeedsSupplier};
use rl_core::{BindingKind, BoxTask, Clock, Scheduler, TaskExt, Trigger};
use std::sync::Arc;

/// Stick deflection ignored around center
const DEADBAND: f64 = 0.05;

/// Fraction of full speed the sticks can command
const TRANSLATION_SCALE: f64 = 0.8;

/// The two controllers at the driver station
#[derive(Clone)]
pub struct Controllers {
    pub driver: Gamepad,
    pub operator: Gamepad,
}

impl Default for Controllers {
    fn default() -> Self {
        Self {
            driver: Gamepad::new("driver"),
            operator: Gamepad::new("operator"),
        }
    }
}

fn deadband(value: f64) -> f64 {
    if value.abs() < DEADBAND {
        0.0
    } else {
        value
    }
}

/// Chassis speeds from the driver's sticks; pushing forward drives forward
pub fn driver_speeds(driver: &Gamepad) -> SpeedsSupplier {
    let pad = driver.clone();
    Arc::new(move || ChassisSpeeds {
        vx: -deadband(pad.axis(Axis::LeftY)) * TRANSLATION_SCALE,
        vy: -deadband(pad.axis(Axis::LeftX)) * TRANSLATION_SCALE,
        omega: -deadband(pad.axis(Axis::RightX)),
    })
}

struct Binder<'a, C: Clock> {
    scheduler: &'a mut Scheduler<C>,
}

impl<C: Clock> Binder<'_, C> {
    fn bind(&mut self, trigger: Trigger, kind: BindingKind, task: BoxTask) -> Result<(), EngineError> {
        let id = self.scheduler.register(task);
        self.scheduler.bind(trigger, kind, id)?;
        Ok(())
    }
}

/// Install the drive default and every controller binding
pub fn configure<C, A, D, P, S>(
    scheduler: &mut Scheduler<C>,
    superstructure: &SuperStructure<A, D, P, S>,
    controllers: &Controllers,
) -> Result<(), EngineError>
where
    C: Clock,
    A: Actuator,
    D: Drivebase,
    P: PoseSelector,
    S: PieceSensor,
{
    let drivebase = superstructure.drivebase();
    let speeds = driver_speeds(&controllers.driver);
    scheduler.set_default(drivebase.resource(), drivebase.drive_with(speeds.clone(), false))?;

    let mut binder = Binder { scheduler };
    binder.bind(
        controllers.driver.button(Button::Start),
        BindingKind::ToggleOnTrue,
        drivebase.drive_with(speeds, true),
    )?;

    let operator = &controllers.operator;
    let mode_unlocked = superstructure.automatic_sequence_active().negate();
    binder.bind(
        operator
            .left_trigger()
            .and(&operator.right_trigger())
            .and(&mode_unlocked),
        BindingKind::OnTrue,
        superstructure
            .toggle_operator_controls()
            .and_then(superstructure.update_stow_command())
            .with_name("toggle operator controls")
            .boxed(),
    )?;

    let manual = superstructure.is_operator_manual();
    let automatic = manual.negate();

    let presets = [
        (Button::A, Level::L1),
        (Button::B, Level::L2),
        (Button::X, Level::L3),
        (Button::Y, Level::L4),
    ];
    for (button, level) in presets {
        binder.bind(
            operator.button(button).and(&automatic),
            BindingKind::WhileTrue,
            superstructure.structure_to(level)?,
        )?;
    }

    let pov_jogs = [
        (0, Jog::ElevatorUp),
        (180, Jog::ElevatorDown),
        (90, Jog::ArmDown),
        (270, Jog::ArmUp),
    ];
    for (angle, jog) in pov_jogs {
        binder.bind(
            operator.pov(angle).and(&automatic),
            BindingKind::WhileTrue,
            superstructure.jog(jog),
        )?;
    }

    binder.bind(
        operator.button(Button::Start).and(&automatic),
        BindingKind::OnTrue,
        superstructure.stop_all_manipulators()?,
    )?;

    let manual_jogs = [
        (Button::A, Jog::ElevatorUp),
        (Button::B, Jog::ElevatorDown),
        (Button::X, Jog::ArmUp),
        (Button::Y, Jog::ArmDown),
    ];
    for (button, jog) in manual_jogs {
        binder.bind(
            operator.button(button).and(&manual),
            BindingKind::WhileTrue,
            superstructure.jog(jog),
        )?;
    }

    // the rollers answer the bumpers in either mode
    binder.bind(
        operator.button(Button::LeftBumper),
        BindingKind::WhileTrue,
        superstructure.intake(),
    )?;
    binder.bind(
        operator.button(Button::RightBumper),
        BindingKind::WhileTrue,
        superstructure.shoot(),
    )?;

    Ok(())
}
