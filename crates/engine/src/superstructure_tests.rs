// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use rl_adapters::{
    ActuatorCall, ActuatorCommand, DriveCall, FieldPoseSelector, SimActuator, SimDrivebase,
    SimSensor,
};
use rl_core::{FakeClock, SchedulerEvent};
use std::time::Duration;
use yare::parameterized;

type SimSuperStructure = SuperStructure<SimActuator, SimDrivebase, FieldPoseSelector, SimSensor>;

struct Rig {
    arm: SimActuator,
    elevator: SimActuator,
    intake: SimActuator,
    drivebase: SimDrivebase,
    sensor: SimSensor,
    superstructure: SimSuperStructure,
    scheduler: Scheduler<FakeClock>,
    clock: FakeClock,
}

impl Rig {
    fn new() -> Self {
        let config = RobotConfig::default();
        let arm = SimActuator::new("arm", 180.0).with_position(config.arm.stow);
        let elevator = SimActuator::new("elevator", 40.0);
        let intake = SimActuator::new("intake", 1.0);
        let drivebase = SimDrivebase::new(150.0).with_pose(Pose::new(0.0, 0.0, 0.0));
        let sensor = SimSensor::new();
        sensor.set_present(true);
        let poses = FieldPoseSelector::new(
            config.field.reef,
            config.field.station,
            config.field.size(),
            config.field.alliance,
        );
        let superstructure = SuperStructure::new(
            SuperStructureDeps {
                arm: arm.clone(),
                elevator: elevator.clone(),
                intake: intake.clone(),
                drivebase: drivebase.clone(),
                poses,
                sensor: sensor.clone(),
            },
            config,
        );
        let clock = FakeClock::new();
        Self {
            arm,
            elevator,
            intake,
            drivebase,
            sensor,
            superstructure,
            scheduler: Scheduler::new(clock.clone()),
            clock,
        }
    }

    fn reef(&self) -> Pose {
        self.superstructure.config().field.reef
    }

    fn finished(&mut self) -> Vec<String> {
        self.scheduler
            .take_events()
            .into_iter()
            .filter_map(|event| match event {
                SchedulerEvent::Finished { name, .. } => Some(name),
                _ => None,
            })
            .collect()
    }
}

#[test]
fn structure_to_drives_both_mechanisms() {
    let mut rig = Rig::new();
    let task = rig.superstructure.structure_to(Level::L3).unwrap();
    assert_eq!(task.name(), "structure to L3");
    assert!(task.requirements().contains(&Resource::new("arm")));
    assert!(task.requirements().contains(&Resource::new("elevator")));

    rig.scheduler.schedule_task(task);
    rig.scheduler.tick();
    assert_eq!(rig.arm.command(), ActuatorCommand::Setpoint(45.0));
    assert_eq!(rig.elevator.command(), ActuatorCommand::Setpoint(28.0));
}

#[parameterized(
    both_at = { 45.0, 12.0, true },
    elevator_within_tolerance = { 45.0, 12.9, true },
    elevator_low = { 45.0, 10.0, false },
    arm_off = { 40.0, 12.0, false },
)]
fn structures_at_needs_both_within_tolerance(arm: f64, elevator: f64, expected: bool) {
    let rig = Rig::new();
    rig.arm.set_position(arm);
    rig.elevator.set_position(elevator);
    assert_eq!(rig.superstructure.structures_at(Level::L2).get(), expected);
}

#[test]
fn at_reef_reads_the_selected_pose_each_time() {
    let rig = Rig::new();
    let at_reef = rig.superstructure.at_reef();
    assert!(!at_reef.get());
    let reef = rig.reef();
    rig.drivebase.set_pose(Pose::new(reef.x + 1.0, reef.y, 180.0));
    assert!(at_reef.get());
    assert!(!rig.superstructure.at_station().get());
}

#[test]
fn score_walks_through_each_stage() {
    let mut rig = Rig::new();
    let score = rig.superstructure.score(Level::L2).unwrap();
    assert_eq!(score.name(), "score L2");
    let id = rig.scheduler.schedule_task(score);

    rig.scheduler.tick();
    assert!(rig.superstructure.mode().sequence_active());
    assert_eq!(
        rig.drivebase.calls(),
        vec![DriveCall::DriveToPose {
            target: rig.reef(),
            speed_scale: 0.8
        }]
    );
    assert_eq!(rig.elevator.calls(), vec![ActuatorCall::MoveTo(12.0)]);

    // near the reef but the elevator is still low
    rig.drivebase.set_pose(rig.reef());
    rig.arm.set_position(45.0);
    rig.scheduler.tick();
    assert_eq!(rig.drivebase.calls().len(), 1);

    // both conditions hold in the same tick
    rig.elevator.set_position(12.0);
    rig.scheduler.tick();
    assert_eq!(rig.drivebase.calls().last(), Some(&DriveCall::Stop));
    assert!(rig.intake.calls().is_empty());

    rig.clock.advance(Duration::from_millis(100));
    rig.scheduler.tick();
    assert_eq!(rig.intake.calls(), vec![ActuatorCall::RunAtSpeed(-0.8)]);
    assert_eq!(rig.elevator.command(), ActuatorCommand::Setpoint(12.0));

    // the piece never leaves; the shot gives up after its timeout
    rig.clock.advance(Duration::from_millis(1900));
    rig.scheduler.tick();
    assert_eq!(rig.drivebase.calls().last(), Some(&DriveCall::Stop));
    rig.clock.advance(Duration::from_millis(100));
    rig.scheduler.tick();
    assert_eq!(rig.drivebase.calls().last(), Some(&DriveCall::Retreat));
    assert_eq!(rig.intake.command(), ActuatorCommand::Idle);
    assert_eq!(rig.arm.command(), ActuatorCommand::Setpoint(90.0));
    assert_eq!(rig.elevator.command(), ActuatorCommand::Setpoint(0.0));

    rig.clock.advance(Duration::from_millis(500));
    rig.scheduler.tick();
    assert!(!rig.scheduler.is_active(id));
    assert!(!rig.superstructure.mode().sequence_active());
    assert!(rig.finished().contains(&"score L2".to_string()));
}

#[test]
fn score_shot_ends_when_the_piece_leaves() {
    let mut rig = Rig::new();
    rig.drivebase.set_pose(rig.reef());
    rig.arm.set_position(60.0);
    rig.elevator.set_position(52.0);
    rig.scheduler.schedule_task(rig.superstructure.score(Level::L4).unwrap());

    rig.scheduler.tick();
    rig.clock.advance(Duration::from_millis(100));
    rig.scheduler.tick();
    assert_eq!(rig.intake.command(), ActuatorCommand::Speed(-0.8));

    rig.sensor.set_present(false);
    rig.clock.advance(Duration::from_millis(20));
    rig.scheduler.tick();
    assert_eq!(rig.drivebase.calls().last(), Some(&DriveCall::Retreat));
}

#[test]
fn get_piece_stops_intaking_once_a_piece_is_held() {
    let mut rig = Rig::new();
    rig.sensor.set_present(false);
    rig.scheduler
        .schedule_task(rig.superstructure.get_piece().unwrap());

    rig.scheduler.tick();
    assert_eq!(rig.intake.command(), ActuatorCommand::Speed(0.6));
    assert_eq!(rig.arm.command(), ActuatorCommand::Setpoint(110.0));

    rig.sensor.set_present(true);
    rig.scheduler.tick();
    assert_eq!(rig.intake.command(), ActuatorCommand::Idle);
    assert_eq!(rig.drivebase.calls().last(), Some(&DriveCall::Retreat));
}

#[test]
fn get_piece_gives_up_after_pickup_timeout() {
    let mut rig = Rig::new();
    rig.sensor.set_present(false);
    rig.scheduler
        .schedule_task(rig.superstructure.get_piece().unwrap());
    rig.scheduler.tick();
    rig.clock.advance(Duration::from_secs(3));
    rig.scheduler.tick();
    assert_eq!(rig.drivebase.calls().last(), Some(&DriveCall::Retreat));
}

#[test]
fn toggling_twice_restores_the_stow_plan() {
    let mut rig = Rig::new();
    let original = rig.superstructure.stow_plan();
    assert_eq!(original, StowPlan::Hold);

    rig.scheduler
        .schedule_task(rig.superstructure.toggle_operator_controls());
    rig.scheduler.tick();
    assert_eq!(
        rig.superstructure.stow_plan(),
        StowPlan::Setpoint {
            arm: 90.0,
            elevator: 0.0
        }
    );

    rig.scheduler
        .schedule_task(rig.superstructure.toggle_operator_controls());
    rig.scheduler.tick();
    assert_eq!(rig.superstructure.stow_plan(), original);
}

#[test]
fn mode_changes_rederive_stow_defaults() {
    let mut rig = Rig::new();
    rig.superstructure
        .install_stow_defaults(&mut rig.scheduler)
        .unwrap();
    rig.scheduler.tick();
    assert_eq!(rig.arm.calls(), vec![ActuatorCall::Stop]);

    rig.scheduler.schedule_task(rig.superstructure.enable_pid());
    rig.scheduler.tick();
    rig.scheduler.tick();
    assert_eq!(
        rig.arm.calls(),
        vec![ActuatorCall::Stop, ActuatorCall::MoveTo(90.0)]
    );
    assert_eq!(rig.elevator.command(), ActuatorCommand::Setpoint(0.0));

    rig.scheduler.schedule_task(rig.superstructure.disable_pid());
    rig.scheduler.tick();
    rig.scheduler.tick();
    assert_eq!(rig.arm.calls().last(), Some(&ActuatorCall::Stop));
}

#[test]
fn update_stow_keeps_the_mode() {
    let mut rig = Rig::new();
    rig.scheduler
        .schedule_task(rig.superstructure.update_stow_command());
    rig.scheduler.tick();
    assert!(rig.superstructure.mode().is_manual());
    assert_eq!(
        rig.scheduler
            .default_for(&Resource::new("arm"))
            .and_then(|id| rig.scheduler.name(id)),
        Some("arm stow")
    );
}

#[test]
fn mode_is_locked_during_an_automatic_sequence() {
    let mut rig = Rig::new();
    rig.scheduler
        .schedule_task(rig.superstructure.score(Level::L1).unwrap());
    rig.scheduler.tick();

    rig.scheduler
        .schedule_task(rig.superstructure.toggle_operator_controls());
    rig.scheduler.tick();
    assert!(rig.superstructure.mode().is_manual());
}

#[test]
fn stop_all_manipulators_preempts_the_mechanisms() {
    let mut rig = Rig::new();
    rig.scheduler
        .schedule_task(rig.superstructure.structure_to(Level::L4).unwrap());
    rig.scheduler.tick();

    let stop = rig.superstructure.stop_all_manipulators().unwrap();
    assert!(stop.requirements().contains(&Resource::new("superstructure")));
    rig.scheduler.schedule_task(stop);
    rig.scheduler.tick();
    assert_eq!(rig.arm.command(), ActuatorCommand::Idle);
    assert_eq!(rig.elevator.command(), ActuatorCommand::Idle);
    assert_eq!(rig.intake.calls(), vec![ActuatorCall::Stop]);
}

#[parameterized(
    elevator_up = { Jog::ElevatorUp, "elevator", 0.4 },
    elevator_down = { Jog::ElevatorDown, "elevator", -0.4 },
    arm_up = { Jog::ArmUp, "arm", 0.3 },
    arm_down = { Jog::ArmDown, "arm", -0.3 },
)]
fn jog_runs_open_loop(jog: Jog, resource: &str, speed: f64) {
    let mut rig = Rig::new();
    let task = rig.superstructure.jog(jog);
    assert!(task.requirements().contains(&Resource::new(resource)));
    rig.scheduler.schedule_task(task);
    rig.scheduler.tick();
    let actuator = if resource == "arm" { &rig.arm } else { &rig.elevator };
    assert_eq!(actuator.command(), ActuatorCommand::Speed(speed));
}
