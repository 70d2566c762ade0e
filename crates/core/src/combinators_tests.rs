// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::clock::{Clock, FakeClock};
use crate::resource::Resource;
use crate::task::{none, run, FunctionalTask, TaskEffect};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

type Log = Arc<Mutex<Vec<String>>>;

/// Records its lifecycle into `log` and finishes after `ticks` executes
fn recorder(log: &Log, name: &str, resource: &str, ticks: Option<usize>) -> BoxTask {
    let (a, b, c) = (log.clone(), log.clone(), log.clone());
    let (n1, n2, n3) = (name.to_string(), name.to_string(), name.to_string());
    let executed = Arc::new(Mutex::new(0usize));
    let (e1, e2, e3) = (executed.clone(), executed.clone(), executed);
    let requirements = if resource.is_empty() {
        ResourceSet::new()
    } else {
        ResourceSet::from(Resource::new(resource))
    };
    FunctionalTask::new(name)
        .requiring(requirements)
        .on_init(move |_| {
            *e1.lock().unwrap() = 0;
            a.lock().unwrap().push(format!("{n1}:init"));
        })
        .on_execute(move |_| {
            *e2.lock().unwrap() += 1;
            b.lock().unwrap().push(format!("{n2}:exec"));
        })
        .finish_when(move |_| ticks.is_some_and(|t| *e3.lock().unwrap() >= t))
        .on_end(move |_, interrupted| {
            c.lock().unwrap().push(format!("{n3}:end({interrupted})"));
        })
        .boxed()
}

struct Harness {
    clock: FakeClock,
    effects: Vec<TaskEffect>,
}

impl Harness {
    fn new() -> Self {
        Self {
            clock: FakeClock::new(),
            effects: Vec::new(),
        }
    }

    fn init(&mut self, task: &mut impl Task) {
        task.initialize(&mut TaskContext::new(self.clock.now(), &mut self.effects));
    }

    /// One scheduler-style step: execute, then check the predicate
    fn step(&mut self, task: &mut impl Task) -> bool {
        let mut ctx = TaskContext::new(self.clock.now(), &mut self.effects);
        task.execute(&mut ctx);
        task.is_finished(&mut ctx)
    }

    fn end(&mut self, task: &mut impl Task, interrupted: bool) {
        task.end(
            &mut TaskContext::new(self.clock.now(), &mut self.effects),
            interrupted,
        );
    }
}

fn entries(log: &Log) -> Vec<String> {
    log.lock().unwrap().clone()
}

#[test]
fn sequence_runs_children_in_order_without_overlap() {
    let log = Log::default();
    let mut seq = sequence(vec![
        recorder(&log, "a", "arm", Some(2)),
        recorder(&log, "b", "elevator", Some(1)),
    ])
    .unwrap();
    let mut h = Harness::new();

    h.init(&mut seq);
    assert!(!h.step(&mut seq));
    assert!(!h.step(&mut seq));
    assert!(h.step(&mut seq));
    h.end(&mut seq, false);

    assert_eq!(
        entries(&log),
        vec![
            "a:init",
            "a:exec",
            "a:exec",
            "a:end(false)",
            "b:init",
            "b:exec",
            "b:end(false)",
        ]
    );
}

#[test]
fn sequence_requires_union_for_whole_duration() {
    let log = Log::default();
    let seq = sequence(vec![
        recorder(&log, "a", "arm", Some(1)),
        recorder(&log, "b", "arm", Some(1)),
        recorder(&log, "c", "drivebase", Some(1)),
    ])
    .unwrap();
    assert_eq!(seq.requirements().to_string(), "{arm, drivebase}");
}

#[test]
fn interrupted_sequence_only_ends_current_child() {
    let log = Log::default();
    let mut seq = recorder(&log, "a", "arm", Some(1)).and_then(recorder(&log, "b", "arm", None));
    let mut h = Harness::new();

    h.init(&mut seq);
    h.step(&mut seq);
    h.step(&mut seq);
    h.end(&mut seq, true);

    let log = entries(&log);
    assert_eq!(log.iter().filter(|e| e.ends_with("end(true)")).count(), 1);
    assert_eq!(log.last().map(String::as_str), Some("b:end(true)"));
}

#[test]
fn parallel_finishes_when_all_children_finish() {
    let log = Log::default();
    let mut par = recorder(&log, "fast", "arm", Some(1))
        .along_with(recorder(&log, "slow", "elevator", Some(3)))
        .unwrap();
    let mut h = Harness::new();

    h.init(&mut par);
    assert!(!h.step(&mut par));
    assert!(!h.step(&mut par));
    assert!(h.step(&mut par));

    let log = entries(&log);
    // the early finisher is not restarted
    assert_eq!(log.iter().filter(|e| *e == "fast:exec").count(), 1);
    assert_eq!(log.iter().filter(|e| *e == "fast:init").count(), 1);
    assert!(log.contains(&"slow:end(false)".to_string()));
}

#[test]
fn parallel_rejects_overlapping_requirements() {
    let log = Log::default();
    let result = parallel(vec![
        recorder(&log, "a", "arm", None),
        recorder(&log, "b", "arm", None),
    ]);
    assert!(matches!(
        result,
        Err(ConfigError::OverlappingRequirements { overlap }) if overlap.contains(&Resource::new("arm"))
    ));
}

#[test]
fn empty_composites_are_rejected() {
    assert_eq!(
        sequence(vec![]).err(),
        Some(ConfigError::EmptyComposite { kind: "sequence" })
    );
    assert!(parallel(vec![]).is_err());
    assert!(race(vec![]).is_err());
}

#[test]
fn interrupted_parallel_interrupts_running_children() {
    let log = Log::default();
    let mut par = parallel(vec![
        recorder(&log, "a", "arm", Some(1)),
        recorder(&log, "b", "elevator", None),
    ])
    .unwrap();
    let mut h = Harness::new();
    h.init(&mut par);
    h.step(&mut par);
    h.end(&mut par, true);

    let log = entries(&log);
    assert!(log.contains(&"a:end(false)".to_string()));
    assert!(log.contains(&"b:end(true)".to_string()));
}

#[test]
fn race_interrupts_losers() {
    let log = Log::default();
    let mut r = race(vec![
        recorder(&log, "winner", "arm", Some(1)),
        recorder(&log, "loser", "elevator", None),
    ])
    .unwrap();
    let mut h = Harness::new();
    h.init(&mut r);
    assert!(h.step(&mut r));
    h.end(&mut r, false);

    let log = entries(&log);
    assert!(log.contains(&"winner:end(false)".to_string()));
    assert!(log.contains(&"loser:end(true)".to_string()));
    assert_eq!(log.iter().filter(|e| e.contains(":end(")).count(), 2);
}

#[test]
fn deadline_ends_with_main() {
    let log = Log::default();
    let mut d = recorder(&log, "main", "arm", Some(2))
        .deadline_with(vec![recorder(&log, "other", "elevator", None)])
        .unwrap();
    let mut h = Harness::new();
    h.init(&mut d);
    assert!(!h.step(&mut d));
    assert!(h.step(&mut d));
    assert!(entries(&log).contains(&"other:end(true)".to_string()));
}

#[test]
fn until_condition_first_interrupts_task() {
    let log = Log::default();
    let stop = Arc::new(AtomicBool::new(false));
    let read = stop.clone();
    let mut task = recorder(&log, "drive", "drivebase", None)
        .until(Trigger::new(move || read.load(Ordering::SeqCst)));
    let mut h = Harness::new();

    h.init(&mut task);
    assert!(!h.step(&mut task));
    stop.store(true, Ordering::SeqCst);
    assert!(h.step(&mut task));
    h.end(&mut task, false);

    assert_eq!(
        entries(&log),
        vec!["drive:init", "drive:exec", "drive:end(true)"]
    );
}

#[test]
fn until_own_predicate_first_ends_normally() {
    let log = Log::default();
    let mut task = recorder(&log, "shoot", "intake", Some(1)).until(Trigger::constant(false));
    let mut h = Harness::new();
    h.init(&mut task);
    assert!(h.step(&mut task));
    h.end(&mut task, false);
    assert_eq!(entries(&log).last().map(String::as_str), Some("shoot:end(false)"));
}

#[test]
fn timeout_is_measured_from_initialization() {
    let log = Log::default();
    let mut task = recorder(&log, "shoot", "intake", None).with_timeout(Duration::from_millis(100));
    let mut h = Harness::new();

    h.clock.advance(Duration::from_secs(3));
    h.init(&mut task);
    h.clock.advance(Duration::from_millis(80));
    assert!(!h.step(&mut task));
    h.clock.advance(Duration::from_millis(20));
    assert!(h.step(&mut task));
    assert_eq!(entries(&log).last().map(String::as_str), Some("shoot:end(true)"));
    assert_eq!(task.name(), "shoot (timeout 100ms)");
}

#[test]
fn zero_timeout_interrupts_on_first_execute() {
    let log = Log::default();
    let mut task = recorder(&log, "shoot", "intake", None).with_timeout(Duration::ZERO);
    let mut h = Harness::new();
    h.init(&mut task);
    assert!(h.step(&mut task));
    assert_eq!(entries(&log), vec!["shoot:init", "shoot:end(true)"]);
}

#[test]
fn reset_rearms_timeout() {
    let log = Log::default();
    let mut task = recorder(&log, "hold", "arm", None).with_timeout(Duration::from_secs(1));
    let mut h = Harness::new();
    h.init(&mut task);
    h.clock.advance(Duration::from_secs(1));
    assert!(h.step(&mut task));
    h.end(&mut task, false);

    task.reset();
    h.init(&mut task);
    assert!(!h.step(&mut task));
}

#[test]
fn defer_calls_supplier_once_per_initialization() {
    let built = Arc::new(Mutex::new(0));
    let counter = built.clone();
    let mut task = defer(
        move || {
            *counter.lock().unwrap() += 1;
            run(|_| {}, Resource::new("drivebase"))
        },
        Resource::new("drivebase"),
    );
    let mut h = Harness::new();

    assert_eq!(*built.lock().unwrap(), 0);
    h.init(&mut task);
    h.step(&mut task);
    h.step(&mut task);
    h.end(&mut task, true);
    assert_eq!(*built.lock().unwrap(), 1);

    task.reset();
    h.init(&mut task);
    assert_eq!(*built.lock().unwrap(), 2);
}

#[test]
fn defer_declares_requirements_statically() {
    let task = defer(none, [Resource::new("arm"), Resource::new("elevator")]);
    assert_eq!(task.requirements().len(), 2);
}

#[test]
fn before_starting_and_finally_do_wrap_lifecycle() {
    let log = Log::default();
    let (a, b) = (log.clone(), log.clone());
    let mut task = recorder(&log, "inner", "arm", Some(1))
        .before_starting(move |_| a.lock().unwrap().push("before".to_string()))
        .finally_do(move |_, interrupted| b.lock().unwrap().push(format!("finally({interrupted})")));
    let mut h = Harness::new();
    h.init(&mut task);
    assert!(h.step(&mut task));
    h.end(&mut task, false);

    assert_eq!(
        entries(&log),
        vec![
            "before",
            "inner:init",
            "inner:exec",
            "inner:end(false)",
            "finally(false)",
        ]
    );
}

#[test]
fn composite_interrupt_behavior_follows_children() {
    let log = Log::default();
    let stubborn = || {
        recorder(&log, "x", "", None)
            .with_interrupt_behavior(InterruptBehavior::CancelIncoming)
            .boxed()
    };
    let all_stubborn = sequence(vec![stubborn(), stubborn()]).unwrap();
    assert_eq!(
        all_stubborn.interrupt_behavior(),
        InterruptBehavior::CancelIncoming
    );

    let mixed = sequence(vec![stubborn(), recorder(&log, "y", "", None)]).unwrap();
    assert_eq!(mixed.interrupt_behavior(), InterruptBehavior::CancelSelf);
}

#[test]
fn with_name_overrides_name() {
    let task = none().with_name("score l2");
    assert_eq!(task.name(), "score l2");
}
