// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn events_serialize_with_snake_case_tag() {
    let event = SchedulerEvent::DefaultStarted {
        tick: 3,
        id: TaskId(2),
        name: "arm stow".to_string(),
        resource: Resource::new("arm"),
    };
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "event": "default_started",
            "tick": 3,
            "id": 2,
            "name": "arm stow",
            "resource": "arm",
        })
    );
    let parsed: SchedulerEvent = serde_json::from_value(json).unwrap();
    assert_eq!(parsed, event);
}

#[test]
fn display_names_task_and_holder() {
    let event = SchedulerEvent::Rejected {
        tick: 12,
        id: TaskId(4),
        name: "score".to_string(),
        holder: TaskId(1),
    };
    assert_eq!(
        event.to_string(),
        "[   12] rejected     score (task-4), held by task-1"
    );
    assert_eq!(event.tick(), 12);
    assert_eq!(event.task(), Some(TaskId(4)));
}

#[test]
fn condition_failures_have_no_task() {
    let event = SchedulerEvent::ConditionFailed {
        tick: 1,
        trigger: "piece".to_string(),
        error: "sensor offline".to_string(),
    };
    assert_eq!(event.task(), None);
    assert!(event.to_string().contains("piece failed: sensor offline"));
}
