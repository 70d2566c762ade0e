// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task combinators
//!
//! Composites own their children by value and drive them through the same
//! lifecycle the scheduler uses. A composite requires the union of its
//! children's resources for its whole duration.
//!
//! Malformed compositions (no children, overlapping parallel requirements)
//! are rejected when the composite is built.

use crate::error::ConfigError;
use crate::resource::ResourceSet;
use crate::task::{BoxTask, InterruptBehavior, Task, TaskContext};
use crate::trigger::Trigger;
use std::time::{Duration, Instant};

fn union_of(children: &[BoxTask]) -> ResourceSet {
    let mut requirements = ResourceSet::new();
    for child in children {
        requirements.extend_from(child.requirements());
    }
    requirements
}

/// Children run side by side, so no two of them may share a resource
fn disjoint_union(children: &[BoxTask]) -> Result<ResourceSet, ConfigError> {
    let mut requirements = ResourceSet::new();
    for child in children {
        let overlap = requirements.overlap(child.requirements());
        if !overlap.is_empty() {
            return Err(ConfigError::OverlappingRequirements { overlap });
        }
        requirements.extend_from(child.requirements());
    }
    Ok(requirements)
}

/// A composite yields to incoming tasks if any child would
fn composite_behavior<'a>(children: impl IntoIterator<Item = &'a BoxTask>) -> InterruptBehavior {
    let any_yields = children
        .into_iter()
        .any(|c| c.interrupt_behavior() == InterruptBehavior::CancelSelf);
    if any_yields {
        InterruptBehavior::CancelSelf
    } else {
        InterruptBehavior::CancelIncoming
    }
}

fn non_empty(kind: &'static str, children: &[BoxTask]) -> Result<(), ConfigError> {
    if children.is_empty() {
        return Err(ConfigError::EmptyComposite { kind });
    }
    Ok(())
}

/// Runs children strictly in order; ends when the last child ends
pub struct Sequence {
    children: Vec<BoxTask>,
    index: usize,
    requirements: ResourceSet,
    behavior: InterruptBehavior,
}

pub fn sequence(children: Vec<BoxTask>) -> Result<Sequence, ConfigError> {
    non_empty("sequence", &children)?;
    Ok(Sequence::from_children(children))
}

impl Sequence {
    fn from_children(children: Vec<BoxTask>) -> Self {
        Self {
            requirements: union_of(&children),
            behavior: composite_behavior(&children),
            index: 0,
            children,
        }
    }
}

impl Task for Sequence {
    fn name(&self) -> &str {
        "sequence"
    }

    fn requirements(&self) -> &ResourceSet {
        &self.requirements
    }

    fn initialize(&mut self, ctx: &mut TaskContext<'_>) {
        self.index = 0;
        if let Some(first) = self.children.first_mut() {
            first.initialize(ctx);
        }
    }

    fn execute(&mut self, ctx: &mut TaskContext<'_>) {
        let Some(current) = self.children.get_mut(self.index) else {
            return;
        };
        current.execute(ctx);
        if !current.is_finished(ctx) {
            return;
        }
        current.end(ctx, false);
        self.index += 1;
        if let Some(next) = self.children.get_mut(self.index) {
            tracing::trace!(step = self.index, task = next.name(), "sequence advancing");
            next.initialize(ctx);
        }
    }

    fn is_finished(&mut self, _ctx: &mut TaskContext<'_>) -> bool {
        self.index >= self.children.len()
    }

    fn end(&mut self, ctx: &mut TaskContext<'_>, interrupted: bool) {
        // only the child in progress still needs cleanup
        if let Some(current) = self.children.get_mut(self.index) {
            current.end(ctx, interrupted);
        }
        self.index = self.children.len();
    }

    fn reset(&mut self) {
        self.index = 0;
        self.children.iter_mut().for_each(|c| c.reset());
    }

    fn interrupt_behavior(&self) -> InterruptBehavior {
        self.behavior
    }
}

struct Running {
    task: BoxTask,
    running: bool,
}

impl Running {
    fn wrap(children: Vec<BoxTask>) -> Vec<Running> {
        children
            .into_iter()
            .map(|task| Running {
                task,
                running: false,
            })
            .collect()
    }

    /// Execute the child if still running; returns true when it finished this tick
    fn step(&mut self, ctx: &mut TaskContext<'_>) -> bool {
        if !self.running {
            return false;
        }
        self.task.execute(ctx);
        if self.task.is_finished(ctx) {
            self.task.end(ctx, false);
            self.running = false;
            return true;
        }
        false
    }

    fn interrupt(&mut self, ctx: &mut TaskContext<'_>) {
        if self.running {
            self.task.end(ctx, true);
            self.running = false;
        }
    }
}

fn initialize_all(children: &mut [Running], ctx: &mut TaskContext<'_>) {
    for child in children {
        child.task.initialize(ctx);
        child.running = true;
    }
}

fn reset_all(children: &mut [Running]) {
    for child in children {
        child.running = false;
        child.task.reset();
    }
}

fn behavior_of(children: &[Running]) -> InterruptBehavior {
    composite_behavior(children.iter().map(|c| &c.task))
}

/// Starts all children together; ends when all have ended
///
/// A child that finishes early is not restarted.
pub struct Parallel {
    children: Vec<Running>,
    requirements: ResourceSet,
    behavior: InterruptBehavior,
}

pub fn parallel(children: Vec<BoxTask>) -> Result<Parallel, ConfigError> {
    non_empty("parallel", &children)?;
    let requirements = disjoint_union(&children)?;
    let children = Running::wrap(children);
    Ok(Parallel {
        behavior: behavior_of(&children),
        children,
        requirements,
    })
}

impl Task for Parallel {
    fn name(&self) -> &str {
        "parallel"
    }

    fn requirements(&self) -> &ResourceSet {
        &self.requirements
    }

    fn initialize(&mut self, ctx: &mut TaskContext<'_>) {
        initialize_all(&mut self.children, ctx);
    }

    fn execute(&mut self, ctx: &mut TaskContext<'_>) {
        for child in &mut self.children {
            child.step(ctx);
        }
    }

    fn is_finished(&mut self, _ctx: &mut TaskContext<'_>) -> bool {
        self.children.iter().all(|c| !c.running)
    }

    fn end(&mut self, ctx: &mut TaskContext<'_>, _interrupted: bool) {
        for child in &mut self.children {
            child.interrupt(ctx);
        }
    }

    fn reset(&mut self) {
        reset_all(&mut self.children);
    }

    fn interrupt_behavior(&self) -> InterruptBehavior {
        self.behavior
    }
}

/// Runs children together; the first to finish ends the race and the rest
/// are interrupted
pub struct Race {
    children: Vec<Running>,
    requirements: ResourceSet,
    behavior: InterruptBehavior,
    finished: bool,
}

pub fn race(children: Vec<BoxTask>) -> Result<Race, ConfigError> {
    non_empty("race", &children)?;
    let requirements = disjoint_union(&children)?;
    let children = Running::wrap(children);
    Ok(Race {
        behavior: behavior_of(&children),
        children,
        requirements,
        finished: false,
    })
}

impl Task for Race {
    fn name(&self) -> &str {
        "race"
    }

    fn requirements(&self) -> &ResourceSet {
        &self.requirements
    }

    fn initialize(&mut self, ctx: &mut TaskContext<'_>) {
        self.finished = false;
        initialize_all(&mut self.children, ctx);
    }

    fn execute(&mut self, ctx: &mut TaskContext<'_>) {
        for child in &mut self.children {
            if child.step(ctx) {
                self.finished = true;
                break;
            }
        }
        if self.finished {
            for child in &mut self.children {
                child.interrupt(ctx);
            }
        }
    }

    fn is_finished(&mut self, _ctx: &mut TaskContext<'_>) -> bool {
        self.finished
    }

    fn end(&mut self, ctx: &mut TaskContext<'_>, _interrupted: bool) {
        for child in &mut self.children {
            child.interrupt(ctx);
        }
        self.finished = true;
    }

    fn reset(&mut self) {
        self.finished = false;
        reset_all(&mut self.children);
    }

    fn interrupt_behavior(&self) -> InterruptBehavior {
        self.behavior
    }
}

/// Runs `main` alongside `others`; ends when `main` ends and interrupts the
/// others
pub struct Deadline {
    children: Vec<Running>,
    requirements: ResourceSet,
    behavior: InterruptBehavior,
}

pub fn deadline(main: BoxTask, others: Vec<BoxTask>) -> Result<Deadline, ConfigError> {
    let mut children = Vec::with_capacity(others.len() + 1);
    children.push(main);
    children.extend(others);
    let requirements = disjoint_union(&children)?;
    let children = Running::wrap(children);
    Ok(Deadline {
        behavior: behavior_of(&children),
        children,
        requirements,
    })
}

impl Task for Deadline {
    fn name(&self) -> &str {
        "deadline"
    }

    fn requirements(&self) -> &ResourceSet {
        &self.requirements
    }

    fn initialize(&mut self, ctx: &mut TaskContext<'_>) {
        initialize_all(&mut self.children, ctx);
    }

    fn execute(&mut self, ctx: &mut TaskContext<'_>) {
        for child in &mut self.children {
            child.step(ctx);
        }
        let main_done = self.children.first().is_some_and(|main| !main.running);
        if main_done {
            for child in &mut self.children {
                child.interrupt(ctx);
            }
        }
    }

    fn is_finished(&mut self, _ctx: &mut TaskContext<'_>) -> bool {
        !self.children.first().is_some_and(|main| main.running)
    }

    fn end(&mut self, ctx: &mut TaskContext<'_>, _interrupted: bool) {
        for child in &mut self.children {
            child.interrupt(ctx);
        }
    }

    fn reset(&mut self) {
        reset_all(&mut self.children);
    }

    fn interrupt_behavior(&self) -> InterruptBehavior {
        self.behavior
    }
}

enum Until {
    Condition(Trigger),
    Elapsed {
        limit: Duration,
        started: Option<Instant>,
    },
}

/// Runs a task until its own predicate or an outside condition is true
///
/// When the condition wins, the task is cleaned up as interrupted.
pub struct RaceUntil {
    name: String,
    task: BoxTask,
    until: Until,
    finished: bool,
}

pub fn race_until(task: impl Task + 'static, condition: Trigger) -> RaceUntil {
    RaceUntil {
        name: format!("{} until {}", task.name(), condition.name()),
        task: Box::new(task),
        until: Until::Condition(condition),
        finished: false,
    }
}

/// Race `task` against an elapsed-time limit measured from initialization
///
/// A zero `limit` interrupts `task` on the first execute, before its own
/// execute runs. Limits read from seconds go through
/// [`duration_from_secs`](crate::error::duration_from_secs), which rejects
/// zero.
pub fn with_timeout(task: impl Task + 'static, limit: Duration) -> RaceUntil {
    RaceUntil {
        name: format!("{} (timeout {})", task.name(), fmt_duration(limit)),
        task: Box::new(task),
        until: Until::Elapsed {
            limit,
            started: None,
        },
        finished: false,
    }
}

fn fmt_duration(d: Duration) -> String {
    if d.subsec_millis() == 0 {
        format!("{}s", d.as_secs())
    } else {
        format!("{}ms", d.as_millis())
    }
}

impl RaceUntil {
    fn condition_met(&mut self, ctx: &mut TaskContext<'_>) -> bool {
        match &self.until {
            Until::Condition(trigger) => trigger.poll(ctx),
            Until::Elapsed { limit, started } => {
                started.is_some_and(|s| ctx.now().duration_since(s) >= *limit)
            }
        }
    }
}

impl Task for RaceUntil {
    fn name(&self) -> &str {
        &self.name
    }

    fn requirements(&self) -> &ResourceSet {
        self.task.requirements()
    }

    fn initialize(&mut self, ctx: &mut TaskContext<'_>) {
        self.finished = false;
        if let Until::Elapsed { started, .. } = &mut self.until {
            *started = Some(ctx.now());
        }
        self.task.initialize(ctx);
    }

    fn execute(&mut self, ctx: &mut TaskContext<'_>) {
        if self.finished {
            return;
        }
        if self.condition_met(ctx) {
            self.task.end(ctx, true);
            self.finished = true;
            return;
        }
        self.task.execute(ctx);
        if self.task.is_finished(ctx) {
            self.task.end(ctx, false);
            self.finished = true;
        }
    }

    fn is_finished(&mut self, _ctx: &mut TaskContext<'_>) -> bool {
        self.finished
    }

    fn end(&mut self, ctx: &mut TaskContext<'_>, interrupted: bool) {
        if !self.finished {
            self.task.end(ctx, interrupted);
            self.finished = true;
        }
    }

    fn reset(&mut self) {
        self.finished = false;
        if let Until::Elapsed { started, .. } = &mut self.until {
            *started = None;
        }
        self.task.reset();
    }

    fn interrupt_behavior(&self) -> InterruptBehavior {
        self.task.interrupt_behavior()
    }
}

type Supplier = Box<dyn FnMut() -> BoxTask + Send>;

/// Builds its child lazily, once per initialization
///
/// Requirements are declared up front because the scheduler needs them
/// before the child exists.
pub struct Defer {
    supplier: Supplier,
    requirements: ResourceSet,
    current: Option<BoxTask>,
}

pub fn defer<T, F>(mut supplier: F, requirements: impl Into<ResourceSet>) -> Defer
where
    T: Task + 'static,
    F: FnMut() -> T + Send + 'static,
{
    Defer {
        supplier: Box::new(move || Box::new(supplier()) as BoxTask),
        requirements: requirements.into(),
        current: None,
    }
}

impl Task for Defer {
    fn name(&self) -> &str {
        match &self.current {
            Some(child) => child.name(),
            None => "defer",
        }
    }

    fn requirements(&self) -> &ResourceSet {
        &self.requirements
    }

    fn initialize(&mut self, ctx: &mut TaskContext<'_>) {
        let mut child = (self.supplier)();
        if !child.requirements().is_subset(&self.requirements) {
            tracing::warn!(
                task = child.name(),
                declared = %self.requirements,
                actual = %child.requirements(),
                "deferred task requires undeclared resources"
            );
        }
        child.initialize(ctx);
        self.current = Some(child);
    }

    fn execute(&mut self, ctx: &mut TaskContext<'_>) {
        if let Some(child) = self.current.as_mut() {
            child.execute(ctx);
        }
    }

    fn is_finished(&mut self, ctx: &mut TaskContext<'_>) -> bool {
        match self.current.as_mut() {
            Some(child) => child.is_finished(ctx),
            None => true,
        }
    }

    fn end(&mut self, ctx: &mut TaskContext<'_>, interrupted: bool) {
        if let Some(mut child) = self.current.take() {
            child.end(ctx, interrupted);
        }
    }

    fn reset(&mut self) {
        self.current = None;
    }
}

type StartAction = Box<dyn FnMut(&mut TaskContext<'_>) + Send>;
type EndAction = Box<dyn FnMut(&mut TaskContext<'_>, bool) + Send>;

/// Runs an action before the wrapped task initializes
pub struct BeforeStarting {
    inner: BoxTask,
    action: StartAction,
}

impl Task for BeforeStarting {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn requirements(&self) -> &ResourceSet {
        self.inner.requirements()
    }

    fn initialize(&mut self, ctx: &mut TaskContext<'_>) {
        (self.action)(ctx);
        self.inner.initialize(ctx);
    }

    fn execute(&mut self, ctx: &mut TaskContext<'_>) {
        self.inner.execute(ctx);
    }

    fn is_finished(&mut self, ctx: &mut TaskContext<'_>) -> bool {
        self.inner.is_finished(ctx)
    }

    fn end(&mut self, ctx: &mut TaskContext<'_>, interrupted: bool) {
        self.inner.end(ctx, interrupted);
    }

    fn reset(&mut self) {
        self.inner.reset();
    }

    fn interrupt_behavior(&self) -> InterruptBehavior {
        self.inner.interrupt_behavior()
    }
}

/// Runs an action after the wrapped task's cleanup, however it ended
pub struct FinallyDo {
    inner: BoxTask,
    action: EndAction,
}

impl Task for FinallyDo {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn requirements(&self) -> &ResourceSet {
        self.inner.requirements()
    }

    fn initialize(&mut self, ctx: &mut TaskContext<'_>) {
        self.inner.initialize(ctx);
    }

    fn execute(&mut self, ctx: &mut TaskContext<'_>) {
        self.inner.execute(ctx);
    }

    fn is_finished(&mut self, ctx: &mut TaskContext<'_>) -> bool {
        self.inner.is_finished(ctx)
    }

    fn end(&mut self, ctx: &mut TaskContext<'_>, interrupted: bool) {
        self.inner.end(ctx, interrupted);
        (self.action)(ctx, interrupted);
    }

    fn reset(&mut self) {
        self.inner.reset();
    }

    fn interrupt_behavior(&self) -> InterruptBehavior {
        self.inner.interrupt_behavior()
    }
}

/// Overrides the name or interrupt behavior of the wrapped task
pub struct Decorated {
    inner: BoxTask,
    name: Option<String>,
    behavior: Option<InterruptBehavior>,
}

impl Decorated {
    fn wrap(inner: BoxTask) -> Self {
        Self {
            inner,
            name: None,
            behavior: None,
        }
    }
}

impl Task for Decorated {
    fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_else(|| self.inner.name())
    }

    fn requirements(&self) -> &ResourceSet {
        self.inner.requirements()
    }

    fn initialize(&mut self, ctx: &mut TaskContext<'_>) {
        self.inner.initialize(ctx);
    }

    fn execute(&mut self, ctx: &mut TaskContext<'_>) {
        self.inner.execute(ctx);
    }

    fn is_finished(&mut self, ctx: &mut TaskContext<'_>) -> bool {
        self.inner.is_finished(ctx)
    }

    fn end(&mut self, ctx: &mut TaskContext<'_>, interrupted: bool) {
        self.inner.end(ctx, interrupted);
    }

    fn reset(&mut self) {
        self.inner.reset();
    }

    fn interrupt_behavior(&self) -> InterruptBehavior {
        self.behavior
            .unwrap_or_else(|| self.inner.interrupt_behavior())
    }
}

/// Fluent composition on any task
pub trait TaskExt: Task + Sized + 'static {
    fn boxed(self) -> BoxTask {
        Box::new(self)
    }

    /// Run `next` after this task ends
    fn and_then(self, next: impl Task + 'static) -> Sequence {
        Sequence::from_children(vec![self.boxed(), Box::new(next)])
    }

    /// Run `other` alongside this task; ends when both have ended
    fn along_with(self, other: impl Task + 'static) -> Result<Parallel, ConfigError> {
        parallel(vec![self.boxed(), Box::new(other)])
    }

    /// Run `other` alongside this task; ends when either ends
    fn race_with(self, other: impl Task + 'static) -> Result<Race, ConfigError> {
        race(vec![self.boxed(), Box::new(other)])
    }

    /// Run `others` alongside this task; ends when this task ends
    fn deadline_with(self, others: Vec<BoxTask>) -> Result<Deadline, ConfigError> {
        deadline(self.boxed(), others)
    }

    fn until(self, condition: Trigger) -> RaceUntil {
        race_until(self, condition)
    }

    fn with_timeout(self, limit: Duration) -> RaceUntil {
        with_timeout(self, limit)
    }

    fn before_starting(
        self,
        action: impl FnMut(&mut TaskContext<'_>) + Send + 'static,
    ) -> BeforeStarting {
        BeforeStarting {
            inner: self.boxed(),
            action: Box::new(action),
        }
    }

    fn finally_do(
        self,
        action: impl FnMut(&mut TaskContext<'_>, bool) + Send + 'static,
    ) -> FinallyDo {
        FinallyDo {
            inner: self.boxed(),
            action: Box::new(action),
        }
    }

    fn with_interrupt_behavior(self, behavior: InterruptBehavior) -> Decorated {
        let mut decorated = Decorated::wrap(self.boxed());
        decorated.behavior = Some(behavior);
        decorated
    }

    fn with_name(self, name: impl Into<String>) -> Decorated {
        let mut decorated = Decorated::wrap(self.boxed());
        decorated.name = Some(name.into());
        decorated
    }
}

impl<T: Task + 'static> TaskExt for T {}

#[cfg(test)]
#[path = "combinators_tests.rs"]
mod tests;
