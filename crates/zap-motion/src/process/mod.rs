// process/mod.rs
//
// Timed units of work driven by the Scheduler. A Process pairs shared timing
// state (Clock) with one behavior variant (ProcessKind). When a process is
// fulfilled the scheduler removes it and activates its children, so a tree of
// processes unfolds one generation per completion.
//
// Usage:
//   let intro = Process::wait(0.0).then_all([
//       Process::generate_hex(hex, Vec2::ZERO, 100.0).with_duration(600.0),
//       Process::wait_all(),
//   ]);
//   scheduler.enqueue(intro);

mod general;
mod generation;
mod interactive;
mod trail;

use std::fmt;

use glam::Vec2;

use crate::easing::Easing;
use crate::math::Rect;
use crate::scheduler::ProcessContext;
use crate::shape::ShapeId;
use crate::stage::Stage;

pub use general::{Execute, Rotate, Translate, Wait, WaitAllProcesses};
pub use generation::{GenerateHex, GenerateRect, GenerateRectDiagonally};
pub use interactive::{Navigation, NavigationStyle, ResolveProcessesOnKeyDown};
pub use trail::{ContourTrail, TrailStyle};

/// Default process duration in milliseconds.
pub const DEFAULT_DURATION: f32 = 1000.0;

/// Handle to a process, assigned when it is enqueued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProcessId(pub u32);

/// Lifecycle status of a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Pending,
    Fulfilled,
    /// Reserved: nothing built in produces it. Rejected processes are dropped
    /// by the scheduler without activating their children.
    Rejected,
}

/// Result of one step of a behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    Pending,
    Resolved,
}

/// Elapsed-time bookkeeping shared by every process.
///
/// Multi-phase behaviors split `duration` evenly into `phases` spans and reset
/// `elapsed` at each phase change.
///
/// Progress is held at its high-water mark within a phase, so curves that
/// overshoot or bounce (`BackOut`, `ElasticOut`, `BounceOut`) never push a
/// process past its target or back towards its start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clock {
    duration: f32,
    easing: Easing,
    elapsed: f32,
    phases: u32,
    peak: f32,
}

impl Clock {
    fn new() -> Self {
        Self {
            duration: DEFAULT_DURATION,
            easing: Easing::Linear,
            elapsed: 0.0,
            phases: 1,
            peak: 0.0,
        }
    }

    /// Length of a single phase in milliseconds.
    pub fn span(&self) -> f32 {
        self.duration / self.phases.max(1) as f32
    }

    /// Eased progress of the current phase, clamped to [0, 1] and
    /// non-decreasing until the phase changes. Exactly 1.0 once the phase's
    /// elapsed time reaches its span.
    pub fn progress(&self) -> f32 {
        self.peak.max(self.eased())
    }

    fn eased(&self) -> f32 {
        let span = self.span();
        if span <= 0.0 || self.elapsed >= span {
            return 1.0;
        }
        self.easing
            .apply((self.elapsed / span).max(0.0))
            .clamp(0.0, 1.0)
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub(crate) fn advance(&mut self, dt: f32) {
        self.elapsed += dt;
        self.peak = self.peak.max(self.eased());
    }

    /// Start the next phase from zero. Surplus time of the finished phase is dropped.
    pub(crate) fn next_phase(&mut self) {
        self.elapsed = 0.0;
        self.peak = 0.0;
    }
}

/// Uniform capability every process variant implements.
pub(crate) trait Behavior {
    /// How many equal spans the duration is split into.
    fn phases(&self) -> u32 {
        1
    }

    /// One-time setup when the process joins the scheduler.
    fn init(&mut self, _ctx: &mut ProcessContext<'_>) {}

    fn step(&mut self, dt: f32, clock: &mut Clock, ctx: &mut ProcessContext<'_>) -> Outcome;

    /// Cleanup when the process is resolved from outside.
    fn on_resolve(&mut self, _ctx: &mut ProcessContext<'_>) {}
}

/// The closed set of process behaviors.
#[derive(Debug)]
pub enum ProcessKind {
    Wait(Wait),
    WaitAllProcesses(WaitAllProcesses),
    Execute(Execute),
    Translate(Translate),
    Rotate(Rotate),
    GenerateRect(GenerateRect),
    GenerateRectDiagonally(GenerateRectDiagonally),
    GenerateHex(GenerateHex),
    ContourTrail(ContourTrail),
    Navigation(Navigation),
    ResolveProcessesOnKeyDown(ResolveProcessesOnKeyDown),
}

impl ProcessKind {
    fn behavior(&mut self) -> &mut dyn Behavior {
        match self {
            ProcessKind::Wait(b) => b,
            ProcessKind::WaitAllProcesses(b) => b,
            ProcessKind::Execute(b) => b,
            ProcessKind::Translate(b) => b,
            ProcessKind::Rotate(b) => b,
            ProcessKind::GenerateRect(b) => b,
            ProcessKind::GenerateRectDiagonally(b) => b,
            ProcessKind::GenerateHex(b) => b,
            ProcessKind::ContourTrail(b) => b,
            ProcessKind::Navigation(b) => b,
            ProcessKind::ResolveProcessesOnKeyDown(b) => b,
        }
    }

    /// Short variant name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            ProcessKind::Wait(_) => "wait",
            ProcessKind::WaitAllProcesses(_) => "wait_all",
            ProcessKind::Execute(_) => "execute",
            ProcessKind::Translate(_) => "translate",
            ProcessKind::Rotate(_) => "rotate",
            ProcessKind::GenerateRect(_) => "generate_rect",
            ProcessKind::GenerateRectDiagonally(_) => "generate_rect_diagonally",
            ProcessKind::GenerateHex(_) => "generate_hex",
            ProcessKind::ContourTrail(_) => "contour_trail",
            ProcessKind::Navigation(_) => "navigation",
            ProcessKind::ResolveProcessesOnKeyDown(_) => "resolve_on_key_down",
        }
    }
}

/// A scheduled unit of timed work.
pub struct Process {
    id: Option<ProcessId>,
    clock: Clock,
    endless: bool,
    status: Status,
    children: Vec<Process>,
    kind: ProcessKind,
}

impl Process {
    fn new(kind: ProcessKind) -> Self {
        let mut process = Self {
            id: None,
            clock: Clock::new(),
            endless: false,
            status: Status::Pending,
            children: Vec::new(),
            kind,
        };
        process.clock.phases = process.kind.behavior().phases().max(1);
        process
    }

    fn endless(mut self) -> Self {
        self.endless = true;
        self
    }

    // -- Constructors --

    /// Hold for the duration, then complete.
    pub fn wait(duration: f32) -> Self {
        Self::new(ProcessKind::Wait(Wait)).with_duration(duration)
    }

    /// Complete once this is the only non-endless process left.
    pub fn wait_all() -> Self {
        Self::new(ProcessKind::WaitAllProcesses(WaitAllProcesses))
    }

    /// Run `command` once on the first step, then complete.
    pub fn execute(command: impl FnMut(&mut Stage) + 'static) -> Self {
        Self::new(ProcessKind::Execute(Execute::new(command)))
    }

    /// Move `shape` from the origin to `target`.
    pub fn translate(shape: ShapeId, target: Vec2) -> Self {
        Self::new(ProcessKind::Translate(Translate::new(shape, target)))
    }

    /// Turn `shape` from 0 to `target` radians.
    pub fn rotate(shape: ShapeId, target: f32) -> Self {
        Self::new(ProcessKind::Rotate(Rotate::new(shape, target)))
    }

    /// Grow a rectangle into `target` by sweeping its right edge.
    pub fn generate_rect(shape: ShapeId, target: Rect) -> Self {
        Self::new(ProcessKind::GenerateRect(GenerateRect::new(shape, target)))
    }

    /// Reveal a rectangle from its top-left corner in two sweeps.
    pub fn generate_rect_diagonally(shape: ShapeId, target: Rect) -> Self {
        Self::new(ProcessKind::GenerateRectDiagonally(GenerateRectDiagonally::new(
            shape, target,
        )))
    }

    /// Grow a hexagon from its center in three stages.
    pub fn generate_hex(shape: ShapeId, center: Vec2, diameter: f32) -> Self {
        Self::new(ProcessKind::GenerateHex(GenerateHex::new(shape, center, diameter)))
    }

    /// Endless comet trail chasing around `shape`'s contour.
    pub fn contour_trail(shape: ShapeId, style: TrailStyle) -> Self {
        Self::new(ProcessKind::ContourTrail(ContourTrail::new(shape, style))).endless()
    }

    /// Endless hover/click navigation over `targets`.
    pub fn navigation(targets: Vec<ShapeId>, style: NavigationStyle) -> Self {
        Self::new(ProcessKind::Navigation(Navigation::new(targets, style))).endless()
    }

    /// Endless listener draining the scheduler when one of `keys` is pressed.
    pub fn resolve_on_key_down<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(ProcessKind::ResolveProcessesOnKeyDown(ResolveProcessesOnKeyDown::new(keys)))
            .endless()
    }

    // -- Builder methods --

    /// Total duration in milliseconds, split evenly across phases.
    pub fn with_duration(mut self, duration: f32) -> Self {
        self.clock.duration = duration;
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.clock.easing = easing;
        self
    }

    /// Activate `child` when this process is fulfilled.
    pub fn then(mut self, child: Process) -> Self {
        self.children.push(child);
        self
    }

    pub fn then_all(mut self, children: impl IntoIterator<Item = Process>) -> Self {
        self.children.extend(children);
        self
    }

    // -- Queries --

    /// Scheduler-assigned id; `None` until enqueued.
    pub fn id(&self) -> Option<ProcessId> {
        self.id
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_fulfilled(&self) -> bool {
        self.status == Status::Fulfilled
    }

    pub fn is_pending(&self) -> bool {
        self.status == Status::Pending
    }

    pub fn is_endless(&self) -> bool {
        self.endless
    }

    pub fn progress(&self) -> f32 {
        self.clock.progress()
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn duration(&self) -> f32 {
        self.clock.duration
    }

    pub fn children(&self) -> &[Process] {
        &self.children
    }

    pub fn kind(&self) -> &ProcessKind {
        &self.kind
    }

    // -- Status changes --

    /// Mark fulfilled without running cleanup hooks. For processes that are
    /// not scheduled; scheduled ones go through
    /// [`Scheduler::resolve`](crate::scheduler::Scheduler::resolve).
    pub fn resolve(&mut self) {
        if self.status == Status::Pending {
            self.status = Status::Fulfilled;
        }
    }

    pub fn reject(&mut self) {
        if self.status == Status::Pending {
            self.status = Status::Rejected;
        }
    }

    // -- Scheduler hooks --

    pub(crate) fn bind(&mut self, id: ProcessId) {
        self.id = Some(id);
    }

    pub(crate) fn init(&mut self, ctx: &mut ProcessContext<'_>) {
        let behavior = self.kind.behavior();
        behavior.init(ctx);
        self.clock.phases = behavior.phases().max(1);
    }

    pub(crate) fn step(&mut self, dt: f32, ctx: &mut ProcessContext<'_>) {
        if self.status != Status::Pending {
            return;
        }
        let Process { clock, kind, status, .. } = self;
        if kind.behavior().step(dt, clock, ctx) == Outcome::Resolved {
            *status = Status::Fulfilled;
        }
    }

    /// Resolve with the behavior's cleanup hook. No-op unless pending.
    pub(crate) fn resolve_in(&mut self, ctx: &mut ProcessContext<'_>) {
        if self.status != Status::Pending {
            return;
        }
        self.kind.behavior().on_resolve(ctx);
        self.status = Status::Fulfilled;
    }

    pub(crate) fn take_children(&mut self) -> Vec<Process> {
        std::mem::take(&mut self.children)
    }
}

impl fmt::Debug for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Process")
            .field("id", &self.id)
            .field("kind", &self.kind.name())
            .field("status", &self.status)
            .field("endless", &self.endless)
            .field("clock", &self.clock)
            .field("children", &self.children.len())
            .finish()
    }
}
