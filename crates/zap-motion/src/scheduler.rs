// scheduler.rs
//
// Cooperative, frame-driven process scheduler.
//
// Each tick steps every active process in reverse index order. Work a process
// asks for mid-scan (spawning processes, resolving another process by id,
// draining) is queued on the Agenda and applied after the scan, in that order.
// Children of completed processes are activated after the scan as well, so a
// child is never stepped in the tick its parent completed.
//
// Usage:
//   let mut scheduler = Scheduler::new(SchedulerConfig::default());
//   let hex = scheduler.stage_mut().spawn_live(Shape::empty());
//   scheduler.enqueue(Process::generate_hex(hex, Vec2::ZERO, 100.0));
//   scheduler.tick(16.0);                     // once per animation frame
//   scheduler.stage_mut().render(&mut surface);

use glam::Vec2;

use crate::config::SchedulerConfig;
use crate::input::{HostCommand, InputEvent, InputQueue};
use crate::process::{Process, ProcessId, ProcessKind, Status};
use crate::scene::Scene;
use crate::shape::ShapeId;
use crate::stage::Stage;

/// Deferred requests raised while processes are being stepped.
#[derive(Debug, Default)]
struct Agenda {
    next_id: u32,
    /// Bound but not yet initialized processes waiting to join the active list.
    incoming: Vec<Process>,
    resolves: Vec<ProcessId>,
    drain: bool,
}

impl Agenda {
    fn bind(&mut self, mut process: Process) -> ProcessId {
        let id = ProcessId(self.next_id);
        self.next_id += 1;
        process.bind(id);
        log::debug!("enqueue {:?} ({})", id, process.kind().name());
        self.incoming.push(process);
        id
    }
}

/// What a process can see and do while it is initialized, stepped or resolved.
pub struct ProcessContext<'a> {
    pub stage: &'a mut Stage,
    input: &'a [InputEvent],
    resolvable: usize,
    agenda: &'a mut Agenda,
}

impl<'a> ProcessContext<'a> {
    pub fn scene(&mut self) -> &mut Scene {
        &mut self.stage.scene
    }

    /// Input events delivered this tick, oldest first.
    pub fn input(&self) -> &'a [InputEvent] {
        self.input
    }

    /// Non-endless processes still outstanding, including ones about to be
    /// activated this tick.
    pub fn resolvable_count(&self) -> usize {
        self.resolvable
    }

    /// Schedule a new process. It is initialized and joins the active list
    /// once the current scan finishes.
    pub fn enqueue(&mut self, process: Process) -> ProcessId {
        self.agenda.bind(process)
    }

    /// Resolve another process (running its cleanup) after the current scan.
    pub fn resolve(&mut self, id: ProcessId) {
        self.agenda.resolves.push(id);
    }

    /// Drain all resolvable work after the current scan.
    pub fn request_drain(&mut self) {
        self.agenda.drain = true;
    }
}

fn count_resolvable(processes: &[Process]) -> usize {
    processes
        .iter()
        .filter(|p| !p.is_endless() && p.is_pending())
        .count()
}

/// Owns the active processes and the stage they animate.
#[derive(Debug)]
pub struct Scheduler {
    processes: Vec<Process>,
    stage: Stage,
    input: InputQueue,
    agenda: Agenda,
    config: SchedulerConfig,
    draining: bool,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}

impl Scheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            processes: Vec::new(),
            stage: Stage::new(),
            input: InputQueue::new(),
            agenda: Agenda::default(),
            config,
            draining: false,
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn stage_mut(&mut self) -> &mut Stage {
        &mut self.stage
    }

    pub fn scene(&self) -> &Scene {
        &self.stage.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.stage.scene
    }

    /// Live shapes in render order.
    pub fn live(&self) -> &[ShapeId] {
        self.stage.live()
    }

    pub fn set_viewport(&mut self, origin: Vec2, size: Vec2) {
        self.stage.set_viewport(origin, size);
    }

    // -- Enqueue --

    /// Bind, initialize and activate a process. Returns its id.
    pub fn enqueue(&mut self, process: Process) -> ProcessId {
        let id = self.agenda.bind(process);
        self.flush(&[]);
        id
    }

    /// Enqueue several processes. All are bound before any is initialized.
    pub fn enqueue_all(&mut self, processes: impl IntoIterator<Item = Process>) -> Vec<ProcessId> {
        let ids = processes.into_iter().map(|p| self.agenda.bind(p)).collect();
        self.flush(&[]);
        ids
    }

    // -- Frame loop --

    /// Queue an input event for the next tick.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Advance every active process by `dt_ms * time_scale`.
    ///
    /// If anything completed during the scan, barriers that were stepped
    /// before it are checked again, so a `WaitAllProcesses` completes on the
    /// same tick as its last sibling whatever their order in the list.
    pub fn tick(&mut self, dt_ms: f32) {
        let dt = dt_ms * self.config.time_scale;
        let events = self.input.drain();
        let mut resolvable =
            count_resolvable(&self.processes) + count_resolvable(&self.agenda.incoming);

        let mut completed = false;
        for i in (0..self.processes.len()).rev() {
            completed |= self.step_at(i, dt, &events, &mut resolvable);
        }

        if completed {
            for i in (0..self.processes.len()).rev() {
                if matches!(self.processes[i].kind(), ProcessKind::WaitAllProcesses(_)) {
                    self.step_at(i, 0.0, &events, &mut resolvable);
                }
            }
        }

        self.flush(&events);
    }

    /// Resolve an active process from outside, running its cleanup and
    /// activating its children. Returns `false` if no pending process has `id`.
    pub fn resolve(&mut self, id: ProcessId) -> bool {
        let found = self.resolve_now(id, &[]);
        self.flush(&[]);
        found
    }

    /// Tick with large synthetic deltas until no resolvable process remains.
    /// Endless processes are left running.
    pub fn drain_all(&mut self) {
        if self.draining {
            return;
        }
        self.draining = true;
        log::info!("draining {} resolvable processes", self.resolvable_count());

        let mut ticks = 0;
        while self.resolvable_count() > 0 {
            if ticks >= self.config.max_drain_ticks {
                log::warn!(
                    "drain stopped after {} ticks with {} resolvable processes left",
                    ticks,
                    self.resolvable_count()
                );
                break;
            }
            self.tick(self.config.drain_step_ms);
            ticks += 1;
        }

        self.draining = false;
        log::info!("drain finished after {} ticks", ticks);
    }

    // -- Queries --

    /// Active processes that are not endless.
    pub fn resolvable_count(&self) -> usize {
        count_resolvable(&self.processes)
    }

    pub fn contains(&self, id: ProcessId) -> bool {
        self.processes.iter().any(|p| p.id() == Some(id))
    }

    pub fn get(&self, id: ProcessId) -> Option<&Process> {
        self.processes.iter().find(|p| p.id() == Some(id))
    }

    /// Active processes in activation order.
    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    /// Take host commands emitted since the last call.
    pub fn drain_commands(&mut self) -> Vec<HostCommand> {
        self.stage.drain_commands()
    }

    // -- Internals --

    /// Step the process at `index`, retiring it if it finished. `resolvable`
    /// is kept in step with the active and incoming lists. Returns whether
    /// the process was removed.
    fn step_at(
        &mut self,
        index: usize,
        dt: f32,
        events: &[InputEvent],
        resolvable: &mut usize,
    ) -> bool {
        let counted = !self.processes[index].is_endless() && self.processes[index].is_pending();
        let queued = self.agenda.incoming.len();
        let mut ctx = ProcessContext {
            stage: &mut self.stage,
            input: events,
            resolvable: *resolvable,
            agenda: &mut self.agenda,
        };
        self.processes[index].step(dt, &mut ctx);

        let finished = !self.processes[index].is_pending();
        if finished {
            let done = self.processes.remove(index);
            if counted {
                *resolvable -= 1;
            }
            self.retire(done);
        }
        *resolvable += count_resolvable(&self.agenda.incoming[queued..]);
        finished
    }

    /// Queue the children of a finished process for activation.
    fn retire(&mut self, mut done: Process) {
        match done.status() {
            Status::Fulfilled => {
                log::debug!("{:?} ({}) fulfilled", done.id(), done.kind().name());
                for child in done.take_children() {
                    self.agenda.bind(child);
                }
            }
            Status::Rejected => {
                log::warn!(
                    "{:?} ({}) rejected, dropping {} children",
                    done.id(),
                    done.kind().name(),
                    done.children().len()
                );
            }
            Status::Pending => {}
        }
    }

    fn resolve_now(&mut self, id: ProcessId, events: &[InputEvent]) -> bool {
        let Some(index) = self
            .processes
            .iter()
            .position(|p| p.id() == Some(id) && p.is_pending())
        else {
            return false;
        };

        let resolvable = count_resolvable(&self.processes) + count_resolvable(&self.agenda.incoming);
        let mut ctx = ProcessContext {
            stage: &mut self.stage,
            input: events,
            resolvable,
            agenda: &mut self.agenda,
        };
        self.processes[index].resolve_in(&mut ctx);

        let done = self.processes.remove(index);
        self.retire(done);
        true
    }

    /// Apply deferred work until the agenda is empty: activate incoming
    /// processes, then run queued resolves, then a requested drain.
    fn flush(&mut self, events: &[InputEvent]) {
        loop {
            if !self.agenda.incoming.is_empty() {
                let incoming = std::mem::take(&mut self.agenda.incoming);
                // Moving a process from incoming to active leaves the total unchanged.
                let mut resolvable = count_resolvable(&self.processes) + count_resolvable(&incoming);
                for mut process in incoming {
                    let queued = self.agenda.incoming.len();
                    let mut ctx = ProcessContext {
                        stage: &mut self.stage,
                        input: events,
                        resolvable,
                        agenda: &mut self.agenda,
                    };
                    process.init(&mut ctx);
                    self.processes.push(process);
                    resolvable += count_resolvable(&self.agenda.incoming[queued..]);
                }
                continue;
            }

            if !self.agenda.resolves.is_empty() {
                let resolves = std::mem::take(&mut self.agenda.resolves);
                for id in resolves {
                    self.resolve_now(id, events);
                }
                continue;
            }

            if self.agenda.drain {
                self.agenda.drain = false;
                self.drain_all();
                continue;
            }

            break;
        }
    }
}
