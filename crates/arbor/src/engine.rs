//! Build orchestration: `NotInitialized -> Initializing -> Initialized`, with `reset` returning
//! to `NotInitialized` from anywhere.
//!
//! A build is the queue of [`Step`]s. In background mode a worker thread drains the queue; in
//! incremental mode the host calls [`LayoutEngine::step`] between its own work. The working tree
//! is taken out of the lock while a step runs, so readers never see a half-built layout. Every
//! `reset` bumps a generation counter; a step finishing for an older generation is dropped.

use crate::config::{ExecutionMode, LayoutOptions};
use crate::error::{Error, Result};
use crate::model::Definition;
use crate::output::Layout;
use crate::pipeline::{self, Step};
use crate::tree::Tree;
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotInitialized,
    Initializing,
    Initialized,
}

/// Result of driving one unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The step ran and more are queued.
    Ran(Step),
    /// The last step ran and the layout is published.
    Completed,
    /// No build is in progress.
    Idle,
    /// Another caller is running a step right now.
    Busy,
    /// A `reset` happened while the step ran; its result was thrown away.
    Discarded,
    /// The step failed; the build was abandoned.
    Failed,
}

type Listener = Arc<dyn Fn(&Layout) + Send + Sync>;

/// Runs one step, turning a panic inside it into [`Error::StepPanicked`].
fn run_caught<F>(step: Step, run: F) -> Result<()>
where
    F: FnOnce() -> Result<()>,
{
    catch_unwind(AssertUnwindSafe(run)).unwrap_or_else(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic payload".to_string());
        Err(Error::StepPanicked { step, message })
    })
}

struct State {
    phase: Phase,
    generation: u64,
    running: bool,
    pending: VecDeque<Step>,
    work: Option<Tree>,
    tree: Option<Arc<Tree>>,
    layout: Option<Arc<Layout>>,
    definitions: Arc<Vec<Definition>>,
}

struct Shared {
    options: LayoutOptions,
    state: Mutex<State>,
    changed: Condvar,
    listeners: Mutex<Vec<Listener>>,
}

impl Shared {
    fn advance(&self, expected: Option<u64>) -> StepOutcome {
        self.advance_with(expected, pipeline::run_step)
    }

    fn advance_with<F>(&self, expected: Option<u64>, run: F) -> StepOutcome
    where
        F: FnOnce(&mut Tree, Step, &[Definition], &LayoutOptions) -> Result<()>,
    {
        let mut state = self.state.lock();
        if expected.is_some_and(|g| g != state.generation) {
            return StepOutcome::Discarded;
        }
        if state.phase != Phase::Initializing {
            return StepOutcome::Idle;
        }
        if state.running {
            return StepOutcome::Busy;
        }
        let Some(step) = state.pending.pop_front() else {
            return StepOutcome::Idle;
        };
        let mut tree = state.work.take().unwrap_or_default();
        state.running = true;
        let generation = state.generation;
        let definitions = Arc::clone(&state.definitions);
        drop(state);

        let result = run_caught(step, || run(&mut tree, step, &definitions, &self.options));

        let mut state = self.state.lock();
        if state.generation != generation {
            tracing::debug!(%step, "layout was reset while a step ran, dropping its result");
            return StepOutcome::Discarded;
        }
        state.running = false;

        if let Err(err) = result {
            tracing::error!(%step, error = %err, "layout build failed, resetting");
            state.phase = Phase::NotInitialized;
            state.pending.clear();
            state.work = None;
            drop(state);
            self.changed.notify_all();
            return StepOutcome::Failed;
        }

        if !state.pending.is_empty() {
            state.work = Some(tree);
            drop(state);
            self.changed.notify_all();
            return StepOutcome::Ran(step);
        }

        for diagnostic in tree.diagnostics() {
            tracing::warn!(%diagnostic, "layout diagnostic");
        }
        let layout = Arc::new(Layout::from_tree(&tree));
        tracing::info!(
            nodes = tree.content_count(),
            routing = tree.routing_count(),
            layers = layout.size.layers,
            rows = layout.size.rows,
            "layout initialized"
        );
        state.tree = Some(Arc::new(tree));
        state.layout = Some(Arc::clone(&layout));
        state.phase = Phase::Initialized;
        drop(state);
        self.changed.notify_all();

        let listeners: Vec<Listener> = self.listeners.lock().clone();
        for listener in listeners {
            (*listener)(&layout);
        }
        StepOutcome::Completed
    }

    fn wait_while_running(&self) {
        let mut state = self.state.lock();
        while state.running && state.phase == Phase::Initializing {
            self.changed.wait(&mut state);
        }
    }
}

/// Owns one layout session and its build lifecycle. Clones share the session.
#[derive(Clone)]
pub struct LayoutEngine {
    shared: Arc<Shared>,
}

impl LayoutEngine {
    pub fn new(definitions: Vec<Definition>, options: LayoutOptions) -> Self {
        let state = State {
            phase: Phase::NotInitialized,
            generation: 0,
            running: false,
            pending: VecDeque::new(),
            work: None,
            tree: None,
            layout: None,
            definitions: Arc::new(definitions),
        };
        Self {
            shared: Arc::new(Shared {
                options,
                state: Mutex::new(state),
                changed: Condvar::new(),
                listeners: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn options(&self) -> &LayoutOptions {
        &self.shared.options
    }

    pub fn phase(&self) -> Phase {
        self.shared.state.lock().phase
    }

    pub fn is_initialized(&self) -> bool {
        self.phase() == Phase::Initialized
    }

    /// Starts a build. Does nothing unless the engine is `NotInitialized`.
    pub fn initialize(&self) {
        let generation = {
            let mut state = self.shared.state.lock();
            if state.phase != Phase::NotInitialized {
                return;
            }
            state.phase = Phase::Initializing;
            state.running = false;
            state.pending = Step::ALL.into_iter().collect();
            state.work = Some(Tree::new());
            state.generation
        };
        tracing::info!(mode = ?self.shared.options.mode, generation, "initializing layout");

        if self.shared.options.mode == ExecutionMode::Incremental {
            return;
        }
        let shared = Arc::clone(&self.shared);
        let spawned = std::thread::Builder::new()
            .name("arbor-layout".to_string())
            .spawn(move || {
                loop {
                    match shared.advance(Some(generation)) {
                        StepOutcome::Ran(_) => {}
                        StepOutcome::Busy => shared.wait_while_running(),
                        _ => break,
                    }
                }
            });
        if let Err(err) = spawned {
            tracing::error!(error = %err, "failed to start layout worker");
            let mut state = self.shared.state.lock();
            if state.generation == generation {
                state.phase = Phase::NotInitialized;
                state.pending.clear();
                state.work = None;
            }
            drop(state);
            self.shared.changed.notify_all();
        }
    }

    /// Runs the next queued step on the calling thread.
    pub fn step(&self) -> StepOutcome {
        self.shared.advance(None)
    }

    /// Blocks until no build is in progress, starting one first if the engine is
    /// `NotInitialized`. In incremental mode the caller runs the remaining steps itself.
    /// Returns whether a layout is available.
    pub fn wait_for_initialization(&self) -> bool {
        self.initialize();
        if self.shared.options.mode == ExecutionMode::Incremental {
            loop {
                match self.shared.advance(None) {
                    StepOutcome::Ran(_) | StepOutcome::Discarded => {}
                    StepOutcome::Busy => self.shared.wait_while_running(),
                    StepOutcome::Completed | StepOutcome::Failed | StepOutcome::Idle => break,
                }
            }
        }

        let mut state = self.shared.state.lock();
        while state.phase == Phase::Initializing {
            self.shared.changed.wait(&mut state);
        }
        state.phase == Phase::Initialized
    }

    /// Discards the layout and any build in progress. With `rebuild`, starts over right away.
    pub fn reset(&self, rebuild: bool) {
        {
            let mut state = self.shared.state.lock();
            state.generation += 1;
            state.phase = Phase::NotInitialized;
            state.running = false;
            state.pending.clear();
            state.work = None;
            state.tree = None;
            state.layout = None;
            tracing::debug!(generation = state.generation, rebuild, "layout reset");
        }
        self.shared.changed.notify_all();
        if rebuild {
            self.initialize();
        }
    }

    /// Swaps in a new record set and resets.
    pub fn set_definitions(&self, definitions: Vec<Definition>, rebuild: bool) {
        self.shared.state.lock().definitions = Arc::new(definitions);
        self.reset(rebuild);
    }

    pub fn definitions(&self) -> Arc<Vec<Definition>> {
        Arc::clone(&self.shared.state.lock().definitions)
    }

    /// The finished tree, once initialized.
    pub fn tree(&self) -> Option<Arc<Tree>> {
        self.shared.state.lock().tree.clone()
    }

    pub fn layout(&self) -> Option<Arc<Layout>> {
        self.shared.state.lock().layout.clone()
    }

    /// Registers a callback run (on the thread that finished the build) after every completed
    /// build.
    pub fn on_initialized<F>(&self, callback: F)
    where
        F: Fn(&Layout) + Send + Sync + 'static,
    {
        self.shared.listeners.lock().push(Arc::new(callback));
    }
}

impl std::fmt::Debug for LayoutEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.shared.state.lock();
        f.debug_struct("LayoutEngine")
            .field("phase", &state.phase)
            .field("generation", &state.generation)
            .field("pending", &state.pending.len())
            .finish()
    }
}
