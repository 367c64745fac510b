use arbor::{Definition, ExecutionMode, LayoutEngine, LayoutOptions, Phase, Step, StepOutcome};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn records() -> Vec<Definition> {
    vec![
        Definition::new("a", 1),
        Definition::new("b", 1).with_prerequisites(["a"]),
        Definition::new("c", 1).with_prerequisites(["a", "b"]),
        Definition::new("d", 2).with_prerequisites(["a"]),
        Definition::new("x", 1).with_prerequisites(["x"]),
    ]
}

fn options(mode: ExecutionMode) -> LayoutOptions {
    LayoutOptions {
        mode,
        ..LayoutOptions::default()
    }
}

// Without the consistency pass an inverted tech level makes layering fail.
fn failing_options(mode: ExecutionMode) -> LayoutOptions {
    LayoutOptions {
        mode,
        max_consistency_passes: 0,
        max_layering_passes: 3,
        ..LayoutOptions::default()
    }
}

fn inverted_records() -> Vec<Definition> {
    vec![
        Definition::new("q", 3),
        Definition::new("p", 1).with_prerequisites(["q"]),
    ]
}

#[test]
fn engine_builds_in_the_background() {
    let engine = LayoutEngine::new(records(), options(ExecutionMode::Background));
    assert_eq!(engine.phase(), Phase::NotInitialized);
    assert!(engine.layout().is_none());

    assert!(engine.wait_for_initialization());
    assert!(engine.is_initialized());

    let layout = engine.layout().unwrap();
    assert_eq!(layout.nodes.len(), 4);
    assert!(layout.placement("x").is_none());
    assert_eq!(engine.tree().unwrap().content_count(), 4);
}

#[test]
fn engine_runs_one_step_at_a_time_in_incremental_mode() {
    let engine = LayoutEngine::new(records(), options(ExecutionMode::Incremental));
    assert_eq!(engine.step(), StepOutcome::Idle);

    engine.initialize();
    assert_eq!(engine.phase(), Phase::Initializing);

    let mut ran = Vec::new();
    loop {
        match engine.step() {
            StepOutcome::Ran(step) => ran.push(step),
            StepOutcome::Completed => break,
            other => panic!("unexpected {other:?}"),
        }
    }
    assert_eq!(ran, Step::ALL[..Step::ALL.len() - 1].to_vec());
    assert!(engine.is_initialized());
    assert_eq!(engine.step(), StepOutcome::Idle);
}

#[test]
fn engine_ignores_initialize_while_initializing() {
    let engine = LayoutEngine::new(records(), options(ExecutionMode::Incremental));
    engine.initialize();
    assert_eq!(engine.step(), StepOutcome::Ran(Step::BuildNodes));

    engine.initialize();
    assert_eq!(engine.step(), StepOutcome::Ran(Step::CheckPrerequisites));
}

#[test]
fn engine_wait_drives_incremental_builds() {
    let engine = LayoutEngine::new(records(), options(ExecutionMode::Incremental));
    assert!(engine.wait_for_initialization());
    assert_eq!(engine.layout().unwrap().nodes.len(), 4);
}

#[test]
fn engine_rebuild_after_reset_reproduces_the_same_graph() {
    let engine = LayoutEngine::new(records(), options(ExecutionMode::Background));
    assert!(engine.wait_for_initialization());
    let first = engine.tree().unwrap();

    engine.reset(true);
    assert!(engine.wait_for_initialization());
    let second = engine.tree().unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(first.node_count(), second.node_count());
    assert_eq!(first.edge_count(), second.edge_count());
    assert_eq!(first.size(), second.size());
}

#[test]
fn engine_reset_without_rebuild_drops_the_layout() {
    let engine = LayoutEngine::new(records(), options(ExecutionMode::Incremental));
    assert!(engine.wait_for_initialization());

    engine.reset(false);
    assert_eq!(engine.phase(), Phase::NotInitialized);
    assert!(engine.tree().is_none());
    assert!(engine.layout().is_none());
}

#[test]
fn engine_reset_mid_build_starts_over() {
    let engine = LayoutEngine::new(records(), options(ExecutionMode::Incremental));
    engine.initialize();
    engine.step();
    engine.step();

    engine.reset(true);
    assert_eq!(engine.phase(), Phase::Initializing);
    assert_eq!(engine.step(), StepOutcome::Ran(Step::BuildNodes));
}

#[test]
fn engine_failure_returns_to_not_initialized() {
    let engine = LayoutEngine::new(
        inverted_records(),
        failing_options(ExecutionMode::Background),
    );
    assert!(!engine.wait_for_initialization());
    assert_eq!(engine.phase(), Phase::NotInitialized);
    assert!(engine.layout().is_none());
}

#[test]
fn engine_failure_in_incremental_mode_reports_the_failing_step() {
    let engine = LayoutEngine::new(
        inverted_records(),
        failing_options(ExecutionMode::Incremental),
    );
    engine.initialize();

    let mut outcomes = Vec::new();
    loop {
        let outcome = engine.step();
        outcomes.push(outcome);
        if !matches!(outcome, StepOutcome::Ran(_)) {
            break;
        }
    }
    assert_eq!(outcomes.last(), Some(&StepOutcome::Failed));
    assert_eq!(outcomes.len(), 4);
    assert_eq!(engine.phase(), Phase::NotInitialized);
}

#[test]
fn engine_notifies_listeners_on_every_completed_build() {
    let engine = LayoutEngine::new(records(), options(ExecutionMode::Incremental));
    let seen = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&seen);
    engine.on_initialized(move |layout| {
        counter.fetch_add(layout.nodes.len(), Ordering::SeqCst);
    });

    assert!(engine.wait_for_initialization());
    engine.reset(true);
    assert!(engine.wait_for_initialization());
    assert_eq!(seen.load(Ordering::SeqCst), 8);
}

#[test]
fn engine_set_definitions_replaces_the_records() {
    let engine = LayoutEngine::new(records(), options(ExecutionMode::Background));
    assert!(engine.wait_for_initialization());

    engine.set_definitions(vec![Definition::new("solo", 1)], true);
    assert!(engine.wait_for_initialization());
    assert_eq!(engine.definitions().len(), 1);
    let layout = engine.layout().unwrap();
    assert_eq!(layout.nodes.len(), 1);
    assert_eq!(layout.placement("solo").unwrap().layer, 1);
}

#[test]
fn engine_clones_share_one_session() {
    let engine = LayoutEngine::new(records(), options(ExecutionMode::Background));
    let other = engine.clone();
    let waiter = std::thread::spawn(move || other.wait_for_initialization());

    assert!(engine.wait_for_initialization());
    assert!(waiter.join().unwrap());
}
