use std::{
    fs::{read_dir, read_to_string},
    path::Path,
    time::Duration,
};

use blockmaze::{
    block::{Block, BlockKind, BlockTree, Branch, Condition},
    interpreter::{
        context::BufferedContext,
        error::{Failure, FailureKind, InterpreterError},
        formatter::{BasicFormatter as OutcomeBasicFormatter, OutcomeFormatter},
        BlockInterpreter, CancelReason, GameContext, GameEvent, Interpreter, ProgramState,
        RunConfig, RunOutcome, StopHandle,
    },
    parser::{
        formatter::{BasicFormatter as ParserBasicFormatter, ParserFormatter},
        Parser,
    },
    world::{Direction, GridWorld, Position},
};
use color_eyre::{eyre::Context, Result};
use proptest::prelude::*;

const FILE_STEP_LIMIT: u64 = 10_000;

fn open_grid(rows: usize, cols: usize) -> Vec<Vec<u8>> {
    vec![vec![1; cols]; rows]
}

fn grid_world(codes: &[Vec<u8>], start: (usize, usize), direction: Direction, goal: (usize, usize)) -> GridWorld {
    GridWorld::new(
        codes,
        Position::new(start.0, start.1),
        direction,
        Position::new(goal.0, goal.1),
    )
    .expect("Test worlds are valid.")
}

fn program(source: &str) -> BlockTree {
    let (tree, _) = Parser::new(source)
        .parse_program()
        .expect("Test programs are valid.");
    tree
}

fn run(tree: &BlockTree, world: &GridWorld) -> (RunOutcome, BufferedContext) {
    let mut context = BufferedContext::new();
    let mut interpreter = BlockInterpreter::new(tree, world);
    let outcome = interpreter
        .run(&mut context, &RunConfig::default().with_step_limit(FILE_STEP_LIMIT))
        .expect("A fresh interpreter is idle.");
    (outcome, context)
}

fn moves(events: &[GameEvent]) -> Vec<(Position, Position)> {
    events
        .iter()
        .filter_map(|event| match event {
            GameEvent::Moved { from, to } => Some((*from, *to)),
            _ => None,
        })
        .collect()
}

fn turns(events: &[GameEvent]) -> Vec<(Direction, Direction)> {
    events
        .iter()
        .filter_map(|event| match event {
            GameEvent::Turned { from, to } => Some((*from, *to)),
            _ => None,
        })
        .collect()
}

// Scenarios

#[test]
fn test_straight_line_reaches_goal() {
    let world = grid_world(&open_grid(3, 3), (0, 0), Direction::Right, (0, 2));
    let mut tree = BlockTree::new();
    let root = tree.root();
    let first = tree.add(Block::new(BlockKind::MoveForward)).unwrap();
    let second = tree.add(Block::new(BlockKind::MoveForward)).unwrap();
    tree.push(root, Branch::Then, first).unwrap();
    tree.push(root, Branch::Then, second).unwrap();

    let mut context = BufferedContext::new();
    let mut interpreter = BlockInterpreter::new(&tree, &world);
    let outcome = interpreter.run(&mut context, &RunConfig::default()).unwrap();

    assert_eq!(
        outcome,
        RunOutcome::Success {
            position: Position::new(0, 2)
        }
    );
    assert_eq!(interpreter.position(), Position::new(0, 2));
    assert!(!interpreter.is_executing());
    assert_eq!(
        context.events(),
        &[
            GameEvent::Started,
            GameEvent::Executing {
                block: first,
                kind: BlockKind::MoveForward
            },
            GameEvent::Moved {
                from: Position::new(0, 0),
                to: Position::new(0, 1)
            },
            GameEvent::Executing {
                block: second,
                kind: BlockKind::MoveForward
            },
            GameEvent::Moved {
                from: Position::new(0, 1),
                to: Position::new(0, 2)
            },
            GameEvent::Succeeded {
                position: Position::new(0, 2)
            },
        ]
    );
}

#[test]
fn test_wall_collision_resets_and_aborts() {
    let codes = vec![vec![1, 0, 1], vec![1, 1, 1], vec![1, 1, 1]];
    let world = grid_world(&codes, (0, 0), Direction::Right, (0, 2));
    let tree = program("move move");
    let first = tree.body(tree.root(), Branch::Then)[0];

    let mut context = BufferedContext::new();
    let mut interpreter = BlockInterpreter::new(&tree, &world);
    let outcome = interpreter.run(&mut context, &RunConfig::default()).unwrap();

    assert_eq!(
        outcome,
        RunOutcome::Failure(Failure {
            kind: FailureKind::Blocked {
                at: Position::new(0, 1)
            },
            block: Some(first),
        })
    );
    assert_eq!(interpreter.position(), Position::new(0, 0));
    assert_eq!(interpreter.direction(), Direction::Right);
    assert!(!interpreter.is_executing());

    let executed = context
        .events()
        .iter()
        .filter(|event| matches!(event, GameEvent::Executing { .. }))
        .count();
    assert_eq!(executed, 1);
    let failures = context
        .events()
        .iter()
        .filter(|event| matches!(event, GameEvent::Failed(_)))
        .count();
    assert_eq!(failures, 1);
}

#[test]
fn test_counted_loop() {
    let world = grid_world(&open_grid(3, 3), (0, 0), Direction::Down, (2, 0));
    let mut tree = BlockTree::new();
    let step = tree.add(Block::new(BlockKind::MoveForward)).unwrap();
    let repeat = tree
        .add(
            Block::new(BlockKind::RepeatCount)
                .with_value("2")
                .with_children(vec![step]),
        )
        .unwrap();
    tree.push(tree.root(), Branch::Then, repeat).unwrap();

    let (outcome, context) = run(&tree, &world);
    assert_eq!(
        outcome,
        RunOutcome::Success {
            position: Position::new(2, 0)
        }
    );
    assert_eq!(moves(context.events()).len(), 2);
}

#[test]
fn test_if_else_takes_else_branch_only() {
    let world = grid_world(&open_grid(3, 3), (0, 0), Direction::Right, (0, 1));
    let tree = program("if front_blocked { turn right } else { move }");

    let (outcome, context) = run(&tree, &world);
    assert_eq!(
        outcome,
        RunOutcome::Success {
            position: Position::new(0, 1)
        }
    );
    assert_eq!(moves(context.events()).len(), 1);
    assert!(turns(context.events()).is_empty());
}

#[test]
fn test_empty_program_reports_goal_not_reached() {
    let world = grid_world(&open_grid(2, 2), (0, 0), Direction::Up, (1, 1));
    let tree = BlockTree::new();

    let (outcome, context) = run(&tree, &world);
    assert_eq!(
        outcome,
        RunOutcome::Failure(Failure {
            kind: FailureKind::GoalNotReached {
                position: Position::new(0, 0),
                goal: Position::new(1, 1),
            },
            block: None,
        })
    );
    assert_eq!(
        context.events().last(),
        Some(&GameEvent::Failed(Failure {
            kind: FailureKind::GoalNotReached {
                position: Position::new(0, 0),
                goal: Position::new(1, 1),
            },
            block: None,
        }))
    );
}

#[test]
fn test_off_grid_move() {
    let world = grid_world(&open_grid(1, 2), (0, 0), Direction::Left, (0, 1));
    let tree = program("move");

    let (outcome, _) = run(&tree, &world);
    let RunOutcome::Failure(failure) = outcome else {
        panic!("Expected a failure but got {outcome:?}");
    };
    assert_eq!(
        failure.kind,
        FailureKind::OutOfBounds {
            from: Position::new(0, 0),
            direction: Direction::Left
        }
    );
    assert_eq!(failure.code(), "RN001");
}

// Loops

#[test]
fn test_break_inside_if_exits_loop() {
    let world = grid_world(&open_grid(1, 5), (0, 0), Direction::Right, (0, 2));
    let tree = program("repeat 10 { move if at_flag { break } }");

    let (outcome, context) = run(&tree, &world);
    assert_eq!(
        outcome,
        RunOutcome::Success {
            position: Position::new(0, 2)
        }
    );
    assert_eq!(moves(context.events()).len(), 2);
}

#[test]
fn test_break_only_exits_innermost_loop() {
    let world = grid_world(&open_grid(1, 3), (0, 0), Direction::Right, (0, 2));
    let tree = program("repeat 2 { repeat 5 { break move } move }");

    let (outcome, context) = run(&tree, &world);
    assert!(outcome.is_success());
    assert_eq!(moves(context.events()).len(), 2);
}

#[test]
fn test_continue_skips_rest_of_iteration() {
    let codes = vec![vec![2]];
    let world = grid_world(&codes, (0, 0), Direction::Right, (0, 0));
    let tree = program("repeat 3 { turn left continue move }");

    let (outcome, context) = run(&tree, &world);
    assert!(outcome.is_success());
    assert!(moves(context.events()).is_empty());
    assert_eq!(
        turns(context.events()),
        vec![
            (Direction::Right, Direction::Up),
            (Direction::Up, Direction::Left),
            (Direction::Left, Direction::Down),
        ]
    );
}

#[test]
fn test_continue_from_nested_if() {
    let world = grid_world(&open_grid(1, 4), (0, 0), Direction::Right, (0, 3));
    let tree = program("forever { if at_flag { break } move if always { continue } turn left }");

    let (outcome, context) = run(&tree, &world);
    assert!(outcome.is_success());
    assert_eq!(moves(context.events()).len(), 3);
    assert!(turns(context.events()).is_empty());
}

#[test]
fn test_forever_only_ends_by_failure() {
    let world = grid_world(&open_grid(1, 3), (0, 0), Direction::Right, (0, 2));
    let tree = program("forever { move }");

    let (outcome, context) = run(&tree, &world);
    let RunOutcome::Failure(failure) = outcome else {
        panic!("Expected a failure but got {outcome:?}");
    };
    assert!(matches!(failure.kind, FailureKind::OutOfBounds { .. }));
    assert_eq!(moves(context.events()).len(), 2);
}

#[test]
fn test_malformed_counts_run_once() {
    let world = grid_world(&open_grid(1, 6), (0, 0), Direction::Right, (0, 1));
    for source in [
        "repeat { move }",
        "repeat 0 { move }",
        "repeat abc { move }",
        "repeat \"-2\" { move }",
        "repeat \"\" { move }",
        "repeat 99999999999 { move }",
    ] {
        let (outcome, _) = run(&program(source), &world);
        assert!(outcome.is_success(), "{source} ran more than once");
    }

    let world = world_with_goal(6, (0, 3));
    let (outcome, _) = run(&program("repeat \" 3 \" { move }"), &world);
    assert!(outcome.is_success());
}

fn world_with_goal(cols: usize, goal: (usize, usize)) -> GridWorld {
    grid_world(&open_grid(1, cols), (0, 0), Direction::Right, goal)
}

#[test]
fn test_break_and_continue_outside_loop_are_ignored() {
    let world = world_with_goal(3, (0, 2));
    let tree = program("break move continue move");

    let (outcome, _) = run(&tree, &world);
    assert!(outcome.is_success());
}

#[test]
fn test_attack_does_nothing() {
    let world = world_with_goal(2, (0, 0));
    let tree = program("attack attack");

    let (outcome, context) = run(&tree, &world);
    assert!(outcome.is_success());
    assert!(moves(context.events()).is_empty());
    assert!(turns(context.events()).is_empty());
}

#[test]
fn test_loop_with_empty_body_counts_iterations() {
    let world = world_with_goal(1, (0, 0));
    let tree = program("repeat 3 { }");
    let mut context = BufferedContext::new();
    let mut interpreter = BlockInterpreter::new(&tree, &world);
    interpreter.start(&mut context).unwrap();

    let mut steps = 0;
    let outcome = loop {
        steps += 1;
        if let ProgramState::Finished(outcome) = interpreter.step(&mut context).unwrap() {
            break outcome;
        }
    };
    assert!(outcome.is_success());
    // The loop block, two iteration boundaries and the final goal check.
    assert_eq!(steps, 4);
}

// Control

#[test]
fn test_step_limit_cancels_infinite_loop() {
    let world = world_with_goal(2, (0, 1));
    for source in ["forever { turn left }", "forever { }"] {
        let tree = program(source);
        let mut context = BufferedContext::new();
        let mut interpreter = BlockInterpreter::new(&tree, &world);
        let outcome = interpreter
            .run(&mut context, &RunConfig::default().with_step_limit(50))
            .unwrap();

        assert_eq!(outcome, RunOutcome::Cancelled(CancelReason::StepLimit(50)));
        assert_eq!(interpreter.position(), Position::new(0, 0));
        assert_eq!(interpreter.direction(), Direction::Right);
        assert_eq!(interpreter.current_block(), None);
        assert!(!interpreter.is_executing());
        assert_eq!(
            context.events().last(),
            Some(&GameEvent::Cancelled(CancelReason::StepLimit(50)))
        );
    }
}

#[test]
fn test_start_while_running_is_rejected() {
    let world = world_with_goal(3, (0, 2));
    let tree = program("move move");
    let mut context = BufferedContext::new();
    let mut interpreter = BlockInterpreter::new(&tree, &world);

    interpreter.start(&mut context).unwrap();
    assert_eq!(interpreter.step(&mut context), Ok(ProgramState::Run));
    let current = interpreter.current_block();

    assert_eq!(
        interpreter.start(&mut context),
        Err(InterpreterError::AlreadyRunning)
    );
    assert_eq!(interpreter.position(), Position::new(0, 1));
    assert_eq!(interpreter.current_block(), current);
    assert!(interpreter.is_executing());

    assert_eq!(interpreter.step(&mut context), Ok(ProgramState::Run));
    assert_eq!(
        interpreter.step(&mut context),
        Ok(ProgramState::Finished(RunOutcome::Success {
            position: Position::new(0, 2)
        }))
    );
}

#[test]
fn test_step_without_start() {
    let world = world_with_goal(2, (0, 1));
    let tree = program("move");
    let mut context = BufferedContext::new();
    let mut interpreter = BlockInterpreter::new(&tree, &world);

    assert_eq!(
        interpreter.step(&mut context),
        Err(InterpreterError::NotRunning)
    );
    assert!(context.events().is_empty());
}

#[test]
fn test_current_block_follows_execution() {
    let world = world_with_goal(3, (0, 2));
    let tree = program("move turn left turn right move");
    let body = tree.body(tree.root(), Branch::Then).to_vec();
    let mut context = BufferedContext::new();
    let mut interpreter = BlockInterpreter::new(&tree, &world);

    assert_eq!(interpreter.current_block(), None);
    interpreter.start(&mut context).unwrap();
    for &id in body.iter() {
        assert_eq!(interpreter.step(&mut context), Ok(ProgramState::Run));
        assert_eq!(interpreter.current_block(), Some(id));
    }
}

#[test]
fn test_reset_mid_run() {
    let world = world_with_goal(3, (0, 2));
    let tree = program("move turn left move");
    let mut context = BufferedContext::new();
    let mut interpreter = BlockInterpreter::new(&tree, &world);

    interpreter.start(&mut context).unwrap();
    interpreter.step(&mut context).unwrap();
    interpreter.step(&mut context).unwrap();
    assert_eq!(interpreter.position(), Position::new(0, 1));
    assert_eq!(interpreter.direction(), Direction::Up);

    interpreter.reset(&mut context);
    assert_eq!(interpreter.position(), Position::new(0, 0));
    assert_eq!(interpreter.direction(), Direction::Right);
    assert_eq!(interpreter.current_block(), None);
    assert!(!interpreter.is_executing());
    assert_eq!(context.events().last(), Some(&GameEvent::Reset));
    assert_eq!(
        interpreter.step(&mut context),
        Err(InterpreterError::NotRunning)
    );

    // A reset run can be started again from scratch.
    let outcome = interpreter.run(&mut context, &RunConfig::default()).unwrap();
    assert!(!outcome.is_success());
}

#[test]
fn test_stop_request_cancels_run() {
    let world = world_with_goal(3, (0, 2));
    let tree = program("move move");
    let mut context = BufferedContext::new();
    let mut interpreter = BlockInterpreter::new(&tree, &world);
    let handle = interpreter.stop_handle();

    interpreter.start(&mut context).unwrap();
    interpreter.step(&mut context).unwrap();
    handle.request_stop();

    assert_eq!(
        interpreter.step(&mut context),
        Ok(ProgramState::Finished(RunOutcome::Cancelled(
            CancelReason::Stopped
        )))
    );
    assert_eq!(interpreter.position(), Position::new(0, 0));
    assert!(!interpreter.is_executing());
    assert!(!handle.is_requested());
}

/// Asks the run to stop once it has paused a given number of times.
struct StoppingContext {
    inner: BufferedContext,
    handle: StopHandle,
    stop_after: usize,
}

impl GameContext for StoppingContext {
    fn notify(&mut self, event: GameEvent) {
        self.inner.notify(event);
    }

    fn pause(&mut self, delay: Duration) {
        self.inner.pause(delay);
        if self.inner.pauses() == self.stop_after {
            self.handle.request_stop();
        }
    }
}

#[test]
fn test_stop_request_during_run() {
    let world = world_with_goal(2, (0, 1));
    let tree = program("forever { turn right }");
    let mut interpreter = BlockInterpreter::new(&tree, &world);
    let mut context = StoppingContext {
        inner: BufferedContext::new(),
        handle: interpreter.stop_handle(),
        stop_after: 5,
    };

    let outcome = interpreter.run(&mut context, &RunConfig::default()).unwrap();
    assert_eq!(outcome, RunOutcome::Cancelled(CancelReason::Stopped));
    assert_eq!(context.inner.pauses(), 5);
    assert_eq!(interpreter.direction(), Direction::Right);
}

#[test]
fn test_stop_request_from_another_thread() {
    let world = world_with_goal(2, (0, 1));
    let tree = program("forever { }");
    let mut interpreter = BlockInterpreter::new(&tree, &world);
    let handle = interpreter.stop_handle();
    let mut context = BufferedContext::new();
    interpreter.start(&mut context).unwrap();

    std::thread::spawn(move || handle.request_stop())
        .join()
        .expect("Stopping thread does not panic.");
    assert_eq!(
        interpreter.step(&mut context),
        Ok(ProgramState::Finished(RunOutcome::Cancelled(
            CancelReason::Stopped
        )))
    );
}

#[test]
fn test_pacing_between_steps() {
    let world = world_with_goal(3, (0, 2));
    let tree = program("move move");
    let mut context = BufferedContext::new();
    let mut interpreter = BlockInterpreter::new(&tree, &world);
    let config = RunConfig::default().with_step_delay(Duration::from_millis(5));

    let outcome = interpreter.run(&mut context, &config).unwrap();
    assert!(outcome.is_success());
    assert_eq!(context.pauses(), 2);
    assert_eq!(context.paused(), Duration::from_millis(10));
}

// Properties

fn world_strategy() -> impl Strategy<Value = GridWorld> {
    (1usize..6, 1usize..6)
        .prop_flat_map(|(rows, cols)| {
            (
                prop::collection::vec(prop::collection::vec(0u8..=2, cols), rows),
                0..rows,
                0..cols,
                0..rows,
                0..cols,
                prop::sample::select(Direction::ALL.to_vec()),
            )
        })
        .prop_map(|(codes, start_row, start_col, goal_row, goal_col, direction)| {
            grid_world(&codes, (start_row, start_col), direction, (goal_row, goal_col))
        })
}

fn simple_block_strategy() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["move", "turn left", "turn right", "attack"])
}

proptest! {
    #[test]
    fn front_clear_and_blocked_are_complements(world in world_strategy()) {
        let tree = BlockTree::new();
        let interpreter = BlockInterpreter::new(&tree, &world);
        prop_assert_ne!(
            interpreter.evaluate(Condition::FrontIsClear),
            interpreter.evaluate(Condition::FrontIsBlocked)
        );
        prop_assert!(interpreter.evaluate(Condition::Always));
    }

    #[test]
    fn moves_only_program_walks_the_grid(world in world_strategy(), count in 0usize..8) {
        let source = vec!["move"; count].join(" ");
        let tree = program(&source);
        let (outcome, context) = run(&tree, &world);

        let direction = world.start_direction();
        let mut position = world.start();
        let mut path = Vec::new();
        let mut failure = None;
        for _ in 0..count {
            match world.ahead(position, direction) {
                None => {
                    failure = Some(FailureKind::OutOfBounds { from: position, direction });
                    break;
                }
                Some(target) if !world.is_walkable(target) => {
                    failure = Some(FailureKind::Blocked { at: target });
                    break;
                }
                Some(target) => {
                    path.push((position, target));
                    position = target;
                }
            }
        }

        prop_assert_eq!(moves(context.events()), path);
        match (failure, outcome) {
            (Some(expected), RunOutcome::Failure(actual)) => prop_assert_eq!(actual.kind, expected),
            (None, RunOutcome::Success { position: actual }) => {
                prop_assert_eq!(position, world.goal());
                prop_assert_eq!(actual, position);
            }
            (None, RunOutcome::Failure(actual)) => prop_assert_eq!(
                actual.kind,
                FailureKind::GoalNotReached { position, goal: world.goal() }
            ),
            (expected, actual) => prop_assert!(false, "expected {expected:?} but got {actual:?}"),
        }
    }

    #[test]
    fn counted_loop_matches_unrolled_body(
        world in world_strategy(),
        body in prop::collection::vec(simple_block_strategy(), 1..4),
        count in 1usize..5,
    ) {
        let body = body.join(" ");
        let looped = program(&format!("repeat {count} {{ {body} }}"));
        let unrolled = program(&vec![body.as_str(); count].join(" "));

        let (looped_outcome, looped_context) = run(&looped, &world);
        let (unrolled_outcome, unrolled_context) = run(&unrolled, &world);

        prop_assert_eq!(moves(looped_context.events()), moves(unrolled_context.events()));
        prop_assert_eq!(turns(looped_context.events()), turns(unrolled_context.events()));
        match (looped_outcome, unrolled_outcome) {
            (RunOutcome::Failure(looped), RunOutcome::Failure(unrolled)) => {
                prop_assert_eq!(looped.kind, unrolled.kind)
            }
            (looped, unrolled) => prop_assert_eq!(looped, unrolled),
        }
    }

    #[test]
    fn break_ends_forever_loop(distance in 1usize..10) {
        let world = world_with_goal(distance + 1, (0, distance));
        let tree = program("forever { move if at_flag { break } }");

        let (outcome, context) = run(&tree, &world);
        prop_assert_eq!(outcome, RunOutcome::Success { position: Position::new(0, distance) });
        prop_assert_eq!(moves(context.events()).len(), distance);
    }

    #[test]
    fn if_else_runs_exactly_one_branch(
        world in world_strategy(),
        condition in prop::sample::select(Condition::ALL.to_vec()),
    ) {
        let tree = program(&format!("if {} {{ turn left }} else {{ turn right }}", condition.keyword()));
        let expected = BlockInterpreter::new(&tree, &world).evaluate(condition);
        let (_, context) = run(&tree, &world);

        let start = world.start_direction();
        let expected_turn = match expected {
            true => (start, start.turned_left()),
            false => (start, start.turned_right()),
        };
        prop_assert_eq!(turns(context.events()), vec![expected_turn]);
    }

    #[test]
    fn always_runs_then_branch(world in world_strategy()) {
        let tree = program("if always { turn left } if always { turn left } else { turn right }");
        let (_, context) = run(&tree, &world);
        let start = world.start_direction();
        prop_assert_eq!(
            turns(context.events()),
            vec![(start, start.turned_left()), (start.turned_left(), start.turned_left().turned_left())]
        );
    }
}

// Level files

#[test]
fn test_run_levels() -> Result<()> {
    let input_dir = Path::new("./test_data/levels/run");
    test_engine(input_dir, "# expect:", check_run)
}

#[test]
fn test_error_levels() -> Result<()> {
    let input_dir = Path::new("./test_data/levels/error");
    test_engine(input_dir, "# error:", check_error)
}

fn check_run(source: &str, expected: &str) {
    let level = match Parser::new(source).parse_level() {
        Ok(level) => level,
        Err(error) => panic!("Failed to parse level: {error}"),
    };
    let mut context = BufferedContext::new();
    let mut interpreter = BlockInterpreter::new(&level.program, &level.world);
    let outcome = interpreter
        .run(
            &mut context,
            &RunConfig::default().with_step_limit(FILE_STEP_LIMIT),
        )
        .expect("A fresh interpreter is idle.");
    let formatter = OutcomeBasicFormatter::new(source, &level.source_map);
    assert_eq!(formatter.format(&outcome), expected);
}

fn check_error(source: &str, expected: &str) {
    let error = match Parser::new(source).parse_level() {
        Ok(_) => panic!("Expected a parse error"),
        Err(error) => error,
    };
    let formatter = ParserBasicFormatter::new(source);
    assert_eq!(formatter.format_error(&error), expected);
}

fn test_engine(input_dir: &Path, marker: &str, check: fn(&str, &str)) -> Result<()> {
    let mut succeeded = true;
    let mut checked = 0;
    for entry in read_dir(input_dir).context("Failed to open input test data folder")? {
        let entry = entry?;
        let path = entry.path();

        let Some(extension) = path.extension() else {
            continue;
        };
        if extension != "maze" {
            continue;
        }

        let source = read_to_string(&path).context("Failed to open input test data file")?;
        let Some(expected) = source
            .lines()
            .find_map(|line| line.strip_prefix(marker))
            .map(|expected| expected.trim().to_string())
        else {
            println!("\tMissing {marker} in {path:?}");
            succeeded = false;
            continue;
        };

        println!("Checking {path:?}");
        checked += 1;
        let res = std::panic::catch_unwind(|| check(&source, &expected));
        if res.is_err() {
            println!("\tFails test case {path:?}");
            succeeded = false;
        }
    }

    assert!(checked > 0, "No test cases in {input_dir:?}");
    assert!(succeeded);
    Ok(())
}
