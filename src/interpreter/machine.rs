use super::error::{Failure, FailureKind, InterpreterError};
use super::frame::{Frame, Iterations, Next, Scope, Signal};
use super::runner::StopHandle;
use super::{CancelReason, GameContext, GameEvent, Interpreter, ProgramState, RunOutcome};
use crate::block::{Block, BlockId, BlockKind, BlockTree, Branch, Condition};
use crate::world::{Direction, GridWorld, Position};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Character {
    pub position: Position,
    pub direction: Direction,
}

impl Character {
    pub fn at_start(world: &GridWorld) -> Self {
        Self {
            position: world.start(),
            direction: world.start_direction(),
        }
    }
}

/// Runs a block tree against a grid world, one block per step.
///
/// The tree and the world are borrowed for the lifetime of the interpreter so
/// neither can change while a run is in progress.
pub struct BlockInterpreter<'a> {
    program: &'a BlockTree,
    world: &'a GridWorld,
    character: Character,
    frames: Vec<Frame>,
    current_block: Option<BlockId>,
    is_executing: bool,
    stop: StopHandle,
}

impl<'a> BlockInterpreter<'a> {
    pub fn new(program: &'a BlockTree, world: &'a GridWorld) -> Self {
        Self {
            program,
            world,
            character: Character::at_start(world),
            frames: Vec::new(),
            current_block: None,
            is_executing: false,
            stop: StopHandle::default(),
        }
    }

    pub fn character(&self) -> Character {
        self.character
    }

    pub fn position(&self) -> Position {
        self.character.position
    }

    pub fn direction(&self) -> Direction {
        self.character.direction
    }

    pub fn current_block(&self) -> Option<BlockId> {
        self.current_block
    }

    pub fn is_executing(&self) -> bool {
        self.is_executing
    }

    /// A handle that can cancel the run from elsewhere, including other threads.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn start<C: GameContext>(&mut self, context: &mut C) -> Result<(), InterpreterError> {
        if self.is_executing {
            warn!("start requested while a run is in progress");
            return Err(InterpreterError::AlreadyRunning);
        }
        self.restore();
        self.frames.push(Frame::program(self.program.root()));
        self.is_executing = true;
        debug!(start = %self.character.position, direction = %self.character.direction, "run started");
        context.notify(GameEvent::Started);
        Ok(())
    }

    /// Puts the character back at the start and drops any run in progress.
    pub fn reset<C: GameContext>(&mut self, context: &mut C) {
        if self.is_executing {
            info!("run aborted by reset");
        }
        self.restore();
        context.notify(GameEvent::Reset);
    }

    pub fn evaluate(&self, condition: Condition) -> bool {
        let Character {
            position,
            direction,
        } = self.character;
        match condition {
            Condition::FrontIsClear => self.world.front_is_clear(position, direction),
            Condition::FrontIsBlocked => !self.world.front_is_clear(position, direction),
            Condition::AtFlag => position == self.world.goal(),
            Condition::Always => true,
        }
    }

    pub(super) fn cancel<C: GameContext>(
        &mut self,
        reason: CancelReason,
        context: &mut C,
    ) -> RunOutcome {
        info!(%reason, "run cancelled");
        self.restore();
        context.notify(GameEvent::Cancelled(reason));
        RunOutcome::Cancelled(reason)
    }

    fn restore(&mut self) {
        self.frames.clear();
        self.character = Character::at_start(self.world);
        self.current_block = None;
        self.is_executing = false;
        self.stop.clear();
    }

    fn fail<C: GameContext>(&mut self, failure: Failure, context: &mut C) -> RunOutcome {
        info!(%failure, "run failed");
        self.frames.clear();
        self.character = Character::at_start(self.world);
        self.is_executing = false;
        context.notify(GameEvent::Failed(failure));
        RunOutcome::Failure(failure)
    }

    fn finish<C: GameContext>(&mut self, context: &mut C) -> RunOutcome {
        let position = self.character.position;
        let goal = self.world.goal();
        if position != goal {
            let failure = Failure {
                kind: FailureKind::GoalNotReached { position, goal },
                block: None,
            };
            return self.fail(failure, context);
        }

        info!(%position, "goal reached");
        self.frames.clear();
        self.is_executing = false;
        context.notify(GameEvent::Succeeded { position });
        RunOutcome::Success { position }
    }
}

// Frame stack
impl<'a> BlockInterpreter<'a> {
    fn next_block(&mut self) -> Next {
        let program = self.program;
        loop {
            let Some(frame) = self.frames.last_mut() else {
                return Next::Done;
            };
            let body = program.body(frame.owner, frame.branch);
            if let Some(&id) = body.get(frame.cursor) {
                frame.cursor += 1;
                return Next::Block(id);
            }

            match frame.scope {
                Scope::Program => return Next::Done,
                Scope::Branch => {
                    self.frames.pop();
                }
                Scope::Loop(iterations) => match iterations.next() {
                    Some(remaining) => {
                        frame.cursor = 0;
                        frame.scope = Scope::Loop(remaining);
                        if body.is_empty() {
                            return Next::IterationBoundary;
                        }
                    }
                    None => {
                        self.frames.pop();
                    }
                },
            }
        }
    }

    fn innermost_loop(&self) -> Option<usize> {
        self.frames.iter().rposition(Frame::is_loop)
    }

    fn break_loop(&mut self) {
        match self.innermost_loop() {
            Some(index) => self.frames.truncate(index),
            None => debug!("break outside of a loop ignored"),
        }
    }

    fn continue_loop(&mut self) {
        let Some(index) = self.innermost_loop() else {
            debug!("continue outside of a loop ignored");
            return;
        };
        self.frames.truncate(index + 1);
        let frame = &mut self.frames[index];
        frame.cursor = self.program.body(frame.owner, frame.branch).len();
    }
}

// Blocks
impl<'a> BlockInterpreter<'a> {
    fn execute<C: GameContext>(&mut self, id: BlockId, block: &Block, context: &mut C) -> Signal {
        match block.kind() {
            BlockKind::MoveForward => self.move_forward(id, context),
            BlockKind::TurnLeft => {
                self.turn(self.character.direction.turned_left(), context);
                Signal::Continue
            }
            BlockKind::TurnRight => {
                self.turn(self.character.direction.turned_right(), context);
                Signal::Continue
            }
            BlockKind::Attack | BlockKind::Start => Signal::Continue,
            BlockKind::RepeatCount => {
                self.frames
                    .push(Frame::looping(id, Iterations::of_repeat(block)));
                Signal::Continue
            }
            BlockKind::RepeatForever => {
                self.frames.push(Frame::looping(id, Iterations::Forever));
                Signal::Continue
            }
            BlockKind::If => {
                if self.evaluate(block.condition()) {
                    self.frames.push(Frame::branch(id, Branch::Then));
                }
                Signal::Continue
            }
            BlockKind::IfElse => {
                let branch = match self.evaluate(block.condition()) {
                    true => Branch::Then,
                    false => Branch::Else,
                };
                self.frames.push(Frame::branch(id, branch));
                Signal::Continue
            }
            BlockKind::BreakLoop => Signal::BreakLoop,
            BlockKind::ContinueLoop => Signal::ContinueLoop,
        }
    }

    fn move_forward<C: GameContext>(&mut self, id: BlockId, context: &mut C) -> Signal {
        let Character {
            position: from,
            direction,
        } = self.character;
        let Some(target) = self.world.ahead(from, direction) else {
            return Signal::Abort(Failure {
                kind: FailureKind::OutOfBounds { from, direction },
                block: Some(id),
            });
        };
        if !self.world.is_walkable(target) {
            return Signal::Abort(Failure {
                kind: FailureKind::Blocked { at: target },
                block: Some(id),
            });
        }
        self.character.position = target;
        context.notify(GameEvent::Moved { from, to: target });
        Signal::Continue
    }

    fn turn<C: GameContext>(&mut self, to: Direction, context: &mut C) {
        let from = self.character.direction;
        self.character.direction = to;
        context.notify(GameEvent::Turned { from, to });
    }
}

impl<'a, C> Interpreter<C> for BlockInterpreter<'a>
where
    C: GameContext,
{
    fn step(&mut self, context: &mut C) -> Result<ProgramState, InterpreterError> {
        if !self.is_executing {
            return Err(InterpreterError::NotRunning);
        }
        if self.stop.is_requested() {
            return Ok(ProgramState::Finished(
                self.cancel(CancelReason::Stopped, context),
            ));
        }

        let id = match self.next_block() {
            Next::Block(id) => id,
            Next::IterationBoundary => return Ok(ProgramState::Run),
            Next::Done => return Ok(ProgramState::Finished(self.finish(context))),
        };
        let program = self.program;
        let Some(block) = program.get(id) else {
            debug!(block = %id, "skipping a block missing from the tree");
            return Ok(ProgramState::Run);
        };

        self.current_block = Some(id);
        debug!(block = %id, kind = %block.kind(), position = %self.character.position, "executing block");
        context.notify(GameEvent::Executing {
            block: id,
            kind: block.kind(),
        });

        let state = match self.execute(id, block, context) {
            Signal::Continue => ProgramState::Run,
            Signal::BreakLoop => {
                self.break_loop();
                ProgramState::Run
            }
            Signal::ContinueLoop => {
                self.continue_loop();
                ProgramState::Run
            }
            Signal::Abort(failure) => ProgramState::Finished(self.fail(failure, context)),
        };
        Ok(state)
    }
}
