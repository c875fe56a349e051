use super::{GameContext, GameEvent};
use std::time::Duration;

/// Prints events to stdout and sleeps between steps.
pub struct StdioContext {
    trace: bool,
}

impl StdioContext {
    pub fn new(trace: bool) -> Self {
        Self { trace }
    }
}

impl GameContext for StdioContext {
    fn notify(&mut self, event: GameEvent) {
        if self.trace {
            println!("{event}");
        }
    }

    fn pause(&mut self, delay: Duration) {
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }
}

/// Records events and pauses without ever sleeping.
#[derive(Debug, Default)]
pub struct BufferedContext {
    events: Vec<GameEvent>,
    paused: Duration,
    pauses: usize,
}

impl BufferedContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn pauses(&self) -> usize {
        self.pauses
    }

    pub fn paused(&self) -> Duration {
        self.paused
    }

    pub fn into_events(self) -> Vec<GameEvent> {
        self.events
    }
}

impl GameContext for BufferedContext {
    fn notify(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    fn pause(&mut self, delay: Duration) {
        self.pauses += 1;
        self.paused += delay;
    }
}
