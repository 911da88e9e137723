use embedded_hal::digital::OutputPin;

use crate::config::BLINK_HALF_PERIOD_MS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedCommand {
    On,
    Off,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LedState {
    On,
    #[default]
    Off,
}

impl LedState {
    pub fn is_on(self) -> bool {
        self == LedState::On
    }

    pub fn toggle(self) -> Self {
        match self {
            LedState::On => LedState::Off,
            LedState::Off => LedState::On,
        }
    }
}

impl From<LedCommand> for LedState {
    fn from(command: LedCommand) -> Self {
        match command {
            LedCommand::On => LedState::On,
            LedCommand::Off => LedState::Off,
        }
    }
}

/// Drive `pin` to `state`.
pub fn apply<P: OutputPin>(pin: &mut P, state: LedState) -> Result<(), P::Error> {
    match state {
        LedState::On => pin.set_high(),
        LedState::Off => pin.set_low(),
    }
}

/// One step of the blink demo: wait `delay_ms`, then drive the LED to `state`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlinkStep {
    pub delay_ms: u64,
    pub state: LedState,
    /// Set on the first step of every cycle.
    pub cycle_start: bool,
}

/// Endless on/off schedule, starting from an LED that is off.
#[derive(Debug, Clone)]
pub struct BlinkCycle {
    half_period_ms: u64,
    state: LedState,
}

impl BlinkCycle {
    pub fn new(half_period_ms: u64) -> Self {
        Self {
            half_period_ms,
            state: LedState::Off,
        }
    }
}

impl Default for BlinkCycle {
    fn default() -> Self {
        Self::new(BLINK_HALF_PERIOD_MS)
    }
}

impl Iterator for BlinkCycle {
    type Item = BlinkStep;

    fn next(&mut self) -> Option<BlinkStep> {
        let cycle_start = !self.state.is_on();
        self.state = self.state.toggle();
        Some(BlinkStep {
            delay_ms: self.half_period_ms,
            state: self.state,
            cycle_start,
        })
    }
}
