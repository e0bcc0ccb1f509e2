use bevy::log::{info, warn};

use crate::game_logic::{DEFAULT_COUNTDOWN, TOTAL_LAPS, TransitionError, VehicleId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RacePhase {
    #[default]
    Menu,
    Countdown,
    Racing,
    Paused,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RaceEvent {
    Start,
    CountdownElapsed,
    Pause,
    Resume,
    AllFinished,
}

/// Where a reset sends the race.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResetTarget {
    #[default]
    Menu,
    Countdown,
}

impl RacePhase {
    /// The transition table. `None` means the event is not accepted in this phase.
    pub fn next(self, event: RaceEvent) -> Option<RacePhase> {
        use RaceEvent::*;
        use RacePhase::*;
        match (self, event) {
            (Menu, Start) => Some(Countdown),
            (Countdown, CountdownElapsed) => Some(Racing),
            (Racing, Pause) => Some(Paused),
            (Paused, Resume) => Some(Racing),
            (Racing, AllFinished) => Some(Finished),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FinishEntry {
    pub id: VehicleId,
    pub name: String,
    pub time: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RaceState {
    phase: RacePhase,
    countdown: f32,
    countdown_length: f32,
    elapsed: f32,
    total_laps: u32,
    participants: usize,
    finish_order: Vec<FinishEntry>,
    best_time: Option<f32>,
}

impl Default for RaceState {
    fn default() -> Self {
        RaceState::new(TOTAL_LAPS, 0, DEFAULT_COUNTDOWN)
    }
}

impl RaceState {
    pub fn new(total_laps: u32, participants: usize, countdown: f32) -> Self {
        Self {
            phase: RacePhase::Menu,
            countdown,
            countdown_length: countdown,
            elapsed: 0.0,
            total_laps,
            participants,
            finish_order: Vec::new(),
            best_time: None,
        }
    }

    pub fn phase(&self) -> RacePhase {
        self.phase
    }

    pub fn is_racing(&self) -> bool {
        self.phase == RacePhase::Racing
    }

    pub fn countdown(&self) -> f32 {
        self.countdown
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn total_laps(&self) -> u32 {
        self.total_laps
    }

    pub fn participants(&self) -> usize {
        self.participants
    }

    pub fn finish_order(&self) -> &[FinishEntry] {
        &self.finish_order
    }

    /// Fastest completed race since the state was created. Survives resets.
    pub fn best_time(&self) -> Option<f32> {
        self.best_time
    }

    /// Applies `event`, or reports that the current phase does not accept it.
    /// The phase is left untouched on error.
    pub fn handle(&mut self, event: RaceEvent) -> Result<RacePhase, TransitionError> {
        let from = self.phase;
        let Some(to) = from.next(event) else {
            warn!("Ignoring race event {:?} during {:?}", event, from);
            return Err(TransitionError { from, event });
        };

        self.phase = to;
        info!("Race phase {:?} -> {:?}", from, to);

        if to == RacePhase::Finished {
            if self.best_time.is_none_or(|best| self.elapsed < best) {
                self.best_time = Some(self.elapsed);
            }
            info!("Race finished in {:.2}s", self.elapsed);
        }
        Ok(to)
    }

    /// Runs the countdown and race clocks. Menu, Paused and Finished leave every timer alone.
    pub fn update(&mut self, dt: f32) {
        match self.phase {
            RacePhase::Countdown => {
                self.countdown -= dt;
                if self.countdown <= 0.0 {
                    self.countdown = 0.0;
                    // Countdown always accepts CountdownElapsed
                    let _ = self.handle(RaceEvent::CountdownElapsed);
                }
            }
            RacePhase::Racing => self.elapsed += dt,
            RacePhase::Menu | RacePhase::Paused | RacePhase::Finished => {}
        }
    }

    /// Appends a finisher once. Returns false when `id` was already recorded.
    /// The race ends on its own once every participant is in.
    pub fn record_finish(&mut self, id: VehicleId, name: &str, time: f32) -> bool {
        if self.finish_order.iter().any(|entry| entry.id == id) {
            return false;
        }
        self.finish_order.push(FinishEntry {
            id,
            name: name.to_string(),
            time,
        });
        info!("{} finished in place {}", name, self.finish_order.len());

        if self.finish_order.len() >= self.participants && self.phase == RacePhase::Racing {
            let _ = self.handle(RaceEvent::AllFinished);
        }
        true
    }

    /// Zeroes the race fields and jumps to `target` from any phase.
    pub fn reset(&mut self, target: ResetTarget) {
        self.countdown = self.countdown_length;
        self.elapsed = 0.0;
        self.finish_order.clear();
        self.phase = match target {
            ResetTarget::Menu => RacePhase::Menu,
            ResetTarget::Countdown => RacePhase::Countdown,
        };
        info!("Race reset to {:?}", self.phase);
    }
}
