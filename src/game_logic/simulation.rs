use bevy::log::{debug, info};
use bevy::prelude::Resource;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::game_logic::{
    AI_ACCELERATION, AI_BASE_SPEED, AI_SPEED_SPREAD, GRID_LATERAL_SPACING, GRID_LONGITUDINAL_SPACING, InputSnapshot,
    LapRules, MAX_FRAME_DELTA, OPPONENT_NAMES, PowerUpSystem, RaceConfig, RaceEvent, RacePhase, RaceSettings,
    RaceState, ResetTarget, SetupError, Standing, TrackModel, TransitionError, VehicleId, VehicleManager,
    apply_ai_physics, apply_physics, plan_ai, resolve_collisions, wants_item,
};

/// What happened during one call to [`Simulation::tick`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickSummary {
    pub phase: RacePhase,
    pub contacts: usize,
    pub pickups: usize,
    pub finishes: usize,
}

/// The whole race: track, karts, pickups and race clock, plus the one RNG they share.
/// Everything mutates through [`Simulation::tick`]; rendering only borrows it.
#[derive(Resource)]
pub struct Simulation {
    config: RaceConfig,
    track: TrackModel,
    vehicles: VehicleManager,
    power_ups: PowerUpSystem,
    race: RaceState,
    rng: StdRng,
    previous_input: InputSnapshot,
}

impl Simulation {
    pub fn new(settings: &RaceSettings) -> Result<Self, SetupError> {
        let config = settings.validate()?;
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let track = match &config.track_file {
            Some(path) => TrackModel::load_from_file(path)?,
            None => TrackModel::generate(&config.track, &mut rng)?,
        };

        // everyone lines up at or past the finish line so progress starts at zero;
        // the player takes the back of the grid
        let mut vehicles = VehicleManager::new();
        vehicles.spawn_player(
            &config.player_name,
            config.player_max_speed,
            config.player_acceleration,
            0.0,
            0.0,
        );
        for (i, name) in OPPONENT_NAMES.iter().take(config.opponents).enumerate() {
            let max_speed = AI_BASE_SPEED + rng.random::<f32>() * AI_SPEED_SPREAD;
            let personality = rng.random::<f32>();
            vehicles.spawn_ai(
                name,
                personality,
                config.difficulty,
                max_speed,
                AI_ACCELERATION,
                (i + 1) as f32 * GRID_LONGITUDINAL_SPACING,
                (i as f32 - 1.5) * GRID_LATERAL_SPACING,
            );
        }

        let mut power_ups = PowerUpSystem::new(config.power_ups.clone())?;
        power_ups.place(&track, &mut rng);

        let race = RaceState::new(config.total_laps, vehicles.len(), config.countdown);
        info!(
            "Race set up on '{}': {} laps, {} karts, {:?} AI",
            track.name(),
            config.total_laps,
            vehicles.len(),
            config.difficulty
        );

        Ok(Self {
            config,
            track,
            vehicles,
            power_ups,
            race,
            rng,
            previous_input: InputSnapshot::default(),
        })
    }

    pub fn config(&self) -> &RaceConfig {
        &self.config
    }

    pub fn track(&self) -> &TrackModel {
        &self.track
    }

    pub fn vehicles(&self) -> &VehicleManager {
        &self.vehicles
    }

    pub fn power_ups(&self) -> &PowerUpSystem {
        &self.power_ups
    }

    pub fn race(&self) -> &RaceState {
        &self.race
    }

    pub fn standings(&self) -> Vec<Standing> {
        self.vehicles.standings(self.track.track_distance())
    }

    /// Leaves the menu and starts the countdown.
    pub fn start(&mut self) -> Result<RacePhase, TransitionError> {
        self.race.handle(RaceEvent::Start)
    }

    /// New race on the same track: karts back on the grid, pickups restored.
    pub fn reset(&mut self, target: ResetTarget) {
        self.vehicles.reset_all();
        self.power_ups.reset();
        self.race.reset(target);
    }

    /// Advances one frame. `dt` is clamped so a stalled frame cannot blow up the integration.
    pub fn tick(&mut self, dt: f32, input: &InputSnapshot) -> TickSummary {
        let dt = if dt.is_finite() { dt.clamp(0.0, MAX_FRAME_DELTA) } else { 0.0 };
        let pause_pressed = input.pause && !self.previous_input.pause;
        let reset_pressed = input.reset && !self.previous_input.reset;
        self.previous_input = *input;

        let mut summary = TickSummary::default();
        if reset_pressed {
            self.reset(ResetTarget::Countdown);
            summary.phase = self.race.phase();
            return summary;
        }
        if pause_pressed {
            let event = match self.race.phase() {
                RacePhase::Paused => Some(RaceEvent::Resume),
                RacePhase::Racing => Some(RaceEvent::Pause),
                _ => None,
            };
            if let Some(event) = event {
                let _ = self.race.handle(event);
            }
        }

        self.race.update(dt);
        summary.phase = self.race.phase();
        if !self.race.is_racing() {
            return summary;
        }

        let rules = LapRules {
            total_laps: self.race.total_laps(),
            race_time: self.race.elapsed(),
        };
        let distance = self.track.track_distance();
        let player_progress = self.vehicles.player().map_or(0.0, |p| p.progress(distance));
        let physics_input = input.physics();

        let mut firing = Vec::new();
        let mut finished = Vec::new();
        for vehicle in self.vehicles.iter_mut() {
            let report = if vehicle.is_player() {
                if input.boost && vehicle.item.is_some() {
                    firing.push(vehicle.id);
                }
                apply_physics(vehicle, &physics_input, &self.track, dt, &rules)
            } else {
                let Some(intent) = plan_ai(vehicle, &self.track, player_progress, &mut self.rng) else {
                    continue;
                };
                if wants_item(vehicle, &mut self.rng) {
                    firing.push(vehicle.id);
                }
                apply_ai_physics(vehicle, &intent, &self.track, dt, &rules)
            };
            if report.lap.finished {
                finished.push(vehicle.id);
            }
        }

        summary.contacts = resolve_collisions(self.vehicles.as_mut_slice(), &self.track, &mut self.rng);
        if summary.contacts > 0 {
            debug!("{} kart contacts this frame", summary.contacts);
        }

        for id in firing {
            PowerUpSystem::activate(self.vehicles.as_mut_slice(), id, &self.track, &mut self.rng);
        }
        summary.pickups = self.power_ups.update_pickups(self.vehicles.as_mut_slice(), &self.track, dt);
        PowerUpSystem::update_status(self.vehicles.as_mut_slice(), dt);

        summary.finishes = finished.len();
        for id in finished {
            self.record_finish(id);
        }
        summary.phase = self.race.phase();
        summary
    }

    fn record_finish(&mut self, id: VehicleId) {
        let Some(vehicle) = self.vehicles.get(id) else {
            return;
        };
        if let Some(time) = vehicle.finish_time {
            self.race.record_finish(id, &vehicle.name, time);
        }
    }
}
