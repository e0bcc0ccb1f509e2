use crate::game_logic::{ActiveEffect, CpuDifficulty, PowerUpKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VehicleId(pub usize);

/// Opaque sprite/sound reference owned by the host. The simulation only stores it
/// and forwards it in draw intents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VisualHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AiProfile {
    /// Fixed per-kart scalar in `[0, 1)` that widens the weave around the racing line.
    pub personality: f32,
    pub difficulty: CpuDifficulty,
    /// Lateral offset the kart is currently steering toward.
    pub target_x: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Controller {
    Player,
    Ai(AiProfile),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DriftState {
    #[default]
    NotDrifting,
    Drifting,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct GridSlot {
    position: f32,
    x: f32,
}

/// One kart. Player and AI karts share this record; only `controller` differs.
#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    pub id: VehicleId,
    pub name: String,
    pub controller: Controller,
    pub visual: Option<VisualHandle>,

    // kinematics
    pub position: f32,
    pub x: f32,
    pub steering: f32,
    pub drift: DriftState,
    pub drift_angle: f32,
    pub speed: f32,
    pub lateral_velocity: f32,
    pub boost_power: f32,
    pub drift_power: f32,
    pub max_speed: f32,
    pub base_max_speed: f32,
    pub acceleration: f32,

    // race progress
    pub lap: u32,
    pub checkpoint: bool,
    pub finish_time: Option<f32>,

    // items and status
    pub item: Option<PowerUpKind>,
    pub active_effect: Option<ActiveEffect>,
    pub shielded: bool,
    pub slipping: bool,
    pub collision_timer: f32,

    grid: GridSlot,
}

impl Vehicle {
    fn new(id: VehicleId, name: String, controller: Controller, max_speed: f32, acceleration: f32, grid: GridSlot) -> Self {
        Self {
            id,
            name,
            controller,
            visual: None,
            position: grid.position,
            x: grid.x,
            steering: 0.0,
            drift: DriftState::NotDrifting,
            drift_angle: 0.0,
            speed: 0.0,
            lateral_velocity: 0.0,
            boost_power: 0.0,
            drift_power: 0.0,
            max_speed,
            base_max_speed: max_speed,
            acceleration,
            lap: 0,
            checkpoint: false,
            finish_time: None,
            item: None,
            active_effect: None,
            shielded: false,
            slipping: false,
            collision_timer: 0.0,
            grid,
        }
    }

    pub fn is_player(&self) -> bool {
        matches!(self.controller, Controller::Player)
    }

    pub fn ai_profile(&self) -> Option<&AiProfile> {
        match &self.controller {
            Controller::Ai(profile) => Some(profile),
            Controller::Player => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finish_time.is_some()
    }

    pub fn is_drifting(&self) -> bool {
        self.drift == DriftState::Drifting
    }

    /// Ranking key: completed laps plus distance into the current lap.
    pub fn progress(&self, track_distance: f32) -> f32 {
        self.lap as f32 * track_distance + self.position
    }

    /// Puts the kart back on its grid slot with every race field zeroed.
    pub fn reset(&mut self) {
        let fresh = Vehicle::new(
            self.id,
            std::mem::take(&mut self.name),
            self.controller,
            self.base_max_speed,
            self.acceleration,
            self.grid,
        );
        let visual = self.visual;
        *self = Vehicle { visual, ..fresh };
        if let Controller::Ai(profile) = &mut self.controller {
            profile.target_x = 0.0;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Standing {
    pub place: usize,
    pub id: VehicleId,
    pub name: String,
    pub lap: u32,
    pub progress: f32,
    pub finish_time: Option<f32>,
}

/// Owns every kart in the race. Ids are indices into the collection.
#[derive(Debug, Clone, Default)]
pub struct VehicleManager {
    vehicles: Vec<Vehicle>,
}

impl VehicleManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn_player(&mut self, name: &str, max_speed: f32, acceleration: f32, position: f32, x: f32) -> VehicleId {
        self.spawn(name, Controller::Player, max_speed, acceleration, position, x)
    }

    pub fn spawn_ai(
        &mut self,
        name: &str,
        personality: f32,
        difficulty: CpuDifficulty,
        max_speed: f32,
        acceleration: f32,
        position: f32,
        x: f32,
    ) -> VehicleId {
        let profile = AiProfile {
            personality,
            difficulty,
            target_x: 0.0,
        };
        self.spawn(name, Controller::Ai(profile), max_speed, acceleration, position, x)
    }

    fn spawn(&mut self, name: &str, controller: Controller, max_speed: f32, acceleration: f32, position: f32, x: f32) -> VehicleId {
        let id = VehicleId(self.vehicles.len());
        let grid = GridSlot { position, x };
        self.vehicles
            .push(Vehicle::new(id, name.to_string(), controller, max_speed, acceleration, grid));
        id
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    pub fn get(&self, id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.get(id.0)
    }

    pub fn get_mut(&mut self, id: VehicleId) -> Option<&mut Vehicle> {
        self.vehicles.get_mut(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vehicle> {
        self.vehicles.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Vehicle> {
        self.vehicles.iter_mut()
    }

    pub fn as_slice(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn as_mut_slice(&mut self) -> &mut [Vehicle] {
        &mut self.vehicles
    }

    pub fn player(&self) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.is_player())
    }

    pub fn player_mut(&mut self) -> Option<&mut Vehicle> {
        self.vehicles.iter_mut().find(|v| v.is_player())
    }

    pub fn all_finished(&self) -> bool {
        !self.vehicles.is_empty() && self.vehicles.iter().all(Vehicle::is_finished)
    }

    pub fn reset_all(&mut self) {
        for vehicle in &mut self.vehicles {
            vehicle.reset();
        }
    }

    /// Race order: finishers by finish time, then everyone else by progress.
    pub fn standings(&self, track_distance: f32) -> Vec<Standing> {
        let mut order: Vec<&Vehicle> = self.vehicles.iter().collect();
        order.sort_by(|a, b| match (a.finish_time, b.finish_time) {
            (Some(ta), Some(tb)) => ta.total_cmp(&tb),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => b.progress(track_distance).total_cmp(&a.progress(track_distance)),
        });

        order
            .into_iter()
            .enumerate()
            .map(|(i, v)| Standing {
                place: i + 1,
                id: v.id,
                name: v.name.clone(),
                lap: v.lap,
                progress: v.progress(track_distance),
                finish_time: v.finish_time,
            })
            .collect()
    }
}
