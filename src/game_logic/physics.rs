use bevy::prelude::Resource;

use crate::game_logic::{
    AI_BOOST_TO_SPEED, AI_LANE_LIMIT, AI_LATERAL_FRICTION, AI_STEER_BLEND, AI_STEER_DISPLAY, AiIntent, BOOST_ACCEL,
    BOOST_CAP, BOOST_DECAY, BOOST_SPEED_CAP, BOOST_TO_SPEED, BRAKE_FACTOR, COAST_FACTOR, Controller, DRIFT_ANGLE_DECAY,
    DRIFT_DAMPING, DRIFT_DAMPING_THRESHOLD, DRIFT_GAIN, DRIFT_GRIP, DRIFT_LATERAL_FACTOR, DRIFT_POWER_CAP,
    DRIFT_POWER_DECAY, DRIFT_POWER_RATE, DRIFT_RELEASE_RATIO, DRIFT_RELEASE_THRESHOLD, DRIFT_SLIDE, DRIFT_SPEED_RATIO,
    DRIFT_STEER_THRESHOLD, DriftState, GRIP, LapProgress, LapRules, MAX_FRAME_DELTA, MIN_STEER_SPEED, ROAD_HALF_WIDTH,
    STEER_CAP, STEER_RATE, STEER_RETURN, TURN_SPEED, TrackModel, Vehicle, WALL_RESTITUTION, WALL_SPEED_PENALTY,
    update_laps,
};

/// Abstract controls for one frame, filled in by whatever maps devices to actions.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSnapshot {
    pub accelerate: bool,
    pub brake: bool,
    pub steer_left: bool,
    pub steer_right: bool,
    pub drift: bool,
    /// Fires the held item.
    pub boost: bool,
    pub pause: bool,
    pub reset: bool,
    /// Analog steering; overrides the digital left/right when present.
    pub steer_axis: Option<f32>,
}

impl InputSnapshot {
    /// Steering in `[-1, 1]`, positive to the right.
    pub fn steer(&self) -> f32 {
        if let Some(axis) = self.steer_axis.filter(|a| a.is_finite()) {
            return axis.clamp(-1.0, 1.0);
        }
        match (self.steer_left, self.steer_right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }

    pub fn physics(&self) -> PhysicsInput {
        PhysicsInput {
            accelerate: self.accelerate,
            brake: self.brake,
            steer: self.steer(),
            drift: self.drift,
        }
    }
}

/// Input state for physics simulation
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PhysicsInput {
    pub accelerate: bool,
    pub brake: bool,
    pub steer: f32,
    pub drift: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepReport {
    pub lap: LapProgress,
    /// Boost granted by releasing a drift this frame.
    pub drift_boost: Option<f32>,
    pub hit_wall: bool,
}

fn sanitize_dt(dt: f32) -> f32 {
    if dt.is_finite() { dt.clamp(0.0, MAX_FRAME_DELTA) } else { 0.0 }
}

fn finite_or_zero(value: f32) -> f32 {
    if value.is_finite() { value } else { 0.0 }
}

/// Integrates one frame for a player-controlled kart.
///
/// Order matters here: boost decays before the drift state machine runs so a
/// drift release lands exactly `drift_power * DRIFT_RELEASE_RATIO` in the boost
/// tank for this frame.
pub fn apply_physics(
    vehicle: &mut Vehicle,
    input: &PhysicsInput,
    track: &TrackModel,
    dt: f32,
    rules: &LapRules,
) -> StepReport {
    let mut report = StepReport::default();
    if vehicle.is_finished() {
        vehicle.speed = 0.0;
        return report;
    }
    let dt = sanitize_dt(dt);

    vehicle.boost_power = (vehicle.boost_power - BOOST_DECAY * dt).clamp(0.0, BOOST_CAP);

    // longitudinal
    let accel = vehicle.acceleration * dt;
    if input.brake {
        vehicle.speed -= BRAKE_FACTOR * accel;
    } else if input.accelerate {
        vehicle.speed += accel + vehicle.boost_power * BOOST_ACCEL * dt;
    } else {
        vehicle.speed -= COAST_FACTOR * accel;
    }
    let top_speed = vehicle.max_speed + vehicle.boost_power * BOOST_SPEED_CAP;
    vehicle.speed = finite_or_zero(vehicle.speed).clamp(0.0, top_speed.max(0.0));

    // steering
    let turn_speed = if vehicle.max_speed > 0.0 {
        TURN_SPEED * vehicle.speed / vehicle.max_speed
    } else {
        0.0
    };
    let steer = finite_or_zero(input.steer).clamp(-1.0, 1.0);
    if steer != 0.0 && vehicle.speed > MIN_STEER_SPEED {
        vehicle.steering = (vehicle.steering + steer * STEER_RATE).clamp(-STEER_CAP, STEER_CAP);
        vehicle.lateral_velocity += steer * turn_speed;
    } else {
        vehicle.steering *= STEER_RETURN;
    }

    // drift state machine
    let was_drifting = vehicle.is_drifting();
    let drifting = input.drift
        && vehicle.speed > DRIFT_SPEED_RATIO * vehicle.max_speed
        && vehicle.steering.abs() > DRIFT_STEER_THRESHOLD;
    vehicle.drift = if drifting { DriftState::Drifting } else { DriftState::NotDrifting };

    if drifting {
        vehicle.drift_angle = vehicle.steering * DRIFT_GAIN;
        vehicle.drift_power = (vehicle.drift_power + DRIFT_POWER_RATE * dt).min(DRIFT_POWER_CAP);
        vehicle.lateral_velocity += vehicle.drift_angle * turn_speed * DRIFT_LATERAL_FACTOR;
        // opposite lock
        if vehicle.lateral_velocity.abs() > DRIFT_DAMPING_THRESHOLD {
            vehicle.lateral_velocity *= DRIFT_DAMPING;
        }
    } else {
        if was_drifting && vehicle.drift_power > DRIFT_RELEASE_THRESHOLD {
            let boost = (vehicle.drift_power * DRIFT_RELEASE_RATIO).min(BOOST_CAP);
            vehicle.boost_power = boost;
            report.drift_boost = Some(boost);
        }
        vehicle.drift_angle *= DRIFT_ANGLE_DECAY;
        vehicle.drift_power = (vehicle.drift_power - DRIFT_POWER_DECAY * dt).max(0.0);
    }
    vehicle.drift_power = vehicle.drift_power.clamp(0.0, DRIFT_POWER_CAP);

    // lateral grip
    vehicle.lateral_velocity = finite_or_zero(vehicle.lateral_velocity);
    if drifting {
        vehicle.x += vehicle.lateral_velocity * DRIFT_SLIDE;
        vehicle.lateral_velocity *= DRIFT_GRIP;
    } else {
        vehicle.x += vehicle.lateral_velocity;
        vehicle.lateral_velocity *= GRIP;
    }

    let from = vehicle.position;
    vehicle.position += (vehicle.speed + vehicle.boost_power * BOOST_TO_SPEED) * dt;

    // walls bounce rather than stop
    vehicle.x = finite_or_zero(vehicle.x);
    if vehicle.x.abs() > ROAD_HALF_WIDTH {
        vehicle.x = vehicle.x.clamp(-ROAD_HALF_WIDTH, ROAD_HALF_WIDTH);
        vehicle.lateral_velocity *= -WALL_RESTITUTION;
        vehicle.speed *= WALL_SPEED_PENALTY;
        report.hit_wall = true;
    }

    report.lap = finish_step(vehicle, track, from, rules);
    report
}

/// Integrates one frame for an AI kart given its controller intent.
pub fn apply_ai_physics(
    vehicle: &mut Vehicle,
    intent: &AiIntent,
    track: &TrackModel,
    dt: f32,
    rules: &LapRules,
) -> StepReport {
    let mut report = StepReport::default();
    if vehicle.is_finished() {
        vehicle.speed = 0.0;
        return report;
    }
    let dt = sanitize_dt(dt);

    let Some(mut profile) = vehicle.ai_profile().copied() else {
        return report;
    };

    let rubber = intent.rubber_band;
    let cap = vehicle.max_speed * profile.difficulty.speed_factor() * rubber;
    vehicle.speed = finite_or_zero(vehicle.speed + vehicle.acceleration * rubber * dt).clamp(0.0, cap.max(0.0));

    profile.target_x = intent.target_x;
    let offset = intent.target_x - vehicle.x;
    vehicle.steering = offset.signum() * AI_STEER_DISPLAY;
    if offset == 0.0 {
        vehicle.steering = 0.0;
    }
    vehicle.x += offset * AI_STEER_BLEND * profile.difficulty.handling_factor() + vehicle.lateral_velocity * dt;
    vehicle.lateral_velocity = finite_or_zero(vehicle.lateral_velocity * AI_LATERAL_FRICTION);
    vehicle.x = finite_or_zero(vehicle.x).clamp(-AI_LANE_LIMIT, AI_LANE_LIMIT);
    if let Controller::Ai(stored) = &mut vehicle.controller {
        *stored = profile;
    }

    if let Some(boost) = intent.boost {
        vehicle.boost_power = boost;
    }
    vehicle.boost_power = (vehicle.boost_power - BOOST_DECAY * dt).clamp(0.0, BOOST_CAP);

    let from = vehicle.position;
    vehicle.position += (vehicle.speed + vehicle.boost_power * AI_BOOST_TO_SPEED) * dt;

    report.lap = finish_step(vehicle, track, from, rules);
    report
}

fn finish_step(vehicle: &mut Vehicle, track: &TrackModel, from: f32, rules: &LapRules) -> LapProgress {
    if !vehicle.position.is_finite() {
        vehicle.position = 0.0;
    }
    let lap = update_laps(vehicle, track, from, rules);
    if lap.finished {
        vehicle.speed = 0.0;
    }
    vehicle.position = track.wrap_position(vehicle.position);
    lap
}
