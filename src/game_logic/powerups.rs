use std::str::FromStr;

use bevy::log::info;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::game_logic::{
    BLAST_JITTER, BLAST_RADIUS, BLAST_SLOWDOWN, BOOST_CAP, DRAFT_DURATION, DRAFT_MULTIPLIER, LIGHTNING_BOOST,
    PICKUP_DISTANCE, PICKUP_WIDTH, POWERUP_COUNT, POWERUP_PHASE, POWERUP_RESPAWN, POWERUP_SPACING, POWERUP_SPREAD,
    SHIELD_DURATION, SLICK_JITTER, SLICK_RANGE, SLIP_RECOVERY, SLIP_SETTLED, SetupError, TrackModel, Vehicle,
    VehicleId,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PowerUpKind {
    ChromeLightning,
    BlueSuedeShield,
    DuckTailDraft,
    PomadeSlick,
    JukeboxBlast,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 5] = [
        PowerUpKind::ChromeLightning,
        PowerUpKind::BlueSuedeShield,
        PowerUpKind::DuckTailDraft,
        PowerUpKind::PomadeSlick,
        PowerUpKind::JukeboxBlast,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerUpKind::ChromeLightning => "chromeLightning",
            PowerUpKind::BlueSuedeShield => "blueSuedeShield",
            PowerUpKind::DuckTailDraft => "duckTailDraft",
            PowerUpKind::PomadeSlick => "pomadeSlick",
            PowerUpKind::JukeboxBlast => "jukeboxBlast",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PowerUpKind::ChromeLightning => "Chrome Lightning",
            PowerUpKind::BlueSuedeShield => "Blue Suede Shield",
            PowerUpKind::DuckTailDraft => "Duck Tail Draft",
            PowerUpKind::PomadeSlick => "Pomade Slick",
            PowerUpKind::JukeboxBlast => "Jukebox Blast",
        }
    }
}

impl FromStr for PowerUpKind {
    type Err = SetupError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        PowerUpKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| SetupError::UnknownPowerUp(name.to_string()))
    }
}

/// A timed status that has to be undone when it runs out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActiveEffect {
    Shield { remaining: f32 },
    /// `restore_max_speed` is the top speed from before activation, put back verbatim on expiry.
    Draft { remaining: f32, restore_max_speed: f32 },
}

impl ActiveEffect {
    pub fn remaining(&self) -> f32 {
        match self {
            ActiveEffect::Shield { remaining } | ActiveEffect::Draft { remaining, .. } => *remaining,
        }
    }

    fn tick(&mut self, dt: f32) {
        match self {
            ActiveEffect::Shield { remaining } | ActiveEffect::Draft { remaining, .. } => *remaining -= dt,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    pub segment: usize,
    pub x: f32,
    pub collected: bool,
    pub respawn_timer: f32,
}

impl PowerUp {
    pub fn position(&self, track: &TrackModel) -> f32 {
        self.segment as f32 * track.segment_length()
    }
}

/// Result of trying to fire the held item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Activation {
    NoItem,
    /// A durable effect is still running; the item stays in the slot.
    Blocked(PowerUpKind),
    Applied { kind: PowerUpKind, affected: usize },
}

#[derive(Debug, Clone, Default)]
pub struct PowerUpSystem {
    catalog: Vec<PowerUpKind>,
    pickups: Vec<PowerUp>,
}

impl PowerUpSystem {
    pub fn new(catalog: Vec<PowerUpKind>) -> Result<Self, SetupError> {
        if catalog.is_empty() {
            return Err(SetupError::InvalidSetting {
                field: "power_ups",
                reason: "at least one power-up kind must be enabled".to_string(),
            });
        }
        Ok(Self {
            catalog,
            pickups: Vec::new(),
        })
    }

    pub fn catalog(&self) -> &[PowerUpKind] {
        &self.catalog
    }

    pub fn pickups(&self) -> &[PowerUp] {
        &self.pickups
    }

    /// Lays out the pickups at regular segment intervals with random lanes and kinds.
    pub fn place(&mut self, track: &TrackModel, rng: &mut impl Rng) {
        self.pickups = (0..POWERUP_COUNT)
            .map(|i| PowerUp {
                kind: self.catalog[rng.random_range(0..self.catalog.len())],
                segment: (i * POWERUP_SPACING + POWERUP_PHASE) % track.len(),
                x: (rng.random::<f32>() - 0.5) * POWERUP_SPREAD,
                collected: false,
                respawn_timer: 0.0,
            })
            .collect();
    }

    /// Puts every pickup back on the road. Layout and kinds are kept.
    pub fn reset(&mut self) {
        for pickup in &mut self.pickups {
            pickup.collected = false;
            pickup.respawn_timer = 0.0;
        }
    }

    /// Ticks respawn timers, then lets karts drive through the live pickups.
    /// A kart whose slot is full still knocks the pickup out but keeps its item.
    pub fn update_pickups(&mut self, vehicles: &mut [Vehicle], track: &TrackModel, dt: f32) -> usize {
        let mut granted = 0;
        for pickup in &mut self.pickups {
            if pickup.collected {
                pickup.respawn_timer -= dt;
                if pickup.respawn_timer <= 0.0 {
                    pickup.collected = false;
                    pickup.respawn_timer = 0.0;
                }
                continue;
            }

            let position = pickup.position(track);
            let Some(kart) = vehicles.iter_mut().find(|v| {
                !v.is_finished()
                    && track.longitudinal_gap(v.position, position) < PICKUP_DISTANCE
                    && (v.x - pickup.x).abs() < PICKUP_WIDTH
            }) else {
                continue;
            };

            pickup.collected = true;
            pickup.respawn_timer = POWERUP_RESPAWN;
            if kart.item.is_none() {
                kart.item = Some(pickup.kind);
                granted += 1;
                info!("{} picked up {}", kart.name, pickup.kind.display_name());
            }
        }
        granted
    }

    /// Fires the item held by `user`. Area effects hit every other kart still racing
    /// inside the range at this instant.
    pub fn activate(vehicles: &mut [Vehicle], user: VehicleId, track: &TrackModel, rng: &mut impl Rng) -> Activation {
        let Some(kart) = vehicles.get_mut(user.0) else {
            return Activation::NoItem;
        };
        let Some(kind) = kart.item else {
            return Activation::NoItem;
        };
        if kart.active_effect.is_some() {
            return Activation::Blocked(kind);
        }
        kart.item = None;
        let origin = kart.position;
        info!("{} fired {}", kart.name, kind.display_name());

        let affected = match kind {
            PowerUpKind::ChromeLightning => {
                kart.boost_power = LIGHTNING_BOOST.min(BOOST_CAP);
                1
            }
            PowerUpKind::BlueSuedeShield => {
                kart.shielded = true;
                kart.active_effect = Some(ActiveEffect::Shield {
                    remaining: SHIELD_DURATION,
                });
                1
            }
            PowerUpKind::DuckTailDraft => {
                kart.active_effect = Some(ActiveEffect::Draft {
                    remaining: DRAFT_DURATION,
                    restore_max_speed: kart.max_speed,
                });
                kart.max_speed *= DRAFT_MULTIPLIER;
                1
            }
            PowerUpKind::PomadeSlick => area_effect(vehicles, user, origin, SLICK_RANGE, track, |victim| {
                victim.slipping = true;
                victim.lateral_velocity += (rng.random::<f32>() - 0.5) * SLICK_JITTER;
            }),
            PowerUpKind::JukeboxBlast => area_effect(vehicles, user, origin, BLAST_RADIUS, track, |victim| {
                victim.speed *= BLAST_SLOWDOWN;
                victim.lateral_velocity += (rng.random::<f32>() - 0.5) * BLAST_JITTER;
            }),
        };

        Activation::Applied { kind, affected }
    }

    /// Expires durable effects with their exact inverse, settles slipping karts
    /// and runs down the collision feedback timers.
    pub fn update_status(vehicles: &mut [Vehicle], dt: f32) {
        for kart in vehicles.iter_mut() {
            if let Some(mut effect) = kart.active_effect {
                effect.tick(dt);
                if effect.remaining() <= 0.0 {
                    match effect {
                        ActiveEffect::Shield { .. } => kart.shielded = false,
                        ActiveEffect::Draft {
                            restore_max_speed, ..
                        } => kart.max_speed = restore_max_speed,
                    }
                    kart.active_effect = None;
                } else {
                    kart.active_effect = Some(effect);
                }
            }

            if kart.slipping {
                kart.lateral_velocity *= SLIP_RECOVERY;
                if kart.lateral_velocity.abs() < SLIP_SETTLED {
                    kart.slipping = false;
                }
            }

            kart.collision_timer = (kart.collision_timer - dt).max(0.0);
        }
    }
}

fn area_effect(
    vehicles: &mut [Vehicle],
    user: VehicleId,
    origin: f32,
    range: f32,
    track: &TrackModel,
    mut hit: impl FnMut(&mut Vehicle),
) -> usize {
    let mut affected = 0;
    for victim in vehicles.iter_mut() {
        if victim.id == user || victim.is_finished() {
            continue;
        }
        if track.longitudinal_gap(victim.position, origin) < range {
            hit(victim);
            affected += 1;
        }
    }
    affected
}
