use bevy::log::debug;
use rand::Rng;

use crate::game_logic::{
    COLLISION_DISTANCE, COLLISION_FEEDBACK, COLLISION_JITTER, COLLISION_WIDTH, IMPACT_FACTOR, IMPACT_SPEED_GAIN,
    PUSH_FASTER, PUSH_SLOWER, REAR_END_SLOWDOWN, SHIELD_PUSH, SHIELD_SLOWDOWN, TrackModel, Vehicle,
};

/// Checks every unordered pair of karts still racing and resolves the contacts.
/// Returns how many pairs touched this frame.
pub fn resolve_collisions(vehicles: &mut [Vehicle], track: &TrackModel, rng: &mut impl Rng) -> usize {
    let mut contacts = 0;
    for i in 0..vehicles.len() {
        let (head, tail) = vehicles.split_at_mut(i + 1);
        let a = &mut head[i];
        for b in tail.iter_mut() {
            if a.is_finished() || b.is_finished() {
                continue;
            }
            if karts_overlap(a, b, track) {
                handle_collision(a, b, rng);
                contacts += 1;
            }
        }
    }
    contacts
}

pub fn karts_overlap(a: &Vehicle, b: &Vehicle, track: &TrackModel) -> bool {
    track.longitudinal_gap(a.position, b.position) < COLLISION_DISTANCE && (a.x - b.x).abs() < COLLISION_WIDTH
}

// Bumper-car response, tuned by feel. Not momentum conserving.
fn handle_collision(a: &mut Vehicle, b: &mut Vehicle, rng: &mut impl Rng) {
    match (a.shielded, b.shielded) {
        (true, true) => return,
        (true, false) => {
            bounce_off_shield(b, a.x);
            debug!("{} bounced off {}'s shield", b.name, a.name);
            return;
        }
        (false, true) => {
            bounce_off_shield(a, b.x);
            debug!("{} bounced off {}'s shield", a.name, b.name);
            return;
        }
        (false, false) => {}
    }

    // ties count the second kart as the one doing the rear-ending
    let (faster, slower) = if a.speed > b.speed { (&mut *a, &mut *b) } else { (&mut *b, &mut *a) };
    let impact = (faster.speed - slower.speed).abs() * IMPACT_FACTOR;
    let push = faster.x - slower.x;

    faster.speed *= REAR_END_SLOWDOWN;
    slower.speed = (slower.speed + impact * IMPACT_SPEED_GAIN).min(slower.max_speed);
    faster.lateral_velocity -= push * PUSH_FASTER;
    slower.lateral_velocity += push * PUSH_SLOWER;
    debug!("{} rear-ended {} (impact {:.1})", faster.name, slower.name, impact);

    for kart in [&mut *a, &mut *b] {
        kart.lateral_velocity += (rng.random::<f32>() - 0.5) * COLLISION_JITTER;
        kart.collision_timer = COLLISION_FEEDBACK;
    }

    let dx = a.x - b.x;
    let separation = COLLISION_WIDTH - dx.abs();
    if separation > 0.0 {
        let half = if dx > 0.0 { separation / 2.0 } else { -separation / 2.0 };
        a.x += half;
        b.x -= half;
    }
}

fn bounce_off_shield(kart: &mut Vehicle, shield_x: f32) {
    kart.speed *= SHIELD_SLOWDOWN;
    kart.lateral_velocity += (kart.x - shield_x) * SHIELD_PUSH;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_logic::{CpuDifficulty, TrackConfig, VehicleId, VehicleManager};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn setup() -> (TrackModel, VehicleManager) {
        let track = TrackModel::generate(&TrackConfig::default(), &mut StdRng::seed_from_u64(0)).unwrap();
        let mut vehicles = VehicleManager::new();
        vehicles.spawn_player("You", 600.0, 1500.0, 1_000.0, 0.0);
        vehicles.spawn_ai("Johnny Hot Rod", 0.3, CpuDifficulty::Medium, 550.0, 1200.0, 1_000.0, 20.0);
        (track, vehicles)
    }

    #[test]
    fn test_rear_end_scenario() {
        let (track, mut vehicles) = setup();
        vehicles.get_mut(VehicleId(0)).unwrap().speed = 100.0;
        vehicles.get_mut(VehicleId(1)).unwrap().speed = 40.0;

        let contacts = resolve_collisions(vehicles.as_mut_slice(), &track, &mut StdRng::seed_from_u64(1));
        assert_eq!(contacts, 1);

        let faster = vehicles.get(VehicleId(0)).unwrap();
        let slower = vehicles.get(VehicleId(1)).unwrap();
        assert!((faster.speed - 80.0).abs() < 1e-4);
        // impact = 60 * 0.1, gain = impact * 20
        assert!((slower.speed - 160.0).abs() < 1e-4);
        assert_eq!(faster.collision_timer, COLLISION_FEEDBACK);
        assert_eq!(slower.collision_timer, COLLISION_FEEDBACK);
    }

    #[test]
    fn test_speed_gain_capped_at_own_max() {
        let (track, mut vehicles) = setup();
        vehicles.get_mut(VehicleId(0)).unwrap().speed = 600.0;
        {
            let slow = vehicles.get_mut(VehicleId(1)).unwrap();
            slow.speed = 40.0;
            slow.max_speed = 100.0;
        }
        resolve_collisions(vehicles.as_mut_slice(), &track, &mut StdRng::seed_from_u64(1));
        assert_eq!(vehicles.get(VehicleId(1)).unwrap().speed, 100.0);
    }

    #[test]
    fn test_residual_overlap_is_split() {
        let (track, mut vehicles) = setup();
        resolve_collisions(vehicles.as_mut_slice(), &track, &mut StdRng::seed_from_u64(5));
        let a = vehicles.get(VehicleId(0)).unwrap();
        let b = vehicles.get(VehicleId(1)).unwrap();
        assert!(((a.x - b.x).abs() - COLLISION_WIDTH).abs() < 1e-3);
        assert!((a.x + b.x - 20.0).abs() < 1e-3);
    }

    #[test]
    fn test_shielded_kart_is_untouched() {
        let (track, mut vehicles) = setup();
        {
            let shielded = vehicles.get_mut(VehicleId(0)).unwrap();
            shielded.speed = 300.0;
            shielded.shielded = true;
        }
        vehicles.get_mut(VehicleId(1)).unwrap().speed = 400.0;

        resolve_collisions(vehicles.as_mut_slice(), &track, &mut StdRng::seed_from_u64(2));
        let shielded = vehicles.get(VehicleId(0)).unwrap();
        let other = vehicles.get(VehicleId(1)).unwrap();
        assert_eq!(shielded.speed, 300.0);
        assert_eq!(shielded.lateral_velocity, 0.0);
        assert_eq!(other.speed, 200.0);
        assert!((other.lateral_velocity - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_gap_wraps_across_finish_line() {
        let (track, mut vehicles) = setup();
        let distance = track.track_distance();
        vehicles.get_mut(VehicleId(0)).unwrap().position = distance - 50.0;
        vehicles.get_mut(VehicleId(1)).unwrap().position = 50.0;
        assert!(karts_overlap(vehicles.get(VehicleId(0)).unwrap(), vehicles.get(VehicleId(1)).unwrap(), &track));
    }

    #[test]
    fn test_far_apart_and_finished_karts_ignored() {
        let (track, mut vehicles) = setup();
        vehicles.get_mut(VehicleId(1)).unwrap().position = 5_000.0;
        assert_eq!(resolve_collisions(vehicles.as_mut_slice(), &track, &mut StdRng::seed_from_u64(0)), 0);

        vehicles.get_mut(VehicleId(1)).unwrap().position = 1_000.0;
        vehicles.get_mut(VehicleId(1)).unwrap().finish_time = Some(60.0);
        assert_eq!(resolve_collisions(vehicles.as_mut_slice(), &track, &mut StdRng::seed_from_u64(0)), 0);
    }
}
