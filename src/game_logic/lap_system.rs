use bevy::log::info;

use crate::game_logic::{TrackModel, Vehicle};

/// What a single integration step did to a kart's race progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LapProgress {
    pub passed_checkpoint: bool,
    pub completed_laps: u32,
    pub finished: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LapRules {
    pub total_laps: u32,
    /// Race clock used to stamp a finish.
    pub race_time: f32,
}

/// Walks every segment entered between `from` and the kart's new (unwrapped)
/// position. A finish-line crossing counts only while the checkpoint flag is set,
/// so a kart can never earn a lap without going around.
pub fn update_laps(vehicle: &mut Vehicle, track: &TrackModel, from: f32, rules: &LapRules) -> LapProgress {
    let mut progress = LapProgress::default();
    if vehicle.is_finished() {
        return progress;
    }

    for segment in track.segments_entered(from, vehicle.position) {
        if segment.is_finish_line && vehicle.checkpoint {
            vehicle.lap += 1;
            vehicle.checkpoint = false;
            progress.completed_laps += 1;
            info!("{} completed lap {}", vehicle.name, vehicle.lap);

            if vehicle.lap >= rules.total_laps && !vehicle.is_finished() {
                vehicle.finish_time = Some(rules.race_time);
                progress.finished = true;
                info!("{} finished all laps in {:.2}s", vehicle.name, rules.race_time);
                break;
            }
        }

        if segment.is_checkpoint && !vehicle.checkpoint {
            vehicle.checkpoint = true;
            progress.passed_checkpoint = true;
        }
    }

    progress
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
        vehicles.spawn_player("You", 600.0, 1500.0, 0.0, 0.0);
        vehicles.spawn_ai("Peggy Sue", 0.5, CpuDifficulty::Medium, 550.0, 1200.0, 0.0, 0.0);
        (track, vehicles)
    }

    fn drive(vehicle: &mut Vehicle, track: &TrackModel, to: f32, rules: &LapRules) -> LapProgress {
        let from = vehicle.position;
        vehicle.position = to;
        let progress = update_laps(vehicle, track, from, rules);
        vehicle.position = track.wrap_position(vehicle.position);
        progress
    }

    const RULES: LapRules = LapRules { total_laps: 3, race_time: 12.5 };

    #[test]
    fn test_checkpoint_then_finish_counts_a_lap() {
        let (track, mut vehicles) = setup();
        let distance = track.track_distance();
        let v = vehicles.get_mut(VehicleId(0)).unwrap();

        let halfway = drive(v, &track, distance / 2.0 + 10.0, &RULES);
        assert!(halfway.passed_checkpoint);
        assert!(v.checkpoint);

        let lap = drive(v, &track, distance + 10.0, &RULES);
        assert_eq!(lap.completed_laps, 1);
        assert_eq!(v.lap, 1);
        assert!(!v.checkpoint);
    }

    #[test]
    fn test_finish_without_checkpoint_is_ignored() {
        let (track, mut vehicles) = setup();
        let distance = track.track_distance();
        let v = vehicles.get_mut(VehicleId(0)).unwrap();

        // start just behind the line and cross it twice without reaching halfway
        v.position = distance - 50.0;
        drive(v, &track, distance + 50.0, &RULES);
        v.position = distance - 50.0;
        drive(v, &track, distance + 50.0, &RULES);
        assert_eq!(v.lap, 0);
    }

    #[test]
    fn test_lap_credit_is_idempotent() {
        let (track, mut vehicles) = setup();
        let distance = track.track_distance();
        let v = vehicles.get_mut(VehicleId(0)).unwrap();

        drive(v, &track, distance / 2.0 + 10.0, &RULES);
        drive(v, &track, distance + 10.0, &RULES);
        // back behind the line, cross again with no checkpoint in between
        v.position = distance - 10.0;
        let again = drive(v, &track, distance + 10.0, &RULES);
        assert_eq!(again.completed_laps, 0);
        assert_eq!(v.lap, 1);
    }

    #[test]
    fn test_final_lap_stamps_finish_once() {
        let (track, mut vehicles) = setup();
        let distance = track.track_distance();
        let v = vehicles.get_mut(VehicleId(1)).unwrap();
        let rules = LapRules { total_laps: 1, race_time: 42.0 };

        drive(v, &track, distance / 2.0 + 10.0, &rules);
        let done = drive(v, &track, distance + 10.0, &rules);
        assert!(done.finished);
        assert_eq!(v.finish_time, Some(42.0));

        // a finished kart is no longer tracked
        let later = LapRules { total_laps: 1, race_time: 99.0 };
        drive(v, &track, distance / 2.0 + 10.0, &later);
        let after = drive(v, &track, distance + 10.0, &later);
        assert_eq!(after, LapProgress::default());
        assert_eq!(v.finish_time, Some(42.0));
        assert_eq!(v.lap, 1);
    }
}
