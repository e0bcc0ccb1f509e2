use rand::Rng;

use crate::game_logic::{
    AI_BOOST_CHANCE, AI_BOOST_POWER, AI_ITEM_CHANCE, AI_LINE_CURRENT, AI_LINE_LOOKAHEAD, AI_LOOKAHEAD,
    AI_STRAIGHT_CURVE, AI_WEAVE_AMPLITUDE, AI_WEAVE_FREQUENCY, RUBBER_BAND_CATCH_UP, RUBBER_BAND_GAP,
    RUBBER_BAND_HOLD_BACK, TrackModel, Vehicle,
};

/// What the AI controller wants a kart to do this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AiIntent {
    pub target_x: f32,
    /// Speed multiplier from rubber-banding, always within the hold-back/catch-up bounds.
    pub rubber_band: f32,
    /// Fresh boost to put in the tank, if the kart rolled one.
    pub boost: Option<f32>,
}

/// Speed multiplier for a kart `gap` progress units behind the player
/// (negative when it leads).
pub fn rubber_band(gap: f32) -> f32 {
    let factor = if gap > RUBBER_BAND_GAP {
        RUBBER_BAND_CATCH_UP
    } else if gap < -RUBBER_BAND_GAP {
        RUBBER_BAND_HOLD_BACK
    } else {
        1.0
    };
    factor.clamp(RUBBER_BAND_HOLD_BACK, RUBBER_BAND_CATCH_UP)
}

/// Lateral offset that cuts toward the inside of the current and upcoming corner.
pub fn racing_line(track: &TrackModel, position: f32) -> f32 {
    let current = track.segment_index_at(position) as i64;
    -track.segment(current).curve * AI_LINE_CURRENT - track.segment(current + AI_LOOKAHEAD).curve * AI_LINE_LOOKAHEAD
}

/// Steering target, rubber band and boost roll for one AI kart. Player and finished karts get `None`.
pub fn plan_ai(vehicle: &Vehicle, track: &TrackModel, player_progress: f32, rng: &mut impl Rng) -> Option<AiIntent> {
    if vehicle.is_finished() {
        return None;
    }
    let profile = vehicle.ai_profile()?;

    // deterministic per-kart weave around the line
    let phase = vehicle.id.0 as f32;
    let weave = (vehicle.position * AI_WEAVE_FREQUENCY + phase).sin() * AI_WEAVE_AMPLITUDE * profile.personality;
    let target_x = racing_line(track, vehicle.position) + weave;

    let gap = player_progress - vehicle.progress(track.track_distance());
    let on_straight = track.segment_at(vehicle.position).curve.abs() < AI_STRAIGHT_CURVE;
    let boost = (on_straight && rng.random_bool(AI_BOOST_CHANCE)).then_some(AI_BOOST_POWER);

    Some(AiIntent {
        target_x,
        rubber_band: rubber_band(gap),
        boost,
    })
}

/// AI karts fire a held item at random.
pub fn wants_item(vehicle: &Vehicle, rng: &mut impl Rng) -> bool {
    vehicle.item.is_some() && !vehicle.is_player() && rng.random_bool(AI_ITEM_CHANCE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_logic::{CpuDifficulty, PowerUpKind, TrackConfig, VehicleId, VehicleManager};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn setup() -> (TrackModel, VehicleManager) {
        let track = TrackModel::generate(&TrackConfig::default(), &mut StdRng::seed_from_u64(0)).unwrap();
        let mut vehicles = VehicleManager::new();
        vehicles.spawn_player("You", 600.0, 1500.0, 0.0, 0.0);
        vehicles.spawn_ai("Betty Bombshell", 0.0, CpuDifficulty::Expert, 560.0, 1200.0, 0.0, 0.0);
        (track, vehicles)
    }

    #[test]
    fn test_rubber_band_multipliers() {
        assert_eq!(rubber_band(2_500.0), RUBBER_BAND_CATCH_UP);
        assert_eq!(rubber_band(-2_500.0), RUBBER_BAND_HOLD_BACK);
        assert_eq!(rubber_band(1_999.0), 1.0);
        assert_eq!(rubber_band(0.0), 1.0);
    }

    #[test]
    fn test_trailing_kart_catches_up() {
        let (track, mut vehicles) = setup();
        let mut rng = StdRng::seed_from_u64(3);
        let player_progress = {
            let player = vehicles.player_mut().unwrap();
            player.lap = 1;
            player.progress(track.track_distance())
        };
        let ai = vehicles.get(VehicleId(1)).unwrap();
        let intent = plan_ai(ai, &track, player_progress, &mut rng).unwrap();
        assert_eq!(intent.rubber_band, RUBBER_BAND_CATCH_UP);

        let ahead = plan_ai(ai, &track, -5_000.0, &mut rng).unwrap();
        assert_eq!(ahead.rubber_band, RUBBER_BAND_HOLD_BACK);
    }

    #[test]
    fn test_racing_line_cuts_inside_corner() {
        let (track, _) = setup();
        // segments 61..80 turn right with curve 4
        let position = 70.0 * track.segment_length();
        assert_eq!(racing_line(&track, position), -4.0 * AI_LINE_CURRENT - 4.0 * AI_LINE_LOOKAHEAD);
        assert_eq!(racing_line(&track, 0.0), 0.0);
    }

    #[test]
    fn test_boost_only_rolls_on_straights() {
        let (track, mut vehicles) = setup();
        let mut rng = StdRng::seed_from_u64(11);

        vehicles.get_mut(VehicleId(1)).unwrap().position = 70.0 * track.segment_length();
        let cornering = vehicles.get(VehicleId(1)).unwrap();
        assert!(track.segment_at(cornering.position).curve.abs() >= AI_STRAIGHT_CURVE);
        assert!((0..5_000).all(|_| plan_ai(cornering, &track, 0.0, &mut rng).unwrap().boost.is_none()));

        vehicles.get_mut(VehicleId(1)).unwrap().position = 0.0;
        let straight = vehicles.get(VehicleId(1)).unwrap();
        let boosts: Vec<_> = (0..5_000)
            .filter_map(|_| plan_ai(straight, &track, 0.0, &mut rng).unwrap().boost)
            .collect();
        assert!(!boosts.is_empty());
        assert!(boosts.iter().all(|&b| b == AI_BOOST_POWER));
    }

    #[test]
    fn test_player_gets_no_plan() {
        let (track, vehicles) = setup();
        let player = vehicles.player().unwrap();
        assert!(plan_ai(player, &track, 0.0, &mut StdRng::seed_from_u64(0)).is_none());
    }

    #[test]
    fn test_only_ai_with_items_fire() {
        let (_, mut vehicles) = setup();
        let mut rng = StdRng::seed_from_u64(9);
        let ai = vehicles.get(VehicleId(1)).unwrap();
        assert!((0..2_000).all(|_| !wants_item(ai, &mut rng)));

        vehicles.get_mut(VehicleId(1)).unwrap().item = Some(PowerUpKind::ChromeLightning);
        let ai = vehicles.get(VehicleId(1)).unwrap();
        assert!((0..10_000).any(|_| wants_item(ai, &mut rng)));
    }
}
