// Frame timing
pub const FRAME_TIMESTEP: f32 = 1.0 / 60.0;
pub const MAX_FRAME_DELTA: f32 = 0.1; // clamp for stalls (window losing focus etc.)
pub const RACE_TIME_LIMIT: f32 = 600.0; // headless runs give up after this
pub const DEFAULT_COUNTDOWN: f32 = 3.0;

// Track layout
pub const SEGMENT_LENGTH: f32 = 200.0;
pub const TRACK_SEGMENTS: usize = 200;
pub const TRACK_WIDTH: f32 = 2000.0;
pub const TOTAL_LAPS: u32 = 3;
pub const DECORATION_OFFSET: f32 = TRACK_WIDTH * 0.8;

// Viewport / projection
pub const CANVAS_WIDTH: f32 = 1024.0;
pub const CANVAS_HEIGHT: f32 = 576.0;
pub const FOCAL_LENGTH: f32 = 300.0;
pub const DRAW_DISTANCE: usize = 50;
pub const CAMERA_HEIGHT: f32 = 300.0;
pub const CURVE_SHIFT: f32 = 100.0; // lateral shift of a segment per unit of curvature
pub const DECORATION_MIN_SCALE: f32 = 0.4;
pub const DECORATION_MAX_SCALE: f32 = 15.0;
pub const POWERUP_MIN_SCALE: f32 = 0.2;
pub const POWERUP_MAX_SCALE: f32 = 5.0;
pub const POWERUP_SPRITE_SIZE: f32 = 60.0;
pub const POWERUP_HOVER: f32 = 50.0;
pub const KART_MIN_SCALE: f32 = 0.1;
pub const KART_MAX_SCALE: f32 = 10.0;
pub const KART_SPRITE_SIZE: f32 = 80.0;
/// Rival karts this close to the bottom edge sit behind the player's sprite.
pub const KART_BOTTOM_MARGIN: f32 = 50.0;
pub const PLAYER_SCREEN_OFFSET: f32 = 100.0; // player kart sits this far above the bottom edge

// Player kart
pub const PLAYER_MAX_SPEED: f32 = 600.0;
pub const PLAYER_ACCELERATION: f32 = 1500.0; // units/s^2, 25 per frame at 60 Hz
pub const BRAKE_FACTOR: f32 = 4.0;
pub const COAST_FACTOR: f32 = 2.0;

// Steering
pub const STEER_RATE: f32 = 0.08;
pub const STEER_CAP: f32 = 0.5;
pub const STEER_RETURN: f32 = 0.85;
pub const TURN_SPEED: f32 = 4.0;
pub const MIN_STEER_SPEED: f32 = 50.0;

// Drift
pub const DRIFT_SPEED_RATIO: f32 = 0.4;
pub const DRIFT_STEER_THRESHOLD: f32 = 0.1;
pub const DRIFT_GAIN: f32 = 1.5;
pub const DRIFT_POWER_RATE: f32 = 2.0;
pub const DRIFT_POWER_DECAY: f32 = 4.0;
pub const DRIFT_POWER_CAP: f32 = 3.0;
pub const DRIFT_LATERAL_FACTOR: f32 = 0.7;
pub const DRIFT_DAMPING_THRESHOLD: f32 = 5.0;
pub const DRIFT_DAMPING: f32 = 0.95;
pub const DRIFT_ANGLE_DECAY: f32 = 0.9;
pub const DRIFT_RELEASE_THRESHOLD: f32 = 1.0;
pub const DRIFT_RELEASE_RATIO: f32 = 0.5;
pub const DRIFT_SLIDE: f32 = 1.2;

// Grip
pub const GRIP: f32 = 0.85;
pub const DRIFT_GRIP: f32 = 0.92;

// Boost
pub const BOOST_CAP: f32 = 3.0;
pub const BOOST_DECAY: f32 = 2.0;
pub const BOOST_ACCEL: f32 = 300.0; // extra units/s^2 per unit of boost while accelerating
pub const BOOST_SPEED_CAP: f32 = 200.0; // top speed headroom per unit of boost
pub const BOOST_TO_SPEED: f32 = 200.0;

// Walls
pub const WALL_MARGIN: f32 = 100.0;
pub const ROAD_HALF_WIDTH: f32 = TRACK_WIDTH / 2.0 - WALL_MARGIN;
pub const WALL_RESTITUTION: f32 = 0.5;
pub const WALL_SPEED_PENALTY: f32 = 0.8;

// Collisions
pub const COLLISION_DISTANCE: f32 = 200.0;
pub const COLLISION_WIDTH: f32 = 150.0;
pub const REAR_END_SLOWDOWN: f32 = 0.8;
pub const IMPACT_FACTOR: f32 = 0.1;
pub const IMPACT_SPEED_GAIN: f32 = 20.0;
pub const PUSH_FASTER: f32 = 0.1;
pub const PUSH_SLOWER: f32 = 0.2;
pub const SHIELD_SLOWDOWN: f32 = 0.5;
pub const SHIELD_PUSH: f32 = 0.5;
pub const COLLISION_JITTER: f32 = 5.0;
pub const COLLISION_FEEDBACK: f32 = 0.5;

// AI
pub const OPPONENT_NAMES: [&str; 4] = ["Betty Bombshell", "Johnny Hot Rod", "Buddy Bopper", "Peggy Sue"];
pub const AI_BASE_SPEED: f32 = 500.0;
pub const AI_SPEED_SPREAD: f32 = 100.0;
pub const AI_ACCELERATION: f32 = 1200.0; // 20 per frame at 60 Hz
pub const AI_LOOKAHEAD: i64 = 5;
pub const AI_LINE_CURRENT: f32 = 100.0;
pub const AI_LINE_LOOKAHEAD: f32 = 50.0;
pub const AI_WEAVE_FREQUENCY: f32 = 0.01;
pub const AI_WEAVE_AMPLITUDE: f32 = 200.0;
pub const AI_STEER_BLEND: f32 = 0.1;
pub const AI_STEER_DISPLAY: f32 = 0.3;
pub const AI_LATERAL_FRICTION: f32 = 0.9;
pub const AI_LANE_LIMIT: f32 = 800.0;
pub const AI_BOOST_CHANCE: f64 = 0.01;
pub const AI_BOOST_POWER: f32 = 2.0;
pub const AI_BOOST_TO_SPEED: f32 = 100.0;
pub const AI_STRAIGHT_CURVE: f32 = 1.0;
pub const AI_ITEM_CHANCE: f64 = 0.005;
pub const RUBBER_BAND_GAP: f32 = 2000.0;
pub const RUBBER_BAND_CATCH_UP: f32 = 1.3;
pub const RUBBER_BAND_HOLD_BACK: f32 = 0.8;
pub const GRID_LATERAL_SPACING: f32 = 300.0;
pub const GRID_LONGITUDINAL_SPACING: f32 = 100.0;

// Power-ups
pub const POWERUP_COUNT: usize = 20;
pub const POWERUP_SPACING: usize = 10;
pub const POWERUP_PHASE: usize = 5;
pub const POWERUP_SPREAD: f32 = TRACK_WIDTH * 0.6;
pub const PICKUP_DISTANCE: f32 = 100.0;
pub const PICKUP_WIDTH: f32 = 150.0;
pub const POWERUP_RESPAWN: f32 = 10.0;
pub const LIGHTNING_BOOST: f32 = 3.0;
pub const SHIELD_DURATION: f32 = 5.0;
pub const DRAFT_DURATION: f32 = 4.0;
pub const DRAFT_MULTIPLIER: f32 = 1.3;
pub const SLICK_RANGE: f32 = 500.0;
pub const SLICK_JITTER: f32 = 20.0;
pub const BLAST_RADIUS: f32 = 300.0;
pub const BLAST_SLOWDOWN: f32 = 0.5;
pub const BLAST_JITTER: f32 = 30.0;
pub const SLIP_RECOVERY: f32 = 0.9;
pub const SLIP_SETTLED: f32 = 1.0;
