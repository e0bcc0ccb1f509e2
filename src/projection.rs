use bevy::math::{Vec2, Vec3};
use bevy::prelude::Resource;

use crate::game_logic::{
    CAMERA_HEIGHT, CANVAS_HEIGHT, CANVAS_WIDTH, CURVE_SHIFT, DECORATION_MAX_SCALE, DECORATION_MIN_SCALE,
    DRAW_DISTANCE, DecorationKind, FOCAL_LENGTH, KART_BOTTOM_MARGIN, KART_MAX_SCALE, KART_MIN_SCALE, KART_SPRITE_SIZE,
    PLAYER_SCREEN_OFFSET, POWERUP_HOVER, POWERUP_MAX_SCALE, POWERUP_MIN_SCALE, POWERUP_SPRITE_SIZE, PowerUpKind,
    Simulation, SurfaceShade, TRACK_WIDTH, TrackModel, Vehicle, VehicleId, VisualHandle,
};

/// Where the eye sits in world space. `z` is a longitudinal track position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CameraView {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl CameraView {
    /// Chase camera: over the kart, a fixed height above the road under it.
    pub fn follow(vehicle: &Vehicle, track: &TrackModel) -> Self {
        Self {
            x: vehicle.x,
            y: track.segment_at(vehicle.position).elevation + CAMERA_HEIGHT,
            z: vehicle.position,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedPoint {
    pub x: f32,
    pub y: f32,
    /// Projected road width at this depth, never below one pixel.
    pub w: f32,
    pub scale: f32,
}

impl ProjectedPoint {
    pub fn screen(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Flat perspective transform for the segment road.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    pub viewport_width: f32,
    pub viewport_height: f32,
    pub focal_length: f32,
    pub road_width: f32,
    pub draw_distance: usize,
}

impl Default for Projector {
    fn default() -> Self {
        Self {
            viewport_width: CANVAS_WIDTH,
            viewport_height: CANVAS_HEIGHT,
            focal_length: FOCAL_LENGTH,
            road_width: TRACK_WIDTH,
            draw_distance: DRAW_DISTANCE,
        }
    }
}

impl Projector {
    /// Depth is clamped to at least one unit so points level with or behind the
    /// camera never divide by zero or flip sign.
    pub fn project(&self, world: Vec3, camera: &CameraView) -> ProjectedPoint {
        let scale = self.focal_length / (world.z - camera.z).max(1.0);
        ProjectedPoint {
            x: (world.x - camera.x) * scale + self.viewport_width / 2.0,
            y: self.viewport_height / 2.0 - (world.y - camera.y) * scale,
            w: (scale * self.road_width).max(1.0),
            scale,
        }
    }

    pub fn on_screen(&self, point: &ProjectedPoint) -> bool {
        point.scale > 0.0 && point.y > 0.0 && point.y < self.viewport_height
    }

    pub fn kart_visible(&self, point: &ProjectedPoint) -> bool {
        point.scale > KART_MIN_SCALE
            && point.scale < KART_MAX_SCALE
            && point.y < self.viewport_height - KART_BOTTOM_MARGIN
    }
}

/// One slice of road between two segment edges. `far_*` is the edge farther from the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoadQuad {
    pub segment: usize,
    /// Segments ahead of the camera. Larger is farther.
    pub depth: usize,
    pub far_left: Vec2,
    pub far_right: Vec2,
    pub near_left: Vec2,
    pub near_right: Vec2,
    pub shade: SurfaceShade,
    pub scale: f32,
    pub rumble: bool,
    pub center_line: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpriteKind {
    Decoration(DecorationKind),
    PowerUp(PowerUpKind),
    Kart(VehicleId),
}

/// A billboard to paint. `position` is the bottom centre on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteIntent {
    pub kind: SpriteKind,
    pub depth: usize,
    pub position: Vec2,
    pub size: Vec2,
    pub scale: f32,
    /// Kart lean for the renderer: steering plus a share of the drift angle.
    pub rotation: f32,
    pub visual: Option<VisualHandle>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    Road(RoadQuad),
    Sprite(SpriteIntent),
}

impl DrawCommand {
    pub fn depth(&self) -> usize {
        match self {
            DrawCommand::Road(quad) => quad.depth,
            DrawCommand::Sprite(sprite) => sprite.depth,
        }
    }
}

/// Painter's-order command list, farthest first. The buffer is kept between
/// frames and only cleared, so building it does not allocate once warmed up.
#[derive(Resource, Debug, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

fn kart_rotation(vehicle: &Vehicle) -> f32 {
    vehicle.steering * 0.5 + vehicle.drift_angle * 0.3
}

impl DrawList {
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Rebuilds the frame from the player's point of view. Only reads `sim`.
    pub fn build(&mut self, sim: &Simulation, projector: &Projector) {
        self.commands.clear();
        let track = sim.track();
        let Some(player) = sim.vehicles().player() else {
            return;
        };
        let camera = CameraView::follow(player, track);
        let length = track.segment_length();
        let base = (camera.z / length).floor() as i64;

        for n in (1..=projector.draw_distance).rev() {
            let far = track.segment(base + n as i64);
            let near = track.segment(base + n as i64 - 1);
            let far_z = (base + n as i64) as f32 * length;
            let near_z = far_z - length;
            let half = projector.road_width / 2.0;
            let far_shift = far.curve * CURVE_SHIFT;
            let near_shift = near.curve * CURVE_SHIFT;

            let far_left = projector.project(Vec3::new(-half + far_shift, far.elevation, far_z), &camera);
            if projector.on_screen(&far_left) {
                let far_right = projector.project(Vec3::new(half + far_shift, far.elevation, far_z), &camera);
                let near_left = projector.project(Vec3::new(-half + near_shift, near.elevation, near_z), &camera);
                let near_right = projector.project(Vec3::new(half + near_shift, near.elevation, near_z), &camera);
                self.commands.push(DrawCommand::Road(RoadQuad {
                    segment: far.index,
                    depth: n,
                    far_left: far_left.screen(),
                    far_right: far_right.screen(),
                    near_left: near_left.screen(),
                    near_right: near_right.screen(),
                    shade: far.shade,
                    scale: far_left.scale,
                    rumble: n % 2 == 1,
                    center_line: n % 4 < 2,
                }));

                if far_left.scale > DECORATION_MIN_SCALE && far_left.scale < DECORATION_MAX_SCALE {
                    for decoration in &far.decorations {
                        let at = projector.project(
                            Vec3::new(decoration.offset + far_shift, far.elevation, far_z),
                            &camera,
                        );
                        self.commands.push(DrawCommand::Sprite(SpriteIntent {
                            kind: SpriteKind::Decoration(decoration.kind),
                            depth: n,
                            position: at.screen(),
                            size: Vec2::new(decoration.width, decoration.height) * at.scale,
                            scale: at.scale,
                            rotation: 0.0,
                            visual: None,
                        }));
                    }
                }
            }

            self.push_segment_sprites(sim, projector, &camera, far.index, far_z, n);
        }

        // whatever shares the camera's segment, then the player's own kart on top
        let current = track.segment(base);
        self.push_segment_sprites(sim, projector, &camera, current.index, base as f32 * length, 0);
        self.commands.push(DrawCommand::Sprite(SpriteIntent {
            kind: SpriteKind::Kart(player.id),
            depth: 0,
            position: Vec2::new(projector.viewport_width / 2.0, projector.viewport_height - PLAYER_SCREEN_OFFSET),
            size: Vec2::splat(KART_SPRITE_SIZE),
            scale: 1.0,
            rotation: kart_rotation(player),
            visual: player.visual,
        }));
    }

    // pickups and rival karts standing on segment `index`, whose start sits at `segment_z`
    fn push_segment_sprites(
        &mut self,
        sim: &Simulation,
        projector: &Projector,
        camera: &CameraView,
        index: usize,
        segment_z: f32,
        depth: usize,
    ) {
        let track = sim.track();
        let segment = &track.segments()[index];

        for pickup in sim.power_ups().pickups() {
            if pickup.collected || pickup.segment != index {
                continue;
            }
            let at = projector.project(Vec3::new(pickup.x, segment.elevation - POWERUP_HOVER, segment_z), camera);
            if at.scale > POWERUP_MIN_SCALE && at.scale < POWERUP_MAX_SCALE {
                self.commands.push(DrawCommand::Sprite(SpriteIntent {
                    kind: SpriteKind::PowerUp(pickup.kind),
                    depth,
                    position: at.screen(),
                    size: Vec2::splat(POWERUP_SPRITE_SIZE * at.scale),
                    scale: at.scale,
                    rotation: 0.0,
                    visual: None,
                }));
            }
        }

        let length = track.segment_length();
        for kart in sim.vehicles().iter() {
            if kart.is_player() || track.segment_index_at(kart.position) != index {
                continue;
            }
            let into_segment = kart.position - index as f32 * length;
            let at = projector.project(Vec3::new(kart.x, segment.elevation, segment_z + into_segment), camera);
            if projector.kart_visible(&at) {
                self.commands.push(DrawCommand::Sprite(SpriteIntent {
                    kind: SpriteKind::Kart(kart.id),
                    depth,
                    position: at.screen(),
                    size: Vec2::splat(KART_SPRITE_SIZE * at.scale),
                    scale: at.scale,
                    rotation: kart_rotation(kart),
                    visual: kart.visual,
                }));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_logic::RaceSettings;

    fn camera() -> CameraView {
        CameraView { x: 0.0, y: 300.0, z: 1_000.0 }
    }

    #[test]
    fn test_scale_peaks_one_unit_ahead() {
        let projector = Projector::default();
        let at_clamp = projector.project(Vec3::new(0.0, 0.0, 1_001.0), &camera());
        assert_eq!(at_clamp.scale, FOCAL_LENGTH);

        for z in [1_000.0, 1_000.5, 500.0] {
            let p = projector.project(Vec3::new(0.0, 0.0, z), &camera());
            assert_eq!(p.scale, FOCAL_LENGTH, "z = {z}");
            assert!(p.x.is_finite() && p.y.is_finite());
        }
        let farther = projector.project(Vec3::new(0.0, 0.0, 1_002.0), &camera());
        assert!(farther.scale < at_clamp.scale);
    }

    #[test]
    fn test_projection_formulas() {
        let projector = Projector::default();
        let p = projector.project(Vec3::new(100.0, 0.0, 1_300.0), &camera());
        assert_eq!(p.scale, 1.0);
        assert_eq!(p.x, 100.0 + CANVAS_WIDTH / 2.0);
        assert_eq!(p.y, CANVAS_HEIGHT / 2.0 + 300.0);
        assert_eq!(p.w, TRACK_WIDTH);

        let far = projector.project(Vec3::new(0.0, 0.0, 1e9), &camera());
        assert_eq!(far.w, 1.0);
    }

    #[test]
    fn test_karts_behind_player_sprite_are_culled() {
        let projector = Projector::default();
        let at = |y: f32| ProjectedPoint { x: CANVAS_WIDTH / 2.0, y, w: 100.0, scale: 1.0 };
        assert!(projector.kart_visible(&at(CANVAS_HEIGHT - KART_BOTTOM_MARGIN - 1.0)));
        assert!(!projector.kart_visible(&at(CANVAS_HEIGHT - KART_BOTTOM_MARGIN)));
        assert!(!projector.kart_visible(&at(CANVAS_HEIGHT - 10.0)));
        assert!(!projector.kart_visible(&ProjectedPoint { scale: 0.05, ..at(100.0) }));
    }

    #[test]
    fn test_draw_list_is_far_to_near() {
        let settings = RaceSettings { seed: Some(21), ..Default::default() };
        let sim = Simulation::new(&settings).unwrap();
        let mut list = DrawList::default();
        list.build(&sim, &Projector::default());

        assert!(list.commands().iter().any(|c| matches!(c, DrawCommand::Road(_))));
        let depths: Vec<usize> = list.commands().iter().map(DrawCommand::depth).collect();
        assert!(depths.windows(2).all(|w| w[0] >= w[1]), "{depths:?}");

        let quads: Vec<usize> = list
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Road(q) => Some(q.depth),
                DrawCommand::Sprite(_) => None,
            })
            .collect();
        assert!(quads.windows(2).all(|w| w[0] > w[1]));

        // the player's kart always goes last
        let last = list.commands().last().unwrap();
        assert!(matches!(last, DrawCommand::Sprite(SpriteIntent { kind: SpriteKind::Kart(VehicleId(0)), .. })));
    }

    #[test]
    fn test_rebuild_reuses_buffer() {
        let settings = RaceSettings { seed: Some(21), ..Default::default() };
        let sim = Simulation::new(&settings).unwrap();
        let projector = Projector::default();
        let mut list = DrawList::default();
        list.build(&sim, &projector);
        let first = list.commands().to_vec();
        let capacity = list.commands.capacity();

        list.build(&sim, &projector);
        assert_eq!(list.commands(), first.as_slice());
        assert_eq!(list.commands.capacity(), capacity);
    }
}
