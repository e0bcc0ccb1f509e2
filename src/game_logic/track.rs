use std::f32::consts::PI;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use bevy::log::info;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::game_logic::{DECORATION_OFFSET, SEGMENT_LENGTH, SetupError, TRACK_SEGMENTS};

/// Alternating asphalt shade of a segment. The renderer turns these into colours,
/// the core only hands out the tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceShade {
    Dark,
    Light,
}

impl SurfaceShade {
    pub fn for_index(index: usize) -> Self {
        if index % 2 == 0 {
            SurfaceShade::Dark
        } else {
            SurfaceShade::Light
        }
    }

    pub fn road_color(&self) -> &'static str {
        match self {
            SurfaceShade::Dark => "#404040",
            SurfaceShade::Light => "#383838",
        }
    }

    pub fn rumble_color(&self) -> &'static str {
        match self {
            SurfaceShade::Dark => "#ff0000",
            SurfaceShade::Light => "#ffffff",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DecorationKind {
    PalmTree,
    Diner,
    Billboard,
    Cactus,
    GasStation,
    Rock,
    Tumbleweed,
    Tree,
    Bush,
    Log,
    Sign,
    Building,
    Lamp,
    Bench,
    Fountain,
    Snowman,
    Asteroid,
    Satellite,
    Nebula,
    Planet,
}

impl DecorationKind {
    /// Sprite sizes for the hand-tuned roadside set. Themed props get random sizes.
    pub fn fixed_size(&self) -> Option<(f32, f32)> {
        match self {
            DecorationKind::PalmTree => Some((80.0, 200.0)),
            DecorationKind::Diner => Some((300.0, 150.0)),
            DecorationKind::Billboard => Some((150.0, 100.0)),
            DecorationKind::Cactus => Some((60.0, 100.0)),
            DecorationKind::GasStation => Some((200.0, 120.0)),
            _ => None,
        }
    }
}

/// A roadside prop. `offset` is lateral, measured from the road centre.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Decoration {
    pub kind: DecorationKind,
    pub offset: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub index: usize,
    pub curve: f32,
    pub elevation: f32,
    pub shade: SurfaceShade,
    pub is_checkpoint: bool,
    pub is_finish_line: bool,
    pub decorations: Vec<Decoration>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackTemplate {
    #[default]
    Classic,
    Oval,
    Figure8,
    Circuit,
    Drag,
    Rally,
    Custom,
}

impl TrackTemplate {
    pub const ALL: [TrackTemplate; 7] = [
        TrackTemplate::Classic,
        TrackTemplate::Oval,
        TrackTemplate::Figure8,
        TrackTemplate::Circuit,
        TrackTemplate::Drag,
        TrackTemplate::Rally,
        TrackTemplate::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TrackTemplate::Classic => "classic",
            TrackTemplate::Oval => "oval",
            TrackTemplate::Figure8 => "figure8",
            TrackTemplate::Circuit => "circuit",
            TrackTemplate::Drag => "drag",
            TrackTemplate::Rally => "rally",
            TrackTemplate::Custom => "custom",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TrackTemplate::Classic => "Route 66 Loop",
            TrackTemplate::Oval => "Speedway Oval",
            TrackTemplate::Figure8 => "Figure Eight",
            TrackTemplate::Circuit => "Forest Circuit",
            TrackTemplate::Drag => "Drag Strip",
            TrackTemplate::Rally => "Mountain Rally",
            TrackTemplate::Custom => "Custom Track",
        }
    }

    // segments between decoration rolls
    fn decoration_interval(&self) -> usize {
        match self {
            TrackTemplate::Classic | TrackTemplate::Oval | TrackTemplate::Custom => 10,
            TrackTemplate::Figure8 => 8,
            TrackTemplate::Circuit => 12,
            TrackTemplate::Drag => 5,
            TrackTemplate::Rally => 15,
        }
    }

    fn curve(&self, i: usize, len: usize) -> f32 {
        let f = i as f32;
        let frac = i as f32 / len as f32;
        match self {
            TrackTemplate::Classic => {
                if frac > 0.1 && frac < 0.2 {
                    // S-curve
                    (f * 0.1).sin() * 5.0
                } else if frac > 0.3 && frac < 0.4 {
                    4.0
                } else if frac > 0.5 && frac < 0.6 {
                    -4.0
                } else if frac > 0.7 && frac < 0.9 {
                    // winding section
                    (f * 0.08).sin() * 3.0 + (f * 0.05).cos() * 2.0
                } else {
                    0.0
                }
            }
            TrackTemplate::Oval => {
                if frac < 0.25 || (0.5..0.75).contains(&frac) {
                    0.0
                } else if frac < 0.5 {
                    2.0
                } else {
                    -2.0
                }
            }
            TrackTemplate::Figure8 => (frac * 2.0 * PI * 2.0).sin() * 3.0,
            TrackTemplate::Circuit => {
                if frac < 0.2 || (0.4..0.6).contains(&frac) {
                    0.0
                } else if frac < 0.4 {
                    // chicane
                    (f * 0.3).sin() * 2.0
                } else if frac < 0.8 {
                    // hairpin
                    4.0
                } else {
                    (f * 0.2).sin() * 1.5
                }
            }
            TrackTemplate::Drag => (f * 0.1).sin() * 0.5,
            TrackTemplate::Rally => {
                let t = frac * PI * 4.0;
                t.sin() * 4.0 + (t * 2.0).cos() * 2.0
            }
            TrackTemplate::Custom => (f * 0.1).sin() * 2.0 + (f * 0.05).cos() * 1.5,
        }
    }

    fn elevation(&self, i: usize, len: usize) -> f32 {
        let f = i as f32;
        let frac = i as f32 / len as f32;
        match self {
            TrackTemplate::Classic => (f * 0.04).sin() * 150.0 + (f * 0.07).cos() * 80.0,
            TrackTemplate::Oval => (f * 0.1).sin() * 50.0,
            TrackTemplate::Figure8 => (frac * 2.0 * PI * 4.0).sin() * 100.0,
            TrackTemplate::Circuit => (f * 0.05).sin() * 200.0 + (f * 0.08).cos() * 100.0,
            TrackTemplate::Drag => 0.0,
            TrackTemplate::Rally => (f * 0.03).sin() * 300.0 + (f * 0.07).cos() * 150.0,
            TrackTemplate::Custom => (f * 0.04).sin() * 150.0 + (f * 0.06).cos() * 80.0,
        }
    }

    // the finish line always sits on segment 0 and never doubles as a checkpoint
    fn is_checkpoint(&self, i: usize, len: usize) -> bool {
        if i == 0 {
            return false;
        }
        match self {
            TrackTemplate::Drag => i == len - 1,
            TrackTemplate::Rally => i % (len / 4).max(1) == 0,
            TrackTemplate::Custom => i % (len / 8).max(1) == 0,
            _ => i == len / 2,
        }
    }
}

impl FromStr for TrackTemplate {
    type Err = SetupError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        TrackTemplate::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| SetupError::UnknownTrack(name.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackTheme {
    #[default]
    Retro,
    Desert,
    Forest,
    City,
    Snow,
    Space,
}

impl TrackTheme {
    pub const ALL: [TrackTheme; 6] = [
        TrackTheme::Retro,
        TrackTheme::Desert,
        TrackTheme::Forest,
        TrackTheme::City,
        TrackTheme::Snow,
        TrackTheme::Space,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TrackTheme::Retro => "retro",
            TrackTheme::Desert => "desert",
            TrackTheme::Forest => "forest",
            TrackTheme::City => "city",
            TrackTheme::Snow => "snow",
            TrackTheme::Space => "space",
        }
    }

    /// Props available on the (left, right) side of the road.
    fn props(&self) -> (&'static [DecorationKind], &'static [DecorationKind]) {
        use DecorationKind::*;
        match self {
            TrackTheme::Retro => (&[PalmTree, Cactus, Billboard], &[PalmTree, Diner, GasStation]),
            TrackTheme::Desert => (
                &[Cactus, Rock, Tumbleweed, Billboard],
                &[Cactus, Rock, Tumbleweed, Billboard],
            ),
            TrackTheme::Forest => (&[Tree, Bush, Log, Sign], &[Tree, Bush, Log, Sign]),
            TrackTheme::City => (
                &[Building, Lamp, Bench, Fountain],
                &[Building, Lamp, Bench, Fountain],
            ),
            TrackTheme::Snow => (&[Snowman, Tree, Rock, Sign], &[Snowman, Tree, Rock, Sign]),
            TrackTheme::Space => (
                &[Asteroid, Satellite, Nebula, Planet],
                &[Asteroid, Satellite, Nebula, Planet],
            ),
        }
    }

    // chance per side per decorated segment
    fn prop_chance(&self) -> f64 {
        match self {
            TrackTheme::Retro => 1.0,
            _ => 0.3,
        }
    }
}

impl FromStr for TrackTheme {
    type Err = SetupError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        TrackTheme::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| SetupError::UnknownTheme(name.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackConfig {
    pub template: TrackTemplate,
    pub theme: TrackTheme,
    pub segment_count: usize,
    pub segment_length: f32,
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            template: TrackTemplate::Classic,
            theme: TrackTheme::Retro,
            segment_count: TRACK_SEGMENTS,
            segment_length: SEGMENT_LENGTH,
        }
    }
}

/// The looped track. Every signed index is valid; lookups wrap around.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackModel {
    name: String,
    segment_length: f32,
    segments: Vec<Segment>,
}

impl TrackModel {
    /// Builds the segment array for `config`. Curvature and elevation are pure
    /// functions of the index; only the roadside props consume randomness.
    pub fn generate(config: &TrackConfig, rng: &mut impl Rng) -> Result<TrackModel, SetupError> {
        let len = config.segment_count;
        if len < 4 {
            return Err(SetupError::InvalidSetting {
                field: "segment_count",
                reason: format!("a loop needs at least 4 segments, got {len}"),
            });
        }
        if !(config.segment_length.is_finite() && config.segment_length > 0.0) {
            return Err(SetupError::InvalidSetting {
                field: "segment_length",
                reason: format!("must be positive, got {}", config.segment_length),
            });
        }

        let template = config.template;
        let interval = template.decoration_interval();
        let segments = (0..len)
            .map(|i| Segment {
                index: i,
                curve: template.curve(i, len),
                elevation: template.elevation(i, len),
                shade: SurfaceShade::for_index(i),
                is_checkpoint: template.is_checkpoint(i, len),
                is_finish_line: i == 0,
                decorations: if i % interval == 0 {
                    roll_decorations(config.theme, rng)
                } else {
                    Vec::new()
                },
            })
            .collect();

        info!(
            "Generated track '{}' ({} segments, {} theme)",
            template.display_name(),
            len,
            config.theme.as_str()
        );

        Ok(TrackModel {
            name: template.display_name().to_string(),
            segment_length: config.segment_length,
            segments,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn segment_length(&self) -> f32 {
        self.segment_length
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Total distance of one lap.
    pub fn track_distance(&self) -> f32 {
        self.segments.len() as f32 * self.segment_length
    }

    /// Segment index under a longitudinal position. Negative and huge inputs wrap;
    /// a non-finite position resolves to segment 0.
    pub fn segment_index_at(&self, position: f32) -> usize {
        if !position.is_finite() {
            return 0;
        }
        self.wrap_index((position / self.segment_length).floor() as i64)
    }

    pub fn segment_at(&self, position: f32) -> &Segment {
        &self.segments[self.segment_index_at(position)]
    }

    /// Cyclic lookup by signed index.
    pub fn segment(&self, index: i64) -> &Segment {
        &self.segments[self.wrap_index(index)]
    }

    fn wrap_index(&self, index: i64) -> usize {
        index.rem_euclid(self.segments.len() as i64) as usize
    }

    /// Folds a longitudinal position into `[0, track_distance)`.
    pub fn wrap_position(&self, position: f32) -> f32 {
        if !position.is_finite() {
            return 0.0;
        }
        let distance = self.track_distance();
        let wrapped = position.rem_euclid(distance);
        // rem_euclid can round up to exactly `distance` for tiny negative inputs
        if wrapped >= distance { 0.0 } else { wrapped }
    }

    /// Shortest longitudinal gap between two positions on the loop.
    pub fn longitudinal_gap(&self, a: f32, b: f32) -> f32 {
        let distance = self.track_distance();
        let d = (a - b).abs().rem_euclid(distance);
        d.min(distance - d)
    }

    /// Segments entered when moving from `from` to `to` (unwrapped positions),
    /// in driving order. At most one full lap is reported.
    pub fn segments_entered(&self, from: f32, to: f32) -> impl Iterator<Item = &Segment> + '_ {
        let (start, end) = if from.is_finite() && to.is_finite() && to > from {
            (
                (from / self.segment_length).floor() as i64,
                (to / self.segment_length).floor() as i64,
            )
        } else {
            (0, 0)
        };
        let count = (end - start).clamp(0, self.segments.len() as i64);
        (1..=count).map(move |step| self.segment(start + step))
    }

    pub fn to_export(&self) -> TrackExport {
        TrackExport {
            name: self.name.clone(),
            segment_length: self.segment_length,
            segments: self
                .segments
                .iter()
                .map(|s| SegmentRecord {
                    curvature: s.curve,
                    elevation: s.elevation,
                    surface_color: s.shade,
                    is_checkpoint: s.is_checkpoint,
                    is_finish_line: s.is_finish_line,
                    roadside_objects: s.decorations.clone(),
                })
                .collect(),
        }
    }

    pub fn from_export(export: TrackExport) -> Result<TrackModel, SetupError> {
        if export.segments.is_empty() {
            return Err(SetupError::EmptyTrack);
        }
        if !(export.segment_length.is_finite() && export.segment_length > 0.0) {
            return Err(SetupError::InvalidSetting {
                field: "segmentLength",
                reason: format!("must be positive, got {}", export.segment_length),
            });
        }
        if !export.segments.iter().any(|s| s.is_finish_line) {
            return Err(SetupError::MissingLapMarker("finish line"));
        }
        if !export.segments.iter().any(|s| s.is_checkpoint) {
            return Err(SetupError::MissingLapMarker("checkpoint"));
        }

        let segments = export
            .segments
            .into_iter()
            .enumerate()
            .map(|(index, record)| {
                let finite = record.curvature.is_finite()
                    && record.elevation.is_finite()
                    && record
                        .roadside_objects
                        .iter()
                        .all(|d| d.offset.is_finite() && d.width.is_finite() && d.height.is_finite());
                if !finite {
                    return Err(SetupError::NonFiniteSegment(index));
                }
                Ok(Segment {
                    index,
                    curve: record.curvature,
                    elevation: record.elevation,
                    shade: record.surface_color,
                    is_checkpoint: record.is_checkpoint,
                    is_finish_line: record.is_finish_line,
                    decorations: record.roadside_objects,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(TrackModel {
            name: export.name,
            segment_length: export.segment_length,
            segments,
        })
    }

    pub fn to_json(&self) -> Result<String, SetupError> {
        Ok(serde_json::to_string_pretty(&self.to_export())?)
    }

    pub fn from_json(json: &str) -> Result<TrackModel, SetupError> {
        TrackModel::from_export(serde_json::from_str(json)?)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), SetupError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<TrackModel, SetupError> {
        let track = TrackModel::from_json(&fs::read_to_string(path)?)?;
        info!("Loaded track '{}' ({} segments)", track.name, track.len());
        Ok(track)
    }
}

// independent left/right rolls
fn roll_decorations(theme: TrackTheme, rng: &mut impl Rng) -> Vec<Decoration> {
    let (left, right) = theme.props();
    let chance = theme.prop_chance();
    let mut decorations = Vec::new();

    for (kinds, offset) in [(left, -DECORATION_OFFSET), (right, DECORATION_OFFSET)] {
        if !rng.random_bool(chance) {
            continue;
        }
        let kind = kinds[rng.random_range(0..kinds.len())];
        let (width, height) = kind
            .fixed_size()
            .unwrap_or_else(|| (rng.random_range(50.0..100.0), rng.random_range(100.0..200.0)));
        decorations.push(Decoration {
            kind,
            offset,
            width,
            height,
        });
    }

    decorations
}

/// On-disk track format, an ordered list of segment records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackExport {
    pub name: String,
    #[serde(default = "default_segment_length")]
    pub segment_length: f32,
    pub segments: Vec<SegmentRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentRecord {
    pub curvature: f32,
    pub elevation: f32,
    pub surface_color: SurfaceShade,
    #[serde(default)]
    pub is_checkpoint: bool,
    #[serde(default)]
    pub is_finish_line: bool,
    #[serde(default)]
    pub roadside_objects: Vec<Decoration>,
}

fn default_segment_length() -> f32 {
    SEGMENT_LENGTH
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn classic() -> TrackModel {
        TrackModel::generate(&TrackConfig::default(), &mut StdRng::seed_from_u64(7)).unwrap()
    }

    #[test]
    fn test_classic_layout() {
        let track = classic();
        assert_eq!(track.len(), TRACK_SEGMENTS);
        assert!(track.segment(0).is_finish_line);
        assert!(track.segment(100).is_checkpoint);
        assert_eq!(track.segment(70).curve, 4.0);
        assert_eq!(track.segment(110).curve, -4.0);
        assert_eq!(track.segment(5).curve, 0.0);
        assert_eq!(track.segments().iter().filter(|s| s.is_finish_line).count(), 1);
    }

    #[test]
    fn test_geometry_is_independent_of_seed() {
        let a = classic();
        let b = TrackModel::generate(&TrackConfig::default(), &mut StdRng::seed_from_u64(99)).unwrap();
        for (sa, sb) in a.segments().iter().zip(b.segments()) {
            assert_eq!(sa.curve, sb.curve);
            assert_eq!(sa.elevation, sb.elevation);
        }
    }

    #[test]
    fn test_retro_props_on_both_sides() {
        let track = classic();
        let seg = track.segment(10);
        assert_eq!(seg.decorations.len(), 2);
        assert!(seg.decorations[0].offset < 0.0);
        assert!(seg.decorations[1].offset > 0.0);
        assert!(track.segment(11).decorations.is_empty());
    }

    #[test]
    fn test_segment_lookup_wraps() {
        let track = classic();
        assert_eq!(track.segment_index_at(0.0), 0);
        assert_eq!(track.segment_index_at(199.9), 0);
        assert_eq!(track.segment_index_at(200.0), 1);
        assert_eq!(track.segment_index_at(-1.0), TRACK_SEGMENTS - 1);
        assert_eq!(track.segment_index_at(track.track_distance() * 3.0 + 450.0), 2);
        assert_eq!(track.segment_index_at(f32::NAN), 0);
        assert_eq!(track.segment_index_at(f32::INFINITY), 0);
        assert_eq!(track.segment(-1).index, TRACK_SEGMENTS - 1);
    }

    #[test]
    fn test_wrap_position_range() {
        let track = classic();
        let distance = track.track_distance();
        for p in [-1e-6, -100.0, 0.0, distance, distance * 5.0 + 13.0, -distance * 2.0] {
            let w = track.wrap_position(p);
            assert!((0.0..distance).contains(&w), "{p} wrapped to {w}");
        }
    }

    #[test]
    fn test_longitudinal_gap_across_seam() {
        let track = classic();
        let distance = track.track_distance();
        assert!((track.longitudinal_gap(distance - 50.0, 50.0) - 100.0).abs() < 1e-3);
        assert!((track.longitudinal_gap(300.0, 100.0) - 200.0).abs() < 1e-3);
    }

    #[test]
    fn test_segments_entered_in_order() {
        let track = classic();
        let indices: Vec<_> = track.segments_entered(390.0, 810.0).map(|s| s.index).collect();
        assert_eq!(indices, vec![2, 3, 4]);
        assert_eq!(track.segments_entered(100.0, 150.0).count(), 0);
        assert_eq!(track.segments_entered(500.0, 100.0).count(), 0);

        let distance = track.track_distance();
        let seam: Vec<_> = track.segments_entered(distance - 10.0, distance + 10.0).map(|s| s.index).collect();
        assert_eq!(seam, vec![0]);
    }

    #[test]
    fn test_unknown_names_fail() {
        assert!(matches!("moon".parse::<TrackTemplate>(), Err(SetupError::UnknownTrack(_))));
        assert!(matches!("jungle".parse::<TrackTheme>(), Err(SetupError::UnknownTheme(_))));
        assert_eq!("Figure8".parse::<TrackTemplate>().unwrap(), TrackTemplate::Figure8);
    }

    #[test]
    fn test_every_template_has_one_finish_and_a_checkpoint() {
        let mut rng = StdRng::seed_from_u64(1);
        for template in TrackTemplate::ALL {
            let config = TrackConfig { template, theme: TrackTheme::Forest, ..Default::default() };
            let track = TrackModel::generate(&config, &mut rng).unwrap();
            let finishes = track.segments().iter().filter(|s| s.is_finish_line).count();
            assert_eq!(finishes, 1, "{template:?}");
            assert!(track.segments().iter().any(|s| s.is_checkpoint), "{template:?}");
            assert!(!track.segment(0).is_checkpoint, "{template:?}");
        }
    }

    #[test]
    fn test_too_short_track_is_rejected() {
        let config = TrackConfig { segment_count: 2, ..Default::default() };
        assert!(TrackModel::generate(&config, &mut StdRng::seed_from_u64(0)).is_err());
    }

    #[test]
    fn test_export_import_restores_track() {
        let config = TrackConfig { template: TrackTemplate::Rally, theme: TrackTheme::Space, ..Default::default() };
        let track = TrackModel::generate(&config, &mut StdRng::seed_from_u64(3)).unwrap();
        let json = track.to_json().unwrap();
        assert!(json.contains("\"isFinishLine\""));
        assert!(json.contains("\"roadsideObjects\""));
        assert_eq!(TrackModel::from_json(&json).unwrap(), track);
    }

    #[test]
    fn test_import_rejects_empty_track() {
        let json = r#"{"name":"nothing","segments":[]}"#;
        assert!(matches!(TrackModel::from_json(json), Err(SetupError::EmptyTrack)));
        assert!(matches!(TrackModel::from_json("{"), Err(SetupError::Json(_))));
    }

    #[test]
    fn test_import_needs_finish_line_and_checkpoint() {
        let track = TrackModel::generate(&TrackConfig::default(), &mut StdRng::seed_from_u64(0)).unwrap();

        let mut no_finish = track.to_export();
        no_finish.segments.iter_mut().for_each(|s| s.is_finish_line = false);
        assert!(matches!(
            TrackModel::from_export(no_finish),
            Err(SetupError::MissingLapMarker("finish line"))
        ));

        let mut no_checkpoint = track.to_export();
        no_checkpoint.segments.iter_mut().for_each(|s| s.is_checkpoint = false);
        assert!(matches!(
            TrackModel::from_export(no_checkpoint),
            Err(SetupError::MissingLapMarker("checkpoint"))
        ));
    }
}
