use bevy::prelude::*;

use crate::game_logic::{InputSnapshot, Simulation};
use crate::projection::{DrawList, Projector};

/// Runs the race each frame: the update phase first, then the read-only
/// projection phase. Insert a [`Simulation`] resource to get things moving;
/// the systems idle until one exists.
pub struct KartSimPlugin;

impl Plugin for KartSimPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<InputSnapshot>()
            .init_resource::<Projector>()
            .init_resource::<DrawList>()
            .add_systems(
                Update,
                (tick_simulation, build_draw_list)
                    .chain()
                    .run_if(resource_exists::<Simulation>),
            );
    }
}

pub fn tick_simulation(time: Res<Time>, input: Res<InputSnapshot>, mut sim: ResMut<Simulation>) {
    sim.tick(time.delta_secs(), &input);
}

pub fn build_draw_list(sim: Res<Simulation>, projector: Res<Projector>, mut draw_list: ResMut<DrawList>) {
    draw_list.build(&sim, &projector);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_logic::{RacePhase, RaceSettings};
    use crate::projection::DrawCommand;

    #[test]
    fn test_plugin_ticks_then_projects() {
        let settings = RaceSettings { seed: Some(5), countdown: 0.0, ..Default::default() };
        let mut sim = Simulation::new(&settings).unwrap();
        sim.start().unwrap();

        let mut app = App::new();
        app.add_plugins(MinimalPlugins).add_plugins(KartSimPlugin).insert_resource(sim);
        app.insert_resource(InputSnapshot { accelerate: true, ..Default::default() });
        app.update();

        let sim = app.world().resource::<Simulation>();
        assert_eq!(sim.race().phase(), RacePhase::Racing);
        let draw_list = app.world().resource::<DrawList>();
        assert!(draw_list.commands().iter().any(|c| matches!(c, DrawCommand::Road(_))));
    }

    #[test]
    fn test_plugin_idles_without_simulation() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins).add_plugins(KartSimPlugin);
        app.update();
        assert!(app.world().resource::<DrawList>().is_empty());
    }
}
