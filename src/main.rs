use std::env;
use std::process::ExitCode;
use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;

use flat_track_racers::KartSimPlugin;
use flat_track_racers::game_logic::{
    FRAME_TIMESTEP, InputSnapshot, RACE_TIME_LIMIT, RacePhase, RaceSettings, Simulation, racing_line,
};

// Headless race: a scripted player against the AI field, exits when everyone is home.
// usage: flat-track-racers [settings.json] [export-track.json]
fn main() -> ExitCode {
    let mut args = env::args().skip(1);
    let settings = match args.next() {
        Some(path) => match RaceSettings::from_json_file(&path) {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("Could not load settings from {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => RaceSettings::default(),
    };

    let mut sim = match Simulation::new(&settings) {
        Ok(sim) => sim,
        Err(e) => {
            eprintln!("Race setup failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Some(path) = args.next() {
        if let Err(e) = sim.track().save_to_file(&path) {
            eprintln!("Could not export track to {}: {}", path, e);
            return ExitCode::FAILURE;
        }
        println!("Track exported to {}", path);
    }

    if let Err(e) = sim.start() {
        eprintln!("Could not start race: {}", e);
        return ExitCode::FAILURE;
    }

    let exit = App::new()
        .add_plugins((
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f32(FRAME_TIMESTEP))),
            LogPlugin::default(),
        ))
        .add_plugins(KartSimPlugin)
        .insert_resource(sim)
        .add_systems(PreUpdate, drive_player)
        .add_systems(PostUpdate, finish_race)
        .run();

    if exit.is_success() { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

// follows the same racing line the AI uses and fires items as soon as they land
fn drive_player(sim: Res<Simulation>, mut input: ResMut<InputSnapshot>) {
    let Some(player) = sim.vehicles().player() else {
        return;
    };
    let target = racing_line(sim.track(), player.position);
    *input = InputSnapshot {
        accelerate: true,
        steer_axis: Some(((target - player.x) / 300.0).clamp(-1.0, 1.0)),
        drift: sim.track().segment_at(player.position).curve.abs() > 3.0,
        boost: player.item.is_some(),
        ..Default::default()
    };
}

fn finish_race(sim: Res<Simulation>, mut exit: EventWriter<AppExit>) {
    let race = sim.race();
    let timed_out = race.elapsed() > RACE_TIME_LIMIT;
    if race.phase() != RacePhase::Finished && !timed_out {
        return;
    }
    if timed_out {
        warn!("Race timed out after {:.0}s", race.elapsed());
    }

    for standing in sim.standings() {
        match standing.finish_time {
            Some(time) => info!("{}. {} {:.2}s", standing.place, standing.name, time),
            None => info!("{}. {} (lap {})", standing.place, standing.name, standing.lap),
        }
    }
    if let Some(best) = race.best_time() {
        info!("Best time {:.2}s", best);
    }
    exit.write(AppExit::Success);
}
