pub mod game_logic;
pub mod plugin;
pub mod projection;

pub use plugin::KartSimPlugin;
