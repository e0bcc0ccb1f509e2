pub mod constants;
pub mod error;
pub mod difficulty;
pub mod track;
pub mod vehicle;
pub mod lap_system;
pub mod physics;
pub mod collisions;
pub mod ai;
pub mod powerups;
pub mod race;
pub mod settings;
pub mod simulation;

pub use constants::*;
pub use error::*;
pub use difficulty::*;
pub use track::*;
pub use vehicle::*;
pub use lap_system::*;
pub use physics::*;
pub use collisions::*;
pub use ai::*;
pub use powerups::*;
pub use race::*;
pub use settings::*;
pub use simulation::*;
