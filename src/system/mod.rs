pub mod plant;
pub mod state_space;

pub use plant::{BeamPlant, PlantBuilder, GRAVITY};
pub use state_space::StateSpace;
