pub mod ackermann;
pub mod config;
pub mod controllability;
pub mod poly;
pub mod verify;

pub use ackermann::{extract_gain, place_poles, place_real_poles, FeedbackGain};
pub use config::PlacementConfig;
pub use controllability::{
    check_controllable, controllability_matrix, numerical_rank, reciprocal_condition,
};
pub use poly::{characteristic_coefficients, eval_matrix_polynomial, matrix_characteristic_polynomial};
pub use verify::{closed_loop_poles, max_pole_error, pair_poles, poles_match};
