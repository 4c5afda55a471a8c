//! State feedback design for single-input, continuous-time linear systems.
//!
//! Given dx/dt = A x + B u and n desired closed-loop poles, [`place_poles`]
//! returns the gain K for u = -K x such that A - B K has exactly those poles,
//! using Ackermann's formula K = e_n^T C^-1 phi(A).
//!
//! ```
//! use pole_place::{place_real_poles, BeamPlant};
//!
//! let sys = BeamPlant::default().state_space().unwrap();
//! let k = place_real_poles(&sys, &[-3.0; 4]).unwrap();
//! assert_eq!(k.to_string(), "K = [0.0826, 0.1101, 1.0800, 0.2400]");
//! ```

pub mod error;
pub mod io;
pub mod placement;
pub mod system;

pub use error::{PlacementError, Result};
pub use placement::{place_poles, place_real_poles, FeedbackGain, PlacementConfig};
pub use system::{BeamPlant, PlantBuilder, StateSpace};
