pub mod combined;
pub mod pacejka;
pub mod relaxation;
pub mod slip;
#[allow(clippy::module_inception)]
pub mod tire;

pub use combined::{friction_ellipse_limit, CombinedForces, CombinedSlip, CombinedSlipMethod};
pub use pacejka::{PacejkaFormula, PacejkaParams};
pub use relaxation::{AdaptiveRelaxation, RelaxationState, TireRelaxation};
pub use slip::SlipState;
pub use tire::{Tire, TireConfig, TireState};
