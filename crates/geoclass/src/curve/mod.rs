//! Particle-size distribution: readings, curve construction, interpolation
//! and gradation parameters.

mod builder;
mod gradation;
mod interpolate;
mod reading;

pub use builder::{CurveBuilder, CurvePoint, DEFAULT_MASS_TOLERANCE_PERCENT, MassBalance, SieveCurve};
pub use gradation::GradationParameters;
pub use interpolate::{Boundary, PassingLookup};
pub use reading::SieveReading;
