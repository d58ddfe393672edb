//! Domain models for the price comparison engine.

mod comparison;
mod drug;
mod location;
mod pharmacy;
mod price;

pub use comparison::*;
pub use drug::*;
pub use location::*;
pub use pharmacy::*;
pub use price::*;
