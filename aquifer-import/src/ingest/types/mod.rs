//! Core types for survey imports

mod cell;
mod measurement;
mod parameter;
mod sample;
mod well;

pub use cell::*;
pub use measurement::*;
pub use parameter::*;
pub use sample::*;
pub use well::*;
