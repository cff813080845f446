#![no_std]

pub mod cpmm;
pub mod full_math;

pub use cpmm::*;
pub use full_math::*;
