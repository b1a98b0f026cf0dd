pub mod dot;
pub mod input;
pub mod math;
