// Domain layer: credential models and the checker port.

pub mod model;
pub mod ports;
