// Domain layer: activity models and ports (interfaces).

pub mod model;
pub mod ports;
