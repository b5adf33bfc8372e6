// Domain layer: models, view state and ports. No I/O here.

pub mod model;
pub mod ports;
pub mod state;
