// Domain layer: core models and ports (interfaces). No external dependencies beyond serde when needed.

pub mod model;
pub mod ports;
