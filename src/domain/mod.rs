// Domain layer: models and the ports the storage backends implement.

pub mod model;
pub mod ports;
