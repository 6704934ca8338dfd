// Domain layer: wire models, typed values and the storage port.

pub mod model;
pub mod ports;
