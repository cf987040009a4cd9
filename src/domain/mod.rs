// Domain layer: staff records, rosters and the ports the pipeline is built on.

pub mod model;
pub mod ports;
