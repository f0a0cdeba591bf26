// Domain layer: cluster records, the compose document and the ports the core talks through.

pub mod model;
pub mod ports;
