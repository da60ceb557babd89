// Domain layer: backend entities, session state and the ports the pages talk through.

pub mod model;
pub mod ports;
pub mod session;
