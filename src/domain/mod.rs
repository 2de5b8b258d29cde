// Domain layer: prayer-times model and the ports the delivery pipeline depends on.

pub mod model;
pub mod ports;
