mod map_coordinator;
mod static_map;

pub use self::{map_coordinator::*, static_map::*};
