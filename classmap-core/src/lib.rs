pub mod gateways;
pub mod map;
pub mod usecases;

pub mod entities {
    pub use classmap_entities::{class::*, geo::*};
}
