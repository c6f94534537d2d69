#![deny(missing_debug_implementations)]
#![cfg_attr(test, deny(warnings))]

//! # classmap-entities
//!
//! Reusable, agnostic domain entities for the class map.
//!
//! The entities only contain generic functionality that does not reveal any application-specific business logic.

pub mod class;
pub mod geo;
