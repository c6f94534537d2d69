pub mod classes;
pub mod geocode;
pub mod notify;
