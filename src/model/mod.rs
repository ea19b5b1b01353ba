pub mod geo;
pub mod profile;
pub mod punch;
