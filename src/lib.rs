//! Employee time clock: alternating entry/exit punches, an optional geofence
//! gate, a JSON key-value store and CSV export, served to the widget over a
//! small local HTTP API.

pub mod api;
pub mod config;
pub mod docs;
pub mod error;
pub mod geofence;
pub mod ledger;
pub mod model;
pub mod routes;
pub mod state;
pub mod store;
pub mod utils;
