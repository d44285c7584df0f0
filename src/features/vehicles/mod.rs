//! Vehicle screens: list, detail, create, edit and delete.

pub mod client;
pub mod types;

pub use types::{NewVehicle, Vehicle, VehicleUpdate};
