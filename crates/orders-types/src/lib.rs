//! orders-types: domain model and storage ports shared by every crate

pub mod domain;
pub mod ports;
