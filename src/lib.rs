//! Browser-facing gateway for the game service's game object records.

pub mod client;
pub mod config;
pub mod model;
pub mod store;
pub mod web;

#[cfg(test)]
pub(crate) mod testing;
