pub mod cli;
pub mod config;
pub mod error;
pub mod resources;
pub mod session;
pub mod telemetry;
pub mod transform;
pub mod utils;

#[cfg(test)]
mod testing;
