//! Common functionality for ChaProEV.
#![warn(missing_docs)]
pub mod cli;
pub mod id;
pub mod input;
pub mod leg;
pub mod location;
pub mod log;
pub mod model;
pub mod output;
pub mod road_type;
pub mod simulation;
pub mod time_range;
pub mod units;
pub mod vehicle;
pub mod weather;

#[cfg(test)]
mod fixture;
