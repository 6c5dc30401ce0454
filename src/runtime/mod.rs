//! Host runtime: the mission loop and its log reporting

pub mod mission_loop;
pub mod report;

pub use mission_loop::{LoopConfig, MissionLoop};
pub use report::Reporter;
