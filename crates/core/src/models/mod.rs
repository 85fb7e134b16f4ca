//! Data models for TechSolutions

mod contract;
mod service;

pub use contract::*;
pub use service::*;
