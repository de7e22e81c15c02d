// core.rs splits responsibilities into submodules for easier maintenance.
pub mod chain;
pub mod tally;
pub mod validation;

pub use chain::*;
