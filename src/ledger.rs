// Thin re-export module: implementation is in `ledger/core.rs` to allow
// progressive decomposition of ledger responsibilities (chain management,
// validation, tallying).

pub mod core;
pub use core::*;
