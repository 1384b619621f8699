// In crates/accounting/src/lib.rs

pub mod mark;
pub mod summary;

pub use mark::{current_basis, margin_utilization, mark_to_market, total_equity};
pub use summary::SessionSummary;
