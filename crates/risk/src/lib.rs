// In crates/risk/src/lib.rs

use core_types::{MarginStatus, SimulationState};
use rust_decimal::Decimal;

pub mod error;
pub mod maintenance;
pub mod types;

// Re-export public types
pub use error::{Error, Result};
pub use maintenance::MaintenanceMarginMonitor;
pub use types::MarginSettings;

/// The universal interface for a futures-account margin monitor.
///
/// A `MarginMonitor` decides whether a hedged position may be opened with the
/// available cash, and whether an open position has breached maintenance
/// margin and must be liquidated.
pub trait MarginMonitor: Send + Sync {
    /// The name of the margin model.
    fn name(&self) -> &'static str;

    /// Evaluates the futures account of `state`.
    ///
    /// # Arguments
    ///
    /// * `state`: The state whose position and current futures price are checked.
    /// * `futures_pnl`: The mark-to-market PnL of the short futures leg.
    ///
    /// # Returns
    ///
    /// The required margin, the account equity and whether a margin call is due.
    fn check_margin(&self, state: &SimulationState, futures_pnl: Decimal) -> MarginStatus;

    /// Checks whether `cash` can fund a spot purchase costing `spot_cost`.
    ///
    /// # Returns
    ///
    /// * `Ok(())`: If the purchase leaves enough room for futures margin.
    /// * `Err(Error::Vetoed)`: If the cash falls short of the safety buffer.
    fn check_open(&self, cash: Decimal, spot_cost: Decimal) -> Result<()>;
}
