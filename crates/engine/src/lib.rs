// In crates/engine/src/lib.rs

//! The session controller.
//!
//! A [`Session`] owns one simulated cash-and-carry run: the current state,
//! the market model that moves prices, the margin monitor that can force a
//! liquidation, and the random source behind it all. [`SessionHandle`] moves
//! a session onto a tokio task so that a repeating timer and manual commands
//! are applied strictly one after the other.

pub mod error;
pub mod handle;
pub mod session;
pub mod simulate;

pub use error::{Error, Result};
pub use handle::{CommandOutcome, SessionCommand, SessionHandle};
pub use session::{DayOutcome, Session};
pub use simulate::{DayStep, simulate_day};
