// In crates/engine/src/error.rs

use thiserror::Error;

/// Why a session action was refused. Every rejection leaves the session
/// state untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("{0}")]
    InsufficientFunds(#[from] risk::Error),

    #[error("A position is already open.")]
    PositionAlreadyOpen,

    #[error("There is no open position to close.")]
    NoOpenPosition,

    #[error("The market scenario cannot change while a position is open.")]
    ScenarioLocked,

    #[error("The account has been liquidated. Reset the session to trade again.")]
    Liquidated,

    #[error("The contract has expired. Reset the session to trade again.")]
    ContractExpired,

    #[error("Only an open position that has not expired can run continuously.")]
    NotRunnable,

    #[error("Invalid session parameters: {0}")]
    InvalidParameters(#[from] core_types::Error),

    #[error("The session task has stopped.")]
    Closed,

    #[error("The session task answered {command} with the wrong kind of outcome.")]
    UnexpectedReply { command: &'static str },
}

pub type Result<T> = std::result::Result<T, Error>;
