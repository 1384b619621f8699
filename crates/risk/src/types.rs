// In crates/risk/src/types.rs

use core_types::SessionParams;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarginSettings {
    /// Cash must cover the spot cost times this factor before opening (e.g. 1.2
    /// keeps a 20% buffer for futures margin).
    pub opening_buffer: Decimal,
}

impl Default for MarginSettings {
    fn default() -> Self {
        Self::from_params(&SessionParams::default())
    }
}

impl MarginSettings {
    pub fn from_params(params: &SessionParams) -> Self {
        Self {
            opening_buffer: params.opening_buffer,
        }
    }
}
