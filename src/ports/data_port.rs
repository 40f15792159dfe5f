//! Historical bar source port.

use crate::domain::error::IchimokuError;
use crate::domain::ohlcv::OhlcvBar;

pub trait DataPort {
    /// Bars for `symbol`, oldest first.
    fn fetch_ohlcv(&self, symbol: &str) -> Result<Vec<OhlcvBar>, IchimokuError>;

    fn list_symbols(&self) -> Result<Vec<String>, IchimokuError>;
}
