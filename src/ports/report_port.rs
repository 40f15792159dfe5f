//! Result output port.

use std::io::Write;

use crate::domain::error::IchimokuError;
use crate::domain::indicator::IchimokuSeries;

/// Port for emitting an analyzed series as a table.
pub trait ReportPort {
    fn write(&self, series: &IchimokuSeries, out: &mut dyn Write) -> Result<(), IchimokuError>;
}
