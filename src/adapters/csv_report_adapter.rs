//! CSV table writer for analyzed series.
//!
//! Columns: `timestamp,tenkansen,kijunsen,leading_span_a,leading_span_b,is_hot,is_cold`.
//! Undefined line values are written as empty cells.

use std::io::Write;

use crate::domain::error::IchimokuError;
use crate::domain::indicator::{IchimokuSeries, SignalField};
use crate::ports::report_port::ReportPort;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Default)]
pub struct CsvReportAdapter;

fn csv_error(e: csv::Error) -> IchimokuError {
    IchimokuError::Io(std::io::Error::other(e))
}

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl ReportPort for CsvReportAdapter {
    fn write(&self, series: &IchimokuSeries, out: &mut dyn Write) -> Result<(), IchimokuError> {
        let mut wtr = csv::Writer::from_writer(out);

        let mut header = vec!["timestamp"];
        header.extend(SignalField::ALL.iter().map(|f| f.column_name()));
        header.extend(["is_hot", "is_cold"]);
        wtr.write_record(&header).map_err(csv_error)?;

        for point in &series.points {
            let mut row = vec![point.timestamp.format(TIMESTAMP_FORMAT).to_string()];
            row.extend(SignalField::ALL.iter().map(|&f| cell(point.value(f))));
            row.push(point.is_hot.to_string());
            row.push(point.is_cold.to_string());
            wtr.write_record(&row).map_err(csv_error)?;
        }

        wtr.flush()?;
        Ok(())
    }
}
