//! Consumption Report Example
//!
//! Analyzes a half-consumed product and prints the resulting report as JSON.

use anyhow::Result;
use jiff::civil::date;
use larder::analysis::analyze;

/// Consumption Report Example
#[expect(clippy::print_stdout, reason = "Example program output to user")]
pub fn main() -> Result<()> {
    let purchase = date(2024, 6, 1);
    let expiration = date(2024, 7, 15);
    let today = date(2024, 6, 21);

    let report = analyze(10.0, Some(4.0), Some(purchase), Some(expiration), today)?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    println!("\n{}", report.summary);

    for warning in &report.warnings {
        println!("warning: {warning}");
    }

    Ok(())
}
