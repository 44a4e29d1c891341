//! Animated replay of an already computed trajectory.

use crate::render::{write_summary, write_table_header, write_table_row};
use anyhow::Result;
use stakesim_economics::{Trajectory, TrajectorySummary};
use std::io::Write;
use std::thread;
use std::time::Duration;

/// Percentage of rows shown so far, as printed in the progress line.
pub fn progress_label(shown: usize, total: usize) -> String {
    let fraction = if total == 0 {
        1.0
    } else {
        shown as f64 / total as f64
    };
    format!("{:.2}% Complete", fraction * 100.0)
}

/// Print rows one by one, pausing `delay` between them and reporting
/// progress on `progress`. Never recomputes anything.
pub fn replay<W: Write, P: Write>(
    out: &mut W,
    progress: &mut P,
    trajectory: &Trajectory,
    delay: Duration,
) -> Result<()> {
    write_table_header(out)?;

    let rows = trajectory.as_slice();
    for (i, row) in rows.iter().enumerate() {
        write_table_row(out, row, i.checked_sub(1).map(|p| &rows[p]))?;
        out.flush()?;

        write!(progress, "\r{}", progress_label(i + 1, rows.len()))?;
        progress.flush()?;

        if !delay.is_zero() && i + 1 < rows.len() {
            thread::sleep(delay);
        }
    }
    writeln!(progress)?;

    if let Some(summary) = TrajectorySummary::from_trajectory(trajectory) {
        write_summary(out, &summary)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stakesim_economics::SimulationConfig;

    #[test]
    fn progress_is_formatted_to_two_decimals() {
        assert_eq!(progress_label(0, 3), "0.00% Complete");
        assert_eq!(progress_label(1, 3), "33.33% Complete");
        assert_eq!(progress_label(3, 3), "100.00% Complete");
    }

    #[test]
    fn replay_prints_every_row_and_finishes_at_100_percent() {
        let mut config = SimulationConfig::defaults();
        config.total_years = 5;
        let trajectory = config.build().unwrap().run().unwrap();

        let mut out = Vec::new();
        let mut progress = Vec::new();
        replay(&mut out, &mut progress, &trajectory, Duration::ZERO).unwrap();

        let table = String::from_utf8(out).unwrap();
        assert_eq!(table.lines().take_while(|l| !l.is_empty()).count(), 6);

        let progress = String::from_utf8(progress).unwrap();
        assert!(progress.contains("20.00% Complete"));
        assert!(progress.trim_end().ends_with("100.00% Complete"));
    }
}
