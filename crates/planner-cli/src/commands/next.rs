use anyhow::Result;
use planner_core::recurrence::next_date;

use crate::cli::NextCommand;

/// Prints the next occurrence in `YYYYMMDD` form and nothing else, so the
/// output can be consumed by scripts.
pub fn next_occurrence(command: &NextCommand) -> Result<()> {
    let next = next_date(&command.now, &command.date, &command.repeat)?;
    println!("{}", next);
    Ok(())
}
