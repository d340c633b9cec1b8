use anyhow::Result;
use cadence_core::dates;
use cadence_core::recurrence::next_date;

use crate::cli::NextDateCommand;
use crate::util::today;

/// Prints the next occurrence for the given anchor and rule.
pub fn print_next_date(command: NextDateCommand) -> Result<()> {
    let now = match command.now.as_deref().map(str::trim) {
        None | Some("") => today(),
        Some(text) => dates::parse_date(text)?,
    };

    let next = next_date(now, &command.date, &command.repeat)?;
    println!("{}", dates::format_date(next));
    Ok(())
}
