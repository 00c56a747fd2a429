use anyhow::Result;
use chrono::{Duration, NaiveDate};
use chrono_humanize::HumanTime;
use serde::Serialize;

/// Describes `date` relative to `today` ("today", "in 3 days", "2 weeks ago").
pub fn relative_date(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        0 => "today".to_string(),
        1 => "tomorrow".to_string(),
        -1 => "yesterday".to_string(),
        days => HumanTime::from(Duration::days(days)).to_string(),
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Maps an optional CLI value plus a `--clear-*` flag onto a partial update.
pub fn optional_change(value: Option<String>, clear: bool) -> Option<Option<String>> {
    if clear {
        Some(None)
    } else {
        value.map(Some)
    }
}
