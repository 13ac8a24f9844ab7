use chrono::{DateTime, Utc};

pub fn format_duration(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.1}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1000;
        format!("{}m {}s", mins, secs)
    }
}

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%d/%m/%Y %H:%M UTC").to_string()
}
