//! Display formatting shared by the views and the CLI.

use chrono::Datelike;

/// Minutes as `"{h}h {m}m"`, both parts floored. 125 -> "2h 5m".
pub fn format_time(minutes: f64) -> String {
    let minutes = if minutes.is_finite() { minutes.max(0.0) } else { 0.0 };
    let hours = (minutes / 60.0).floor() as u64;
    let mins = (minutes % 60.0).floor() as u64;
    format!("{hours}h {mins}m")
}

/// en-US grouping with at most three fraction digits: 1234567.25 -> "1,234,567.25".
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let rendered = format!("{:.3}", value.abs());
    let (int_part, frac_part) = rendered.split_once('.').unwrap_or((rendered.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let negative = value < 0.0 && (int_part != "0" || !frac_part.is_empty());
    let sign = if negative { "-" } else { "" };
    if frac_part.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac_part}")
    }
}

/// en-US short date, `M/D/YYYY`.
pub fn format_date<D: Datelike>(date: &D) -> String {
    format!("{}/{}/{}", date.month(), date.day(), date.year())
}
