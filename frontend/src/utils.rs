use chrono::{DateTime, Utc};

pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn format_date_time(date: &DateTime<Utc>) -> String {
    date.format("%Y-%m-%d %H:%M").to_string()
}

// Formats each x1000 step
pub fn format_number(number: u64) -> String {
    let num_str = number.to_string();
    let mut result = String::new();
    let len = num_str.len();

    for (i, c) in num_str.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}

/// 1234 -> "1.2K", 3_400_000 -> "3.4M".
pub fn format_compact(number: u64) -> String {
    // The unit is picked after rounding to one decimal, so 999_950 is "1.0M".
    let tenths_of_thousands = (number as f64 / 100.0).round();
    if number >= 1_000_000 || tenths_of_thousands >= 10_000.0 {
        format!("{:.1}M", number as f64 / 1_000_000.0)
    } else if number >= 1_000 {
        format!("{:.1}K", number as f64 / 1_000.0)
    } else {
        number.to_string()
    }
}

/// `mm:ss`, e.g. 95 -> "01:35".
pub fn format_duration(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
