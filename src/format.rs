//! Display helpers shared by the section views

use chrono::{DateTime, NaiveDate, NaiveDateTime};

pub const DAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Whole hours, e.g. `12h`
pub fn format_hours(seconds: i64) -> String {
    format!("{}h", seconds.max(0) / 3600)
}

/// Hours and minutes, e.g. `2h 5m`
pub fn format_hours_minutes(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
}

/// Clip length as the server formats it (`1h 2m 3s`, `4m 5s`, `6s`)
pub fn format_clip_duration(seconds: i64) -> String {
    if seconds <= 0 {
        return "Unknown".to_string();
    }
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}

/// Library size in GB from a sum of megabytes, e.g. `1.50GB`
pub fn format_storage_gb(total_mb: f64) -> String {
    // adding zero folds -0.0 into 0.0
    format!("{:.2}GB", total_mb / 1024.0 + 0.0)
}

/// Bytes as megabytes with two decimals
pub fn format_mb(bytes: u64) -> String {
    format!("{:.2}", bytes as f64 / 1024.0 / 1024.0)
}

/// Percentage with one decimal, e.g. `97.5%`
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

/// Parses the timestamp shapes the backend emits (naive ISO or RFC 3339)
fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&chrono::Local).naive_local());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
        .ok()
}

/// Date and time in the console's day-first layout; unparseable input is shown as-is
pub fn format_datetime(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(dt) => dt.format("%d/%m/%Y, %H.%M.%S").to_string(),
        None => raw.to_string(),
    }
}

/// Calendar date only
pub fn format_date(raw: &str) -> String {
    if let Some(dt) = parse_timestamp(raw) {
        return dt.format("%d/%m/%Y").to_string();
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => date.format("%d/%m/%Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Parses a form date (`YYYY-MM-DD`); blank or malformed input yields `None`
pub fn parse_form_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// True when both dates are set and the start falls after the end
pub fn start_after_end(start: &str, end: &str) -> bool {
    match (parse_form_date(start), parse_form_date(end)) {
        (Some(start), Some(end)) => start > end,
        _ => false,
    }
}

/// Decodes `"0,2,4"` into `"Mon, Wed, Fri"`. Out-of-range entries are skipped.
pub fn decode_days(days_of_week: &str) -> String {
    days_of_week
        .split(',')
        .filter_map(|d| d.trim().parse::<usize>().ok())
        .filter_map(|d| DAY_NAMES.get(d).copied())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Encodes checked weekdays as comma-joined indices
pub fn encode_days(days: &[bool; 7]) -> String {
    days.iter()
        .enumerate()
        .filter(|(_, checked)| **checked)
        .map(|(i, _)| i.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Colour band for a usage bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressLevel {
    Success,
    Warning,
    Danger,
}

impl ProgressLevel {
    pub fn for_percent(percent: f64) -> Self {
        if percent < 50.0 {
            ProgressLevel::Success
        } else if percent < 75.0 {
            ProgressLevel::Warning
        } else {
            ProgressLevel::Danger
        }
    }
}

pub fn platform_icon(platform_name: &str) -> &'static str {
    match platform_name {
        "youtube" => "📺",
        "facebook" => "👥",
        "twitch" => "🎮",
        _ => "📡",
    }
}

/// Ingest URL prefilled when a well-known platform is picked
pub fn rtmp_preset(platform_name: &str) -> Option<&'static str> {
    match platform_name {
        "youtube" => Some("rtmp://a.rtmp.youtube.com/live2/"),
        "facebook" => Some("rtmps://live-api-s.facebook.com:443/rtmp/"),
        "twitch" => Some("rtmp://live.twitch.tv/app/"),
        _ => None,
    }
}

/// Get current time as HH:MM:SS (local)
pub fn timestamp_now() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hours_minutes() {
        assert_eq!(format_hours(7199), "1h");
        assert_eq!(format_hours_minutes(3 * 3600 + 25 * 60 + 9), "3h 25m");
        assert_eq!(format_hours_minutes(0), "0h 0m");
        assert_eq!(format_hours_minutes(-5), "0h 0m");
    }

    #[test]
    fn test_clip_duration() {
        assert_eq!(format_clip_duration(0), "Unknown");
        assert_eq!(format_clip_duration(42), "42s");
        assert_eq!(format_clip_duration(125), "2m 5s");
        assert_eq!(format_clip_duration(3725), "1h 2m 5s");
    }

    #[test]
    fn test_storage() {
        assert_eq!(format_storage_gb(0.0), "0.00GB");
        assert_eq!(format_storage_gb(-0.0), "0.00GB");
        assert_eq!(format_storage_gb(1536.0), "1.50GB");
        assert_eq!(format_mb(3 * 1024 * 1024 / 2), "1.50");
    }

    #[test]
    fn test_datetime_layouts() {
        assert_eq!(format_datetime("2024-03-05T07:08:09"), "05/03/2024, 07.08.09");
        assert_eq!(format_datetime("2024-03-05T07:08:09.123456"), "05/03/2024, 07.08.09");
        assert_eq!(format_datetime("not a date"), "not a date");
        assert_eq!(format_date("2024-03-05T07:08:09"), "05/03/2024");
        assert_eq!(format_date("2024-12-31"), "31/12/2024");
    }

    #[test]
    fn test_offset_timestamps_shown_in_local_zone() {
        let raw = "2024-03-05T23:00:00+05:00";
        let expected = DateTime::parse_from_rfc3339(raw)
            .unwrap()
            .with_timezone(&chrono::Local)
            .format("%d/%m/%Y, %H.%M.%S")
            .to_string();
        assert_eq!(format_datetime(raw), expected);
    }

    #[test]
    fn test_date_ordering() {
        assert!(start_after_end("2024-05-02", "2024-05-01"));
        assert!(!start_after_end("2024-05-01", "2024-05-01"));
        assert!(!start_after_end("2024-05-01", ""));
        assert!(!start_after_end("", "2024-05-01"));
    }

    #[test]
    fn test_days() {
        assert_eq!(decode_days("0,2,4"), "Mon, Wed, Fri");
        assert_eq!(decode_days("6"), "Sun");
        assert_eq!(decode_days("1,9,x"), "Tue");
        assert_eq!(decode_days(""), "");
        assert_eq!(
            encode_days(&[true, false, true, false, false, false, true]),
            "0,2,6"
        );
    }

    #[test]
    fn test_progress_level() {
        assert_eq!(ProgressLevel::for_percent(49.9), ProgressLevel::Success);
        assert_eq!(ProgressLevel::for_percent(50.0), ProgressLevel::Warning);
        assert_eq!(ProgressLevel::for_percent(75.0), ProgressLevel::Danger);
    }

    #[test]
    fn test_platform_helpers() {
        assert_eq!(platform_icon("twitch"), "🎮");
        assert_eq!(platform_icon("kick"), "📡");
        assert_eq!(rtmp_preset("youtube"), Some("rtmp://a.rtmp.youtube.com/live2/"));
        assert_eq!(rtmp_preset("custom"), None);
    }
}
