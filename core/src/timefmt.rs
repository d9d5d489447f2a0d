//! 24-hour to 12-hour clock formatting for submission payloads.

/// Rewrite `HH:MM` as `h:MM AM|PM`.
///
/// Empty input stays empty. Input that does not look like a 24-hour
/// clock time (no colon, non-numeric hour, hour above 23) is returned
/// unchanged, so date-valued fields sharing the schedule section pass
/// through the submission pass untouched. Form state always holds the
/// raw 24-hour string; this runs at submission time only.
pub fn to_12_hour(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    let Some((hour_part, minute_part)) = value.split_once(':') else {
        return value.to_string();
    };
    let Ok(hour) = hour_part.parse::<u32>() else {
        return value.to_string();
    };
    if hour > 23 {
        return value.to_string();
    }
    let suffix = if hour < 12 { "AM" } else { "PM" };
    let display_hour = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{display_hour}:{minute_part} {suffix}")
}
