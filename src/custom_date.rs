use chrono::format::strftime::StrftimeItems;
use chrono::{DateTime, Utc};

pub fn format_rfc822(datetime: DateTime<Utc>) -> String {
    let format = StrftimeItems::new("%a, %d %b %Y %H:%M:%S %z");
    datetime.format_with_items(format).to_string()
}

/// Parses a GitHub API timestamp (`2024-03-01T12:00:00Z`).
///
/// Returns `None` for missing, empty or malformed values so a bad record
/// never aborts a refresh cycle.
pub fn parse_timestamp(date_str: Option<&str>) -> Option<DateTime<Utc>> {
    let date_str = date_str?.trim();
    if date_str.is_empty() {
        return None;
    }

    DateTime::parse_from_rfc3339(date_str)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn formats_rfc822_in_utc() {
        let dt = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 5).unwrap();
        assert_eq!(format_rfc822(dt), "Fri, 01 Mar 2024 12:30:05 +0000");
    }

    #[test]
    fn parses_github_timestamps() {
        let dt = parse_timestamp(Some("2024-03-01T12:30:05Z")).unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 5).unwrap());

        let offset = parse_timestamp(Some("2024-03-01T14:30:05+02:00")).unwrap();
        assert_eq!(offset, dt);
    }

    #[test]
    fn rejects_missing_or_malformed_timestamps() {
        assert_eq!(parse_timestamp(None), None);
        assert_eq!(parse_timestamp(Some("")), None);
        assert_eq!(parse_timestamp(Some("  ")), None);
        assert_eq!(parse_timestamp(Some("yesterday")), None);
    }
}
