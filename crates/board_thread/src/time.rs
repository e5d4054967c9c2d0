use chrono::{DateTime, Datelike, Utc};

/// Short age label for a comment, as shown next to the author's name.
///
/// Under an hour reads `just now`, under a day `Nh ago`, under a week
/// `Nd ago`. Older comments show the date, with the year only when it differs
/// from `now`'s.
pub fn relative_age(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let hours = (now - created_at).num_hours();

    if hours < 1 {
        "just now".to_string()
    } else if hours < 24 {
        format!("{hours}h ago")
    } else if hours < 168 {
        format!("{}d ago", hours / 24)
    } else if created_at.year() == now.year() {
        created_at.format("%b %-d").to_string()
    } else {
        created_at.format("%b %-d, %Y").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_recent_comments() {
        assert_eq!(relative_age(now() - Duration::minutes(59), now()), "just now");
        assert_eq!(relative_age(now() + Duration::minutes(5), now()), "just now");
        assert_eq!(relative_age(now() - Duration::hours(1), now()), "1h ago");
        assert_eq!(relative_age(now() - Duration::minutes(23 * 60 + 59), now()), "23h ago");
    }

    #[test]
    fn test_days() {
        assert_eq!(relative_age(now() - Duration::hours(24), now()), "1d ago");
        assert_eq!(relative_age(now() - Duration::hours(167), now()), "6d ago");
    }

    #[test]
    fn test_older_dates() {
        assert_eq!(relative_age(now() - Duration::hours(168), now()), "Jun 8");

        let last_year = Utc.with_ymd_and_hms(2023, 12, 3, 9, 30, 0).unwrap();
        assert_eq!(relative_age(last_year, now()), "Dec 3, 2023");
    }
}
