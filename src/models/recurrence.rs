use chrono::{Datelike, Duration, NaiveDate};

use crate::models::event::Event;

// Weekday names accepted in recurrence requests, numbered from monday = 0.
// Anything else is not an error: the name simply produces no events.
pub fn weekday_number(day: &str) -> Option<i64> {
    match day.to_lowercase().as_str() {
        "monday" => Some(0),
        "tuesday" => Some(1),
        "wednesday" => Some(2),
        "thursday" => Some(3),
        "friday" => Some(4),
        "saturday" => Some(5),
        "sunday" => Some(6),
        _ => None,
    }
}

// Expands a weekly pattern into concrete dated events, grouped by requested
// day, dates ascending within each group. The first occurrence is the next
// matching weekday strictly after today: asking for a monday on a monday
// yields the monday a week out, never today.
pub fn expand_weekly(
    description: &str,
    time: &str,
    days: &[String],
    count: u32,
    today: NaiveDate,
) -> Result<Vec<Event>, String> {
    if days.is_empty() {
        return Err("Days are required for recurring events.".to_string());
    }

    let today_number = today.weekday().num_days_from_monday() as i64;
    let mut events = Vec::new();
    for day in days {
        let Some(day_number) = weekday_number(day) else {
            continue;
        };
        let mut days_ahead = (day_number - today_number).rem_euclid(7);
        if days_ahead == 0 {
            days_ahead = 7;
        }
        let mut date = today + Duration::days(days_ahead);
        for _ in 0..count {
            events.push(Event {
                description: description.to_string(),
                date: date.format("%Y-%m-%d").to_string(),
                time: time.to_string(),
            });
            date = date + Duration::days(7);
        }
    }
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn days(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    // 2024-05-01 is a wednesday.
    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    #[test]
    fn first_occurrence_is_next_matching_weekday() {
        let events = expand_weekly("yoga", "07:00", &days(&["monday"]), 2, today()).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].date, "2024-05-06");
        assert_eq!(events[1].date, "2024-05-13");
        assert_eq!(events[0].description, "yoga");
        assert_eq!(events[0].time, "07:00");
    }

    #[test]
    fn same_weekday_rolls_a_full_week_forward() {
        let monday = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap();
        let events = expand_weekly("standup", "09:00", &days(&["monday"]), 1, monday).unwrap();
        assert_eq!(events[0].date, "2024-05-13");
    }

    #[test]
    fn output_grouped_by_requested_day_order() {
        let events =
            expand_weekly("gym", "18:00", &days(&["wednesday", "monday"]), 2, today()).unwrap();
        let dates: Vec<&str> = events.iter().map(|event| event.date.as_str()).collect();
        assert_eq!(
            dates,
            vec!["2024-05-08", "2024-05-15", "2024-05-06", "2024-05-13"]
        );
    }

    #[test]
    fn occurrences_per_day_stride_seven_days() {
        let events = expand_weekly("gk", "20:00", &days(&["friday"]), 3, today()).unwrap();
        assert_eq!(events[0].date, "2024-05-03");
        assert_eq!(events[1].date, "2024-05-10");
        assert_eq!(events[2].date, "2024-05-17");
    }

    #[test]
    fn unrecognized_day_names_are_skipped_silently() {
        let events =
            expand_weekly("gym", "18:00", &days(&["funday", "monday"]), 1, today()).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].date, "2024-05-06");
    }

    #[test]
    fn day_names_match_case_insensitively() {
        let events = expand_weekly("gym", "18:00", &days(&["Monday"]), 1, today()).unwrap();
        assert_eq!(events[0].date, "2024-05-06");
    }

    #[test]
    fn empty_day_list_is_rejected() {
        let result = expand_weekly("gym", "18:00", &[], 2, today());
        assert_eq!(
            result.unwrap_err(),
            "Days are required for recurring events."
        );
    }
}
