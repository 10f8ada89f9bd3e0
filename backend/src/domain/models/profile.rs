use chrono::{DateTime, NaiveTime, Utc};
use shared::Weekday;

/// Format used for availability start/end times
pub const TIME_OF_DAY_FORMAT: &str = "%H:%M";

/// Weekly availability of a handyman
#[derive(Debug, Clone, PartialEq)]
pub struct Availability {
    pub days: Vec<Weekday>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
}

impl Availability {
    /// Record used when a stored profile has no availability at all
    pub fn unset() -> Self {
        Self {
            days: Vec::new(),
            start_time: None,
            end_time: None,
        }
    }

    /// Working hours a new profile starts with: no days, 09:00 to 17:00
    pub fn default_hours() -> Self {
        Self {
            days: Vec::new(),
            start_time: NaiveTime::from_hms_opt(9, 0, 0),
            end_time: NaiveTime::from_hms_opt(17, 0, 0),
        }
    }

    pub fn parse_time(value: &str) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(value.trim(), TIME_OF_DAY_FORMAT).ok()
    }

    pub fn format_time(time: &NaiveTime) -> String {
        time.format(TIME_OF_DAY_FORMAT).to_string()
    }

    /// Human-readable summary, e.g. "Available on Monday, Friday from 09:00 to 17:00"
    pub fn summary(availability: Option<&Availability>) -> String {
        let Some(availability) = availability else {
            return "Availability not set".to_string();
        };

        if availability.days.is_empty() {
            return "No specific days set".to_string();
        }

        let days = availability
            .days
            .iter()
            .map(|day| day.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        match (&availability.start_time, &availability.end_time) {
            (Some(start), Some(end)) => format!(
                "Available on {} from {} to {}",
                days,
                Self::format_time(start),
                Self::format_time(end)
            ),
            _ => format!("Available on {}", days),
        }
    }
}

/// A service professional's listing.
///
/// Profiles are loosely-typed documents: name, skills and the numeric fields may
/// be absent in stored data and every reader has to cope with that.
#[derive(Debug, Clone, PartialEq)]
pub struct HandymanProfile {
    pub id: String,
    pub user_id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub experience: Option<f64>,
    pub hourly_rate: Option<f64>,
    pub bio: String,
    pub location: String,
    pub skills: Option<Vec<String>>,
    pub availability: Option<Availability>,
    pub is_available: bool,
    pub rating: f64,
    pub reviews: u32,
    pub created_at: Option<DateTime<Utc>>,
}

impl HandymanProfile {
    pub fn generate_id() -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }

    pub fn has_skill(&self, tag: &str) -> bool {
        self.skills
            .as_ref()
            .map(|skills| skills.iter().any(|skill| skill == tag))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_without_record() {
        assert_eq!(Availability::summary(None), "Availability not set");
    }

    #[test]
    fn test_summary_without_days() {
        let availability = Availability::default_hours();
        assert_eq!(Availability::summary(Some(&availability)), "No specific days set");
    }

    #[test]
    fn test_summary_with_days_and_hours() {
        let availability = Availability {
            days: vec![Weekday::Monday, Weekday::Friday],
            ..Availability::default_hours()
        };
        assert_eq!(
            Availability::summary(Some(&availability)),
            "Available on Monday, Friday from 09:00 to 17:00"
        );
    }

    #[test]
    fn test_summary_with_days_only() {
        let availability = Availability {
            days: vec![Weekday::Saturday],
            start_time: None,
            end_time: None,
        };
        assert_eq!(Availability::summary(Some(&availability)), "Available on Saturday");
    }

    #[test]
    fn test_parse_time() {
        assert_eq!(Availability::parse_time("08:30"), NaiveTime::from_hms_opt(8, 30, 0));
        assert_eq!(Availability::parse_time("8:30pm"), None);
    }
}
