// File: ./src/model/item.rs
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    /// Capitalized name, as shown in task descriptions ("High").
    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Eq,
    PartialEq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum RecurringType {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl RecurringType {
    pub fn unit(&self) -> &'static str {
        match self {
            RecurringType::Daily => "day",
            RecurringType::Weekly => "week",
            RecurringType::Monthly => "month",
            RecurringType::Yearly => "year",
        }
    }

    /// Maps "day", "weeks", "Month"... to a recurrence type.
    pub fn from_unit(unit: &str) -> Option<Self> {
        let lower = unit.to_lowercase();
        match lower.trim_end_matches('s') {
            "day" => Some(RecurringType::Daily),
            "week" => Some(RecurringType::Weekly),
            "month" => Some(RecurringType::Monthly),
            "year" => Some(RecurringType::Yearly),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Recurrence {
    pub kind: RecurringType,
    pub interval: u32,
}

impl Recurrence {
    pub fn new(kind: RecurringType, interval: u32) -> Self {
        Self {
            kind,
            interval: interval.max(1),
        }
    }

    /// "every day", "every 3 weeks"
    pub fn phrase(&self) -> String {
        if self.interval <= 1 {
            format!("every {}", self.kind.unit())
        } else {
            format!("every {} {}s", self.interval, self.kind.unit())
        }
    }
}

/// The structured result of reading one line of smart input.
///
/// `recurrence` folds the `isRecurring` / `recurringType` / `recurringInterval`
/// triple into a single optional value; the wire format keeps the flat view.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(into = "TaskRecord", from = "TaskRecord")]
pub struct ParsedTask {
    pub title: String,
    pub priority: Option<Priority>,
    pub due_date: Option<NaiveDateTime>,
    pub estimated_pomodoros: Option<u32>,
    pub tags: Vec<String>,
    pub category: Option<String>,
    pub recurrence: Option<Recurrence>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskRecord {
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    due_date: Option<NaiveDateTime>,
    #[serde(
        default,
        rename = "estimatedEffortUnits",
        skip_serializing_if = "Option::is_none"
    )]
    estimated_pomodoros: Option<u32>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    is_recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    recurring_type: Option<RecurringType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    recurring_interval: Option<u32>,
}

impl From<ParsedTask> for TaskRecord {
    fn from(task: ParsedTask) -> Self {
        Self {
            title: task.title,
            priority: task.priority,
            due_date: task.due_date,
            estimated_pomodoros: task.estimated_pomodoros,
            tags: task.tags,
            category: task.category,
            is_recurring: task.recurrence.is_some(),
            recurring_type: task.recurrence.map(|r| r.kind),
            recurring_interval: task.recurrence.map(|r| r.interval),
        }
    }
}

impl From<TaskRecord> for ParsedTask {
    fn from(rec: TaskRecord) -> Self {
        let recurrence = match (rec.is_recurring, rec.recurring_type) {
            (true, Some(kind)) => Some(Recurrence::new(kind, rec.recurring_interval.unwrap_or(1))),
            _ => None,
        };
        Self {
            title: rec.title,
            priority: rec.priority,
            due_date: rec.due_date,
            estimated_pomodoros: rec.estimated_pomodoros,
            tags: rec.tags,
            category: rec.category,
            recurrence,
        }
    }
}

impl ParsedTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn is_recurring(&self) -> bool {
        self.recurrence.is_some()
    }

    pub fn recurring_type(&self) -> Option<RecurringType> {
        self.recurrence.map(|r| r.kind)
    }

    pub fn recurring_interval(&self) -> Option<u32> {
        self.recurrence.map(|r| r.interval)
    }

    /// True when the due date carries an explicit clock time rather than the
    /// end-of-day default.
    pub fn has_due_time(&self) -> bool {
        self.due_date.is_some_and(|d| !is_end_of_day(d))
    }
}

// --- DATE HELPERS ---

/// 23:59:59.999, the time given to deadlines that only name a day.
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    NaiveTime::from_hms_milli_opt(23, 59, 59, 999)
        .map_or_else(|| date.and_time(NaiveTime::MIN), |t| date.and_time(t))
}

pub fn is_end_of_day(dt: NaiveDateTime) -> bool {
    dt.hour() == 23 && dt.minute() == 59 && dt.second() == 59
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn priority_names() {
        assert_eq!(Priority::from_str("HIGH").unwrap(), Priority::High);
        assert_eq!(Priority::Medium.to_string(), "medium");
        assert_eq!(Priority::Low.label(), "Low");
        assert!(Priority::High > Priority::Medium);
    }

    #[test]
    fn recurrence_units() {
        assert_eq!(RecurringType::from_unit("Weeks"), Some(RecurringType::Weekly));
        assert_eq!(RecurringType::from_unit("fortnight"), None);
        assert_eq!(Recurrence::new(RecurringType::Daily, 0).interval, 1);
        assert_eq!(
            Recurrence::new(RecurringType::Monthly, 2).phrase(),
            "every 2 months"
        );
        assert_eq!(Recurrence::new(RecurringType::Yearly, 1).phrase(), "every year");
    }

    #[test]
    fn end_of_day_is_last_millisecond() {
        let d = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        let eod = end_of_day(d);
        assert_eq!(eod.format("%H:%M:%S%.3f").to_string(), "23:59:59.999");
        assert!(is_end_of_day(eod));
    }

    #[test]
    fn effort_uses_data_model_key() {
        let task = ParsedTask {
            estimated_pomodoros: Some(4),
            ..ParsedTask::new("Write")
        };
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["estimatedEffortUnits"], 4);
        assert!(json.get("estimatedPomodoros").is_none());

        let back: ParsedTask =
            serde_json::from_str(r#"{"title":"Write","estimatedEffortUnits":4}"#).unwrap();
        assert_eq!(back, task);
    }

    #[test]
    fn serializes_flat_recurrence_fields() {
        let task = ParsedTask {
            title: "Water plants".to_string(),
            recurrence: Some(Recurrence::new(RecurringType::Weekly, 2)),
            ..ParsedTask::default()
        };
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["recurringType"], "weekly");
        assert_eq!(json["recurringInterval"], 2);
        assert_eq!(json["isRecurring"], true);
        assert_eq!(json["tags"], serde_json::json!([]));
        assert!(json.get("priority").is_none());
        assert!(task.is_recurring());

        let back: ParsedTask = serde_json::from_value(json).unwrap();
        assert_eq!(back, task);
    }
}
