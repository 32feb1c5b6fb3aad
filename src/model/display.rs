// File: ./src/model/display.rs
use crate::model::item::ParsedTask;
use crate::model::parser::escape_title;
use chrono::{Datelike, NaiveDateTime};

pub trait TaskDisplay {
    fn describe(&self) -> String;
    fn to_smart_string(&self) -> String;
}

impl TaskDisplay for ParsedTask {
    /// Multi-line summary, one line per field that is set:
    ///
    /// ```text
    /// Task: Call John
    /// Priority: High
    /// Due Date: October 17th, 2026 at 3:00 PM
    /// Estimated Pomodoros: 3
    /// Category: work
    /// Tags: phone, clients
    /// Recurring: weekly
    /// ```
    fn describe(&self) -> String {
        let mut lines = Vec::new();

        let title = self.title.trim();
        if !title.is_empty() {
            lines.push(format!("Task: {}", title));
        }
        if let Some(p) = self.priority {
            lines.push(format!("Priority: {}", p.label()));
        }
        if let Some(due) = self.due_date {
            let mut when = format_long_date(due);
            if self.has_due_time() {
                when.push_str(&format!(" at {}", due.format("%-I:%M %p")));
            }
            lines.push(format!("Due Date: {}", when));
        }
        if let Some(n) = self.estimated_pomodoros {
            lines.push(format!("Estimated Pomodoros: {}", n));
        }
        if let Some(cat) = self
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
        {
            lines.push(format!("Category: {}", cat));
        }
        let tags: Vec<&str> = self
            .tags
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .collect();
        if !tags.is_empty() {
            lines.push(format!("Tags: {}", tags.join(", ")));
        }
        if let Some(r) = self.recurrence {
            lines.push(format!("Recurring: {}", r.kind));
        }

        lines.join("\n")
    }

    // Convert task back to smart input (e.g. "Buy milk #high @home ~2 on 2026-10-17")
    fn to_smart_string(&self) -> String {
        let mut s = escape_title(self.title.trim());
        if let Some(p) = self.priority {
            s.push_str(&format!(" #{}", p));
        }
        if let Some(cat) = &self.category {
            s.push_str(&format!(" @{}", cat));
        }
        for tag in &self.tags {
            s.push_str(&format!(" #{}", tag));
        }
        if let Some(n) = self.estimated_pomodoros {
            s.push_str(&format!(" ~{}", n));
        }
        if let Some(due) = self.due_date {
            s.push_str(&format!(" on {}", due.format("%Y-%m-%d")));
            if self.has_due_time() {
                s.push_str(&format!(" at {}", due.format("%H:%M")));
            }
        }
        if let Some(r) = self.recurrence {
            s.push_str(&format!(" {}", r.phrase()));
        }
        s.trim_start().to_string()
    }
}

/// Renders `task` as a human-readable, newline-joined description.
pub fn describe(task: &ParsedTask) -> String {
    task.describe()
}

/// "October 17th, 2026"
pub fn format_long_date(dt: NaiveDateTime) -> String {
    let day = dt.day();
    let suffix = match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{} {}{}, {}", dt.format("%B"), day, suffix, dt.year())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn ordinal_suffixes() {
        assert_eq!(format_long_date(at(2026, 10, 1)), "October 1st, 2026");
        assert_eq!(format_long_date(at(2026, 10, 2)), "October 2nd, 2026");
        assert_eq!(format_long_date(at(2026, 10, 3)), "October 3rd, 2026");
        assert_eq!(format_long_date(at(2026, 10, 11)), "October 11th, 2026");
        assert_eq!(format_long_date(at(2026, 10, 12)), "October 12th, 2026");
        assert_eq!(format_long_date(at(2026, 10, 13)), "October 13th, 2026");
        assert_eq!(format_long_date(at(2026, 10, 22)), "October 22nd, 2026");
        assert_eq!(format_long_date(at(2026, 10, 31)), "October 31st, 2026");
    }
}
