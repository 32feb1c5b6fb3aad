// File: ./src/model/enhance.rs
//! Keyword heuristics layered over the marker parser.
//!
//! The enhancer only fills gaps: a field the parser set to a non-default value is
//! never replaced or downgraded.
use crate::model::clock::Clock;
use crate::model::item::{ParsedTask, Priority};
use crate::model::parser::{ParseOptions, parse_smart_input};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const HIGH_PRIORITY_KEYWORDS: &[&str] =
    &["urgent", "asap", "important", "critical", "high priority"];
pub const LOW_PRIORITY_KEYWORDS: &[&str] =
    &["not urgent", "can wait", "low priority", "whenever", "someday"];
pub const CATEGORY_KEYWORDS: &[&str] = &[
    "work", "personal", "home", "health", "finance", "study", "project",
];

/// Length of one pomodoro in minutes.
pub const POMODORO_MINUTES: f64 = 25.0;

static DURATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\d+(?:\.\d+)?)\s*(hours?|hrs?|minutes?|mins?)\b")
        .expect("duration rule must be a valid regex")
});

/// Read-only keyword tables consulted by the enhancer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    pub high_priority: Vec<String>,
    pub low_priority: Vec<String>,
    pub categories: Vec<String>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        let owned = |words: &[&str]| -> Vec<String> { words.iter().map(|w| w.to_string()).collect() };
        Self {
            high_priority: owned(HIGH_PRIORITY_KEYWORDS),
            low_priority: owned(LOW_PRIORITY_KEYWORDS),
            categories: owned(CATEGORY_KEYWORDS),
        }
    }
}

impl Vocabulary {
    fn is_category(&self, word: &str) -> bool {
        self.categories.iter().any(|c| c.eq_ignore_ascii_case(word))
    }
}

/// Pomodoros needed for a "<n> hours" / "<n> min" phrase, rounded up.
pub fn pomodoros_for_duration(amount: f64, unit: &str) -> Option<u32> {
    if !amount.is_finite() || amount < 0.0 {
        return None;
    }
    let minutes = if unit.to_lowercase().starts_with('h') {
        amount * 60.0
    } else {
        amount
    };
    let units = (minutes / POMODORO_MINUTES).ceil();
    if units > f64::from(u32::MAX) {
        return None;
    }
    Some(units as u32)
}

fn contains_any(haystack: &str, words: &[String]) -> bool {
    words
        .iter()
        .any(|w| !w.is_empty() && haystack.contains(&w.to_lowercase()))
}

fn can_raise_priority(task: &ParsedTask) -> bool {
    matches!(task.priority, None | Some(Priority::Medium))
}

/// Fills fields the parser left unset using keyword heuristics over `input`.
pub fn enhance(input: &str, mut task: ParsedTask, vocabulary: &Vocabulary) -> ParsedTask {
    let lower = input.to_lowercase();

    // 1. Duration phrases
    if task.estimated_pomodoros.is_none()
        && let Some(caps) = DURATION_RE.captures(input)
        && let Ok(amount) = caps[1].parse::<f64>()
        && let Some(n) = pomodoros_for_duration(amount, &caps[2])
    {
        log::debug!("enhance: '{}' -> {} pomodoro(s)", &caps[0], n);
        task.estimated_pomodoros = Some(n);
    }

    // 2. Priority keywords, high wins over low
    if can_raise_priority(&task) {
        if contains_any(&lower, &vocabulary.high_priority) {
            task.priority = Some(Priority::High);
        } else if contains_any(&lower, &vocabulary.low_priority) {
            task.priority = Some(Priority::Low);
        }
    }

    // 3. Category keywords
    if task.category.is_none() {
        task.category = vocabulary
            .categories
            .iter()
            .find(|c| !c.is_empty() && lower.contains(&c.to_lowercase()))
            .cloned();
    }

    // 4. Tags
    if can_raise_priority(&task) && task.tags.iter().any(|t| t.eq_ignore_ascii_case("urgent")) {
        task.priority = Some(Priority::High);
    }
    if task.category.is_none() {
        task.category = task
            .tags
            .iter()
            .find(|t| vocabulary.is_category(t))
            .cloned();
    }

    log::debug!(
        "enhance: priority={:?} category={:?} pomodoros={:?}",
        task.priority,
        task.category,
        task.estimated_pomodoros
    );
    task
}

/// Marker parsing with "ASAP" recognised, followed by `enhance`.
pub fn parse_enhanced(input: &str, clock: &dyn Clock, vocabulary: &Vocabulary) -> ParsedTask {
    let options = ParseOptions { asap_marker: true };
    let task = parse_smart_input(input, clock, options);
    enhance(input, task, vocabulary)
}
