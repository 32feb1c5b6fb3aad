// File: tests/display_tests.rs
use chrono::{NaiveDate, NaiveDateTime};
use pomotask::model::{
    ParsedTask, Priority, Recurrence, RecurringType, TaskDisplay, describe, escape_title, parse_at,
};

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 16)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap()
}

fn parse(input: &str) -> ParsedTask {
    parse_at(input, now())
}

#[test]
fn test_describe_subset() {
    let task = ParsedTask {
        title: "X".to_string(),
        priority: Some(Priority::High),
        tags: vec!["work".to_string(), "report".to_string()],
        ..ParsedTask::default()
    };
    let out = describe(&task);
    assert!(out.contains("Task: X"));
    assert!(out.contains("Priority: High"));
    assert!(out.contains("Tags: work, report"));
    assert!(!out.contains("Due"));
    assert!(!out.contains("Estimated Pomodoros"));
    assert_eq!(out, "Task: X\nPriority: High\nTags: work, report");
}

#[test]
fn test_describe_all_fields_in_order() {
    let t = parse("Call John tomorrow at 3pm #high ~3 @work #phone every week");
    assert_eq!(
        t.describe(),
        "Task: Call John\n\
         Priority: High\n\
         Due Date: October 17th, 2026 at 3:00 PM\n\
         Estimated Pomodoros: 3\n\
         Category: work\n\
         Tags: phone\n\
         Recurring: weekly"
    );
}

#[test]
fn test_describe_date_only() {
    let out = parse("Pay rent by tomorrow").describe();
    assert_eq!(out, "Task: Pay rent\nDue Date: October 17th, 2026");
    assert!(!out.ends_with('\n'));
}

#[test]
fn test_describe_interval() {
    let out = parse("Sprint review every 2 weeks").describe();
    assert_eq!(out, "Task: Sprint review\nRecurring: weekly");
    assert!(out.lines().any(|l| l == "Recurring: weekly"));
}

#[test]
fn test_describe_skips_blank_fields() {
    let task = ParsedTask {
        title: "   ".to_string(),
        category: Some("  ".to_string()),
        tags: vec![" ".to_string(), String::new()],
        estimated_pomodoros: Some(2),
        ..ParsedTask::default()
    };
    assert_eq!(describe(&task), "Estimated Pomodoros: 2");
    assert_eq!(describe(&ParsedTask::default()), "");
}

#[test]
fn test_describe_title_and_priority_survive() {
    for p in [Priority::Low, Priority::Medium, Priority::High] {
        let input = format!("Write tests #{}", p);
        let out = parse(&input).describe();
        assert!(out.contains("Task: Write tests"));
        assert!(out.contains(&format!("Priority: {}", p.label())));
    }
}

// --- SMART STRING ---

#[test]
fn test_to_smart_string() {
    let t = parse("Call John tomorrow at 3pm #high ~3 @work #phone every week");
    assert_eq!(
        t.to_smart_string(),
        "Call John #high @work #phone ~3 on 2026-10-17 at 15:00 every week"
    );

    let bare = ParsedTask {
        recurrence: Some(Recurrence::new(RecurringType::Daily, 1)),
        ..ParsedTask::default()
    };
    assert_eq!(bare.to_smart_string(), "every day");
}

#[test]
fn test_smart_string_round_trip() {
    let inputs = [
        "Call John tomorrow at 3pm #high ~3 @work #phone every week",
        "Finish the quarterly financial report by next Friday #high ~4 @finance",
        "Water plants every 3 days #garden",
        "Call mom at 5pm",
        r"Discuss \#rust today",
        r"Say \today out loud #fun",
        r"Fix regex \d+ in parser",
        r"Keep C:\temp and a\b",
        r"Literal \#hash stays",
        r"Call home \at 5pm",
        "Meet at the cafe in 2 weeks #social",
        "",
    ];
    for input in inputs {
        let first = parse(input);
        let second = parse(&first.to_smart_string());
        assert_eq!(second, first, "input: {}", input);
    }
}

#[test]
fn test_escape_title() {
    assert_eq!(escape_title("Pay rent today #home"), r"Pay rent \today \#home");
    assert_eq!(escape_title("Call mom at 5pm"), r"Call mom \at 5pm");
    assert_eq!(escape_title("Fix login ASAP"), r"Fix login \ASAP");
    assert_eq!(escape_title("Plain words"), "Plain words");
    assert_eq!(escape_title(r"Fix regex \d+"), r"Fix regex \d+");
    assert_eq!(escape_title(r"Literal \#hash"), r"Literal \\#hash");
}

#[test]
fn test_backslash_title_round_trip() {
    let task = ParsedTask::new(r"Fix regex \d+");
    let smart = task.to_smart_string();
    assert_eq!(smart, r"Fix regex \d+");
    assert_eq!(parse(&smart).title, r"Fix regex \d+");

    let task = ParsedTask::new(r"Literal \#hash");
    assert_eq!(parse(&task.to_smart_string()).title, r"Literal \#hash");
}
