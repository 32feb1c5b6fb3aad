// File: tests/cli_tests.rs
use clap::Parser;
use pomotask::cli::{Args, effective_log_level, parse_now, run};
use pomotask::config::Config;
use pomotask::context::{AppContext, TestContext};
use log::LevelFilter;

fn args(argv: &[&str]) -> Args {
    let mut full = vec!["pomotask", "--now", "2026-10-16T09:30"];
    full.extend_from_slice(argv);
    Args::try_parse_from(full).unwrap()
}

#[test]
fn test_describe_is_default_output() {
    let ctx = TestContext::new();
    let out = run(
        &args(&["Call", "John", "tomorrow", "at", "3pm", "#high", "~3", "@work"]),
        &ctx,
        &Config::default(),
    )
    .unwrap();
    assert_eq!(
        out,
        "Task: Call John\n\
         Priority: High\n\
         Due Date: October 17th, 2026 at 3:00 PM\n\
         Estimated Pomodoros: 3\n\
         Category: work"
    );
}

#[test]
fn test_json_output() {
    let ctx = TestContext::new();
    let out = run(
        &args(&["--json", "Water plants every 3 days #garden by tomorrow"]),
        &ctx,
        &Config::default(),
    )
    .unwrap();
    let v: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(v["title"], "Water plants");
    assert_eq!(v["tags"], serde_json::json!(["garden"]));
    assert_eq!(v["isRecurring"], true);
    assert_eq!(v["recurringType"], "daily");
    assert_eq!(v["recurringInterval"], 3);
    assert!(
        v["dueDate"]
            .as_str()
            .unwrap()
            .starts_with("2026-10-17T23:59:59")
    );
    assert!(v.get("priority").is_none());
}

#[test]
fn test_enhance_flags() {
    let ctx = TestContext::new();
    let plain = Config {
        enhance: false,
        ..Config::default()
    };
    let out = run(&args(&["Fix bug ASAP"]), &ctx, &plain).unwrap();
    assert_eq!(out, "Task: Fix bug ASAP");

    let out = run(&args(&["--enhance", "Fix bug ASAP"]), &ctx, &plain).unwrap();
    assert_eq!(out, "Task: Fix bug\nPriority: High");

    let out = run(
        &args(&["--no-enhance", "Fix bug ASAP"]),
        &ctx,
        &Config::default(),
    )
    .unwrap();
    assert_eq!(out, "Task: Fix bug ASAP");
}

#[test]
fn test_smart_output() {
    let ctx = TestContext::new();
    let out = run(
        &args(&["--smart", "--no-enhance", "Pay rent by next Monday #low"]),
        &ctx,
        &Config::default(),
    )
    .unwrap();
    assert_eq!(out, "Pay rent #low on 2026-10-19");
}

#[test]
fn test_tokens_output() {
    let ctx = TestContext::new();
    let out = run(&args(&["--tokens", "Read #high"]), &ctx, &Config::default()).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("Text"));
    assert!(lines[0].contains("\"Read \""));
    assert!(lines[1].starts_with("Priority"));
    assert!(lines[1].contains("\"#high\""));
}

#[test]
fn test_init_config_writes_file() {
    let ctx = TestContext::new();
    let argv = Args::try_parse_from(["pomotask", "--init-config"]).unwrap();
    let out = run(&argv, &ctx, &Config::default()).unwrap();
    assert!(out.starts_with("Wrote "));
    assert!(ctx.get_config_file_path().unwrap().exists());
    assert_eq!(Config::load(&ctx).unwrap(), Config::default());
}

#[test]
fn test_arguments_validation() {
    assert!(Args::try_parse_from(["pomotask"]).is_err());
    assert!(Args::try_parse_from(["pomotask", "--now", "yesterday", "x"]).is_err());
    assert!(Args::try_parse_from(["pomotask", "--json", "--smart", "x"]).is_err());
    assert!(Args::try_parse_from(["pomotask", "--enhance", "--no-enhance", "x"]).is_err());
}

#[test]
fn test_parse_now_formats() {
    assert!(parse_now("2026-10-16T09:30").is_ok());
    assert!(parse_now("2026-10-16T09:30:15").is_ok());
    assert!(parse_now("2026-10-16 09:30").is_ok());
    assert_eq!(
        parse_now("2026-10-16").unwrap().format("%H:%M").to_string(),
        "00:00"
    );
    assert!(parse_now("16/10/2026").is_err());
}

#[test]
fn test_verbosity() {
    let config = Config::default();
    assert_eq!(effective_log_level(0, &config), LevelFilter::Warn);
    assert_eq!(effective_log_level(1, &config), LevelFilter::Info);
    assert_eq!(effective_log_level(2, &config), LevelFilter::Debug);
    assert_eq!(effective_log_level(5, &config), LevelFilter::Trace);
}
