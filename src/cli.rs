// File: ./src/cli.rs
//! Command-line front end: argument definitions, logging setup and rendering.
use crate::config::Config;
use crate::context::AppContext;
use crate::model::{
    Clock, FixedClock, ParsedTask, SystemClock, TaskDisplay, parse_enhanced, parse_smart_input,
    tokenize_smart_input,
};
use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use clap::{ArgAction, Parser};
use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};
use std::path::PathBuf;

const SYNTAX_HELP: &str = "\
SMART INPUT SYNTAX:
    #high #low        Priority (#important, #urgent = high; #medium)
    #tag              Add a tag
    @category         Set the category (first one wins)
    ~3, 3 pomodoros   Estimated pomodoros (25 min each)
    today, tomorrow   Due date, end of day (\"by tomorrow\" works too)
    next friday       Next occurrence, strictly after today (also: next week)
    in 3 days         Relative due date (days or weeks)
    on 2026-12-31     Absolute due date
    at 3pm, at 15:30  Time of day, when a due date is given
    every 2 weeks     Recurrence (day, week, month, year; \"every other week\")
    \\#text            Escape special characters

EXAMPLES:
    pomotask Call John tomorrow at 3pm #high ~3 @work
    pomotask --json Finish the report by next Friday #high ~4 @finance
    pomotask --now 2026-10-16T09:00 Water plants every 3 days";

#[derive(Parser, Debug, Default)]
#[command(
    name = "pomotask",
    version,
    about = "Turn a line of natural language into a structured Pomodoro task",
    after_help = SYNTAX_HELP
)]
pub struct Args {
    /// Task text, e.g. "Call John tomorrow at 3pm #high ~3 @work"
    #[arg(required_unless_present = "init_config")]
    pub text: Vec<String>,

    /// Print the parsed task as JSON
    #[arg(long, conflicts_with_all = ["smart", "tokens"])]
    pub json: bool,

    /// Print the task re-encoded as smart input
    #[arg(long, conflicts_with = "tokens")]
    pub smart: bool,

    /// Print the syntax tokens of the input
    #[arg(long)]
    pub tokens: bool,

    /// Apply keyword heuristics (overrides the config)
    #[arg(long, conflicts_with = "no_enhance")]
    pub enhance: bool,

    /// Skip keyword heuristics (overrides the config)
    #[arg(long)]
    pub no_enhance: bool,

    /// Resolve relative dates against this time instead of the system clock
    #[arg(long, value_name = "YYYY-MM-DDTHH:MM", value_parser = parse_now)]
    pub now: Option<NaiveDateTime>,

    /// Use a different directory for config
    #[arg(short, long, value_name = "PATH")]
    pub root: Option<PathBuf>,

    /// Write a default config file and exit
    #[arg(long)]
    pub init_config: bool,

    /// More logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

pub fn parse_now(s: &str) -> Result<NaiveDateTime, String> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    for fmt in FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|d| d.and_time(chrono::NaiveTime::MIN))
        .map_err(|_| format!("invalid time '{}', expected YYYY-MM-DDTHH:MM", s))
}

/// `-v` flags win over the config's `log_level`.
pub fn effective_log_level(verbose: u8, config: &Config) -> LevelFilter {
    match verbose {
        0 => config.log_level_filter(),
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Logs go to stderr so stdout stays machine-readable.
pub fn init_logging(level: LevelFilter) {
    let log_config = ConfigBuilder::new().set_target_level(LevelFilter::Error).build();
    if let Err(e) = TermLogger::init(level, log_config, TerminalMode::Stderr, ColorChoice::Auto) {
        eprintln!("Failed to initialize logger: {}", e);
    }
}

fn parse_task(args: &Args, config: &Config, input: &str) -> ParsedTask {
    let clock: Box<dyn Clock> = match args.now {
        Some(now) => Box::new(FixedClock(now)),
        None => Box::new(SystemClock),
    };
    let use_enhance = if args.enhance {
        true
    } else if args.no_enhance {
        false
    } else {
        config.enhance
    };
    log::info!("Parsing '{}' (enhance: {})", input, use_enhance);
    if use_enhance {
        parse_enhanced(input, clock.as_ref(), &config.vocabulary())
    } else {
        parse_smart_input(input, clock.as_ref(), config.parse_options())
    }
}

fn render_tokens(input: &str) -> String {
    tokenize_smart_input(input)
        .into_iter()
        .map(|t| {
            format!(
                "{:<10} {:>3}..{:<3} {:?}",
                format!("{:?}", t.kind),
                t.start,
                t.end,
                &input[t.start..t.end]
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Executes one invocation and returns what should be printed on stdout.
pub fn run(args: &Args, ctx: &dyn AppContext, config: &Config) -> Result<String> {
    if args.init_config {
        config.save(ctx)?;
        return Ok(format!("Wrote {}", Config::get_path_string(ctx)?));
    }

    let input = args.text.join(" ");
    if args.tokens {
        return Ok(render_tokens(&input));
    }

    let task = parse_task(args, config, &input);
    if args.json {
        Ok(serde_json::to_string_pretty(&task)?)
    } else if args.smart {
        Ok(task.to_smart_string())
    } else {
        Ok(task.describe())
    }
}
