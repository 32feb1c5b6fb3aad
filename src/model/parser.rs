// File: ./src/model/parser.rs
use crate::model::clock::{Clock, FixedClock, SystemClock};
use crate::model::item::{ParsedTask, Priority, Recurrence, RecurringType, end_of_day};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use once_cell::sync::Lazy;
use regex::Regex;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SyntaxType {
    Text,
    Priority,
    DueDate,
    Tag,
    Effort,
    Category,
    Recurrence,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxToken {
    pub kind: SyntaxType,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Read a free-standing "ASAP" as a high priority marker.
    pub asap_marker: bool,
}

const MARKER_CHARS: [char; 3] = ['#', '@', '~'];

// --- RULE TABLES ---

static PRIORITY_RE: Lazy<Regex> =
    Lazy::new(|| rule(r"(?i)#(high|important|urgent|medium|low)\b"));
static ASAP_RE: Lazy<Regex> = Lazy::new(|| rule(r"(?i)\basap\b"));

static TODAY_RE: Lazy<Regex> = Lazy::new(|| rule(r"(?i)\b(?:by\s+)?today\b"));
static TOMORROW_RE: Lazy<Regex> = Lazy::new(|| rule(r"(?i)\b(?:by\s+)?tomorrow\b"));
static NEXT_RE: Lazy<Regex> = Lazy::new(|| {
    rule(
        r"(?i)\b(?:by\s+)?next\s+(monday|mon|tuesday|tues|tue|wednesday|wed|thursday|thurs|thur|thu|friday|fri|saturday|sat|sunday|sun|week)\b",
    )
});
static IN_RE: Lazy<Regex> = Lazy::new(|| {
    rule(
        r"(?i)\b(?:by\s+)?in\s+(\d+|one|two|three|four|five|six|seven|eight|nine|ten|eleven|twelve)\s+(days?|weeks?)\b",
    )
});
static ISO_DATE_RE: Lazy<Regex> =
    Lazy::new(|| rule(r"(?i)\b(?:(?:on|by)\s+)?(\d{4})-(\d{2})-(\d{2})\b"));
static TIME_RE: Lazy<Regex> =
    Lazy::new(|| rule(r"(?i)\bat\s+(\d{1,2})(?::(\d{2}))?\s*(am|pm)?\b"));

static TAG_RE: Lazy<Regex> = Lazy::new(|| rule(r"#(\w+)"));

static TILDE_EFFORT_RE: Lazy<Regex> = Lazy::new(|| rule(r"~(\d+(?:\.\d+)?)\b"));
static POMODORO_RE: Lazy<Regex> = Lazy::new(|| rule(r"(?i)\b(\d+)\s*pomodoros?\b"));

static CATEGORY_RE: Lazy<Regex> = Lazy::new(|| rule(r"@(\w+)"));

static RECURRENCE_RE: Lazy<Regex> = Lazy::new(|| {
    rule(
        r"(?i)\bevery\s+(?:(\d+|one|two|three|four|five|six|seven|eight|nine|ten|eleven|twelve|other)\s+)?(days?|weeks?|months?|years?)\b",
    )
});

fn rule(pattern: &str) -> Regex {
    Regex::new(pattern).expect("smart input rule must be a valid regex")
}

// --- INTERMEDIATE REPRESENTATION ---

/// A date phrase before it is resolved against "today".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DatePhrase {
    Today,
    Tomorrow,
    Next(Weekday),
    NextWeek,
    InDays(i64),
    On(NaiveDate),
}

impl DatePhrase {
    // When several phrases appear, the highest rank wins; ties go to the later one.
    fn rank(&self) -> u8 {
        match self {
            DatePhrase::Today => 0,
            DatePhrase::Tomorrow => 1,
            DatePhrase::Next(_) | DatePhrase::NextWeek => 2,
            DatePhrase::InDays(_) => 3,
            DatePhrase::On(_) => 4,
        }
    }

    fn resolve(&self, today: NaiveDate) -> Option<NaiveDate> {
        match *self {
            DatePhrase::Today => Some(today),
            DatePhrase::Tomorrow => today.checked_add_signed(Duration::days(1)),
            DatePhrase::Next(target) => next_weekday(today, target),
            DatePhrase::NextWeek => today.checked_add_signed(Duration::days(7)),
            DatePhrase::InDays(n) => today.checked_add_signed(Duration::try_days(n)?),
            DatePhrase::On(d) => Some(d),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Value {
    Priority(Priority),
    Date(DatePhrase),
    Time(NaiveTime),
    Tag(String),
    Effort(u32),
    Category(String),
    Recurrence(Recurrence),
}

#[derive(Debug, Clone)]
struct Extraction {
    start: usize,
    end: usize,
    value: Value,
}

impl Extraction {
    fn kind(&self) -> SyntaxType {
        match self.value {
            Value::Priority(_) => SyntaxType::Priority,
            Value::Date(_) | Value::Time(_) => SyntaxType::DueDate,
            Value::Tag(_) => SyntaxType::Tag,
            Value::Effort(_) => SyntaxType::Effort,
            Value::Category(_) => SyntaxType::Category,
            Value::Recurrence(_) => SyntaxType::Recurrence,
        }
    }
}

/// Collects non-overlapping spans. Rules run in a fixed order and the first
/// rule to claim a byte range keeps it.
struct Scanner<'a> {
    input: &'a str,
    claimed: Vec<Extraction>,
    escapes: Vec<usize>,
}

/// Result of a scan: claimed spans sorted by start, plus the byte offsets of
/// backslashes that escaped a marker or phrase.
struct Scan {
    extractions: Vec<Extraction>,
    escapes: Vec<usize>,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            claimed: Vec::new(),
            escapes: Vec::new(),
        }
    }

    fn preceding_char(&self, start: usize) -> Option<char> {
        self.input[..start].chars().next_back()
    }

    /// Records the backslash in front of `start`, if any.
    fn escaped(&mut self, start: usize) -> bool {
        if self.preceding_char(start) != Some('\\') {
            return false;
        }
        let at = start - 1;
        if !self.escapes.contains(&at) {
            self.escapes.push(at);
        }
        true
    }

    /// Word phrases ("tomorrow", "every week"). Rejected when escaped or glued
    /// to a marker character ("#today" is a tag).
    fn claim_phrase(&mut self, start: usize, end: usize, value: Value) -> bool {
        if self.escaped(start)
            || self
                .preceding_char(start)
                .is_some_and(|c| MARKER_CHARS.contains(&c))
        {
            return false;
        }
        self.claim(start, end, value)
    }

    /// Sigil markers (`#x`, `@x`, `~n`). Must start a word.
    fn claim_marker(&mut self, start: usize, end: usize, value: Value) -> bool {
        if self.escaped(start)
            || self.preceding_char(start).is_some_and(|c| {
                c == '_' || c.is_alphanumeric() || MARKER_CHARS.contains(&c)
            })
        {
            return false;
        }
        self.claim(start, end, value)
    }

    fn claim(&mut self, start: usize, end: usize, value: Value) -> bool {
        if self
            .claimed
            .iter()
            .any(|e| e.start < end && start < e.end)
        {
            return false;
        }
        log::trace!("claimed {}..{} {:?}", start, end, value);
        self.claimed.push(Extraction { start, end, value });
        true
    }

    fn has_date(&self) -> bool {
        self.claimed
            .iter()
            .any(|e| matches!(e.value, Value::Date(_)))
    }

    fn finish(mut self) -> Scan {
        self.claimed.sort_by_key(|e| e.start);
        self.escapes.sort_unstable();
        Scan {
            extractions: self.claimed,
            escapes: self.escapes,
        }
    }
}

// --- SCANNING ---

/// Runs every rule over the untouched input.
///
/// Order: priority, date/time, tags, effort, category, recurrence. Time phrases
/// only count when a date phrase was found, unless `orphan_times` is set.
/// Disabled rules still resolve their escapes.
fn scan(input: &str, options: ParseOptions, orphan_times: bool) -> Scan {
    let mut s = Scanner::new(input);

    // 1. Priority
    for caps in PRIORITY_RE.captures_iter(input) {
        let m = caps.get(0).map_or(0..0, |m| m.range());
        if let Some(p) = priority_keyword(&caps[1]) {
            s.claim_marker(m.start, m.end, Value::Priority(p));
        }
    }
    for m in ASAP_RE.find_iter(input) {
        if options.asap_marker {
            s.claim_phrase(m.start(), m.end(), Value::Priority(Priority::High));
        } else {
            s.escaped(m.start());
        }
    }

    // 2. Dates, then times
    for m in TODAY_RE.find_iter(input) {
        s.claim_phrase(m.start(), m.end(), Value::Date(DatePhrase::Today));
    }
    for m in TOMORROW_RE.find_iter(input) {
        s.claim_phrase(m.start(), m.end(), Value::Date(DatePhrase::Tomorrow));
    }
    for caps in NEXT_RE.captures_iter(input) {
        let m = caps.get(0).map_or(0..0, |m| m.range());
        let target = &caps[1];
        let phrase = if target.eq_ignore_ascii_case("week") {
            Some(DatePhrase::NextWeek)
        } else {
            parse_weekday(target).map(DatePhrase::Next)
        };
        if let Some(phrase) = phrase {
            s.claim_phrase(m.start, m.end, Value::Date(phrase));
        }
    }
    for caps in IN_RE.captures_iter(input) {
        let m = caps.get(0).map_or(0..0, |m| m.range());
        if let Some(amount) = parse_english_number(&caps[1]) {
            let days = if caps[2].to_lowercase().starts_with('w') {
                i64::from(amount) * 7
            } else {
                i64::from(amount)
            };
            s.claim_phrase(m.start, m.end, Value::Date(DatePhrase::InDays(days)));
        }
    }
    for caps in ISO_DATE_RE.captures_iter(input) {
        let m = caps.get(0).map_or(0..0, |m| m.range());
        let ymd = (
            caps[1].parse::<i32>(),
            caps[2].parse::<u32>(),
            caps[3].parse::<u32>(),
        );
        if let (Ok(y), Ok(mo), Ok(d)) = ymd
            && let Some(date) = NaiveDate::from_ymd_opt(y, mo, d)
        {
            s.claim_phrase(m.start, m.end, Value::Date(DatePhrase::On(date)));
        }
    }
    let times_apply = orphan_times || s.has_date();
    for caps in TIME_RE.captures_iter(input) {
        let m = caps.get(0).map_or(0..0, |m| m.range());
        if !times_apply {
            s.escaped(m.start);
            continue;
        }
        let minute = caps.get(2).map(|m| m.as_str());
        let meridiem = caps.get(3).map(|m| m.as_str());
        if let Some(t) = parse_clock(&caps[1], minute, meridiem) {
            s.claim_phrase(m.start, m.end, Value::Time(t));
        }
    }

    // 3. Tags
    for caps in TAG_RE.captures_iter(input) {
        let m = caps.get(0).map_or(0..0, |m| m.range());
        s.claim_marker(m.start, m.end, Value::Tag(caps[1].to_string()));
    }

    // 4. Effort
    for caps in TILDE_EFFORT_RE.captures_iter(input) {
        let m = caps.get(0).map_or(0..0, |m| m.range());
        if let Ok(n) = caps[1].parse::<u32>() {
            s.claim_marker(m.start, m.end, Value::Effort(n));
        }
    }
    for caps in POMODORO_RE.captures_iter(input) {
        let m = caps.get(0).map_or(0..0, |m| m.range());
        if let Ok(n) = caps[1].parse::<u32>() {
            s.claim_phrase(m.start, m.end, Value::Effort(n));
        }
    }

    // 5. Category
    for caps in CATEGORY_RE.captures_iter(input) {
        let m = caps.get(0).map_or(0..0, |m| m.range());
        s.claim_marker(m.start, m.end, Value::Category(caps[1].to_string()));
    }

    // 6. Recurrence
    for caps in RECURRENCE_RE.captures_iter(input) {
        let m = caps.get(0).map_or(0..0, |m| m.range());
        let interval = match caps.get(1).map(|m| m.as_str().to_lowercase()) {
            None => Some(1),
            Some(n) if n == "other" => Some(2),
            Some(n) => parse_english_number(&n),
        };
        if let Some(interval) = interval.filter(|n| *n > 0)
            && let Some(kind) = RecurringType::from_unit(&caps[2])
        {
            s.claim_phrase(
                m.start,
                m.end,
                Value::Recurrence(Recurrence::new(kind, interval)),
            );
        }
    }

    s.finish()
}

fn priority_keyword(word: &str) -> Option<Priority> {
    match word.to_lowercase().as_str() {
        "high" | "important" | "urgent" => Some(Priority::High),
        "medium" => Some(Priority::Medium),
        "low" => Some(Priority::Low),
        _ => None,
    }
}

// --- ASSEMBLY ---

fn build_task(input: &str, scan: &Scan, now: NaiveDateTime) -> ParsedTask {
    let mut task = ParsedTask::default();
    let mut date: Option<DatePhrase> = None;
    let mut time: Option<NaiveTime> = None;

    for e in &scan.extractions {
        match &e.value {
            Value::Priority(p) => {
                if task.priority.is_none() {
                    task.priority = Some(*p);
                }
            }
            Value::Date(phrase) => {
                if date.is_none_or(|d| phrase.rank() >= d.rank()) {
                    date = Some(*phrase);
                }
            }
            Value::Time(t) => time = Some(*t),
            Value::Tag(tag) => task.tags.push(tag.clone()),
            Value::Effort(n) => task.estimated_pomodoros = Some(*n),
            Value::Category(c) => {
                if task.category.is_none() {
                    task.category = Some(c.clone());
                }
            }
            Value::Recurrence(r) => task.recurrence = Some(*r),
        }
    }

    task.due_date = date
        .and_then(|d| d.resolve(now.date()))
        .map(|d| match time {
            Some(t) => d.and_time(t),
            None => end_of_day(d),
        });
    task.title = strip_extractions(input, scan);
    task
}

/// Removes claimed spans and escaping backslashes, then collapses whitespace.
/// Any other backslash is kept as written.
fn strip_extractions(input: &str, scan: &Scan) -> String {
    let mut cuts: Vec<(usize, usize, &str)> = scan
        .extractions
        .iter()
        .map(|e| (e.start, e.end, " "))
        .chain(scan.escapes.iter().map(|&at| (at, at + 1, "")))
        .collect();
    cuts.sort_by_key(|&(start, _, _)| start);

    let mut out = String::with_capacity(input.len());
    let mut cursor = 0;
    for (start, end, fill) in cuts {
        if start < cursor {
            continue;
        }
        out.push_str(&input[cursor..start]);
        out.push_str(fill);
        cursor = end;
    }
    out.push_str(&input[cursor..]);
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

// --- PUBLIC API ---

/// Reads one line of smart input into a task.
///
/// Total over all strings: unknown or malformed markers stay in the title.
pub fn parse_smart_input(input: &str, clock: &dyn Clock, options: ParseOptions) -> ParsedTask {
    log::debug!("parse_smart_input() called with input: '{}'", input);
    let scanned = scan(input, options, false);
    let task = build_task(input, &scanned, clock.now());
    log::debug!(
        "parsed {} marker(s), {} escape(s), title: '{}'",
        scanned.extractions.len(),
        scanned.escapes.len(),
        task.title
    );
    task
}

/// Parses against the system clock with default options.
pub fn parse(input: &str) -> ParsedTask {
    parse_smart_input(input, &SystemClock, ParseOptions::default())
}

/// Parses with relative dates resolved against `now`.
pub fn parse_at(input: &str, now: NaiveDateTime) -> ParsedTask {
    parse_smart_input(input, &FixedClock(now), ParseOptions::default())
}

/// Splits the input into highlighted spans covering every byte, for input widgets.
pub fn tokenize_smart_input(input: &str) -> Vec<SyntaxToken> {
    let mut tokens = Vec::new();
    let mut cursor = 0;
    for e in scan(input, ParseOptions::default(), false).extractions {
        if e.start > cursor {
            tokens.push(SyntaxToken {
                kind: SyntaxType::Text,
                start: cursor,
                end: e.start,
            });
        }
        tokens.push(SyntaxToken {
            kind: e.kind(),
            start: e.start,
            end: e.end,
        });
        cursor = e.end;
    }
    if cursor < input.len() {
        tokens.push(SyntaxToken {
            kind: SyntaxType::Text,
            start: cursor,
            end: input.len(),
        });
    }
    tokens
}

/// Backslash-escapes every spot in `title` that the parser would otherwise read
/// as a marker or phrase, so the title survives a trip through smart input.
/// A backslash that already escapes something is doubled.
pub fn escape_title(title: &str) -> String {
    let options = ParseOptions { asap_marker: true };
    let scanned = scan(title, options, true);
    let mut points: Vec<usize> = scanned
        .extractions
        .iter()
        .map(|e| e.start)
        .chain(scanned.escapes)
        .collect();
    points.sort_unstable();

    let mut out = String::with_capacity(title.len() + points.len());
    let mut cursor = 0;
    for at in points {
        out.push_str(&title[cursor..at]);
        out.push('\\');
        cursor = at;
    }
    out.push_str(&title[cursor..]);
    out
}

// --- DATE PARSING HELPERS ---

fn parse_english_number(s: &str) -> Option<u32> {
    match s.to_lowercase().as_str() {
        "one" => Some(1),
        "two" => Some(2),
        "three" => Some(3),
        "four" => Some(4),
        "five" => Some(5),
        "six" => Some(6),
        "seven" => Some(7),
        "eight" => Some(8),
        "nine" => Some(9),
        "ten" => Some(10),
        "eleven" => Some(11),
        "twelve" => Some(12),
        _ => s.parse::<u32>().ok(),
    }
}

fn parse_weekday(s: &str) -> Option<Weekday> {
    match s.to_lowercase().as_str() {
        "mon" | "monday" => Some(Weekday::Mon),
        "tue" | "tues" | "tuesday" => Some(Weekday::Tue),
        "wed" | "wednesday" => Some(Weekday::Wed),
        "thu" | "thur" | "thurs" | "thursday" => Some(Weekday::Thu),
        "fri" | "friday" => Some(Weekday::Fri),
        "sat" | "saturday" => Some(Weekday::Sat),
        "sun" | "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

/// First `target` strictly after `from` (a week ahead when `from` already is one).
fn next_weekday(from: NaiveDate, target: Weekday) -> Option<NaiveDate> {
    let mut d = from.succ_opt()?;
    while d.weekday() != target {
        d = d.succ_opt()?;
    }
    Some(d)
}

/// "3" + "pm", "3" + "30" + "pm", or 24h "15" + "30". A bare hour is not a time.
fn parse_clock(hour: &str, minute: Option<&str>, meridiem: Option<&str>) -> Option<NaiveTime> {
    let h = hour.parse::<u32>().ok()?;
    let m = match minute {
        Some(m) => m.parse::<u32>().ok()?,
        None => 0,
    };
    match meridiem.map(str::to_lowercase) {
        Some(mer) => {
            if !(1..=12).contains(&h) || m > 59 {
                return None;
            }
            let is_pm = mer == "pm";
            let h_24 = if h == 12 {
                if is_pm { 12 } else { 0 }
            } else if is_pm {
                h + 12
            } else {
                h
            };
            NaiveTime::from_hms_opt(h_24, m, 0)
        }
        None => {
            minute?;
            NaiveTime::from_hms_opt(h, m, 0)
        }
    }
}
