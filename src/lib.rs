// Crate root library declaration and module exports.
pub mod cli;
pub mod config;
pub mod context;
pub mod model;

pub use model::{
    Clock, FixedClock, ParsedTask, Priority, RecurringType, SystemClock, TaskDisplay, describe,
    enhance, parse, parse_at, parse_enhanced, tokenize_smart_input,
};
