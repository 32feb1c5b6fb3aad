// File: ./src/model/mod.rs
pub mod clock;
pub mod display;
pub mod enhance;
pub mod item;
pub mod parser;

pub use clock::{Clock, FixedClock, SystemClock};
pub use display::{TaskDisplay, describe};
pub use enhance::{Vocabulary, enhance, parse_enhanced};
pub use item::{ParsedTask, Priority, Recurrence, RecurringType};
pub use parser::{
    ParseOptions, SyntaxToken, SyntaxType, escape_title, parse, parse_at, parse_smart_input,
    tokenize_smart_input,
};
