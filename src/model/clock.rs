// File: ./src/model/clock.rs
//! Time source used to resolve relative dates ("tomorrow", "next friday").
//!
//! The parser never calls `Local::now()` directly; callers hand it a `Clock`
//! so that tests and replays can pin "now" to a known instant.
use chrono::{Local, NaiveDateTime};

pub trait Clock: Send + Sync + std::fmt::Debug {
    /// Current local wall-clock time.
    fn now(&self) -> NaiveDateTime;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
