//! Shared fixtures for kanban_core integration tests.

#![allow(dead_code)]

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use kanban_core::SqliteKanban;
use mockable::Clock;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

/// Clock pinned to a local wall-clock time that tests can move.
#[derive(Clone)]
pub struct FixedClock {
    now: Arc<Mutex<NaiveDateTime>>,
}

impl FixedClock {
    pub fn at(now: NaiveDateTime) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    pub fn set(&self, now: NaiveDateTime) {
        *self.now.lock().unwrap() = now;
    }

    pub fn naive(&self) -> NaiveDateTime {
        *self.now.lock().unwrap()
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        Local
            .from_local_datetime(&self.naive())
            .earliest()
            .unwrap()
    }

    fn utc(&self) -> DateTime<Utc> {
        self.local().with_timezone(&Utc)
    }
}

/// `day/month/year hour:minute` as a naive local time.
pub fn at(day: u32, month: u32, year: i32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

pub fn kanban<'a>(conn: &'a Connection, clock: &FixedClock) -> SqliteKanban<'a, FixedClock> {
    SqliteKanban::open(conn, clock.clone()).unwrap()
}

pub fn count_rows(conn: &Connection, sql: &str, id: i64) -> i64 {
    conn.query_row(sql, [id], |row| row.get(0)).unwrap()
}
