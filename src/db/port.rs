//! # Database Port (Synchronous)
//!
//! Defines an abstract database interface (`Db`) and the owned value types the
//! thumbnail table is read and written with.
//!
//! - [`Param`]: SQL parameters.
//! - [`Value`] / [`Row`]: generic owned data representations.
//! - [`Db`]: the minimal operations the store needs (`fetch_one`, `exec`).
//!
//! # Example
//! ```rust,ignore
//! use thumbcache::db::port::{Db, Param};
//! use thumbcache::params;
//!
//! let ps = params![key.as_str(), 100u64, 100u64];
//! let row = db.fetch_one("SELECT * FROM thumbnails WHERE cache_key = ?", &ps)?;
//! ```
use std::collections::HashMap;

use anyhow::{Result, bail};
use chrono::NaiveDateTime;

/// SQL parameter types passed to a query.
#[derive(Debug)]
pub enum Param<'a> {
    U64(u64),
    Str(&'a str),
    DateTime(NaiveDateTime),
    Null,
}

/// Generic owned database value used for row mapping.
#[derive(Debug, Clone)]
pub enum Value {
    I64(i64),
    U64(u64),
    Str(String),
    DateTime(NaiveDateTime),
    Null,
}

/// A single database row (column name → value map).
#[derive(Debug, Clone, Default)]
pub struct Row {
    cols: HashMap<String, Value>,
}

impl<'a> From<u64> for Param<'a> {
    fn from(x: u64) -> Self {
        Param::U64(x)
    }
}

impl<'a> From<u32> for Param<'a> {
    fn from(x: u32) -> Self {
        Param::U64(x as u64)
    }
}

impl<'a> From<&'a str> for Param<'a> {
    fn from(x: &'a str) -> Self {
        Param::Str(x)
    }
}

impl<'a> From<Option<&'a str>> for Param<'a> {
    fn from(x: Option<&'a str>) -> Self {
        match x {
            Some(s) => Param::Str(s),
            None => Param::Null,
        }
    }
}

impl<'a> From<NaiveDateTime> for Param<'a> {
    fn from(x: NaiveDateTime) -> Self {
        Param::DateTime(x)
    }
}

/// Builds a `Vec<Param>` for SQL queries.
///
/// ```rust,ignore
/// let note: Option<&str> = None; // becomes NULL
/// let ps = params![42u64, "abc", note];
/// ```
#[macro_export]
macro_rules! params {
    ($($x:expr),* $(,)?) => {{
        let mut v = Vec::<$crate::db::port::Param>::new();
        $( v.push($crate::db::port::Param::from($x)); )*
        v
    }};
}

impl Row {
    /// Inserts a new column (used by DB adapters).
    pub fn insert(&mut self, key: impl Into<String>, val: Value) {
        self.cols.insert(key.into(), val);
    }

    /// Returns a `u64` (accepts non-negative `i64`).
    pub fn get_u64(&self, key: &str) -> Result<u64> {
        match self.cols.get(key) {
            Some(Value::U64(v)) => Ok(*v),
            Some(Value::I64(v)) if *v >= 0 => Ok(*v as u64),
            _ => bail!("column `{key}` is not U64"),
        }
    }

    /// Returns a `u32`, failing when the stored value does not fit.
    pub fn get_u32(&self, key: &str) -> Result<u32> {
        let v = self.get_u64(key)?;
        u32::try_from(v).map_err(|_| anyhow::anyhow!("column `{key}` value {v} overflows u32"))
    }

    pub fn get_string(&self, key: &str) -> Result<String> {
        match self.cols.get(key) {
            Some(Value::Str(s)) => Ok(s.clone()),
            _ => bail!("column `{key}` is not String"),
        }
    }

    pub fn get_datetime(&self, key: &str) -> Result<NaiveDateTime> {
        match self.cols.get(key) {
            Some(Value::DateTime(dt)) => Ok(*dt),
            _ => bail!("column `{key}` is not DateTime"),
        }
    }

    /// Returns an optional `String` (`NULL` → `None`).
    pub fn get_string_opt(&self, key: &str) -> Result<Option<String>> {
        match self.cols.get(key) {
            Some(Value::Str(s)) => Ok(Some(s.clone())),
            Some(Value::Null) => Ok(None),
            Some(_) => bail!("column `{key}` is not String/NULL"),
            None => bail!("column `{key}` not found"),
        }
    }
}

/// Database abstraction (synchronous).
///
/// Callers on the async runtime run these on the blocking pool.
pub trait Db: Send + Sync + 'static {
    fn fetch_one(&self, sql: &str, params: &[Param]) -> Result<Option<Row>>;

    /// Execute a write operation (`INSERT`, `UPDATE`, `DELETE`, DDL).
    ///
    /// Returns affected row count.
    fn exec(&self, sql: &str, params: &[Param]) -> Result<u64>;
}
