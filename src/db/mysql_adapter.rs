//! # MySQL Database Adapter
//!
//! An implementation of the [`Db`] port using the [`mysql`] driver crate.
//!
//! ## Responsibilities
//! - Convert generic [`Param`] values into [`mysql::Value`]
//! - Convert [`mysql::Row`] into a generic [`Row`]
//! - Implement `fetch_one` and `exec` on top of `mysql::Pool`
//!
//! Statements and parameters are logged at `trace` level under the
//! `thumbcache::sql` target; driver failures are logged at `error` with a
//! condensed summary.
//!
//! ## Testing Policy
//! Unit tests cover the pure conversion functions only. Query execution needs
//! a live server and is exercised through `DbThumbnailStore` deployments.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use mysql::{Error as MyError, Params, Pool, Value as My, prelude::*};
use tracing::{error, trace};

use crate::db::port::{Db, Param, Row as GRow, Value};

fn mysql_err_summary(e: &MyError) -> String {
    match e {
        MyError::MySqlError(me) => format!(
            "code={}, state={}, message={}",
            me.code, me.state, me.message
        ),
        MyError::DriverError(de) => format!("driver={de:?}"),
        MyError::UrlError(ue) => format!("url={ue:?}"),
        MyError::IoError(ioe) => format!("io={ioe}"),
        MyError::CodecError(ce) => format!("codec={ce:?}"),
        MyError::FromValueError(fve) => format!("from_value={fve:?}"),
        MyError::FromRowError(fre) => format!("from_row={fre:?}"),
    }
}

fn trace_statement(op: &str, sql: &str, params_in: &[Param]) {
    trace!(target: "thumbcache::sql", op, sql, params = ?params_in, "executing statement");
}

/// MySQL implementation of the [`Db`] port.
#[derive(Clone)]
pub struct MySqlDb {
    pool: Arc<Pool>,
}

impl MySqlDb {
    /// Creates a new adapter instance using the provided connection pool.
    pub fn new(pool: Arc<Pool>) -> Self {
        Self { pool }
    }

    /// Converts a single [`Param`] into a [`mysql::Value`].
    ///
    /// - `Str` → `Bytes`
    /// - `DateTime` → `Value::Date` (Y, M, D, H, M, S, μs)
    /// - `Null` → `NULL`
    fn to_mysql_value(p: &Param) -> My {
        match p {
            Param::U64(x) => My::UInt(*x),
            Param::Str(s) => My::Bytes(s.as_bytes().to_vec()),
            Param::DateTime(dt) => {
                let d = dt.date();
                let t = dt.time();
                My::Date(
                    d.year() as u16,
                    d.month() as u8,
                    d.day() as u8,
                    t.hour() as u8,
                    t.minute() as u8,
                    t.second() as u8,
                    t.nanosecond() / 1_000,
                )
            }
            Param::Null => My::NULL,
        }
    }

    fn to_mysql_params(params_in: &[Param]) -> Params {
        if params_in.is_empty() {
            return Params::Empty;
        }
        Params::Positional(params_in.iter().map(Self::to_mysql_value).collect())
    }

    fn to_value(v: My) -> Value {
        match v {
            My::NULL => Value::Null,
            My::Int(i) => Value::I64(i),
            My::UInt(u) => Value::U64(u),
            My::Float(f) => Value::Str(f.to_string()),
            My::Double(f) => Value::Str(f.to_string()),
            My::Bytes(b) => match String::from_utf8(b) {
                Ok(s) => Value::Str(s),
                Err(e) => Value::Str(String::from_utf8_lossy(e.as_bytes()).into_owned()),
            },
            My::Date(y, m, d, hh, mm, ss, micro) => {
                let date = NaiveDate::from_ymd_opt(y as i32, m as u32, d as u32)
                    .unwrap_or(NaiveDate::MIN);
                let time = NaiveTime::from_hms_micro_opt(hh as u32, mm as u32, ss as u32, micro)
                    .unwrap_or(NaiveTime::MIN);
                Value::DateTime(NaiveDateTime::new(date, time))
            }
            My::Time(neg, days, hh, mm, ss, _micro) => {
                let sign = if neg { "-" } else { "" };
                Value::Str(format!("{sign}{days:03} {hh:02}:{mm:02}:{ss:02}"))
            }
        }
    }

    /// Converts a [`mysql::Row`] into a generic [`Row`].
    fn row_from_mysql(mut r: mysql::Row) -> GRow {
        let names: Vec<String> = r
            .columns_ref()
            .iter()
            .map(|c| c.name_str().to_string())
            .collect();

        let mut out = GRow::default();
        for (idx, name) in names.into_iter().enumerate() {
            let v = r
                .take_opt::<My, _>(idx)
                .unwrap_or(Ok(My::NULL))
                .unwrap_or(My::NULL);
            out.insert(name, Self::to_value(v));
        }
        out
    }
}

impl Db for MySqlDb {
    fn fetch_one(&self, sql: &str, params_in: &[Param]) -> Result<Option<GRow>> {
        trace_statement("fetch_one", sql, params_in);
        let mut conn = self.pool.get_conn().context("get_conn failed")?;

        let res: std::result::Result<Option<mysql::Row>, MyError> =
            conn.exec_first(sql, Self::to_mysql_params(params_in));
        if let Err(ref e) = res {
            error!(sql, summary = %mysql_err_summary(e), "exec_first failed");
        }
        let row_opt = res.context("exec_first failed")?;
        trace!(target: "thumbcache::sql", row_present = row_opt.is_some(), "fetch_one done");

        Ok(row_opt.map(Self::row_from_mysql))
    }

    fn exec(&self, sql: &str, params_in: &[Param]) -> Result<u64> {
        trace_statement("exec", sql, params_in);
        let mut conn = self.pool.get_conn().context("get_conn failed")?;

        let res: std::result::Result<(), MyError> =
            conn.exec_drop(sql, Self::to_mysql_params(params_in));
        if let Err(ref e) = res {
            error!(sql, summary = %mysql_err_summary(e), "exec_drop failed");
        }
        res.context("exec_drop failed")?;

        let n = conn.affected_rows();
        trace!(target: "thumbcache::sql", affected_rows = n, "exec done");
        Ok(n)
    }
}
