//! HTTP dates in the IMF-fixdate form, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`.

use anyhow::{Context, Result};
use std::time::SystemTime;
use time::{OffsetDateTime, PrimitiveDateTime, format_description::BorrowedFormatItem, macros::format_description};

const IMF_FIXDATE: &[BorrowedFormatItem<'static>] =
	format_description!("[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT");

pub fn format_http_date(time: SystemTime) -> Result<String> {
	OffsetDateTime::from(time)
		.format(IMF_FIXDATE)
		.context("formatting HTTP date")
}

pub fn parse_http_date(value: &str) -> Result<SystemTime> {
	let date = PrimitiveDateTime::parse(value.trim(), IMF_FIXDATE)
		.with_context(|| format!("parsing time \"{value}\" as an HTTP date"))?;
	Ok(date.assume_utc().into())
}
