//! Typed values bound to contact statements.

use chrono::NaiveDate;
use sqlx::encode::{Encode, IsNull};
use sqlx::postgres::{PgTypeInfo, Postgres};
use sqlx::Database;

/// A value that can be bound to a PostgreSQL query. Text, dates and NULL go over the wire as
/// text; the builder's placeholder casts give them their column type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SqlParam {
    Null,
    I64(i64),
    Text(String),
    Date(NaiveDate),
}

impl From<String> for SqlParam {
    fn from(s: String) -> Self {
        SqlParam::Text(s)
    }
}

impl From<Option<String>> for SqlParam {
    fn from(s: Option<String>) -> Self {
        s.map(SqlParam::Text).unwrap_or(SqlParam::Null)
    }
}

impl From<Option<NaiveDate>> for SqlParam {
    fn from(d: Option<NaiveDate>) -> Self {
        d.map(SqlParam::Date).unwrap_or(SqlParam::Null)
    }
}

impl<'q> Encode<'q, Postgres> for SqlParam {
    fn encode_by_ref(
        &self,
        buf: &mut <Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, Box<dyn std::error::Error + Send + Sync>> {
        Ok(match self {
            SqlParam::Null => <Option<String> as Encode<Postgres>>::encode_by_ref(&None, buf)?,
            SqlParam::I64(n) => <i64 as Encode<Postgres>>::encode_by_ref(n, buf)?,
            SqlParam::Text(s) => <String as Encode<Postgres>>::encode_by_ref(s, buf)?,
            SqlParam::Date(d) => {
                // Sent as text; the placeholder cast turns it back into a date.
                let s = d.format("%Y-%m-%d").to_string();
                <String as Encode<Postgres>>::encode_by_ref(&s, buf)?
            }
        })
    }

    fn produces(&self) -> Option<PgTypeInfo> {
        Some(match self {
            SqlParam::I64(_) => PgTypeInfo::with_name("INT8"),
            SqlParam::Null | SqlParam::Text(_) | SqlParam::Date(_) => PgTypeInfo::with_name("TEXT"),
        })
    }
}

impl sqlx::Type<Postgres> for SqlParam {
    fn type_info() -> PgTypeInfo {
        PgTypeInfo::with_name("TEXT")
    }
}
