//! Builds parameterized SELECT, INSERT, UPDATE, DELETE for the contacts table.

use crate::model::{ContactChanges, ContactFilter, NewContact};
use crate::sql::SqlParam;

pub const TABLE: &str = "contacts";

/// Columns in row order; `Contact` decodes from exactly this list.
pub const COLUMNS: &[&str] = &[
    "id",
    "first_name",
    "last_name",
    "email",
    "phone_number",
    "birthday",
    "bio",
];

/// DDL run once at bootstrap. Column widths match the validation bounds.
pub const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS "contacts" (
    "id" BIGSERIAL PRIMARY KEY,
    "first_name" VARCHAR(30) NOT NULL,
    "last_name" VARCHAR(40),
    "email" VARCHAR(50) NOT NULL UNIQUE,
    "phone_number" VARCHAR(20) NOT NULL,
    "birthday" DATE,
    "bio" TEXT
)
"#;

/// Quote identifier for PostgreSQL.
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

fn column_list() -> String {
    COLUMNS.iter().map(|c| quoted(c)).collect::<Vec<_>>().join(", ")
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    /// Push a value for `col` and return its cast placeholder, e.g. `$2::date`.
    fn push_param(&mut self, col: &str, v: SqlParam) -> String {
        let n = self.params.len() + 1;
        self.params.push(v);
        format!("${}::{}", n, column_type(col))
    }
}

/// SQL type of a column; placeholders are cast to it so NULLs and dates bind as text.
fn column_type(col: &str) -> &'static str {
    match col {
        "id" => "bigint",
        "birthday" => "date",
        _ => "text",
    }
}

/// SELECT by primary key.
pub fn select_by_id(id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let ph = q.push_param("id", SqlParam::I64(id));
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = {}",
        column_list(),
        quoted(TABLE),
        quoted("id"),
        ph
    );
    q
}

/// SELECT with optional equality filters ANDed together, ORDER BY id.
pub fn select_list(filter: &ContactFilter) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut where_parts = Vec::new();
    let pairs = [
        ("first_name", &filter.first_name),
        ("last_name", &filter.last_name),
        ("email", &filter.email),
    ];
    for (col, val) in pairs {
        if let Some(v) = val {
            let ph = q.push_param(col, SqlParam::Text(v.clone()));
            where_parts.push(format!("{} = {}", quoted(col), ph));
        }
    }
    let where_clause = if where_parts.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", where_parts.join(" AND "))
    };
    q.sql = format!(
        "SELECT {} FROM {}{} ORDER BY {}",
        column_list(),
        quoted(TABLE),
        where_clause,
        quoted("id")
    );
    q
}

/// INSERT every column except `id`, which the database assigns.
pub fn insert(new: &NewContact) -> QueryBuf {
    let mut q = QueryBuf::new();
    let values: [(&str, SqlParam); 6] = [
        ("first_name", new.first_name.clone().into()),
        ("last_name", new.last_name.clone().into()),
        ("email", new.email.clone().into()),
        ("phone_number", new.phone_number.clone().into()),
        ("birthday", new.birthday.into()),
        ("bio", new.bio.clone().into()),
    ];
    let mut cols = Vec::new();
    let mut placeholders = Vec::new();
    for (col, v) in values {
        cols.push(quoted(col));
        placeholders.push(q.push_param(col, v));
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        quoted(TABLE),
        cols.join(", "),
        placeholders.join(", "),
        column_list()
    );
    q
}

/// UPDATE by id: SET only columns present in `changes`. With nothing to set this is a plain
/// select, so callers still get the current row (or nothing when the id is absent).
pub fn update(id: i64, changes: &ContactChanges) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut set: Vec<(&str, SqlParam)> = Vec::new();
    if let Some(v) = &changes.first_name {
        set.push(("first_name", v.clone().into()));
    }
    if let Some(v) = &changes.last_name {
        set.push(("last_name", v.clone().into()));
    }
    if let Some(v) = &changes.email {
        set.push(("email", v.clone().into()));
    }
    if let Some(v) = &changes.phone_number {
        set.push(("phone_number", v.clone().into()));
    }
    if let Some(v) = changes.birthday {
        set.push(("birthday", v.into()));
    }
    if let Some(v) = &changes.bio {
        set.push(("bio", v.clone().into()));
    }
    if set.is_empty() {
        return select_by_id(id);
    }
    let mut sets = Vec::with_capacity(set.len());
    for (col, v) in set {
        let ph = q.push_param(col, v);
        sets.push(format!("{} = {}", quoted(col), ph));
    }
    let id_ph = q.push_param("id", SqlParam::I64(id));
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = {} RETURNING {}",
        quoted(TABLE),
        sets.join(", "),
        quoted("id"),
        id_ph,
        column_list()
    );
    q
}

/// DELETE by id, returning the id when a row was removed.
pub fn delete(id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let ph = q.push_param("id", SqlParam::I64(id));
    q.sql = format!(
        "DELETE FROM {} WHERE {} = {} RETURNING {}",
        quoted(TABLE),
        quoted("id"),
        ph,
        quoted("id")
    );
    q
}
