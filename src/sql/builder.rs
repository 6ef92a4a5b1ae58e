//! Builds parameterized INSERT, SELECT, UPDATE, DELETE for the markers table.

use crate::model::{FindOptions, MarkerId, MarkerPatch, NewMarker};
use crate::sql::BindValue;

/// Columns in the order `Marker` is decoded from.
pub const MARKER_COLUMNS: &[&str] = &[
    "id",
    "title",
    "description",
    "latitude",
    "longitude",
    "created_at",
    "updated_at",
];

/// Quote identifier for PostgreSQL.
pub fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Schema-qualified table the marker store reads and writes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableRef {
    pub schema: String,
    pub table: String,
}

impl TableRef {
    pub fn markers(schema: impl Into<String>) -> Self {
        TableRef {
            schema: schema.into(),
            table: "markers".into(),
        }
    }

    pub fn qualified(&self) -> String {
        format!("{}.{}", quoted(&self.schema), quoted(&self.table))
    }
}

pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<BindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: BindValue) -> usize {
        self.params.push(v);
        self.params.len()
    }
}

fn column_list() -> String {
    MARKER_COLUMNS
        .iter()
        .map(|c| quoted(c))
        .collect::<Vec<_>>()
        .join(", ")
}

/// SELECT one marker by id ($1).
pub fn select_by_id(table: &TableRef, id: &MarkerId) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(BindValue::Text(id.as_str().to_string()));
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = ${}",
        column_list(),
        table.qualified(),
        quoted("id"),
        n
    );
    q
}

/// SELECT a window, title descending. Titles compare bytewise (`COLLATE "C"`); ties fall back to id.
pub fn select_page(table: &TableRef, options: &FindOptions) -> QueryBuf {
    let mut q = QueryBuf::new();
    let limit = q.push_param(BindValue::BigInt(clamp_i64(options.limit)));
    let offset = q.push_param(BindValue::BigInt(clamp_i64(options.skip)));
    q.sql = format!(
        "SELECT {} FROM {} ORDER BY {} COLLATE \"C\" DESC, {} DESC LIMIT ${} OFFSET ${}",
        column_list(),
        table.qualified(),
        quoted("title"),
        quoted("id"),
        limit,
        offset
    );
    q
}

fn clamp_i64(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

/// INSERT one marker; `created_at` and `updated_at` come from column defaults.
pub fn insert(table: &TableRef, id: &MarkerId, marker: &NewMarker) -> QueryBuf {
    let mut q = QueryBuf::new();
    let values = [
        ("id", BindValue::Text(id.as_str().to_string())),
        ("title", BindValue::Text(marker.title.clone())),
        ("description", BindValue::NullableText(marker.description.clone())),
        ("latitude", BindValue::Float(marker.latitude)),
        ("longitude", BindValue::Float(marker.longitude)),
    ];
    let mut cols = Vec::with_capacity(values.len());
    let mut placeholders = Vec::with_capacity(values.len());
    for (col, value) in values {
        let n = q.push_param(value);
        cols.push(quoted(col));
        placeholders.push(format!("${}", n));
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        table.qualified(),
        cols.join(", "),
        placeholders.join(", "),
        column_list()
    );
    q
}

/// UPDATE by id: SET only the fields present in the patch, and bump `updated_at`.
/// An empty patch degrades to a SELECT so the row is returned untouched.
pub fn update(table: &TableRef, id: &MarkerId, patch: &MarkerPatch) -> QueryBuf {
    if patch.is_empty() {
        return select_by_id(table, id);
    }
    let mut q = QueryBuf::new();
    let mut sets = Vec::new();
    if let Some(title) = &patch.title {
        let n = q.push_param(BindValue::Text(title.clone()));
        sets.push(format!("{} = ${}", quoted("title"), n));
    }
    if let Some(description) = &patch.description {
        let n = q.push_param(BindValue::Text(description.clone()));
        sets.push(format!("{} = ${}", quoted("description"), n));
    }
    if let Some(latitude) = patch.latitude {
        let n = q.push_param(BindValue::Float(latitude));
        sets.push(format!("{} = ${}", quoted("latitude"), n));
    }
    if let Some(longitude) = patch.longitude {
        let n = q.push_param(BindValue::Float(longitude));
        sets.push(format!("{} = ${}", quoted("longitude"), n));
    }
    sets.push(format!("{} = NOW()", quoted("updated_at")));
    let id_param = q.push_param(BindValue::Text(id.as_str().to_string()));
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = ${} RETURNING {}",
        table.qualified(),
        sets.join(", "),
        quoted("id"),
        id_param,
        column_list()
    );
    q
}

/// DELETE by id ($1), returning the removed row.
pub fn delete(table: &TableRef, id: &MarkerId) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(BindValue::Text(id.as_str().to_string()));
    q.sql = format!(
        "DELETE FROM {} WHERE {} = ${} RETURNING {}",
        table.qualified(),
        quoted("id"),
        n,
        column_list()
    );
    q
}
