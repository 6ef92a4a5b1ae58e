//! Values bound to marker queries, and binding them onto a sqlx query.

use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::QueryAs;

/// A value bound to a PostgreSQL placeholder.
#[derive(Clone, Debug, PartialEq)]
pub enum BindValue {
    Text(String),
    NullableText(Option<String>),
    Float(f64),
    BigInt(i64),
}

/// Bind params in placeholder order.
pub fn bind_all<'q, O>(
    mut query: QueryAs<'q, Postgres, O, PgArguments>,
    params: &[BindValue],
) -> QueryAs<'q, Postgres, O, PgArguments> {
    for p in params {
        query = match p {
            BindValue::Text(s) => query.bind(s.clone()),
            BindValue::NullableText(s) => query.bind(s.clone()),
            BindValue::Float(n) => query.bind(*n),
            BindValue::BigInt(n) => query.bind(*n),
        };
    }
    query
}
