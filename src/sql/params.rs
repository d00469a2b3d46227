//! Convert serde_json::Value to types that sqlx can bind.

use crate::models::Column;
use serde_json::Value;
use sqlx::encode::{Encode, IsNull};
use sqlx::postgres::{PgTypeInfo, Postgres};
use sqlx::Database;

/// A value that can be bound to a PostgreSQL query. Statements cast every
/// placeholder to its column type, so each variant only has to describe itself.
/// A NULL still carries the wire type of its column: prepared statements are
/// cached per SQL text, so a placeholder must declare the same type on every call.
#[derive(Clone, Debug, PartialEq)]
pub enum PgBindValue {
    Null(&'static str),
    Bool(bool),
    I64(i64),
    F64(f64),
    String(String),
    Json(Value),
}

impl PgBindValue {
    pub fn from_json(v: &Value) -> Self {
        match v {
            Value::Null => PgBindValue::Null(TEXT),
            Value::Bool(b) => PgBindValue::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => PgBindValue::I64(i),
                None => PgBindValue::F64(n.as_f64().unwrap_or_default()),
            },
            Value::String(s) => PgBindValue::String(s.clone()),
            Value::Array(_) | Value::Object(_) => PgBindValue::Json(v.clone()),
        }
    }

    /// Bind `v` with the wire type `column` always uses, null or not.
    pub fn for_column(v: &Value, column: &Column) -> Self {
        match (column.pg_type, v) {
            ("float8", Value::Null) => PgBindValue::Null(FLOAT8),
            ("float8", Value::Number(n)) => PgBindValue::F64(n.as_f64().unwrap_or_default()),
            ("int4", Value::Null) => PgBindValue::Null(INT8),
            ("int4", Value::Number(n)) => match n.as_i64() {
                Some(i) => PgBindValue::I64(i),
                None => PgBindValue::F64(n.as_f64().unwrap_or_default()),
            },
            _ => Self::from_json(v),
        }
    }

    /// Name of the PostgreSQL type this value is sent as.
    pub fn wire_type(&self) -> &'static str {
        match self {
            PgBindValue::Null(ty) => *ty,
            PgBindValue::String(_) => TEXT,
            PgBindValue::Bool(_) => "BOOL",
            PgBindValue::I64(_) => INT8,
            PgBindValue::F64(_) => FLOAT8,
            PgBindValue::Json(_) => "JSONB",
        }
    }
}

const TEXT: &str = "TEXT";
const INT8: &str = "INT8";
const FLOAT8: &str = "FLOAT8";

impl<'q> Encode<'q, Postgres> for PgBindValue {
    fn encode_by_ref(
        &self,
        buf: &mut <Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, Box<dyn std::error::Error + Send + Sync>> {
        Ok(match self {
            PgBindValue::Null(_) => IsNull::Yes,
            PgBindValue::Bool(b) => <bool as Encode<Postgres>>::encode_by_ref(b, buf)?,
            PgBindValue::I64(n) => <i64 as Encode<Postgres>>::encode_by_ref(n, buf)?,
            PgBindValue::F64(n) => <f64 as Encode<Postgres>>::encode_by_ref(n, buf)?,
            PgBindValue::String(s) => <&str as Encode<Postgres>>::encode_by_ref(&s.as_str(), buf)?,
            PgBindValue::Json(v) => <Value as Encode<Postgres>>::encode_by_ref(v, buf)?,
        })
    }

    fn produces(&self) -> Option<PgTypeInfo> {
        Some(PgTypeInfo::with_name(self.wire_type()))
    }
}

impl sqlx::Type<Postgres> for PgBindValue {
    fn type_info() -> PgTypeInfo {
        PgTypeInfo::with_name(TEXT)
    }
}
