//! Builds parameterized SELECT, INSERT .. ON CONFLICT, DELETE and COUNT for an entity kind.

use crate::models::{Entity, Kind, Persist};
use serde_json::Value;

/// Association table linking places and amenities.
pub const PLACE_AMENITY_TABLE: &str = "place_amenity";

/// Quote identifier for PostgreSQL (safe: only from kind metadata).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<Value>,
}

impl QueryBuf {
    fn new(sql: String) -> Self {
        QueryBuf {
            sql,
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: Value) -> usize {
        self.params.push(v);
        self.params.len()
    }
}

fn select_column_list(kind: Kind) -> String {
    kind.columns()
        .iter()
        .map(|c| quoted(c.name))
        .collect::<Vec<_>>()
        .join(", ")
}

fn order_clause() -> String {
    format!(" ORDER BY {}, {}", quoted("created_at"), quoted("id"))
}

/// SELECT every row of a kind.
pub fn select_all(kind: Kind) -> QueryBuf {
    QueryBuf::new(format!(
        "SELECT {} FROM {}{}",
        select_column_list(kind),
        quoted(kind.table()),
        order_clause()
    ))
}

/// SELECT by primary key. Caller binds the id as `$1`.
pub fn select_by_id(kind: Kind) -> QueryBuf {
    QueryBuf::new(format!(
        "SELECT {} FROM {} WHERE {} = $1",
        select_column_list(kind),
        quoted(kind.table()),
        quoted("id")
    ))
}

/// SELECT rows whose `column` equals `$1`. Returns None when the column is not
/// part of the kind.
pub fn select_where(kind: Kind, column: &str) -> Option<QueryBuf> {
    let col = kind.column(column)?;
    Some(QueryBuf::new(format!(
        "SELECT {} FROM {} WHERE {} = $1::{}{}",
        select_column_list(kind),
        quoted(kind.table()),
        quoted(col.name),
        col.pg_type,
        order_clause()
    )))
}

pub fn count(kind: Kind) -> QueryBuf {
    QueryBuf::new(format!("SELECT COUNT(*) FROM {}", quoted(kind.table())))
}

/// INSERT the entity, or overwrite every non-key column when the id exists.
/// `created_at` is never overwritten.
pub fn upsert(entity: &Entity) -> QueryBuf {
    let kind = entity.kind();
    let mut q = QueryBuf::new(String::new());
    let mut cols = Vec::new();
    let mut placeholders = Vec::new();
    for (c, v) in kind.columns().iter().zip(entity.column_values()) {
        let n = q.push_param(v);
        cols.push(quoted(c.name));
        placeholders.push(format!("${}::{}", n, c.pg_type));
    }
    let sets: Vec<String> = kind
        .columns()
        .iter()
        .filter(|c| c.name != "id" && c.name != "created_at")
        .map(|c| format!("{0} = EXCLUDED.{0}", quoted(c.name)))
        .collect();
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) ON CONFLICT ({}) DO UPDATE SET {}",
        quoted(kind.table()),
        cols.join(", "),
        placeholders.join(", "),
        quoted("id"),
        sets.join(", ")
    );
    q
}

/// DELETE by primary key. Caller binds the id as `$1`.
pub fn delete_by_id(kind: Kind) -> QueryBuf {
    QueryBuf::new(format!(
        "DELETE FROM {} WHERE {} = $1",
        quoted(kind.table()),
        quoted("id")
    ))
}

/// Link a place and an amenity; binds `$1` place id, `$2` amenity id. Linking twice is a no-op.
pub fn link_amenity() -> QueryBuf {
    QueryBuf::new(format!(
        "INSERT INTO {} ({}, {}) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        quoted(PLACE_AMENITY_TABLE),
        quoted("place_id"),
        quoted("amenity_id")
    ))
}

pub fn unlink_amenity() -> QueryBuf {
    QueryBuf::new(format!(
        "DELETE FROM {} WHERE {} = $1 AND {} = $2",
        quoted(PLACE_AMENITY_TABLE),
        quoted("place_id"),
        quoted("amenity_id")
    ))
}

/// Amenities linked to the place bound as `$1`.
pub fn select_amenities_of_place() -> QueryBuf {
    let cols = Kind::Amenity
        .columns()
        .iter()
        .map(|c| format!("a.{}", quoted(c.name)))
        .collect::<Vec<_>>()
        .join(", ");
    QueryBuf::new(format!(
        "SELECT {} FROM {} a JOIN {} pa ON pa.{} = a.{} WHERE pa.{} = $1 ORDER BY a.{}, a.{}",
        cols,
        quoted(Kind::Amenity.table()),
        quoted(PLACE_AMENITY_TABLE),
        quoted("amenity_id"),
        quoted("id"),
        quoted("place_id"),
        quoted("created_at"),
        quoted("id")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{City, State};

    #[test]
    fn select_by_id_lists_every_column() {
        let q = select_by_id(Kind::State);
        assert_eq!(
            q.sql,
            r#"SELECT "id", "created_at", "updated_at", "name" FROM "states" WHERE "id" = $1"#
        );
        assert!(q.params.is_empty());
    }

    #[test]
    fn select_where_rejects_unknown_columns() {
        assert!(select_where(Kind::City, "state_id").is_some());
        assert!(select_where(Kind::City, "city_id").is_none());
        let q = select_where(Kind::Place, "city_id").map(|q| q.sql).unwrap_or_default();
        assert!(q.contains(r#"WHERE "city_id" = $1::varchar"#), "{q}");
    }

    #[test]
    fn upsert_binds_columns_in_order_and_keeps_created_at() {
        let city = City::new("state-1", "San Jose");
        let q = upsert(&Entity::from(city.clone()));
        assert!(q.sql.starts_with(
            r#"INSERT INTO "cities" ("id", "created_at", "updated_at", "state_id", "name") VALUES ($1::varchar, $2::timestamptz, $3::timestamptz, $4::varchar, $5::varchar)"#
        ), "{}", q.sql);
        assert!(q.sql.contains(r#"ON CONFLICT ("id") DO UPDATE SET "updated_at" = EXCLUDED."updated_at""#));
        assert!(!q.sql.contains(r#""created_at" = EXCLUDED"#));
        assert_eq!(q.params.len(), 5);
        assert_eq!(q.params[0], city.base.id.as_str());
    }

    #[test]
    fn count_and_delete_target_kind_table() {
        assert_eq!(count(Kind::User).sql, r#"SELECT COUNT(*) FROM "users""#);
        assert_eq!(
            delete_by_id(Kind::Review).sql,
            r#"DELETE FROM "reviews" WHERE "id" = $1"#
        );
    }

    #[test]
    fn upsert_state_has_single_data_column() {
        let q = upsert(&Entity::from(State::new("Nevada")));
        assert_eq!(q.params.len(), 4);
        assert_eq!(q.params[3], "Nevada");
    }
}
