//! Entity table DDL, test-mode reset, and database bootstrap.

use crate::config::StorageConfig;
use crate::error::{AppError, StorageError};
use sqlx::{ConnectOptions, PgPool};

/// CREATE TABLE statements in dependency order. Foreign keys cascade deletes
/// from parent to children.
const CREATE_TABLES: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS "states" (
        "id" VARCHAR(60) PRIMARY KEY,
        "created_at" TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        "updated_at" TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        "name" VARCHAR(128) NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS "cities" (
        "id" VARCHAR(60) PRIMARY KEY,
        "created_at" TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        "updated_at" TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        "state_id" VARCHAR(60) NOT NULL REFERENCES "states" ("id") ON DELETE CASCADE,
        "name" VARCHAR(128) NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS "amenities" (
        "id" VARCHAR(60) PRIMARY KEY,
        "created_at" TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        "updated_at" TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        "name" VARCHAR(128) NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS "users" (
        "id" VARCHAR(60) PRIMARY KEY,
        "created_at" TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        "updated_at" TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        "email" VARCHAR(128) NOT NULL,
        "password" VARCHAR(128) NOT NULL,
        "first_name" VARCHAR(128),
        "last_name" VARCHAR(128)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS "places" (
        "id" VARCHAR(60) PRIMARY KEY,
        "created_at" TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        "updated_at" TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        "city_id" VARCHAR(60) NOT NULL REFERENCES "cities" ("id") ON DELETE CASCADE,
        "user_id" VARCHAR(60) NOT NULL REFERENCES "users" ("id") ON DELETE CASCADE,
        "name" VARCHAR(128) NOT NULL,
        "description" VARCHAR(1024),
        "number_rooms" INTEGER NOT NULL DEFAULT 0,
        "number_bathrooms" INTEGER NOT NULL DEFAULT 0,
        "max_guest" INTEGER NOT NULL DEFAULT 0,
        "price_by_night" INTEGER NOT NULL DEFAULT 0,
        "latitude" DOUBLE PRECISION,
        "longitude" DOUBLE PRECISION
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS "reviews" (
        "id" VARCHAR(60) PRIMARY KEY,
        "created_at" TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        "updated_at" TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        "place_id" VARCHAR(60) NOT NULL REFERENCES "places" ("id") ON DELETE CASCADE,
        "user_id" VARCHAR(60) NOT NULL REFERENCES "users" ("id") ON DELETE CASCADE,
        "text" VARCHAR(1024) NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS "place_amenity" (
        "place_id" VARCHAR(60) NOT NULL REFERENCES "places" ("id") ON DELETE CASCADE,
        "amenity_id" VARCHAR(60) NOT NULL REFERENCES "amenities" ("id") ON DELETE CASCADE,
        PRIMARY KEY ("place_id", "amenity_id")
    )
    "#,
];

/// Tables in reverse dependency order, for dropping.
const DROP_ORDER: &[&str] = &[
    "place_amenity",
    "reviews",
    "places",
    "users",
    "amenities",
    "cities",
    "states",
];

/// Create every entity table that does not exist yet. Safe to call repeatedly.
pub async fn create_all(pool: &PgPool) -> Result<(), StorageError> {
    for ddl in CREATE_TABLES {
        sqlx::query(ddl).execute(pool).await?;
    }
    Ok(())
}

/// Drop every entity table, children first.
pub async fn drop_all(pool: &PgPool) -> Result<(), StorageError> {
    for table in DROP_ORDER {
        sqlx::query(&format!("DROP TABLE IF EXISTS \"{}\" CASCADE", table))
            .execute(pool)
            .await?;
    }
    Ok(())
}

/// Ensure the configured database exists; create it if not. Connects to the
/// default `postgres` database to run CREATE DATABASE. Call before the first reload.
pub async fn ensure_database_exists(config: &StorageConfig) -> Result<(), AppError> {
    let opts = config.connect_options()?;
    let db_name = opts.get_database().unwrap_or_default().to_string();
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let mut conn = opts
        .database("postgres")
        .connect()
        .await
        .map_err(StorageError::from)?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await
        .map_err(StorageError::from)?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await
            .map_err(StorageError::from)?;
    }
    Ok(())
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
