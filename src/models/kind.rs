//! Entity kinds and their table metadata.

use std::fmt;
use std::str::FromStr;

/// One column of an entity table: name and the PostgreSQL type used for bind casts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub pg_type: &'static str,
}

const fn col(name: &'static str, pg_type: &'static str) -> Column {
    Column { name, pg_type }
}

const BASE_COLUMNS: [Column; 3] = [
    col("id", "varchar"),
    col("created_at", "timestamptz"),
    col("updated_at", "timestamptz"),
];

const STATE_COLUMNS: &[Column] = &[
    BASE_COLUMNS[0],
    BASE_COLUMNS[1],
    BASE_COLUMNS[2],
    col("name", "varchar"),
];

const CITY_COLUMNS: &[Column] = &[
    BASE_COLUMNS[0],
    BASE_COLUMNS[1],
    BASE_COLUMNS[2],
    col("state_id", "varchar"),
    col("name", "varchar"),
];

const AMENITY_COLUMNS: &[Column] = &[
    BASE_COLUMNS[0],
    BASE_COLUMNS[1],
    BASE_COLUMNS[2],
    col("name", "varchar"),
];

const USER_COLUMNS: &[Column] = &[
    BASE_COLUMNS[0],
    BASE_COLUMNS[1],
    BASE_COLUMNS[2],
    col("email", "varchar"),
    col("password", "varchar"),
    col("first_name", "varchar"),
    col("last_name", "varchar"),
];

const PLACE_COLUMNS: &[Column] = &[
    BASE_COLUMNS[0],
    BASE_COLUMNS[1],
    BASE_COLUMNS[2],
    col("city_id", "varchar"),
    col("user_id", "varchar"),
    col("name", "varchar"),
    col("description", "varchar"),
    col("number_rooms", "int4"),
    col("number_bathrooms", "int4"),
    col("max_guest", "int4"),
    col("price_by_night", "int4"),
    col("latitude", "float8"),
    col("longitude", "float8"),
];

const REVIEW_COLUMNS: &[Column] = &[
    BASE_COLUMNS[0],
    BASE_COLUMNS[1],
    BASE_COLUMNS[2],
    col("place_id", "varchar"),
    col("user_id", "varchar"),
    col("text", "varchar"),
];

/// The six persisted entity kinds. Iteration order of [`Kind::ALL`] is the
/// order used when a storage operation spans every kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Kind {
    Amenity,
    City,
    Place,
    Review,
    State,
    User,
}

impl Kind {
    pub const ALL: [Kind; 6] = [
        Kind::Amenity,
        Kind::City,
        Kind::Place,
        Kind::Review,
        Kind::State,
        Kind::User,
    ];

    /// Class-style name, used in composite keys and the `__class__` field.
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Amenity => "Amenity",
            Kind::City => "City",
            Kind::Place => "Place",
            Kind::Review => "Review",
            Kind::State => "State",
            Kind::User => "User",
        }
    }

    pub fn table(self) -> &'static str {
        match self {
            Kind::Amenity => "amenities",
            Kind::City => "cities",
            Kind::Place => "places",
            Kind::Review => "reviews",
            Kind::State => "states",
            Kind::User => "users",
        }
    }

    /// Plural name used by the stats endpoint. Same as the table name.
    pub fn plural(self) -> &'static str {
        self.table()
    }

    /// Columns in declaration order; the first is always the primary key `id`.
    pub fn columns(self) -> &'static [Column] {
        match self {
            Kind::Amenity => AMENITY_COLUMNS,
            Kind::City => CITY_COLUMNS,
            Kind::Place => PLACE_COLUMNS,
            Kind::Review => REVIEW_COLUMNS,
            Kind::State => STATE_COLUMNS,
            Kind::User => USER_COLUMNS,
        }
    }

    pub fn column(self, name: &str) -> Option<&'static Column> {
        self.columns().iter().find(|c| c.name == name)
    }

    /// Foreign-key columns and the kind each one references.
    pub fn foreign_keys(self) -> &'static [(&'static str, Kind)] {
        match self {
            Kind::City => &[("state_id", Kind::State)],
            Kind::Place => &[("city_id", Kind::City), ("user_id", Kind::User)],
            Kind::Review => &[("place_id", Kind::Place), ("user_id", Kind::User)],
            Kind::Amenity | Kind::State | Kind::User => &[],
        }
    }

    /// Columns never returned to API clients.
    pub fn sensitive_columns(self) -> &'static [&'static str] {
        match self {
            Kind::User => &["password"],
            _ => &[],
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown kind: {0}")]
pub struct UnknownKind(pub String);

impl FromStr for Kind {
    type Err = UnknownKind;

    /// Accepts the class name ("City") or the table name ("cities").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Kind::ALL
            .into_iter()
            .find(|k| k.as_str() == s || k.table() == s)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

/// Normalizes the ways a caller may name a kind. Unknown names and `None`
/// normalize to `None`.
pub trait IntoKind {
    fn into_kind(self) -> Option<Kind>;
}

impl IntoKind for Kind {
    fn into_kind(self) -> Option<Kind> {
        Some(self)
    }
}

impl IntoKind for &str {
    fn into_kind(self) -> Option<Kind> {
        self.parse().ok()
    }
}

impl IntoKind for &String {
    fn into_kind(self) -> Option<Kind> {
        self.as_str().into_kind()
    }
}

impl IntoKind for String {
    fn into_kind(self) -> Option<Kind> {
        self.as_str().into_kind()
    }
}

impl<T: IntoKind> IntoKind for Option<T> {
    fn into_kind(self) -> Option<Kind> {
        self.and_then(IntoKind::into_kind)
    }
}
