use sqlx::postgres::PgRow;
use sqlx::{Decode, Postgres, Type};
use uuid::Uuid;

use crate::predicate::SqlValue;

/// Identifier types a mapped entity may use.
pub trait EntityId:
    for<'r> Decode<'r, Postgres> + Type<Postgres> + Clone + Send + Sync + Unpin + 'static
{
    /// The bind-side value for this identifier.
    fn to_value(&self) -> SqlValue;
}

impl EntityId for i32 {
    fn to_value(&self) -> SqlValue {
        SqlValue::Int(*self)
    }
}

impl EntityId for i64 {
    fn to_value(&self) -> SqlValue {
        SqlValue::BigInt(*self)
    }
}

impl EntityId for Uuid {
    fn to_value(&self) -> SqlValue {
        SqlValue::Uuid(*self)
    }
}

impl EntityId for String {
    fn to_value(&self) -> SqlValue {
        SqlValue::Text(self.clone())
    }
}

/// Mapping between a Rust type and one table.
///
/// An instance without an identifier is transient: saving it inserts a
/// row and populates the generated identifier. An instance with an
/// identifier is persistent and updates its row in place.
pub trait Entity: Sized + Send + Sync + Unpin + 'static {
    /// Identifier type of this entity.
    type Id: EntityId;

    /// Table this entity maps to.
    const TABLE: &'static str;

    /// Identifier column. `"id"` unless the table says otherwise.
    const ID_COLUMN: &'static str = "id";

    /// Data columns, in the order [`values`](Self::values) yields them.
    /// Excludes the identifier column.
    fn columns() -> &'static [&'static str];

    /// Identifier of this instance, if it has been persisted.
    fn id(&self) -> Option<Self::Id>;

    /// Attach the identifier generated on insert.
    fn set_id(&mut self, id: Self::Id);

    /// Decode one row into an entity.
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error>;

    /// Current data-column values, aligned with [`columns`](Self::columns).
    fn values(&self) -> Vec<SqlValue>;
}
