use postgres_data_access::{Entity, SqlValue};
use sqlx::postgres::PgRow;
use sqlx::Row;
use uuid::Uuid;

/// Sample Customer entity with a generated bigint identifier
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub id: Option<i64>,
    pub name: String,
    pub email: Option<String>,
}

impl Customer {
    pub fn new(name: &str) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            email: None,
        }
    }

    pub fn with_email(name: &str, email: &str) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            email: Some(email.to_string()),
        }
    }
}

impl Entity for Customer {
    type Id = i64;
    const TABLE: &'static str = "customers";

    fn columns() -> &'static [&'static str] {
        &["name", "email"]
    }

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: Some(row.try_get("id")?),
            name: row.try_get("name")?,
            email: row.try_get("email")?,
        })
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::from(self.name.as_str()),
            SqlValue::from(self.email.clone()),
        ]
    }
}

/// Sample Shipment entity with a generated UUID identifier
#[derive(Debug, Clone, PartialEq)]
pub struct Shipment {
    pub id: Option<Uuid>,
    pub customer_id: i64,
    pub destination: String,
    pub weight_grams: i64,
}

impl Shipment {
    pub fn new(customer_id: i64, destination: &str, weight_grams: i64) -> Self {
        Self {
            id: None,
            customer_id,
            destination: destination.to_string(),
            weight_grams,
        }
    }
}

impl Entity for Shipment {
    type Id = Uuid;
    const TABLE: &'static str = "shipments";

    fn columns() -> &'static [&'static str] {
        &["customer_id", "destination", "weight_grams"]
    }

    fn id(&self) -> Option<Uuid> {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = Some(id);
    }

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: Some(row.try_get("id")?),
            customer_id: row.try_get("customer_id")?,
            destination: row.try_get("destination")?,
            weight_grams: row.try_get("weight_grams")?,
        })
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::from(self.customer_id),
            SqlValue::from(self.destination.as_str()),
            SqlValue::from(self.weight_grams),
        ]
    }
}
