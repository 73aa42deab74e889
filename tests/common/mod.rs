pub mod entities;

pub use entities::{Customer, Shipment};

use postgres_data_access::{DatabaseConfig, SessionFactory};

/// Connect a session factory against the database named by `DATABASE_URL`
/// and create the test tables.
pub async fn setup_database() -> SessionFactory {
    let factory = SessionFactory::connect(&DatabaseConfig::from_env())
        .await
        .expect("Failed to connect to database");

    let session = factory.open_session();

    session
        .execute(
            r#"
            CREATE TABLE IF NOT EXISTS customers (
                id BIGSERIAL PRIMARY KEY,
                name VARCHAR(255) NOT NULL,
                email VARCHAR(255)
            )
            "#,
            vec![],
        )
        .await
        .expect("Failed to create customers table");

    // The foreign key is deferred so that a violation surfaces at
    // commit time rather than at insert time.
    session
        .execute(
            r#"
            CREATE TABLE IF NOT EXISTS shipments (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                customer_id BIGINT NOT NULL,
                destination VARCHAR(255) NOT NULL,
                weight_grams BIGINT NOT NULL,
                CONSTRAINT shipments_customer_fk FOREIGN KEY (customer_id)
                    REFERENCES customers (id) DEFERRABLE INITIALLY DEFERRED
            )
            "#,
            vec![],
        )
        .await
        .expect("Failed to create shipments table");

    session
        .execute(
            "TRUNCATE TABLE shipments, customers RESTART IDENTITY CASCADE",
            vec![],
        )
        .await
        .expect("Failed to truncate tables");

    factory
}

/// Drop the test tables.
pub async fn cleanup_database(factory: &SessionFactory) {
    let session = factory.open_session();

    session
        .execute("DROP TABLE IF EXISTS shipments CASCADE", vec![])
        .await
        .expect("Failed to drop shipments table");

    session
        .execute("DROP TABLE IF EXISTS customers CASCADE", vec![])
        .await
        .expect("Failed to drop customers table");
}
