//! Repository modules, one per aggregate.

pub mod customer;
pub mod order;
pub mod payment;
pub mod product;
pub mod report;

use uuid::Uuid;

/// New row identifier.
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
pub(crate) mod testutil {
    use chrono::Utc;
    use materia_core::{Customer, Product};

    use crate::pool::{Database, DbConfig};

    pub async fn test_db() -> Database {
        Database::new(DbConfig::in_memory())
            .await
            .expect("in-memory database")
    }

    pub async fn seed_customer(db: &Database, name: &str) -> Customer {
        let now = Utc::now();
        let customer = Customer {
            id: super::generate_id(),
            name: name.to_string(),
            phone: "0300-1234567".to_string(),
            address: "12 Canal Road".to_string(),
            created_at: now,
            updated_at: now,
        };
        db.customers().insert(&customer).await.unwrap();
        customer
    }

    pub async fn seed_product(db: &Database, name: &str, price_cents: i64, stock: i64) -> Product {
        let now = Utc::now();
        let product = Product {
            id: super::generate_id(),
            name: name.to_string(),
            price_cents,
            stock_quantity: stock,
            unit: "piece".to_string(),
            created_at: now,
            updated_at: now,
        };
        db.products().insert(&product).await.unwrap();
        product
    }
}
