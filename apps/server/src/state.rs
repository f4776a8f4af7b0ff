//! Shared handler state.

use materia_db::Database;

#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub low_stock_threshold: i64,
}

impl AppState {
    pub fn new(db: Database, low_stock_threshold: i64) -> Self {
        Self {
            db,
            low_stock_threshold,
        }
    }
}
