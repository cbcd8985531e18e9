use axum::Json;

use crate::catalog::{Catalog, CATALOG};

/// GET /api/v1/catalog
pub async fn catalog_handler() -> Json<Catalog> {
    Json(CATALOG)
}
