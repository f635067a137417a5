use procura_catalog::{Catalog, CatalogRecord};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to open catalog file {path}: {source}")]
    CatalogOpen {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("bad catalog row in {path}: {source}")]
    CatalogRow {
        path: String,
        #[source]
        source: csv::Error,
    },
}

/// One row of the product data CSV. Headers: sku, catalog_id, list_id,
/// item_id, product_name, shop_id, misc_item_id, size.
#[derive(Debug, Deserialize)]
struct CatalogRow {
    sku: String,
    catalog_id: String,
    list_id: String,
    item_id: String,
    product_name: Option<String>,
    shop_id: Option<String>,
    misc_item_id: Option<String>,
    size: Option<String>,
}

impl From<CatalogRow> for CatalogRecord {
    fn from(row: CatalogRow) -> Self {
        CatalogRecord {
            sku: row.sku,
            catalog_id: row.catalog_id,
            list_id: row.list_id,
            item_id: row.item_id,
            product_name: row.product_name,
            shop_id: row.shop_id,
            misc_item_id: row.misc_item_id,
            size: row.size,
        }
    }
}

/// Load the product catalog from a CSV file. Duplicate SKUs resolve via
/// the catalog's own policy.
pub fn load_catalog(path: &Path) -> Result<Catalog, StoreError> {
    let path_str = path.display().to_string();
    let mut reader = csv::Reader::from_path(path).map_err(|source| StoreError::CatalogOpen {
        path: path_str.clone(),
        source,
    })?;

    let mut catalog = Catalog::new();
    let mut rows = 0usize;
    for result in reader.deserialize() {
        let row: CatalogRow = result.map_err(|source| StoreError::CatalogRow {
            path: path_str.clone(),
            source,
        })?;
        catalog.insert(row.into());
        rows += 1;
    }

    tracing::info!(rows, entries = catalog.len(), path = %path_str, "catalog loaded");
    Ok(catalog)
}
