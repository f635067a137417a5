use crate::record::CatalogRecord;
use std::collections::HashMap;

/// Maps a SKU to its catalog record, or reports it unknown
pub trait CatalogResolver: Send + Sync {
    fn resolve(&self, sku: &str) -> Option<&CatalogRecord>;
}

/// In-memory catalog keyed by SKU
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: HashMap<String, CatalogRecord>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: impl IntoIterator<Item = CatalogRecord>) -> Self {
        let mut catalog = Self::new();
        for record in records {
            catalog.insert(record);
        }
        catalog
    }

    /// Insert a record. When a SKU appears more than once, the record
    /// with the longer shop identifier wins; ties keep the earlier row.
    pub fn insert(&mut self, record: CatalogRecord) {
        match self.records.get(&record.sku) {
            Some(existing) if existing.shop_id_len() >= record.shop_id_len() => {
                tracing::debug!(
                    sku = %record.sku,
                    kept_shop = existing.shop_id.as_deref().unwrap_or(""),
                    "duplicate catalog row dropped"
                );
            }
            Some(_) => {
                tracing::debug!(
                    sku = %record.sku,
                    kept_shop = record.shop_id.as_deref().unwrap_or(""),
                    "duplicate catalog row replaced earlier entry"
                );
                self.records.insert(record.sku.clone(), record);
            }
            None => {
                self.records.insert(record.sku.clone(), record);
            }
        }
    }

    pub fn records(&self) -> impl Iterator<Item = &CatalogRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl CatalogResolver for Catalog {
    fn resolve(&self, sku: &str) -> Option<&CatalogRecord> {
        self.records.get(sku)
    }
}
