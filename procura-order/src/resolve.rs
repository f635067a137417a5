use crate::models::{OrderItem, RawOrderLine};
use procura_catalog::CatalogResolver;
use std::collections::BTreeMap;

/// Error message recorded for SKUs the catalog does not know
pub const UNRESOLVED_SKU: &str = "SKU not found in product data";

/// Result of resolving raw order lines against the catalog.
/// Every input SKU lands in exactly one of `items` or `resolution_errors`.
#[derive(Debug, Clone, Default)]
pub struct ResolvedOrder {
    pub items: Vec<OrderItem>,
    pub resolution_errors: BTreeMap<String, String>,
}

/// Resolve raw lines into orderable items. Unresolved SKUs are recorded
/// as errors and excluded from further processing, never dropped.
pub fn resolve_items(
    lines: &[RawOrderLine],
    resolver: &dyn CatalogResolver,
    base_url: &str,
) -> ResolvedOrder {
    let mut resolved = ResolvedOrder::default();

    for line in lines {
        match resolver.resolve(&line.sku) {
            Some(record) => {
                resolved
                    .items
                    .push(OrderItem::from_record(line, record, base_url));
            }
            None => {
                tracing::warn!(sku = %line.sku, "SKU missing from catalog, excluding from run");
                resolved
                    .resolution_errors
                    .insert(line.sku.clone(), UNRESOLVED_SKU.to_string());
            }
        }
    }

    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use procura_catalog::{Catalog, CatalogRecord};
    use std::collections::HashSet;

    const BASE: &str = "https://orders.example.com";

    fn record(sku: &str, size: &str) -> CatalogRecord {
        CatalogRecord {
            sku: sku.to_string(),
            catalog_id: "123".to_string(),
            list_id: "456".to_string(),
            item_id: "789".to_string(),
            product_name: Some(format!("Product {sku}")),
            shop_id: Some("shop1".to_string()),
            misc_item_id: None,
            size: Some(size.to_string()),
        }
    }

    fn line(sku: &str, quantity: u32) -> RawOrderLine {
        RawOrderLine {
            sku: sku.to_string(),
            quantity,
        }
    }

    #[test]
    fn resolved_and_errors_cover_the_input_exactly() {
        let catalog = Catalog::from_records([record("X", "S"), record("Y", "S")]);
        let lines = [line("X", 2), line("Y", 1), line("Z", 3)];

        let resolved = resolve_items(&lines, &catalog, BASE);

        assert_eq!(resolved.items.len() + resolved.resolution_errors.len(), lines.len());

        let resolved_skus: HashSet<&str> =
            resolved.items.iter().map(|item| item.sku.as_str()).collect();
        let error_skus: HashSet<&str> = resolved
            .resolution_errors
            .keys()
            .map(String::as_str)
            .collect();
        assert!(resolved_skus.is_disjoint(&error_skus));

        let mut all: HashSet<&str> = resolved_skus;
        all.extend(error_skus);
        let input: HashSet<&str> = lines.iter().map(|l| l.sku.as_str()).collect();
        assert_eq!(all, input);
    }

    #[test]
    fn unresolved_sku_gets_the_fixed_reason() {
        let catalog = Catalog::new();
        let resolved = resolve_items(&[line("Z", 3)], &catalog, BASE);

        assert!(resolved.items.is_empty());
        assert_eq!(
            resolved.resolution_errors.get("Z").map(String::as_str),
            Some(UNRESOLVED_SKU)
        );
    }

    #[test]
    fn resolved_item_carries_catalog_fields_and_url() {
        let catalog = Catalog::from_records([record("X", "S")]);
        let resolved = resolve_items(&[line("X", 2)], &catalog, BASE);

        let item = &resolved.items[0];
        assert_eq!(item.sku, "X");
        assert_eq!(item.quantity, 2);
        assert_eq!(item.size.as_deref(), Some("S"));
        assert_eq!(
            item.url,
            "https://orders.example.com/FormV2.asp?CatalogID=123&INVSYN=456|789"
        );
    }

    #[test]
    fn input_order_is_preserved() {
        let catalog = Catalog::from_records([record("X", "S"), record("Y", "M")]);
        let resolved = resolve_items(&[line("Y", 1), line("X", 2)], &catalog, BASE);

        let skus: Vec<&str> = resolved.items.iter().map(|i| i.sku.as_str()).collect();
        assert_eq!(skus, ["Y", "X"]);
    }
}
