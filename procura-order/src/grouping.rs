use crate::models::{OrderGroup, OrderItem};
use std::collections::HashMap;

/// Partition resolved items into size groups.
///
/// Pure function: group creation order follows the first occurrence of
/// each distinct size in the input, and items keep their input order
/// within a group.
pub fn group_by_size(items: &[OrderItem]) -> Vec<OrderGroup> {
    let mut groups: Vec<OrderGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for item in items {
        let key = item.size_key();
        let slot = match index.get(&key) {
            Some(&slot) => slot,
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(OrderGroup::new(key));
                groups.len() - 1
            }
        };
        groups[slot].add_item(item.clone());
    }

    groups
}
