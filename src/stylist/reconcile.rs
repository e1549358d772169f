use std::collections::{HashMap, HashSet};

use crate::stylist::types::ClothingItem;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// Valid item ids in the order the model returned them.
    pub item_ids: Vec<String>,
    /// `(returned name, substituted id)` pairs.
    pub remapped: Vec<(String, String)>,
    pub unresolved: Vec<String>,
}

/// Maps model-returned tokens back onto the request's item ids. A token that
/// is an id is kept, a token that is an item name is replaced by that item's
/// id, anything else is dropped. Never yields an id absent from `items`.
pub fn reconcile_item_ids(returned: &[String], items: &[ClothingItem]) -> Reconciliation {
    let ids: HashSet<&str> = items.iter().map(|item| item.id.as_str()).collect();
    // Later items win on duplicate names.
    let names: HashMap<&str, &str> = items
        .iter()
        .map(|item| (item.name.as_str(), item.id.as_str()))
        .collect();

    let mut reconciliation = Reconciliation::default();
    for token in returned {
        if ids.contains(token.as_str()) {
            reconciliation.item_ids.push(token.clone());
        } else if let Some(id) = names.get(token.as_str()) {
            reconciliation.item_ids.push((*id).to_string());
            reconciliation
                .remapped
                .push((token.clone(), (*id).to_string()));
        } else {
            reconciliation.unresolved.push(token.clone());
        }
    }
    reconciliation
}
