//! Resolution of human-readable item names for preorder selections.

use crate::app::ports::MenuItemLookup;
use crate::types::Selection;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

// Trailing embedded price fragments, e.g. " - £24.95" or "- 12".
static PRICE_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*-\s*[£$€]?\s*\d+(?:\.\d{1,2})?\s*$").unwrap());

/// Strips trailing price fragments from an item name. Runs to a fixed
/// point so stacked fragments ("Fish - 12 - £5") come off too; idempotent.
pub fn clean_item_name(raw: &str) -> String {
    let mut name = raw.trim().to_string();
    loop {
        let stripped = PRICE_SUFFIX.replace(&name, "").trim().to_string();
        if stripped == name {
            return name;
        }
        name = stripped;
    }
}

/// Determines the display name for one selection.
///
/// An inline name wins; otherwise the menu item id is looked up against the
/// menu collaborator, degrading to the raw id on a miss. Never errors: a
/// failed lookup must not take the rest of the document down with it.
pub async fn resolve_name(selection: &Selection, lookup: &dyn MenuItemLookup) -> String {
    if let Some(name) = selection.item_name.as_deref() {
        if !name.trim().is_empty() {
            return clean_item_name(name);
        }
    }
    if let Some(id) = selection.menu_item_id.as_deref() {
        return match lookup.find_item(id).await {
            Some(item) => clean_item_name(&item.name),
            None => {
                warn!(item_id = %id, "menu item lookup missed, showing raw id");
                id.to_string()
            }
        };
    }
    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ports::MenuItemRef;
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct MapLookup {
        items: HashMap<String, String>,
    }

    #[async_trait]
    impl MenuItemLookup for MapLookup {
        async fn find_item(&self, id: &str) -> Option<MenuItemRef> {
            self.items.get(id).map(|name| MenuItemRef { name: name.clone() })
        }
    }

    fn selection(item_name: Option<&str>, menu_item_id: Option<&str>) -> Selection {
        Selection {
            course: None,
            quantity: 1,
            item_name: item_name.map(String::from),
            menu_item_id: menu_item_id.map(String::from),
        }
    }

    #[test]
    fn cleaning_strips_price_fragments() {
        assert_eq!(clean_item_name("Sirloin Steak - £24.95"), "Sirloin Steak");
        assert_eq!(clean_item_name("Fish & Chips - 12"), "Fish & Chips");
        assert_eq!(clean_item_name("Garlic Bread"), "Garlic Bread");
        assert_eq!(clean_item_name("  Soup of the Day - £ 5.5  "), "Soup of the Day");
    }

    #[test]
    fn cleaning_is_idempotent() {
        for raw in [
            "Sirloin Steak - £24.95",
            "Garlic Bread",
            "Tiramisu - $8.00",
            "Fish - 12 - £5",
        ] {
            let once = clean_item_name(raw);
            assert_eq!(clean_item_name(&once), once);
        }
    }

    #[test]
    fn cleaning_strips_stacked_price_fragments() {
        assert_eq!(clean_item_name("Fish - 12 - £5"), "Fish");
    }

    #[test]
    fn cleaning_keeps_hyphenated_names() {
        assert_eq!(clean_item_name("Slow-Cooked Lamb"), "Slow-Cooked Lamb");
    }

    #[tokio::test]
    async fn inline_name_wins_without_lookup() {
        let lookup = MapLookup { items: HashMap::new() };
        let sel = selection(Some("Sirloin Steak - £24.95"), Some("item-1"));
        assert_eq!(resolve_name(&sel, &lookup).await, "Sirloin Steak");
    }

    #[tokio::test]
    async fn lookup_resolves_and_cleans() {
        let mut items = HashMap::new();
        items.insert("item-1".to_string(), "Pan-Fried Salmon - £19.50".to_string());
        let lookup = MapLookup { items };
        let sel = selection(None, Some("item-1"));
        assert_eq!(resolve_name(&sel, &lookup).await, "Pan-Fried Salmon");
    }

    #[tokio::test]
    async fn lookup_miss_degrades_to_raw_id() {
        let lookup = MapLookup { items: HashMap::new() };
        let sel = selection(None, Some("item-404"));
        assert_eq!(resolve_name(&sel, &lookup).await, "item-404");
    }

    #[tokio::test]
    async fn no_name_and_no_id_is_empty() {
        let lookup = MapLookup { items: HashMap::new() };
        let sel = selection(None, None);
        assert_eq!(resolve_name(&sel, &lookup).await, "");
    }
}
