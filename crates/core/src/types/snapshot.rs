//! Point-in-time cart contents and their persisted JSON form.

use rust_decimal::Decimal;
use serde::Serialize;

use super::id::ProductId;
use super::product::LineItem;

/// Errors converting a snapshot to or from its persisted form.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("failed to encode snapshot: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to decode snapshot: {0}")]
    Decode(#[source] serde_json::Error),
}

/// The complete contents of a cart at a point in time.
///
/// Serializes as a bare JSON array of line items, in display order. Decoding
/// goes through [`Snapshot::from_json`] so invariants are restored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Snapshot {
    items: Vec<LineItem>,
}

impl Snapshot {
    /// An empty cart.
    #[must_use]
    pub const fn empty() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a snapshot from raw items, restoring cart invariants.
    ///
    /// Items with a zero quantity are dropped. Repeated ids are merged into
    /// the first occurrence with their quantities summed.
    #[must_use]
    pub fn from_items(items: impl IntoIterator<Item = LineItem>) -> Self {
        let mut merged: Vec<LineItem> = Vec::new();
        for item in items {
            if item.quantity == 0 {
                continue;
            }
            match merged.iter_mut().find(|existing| existing.id == item.id) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(item.quantity);
                }
                None => merged.push(item),
            }
        }
        Self { items: merged }
    }

    /// Decode a persisted snapshot.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError::Decode` if `raw` is not a JSON array of line items.
    pub fn from_json(raw: &str) -> Result<Self, SnapshotError> {
        let items: Vec<LineItem> = serde_json::from_str(raw).map_err(SnapshotError::Decode)?;
        Ok(Self::from_items(items))
    }

    /// Encode the snapshot for persistence.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError::Encode` if serialization fails.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string(&self.items).map_err(SnapshotError::Encode)
    }

    /// Line items in display order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Consume the snapshot and return its items.
    #[must_use]
    pub fn into_items(self) -> Vec<LineItem> {
        self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LineItem> {
        self.items.iter()
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up a line item by product id.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Total number of units across all line items.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of `price * quantity` over all line items.
    ///
    /// `None` if any line total cannot be computed or the sum overflows.
    #[must_use]
    pub fn subtotal(&self) -> Option<Decimal> {
        self.items
            .iter()
            .try_fold(Decimal::ZERO, |total, item| total.checked_add(item.line_total()?))
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::types::product::Product;

    fn item(id: &str, quantity: u32, cents: i64) -> LineItem {
        LineItem::from_product(
            Product::new(id, format!("title {id}"), format!("img/{id}"), Decimal::new(cents, 2)),
            quantity,
        )
    }

    #[test]
    fn test_from_items_drops_zero_quantity() {
        let snapshot = Snapshot::from_items([item("a", 0, 100), item("b", 2, 100)]);
        assert_eq!(snapshot.len(), 1);
        assert!(snapshot.get(&ProductId::new("a")).is_none());
    }

    #[test]
    fn test_from_items_merges_duplicate_ids() {
        let snapshot =
            Snapshot::from_items([item("a", 1, 100), item("b", 1, 100), item("a", 2, 100)]);
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.items()[0].id.as_str(), "a");
        assert_eq!(snapshot.items()[0].quantity, 3);
        assert_eq!(snapshot.items()[1].id.as_str(), "b");
    }

    #[test]
    fn test_json_round_trip() {
        let snapshot = Snapshot::from_items([item("p1", 2, 1999), item("p2", 1, 500)]);
        let raw = snapshot.to_json().unwrap();
        assert!(raw.starts_with('['));

        let decoded = Snapshot::from_json(&raw).unwrap();
        assert_eq!(decoded, snapshot);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let err = Snapshot::from_json("{not json").unwrap_err();
        assert!(matches!(err, SnapshotError::Decode(_)));

        let err = Snapshot::from_json(r#"{"id":"p1"}"#).unwrap_err();
        assert!(matches!(err, SnapshotError::Decode(_)));
    }

    #[test]
    fn test_totals() {
        let snapshot = Snapshot::from_items([item("a", 2, 1000), item("b", 3, 250)]);
        assert_eq!(snapshot.item_count(), 5);
        assert_eq!(snapshot.subtotal(), Some(Decimal::new(2750, 2)));
        assert_eq!(Snapshot::empty().subtotal(), Some(Decimal::ZERO));
    }

    #[test]
    fn test_from_json_keeps_out_of_range_price() {
        let raw = r#"[
            {"id":"p1","title":"Planet","image_url":"u","price":1e30,"quantity":1},
            {"id":"p2","title":"Hat","image_url":"u","price":5,"quantity":2}
        ]"#;
        let snapshot = Snapshot::from_json(raw).unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.subtotal(), None);

        let written: serde_json::Value = serde_json::from_str(&snapshot.to_json().unwrap()).unwrap();
        assert_eq!(written[0]["price"].as_f64(), Some(1e30));
        assert_eq!(written[1]["price"], 5);
    }

    #[test]
    fn test_subtotal_overflow_is_none() {
        let raw = r#"[{"id":"p1","title":"Yacht","image_url":"u","price":7e28,"quantity":2}]"#;
        let snapshot = Snapshot::from_json(raw).unwrap();
        assert_eq!(snapshot.item_count(), 2);
        assert_eq!(snapshot.subtotal(), None);
    }
}
