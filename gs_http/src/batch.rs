use std::collections::BTreeMap;

use serde_json::Value;

/// Pending batchUpdate requests grouped by spreadsheet
///
/// Each spreadsheet's requests are sent as one batchUpdate call, which the
/// API counts as a single write however many edits it carries.
#[derive(Debug, Default, Clone)]
pub struct RequestsContainer {
    pending: BTreeMap<String, Vec<Value>>,
}

impl RequestsContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one request object for `spreadsheet_id`
    pub fn deposit(&mut self, spreadsheet_id: impl Into<String>, request: Value) {
        self.pending.entry(spreadsheet_id.into()).or_default().push(request);
    }

    /// Remove and return every request queued for `spreadsheet_id`
    pub fn take(&mut self, spreadsheet_id: &str) -> Option<Vec<Value>> {
        self.pending.remove(spreadsheet_id)
    }

    /// Put a taken batch back ahead of anything deposited since
    pub fn restore(&mut self, spreadsheet_id: impl Into<String>, mut requests: Vec<Value>) {
        let entry = self.pending.entry(spreadsheet_id.into()).or_default();
        requests.append(entry);
        *entry = requests;
    }

    /// Spreadsheets with pending requests, in sorted order
    pub fn spreadsheet_ids(&self) -> Vec<String> {
        self.pending.keys().cloned().collect()
    }

    /// Requests pending for one spreadsheet
    pub fn pending_for(&self, spreadsheet_id: &str) -> usize {
        self.pending.get(spreadsheet_id).map_or(0, Vec::len)
    }

    /// Total number of pending requests
    pub fn len(&self) -> usize {
        self.pending.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_deposit_groups_by_spreadsheet() {
        let mut container = RequestsContainer::new();
        container.deposit("sheet-b", json!({ "mergeCells": {} }));
        container.deposit("sheet-a", json!({ "updateBorders": {} }));
        container.deposit("sheet-b", json!({ "repeatCell": {} }));

        assert_eq!(container.len(), 3);
        assert_eq!(container.pending_for("sheet-b"), 2);
        assert_eq!(container.spreadsheet_ids(), vec!["sheet-a".to_string(), "sheet-b".to_string()]);
    }

    #[test]
    fn test_take_preserves_order() {
        let mut container = RequestsContainer::new();
        container.deposit("id", json!(1));
        container.deposit("id", json!(2));

        assert_eq!(container.take("id"), Some(vec![json!(1), json!(2)]));
        assert!(container.is_empty());
        assert_eq!(container.take("id"), None);
    }

    #[test]
    fn test_restore_goes_ahead_of_new_deposits() {
        let mut container = RequestsContainer::new();
        container.deposit("id", json!("first"));
        let taken = container.take("id").unwrap();

        container.deposit("id", json!("later"));
        container.restore("id", taken);

        assert_eq!(container.take("id"), Some(vec![json!("first"), json!("later")]));
    }
}
