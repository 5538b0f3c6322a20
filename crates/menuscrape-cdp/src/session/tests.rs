use serde_json::json;

use super::core::invalidates_document;
use super::dom::node_ids;

#[test]
fn test_node_ids_in_order() {
    let result = json!({"nodeIds": [12, 4, 30]});
    assert_eq!(node_ids(&result), vec![12, 4, 30]);
}

#[test]
fn test_node_ids_missing() {
    assert!(node_ids(&json!({})).is_empty());
    assert!(node_ids(&json!({"nodeIds": []})).is_empty());
}

#[test]
fn test_document_invalidating_events() {
    assert!(invalidates_document(Some("DOM.documentUpdated")));
    assert!(!invalidates_document(Some("DOM.childNodeInserted")));
    assert!(!invalidates_document(None));
}
