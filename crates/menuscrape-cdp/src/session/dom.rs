//! DOM operations for CDP page session.

use serde_json::json;

use crate::error::CdpError;
use crate::protocol::{DomNode, RemoteObject};

use super::core::PageSession;

impl PageSession {
    /// Get document root node.
    pub async fn get_document(&self) -> Result<DomNode, CdpError> {
        let result = self
            .call("DOM.getDocument", Some(json!({"depth": 0})))
            .await?;

        let root: DomNode = serde_json::from_value(result["root"].clone())?;
        Ok(root)
    }

    /// Node id of the document root.
    ///
    /// `DOM.getDocument` invalidates every node id handed out before it, so the
    /// root is fetched once per document and reused.
    pub async fn document_node_id(&self) -> Result<i64, CdpError> {
        self.drain_events();
        let cached = *self.root_node.lock();
        if let Some(id) = cached {
            return Ok(id);
        }
        let root = self.get_document().await?;
        *self.root_node.lock() = Some(root.node_id);
        Ok(root.node_id)
    }

    /// Query selector against the document.
    pub async fn query_selector(&self, selector: &str) -> Result<Option<i64>, CdpError> {
        let root = self.document_node_id().await?;
        match self.query_selector_within(root, selector).await {
            Err(e) if e.is_stale_node() => {
                self.reset_document();
                let root = self.document_node_id().await?;
                self.query_selector_within(root, selector).await
            }
            other => other,
        }
    }

    /// Query selector all against the document.
    pub async fn query_selector_all(&self, selector: &str) -> Result<Vec<i64>, CdpError> {
        let root = self.document_node_id().await?;
        match self.query_selector_all_within(root, selector).await {
            Err(e) if e.is_stale_node() => {
                self.reset_document();
                let root = self.document_node_id().await?;
                self.query_selector_all_within(root, selector).await
            }
            other => other,
        }
    }

    /// First descendant of `node_id` matching `selector`.
    pub async fn query_selector_within(
        &self,
        node_id: i64,
        selector: &str,
    ) -> Result<Option<i64>, CdpError> {
        let result = self
            .call(
                "DOM.querySelector",
                Some(json!({
                    "nodeId": node_id,
                    "selector": selector,
                })),
            )
            .await?;

        let node_id = result["nodeId"].as_i64().unwrap_or(0);
        if node_id == 0 {
            Ok(None)
        } else {
            Ok(Some(node_id))
        }
    }

    /// All descendants of `node_id` matching `selector`, in document order.
    pub async fn query_selector_all_within(
        &self,
        node_id: i64,
        selector: &str,
    ) -> Result<Vec<i64>, CdpError> {
        let result = self
            .call(
                "DOM.querySelectorAll",
                Some(json!({
                    "nodeId": node_id,
                    "selector": selector,
                })),
            )
            .await?;

        Ok(node_ids(&result))
    }

    /// Scroll the node into the viewport unless it is already visible.
    pub async fn scroll_into_view(&self, node_id: i64) -> Result<(), CdpError> {
        self.call(
            "DOM.scrollIntoViewIfNeeded",
            Some(json!({"nodeId": node_id})),
        )
        .await?;
        Ok(())
    }

    /// Resolve node to runtime object.
    pub async fn resolve_node(&self, node_id: i64) -> Result<RemoteObject, CdpError> {
        let result = self
            .call("DOM.resolveNode", Some(json!({"nodeId": node_id})))
            .await?;

        let obj: RemoteObject = serde_json::from_value(result["object"].clone())?;
        Ok(obj)
    }
}

/// Extract the `nodeIds` array of a `DOM.querySelectorAll` result.
pub(super) fn node_ids(result: &serde_json::Value) -> Vec<i64> {
    result["nodeIds"]
        .as_array()
        .map(|arr| arr.iter().filter_map(|v| v.as_i64()).collect())
        .unwrap_or_default()
}
