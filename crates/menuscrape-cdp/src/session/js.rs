//! JavaScript execution operations for CDP page session.

use serde_json::{json, Value};

use crate::error::CdpError;

use super::core::PageSession;

impl PageSession {
    /// Evaluate JavaScript expression.
    pub async fn evaluate(&self, expression: &str) -> Result<Value, CdpError> {
        let result = self
            .call(
                "Runtime.evaluate",
                Some(json!({
                    "expression": expression,
                    "returnByValue": true,
                    "awaitPromise": true,
                })),
            )
            .await?;

        if let Some(exception) = result.get("exceptionDetails") {
            let text = exception["text"].as_str().unwrap_or("Unknown error");
            return Err(CdpError::JavaScript(text.to_string()));
        }

        Ok(result["result"]["value"].clone())
    }

    /// Call a function with `this` bound to the remote object.
    pub async fn call_function_on(&self, object_id: &str, function: &str) -> Result<Value, CdpError> {
        let params = json!({
            "objectId": object_id,
            "functionDeclaration": function,
            "returnByValue": true,
            "awaitPromise": true,
        });

        let result = self.call("Runtime.callFunctionOn", Some(params)).await?;

        if let Some(exception) = result.get("exceptionDetails") {
            let text = exception["text"].as_str().unwrap_or("Unknown error");
            return Err(CdpError::JavaScript(text.to_string()));
        }

        Ok(result["result"]["value"].clone())
    }

    /// Release a remote object handle.
    pub async fn release_object(&self, object_id: &str) -> Result<(), CdpError> {
        self.call("Runtime.releaseObject", Some(json!({"objectId": object_id})))
            .await?;
        Ok(())
    }

    /// Rendered text of a node, as `HTMLElement.innerText` reports it.
    pub async fn inner_text(&self, node_id: i64) -> Result<String, CdpError> {
        let object = self.resolve_node(node_id).await?;
        let object_id = object
            .object_id
            .ok_or_else(|| CdpError::InvalidResponse(format!("Node {} has no object id", node_id)))?;

        let text = self
            .call_function_on(
                &object_id,
                "function() { return this.innerText ?? this.textContent ?? ''; }",
            )
            .await;
        // Release even when the read failed.
        let _ = self.release_object(&object_id).await;

        Ok(text?.as_str().unwrap_or("").to_string())
    }
}
