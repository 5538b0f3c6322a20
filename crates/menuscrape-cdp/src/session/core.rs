//! Core session struct and CDP command dispatch.

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::debug;

use crate::client::Connection;
use crate::error::CdpError;
use crate::protocol::CdpResponse;

/// A session attached to a single page/target.
pub struct PageSession {
    /// Target ID.
    pub(super) target_id: String,
    /// Session ID for this target.
    pub(super) session_id: String,
    /// Connection shared with the client.
    pub(super) conn: Arc<Connection>,
    /// Events routed to this session.
    pub(super) event_rx: Mutex<mpsc::UnboundedReceiver<CdpResponse>>,
    /// Document root node id; node ids are only valid until the document changes.
    pub(super) root_node: Mutex<Option<i64>>,
}

impl PageSession {
    /// Create a new page session.
    pub(crate) fn new(
        target_id: String,
        session_id: String,
        conn: Arc<Connection>,
        event_rx: mpsc::UnboundedReceiver<CdpResponse>,
    ) -> Self {
        Self {
            target_id,
            session_id,
            conn,
            event_rx: Mutex::new(event_rx),
            root_node: Mutex::new(None),
        }
    }

    /// Get target ID.
    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    /// Get session ID.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Send a CDP command to this page session.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, CdpError> {
        self.conn.send(method, params, Some(&self.session_id)).await
    }

    /// Enable required CDP domains.
    pub(crate) async fn enable_domains(&self) -> Result<(), CdpError> {
        self.call("Page.enable", None).await?;
        self.call("DOM.enable", None).await?;
        self.call("Runtime.enable", None).await?;

        debug!("Enabled CDP domains for session {}", self.session_id);
        Ok(())
    }

    /// Consume queued events, forgetting the cached document root if the
    /// document was replaced.
    pub(super) fn drain_events(&self) {
        let mut rx = self.event_rx.lock();
        while let Ok(event) = rx.try_recv() {
            if invalidates_document(event.method.as_deref()) {
                debug!("Document updated in session {}", self.session_id);
                self.root_node.lock().take();
            }
        }
    }

    /// Forget the cached document root.
    pub(super) fn reset_document(&self) {
        self.root_node.lock().take();
    }
}

/// Events after which previously issued node ids are no longer valid.
pub(super) fn invalidates_document(method: Option<&str>) -> bool {
    method == Some("DOM.documentUpdated")
}
