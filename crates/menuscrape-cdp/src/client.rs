//! CDP WebSocket client.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot, RwLock};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, trace, warn};
use url::Url;

use crate::error::CdpError;
use crate::protocol::{BrowserVersion, CdpRequest, CdpResponse};
use crate::session::PageSession;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;
type WsSource = SplitStream<WsStream>;
type EventHandlers = Arc<RwLock<HashMap<String, mpsc::UnboundedSender<CdpResponse>>>>;

/// Pending request waiting for response.
struct PendingRequest {
    tx: oneshot::Sender<Result<Value, CdpError>>,
}

/// Request/response plumbing shared by the client and its page sessions.
pub(crate) struct Connection {
    ws_tx: tokio::sync::Mutex<WsSink>,
    request_id: AtomicU64,
    pending: Mutex<HashMap<u64, PendingRequest>>,
    request_timeout: Duration,
}

impl Connection {
    /// Send a CDP command and wait for its response.
    pub(crate) async fn send(
        &self,
        method: &str,
        params: Option<Value>,
        session_id: Option<&str>,
    ) -> Result<Value, CdpError> {
        let id = self.request_id.fetch_add(1, Ordering::SeqCst);

        let request = CdpRequest {
            id,
            method: method.to_string(),
            params,
            session_id: session_id.map(|s| s.to_string()),
        };

        let json = serde_json::to_string(&request)?;
        trace!("CDP send: {}", json);

        let (tx, rx) = oneshot::channel();
        self.pending.lock().insert(id, PendingRequest { tx });

        {
            let mut ws = self.ws_tx.lock().await;
            if let Err(e) = ws.send(Message::Text(json.into())).await {
                self.pending.lock().remove(&id);
                return Err(e.into());
            }
        }

        match tokio::time::timeout(self.request_timeout, rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(CdpError::SessionClosed),
            Err(_) => {
                self.pending.lock().remove(&id);
                Err(CdpError::Timeout(format!(
                    "Request {} timed out after {}s",
                    method,
                    self.request_timeout.as_secs()
                )))
            }
        }
    }

    /// Route one response to the request waiting on it.
    fn resolve(&self, id: u64, result: Result<Value, CdpError>) {
        if let Some(req) = self.pending.lock().remove(&id) {
            let _ = req.tx.send(result);
        }
    }

    /// Fail every outstanding request once the socket is gone.
    fn fail_all(&self) {
        let drained: Vec<_> = self.pending.lock().drain().collect();
        for (_, req) in drained {
            let _ = req.tx.send(Err(CdpError::SessionClosed));
        }
    }
}

/// CDP client for browser automation.
///
/// Holds one browser-level WebSocket; page sessions are multiplexed over it
/// using flattened `sessionId`s.
pub struct CdpClient {
    conn: Arc<Connection>,
    event_handlers: EventHandlers,
    _recv_task: tokio::task::JoinHandle<()>,
}

impl CdpClient {
    /// Connect to a browser.
    ///
    /// `endpoint` is either an HTTP debugging endpoint (e.g.
    /// `http://localhost:9222`), resolved through `/json/version`, or a
    /// browser WebSocket URL (`ws://…/devtools/browser/…`) used as is.
    ///
    /// ```rust,ignore
    /// let client = CdpClient::connect("http://localhost:9222", Duration::from_secs(30)).await?;
    /// ```
    pub async fn connect(endpoint: &str, request_timeout: Duration) -> Result<Self, CdpError> {
        let browser_ws_url = match version_url(endpoint)? {
            Some(version_url) => {
                debug!("Fetching browser version from {}", version_url);
                let version = fetch_version(&version_url, request_timeout).await?;
                debug!("Found browser: {}", version.browser);
                version.web_socket_debugger_url
            }
            None => endpoint.to_string(),
        };

        let (ws_stream, _) =
            tokio::time::timeout(request_timeout, tokio_tungstenite::connect_async(&browser_ws_url))
                .await
                .map_err(|_| {
                    CdpError::ConnectionFailed(format!(
                        "WebSocket handshake with {} timed out after {}s",
                        browser_ws_url,
                        request_timeout.as_secs()
                    ))
                })?
                .map_err(|e| CdpError::ConnectionFailed(format!("WebSocket: {}", e)))?;

        let (ws_sink, ws_source) = ws_stream.split();
        let conn = Arc::new(Connection {
            ws_tx: tokio::sync::Mutex::new(ws_sink),
            request_id: AtomicU64::new(1),
            pending: Mutex::new(HashMap::new()),
            request_timeout,
        });
        let event_handlers: EventHandlers = Arc::new(RwLock::new(HashMap::new()));

        let recv_task = {
            let conn = conn.clone();
            let event_handlers = event_handlers.clone();
            tokio::spawn(async move {
                Self::receive_loop(ws_source, conn, event_handlers).await;
            })
        };

        debug!("CDP client connected to {}", browser_ws_url);

        Ok(Self {
            conn,
            event_handlers,
            _recv_task: recv_task,
        })
    }

    /// WebSocket receive loop.
    async fn receive_loop(mut ws_source: WsSource, conn: Arc<Connection>, event_handlers: EventHandlers) {
        while let Some(msg) = ws_source.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    trace!("CDP recv: {}", text);
                    match serde_json::from_str::<CdpResponse>(&text) {
                        Ok(resp) => {
                            if let Some(id) = resp.id {
                                let result = match resp.error {
                                    Some(error) => Err(CdpError::Protocol {
                                        code: error.code,
                                        message: error.message,
                                    }),
                                    None => Ok(resp.result.unwrap_or(Value::Null)),
                                };
                                conn.resolve(id, result);
                            } else if resp.method.is_some() {
                                let session_id = resp.session_id.clone().unwrap_or_default();
                                let handlers = event_handlers.read().await;
                                if let Some(tx) = handlers.get(&session_id) {
                                    let _ = tx.send(resp);
                                }
                            }
                        }
                        Err(e) => {
                            warn!("Failed to parse CDP message: {}", e);
                        }
                    }
                }
                Ok(Message::Close(_)) => {
                    debug!("WebSocket closed");
                    break;
                }
                Err(e) => {
                    error!("WebSocket error: {}", e);
                    break;
                }
                _ => {}
            }
        }
        conn.fail_all();
    }

    /// Send a browser-level CDP command.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, CdpError> {
        self.conn.send(method, params, None).await
    }

    /// Open a blank tab and attach a page session to it.
    pub async fn new_page(&self) -> Result<PageSession, CdpError> {
        let result = self
            .call("Target.createTarget", Some(json!({"url": "about:blank"})))
            .await?;

        let target_id = result["targetId"]
            .as_str()
            .ok_or_else(|| CdpError::InvalidResponse("Missing targetId".to_string()))?
            .to_string();
        debug!("Created target {}", target_id);

        self.attach_page(&target_id).await
    }

    /// Attach to an existing page.
    pub async fn attach_page(&self, target_id: &str) -> Result<PageSession, CdpError> {
        let result = self
            .call(
                "Target.attachToTarget",
                Some(json!({
                    "targetId": target_id,
                    "flatten": true
                })),
            )
            .await?;

        let session_id = result["sessionId"]
            .as_str()
            .ok_or_else(|| CdpError::InvalidResponse("Missing sessionId".to_string()))?
            .to_string();

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        self.event_handlers
            .write()
            .await
            .insert(session_id.clone(), event_tx);

        let session = PageSession::new(
            target_id.to_string(),
            session_id,
            self.conn.clone(),
            event_rx,
        );

        session.enable_domains().await?;

        Ok(session)
    }

    /// Close a page and stop routing its events.
    pub async fn close_page(&self, session: PageSession) -> Result<(), CdpError> {
        self.event_handlers.write().await.remove(session.session_id());
        self.call(
            "Target.closeTarget",
            Some(json!({"targetId": session.target_id()})),
        )
        .await?;
        Ok(())
    }
}

impl Drop for CdpClient {
    fn drop(&mut self) {
        self._recv_task.abort();
    }
}

/// Fetch `/json/version`, giving up after `timeout`.
pub(crate) async fn fetch_version(version_url: &str, timeout: Duration) -> Result<BrowserVersion, CdpError> {
    let unavailable = |e: reqwest::Error| CdpError::BrowserNotAvailable(format!("{}: {}", version_url, e));

    let http = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| CdpError::Http(e.to_string()))?;

    http.get(version_url)
        .send()
        .await
        .map_err(unavailable)?
        .json()
        .await
        .map_err(unavailable)
}

/// The `/json/version` discovery URL for an HTTP endpoint, or `None` when the
/// endpoint is already a WebSocket URL.
fn version_url(endpoint: &str) -> Result<Option<String>, CdpError> {
    let url = Url::parse(endpoint)?;
    match url.scheme() {
        "ws" | "wss" => Ok(None),
        "http" | "https" => Ok(Some(format!(
            "{}/json/version",
            endpoint.trim_end_matches('/')
        ))),
        other => Err(CdpError::ConnectionFailed(format!(
            "Unsupported endpoint scheme '{}' in {}",
            other, endpoint
        ))),
    }
}
