//! Scripted CDP endpoint for driving `CdpPage` and the runner without a browser.
//!
//! Every request is answered by a responder closure; whatever it does not
//! handle falls back to [`browser_defaults`], which is enough to create and
//! attach a page whose document has finished loading.

use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;

type Responder = dyn Fn(&str, &Value) -> Option<Result<Value, String>> + Send + Sync;

/// A WebSocket CDP endpoint on localhost plus the log of methods it received.
pub(crate) struct FakeCdp {
    endpoint: String,
    methods: Arc<Mutex<Vec<String>>>,
    task: JoinHandle<()>,
}

impl FakeCdp {
    /// Serve CDP on an ephemeral port.
    ///
    /// `respond` returns `None` to fall back to the defaults, `Some(Err(msg))`
    /// to answer with a protocol error.
    pub(crate) async fn start(
        respond: impl Fn(&str, &Value) -> Option<Result<Value, String>> + Send + Sync + 'static,
    ) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let methods = Arc::new(Mutex::new(Vec::new()));
        let respond: Arc<Responder> = Arc::new(respond);

        let task = {
            let methods = methods.clone();
            tokio::spawn(async move {
                while let Ok((stream, _)) = listener.accept().await {
                    let methods = methods.clone();
                    let respond = respond.clone();
                    tokio::spawn(async move {
                        let Ok(mut ws) = tokio_tungstenite::accept_async(stream).await else {
                            return;
                        };
                        while let Some(Ok(msg)) = ws.next().await {
                            let Message::Text(text) = msg else { continue };
                            let request: Value = serde_json::from_str(&text).unwrap();
                            let method = request["method"].as_str().unwrap_or_default().to_string();
                            methods.lock().push(method.clone());

                            let outcome = respond(&method, &request["params"])
                                .unwrap_or_else(|| Ok(browser_defaults(&method)));
                            let mut reply = match outcome {
                                Ok(result) => json!({"id": request["id"], "result": result}),
                                Err(message) => json!({
                                    "id": request["id"],
                                    "error": {"code": -32000, "message": message},
                                }),
                            };
                            if let Some(session_id) = request.get("sessionId") {
                                reply["sessionId"] = session_id.clone();
                            }
                            if ws.send(Message::Text(reply.to_string().into())).await.is_err() {
                                break;
                            }
                        }
                    });
                }
            })
        };

        Self {
            endpoint: format!("ws://{}/devtools/browser/fake", addr),
            methods,
            task,
        }
    }

    pub(crate) fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Methods received so far, in arrival order.
    pub(crate) fn methods(&self) -> Vec<String> {
        self.methods.lock().clone()
    }
}

impl Drop for FakeCdp {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Answers for a blank, fully loaded page.
pub(crate) fn browser_defaults(method: &str) -> Value {
    match method {
        "Target.createTarget" => json!({"targetId": "T1"}),
        "Target.attachToTarget" => json!({"sessionId": "S1"}),
        "Page.navigate" => json!({"frameId": "F1"}),
        "Runtime.evaluate" => json!({"result": {"type": "string", "value": "complete"}}),
        "DOM.getDocument" => json!({"root": {"nodeId": 1, "nodeName": "#document"}}),
        "DOM.querySelector" => json!({"nodeId": 0}),
        "DOM.querySelectorAll" => json!({"nodeIds": []}),
        _ => json!({}),
    }
}
