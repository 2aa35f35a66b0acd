use serde::Serialize;
use serde_json::Value;
use tokio::sync::oneshot;
use tracing::debug;

/// What a method call answers with.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MethodResult {
    Success(Value),
    Error {
        code: String,
        message: String,
        details: Value,
    },
    NotImplemented,
}

impl MethodResult {
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        MethodResult::Error {
            code: code.into(),
            message: message.into(),
            details: Value::Null,
        }
    }
}

/// Single-shot completion handle owned by one request.
///
/// `send` consumes the handle, so a request is answered at most once.
/// Dropping it unanswered closes the caller's `PendingReply`.
#[derive(Debug)]
pub struct Reply {
    tx: oneshot::Sender<MethodResult>,
}

/// The caller's end of a `Reply`.
#[derive(Debug)]
pub struct PendingReply {
    rx: oneshot::Receiver<MethodResult>,
}

impl Reply {
    pub fn channel() -> (Reply, PendingReply) {
        let (tx, rx) = oneshot::channel();
        (Reply { tx }, PendingReply { rx })
    }

    pub fn send(self, result: MethodResult) {
        if self.tx.send(result).is_err() {
            debug!("reply discarded, caller no longer waiting");
        }
    }

    pub fn success(self, value: Value) {
        self.send(MethodResult::Success(value));
    }
}

impl PendingReply {
    /// `None` when the handle was dropped without an answer.
    pub async fn wait(self) -> Option<MethodResult> {
        self.rx.await.ok()
    }

    /// Blocking wait for callers outside the runtime.
    pub fn blocking_wait(self) -> Option<MethodResult> {
        self.rx.blocking_recv().ok()
    }
}
