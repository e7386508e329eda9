use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use gatelink_client::error::TransportError;
use gatelink_client::transport::DeviceTransport;
use serde_json::Value;

/// In-memory device: replays queued replies, then repeats `fallback`.
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<Value, TransportError>>>,
    fallback: Value,
    calls: AtomicUsize,
}

impl ScriptedTransport {
    pub fn new(fallback: Value) -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            fallback,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn push(&self, reply: Result<Value, TransportError>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn next(&self) -> Result<Value, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(self.fallback.clone()))
    }
}

#[async_trait]
impl DeviceTransport for ScriptedTransport {
    async fn get(&self, _path: &str) -> Result<Value, TransportError> {
        self.next()
    }

    async fn post(&self, _path: &str, _body: &Value) -> Result<Value, TransportError> {
        self.next()
    }
}

pub fn timeout() -> Result<Value, TransportError> {
    Err(TransportError::Timeout {
        path: "/getstatus".to_string(),
    })
}
