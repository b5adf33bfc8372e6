// Scripted transport for unit tests.

use crate::domain::model::{FailureCause, FetchResponse};
use crate::domain::ports::Transport;
use crate::utils::error::{Result, WatchError};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

#[derive(Debug, Clone)]
pub enum Reply {
    Ok(u16, String),
    Fail(FailureCause),
}

impl Reply {
    pub fn ok(body: &str) -> Self {
        Reply::Ok(200, body.to_string())
    }

    pub fn fail(cause: FailureCause) -> Self {
        Reply::Fail(cause)
    }
}

/// Replies are consumed in order; the last one repeats. Unknown URLs fail
/// with a connection error.
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<String, VecDeque<Reply>>>,
    calls: Mutex<Vec<String>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(self, url: &str, replies: Vec<Reply>) -> Self {
        self.routes
            .lock()
            .unwrap()
            .insert(url.to_string(), replies.into_iter().collect());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, url: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| c.as_str() == url).count()
    }

    fn next_reply(&self, url: &str) -> Reply {
        let mut routes = self.routes.lock().unwrap();
        match routes.get_mut(url) {
            Some(queue) if queue.len() > 1 => queue
                .pop_front()
                .unwrap_or(Reply::Fail(FailureCause::Connect)),
            Some(queue) => queue
                .front()
                .cloned()
                .unwrap_or(Reply::Fail(FailureCause::Connect)),
            None => Reply::Fail(FailureCause::Connect),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, url: &str) -> Result<FetchResponse> {
        self.calls.lock().unwrap().push(url.to_string());
        match self.next_reply(url) {
            Reply::Ok(status, body) => Ok(FetchResponse { status, body }),
            Reply::Fail(cause) => Err(WatchError::TransportError {
                url: url.to_string(),
                cause,
                message: format!("scripted {}", cause),
            }),
        }
    }
}
