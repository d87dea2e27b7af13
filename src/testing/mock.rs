//! Scripted connector for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::connector::{Connector, ConnectorError, HttpRequest, HttpResponse};

/// One scripted outcome.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// An HTTP response of any status
    Response(HttpResponse),
    /// A transport-level failure
    Failure(String),
    /// A request the connector refuses to build
    Invalid(String),
}

/// Connector that replays scripted replies in order and records every
/// request it receives.
///
/// When the script runs out, further sends fail at the transport level.
#[derive(Debug, Default)]
pub struct MockConnector {
    replies: Mutex<VecDeque<MockReply>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockConnector {
    /// Create a connector with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply.
    pub fn push(&self, reply: MockReply) -> &Self {
        self.replies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(reply);
        self
    }

    /// Queue a response.
    pub fn push_response(&self, response: HttpResponse) -> &Self {
        self.push(MockReply::Response(response))
    }

    /// Queue a JSON response.
    pub fn push_json(&self, status: u16, body: &Value) -> &Self {
        self.push_response(HttpResponse::json(status, body))
    }

    /// Queue a transport failure.
    pub fn push_failure(&self, message: &str) -> &Self {
        self.push(MockReply::Failure(message.to_string()))
    }

    /// Queue a request-construction failure.
    pub fn push_invalid(&self, message: &str) -> &Self {
        self.push(MockReply::Invalid(message.to_string()))
    }

    /// Requests received so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Number of send attempts so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// The most recent request, if any.
    #[must_use]
    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .last()
            .cloned()
    }
}

#[async_trait]
impl Connector for MockConnector {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ConnectorError> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request.clone());

        let reply = self
            .replies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();

        match reply {
            Some(MockReply::Response(response)) => Ok(response),
            Some(MockReply::Failure(message)) => Err(ConnectorError::Transport(message)),
            Some(MockReply::Invalid(message)) => Err(ConnectorError::InvalidRequest(message)),
            None => Err(ConnectorError::Transport("no scripted reply".to_string())),
        }
    }
}
