//! In-memory `HttpClient` with scripted replies

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use crm_client::{ClientError, ClientResult, HttpClient};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

#[derive(Debug, Clone)]
pub enum Reply {
    Json(Value),
    /// Non-2xx status with a message body
    Status(u16, String),
    Network,
}

#[derive(Debug, Clone)]
struct Scripted {
    reply: Reply,
    delay: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: &'static str,
    pub path: String,
    pub body: Option<Value>,
}

/// Replies are queued per `(method, path)`; the last one is repeated
#[derive(Debug, Default)]
pub struct MockHttp {
    replies: Mutex<HashMap<(&'static str, String), VecDeque<Scripted>>>,
    calls: Mutex<Vec<Call>>,
}

impl MockHttp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(self, method: &'static str, path: &str, reply: Reply) -> Self {
        self.on_delayed(method, path, reply, Duration::ZERO)
    }

    pub fn on_delayed(self, method: &'static str, path: &str, reply: Reply, delay: Duration) -> Self {
        self.replies
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(Scripted { reply, delay });
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, method: &str, path: &str) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| c.method == method && c.path == path)
            .collect()
    }

    async fn respond<T: DeserializeOwned>(
        &self,
        method: &'static str,
        path: &str,
        body: Option<Value>,
    ) -> ClientResult<T> {
        self.calls.lock().unwrap().push(Call {
            method,
            path: path.to_string(),
            body,
        });

        let scripted = {
            let mut replies = self.replies.lock().unwrap();
            match replies.get_mut(&(method, path.to_string())) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };
        let Some(scripted) = scripted else {
            return Err(ClientError::Remote {
                status: 404,
                message: format!("Cannot {method} {path}"),
            });
        };

        if !scripted.delay.is_zero() {
            tokio::time::sleep(scripted.delay).await;
        }

        match scripted.reply {
            Reply::Json(value) => Ok(serde_json::from_value(value)?),
            Reply::Status(status, _) if status == 401 || (300..400).contains(&status) => {
                Err(ClientError::AuthRequired { status })
            }
            Reply::Status(status, message) => Err(ClientError::Remote { status, message }),
            Reply::Network => Err(ClientError::Network("connection refused".into())),
        }
    }
}

#[async_trait]
impl HttpClient for MockHttp {
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.respond("GET", path, None).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let body = serde_json::to_value(body)?;
        self.respond("POST", path, Some(body)).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let body = serde_json::to_value(body)?;
        self.respond("PUT", path, Some(body)).await
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.respond("DELETE", path, None).await
    }

    fn base_url(&self) -> &str {
        "http://crm.test"
    }
}

pub fn customer_json(id: &str, name: &str, email: &str) -> Value {
    serde_json::json!({
        "_id": id,
        "name": name,
        "email": email,
        "phone": "555-0100",
        "totalSpend": 1250.5,
        "visits": 4,
        "createdAt": "2024-01-01T00:00:00.000Z",
        "updatedAt": "2024-01-01T00:00:00.000Z"
    })
}

pub fn campaign_json(id: &str, name: &str) -> Value {
    serde_json::json!({
        "_id": id,
        "name": name,
        "audience": {
            "rules": [{"field": "totalSpend", "operator": ">", "value": 1000}],
            "combinator": "$and"
        },
        "messageTemplate": "Hi {{name}}",
        "audienceSize": 1234,
        "deliveryStats": {"sent": 10, "failed": 2, "pending": 0},
        "status": "Completed",
        "createdAt": "2024-03-01T09:00:00.000Z",
        "updatedAt": "2024-03-01T09:00:00.000Z"
    })
}
