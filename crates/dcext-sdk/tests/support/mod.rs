#![allow(dead_code)]

use dcext_channel::{Endpoint, Envelope, RequestId};
use serde_json::{json, Value};

/// Scripted host driving the far end of a memory pair.
pub struct FakeHost {
    endpoint: Endpoint,
}

impl FakeHost {
    pub fn new(endpoint: Endpoint) -> Self {
        Self { endpoint }
    }

    pub async fn recv(&mut self) -> Envelope {
        self.endpoint.recv().await.expect("extension went away")
    }

    /// Wait for the hello and answer it.
    pub async fn accept(&mut self) {
        match self.recv().await {
            Envelope::Connect { protocol, version } => {
                self.endpoint
                    .post(Envelope::Connected { protocol, version })
                    .expect("hello reply should post");
            }
            other => panic!("expected connect, got {other:?}"),
        }
    }

    pub async fn expect_request(&mut self, expected: &str) -> (RequestId, Value) {
        match self.recv().await {
            Envelope::Request { id, event, payload } => {
                assert_eq!(event, expected);
                (id, payload.unwrap_or(Value::Null))
            }
            other => panic!("expected request '{expected}', got {other:?}"),
        }
    }

    pub fn resolve(&self, id: RequestId, payload: Value) {
        self.endpoint
            .post(Envelope::Resolve { id, payload })
            .expect("resolve should post");
    }

    pub fn reject(&self, id: RequestId, reason: &str) {
        self.endpoint
            .post(Envelope::Reject {
                id,
                reason: reason.to_string(),
            })
            .expect("reject should post");
    }

    pub fn ask(&self, id: RequestId, event: &str) {
        self.endpoint
            .post(Envelope::Request {
                id,
                event: event.to_string(),
                payload: None,
            })
            .expect("request should post");
    }
}

pub fn field_context() -> Value {
    json!({
        "contentItemId": "5b32377e-0000-0000-0000-000000000000",
        "contentType": { "$id": "https://schema.example/blog.json", "title": "Blog" },
        "fieldSchema": { "type": "string", "title": "Headline", "maxLength": 80 },
        "params": {
            "instance": { "placeholder": "Headline" },
            "installation": { "apiKey": "k" }
        },
        "locales": { "default": ["en-GB"], "available": [{ "locale": "en-GB" }] },
        "stagingEnvironment": { "domain": "stage.example", "src": "https://stage.example" },
        "visualisation": "https://vis.example/preview"
    })
}

pub fn dashboard_context() -> Value {
    json!({
        "hubId": "5c0e5d1b-0000-0000-0000-000000000000",
        "locationHref": "https://app.example/#!/hub/dashboard",
        "params": { "instance": {}, "installation": {} }
    })
}

pub fn user_record(id: &str) -> Value {
    json!({
        "id": id,
        "type": "users",
        "attributes": {
            "email": "testuser@x.io",
            "first-name": "Test",
            "last-name": "User"
        }
    })
}
