//! Canned-response transport for tests

use std::collections::HashMap;
use std::io::Read;
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::api::{ApiClient, ApiError, HttpReply, Method, Multipart, Transport};

pub const FAKE_SERVER: &str = "http://backend.test";

#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

#[derive(Default)]
pub struct FakeTransport {
    routes: Mutex<HashMap<(Method, String), (u16, String)>>,
    requests: Mutex<Vec<Recorded>>,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Registers a reply for `method` + API path (without the `/api` prefix)
    pub fn route(&self, method: Method, path: &str, body: &str) {
        self.route_status(method, path, 200, body);
    }

    pub fn route_status(&self, method: Method, path: &str, status: u16, body: &str) {
        self.routes
            .lock()
            .unwrap()
            .insert((method, path.to_string()), (status, body.to_string()));
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    fn path_of(url: &str) -> String {
        let prefix = format!("{}/api", FAKE_SERVER);
        url.strip_prefix(&prefix).unwrap_or(url).to_string()
    }

    fn reply(&self, method: Method, path: &str) -> Result<HttpReply, ApiError> {
        match self.routes.lock().unwrap().get(&(method, path.to_string())) {
            Some((status, body)) => Ok(HttpReply {
                status: *status,
                body: body.clone(),
            }),
            None => Err(ApiError::Transport("connection refused".to_string())),
        }
    }
}

impl Transport for FakeTransport {
    fn send(&self, method: Method, url: &str, body: Option<&Value>) -> Result<HttpReply, ApiError> {
        let path = Self::path_of(url);
        self.requests.lock().unwrap().push(Recorded {
            method,
            path: path.clone(),
            body: body.cloned(),
        });
        self.reply(method, &path)
    }

    fn send_multipart(
        &self,
        url: &str,
        form: Multipart,
        on_progress: &mut dyn FnMut(u64, u64),
    ) -> Result<HttpReply, ApiError> {
        let path = Self::path_of(url);
        self.requests.lock().unwrap().push(Recorded {
            method: Method::Post,
            path: path.clone(),
            body: None,
        });
        let (mut reader, total) = form.into_reader()?;
        let mut sink = Vec::new();
        reader.read_to_end(&mut sink)?;
        on_progress(sink.len() as u64, total);
        self.reply(Method::Post, &path)
    }
}

pub fn client(transport: &Arc<FakeTransport>) -> ApiClient {
    ApiClient::with_transport(FAKE_SERVER, transport.clone())
}
