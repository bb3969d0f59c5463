//! StreamLive REST API client

use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};

/// Every endpoint lives under this prefix
pub const API_PREFIX: &str = "/api";

/// Largest file the upload form accepts (2 GiB)
pub const MAX_UPLOAD_BYTES: u64 = 2 * 1024 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid JSON response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<ureq::Error> for ApiError {
    fn from(e: ureq::Error) -> Self {
        ApiError::Transport(e.to_string())
    }
}

/// Raw HTTP reply; status is kept for the upload path
#[derive(Debug, Clone)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

/// `multipart/form-data` body streamed from disk
pub struct Multipart {
    boundary: String,
    fields: Vec<(String, String)>,
    file_field: String,
    file_path: PathBuf,
}

impl Multipart {
    pub fn new(file_field: &str, file_path: &Path) -> Self {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        Self {
            boundary: format!("----streamlive{:x}", nanos),
            fields: Vec::new(),
            file_field: file_field.to_string(),
            file_path: file_path.to_path_buf(),
        }
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.fields.push((name.to_string(), value.to_string()));
        self
    }

    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    fn head(&self) -> Vec<u8> {
        let mut head = String::new();
        for (name, value) in &self.fields {
            head.push_str(&format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                self.boundary, name, value
            ));
        }
        let filename = self
            .file_path
            .file_name()
            .map(|n| n.to_string_lossy().replace('"', "_"))
            .unwrap_or_else(|| "upload.bin".to_string());
        head.push_str(&format!(
            "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n",
            self.boundary, self.file_field, filename
        ));
        head.into_bytes()
    }

    fn tail(&self) -> Vec<u8> {
        format!("\r\n--{}--\r\n", self.boundary).into_bytes()
    }

    /// Opens the file and returns the full body reader with its exact length
    pub fn into_reader(self) -> Result<(Box<dyn Read + Send>, u64), ApiError> {
        let file = File::open(&self.file_path)?;
        let file_len = file.metadata()?.len();
        let head = self.head();
        let tail = self.tail();
        let total = head.len() as u64 + file_len + tail.len() as u64;
        let reader = Cursor::new(head).chain(file).chain(Cursor::new(tail));
        Ok((Box::new(reader), total))
    }
}

/// Counts bytes as the body is pulled by the HTTP layer
pub struct ProgressReader<'a, R> {
    inner: R,
    sent: u64,
    total: u64,
    on_progress: &'a mut dyn FnMut(u64, u64),
}

impl<'a, R: Read> ProgressReader<'a, R> {
    pub fn new(inner: R, total: u64, on_progress: &'a mut dyn FnMut(u64, u64)) -> Self {
        Self {
            inner,
            sent: 0,
            total,
            on_progress,
        }
    }
}

impl<R: Read> Read for ProgressReader<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        if n > 0 {
            self.sent += n as u64;
            (self.on_progress)(self.sent, self.total);
        }
        Ok(n)
    }
}

/// HTTP seam; the real one is ureq, tests swap in canned replies
pub trait Transport: Send + Sync {
    fn send(&self, method: Method, url: &str, body: Option<&Value>) -> Result<HttpReply, ApiError>;

    fn send_multipart(
        &self,
        url: &str,
        form: Multipart,
        on_progress: &mut dyn FnMut(u64, u64),
    ) -> Result<HttpReply, ApiError>;
}

pub struct UreqTransport {
    agent: ureq::Agent,
    upload_agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        // Status codes are surfaced as replies: the backend reports
        // failures in the JSON body and the upload path needs non-200 bodies.
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .new_agent();
        // Uploads can run for minutes; only bound the connect phase
        let upload_agent = ureq::Agent::config_builder()
            .timeout_connect(Some(timeout))
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent, upload_agent }
    }
}

impl Transport for UreqTransport {
    fn send(&self, method: Method, url: &str, body: Option<&Value>) -> Result<HttpReply, ApiError> {
        let payload = match body {
            Some(value) => serde_json::to_vec(value)?,
            None => b"{}".to_vec(),
        };

        let result = match method {
            Method::Get => self.agent.get(url).header("Accept", "application/json").call(),
            Method::Delete => self.agent.delete(url).header("Accept", "application/json").call(),
            Method::Post => self
                .agent
                .post(url)
                .header("Content-Type", "application/json")
                .send(&payload[..]),
            Method::Put => self
                .agent
                .put(url)
                .header("Content-Type", "application/json")
                .send(&payload[..]),
        };

        let mut response = result?;
        let status = response.status().as_u16();
        let body = response.body_mut().read_to_string()?;
        Ok(HttpReply { status, body })
    }

    fn send_multipart(
        &self,
        url: &str,
        form: Multipart,
        on_progress: &mut dyn FnMut(u64, u64),
    ) -> Result<HttpReply, ApiError> {
        let content_type = form.content_type();
        let (reader, total) = form.into_reader()?;
        let mut reader = ProgressReader::new(reader, total, on_progress);

        let mut response = self
            .upload_agent
            .post(url)
            .header("Content-Type", &content_type)
            .header("Content-Length", &total.to_string())
            .send(ureq::SendBody::from_reader(&mut reader))?;
        let status = response.status().as_u16();
        let body = response.body_mut().read_to_string()?;
        Ok(HttpReply { status, body })
    }
}

/// Uniform failure payload for mutations
pub fn failure(message: &str) -> Value {
    json!({ "success": false, "message": message })
}

/// Outcome of a mutating call
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
    pub raw: Value,
}

impl ApiResponse {
    pub fn from_value(raw: Value) -> Self {
        let success = raw.get("success").and_then(Value::as_bool).unwrap_or(false);
        let message = raw
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        Self {
            success,
            message,
            raw,
        }
    }

    pub fn failed(message: &str) -> Self {
        Self::from_value(failure(message))
    }

    /// Integer field carried next to `message` (e.g. scan counters)
    pub fn count(&self, key: &str) -> i64 {
        self.raw.get(key).and_then(Value::as_i64).unwrap_or(0)
    }
}

/// Ensures the server has a scheme and no trailing slash
pub fn normalize_server(server: &str) -> String {
    let server = server.trim().trim_end_matches('/');
    if server.starts_with("http://") || server.starts_with("https://") {
        server.to_string()
    } else {
        format!("http://{}", server)
    }
}

#[derive(Clone)]
pub struct ApiClient {
    server: String,
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    pub fn new(server: &str, timeout: Duration) -> Self {
        Self::with_transport(server, Arc::new(UreqTransport::new(timeout)))
    }

    pub fn with_transport(server: &str, transport: Arc<dyn Transport>) -> Self {
        Self {
            server: normalize_server(server),
            transport,
        }
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    /// Absolute URL for an API path such as `/channels`
    pub fn url(&self, path: &str) -> String {
        format!("{}{}{}", self.server, API_PREFIX, path)
    }

    fn request(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value, ApiError> {
        let url = self.url(path);
        log::debug!("{} {}", method.as_str(), url);
        let reply = self.transport.send(method, &url, body)?;
        Ok(serde_json::from_str(&reply.body)?)
    }

    /// GET; any failure yields an empty object
    pub fn get(&self, path: &str) -> Value {
        match self.request(Method::Get, path, None) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("API error on GET {}: {}", path, e);
                Value::Object(Map::new())
            }
        }
    }

    /// GET decoded into a typed envelope; a mismatched shape yields the default
    pub fn get_as<T: DeserializeOwned + Default>(&self, path: &str) -> T {
        let value = self.get(path);
        serde_json::from_value(value).unwrap_or_else(|e| {
            log::warn!("Unexpected payload from GET {}: {}", path, e);
            T::default()
        })
    }

    fn mutate(&self, method: Method, path: &str, body: Option<&Value>) -> Value {
        match self.request(method, path, body) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("API error on {} {}: {}", method.as_str(), path, e);
                failure(&e.to_string())
            }
        }
    }

    pub fn post(&self, path: &str, body: &Value) -> Value {
        self.mutate(Method::Post, path, Some(body))
    }

    pub fn put(&self, path: &str, body: &Value) -> Value {
        self.mutate(Method::Put, path, Some(body))
    }

    pub fn delete(&self, path: &str) -> Value {
        self.mutate(Method::Delete, path, None)
    }

    /// Streams a video to `/videos/upload`, reporting `(sent, total)` bytes
    pub fn upload_video(
        &self,
        title: &str,
        file: &Path,
        on_progress: &mut dyn FnMut(u64, u64),
    ) -> ApiResponse {
        let form = Multipart::new("file", file).text("title", title);
        let url = self.url("/videos/upload");
        log::info!("Uploading {} to {}", file.display(), url);

        match self.transport.send_multipart(&url, form, on_progress) {
            Ok(reply) => {
                let body: Value = serde_json::from_str(&reply.body).unwrap_or(Value::Null);
                let message = body.get("message").and_then(Value::as_str).unwrap_or_default();
                if reply.status == 200 {
                    ApiResponse {
                        success: true,
                        message: message.to_string(),
                        raw: body,
                    }
                } else {
                    log::warn!("Upload rejected with HTTP {}", reply.status);
                    let message = if message.is_empty() { "Upload failed" } else { message };
                    ApiResponse {
                        success: false,
                        message: message.to_string(),
                        raw: body,
                    }
                }
            }
            Err(e) => {
                log::error!("Upload error: {}", e);
                ApiResponse::failed("Upload error!")
            }
        }
    }
}

#[cfg(test)]
#[path = "api_tests.rs"]
mod tests;
