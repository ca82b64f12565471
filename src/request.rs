use branchdesk_shared::{HttpMethod, MultipartForm};
use std::collections::HashMap;

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::collections::VecDeque;

// =========================================================
// 核心抽象层 (HTTP Interface Abstraction)
// =========================================================

/// 请求体
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Text(String),
    Multipart(MultipartForm),
}

/// 通用 HTTP 请求结构
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: HashMap<String, String>,
    pub body: Option<RequestBody>,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: HashMap::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_json(mut self, body: &serde_json::Value) -> Self {
        self.body = Some(RequestBody::Text(body.to_string()));
        self
    }

    pub fn with_multipart(mut self, form: MultipartForm) -> Self {
        self.body = Some(RequestBody::Multipart(form));
        self
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

/// 通用 HTTP 响应结构
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// 传输层失败：请求没有得到任何响应
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct TransportError(pub String);

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// HTTP 客户端特性 (Trait)
/// (?Send) 是因为浏览器环境下 fetch 相关类型不是 Send 的
#[async_trait::async_trait(?Send)]
pub trait HttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError>;
}

// =========================================================
// 测试实现: Reqwest 客户端
// =========================================================

#[cfg(test)]
#[derive(Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

#[cfg(test)]
impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[cfg(test)]
#[async_trait::async_trait(?Send)]
impl HttpClient for ReqwestHttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        use branchdesk_shared::FormPart;

        let method = match req.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
            HttpMethod::Patch => reqwest::Method::PATCH,
        };

        let mut builder = self.client.request(method, &req.url);

        for (k, v) in req.headers {
            builder = builder.header(k, v);
        }

        match req.body {
            Some(RequestBody::Text(body)) => builder = builder.body(body),
            Some(RequestBody::Multipart(form)) => {
                let mut multipart = reqwest::multipart::Form::new();
                for part in form.into_parts() {
                    multipart = match part {
                        FormPart::Text { name, value } => multipart.text(name, value),
                        FormPart::File { name, attachment } => {
                            let file = reqwest::multipart::Part::bytes(attachment.bytes)
                                .file_name(attachment.file_name)
                                .mime_str(&attachment.content_type)
                                .map_err(|e| TransportError::new(format!("Reqwest Part Error: {}", e)))?;
                            multipart.part(name, file)
                        }
                    };
                }
                builder = builder.multipart(multipart);
            }
            None => {}
        }

        let resp = builder
            .send()
            .await
            .map_err(|e| TransportError::new(format!("Reqwest Error: {}", e)))?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| TransportError::new(format!("Reqwest Body Error: {}", e)))?;

        Ok(HttpResponse { status, body })
    }
}

// =========================================================
// 测试工具: MockHttpClient
// =========================================================

#[cfg(test)]
#[derive(Clone)]
enum MockReply {
    Respond(u16, String),
    Fail(String),
}

#[cfg(test)]
pub struct MockHttpClient {
    // ((Method, URL), (让出次数, 回复))
    replies: RefCell<HashMap<(HttpMethod, String), (usize, MockReply)>>,
    // 按调用顺序消费的一次性回复，优先于 replies
    queued: RefCell<HashMap<(HttpMethod, String), VecDeque<(usize, MockReply)>>>,
    // 记录发出的请求
    pub requests: RefCell<Vec<HttpRequest>>,
}

#[cfg(test)]
impl MockHttpClient {
    pub fn new() -> Self {
        Self {
            replies: RefCell::new(HashMap::new()),
            queued: RefCell::new(HashMap::new()),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn mock_response(&self, method: HttpMethod, url: &str, status: u16, body: serde_json::Value) {
        self.replies.borrow_mut().insert(
            (method, url.to_string()),
            (0, MockReply::Respond(status, body.to_string())),
        );
    }

    /// 响应前先让出 `yields` 次，用于模拟并发请求的交错完成
    pub fn mock_delayed_response(
        &self,
        method: HttpMethod,
        url: &str,
        yields: usize,
        status: u16,
        body: serde_json::Value,
    ) {
        self.replies.borrow_mut().insert(
            (method, url.to_string()),
            (yields, MockReply::Respond(status, body.to_string())),
        );
    }

    /// 为下一次尚未被消费的调用排队一条回复
    pub fn queue_delayed_response(
        &self,
        method: HttpMethod,
        url: &str,
        yields: usize,
        status: u16,
        body: serde_json::Value,
    ) {
        self.queued
            .borrow_mut()
            .entry((method, url.to_string()))
            .or_default()
            .push_back((yields, MockReply::Respond(status, body.to_string())));
    }

    pub fn mock_failure(&self, method: HttpMethod, url: &str, message: &str) {
        self.replies.borrow_mut().insert(
            (method, url.to_string()),
            (0, MockReply::Fail(message.to_string())),
        );
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.borrow().last().cloned()
    }
}

#[cfg(test)]
#[async_trait::async_trait(?Send)]
impl HttpClient for MockHttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        let key = (req.method, req.url.clone());
        self.requests.borrow_mut().push(req);

        let queued = self
            .queued
            .borrow_mut()
            .get_mut(&key)
            .and_then(|queue| queue.pop_front());
        let reply = queued.or_else(|| self.replies.borrow().get(&key).cloned());
        let Some((yields, reply)) = reply else {
            return Ok(HttpResponse::new(404, r#"{"message":"Not Found"}"#));
        };

        for _ in 0..yields {
            tokio::task::yield_now().await;
        }

        match reply {
            MockReply::Respond(status, body) => Ok(HttpResponse { status, body }),
            MockReply::Fail(message) => Err(TransportError(message)),
        }
    }
}
