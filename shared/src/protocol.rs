use crate::{
    Attachment, Branch, LoginRequest, LoginResponse, PendingBranch, RegisterRequest,
    RegisterResponse,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }
}

/// 请求体的编码方式
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Empty,
    Json(serde_json::Value),
    Multipart(MultipartForm),
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The HTTP method.
    const METHOD: HttpMethod;

    /// The URL path relative to the API base.
    fn path(&self) -> String;

    /// The request body.
    fn payload(&self) -> serde_json::Result<Payload> {
        Ok(Payload::Empty)
    }
}

// =========================================================
// Multipart
// =========================================================

#[derive(Debug, Clone, PartialEq)]
pub enum FormPart {
    Text { name: String, value: String },
    File { name: String, attachment: Attachment },
}

impl FormPart {
    pub fn name(&self) -> &str {
        match self {
            FormPart::Text { name, .. } | FormPart::File { name, .. } => name,
        }
    }
}

/// 有序的 multipart 表单，允许重复字段名
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MultipartForm {
    parts: Vec<FormPart>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(FormPart::Text {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    pub fn file(mut self, name: impl Into<String>, attachment: Attachment) -> Self {
        self.parts.push(FormPart::File {
            name: name.into(),
            attachment,
        });
        self
    }

    pub fn parts(&self) -> &[FormPart] {
        &self.parts
    }

    pub fn into_parts(self) -> Vec<FormPart> {
        self.parts
    }

    /// 第一个同名文本分片的值
    pub fn text_value(&self, name: &str) -> Option<&str> {
        self.parts.iter().find_map(|part| match part {
            FormPart::Text { name: n, value } if n == name => Some(value.as_str()),
            _ => None,
        })
    }

    pub fn files(&self) -> impl Iterator<Item = &Attachment> {
        self.parts.iter().filter_map(|part| match part {
            FormPart::File { attachment, .. } => Some(attachment),
            FormPart::Text { .. } => None,
        })
    }
}

// =========================================================
// Error Body
// =========================================================

/// 服务端错误响应中的 `message` 字段，可能是字符串或字符串数组
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageField {
    One(String),
    Many(Vec<String>),
}

/// 服务端错误响应体，只关心 `message` 字段
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<MessageField>,
}

impl ErrorBody {
    /// 从原始响应体中提取消息；空字符串视为不存在
    pub fn extract_message(body: &str) -> Option<String> {
        let parsed: ErrorBody = serde_json::from_str(body).ok()?;
        let message = match parsed.message? {
            MessageField::One(s) => s,
            MessageField::Many(list) => list
                .into_iter()
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(", "),
        };
        if message.trim().is_empty() {
            None
        } else {
            Some(message)
        }
    }
}

// =========================================================
// Request Definitions
// =========================================================

impl ApiRequest for LoginRequest {
    type Response = LoginResponse;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/auth/login".to_string()
    }

    fn payload(&self) -> serde_json::Result<Payload> {
        serde_json::to_value(self).map(Payload::Json)
    }
}

impl ApiRequest for RegisterRequest {
    type Response = RegisterResponse;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/auth/register".to_string()
    }

    fn payload(&self) -> serde_json::Result<Payload> {
        serde_json::to_value(self).map(Payload::Json)
    }
}

/// List all branches
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ListBranchesRequest;

impl ApiRequest for ListBranchesRequest {
    type Response = Vec<Branch>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/branch".to_string()
    }
}

/// Fetch a single branch by id
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GetBranchRequest {
    pub id: i64,
}

impl ApiRequest for GetBranchRequest {
    type Response = Branch;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/branch/{}", self.id)
    }
}

/// Create a branch (multipart upload)
impl ApiRequest for PendingBranch {
    type Response = Branch;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/branch".to_string()
    }

    fn payload(&self) -> serde_json::Result<Payload> {
        Ok(Payload::Multipart(self.to_multipart()))
    }
}
