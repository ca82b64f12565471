//! HTTP Client Core
//!
//! 所有 API 流量都经过 `ApiClient`，它强制执行两条横切约定：
//! - 出站：持久化存储中有 token 时附加 `Authorization: Bearer <token>`，没有则照常发送
//! - 入站：401/403 视为会话失效，先通知 `AuthExpiryListener` 完成清理与跳转，再把错误返回给调用方
//!
//! 传输层本身不涉及导航，也不做重试、限流或退避。

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::request::{HttpClient, HttpRequest, HttpResponse};
use crate::session::SessionContext;
use branchdesk_shared::{
    ApiRequest, BEARER_PREFIX, CONTENT_TYPE_JSON, ErrorBody, HEADER_AUTHORIZATION,
    HEADER_CONTENT_TYPE, Payload,
};
use serde::de::DeserializeOwned;
use std::rc::Rc;

/// 会话失效时被调用的钩子
///
/// 由顶层协调器实现；Core 只负责在返回错误之前同步调用它。
pub trait AuthExpiryListener {
    fn on_auth_expired(&self, status: u16);
}

/// 共享的 API 客户端
pub struct ApiClient<C: HttpClient> {
    config: ClientConfig,
    http: C,
    session: SessionContext,
    expiry_listener: Option<Rc<dyn AuthExpiryListener>>,
}

impl<C: HttpClient> ApiClient<C> {
    pub fn new(config: ClientConfig, http: C, session: SessionContext) -> Self {
        Self {
            config,
            http,
            session,
            expiry_listener: None,
        }
    }

    pub fn with_expiry_listener(mut self, listener: Rc<dyn AuthExpiryListener>) -> Self {
        self.expiry_listener = Some(listener);
        self
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn http(&self) -> &C {
        &self.http
    }

    /// 按协议定义发起一次调用
    pub async fn call<R: ApiRequest>(&self, request: &R) -> ApiResult<R::Response> {
        let payload = request
            .payload()
            .map_err(|e| ApiError::Encode(e.to_string()))?;

        let mut req = HttpRequest::new(&self.config.url(&request.path()), R::METHOD);
        req = match payload {
            Payload::Empty => req.with_header(HEADER_CONTENT_TYPE, CONTENT_TYPE_JSON),
            Payload::Json(body) => req
                .with_header(HEADER_CONTENT_TYPE, CONTENT_TYPE_JSON)
                .with_json(&body),
            // multipart 的 Content-Type（含 boundary）由传输层生成
            Payload::Multipart(form) => req.with_multipart(form),
        };

        let resp = self.execute(req).await?;
        decode(&resp)
    }

    /// 请求拦截 -> 发送 -> 响应拦截
    pub async fn execute(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        let req = self.intercept_request(req);
        let method = req.method;
        let url = req.url.clone();

        log::debug!("[Api] {} {}", method.as_str(), url);

        let resp = match self.http.send(req).await {
            Ok(resp) => resp,
            Err(e) => {
                log::error!("[Api] {} {} failed: {}", method.as_str(), url, e);
                return Err(e.into());
            }
        };

        log::debug!("[Api] {} {} -> {}", method.as_str(), url, resp.status);
        self.intercept_response(resp)
    }

    fn intercept_request(&self, req: HttpRequest) -> HttpRequest {
        match self.session.token() {
            Some(token) => {
                req.with_header(HEADER_AUTHORIZATION, &format!("{}{}", BEARER_PREFIX, token))
            }
            None => req,
        }
    }

    fn intercept_response(&self, resp: HttpResponse) -> ApiResult<HttpResponse> {
        if resp.is_success() {
            return Ok(resp);
        }

        let status = resp.status;
        let message = ErrorBody::extract_message(&resp.body);

        let auth_expired = status == 401 || (status == 403 && self.config.logout_on_forbidden);
        if auth_expired {
            log::warn!("[Api] HTTP {}: session invalid, forcing logout", status);
            if let Some(listener) = &self.expiry_listener {
                listener.on_auth_expired(status);
            }
            return Err(ApiError::AuthExpired { status, message });
        }

        if status == 403 {
            return Err(ApiError::Forbidden { message });
        }

        Err(ApiError::Server { status, message })
    }
}

fn decode<T: DeserializeOwned>(resp: &HttpResponse) -> ApiResult<T> {
    serde_json::from_str(&resp.body).map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{MockHttpClient, ReqwestHttpClient};
    use crate::storage::{KeyValueStore, MemoryStorage};
    use branchdesk_shared::{
        Attachment, GetBranchRequest, HttpMethod, ListBranchesRequest, LoginRequest,
        PendingBranch,
    };
    use serde_json::json;
    use std::cell::RefCell;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const BASE: &str = "http://api.test/v1";

    #[derive(Default)]
    struct RecordingListener {
        calls: RefCell<Vec<u16>>,
    }

    impl AuthExpiryListener for RecordingListener {
        fn on_auth_expired(&self, status: u16) {
            self.calls.borrow_mut().push(status);
        }
    }

    fn client_with(
        config: ClientConfig,
    ) -> (ApiClient<MockHttpClient>, MemoryStorage, Rc<RecordingListener>) {
        let storage = MemoryStorage::new();
        let session = SessionContext::new(Rc::new(storage.clone()), &config);
        let listener = Rc::new(RecordingListener::default());
        let api = ApiClient::new(config, MockHttpClient::new(), session)
            .with_expiry_listener(listener.clone());
        (api, storage, listener)
    }

    fn client() -> (ApiClient<MockHttpClient>, MemoryStorage, Rc<RecordingListener>) {
        client_with(ClientConfig::default().with_base_url(BASE))
    }

    #[tokio::test]
    async fn attaches_bearer_only_when_token_present() {
        let (api, storage, _) = client();
        api.http()
            .mock_response(HttpMethod::Get, &format!("{BASE}/branch"), 200, json!([]));

        api.call(&ListBranchesRequest).await.unwrap();
        let first = api.http().last_request().unwrap();
        assert!(first.header("Authorization").is_none());
        assert_eq!(first.header("Content-Type"), Some("application/json"));

        storage.set("accessToken", "abc123");
        api.call(&ListBranchesRequest).await.unwrap();
        let second = api.http().last_request().unwrap();
        assert_eq!(second.header("Authorization"), Some("Bearer abc123"));
    }

    #[tokio::test]
    async fn unauthorized_notifies_listener_and_returns_auth_expired() {
        let (api, _, listener) = client();
        api.http().mock_response(
            HttpMethod::Get,
            &format!("{BASE}/branch/9"),
            401,
            json!({ "message": "jwt expired" }),
        );

        let err = api.call(&GetBranchRequest { id: 9 }).await.unwrap_err();
        assert_eq!(
            err,
            ApiError::AuthExpired {
                status: 401,
                message: Some("jwt expired".into())
            }
        );
        assert_eq!(*listener.calls.borrow(), vec![401]);
    }

    #[tokio::test]
    async fn forbidden_follows_config() {
        let (api, _, listener) = client();
        api.http()
            .mock_response(HttpMethod::Get, &format!("{BASE}/branch"), 403, json!({}));
        assert!(api.call(&ListBranchesRequest).await.unwrap_err().is_auth_expired());
        assert_eq!(*listener.calls.borrow(), vec![403]);

        let mut config = ClientConfig::default().with_base_url(BASE);
        config.logout_on_forbidden = false;
        let (api, _, listener) = client_with(config);
        api.http()
            .mock_response(HttpMethod::Get, &format!("{BASE}/branch"), 403, json!({}));
        assert_eq!(
            api.call(&ListBranchesRequest).await.unwrap_err(),
            ApiError::Forbidden { message: None }
        );
        assert!(listener.calls.borrow().is_empty());
    }

    #[tokio::test]
    async fn other_errors_pass_through_untouched() {
        let (api, _, listener) = client();
        api.http().mock_response(
            HttpMethod::Get,
            &format!("{BASE}/branch"),
            500,
            json!({ "message": "db down" }),
        );
        api.http()
            .mock_failure(HttpMethod::Get, &format!("{BASE}/branch/1"), "offline");

        let err = api.call(&ListBranchesRequest).await.unwrap_err();
        assert_eq!(err.message_or("x"), "db down");
        assert_eq!(err.status(), Some(500));

        let err = api.call(&GetBranchRequest { id: 1 }).await.unwrap_err();
        assert_eq!(err, ApiError::Transport("offline".into()));

        assert!(listener.calls.borrow().is_empty());
    }

    #[tokio::test]
    async fn malformed_success_body_is_decode_error() {
        let (api, _, _) = client();
        api.http().mock_response(
            HttpMethod::Get,
            &format!("{BASE}/branch"),
            200,
            json!({ "unexpected": true }),
        );
        let err = api.call(&ListBranchesRequest).await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn multipart_request_leaves_content_type_to_transport() {
        let (api, _, _) = client();
        let pending = PendingBranch {
            name: "East".into(),
            files: vec![Attachment::new("doc.pdf", "application/pdf", b"%PDF".to_vec())],
            ..PendingBranch::default()
        };
        api.call(&pending).await.unwrap_err();

        let req = api.http().last_request().unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert!(req.header("Content-Type").is_none());
        let Some(crate::request::RequestBody::Multipart(form)) = req.body else {
            panic!("expected multipart body");
        };
        assert_eq!(form.text_value("name"), Some("East"));
        assert_eq!(form.files().count(), 1);
    }

    // =========================================================
    // 真实 HTTP 往返 (wiremock)
    // =========================================================

    fn reqwest_client(
        server: &MockServer,
    ) -> (ApiClient<ReqwestHttpClient>, MemoryStorage, Rc<RecordingListener>) {
        let config = ClientConfig::default().with_base_url(&server.uri());
        let storage = MemoryStorage::new();
        let session = SessionContext::new(Rc::new(storage.clone()), &config);
        let listener = Rc::new(RecordingListener::default());
        let api = ApiClient::new(config, ReqwestHttpClient::new(), session)
            .with_expiry_listener(listener.clone());
        (api, storage, listener)
    }

    #[tokio::test]
    async fn wire_login_posts_json_without_bearer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "accessToken": "jwt-1",
                "email": "a@b.com",
                "role": "ADMIN",
                "permissions": []
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (api, _, _) = reqwest_client(&server);
        let resp = api
            .call(&LoginRequest {
                email: "a@b.com".into(),
                password: "secret1".into(),
                role: "ADMIN".into(),
            })
            .await
            .unwrap();
        assert_eq!(resp.access_token, "jwt-1");

        let received = server.received_requests().await.unwrap();
        assert!(received[0].headers.get("authorization").is_none());
    }

    #[tokio::test]
    async fn wire_token_is_sent_and_401_triggers_listener() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/branch"))
            .and(header("authorization", "Bearer stale"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({ "message": "Unauthorized" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let (api, storage, listener) = reqwest_client(&server);
        storage.set("accessToken", "stale");

        let err = api.call(&ListBranchesRequest).await.unwrap_err();
        assert!(err.is_auth_expired());
        assert_eq!(*listener.calls.borrow(), vec![401]);
    }

    #[tokio::test]
    async fn wire_multipart_upload_reaches_server() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/branch"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": 11,
                "name": "West",
                "location": "Mumbai",
                "latitude": 19.07,
                "longitude": 72.87,
                "email": "west@example.com",
                "phoneNumber": "9000000000",
                "branchManagerName": "Kiran",
                "branchManagerPhone": "9000000001",
                "branchDocuments": ["https://cdn.example.com/west/lease.pdf"],
                "createdAt": "2024-05-01T00:00:00Z",
                "updatedAt": "2024-05-01T00:00:00Z"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (api, _, _) = reqwest_client(&server);
        let pending = PendingBranch {
            name: "West".into(),
            location: "Mumbai".into(),
            latitude: 19.07,
            longitude: 72.87,
            email: "west@example.com".into(),
            phone_number: "9000000000".into(),
            branch_manager_name: "Kiran".into(),
            branch_manager_phone: "9000000001".into(),
            files: vec![Attachment::new("lease.pdf", "application/pdf", b"%PDF-1.4".to_vec())],
        };
        let branch = api.call(&pending).await.unwrap();
        assert_eq!(branch.id, 11);

        let received = server.received_requests().await.unwrap();
        let content_type = received[0]
            .headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(content_type.starts_with("multipart/form-data"));

        let body = String::from_utf8_lossy(&received[0].body);
        assert!(body.contains("name=\"phoneNumber\""));
        assert!(body.contains("filename=\"lease.pdf\""));
        assert!(body.contains("%PDF-1.4"));
    }
}
