use super::*;
use crate::config::ClientConfig;
use crate::request::{MockHttpClient, RequestBody};
use crate::session::SessionContext;
use crate::storage::{KeyValueStore, MemoryStorage};
use branchdesk_shared::{Attachment, HttpMethod};
use serde_json::{Value, json};

const BASE: &str = "http://api.test/v1";

fn store() -> (BranchStore<MockHttpClient>, MemoryStorage) {
    let config = ClientConfig::default().with_base_url(BASE);
    let storage = MemoryStorage::new();
    let context = SessionContext::new(Rc::new(storage.clone()), &config);
    let api = Rc::new(ApiClient::new(config, MockHttpClient::new(), context));
    (BranchStore::new(api, LocalState::default()), storage)
}

fn http(store: &BranchStore<MockHttpClient>) -> &MockHttpClient {
    store.api.http()
}

fn branch_json(id: i64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "location": "Bengaluru",
        "latitude": 12.97,
        "longitude": 77.59,
        "email": format!("branch{id}@ashoka.in"),
        "phoneNumber": "9876543210",
        "branchManagerName": "Ravi",
        "branchManagerPhone": "9123456780",
        "branchDocuments": [],
        "createdAt": "2024-03-01T10:00:00Z",
        "updatedAt": "2024-03-01T10:00:00Z"
    })
}

fn pending(name: &str) -> PendingBranch {
    PendingBranch {
        name: name.into(),
        location: "Bengaluru".into(),
        latitude: 12.97,
        longitude: 77.59,
        email: "new@ashoka.in".into(),
        phone_number: "9876543210".into(),
        branch_manager_name: "Ravi".into(),
        branch_manager_phone: "9123456780".into(),
        files: vec![Attachment::new("lease.pdf", "application/pdf", b"%PDF".to_vec())],
    }
}

fn names(store: &BranchStore<MockHttpClient>) -> Vec<String> {
    store
        .state()
        .with(|s| s.branches.iter().map(|b| b.name.clone()).collect())
}

// =========================================================
// 列表
// =========================================================

#[tokio::test]
async fn fetch_branches_replaces_list() {
    let (store, storage) = store();
    storage.set("accessToken", "jwt");
    http(&store).mock_response(
        HttpMethod::Get,
        &format!("{BASE}/branch"),
        200,
        json!([branch_json(1, "North"), branch_json(2, "South")]),
    );

    let stale: Branch = serde_json::from_value(branch_json(9, "Stale")).unwrap();
    store.state().update(|s| s.branches = vec![stale]);
    store.fetch_branches().await;

    assert_eq!(names(&store), vec!["North", "South"]);
    let state = store.state().get();
    assert!(!state.is_loading);
    assert!(state.error.is_none());

    let req = http(&store).last_request().unwrap();
    assert_eq!(req.header("Authorization"), Some("Bearer jwt"));
}

#[tokio::test]
async fn fetch_branches_failure_keeps_list_and_sets_fallback() {
    let (store, _) = store();
    http(&store).mock_response(
        HttpMethod::Get,
        &format!("{BASE}/branch"),
        200,
        json!([branch_json(1, "North")]),
    );
    store.fetch_branches().await;

    http(&store).mock_failure(HttpMethod::Get, &format!("{BASE}/branch"), "offline");
    store.fetch_branches().await;

    let state = store.state().get();
    assert_eq!(state.error.as_deref(), Some(FETCH_BRANCHES_FALLBACK_MESSAGE));
    assert!(!state.is_loading);
    assert_eq!(names(&store), vec!["North"]);
}

// =========================================================
// 详情
// =========================================================

#[tokio::test]
async fn fetch_branch_by_id_sets_selected() {
    let (store, _) = store();
    http(&store).mock_response(
        HttpMethod::Get,
        &format!("{BASE}/branch/7"),
        200,
        branch_json(7, "Indiranagar"),
    );

    let branch = store.fetch_branch_by_id(7).await.unwrap();
    assert_eq!(branch.name, "Indiranagar");

    let state = store.state().get();
    assert_eq!(state.selected_branch.map(|b| b.id), Some(7));
    assert!(!state.is_fetching_details);
}

#[tokio::test]
async fn missing_branch_clears_selection_and_reports_error() {
    let (store, _) = store();
    http(&store).mock_response(
        HttpMethod::Get,
        &format!("{BASE}/branch/1"),
        200,
        branch_json(1, "North"),
    );
    store.fetch_branch_by_id(1).await;

    // 未注册的地址由 MockHttpClient 返回 404 {"message":"Not Found"}
    assert!(store.fetch_branch_by_id(404).await.is_none());

    let state = store.state().get();
    assert!(state.selected_branch.is_none());
    assert_eq!(state.error.as_deref(), Some("Not Found"));
    assert!(!state.is_fetching_details);
}

#[tokio::test]
async fn detail_failure_without_message_uses_fallback() {
    let (store, _) = store();
    http(&store).mock_response(HttpMethod::Get, &format!("{BASE}/branch/3"), 500, json!({}));

    assert!(store.fetch_branch_by_id(3).await.is_none());
    assert_eq!(
        store.state().get().error.as_deref(),
        Some(FETCH_BRANCH_FALLBACK_MESSAGE)
    );
}

#[tokio::test]
async fn get_branch_by_id_reads_cache_only() {
    let (store, _) = store();
    http(&store).mock_response(
        HttpMethod::Get,
        &format!("{BASE}/branch"),
        200,
        json!([branch_json(1, "North"), branch_json(2, "South")]),
    );
    store.fetch_branches().await;
    let before = http(&store).request_count();

    assert_eq!(store.get_branch_by_id(2).map(|b| b.name), Some("South".into()));
    assert!(store.get_branch_by_id(99).is_none());
    assert_eq!(http(&store).request_count(), before);
}

#[tokio::test]
async fn set_selected_and_clear_error() {
    let (store, _) = store();
    http(&store).mock_response(
        HttpMethod::Get,
        &format!("{BASE}/branch"),
        200,
        json!([branch_json(5, "East")]),
    );
    store.fetch_branches().await;

    let east = store.get_branch_by_id(5);
    store.set_selected_branch(east.clone());
    assert_eq!(store.state().get().selected_branch, east);

    store.set_selected_branch(None);
    store.state().update(|s| s.error = Some("x".into()));
    store.clear_error();
    let state = store.state().get();
    assert!(state.selected_branch.is_none());
    assert!(state.error.is_none());
}

// =========================================================
// 创建
// =========================================================

#[tokio::test]
async fn create_appends_server_record_in_order() {
    let (store, _) = store();
    http(&store).mock_response(
        HttpMethod::Get,
        &format!("{BASE}/branch"),
        200,
        json!([branch_json(1, "North"), branch_json(2, "South")]),
    );
    store.fetch_branches().await;
    let before = store.state().get().branches;

    http(&store).mock_response(
        HttpMethod::Post,
        &format!("{BASE}/branch"),
        201,
        branch_json(3, "West (server)"),
    );
    assert!(store.create_branch(pending("West")).await);

    let state = store.state().get();
    assert_eq!(state.branches.len(), 3);
    assert_eq!(&state.branches[..2], &before[..]);
    // 追加的是服务端返回的记录，而不是本地提交的内容
    assert_eq!(state.branches[2].name, "West (server)");
    assert!(!state.is_creating);

    let req = http(&store).last_request().unwrap();
    let Some(RequestBody::Multipart(form)) = req.body else {
        panic!("expected multipart body");
    };
    assert_eq!(form.text_value("name"), Some("West"));
    assert_eq!(form.files().count(), 1);
}

#[tokio::test]
async fn create_failure_reports_server_message() {
    let (store, _) = store();
    http(&store).mock_response(
        HttpMethod::Post,
        &format!("{BASE}/branch"),
        409,
        json!({ "message": ["email must be unique", "phoneNumber must be unique"] }),
    );

    assert!(!store.create_branch(pending("Dup")).await);

    let state = store.state().get();
    assert_eq!(
        state.error.as_deref(),
        Some("email must be unique, phoneNumber must be unique")
    );
    assert!(state.branches.is_empty());
    assert!(!state.is_creating);
}

#[tokio::test]
async fn create_transport_failure_uses_fallback() {
    let (store, _) = store();
    http(&store).mock_failure(HttpMethod::Post, &format!("{BASE}/branch"), "offline");

    assert!(!store.create_branch(pending("East")).await);
    assert_eq!(
        store.state().get().error.as_deref(),
        Some(CREATE_BRANCH_FALLBACK_MESSAGE)
    );
}

// =========================================================
// 并发
// =========================================================

#[tokio::test]
async fn concurrent_list_and_detail_flags_are_independent() {
    let (store, _) = store();
    http(&store).mock_delayed_response(
        HttpMethod::Get,
        &format!("{BASE}/branch"),
        5,
        200,
        json!([branch_json(1, "North")]),
    );
    http(&store).mock_delayed_response(
        HttpMethod::Get,
        &format!("{BASE}/branch/1"),
        1,
        200,
        branch_json(1, "North"),
    );

    let list = store.fetch_branches();
    let detail = async {
        let branch = store.fetch_branch_by_id(1).await;
        // 详情先完成时列表仍在加载
        let state = store.state().get();
        assert!(state.is_loading);
        assert!(!state.is_fetching_details);
        branch
    };
    let ((), branch) = futures::join!(list, detail);

    assert!(branch.is_some());
    let state = store.state().get();
    assert!(!state.is_loading);
    assert!(!state.is_fetching_details);
    assert_eq!(state.branches.len(), 1);
    assert_eq!(state.selected_branch.map(|b| b.id), Some(1));
}

#[tokio::test]
async fn concurrent_detail_outlasting_list() {
    let (store, _) = store();
    http(&store).mock_delayed_response(
        HttpMethod::Get,
        &format!("{BASE}/branch"),
        1,
        200,
        json!([]),
    );
    http(&store).mock_delayed_response(
        HttpMethod::Get,
        &format!("{BASE}/branch/2"),
        5,
        404,
        json!({ "message": "Branch not found" }),
    );

    let list = async {
        store.fetch_branches().await;
        let state = store.state().get();
        assert!(!state.is_loading);
        assert!(state.is_fetching_details);
    };
    let detail = store.fetch_branch_by_id(2);
    let ((), branch) = futures::join!(list, detail);

    assert!(branch.is_none());
    let state = store.state().get();
    assert!(!state.is_loading);
    assert!(!state.is_fetching_details);
    assert_eq!(state.error.as_deref(), Some("Branch not found"));
}
