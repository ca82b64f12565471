//! 分店存储
//!
//! 服务端分店记录的内存缓存。列表加载、详情加载、创建各自使用独立的进行中标志，
//! 并发的列表与详情请求互不覆盖对方的标志。

use crate::api::ApiClient;
use crate::request::HttpClient;
use crate::state::{LocalState, StateCell};
use branchdesk_shared::{Branch, GetBranchRequest, ListBranchesRequest, PendingBranch};
use std::rc::Rc;

pub const FETCH_BRANCHES_FALLBACK_MESSAGE: &str = "Failed to fetch branches. Please try again.";
pub const FETCH_BRANCH_FALLBACK_MESSAGE: &str = "Failed to fetch branch details. Please try again.";
pub const CREATE_BRANCH_FALLBACK_MESSAGE: &str = "Failed to create branch. Please try again.";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BranchState {
    pub branches: Vec<Branch>,
    pub selected_branch: Option<Branch>,
    pub is_loading: bool,
    pub is_creating: bool,
    pub is_fetching_details: bool,
    pub error: Option<String>,
}

pub struct BranchStore<C: HttpClient, S: StateCell<BranchState> = LocalState<BranchState>> {
    api: Rc<ApiClient<C>>,
    state: S,
}

impl<C: HttpClient, S: StateCell<BranchState>> BranchStore<C, S> {
    pub fn new(api: Rc<ApiClient<C>>, state: S) -> Self {
        Self { api, state }
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    /// 拉取全部分店并整体替换列表
    pub async fn fetch_branches(&self) {
        self.state.update(|s| {
            s.is_loading = true;
            s.error = None;
        });

        match self.api.call(&ListBranchesRequest).await {
            Ok(branches) => {
                log::debug!("[Branch] Loaded {} branches", branches.len());
                self.state.update(|s| {
                    s.branches = branches;
                    s.is_loading = false;
                });
            }
            Err(e) => {
                log::warn!("[Branch] Fetch branches failed: {}", e);
                let message = e.message_or(FETCH_BRANCHES_FALLBACK_MESSAGE);
                self.state.update(|s| {
                    s.is_loading = false;
                    s.error = Some(message);
                });
            }
        }
    }

    /// 从服务端拉取单个分店，结果写入 `selected_branch`
    pub async fn fetch_branch_by_id(&self, id: i64) -> Option<Branch> {
        self.state.update(|s| {
            s.is_fetching_details = true;
            s.error = None;
        });

        match self.api.call(&GetBranchRequest { id }).await {
            Ok(branch) => {
                self.state.update(|s| {
                    s.selected_branch = Some(branch.clone());
                    s.is_fetching_details = false;
                });
                Some(branch)
            }
            Err(e) => {
                log::warn!("[Branch] Fetch branch {} failed: {}", id, e);
                let message = e.message_or(FETCH_BRANCH_FALLBACK_MESSAGE);
                self.state.update(|s| {
                    s.selected_branch = None;
                    s.is_fetching_details = false;
                    s.error = Some(message);
                });
                None
            }
        }
    }

    /// 以 multipart 提交新分店，成功后把服务端返回的记录追加到列表末尾
    pub async fn create_branch(&self, pending: PendingBranch) -> bool {
        self.state.update(|s| {
            s.is_creating = true;
            s.error = None;
        });

        match self.api.call(&pending).await {
            Ok(branch) => {
                log::info!("[Branch] Created branch {}", branch.id);
                self.state.update(|s| {
                    s.branches.push(branch);
                    s.is_creating = false;
                });
                true
            }
            Err(e) => {
                log::warn!("[Branch] Create branch failed: {}", e);
                let message = e.message_or(CREATE_BRANCH_FALLBACK_MESSAGE);
                self.state.update(|s| {
                    s.is_creating = false;
                    s.error = Some(message);
                });
                false
            }
        }
    }

    /// 仅在内存列表中查找，不发请求
    ///
    /// 与 `fetch_branch_by_id` 不保证一致：列表可能比服务端旧。
    pub fn get_branch_by_id(&self, id: i64) -> Option<Branch> {
        self.state
            .with(|s| s.branches.iter().find(|b| b.id == id).cloned())
    }

    pub fn set_selected_branch(&self, branch: Option<Branch>) {
        self.state.update(|s| s.selected_branch = branch);
    }

    pub fn clear_error(&self) {
        self.state.update(|s| s.error = None);
    }
}

#[cfg(test)]
mod tests;
