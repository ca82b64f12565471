use crate::app::use_app;
use crate::components::icons::{ArrowLeft, FileText};
use crate::web::route::AppRoute;
use crate::web::router::Link;
use branchdesk_shared::Branch;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn BranchDetailPage(id: i64) -> impl IntoView {
    let app = use_app();
    let branches = app.branches();

    // 先用列表缓存占位，服务端结果返回后覆盖
    branches.set_selected_branch(branches.get_branch_by_id(id));
    spawn_local(async move {
        branches.fetch_branch_by_id(id).await;
    });

    let selected = move || app.branch_state.with(|s| s.selected_branch.clone());
    let is_fetching = move || app.branch_state.with(|s| s.is_fetching_details);
    let error_msg = move || app.branch_state.with(|s| s.error.clone());

    view! {
        <div class="space-y-6">
            <Link to=AppRoute::Branches class="btn btn-ghost gap-2 px-0">
                <ArrowLeft attr:class="h-5 w-5" />
                "Back to Branches"
            </Link>

            {move || match (selected(), is_fetching()) {
                (None, true) => view! {
                    <div class="flex items-center justify-center py-24">
                        <span class="loading loading-spinner loading-lg text-primary"></span>
                        <p class="ml-4 text-base-content/60">"Loading branch details..."</p>
                    </div>
                }
                .into_any(),
                (None, false) => view! {
                    <div role="alert" class="alert alert-error flex-col items-start">
                        <p class="font-medium">"Error loading branch"</p>
                        <p class="text-sm">{error_msg().unwrap_or_else(|| "Branch not found".to_string())}</p>
                    </div>
                }
                .into_any(),
                (Some(branch), refreshing) => view! {
                    <BranchDetails branch=branch refreshing=refreshing />
                }
                .into_any(),
            }}
        </div>
    }
}

#[component]
fn BranchDetails(branch: Branch, refreshing: bool) -> impl IntoView {
    let documents = branch.branch_documents.clone();

    view! {
        <div class="space-y-6">
            <div class="flex items-center gap-3">
                <h1 class="text-2xl font-semibold">{branch.name.clone()}</h1>
                <Show when=move || refreshing>
                    <span class="loading loading-spinner loading-sm"></span>
                </Show>
            </div>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <h2 class="card-title">"Branch Details"</h2>
                    <div class="grid grid-cols-1 md:grid-cols-3 gap-6 mt-4">
                        <Field label="Location" value=branch.location.clone() />
                        <Field
                            label="Coordinates"
                            value=format!("{:.5}, {:.5}", branch.latitude, branch.longitude)
                        />
                        <Field label="Email" value=branch.email.clone() />
                        <Field label="Contact number" value=branch.phone_number.clone() />
                        <Field label="Manager name" value=branch.branch_manager_name.clone() />
                        <Field label="Manager phone" value=branch.branch_manager_phone.clone() />
                        <Field label="Created" value=branch.created_at.format_datetime() />
                        <Field label="Last updated" value=branch.updated_at.format_datetime() />
                    </div>
                </div>
            </div>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <h2 class="card-title">"Documents"</h2>
                    {if documents.is_empty() {
                        view! { <p class="text-base-content/60">"No documents uploaded."</p> }.into_any()
                    } else {
                        view! {
                            <ul class="space-y-2">
                                {documents
                                    .into_iter()
                                    .map(|url| {
                                        let name = document_name(&url);
                                        view! {
                                            <li>
                                                <a href=url target="_blank" rel="noopener" class="link flex items-center gap-2">
                                                    <FileText attr:class="h-4 w-4" />
                                                    {name}
                                                </a>
                                            </li>
                                        }
                                    })
                                    .collect_view()}
                            </ul>
                        }
                        .into_any()
                    }}
                </div>
            </div>
        </div>
    }
}

#[component]
fn Field(label: &'static str, value: String) -> impl IntoView {
    view! {
        <div class="space-y-1">
            <p class="text-xs text-base-content/50 font-medium">{label}</p>
            <p class="font-medium">{value}</p>
        </div>
    }
}

/// 文档链接的展示名：URL 最后一段
fn document_name(url: &str) -> String {
    url.rsplit('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or(url)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::document_name;

    #[test]
    fn document_name_uses_last_segment() {
        assert_eq!(document_name("https://cdn.example.com/branch/lease.pdf"), "lease.pdf");
        assert_eq!(document_name("https://cdn.example.com/branch/"), "branch");
        assert_eq!(document_name("lease.pdf"), "lease.pdf");
    }
}
