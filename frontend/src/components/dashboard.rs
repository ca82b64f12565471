use crate::app::use_app;
use crate::components::icons::{Building, FileText, Plus};
use crate::web::route::AppRoute;
use crate::web::router::Link;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn DashboardPage() -> impl IntoView {
    let app = use_app();

    // 列表为空时加载一次，已有缓存则直接展示
    if app.branch_state.with_untracked(|s| s.branches.is_empty()) {
        let branches = app.branches();
        spawn_local(async move { branches.fetch_branches().await });
    }

    let total_branches = move || app.branch_state.with(|s| s.branches.len());
    let total_documents = move || {
        app.branch_state
            .with(|s| s.branches.iter().map(|b| b.branch_documents.len()).sum::<usize>())
    };
    let is_loading = move || app.branch_state.with(|s| s.is_loading);
    let greeting = move || {
        app.session_state
            .with(|s| s.email.clone())
            .map(|email| format!("Signed in as {}", email))
            .unwrap_or_default()
    };

    view! {
        <div class="space-y-8">
            <div class="flex justify-between items-center">
                <div>
                    <h1 class="text-2xl font-semibold">"Dashboard"</h1>
                    <p class="text-base-content/70 text-sm">{greeting}</p>
                </div>
                <Link to=AppRoute::AddBranch class="btn btn-primary gap-2">
                    <Plus attr:class="h-4 w-4" />
                    "Add Branch"
                </Link>
            </div>

            <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                <div class="stat">
                    <div class="stat-figure text-primary">
                        <Building attr:class="inline-block w-8 h-8" />
                    </div>
                    <div class="stat-title">"Branches"</div>
                    <div class="stat-value text-primary">
                        {move || if is_loading() && total_branches() == 0 {
                            view! { <span class="loading loading-spinner loading-md"></span> }.into_any()
                        } else {
                            total_branches().to_string().into_any()
                        }}
                    </div>
                </div>

                <div class="stat">
                    <div class="stat-figure text-secondary">
                        <FileText attr:class="inline-block w-8 h-8" />
                    </div>
                    <div class="stat-title">"Branch documents"</div>
                    <div class="stat-value text-secondary">{total_documents}</div>
                </div>
            </div>

            <Show when=move || app.branch_state.with(|s| s.error.is_some())>
                <div role="alert" class="alert alert-error">
                    <span>{move || app.branch_state.with(|s| s.error.clone().unwrap_or_default())}</span>
                </div>
            </Show>
        </div>
    }
}
