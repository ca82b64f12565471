use crate::app::use_app;
use crate::components::icons::{MapPin, Plus, RefreshCw};
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn BranchListPage() -> impl IntoView {
    let app = use_app();
    let router = use_router();

    let load_branches = move || {
        let branches = app.branches();
        spawn_local(async move { branches.fetch_branches().await });
    };

    // 每次进入列表页都从服务端刷新
    load_branches();

    let is_loading = move || app.branch_state.with(|s| s.is_loading);
    let is_empty = move || app.branch_state.with(|s| s.branches.is_empty());
    let error_msg = move || app.branch_state.with(|s| s.error.clone());

    view! {
        <div class="space-y-6">
            <div class="flex justify-between items-center">
                <div>
                    <h1 class="text-2xl font-semibold">"Branches"</h1>
                    <p class="text-base-content/70 text-sm">"All service branches"</p>
                </div>
                <div class="flex gap-2">
                    <button
                        on:click=move |_| load_branches()
                        disabled=is_loading
                        class="btn btn-ghost btn-circle"
                    >
                        <RefreshCw attr:class=move || {
                            if is_loading() { "h-5 w-5 animate-spin" } else { "h-5 w-5" }
                        } />
                    </button>
                    <Link to=AppRoute::AddBranch class="btn btn-primary gap-2">
                        <Plus attr:class="h-4 w-4" />
                        "Add Branch"
                    </Link>
                </div>
            </div>

            <Show when=move || error_msg().is_some()>
                <div role="alert" class="alert alert-error">
                    <span>{move || error_msg().unwrap_or_default()}</span>
                    <button class="btn btn-sm btn-ghost" on:click=move |_| app.branches().clear_error()>
                        "Dismiss"
                    </button>
                </div>
            </Show>

            <div class="card bg-base-100 shadow-xl">
                <div class="overflow-x-auto w-full">
                    <table class="table table-zebra w-full">
                        <thead>
                            <tr>
                                <th>"Branch"</th>
                                <th class="hidden md:table-cell">"Manager"</th>
                                <th class="hidden md:table-cell">"Contact"</th>
                                <th>"Created"</th>
                            </tr>
                        </thead>
                        <tbody>
                            <Show when=move || is_empty() && !is_loading()>
                                <tr>
                                    <td colspan="4" class="text-center py-8 text-base-content/50">
                                        "No branches yet. Add one to get started."
                                    </td>
                                </tr>
                            </Show>
                            <Show when=move || is_empty() && is_loading()>
                                <tr>
                                    <td colspan="4" class="text-center py-8 text-base-content/50">
                                        <span class="loading loading-spinner loading-md"></span>
                                        " Loading..."
                                    </td>
                                </tr>
                            </Show>
                            <For
                                each=move || app.branch_state.with(|s| s.branches.clone())
                                key=|b| b.id
                                children=move |branch| {
                                    let id = branch.id;
                                    view! {
                                        <tr
                                            class="hover cursor-pointer"
                                            on:click=move |_| router.navigate_to(AppRoute::BranchDetail(id))
                                        >
                                            <td>
                                                <div class="font-bold">{branch.name}</div>
                                                <div class="flex items-center gap-1 text-sm opacity-60">
                                                    <MapPin attr:class="h-3 w-3" />
                                                    {branch.location}
                                                </div>
                                            </td>
                                            <td class="hidden md:table-cell">
                                                <div>{branch.branch_manager_name}</div>
                                                <div class="text-sm opacity-60">{branch.branch_manager_phone}</div>
                                            </td>
                                            <td class="hidden md:table-cell">
                                                <div>{branch.email}</div>
                                                <div class="text-sm opacity-60">{branch.phone_number}</div>
                                            </td>
                                            <td class="text-sm">{branch.created_at.format_date()}</td>
                                        </tr>
                                    }
                                }
                            />
                        </tbody>
                    </table>
                </div>
            </div>
        </div>
    }
}
