mod branch_info_form;
mod document_picker;
mod form_state;

use crate::app::use_app;
use crate::components::icons::{AlertCircle, ArrowLeft};
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};
use branch_info_form::BranchInfoForm;
use document_picker::DocumentPicker;
use form_state::FormState;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn AddBranchPage() -> impl IntoView {
    let app = use_app();
    let router = use_router();
    let state = FormState::new();

    app.branches().clear_error();

    let is_creating = move || app.branch_state.with(|s| s.is_creating);
    let error_msg = move || app.branch_state.with(|s| s.error.clone());

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        // 本地校验失败时错误已写入表单状态，不发请求
        let Some(pending) = state.to_pending() else {
            return;
        };

        let branches = app.branches();
        spawn_local(async move {
            if branches.create_branch(pending).await {
                state.reset();
                router.navigate_to(AppRoute::Branches);
            }
        });
    };

    view! {
        <div class="space-y-6 max-w-3xl">
            <Link to=AppRoute::Branches class="btn btn-ghost gap-2 px-0">
                <ArrowLeft attr:class="h-5 w-5" />
                "Back to Branches"
            </Link>

            <div>
                <h1 class="text-2xl font-semibold">"Add Branch"</h1>
                <p class="text-base-content/70 text-sm">"Register a new service branch"</p>
            </div>

            <div class="card bg-base-100 shadow-xl">
                <form on:submit=on_submit class="card-body space-y-4" novalidate>
                    <Show when=move || error_msg().is_some()>
                        <div role="alert" class="alert alert-error text-sm py-2">
                            <AlertCircle attr:class="shrink-0 h-6 w-6" />
                            <span>{move || error_msg().unwrap_or_default()}</span>
                        </div>
                    </Show>

                    <BranchInfoForm state=state />
                    <DocumentPicker state=state />

                    <div class="card-actions justify-end">
                        <button type="button" class="btn btn-ghost" on:click=move |_| state.reset()>
                            "Reset"
                        </button>
                        <button type="submit" disabled=is_creating class="btn btn-primary">
                            {move || if is_creating() {
                                view! { <span class="loading loading-spinner"></span> "Creating..." }.into_any()
                            } else {
                                "Create Branch".into_any()
                            }}
                        </button>
                    </div>
                </form>
            </div>
        </div>
    }
}
