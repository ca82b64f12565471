use crate::app::use_app;
use crate::components::icons::{AlertCircle, Building};
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};
use branchdesk::validation::validate_registration;
use branchdesk_shared::DEFAULT_ROLE;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn RegisterPage() -> impl IntoView {
    let app = use_app();
    let router = use_router();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (confirm, set_confirm) = signal(String::new());
    // 确认密码只在页面上校验，不属于会话状态
    let (local_error, set_local_error) = signal(Option::<String>::None);

    let is_loading = move || app.session_state.with(|s| s.is_loading);
    let error_msg = move || {
        local_error
            .get()
            .or_else(|| app.session_state.with(|s| s.error.clone()))
    };

    app.session().clear_error();

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let (email, password) = (email.get_untracked(), password.get_untracked());

        if let Err(e) = validate_registration(&email, &password, &confirm.get_untracked()) {
            set_local_error.set(Some(e.message));
            return;
        }
        set_local_error.set(None);

        let session = app.session();
        spawn_local(async move {
            if session.register(&email, &password, DEFAULT_ROLE).await {
                router.navigate_to(AppRoute::Login);
            }
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <div class="flex flex-col items-center gap-2">
                        <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                            <Building attr:class="h-8 w-8" />
                        </div>
                        <h1 class="text-3xl font-bold">"Create an account"</h1>
                        <p class="text-base-content/70">"Register a new administrator"</p>
                    </div>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit novalidate>
                        <Show when=move || error_msg().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <AlertCircle attr:class="shrink-0 h-6 w-6" />
                                <span>{move || error_msg().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label" for="email">
                                <span class="label-text">"Email"</span>
                            </label>
                            <input
                                id="email"
                                type="email"
                                on:input=move |ev| set_email.set(event_target_value(&ev))
                                prop:value=email
                                class="input input-bordered"
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Password"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="confirm">
                                <span class="label-text">"Confirm password"</span>
                            </label>
                            <input
                                id="confirm"
                                type="password"
                                on:input=move |ev| set_confirm.set(event_target_value(&ev))
                                prop:value=confirm
                                class="input input-bordered"
                            />
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=is_loading>
                                {move || if is_loading() {
                                    view! { <span class="loading loading-spinner"></span> "Registering..." }.into_any()
                                } else {
                                    "Register".into_any()
                                }}
                            </button>
                        </div>
                        <p class="text-sm text-center mt-2">
                            "Already registered? "
                            <Link to=AppRoute::Login class="link link-primary">"Sign in"</Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
