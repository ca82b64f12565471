//! 分店信息表单组件
//!
//! 纯粹的表单输入渲染，职责单一。

use leptos::prelude::*;

use super::form_state::FormState;

/// 单个文本输入及其错误提示
#[component]
fn TextField(
    state: FormState,
    /// 线上字段名，同时作为错误键与元素 id
    field: &'static str,
    label: &'static str,
    value: RwSignal<String>,
    #[prop(default = "text")] input_type: &'static str,
    #[prop(default = "")] placeholder: &'static str,
) -> impl IntoView {
    let error = move || state.error(field);

    view! {
        <div class="form-control">
            <label for=field class="label">
                <span class="label-text">{label}</span>
            </label>
            <input
                id=field
                type=input_type
                placeholder=placeholder
                on:input=move |ev| value.set(event_target_value(&ev))
                prop:value=move || value.get()
                class=move || {
                    if error().is_some() {
                        "input input-bordered input-error w-full"
                    } else {
                        "input input-bordered w-full"
                    }
                }
            />
            <Show when=move || error().is_some()>
                <label class="label">
                    <span class="label-text-alt text-error">{move || error().unwrap_or_default()}</span>
                </label>
            </Show>
        </div>
    }
}

/// 分店信息表单组件
#[component]
pub fn BranchInfoForm(state: FormState) -> impl IntoView {
    view! {
        <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
            <TextField state=state field="name" label="Branch name" value=state.name placeholder="Ashoka Yamaha - Mettuguda" />
            <TextField state=state field="location" label="Location" value=state.location placeholder="Hyderabad" />
        </div>

        <div class="grid grid-cols-2 gap-4">
            <TextField state=state field="latitude" label="Latitude" value=state.latitude input_type="number" placeholder="17.4399" />
            <TextField state=state field="longitude" label="Longitude" value=state.longitude input_type="number" placeholder="78.4983" />
        </div>

        <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
            <TextField state=state field="email" label="Branch email" value=state.email input_type="email" />
            <TextField state=state field="phoneNumber" label="Contact number" value=state.phone_number input_type="tel" placeholder="10 digits" />
        </div>

        <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
            <TextField state=state field="branchManagerName" label="Manager name" value=state.manager_name />
            <TextField state=state field="branchManagerPhone" label="Manager phone" value=state.manager_phone input_type="tel" placeholder="10 digits" />
        </div>
    }
}
