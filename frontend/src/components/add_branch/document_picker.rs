//! 分店文档选择组件
//!
//! 读取用户选择的文件内容，追加到表单的附件列表。

use crate::web::read_attachment;
use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::JsCast;
use web_sys::HtmlInputElement;

use super::form_state::FormState;

#[component]
pub fn DocumentPicker(state: FormState) -> impl IntoView {
    let on_change = move |ev: leptos::ev::Event| {
        let Some(input) = ev
            .target()
            .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
        else {
            return;
        };
        let Some(list) = input.files() else {
            return;
        };
        let files: Vec<web_sys::File> = (0..list.length()).filter_map(|i| list.get(i)).collect();
        // 允许再次选择同一个文件
        input.set_value("");

        spawn_local(async move {
            for file in files {
                match read_attachment(&file).await {
                    Ok(attachment) => state.files.update(|list| list.push(attachment)),
                    Err(e) => log::warn!("[AddBranch] Skipping unreadable file: {}", e),
                }
            }
        });
    };

    let remove = move |index: usize| {
        state.files.update(|list| {
            if index < list.len() {
                list.remove(index);
            }
        })
    };

    view! {
        <div class="form-control">
            <label for="files" class="label">
                <span class="label-text">"Branch documents (optional)"</span>
            </label>
            <input
                id="files"
                type="file"
                multiple
                class="file-input file-input-bordered w-full"
                on:change=on_change
            />
            <ul class="mt-2 space-y-1">
                {move || {
                    state
                        .files
                        .get()
                        .into_iter()
                        .enumerate()
                        .map(|(index, file)| {
                            view! {
                                <li class="flex items-center justify-between text-sm bg-base-200 rounded px-3 py-1">
                                    <span>{file.file_name} " (" {format_size(file.bytes.len())} ")"</span>
                                    <button type="button" class="btn btn-ghost btn-xs" on:click=move |_| remove(index)>
                                        "Remove"
                                    </button>
                                </li>
                            }
                        })
                        .collect_view()
                }}
            </ul>
        </div>
    }
}

fn format_size(bytes: usize) -> String {
    match bytes {
        b if b < 1024 => format!("{} B", b),
        b if b < 1024 * 1024 => format!("{:.1} KB", b as f64 / 1024.0),
        b => format!("{:.1} MB", b as f64 / (1024.0 * 1024.0)),
    }
}
