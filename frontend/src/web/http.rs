//! HTTP 请求封装模块
//!
//! 使用 `web_sys::fetch` 实现核心库的 `HttpClient`。
//! multipart 请求体转换为 `FormData`，由浏览器生成带 boundary 的 Content-Type。

use async_trait::async_trait;
use branchdesk::{HttpClient, HttpRequest, HttpResponse, RequestBody, TransportError};
use branchdesk_shared::{Attachment, FormPart, MultipartForm};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, FormData, Headers, Request, RequestInit, Response};

fn js_error(context: &'static str) -> impl Fn(JsValue) -> TransportError {
    move |e| TransportError::new(format!("{}: {:?}", context, e))
}

/// 基于 `window.fetch` 的 HTTP 客户端
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchHttpClient;

#[async_trait(?Send)]
impl HttpClient for FetchHttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        let headers = Headers::new().map_err(js_error("创建 Headers 失败"))?;
        for (key, value) in &req.headers {
            headers
                .set(key, value)
                .map_err(js_error("设置 Header 失败"))?;
        }

        let opts = RequestInit::new();
        opts.set_method(req.method.as_str());
        opts.set_headers(&headers.into());

        match &req.body {
            Some(RequestBody::Text(body)) => opts.set_body(&JsValue::from_str(body)),
            Some(RequestBody::Multipart(form)) => opts.set_body(&to_form_data(form)?.into()),
            None => {}
        }

        let request = Request::new_with_str_and_init(&req.url, &opts)
            .map_err(js_error("请求构建失败"))?;

        let window =
            web_sys::window().ok_or_else(|| TransportError::new("无法获取 window 对象"))?;

        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(js_error("网络错误"))?;

        let response: Response = resp_value
            .dyn_into()
            .map_err(js_error("Response 类型转换失败"))?;

        let status = response.status();
        let promise = response.text().map_err(js_error("响应解析失败"))?;
        let text = JsFuture::from(promise)
            .await
            .map_err(js_error("响应解析失败"))?;

        Ok(HttpResponse::new(status, text.as_string().unwrap_or_default()))
    }
}

fn to_form_data(form: &MultipartForm) -> Result<FormData, TransportError> {
    let data = FormData::new().map_err(js_error("创建 FormData 失败"))?;
    for part in form.parts() {
        match part {
            FormPart::Text { name, value } => data.append_with_str(name, value),
            FormPart::File { name, attachment } => {
                let blob = to_blob(attachment)?;
                data.append_with_blob_and_filename(name, &blob, &attachment.file_name)
            }
        }
        .map_err(js_error("写入 FormData 失败"))?;
    }
    Ok(data)
}

fn to_blob(attachment: &Attachment) -> Result<Blob, TransportError> {
    let bytes = js_sys::Uint8Array::from(attachment.bytes.as_slice());
    let parts = js_sys::Array::of1(&bytes);
    let options = BlobPropertyBag::new();
    options.set_type(&attachment.content_type);
    Blob::new_with_u8_array_sequence_and_options(&parts, &options)
        .map_err(js_error("创建 Blob 失败"))
}

/// 读取用户选择的文件
pub async fn read_attachment(file: &web_sys::File) -> Result<Attachment, TransportError> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(js_error("读取文件失败"))?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();

    let content_type = match file.type_() {
        t if t.is_empty() => "application/octet-stream".to_string(),
        t => t,
    };
    Ok(Attachment::new(file.name(), content_type, bytes))
}
