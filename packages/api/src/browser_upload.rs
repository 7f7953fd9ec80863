//! # Browser multipart upload over `XMLHttpRequest`
//!
//! `fetch` exposes no progress for a request body, so the browser build sends
//! uploads through `XMLHttpRequest`: its `upload.onprogress` events feed the
//! [`ProgressTracker`], and its own `timeout` bounds the request. Error,
//! timeout and abort all surface as [`ApiError::Transport`].

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use futures::channel::oneshot;
use js_sys::{Array, Uint8Array};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, FormData, ProgressEvent, XmlHttpRequest};

use crate::error::ApiError;
use crate::progress::ProgressTracker;
use crate::upload::UploadIntent;

#[derive(Clone, Copy, Debug)]
enum Settled {
    Loaded,
    Failed(&'static str),
}

fn js_error(e: JsValue) -> ApiError {
    ApiError::Transport(format!("{e:?}"))
}

/// A finished exchange: status code and body text.
pub(crate) struct RawResponse {
    pub status: u16,
    pub body: String,
}

pub(crate) async fn post_multipart(
    url: &str,
    token: Option<String>,
    intent: &UploadIntent,
    replace_existing: bool,
    timeout: Duration,
    progress: ProgressTracker,
) -> Result<RawResponse, ApiError> {
    let xhr = XmlHttpRequest::new().map_err(js_error)?;
    xhr.open_with_async("POST", url, true).map_err(js_error)?;
    if let Some(token) = token {
        xhr.set_request_header("Authorization", &format!("Bearer {token}"))
            .map_err(js_error)?;
    }
    xhr.set_timeout(u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX));

    let parts = Array::of1(&Uint8Array::from(intent.bytes.as_slice()));
    let blob = Blob::new_with_u8_array_sequence(&parts).map_err(js_error)?;
    let form = FormData::new().map_err(js_error)?;
    form.append_with_blob_and_filename("file", &blob, &intent.filename)
        .map_err(js_error)?;
    form.append_with_str("replace_existing", if replace_existing { "true" } else { "false" })
        .map_err(js_error)?;

    let (tx, rx) = oneshot::channel::<Settled>();
    let tx = Rc::new(RefCell::new(Some(tx)));
    let settle = |outcome: Settled| {
        let tx = tx.clone();
        Closure::<dyn FnMut()>::new(move || {
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(outcome);
            }
        })
    };
    let on_load = settle(Settled::Loaded);
    let on_error = settle(Settled::Failed("network error"));
    let on_timeout = settle(Settled::Failed("upload timed out"));
    let on_abort = settle(Settled::Failed("upload aborted"));

    let on_progress = Closure::<dyn FnMut(ProgressEvent)>::new(move |e: ProgressEvent| {
        if e.length_computable() {
            progress.report_bytes(e.loaded() as u64, e.total() as u64);
        }
    });

    let upload = xhr.upload().map_err(js_error)?;
    upload.set_onprogress(Some(on_progress.as_ref().unchecked_ref()));
    xhr.set_onload(Some(on_load.as_ref().unchecked_ref()));
    xhr.set_onerror(Some(on_error.as_ref().unchecked_ref()));
    xhr.set_ontimeout(Some(on_timeout.as_ref().unchecked_ref()));
    xhr.set_onabort(Some(on_abort.as_ref().unchecked_ref()));

    xhr.send_with_opt_form_data(Some(&form)).map_err(js_error)?;
    let settled = rx.await.unwrap_or(Settled::Failed("upload abandoned"));

    // Detach before the closures are dropped
    upload.set_onprogress(None);
    xhr.set_onload(None);
    xhr.set_onerror(None);
    xhr.set_ontimeout(None);
    xhr.set_onabort(None);

    match settled {
        Settled::Loaded => Ok(RawResponse {
            status: xhr.status().map_err(js_error)?,
            body: xhr.response_text().map_err(js_error)?.unwrap_or_default(),
        }),
        Settled::Failed(reason) => {
            tracing::warn!("Upload request failed without response: {}", reason);
            Err(ApiError::Transport(reason.to_string()))
        }
    }
}
