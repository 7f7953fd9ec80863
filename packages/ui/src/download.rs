//! Hand downloaded bytes to the user under the file's own name.

/// How long the browser keeps the object URL alive after the click.
#[cfg(target_arch = "wasm32")]
const REVOKE_DELAY_MS: u32 = 1_000;

/// In the browser: a temporary object URL clicked through a hidden anchor.
#[cfg(target_arch = "wasm32")]
pub fn save_file(filename: &str, bytes: &[u8]) -> Result<(), String> {
    use wasm_bindgen::JsCast;

    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;

    let parts = js_sys::Array::new();
    parts.push(&js_sys::Uint8Array::from(bytes));
    let blob = web_sys::Blob::new_with_u8_array_sequence(&parts).map_err(|e| format!("{e:?}"))?;
    let url = web_sys::Url::create_object_url_with_blob(&blob).map_err(|e| format!("{e:?}"))?;

    let anchor = document
        .create_element("a")
        .map_err(|e| format!("{e:?}"))?
        .dyn_into::<web_sys::HtmlAnchorElement>()
        .map_err(|_| "not an anchor element".to_string())?;
    anchor.set_href(&url);
    anchor.set_download(filename);
    anchor.click();

    // Revoking right away can abort the download in some browsers
    gloo_timers::callback::Timeout::new(REVOKE_DELAY_MS, move || {
        if web_sys::Url::revoke_object_url(&url).is_err() {
            tracing::debug!("Could not revoke download URL");
        }
    })
    .forget();
    Ok(())
}

/// Natively: written into the user's download directory.
#[cfg(not(target_arch = "wasm32"))]
pub fn save_file(filename: &str, bytes: &[u8]) -> Result<(), String> {
    let dir = dirs::download_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(std::env::temp_dir);
    let name = std::path::Path::new(filename)
        .file_name()
        .ok_or_else(|| format!("invalid filename: {filename}"))?;
    let path = dir.join(name);
    std::fs::write(&path, bytes).map_err(|e| format!("{}: {e}", path.display()))?;
    tracing::info!("Saved download to {}", path.display());
    Ok(())
}
