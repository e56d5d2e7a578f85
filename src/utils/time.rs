#[cfg(not(target_arch = "wasm32"))]
pub use tokio::time::sleep;

#[cfg(target_arch = "wasm32")]
pub async fn sleep(duration: std::time::Duration) {
    let millis = duration.as_millis() as i32;
    let promise = js_sys::Promise::new(&mut |resolve, _| {
        if let Some(window) = web_sys::window() {
            if let Err(e) =
                window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, millis)
            {
                log::warn!("setTimeout failed: {:?}", e);
            }
        }
    });
    let _ = wasm_bindgen_futures::JsFuture::from(promise).await;
}

/// Milliseconds from a monotonic clock, matching `performance.now()` in the
/// browser.
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

