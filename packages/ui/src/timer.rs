use std::time::Duration;

/// Sleep on whichever executor the platform runs.
pub async fn sleep(duration: Duration) {
    #[cfg(target_arch = "wasm32")]
    gloo_timers::future::sleep(duration).await;
    #[cfg(not(target_arch = "wasm32"))]
    tokio::time::sleep(duration).await;
}

pub async fn sleep_ms(millis: u64) {
    sleep(Duration::from_millis(millis)).await;
}
