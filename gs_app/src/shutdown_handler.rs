use tokio::sync::watch;

/// Sets up a Ctrl+C handler and returns a receiver that flips to `true` on shutdown
pub fn setup() -> Result<watch::Receiver<bool>, ctrlc::Error> {
    let (tx, rx) = watch::channel(false);
    ctrlc::set_handler(move || {
        tracing::info!("Shutdown signal received");
        let _ = tx.send(true);
    })?;
    Ok(rx)
}

/// Resolves once shutdown has been requested
pub async fn requested(mut rx: watch::Receiver<bool>) {
    if rx.wait_for(|stop| *stop).await.is_err() {
        // Handler dropped without signalling
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_requested_resolves_on_signal() {
        let (tx, rx) = watch::channel(false);
        let waiter = tokio::spawn(requested(rx));

        tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(1), waiter).await.unwrap().unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_requested_pending_without_signal() {
        let (_tx, rx) = watch::channel(false);
        let result = tokio::time::timeout(Duration::from_secs(5), requested(rx)).await;
        assert!(result.is_err());
    }
}
