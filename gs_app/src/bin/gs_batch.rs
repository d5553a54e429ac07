use gs_app::batch_file;
use gs_app::cli;
use gs_app::config_loader;
use gs_app::shutdown_handler;
use tracing::error;
use tracing::info;
use tracing::warn;

const ACCESS_TOKEN_VAR: &str = "SHEETS_ACCESS_TOKEN";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenvy::dotenv().ok();

    let (config_path, batch_path) = cli::config_and_batch_paths();

    // Log directory comes from the config, so load it before tracing is up
    let loaded = config_loader::load_config(&config_path);
    let log_dir = loaded.as_ref().map_or(config_loader::DEFAULT_LOG_DIR, |config| config.log_dir.as_str()).to_string();
    let _guard = gs_app::tracing_setup::init_with_stdout("gs_batch", &log_dir, tracing::Level::INFO);
    let config = config_loader::or_default(loaded, &config_path);

    info!(
        base_url = %config.base_url,
        write_quota = config.write_quota.quota,
        write_window_secs = config.write_quota.window_secs,
        "Starting gs_batch"
    );

    let access_token = std::env::var(ACCESS_TOKEN_VAR).map_err(|_| format!("{ACCESS_TOKEN_VAR} is not set"))?;
    let client = config.client_builder().access_token(access_token).build()?;

    let batch = batch_file::load_batch(&batch_path)?;
    let deposited = batch_file::deposit_all(&client, batch);
    info!("Deposited {} requests from {}", deposited, batch_path);

    let shutdown = shutdown_handler::setup()?;

    tokio::select! {
        result = client.execute_all_deposited() => match result {
            Ok(responses) => {
                let replies: usize = responses.iter().map(|response| response.replies.len()).sum();
                info!(batches = responses.len(), replies, "All batches flushed");
            }
            Err(err) => {
                error!("Batch flush failed: {err}");
                warn!("{} requests left unsent", client.pending_requests());
                return Err(err.into());
            }
        },
        _ = shutdown_handler::requested(shutdown) => {
            warn!("Interrupted with {} requests unsent", client.pending_requests());
        }
    }

    info!(writes = client.write_limiter().executed(), "Shutdown complete");
    Ok(())
}
