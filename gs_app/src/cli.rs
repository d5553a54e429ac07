pub const DEFAULT_CONFIG_PATH: &str = "config/gs_batch.toml";
pub const DEFAULT_BATCH_PATH: &str = "batch.json";

/// Positional argument at `index` (1-based), or `default` when absent
pub fn arg_or(args: &[String], index: usize, default: &str) -> String {
    args.get(index).cloned().unwrap_or_else(|| default.to_string())
}

/// `gs_batch [config.toml] [batch.json]`
pub fn config_and_batch_paths() -> (String, String) {
    let args: Vec<String> = std::env::args().collect();
    (arg_or(&args, 1, DEFAULT_CONFIG_PATH), arg_or(&args, 2, DEFAULT_BATCH_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arg_or() {
        let args = vec!["gs_batch".to_string(), "custom.toml".to_string()];
        assert_eq!(arg_or(&args, 1, DEFAULT_CONFIG_PATH), "custom.toml");
        assert_eq!(arg_or(&args, 2, DEFAULT_BATCH_PATH), DEFAULT_BATCH_PATH);
    }
}
