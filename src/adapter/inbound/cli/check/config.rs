use std::path::Path;

use serde_json::json;

use crate::adapter::inbound::cli::output;
use crate::adapter::outbound::llm::openai::API_KEY_VAR;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;

/// Report the effective configuration without calling the provider.
pub fn execute_config(config: &Config, source: Option<&Path>) -> Result<()> {
    let source = source.map_or_else(
        || "defaults + environment".to_string(),
        |path| path.display().to_string(),
    );

    if output::is_json() {
        output::json_output(json!({
            "command": "check.config",
            "config": source,
            "provider": "openai",
            "model": config.provider.model,
            "base_url": config.provider.base_url,
            "max_concurrency": config.batch.max_concurrency,
            "max_attempts": config.retry.max_attempts,
            "api_key_present": config.has_api_key(),
        }));
        return Ok(());
    }

    output::section("Configuration Check");
    output::field("Config", source);
    output::success("Configuration is valid");

    output::section("Summary");
    output::field("Provider", "openai");
    output::field("Model", &config.provider.model);
    output::field("Base URL", &config.provider.base_url);
    output::field("Temperature", config.provider.temperature);
    output::field("Timeout", format!("{}s", config.provider.timeout_secs));
    output::field("Concurrency", config.batch.max_concurrency);
    output::field("Max rows", config.batch.max_rows);
    output::field("Locale", &config.batch.locale);
    if output::verbosity() > 0 {
        output::field("Attempts", config.retry.max_attempts);
        output::field("Backoff base", config.retry.backoff_base);
        output::field("Backoff unit", format!("{}ms", config.retry.backoff_unit_ms));
    }

    if config.has_api_key() {
        output::success("API key detected");
    } else {
        output::warning(&format!("{API_KEY_VAR} is not set; classify will fail"));
    }

    Ok(())
}
