use crate::config::types::{
    Config, HttpConfig, InputConfig, OutputConfig, ScraperConfig, SelectorEntry, SelectorRule,
};
use crate::ConfigError;
use scraper::Selector;
use std::collections::HashSet;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_scraper_config(&config.scraper)?;
    validate_http_config(&config.http)?;
    validate_input_config(&config.input)?;
    validate_output_config(&config.output)?;
    validate_selectors(&config.selectors)?;
    Ok(())
}

/// Validates scraper configuration
fn validate_scraper_config(config: &ScraperConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.delay_min_ms > config.delay_max_ms {
        return Err(ConfigError::Validation(format!(
            "delay-min-ms ({}) must not exceed delay-max-ms ({})",
            config.delay_min_ms, config.delay_max_ms
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.chunk_size < 1 {
        return Err(ConfigError::Validation(format!(
            "chunk_size must be >= 1, got {}",
            config.chunk_size
        )));
    }

    if config.min_review_length < 1 {
        return Err(ConfigError::Validation(format!(
            "min_review_length must be >= 1, got {}",
            config.min_review_length
        )));
    }

    Ok(())
}

/// Validates HTTP configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates input configuration
fn validate_input_config(config: &InputConfig) -> Result<(), ConfigError> {
    if config.targets_path.is_empty() {
        return Err(ConfigError::Validation(
            "targets-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.reviews_path.is_empty() {
        return Err(ConfigError::Validation(
            "reviews-path cannot be empty".to_string(),
        ));
    }

    if config.checkpoint_path.is_empty() {
        return Err(ConfigError::Validation(
            "checkpoint-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the selector strategy list
///
/// Every CSS query must compile; catching a typo here is much cheaper than
/// discovering it mid-run after the first page fetch.
fn validate_selectors(selectors: &[SelectorEntry]) -> Result<(), ConfigError> {
    if selectors.is_empty() {
        return Err(ConfigError::Validation(
            "at least one [[selector]] entry is required".to_string(),
        ));
    }

    let mut names = HashSet::new();
    for entry in selectors {
        if entry.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "selector name cannot be empty".to_string(),
            ));
        }

        if !names.insert(entry.name.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate selector name '{}'",
                entry.name
            )));
        }

        match &entry.rule {
            SelectorRule::Css { query } => {
                Selector::parse(query).map_err(|e| ConfigError::InvalidSelector {
                    query: query.clone(),
                    message: e.to_string(),
                })?;
            }
            SelectorRule::ScriptState { field } => {
                if field.trim().is_empty() {
                    return Err(ConfigError::Validation(format!(
                        "selector '{}' has an empty script-state field",
                        entry.name
                    )));
                }
            }
        }
    }

    Ok(())
}
