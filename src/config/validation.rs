use crate::config::types::{
    Config, CrawlerConfig, InputConfig, KeywordConfig, OutputConfig, SchedulerConfig,
};
use crate::ConfigError;
use encoding_rs::Encoding;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_scheduler_config(&config.scheduler)?;
    validate_user_agent(&config.user_agent.value)?;
    validate_keywords(&config.keywords)?;
    validate_input_config(&config.input)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.max_timeout_retries < 1 {
        return Err(ConfigError::Validation(format!(
            "max_timeout_retries must be >= 1, got {}",
            config.max_timeout_retries
        )));
    }

    if config.request_timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "request_timeout_ms must be > 0".to_string(),
        ));
    }

    Ok(())
}

/// Validates scheduler configuration
fn validate_scheduler_config(config: &SchedulerConfig) -> Result<(), ConfigError> {
    if config.workers < 1 || config.workers > 100 {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and 100, got {}",
            config.workers
        )));
    }

    if config.deadline_secs == 0 {
        return Err(ConfigError::Validation(
            "deadline_secs must be > 0".to_string(),
        ));
    }

    if config.progress_interval_secs == 0 {
        return Err(ConfigError::Validation(
            "progress_interval_secs must be > 0".to_string(),
        ));
    }

    Ok(())
}

fn validate_user_agent(value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user agent cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validates keyword lists
///
/// A blank keyword would match every page, so it is rejected in every list.
fn validate_keywords(config: &KeywordConfig) -> Result<(), ConfigError> {
    if config.primary.is_empty() {
        return Err(ConfigError::Validation(
            "primary keyword list cannot be empty".to_string(),
        ));
    }

    let lists = [
        ("primary", &config.primary),
        ("secondary", &config.secondary),
        ("priority-pages", &config.priority_pages),
        ("excluded-pages", &config.excluded_pages),
        ("resource-extensions", &config.resource_extensions),
    ];

    for (name, list) in lists {
        if list.iter().any(|k| k.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "{} keyword list contains a blank entry",
                name
            )));
        }
    }

    Ok(())
}

fn validate_input_config(config: &InputConfig) -> Result<(), ConfigError> {
    if Encoding::for_label(config.encoding.as_bytes()).is_none() {
        return Err(ConfigError::UnknownEncoding(config.encoding.clone()));
    }
    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.suffix.is_empty() {
        return Err(ConfigError::Validation(
            "output suffix cannot be empty".to_string(),
        ));
    }

    if let Some(path) = &config.summary_path {
        if path.is_empty() {
            return Err(ConfigError::Validation(
                "summary_path cannot be empty when set".to_string(),
            ));
        }
    }

    Ok(())
}
