use crate::config::types::{
    ClientConfig, Config, LimitsConfig, ListingItem, OutputConfig, PacingConfig, SearchItem,
};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_client_config(&config.client)?;
    validate_pacing_config(&config.pacing)?;
    validate_limits_config(&config.limits)?;
    validate_output_config(&config.output)?;
    validate_listing_items(&config.listings)?;
    validate_search_items(&config.searches)?;
    Ok(())
}

/// Validates HTTP client configuration
fn validate_client_config(config: &ClientConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' must use http or https",
            config.base_url
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "timeout-secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

fn validate_pacing_config(config: &PacingConfig) -> Result<(), ConfigError> {
    if config.batch_size < 1 {
        return Err(ConfigError::Validation(
            "batch-size must be >= 1".to_string(),
        ));
    }

    Ok(())
}

fn validate_limits_config(config: &LimitsConfig) -> Result<(), ConfigError> {
    if config.page_size < 1 || config.page_size > 100 {
        return Err(ConfigError::Validation(format!(
            "page-size must be between 1 and 100, got {}",
            config.page_size
        )));
    }

    if config.max_search_pages < 1 {
        return Err(ConfigError::Validation(
            "max-search-pages must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    if config.combined_file.is_empty() {
        return Err(ConfigError::Validation(
            "combined-file cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_listing_items(items: &[ListingItem]) -> Result<(), ConfigError> {
    for item in items {
        validate_community(&item.community)?;
        validate_target(&item.community, item.target)?;
        validate_category(&item.community, &item.category)?;
    }
    Ok(())
}

fn validate_search_items(items: &[SearchItem]) -> Result<(), ConfigError> {
    for item in items {
        validate_community(&item.community)?;
        validate_target(&item.community, item.target)?;
        validate_category(&item.community, &item.category)?;

        if item.keyword.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "Search in '{}' has an empty keyword",
                item.community
            )));
        }
    }
    Ok(())
}

/// Community names end up in URL paths and file names
fn validate_community(name: &str) -> Result<(), ConfigError> {
    if name.is_empty() {
        return Err(ConfigError::Validation(
            "Community name cannot be empty".to_string(),
        ));
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ConfigError::Validation(format!(
            "Community '{}' must contain only ASCII letters, digits and underscores",
            name
        )));
    }

    Ok(())
}

fn validate_target(community: &str, target: usize) -> Result<(), ConfigError> {
    if target < 1 {
        return Err(ConfigError::Validation(format!(
            "Target for '{}' must be >= 1",
            community
        )));
    }
    Ok(())
}

fn validate_category(community: &str, category: &str) -> Result<(), ConfigError> {
    if category.trim().is_empty() {
        return Err(ConfigError::Validation(format!(
            "Work item for '{}' has an empty category",
            community
        )));
    }
    Ok(())
}
