use crate::utils::error::{RecomposeError, Result};
use regex::Regex;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Accepts the host spellings the docker CLI understands: local sockets
/// (`unix://`, `npipe://`) and TCP endpoints (`tcp://`, `http://`, `https://`).
pub fn validate_docker_host(field_name: &str, host: &str) -> Result<()> {
    if host.trim().is_empty() {
        return Err(RecomposeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: host.to_string(),
            reason: "Docker host cannot be empty".to_string(),
        });
    }

    let url = Url::parse(host).map_err(|e| RecomposeError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: host.to_string(),
        reason: format!("Invalid URL format: {}", e),
    })?;

    match url.scheme() {
        "unix" | "npipe" | "tcp" | "http" | "https" => Ok(()),
        scheme => Err(RecomposeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: host.to_string(),
            reason: format!("Unsupported URL scheme: {}", scheme),
        }),
    }
}

/// Accepts `1.41` as well as the `v1.41` spelling used in request paths.
pub fn validate_api_version(field_name: &str, version: &str) -> Result<()> {
    let re = Regex::new(r"^v?\d+\.\d+$").map_err(|e| RecomposeError::ConfigError {
        message: format!("Invalid version pattern: {}", e),
    })?;

    if !re.is_match(version) {
        return Err(RecomposeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: version.to_string(),
            reason: "Expected MAJOR.MINOR, e.g. 1.41".to_string(),
        });
    }
    Ok(())
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(RecomposeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(RecomposeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(RecomposeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value
        .as_ref()
        .ok_or_else(|| RecomposeError::MissingConfigError {
            field: field_name.to_string(),
        })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(RecomposeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}
