// Copyright (c) 2025 Templated SQL LSP Team
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Profile Files
//!
//! Loads the connection-profile file the project build tool reads
//! (`profiles.yml`): YAML with `{{ env_var('NAME') }}` interpolation.
//! Only the lookup plumbing lives here; the server never opens database
//! connections itself, it hands the selected output to the analyzer
//! collaborator's configuration.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde_yaml::Value;
use thiserror::Error;

static ENV_VAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\{\{\s*env_var\(\s*'([^']+)'\s*(?:,\s*'([^']*)'\s*)?\)\s*\}\}"#)
        .expect("static pattern compiles")
});

/// Errors that can occur while loading profiles
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Failed to read profiles file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse profiles file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Profile '{0}' is missing")]
    MissingProfile(String),

    #[error("Target '{target}' is missing in profile '{profile}'")]
    MissingTarget { profile: String, target: String },

    #[error("Profile '{0}' has no default target")]
    MissingDefaultTarget(String),

    #[error("Environment variable '{0}' is not set")]
    MissingEnvVar(String),
}

/// Replace every `{{ env_var('NAME') }}` and
/// `{{ env_var('NAME', 'default') }}` occurrence with the variable's
/// value. A variable that is unset and has no default is an error.
pub fn interpolate_env_vars(text: &str) -> Result<String, ProfileError> {
    let mut result = String::with_capacity(text.len());
    let mut last_end = 0;

    for captures in ENV_VAR_PATTERN.captures_iter(text) {
        let whole = captures.get(0).expect("whole match exists");
        let name = &captures[1];

        let value = match std::env::var(name) {
            Ok(value) => value,
            Err(_) => match captures.get(2) {
                Some(default) => default.as_str().to_string(),
                None => return Err(ProfileError::MissingEnvVar(name.to_string())),
            },
        };

        result.push_str(&text[last_end..whole.start()]);
        result.push_str(&value);
        last_end = whole.end();
    }

    result.push_str(&text[last_end..]);
    Ok(result)
}

/// Parse profile YAML after env-var interpolation.
pub fn parse_profiles(text: &str) -> Result<Value, ProfileError> {
    let interpolated = interpolate_env_vars(text)?;
    Ok(serde_yaml::from_str(&interpolated)?)
}

/// Load a profiles file from disk.
pub fn load_profiles(path: &Path) -> Result<Value, ProfileError> {
    let content = std::fs::read_to_string(path)?;
    parse_profiles(&content)
}

/// Select an output of a profile: the named target, or the profile's
/// default target when none is given.
pub fn find_target_output(
    profiles: &Value,
    profile_name: &str,
    target: Option<&str>,
) -> Result<Value, ProfileError> {
    let profile = profiles
        .get(profile_name)
        .ok_or_else(|| ProfileError::MissingProfile(profile_name.to_string()))?;

    let target_name = match target {
        Some(target) => target.to_string(),
        None => profile
            .get("target")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ProfileError::MissingDefaultTarget(profile_name.to_string()))?,
    };

    profile
        .get("outputs")
        .and_then(|outputs| outputs.get(target_name.as_str()))
        .cloned()
        .ok_or(ProfileError::MissingTarget {
            profile: profile_name.to_string(),
            target: target_name,
        })
}
