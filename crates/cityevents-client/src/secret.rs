//! Credential reference resolver.
//!
//! API keys in `config.toml` may point at a secret kept elsewhere:
//!
//! - `env::VAR_NAME` reads `$VAR_NAME` from the environment
//! - `pass::path/in/store` runs `pass show path/in/store` and keeps the first line
//! - anything else is the credential itself

/// Resolves a value that may carry a secret reference prefix.
pub fn resolve(value: &str) -> Result<String, String> {
    if let Some(var) = value.strip_prefix("env::") {
        resolve_env(var)
    } else if let Some(path) = value.strip_prefix("pass::") {
        resolve_pass(path)
    } else {
        Ok(value.to_string())
    }
}

/// Resolves the credential stored in `field`, which must be set and non-blank.
///
/// `section` names the config table for error messages (e.g. `ticketmaster`).
pub fn resolve_credential(
    section: &str,
    field: &str,
    value: Option<&str>,
) -> Result<String, String> {
    let raw = value.ok_or_else(|| format!("[{}] {} is not set", section, field))?;
    let resolved =
        resolve(raw).map_err(|e| format!("failed to resolve [{}] {}: {}", section, field, e))?;
    if resolved.trim().is_empty() {
        return Err(format!("[{}] {} resolved to an empty value", section, field));
    }
    Ok(resolved)
}

fn resolve_pass(path: &str) -> Result<String, String> {
    let output = std::process::Command::new("pass")
        .arg("show")
        .arg(path)
        .output()
        .map_err(|e| format!("failed to run `pass show {}`: {}", path, e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!(
            "`pass show {}` failed (exit {}): {}",
            path,
            output.status,
            stderr.trim()
        ));
    }

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .map(str::to_string)
        .ok_or_else(|| format!("`pass show {}` produced no output", path))
}

fn resolve_env(var: &str) -> Result<String, String> {
    std::env::var(var).map_err(|_| format!("environment variable `{}` is not set", var))
}
