//! Helpers shared by the `hearth` operator binary.

use anyhow::bail;

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Trimmed, lowercased staff email. Rejects anything without a local part and a
/// dotted domain.
pub fn normalize_email(raw: &str) -> anyhow::Result<String> {
    let email = raw.trim().to_lowercase();
    let Some((local, domain)) = email.split_once('@') else {
        bail!("'{}' is not an email address", raw.trim());
    };
    if local.is_empty() || domain.contains('@') || !domain.contains('.') || domain.ends_with('.') {
        bail!("'{}' is not an email address", raw.trim());
    }
    Ok(email)
}
