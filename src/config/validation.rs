//! Configuration validation functions.

use super::Config;
use std::path::Path;

/// Reject configurations the server cannot serve correctly with.
pub fn validate_config(config: &Config) -> anyhow::Result<()> {
    if config.realms.allowed.is_empty() {
        anyhow::bail!(
            "realms.allowed is empty; set REALM_TOKEN_ALLOWED_REALMS to a comma-separated list \
             such as \"dev,stage,prod\""
        );
    }

    if !config.realms.is_allowed(&config.realms.default_realm) {
        anyhow::bail!(
            "realms.default_realm '{}' is not in realms.allowed ({})",
            config.realms.default_realm,
            config.realms.allowed.join(",")
        );
    }

    if config.token.ttl_secs == 0 {
        anyhow::bail!("token.ttl_secs must be greater than zero");
    }

    if config.token.outgoing_application_sid.trim().is_empty() {
        anyhow::bail!("token.outgoing_application_sid must not be empty");
    }

    if let Some(base) = config.relay.api_base_url.as_deref() {
        url::Url::parse(base)
            .map_err(|err| anyhow::anyhow!("relay.api_base_url '{base}' is not a URL: {err}"))?;
    }

    if config.security.transport.tls.enabled {
        let tls = &config.security.transport.tls;
        for (field, value) in [
            ("certificate_path", tls.certificate_path.as_deref()),
            ("private_key_path", tls.private_key_path.as_deref()),
        ] {
            let path = value
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .ok_or_else(|| {
                    anyhow::anyhow!(
                        "security.transport.tls.{field} must be provided when TLS is enabled"
                    )
                })?;
            if !Path::new(path).exists() {
                anyhow::bail!("TLS {field} not found at {path}");
            }
        }
    }

    Ok(())
}
