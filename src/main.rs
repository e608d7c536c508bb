#![cfg_attr(not(test), deny(clippy::panic))]

use clap::Parser;
use realm_token_server::auth::{load_basic_auth, AuthPolicy};
use realm_token_server::config::{self, Config};
use realm_token_server::credentials::CredentialStore;
use realm_token_server::http::{create_router, AppState};
use realm_token_server::logging;
use realm_token_server::static_files::StaticFiles;
use realm_token_server::token::{PlatformRelayClient, TokenIssuer};
use std::{net::SocketAddr, path::Path, sync::Arc};

/// Realm Token Server -- capability tokens and client config for the calling platform
#[derive(Parser, Debug)]
#[command(name = "realm-token-server")]
#[command(about = "Issues capability tokens and per-realm connection config over HTTP")]
#[command(version)]
struct Cli {
    /// Validate configuration and credential files, then exit.
    #[arg(long, short = 'c', conflicts_with = "print_config")]
    validate_config: bool,

    /// Print the loaded configuration as JSON and exit.
    #[arg(long, conflicts_with = "validate_config")]
    print_config: bool,
}

/// Load everything request handlers need. Any failure here is fatal.
fn build_state(cfg: &Config) -> anyhow::Result<(Arc<AppState>, Arc<AuthPolicy>)> {
    let store = CredentialStore::load(
        Path::new(&cfg.realms.credentials_path),
        &cfg.realms.allowed,
    )?;
    let auth = AuthPolicy::from_credentials(load_basic_auth(Path::new(
        &cfg.security.basic_auth_path,
    ))?);
    let relay = PlatformRelayClient::new(&cfg.relay)?;

    let issuer = TokenIssuer::new(store, Arc::new(relay), cfg.token.clone());
    let state = AppState::new(
        issuer,
        StaticFiles::new(&cfg.static_files.root_dir),
        cfg.realms.default_realm.clone(),
    );

    Ok((Arc::new(state), Arc::new(auth)))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cfg = Arc::new(config::load());

    if cli.print_config {
        let json = serde_json::to_string_pretty(&*cfg)
            .map_err(|e| anyhow::anyhow!("Failed to serialize config: {e}"))?;
        println!("{json}");
        return Ok(());
    }

    let validation_result = config::validate_config(&cfg).and_then(|()| build_state(&cfg));

    if cli.validate_config {
        match validation_result {
            Ok((state, auth)) => {
                println!("Configuration validation passed");
                println!();
                println!("Configuration summary:");
                println!("  Port: {}", cfg.port);
                println!("  Served realms: {}", state.issuer.store().realms().join(","));
                println!("  Default realm: {}", state.default_realm);
                println!("  Basic auth enabled: {}", auth.is_enabled());
                println!("  Static root: {}", state.static_files.base_dir().display());
                println!("  TLS enabled: {}", cfg.security.transport.tls.enabled);
                return Ok(());
            }
            Err(e) => {
                eprintln!("Configuration validation failed:\n{e}");
                std::process::exit(1);
            }
        }
    }

    let _log_guard = logging::init_with_config(&cfg.logging);

    let (state, auth) = validation_result?;

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.port));
    tracing::info!(
        %addr,
        realms = ?state.issuer.store().realms(),
        default_realm = %state.default_realm,
        basic_auth = auth.is_enabled(),
        "Starting realm token server"
    );

    let app = create_router(state, auth, &cfg.security.cors_origins);

    #[cfg(feature = "tls")]
    if cfg.security.transport.tls.enabled {
        let tls_config =
            realm_token_server::security::build_rustls_config(&cfg.security.transport.tls)
                .map_err(|err| anyhow::anyhow!("failed to initialize TLS configuration: {err}"))?;

        tracing::info!(%addr, "Serving over HTTPS");
        axum_server::bind_rustls(addr, tls_config)
            .serve(app.into_make_service())
            .await?;

        return Ok(());
    }

    #[cfg(not(feature = "tls"))]
    if cfg.security.transport.tls.enabled {
        tracing::warn!("TLS is enabled in config but this build lacks the `tls` feature; serving plain HTTP");
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, cors_origins = %cfg.security.cors_origins, "Serving over HTTP");

    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod cli_tests {
    use super::Cli;
    use clap::Parser;

    #[test]
    fn test_cli_default_no_flags() {
        let cli = Cli::try_parse_from(["realm-token-server"]).unwrap();
        assert!(!cli.validate_config);
        assert!(!cli.print_config);
    }

    #[test]
    fn test_cli_validate_config_short() {
        let cli = Cli::try_parse_from(["realm-token-server", "-c"]).unwrap();
        assert!(cli.validate_config);
    }

    #[test]
    fn test_cli_print_config() {
        let cli = Cli::try_parse_from(["realm-token-server", "--print-config"]).unwrap();
        assert!(cli.print_config);
    }

    #[test]
    fn test_cli_validate_and_print_config_conflict() {
        let result =
            Cli::try_parse_from(["realm-token-server", "--validate-config", "--print-config"]);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("cannot be used with"));
    }
}
