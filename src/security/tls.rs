use std::fs;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use axum_server::tls_rustls::RustlsConfig;
use rustls::{
    server::{danger::ClientCertVerifier, WebPkiClientVerifier},
    RootCertStore, ServerConfig as RustlsServerConfig,
};
use rustls_pemfile::{certs, read_one, Item};
use rustls_pki_types::{CertificateDer, PrivateKeyDer};

use crate::config::{ClientAuthMode, TlsServerConfig};

/// Build an [`axum_server`] TLS configuration from the `security.transport.tls` section.
pub fn build_rustls_config(tls: &TlsServerConfig) -> Result<RustlsConfig> {
    let cert_chain = load_cert_chain(tls)?;
    let private_key = load_private_key(tls)?;
    let verifier = build_client_verifier(tls)?;

    let mut config = RustlsServerConfig::builder()
        .with_client_cert_verifier(verifier)
        .with_single_cert(cert_chain, private_key)
        .map_err(|err| anyhow!("invalid TLS certificate/private key pair: {err}"))?;
    config.alpn_protocols = vec![b"h2".to_vec(), b"http/1.1".to_vec()];

    Ok(RustlsConfig::from_config(Arc::new(config)))
}

fn read_pem(path: Option<&String>, field: &str) -> Result<(String, Vec<u8>)> {
    let path = path.ok_or_else(|| anyhow!("security.transport.tls.{field} must be set"))?;
    let data = fs::read(path).with_context(|| format!("failed to read TLS {field} at {path}"))?;
    Ok((path.clone(), data))
}

fn load_cert_chain(tls: &TlsServerConfig) -> Result<Vec<CertificateDer<'static>>> {
    let (path, data) = read_pem(tls.certificate_path.as_ref(), "certificate_path")?;
    let chain = certs(&mut data.as_slice())
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("failed to parse TLS certificate chain at {path}"))?;

    if chain.is_empty() {
        anyhow::bail!("no certificates were found in {path}");
    }
    Ok(chain)
}

fn load_private_key(tls: &TlsServerConfig) -> Result<PrivateKeyDer<'static>> {
    let (path, data) = read_pem(tls.private_key_path.as_ref(), "private_key_path")?;
    let mut reader = data.as_slice();
    while let Some(item) =
        read_one(&mut reader).with_context(|| format!("failed to parse PEM entry in {path}"))?
    {
        match item {
            Item::Pkcs8Key(key) => return Ok(key.into()),
            Item::Pkcs1Key(key) => return Ok(key.into()),
            Item::Sec1Key(key) => return Ok(key.into()),
            _ => continue,
        }
    }

    anyhow::bail!("no supported private key (pkcs8/pkcs1/sec1) was found in {path}");
}

fn build_client_verifier(tls: &TlsServerConfig) -> Result<Arc<dyn ClientCertVerifier>> {
    if matches!(tls.client_auth, ClientAuthMode::None) {
        return Ok(WebPkiClientVerifier::no_client_auth());
    }

    let (path, data) = read_pem(tls.client_ca_cert_path.as_ref(), "client_ca_cert_path")?;
    let mut store = RootCertStore::empty();
    for cert in certs(&mut data.as_slice()) {
        let cert = cert.with_context(|| format!("failed to parse a client CA in {path}"))?;
        store
            .add(cert)
            .map_err(|err| anyhow!("invalid client CA certificate in {path}: {err}"))?;
    }
    if store.is_empty() {
        anyhow::bail!("no client CA certificates were loaded from {path}");
    }

    let builder = WebPkiClientVerifier::builder(Arc::new(store));
    let builder = if matches!(tls.client_auth, ClientAuthMode::Optional) {
        builder.allow_unauthenticated()
    } else {
        builder
    };
    let verifier = builder
        .build()
        .map_err(|err| anyhow!("failed to initialize client certificate verifier: {err}"))?;

    Ok(verifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tls_with(cert: Option<String>, key: Option<String>) -> TlsServerConfig {
        TlsServerConfig {
            enabled: true,
            certificate_path: cert,
            private_key_path: key,
            ..TlsServerConfig::default()
        }
    }

    #[test]
    fn missing_certificate_path_is_reported() {
        let err = build_rustls_config(&tls_with(None, None))
            .map(|_| ())
            .unwrap_err();
        assert!(err.to_string().contains("certificate_path must be set"));
    }

    #[test]
    fn empty_certificate_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let cert = dir.path().join("cert.pem");
        fs::write(&cert, "").unwrap();

        let err = load_cert_chain(&tls_with(Some(cert.display().to_string()), None)).unwrap_err();
        assert!(err.to_string().contains("no certificates"));
    }

    #[test]
    fn key_file_without_key_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let key = dir.path().join("key.pem");
        fs::write(&key, "not a pem file\n").unwrap();

        let err = load_private_key(&tls_with(None, Some(key.display().to_string()))).unwrap_err();
        assert!(err.to_string().contains("no supported private key"));
    }

    #[test]
    fn required_client_auth_needs_a_ca_bundle() {
        let tls = TlsServerConfig {
            client_auth: ClientAuthMode::Require,
            ..tls_with(None, None)
        };
        let err = build_client_verifier(&tls).map(|_| ()).unwrap_err();
        assert!(err.to_string().contains("client_ca_cert_path must be set"));
    }
}
