//! Command-line flags.
//!
//! Flags override whatever the optional config file sets.

use std::path::PathBuf;

use clap::Parser;

use crate::config::schema::{ProxyConfig, TlsConfig};

#[derive(Debug, Parser)]
#[command(name = "nbgate")]
#[command(about = "Reverse proxy to notabenoid.org sharing one logged-in session", long_about = None)]
pub struct Cli {
    /// Username
    #[arg(short = 'u', long = "user")]
    pub username: Option<String>,

    /// Password
    #[arg(short = 'p', long = "pass")]
    pub password: Option<String>,

    /// HTTP service address (will be redirected to HTTPS)
    #[arg(long = "http")]
    pub redirect_address: Option<String>,

    /// Proxy listen address
    #[arg(short, long)]
    pub bind: Option<String>,

    /// TLS certificate (PEM)
    #[arg(long)]
    pub tls_cert: Option<PathBuf>,

    /// TLS private key (PEM)
    #[arg(long)]
    pub tls_key: Option<PathBuf>,

    /// Optional TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Overlay the flags that were given onto `config`.
    pub fn apply(self, config: &mut ProxyConfig) {
        if let Some(username) = self.username {
            config.credentials.username = username;
        }
        if let Some(password) = self.password {
            config.credentials.password = password;
        }
        if let Some(bind) = self.bind {
            config.listener.bind_address = bind;
        }
        if let Some(redirect) = self.redirect_address {
            config.listener.redirect_address = Some(redirect);
        }
        if self.tls_cert.is_some() || self.tls_key.is_some() {
            let tls = config.listener.tls.get_or_insert_with(TlsConfig::default);
            if let Some(cert) = self.tls_cert {
                tls.cert_path = cert;
            }
            if let Some(key) = self.tls_key {
                tls.key_path = key;
            }
        }
    }
}
