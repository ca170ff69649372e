// SPDX-License-Identifier: Apache-2.0

//! Launchpad OAuth credentials.
//!
//! Launchpad signs API requests with OAuth 1.0 using the PLAINTEXT method.
//! Tokens are obtained once through the web token dance:
//! 1. Request a temporary token (`+request-token`)
//! 2. The user authorizes it in a browser (`+authorize-token`)
//! 3. Exchange it for an access token (`+access-token`)
//! 4. Store the access token in an unencrypted credential file
//!
//! The credential file uses the launchpadlib layout so existing files keep
//! working:
//!
//! ```ini
//! [1]
//! consumer_key = ubuntu-bug-triage
//! consumer_secret =
//! access_token = <token>
//! access_secret = <secret>
//! ```

use std::fs;
use std::io::Write;
use std::path::Path;

use config::{Config, File, FileFormat};
use percent_encoding::{percent_decode_str, utf8_percent_encode};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, info, instrument};

use super::UNRESERVED;
use crate::Result;
use crate::config::LaunchpadConfig;
use crate::error::TriageError;

/// Realm sent with signed API requests.
const OAUTH_REALM: &str = "https://api.launchpad.net/";

fn oauth_escape(s: &str) -> String {
    utf8_percent_encode(s, UNRESERVED).to_string()
}

/// An OAuth access token for the Launchpad API.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Consumer (application) key.
    pub consumer_key: String,
    /// Access token.
    pub access_token: String,
    /// Access token secret.
    pub access_secret: SecretString,
}

/// On-disk layout of a launchpadlib credential file.
#[derive(Debug, Deserialize)]
struct CredentialFile {
    #[serde(rename = "1")]
    entry: StoredCredentials,
}

#[derive(Debug, Deserialize)]
struct StoredCredentials {
    consumer_key: String,
    access_token: String,
    access_secret: String,
}

impl Credentials {
    /// Builds the `Authorization` header value for one request.
    ///
    /// `timestamp` and `nonce` are parameters so the header is reproducible
    /// in tests; callers normally use [`Credentials::authorization`].
    #[must_use]
    pub fn authorization_with(&self, timestamp: i64, nonce: &str) -> String {
        // PLAINTEXT signature: escaped consumer secret (always empty) & escaped token secret.
        let signature = format!("&{}", oauth_escape(self.access_secret.expose_secret()));
        format!(
            "OAuth realm=\"{OAUTH_REALM}\", \
             oauth_consumer_key=\"{}\", \
             oauth_token=\"{}\", \
             oauth_signature_method=\"PLAINTEXT\", \
             oauth_signature=\"{}\", \
             oauth_timestamp=\"{timestamp}\", \
             oauth_nonce=\"{nonce}\", \
             oauth_version=\"1.0\"",
            oauth_escape(&self.consumer_key),
            oauth_escape(&self.access_token),
            oauth_escape(&signature),
        )
    }

    /// Builds a fresh `Authorization` header value.
    #[must_use]
    pub fn authorization(&self) -> String {
        let nonce = fastrand::u64(..).to_string();
        self.authorization_with(chrono::Utc::now().timestamp(), &nonce)
    }

    /// Reads credentials from a launchpadlib-format file.
    ///
    /// Returns `Ok(None)` when the file does not exist.
    #[instrument]
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            debug!("No credential file found");
            return Ok(None);
        }

        let file: CredentialFile = Config::builder()
            .add_source(File::from(path).format(FileFormat::Ini))
            .build()
            .and_then(Config::try_deserialize)
            .map_err(|e| TriageError::Credentials {
                message: format!("{}: {e}", path.display()),
            })?;

        debug!("Loaded credentials from file");
        Ok(Some(Self {
            consumer_key: file.entry.consumer_key,
            access_token: file.entry.access_token,
            access_secret: SecretString::from(file.entry.access_secret),
        }))
    }

    /// Writes credentials to `path`, readable only by the owner on Unix.
    #[instrument(skip(self))]
    pub fn save(&self, path: &Path) -> Result<()> {
        let io_err = |e: std::io::Error| TriageError::Credentials {
            message: format!("{}: {e}", path.display()),
        };

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let contents = format!(
            "[1]\nconsumer_key = {}\nconsumer_secret = \naccess_token = {}\naccess_secret = {}\n\n",
            self.consumer_key,
            self.access_token,
            self.access_secret.expose_secret()
        );
        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(path).map_err(io_err)?;

        // `mode` only applies on creation; tighten a pre-existing file too.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600)).map_err(io_err)?;
        }
        file.write_all(contents.as_bytes()).map_err(io_err)?;

        info!("Credentials stored");
        Ok(())
    }

    /// Deletes the credential file. Returns `false` if there was none.
    #[instrument]
    pub fn delete(path: &Path) -> Result<bool> {
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(path).map_err(|e| TriageError::Credentials {
            message: format!("{}: {e}", path.display()),
        })?;
        info!("Credentials deleted");
        Ok(true)
    }
}

/// A temporary token awaiting user authorization.
#[derive(Debug, Clone)]
pub struct RequestToken {
    /// Token value, shown in the authorize URL.
    pub token: String,
    /// Token secret, needed for the exchange.
    pub secret: SecretString,
}

/// Client for the browser-based token dance.
#[derive(Debug)]
pub struct TokenDance {
    http: Client,
    web_root: String,
    consumer_key: String,
}

impl TokenDance {
    /// Creates a client against `web_root` (e.g. `https://launchpad.net/`).
    #[must_use]
    pub fn new(http: Client, web_root: &str, consumer_key: &str) -> Self {
        Self {
            http,
            web_root: ensure_trailing_slash(web_root),
            consumer_key: consumer_key.to_string(),
        }
    }

    /// Creates a client from the `[launchpad]` settings.
    pub fn from_config(config: &LaunchpadConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self::new(http, &config.web_root, &config.consumer_key))
    }

    /// Requests a temporary token.
    #[instrument(skip(self))]
    pub async fn request_token(&self) -> Result<RequestToken> {
        let form = [
            ("oauth_consumer_key", self.consumer_key.as_str()),
            ("oauth_signature_method", "PLAINTEXT"),
            ("oauth_signature", "&"),
        ];
        let body = self.post_form("+request-token", &form).await?;
        let (token, secret) = parse_token_response(&body)?;
        debug!("Obtained request token");
        Ok(RequestToken {
            token,
            secret: SecretString::from(secret),
        })
    }

    /// URL the user visits to authorize `request`.
    #[must_use]
    pub fn authorize_url(&self, request: &RequestToken) -> String {
        format!(
            "{}+authorize-token?oauth_token={}",
            self.web_root,
            oauth_escape(&request.token)
        )
    }

    /// Exchanges an authorized request token for access credentials.
    #[instrument(skip_all)]
    pub async fn exchange(&self, request: &RequestToken) -> Result<Credentials> {
        let signature = format!("&{}", request.secret.expose_secret());
        let form = [
            ("oauth_token", request.token.as_str()),
            ("oauth_consumer_key", self.consumer_key.as_str()),
            ("oauth_signature_method", "PLAINTEXT"),
            ("oauth_signature", signature.as_str()),
        ];
        let body = self.post_form("+access-token", &form).await?;
        let (token, secret) = parse_token_response(&body)?;
        info!("Obtained access token");
        Ok(Credentials {
            consumer_key: self.consumer_key.clone(),
            access_token: token,
            access_secret: SecretString::from(secret),
        })
    }

    async fn post_form(&self, endpoint: &str, form: &[(&str, &str)]) -> Result<String> {
        let url = format!("{}{endpoint}", self.web_root);
        let response = self.http.post(&url).form(form).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(TriageError::Launchpad {
                message: format!("POST {url} failed: {}", body.trim()),
                status: Some(status.as_u16()),
            });
        }
        Ok(body)
    }
}

/// Parses `oauth_token=..&oauth_token_secret=..` form bodies.
fn parse_token_response(body: &str) -> Result<(String, String)> {
    let mut token = None;
    let mut secret = None;
    for pair in body.trim().split('&') {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        let value = percent_decode_str(value).decode_utf8_lossy().into_owned();
        match key {
            "oauth_token" => token = Some(value),
            "oauth_token_secret" => secret = Some(value),
            _ => {}
        }
    }
    match (token, secret) {
        (Some(token), Some(secret)) => Ok((token, secret)),
        _ => Err(TriageError::Launchpad {
            message: format!("Unexpected token response: {}", body.trim()),
            status: None,
        }),
    }
}

pub(crate) fn ensure_trailing_slash(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{url}/")
    }
}
