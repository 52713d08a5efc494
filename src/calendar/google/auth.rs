//! OAuth2 installed-app credentials for the Google Calendar source.
//!
//! The client secrets come from a `credentials.json` downloaded from the Google
//! Cloud console. The obtained token is cached in `token.json` and refreshed
//! when it expires. Without a cached token the user is walked through the
//! consent screen once.

use crate::error::{AuthError, AuthResult};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

/// Read-only calendar scope.
pub const CALENDAR_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/calendar.readonly";

const DEFAULT_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const DEFAULT_REDIRECT_URI: &str = "http://localhost";

/// Tokens this close to expiry are treated as expired.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// Where the credentials and the token cache live.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub credentials_path: PathBuf,
    pub token_path: PathBuf,
}

/// Client secrets from the `installed` (or `web`) block of credentials.json.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientSecrets {
    pub client_id: String,
    pub client_secret: String,

    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,

    #[serde(default = "default_token_uri")]
    pub token_uri: String,

    #[serde(default)]
    pub redirect_uris: Vec<String>,
}

fn default_auth_uri() -> String {
    DEFAULT_AUTH_URI.to_string()
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ClientSecrets {
    fn redirect_uri(&self) -> &str {
        self.redirect_uris
            .first()
            .map(String::as_str)
            .unwrap_or(DEFAULT_REDIRECT_URI)
    }

    /// URL of the consent screen the user has to visit.
    pub fn consent_url(&self) -> String {
        format!(
            "{}?access_type=offline&client_id={}&redirect_uri={}&response_type=code&scope={}&state=state-token",
            self.auth_uri,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(self.redirect_uri()),
            urlencoding::encode(CALENDAR_READONLY_SCOPE),
        )
    }
}

#[derive(Debug, Deserialize)]
struct CredentialsFile {
    installed: Option<ClientSecrets>,
    web: Option<ClientSecrets>,
}

/// A cached OAuth token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,

    #[serde(default = "default_token_type")]
    pub token_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl Token {
    /// Whether the token is expired (or about to) at `now`. Tokens without
    /// an expiry never expire.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiry
            .map(|expiry| expiry - Duration::seconds(EXPIRY_MARGIN_SECS) <= now)
            .unwrap_or(false)
    }
}

/// Token endpoint response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,

    #[serde(default)]
    token_type: Option<String>,

    #[serde(default)]
    refresh_token: Option<String>,

    #[serde(default)]
    expires_in: Option<i64>,
}

impl TokenResponse {
    fn into_token(self, now: DateTime<Utc>, previous_refresh: Option<String>) -> Token {
        Token {
            access_token: self.access_token,
            token_type: self.token_type.unwrap_or_else(default_token_type),
            refresh_token: self.refresh_token.or(previous_refresh),
            expiry: self.expires_in.map(|secs| now + Duration::seconds(secs)),
        }
    }
}

/// Load client secrets from a credentials.json file.
pub fn load_credentials(path: &Path) -> AuthResult<ClientSecrets> {
    let raw = fs::read_to_string(path).map_err(AuthError::ReadCredentials)?;
    parse_credentials(&raw)
}

fn parse_credentials(raw: &str) -> AuthResult<ClientSecrets> {
    let file: CredentialsFile =
        serde_json::from_str(raw).map_err(|e| AuthError::ParseCredentials(e.to_string()))?;

    file.installed.or(file.web).ok_or_else(|| {
        AuthError::ParseCredentials("expected an \"installed\" or \"web\" block".to_string())
    })
}

/// Load a cached token. A missing or unreadable cache yields `None`.
pub fn load_token(path: &Path) -> Option<Token> {
    let raw = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&raw) {
        Ok(token) => Some(token),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable token cache");
            None
        }
    }
}

/// Write the token cache, creating parent directories. The file is only
/// readable by its owner on Unix.
pub fn save_token(path: &Path, token: &Token) -> AuthResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(AuthError::SaveToken)?;
    }

    let json = serde_json::to_string_pretty(token)
        .map_err(|e| AuthError::SaveToken(std::io::Error::other(e)))?;

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path).map_err(AuthError::SaveToken)?;
    file.write_all(json.as_bytes()).map_err(AuthError::SaveToken)?;
    Ok(())
}

fn request_token(
    agent: &ureq::Agent,
    token_uri: &str,
    form: &[(&str, &str)],
) -> AuthResult<TokenResponse> {
    let response = agent.post(token_uri).send_form(form).map_err(|e| match e {
        ureq::Error::Status(code, response) => AuthError::TokenRequest(format!(
            "status {}: {}",
            code,
            response.into_string().unwrap_or_default()
        )),
        ureq::Error::Transport(transport) => AuthError::TokenRequest(transport.to_string()),
    })?;

    response
        .into_json::<TokenResponse>()
        .map_err(|e| AuthError::TokenRequest(e.to_string()))
}

/// Exchange a refresh token for a fresh access token.
pub fn refresh_token(
    agent: &ureq::Agent,
    secrets: &ClientSecrets,
    token: &Token,
    now: DateTime<Utc>,
) -> AuthResult<Token> {
    let refresh = token
        .refresh_token
        .as_deref()
        .ok_or_else(|| AuthError::TokenRequest("no refresh token cached".to_string()))?;

    let response = request_token(
        agent,
        &secrets.token_uri,
        &[
            ("grant_type", "refresh_token"),
            ("client_id", secrets.client_id.as_str()),
            ("client_secret", secrets.client_secret.as_str()),
            ("refresh_token", refresh),
        ],
    )?;

    Ok(response.into_token(now, token.refresh_token.clone()))
}

/// Exchange an authorization code from the consent screen for a token.
pub fn exchange_code(
    agent: &ureq::Agent,
    secrets: &ClientSecrets,
    code: &str,
    now: DateTime<Utc>,
) -> AuthResult<Token> {
    let response = request_token(
        agent,
        &secrets.token_uri,
        &[
            ("grant_type", "authorization_code"),
            ("client_id", secrets.client_id.as_str()),
            ("client_secret", secrets.client_secret.as_str()),
            ("redirect_uri", secrets.redirect_uri()),
            ("code", code),
        ],
    )?;

    Ok(response.into_token(now, None))
}

/// Obtain a usable token, prompting on stderr/stdin when none is cached.
pub fn authorize(config: &AuthConfig) -> AuthResult<Token> {
    let agent = ureq::AgentBuilder::new()
        .timeout(std::time::Duration::from_secs(30))
        .build();
    let stdin = std::io::stdin();
    authorize_with(config, &agent, &mut stdin.lock(), Utc::now())
}

/// Like [`authorize`] with an explicit agent, input source and clock.
pub fn authorize_with(
    config: &AuthConfig,
    agent: &ureq::Agent,
    input: &mut dyn BufRead,
    now: DateTime<Utc>,
) -> AuthResult<Token> {
    let secrets = load_credentials(&config.credentials_path)?;

    if let Some(token) = load_token(&config.token_path) {
        if !token.is_expired(now) {
            return Ok(token);
        }

        if token.refresh_token.is_some() {
            tracing::info!("Refreshing expired Google token");
            let refreshed = refresh_token(agent, &secrets, &token, now)?;
            save_token(&config.token_path, &refreshed)?;
            return Ok(refreshed);
        }

        tracing::info!("Cached Google token expired without refresh token");
    }

    eprintln!(
        "gobirth needs access to your Google Calendar.\nOpen this URL in your browser:\n\n{}\n",
        secrets.consent_url()
    );
    eprint!("Paste the authorization code here: ");

    let mut code = String::new();
    input.read_line(&mut code).map_err(AuthError::ReadCode)?;
    let code = code.trim();
    if code.is_empty() {
        return Err(AuthError::ReadCode(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "no authorization code entered",
        )));
    }

    let token = exchange_code(agent, &secrets, code, now)?;
    save_token(&config.token_path, &token)?;
    Ok(token)
}
