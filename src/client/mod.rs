pub(crate) mod browser;
mod error;

pub use error::{RedditClientError, Result};

use crate::config::AppConfig;
use log::{debug, info};
use reqwest::Client;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::PathBuf;
use std::sync::mpsc::RecvTimeoutError;
use std::time::Duration;

/// Base URL for authenticated API calls.
pub const DEFAULT_API_BASE: &str = "https://oauth.reddit.com";
/// Base URL for the OAuth endpoints.
pub const DEFAULT_AUTH_BASE: &str = "https://www.reddit.com";
/// Scopes needed by the flair and widget controllers.
pub const DEFAULT_SCOPES: &str = "identity read flair modflair structuredstyles";

const DEFAULT_USER_AGENT: &str = "redmod/0.1 (subreddit moderation tooling)";
const AUTH_TIMEOUT: Duration = Duration::from_secs(300);

/// Structure to store OAuth tokens and credentials
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TokenStorage {
    pub client_id: String,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub token_expires_at: Option<u64>,
    pub last_updated: u64,
}

impl TokenStorage {
    pub fn new(client_id: &str) -> Self {
        Self {
            client_id: client_id.to_string(),
            access_token: None,
            refresh_token: None,
            token_expires_at: None,
            last_updated: now_secs(),
        }
    }

    pub fn is_access_token_valid(&self) -> bool {
        self.is_access_token_valid_at(now_secs())
    }

    /// Valid while more than five minutes remain before expiry.
    pub fn is_access_token_valid_at(&self, now: u64) -> bool {
        match (self.access_token.as_ref(), self.token_expires_at) {
            (Some(_), Some(expiry)) => now + 300 < expiry,
            _ => false,
        }
    }

    pub fn has_refresh_token(&self) -> bool {
        self.refresh_token.is_some()
    }
}

fn now_secs() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}

/// Authenticated transport for the Reddit API.
#[derive(Clone)]
pub struct RedditClient {
    pub client: Client,
    pub access_token: Option<String>,
    pub user_agent: String,
    pub token_storage: Option<TokenStorage>,
    pub api_base: String,
    pub auth_base: String,
    client_secret: Option<String>,
    token_dir: Option<PathBuf>,
}

impl RedditClient {
    pub fn new() -> Result<Self> {
        Self::with_user_agent(DEFAULT_USER_AGENT.to_string())
    }

    pub fn with_user_agent(user_agent: String) -> Result<Self> {
        Ok(Self {
            client: Self::get_client(&user_agent)?,
            access_token: None,
            user_agent,
            token_storage: None,
            api_base: DEFAULT_API_BASE.to_string(),
            auth_base: DEFAULT_AUTH_BASE.to_string(),
            client_secret: None,
            token_dir: None,
        })
    }

    /// Point API calls at another host (a proxy or a local test server).
    pub fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_string();
        self
    }

    /// Point OAuth token requests at another host.
    pub fn with_auth_base(mut self, auth_base: &str) -> Self {
        self.auth_base = auth_base.trim_end_matches('/').to_string();
        self
    }

    /// Store tokens under `dir` instead of `~/.redmod`.
    pub fn with_token_dir(mut self, dir: PathBuf) -> Self {
        self.token_dir = Some(dir);
        self
    }

    /// Secret sent with refresh and code-exchange grants. Installed apps have none.
    pub fn with_client_secret(mut self, secret: &str) -> Self {
        self.client_secret = Some(secret.to_string());
        self
    }

    /// Use an access token obtained elsewhere.
    pub fn with_access_token(mut self, token: &str) -> Self {
        self.access_token = Some(token.to_string());
        self
    }

    /// Create a client from a configuration object
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let user_agent = if config.user_agent.is_empty() {
            DEFAULT_USER_AGENT.to_string()
        } else {
            config.user_agent.clone()
        };
        debug!("Creating RedditClient with user_agent: {}", user_agent);

        let mut client = Self::with_user_agent(user_agent)?
            .with_api_base(&config.api_base)
            .with_auth_base(&config.auth_base);
        if let Some(dir) = &config.token_dir {
            client = client.with_token_dir(dir.clone());
        }
        if let Some(secret) = &config.client_secret {
            client = client.with_client_secret(secret);
        }

        if let Some(client_id) = &config.client_id {
            let mut storage = match client.load_token_storage(client_id) {
                Some(storage) => {
                    if storage.is_access_token_valid() {
                        client.access_token = storage.access_token.clone();
                    }
                    storage
                }
                None => TokenStorage::new(client_id),
            };

            // A refresh token from the environment takes precedence over a stored one
            if let Some(refresh) = &config.refresh_token {
                storage.refresh_token = Some(refresh.clone());
            }
            client.token_storage = Some(storage);
        }

        if let Some(token) = &config.access_token {
            client.access_token = Some(token.clone());
            // Track the expiry so bearer_token() can refresh it later
            if let Some(storage) = client.token_storage.as_mut() {
                let now = now_secs();
                storage.access_token = Some(token.clone());
                storage.token_expires_at = Some(now + config.token_expires_in);
                storage.last_updated = now;
            }
        }

        Ok(client)
    }

    /// Set token values manually (useful for headless environments)
    pub fn set_tokens(
        &mut self,
        client_id: &str,
        access_token: &str,
        refresh_token: Option<&str>,
        expires_in: u64,
    ) -> Result<()> {
        let now = now_secs();

        let storage = self
            .token_storage
            .get_or_insert_with(|| TokenStorage::new(client_id));
        storage.client_id = client_id.to_string();
        storage.access_token = Some(access_token.to_string());
        storage.token_expires_at = Some(now + expires_in);
        storage.last_updated = now;
        if let Some(refresh) = refresh_token {
            storage.refresh_token = Some(refresh.to_string());
        }

        self.save_token_storage()?;
        self.access_token = Some(access_token.to_string());

        Ok(())
    }

    fn get_token_dir(&self) -> PathBuf {
        match &self.token_dir {
            Some(dir) => dir.clone(),
            None => {
                let mut dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
                dir.push(".redmod");
                dir
            }
        }
    }

    /// Get the path to the token file for a client ID
    pub fn token_path(&self, client_id: &str) -> PathBuf {
        let mut path = self.get_token_dir();
        path.push(format!("{}.json", client_id));
        path
    }

    /// Load token storage from the filesystem
    pub fn load_token_storage(&self, client_id: &str) -> Option<TokenStorage> {
        let token_path = self.token_path(client_id);

        let mut file = File::open(&token_path).ok()?;
        let mut contents = String::new();
        file.read_to_string(&mut contents).ok()?;

        match serde_json::from_str::<TokenStorage>(&contents) {
            Ok(storage) => Some(storage),
            Err(e) => {
                debug!("Failed to parse token storage: {}", e);
                None
            }
        }
    }

    /// Save token storage to the filesystem
    fn save_token_storage(&self) -> Result<()> {
        if let Some(storage) = &self.token_storage {
            fs::create_dir_all(self.get_token_dir())?;
            let token_path = self.token_path(&storage.client_id);

            let json = serde_json::to_string_pretty(storage)?;
            let mut file = File::create(&token_path)?;
            file.write_all(json.as_bytes())?;

            debug!("Saved token storage to {}", token_path.display());
        }

        Ok(())
    }

    fn get_client(user_agent: &str) -> Result<Client> {
        Ok(Client::builder().user_agent(user_agent).build()?)
    }

    /// POST a grant to the token endpoint and return the checked JSON body.
    async fn request_token(
        &self,
        client_id: &str,
        client_secret: &str,
        params: &[(&str, &str)],
        context: &str,
    ) -> Result<serde_json::Value> {
        let auth = base64::encode(format!("{}:{}", client_id, client_secret));

        let res = self
            .client
            .post(format!("{}/api/v1/access_token", self.auth_base))
            .header("Authorization", format!("Basic {}", auth))
            .form(params)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await?;
            return Err(RedditClientError::ApiError(format!(
                "{} failed: HTTP {}: {}",
                context, status, body
            )));
        }

        let json: serde_json::Value = res.json().await?;

        if let Some(error) = json["error"].as_str() {
            return Err(RedditClientError::ApiError(format!(
                "{} failed: {}",
                context, error
            )));
        }

        Ok(json)
    }

    /// Record a token grant in memory and, when `persist` is set, on disk.
    fn store_grant(
        &mut self,
        client_id: &str,
        json: &serde_json::Value,
        persist: bool,
    ) -> Result<String> {
        let token = json["access_token"]
            .as_str()
            .ok_or_else(|| {
                RedditClientError::ApiError(
                    "Failed to extract access token from response".to_string(),
                )
            })?
            .to_string();

        let now = now_secs();
        let expires_in = json["expires_in"].as_u64().unwrap_or(3600);

        let storage = self
            .token_storage
            .get_or_insert_with(|| TokenStorage::new(client_id));
        storage.client_id = client_id.to_string();
        storage.access_token = Some(token.clone());
        storage.token_expires_at = Some(now + expires_in);
        storage.last_updated = now;
        if let Some(refresh_token) = json["refresh_token"].as_str() {
            storage.refresh_token = Some(refresh_token.to_string());
            debug!("Received and stored refresh token");
        }

        if persist {
            self.save_token_storage()?;
        }

        self.access_token = Some(token.clone());
        Ok(token)
    }

    /// Get an application-only access token for reading public data.
    ///
    /// Moderation endpoints reject this token; it is only useful for the
    /// read-only widget listing of public subreddits.
    pub async fn get_access_token(&mut self, client_id: &str) -> Result<String> {
        let params = [
            (
                "grant_type",
                "https://oauth.reddit.com/grants/installed_client",
            ),
            ("device_id", "DO_NOT_TRACK_THIS_DEVICE"),
        ];

        let json = self
            .request_token(client_id, "", &params, "Application-only authentication")
            .await?;
        let token = self.store_grant(client_id, &json, false)?;
        debug!("Application-only access token successfully obtained");

        Ok(token)
    }

    /// Authenticate with Reddit using API credentials for a script app.
    ///
    /// # Arguments
    /// * `client_id` - Your Reddit API client ID
    /// * `client_secret` - Your Reddit API client secret
    /// * `username` - Your Reddit username (must moderate the target subreddit)
    /// * `password` - Your Reddit password
    pub async fn authenticate_with_api_credentials(
        &mut self,
        client_id: &str,
        client_secret: &str,
        username: &str,
        password: &str,
    ) -> Result<String> {
        let params = [
            ("grant_type", "password"),
            ("username", username),
            ("password", password),
            ("scope", DEFAULT_SCOPES),
        ];

        let json = self
            .request_token(client_id, client_secret, &params, "Authentication")
            .await?;
        let token = self.store_grant(client_id, &json, false)?;
        debug!(
            "API authentication successful, token obtained with scopes: {:?}",
            json["scope"].as_str()
        );

        Ok(token)
    }

    /// Try to refresh the access token using a stored refresh token
    pub async fn refresh_access_token(&mut self) -> Result<String> {
        let (client_id, refresh_token) = match &self.token_storage {
            Some(TokenStorage {
                client_id,
                refresh_token: Some(refresh),
                ..
            }) => (client_id.clone(), refresh.clone()),
            _ => {
                return Err(RedditClientError::ApiError(
                    "No refresh token available".to_string(),
                ))
            }
        };

        debug!("Refreshing access token using refresh token");

        let params = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token.as_str()),
        ];

        let secret = self.client_secret.clone().unwrap_or_default();
        let json = self
            .request_token(&client_id, &secret, &params, "Token refresh")
            .await?;
        let token = self.store_grant(&client_id, &json, true)?;
        debug!("Access token refreshed successfully");

        Ok(token)
    }

    /// Return a usable bearer token, refreshing it first when it has expired.
    pub async fn bearer_token(&mut self) -> Result<String> {
        let stale = match (&self.access_token, &self.token_storage) {
            (Some(token), Some(storage)) => {
                storage.access_token.as_deref() == Some(token.as_str())
                    && !storage.is_access_token_valid()
            }
            _ => false,
        };

        if let Some(token) = &self.access_token {
            if !stale {
                return Ok(token.clone());
            }
            debug!("Access token has expired");
        }

        if self
            .token_storage
            .as_ref()
            .map_or(false, TokenStorage::has_refresh_token)
        {
            return self.refresh_access_token().await;
        }

        Err(RedditClientError::ApiError(
            "No access token available. Authenticate or provide a refresh token first."
                .to_string(),
        ))
    }

    /// Authenticate with browser OAuth, but first try to use a stored refresh token
    pub async fn authenticate_with_stored_or_browser(
        &mut self,
        client_id: &str,
        redirect_port: Option<u16>,
        scopes: Option<&str>,
    ) -> Result<String> {
        if self.token_storage.is_none() {
            self.token_storage = Some(
                self.load_token_storage(client_id)
                    .unwrap_or_else(|| TokenStorage::new(client_id)),
            );
        }

        if let Some(storage) = &self.token_storage {
            if storage.is_access_token_valid() {
                if let Some(token) = &storage.access_token {
                    debug!("Using existing valid access token");
                    self.access_token = Some(token.clone());
                    return Ok(token.clone());
                }
            }

            if storage.has_refresh_token() {
                debug!("Trying to refresh access token");
                match self.refresh_access_token().await {
                    Ok(token) => return Ok(token),
                    Err(e) => debug!("Failed to refresh token: {}, will try browser auth", e),
                }
            }
        }

        debug!("Proceeding with browser authentication");
        self.authenticate_with_browser_oauth(client_id, redirect_port, scopes)
            .await
    }

    /// Authenticate with Reddit using the interactive browser OAuth flow.
    ///
    /// # How this works:
    /// 1. Starts a local web server on localhost to receive the OAuth callback
    /// 2. Opens a browser for the user to log in and authorize the app
    /// 3. Reddit redirects back to localhost with an authorization code
    /// 4. Exchanges this code for an access token and stores it
    pub async fn authenticate_with_browser_oauth(
        &mut self,
        client_id: &str,
        redirect_port: Option<u16>,
        scopes: Option<&str>,
    ) -> Result<String> {
        let port = redirect_port.unwrap_or(8080);
        let scopes = scopes.unwrap_or(DEFAULT_SCOPES);
        let redirect_uri = format!("http://localhost:{}/callback", port);

        let state = browser::random_state();
        let auth_url =
            browser::authorization_url(&self.auth_base, client_id, &state, &redirect_uri, scopes)?;

        let (rx, callback_server) = browser::spawn_callback_server(port, state)?;

        info!("Opening browser for Reddit OAuth authorization...");
        if let Err(e) = webbrowser::open(auth_url.as_str()) {
            info!("Failed to open browser: {}", e);
        }
        info!("If your browser doesn't open automatically, please visit this URL:");
        info!("{}", auth_url);

        let auth_result = tokio::task::spawn_blocking(move || rx.recv_timeout(AUTH_TIMEOUT)).await;
        callback_server.shutdown();
        let auth_result = auth_result
            .map_err(|e| RedditClientError::ApiError(format!("Callback wait failed: {}", e)))?;

        let code = match auth_result {
            Ok(Ok(code)) => code,
            Ok(Err(message)) => return Err(RedditClientError::ApiError(message)),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                return Err(RedditClientError::ApiError(
                    "Timed out waiting for authorization".to_string(),
                ))
            }
        };

        info!("Exchanging authorization code for access token...");
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code.as_str()),
            ("redirect_uri", redirect_uri.as_str()),
        ];

        let secret = self.client_secret.clone().unwrap_or_default();
        let json = self
            .request_token(client_id, &secret, &params, "Token exchange")
            .await?;
        let token = self.store_grant(client_id, &json, true)?;
        debug!("Browser OAuth authentication successful, token obtained");

        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_validity_keeps_a_five_minute_margin() {
        let mut storage = TokenStorage::new("abc");
        assert!(!storage.is_access_token_valid_at(1_000));

        storage.access_token = Some("token".to_string());
        storage.token_expires_at = Some(2_000);
        assert!(storage.is_access_token_valid_at(1_000));
        assert!(!storage.is_access_token_valid_at(1_700));
        assert!(!storage.is_access_token_valid_at(2_500));
    }

    #[test]
    fn set_tokens_persists_to_the_token_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut client = RedditClient::new()
            .unwrap()
            .with_token_dir(dir.path().to_path_buf());

        client
            .set_tokens("my-app", "access", Some("refresh"), 3600)
            .unwrap();

        let loaded = client.load_token_storage("my-app").unwrap();
        assert_eq!(loaded.access_token.as_deref(), Some("access"));
        assert_eq!(loaded.refresh_token.as_deref(), Some("refresh"));
        assert!(loaded.is_access_token_valid());
        assert_eq!(client.access_token.as_deref(), Some("access"));
    }

    #[test]
    fn base_urls_lose_trailing_slashes() {
        let client = RedditClient::new()
            .unwrap()
            .with_api_base("http://127.0.0.1:9000/")
            .with_auth_base("http://127.0.0.1:9001/");
        assert_eq!(client.api_base, "http://127.0.0.1:9000");
        assert_eq!(client.auth_base, "http://127.0.0.1:9001");
    }

    #[tokio::test]
    async fn bearer_token_without_credentials_is_an_error() {
        let mut client = RedditClient::new().unwrap();
        let err = client.bearer_token().await.unwrap_err();
        assert!(matches!(err, RedditClientError::ApiError(_)));
    }

    #[tokio::test]
    async fn direct_access_token_is_used_as_is() {
        let mut client = RedditClient::new().unwrap().with_access_token("direct");
        assert_eq!(client.bearer_token().await.unwrap(), "direct");
    }
}
