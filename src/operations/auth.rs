use crate::client::{RedditClientError, Result, TokenStorage};
use crate::config::AppConfig;
use crate::controllers::RedditApi;
use log::{debug, info};

/// Configuration options for the interactive browser login
#[derive(Debug, Clone)]
pub struct LoginOptions {
    /// Client ID of an "installed app" registered with Reddit
    pub client_id: String,
    /// Local port for the OAuth callback
    pub port: Option<u16>,
}

/// Result of a login operation
#[derive(Debug)]
pub struct LoginResult {
    /// Whether a token was obtained
    pub success: bool,
    /// Formatted message for CLI output
    pub message: String,
}

/// Operation that obtains and stores tokens through the browser OAuth flow
pub struct LoginOperation {
    options: LoginOptions,
    api: RedditApi,
}

impl LoginOperation {
    pub fn new(options: LoginOptions, api: RedditApi) -> Self {
        Self { options, api }
    }

    pub async fn execute(&mut self) -> Result<LoginResult> {
        let mut client = self.api.dispatch().client().await;
        match client
            .authenticate_with_stored_or_browser(&self.options.client_id, self.options.port, None)
            .await
        {
            Ok(_) => {
                let message = format!(
                    "Logged in. Tokens stored in {}",
                    client.token_path(&self.options.client_id).display()
                );
                info!("{}", message);
                Ok(LoginResult {
                    success: true,
                    message,
                })
            }
            Err(err) => {
                let message = format!("Browser authentication failed: {}", err);
                debug!("{}", message);
                Ok(LoginResult {
                    success: false,
                    message,
                })
            }
        }
    }
}

/// Make sure the shared client can produce a bearer token.
///
/// Stored or configured tokens win; otherwise the script-app password grant
/// is used when its four credentials are configured.
pub async fn ensure_authenticated(api: &RedditApi, config: &AppConfig) -> Result<()> {
    let mut client = api.dispatch().client().await;

    let has_refresh = client
        .token_storage
        .as_ref()
        .map_or(false, TokenStorage::has_refresh_token);
    if client.access_token.is_some() || has_refresh {
        debug!("Using stored credentials");
        return Ok(());
    }

    if config.has_script_credentials() {
        info!("Authenticating with script app credentials");
        client
            .authenticate_with_api_credentials(
                &config.require_client_id()?,
                &config.require_client_secret()?,
                &config.require_username()?,
                &config.require_password()?,
            )
            .await?;
        return Ok(());
    }

    Err(RedditClientError::ConfigError(
        "No credentials found. Set REDDIT_CLIENT_ID, REDDIT_CLIENT_SECRET, REDDIT_USERNAME and \
         REDDIT_PASSWORD, or run `redmod login` first."
            .to_string(),
    ))
}

/// CLI handler function for the login command
pub async fn handle_login_command(api: RedditApi, config: &AppConfig, port: Option<u16>) -> Result<()> {
    let options = LoginOptions {
        client_id: config.require_client_id()?,
        port: port.or(config.oauth_port),
    };

    let result = LoginOperation::new(options, api).execute().await?;
    if result.success {
        println!("{}", result.message);
        Ok(())
    } else {
        Err(RedditClientError::ApiError(result.message))
    }
}
