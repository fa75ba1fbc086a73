//! Localhost callback server for the interactive browser OAuth flow.

use super::{RedditClientError, Result};
use log::{debug, info};
use rand::{distributions::Alphanumeric, Rng};
use std::collections::HashMap;
use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};
use tiny_http::{Response, Server, StatusCode};
use url::Url;

/// Outcome of a single callback request, sent back to the waiting flow.
pub(crate) type CallbackOutcome = std::result::Result<String, String>;

/// Generate a random state token to prevent CSRF
pub(crate) fn random_state() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect()
}

/// Build the authorization URL the user is sent to.
pub(crate) fn authorization_url(
    auth_base: &str,
    client_id: &str,
    state: &str,
    redirect_uri: &str,
    scopes: &str,
) -> Result<Url> {
    let mut url = Url::parse(&format!("{}/api/v1/authorize", auth_base))
        .map_err(|e| RedditClientError::ConfigError(format!("Invalid auth base URL: {}", e)))?;
    url.query_pairs_mut()
        .append_pair("client_id", client_id)
        .append_pair("response_type", "code")
        .append_pair("state", state)
        .append_pair("redirect_uri", redirect_uri)
        .append_pair("duration", "permanent")
        .append_pair("scope", scopes);
    Ok(url)
}

/// Decide what a callback query means: an authorization code or a failure message.
pub(crate) fn evaluate_callback(
    query: &HashMap<String, String>,
    expected_state: &str,
) -> CallbackOutcome {
    if let Some(error) = query.get("error") {
        return Err(format!("Authorization error: {}", error));
    }

    match query.get("state") {
        Some(received) if received == expected_state => match query.get("code") {
            Some(code) => Ok(code.to_string()),
            None => Err("No authorization code received".to_string()),
        },
        Some(_) => Err("State mismatch - possible CSRF attack".to_string()),
        None => Err("No state parameter received".to_string()),
    }
}

fn html_page(title: &str, body: &str) -> String {
    format!(
        "<html><body><h1>{}</h1><p>{}</p></body></html>",
        title, body
    )
}

/// Running callback listener; call `shutdown` once the flow is done with it.
pub(crate) struct CallbackServer {
    server: Arc<Server>,
    handle: JoinHandle<()>,
}

impl CallbackServer {
    /// Stop listening and wait for the server thread to exit.
    pub(crate) fn shutdown(self) {
        self.server.unblock();
        if self.handle.join().is_err() {
            debug!("Callback server thread panicked");
        }
    }
}

/// Start the local server and return a receiver for the first callback outcome.
pub(crate) fn spawn_callback_server(
    port: u16,
    state: String,
) -> Result<(mpsc::Receiver<CallbackOutcome>, CallbackServer)> {
    let server = Server::http(format!("127.0.0.1:{}", port)).map_err(|e| {
        RedditClientError::ApiError(format!("Failed to start local server: {}", e))
    })?;
    let server = Arc::new(server);
    let listener = Arc::clone(&server);

    let (tx, rx) = mpsc::channel();

    let handle = thread::spawn(move || {
        info!(
            "Waiting for authorization callback on http://localhost:{}/callback",
            port
        );

        for request in listener.incoming_requests() {
            let path = request.url().to_string();

            if !path.starts_with("/callback") {
                let response = Response::from_string(html_page("404 Not Found", ""))
                    .with_status_code(StatusCode(404));
                request.respond(response).ok();
                continue;
            }

            debug!("Received callback: {}", path);

            let query: HashMap<String, String> =
                match Url::parse(&format!("http://localhost{}", path)) {
                    Ok(url) => url
                        .query_pairs()
                        .map(|(k, v)| (k.to_string(), v.to_string()))
                        .collect(),
                    Err(_) => {
                        let response =
                            Response::from_string(html_page("Error", "Invalid callback URL"))
                                .with_status_code(StatusCode(400));
                        request.respond(response).ok();
                        continue;
                    }
                };

            let outcome = evaluate_callback(&query, &state);
            let response = match &outcome {
                Ok(_) => Response::from_string(html_page(
                    "Authentication Successful",
                    "You can now close this window and return to the application.",
                ))
                .with_status_code(StatusCode(200)),
                Err(message) => {
                    Response::from_string(html_page("Authentication Error", message))
                        .with_status_code(StatusCode(400))
                }
            };
            request.respond(response).ok();

            // The receiver may have timed out already; nothing left to do then.
            let _ = tx.send(outcome);
            break;
        }
    });

    Ok((rx, CallbackServer { server, handle }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn matching_state_yields_the_code() {
        let q = query(&[("state", "abc"), ("code", "xyz")]);
        assert_eq!(evaluate_callback(&q, "abc"), Ok("xyz".to_string()));
    }

    #[test]
    fn mismatched_state_is_rejected() {
        let q = query(&[("state", "evil"), ("code", "xyz")]);
        assert_eq!(
            evaluate_callback(&q, "abc"),
            Err("State mismatch - possible CSRF attack".to_string())
        );
    }

    #[test]
    fn reddit_errors_win_over_everything_else() {
        let q = query(&[("error", "access_denied"), ("state", "abc")]);
        assert_eq!(
            evaluate_callback(&q, "abc"),
            Err("Authorization error: access_denied".to_string())
        );
        assert!(evaluate_callback(&query(&[("state", "abc")]), "abc").is_err());
        assert!(evaluate_callback(&query(&[]), "abc").is_err());
    }

    #[test]
    fn authorization_url_encodes_scopes_and_redirect() {
        let url = authorization_url(
            "https://www.reddit.com",
            "my-client",
            "state123",
            "http://localhost:8080/callback",
            "identity modflair",
        )
        .unwrap();
        let pairs: HashMap<String, String> = url
            .query_pairs()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert_eq!(url.path(), "/api/v1/authorize");
        assert_eq!(pairs["scope"], "identity modflair");
        assert_eq!(pairs["redirect_uri"], "http://localhost:8080/callback");
        assert_eq!(pairs["duration"], "permanent");
    }

    #[test]
    fn random_state_is_sixteen_alphanumerics() {
        let state = random_state();
        assert_eq!(state.len(), 16);
        assert!(state.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn shutdown_releases_a_server_that_never_got_a_callback() {
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let (rx, callback_server) = spawn_callback_server(port, random_state()).unwrap();

        callback_server.shutdown();

        // The thread has exited, so its sender is gone.
        assert_eq!(rx.try_recv(), Err(mpsc::TryRecvError::Disconnected));
    }
}
