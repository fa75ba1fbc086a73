//! Local stand-in for the Reddit API used by the integration tests.

#![allow(dead_code)]

use redmod::client::RedditClient;
use redmod::controllers::RedditApi;
use std::io::Read;
use std::sync::{Arc, Mutex};
use std::thread;
use tempfile::TempDir;
use tiny_http::{Header, Response, Server};

/// One request as the server saw it
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    /// Path and query, e.g. `/r/test/api/link_flair_v2?raw_json=1`
    pub url: String,
    pub body: String,
    pub authorization: Option<String>,
}

impl Recorded {
    pub fn path(&self) -> &str {
        self.url.split('?').next().unwrap_or("")
    }

    pub fn query(&self) -> &str {
        self.url.split_once('?').map(|(_, q)| q).unwrap_or("")
    }

    /// Decoded value of a form or query parameter.
    pub fn param(&self, key: &str) -> Option<String> {
        let source = if self.method == "GET" || self.method == "DELETE" {
            self.query()
        } else {
            self.body.as_str()
        };
        url::form_urlencoded::parse(source.as_bytes())
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("request body is JSON")
    }
}

type Responder = dyn Fn(&Recorded) -> (u16, String) + Send + Sync;

pub struct MockReddit {
    pub base: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl MockReddit {
    /// Serve every request with `responder` until the test process exits.
    pub fn start<F>(responder: F) -> Self
    where
        F: Fn(&Recorded) -> (u16, String) + Send + Sync + 'static,
    {
        let server = Server::http("127.0.0.1:0").expect("bind mock server");
        let addr = server
            .server_addr()
            .to_ip()
            .expect("mock server listens on TCP");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&requests);
        let responder: Box<Responder> = Box::new(responder);

        thread::spawn(move || {
            for mut request in server.incoming_requests() {
                let mut body = String::new();
                let _ = request.as_reader().read_to_string(&mut body);
                let authorization = request
                    .headers()
                    .iter()
                    .find(|h| h.field.equiv("Authorization"))
                    .map(|h| h.value.as_str().to_string());

                let recorded = Recorded {
                    method: request.method().to_string(),
                    url: request.url().to_string(),
                    body,
                    authorization,
                };
                let (status, reply) = responder(&recorded);
                log.lock().unwrap().push(recorded);

                let content_type =
                    Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap();
                let response = Response::from_string(reply)
                    .with_status_code(status)
                    .with_header(content_type);
                let _ = request.respond(response);
            }
        });

        Self {
            base: format!("http://{}", addr),
            requests,
        }
    }

    /// Answer every request with `200` and the same body.
    pub fn always(body: &str) -> Self {
        let body = body.to_string();
        Self::start(move |_| (200, body.clone()))
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// A client that talks only to this server, with a fixed bearer token.
    pub fn client(&self, token_dir: &TempDir) -> RedditClient {
        RedditClient::new()
            .unwrap()
            .with_api_base(&self.base)
            .with_auth_base(&self.base)
            .with_token_dir(token_dir.path().to_path_buf())
            .with_access_token("test-token")
    }

    pub fn api(&self, token_dir: &TempDir) -> RedditApi {
        RedditApi::new(self.client(token_dir))
    }
}
