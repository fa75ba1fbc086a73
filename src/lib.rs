//! Rust wrapper for Reddit's subreddit moderation APIs.
//!
//! Controllers ([`controllers::Flairs`], [`controllers::Widgets`]) expose one
//! method per endpoint of a subreddit. They share a [`dispatch::Dispatch`],
//! which attaches the OAuth bearer token, checks Reddit's error envelopes and
//! maps JSON into the types in [`models`].
//!
//! ```no_run
//! # async fn run() -> redmod::client::Result<()> {
//! use redmod::config::AppConfig;
//! use redmod::controllers::RedditApi;
//!
//! let api = RedditApi::from_config(&AppConfig::load())?;
//! let mut flairs = api.flairs("mysubreddit");
//! for flair in flairs.link_flair_v2().await? {
//!     println!("{} {}", flair.id, flair.text);
//! }
//! # Ok(()) }
//! ```

pub mod cli;
pub mod client;
pub mod config;
pub mod controllers;
pub mod dispatch;
pub mod models;
pub mod operations;
