//! Per-subreddit controllers: one method per endpoint, caches for list reads.

pub mod blocking;
pub mod cache;
pub mod flairs;
pub mod widgets;

pub use blocking::{BlockingFlairs, BlockingWidgets};
pub use flairs::Flairs;
pub use widgets::Widgets;

use crate::client::{RedditClient, Result};
use crate::config::AppConfig;
use crate::dispatch::Dispatch;

/// Entry point handing out controllers that share one authenticated client
#[derive(Clone)]
pub struct RedditApi {
    dispatch: Dispatch,
}

impl RedditApi {
    pub fn new(client: RedditClient) -> Self {
        Self {
            dispatch: Dispatch::new(client),
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Ok(Self::new(config.create_client()?))
    }

    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    pub fn flairs(&self, subreddit: &str) -> Flairs {
        Flairs::new(self.dispatch.clone(), subreddit)
    }

    pub fn widgets(&self, subreddit: &str) -> Widgets {
        Widgets::new(self.dispatch.clone(), subreddit)
    }

    pub fn blocking_flairs(&self, subreddit: &str) -> Result<BlockingFlairs> {
        BlockingFlairs::new(self.flairs(subreddit))
    }

    pub fn blocking_widgets(&self, subreddit: &str) -> Result<BlockingWidgets> {
        BlockingWidgets::new(self.widgets(subreddit))
    }
}
