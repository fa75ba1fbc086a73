use super::cache::Cached;
use crate::client::Result;
use crate::dispatch::{Dispatch, WidgetsApi};
use crate::models::widgets::{Widget, WidgetResults, WidgetSection};
use chrono::Utc;
use log::debug;

/// Controller for the sidebar and topbar widgets of one subreddit
pub struct Widgets {
    dispatch: Dispatch,
    subreddit: String,
    widgets: Cached<WidgetResults>,
}

impl Widgets {
    pub fn new(dispatch: Dispatch, subreddit: &str) -> Self {
        Self {
            dispatch,
            subreddit: subreddit.to_string(),
            widgets: Cached::new(),
        }
    }

    pub fn subreddit(&self) -> &str {
        &self.subreddit
    }

    fn api(&self) -> WidgetsApi<'_> {
        self.dispatch.widgets(&self.subreddit)
    }

    /// All widgets and their layout, served from cache for up to an hour.
    pub async fn widgets(&mut self) -> Result<WidgetResults> {
        if let Some(results) = self.widgets.fresh(Utc::now()) {
            return Ok(results.clone());
        }
        self.get(false).await
    }

    pub fn set_widgets(&mut self, results: WidgetResults) {
        self.widgets.store(results, Utc::now());
    }

    /// Fetch all widgets and their layout, refreshing the cache.
    pub async fn get(&mut self, progressive_images: bool) -> Result<WidgetResults> {
        let results = self.api().get(progressive_images).await?;
        debug!(
            "r/{} has {} widgets ({} in the sidebar)",
            self.subreddit,
            results.items.len(),
            results.layout.sidebar.order.len()
        );
        self.widgets.store(results.clone(), Utc::now());
        Ok(results)
    }

    /// Create a widget; the returned copy carries the new id.
    pub async fn add<W: Into<Widget>>(&mut self, widget: W) -> Result<Widget> {
        let created = self.api().add(&widget.into()).await?;
        self.widgets.invalidate();
        Ok(created)
    }

    /// Replace the widget `widget_id` with `widget`.
    pub async fn update<W: Into<Widget>>(&mut self, widget_id: &str, widget: W) -> Result<Widget> {
        let updated = self.api().update(widget_id, &widget.into()).await?;
        self.widgets.invalidate();
        Ok(updated)
    }

    /// Reorder a section. `order` must contain every widget id of that section.
    pub async fn update_order(&mut self, section: WidgetSection, order: &[String]) -> Result<()> {
        self.api().update_order(section, order).await?;
        self.widgets.invalidate();
        Ok(())
    }

    pub async fn delete(&mut self, widget_id: &str) -> Result<()> {
        self.api().delete(widget_id).await?;
        self.widgets.invalidate();
        Ok(())
    }
}
