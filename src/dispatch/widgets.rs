use super::Dispatch;
use crate::client::Result;
use crate::models::widgets::{Widget, WidgetResults, WidgetSection};
use reqwest::Method;
use serde_json::Value;

/// Widget endpoints of one subreddit
pub struct WidgetsApi<'a> {
    dispatch: &'a Dispatch,
    subreddit: &'a str,
}

impl<'a> WidgetsApi<'a> {
    pub(crate) fn new(dispatch: &'a Dispatch, subreddit: &'a str) -> Self {
        Self {
            dispatch,
            subreddit,
        }
    }

    pub async fn add(&self, widget: &Widget) -> Result<Widget> {
        self.dispatch
            .send_json(Method::POST, self.subreddit, "api/widget", widget)
            .await
    }

    pub async fn delete(&self, widget_id: &str) -> Result<()> {
        self.dispatch
            .delete(self.subreddit, &format!("api/widget/{}", widget_id))
            .await
    }

    pub async fn update(&self, widget_id: &str, widget: &Widget) -> Result<Widget> {
        self.dispatch
            .send_json(
                Method::PUT,
                self.subreddit,
                &format!("api/widget/{}", widget_id),
                widget,
            )
            .await
    }

    /// Replace the order of one section; `order` must list every widget in it.
    pub async fn update_order(&self, section: WidgetSection, order: &[String]) -> Result<()> {
        let _: Value = self
            .dispatch
            .send_json(
                Method::PATCH,
                self.subreddit,
                &format!("api/widget_order/{}", section.as_str()),
                order,
            )
            .await?;
        Ok(())
    }

    pub async fn get(&self, progressive_images: bool) -> Result<WidgetResults> {
        self.dispatch
            .get(
                self.subreddit,
                "api/widgets",
                &[("progressive_images", progressive_images.to_string())],
            )
            .await
    }
}
