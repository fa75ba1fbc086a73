use super::Dispatch;
use crate::client::Result;
use crate::models::flair::{
    ActionResult, Flair, FlairConfigInput, FlairCreateInput, FlairLinkInput,
    FlairListResultContainer, FlairNameListingInput, FlairSelectorResultContainer,
    FlairTemplateInput, FlairTemplateV2Input, FlairType, FlairV2,
};
use log::debug;
use serde_json::Value;

/// Flair endpoints of one subreddit
pub struct FlairApi<'a> {
    dispatch: &'a Dispatch,
    subreddit: &'a str,
}

impl<'a> FlairApi<'a> {
    pub(crate) fn new(dispatch: &'a Dispatch, subreddit: &'a str) -> Self {
        Self {
            dispatch,
            subreddit,
        }
    }

    async fn post(&self, path: &str, form: &[(&str, String)]) -> Result<()> {
        let _: Value = self.dispatch.post_form(self.subreddit, path, form).await?;
        Ok(())
    }

    /// Remove every template of one flair type.
    pub async fn clear_flair_templates(&self, flair_type: FlairType) -> Result<()> {
        debug!(
            "Clearing {} templates in r/{}",
            flair_type.as_str(),
            self.subreddit
        );
        self.post(
            "api/clearflairtemplates",
            &[
                ("api_type", "json".to_string()),
                ("flair_type", flair_type.as_str().to_string()),
            ],
        )
        .await
    }

    pub async fn delete_flair(&self, username: &str) -> Result<()> {
        self.post(
            "api/deleteflair",
            &[
                ("api_type", "json".to_string()),
                ("name", username.to_string()),
            ],
        )
        .await
    }

    pub async fn delete_flair_template(&self, flair_template_id: &str) -> Result<()> {
        self.post(
            "api/deleteflairtemplate",
            &[
                ("api_type", "json".to_string()),
                ("flair_template_id", flair_template_id.to_string()),
            ],
        )
        .await
    }

    pub async fn create(&self, input: &FlairCreateInput) -> Result<()> {
        self.post("api/flair", &input.to_form()).await
    }

    pub async fn flair_config(&self, input: &FlairConfigInput) -> Result<()> {
        self.post("api/flairconfig", &input.to_form()).await
    }

    /// Bulk-assign flair; Reddit ignores lines past the 100th.
    pub async fn flair_csv(&self, flair_csv: &str) -> Result<Vec<ActionResult>> {
        self.dispatch
            .post_form(
                self.subreddit,
                "api/flaircsv",
                &[("flair_csv", flair_csv.to_string())],
            )
            .await
    }

    pub async fn flair_list(
        &self,
        input: &FlairNameListingInput,
    ) -> Result<FlairListResultContainer> {
        self.dispatch
            .get(self.subreddit, "api/flairlist", &input.to_query())
            .await
    }

    pub async fn flair_selector(
        &self,
        input: &FlairLinkInput,
    ) -> Result<FlairSelectorResultContainer> {
        self.dispatch
            .post_form(self.subreddit, "api/flairselector", &input.to_form())
            .await
    }

    pub async fn flair_template(&self, input: &FlairTemplateInput) -> Result<()> {
        self.post("api/flairtemplate", &input.to_form()).await
    }

    pub async fn flair_template_v2(&self, input: &FlairTemplateV2Input) -> Result<FlairV2> {
        self.dispatch
            .post_form(self.subreddit, "api/flairtemplate_v2", &input.to_form())
            .await
    }

    pub async fn set_flair_enabled(&self, flair_enabled: bool) -> Result<()> {
        self.post(
            "api/setflairenabled",
            &[
                ("api_type", "json".to_string()),
                ("flair_enabled", flair_enabled.to_string()),
            ],
        )
        .await
    }

    pub async fn link_flair(&self) -> Result<Vec<Flair>> {
        self.dispatch
            .get(self.subreddit, "api/link_flair", &[])
            .await
    }

    pub async fn link_flair_v2(&self) -> Result<Vec<FlairV2>> {
        self.dispatch
            .get(self.subreddit, "api/link_flair_v2", &[])
            .await
    }

    pub async fn user_flair(&self) -> Result<Vec<Flair>> {
        self.dispatch
            .get(self.subreddit, "api/user_flair", &[])
            .await
    }

    pub async fn user_flair_v2(&self) -> Result<Vec<FlairV2>> {
        self.dispatch
            .get(self.subreddit, "api/user_flair_v2", &[])
            .await
    }
}
