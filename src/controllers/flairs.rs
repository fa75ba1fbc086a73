use super::cache::Cached;
use crate::client::Result;
use crate::dispatch::{Dispatch, FlairApi};
use crate::models::flair::{
    entries_to_csv, ActionResult, Flair, FlairConfigInput, FlairCreateInput, FlairLinkInput,
    FlairListResult, FlairListResultContainer, FlairNameListingInput,
    FlairSelectorResultContainer, FlairTemplateChanges, FlairTemplateInput, FlairTemplateV2Input,
    FlairType, FlairV2, NewFlairTemplate,
};
use chrono::Utc;
use log::{debug, info, warn};

/// Reddit applies at most this many lines of one `flaircsv` request.
pub const FLAIR_CSV_BATCH: usize = 100;

/// Controller for the flairs of one subreddit.
///
/// List-valued properties are cached for an hour. Writes that can change a
/// cached list drop that cache so the next read goes back to Reddit.
pub struct Flairs {
    dispatch: Dispatch,
    subreddit: String,
    flair_list: Cached<Vec<FlairListResult>>,
    link_flair: Cached<Vec<Flair>>,
    link_flair_v2: Cached<Vec<FlairV2>>,
    user_flair: Cached<Vec<Flair>>,
    user_flair_v2: Cached<Vec<FlairV2>>,
}

impl Flairs {
    pub fn new(dispatch: Dispatch, subreddit: &str) -> Self {
        Self {
            dispatch,
            subreddit: subreddit.to_string(),
            flair_list: Cached::new(),
            link_flair: Cached::new(),
            link_flair_v2: Cached::new(),
            user_flair: Cached::new(),
            user_flair_v2: Cached::new(),
        }
    }

    pub fn subreddit(&self) -> &str {
        &self.subreddit
    }

    fn api(&self) -> FlairApi<'_> {
        self.dispatch.flair(&self.subreddit)
    }

    fn invalidate_templates(&mut self, flair_type: FlairType) {
        match flair_type {
            FlairType::Link => {
                self.link_flair.invalidate();
                self.link_flair_v2.invalidate();
            }
            FlairType::User => {
                self.user_flair.invalidate();
                self.user_flair_v2.invalidate();
            }
        }
    }

    /// Users' flair, served from cache for up to an hour.
    pub async fn flair_list(&mut self) -> Result<Vec<FlairListResult>> {
        if let Some(list) = self.flair_list.fresh(Utc::now()) {
            return Ok(list.clone());
        }
        self.get_flair_list(&FlairNameListingInput::default()).await
    }

    pub fn set_flair_list(&mut self, list: Vec<FlairListResult>) {
        self.flair_list.store(list, Utc::now());
    }

    /// Link flair templates, served from cache for up to an hour.
    pub async fn link_flair(&mut self) -> Result<Vec<Flair>> {
        if let Some(list) = self.link_flair.fresh(Utc::now()) {
            return Ok(list.clone());
        }
        self.get_link_flair().await
    }

    pub fn set_link_flair(&mut self, list: Vec<Flair>) {
        self.link_flair.store(list, Utc::now());
    }

    /// Redesign link flair templates, served from cache for up to an hour.
    pub async fn link_flair_v2(&mut self) -> Result<Vec<FlairV2>> {
        if let Some(list) = self.link_flair_v2.fresh(Utc::now()) {
            return Ok(list.clone());
        }
        self.get_link_flair_v2().await
    }

    pub fn set_link_flair_v2(&mut self, list: Vec<FlairV2>) {
        self.link_flair_v2.store(list, Utc::now());
    }

    /// User flair templates, served from cache for up to an hour.
    pub async fn user_flair(&mut self) -> Result<Vec<Flair>> {
        if let Some(list) = self.user_flair.fresh(Utc::now()) {
            return Ok(list.clone());
        }
        self.get_user_flair().await
    }

    pub fn set_user_flair(&mut self, list: Vec<Flair>) {
        self.user_flair.store(list, Utc::now());
    }

    /// Redesign user flair templates, served from cache for up to an hour.
    pub async fn user_flair_v2(&mut self) -> Result<Vec<FlairV2>> {
        if let Some(list) = self.user_flair_v2.fresh(Utc::now()) {
            return Ok(list.clone());
        }
        self.get_user_flair_v2().await
    }

    pub fn set_user_flair_v2(&mut self, list: Vec<FlairV2>) {
        self.user_flair_v2.store(list, Utc::now());
    }

    pub async fn clear_link_flair_templates(&mut self) -> Result<()> {
        self.api().clear_flair_templates(FlairType::Link).await?;
        self.invalidate_templates(FlairType::Link);
        Ok(())
    }

    pub async fn clear_user_flair_templates(&mut self) -> Result<()> {
        self.api().clear_flair_templates(FlairType::User).await?;
        self.invalidate_templates(FlairType::User);
        Ok(())
    }

    /// Remove the flair of `username`.
    pub async fn delete_flair(&mut self, username: &str) -> Result<()> {
        self.api().delete_flair(username).await?;
        self.flair_list.invalidate();
        Ok(())
    }

    /// Delete a template by id, e.g. `0778d5ec-db43-11e8-9258-0e3a02270976`.
    pub async fn delete_flair_template(&mut self, flair_template_id: &str) -> Result<()> {
        self.api().delete_flair_template(flair_template_id).await?;
        // The id alone does not say which kind of template it was
        self.invalidate_templates(FlairType::Link);
        self.invalidate_templates(FlairType::User);
        Ok(())
    }

    /// Give `username` a flair; `css_class` may be empty.
    pub async fn create_flair(&mut self, username: &str, text: &str, css_class: &str) -> Result<()> {
        self.api()
            .create(&FlairCreateInput::new(text, "", username, css_class))
            .await?;
        self.flair_list.invalidate();
        Ok(())
    }

    /// Update the flair configuration settings for this subreddit.
    pub async fn flair_config(&mut self, input: &FlairConfigInput) -> Result<()> {
        self.api().flair_config(input).await?;
        self.invalidate_templates(FlairType::User);
        Ok(())
    }

    /// Send a raw `user,flairtext,cssclass` CSV in one request.
    ///
    /// Reddit ignores lines beyond the 100th; use [`Flairs::flair_csv_entries`]
    /// to send longer lists in batches. Clearing both text and class removes a
    /// user's flair.
    pub async fn flair_csv(&mut self, flair_csv: &str) -> Result<Vec<ActionResult>> {
        let lines = flair_csv.lines().filter(|line| !line.trim().is_empty()).count();
        if lines > FLAIR_CSV_BATCH {
            warn!(
                "flair CSV has {} lines; Reddit will ignore all after the first {}",
                lines, FLAIR_CSV_BATCH
            );
        }
        let results = self.api().flair_csv(flair_csv).await?;
        self.flair_list.invalidate();
        Ok(results)
    }

    /// Assign many flairs, 100 per request; results come back in input order.
    pub async fn flair_csv_entries(
        &mut self,
        entries: &[FlairListResult],
    ) -> Result<Vec<ActionResult>> {
        let mut results = Vec::with_capacity(entries.len());
        for (batch, chunk) in entries.chunks(FLAIR_CSV_BATCH).enumerate() {
            debug!(
                "Sending flair CSV batch {} ({} lines) to r/{}",
                batch + 1,
                chunk.len(),
                self.subreddit
            );
            let csv = entries_to_csv(chunk)?;
            let applied = self.api().flair_csv(&csv).await?;
            // Earlier batches stay applied even if a later one fails.
            self.flair_list.invalidate();
            results.extend(applied);
        }
        info!(
            "Applied {} flair assignments in r/{}",
            results.iter().filter(|r| r.ok).count(),
            self.subreddit
        );
        Ok(results)
    }

    /// Re-apply a previously fetched flair list.
    pub async fn flair_csv_container(
        &mut self,
        container: &FlairListResultContainer,
    ) -> Result<Vec<ActionResult>> {
        self.flair_csv_entries(&container.users).await
    }

    /// Fetch one page of the flair list and cache it.
    pub async fn get_flair_list(
        &mut self,
        input: &FlairNameListingInput,
    ) -> Result<Vec<FlairListResult>> {
        let users = self.api().flair_list(input).await?.users;
        self.flair_list.store(users.clone(), Utc::now());
        Ok(users)
    }

    /// Return information about a user's flair options.
    pub async fn flair_selector(&self, username: &str) -> Result<FlairSelectorResultContainer> {
        self.api()
            .flair_selector(&FlairLinkInput::for_user(username))
            .await
    }

    async fn flair_template(&mut self, input: FlairTemplateInput) -> Result<()> {
        self.api().flair_template(&input).await?;
        self.invalidate_templates(input.flair_type);
        Ok(())
    }

    pub async fn create_link_flair_template(
        &mut self,
        text: &str,
        text_editable: bool,
        css_class: &str,
    ) -> Result<()> {
        self.flair_template(FlairTemplateInput::create(
            FlairType::Link,
            text,
            text_editable,
            css_class,
        ))
        .await
    }

    pub async fn create_user_flair_template(
        &mut self,
        text: &str,
        text_editable: bool,
        css_class: &str,
    ) -> Result<()> {
        self.flair_template(FlairTemplateInput::create(
            FlairType::User,
            text,
            text_editable,
            css_class,
        ))
        .await
    }

    /// Update a link template; `None` leaves a field unchanged.
    pub async fn update_link_flair_template(
        &mut self,
        flair_template_id: &str,
        text: Option<&str>,
        text_editable: Option<bool>,
        css_class: Option<&str>,
    ) -> Result<()> {
        let mut input = FlairTemplateInput::update(FlairType::Link, flair_template_id);
        input.text = text.map(str::to_string);
        input.text_editable = text_editable;
        input.css_class = css_class.map(str::to_string);
        self.flair_template(input).await
    }

    /// Update a user template; `None` leaves a field unchanged.
    pub async fn update_user_flair_template(
        &mut self,
        flair_template_id: &str,
        text: Option<&str>,
        text_editable: Option<bool>,
        css_class: Option<&str>,
    ) -> Result<()> {
        let mut input = FlairTemplateInput::update(FlairType::User, flair_template_id);
        input.text = text.map(str::to_string);
        input.text_editable = text_editable;
        input.css_class = css_class.map(str::to_string);
        self.flair_template(input).await
    }

    async fn flair_template_v2(&mut self, input: FlairTemplateV2Input) -> Result<FlairV2> {
        let flair = self.api().flair_template_v2(&input).await?;
        self.invalidate_templates(input.flair_type);
        Ok(flair)
    }

    /// Create a redesign link template and return it.
    pub async fn create_link_flair_template_v2(
        &mut self,
        template: NewFlairTemplate,
    ) -> Result<FlairV2> {
        self.flair_template_v2(template.into_input(FlairType::Link))
            .await
    }

    /// Create a redesign user template and return it.
    pub async fn create_user_flair_template_v2(
        &mut self,
        template: NewFlairTemplate,
    ) -> Result<FlairV2> {
        self.flair_template_v2(template.into_input(FlairType::User))
            .await
    }

    pub async fn update_link_flair_template_v2(
        &mut self,
        flair_template_id: &str,
        changes: FlairTemplateChanges,
    ) -> Result<FlairV2> {
        self.flair_template_v2(changes.into_input(FlairType::Link, flair_template_id))
            .await
    }

    pub async fn update_user_flair_template_v2(
        &mut self,
        flair_template_id: &str,
        changes: FlairTemplateChanges,
    ) -> Result<FlairV2> {
        self.flair_template_v2(changes.into_input(FlairType::User, flair_template_id))
            .await
    }

    pub async fn set_flair_enabled(&mut self, flair_enabled: bool) -> Result<()> {
        self.api().set_flair_enabled(flair_enabled).await?;
        self.invalidate_templates(FlairType::User);
        Ok(())
    }

    /// Link flair the current user may apply. Empty unless they can set it.
    pub async fn get_link_flair(&mut self) -> Result<Vec<Flair>> {
        let list = self.api().link_flair().await?;
        self.link_flair.store(list.clone(), Utc::now());
        Ok(list)
    }

    pub async fn get_link_flair_v2(&mut self) -> Result<Vec<FlairV2>> {
        let list = self.api().link_flair_v2().await?;
        self.link_flair_v2.store(list.clone(), Utc::now());
        Ok(list)
    }

    /// User flair the current user may apply. Empty when flair is disabled.
    pub async fn get_user_flair(&mut self) -> Result<Vec<Flair>> {
        let list = self.api().user_flair().await?;
        self.user_flair.store(list.clone(), Utc::now());
        Ok(list)
    }

    pub async fn get_user_flair_v2(&mut self) -> Result<Vec<FlairV2>> {
        let list = self.api().user_flair_v2().await?;
        self.user_flair_v2.store(list.clone(), Utc::now());
        Ok(list)
    }
}
