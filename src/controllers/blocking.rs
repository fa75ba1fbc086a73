//! Synchronous twins of the async controllers.
//!
//! Each wrapper owns a current-thread runtime and blocks on the async method
//! of the same name. Do not use these from inside an async context; the
//! runtime refuses to nest.

use super::{Flairs, Widgets};
use crate::client::Result;
use crate::models::flair::{
    ActionResult, Flair, FlairConfigInput, FlairListResult, FlairListResultContainer,
    FlairNameListingInput, FlairSelectorResultContainer, FlairTemplateChanges, FlairV2,
    NewFlairTemplate,
};
use crate::models::widgets::{Widget, WidgetResults, WidgetSection};
use tokio::runtime::{Builder, Runtime};

fn runtime() -> Result<Runtime> {
    Ok(Builder::new_current_thread().enable_all().build()?)
}

/// Blocking flair controller
pub struct BlockingFlairs {
    inner: Flairs,
    runtime: Runtime,
}

impl BlockingFlairs {
    pub fn new(inner: Flairs) -> Result<Self> {
        Ok(Self {
            inner,
            runtime: runtime()?,
        })
    }

    pub fn into_inner(self) -> Flairs {
        self.inner
    }

    pub fn flair_list(&mut self) -> Result<Vec<FlairListResult>> {
        self.runtime.block_on(self.inner.flair_list())
    }

    pub fn link_flair(&mut self) -> Result<Vec<Flair>> {
        self.runtime.block_on(self.inner.link_flair())
    }

    pub fn link_flair_v2(&mut self) -> Result<Vec<FlairV2>> {
        self.runtime.block_on(self.inner.link_flair_v2())
    }

    pub fn user_flair(&mut self) -> Result<Vec<Flair>> {
        self.runtime.block_on(self.inner.user_flair())
    }

    pub fn user_flair_v2(&mut self) -> Result<Vec<FlairV2>> {
        self.runtime.block_on(self.inner.user_flair_v2())
    }

    pub fn clear_link_flair_templates(&mut self) -> Result<()> {
        self.runtime.block_on(self.inner.clear_link_flair_templates())
    }

    pub fn clear_user_flair_templates(&mut self) -> Result<()> {
        self.runtime.block_on(self.inner.clear_user_flair_templates())
    }

    pub fn delete_flair(&mut self, username: &str) -> Result<()> {
        self.runtime.block_on(self.inner.delete_flair(username))
    }

    pub fn delete_flair_template(&mut self, flair_template_id: &str) -> Result<()> {
        self.runtime
            .block_on(self.inner.delete_flair_template(flair_template_id))
    }

    pub fn create_flair(&mut self, username: &str, text: &str, css_class: &str) -> Result<()> {
        self.runtime
            .block_on(self.inner.create_flair(username, text, css_class))
    }

    pub fn flair_config(&mut self, input: &FlairConfigInput) -> Result<()> {
        self.runtime.block_on(self.inner.flair_config(input))
    }

    pub fn flair_csv(&mut self, flair_csv: &str) -> Result<Vec<ActionResult>> {
        self.runtime.block_on(self.inner.flair_csv(flair_csv))
    }

    pub fn flair_csv_entries(&mut self, entries: &[FlairListResult]) -> Result<Vec<ActionResult>> {
        self.runtime.block_on(self.inner.flair_csv_entries(entries))
    }

    pub fn flair_csv_container(
        &mut self,
        container: &FlairListResultContainer,
    ) -> Result<Vec<ActionResult>> {
        self.runtime
            .block_on(self.inner.flair_csv_container(container))
    }

    pub fn get_flair_list(&mut self, input: &FlairNameListingInput) -> Result<Vec<FlairListResult>> {
        self.runtime.block_on(self.inner.get_flair_list(input))
    }

    pub fn flair_selector(&self, username: &str) -> Result<FlairSelectorResultContainer> {
        self.runtime.block_on(self.inner.flair_selector(username))
    }

    pub fn create_link_flair_template(
        &mut self,
        text: &str,
        text_editable: bool,
        css_class: &str,
    ) -> Result<()> {
        self.runtime.block_on(
            self.inner
                .create_link_flair_template(text, text_editable, css_class),
        )
    }

    pub fn create_user_flair_template(
        &mut self,
        text: &str,
        text_editable: bool,
        css_class: &str,
    ) -> Result<()> {
        self.runtime.block_on(
            self.inner
                .create_user_flair_template(text, text_editable, css_class),
        )
    }

    pub fn update_link_flair_template(
        &mut self,
        flair_template_id: &str,
        text: Option<&str>,
        text_editable: Option<bool>,
        css_class: Option<&str>,
    ) -> Result<()> {
        self.runtime.block_on(self.inner.update_link_flair_template(
            flair_template_id,
            text,
            text_editable,
            css_class,
        ))
    }

    pub fn update_user_flair_template(
        &mut self,
        flair_template_id: &str,
        text: Option<&str>,
        text_editable: Option<bool>,
        css_class: Option<&str>,
    ) -> Result<()> {
        self.runtime.block_on(self.inner.update_user_flair_template(
            flair_template_id,
            text,
            text_editable,
            css_class,
        ))
    }

    pub fn create_link_flair_template_v2(&mut self, template: NewFlairTemplate) -> Result<FlairV2> {
        self.runtime
            .block_on(self.inner.create_link_flair_template_v2(template))
    }

    pub fn create_user_flair_template_v2(&mut self, template: NewFlairTemplate) -> Result<FlairV2> {
        self.runtime
            .block_on(self.inner.create_user_flair_template_v2(template))
    }

    pub fn update_link_flair_template_v2(
        &mut self,
        flair_template_id: &str,
        changes: FlairTemplateChanges,
    ) -> Result<FlairV2> {
        self.runtime.block_on(
            self.inner
                .update_link_flair_template_v2(flair_template_id, changes),
        )
    }

    pub fn update_user_flair_template_v2(
        &mut self,
        flair_template_id: &str,
        changes: FlairTemplateChanges,
    ) -> Result<FlairV2> {
        self.runtime.block_on(
            self.inner
                .update_user_flair_template_v2(flair_template_id, changes),
        )
    }

    pub fn set_flair_enabled(&mut self, flair_enabled: bool) -> Result<()> {
        self.runtime
            .block_on(self.inner.set_flair_enabled(flair_enabled))
    }

    pub fn get_link_flair(&mut self) -> Result<Vec<Flair>> {
        self.runtime.block_on(self.inner.get_link_flair())
    }

    pub fn get_link_flair_v2(&mut self) -> Result<Vec<FlairV2>> {
        self.runtime.block_on(self.inner.get_link_flair_v2())
    }

    pub fn get_user_flair(&mut self) -> Result<Vec<Flair>> {
        self.runtime.block_on(self.inner.get_user_flair())
    }

    pub fn get_user_flair_v2(&mut self) -> Result<Vec<FlairV2>> {
        self.runtime.block_on(self.inner.get_user_flair_v2())
    }
}

/// Blocking widget controller
pub struct BlockingWidgets {
    inner: Widgets,
    runtime: Runtime,
}

impl BlockingWidgets {
    pub fn new(inner: Widgets) -> Result<Self> {
        Ok(Self {
            inner,
            runtime: runtime()?,
        })
    }

    pub fn into_inner(self) -> Widgets {
        self.inner
    }

    pub fn widgets(&mut self) -> Result<WidgetResults> {
        self.runtime.block_on(self.inner.widgets())
    }

    pub fn get(&mut self, progressive_images: bool) -> Result<WidgetResults> {
        self.runtime.block_on(self.inner.get(progressive_images))
    }

    pub fn add<W: Into<Widget>>(&mut self, widget: W) -> Result<Widget> {
        self.runtime.block_on(self.inner.add(widget))
    }

    pub fn update<W: Into<Widget>>(&mut self, widget_id: &str, widget: W) -> Result<Widget> {
        self.runtime.block_on(self.inner.update(widget_id, widget))
    }

    pub fn update_order(&mut self, section: WidgetSection, order: &[String]) -> Result<()> {
        self.runtime
            .block_on(self.inner.update_order(section, order))
    }

    pub fn delete(&mut self, widget_id: &str) -> Result<()> {
        self.runtime.block_on(self.inner.delete(widget_id))
    }
}
