//! Structured-styles widgets: request bodies and listing results.
//!
//! Widgets travel as camelCase JSON tagged by `kind`. Requests and responses
//! share the same shapes; the server adds an `id` and, for community lists,
//! expands subreddit names into community details.

use crate::client::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Colors applied to a widget's header and body
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct WidgetStyles {
    #[serde(default)]
    pub background_color: String,
    #[serde(default)]
    pub header_color: String,
}

/// Free-form markdown block
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct WidgetTextArea {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub short_name: String,
    pub text: String,
    #[serde(default)]
    pub styles: WidgetStyles,
}

impl WidgetTextArea {
    pub fn new(short_name: &str, text: &str) -> Self {
        Self {
            id: None,
            short_name: short_name.to_string(),
            text: text.to_string(),
            styles: WidgetStyles::default(),
        }
    }
}

/// Which parts of each calendar event are shown
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WidgetCalendarConfiguration {
    /// Number of events to show, 1 to 50
    pub num_events: u32,
    pub show_date: bool,
    pub show_description: bool,
    pub show_location: bool,
    pub show_time: bool,
    pub show_title: bool,
}

impl Default for WidgetCalendarConfiguration {
    fn default() -> Self {
        Self {
            num_events: 10,
            show_date: true,
            show_description: true,
            show_location: true,
            show_time: true,
            show_title: true,
        }
    }
}

/// Events pulled from a public Google calendar
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct WidgetCalendar {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub configuration: WidgetCalendarConfiguration,
    pub google_calendar_id: String,
    #[serde(default)]
    pub requires_sync: bool,
    pub short_name: String,
    #[serde(default)]
    pub styles: WidgetStyles,
}

impl WidgetCalendar {
    pub fn new(
        configuration: WidgetCalendarConfiguration,
        google_calendar_id: &str,
        requires_sync: bool,
        short_name: &str,
        styles: WidgetStyles,
    ) -> Self {
        Self {
            id: None,
            configuration,
            google_calendar_id: google_calendar_id.to_string(),
            requires_sync,
            short_name: short_name.to_string(),
            styles,
        }
    }
}

/// Details the server returns for each listed community
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CommunityDetail {
    pub name: String,
    #[serde(default)]
    pub prefixed_name: String,
    #[serde(default)]
    pub subscribers: u64,
    #[serde(default)]
    pub icon_url: String,
    #[serde(default)]
    pub community_icon: String,
    #[serde(default)]
    pub primary_color: String,
    #[serde(default)]
    pub is_subscribed: bool,
    #[serde(default, rename = "isNSFW")]
    pub is_nsfw: bool,
    #[serde(default, rename = "type")]
    pub community_type: String,
}

/// A community as sent (bare name) or received (details)
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum CommunityEntry {
    Name(String),
    Detailed(CommunityDetail),
}

impl CommunityEntry {
    pub fn name(&self) -> &str {
        match self {
            CommunityEntry::Name(name) => name,
            CommunityEntry::Detailed(detail) => &detail.name,
        }
    }
}

/// A list of related subreddits
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct WidgetCommunityList {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub data: Vec<CommunityEntry>,
    pub short_name: String,
    #[serde(default)]
    pub styles: WidgetStyles,
}

impl WidgetCommunityList {
    pub fn new(subreddits: &[&str], short_name: &str, styles: WidgetStyles) -> Self {
        Self {
            id: None,
            data: subreddits
                .iter()
                .map(|name| CommunityEntry::Name(name.to_string()))
                .collect(),
            short_name: short_name.to_string(),
            styles,
        }
    }

    pub fn community_names(&self) -> Vec<&str> {
        self.data.iter().map(CommunityEntry::name).collect()
    }
}

/// How a post-flair widget lays out its templates
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PostFlairDisplay {
    #[default]
    List,
    Cloud,
}

/// Quick links to filter posts by flair
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct WidgetPostFlair {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub display: PostFlairDisplay,
    /// Flair template ids, in display order
    pub order: Vec<String>,
    pub short_name: String,
    #[serde(default)]
    pub styles: WidgetStyles,
}

/// Any widget this crate can create or update
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind")]
pub enum Widget {
    #[serde(rename = "textarea")]
    TextArea(WidgetTextArea),
    #[serde(rename = "calendar")]
    Calendar(WidgetCalendar),
    #[serde(rename = "community-list")]
    CommunityList(WidgetCommunityList),
    #[serde(rename = "post-flair")]
    PostFlair(WidgetPostFlair),
}

impl Widget {
    pub fn kind(&self) -> &'static str {
        match self {
            Widget::TextArea(_) => "textarea",
            Widget::Calendar(_) => "calendar",
            Widget::CommunityList(_) => "community-list",
            Widget::PostFlair(_) => "post-flair",
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Widget::TextArea(w) => w.id.as_deref(),
            Widget::Calendar(w) => w.id.as_deref(),
            Widget::CommunityList(w) => w.id.as_deref(),
            Widget::PostFlair(w) => w.id.as_deref(),
        }
    }

    pub fn short_name(&self) -> &str {
        match self {
            Widget::TextArea(w) => &w.short_name,
            Widget::Calendar(w) => &w.short_name,
            Widget::CommunityList(w) => &w.short_name,
            Widget::PostFlair(w) => &w.short_name,
        }
    }
}

impl From<WidgetTextArea> for Widget {
    fn from(widget: WidgetTextArea) -> Self {
        Widget::TextArea(widget)
    }
}

impl From<WidgetCalendar> for Widget {
    fn from(widget: WidgetCalendar) -> Self {
        Widget::Calendar(widget)
    }
}

impl From<WidgetCommunityList> for Widget {
    fn from(widget: WidgetCommunityList) -> Self {
        Widget::CommunityList(widget)
    }
}

impl From<WidgetPostFlair> for Widget {
    fn from(widget: WidgetPostFlair) -> Self {
        Widget::PostFlair(widget)
    }
}

/// Layout section whose widgets can be reordered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetSection {
    Sidebar,
    Topbar,
}

impl WidgetSection {
    pub fn as_str(&self) -> &'static str {
        match self {
            WidgetSection::Sidebar => "sidebar",
            WidgetSection::Topbar => "topbar",
        }
    }
}

/// Ordered widget ids of one section
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct WidgetOrder {
    #[serde(default)]
    pub order: Vec<String>,
}

/// Where each widget sits on the page
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct WidgetLayout {
    #[serde(default)]
    pub id_card_widget: Option<String>,
    #[serde(default)]
    pub moderator_widget: Option<String>,
    #[serde(default)]
    pub topbar: WidgetOrder,
    #[serde(default)]
    pub sidebar: WidgetOrder,
}

/// Every widget of a subreddit, keyed by id
///
/// Items stay as raw JSON because the listing also contains kinds this crate
/// does not model (id cards, moderator lists, menus, buttons).
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct WidgetResults {
    #[serde(default)]
    pub items: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub layout: WidgetLayout,
}

impl WidgetResults {
    /// Ids of all widgets of the given `kind`, sorted for stable output.
    pub fn ids_of_kind(&self, kind: &str) -> Vec<String> {
        let mut ids: Vec<String> = self
            .items
            .iter()
            .filter(|(_, data)| data["kind"].as_str() == Some(kind))
            .filter_map(|(key, data)| {
                data["id"]
                    .as_str()
                    .map(str::to_string)
                    .or_else(|| Some(key.clone()))
            })
            .collect();
        ids.sort();
        ids
    }

    /// Decode one item, or `None` when the id is unknown.
    pub fn widget(&self, id: &str) -> Option<Result<Widget>> {
        self.items
            .get(id)
            .map(|data| serde_json::from_value(data.clone()).map_err(Into::into))
    }

    /// Kind of each widget id, as reported by the server.
    pub fn kinds(&self) -> HashMap<&str, &str> {
        self.items
            .iter()
            .filter_map(|(id, data)| data["kind"].as_str().map(|kind| (id.as_str(), kind)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn textarea_serializes_with_kind_and_camel_case() {
        let widget = Widget::from(WidgetTextArea::new("Test Widget", "This is a test."));
        let value = serde_json::to_value(&widget).unwrap();
        assert_eq!(
            value,
            json!({
                "kind": "textarea",
                "shortName": "Test Widget",
                "text": "This is a test.",
                "styles": {"backgroundColor": "", "headerColor": ""}
            })
        );
    }

    #[test]
    fn calendar_configuration_uses_camel_case() {
        let widget = Widget::from(WidgetCalendar::new(
            WidgetCalendarConfiguration {
                num_events: 5,
                ..WidgetCalendarConfiguration::default()
            },
            "someone@example.com",
            false,
            "Events",
            WidgetStyles::default(),
        ));
        let value = serde_json::to_value(&widget).unwrap();
        assert_eq!(value["kind"], "calendar");
        assert_eq!(value["googleCalendarId"], "someone@example.com");
        assert_eq!(value["configuration"]["numEvents"], 5);
        assert_eq!(value["configuration"]["showLocation"], true);
        assert!(value.get("id").is_none());
    }

    #[test]
    fn community_list_reads_detailed_entries() {
        let value = json!({
            "kind": "community-list",
            "id": "widget_abc",
            "shortName": "Friends",
            "styles": {"backgroundColor": "", "headerColor": ""},
            "data": [
                {"name": "rust", "subscribers": 300000, "isNSFW": false, "type": "subreddit"},
                "plainname"
            ]
        });
        let widget: Widget = serde_json::from_value(value).unwrap();
        match widget {
            Widget::CommunityList(list) => {
                assert_eq!(list.community_names(), vec!["rust", "plainname"]);
                assert_eq!(list.id.as_deref(), Some("widget_abc"));
            }
            other => panic!("unexpected widget {:?}", other),
        }
    }

    #[test]
    fn results_find_ids_by_kind_and_skip_unknown_kinds() {
        let results: WidgetResults = serde_json::from_value(json!({
            "items": {
                "widget_1": {"kind": "textarea", "id": "widget_1", "shortName": "a", "text": "b"},
                "widget_2": {"kind": "id-card", "id": "widget_2"},
                "widget_3": {"kind": "textarea", "id": "widget_3", "shortName": "c", "text": "d"}
            },
            "layout": {
                "idCardWidget": "widget_2",
                "topbar": {"order": []},
                "sidebar": {"order": ["widget_3", "widget_1"]}
            }
        }))
        .unwrap();

        assert_eq!(results.ids_of_kind("textarea"), vec!["widget_1", "widget_3"]);
        assert!(results.ids_of_kind("calendar").is_empty());
        assert_eq!(results.layout.sidebar.order, vec!["widget_3", "widget_1"]);
        assert_eq!(results.layout.id_card_widget.as_deref(), Some("widget_2"));

        let decoded = results.widget("widget_1").unwrap().unwrap();
        assert_eq!(decoded.short_name(), "a");
        assert!(results.widget("widget_2").unwrap().is_err());
        assert!(results.widget("missing").is_none());
    }
}
