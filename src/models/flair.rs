//! Flair request inputs and response shapes.

use crate::client::{RedditClientError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io;

/// Form parameters in the order they are sent.
pub type Form = Vec<(&'static str, String)>;

fn bool_str(value: bool) -> String {
    value.to_string()
}

/// Which kind of flair a template applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlairType {
    #[serde(rename = "LINK_FLAIR")]
    Link,
    #[serde(rename = "USER_FLAIR")]
    User,
}

impl FlairType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlairType::Link => "LINK_FLAIR",
            FlairType::User => "USER_FLAIR",
        }
    }
}

/// Text color of a redesign flair template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextColor {
    Light,
    #[default]
    Dark,
}

impl TextColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextColor::Light => "light",
            TextColor::Dark => "dark",
        }
    }
}

/// Where flair is displayed relative to the name or title
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlairPosition {
    Left,
    #[default]
    Right,
}

impl FlairPosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlairPosition::Left => "left",
            FlairPosition::Right => "right",
        }
    }
}

/// What a redesign flair may contain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AllowableContent {
    All,
    Emoji,
    Text,
}

impl AllowableContent {
    pub fn as_str(&self) -> &'static str {
        match self {
            AllowableContent::All => "all",
            AllowableContent::Emoji => "emoji",
            AllowableContent::Text => "text",
        }
    }
}

/// A flair template as returned by the v1 listing endpoints
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct Flair {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub text_editable: bool,
    #[serde(default)]
    pub css_class: String,
}

/// A flair template as returned by the redesign endpoints
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct FlairV2 {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub text_editable: bool,
    #[serde(default)]
    pub css_class: String,
    #[serde(default)]
    pub text_color: String,
    #[serde(default)]
    pub background_color: String,
    #[serde(default)]
    pub mod_only: bool,
    #[serde(default)]
    pub allowable_content: Option<String>,
    #[serde(default)]
    pub max_emojis: Option<u32>,
    #[serde(default, rename = "type")]
    pub flair_type: Option<String>,
    #[serde(default)]
    pub override_css: bool,
    #[serde(default)]
    pub richtext: Vec<serde_json::Value>,
}

/// One user's flair in the subreddit flair list
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct FlairListResult {
    pub user: String,
    #[serde(default)]
    pub flair_text: Option<String>,
    #[serde(default)]
    pub flair_css_class: Option<String>,
}

impl FlairListResult {
    pub fn new(user: &str, flair_text: &str, flair_css_class: &str) -> Self {
        Self {
            user: user.to_string(),
            flair_text: Some(flair_text.to_string()),
            flair_css_class: Some(flair_css_class.to_string()),
        }
    }

    fn record(&self) -> [&str; 3] {
        [
            self.user.as_str(),
            self.flair_text.as_deref().unwrap_or(""),
            self.flair_css_class.as_deref().unwrap_or(""),
        ]
    }

    /// Render as one `user,flairtext,cssclass` line, newline-terminated.
    pub fn to_csv(&self) -> Result<String> {
        entries_to_csv(std::slice::from_ref(self))
    }
}

/// Render flair entries as the body of a `flaircsv` request.
pub fn entries_to_csv(entries: &[FlairListResult]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    for entry in entries {
        writer.write_record(entry.record())?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| RedditClientError::IoError(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| RedditClientError::IoError(io::Error::new(io::ErrorKind::InvalidData, e)))
}

/// Read `user,flairtext,cssclass` lines; missing trailing fields are empty.
pub fn parse_flair_csv<R: io::Read>(reader: R) -> Result<Vec<FlairListResult>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut entries = Vec::new();
    for record in reader.records() {
        let record = record?;
        let user = record.get(0).unwrap_or("");
        if user.is_empty() {
            continue;
        }
        entries.push(FlairListResult::new(
            user,
            record.get(1).unwrap_or(""),
            record.get(2).unwrap_or(""),
        ));
    }
    Ok(entries)
}

/// A page of the subreddit flair list
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct FlairListResultContainer {
    #[serde(default)]
    pub users: Vec<FlairListResult>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub prev: Option<String>,
}

/// The flair a user currently has
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct FlairSelectorResult {
    pub flair_css_class: Option<String>,
    pub flair_template_id: Option<String>,
    pub flair_text: Option<String>,
    pub flair_position: Option<String>,
}

/// One flair a user may pick
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct FlairChoice {
    #[serde(default)]
    pub flair_css_class: String,
    #[serde(default)]
    pub flair_template_id: String,
    #[serde(default)]
    pub flair_text: String,
    #[serde(default)]
    pub flair_position: String,
    #[serde(default)]
    pub flair_text_editable: bool,
}

/// Response of the flair selector endpoint
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct FlairSelectorResultContainer {
    #[serde(default)]
    pub current: FlairSelectorResult,
    #[serde(default)]
    pub choices: Vec<FlairChoice>,
}

/// Outcome of one line of a bulk flair CSV
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct ActionResult {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub errors: HashMap<String, String>,
    #[serde(default)]
    pub warnings: HashMap<String, String>,
}

/// Assign flair to a user (`name`) or a post (`link`)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FlairCreateInput {
    pub text: String,
    pub link: String,
    pub name: String,
    pub css_class: String,
}

impl FlairCreateInput {
    pub fn new(text: &str, link: &str, name: &str, css_class: &str) -> Self {
        Self {
            text: text.to_string(),
            link: link.to_string(),
            name: name.to_string(),
            css_class: css_class.to_string(),
        }
    }

    pub fn to_form(&self) -> Form {
        let mut form = vec![("api_type", "json".to_string())];
        if !self.css_class.is_empty() {
            form.push(("css_class", self.css_class.clone()));
        }
        if !self.link.is_empty() {
            form.push(("link", self.link.clone()));
        }
        if !self.name.is_empty() {
            form.push(("name", self.name.clone()));
        }
        form.push(("text", self.text.clone()));
        form
    }
}

/// Subreddit-wide flair settings
#[derive(Debug, Clone, PartialEq)]
pub struct FlairConfigInput {
    pub flair_enabled: bool,
    pub flair_position: FlairPosition,
    pub flair_self_assign_enabled: bool,
    /// `None` hides link flair
    pub link_flair_position: Option<FlairPosition>,
    pub link_flair_self_assign_enabled: bool,
}

impl Default for FlairConfigInput {
    fn default() -> Self {
        Self {
            flair_enabled: true,
            flair_position: FlairPosition::Right,
            flair_self_assign_enabled: false,
            link_flair_position: Some(FlairPosition::Right),
            link_flair_self_assign_enabled: false,
        }
    }
}

impl FlairConfigInput {
    pub fn to_form(&self) -> Form {
        vec![
            ("api_type", "json".to_string()),
            ("flair_enabled", bool_str(self.flair_enabled)),
            ("flair_position", self.flair_position.as_str().to_string()),
            (
                "flair_self_assign_enabled",
                bool_str(self.flair_self_assign_enabled),
            ),
            (
                "link_flair_position",
                self.link_flair_position
                    .map(|p| p.as_str().to_string())
                    .unwrap_or_default(),
            ),
            (
                "link_flair_self_assign_enabled",
                bool_str(self.link_flair_self_assign_enabled),
            ),
        ]
    }
}

/// Query for the paginated flair list
#[derive(Debug, Clone, PartialEq)]
pub struct FlairNameListingInput {
    /// Restrict the list to one user
    pub name: String,
    pub after: String,
    pub before: String,
    /// Page size (default 25, maximum 1000)
    pub limit: u32,
    pub count: u32,
    pub show: String,
    pub sr_detail: bool,
}

impl Default for FlairNameListingInput {
    fn default() -> Self {
        Self {
            name: String::new(),
            after: String::new(),
            before: String::new(),
            limit: 25,
            count: 0,
            show: "all".to_string(),
            sr_detail: false,
        }
    }
}

impl FlairNameListingInput {
    pub fn to_query(&self) -> Form {
        let mut query = Vec::new();
        if !self.name.is_empty() {
            query.push(("name", self.name.clone()));
        }
        if !self.after.is_empty() {
            query.push(("after", self.after.clone()));
        }
        if !self.before.is_empty() {
            query.push(("before", self.before.clone()));
        }
        query.push(("limit", self.limit.to_string()));
        query.push(("count", self.count.to_string()));
        if !self.show.is_empty() {
            query.push(("show", self.show.clone()));
        }
        query.push(("sr_detail", bool_str(self.sr_detail)));
        query
    }
}

/// Identify whose flair options to fetch
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FlairLinkInput {
    pub name: Option<String>,
    pub link: Option<String>,
    pub is_newlink: bool,
}

impl FlairLinkInput {
    pub fn for_user(username: &str) -> Self {
        Self {
            name: Some(username.to_string()),
            ..Self::default()
        }
    }

    pub fn for_link(fullname: &str) -> Self {
        Self {
            link: Some(fullname.to_string()),
            ..Self::default()
        }
    }

    pub fn to_form(&self) -> Form {
        let mut form = vec![("is_newlink", bool_str(self.is_newlink))];
        if let Some(link) = &self.link {
            form.push(("link", link.clone()));
        }
        if let Some(name) = &self.name {
            form.push(("name", name.clone()));
        }
        form
    }
}

/// Create or update a v1 flair template; unset fields are left untouched on update
#[derive(Debug, Clone, PartialEq)]
pub struct FlairTemplateInput {
    pub flair_type: FlairType,
    pub text: Option<String>,
    pub text_editable: Option<bool>,
    pub css_class: Option<String>,
    pub flair_template_id: Option<String>,
}

impl FlairTemplateInput {
    pub fn create(flair_type: FlairType, text: &str, text_editable: bool, css_class: &str) -> Self {
        Self {
            flair_type,
            text: Some(text.to_string()),
            text_editable: Some(text_editable),
            css_class: Some(css_class.to_string()),
            flair_template_id: None,
        }
    }

    pub fn update(flair_type: FlairType, flair_template_id: &str) -> Self {
        Self {
            flair_type,
            text: None,
            text_editable: None,
            css_class: None,
            flair_template_id: Some(flair_template_id.to_string()),
        }
    }

    pub fn to_form(&self) -> Form {
        let mut form = vec![
            ("api_type", "json".to_string()),
            ("flair_type", self.flair_type.as_str().to_string()),
        ];
        if let Some(css_class) = &self.css_class {
            form.push(("css_class", css_class.clone()));
        }
        if let Some(id) = &self.flair_template_id {
            form.push(("flair_template_id", id.clone()));
        }
        if let Some(text) = &self.text {
            form.push(("text", text.clone()));
        }
        if let Some(editable) = self.text_editable {
            form.push(("text_editable", bool_str(editable)));
        }
        form
    }
}

/// Create or update a redesign flair template; unset fields are omitted
#[derive(Debug, Clone, PartialEq)]
pub struct FlairTemplateV2Input {
    pub flair_type: FlairType,
    pub text: Option<String>,
    pub text_editable: Option<bool>,
    pub text_color: Option<TextColor>,
    pub background_color: Option<String>,
    pub mod_only: Option<bool>,
    pub allowable_content: Option<AllowableContent>,
    pub max_emojis: Option<u32>,
    pub flair_template_id: Option<String>,
}

impl FlairTemplateV2Input {
    pub fn new(flair_type: FlairType) -> Self {
        Self {
            flair_type,
            text: None,
            text_editable: None,
            text_color: None,
            background_color: None,
            mod_only: None,
            allowable_content: None,
            max_emojis: None,
            flair_template_id: None,
        }
    }

    pub fn to_form(&self) -> Form {
        let mut form = vec![
            ("api_type", "json".to_string()),
            ("flair_type", self.flair_type.as_str().to_string()),
        ];
        if let Some(content) = self.allowable_content {
            form.push(("allowable_content", content.as_str().to_string()));
        }
        if let Some(color) = &self.background_color {
            form.push(("background_color", color.clone()));
        }
        if let Some(id) = &self.flair_template_id {
            form.push(("flair_template_id", id.clone()));
        }
        if let Some(max) = self.max_emojis {
            form.push(("max_emojis", max.to_string()));
        }
        if let Some(mod_only) = self.mod_only {
            form.push(("mod_only", bool_str(mod_only)));
        }
        if let Some(text) = &self.text {
            form.push(("text", text.clone()));
        }
        if let Some(color) = self.text_color {
            form.push(("text_color", color.as_str().to_string()));
        }
        if let Some(editable) = self.text_editable {
            form.push(("text_editable", bool_str(editable)));
        }
        form
    }
}

/// Settings for a new redesign flair template
#[derive(Debug, Clone, PartialEq)]
pub struct NewFlairTemplate {
    /// No longer than 64 characters
    pub text: String,
    pub text_editable: bool,
    pub text_color: TextColor,
    /// A 6-digit rgb hex color, e.g. `#AABBCC`
    pub background_color: String,
    pub mod_only: bool,
}

impl NewFlairTemplate {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            text_editable: false,
            text_color: TextColor::Dark,
            background_color: "#EEEEFF".to_string(),
            mod_only: false,
        }
    }

    pub fn text_editable(mut self, editable: bool) -> Self {
        self.text_editable = editable;
        self
    }

    pub fn text_color(mut self, color: TextColor) -> Self {
        self.text_color = color;
        self
    }

    pub fn background_color(mut self, color: &str) -> Self {
        self.background_color = color.to_string();
        self
    }

    pub fn mod_only(mut self, mod_only: bool) -> Self {
        self.mod_only = mod_only;
        self
    }

    pub(crate) fn into_input(self, flair_type: FlairType) -> FlairTemplateV2Input {
        FlairTemplateV2Input {
            text: Some(self.text),
            text_editable: Some(self.text_editable),
            text_color: Some(self.text_color),
            background_color: Some(self.background_color),
            mod_only: Some(self.mod_only),
            ..FlairTemplateV2Input::new(flair_type)
        }
    }
}

/// Changes to an existing redesign flair template
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FlairTemplateChanges {
    pub text: Option<String>,
    pub text_editable: Option<bool>,
    pub text_color: Option<TextColor>,
    pub background_color: Option<String>,
    pub mod_only: Option<bool>,
}

impl FlairTemplateChanges {
    pub(crate) fn into_input(self, flair_type: FlairType, id: &str) -> FlairTemplateV2Input {
        FlairTemplateV2Input {
            text: self.text,
            text_editable: self.text_editable,
            text_color: self.text_color,
            background_color: self.background_color,
            mod_only: self.mod_only,
            flair_template_id: Some(id.to_string()),
            ..FlairTemplateV2Input::new(flair_type)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value<'a>(form: &'a Form, key: &str) -> Option<&'a str> {
        form.iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn csv_line_matches_flaircsv_format() {
        let entry = FlairListResult::new("spez", "Admin", "admin-flair");
        assert_eq!(entry.to_csv().unwrap(), "spez,Admin,admin-flair\n");
    }

    #[test]
    fn csv_quotes_fields_with_commas() {
        let entry = FlairListResult::new("kris", "Hello, world", "");
        assert_eq!(entry.to_csv().unwrap(), "kris,\"Hello, world\",\n");
    }

    #[test]
    fn csv_treats_missing_fields_as_empty() {
        let entries = vec![
            FlairListResult {
                user: "a".to_string(),
                flair_text: None,
                flair_css_class: None,
            },
            FlairListResult::new("b", "text", "css"),
        ];
        assert_eq!(entries_to_csv(&entries).unwrap(), "a,,\nb,text,css\n");
    }

    #[test]
    fn parse_csv_accepts_short_lines_and_skips_blanks() {
        let input = "alice,Helper,green\nbob\n\n carol , Mod \n";
        let entries = parse_flair_csv(input.as_bytes()).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[1], FlairListResult::new("bob", "", ""));
        assert_eq!(entries[2], FlairListResult::new("carol", "Mod", ""));
    }

    #[test]
    fn flair_list_deserializes_null_fields() {
        let json = r#"{"users":[{"user":"a","flair_text":null,"flair_css_class":"x"}],"next":"t2_b"}"#;
        let container: FlairListResultContainer = serde_json::from_str(json).unwrap();
        assert_eq!(container.users[0].flair_text, None);
        assert_eq!(container.next.as_deref(), Some("t2_b"));
        assert_eq!(container.prev, None);
    }

    #[test]
    fn flair_v2_reads_type_field() {
        let json = r##"{"id":"abc","text":"News","text_color":"light","background_color":"#AABBCC",
            "mod_only":true,"type":"text","allowable_content":"all","max_emojis":10,"richtext":[]}"##;
        let flair: FlairV2 = serde_json::from_str(json).unwrap();
        assert_eq!(flair.flair_type.as_deref(), Some("text"));
        assert!(flair.mod_only);
        assert_eq!(flair.max_emojis, Some(10));
    }

    #[test]
    fn template_update_omits_unset_fields() {
        let mut input = FlairTemplateInput::update(FlairType::User, "tmpl-1");
        input.text = Some("Renamed".to_string());
        let form = input.to_form();
        assert_eq!(value(&form, "flair_type"), Some("USER_FLAIR"));
        assert_eq!(value(&form, "flair_template_id"), Some("tmpl-1"));
        assert_eq!(value(&form, "text"), Some("Renamed"));
        assert_eq!(value(&form, "text_editable"), None);
        assert_eq!(value(&form, "css_class"), None);
    }

    #[test]
    fn new_template_v2_has_documented_defaults() {
        let form = NewFlairTemplate::new("Discussion")
            .into_input(FlairType::Link)
            .to_form();
        assert_eq!(value(&form, "text_color"), Some("dark"));
        assert_eq!(value(&form, "background_color"), Some("#EEEEFF"));
        assert_eq!(value(&form, "mod_only"), Some("false"));
        assert_eq!(value(&form, "text_editable"), Some("false"));
        assert_eq!(value(&form, "flair_template_id"), None);
    }

    #[test]
    fn flair_config_hides_link_flair_with_empty_position() {
        let config = FlairConfigInput {
            link_flair_position: None,
            ..FlairConfigInput::default()
        };
        let form = config.to_form();
        assert_eq!(value(&form, "link_flair_position"), Some(""));
        assert_eq!(value(&form, "flair_enabled"), Some("true"));
    }

    #[test]
    fn listing_query_skips_empty_cursors() {
        let query = FlairNameListingInput::default().to_query();
        assert_eq!(value(&query, "after"), None);
        assert_eq!(value(&query, "limit"), Some("25"));
        assert_eq!(value(&query, "show"), Some("all"));
    }
}
