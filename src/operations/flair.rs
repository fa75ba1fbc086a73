use super::display_subreddit;
use crate::client::{RedditClientError, Result};
use crate::controllers::{Flairs, RedditApi};
use crate::models::flair::{
    parse_flair_csv, ActionResult, FlairListResult, FlairNameListingInput,
    FlairSelectorResultContainer, FlairType, FlairV2, NewFlairTemplate,
};
use log::{debug, info};
use std::fs::File;
use std::path::PathBuf;

/// What a flair command should do
#[derive(Debug, Clone)]
pub enum FlairAction {
    /// Page through users and their flair
    List { limit: u32, user: Option<String> },
    /// Show the redesign templates of one flair type
    Templates { flair_type: FlairType },
    CreateTemplate {
        flair_type: FlairType,
        template: NewFlairTemplate,
    },
    DeleteTemplate { id: String },
    ClearTemplates { flair_type: FlairType },
    Set {
        username: String,
        text: String,
        css_class: String,
    },
    Delete { username: String },
    /// Bulk assignment from a `user,flairtext,cssclass` file
    Csv { file: PathBuf },
    Selector { username: String },
    Enable { enabled: bool },
}

/// Configuration options for a flair command
#[derive(Debug, Clone)]
pub struct FlairOptions {
    /// The subreddit whose flair is managed
    pub subreddit: String,
    /// The action to run
    pub action: FlairAction,
}

/// Result of a flair operation
#[derive(Debug)]
pub struct FlairResult {
    /// Whether every request succeeded
    pub success: bool,
    /// Rows to print, one per item
    pub lines: Vec<String>,
    /// Formatted summary for CLI output
    pub message: String,
}

impl FlairResult {
    fn done(message: String) -> Self {
        Self {
            success: true,
            lines: Vec::new(),
            message,
        }
    }
}

/// Operation that runs one flair action through the `Flairs` controller
pub struct FlairOperation {
    options: FlairOptions,
    flairs: Flairs,
}

impl FlairOperation {
    pub fn new(options: FlairOptions, api: &RedditApi) -> Self {
        let flairs = api.flairs(&options.subreddit);
        Self { options, flairs }
    }

    /// Execute the flair action.
    ///
    /// API failures are reported through `FlairResult::success`; only local
    /// problems such as an unreadable CSV file are returned as errors.
    pub async fn execute(&mut self) -> Result<FlairResult> {
        let display_sub = display_subreddit(&self.options.subreddit);
        info!("Running {:?} in {}", self.options.action, display_sub);

        match self.run().await {
            Ok(result) => {
                info!("{}", result.message);
                Ok(result)
            }
            Err(err @ RedditClientError::IoError(_)) | Err(err @ RedditClientError::CsvError(_)) => {
                Err(err)
            }
            Err(err) => {
                let message = format!("Flair command failed in {}: {}", display_sub, err);
                debug!("{}", message);
                Ok(FlairResult {
                    success: false,
                    lines: Vec::new(),
                    message,
                })
            }
        }
    }

    async fn run(&mut self) -> Result<FlairResult> {
        let flairs = &mut self.flairs;
        match self.options.action.clone() {
            FlairAction::List { limit, user } => {
                let input = listing_input(limit, user.as_deref());
                let users = flairs.get_flair_list(&input).await?;
                let lines: Vec<String> = users.iter().map(format_user_flair).collect();
                Ok(FlairResult {
                    success: true,
                    message: format!("{} users with flair", lines.len()),
                    lines,
                })
            }
            FlairAction::Templates { flair_type } => {
                let templates = match flair_type {
                    FlairType::Link => flairs.link_flair_v2().await?,
                    FlairType::User => flairs.user_flair_v2().await?,
                };
                Ok(FlairResult {
                    success: true,
                    message: format!("{} templates", templates.len()),
                    lines: templates.iter().map(format_template).collect(),
                })
            }
            FlairAction::CreateTemplate {
                flair_type,
                template,
            } => {
                let created = match flair_type {
                    FlairType::Link => flairs.create_link_flair_template_v2(template).await?,
                    FlairType::User => flairs.create_user_flair_template_v2(template).await?,
                };
                Ok(FlairResult::done(format!(
                    "Created template '{}' with id {}",
                    created.text, created.id
                )))
            }
            FlairAction::DeleteTemplate { id } => {
                flairs.delete_flair_template(&id).await?;
                Ok(FlairResult::done(format!("Deleted template {}", id)))
            }
            FlairAction::ClearTemplates { flair_type } => {
                match flair_type {
                    FlairType::Link => flairs.clear_link_flair_templates().await?,
                    FlairType::User => flairs.clear_user_flair_templates().await?,
                }
                Ok(FlairResult::done(format!(
                    "Cleared all {} templates",
                    flair_type.as_str()
                )))
            }
            FlairAction::Set {
                username,
                text,
                css_class,
            } => {
                flairs.create_flair(&username, &text, &css_class).await?;
                Ok(FlairResult::done(format!(
                    "Set flair of u/{} to '{}'",
                    username, text
                )))
            }
            FlairAction::Delete { username } => {
                flairs.delete_flair(&username).await?;
                Ok(FlairResult::done(format!("Removed flair of u/{}", username)))
            }
            FlairAction::Csv { file } => {
                let entries = parse_flair_csv(File::open(&file)?)?;
                info!("Read {} flair lines from {}", entries.len(), file.display());
                let results = flairs.flair_csv_entries(&entries).await?;
                Ok(summarize_actions(&entries, &results))
            }
            FlairAction::Selector { username } => {
                let selector = flairs.flair_selector(&username).await?;
                Ok(FlairResult {
                    success: true,
                    message: format!(
                        "u/{} can choose from {} flairs",
                        username,
                        selector.choices.len()
                    ),
                    lines: format_selector(&selector),
                })
            }
            FlairAction::Enable { enabled } => {
                flairs.set_flair_enabled(enabled).await?;
                Ok(FlairResult::done(format!(
                    "User flair {}",
                    if enabled { "enabled" } else { "disabled" }
                )))
            }
        }
    }
}

/// `user: text [css]`, with `-` standing in for missing text.
fn listing_input(limit: u32, user: Option<&str>) -> FlairNameListingInput {
    FlairNameListingInput {
        name: user.unwrap_or_default().to_string(),
        limit,
        ..FlairNameListingInput::default()
    }
}

pub fn format_user_flair(entry: &FlairListResult) -> String {
    let text = entry.flair_text.as_deref().unwrap_or("-");
    match entry.flair_css_class.as_deref() {
        Some(css) if !css.is_empty() => format!("{}: {} [{}]", entry.user, text, css),
        _ => format!("{}: {}", entry.user, text),
    }
}

pub fn format_template(template: &FlairV2) -> String {
    let mut line = format!(
        "{}  {}  {} on {}",
        template.id, template.text, template.text_color, template.background_color
    );
    if template.text_editable {
        line.push_str("  editable");
    }
    if template.mod_only {
        line.push_str("  mod-only");
    }
    line
}

fn format_selector(selector: &FlairSelectorResultContainer) -> Vec<String> {
    let mut lines = vec![format!(
        "current: {}",
        selector.current.flair_text.as_deref().unwrap_or("-")
    )];
    lines.extend(selector.choices.iter().map(|choice| {
        format!(
            "{}  {}{}",
            choice.flair_template_id,
            choice.flair_text,
            if choice.flair_text_editable {
                "  editable"
            } else {
                ""
            }
        )
    }));
    lines
}

/// Pair each CSV line with its outcome and list the ones Reddit rejected.
pub fn summarize_actions(entries: &[FlairListResult], results: &[ActionResult]) -> FlairResult {
    let failed: Vec<String> = entries
        .iter()
        .zip(results)
        .filter(|(_, result)| !result.ok)
        .map(|(entry, result)| {
            let mut reasons: Vec<String> = result
                .errors
                .iter()
                .map(|(field, reason)| format!("{}: {}", field, reason))
                .collect();
            reasons.sort();
            format!("{} failed: {}", entry.user, reasons.join(", "))
        })
        .collect();

    let applied = results.iter().filter(|result| result.ok).count();
    FlairResult {
        success: failed.is_empty(),
        message: format!(
            "Applied {} of {} flair assignments",
            applied,
            entries.len()
        ),
        lines: failed,
    }
}

/// CLI handler function for flair commands
pub async fn handle_flair_command(api: &RedditApi, options: FlairOptions) -> Result<()> {
    let mut operation = FlairOperation::new(options, api);
    let result = operation.execute().await?;
    for line in &result.lines {
        println!("{}", line);
    }
    if result.success {
        println!("{}", result.message);
        Ok(())
    } else {
        Err(RedditClientError::ApiError(result.message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn user_listing_keeps_the_requested_limit() {
        let input = listing_input(500, Some("alice"));
        assert_eq!(input.name, "alice");
        assert_eq!(input.limit, 500);
        assert_eq!(input.show, "all");

        let everyone = listing_input(100, None);
        assert_eq!(everyone.name, "");
        assert_eq!(everyone.limit, 100);
    }

    #[test]
    fn user_flair_line_shows_css_only_when_present() {
        let with_css = FlairListResult::new("alice", "Mod", "green");
        assert_eq!(format_user_flair(&with_css), "alice: Mod [green]");

        let bare = FlairListResult {
            user: "bob".to_string(),
            ..FlairListResult::default()
        };
        assert_eq!(format_user_flair(&bare), "bob: -");
    }

    #[test]
    fn template_line_flags_editable_and_mod_only() {
        let template = FlairV2 {
            id: "t1".to_string(),
            text: "Help".to_string(),
            text_color: "dark".to_string(),
            background_color: "#EEEEFF".to_string(),
            text_editable: true,
            mod_only: true,
            ..FlairV2::default()
        };
        assert_eq!(
            format_template(&template),
            "t1  Help  dark on #EEEEFF  editable  mod-only"
        );
    }

    #[test]
    fn summary_lists_rejected_lines() {
        let entries = vec![
            FlairListResult::new("alice", "A", ""),
            FlairListResult::new("ghost", "B", ""),
        ];
        let mut errors = HashMap::new();
        errors.insert("user".to_string(), "unable to resolve user `ghost'".to_string());
        let results = vec![
            ActionResult {
                ok: true,
                status: "added flair for user alice".to_string(),
                ..ActionResult::default()
            },
            ActionResult {
                ok: false,
                errors,
                ..ActionResult::default()
            },
        ];

        let summary = summarize_actions(&entries, &results);
        assert!(!summary.success);
        assert_eq!(summary.message, "Applied 1 of 2 flair assignments");
        assert_eq!(
            summary.lines,
            vec!["ghost failed: user: unable to resolve user `ghost'"]
        );
    }
}
