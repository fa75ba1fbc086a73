use super::display_subreddit;
use crate::client::{RedditClientError, Result};
use crate::controllers::{RedditApi, Widgets};
use crate::models::widgets::{WidgetResults, WidgetSection, WidgetTextArea};
use log::{debug, info};

/// What a widget command should do
#[derive(Debug, Clone)]
pub enum WidgetAction {
    List,
    AddText { short_name: String, text: String },
    Delete { id: String },
    Reorder {
        section: WidgetSection,
        ids: Vec<String>,
    },
}

/// Configuration options for a widget command
#[derive(Debug, Clone)]
pub struct WidgetOptions {
    /// The subreddit whose widgets are managed
    pub subreddit: String,
    /// The action to run
    pub action: WidgetAction,
}

/// Result of a widget operation
#[derive(Debug)]
pub struct WidgetResult {
    pub success: bool,
    /// Rows to print, one per widget
    pub lines: Vec<String>,
    /// Formatted summary for CLI output
    pub message: String,
}

/// Operation that runs one widget action through the `Widgets` controller
pub struct WidgetOperation {
    options: WidgetOptions,
    widgets: Widgets,
}

impl WidgetOperation {
    pub fn new(options: WidgetOptions, api: &RedditApi) -> Self {
        let widgets = api.widgets(&options.subreddit);
        Self { options, widgets }
    }

    pub async fn execute(&mut self) -> Result<WidgetResult> {
        let display_sub = display_subreddit(&self.options.subreddit);
        info!("Running {:?} in {}", self.options.action, display_sub);

        match self.run().await {
            Ok(result) => {
                info!("{}", result.message);
                Ok(result)
            }
            Err(err) => {
                let message = format!("Widget command failed in {}: {}", display_sub, err);
                debug!("{}", message);
                Ok(WidgetResult {
                    success: false,
                    lines: Vec::new(),
                    message,
                })
            }
        }
    }

    async fn run(&mut self) -> Result<WidgetResult> {
        let widgets = &mut self.widgets;
        let (lines, message) = match &self.options.action {
            WidgetAction::List => {
                let results = widgets.get(false).await?;
                let lines = describe_layout(&results);
                let message = format!("{} widgets", results.items.len());
                (lines, message)
            }
            WidgetAction::AddText { short_name, text } => {
                let created = widgets.add(WidgetTextArea::new(short_name, text)).await?;
                let message = format!(
                    "Created text area '{}' with id {}",
                    created.short_name(),
                    created.id().unwrap_or("?")
                );
                (Vec::new(), message)
            }
            WidgetAction::Delete { id } => {
                widgets.delete(id).await?;
                (Vec::new(), format!("Deleted widget {}", id))
            }
            WidgetAction::Reorder { section, ids } => {
                widgets.update_order(*section, ids).await?;
                (
                    Vec::new(),
                    format!("Reordered {} widgets in the {}", ids.len(), section.as_str()),
                )
            }
        };

        Ok(WidgetResult {
            success: true,
            lines,
            message,
        })
    }
}

/// One line per widget, topbar first, in the order Reddit shows them.
pub fn describe_layout(results: &WidgetResults) -> Vec<String> {
    let kinds = results.kinds();
    let sections = [
        ("topbar", &results.layout.topbar.order),
        ("sidebar", &results.layout.sidebar.order),
    ];

    let mut lines = Vec::new();
    for (section, order) in sections {
        for id in order {
            let kind = kinds.get(id.as_str()).copied().unwrap_or("unknown");
            let name = results
                .items
                .get(id)
                .and_then(|data| data["shortName"].as_str())
                .unwrap_or("");
            lines.push(format!("{:<8} {:<15} {}  {}", section, kind, id, name));
        }
    }
    lines
}

/// CLI handler function for widget commands
pub async fn handle_widgets_command(api: &RedditApi, options: WidgetOptions) -> Result<()> {
    let mut operation = WidgetOperation::new(options, api);
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
    use serde_json::json;

    #[test]
    fn layout_lists_topbar_then_sidebar_in_order() {
        let results: WidgetResults = serde_json::from_value(json!({
            "items": {
                "widget_b": {"kind": "textarea", "id": "widget_b", "shortName": "Rules", "text": ""},
                "widget_a": {"kind": "calendar", "id": "widget_a", "shortName": "Events"},
                "widget_menu": {"kind": "menu", "id": "widget_menu"}
            },
            "layout": {
                "topbar": {"order": ["widget_menu"]},
                "sidebar": {"order": ["widget_b", "widget_a"]}
            }
        }))
        .unwrap();

        let lines = describe_layout(&results);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("topbar"));
        assert!(lines[0].contains("menu"));
        assert!(lines[1].contains("widget_b") && lines[1].ends_with("Rules"));
        assert!(lines[2].contains("calendar") && lines[2].ends_with("Events"));
    }

    #[test]
    fn layout_tolerates_ids_without_items() {
        let results: WidgetResults = serde_json::from_value(json!({
            "items": {},
            "layout": {"sidebar": {"order": ["widget_gone"]}}
        }))
        .unwrap();

        let lines = describe_layout(&results);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("unknown"));
    }
}
