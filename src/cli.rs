use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "redmod",
    version,
    about = "Manage subreddit flair and widgets through the Reddit API."
)]
pub struct Cli {
    /// Subreddit to operate on. Falls back to REDDIT_SUBREDDIT.
    #[arg(long, short, global = true)]
    pub subreddit: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Authenticate in the browser and store the tokens for later runs.
    /// Requires an "installed app" client ID in REDDIT_CLIENT_ID.
    Login {
        /// Port to use for the OAuth callback (default: 8080).
        #[arg(long, help = "Port to use for the OAuth callback")]
        port: Option<u16>,
    },

    /// Manage flair templates and user flair.
    #[command(subcommand)]
    Flair(FlairCommands),

    /// Manage sidebar and topbar widgets.
    #[command(subcommand)]
    Widgets(WidgetCommands),
}

#[derive(clap::Subcommand, Debug)]
pub enum FlairCommands {
    /// List users and their flair.
    List {
        /// Maximum number of users to list (max 1000).
        #[arg(long, default_value_t = 25)]
        limit: u32,

        /// Only show the flair of this user.
        #[arg(long)]
        user: Option<String>,
    },

    /// List flair templates (link templates unless --user is given).
    Templates {
        #[arg(long, help = "List user flair templates instead of link flair")]
        user: bool,
    },

    /// Create a flair template.
    CreateTemplate {
        #[arg(help = "Flair text (64 characters at most)", required = true)]
        text: String,

        #[arg(long, help = "Create a user flair template instead of link flair")]
        user: bool,

        #[arg(long, help = "Let users edit the flair text")]
        editable: bool,

        #[arg(long, help = "Use light text instead of dark")]
        light_text: bool,

        #[arg(long, default_value = "#EEEEFF", help = "Background color, e.g. #AABBCC")]
        background_color: String,

        #[arg(long, help = "Only moderators may apply this flair")]
        mod_only: bool,
    },

    /// Delete a flair template by id.
    DeleteTemplate {
        #[arg(help = "Flair template id", required = true)]
        id: String,
    },

    /// Remove every template of one kind.
    ClearTemplates {
        #[arg(long, help = "Clear user flair templates instead of link flair")]
        user: bool,
    },

    /// Set a user's flair.
    Set {
        #[arg(help = "Reddit username", required = true)]
        username: String,

        #[arg(help = "Flair text", required = true)]
        text: String,

        #[arg(long, default_value = "", help = "CSS class of the flair")]
        css_class: String,
    },

    /// Remove a user's flair.
    Delete {
        #[arg(help = "Reddit username", required = true)]
        username: String,
    },

    /// Assign flair in bulk from a `user,flairtext,cssclass` CSV file.
    Csv {
        #[arg(help = "Path to the CSV file", required = true)]
        file: PathBuf,
    },

    /// Show which flairs a user may choose.
    Selector {
        #[arg(help = "Reddit username", required = true)]
        username: String,
    },

    /// Turn user flair on or off for the subreddit.
    Enable {
        #[arg(long, help = "Disable flair instead")]
        disable: bool,
    },
}

#[derive(clap::Subcommand, Debug)]
pub enum WidgetCommands {
    /// List widgets in layout order.
    List,

    /// Add a text area widget.
    AddText {
        #[arg(help = "Widget title", required = true)]
        short_name: String,

        #[arg(help = "Markdown body", required = true)]
        text: String,
    },

    /// Delete a widget by id.
    Delete {
        #[arg(help = "Widget id", required = true)]
        id: String,
    },

    /// Set the order of a section; every widget id of the section must be listed.
    Reorder {
        #[arg(long, help = "Reorder the topbar instead of the sidebar")]
        topbar: bool,

        #[arg(help = "Widget ids in the new order", required = true, num_args = 1..)]
        ids: Vec<String>,
    },
}
