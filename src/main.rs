use clap::Parser;
use log::error;
use redmod::cli::{Cli, Commands, FlairCommands, WidgetCommands};
use redmod::client::Result;
use redmod::config::AppConfig;
use redmod::controllers::RedditApi;
use redmod::models::{FlairType, NewFlairTemplate, TextColor, WidgetSection};
use redmod::operations::auth::{ensure_authenticated, handle_login_command};
use redmod::operations::flair::{handle_flair_command, FlairAction, FlairOptions};
use redmod::operations::widgets::{handle_widgets_command, WidgetAction, WidgetOptions};

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        error!("{}", err);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::load();
    let api = RedditApi::from_config(&config)?;

    let subreddit = || -> Result<String> {
        match &cli.subreddit {
            Some(subreddit) => Ok(subreddit.clone()),
            None => config.require_subreddit(),
        }
    };

    match &cli.command {
        Commands::Login { port } => handle_login_command(api, &config, *port).await,
        Commands::Flair(command) => {
            let options = FlairOptions {
                subreddit: subreddit()?,
                action: flair_action(command),
            };
            ensure_authenticated(&api, &config).await?;
            handle_flair_command(&api, options).await
        }
        Commands::Widgets(command) => {
            let options = WidgetOptions {
                subreddit: subreddit()?,
                action: widget_action(command),
            };
            ensure_authenticated(&api, &config).await?;
            handle_widgets_command(&api, options).await
        }
    }
}

fn flair_type(user: bool) -> FlairType {
    if user {
        FlairType::User
    } else {
        FlairType::Link
    }
}

fn flair_action(command: &FlairCommands) -> FlairAction {
    match command {
        FlairCommands::List { limit, user } => FlairAction::List {
            limit: *limit,
            user: user.clone(),
        },
        FlairCommands::Templates { user } => FlairAction::Templates {
            flair_type: flair_type(*user),
        },
        FlairCommands::CreateTemplate {
            text,
            user,
            editable,
            light_text,
            background_color,
            mod_only,
        } => FlairAction::CreateTemplate {
            flair_type: flair_type(*user),
            template: NewFlairTemplate::new(text)
                .text_editable(*editable)
                .text_color(if *light_text {
                    TextColor::Light
                } else {
                    TextColor::Dark
                })
                .background_color(background_color)
                .mod_only(*mod_only),
        },
        FlairCommands::DeleteTemplate { id } => FlairAction::DeleteTemplate { id: id.clone() },
        FlairCommands::ClearTemplates { user } => FlairAction::ClearTemplates {
            flair_type: flair_type(*user),
        },
        FlairCommands::Set {
            username,
            text,
            css_class,
        } => FlairAction::Set {
            username: username.clone(),
            text: text.clone(),
            css_class: css_class.clone(),
        },
        FlairCommands::Delete { username } => FlairAction::Delete {
            username: username.clone(),
        },
        FlairCommands::Csv { file } => FlairAction::Csv { file: file.clone() },
        FlairCommands::Selector { username } => FlairAction::Selector {
            username: username.clone(),
        },
        FlairCommands::Enable { disable } => FlairAction::Enable { enabled: !disable },
    }
}

fn widget_action(command: &WidgetCommands) -> WidgetAction {
    match command {
        WidgetCommands::List => WidgetAction::List,
        WidgetCommands::AddText { short_name, text } => WidgetAction::AddText {
            short_name: short_name.clone(),
            text: text.clone(),
        },
        WidgetCommands::Delete { id } => WidgetAction::Delete { id: id.clone() },
        WidgetCommands::Reorder { topbar, ids } => WidgetAction::Reorder {
            section: if *topbar {
                WidgetSection::Topbar
            } else {
                WidgetSection::Sidebar
            },
            ids: ids.clone(),
        },
    }
}
