use clap::{Parser, Subcommand};
use india_facts::Result;
use india_facts::commands::{
    add_entity, detect_states_in, link_text, list_entities, search_entities, show_actions,
    show_entity, show_news, show_state, show_timeline,
};
use india_facts::config::{run_interactive_config, show_config};

#[derive(Parser)]
#[command(name = "india-facts")]
#[command(about = "Browse, link and extend the India Facts knowledge base")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Configure the knowledge API and news services
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
    /// List knowledge entries
    List {
        /// Only entries carrying this tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Show a knowledge entry with linked content and view actions
    Show {
        /// Entry ID
        id: String,
    },
    /// Search entries by title, description, content and tags
    Search { query: String },
    /// List the view actions available for an entry
    Actions {
        /// Entry ID
        id: String,
    },
    /// Detect states and union territories mentioned in text
    States { text: String },
    /// Show the sidebar for a state
    State {
        /// State name, short name or city
        name: String,
        /// Also fetch recent headlines for the state
        #[arg(long)]
        news: bool,
    },
    /// Mark knowledge titles in text as links
    Link { text: String },
    /// Show the history timeline
    Timeline {
        /// Put this entry first
        #[arg(long)]
        entity: Option<String>,
        /// Only history entries carrying this tag
        #[arg(long)]
        tag: Option<String>,
    },
    /// Submit a new knowledge entry for validation
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        category: String,
    },
    /// Search news articles published on a given day
    News {
        /// Day in YYYY-MM-DD format
        #[arg(long)]
        date: String,
        /// Search keywords (defaults to "india")
        #[arg(long)]
        keywords: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Config { show } => {
            if show {
                show_config()?;
            } else {
                run_interactive_config()?;
            }
        }
        Commands::List { tags } => {
            list_entities(&tags).await?;
        }
        Commands::Show { id } => {
            show_entity(&id).await?;
        }
        Commands::Search { query } => {
            search_entities(&query).await?;
        }
        Commands::Actions { id } => {
            show_actions(&id).await?;
        }
        Commands::States { text } => {
            detect_states_in(&text);
        }
        Commands::State { name, news } => {
            show_state(&name, news).await?;
        }
        Commands::Link { text } => {
            link_text(&text).await?;
        }
        Commands::Timeline { entity, tag } => {
            show_timeline(entity.as_deref(), tag.as_deref()).await?;
        }
        Commands::Add {
            title,
            description,
            category,
        } => {
            add_entity(title, description, category).await?;
        }
        Commands::News { date, keywords } => {
            show_news(&date, keywords.as_deref()).await?;
        }
    }

    Ok(())
}
