// src/main.rs
//
// reviewhub - command-line front end
//
// Every subcommand goes through the same request handlers a server would use,
// except `promote`, which is a local operator action on the database.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use reviewhub::application::commands::{self, CommandResult};
use reviewhub::application::dto::*;
use reviewhub::application::AppState;
use reviewhub::config::Settings;
use reviewhub::db::{get_connection, get_database_stats, verify_database_integrity};
use reviewhub::domain::Role;
use reviewhub::repositories::{SqliteUserRepository, UserRepository};

/// Title catalog and review platform
#[derive(Parser, Debug)]
#[command(name = "reviewhub")]
#[command(about = "Catalog titles, review them, and manage who may do what", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON settings file
    #[arg(short, long, env = "REVIEWHUB_CONFIG")]
    config: Option<PathBuf>,

    /// SQLite database file (overrides the settings file)
    #[arg(long, env = "REVIEWHUB_DATABASE")]
    database: Option<PathBuf>,

    /// Token signing secret (overrides the settings file)
    #[arg(long, env = "REVIEWHUB_JWT_SECRET", hide_env_values = true)]
    jwt_secret: Option<String>,

    /// SMTP host; without one, mail is written to the log
    #[arg(long, env = "REVIEWHUB_SMTP_HOST")]
    smtp_host: Option<String>,

    /// Bearer token of the acting user
    #[arg(short, long, env = "REVIEWHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create or migrate the database, check its integrity and print its statistics
    Init,
    /// Request a confirmation code by mail
    Signup {
        username: String,
        email: String,
    },
    /// Exchange a confirmation code for a bearer token
    Token {
        username: String,
        code: String,
    },
    /// Set a user's role (local operator action, no token needed)
    Promote {
        username: String,
        /// user, moderator or admin
        role: Role,
        /// Also set the staff flag
        #[arg(long)]
        staff: bool,
    },
    /// Show the acting user's profile
    Me,
    /// List users (admin)
    Users,
    /// List categories
    Categories {
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Create a category (admin)
    AddCategory {
        name: String,
        slug: String,
    },
    /// List genres
    Genres {
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Create a genre (admin)
    AddGenre {
        name: String,
        slug: String,
    },
    /// List titles, newest first
    Titles {
        /// Genre slug
        #[arg(long)]
        genre: Option<String>,
        /// Category slug
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        year: Option<i32>,
        /// Substring of the name (case-sensitive)
        #[arg(long)]
        name: Option<String>,
    },
    /// Show one title with its rating
    Title {
        id: String,
    },
    /// Create a title (admin)
    AddTitle {
        name: String,
        year: i32,
        #[arg(long)]
        description: Option<String>,
        /// Genre slug, repeatable
        #[arg(long = "genre")]
        genres: Vec<String>,
        /// Category slug
        #[arg(long)]
        category: Option<String>,
    },
    /// List the reviews of a title
    Reviews {
        title_id: String,
    },
    /// Review a title
    Review {
        title_id: String,
        #[arg(long)]
        score: i32,
        #[arg(long)]
        text: String,
    },
    /// List the comments on a review
    Comments {
        title_id: String,
        review_id: String,
    },
    /// Comment on a review
    Comment {
        title_id: String,
        review_id: String,
        #[arg(long)]
        text: String,
    },
}

fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = match &cli.config {
        Some(path) => Settings::from_file(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => Settings::default(),
    };

    if let Some(database) = &cli.database {
        settings.database.path = Some(database.clone());
    }
    if let Some(secret) = &cli.jwt_secret {
        settings.auth.jwt_secret = secret.clone();
    }
    if let Some(host) = &cli.smtp_host {
        settings.mail.smtp_host = Some(host.clone());
    }
    Ok(settings)
}

fn print<T: Serialize>(result: CommandResult<T>) -> Result<()> {
    let value = result.map_err(|e| anyhow!("{}", e))?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cli.log_level))
        .init();

    let settings = load_settings(&cli)?;
    let state = AppState::build(&settings).context("Failed to initialize reviewhub")?;
    let token = cli.token.as_deref();

    match cli.command {
        Commands::Init => {
            let conn = get_connection(&state.pool)?;
            verify_database_integrity(&conn).context("Database integrity check failed")?;
            let stats = get_database_stats(&conn)?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
            Ok(())
        }
        Commands::Signup { username, email } => {
            print(commands::signup(&state, SignupDto { username, email }))
        }
        Commands::Token { username, code } => print(commands::obtain_token(
            &state,
            TokenRequestDto {
                username,
                confirmation_code: code,
            },
        )),
        Commands::Promote {
            username,
            role,
            staff,
        } => {
            let users = SqliteUserRepository::new(state.pool.clone());
            let mut user = users
                .get_by_username(&username)?
                .ok_or_else(|| anyhow!("User {} not found", username))?;
            user.role = role;
            user.is_staff = user.is_staff || staff;
            users.update(&user)?;
            log::info!("Operator set {} to {} (staff: {})", user.username, role, user.is_staff);
            print::<UserDto>(Ok(user.into()))
        }
        Commands::Me => print(commands::get_me(&state, token)),
        Commands::Users => print(commands::list_users(&state, token)),
        Commands::Categories { search } => {
            print(commands::list_categories(&state, token, search.as_deref()))
        }
        Commands::AddCategory { name, slug } => {
            print(commands::create_category(&state, token, CategoryDto { name, slug }))
        }
        Commands::Genres { search } => print(commands::list_genres(&state, token, search.as_deref())),
        Commands::AddGenre { name, slug } => {
            print(commands::create_genre(&state, token, GenreDto { name, slug }))
        }
        Commands::Titles {
            genre,
            category,
            year,
            name,
        } => print(commands::list_titles(
            &state,
            token,
            TitleQueryDto {
                genre,
                category,
                year,
                name,
            },
        )),
        Commands::Title { id } => print(commands::get_title(&state, token, &id)),
        Commands::AddTitle {
            name,
            year,
            description,
            genres,
            category,
        } => print(commands::create_title(
            &state,
            token,
            CreateTitleDto {
                name,
                year,
                description,
                genre: genres,
                category,
            },
        )),
        Commands::Reviews { title_id } => print(commands::list_reviews(&state, token, &title_id)),
        Commands::Review {
            title_id,
            score,
            text,
        } => print(commands::create_review(
            &state,
            token,
            &title_id,
            CreateReviewDto { text, score },
        )),
        Commands::Comments {
            title_id,
            review_id,
        } => print(commands::list_comments(&state, token, &title_id, &review_id)),
        Commands::Comment {
            title_id,
            review_id,
            text,
        } => print(commands::create_comment(
            &state,
            token,
            &title_id,
            &review_id,
            CreateCommentDto { text },
        )),
    }
}
