use crate::db::{Database, InsertOutcome, DEFAULT_DATABASE_URL};
use crate::error::{AppError, Result};
use crate::models::{first_match, NewUser, SearchField, User};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::Write;
use tracing::{debug, info, warn};

/// CLI tool for managing users stored in a SQLite database
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Database connection string
    #[arg(long, global = true, env = "DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
    pub database_url: String,

    /// How user records are printed
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Log debug output to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Initializes the database by creating tables and adding a default user
    Initialize,

    /// Finds a user given their username and displays their information
    GetUser {
        /// Username of the user to retrieve
        username: String,
    },

    /// Shows all users in the database
    GetAllUsers,

    /// Changes the email of a user given their username
    ChangeEmail {
        /// Username of the user to change email
        username: String,

        /// New email address
        new_email: String,
    },

    /// Creates a new user with the given username, email, and password
    CreateUser {
        /// Username of the new user
        username: String,

        /// Email of the new user
        email: String,

        /// Password of the new user
        password: String,
    },

    /// Deletes a user given their username
    DeleteUser {
        /// Username of the user to delete
        username: String,
    },

    /// Searches for a user by username or email
    SearchUser {
        /// Search query for username or email (queries containing '@' search emails)
        query: String,
    },

    /// Lists users with pagination
    ListUsers(ListUsersArgs),
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ListUsersArgs {
    /// Amount of users per page
    #[arg(default_value_t = 10, allow_negative_numbers = true)]
    pub limit: i64,

    /// Offset for pagination
    #[arg(default_value_t = 0, allow_negative_numbers = true)]
    pub offset: i64,
}

/// Rendering used for user records. Status messages are always plain text.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// CLI application
pub struct App {
    db: Database,
    format: OutputFormat,
}

impl App {
    /// Create a new CLI application connected to `database_url`
    pub async fn new(database_url: &str, format: OutputFormat) -> Result<Self> {
        let db = Database::new(database_url).await?;
        Ok(Self::with_database(db, format))
    }

    pub fn with_database(db: Database, format: OutputFormat) -> Self {
        Self { db, format }
    }

    /// Run one command, writing its output to `out`
    pub async fn run<W: Write>(&self, command: Commands, out: &mut W) -> Result<()> {
        debug!("Running command {:?}", command);
        match command {
            Commands::Initialize => self.initialize(out).await,
            Commands::GetUser { username } => self.get_user(&username, out).await,
            Commands::GetAllUsers => self.get_all_users(out).await,
            Commands::ChangeEmail {
                username,
                new_email,
            } => self.change_email(&username, &new_email, out).await,
            Commands::CreateUser {
                username,
                email,
                password,
            } => {
                self.create_user(NewUser::new(username, email, password), out)
                    .await
            },
            Commands::DeleteUser { username } => self.delete_user(&username, out).await,
            Commands::SearchUser { query } => self.search_user(&query, out).await,
            Commands::ListUsers(args) => self.list_users(args.limit, args.offset, out).await,
        }
    }

    /// Wait for the store connection to be released
    pub async fn shutdown(&self) {
        self.db.close().await;
    }

    fn write_user<W: Write>(&self, user: &User, out: &mut W) -> Result<()> {
        match self.format {
            OutputFormat::Text => writeln!(out, "{}", user)?,
            OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(user)?)?,
        }
        Ok(())
    }

    /// Drop and recreate the schema, then seed the default user
    async fn initialize<W: Write>(&self, out: &mut W) -> Result<()> {
        let seed = NewUser::seed();

        let mut session = self.db.session().await?;
        session.reset_schema().await?;
        let created = match session.insert_user(&seed).await? {
            InsertOutcome::Created(user) => user,
            InsertOutcome::Conflict => {
                return Err(AppError::Conflict(format!(
                    "seed user {} already exists",
                    seed.username
                )))
            },
        };
        session.commit().await?;

        let mut session = self.db.session().await?;
        match session.find_user_by_id(created.id).await? {
            Some(user) => info!("Seeded user {} with id {}", user.username, user.id),
            None => warn!("Seeded user {} could not be reloaded", seed.username),
        }

        writeln!(out, "Database Initialized")?;
        Ok(())
    }

    async fn get_user<W: Write>(&self, username: &str, out: &mut W) -> Result<()> {
        let mut session = self.db.session().await?;
        match session.find_user_by_username(username).await? {
            Some(user) => self.write_user(&user, out),
            None => {
                writeln!(out, "{} not found!", username)?;
                Ok(())
            },
        }
    }

    async fn get_all_users<W: Write>(&self, out: &mut W) -> Result<()> {
        let mut session = self.db.session().await?;
        let users = session.all_users().await?;
        if users.is_empty() {
            writeln!(out, "Error: No Users Found!")?;
        }

        for user in &users {
            self.write_user(user, out)?;
        }
        Ok(())
    }

    async fn change_email<W: Write>(
        &self,
        username: &str,
        new_email: &str,
        out: &mut W,
    ) -> Result<()> {
        let mut session = self.db.session().await?;
        let user = match session.find_user_by_username(username).await? {
            Some(user) => user,
            None => {
                writeln!(out, "Error: User not found!")?;
                return Ok(());
            },
        };

        session.update_email(user.id, new_email).await?;
        session.commit().await?;

        let mut session = self.db.session().await?;
        if let Some(updated) = session.find_user_by_id(user.id).await? {
            info!("Email of {} is now {}", updated.username, updated.email);
        }

        writeln!(out, "Successfully changed email!")?;
        Ok(())
    }

    async fn create_user<W: Write>(&self, user: NewUser, out: &mut W) -> Result<()> {
        let mut session = self.db.session().await?;
        match session.insert_user(&user).await? {
            InsertOutcome::Created(created) => {
                session.commit().await?;
                info!("Created user {} with id {}", created.username, created.id);
                writeln!(out, "Successfully added user {}", created.username)?;
            },
            InsertOutcome::Conflict => {
                writeln!(out, "Error: User already exists!")?;
            },
        }
        Ok(())
    }

    async fn delete_user<W: Write>(&self, username: &str, out: &mut W) -> Result<()> {
        let mut session = self.db.session().await?;
        let user = match session.find_user_by_username(username).await? {
            Some(user) => user,
            None => {
                writeln!(out, "User not found!")?;
                return Ok(());
            },
        };

        session.delete_user(user.id).await?;
        session.commit().await?;

        writeln!(out, "Successfully deleted user!")?;
        Ok(())
    }

    /// Scans every user and reports the first one whose username (or email, when
    /// the query contains '@') contains `query`
    async fn search_user<W: Write>(&self, query: &str, out: &mut W) -> Result<()> {
        let field = SearchField::for_query(query);
        writeln!(out, "Searching for {}", field.as_str())?;

        let mut session = self.db.session().await?;
        let users = session.all_users().await?;

        match first_match(&users, field, query) {
            Some(user) => writeln!(out, "Match found! {}", user.field(field))?,
            None => writeln!(out, "User not found!")?,
        }
        Ok(())
    }

    async fn list_users<W: Write>(&self, limit: i64, offset: i64, out: &mut W) -> Result<()> {
        let mut session = self.db.session().await?;
        let users = session.page_users(limit, offset).await?;
        for user in &users {
            self.write_user(user, out)?;
        }
        Ok(())
    }
}
