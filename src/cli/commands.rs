use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "mn", about = concat!("mn v", env!("CARGO_PKG_VERSION"), " - @mention composer for workspace comments"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different workspace directory
    #[arg(short = 'C', long = "workspace-dir", global = true)]
    pub workspace_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the @mention token under the cursor
    Token(TokenArgs),
    /// Split text into plain text and resolved mentions
    Render(RenderArgs),
    /// Search the workspace's known users
    Search(SearchArgs),
    /// List the workspace's known users
    Users,
    /// Complete the active @mention with a user
    Complete(CompleteArgs),
}

#[derive(Args)]
pub struct TokenArgs {
    /// Text being edited
    pub text: String,
    /// Cursor byte offset (default: end of text)
    #[arg(long)]
    pub cursor: Option<usize>,
}

#[derive(Args)]
pub struct RenderArgs {
    /// Committed text to render
    pub text: String,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Query to match against names, usernames and ids
    pub query: String,
    /// Maximum number of results (default: composer.max_suggestions)
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Args)]
pub struct CompleteArgs {
    /// Text being edited
    pub text: String,
    /// ID of the user to insert
    pub user_id: String,
    /// Cursor byte offset (default: end of text)
    #[arg(long)]
    pub cursor: Option<usize>,
}
