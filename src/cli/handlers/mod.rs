use std::path::PathBuf;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::compose::{Composer, TriggerPolicy};
use crate::io::workspace_io::{self, WorkspaceError};
use crate::model::segment::Segment;
use crate::model::workspace::Workspace;
use crate::ops::directory;
use crate::parse::{extract_in_progress_token, mentioned_users, render_segments};

type HandlerResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> HandlerResult {
    let json = cli.json;
    let dir = cli.workspace_dir.as_deref();

    match cli.command {
        None => Err("no subcommand given (try `mn --help`)".into()),
        Some(cmd) => match cmd {
            // Pure text commands: no workspace needed
            Commands::Token(args) => cmd_token(args, json),

            // Commands that read the known-users snapshot
            Commands::Render(args) => cmd_render(args, dir, json),
            Commands::Search(args) => cmd_search(args, dir, json),
            Commands::Users => cmd_users(dir, json),
            Commands::Complete(args) => cmd_complete(args, dir, json),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Find and load the workspace from `-C` or the current directory
pub fn load_workspace_from(dir: Option<&str>) -> Result<Workspace, WorkspaceError> {
    let start = match dir {
        Some(d) => PathBuf::from(d),
        None => std::env::current_dir()?,
    };
    let root = workspace_io::discover_workspace(&start)?;
    workspace_io::load_workspace(&root)
}

fn print_json<T: serde::Serialize>(value: &T) -> HandlerResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn cmd_token(args: TokenArgs, json: bool) -> HandlerResult {
    let cursor = args.cursor.unwrap_or(args.text.len());
    let token = extract_in_progress_token(&args.text, cursor);
    if json {
        return print_json(&TokenJson {
            text: &args.text,
            cursor: crate::parse::clamp_cursor(&args.text, cursor),
            token: token.as_ref(),
        });
    }
    println!("{}", format_token(token.as_ref()));
    Ok(())
}

fn cmd_render(args: RenderArgs, dir: Option<&str>, json: bool) -> HandlerResult {
    let ws = load_workspace_from(dir)?;
    let segments: Vec<Segment> = render_segments(&args.text, &ws.users).collect();
    if json {
        return print_json(&RenderJson {
            segments: segments.into_iter().map(SegmentJson::from).collect(),
            mentioned: mentioned_users(&args.text, &ws.users),
        });
    }
    for line in format_segments(&segments) {
        println!("{}", line);
    }
    Ok(())
}

fn cmd_search(args: SearchArgs, dir: Option<&str>, json: bool) -> HandlerResult {
    let ws = load_workspace_from(dir)?;
    let limit = args.limit.unwrap_or(ws.config.composer.max_suggestions);
    let hits = directory::search_users(&ws.users, &args.query, limit);
    if json {
        return print_json(&hits);
    }
    for user in &hits {
        println!("{}", format_user(user));
    }
    Ok(())
}

fn cmd_users(dir: Option<&str>, json: bool) -> HandlerResult {
    let ws = load_workspace_from(dir)?;
    if json {
        return print_json(&ws.users);
    }
    for user in &ws.users {
        println!("{}", format_user(user));
    }
    Ok(())
}

fn cmd_complete(args: CompleteArgs, dir: Option<&str>, json: bool) -> HandlerResult {
    let ws = load_workspace_from(dir)?;
    let user = ws
        .find_user(&args.user_id)
        .ok_or_else(|| format!("unknown user: {}", args.user_id))?
        .clone();

    // A bare `@` is a valid completion target here
    let mut composer = Composer::new(
        TriggerPolicy {
            trigger_on_bare_at: true,
        },
        1,
    );
    let cursor = args.cursor.unwrap_or(args.text.len());
    let request = composer
        .set_text(args.text.as_str(), cursor)
        .ok_or("no active mention at cursor")?;
    composer.apply_results(request.seq, Ok(vec![user]));
    let commit = composer.commit().ok_or("no active mention at cursor")?;

    if json {
        return print_json(&CompleteJson {
            text: &commit.text,
            cursor: commit.cursor,
            user: &commit.user,
        });
    }
    println!("{}", commit.text);
    Ok(())
}
