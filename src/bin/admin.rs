//! CLI administration tool for affiliate-redirect.
//!
//! Manages API tokens and manual links, shows statistics and runs the
//! maintenance job without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin admin -- token create --name "Dashboard"
//! cargo run --bin admin -- token list
//! cargo run --bin admin -- token revoke "Dashboard"
//!
//! cargo run --bin admin -- link create https://shop.example.com/sale --slug summer-sale
//! cargo run --bin admin -- link list --page 2
//!
//! cargo run --bin admin -- stats
//! cargo run --bin admin -- maintenance run
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server: `DATABASE_URL` (or `DB_*`) and `TOKEN_SIGNING_SECRET`
//! are required. Tokens are hashed with the same secret the server uses.

use affiliate_redirect::application::services::auth_service::{generate_token, hash_token};
use affiliate_redirect::application::services::{MaintenanceService, ResolverService};
use affiliate_redirect::config::{self, Config};
use affiliate_redirect::domain::repositories::{LinkRepository, TokenRepository};
use affiliate_redirect::infrastructure::cache::NullCache;
use affiliate_redirect::infrastructure::persistence::{
    PgLinkRepository, PgMaintenanceRepository, PgTokenRepository,
};
use affiliate_redirect::server::connect_database;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing affiliate-redirect.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage API tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Manage affiliate links
    Link {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Show statistics
    Stats,

    /// Click rollup and retention
    Maintenance {
        #[command(subcommand)]
        action: MaintenanceAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum TokenAction {
    /// Create a new API token
    Create {
        /// Token name (e.g., "Dashboard", "Reporting job")
        #[arg(short, long)]
        name: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List all tokens
    List,

    /// Revoke a token
    Revoke {
        /// Token name or ID to revoke
        name_or_id: String,
    },
}

#[derive(Subcommand)]
enum LinkAction {
    /// Create a manual link
    Create {
        /// Destination URL (http or https)
        url: String,

        /// Slug; derived from host and path when omitted
        #[arg(short, long)]
        slug: Option<String>,
    },

    /// List links, most clicked first
    List {
        #[arg(short, long, default_value_t = 1)]
        page: i64,

        #[arg(long, default_value_t = 25)]
        page_size: i64,
    },
}

#[derive(Subcommand)]
enum MaintenanceAction {
    /// Roll up complete days and prune expired raw clicks
    Run,
}

#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env()?;
    let pool = connect_database(&config).await?;

    match cli.command {
        Commands::Token { action } => handle_token_action(action, &pool, &config).await?,
        Commands::Link { action } => handle_link_action(action, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Maintenance { action } => {
            handle_maintenance_action(action, &pool, &config).await?
        }
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

async fn handle_token_action(action: TokenAction, pool: &PgPool, config: &Config) -> Result<()> {
    let repo = PgTokenRepository::new(Arc::new(pool.clone()));

    match action {
        TokenAction::Create { name, yes } => {
            create_token(&repo, &config.token_signing_secret, name, yes).await
        }
        TokenAction::List => list_tokens(&repo).await,
        TokenAction::Revoke { name_or_id } => revoke_token(&repo, name_or_id).await,
    }
}

/// Creates a new API token.
///
/// The raw token is printed once; only its HMAC is stored.
async fn create_token(
    repo: &PgTokenRepository,
    secret: &str,
    name: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "Create API Token".bright_blue().bold());
    println!();

    let token_name = match name {
        Some(n) => n,
        None => Input::new()
            .with_prompt("Token name")
            .with_initial_text("Dashboard")
            .interact_text()?,
    };

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt(format!("Create token '{}'?", token_name))
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "Cancelled".red());
            return Ok(());
        }
    }

    let token_value = generate_token();

    repo.create_token(&token_name, &hash_token(secret, &token_value))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create token: {}", e))?;

    println!();
    println!("{}", "Token created.".green().bold());
    println!("  Name:  {}", token_name.cyan());
    println!("  Token: {}", token_value.bright_yellow().bold());
    println!();
    println!(
        "{}",
        "Save this token now; it cannot be shown again.".red().bold()
    );
    println!();
    println!(
        "  curl -H \"Authorization: Bearer {}\" http://localhost:3000/api/affiliate-links/<slug>",
        token_value.bright_yellow()
    );
    println!();

    Ok(())
}

async fn list_tokens(repo: &PgTokenRepository) -> Result<()> {
    println!("{}", "API Tokens".bright_blue().bold());
    println!();

    let tokens = repo
        .list_tokens()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list tokens: {}", e))?;

    if tokens.is_empty() {
        println!("{}", "  No tokens found".yellow());
        return Ok(());
    }

    println!(
        "  {:<4} {:<28} {:<17} {:<17} {}",
        "ID".bright_white().bold(),
        "Name".bright_white().bold(),
        "Created".bright_white().bold(),
        "Last used".bright_white().bold(),
        "Status".bright_white().bold()
    );
    println!("  {}", "-".repeat(80).bright_black());

    for token in &tokens {
        let status = if token.is_revoked() {
            "REVOKED".red()
        } else {
            "ACTIVE".green()
        };
        let last_used = token
            .last_used_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "never".to_string());

        println!(
            "  {:<4} {:<28} {:<17} {:<17} {}",
            token.id.to_string().bright_black(),
            token.name.cyan(),
            token.created_at.format("%Y-%m-%d %H:%M").to_string(),
            last_used.bright_black(),
            status
        );
    }

    println!();
    println!("  Total: {}", tokens.len().to_string().bold());

    Ok(())
}

/// Revokes a token by numeric ID or exact name after confirmation.
async fn revoke_token(repo: &PgTokenRepository, name_or_id: String) -> Result<()> {
    let token = match name_or_id.parse::<i64>() {
        Ok(id) => repo.find_by_id(id).await,
        Err(_) => repo.find_by_name(&name_or_id).await,
    }
    .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
    .context("Token not found")?;

    if token.is_revoked() {
        println!("{}", "Token is already revoked".yellow());
        return Ok(());
    }

    let confirmed = Confirm::new()
        .with_prompt(format!("Revoke token '{}' (id {})?", token.name, token.id))
        .default(false)
        .interact()?;

    if !confirmed {
        println!("{}", "Cancelled".red());
        return Ok(());
    }

    repo.revoke_token(token.id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to revoke token: {}", e))?;

    println!("{}", "Token revoked.".green().bold());

    Ok(())
}

async fn handle_link_action(action: LinkAction, pool: &PgPool) -> Result<()> {
    let repo = Arc::new(PgLinkRepository::new(Arc::new(pool.clone())));

    match action {
        LinkAction::Create { url, slug } => {
            let resolver = ResolverService::new(repo, Arc::new(NullCache::new()));
            let link = resolver
                .create_manual(slug.as_deref(), &url)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to create link: {}", e))?;

            println!("{}", "Link created.".green().bold());
            println!("  ID:     {}", link.id.to_string().bright_black());
            println!("  Slug:   {}", link.slug.cyan());
            println!("  Target: {}", link.target_url);
            println!("  Path:   /out/{}", link.slug);
        }
        LinkAction::List { page, page_size } => {
            if page < 1 || !(1..=1000).contains(&page_size) {
                anyhow::bail!("page must be >= 1 and page-size between 1 and 1000");
            }

            let links = repo
                .list(page, page_size)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to list links: {}", e))?;
            let total = repo
                .count()
                .await
                .map_err(|e| anyhow::anyhow!("Failed to count links: {}", e))?;

            println!(
                "  {:<6} {:<40} {:>8} {:<6} {}",
                "ID".bright_white().bold(),
                "Slug".bright_white().bold(),
                "Clicks".bright_white().bold(),
                "Kind".bright_white().bold(),
                "Target".bright_white().bold()
            );
            println!("  {}", "-".repeat(100).bright_black());

            for link in &links {
                let kind = if link.is_manual { "manual" } else { "auto" };
                println!(
                    "  {:<6} {:<40} {:>8} {:<6} {}",
                    link.id.to_string().bright_black(),
                    link.slug.cyan(),
                    link.clicks,
                    kind,
                    link.target_url
                );
            }

            println!();
            println!(
                "  Page {} ({} of {} links)",
                page,
                links.len(),
                total.to_string().bold()
            );
        }
    }

    Ok(())
}

/// Shows link, click and token counts.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "Statistics".bright_blue().bold());
    println!();

    let links_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM affiliate_links")
        .fetch_one(pool)
        .await?;

    let counted_clicks: i64 =
        sqlx::query_scalar("SELECT COALESCE(SUM(clicks), 0)::BIGINT FROM affiliate_links")
            .fetch_one(pool)
            .await?;

    let raw_clicks: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM affiliate_clicks")
        .fetch_one(pool)
        .await?;

    let rollup_days: i64 =
        sqlx::query_scalar("SELECT COUNT(DISTINCT day) FROM affiliate_daily_stats")
            .fetch_one(pool)
            .await?;

    let tokens_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM api_tokens WHERE revoked_at IS NULL")
            .fetch_one(pool)
            .await?;

    println!("  Links:          {}", links_count.to_string().bright_green().bold());
    println!("  Counted clicks: {}", counted_clicks.to_string().bright_green().bold());
    println!("  Raw clicks:     {}", raw_clicks.to_string().bright_green().bold());
    println!("  Rolled-up days: {}", rollup_days.to_string().bright_green().bold());
    println!("  Active tokens:  {}", tokens_count.to_string().bright_green().bold());
    println!();

    Ok(())
}

async fn handle_maintenance_action(
    action: MaintenanceAction,
    pool: &PgPool,
    config: &Config,
) -> Result<()> {
    match action {
        MaintenanceAction::Run => {
            let repo = Arc::new(PgMaintenanceRepository::new(Arc::new(pool.clone())));
            let service = MaintenanceService::new(repo, config.click_retention_days);

            let report = service
                .run(Utc::now())
                .await
                .map_err(|e| anyhow::anyhow!("Maintenance failed: {}", e))?;

            println!("{}", "Maintenance complete.".green().bold());
            println!("  Rolled-up (link, day) rows: {}", report.rolled_up_days);
            println!("  Pruned raw clicks:          {}", report.pruned_clicks);
        }
    }

    Ok(())
}

async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "Database connection OK".green().bold());
        }
        DbAction::Info => {
            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
                .fetch_one(pool)
                .await
                .unwrap_or(0);

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Applied migrations: {}", applied);
        }
    }

    Ok(())
}
