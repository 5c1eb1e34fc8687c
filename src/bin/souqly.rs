// Command-line client for the Souq marketplace backend.
//
// Thin consumer of the library: signs in, browses the catalog, prints the
// category tree. Mostly useful for poking at an environment without the app.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;

use souqly_client::categories::flatten_tree;
use souqly_client::models::RecommendationKind;
use souqly_client::products::ProductFilters;
use souqly_client::search::DEFAULT_PAGE_SIZE;
use souqly_client::{ApiArgs, ApiClient, ApiConfig, SqliteTokenStore};

/// Souq marketplace API client
#[derive(Parser)]
#[command(name = "souqly")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Souq marketplace API client", long_about = None)]
struct Cli {
    #[command(flatten)]
    api: ApiArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and persist the session
    Login { email: String, password: String },
    /// Drop the local session and tell the backend
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Browse the product catalog
    Products {
        #[arg(long)]
        category: Option<i64>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value_t = 0)]
        page: u32,
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        size: u32,
    },
    /// Full-text product search
    Search {
        query: String,
        #[arg(long, default_value_t = 0)]
        page: u32,
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        size: u32,
    },
    /// Print the category tree
    Categories,
    /// List the signed-in user's favorites
    Favorites,
    /// Recommendations for the signed-in user
    ForMe {
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (safe to ignore if not found)
    let _ = dotenvy::dotenv();
    env_logger::init();

    let cli = Cli::parse();
    let cfg = ApiConfig::resolve(cli.api).context("Failed to load configuration")?;
    let store = Arc::new(SqliteTokenStore::open(&cfg.token_db));
    let client = ApiClient::new(cfg, store).context("Failed to build API client")?;

    match cli.command {
        Command::Login { email, password } => {
            let auth = client.login(&email, &password).await?;
            println!(
                "signed in as {} (user {}, role {})",
                auth.user.email.as_deref().unwrap_or(&email),
                auth.user.id,
                auth.user.role.to_lowercase()
            );
        }
        Command::Logout => {
            client.logout().await?;
            println!("signed out");
        }
        Command::Whoami => {
            let user = client.current_user().await?;
            println!(
                "{} {} <{}> {:?}/{:?}",
                user.first_name, user.last_name, user.email, user.role, user.status
            );
        }
        Command::Products {
            category,
            search,
            page,
            size,
        } => {
            let filters = ProductFilters {
                category_id: category,
                search,
                page: Some(page),
                page_size: Some(size),
                ..Default::default()
            };
            let listing = client.products().list(&filters).await?;
            println!(
                "page {}/{} ({} products total)",
                listing.current_page + 1,
                listing.total_pages,
                listing.total_elements
            );
            for product in &listing.content {
                print_product(product);
            }
        }
        Command::Search { query, page, size } => {
            let listing = client.search().products(Some(&query), page, size).await?;
            println!("{} results for '{query}'", listing.total_elements);
            for product in &listing.content {
                print_product(product);
            }
        }
        Command::Categories => {
            let tree = client.categories().tree().await?;
            for (depth, cat) in flatten_tree(&tree) {
                println!("{}{} [{}]", "  ".repeat(depth), cat.label, cat.key);
            }
        }
        Command::Favorites => {
            let favorites = client.products().favorites().await?;
            if favorites.is_empty() {
                println!("no favorites yet");
            }
            for product in &favorites {
                print_product(product);
            }
        }
        Command::ForMe { limit } => {
            let products = client
                .recommendations()
                .for_me(limit, RecommendationKind::Hybrid)
                .await?;
            for product in &products {
                print_product(product);
            }
        }
    }

    Ok(())
}

fn print_product(product: &souqly_client::models::Product) {
    println!(
        "#{:<8} {:>8.2} EUR  {} ({}, {} favorites)",
        product.id, product.price, product.title, product.condition, product.favorite_count
    );
}
