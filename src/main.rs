use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};

use pricewatch::api::{Id, Product};
use pricewatch::app::Context;
use pricewatch::feed::{FeedController, FeedOutcome, LoadMode};
use pricewatch::history::{Comparison, PriceStats, format_price};
use pricewatch::{ArcPath, ArcStr};

#[derive(Parser)]
#[command(name = "pricewatch")]
#[command(about = "Browse products and price history from a price tracker API")]
struct Cli {
    /// Configuration file [default: ~/.config/pricewatch/config.toml]
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Browsing session whose cached responses are reused
    #[arg(long, global = true, default_value = "default")]
    session: String,
    /// Discard the session cache before exiting
    #[arg(long, global = true)]
    end_session: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products, optionally filtered
    Products {
        /// Only products whose name matches this text
        #[arg(short, long)]
        search: Option<String>,
        /// Category id
        #[arg(short, long)]
        category: Option<Id>,
        /// Platform id
        #[arg(short, long)]
        platform: Option<Id>,
        /// Number of pages to load
        #[arg(long, default_value = "1")]
        pages: u32,
    },
    /// List product categories
    Categories,
    /// List tracked platforms
    Platforms,
    /// Show the price history of a product
    History {
        #[arg(required = true)]
        id: Id,
    },
    /// Compare the price histories of two products
    Compare {
        #[arg(required = true)]
        first: Id,
        #[arg(required = true)]
        second: Id,
    },
    /// Show aggregate statistics
    Stats,
    /// Search interactively: each line typed on stdin refines the search
    Search,
}

fn default_config_path() -> PathBuf {
    let home = std::env::var_os("HOME").unwrap_or_else(|| ".".into());
    PathBuf::from(home)
        .join(".config")
        .join("pricewatch")
        .join("config.toml")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = ArcPath::from(cli.config.unwrap_or_else(default_config_path));
    let ctx = Context::build(config_path, ArcStr::from(cli.session)).await?;
    ctx.log.info("main", "Starting pricewatch CLI");

    let result = match cli.command {
        Commands::Products {
            search,
            category,
            platform,
            pages,
        } => handle_products_command(&ctx, search, category, platform, pages).await,
        Commands::Categories => handle_categories_command(&ctx).await,
        Commands::Platforms => handle_platforms_command(&ctx).await,
        Commands::History { id } => handle_history_command(&ctx, id).await,
        Commands::Compare { first, second } => handle_compare_command(&ctx, first, second).await,
        Commands::Stats => handle_stats_command(&ctx).await,
        Commands::Search => handle_search_command(&ctx).await,
    };

    let result = ctx.log.error_on_error("main", result);
    ctx.shutdown(cli.end_session).await?;
    result
}

fn print_products(products: &[Product]) {
    for (i, product) in products.iter().enumerate() {
        println!("{}. [{}] {}", i + 1, product.id, product.name);
        println!(
            "   {} on {}{}",
            format_price(product.current_price),
            product.platform,
            product
                .category
                .as_ref()
                .map(|c| format!(" ({})", c))
                .unwrap_or_default()
        );
        println!("   {}", product.url);
        println!("   Image: {}", product.image());
    }
}

/// Loads the first page, then appends until `pages` pages are shown or the
/// feed runs out.
async fn handle_products_command(
    ctx: &Context,
    search: Option<String>,
    category: Option<Id>,
    platform: Option<Id>,
    pages: u32,
) -> anyhow::Result<()> {
    let feed = ctx.feed();
    if let Some(search) = search {
        feed.set_search(&search).await;
    }
    feed.set_category(category).await;
    feed.set_platform(platform).await;

    let mut outcome = feed.load_page(LoadMode::Replace).await;
    for _ in 1..pages {
        match outcome {
            FeedOutcome::Loaded { has_next: true, .. } => {
                outcome = feed.load_page(LoadMode::Append).await;
            }
            _ => break,
        }
    }
    if let FeedOutcome::Failed(err) = outcome {
        return Err(err).context("Loading products");
    }

    let snapshot = feed.snapshot().await;
    println!(
        "Products (page {} of the feed, {} items{}):",
        snapshot.cursor.page,
        snapshot.items.len(),
        if snapshot.cursor.has_next {
            ", more available"
        } else {
            ""
        }
    );
    println!();
    print_products(&snapshot.items);
    Ok(())
}

async fn handle_categories_command(ctx: &Context) -> anyhow::Result<()> {
    let categories = ctx.api.categories().await?;
    println!("Categories:");
    for category in categories {
        let count = category
            .product_count
            .map(|n| format!(" ({} products)", n))
            .unwrap_or_default();
        println!("  [{}] {}{}", category.id, category.name, count);
    }
    Ok(())
}

async fn handle_platforms_command(ctx: &Context) -> anyhow::Result<()> {
    let platforms = ctx.api.platforms().await?;
    println!("Platforms:");
    for platform in platforms {
        let count = platform
            .product_count
            .map(|n| format!(" ({} products)", n))
            .unwrap_or_default();
        println!("  [{}] {}{}", platform.id, platform.name, count);
        if let Some(url) = platform.url {
            println!("      {}", url);
        }
    }
    Ok(())
}

fn print_stats(stats: &PriceStats) {
    println!("   Current: {}", format_price(stats.current));
    println!("   Lowest:  {}", format_price(stats.lowest));
    println!("   Highest: {}", format_price(stats.highest));
    println!("   Average: {}", format_price(stats.average));
}

async fn handle_history_command(ctx: &Context, id: Id) -> anyhow::Result<()> {
    let detail = ctx.api.product(id).await?;
    println!("{} ({})", detail.product.name, detail.product.platform);
    if let Some(description) = &detail.description {
        println!("{}", description);
    }
    println!();
    print_stats(&PriceStats::from_detail(&detail));
    println!();

    if detail.price_history.is_empty() {
        println!("No price history available");
    }
    for point in &detail.price_history {
        println!(
            "  {}  {}",
            point.timestamp.format("%Y-%m-%d %H:%M UTC"),
            format_price(point.price)
        );
    }
    Ok(())
}

async fn handle_compare_command(ctx: &Context, first: Id, second: Id) -> anyhow::Result<()> {
    let comparison = Comparison::load(&ctx.api, first, second).await?;
    for (series, stats) in comparison.series().iter().zip(comparison.stats()) {
        println!("{} ({} observations)", series.name, series.points.len());
        print_stats(&stats);
        println!();
    }
    Ok(())
}

async fn handle_stats_command(ctx: &Context) -> anyhow::Result<()> {
    let stats = ctx.api.stats().await?;
    println!("Products:   {}", stats.total_products);
    println!("Platforms:  {}", stats.platforms);
    println!("Categories: {}", stats.categories);
    println!(
        "Last 24h:   {} price increases, {} decreases",
        stats.price_increases, stats.price_decreases
    );
    for platform in stats.platform_stats.values() {
        println!("  {}: {} products", platform.name, platform.total_products);
    }
    Ok(())
}

/// Prints the first page of results for the current search.
async fn refresh(feed: &FeedController, text: String) {
    feed.set_search(&text).await;
    match feed.load_page(LoadMode::Replace).await {
        FeedOutcome::Loaded { .. } => {
            let snapshot = feed.snapshot().await;
            println!("--- {:?}: {} results", text.trim(), snapshot.items.len());
            print_products(&snapshot.items);
        }
        FeedOutcome::Failed(err) => eprintln!("Search failed: {}", err),
        FeedOutcome::Superseded | FeedOutcome::Busy | FeedOutcome::Exhausted => {}
    }
}

async fn handle_search_command(ctx: &Context) -> anyhow::Result<()> {
    let feed = ctx.feed();
    let report = feed.load_filter_options().await;
    for err in &report.errors {
        eprintln!("Filter options unavailable: {}", err);
    }

    let search = ctx
        .debounce(move |text: String| {
            let feed = feed.clone();
            async move { refresh(&feed, text).await }
        })
        .await;

    println!("Type to search, end input with Ctrl-D");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Reading stdin")? {
        search.call(line);
    }
    search.flush().await;
    Ok(())
}
