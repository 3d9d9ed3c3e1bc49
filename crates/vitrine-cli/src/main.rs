use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use vitrine_core::query::build_params;
use vitrine_core::{
    parse_price_bound, CatalogQuery, CategoryGraph, Facet, ListingPage, SortKey,
};
use vitrine_listing::ListingClient;

#[derive(Debug, Parser)]
#[command(name = "vitrine")]
#[command(about = "Catalog query client for a remote product-listing service")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Browse a category listing with optional facet and price filters.
    Browse {
        /// Category slug, e.g. "mens-shirts".
        category: String,
        #[arg(long)]
        brand: Vec<String>,
        #[arg(long)]
        color: Vec<String>,
        #[arg(long)]
        size: Vec<String>,
        #[arg(long)]
        min_price: Option<String>,
        #[arg(long)]
        max_price: Option<String>,
        /// One of: newest, oldest, price-desc, price-asc.
        #[arg(long, default_value = "newest")]
        sort: SortKey,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Search the whole catalog by free text.
    Search {
        text: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Print the category tree, optionally restricted to one root.
    Categories { root: Option<String> },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let config = vitrine_core::load_app_config_from_env()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let client = ListingClient::from_config(&config).context("constructing listing client")?;
    tracing::debug!(base_url = %config.listing_base_url, "listing client ready");
    match cli.command {
        Commands::Browse {
            category,
            brand,
            color,
            size,
            min_price,
            max_price,
            sort,
            page,
        } => {
            let mut query = CatalogQuery::new(category, config.page_size);
            for value in brand {
                query.facets = query.facets.toggle(Facet::Brand, value);
            }
            for value in color {
                query.facets = query.facets.toggle(Facet::Color, value);
            }
            for value in size {
                query.facets = query.facets.toggle(Facet::Size, value);
            }
            query.price.min = min_price
                .as_deref()
                .map(parse_price_bound)
                .transpose()
                .context("--min-price")?;
            query.price.max = max_price
                .as_deref()
                .map(parse_price_bound)
                .transpose()
                .context("--max-price")?;
            query.sort = sort;
            query.page = page.max(1);

            let listing = client.search_products(&build_params(&query)).await?;
            print_page(&listing, query.page, query.page_size);
        }
        Commands::Search { text, page } => {
            let mut query = CatalogQuery::new("all", config.page_size);
            query.search = Some(text);
            query.page = page.max(1);

            let listing = client.search_products(&build_params(&query)).await?;
            print_page(&listing, query.page, query.page_size);
        }
        Commands::Categories { root } => {
            let categories = client.fetch_categories().await?;
            let graph = CategoryGraph::from_categories(categories);
            print_tree(&graph, root.as_deref());
        }
    }

    Ok(())
}

fn print_page(listing: &ListingPage, page: u32, page_size: u32) {
    for product in &listing.items {
        let brand = product.brand.as_deref().unwrap_or("-");
        let sale_marker = if product.is_on_sale() { " (sale)" } else { "" };
        println!(
            "{:<40} {:<20} {:>10}{}",
            product.name,
            brand,
            product.effective_price(),
            sale_marker
        );
    }
    let pages = (listing.count.max(0) as u64).div_ceil(u64::from(page_size));
    println!(
        "{} products matched, page {page} of {}",
        listing.count,
        pages.max(1)
    );
}

fn print_tree(graph: &CategoryGraph, root: Option<&str>) {
    let mut seen = std::collections::HashSet::new();
    match root {
        Some(slug) => {
            let Some(crumb) = graph.breadcrumb_for(slug) else {
                println!("unknown category: {slug}");
                return;
            };
            if let Some(parent) = crumb.parent {
                println!("{} ({})", parent.name, parent.slug);
            }
            let depth = usize::from(crumb.parent.is_some());
            print_subtree(graph, crumb.current, depth, &mut seen);
        }
        None => {
            for category in graph.all().iter().filter(|c| c.parent_slug.is_none()) {
                print_subtree(graph, category, 0, &mut seen);
            }
        }
    }
}

fn print_subtree(
    graph: &CategoryGraph,
    category: &vitrine_core::Category,
    depth: usize,
    seen: &mut std::collections::HashSet<String>,
) {
    // The seen set bounds recursion even if malformed data contains a
    // parent cycle.
    if !seen.insert(category.slug.clone()) {
        return;
    }
    println!("{}{} ({})", "  ".repeat(depth), category.name, category.slug);
    for child in graph.children_of(&category.slug) {
        print_subtree(graph, child, depth + 1, seen);
    }
}
