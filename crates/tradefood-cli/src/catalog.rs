//! Catalog command handlers.

use clap::Subcommand;
use tradefood_backend::ProductQuery;
use tradefood_core::{format_eur, AppConfig, Product};

/// Sub-commands available under `products`.
#[derive(Debug, Subcommand)]
pub enum ProductsCommands {
    /// List products
    List {
        /// Category identifier to filter on
        #[arg(long)]
        category: Option<String>,
        /// Free-text search
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one product in detail
    Show {
        /// Product identifier
        id: String,
    },
}

pub(crate) async fn run_products(config: &AppConfig, command: ProductsCommands) -> anyhow::Result<()> {
    let client = crate::build_client(config)?;
    match command {
        ProductsCommands::List { category, search } => {
            let products = client
                .list_products(&ProductQuery { category, search })
                .await?;
            if products.is_empty() {
                println!("no products found");
                return Ok(());
            }
            println!("{:<12}{:<14}{:<9}TITLE", "ID", "PRICE", "STOCK");
            for product in &products {
                println!(
                    "{:<12}{:<14}{:<9}{}",
                    product.id,
                    price_label(product),
                    if product.in_stock { "yes" } else { "no" },
                    product.title
                );
            }
        }
        ProductsCommands::Show { id } => {
            let product = client.get_product(&id).await?;
            print_product(&product);
        }
    }
    Ok(())
}

pub(crate) async fn run_categories(config: &AppConfig) -> anyhow::Result<()> {
    let client = crate::build_client(config)?;
    let categories = client.list_categories().await?;
    if categories.is_empty() {
        println!("no categories found");
        return Ok(());
    }
    for category in &categories {
        match category.slug.as_deref() {
            Some(slug) => println!("{:<12}{} ({slug})", category.id, category.name),
            None => println!("{:<12}{}", category.id, category.name),
        }
    }
    Ok(())
}

/// Price with the discount shown when the product is on sale.
pub(crate) fn price_label(product: &Product) -> String {
    match product.discount_percent() {
        Some(pct) if pct > 0 => format!("{} -{pct}%", format_eur(product.price)),
        _ => format_eur(product.price),
    }
}

fn print_product(product: &Product) {
    println!("{}", product.title);
    println!("  id:        {}", product.id);
    println!("  price:     {}", price_label(product));
    if let Some(original) = product.original_price.filter(|_| product.is_on_sale()) {
        println!("  was:       {}", format_eur(original));
    }
    println!("  in stock:  {}", if product.in_stock { "yes" } else { "no" });
    if let Some(category) = &product.category {
        println!("  category:  {category}");
    }
    if let Some(rating) = product.rating {
        let reviews = product.review_count.unwrap_or(0);
        println!("  rating:    {rating:.1}/5 ({reviews} reviews)");
    }
    for (label, value) in [
        ("origin", &product.origin),
        ("weight", &product.weight),
        ("dimensions", &product.dimensions),
    ] {
        if let Some(value) = value {
            println!("  {:<11}{value}", format!("{label}:"));
        }
    }
    println!("  image:     {}", product.image);
    if !product.description.is_empty() {
        println!();
        println!("{}", product.description);
    }
}
