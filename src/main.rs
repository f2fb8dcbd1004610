//! Catalog CLI

use std::path::PathBuf;

use catalog_console::app_system::{setup_tracing, CatalogConfig, CatalogSystem};
use catalog_console::domain::{format_price, ListSnapshot, Product, ProductId};
use catalog_console::form::ProductForm;
use catalog_console::notifier::NotificationFeed;
use clap::{Args, Parser, Subcommand};
use tabled::builder::Builder;
use tabled::settings::object::{Columns, Rows};
use tabled::settings::{Alignment, Color, Style};
use tracing::{info, Instrument};

#[derive(Debug, Parser)]
#[command(name = "catalog", about = "Product catalog console", long_about = None)]
struct Cli {
    #[command(flatten)]
    config: CatalogConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show one page of products
    List {
        /// Zero-based page index
        #[arg(long, default_value_t = 0)]
        page: u32,
    },
    /// Search products by name
    Search { query: String },
    /// Fetch a single product
    Show { id: ProductId },
    /// Delete a product
    Delete { id: ProductId },
    /// Create a product
    Create(CreateArgs),
    /// Edit a product; omitted fields keep their current value
    Edit(EditArgs),
}

#[derive(Debug, Args)]
struct CreateArgs {
    #[arg(long)]
    name: String,

    #[arg(long)]
    description: String,

    /// Price as typed into the price field: its digits are read as cents
    #[arg(long)]
    price: String,

    /// Image file to upload (jpeg or png)
    #[arg(long)]
    image: PathBuf,
}

#[derive(Debug, Args)]
struct EditArgs {
    id: ProductId,

    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    description: Option<String>,

    /// Price as typed into the price field: its digits are read as cents
    #[arg(long)]
    price: Option<String>,

    /// Replacement image file
    #[arg(long)]
    image: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let _env = dotenvy::dotenv();
    let cli = Cli::parse();

    setup_tracing();
    info!(command = ?cli.command, "Starting catalog console");

    let mut system = CatalogSystem::new(&cli.config);
    let span = tracing::info_span!("command");
    let result = execute(&system, cli.command).instrument(span).await;

    print_notifications(&mut system.notifications);
    system.shutdown().await?;
    result
}

async fn execute(system: &CatalogSystem, command: Commands) -> Result<(), String> {
    match command {
        Commands::List { page } => {
            let size = system.list_client.snapshot().await.map_err(|e| e.to_string())?.page_size;
            let snapshot = system
                .list_client
                .load_page(page, size)
                .await
                .map_err(|e| e.to_string())?;
            print_snapshot(&snapshot);
        }
        Commands::Search { query } => {
            let snapshot = system
                .list_client
                .on_search_input(query)
                .await
                .map_err(|e| e.to_string())?;
            print_snapshot(&snapshot);
        }
        Commands::Show { id } => {
            let product = system.gateway.get_by_id(id).await.map_err(|e| e.to_string())?;
            println!("{}", products_table(std::slice::from_ref(&product)));
            println!("{}", product.description);
        }
        Commands::Delete { id } => {
            // Make sure the row is on screen before removing it.
            let size = system.list_client.snapshot().await.map_err(|e| e.to_string())?.page_size;
            system
                .list_client
                .load_page(0, size)
                .await
                .map_err(|e| e.to_string())?;
            let snapshot = system
                .list_client
                .on_delete_requested(id)
                .await
                .map_err(|e| e.to_string())?;
            print_snapshot(&snapshot);
        }
        Commands::Create(args) => {
            let (mut form, handle) = system.open_create();
            form.set_name(args.name);
            form.set_description(args.description);
            form.input_price(&args.price);
            form.select_image_path(&args.image)
                .await
                .map_err(|e| e.to_string())?;
            submit(form).await?;

            let outcome = handle.closed().await;
            let snapshot = system
                .list_client
                .on_dialog_closed(&outcome)
                .await
                .map_err(|e| e.to_string())?;
            print_snapshot(&snapshot);
        }
        Commands::Edit(args) => {
            let (mut form, handle) = system.open_edit(args.id).await.map_err(|e| e.to_string())?;
            if let Some(name) = args.name {
                form.set_name(name);
            }
            if let Some(description) = args.description {
                form.set_description(description);
            }
            if let Some(price) = args.price {
                form.input_price(&price);
            }
            if let Some(image) = args.image {
                form.select_image_path(&image)
                    .await
                    .map_err(|e| e.to_string())?;
            }
            submit(form).await?;

            let outcome = handle.closed().await;
            let snapshot = system
                .list_client
                .on_dialog_closed(&outcome)
                .await
                .map_err(|e| e.to_string())?;
            print_snapshot(&snapshot);
        }
    }
    Ok(())
}

/// Submits once; a failed submit cancels the dialog since there is no one to
/// retry.
async fn submit(mut form: ProductForm) -> Result<(), String> {
    println!("Price: {}", form.price().display());
    match form.submit().await {
        Ok(saved) => {
            info!(product_id = ?saved.product.id, "Saved");
            Ok(())
        }
        Err(e) => {
            form.cancel();
            Err(e.to_string())
        }
    }
}

fn products_table(products: &[Product]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["ID", "Name", "Price", "Image"]);
    for product in products {
        builder.push_record([
            product.id.map(|id| id.to_string()).unwrap_or_default(),
            product.name.clone(),
            format_price(product.price),
            product.image.clone().unwrap_or_default(),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(2..3), Alignment::right());
    table.to_string()
}

fn print_snapshot(snapshot: &ListSnapshot) {
    println!("{}", products_table(&snapshot.items));
    match &snapshot.active_query {
        Some(query) => println!("{} result(s) for \"{query}\"", snapshot.items.len()),
        None => {
            let pages = snapshot.total_count.div_ceil(u64::from(snapshot.page_size.max(1)));
            println!(
                "Page {} of {} ({} products)",
                snapshot.current_page + 1,
                pages.max(1),
                snapshot.total_count
            );
        }
    }
}

fn print_notifications(feed: &mut NotificationFeed) {
    for notification in feed.drain() {
        eprintln!("[{}] {}", notification.level, notification.message);
    }
}
