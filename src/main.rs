use clap::Parser;
use miette::{IntoDiagnostic, Result};
use quickcart::application::service::CartService;
use quickcart::domain::ports::{CartRepositoryBox, CatalogLookupBox, CouponLookupBox};
use quickcart::infrastructure::in_memory::{
    InMemoryCartRepository, InMemoryCatalog, InMemoryCoupons,
};
#[cfg(feature = "storage-rocksdb")]
use quickcart::infrastructure::rocksdb::RocksDbCartStore;
use quickcart::interfaces::csv::catalog_reader::{CatalogReader, CouponReader};
use quickcart::interfaces::csv::command_reader::CommandReader;
use quickcart::interfaces::csv::summary_writer::SummaryWriter;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input cart commands CSV file
    input: PathBuf,

    /// Product catalog CSV file
    #[arg(long)]
    catalog: PathBuf,

    /// Coupon definitions CSV file (optional)
    #[arg(long)]
    coupons: Option<PathBuf>,

    /// Path to persistent cart database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    // Load the product catalog
    let file = File::open(&cli.catalog).into_diagnostic()?;
    let products = CatalogReader::new(file)
        .products()
        .collect::<quickcart::error::Result<Vec<_>>>()
        .into_diagnostic()?;
    let catalog: CatalogLookupBox = Box::new(InMemoryCatalog::with_products(products));

    // Load coupon definitions, if any
    let coupons = match &cli.coupons {
        Some(path) => {
            let file = File::open(path).into_diagnostic()?;
            CouponReader::new(file)
                .coupons()
                .collect::<quickcart::error::Result<Vec<_>>>()
                .into_diagnostic()?
        }
        None => Vec::new(),
    };
    let coupons: CouponLookupBox = Box::new(InMemoryCoupons::with_coupons(coupons));

    let carts: CartRepositoryBox = match cli.db_path {
        #[cfg(feature = "storage-rocksdb")]
        Some(db_path) => Box::new(RocksDbCartStore::open(db_path).into_diagnostic()?),
        #[cfg(not(feature = "storage-rocksdb"))]
        Some(_) => {
            return Err(miette::miette!(
                "persistent storage requires building with the storage-rocksdb feature"
            ));
        }
        None => Box::new(InMemoryCartRepository::new()),
    };

    let service = CartService::new(catalog, coupons, carts);

    // Process commands
    let file = File::open(cli.input).into_diagnostic()?;
    let reader = CommandReader::new(file);
    for command in reader.commands() {
        match command {
            Ok(command) => {
                if let Err(e) = service.execute(command).await {
                    eprintln!("Error applying command: {}", e);
                }
            }
            Err(e) => {
                eprintln!("Error reading command: {}", e);
            }
        }
    }

    // Collect final cart states
    let carts = service.into_carts().await.into_diagnostic()?;

    // Output final summaries
    let stdout = io::stdout();
    let mut writer = SummaryWriter::new(stdout.lock());
    writer.write_carts(carts).into_diagnostic()?;

    Ok(())
}
