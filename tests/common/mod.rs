use std::fs::File;
use std::io::Error;
use std::path::Path;

pub fn generate_catalog_csv(path: &Path, products: usize, stock: u32) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);

    wtr.write_record(["product", "price", "stock", "active"])?;
    for i in 1..=products {
        wtr.write_record([&format!("P{i}"), "9.99", &stock.to_string(), "true"])?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn generate_commands_csv(path: &Path, rows: usize) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);

    wtr.write_record(["op", "owner", "product", "quantity", "code"])?;
    for _ in 0..rows {
        wtr.write_record(["add", "alice", "P1", "1", ""])?;
    }

    wtr.flush()?;
    Ok(())
}
