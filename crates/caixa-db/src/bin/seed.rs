//! # Demo Catalog Seeder
//!
//! Writes a small Brazilian convenience-store catalog into the POS snapshot.
//!
//! ## Usage
//! ```bash
//! cargo run -p caixa-db --bin seed
//! cargo run -p caixa-db --bin seed -- --db ./data/caixa.db
//! cargo run -p caixa-db --bin seed -- --key outra-loja --force
//! ```
//!
//! An existing snapshot that already has products is left alone unless
//! `--force` is given. `--force` replaces the catalog and keeps the sale
//! history.

use caixa_core::{NewProduct, PosState, DEFAULT_LOW_STOCK_THRESHOLD, DEFAULT_STORAGE_KEY};
use caixa_db::{Database, DbConfig};
use std::env;

/// (category, name, sku, cost centavos, sale centavos, stock)
const CATALOG: &[(&str, &str, &str, i64, i64, u32)] = &[
    ("Bebidas", "Coca-Cola 350ml", "BEB-001", 550, 899, 48),
    ("Bebidas", "Guaraná Antarctica 2L", "BEB-002", 620, 1099, 24),
    ("Bebidas", "Água Mineral 500ml", "BEB-003", 120, 300, 60),
    ("Bebidas", "Suco de Laranja 1L", "BEB-004", 480, 850, 12),
    ("Mercearia", "Arroz Tipo 1 5kg", "MER-001", 1890, 2790, 15),
    ("Mercearia", "Feijão Carioca 1kg", "MER-002", 590, 899, 30),
    ("Mercearia", "Café Torrado 500g", "MER-003", 1150, 1790, 18),
    ("Mercearia", "Açúcar Refinado 1kg", "MER-004", 350, 549, 4),
    ("Padaria", "Pão Francês (un)", "PAD-001", 35, 90, 120),
    ("Padaria", "Pão de Queijo 1kg", "PAD-002", 1400, 2490, 3),
    ("Laticínios", "Leite Integral 1L", "LAT-001", 410, 629, 36),
    ("Laticínios", "Queijo Minas Frescal 500g", "LAT-002", 1290, 1990, 6),
    ("Limpeza", "Detergente 500ml", "LIM-001", 180, 349, 40),
    ("Limpeza", "Sabão em Pó 1kg", "LIM-002", 990, 1590, 2),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./caixa_dev.db");
    let mut key = String::from(DEFAULT_STORAGE_KEY);
    let mut force = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if let Some(value) = args.get(i + 1) {
                    db_path = value.clone();
                    i += 1;
                }
            }
            "--key" | "-k" => {
                if let Some(value) = args.get(i + 1) {
                    key = value.clone();
                    i += 1;
                }
            }
            "--force" | "-f" => force = true,
            "--help" | "-h" => {
                println!("Caixa POS demo catalog seeder");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./caixa_dev.db)");
                println!("  -k, --key <KEY>    Snapshot key (default: {})", DEFAULT_STORAGE_KEY);
                println!("  -f, --force        Replace an existing catalog");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => eprintln!("Ignoring unknown argument: {}", other),
        }
        i += 1;
    }

    println!("🌱 Caixa POS Seed");
    println!("=================");
    println!("Database: {}", db_path);
    println!("Key:      {}", key);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected, migrations applied");

    let repo = db.snapshots();
    let mut state: PosState = repo.load(&key).await?.unwrap_or_default();

    if !state.products.is_empty() && !force {
        println!("⚠ Snapshot already has {} products", state.products.len());
        println!("  Use --force to replace the catalog.");
        return Ok(());
    }

    state.products.clear();
    state.clear_cart();

    for &(category, name, sku, cost, sale, stock) in CATALOG {
        state.add_product(NewProduct {
            name: name.to_string(),
            sku: sku.to_string(),
            cost_price_cents: cost,
            sale_price_cents: sale,
            stock,
            category: category.to_string(),
        });
    }

    repo.save(&key, &state).await?;

    println!("✓ Wrote {} products", state.products.len());
    println!(
        "  Low stock (≤ {}): {}",
        DEFAULT_LOW_STOCK_THRESHOLD,
        state.low_stock(DEFAULT_LOW_STOCK_THRESHOLD).len()
    );
    println!();
    println!("✓ Seed complete!");

    db.close().await;
    Ok(())
}
