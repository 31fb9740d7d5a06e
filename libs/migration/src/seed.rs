//! Demo inventory for local development.

use sea_orm::{ConnectionTrait, DbBackend, DbErr, Statement, Value};

/// `(name, description, price, stock)`
pub const DEMO_PRODUCTS: [(&str, &str, f64, i64); 5] = [
    (
        "Laptop Gaming ASUS ROG",
        "Laptop gaming dengan spesifikasi tinggi, processor Intel Core i7, RAM 16GB, SSD 512GB, VGA RTX 3060",
        18500000.0,
        15,
    ),
    (
        "Mouse Logitech G502",
        "Mouse gaming dengan sensor optik presisi tinggi, 11 tombol programmable",
        850000.0,
        50,
    ),
    (
        "Keyboard Mechanical Keychron K2",
        "Keyboard mechanical wireless dengan switch Gateron Brown, RGB backlight",
        1200000.0,
        30,
    ),
    (
        "Monitor LG UltraWide 34\"",
        "Monitor ultrawide 34 inch, resolusi 3440x1440, refresh rate 144Hz, HDR support",
        7500000.0,
        10,
    ),
    (
        "Headset HyperX Cloud II",
        "Gaming headset dengan virtual 7.1 surround sound, microphone noise-cancelling",
        1100000.0,
        25,
    ),
];

const INSERT_PRODUCT: &str =
    "INSERT INTO products (name, description, price, stock) VALUES ($1, $2, $3, $4)";

/// Insert [`DEMO_PRODUCTS`] when the products table is empty.
///
/// Returns the number of rows inserted; `0` when data already exists.
pub async fn seed_demo_products<C: ConnectionTrait>(db: &C) -> Result<u64, DbErr> {
    let existing = db
        .query_one_raw(Statement::from_string(
            DbBackend::Postgres,
            "SELECT COUNT(*) AS count FROM products",
        ))
        .await?
        .map(|row| row.try_get::<i64>("", "count"))
        .transpose()?
        .unwrap_or_default();

    if existing > 0 {
        tracing::info!(existing, "Products table already has data, skipping seed");
        return Ok(0);
    }

    let mut inserted = 0;
    for (name, description, price, stock) in DEMO_PRODUCTS {
        let result = db
            .execute_raw(Statement::from_sql_and_values(
                DbBackend::Postgres,
                INSERT_PRODUCT,
                [
                    Value::from(name),
                    Value::from(description),
                    Value::from(price),
                    Value::from(stock),
                ],
            ))
            .await?;
        inserted += result.rows_affected();
    }

    tracing::info!(inserted, "Seeded demo products");
    Ok(inserted)
}
