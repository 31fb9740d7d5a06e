use migration::{Migrator, seed_demo_products};
use sea_orm_migration::{cli, sea_orm::Database};

#[tokio::main]
async fn main() {
    // `migration seed` loads the demo inventory; everything else is the standard CLI
    if std::env::args().nth(1).as_deref() == Some("seed") {
        if let Err(e) = seed().await {
            eprintln!("Seeding failed: {e}");
            std::process::exit(1);
        }
        return;
    }

    cli::run_cli(Migrator).await;
}

async fn seed() -> Result<(), sea_orm_migration::DbErr> {
    let url = std::env::var("DATABASE_URL")
        .map_err(|_| sea_orm_migration::DbErr::Custom("DATABASE_URL must be set".into()))?;
    let db = Database::connect(&url).await?;
    let inserted = seed_demo_products(&db).await?;
    println!("Inserted {inserted} demo products");
    Ok(())
}
