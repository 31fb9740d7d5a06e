//! Products CLI
//!
//! Command-line client for the products API: list, inspect, create, edit and
//! delete products, with optional image uploads.

use clap::{Args, Parser, Subcommand};
use core_config::Environment;
use core_config::tracing::{init_tracing, install_color_eyre};
use std::io::{BufRead, Write};
use std::path::PathBuf;

mod client;
mod models;
mod render;

use client::{ClientError, ClientResult, ProductsClient};
use models::ProductInput;

#[derive(Parser)]
#[command(name = "products")]
#[command(about = "Manage the product inventory through the products API")]
struct Cli {
    /// API root, e.g. http://localhost:8080/api
    #[arg(long, env = "PRODUCTS_API_URL", default_value = "http://localhost:8080/api")]
    api_url: String,

    /// Log requests (honours RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all products, newest first
    List,

    /// Show one product
    Show { id: i64 },

    /// Create a product
    Create(CreateArgs),

    /// Replace a product's fields; omitted fields keep their current value
    Update {
        id: i64,
        #[command(flatten)]
        fields: UpdateArgs,
    },

    /// Delete a product and its image
    Delete {
        id: i64,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Args)]
struct CreateArgs {
    #[arg(long)]
    name: String,

    #[arg(long)]
    description: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    price: String,

    #[arg(long, allow_hyphen_values = true)]
    stock: String,

    /// jpeg, png, jpg, gif or webp; at most 2048 KB
    #[arg(long)]
    image: Option<PathBuf>,
}

#[derive(Args)]
struct UpdateArgs {
    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    description: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    price: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    stock: Option<String>,

    /// Replaces the stored image
    #[arg(long)]
    image: Option<PathBuf>,
}

impl From<CreateArgs> for ProductInput {
    fn from(args: CreateArgs) -> Self {
        Self {
            name: args.name,
            description: args.description,
            price: args.price,
            stock: args.stock,
            image: args.image,
        }
    }
}

impl UpdateArgs {
    fn apply(self, input: &mut ProductInput) {
        if let Some(name) = self.name {
            input.name = name;
        }
        if let Some(description) = self.description {
            input.description = Some(description);
        }
        if let Some(price) = self.price {
            input.price = price;
        }
        if let Some(stock) = self.stock {
            input.stock = stock;
        }
        input.image = self.image;
    }
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let cli = Cli::parse();
    if cli.verbose {
        init_tracing(&Environment::from_env());
    }

    let client = ProductsClient::new(&cli.api_url);

    match run(&client, cli.command).await {
        Ok(()) => Ok(()),
        Err(ClientError::Validation(errors)) => {
            eprint!("{}", render::field_errors(&errors));
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

async fn run(client: &ProductsClient, command: Commands) -> ClientResult<()> {
    match command {
        Commands::List => {
            print!("{}", render::product_table(&client.list().await?));
        }

        Commands::Show { id } => {
            print!("{}", render::product_detail(&client.get(id).await?));
        }

        Commands::Create(args) => {
            let (product, message) = client.create(&args.into()).await?;
            announce(message, product.id);
            refresh(client).await?;
        }

        Commands::Update { id, fields } => {
            let mut input = ProductInput::from_product(&client.get(id).await?);
            fields.apply(&mut input);

            let (product, message) = client.update(id, &input).await?;
            announce(message, product.id);
            refresh(client).await?;
        }

        Commands::Delete { id, yes } => {
            let prompt = format!("Delete product #{}? [y/N] ", id);
            if !yes && !confirm(&prompt, std::io::stdin().lock(), std::io::stdout())? {
                println!("Cancelled");
                return Ok(());
            }

            let message = client.delete(id).await?;
            announce(message, id);
            refresh(client).await?;
        }
    }

    Ok(())
}

fn announce(message: Option<String>, id: i64) {
    match message {
        Some(message) => println!("{} (#{})", message, id),
        None => println!("Done (#{})", id),
    }
}

/// Re-fetch and print the list after a change
async fn refresh(client: &ProductsClient) -> ClientResult<()> {
    println!();
    print!("{}", render::product_table(&client.list().await?));
    Ok(())
}

/// `true` only for an explicit yes; end of input counts as no
fn confirm(prompt: &str, mut input: impl BufRead, mut output: impl Write) -> ClientResult<bool> {
    output
        .write_all(prompt.as_bytes())
        .and_then(|_| output.flush())
        .map_err(ClientError::Terminal)?;

    let mut answer = String::new();
    input
        .read_line(&mut answer)
        .map_err(ClientError::Terminal)?;

    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_confirm_accepts_only_yes() {
        for (answer, expected) in [
            ("y\n", true),
            ("YES\n", true),
            ("n\n", false),
            ("\n", false),
            ("", false),
            ("maybe\n", false),
        ] {
            let mut output = Vec::new();
            let confirmed = confirm("Delete product #4? [y/N] ", answer.as_bytes(), &mut output).unwrap();
            assert_eq!(confirmed, expected, "answer {:?}", answer);
            assert_eq!(output, b"Delete product #4? [y/N] ");
        }
    }

    #[test]
    fn test_create_accepts_negative_amounts() {
        let cli = Cli::try_parse_from([
            "products", "create", "--name", "Mouse", "--price", "-1", "--stock", "-5",
        ])
        .unwrap();

        let Commands::Create(args) = cli.command else {
            panic!("expected create");
        };
        let input = ProductInput::from(args);
        assert_eq!(input.price, "-1");
        assert_eq!(input.stock, "-5");
        assert_eq!(input.description, None);
    }

    #[test]
    fn test_update_keeps_unset_fields() {
        let cli = Cli::try_parse_from(["products", "update", "7", "--stock", "3"]).unwrap();
        let Commands::Update { id, fields } = cli.command else {
            panic!("expected update");
        };
        assert_eq!(id, 7);

        let mut input = ProductInput {
            name: "Keyboard".into(),
            description: Some("Wireless".into()),
            price: "1200000".into(),
            stock: "30".into(),
            image: None,
        };
        fields.apply(&mut input);

        assert_eq!(input.name, "Keyboard");
        assert_eq!(input.description.as_deref(), Some("Wireless"));
        assert_eq!(input.price, "1200000");
        assert_eq!(input.stock, "3");
    }

    #[test]
    fn test_api_url_flag() {
        let cli = Cli::try_parse_from(["products", "--api-url", "http://api.test/api", "list"]).unwrap();
        assert_eq!(cli.api_url, "http://api.test/api");
        assert!(matches!(cli.command, Commands::List));
    }

    #[test]
    fn test_delete_flags() {
        let cli = Cli::try_parse_from(["products", "delete", "9", "--yes"]).unwrap();
        assert!(matches!(cli.command, Commands::Delete { id: 9, yes: true }));
    }
}
