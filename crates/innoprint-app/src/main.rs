//! Innoprint CLI - catalogue, pricing and address tools against the local store.
//!
//! # Usage
//!
//! ```bash
//! # Load the starter catalogue into an empty database
//! innoprint seed
//!
//! # Schema version and row counts
//! innoprint status
//!
//! # Browse the catalogue
//! innoprint catalogue --category gadgets --search organizer --sort popular
//!
//! # Price a print
//! innoprint quote <MODEL_ID> --material resin --quality high --size lg --quantity 2
//!
//! # Checkout breakdown with tax and shipping
//! innoprint checkout <MODEL_ID> --material petg
//!
//! # Manage a user's saved addresses
//! innoprint addresses --user u1 list
//! innoprint addresses --user u1 default <ADDRESS_ID>
//! ```
//!
//! Output is JSON on stdout; logs go to stderr.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use innoprint_app::commands::{address, catalogue, checkout, pricing};
use innoprint_app::{init_tracing, App};
use innoprint_core::catalogue::{CatalogueQuery, SortOrder};
use innoprint_core::pricing::PrintRequest;
use innoprint_core::{Category, Identity, NewAddress};
use innoprint_db::seed::seed_catalogue;

#[derive(Parser)]
#[command(name = "innoprint")]
#[command(author, version, about = "Innoprint storefront tools")]
struct Cli {
    /// Config file (defaults to INNOPRINT_CONFIG, then the platform config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the starter catalogue if the database has no models
    Seed,
    /// Show schema version and row counts
    Status,
    /// List catalogue models
    Catalogue {
        /// Category id, singular or plural
        #[arg(long)]
        category: Option<String>,

        /// Matches title, description or creator
        #[arg(long, default_value = "")]
        search: String,

        /// newest, oldest, popular or prints
        #[arg(long, default_value = "newest")]
        sort: String,
    },
    /// Show the print option catalog and its defaults
    Options,
    /// Price a print of a model
    Quote {
        model_id: String,

        #[command(flatten)]
        options: PrintArgs,
    },
    /// Show the checkout breakdown for a print
    Checkout {
        model_id: String,

        #[command(flatten)]
        options: PrintArgs,
    },
    /// Manage saved delivery addresses
    Addresses {
        /// User id to act as
        #[arg(short, long)]
        user: String,

        #[arg(short, long, default_value = "")]
        email: String,

        #[command(subcommand)]
        action: AddressAction,
    },
}

#[derive(Args)]
struct PrintArgs {
    #[arg(long, default_value = "pla")]
    material: String,

    #[arg(long, default_value = "white")]
    color: String,

    #[arg(long, default_value = "standard")]
    quality: String,

    #[arg(long, default_value = "md")]
    size: String,

    #[arg(long, default_value_t = 1)]
    quantity: u32,

    /// Infill percentage
    #[arg(long, default_value_t = 20)]
    infill: u32,

    /// Print without support structures
    #[arg(long)]
    no_supports: bool,
}

impl From<PrintArgs> for PrintRequest {
    fn from(args: PrintArgs) -> Self {
        PrintRequest {
            material: args.material,
            color: args.color,
            quality: args.quality,
            size: args.size,
            quantity: args.quantity,
            infill: args.infill,
            supports: !args.no_supports,
        }
    }
}

#[derive(Subcommand)]
enum AddressAction {
    /// List saved addresses
    List,
    /// Save a new address
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        line1: String,
        #[arg(long)]
        line2: Option<String>,
        #[arg(long)]
        city: String,
        #[arg(long)]
        state: String,
        #[arg(long)]
        zip: String,
        #[arg(long, default_value = "India")]
        country: String,
        /// Make this the default address
        #[arg(long)]
        default: bool,
    },
    /// Delete an address
    Remove { address_id: String },
    /// Make an address the default
    Default { address_id: String },
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let app = App::open(cli.config).await?;

    match cli.command {
        Commands::Seed => {
            let inserted = seed_catalogue(&app.db).await?;
            tracing::info!(inserted, "Seed finished");
        }
        Commands::Status => {
            let status = app.db.status().await?;
            print_json(&serde_json::json!({
                "schemaVersion": status.schema.schema_version,
                "pendingMigrations": status.schema.pending(),
                "models": status.models,
                "addresses": status.addresses,
            }))?;
        }
        Commands::Catalogue {
            category,
            search,
            sort,
        } => {
            let query = CatalogueQuery {
                category: category.as_deref().map(str::parse::<Category>).transpose()?,
                search,
                sort: sort.parse::<SortOrder>()?,
            };
            print_json(&catalogue::list_catalogue(&app.db, &query).await?)?;
        }
        Commands::Options => {
            print_json(&pricing::get_print_options(&app.pricing))?;
        }
        Commands::Quote { model_id, options } => {
            let request = PrintRequest::from(options);
            let quote = pricing::quote_print(&app.db, &app.pricing, &model_id, &request).await?;
            tracing::info!(
                total = %app.config.store.format_money(quote.quote.total),
                hours = quote.quote.print_hours,
                "Quoted"
            );
            print_json(&quote)?;
        }
        Commands::Checkout { model_id, options } => {
            let request = checkout::CheckoutRequest {
                model_id,
                options: options.into(),
            };
            let preview =
                checkout::checkout_summary(&app.db, &app.pricing, &app.config, &request).await?;
            print_json(&preview)?;
        }
        Commands::Addresses {
            user,
            email,
            action,
        } => {
            app.session
                .sign_in(Identity {
                    uid: user,
                    email,
                    display_name: None,
                })
                .await?;
            run_address_action(&app, action).await?;
        }
    }

    app.db.close().await;
    Ok(())
}

async fn run_address_action(
    app: &App,
    action: AddressAction,
) -> Result<(), Box<dyn std::error::Error>> {
    let session = &app.session;
    match action {
        AddressAction::List => print_json(&address::get_addresses(session))?,
        AddressAction::Add {
            name,
            line1,
            line2,
            city,
            state,
            zip,
            country,
            default,
        } => {
            let form = NewAddress {
                name,
                line1,
                line2,
                city,
                state,
                zip_code: zip,
                country,
                is_default: default,
            };
            print_json(&address::add_address(session, form).await?)?;
        }
        AddressAction::Remove { address_id } => {
            print_json(&address::remove_address(session, &address_id).await?)?;
        }
        AddressAction::Default { address_id } => {
            print_json(&address::set_default_address(session, &address_id).await?)?;
        }
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
