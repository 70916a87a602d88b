//! Goshen CLI - Shop the Goshen grocery storefront from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse
//! goshen products --category vegetables-fruits --availability in-stock --sort high-low
//! goshen products --search rice
//! goshen product 64f1c2...
//!
//! # Cart (kept locally until you sign in, then on the server)
//! goshen cart add 64f1c2... --quantity 2
//! goshen cart inc 64f1c2...
//! goshen cart
//!
//! # Account
//! goshen login -e ada@example.com -p hunter22
//! goshen orders
//!
//! # Checkout
//! goshen checkout --first-name Ada --last-name Lovelace ... --payment cod
//! ```
//!
//! # Environment Variables
//!
//! - `GOSHEN_BACKEND_URL` - Backend base URL
//! - `GOSHEN_DATA_DIR` - Where the session token and guest cart are kept
//! - `SENTRY_DSN` - Optional error tracking
//! - `RUST_LOG` - Log filter (defaults to `goshen_storefront=info`)

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::print_stdout)]

use clap::{Args, Parser, Subcommand};
use goshen_core::{OrderId, PaymentMethod, ProductId};
use goshen_storefront::models::{Category, ShippingAddress};
use goshen_storefront::{Availability, ShopStore, SortOrder, StorefrontConfig};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "goshen")]
#[command(author, version, about = "Goshen grocery storefront")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the new arrival and best seller rails
    Home,
    /// List products
    Products {
        /// Category slug (`vegetables-fruits`, `groceries`, `snacks-drinks`, `homewares`)
        #[arg(short, long, value_parser = parse_category)]
        category: Option<Category>,

        /// Search in-stock products by name or description
        #[arg(short, long, conflicts_with = "category")]
        search: Option<String>,

        /// `all-products`, `in-stock` or `out-of-stock`
        #[arg(long, default_value = "all-products")]
        availability: Availability,

        /// Only show one subcategory
        #[arg(long)]
        subcategory: Option<String>,

        /// `low-high`, `high-low`, `best` or `new`
        #[arg(long, default_value = "low-high")]
        sort: SortOrder,
    },
    /// Show one product
    Product {
        /// Product ID
        id: String,
    },
    /// Show or change the cart
    Cart {
        #[command(subcommand)]
        action: Option<CartAction>,
    },
    /// Sign in
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },
    /// Create an account and sign in
    Register {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        #[arg(long)]
        phone: String,

        #[arg(short, long)]
        password: String,

        /// Repeat the password
        #[arg(long)]
        confirm: String,
    },
    /// Sign out
    Logout,
    /// Place an order for the cart
    Checkout {
        #[command(flatten)]
        address: AddressArgs,

        /// `cod` or `stripe`
        #[arg(long, default_value = "cod")]
        payment: PaymentMethod,
    },
    /// Verify a hosted checkout session after paying
    VerifyPayment {
        /// Checkout session ID from the return URL
        session_id: String,
    },
    /// Record a confirmed card payment
    ConfirmPayment {
        /// Order ID returned by checkout
        order_id: String,
    },
    /// Show your orders, newest first
    Orders,
    /// Send a message to the shop
    Contact {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        /// Defaults to "Order Inquiry"
        #[arg(short, long)]
        subject: Option<String>,

        message: String,
    },
    /// Show your messages and the shop's replies
    Inquiries,
}

#[derive(Subcommand)]
enum CartAction {
    /// Add a product
    Add {
        id: String,

        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Raise a line by one
    Inc { id: String },
    /// Lower a line by one
    Dec { id: String },
    /// Remove a line
    Remove { id: String },
}

#[derive(Args)]
struct AddressArgs {
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    street: String,
    #[arg(long)]
    city: String,
    #[arg(long)]
    state: String,
    #[arg(long)]
    zipcode: String,
    #[arg(long)]
    country: String,
    #[arg(long)]
    phone: String,
}

impl From<AddressArgs> for ShippingAddress {
    fn from(args: AddressArgs) -> Self {
        Self {
            first_name: args.first_name,
            last_name: args.last_name,
            email: args.email,
            street: args.street,
            city: args.city,
            state: args.state,
            zipcode: args.zipcode,
            country: args.country,
            phone: args.phone,
        }
    }
}

fn parse_category(slug: &str) -> Result<Category, String> {
    Category::ALL
        .into_iter()
        .find(|c| c.slug() == slug)
        .ok_or_else(|| format!("unknown category: {slug}"))
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN | tracing::Level::INFO => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = StorefrontConfig::from_env();

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = config.as_ref().ok().and_then(init_sentry);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "goshen_storefront=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(2);
        }
    };

    let store = match ShopStore::connect(config) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("Could not open the store: {e}");
            std::process::exit(1);
        }
    };

    let result = run(cli, &store).await;
    commands::print_notices(&store);

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, store: &ShopStore) -> Result<(), Box<dyn std::error::Error>> {
    if !matches!(cli.command, Commands::Logout) {
        store.start().await;
    }

    match cli.command {
        Commands::Home => commands::catalog::home(store),
        Commands::Products {
            category,
            search,
            availability,
            subcategory,
            sort,
        } => {
            let filter = goshen_storefront::CatalogFilter {
                availability,
                subcategory,
                sort,
            };
            commands::catalog::list(store, category, search.as_deref(), &filter);
        }
        Commands::Product { id } => commands::catalog::show(store, &ProductId::new(id))?,
        Commands::Cart { action } => match action {
            None => commands::cart::show(store),
            Some(CartAction::Add { id, quantity }) => {
                commands::cart::add(store, &ProductId::new(id), quantity).await?;
            }
            Some(CartAction::Inc { id }) => {
                commands::cart::increment(store, &ProductId::new(id)).await?;
            }
            Some(CartAction::Dec { id }) => {
                commands::cart::decrement(store, &ProductId::new(id)).await?;
            }
            Some(CartAction::Remove { id }) => {
                store.remove_item(&ProductId::new(id)).await?;
                commands::cart::show(store);
            }
        },
        Commands::Login { email, password } => {
            commands::account::login(store, email, password).await?;
        }
        Commands::Register {
            name,
            email,
            phone,
            password,
            confirm,
        } => commands::account::register(store, name, email, phone, password, confirm).await?,
        Commands::Logout => commands::account::logout(store),
        Commands::Checkout { address, payment } => {
            commands::checkout::place_order(store, &address.into(), payment).await?;
        }
        Commands::VerifyPayment { session_id } => {
            commands::checkout::verify(store, &session_id).await?;
        }
        Commands::ConfirmPayment { order_id } => {
            commands::checkout::confirm(store, &OrderId::new(order_id)).await?;
        }
        Commands::Orders => commands::account::orders(store).await?,
        Commands::Contact {
            name,
            email,
            subject,
            message,
        } => commands::account::contact(store, name, email, subject, message).await?,
        Commands::Inquiries => commands::account::inquiries(store).await?,
    }
    Ok(())
}
