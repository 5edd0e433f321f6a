//! Storeloom CLI - drive a persisted studio from the shell.
//!
//! # Usage
//!
//! ```bash
//! # Create a tenant and make it active
//! storeloom tenant create "Nova Goods" Tech
//!
//! # Connect the payment platform for every tenant
//! storeloom platform connect pk_live_123 sk_live_456
//!
//! # Add a product (mirrored into the payment catalog when a key is set)
//! storeloom product add "Desk Lamp" 49.00 --cost 18 --inventory 12
//!
//! # Check out one unit of a product
//! storeloom order create -p 4fk2m9x -n "Ada Lovelace" -e ada@example.com -a "12 Analytical Way"
//!
//! # Apply database migrations (postgres feature)
//! storeloom migrate
//! ```
//!
//! Every command opens the studio from `StudioConfig::from_env()`, applies
//! its mutation, then waits for catalog sync and snapshot writes. The
//! studio's notifications are logged as they are raised.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storeloom_core::{MoveDirection, ProductType};
use storeloom_studio::StudioConfig;
use storeloom_studio::ai::DuelOption;
use storeloom_studio::models::SectionType;

mod commands;

#[derive(Parser)]
#[command(name = "storeloom")]
#[command(author, version, about = "Storeloom storefront studio")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create, switch and list tenants
    Tenant {
        #[command(subcommand)]
        action: TenantAction,
    },
    /// Manage the shared payment platform credentials
    Platform {
        #[command(subcommand)]
        action: PlatformAction,
    },
    /// Manage the active tenant's products
    Product {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Check out and fulfill orders
    Order {
        #[command(subcommand)]
        action: OrderAction,
    },
    /// Arrange the active tenant's page blocks
    Section {
        #[command(subcommand)]
        action: SectionAction,
    },
    /// Brand identity and generated strategy
    Brand {
        #[command(subcommand)]
        action: BrandAction,
    },
    /// Play one round of the product duel
    Arena {
        /// Option you expect to win (A or B)
        #[arg(short, long)]
        pick: DuelOption,

        /// Credits to stake (default: 50, capped by your credits)
        #[arg(short, long)]
        wager: Option<i64>,
    },
    /// Apply snapshot table migrations (requires the `postgres` feature)
    Migrate,
}

#[derive(Subcommand)]
enum TenantAction {
    /// Create a tenant and make it active
    Create {
        /// Store name
        name: String,

        /// Store category (e.g. Fashion, Tech)
        #[arg(default_value = "General")]
        category: String,
    },
    /// Make another tenant active
    Switch {
        /// Tenant id
        id: String,
    },
    /// List tenants
    List,
}

#[derive(Subcommand)]
enum PlatformAction {
    /// Validate a secret key against the platform and store both keys
    Connect {
        /// Publishable key
        public_key: String,

        /// Secret key (must start with `sk_`)
        secret_key: String,
    },
}

#[derive(Subcommand)]
enum ProductAction {
    /// Add a product to the active tenant
    Add {
        /// Product title
        title: String,

        /// Unit price
        price: Decimal,

        /// Cost per item
        #[arg(short, long, default_value = "0")]
        cost: Decimal,

        /// Units on hand
        #[arg(short, long, default_value_t = 0)]
        inventory: i64,

        /// Product type (`physical`, `digital`, `service`, `subscription`)
        #[arg(short = 't', long, default_value = "physical")]
        product_type: ProductType,

        /// Description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Category
        #[arg(long, default_value = "")]
        category: String,
    },
    /// Change fields of a product
    Update {
        /// Product id
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        price: Option<Decimal>,

        #[arg(long)]
        inventory: Option<i64>,
    },
    /// Delete a product
    Delete {
        /// Product id
        id: String,
    },
    /// List the active tenant's products
    List,
}

#[derive(Subcommand)]
enum OrderAction {
    /// Put products in the cart and check out
    Create {
        /// Product id, repeat to buy more than one unit
        #[arg(short, long = "product", required = true)]
        products: Vec<String>,

        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        address: String,

        #[arg(long, default_value = "")]
        city: String,

        #[arg(long, default_value = "")]
        zip: String,

        #[arg(long, default_value = "")]
        country: String,
    },
    /// Mark an order shipped
    Fulfill {
        /// Order id (e.g. #1001)
        id: String,

        #[arg(short, long)]
        tracking: String,

        #[arg(short, long)]
        carrier: String,
    },
    /// List the active tenant's orders
    List,
}

#[derive(Subcommand)]
enum SectionAction {
    /// Append a block
    Add {
        /// Block type (e.g. hero, faq, newsletter)
        kind: SectionType,

        /// JSON object merged over the default content
        #[arg(short, long)]
        content: Option<String>,
    },
    /// Merge JSON into a block's content
    Update {
        id: String,
        content: String,
    },
    /// Move a block up or down
    Move {
        id: String,
        direction: MoveDirection,
    },
    /// Show a hidden block
    Show { id: String },
    /// Hide a block
    Hide { id: String },
    /// Remove a block
    Remove { id: String },
    /// List blocks in page order
    List,
}

#[derive(Subcommand)]
enum BrandAction {
    /// Generate and apply a brand strategy
    Strategy,
    /// Print the brand identity
    Show,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StudioConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry.dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry
                .environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry.sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match StudioConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing_subscriber::fmt::init();
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "storeloom_studio=info,storeloom_cli=info".into());

    let json_logs = std::env::var("STORELOOM_LOG_JSON").is_ok();
    let json_layer =
        json_logs.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!json_logs).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    if let Err(e) = run(cli, &config).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &StudioConfig) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Tenant { action } => match action {
            TenantAction::Create { name, category } => {
                commands::tenant::create(config, &name, &category).await
            }
            TenantAction::Switch { id } => commands::tenant::switch(config, &id).await,
            TenantAction::List => commands::tenant::list(config).await,
        },
        Commands::Platform { action } => match action {
            PlatformAction::Connect {
                public_key,
                secret_key,
            } => commands::tenant::connect(config, &public_key, secret_key).await,
        },
        Commands::Product { action } => match action {
            ProductAction::Add {
                title,
                price,
                cost,
                inventory,
                product_type,
                description,
                category,
            } => {
                let draft = commands::product::Draft {
                    title,
                    description,
                    category,
                    price,
                    cost,
                    inventory,
                    product_type,
                };
                commands::product::add(config, draft).await
            }
            ProductAction::Update {
                id,
                title,
                description,
                price,
                inventory,
            } => {
                let patch = storeloom_studio::models::ProductPatch {
                    title,
                    description,
                    price,
                    inventory,
                    ..Default::default()
                };
                commands::product::update(config, &id, patch).await
            }
            ProductAction::Delete { id } => commands::product::delete(config, &id).await,
            ProductAction::List => commands::product::list(config).await,
        },
        Commands::Order { action } => match action {
            OrderAction::Create {
                products,
                name,
                email,
                address,
                city,
                zip,
                country,
            } => {
                let customer = storeloom_studio::models::Customer {
                    name,
                    email,
                    address,
                    city,
                    zip,
                    country,
                };
                commands::order::create(config, &products, customer).await
            }
            OrderAction::Fulfill {
                id,
                tracking,
                carrier,
            } => commands::order::fulfill(config, &id, &tracking, &carrier).await,
            OrderAction::List => commands::order::list(config).await,
        },
        Commands::Section { action } => match action {
            SectionAction::Add { kind, content } => {
                commands::section::add(config, kind, content.as_deref()).await
            }
            SectionAction::Update { id, content } => {
                commands::section::update(config, &id, &content).await
            }
            SectionAction::Move { id, direction } => {
                commands::section::reorder(config, &id, direction).await
            }
            SectionAction::Show { id } => commands::section::set_visible(config, &id, true).await,
            SectionAction::Hide { id } => commands::section::set_visible(config, &id, false).await,
            SectionAction::Remove { id } => commands::section::remove(config, &id).await,
            SectionAction::List => commands::section::list(config).await,
        },
        Commands::Brand { action } => match action {
            BrandAction::Strategy => commands::brand::strategy(config).await,
            BrandAction::Show => commands::brand::show(config).await,
        },
        Commands::Arena { pick, wager } => commands::arena::duel(config, pick, wager).await,
        Commands::Migrate => commands::migrate::run(config).await,
    }
}
