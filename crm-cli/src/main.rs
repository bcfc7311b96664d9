//! CRM command line front end
//!
//! # Usage
//!
//! ```bash
//! crm customers list --search asha
//! crm audience preview --rule "totalSpend > 1000" --rule "visits >= 3" --combinator or
//! crm audience from-text "customers who spent over 1000 and visited 3 times"
//! crm campaigns create --name "Spring sale" --message "Hi {{name}}" --rule "totalSpend > 1000"
//! crm session watch
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use crm_client::{ClientConfig, Combinator};

mod commands;
mod logger;
mod output;

#[derive(Parser)]
#[command(name = "crm")]
#[command(version)]
#[command(about = "CRM command line interface", long_about = None)]
struct Cli {
    /// API base URL
    #[arg(long, env = "CRM_API_URL")]
    api_url: Option<String>,

    /// Session cookie sent with every request (`name=value`)
    #[arg(long, env = "CRM_SESSION_COOKIE", hide_env_values = true)]
    cookie: Option<String>,

    /// Output format
    #[arg(long, short, value_enum, default_value = "table")]
    format: output::OutputFormat,

    /// Debug logging
    #[arg(long, short)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage customers
    Customers {
        #[command(subcommand)]
        action: CustomerCommands,
    },
    /// Manage orders
    Orders {
        #[command(subcommand)]
        action: OrderCommands,
    },
    /// Manage campaigns
    Campaigns {
        #[command(subcommand)]
        action: CampaignCommands,
    },
    /// Build and size audiences
    Audience {
        #[command(subcommand)]
        action: AudienceCommands,
    },
    /// Inspect the login session
    Session {
        #[command(subcommand)]
        action: SessionCommands,
    },
}

#[derive(Subcommand)]
enum CustomerCommands {
    /// List customers
    List {
        /// Case-insensitive filter on name and email
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one customer
    Show { id: String },
    /// Create a customer
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "")]
        phone: String,
    },
    /// Update a customer
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
    /// Delete a customer
    Delete { id: String },
}

#[derive(Subcommand)]
enum OrderCommands {
    /// List orders
    List {
        /// Only orders of this customer
        #[arg(long)]
        customer: Option<String>,
    },
    /// Show one order
    Show { id: String },
    /// Create an order
    Create {
        #[arg(long)]
        customer: String,
        #[arg(long)]
        number: String,
        #[arg(long)]
        amount: f64,
        /// Repeatable
        #[arg(long = "item")]
        items: Vec<String>,
    },
    /// Update an order
    Update {
        id: String,
        #[arg(long)]
        number: Option<String>,
        #[arg(long)]
        amount: Option<f64>,
    },
    /// Delete an order
    Delete { id: String },
}

#[derive(Subcommand)]
enum CampaignCommands {
    /// List campaigns
    List,
    /// Create a campaign for an audience
    Create {
        #[arg(long)]
        name: String,
        /// Message template, e.g. "Hi {{name}}"
        #[arg(long)]
        message: String,
        #[command(flatten)]
        audience: AudienceArgs,
    },
}

#[derive(Subcommand)]
enum AudienceCommands {
    /// Count the customers an audience selects
    Preview {
        #[command(flatten)]
        audience: AudienceArgs,
    },
    /// Turn a plain-language description into rules
    FromText {
        text: String,
        /// Also preview the generated audience
        #[arg(long)]
        preview: bool,
    },
}

#[derive(Subcommand)]
enum SessionCommands {
    /// Check whether the session is valid
    Check,
    /// Print connection status changes until interrupted
    Watch {
        /// Seconds between checks
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        interval: Option<u64>,
    },
    /// End the session
    Logout,
}

/// Rules given on the command line
#[derive(clap::Args)]
struct AudienceArgs {
    /// Rule as "field operator value", e.g. "totalSpend > 1000" (repeatable)
    #[arg(long = "rule")]
    rules: Vec<String>,

    #[arg(long, value_enum, default_value = "and")]
    combinator: CombinatorArg,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CombinatorArg {
    And,
    Or,
}

impl From<CombinatorArg> for Combinator {
    fn from(arg: CombinatorArg) -> Self {
        match arg {
            CombinatorArg::And => Combinator::And,
            CombinatorArg::Or => Combinator::Or,
        }
    }
}

#[tokio::main]
async fn main() {
    // .env must be loaded before clap reads env-backed flags
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    logger::init_logger(cli.verbose, cli.log_json);

    let mut config = ClientConfig::from_env();
    if let Some(url) = cli.api_url {
        config.base_url = url;
    }
    if let Some(cookie) = cli.cookie.filter(|c| !c.trim().is_empty()) {
        config = config.with_session_cookie(cookie);
    }
    tracing::debug!(base_url = %config.base_url, "Using CRM API");

    let result = match cli.command {
        Commands::Customers { action } => commands::customers::handle(action, &config, cli.format).await,
        Commands::Orders { action } => commands::orders::handle(action, &config, cli.format).await,
        Commands::Campaigns { action } => commands::campaigns::handle(action, &config, cli.format).await,
        Commands::Audience { action } => commands::audience::handle(action, &config, cli.format).await,
        Commands::Session { action } => commands::session::handle(action, &config).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
