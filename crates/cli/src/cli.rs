use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "asset-ledger")]
#[command(version, about = "Holdings, cost basis and PnL ledger with oracle/manual pricing")]
#[command(
    long_about = "Operate an encrypted asset-ledger snapshot: seed it from settings, record positions, \
                  sells and staking rewards, manage the class taxonomy and price sources, and print \
                  valuation reports as JSON. Amounts and prices are decimal strings (up to 8 decimals)."
)]
pub struct Cli {
    /// Path to the encrypted ledger snapshot
    #[arg(short, long, global = true, env = "ASSET_LEDGER_FILE", default_value = "ledger.aldg")]
    pub file: PathBuf,

    /// Snapshot password
    #[arg(short, long, global = true, env = "ASSET_LEDGER_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Address issuing mutating commands (must be the owner)
    #[arg(short, long, global = true, env = "ASSET_LEDGER_CALLER")]
    pub caller: Option<String>,

    /// JSON-RPC endpoint for aggregator feeds; defaults to the one recorded at init
    #[arg(long, global = true, env = "ASSET_LEDGER_RPC_URL")]
    pub rpc_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new snapshot from a settings JSON file
    Init {
        /// Settings file (owner, seed positions, prices, feeds)
        #[arg(long)]
        settings: PathBuf,

        /// Overwrite an existing snapshot
        #[arg(long)]
        force: bool,
    },

    /// Per-asset valuation report
    Report {
        /// Only this asset
        asset: Option<String>,
    },

    /// Portfolio totals and class allocation
    Summary,

    /// Resolve the current price of an asset
    Price { asset: String },

    /// Show the owner and the feed endpoint recorded in the snapshot
    Info,

    /// Overwrite a position
    SetPosition {
        asset: String,

        #[arg(long, default_value = "0")]
        principal: String,

        #[arg(long, default_value = "0")]
        avg_price: String,

        #[arg(long, default_value = "0")]
        rewards: String,
    },

    /// Add staking rewards to a position
    AddRewards { asset: String, amount: String },

    /// Record a sell at a price
    Sell {
        asset: String,
        amount: String,
        price: String,
    },

    /// Set the manual price of an asset
    SetManualPrice {
        asset: String,
        price: String,

        /// Make the manual price override the feed
        #[arg(long)]
        enabled: bool,
    },

    /// Point an asset at an aggregator feed contract
    SetFeed { asset: String, feed: String },

    /// Class taxonomy management
    Class {
        #[command(subcommand)]
        action: ClassCommands,
    },

    /// Hand the ledger to a new owner
    TransferOwnership { new_owner: String },
}

#[derive(Subcommand)]
pub enum ClassCommands {
    /// Create a class
    Create {
        name: String,

        /// Parent class id (0 = root)
        #[arg(long, default_value_t = 0)]
        parent: u64,
    },

    /// Deactivate a class (no cascade)
    Deactivate { id: u64 },

    /// Rename a class
    Rename { id: u64, name: String },

    /// Assign an asset to a class
    Assign { asset: String, id: u64 },

    /// List every class
    List,

    /// Show one class with its path and assets
    Show { id: u64 },
}
