use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Serialize;

use asset_ledger_core::fixed::parse_scaled;
use asset_ledger_core::models::asset::{Address, Asset};
use asset_ledger_core::models::settings::LedgerSettings;
use asset_ledger_core::providers::reader_for_endpoint;
use asset_ledger_core::AssetLedger;

use crate::cli::{ClassCommands, Cli, Commands};
use crate::formatters::{price_view, AssetView, SummaryView};

/// Global options shared by every command.
struct Session {
    file: std::path::PathBuf,
    password: String,
    caller: Option<String>,
    rpc_url: Option<String>,
}

pub async fn run(cli: Cli) -> Result<()> {
    let Cli {
        file,
        password,
        caller,
        rpc_url,
        command,
    } = cli;
    let ctx = Session {
        file,
        password: password.context("A snapshot password is required (--password or ASSET_LEDGER_PASSWORD)")?,
        caller,
        rpc_url,
    };

    match command {
        Commands::Init { settings, force } => init(&ctx, &settings, force).await,

        Commands::Report { asset } => {
            let ledger = open(&ctx)?;
            match asset {
                Some(symbol) => {
                    let report = ledger.get_asset_report(parse_asset(&symbol)?).await?;
                    print_json(&AssetView::from(&report))
                }
                None => {
                    let reports = ledger.get_portfolio_report().await?;
                    print_json(&reports.iter().map(AssetView::from).collect::<Vec<_>>())
                }
            }
        }

        Commands::Summary => {
            let ledger = open(&ctx)?;
            print_json(&SummaryView::from(&ledger.get_portfolio_summary().await?))
        }

        Commands::Price { asset } => {
            let ledger = open(&ctx)?;
            let asset = parse_asset(&asset)?;
            print_json(&price_view(asset, &ledger.resolve_price_detailed(asset).await))
        }

        Commands::Info => {
            let ledger = open(&ctx)?;
            print_json(&serde_json::json!({
                "owner": ledger.owner(),
                "rpc_url": ledger.rpc_url(),
                "feed_reader": ledger.feed_reader_name(),
                "next_class_id": ledger.next_class_id(),
            }))
        }

        Commands::SetPosition {
            asset,
            principal,
            avg_price,
            rewards,
        } => {
            let (mut ledger, caller) = open_for_update(&ctx)?;
            ledger.set_position(
                &caller,
                parse_asset(&asset)?,
                parse_scaled(&principal)?,
                parse_scaled(&avg_price)?,
                parse_scaled(&rewards)?,
            )?;
            commit(&ctx, &mut ledger)
        }

        Commands::AddRewards { asset, amount } => {
            let (mut ledger, caller) = open_for_update(&ctx)?;
            ledger.add_staking_rewards(&caller, parse_asset(&asset)?, parse_scaled(&amount)?)?;
            commit(&ctx, &mut ledger)
        }

        Commands::Sell { asset, amount, price } => {
            let (mut ledger, caller) = open_for_update(&ctx)?;
            ledger.record_sell(
                &caller,
                parse_asset(&asset)?,
                parse_scaled(&amount)?,
                parse_scaled(&price)?,
            )?;
            commit(&ctx, &mut ledger)
        }

        Commands::SetManualPrice { asset, price, enabled } => {
            let (mut ledger, caller) = open_for_update(&ctx)?;
            ledger.set_manual_price(&caller, parse_asset(&asset)?, parse_scaled(&price)?, enabled)?;
            commit(&ctx, &mut ledger)
        }

        Commands::SetFeed { asset, feed } => {
            let (mut ledger, caller) = open_for_update(&ctx)?;
            let feed: Address = feed.parse()?;
            ledger.set_price_feed(&caller, parse_asset(&asset)?, feed).await?;
            commit(&ctx, &mut ledger)
        }

        Commands::Class { action } => class(&ctx, action),

        Commands::TransferOwnership { new_owner } => {
            let (mut ledger, caller) = open_for_update(&ctx)?;
            ledger.transfer_ownership(&caller, new_owner.parse()?)?;
            commit(&ctx, &mut ledger)
        }
    }
}

fn class(ctx: &Session, action: ClassCommands) -> Result<()> {
    match action {
        ClassCommands::List => print_json(&open(ctx)?.list_classes()),

        ClassCommands::Show { id } => {
            let ledger = open(ctx)?;
            let info = ledger.get_class_info(id);
            if !info.exists {
                bail!("Class {id} does not exist");
            }
            print_json(&serde_json::json!({
                "id": id,
                "info": info,
                "path": ledger.class_path(id),
                "children": ledger.children_of(id),
                "assets": ledger.assets_in_class(id),
            }))
        }

        ClassCommands::Create { name, parent } => {
            let (mut ledger, caller) = open_for_update(ctx)?;
            let id = ledger.create_class(&caller, &name, parent)?;
            tracing::info!(id, "Class created");
            commit(ctx, &mut ledger)
        }

        ClassCommands::Deactivate { id } => {
            let (mut ledger, caller) = open_for_update(ctx)?;
            ledger.deactivate_class(&caller, id)?;
            commit(ctx, &mut ledger)
        }

        ClassCommands::Rename { id, name } => {
            let (mut ledger, caller) = open_for_update(ctx)?;
            ledger.rename_class(&caller, id, &name)?;
            commit(ctx, &mut ledger)
        }

        ClassCommands::Assign { asset, id } => {
            let (mut ledger, caller) = open_for_update(ctx)?;
            ledger.set_asset_class(&caller, parse_asset(&asset)?, id)?;
            commit(ctx, &mut ledger)
        }
    }
}

async fn init(ctx: &Session, settings_path: &Path, force: bool) -> Result<()> {
    if ctx.file.exists() && !force {
        bail!(
            "{} already exists; pass --force to overwrite it",
            ctx.file.display()
        );
    }

    let mut settings = LedgerSettings::from_json_file(settings_path)
        .with_context(|| format!("Failed to load settings from {}", settings_path.display()))?;
    if ctx.rpc_url.is_some() {
        settings.rpc_url = ctx.rpc_url.clone();
    }

    let mut ledger = AssetLedger::from_settings(&settings).await?;
    commit(ctx, &mut ledger)
}

// ── Helpers ─────────────────────────────────────────────────────────

/// Load the snapshot. Feeds are read from `--rpc-url` when given, else from
/// the endpoint recorded at init.
fn open(ctx: &Session) -> Result<AssetLedger> {
    let mut ledger = AssetLedger::load_from_file(&ctx.file, &ctx.password, reader_for_endpoint(None))
        .with_context(|| format!("Failed to open {}", ctx.file.display()))?;
    let endpoint = ctx.rpc_url.clone().or_else(|| ledger.rpc_url().map(str::to_string));
    if let Some(url) = endpoint.as_deref() {
        ledger.set_feed_reader(reader_for_endpoint(Some(url)));
    }
    tracing::debug!(endpoint = endpoint.as_deref().unwrap_or("none"), "Ledger opened");
    Ok(ledger)
}

fn open_for_update(ctx: &Session) -> Result<(AssetLedger, Address)> {
    let caller: Address = ctx
        .caller
        .as_deref()
        .context("Mutating commands need a caller (--caller or ASSET_LEDGER_CALLER)")?
        .parse()?;
    Ok((open(ctx)?, caller))
}

/// Persist the ledger and print the notifications the command produced.
fn commit(ctx: &Session, ledger: &mut AssetLedger) -> Result<()> {
    ledger
        .save_to_file(&ctx.file, &ctx.password)
        .with_context(|| format!("Failed to save {}", ctx.file.display()))?;
    for notification in ledger.drain_notifications() {
        println!("{}", serde_json::to_string(&notification)?);
    }
    Ok(())
}

fn parse_asset(symbol: &str) -> Result<Asset> {
    Ok(symbol.parse()?)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
