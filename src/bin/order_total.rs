//! Print the tip / total / bitcoin summary for an order and the payment
//! request that would be handed to the invoice step.
//!
//! Usage: cargo run --bin order_total -- --order order.json --tip custom --percent 18

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use log::{info, warn};

use pos_order_tip::{
    config::settings::Settings,
    order::{format_fiat, Order},
    payment::PaymentRequest,
    rates::RateTable,
    tip::{compute_for_order, TipPreset},
};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TipChoice {
    #[value(name = "20")]
    Twenty,
    #[value(name = "25")]
    TwentyFive,
    #[value(name = "30")]
    Thirty,
    Custom,
}

impl From<TipChoice> for TipPreset {
    fn from(choice: TipChoice) -> Self {
        match choice {
            TipChoice::Twenty => TipPreset::Twenty,
            TipChoice::TwentyFive => TipPreset::TwentyFive,
            TipChoice::Thirty => TipPreset::Thirty,
            TipChoice::Custom => TipPreset::Custom,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "order_total", about = "Tip and bitcoin total for a POS order")]
struct Cli {
    /// Order JSON file
    #[arg(long)]
    order: PathBuf,

    /// Settings JSON file; built-in defaults when omitted
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Rate table JSON file; overrides `rates_file` from settings
    #[arg(long)]
    rates: Option<PathBuf>,

    /// Fiat code; overrides `fiat` from settings
    #[arg(long)]
    fiat: Option<String>,

    #[arg(long, value_enum, default_value = "20")]
    tip: TipChoice,

    /// Custom tip percentage (with `--tip custom`)
    #[arg(long, conflicts_with = "amount")]
    percent: Option<String>,

    /// Custom tip amount in fiat (with `--tip custom`)
    #[arg(long)]
    amount: Option<String>,

    /// Show the bitcoin total in the other unit
    #[arg(long)]
    toggle_units: bool,

    /// Print the payment request as JSON only
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut settings = match &cli.settings {
        Some(path) => Settings::load_from_file(path)?,
        None => Settings::default(),
    };
    if let Some(fiat) = &cli.fiat {
        settings.fiat = Some(fiat.clone());
    }
    let rates_path = cli.rates.clone().unwrap_or_else(|| settings.rates_file.clone());

    let order = Order::load_from_file(&cli.order)?;
    let rates = RateTable::load_from_file(&rates_path)?;
    if rates.is_empty() {
        warn!("[RATES] {:?} has no entries; bitcoin pricing is off", rates_path);
    }
    info!(
        "[ORDER] {} with {} line items, {} rates",
        order.id,
        order.line_items.len(),
        rates.len()
    );

    let mut selection = settings.tip_selection();
    selection.select(cli.tip.into());
    if let Some(percent) = &cli.percent {
        selection.focus_percentage();
        selection.edit_percentage(percent);
    }
    if let Some(amount) = &cli.amount {
        selection.focus_amount();
        if !selection.edit_amount(amount) {
            bail!("tip amount `{amount}` must be non-negative with at most two decimals");
        }
    }

    let fiat = settings.fiat.as_deref();
    let result = compute_for_order(&order, &selection.policy(), &rates, fiat);
    let request = PaymentRequest::build(&order, &result, &settings.memo_prefix);

    if cli.json {
        let request = request.with_context(|| format!("payment disabled for {:?}", fiat))?;
        println!("{}", serde_json::to_string_pretty(&request)?);
        return Ok(());
    }

    for item in &order.line_items {
        let unit = if item.quantity > 1 {
            format!("@ {}", format_fiat(item.unit_price()))
        } else {
            String::new()
        };
        println!("{:<32} {:>12} {:>12}", item.label(), unit, item.display_total());
    }
    println!("{}", "-".repeat(58));
    println!("{:<45} {:>12}", "Tax", order.tax_display());
    println!("{:<45} {:>12}", "Total before tip", order.total_display());
    println!("{}", "-".repeat(58));
    println!(
        "{:<45} {:>12}",
        format!("Tip ({})", selection.preset()),
        format_fiat(result.tip_amount)
    );
    println!("{:<45} {:>12}", "Total (fiat)", format_fiat(result.total_amount));
    println!("{}", "-".repeat(58));

    let units = if cli.toggle_units {
        settings.display_units.toggle()
    } else {
        settings.display_units
    };
    if let Ok(quote) = &result.quote {
        println!("{:<45} {:>12}", "Conversion Rate", quote.rate.display());
        println!("{:<45} {:>12}", "Total (bitcoin)", units.format(quote.sats));
    }

    match request {
        Ok(request) => println!(
            "\n💰 Payment request: {} sats | memo \"{}\"",
            request.sat_amount, request.memo
        ),
        Err(e) => {
            warn!("[PAYMENT] order {} not payable: {}", order.id, e);
            println!("\n⚠️  Payment disabled: {}", e);
        }
    }

    Ok(())
}
