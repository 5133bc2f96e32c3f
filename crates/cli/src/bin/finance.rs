use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use dashboard_engine::{Dashboard, DashboardView, Notification, Provenance, Trend};
use finance_client::{FinanceClient, FinanceClientConfig};
use models::{
    BalanceEntryType, CustomerBalanceUpdate, Envelope, ExpensesQuery, OverviewPeriod,
    PaymentMethod, PaymentRequest, ReceivablesQuery, ReportPeriod, Settings,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "finance", about = "Query the finance backend and render the reports dashboard.")]
struct Cli {
    /// Settings file; defaults to settings.json next to the working directory
    #[arg(short, long, global = true)]
    settings: Option<PathBuf>,

    /// Overrides the configured backend URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Revenue, expenses, profit and cash flow totals
    Overview {
        #[arg(short, long)]
        period: Option<OverviewPeriod>,
    },
    /// Accounts receivable with summary
    Receivables {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
        /// Only overdue invoices
        #[arg(long)]
        overdue: bool,
        #[arg(long)]
        customer_id: Option<u64>,
    },
    /// Expenses, optionally filtered by category and date range
    Expenses {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        category: Option<String>,
        /// YYYY-MM-DD
        #[arg(long)]
        date_from: Option<NaiveDate>,
        /// YYYY-MM-DD
        #[arg(long)]
        date_to: Option<NaiveDate>,
    },
    /// Record a customer payment
    RecordPayment {
        #[arg(long)]
        customer_id: u64,
        #[arg(long)]
        amount: f64,
        /// cash, bank_transfer or cheque
        #[arg(long, value_parser = parse_variant::<PaymentMethod>)]
        method: PaymentMethod,
        #[arg(long)]
        reference: String,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Credit or debit a customer balance for an order
    UpdateBalance {
        #[arg(long)]
        customer_id: u64,
        #[arg(long)]
        order_id: u64,
        #[arg(long)]
        amount: f64,
        /// credit or debit
        #[arg(long = "type", value_parser = parse_variant::<BalanceEntryType>)]
        kind: BalanceEntryType,
        #[arg(long)]
        order_number: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Current balance and transaction history of one customer
    Balance { customer_id: u64 },
    /// Recompute every customer balance from its history
    SyncBalances,
    /// Fetch the three reports once and print the dashboard
    Dashboard {
        #[arg(short, long)]
        period: Option<ReportPeriod>,
        #[arg(short, long)]
        year: Option<i32>,
        /// Print the view as JSON instead of a table
        #[arg(long)]
        json: bool,
        /// Show only live figures
        #[arg(long)]
        no_placeholders: bool,
    },
}

/// Parses a serde-named enum variant, accepting `-` for `_`.
fn parse_variant<T: DeserializeOwned>(raw: &str) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::String(raw.replace('-', "_")))
        .map_err(|_| format!("unknown value '{raw}'"))
}

fn print_data<T: Serialize>(envelope: Envelope<T>) -> Result<()> {
    if let Some(message) = &envelope.message {
        eprintln!("{message}");
    }
    let data = envelope.into_data()?;
    println!("{}", serde_json::to_string_pretty(&data)?);
    Ok(())
}

fn marker(provenance: Provenance) -> &'static str {
    match provenance {
        Provenance::Placeholder => " *",
        _ => "",
    }
}

fn print_view(view: &DashboardView) {
    println!("Reports ({}, {})", view.filters.period, view.filters.year);
    for card in &view.cards {
        let arrow = match card.trend {
            Trend::Up => "up",
            Trend::Down => "down",
            Trend::Flat => "",
        };
        println!(
            "  {:<16} {:>16}{:<2}  {:<24} {} {}",
            card.title,
            card.value.text.as_deref().unwrap_or("-"),
            marker(card.value.provenance),
            card.subtitle.text.as_deref().unwrap_or(""),
            arrow,
            card.trend_text.text.as_deref().unwrap_or(""),
        );
    }

    println!("Cash flow{}", marker(view.cash_flow.provenance));
    for point in &view.cash_flow.points {
        println!(
            "  {:<6} in {:>6}  out {:>6}  net {:>6}",
            point.month,
            dashboard_engine::format_axis_tick(point.inflow),
            dashboard_engine::format_axis_tick(point.outflow),
            dashboard_engine::format_axis_tick(point.net),
        );
    }

    println!("Sales by category{}", marker(view.categories.provenance));
    for slice in &view.categories.points {
        println!("  {:<20} {:>3}%  {}", slice.name, slice.share, slice.color);
    }

    let shows_samples = view.cards.iter().any(|c| c.value.provenance == Provenance::Placeholder)
        || view.cash_flow.provenance == Provenance::Placeholder
        || view.categories.provenance == Provenance::Placeholder;
    if shows_samples {
        println!("* sample figures, live data unavailable");
    }
}

async fn run_dashboard(
    client: FinanceClient,
    mut settings: Settings,
    period: Option<ReportPeriod>,
    year: Option<i32>,
    json: bool,
) -> Result<()> {
    if let Some(period) = period {
        settings.dashboard.initial_period = period;
    }
    if year.is_some() {
        settings.dashboard.initial_year = year;
    }

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<Notification>();
    let dashboard = Dashboard::from_settings(Arc::new(client), &settings).with_notifier(Arc::new(tx));
    let report = dashboard.mount().await;
    tracing::info!(sequence = report.sequence, outcome = ?report.outcome, "reports batch finished");

    while let Ok(notification) = rx.try_recv() {
        eprintln!("{}: {}", notification.title, notification.description);
    }

    let view = dashboard.view().await;
    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print_view(&view);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("finance=info,finance_client=warn,dashboard_engine=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut settings =
        settings_loader::load_with_env(cli.settings.as_ref()).context("load settings")?;
    if let Some(base_url) = cli.base_url {
        settings.api.base_url = base_url;
    }
    tracing::info!(base_url = %settings.api.base_url, "using finance backend");

    let client = FinanceClient::new(FinanceClientConfig::from_settings(&settings.api))
        .context("build finance client")?;

    match cli.command {
        Command::Overview { period } => print_data(client.get_overview(period).await?),
        Command::Receivables {
            page,
            limit,
            overdue,
            customer_id,
        } => {
            let query = ReceivablesQuery {
                page,
                limit,
                overdue: overdue.then_some(true),
                customer_id,
            };
            print_data(client.get_accounts_receivable(&query).await?)
        }
        Command::Expenses {
            page,
            limit,
            category,
            date_from,
            date_to,
        } => {
            let query = ExpensesQuery {
                page,
                limit,
                category,
                date_from,
                date_to,
            };
            print_data(client.get_expenses(&query).await?)
        }
        Command::RecordPayment {
            customer_id,
            amount,
            method,
            reference,
            notes,
        } => {
            let payment = PaymentRequest {
                customer_id,
                amount,
                payment_method: method,
                reference,
                notes,
            };
            print_data(client.record_payment(&payment).await?)
        }
        Command::UpdateBalance {
            customer_id,
            order_id,
            amount,
            kind,
            order_number,
            description,
        } => {
            let update = CustomerBalanceUpdate {
                customer_id,
                order_id,
                amount,
                kind,
                order_number,
                description,
            };
            print_data(client.update_customer_balance(&update).await?)
        }
        Command::Balance { customer_id } => {
            print_data(client.get_customer_balance(customer_id).await?)
        }
        Command::SyncBalances => print_data(client.sync_customer_balances().await?),
        Command::Dashboard {
            period,
            year,
            json,
            no_placeholders,
        } => {
            if no_placeholders {
                settings.dashboard.placeholders = false;
            }
            run_dashboard(client, settings, period, year, json).await
        }
    }
}
