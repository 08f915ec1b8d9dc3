//! edgecap - chart data, live fallbacks and site services from the command line
//!
//! # Usage
//! ```sh
//! edgecap generate nav --format csv
//! edgecap live stress-2022
//! edgecap language set nl
//! ```
//!
//! # Environment Variables
//! - `FORM_SCRIPT_URL`, `FUND_RETURNS_SCRIPT_URL`, `PERFORMANCE_SCRIPT_URL` - sheet endpoints
//! - `SERIES_CATALOGUE` - TOML file replacing the built-in charts
//! - `FLAT_PATH_POLICY` - `fail` (default) or `unit-scale`
//! - `RUST_LOG` - log filter (default: info)

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use edgecap::application::catalogue::ChartCatalogue;
use edgecap::application::chart_cache::ChartCache;
use edgecap::application::contact::ContactService;
use edgecap::application::fund_returns::{FundReturnsService, monthly_bars, since_inception_bars};
use edgecap::application::language::{LanguagePreferenceService, system_locale_tags};
use edgecap::application::live_series::{ChartSource, LiveSeriesService};
use edgecap::config::Config;
use edgecap::domain::contact::ContactForm;
use edgecap::domain::fund_returns::FundClass;
use edgecap::domain::language::Language;
use edgecap::domain::series::StepUnit;
use edgecap::domain::series::stats::{PeriodWindow, as_of_date, average_step_return, to_date_return};
use edgecap::infrastructure::export::{write_csv, write_json};
use edgecap::infrastructure::i18n::I18nService;
use edgecap::infrastructure::{HttpClientFactory, JsonLanguageStore, SheetsFormClient, SheetsReadClient};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{Level, error, info};
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportFormat {
    Json,
    Csv,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a chart from the catalogue and export it
    Generate {
        /// Chart id (see `catalogue`)
        chart: String,

        #[arg(short, long, value_enum, default_value = "json")]
        format: ExportFormat,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Summary figures of a generated chart
    Stats {
        chart: String,

        /// Window for the average: all, 1y or 3m
        #[arg(short, long, default_value = "all")]
        period: String,
    },

    /// Resolve a chart against the performance sheet, falling back to the simulation
    Live { chart: String },

    /// Latest published fund returns per share class
    FundReturns,

    /// Submit the contact form
    Contact {
        #[arg(long)]
        name: String,

        #[arg(long)]
        mail: String,

        #[arg(long)]
        message: String,

        /// Mobile number
        #[arg(long, default_value = "")]
        number: String,

        /// Subscribe to the newsletter
        #[arg(long)]
        newsletter: bool,
    },

    /// Show or change the preferred language
    Language {
        #[command(subcommand)]
        action: LanguageAction,
    },

    /// Print the active chart catalogue as TOML
    Catalogue {
        /// Only list chart ids
        #[arg(long)]
        ids: bool,
    },
}

#[derive(Subcommand)]
enum LanguageAction {
    Get,
    Set { language: String },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Logs go to stderr so exports on stdout stay clean
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(io::stderr);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stderr_layer)
        .init();

    if let Err(e) = run(Cli::parse()).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::from_env()?;
    info!("edgecap {} starting", env!("CARGO_PKG_VERSION"));

    let store = Arc::new(JsonLanguageStore::new(&config.storage.home)?);
    let languages = LanguagePreferenceService::new(store);
    let mut i18n = I18nService::new(languages.current(system_locale_tags()));

    match cli.command {
        Commands::Generate {
            chart,
            format,
            output,
        } => {
            let cache = build_cache(&config)?;
            let chart = cache.get(&chart)?;
            let writer: Box<dyn Write> = match &output {
                Some(path) => Box::new(BufWriter::new(
                    File::create(path).with_context(|| format!("Failed to create {:?}", path))?,
                )),
                None => Box::new(BufWriter::new(io::stdout())),
            };
            match format {
                ExportFormat::Json => write_json(&chart, writer)?,
                ExportFormat::Csv => write_csv(&chart, writer)?,
            }
            if let Some(path) = output {
                info!("Wrote chart {} to {:?}", chart.id, path);
            }
        }

        Commands::Stats { chart, period } => {
            let window: PeriodWindow = period.parse()?;
            let cache = build_cache(&config)?;
            let chart = cache.get(&chart)?;
            let average_key = match chart.unit {
                StepUnit::Month => "stats.average_monthly",
                StepUnit::Week => "stats.average_weekly",
            };

            println!("{} ({})", chart.title, window);
            if let Some(date) = as_of_date(&chart) {
                println!("{}", i18n.tf("stats.as_of", &[("date", date.as_str())]));
            }
            let visible = window.slice(&chart.points, chart.unit);
            for name in &chart.series {
                let (Some(all), Some(windowed)) = (
                    chart.values(name),
                    visible.iter().map(|p| p.value(name)).collect::<Option<Vec<f64>>>(),
                ) else {
                    continue;
                };
                println!(
                    "  {:<22} {} {:+.1}%  {} {:+.2}%",
                    name,
                    i18n.t("stats.to_date"),
                    to_date_return(&all).unwrap_or_default(),
                    i18n.t(average_key),
                    average_step_return(&windowed).unwrap_or_default()
                );
            }
        }

        Commands::Live { chart } => {
            let cache = Arc::new(build_cache(&config)?);
            let client = HttpClientFactory::create_client(&config.http);
            let source = Arc::new(SheetsReadClient::new(
                client,
                config.endpoints.performance_url.clone(),
                config.endpoints.fund_returns_url.clone(),
            ));
            let service = LiveSeriesService::new(cache, source, config.http.live_fetch_timeout());

            let displayed = service.resolve(&chart).await?;
            match &displayed.source {
                ChartSource::Live => eprintln!("{}", i18n.t("chart.source.live")),
                ChartSource::Fallback { reason } => eprintln!(
                    "{}",
                    i18n.tf("chart.source.fallback", &[("reason", reason.as_str())])
                ),
            }
            serde_json::to_writer_pretty(io::stdout(), &displayed)?;
            println!();
        }

        Commands::FundReturns => {
            let client = HttpClientFactory::create_client(&config.http);
            let source = Arc::new(SheetsReadClient::new(
                client,
                config.endpoints.performance_url.clone(),
                config.endpoints.fund_returns_url.clone(),
            ));
            let snapshot = match FundReturnsService::new(source).latest().await {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    println!("{}", i18n.tf("fund.unavailable", &[("reason", e.to_string().as_str())]));
                    return Ok(());
                }
            };

            let language = i18n.language();
            for class in FundClass::ALL {
                match snapshot.get(class) {
                    Some(data) => println!(
                        "{} ({}): {} {}%  {} {}%  {} {}%  {} {}%",
                        class,
                        data.month.name(language),
                        i18n.t("fund.monthly"),
                        data.returns.monthly,
                        i18n.t("fund.ytd"),
                        data.returns.ytd,
                        i18n.t("fund.since_inception"),
                        data.returns.since_inception,
                        i18n.t("fund.cagr"),
                        data.returns.cagr
                    ),
                    None => println!("{}: {}", class, i18n.t("fund.unpublished")),
                }
            }
            for (heading, bars) in [
                ("fund.monthly", monthly_bars(&snapshot)),
                ("fund.since_inception", since_inception_bars(&snapshot)),
            ] {
                if bars.is_empty() {
                    continue;
                }
                println!("{}", i18n.t(heading));
                for bar in bars {
                    let marker = if bar.highlight { "*" } else { " " };
                    println!("  {:<10} {:>5.1} {}", bar.label, bar.height_pct, marker);
                }
            }
        }

        Commands::Contact {
            name,
            mail,
            message,
            number,
            newsletter,
        } => {
            let client = HttpClientFactory::create_client(&config.http);
            let sink = Arc::new(SheetsFormClient::new(client, config.endpoints.form_url.clone()));
            let form = ContactForm {
                name,
                mail,
                message,
                number,
                subscribe_newsletter: newsletter,
            };

            let notification = ContactService::new(sink).submit(form, &i18n).await;
            println!("{}", notification.message);
            if !notification.is_success() {
                anyhow::bail!("Contact form was not delivered");
            }
        }

        Commands::Language { action } => match action {
            LanguageAction::Get => {
                let current = i18n.language().code();
                println!("{}", i18n.tf("language.current", &[("language", current)]));
                for info in i18n.available_languages() {
                    let marker = if info.code == current { "*" } else { " " };
                    println!("{} {:<3} {} ({})", marker, info.code, info.native_name, info.name);
                }
            }
            LanguageAction::Set { language } => {
                let language: Language = language.parse()?;
                languages.set(language)?;
                i18n.set_language(language);
                println!("{}", i18n.tf("language.saved", &[("language", language.code())]));
            }
        },

        Commands::Catalogue { ids } => {
            let catalogue = load_catalogue(&config)?;
            if ids {
                for id in catalogue.ids() {
                    println!("{}", id);
                }
            } else {
                print!("{}", catalogue.to_toml()?);
            }
        }
    }

    Ok(())
}

fn load_catalogue(config: &Config) -> Result<ChartCatalogue> {
    ChartCatalogue::load_or_builtin(config.storage.catalogue_path.as_deref())
}

fn build_cache(config: &Config) -> Result<ChartCache> {
    let catalogue = load_catalogue(config)?;
    Ok(ChartCache::build(&catalogue, config.flat_path_policy)?)
}
