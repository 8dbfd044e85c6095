use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

use citybike_client::api::{ApiClient, ApiError, Backend, MockBackend};
use citybike_client::config::ClientConfig;
use citybike_client::domain::{
    JourneyPage, JourneyView, MonthSelection, Page, Station, StationKey,
};
use citybike_client::journeys::{JourneyPageCache, SortColumn, SortOrder};
use citybike_client::stations::StationDirectory;
use citybike_client::view::{
    JourneyListController, Route, SortState, StationDetailController, StationListController,
    Top5Panel,
};

#[derive(Parser)]
#[command(name = "citybike", version, about = "Browse city bicycle journeys and stations")]
struct Cli {
    /// Journeys API base URL (overrides CITYBIKE_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Serve data from stations.json and journeys.json in this directory
    /// instead of calling the API
    #[arg(long, global = true)]
    mock: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List journeys
    Journeys {
        #[arg(long, default_value_t = 0)]
        page: usize,
        /// Journeys per page (defaults to CITYBIKE_PAGE_SIZE or 30)
        #[arg(long)]
        size: Option<usize>,
        /// Sort order such as distanceDesc or departureAsc
        #[arg(long)]
        sort: Option<SortOrder>,
        /// Comma-separated months, e.g. 5,6 (default: May to July)
        #[arg(long)]
        months: Option<MonthSelection>,
    },
    /// List stations, 25 per page
    Stations {
        #[arg(long, default_value_t = 0)]
        page: usize,
    },
    /// Show one station with its statistics
    Station {
        id: String,
        #[arg(long)]
        months: Option<MonthSelection>,
        /// Also show the top-5 return and departure stations
        #[arg(long)]
        top5: bool,
    },
    /// Show one journey
    Journey { id: u64 },
    /// Open a client route such as /stations/12
    Open { path: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(log_filter(
            std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref(),
        ))
        .init();

    let cli = Cli::parse();

    let mut config = ClientConfig::from_env();
    if let Some(url) = cli.api_url {
        config = config.with_base_url(url);
    }

    match cli.mock {
        Some(dir) => {
            info!(dir = %dir.display(), "using mock data");
            let backend = MockBackend::from_dir(&dir)?;
            run(backend, &config, cli.command).await?;
        }
        None => {
            info!(base_url = %config.api.base_url, "using journeys API");
            let backend = ApiClient::new(config.api.clone())?;
            run(backend, &config, cli.command).await?;
        }
    }

    Ok(())
}

/// Filter from `RUST_LOG` when it is set and valid, `info` otherwise.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

async fn run<B: Backend + Clone>(
    backend: B,
    config: &ClientConfig,
    command: Command,
) -> Result<(), Box<dyn std::error::Error>> {
    let cache = JourneyPageCache::new(backend.clone());
    let directory = StationDirectory::new(backend, &config.directory);

    match command {
        Command::Journeys {
            page,
            size,
            sort,
            months,
        } => {
            let mut list = JourneyListController::new(&cache, &directory, config.page_size)
                .with_sort(sort)
                .with_months(months.unwrap_or_default());
            let journeys = list
                .change_page(size.unwrap_or(config.page_size), page)
                .await?;
            print_journeys(&journeys, list.sort(), list.page_size());
        }
        Command::Stations { page } => {
            let mut list = StationListController::new(&directory);
            let stations = list.change_page(page).await?;
            print_stations(&stations, page);
        }
        Command::Station { id, months, top5 } => {
            let key = StationKey::parse(&id)?;
            show_station(&directory, config, key, months, top5).await?;
        }
        Command::Journey { id } => {
            let journey = directory.backend().journey(id).await?;
            let snapshot = directory.load_all().await?;
            let stations = snapshot.as_ref();
            let view = JourneyView::resolve(&journey, |id| stations.get(id));

            println!("Journey {}", journey.id);
            if let Some(date) = journey.departure_date {
                println!("  Departed:  {}", date);
            }
            if let Some(date) = journey.return_date {
                println!("  Returned:  {}", date);
            }
            println!("  From:      {}", view.departure_name());
            println!("  To:        {}", view.return_name());
            println!("  Distance:  {} km", view.distance_km());
            println!("  Duration:  {} min", view.duration_minutes());
        }
        Command::Open { path } => match Route::parse(&path) {
            Route::Journeys => {
                let mut list = JourneyListController::new(&cache, &directory, config.page_size);
                let journeys = list.load().await?;
                print_journeys(&journeys, list.sort(), list.page_size());
            }
            Route::Stations => {
                let mut list = StationListController::new(&directory);
                print_stations(&list.load().await?, 0);
            }
            Route::Station(key) => show_station(&directory, config, key, None, false).await?,
            Route::License => print_license(),
            Route::NotFound => println!("Page not found: {}", path),
        },
    }

    Ok(())
}

async fn show_station<B: Backend>(
    directory: &StationDirectory<B>,
    config: &ClientConfig,
    key: StationKey,
    months: Option<MonthSelection>,
    top5: bool,
) -> Result<(), ApiError> {
    let mut detail =
        StationDetailController::new(directory, key).with_summary_timeout(config.summary_timeout);

    match months {
        Some(months) => {
            if !detail.select_months(months).await? {
                detail.load().await?;
            }
        }
        None => detail.load().await?,
    }

    if let Some(station) = detail.station() {
        println!("{} ({})", station.name, station.station_id);
        println!("  Address: {}", station.address);
    }
    println!("  Months:  {}", detail.months());
    if let Some(summary) = detail.summary() {
        println!("  Journeys starting here:   {}", summary.total_from);
        println!("  Journeys ending here:     {}", summary.total_to);
        println!("  Average distance from:    {} km", summary.avg_from_display());
        println!("  Average distance to:      {} km", summary.avg_to_display());
    }

    if top5 {
        detail.toggle_top5_returns().await?;
        detail.toggle_top5_departures().await?;
        print_top5("Top 5 return stations for journeys starting here", detail.top5_returns());
        print_top5("Top 5 departure stations for journeys ending here", detail.top5_departures());
    }

    Ok(())
}

fn print_journeys(page: &JourneyPage, sort: &SortState, page_size: usize) {
    let header = |column: SortColumn, title: &str| format!("{}{}", title, sort.indicator(column));

    println!(
        "{:<32} {:<32} {:>14} {:>14}",
        header(SortColumn::Departure, "Departure station"),
        header(SortColumn::Return, "Return station"),
        header(SortColumn::Distance, "Distance (km)"),
        header(SortColumn::Duration, "Duration (min)"),
    );
    for journey in &page.items {
        println!(
            "{:<32} {:<32} {:>14} {:>14}",
            journey.departure_name(),
            journey.return_name(),
            journey.distance_km(),
            journey.duration_minutes(),
        );
    }
    println!(
        "Page {} ({} per page), {} journeys in total",
        page.page_index, page_size, page.count
    );
}

fn print_stations(page: &Page<Station>, page_index: usize) {
    println!("{:>5} {:<8} {:<32} {}", "Id", "Station", "Name", "Address");
    for station in &page.items {
        println!(
            "{:>5} {:<8} {:<32} {}",
            station.key, station.station_id, station.name, station.address
        );
    }
    println!("Page {}, {} stations in total", page_index, page.count);
}

fn print_top5(title: &str, panel: &Top5Panel) {
    println!("{}:", title);
    for (rank, station) in panel.stations().iter().enumerate() {
        println!("  {}. {}", rank + 1, station.name);
    }
}

fn print_license() {
    println!("Journey data is owned by City Bike Finland.");
    println!("Station data: Helsinki Region Transport (HSL), licensed under CC BY 4.0.");
}
