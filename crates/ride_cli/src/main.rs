//! Headless run of the live map engine: a simulated rider walks north while the
//! roster jitters, and every map snapshot is logged.

mod logging;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use log::{error, info, warn, LevelFilter};
use ride_core::booking::RideBooking;
use ride_core::config::RideConfig;
use ride_core::geo::Coordinate;
use ride_core::geocoding::{
    DebouncedSearch, GeoapifyClient, NoGeocoder, PlaceCandidate, PlaceSearch, ReverseGeocoder,
};
use ride_core::live_map::{LiveMap, MapSnapshot};
use ride_core::location::{LocationController, LocationStore, SimulatedLocationProvider};
use ride_core::pricing::FareQuote;
use ride_core::roster::{DriverStore, RosterJitter, RosterSimulator};
use ride_core::task::TaskHandle;

const START: Coordinate = Coordinate::new(37.7749, -122.4194);
const DESTINATION: Coordinate = Coordinate::new(37.7955, -122.3937);
const DESTINATION_NAME: &str = "Ferry Building";

/// Upper bound on waiting for a destination search after the debounce.
const SEARCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Latitude step between simulated fixes, roughly 55 m.
const WALK_STEP_DEGREES: f64 = 0.0005;

#[derive(Parser)]
#[command(
    name = "ride",
    about = "Drive the live map engine with a simulated rider and roster"
)]
struct Cli {
    /// Number of simulated location updates before exiting
    #[arg(long, default_value_t = 5)]
    updates: u32,
    /// Seed for the roster jitter (overrides ROSTER_SEED)
    #[arg(long)]
    seed: Option<u64>,
    /// Roster refresh period in seconds (overrides ROSTER_TICK_SECS)
    #[arg(long)]
    tick_secs: Option<u64>,
    /// Console log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
    /// Optional log4rs YAML file replacing the console setup
    #[arg(long, env = "LOG_CONFIG")]
    log_config: Option<String>,
    /// Destination to look up through place search (needs GEOAPIFY_API_KEY)
    #[arg(long)]
    destination: Option<String>,
}

/// Run one debounced search and take its first candidate.
async fn search_destination(
    search: Arc<dyn PlaceSearch>,
    text: &str,
    debounce: Duration,
) -> Option<PlaceCandidate> {
    let search = DebouncedSearch::new(search, debounce);
    let mut state = search.state().subscribe();
    search.query(text);

    let settled = tokio::time::timeout(debounce + SEARCH_TIMEOUT, async {
        loop {
            if state.changed().await.is_err() {
                break;
            }
            if !state.borrow_and_update().is_searching {
                break;
            }
        }
    })
    .await;
    if settled.is_err() {
        warn!("(search_destination) no answer for '{}'", text);
        search.cancel();
        return None;
    }

    let result = search.state().get();
    if let Some(e) = &result.error {
        warn!("(search_destination) '{}': {}", text, e);
    }
    result.candidates.into_iter().next()
}

fn describe(snapshot: &MapSnapshot) -> String {
    let nearest = match &snapshot.nearest {
        Some(nearest) => format!(
            "{} ({:.2} km, ~{} min)",
            nearest.driver.name, nearest.distance_km, nearest.drive_time_minutes
        ),
        None => "none".to_string(),
    };
    format!(
        "region ({:.4}, {:.4}) span {:.4}x{:.4} | {} markers | nearest {}",
        snapshot.region.latitude,
        snapshot.region.longitude,
        snapshot.region.latitude_delta,
        snapshot.region.longitude_delta,
        snapshot.markers.len(),
        nearest
    )
}

fn spawn_snapshot_logger(map: &LiveMap) -> TaskHandle {
    let mut snapshots = map.snapshot().subscribe();
    TaskHandle::spawn(move |token| async move {
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                changed = snapshots.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let line = describe(&snapshots.borrow_and_update());
                    info!("(snapshot) {}", line);
                }
            }
        }
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = cli.log_level.parse().unwrap_or(LevelFilter::Info);
    let log_handle = logging::init(level);
    if let (Some(handle), Some(path)) = (&log_handle, &cli.log_config) {
        if let Err(e) = logging::load_config_file(handle, path) {
            error!("(main) {}", e);
        }
    }

    let mut config = RideConfig::try_from_env()
        .map_err(|e| format!("Failed to load configuration from environment: {}", e))?;
    if cli.seed.is_some() {
        config.roster_seed = cli.seed;
    }
    if let Some(tick_secs) = cli.tick_secs {
        config.roster_tick_secs = tick_secs;
    }
    info!("(main) configuration loaded");

    let client = match GeoapifyClient::from_config(&config) {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            warn!("(main) {}; addresses will stay unresolved", e);
            None
        }
    };
    let geocoder: Arc<dyn ReverseGeocoder> = match &client {
        Some(client) => client.clone(),
        None => Arc::new(NoGeocoder),
    };

    let location = LocationStore::new();
    let drivers = DriverStore::with_mock_drivers();
    let provider = Arc::new(SimulatedLocationProvider::granted(START));

    let map = LiveMap::from_config(location.clone(), drivers.clone(), &config)?;
    let simulator = RosterSimulator::new(
        drivers.clone(),
        location.clone(),
        config.roster_tick_period()?,
        RosterJitter::new(config.roster_seed),
    );
    let controller = LocationController::new(
        provider.clone(),
        geocoder,
        location.clone(),
        config.watch_thresholds(),
    );

    let mut snapshot_logger = spawn_snapshot_logger(&map);
    let mut projector = map.spawn_projector();
    let mut roster_timer = simulator.attach();

    let state = controller.start().await;
    info!("(main) location tracking: {:?}", state);
    let found = match (&cli.destination, &client) {
        (Some(text), Some(client)) => {
            search_destination(client.clone(), text, config.search_debounce()).await
        }
        (Some(text), None) => {
            warn!("(main) cannot search for '{}' without a geocoding key", text);
            None
        }
        (None, _) => None,
    };
    match found {
        Some(candidate) => {
            info!("(main) destination: {}", candidate.name);
            location.choose_destination(&candidate);
        }
        None => {
            location.set_destination_location(DESTINATION, Some(DESTINATION_NAME.to_string()))
        }
    }

    let mut position = START;
    for _ in 0..cli.updates {
        tokio::time::sleep(simulator.period()).await;
        position = position.offset(WALK_STEP_DEGREES, 0.0);
        if !provider.push_fix(position) {
            warn!("(main) location subscription is not listening");
        }
    }
    // let the last fix reach the snapshot
    tokio::time::sleep(Duration::from_millis(100)).await;

    let snapshot = map.current();
    let trip = location.snapshot();
    match (&snapshot.nearest, trip.user, trip.destination) {
        (Some(nearest), Some(user), Some(destination)) => {
            let fare =
                FareQuote::for_driver(&nearest.driver, user, destination, config.service_fee);
            match RideBooking::prepare("demo-user", &trip, &nearest.driver, &fare) {
                Ok(booking) => info!(
                    "(main) booking {} for {}",
                    serde_json::to_string(&booking)?,
                    fare.display_total()
                ),
                Err(e) => error!("(main) could not prepare booking: {}", e),
            }
        }
        _ => warn!("(main) no driver available for a booking"),
    }

    controller.stop();
    roster_timer.cancel();
    projector.cancel();
    snapshot_logger.cancel();

    info!("(main) shutdown");
    log::logger().flush();
    Ok(())
}
