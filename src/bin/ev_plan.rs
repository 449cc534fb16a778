//! Command-line front-end: plan charging stops between two places.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ev_route_planner::config::PlannerConfig;
use ev_route_planner::geocode::NominatimClient;
use ev_route_planner::haversine::HaversineRouter;
use ev_route_planner::osrm::OsrmClient;
use ev_route_planner::station::JsonStationDirectory;
use ev_route_planner::traits::{GeocodingProvider, RoutingProvider};
use ev_route_planner::{Coordinate, Planner, PlanningStrategy, Result, RoutePlan, RouteStop, VehicleState};

/// Exit status when no feasible plan exists.
const EXIT_STRANDED: u8 = 2;

#[derive(Debug, Parser)]
#[command(name = "ev-plan", version, about = "Plan EV charging stops along a road route")]
struct Cli {
    /// Origin place name (geocoded).
    #[arg(long, required_unless_present = "from_coord", conflicts_with = "from_coord")]
    from: Option<String>,

    /// Origin as "lat,lng".
    #[arg(long, value_parser = parse_coordinate)]
    from_coord: Option<Coordinate>,

    /// Destination place name (geocoded).
    #[arg(long, required_unless_present = "to_coord", conflicts_with = "to_coord")]
    to: Option<String>,

    /// Destination as "lat,lng".
    #[arg(long, value_parser = parse_coordinate)]
    to_coord: Option<Coordinate>,

    /// Region appended to place names when geocoding.
    #[arg(long)]
    region: Option<String>,

    /// JSON file with the station snapshot.
    #[arg(long)]
    stations: PathBuf,

    /// Current state of charge in percent.
    #[arg(long, default_value_t = 100.0)]
    battery: f64,

    /// Range on a full battery in km.
    #[arg(long)]
    range_km: f64,

    /// Battery capacity in kWh.
    #[arg(long)]
    capacity_kwh: f64,

    /// Planning strategy: geometry or sequential.
    #[arg(long, default_value = "sequential")]
    strategy: PlanningStrategy,

    #[arg(long)]
    lateral_start_km: Option<f64>,

    #[arg(long)]
    lateral_step_km: Option<f64>,

    #[arg(long)]
    lateral_max_km: Option<f64>,

    /// Skip stations slower than this to fill the pack from empty.
    #[arg(long, conflicts_with = "no_charge_ceiling")]
    max_full_charge_hours: Option<f64>,

    /// Allow any charger regardless of speed.
    #[arg(long)]
    no_charge_ceiling: bool,

    /// Never plan below this battery percentage.
    #[arg(long)]
    min_battery: Option<f64>,

    /// Route along straight lines instead of calling OSRM.
    #[arg(long)]
    offline: bool,

    /// Print the plan as JSON.
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) if err.is_stranded() => {
            eprintln!("no feasible plan: {}", err);
            ExitCode::from(EXIT_STRANDED)
        }
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let mut config = PlannerConfig::from_env();
    apply_overrides(&cli, &mut config);

    let vehicle = VehicleState::new(cli.battery, cli.range_km, cli.capacity_kwh);
    vehicle.validate()?;

    let geocoder = if cli.from_coord.is_none() || cli.to_coord.is_none() {
        Some(NominatimClient::new(config.nominatim.clone())?)
    } else {
        None
    };
    let region = cli.region.as_deref();
    let origin = resolve(cli.from.as_deref(), cli.from_coord, region, geocoder.as_ref())?;
    let destination = resolve(cli.to.as_deref(), cli.to_coord, region, geocoder.as_ref())?;

    let router: Box<dyn RoutingProvider> = if cli.offline {
        Box::new(HaversineRouter::default())
    } else {
        Box::new(OsrmClient::new(config.osrm.clone())?)
    };
    let planner = Planner::new(router.as_ref(), config.options);
    let directory = JsonStationDirectory::new(&cli.stations);

    info!(%origin, %destination, strategy = %cli.strategy, "planning journey");
    let plan = planner.plan_with_directory(cli.strategy, origin, destination, &directory, &vehicle)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        print_summary(&plan);
    }
    Ok(())
}

fn apply_overrides(cli: &Cli, config: &mut PlannerConfig) {
    let options = &mut config.options;
    if let Some(km) = cli.lateral_start_km {
        options.lateral_search_start_km = km;
    }
    if let Some(km) = cli.lateral_step_km {
        options.lateral_search_step_km = km;
    }
    if let Some(km) = cli.lateral_max_km {
        options.lateral_search_max_km = km;
    }
    if cli.no_charge_ceiling {
        options.max_full_charge_time_hours = None;
    } else if let Some(hours) = cli.max_full_charge_hours {
        options.max_full_charge_time_hours = Some(hours);
    }
    if let Some(percent) = cli.min_battery {
        options.min_battery_threshold_percent = percent;
    }
}

fn resolve(
    place: Option<&str>,
    coordinate: Option<Coordinate>,
    region: Option<&str>,
    geocoder: Option<&NominatimClient>,
) -> Result<Coordinate> {
    match (coordinate, place, geocoder) {
        (Some(coordinate), _, _) => {
            coordinate.validate()?;
            Ok(coordinate)
        }
        (None, Some(place), Some(geocoder)) => geocoder.geocode(place, region),
        _ => Err(ev_route_planner::Error::InvalidInput {
            message: "either a place name or a coordinate is required".to_string(),
        }),
    }
}

fn parse_coordinate(value: &str) -> std::result::Result<Coordinate, String> {
    let (lat, lng) = value
        .split_once(',')
        .ok_or_else(|| format!("expected \"lat,lng\", got {:?}", value))?;
    let lat = lat.trim().parse::<f64>().map_err(|err| format!("latitude: {}", err))?;
    let lng = lng.trim().parse::<f64>().map_err(|err| format!("longitude: {}", err))?;
    Ok(Coordinate::new(lat, lng))
}

fn print_summary(plan: &RoutePlan) {
    println!("Strategy:    {}", plan.strategy);
    println!("Main route:  {:.1} km", plan.direct_distance_km);
    println!("Smart route: {:.1} km ({:+.1} km)", plan.total_distance_km, plan.detour_km());
    println!();

    for stop in &plan.stops {
        match stop {
            RouteStop::Start {
                coordinate,
                battery_percent,
            } => println!("  start        {}  battery {:.0}%", coordinate, battery_percent),
            RouteStop::ChargingStop {
                distance_from_start_km,
                battery_before_percent,
                station,
                charging_hours,
                ..
            } => println!(
                "  charge {:>6.1} km  {} [{}]  arrive {:.0}%  charge {:.2} h ({:.0} min) at {:.0} kW",
                distance_from_start_km,
                station.name,
                station.id,
                battery_before_percent,
                charging_hours,
                charging_hours * 60.0,
                station.power_rating_kw
            ),
            RouteStop::Destination {
                coordinate,
                distance_from_start_km,
                battery_after_percent,
            } => println!(
                "  arrive {:>6.1} km  {}  battery {:.0}%",
                distance_from_start_km, coordinate, battery_after_percent
            ),
        }
    }

    println!();
    println!(
        "{} charging stop(s), {:.2} h charging in total",
        plan.charging_stop_count(),
        plan.total_charging_hours
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(extra: &[&str]) -> Cli {
        let mut args = vec![
            "ev-plan",
            "--from-coord=36.17,-115.14",
            "--to-coord=34.05,-118.24",
            "--stations",
            "stations.json",
            "--range-km",
            "320",
            "--capacity-kwh",
            "60",
        ];
        args.extend_from_slice(extra);
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn parses_lat_lng_pairs() {
        let coordinate = parse_coordinate(" 9.93 , 76.27").unwrap();
        assert_eq!(coordinate, Coordinate::new(9.93, 76.27));
    }

    #[test]
    fn rejects_malformed_coordinates() {
        assert!(parse_coordinate("9.93").is_err());
        assert!(parse_coordinate("north,76.27").unwrap_err().starts_with("latitude"));
        assert!(parse_coordinate("9.93,east").unwrap_err().starts_with("longitude"));
    }

    #[test]
    fn no_charge_ceiling_overrides_config() {
        let mut config = PlannerConfig::default();
        assert_eq!(config.options.max_full_charge_time_hours, Some(3.0));

        apply_overrides(&cli(&["--no-charge-ceiling"]), &mut config);
        assert_eq!(config.options.max_full_charge_time_hours, None);
    }

    #[test]
    fn flags_override_planning_options() {
        let mut config = PlannerConfig::default();
        let args = cli(&[
            "--max-full-charge-hours",
            "1.5",
            "--min-battery",
            "15",
            "--lateral-max-km",
            "25",
            "--strategy",
            "Geometry",
        ]);
        apply_overrides(&args, &mut config);

        assert_eq!(args.strategy, PlanningStrategy::Geometry);
        assert_eq!(config.options.max_full_charge_time_hours, Some(1.5));
        assert_eq!(config.options.min_battery_threshold_percent, 15.0);
        assert_eq!(config.options.lateral_search_max_km, 25.0);
        assert_eq!(config.options.lateral_search_start_km, 10.0);
    }

    #[test]
    fn ceiling_flags_conflict() {
        let result = Cli::try_parse_from([
            "ev-plan",
            "--from",
            "Kochi",
            "--to",
            "Mangalore",
            "--stations",
            "stations.json",
            "--range-km",
            "320",
            "--capacity-kwh",
            "60",
            "--no-charge-ceiling",
            "--max-full-charge-hours",
            "2",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn resolve_prefers_explicit_coordinates() {
        let coordinate = Coordinate::new(9.93, 76.27);
        assert_eq!(resolve(Some("Kochi"), Some(coordinate), None, None).unwrap(), coordinate);

        let out_of_range = Coordinate::new(95.0, 0.0);
        assert!(matches!(
            resolve(None, Some(out_of_range), None, None),
            Err(ev_route_planner::Error::InvalidInput { .. })
        ));
        assert!(resolve(Some("Kochi"), None, None, None).is_err());
    }
}
