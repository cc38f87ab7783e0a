//! Trip Planner
//!
//! Estimates transport, hotel and food costs for multi-city routes
//! and checks them against a budget.

mod db;
mod estimator;
mod models;

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use rusqlite::Connection;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::models::{BudgetVerdict, HotelTier, TransportMode, TripConfig};

#[derive(Parser)]
#[command(name = "trip-planner")]
#[command(about = "Trip cost estimator for multi-city routes")]
struct Cli {
    /// Path to the SQLite database
    #[arg(short, long, env = "TRIP_PLANNER_DB", default_value = "trip_data.db")]
    database: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate the cost of a trip along a route
    Plan {
        /// Route name (see list-routes)
        route: String,

        /// Mode of transport
        #[arg(short, long, value_enum, default_value = "car")]
        transport: TransportMode,

        /// Hotel pricing tier
        #[arg(long, value_enum, default_value = "standard")]
        tier: HotelTier,

        /// Trip length in days
        #[arg(short, long, default_value = "4", value_parser = clap::value_parser!(u32).range(1..=10))]
        days: u32,

        /// Available budget
        #[arg(short, long, default_value = "1500", value_parser = clap::value_parser!(u32).range(300..=5000))]
        budget: u32,

        /// Charge this food allowance per day in every city instead of the city's own
        #[arg(long, value_parser = parse_food_allowance)]
        flat_food: Option<f64>,

        /// Show hotel, food and sight details for each stop
        #[arg(short, long)]
        verbose: bool,
    },

    /// List all routes in the database
    ListRoutes,

    /// List all cities in the database
    ListCities,

    /// Show details for a specific city
    City {
        /// City ID
        id: String,
    },

    /// Initialize empty database with schema
    Init,

    /// Load the sample route and city catalog
    LoadSample,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let conn = Connection::open(&cli.database)
        .with_context(|| format!("Failed to open {}", cli.database.display()))?;
    db::init_schema(&conn)?;

    match cli.command {
        Commands::Plan {
            route,
            transport,
            tier,
            days,
            budget,
            flat_food,
            verbose,
        } => {
            let plan = plan_trip(&conn, &route, transport, tier, days, budget, flat_food)?;

            if verbose {
                println!("Stops:\n");
                for stop in &plan.stop_details {
                    println!("{}", stop);
                }
            }
            println!("{}", plan.summary);
        }

        Commands::ListRoutes => {
            let routes = db::list_routes(&conn)?;
            if routes.is_empty() {
                println!("No routes in database. Run 'load-sample' first.");
            } else {
                for r in routes {
                    println!("{:<24} {}", r.name, r.stops.join(" -> "));
                }
            }
        }

        Commands::ListCities => {
            let cities = db::list_cities(&conn)?;
            if cities.is_empty() {
                println!("No cities in database. Run 'load-sample' first.");
            } else {
                println!("{:<12} {:>12} {:>12}", "City", "Hotel/night", "Food/day");
                println!("{}", "-".repeat(38));
                for c in cities {
                    println!("{:<12} {:>12.2} {:>12.2}", c.id, c.hotel_price, c.food_per_day);
                }
            }
        }

        Commands::City { id } => {
            if let Some(city) = db::get_city(&conn, &id)? {
                let images = db::get_city_images(&conn, &id)?;
                print!("{}", estimator::format_stop(&city, &images));
                println!(
                    "  Location: {:.4}, {:.4}",
                    city.location.latitude, city.location.longitude
                );
            } else {
                println!("City '{}' not found", id);
            }
        }

        Commands::Init => {
            println!("Database initialized at: {}", cli.database.display());
        }

        Commands::LoadSample => {
            load_sample_data(&conn)?;
            println!("Sample data loaded successfully!");
        }
    }

    Ok(())
}

/// Parse a per-day food allowance; must be a finite, non-negative amount
fn parse_food_allowance(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|_| format!("'{}' is not a number", s))?;
    if !value.is_finite() || value < 0.0 {
        return Err(format!("food allowance must be a non-negative amount, got {}", s));
    }
    Ok(value)
}

/// A priced trip plus the rendered details of each stop
struct TripPlan {
    summary: estimator::TripSummary,
    stop_details: Vec<String>,
}

/// Price a catalog route, optionally with one food allowance for every city
fn plan_trip(
    conn: &Connection,
    route_name: &str,
    transport: TransportMode,
    tier: HotelTier,
    days: u32,
    budget: u32,
    flat_food: Option<f64>,
) -> Result<TripPlan> {
    let route = db::get_route(conn, route_name)?.ok_or_else(|| {
        anyhow!(
            "Route '{}' not found. Run 'list-routes' to see available routes.",
            route_name
        )
    })?;

    let mut city_data = db::load_city_data(conn, &route)?;
    if let Some(per_day) = flat_food {
        for city in city_data.values_mut() {
            city.food_per_day = per_day;
        }
    }

    let config = TripConfig {
        stops: route.stops.clone(),
        transport,
        hotel_tier: tier,
        days,
    };
    let breakdown = estimator::estimate(&config, &city_data)
        .with_context(|| format!("Cannot plan route '{}'", route.name))?;

    let mut stop_details = Vec::with_capacity(route.stops.len());
    let mut stop_names = Vec::with_capacity(route.stops.len());
    for id in &route.stops {
        // estimate succeeded, so every stop has a record
        if let Some(city) = city_data.get(id) {
            let images = db::get_city_images(conn, id)?;
            stop_details.push(estimator::format_stop(city, &images));
            stop_names.push(city.name.clone());
        }
    }

    let summary =
        estimator::TripSummary::new(&route.name, stop_names, breakdown, f64::from(budget));
    if let BudgetVerdict::Shortfall(missing) = summary.verdict {
        info!(route = %route.name, missing, "budget short");
    }

    Ok(TripPlan {
        summary,
        stop_details,
    })
}

/// (id, hotel, hotel price, dish, food per day, sight, lat, lon, images)
type SampleCity = (
    &'static str,
    &'static str,
    f64,
    &'static str,
    f64,
    &'static str,
    f64,
    f64,
    &'static [&'static str],
);

const SAMPLE_CITIES: &[SampleCity] = &[
    (
        "Sofia",
        "Hotel Anel",
        70.0,
        "Traditional Bulgarian cuisine",
        20.0,
        "Alexander Nevsky Cathedral",
        42.6977,
        23.3219,
        &[
            "https://upload.wikimedia.org/wikipedia/commons/6/6c/Hotel_Anel_Sofia.jpg",
            "https://upload.wikimedia.org/wikipedia/commons/4/48/Hotel_Anel_lobby.jpg",
        ],
    ),
    (
        "Belgrade",
        "Hotel Moskva",
        65.0,
        "Serbian grill",
        22.0,
        "Kalemegdan",
        44.7866,
        20.4489,
        &["https://upload.wikimedia.org/wikipedia/commons/5/57/Hotel_Moskva_Belgrade.jpg"],
    ),
    (
        "Vienna",
        "Austria Trend Hotel Savoyen",
        90.0,
        "Wiener schnitzel",
        30.0,
        "Schonbrunn Palace",
        48.2082,
        16.3738,
        &["https://upload.wikimedia.org/wikipedia/commons/7/77/Austria_Trend_Savoyen_Vienna.jpg"],
    ),
    (
        "Munich",
        "Munich Central Hotel",
        95.0,
        "German cuisine",
        28.0,
        "Marienplatz",
        48.1351,
        11.5820,
        &["https://upload.wikimedia.org/wikipedia/commons/2/2a/Munich_Central_Hotel.jpg"],
    ),
    (
        "Paris",
        "Pullman Paris Tour Eiffel",
        120.0,
        "French cuisine",
        35.0,
        "Eiffel Tower",
        48.8566,
        2.3522,
        &["https://upload.wikimedia.org/wikipedia/commons/1/1c/Pullman_Paris_Tour_Eiffel.jpg"],
    ),
    (
        "Rome",
        "Hotel Quirinale",
        110.0,
        "Italian cuisine",
        32.0,
        "Colosseum",
        41.9028,
        12.4964,
        &["https://upload.wikimedia.org/wikipedia/commons/8/81/Hotel_Quirinale_Rome.jpg"],
    ),
    (
        "Milan",
        "Hotel Berna",
        105.0,
        "Italian cuisine",
        30.0,
        "Duomo di Milano",
        45.4642,
        9.1900,
        &["https://upload.wikimedia.org/wikipedia/commons/6/60/Hotel_Berna_Milano.jpg"],
    ),
    (
        "London",
        "Park Plaza Westminster Bridge",
        130.0,
        "English cuisine",
        35.0,
        "Big Ben",
        51.5074,
        -0.1278,
        &["https://upload.wikimedia.org/wikipedia/commons/0/02/Park_Plaza_Westminster_Bridge_London.jpg"],
    ),
];

const SAMPLE_ROUTES: &[(&str, &[&str])] = &[
    ("Bulgaria-Germany", &["Sofia", "Belgrade", "Vienna", "Munich"]),
    ("Bulgaria-France", &["Sofia", "Vienna", "Munich", "Paris"]),
    ("Bulgaria-Italy", &["Sofia", "Vienna", "Munich", "Rome", "Milan"]),
    ("Bulgaria-England", &["Sofia", "Vienna", "Munich", "London"]),
];

/// Load the sample route and city catalog
fn load_sample_data(conn: &Connection) -> Result<()> {
    use crate::models::{CityRecord, Coordinate, Route};

    db::clear_catalog(conn)?;

    for &(id, hotel_name, hotel_price, food_name, food_per_day, sight, latitude, longitude, images) in
        SAMPLE_CITIES
    {
        let city = CityRecord {
            id: id.to_string(),
            name: id.to_string(),
            hotel_name: hotel_name.to_string(),
            hotel_price,
            food_name: food_name.to_string(),
            food_per_day,
            sight: sight.to_string(),
            location: Coordinate {
                latitude,
                longitude,
            },
        };
        db::upsert_city(conn, &city)?;
        for url in images {
            db::insert_city_image(conn, id, url)?;
        }
    }

    for &(name, stops) in SAMPLE_ROUTES {
        let route = Route {
            name: name.to_string(),
            stops: stops.iter().map(|s| s.to_string()).collect(),
        };
        db::insert_route(conn, &route)?;
    }

    info!(
        cities = SAMPLE_CITIES.len(),
        routes = SAMPLE_ROUTES.len(),
        "loaded sample catalog"
    );
    println!(
        "Loaded {} sample cities and {} routes",
        SAMPLE_CITIES.len(),
        SAMPLE_ROUTES.len()
    );
    Ok(())
}
