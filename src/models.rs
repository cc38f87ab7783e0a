//! Data models for routes, cities and trip costs

use clap::ValueEnum;

/// Kilometres between two consecutive stops on any route
pub const SEGMENT_DISTANCE_KM: f64 = 300.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum TransportMode {
    Car,
    Train,
    Plane,
}

impl TransportMode {
    /// Price per kilometre
    pub fn rate_per_km(self) -> f64 {
        match self {
            TransportMode::Car => 0.25,
            TransportMode::Train => 0.18,
            TransportMode::Plane => 0.45,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            TransportMode::Car => "Car",
            TransportMode::Train => "Train",
            TransportMode::Plane => "Plane",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum HotelTier {
    Budget,
    Standard,
    Luxury,
}

impl HotelTier {
    /// Multiplier applied to a city's base nightly hotel price
    pub fn multiplier(self) -> f64 {
        match self {
            HotelTier::Budget => 0.8,
            HotelTier::Standard => 1.0,
            HotelTier::Luxury => 1.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CityRecord {
    pub id: String,
    pub name: String,
    pub hotel_name: String,
    pub hotel_price: f64,  // per night
    pub food_name: String,
    pub food_per_day: f64,
    pub sight: String,
    pub location: Coordinate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub name: String,
    pub stops: Vec<String>, // city ids, in travel order
}

#[derive(Debug, Clone, PartialEq)]
pub struct TripConfig {
    pub stops: Vec<String>,
    pub transport: TransportMode,
    pub hotel_tier: HotelTier,
    pub days: u32,
}

/// Hotel cost for one stop on the route; a city visited twice gets two entries
#[derive(Debug, Clone, PartialEq)]
pub struct CityHotelCost {
    pub city_id: String,
    pub amount: f64,
}

/// Result of a trip cost estimate
#[derive(Debug, Clone, PartialEq)]
pub struct CostBreakdown {
    pub transport: TransportMode,
    pub distance_km: f64,
    pub transport_cost: f64,
    pub total_hotel_cost: f64,
    pub total_food_cost: f64,
    pub total_cost: f64,
    pub per_city_hotel_cost: Vec<CityHotelCost>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BudgetVerdict {
    /// Budget covers the trip, with this much left over
    Surplus(f64),
    /// Budget falls short by this much
    Shortfall(f64),
}
