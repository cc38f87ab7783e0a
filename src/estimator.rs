//! Trip cost estimation logic

use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

use crate::models::{
    BudgetVerdict, CityHotelCost, CityRecord, CostBreakdown, SEGMENT_DISTANCE_KM, TripConfig,
};

/// Rejected trip configurations. No partial breakdown is ever produced.
#[derive(Debug, Error, PartialEq)]
pub enum EstimateError {
    #[error("invalid input: route has no cities")]
    EmptyRoute,
    #[error("invalid input: no data for city '{0}'")]
    UnknownCity(String),
    #[error("invalid input: trip must last at least one day (got {0})")]
    NonPositiveDays(u32),
}

/// Estimate the cost of a trip
///
/// Transport is charged for a fixed hop distance between consecutive stops.
/// Hotel and food are charged per stop for the full trip length, so a city
/// appearing twice on the route is paid for twice.
pub fn estimate(
    config: &TripConfig,
    city_data: &HashMap<String, CityRecord>,
) -> Result<CostBreakdown, EstimateError> {
    if config.stops.is_empty() {
        return Err(EstimateError::EmptyRoute);
    }
    if config.days < 1 {
        return Err(EstimateError::NonPositiveDays(config.days));
    }

    let records = config
        .stops
        .iter()
        .map(|id| {
            city_data
                .get(id)
                .ok_or_else(|| EstimateError::UnknownCity(id.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let days = f64::from(config.days);
    let distance_km = SEGMENT_DISTANCE_KM * (records.len() - 1) as f64;
    let transport_cost = distance_km * config.transport.rate_per_km();

    let multiplier = config.hotel_tier.multiplier();
    let mut per_city_hotel_cost = Vec::with_capacity(records.len());
    let mut total_hotel_cost = 0.0;
    let mut total_food_cost = 0.0;

    for record in records {
        let hotel = record.hotel_price * multiplier * days;
        total_hotel_cost += hotel;
        total_food_cost += record.food_per_day * days;
        per_city_hotel_cost.push(CityHotelCost {
            city_id: record.id.clone(),
            amount: hotel,
        });
    }

    debug!(
        stops = config.stops.len(),
        transport = ?config.transport,
        tier = ?config.hotel_tier,
        days = config.days,
        "estimated trip"
    );

    Ok(CostBreakdown {
        transport: config.transport,
        distance_km,
        transport_cost,
        total_hotel_cost,
        total_food_cost,
        total_cost: transport_cost + total_hotel_cost + total_food_cost,
        per_city_hotel_cost,
    })
}

/// Compare an estimate against the traveller's budget
pub fn compare_budget(breakdown: &CostBreakdown, budget: f64) -> BudgetVerdict {
    if breakdown.total_cost <= budget {
        BudgetVerdict::Surplus(budget - breakdown.total_cost)
    } else {
        BudgetVerdict::Shortfall(breakdown.total_cost - budget)
    }
}

/// Format one stop of the route with its hotel, dish and sight
pub fn format_stop(city: &CityRecord, images: &[String]) -> String {
    let mut output = String::new();
    output.push_str(&format!("* {}\n", city.name));
    output.push_str(&format!(
        "  Hotel: {} - {:.2}/night\n",
        city.hotel_name, city.hotel_price
    ));
    output.push_str(&format!(
        "  Food:  {} - {:.2}/day\n",
        city.food_name, city.food_per_day
    ));
    output.push_str(&format!("  Sight: {}\n", city.sight));
    for url in images {
        output.push_str(&format!("  Image: {}\n", url));
    }
    output
}

/// A priced trip ready for display
#[derive(Debug)]
pub struct TripSummary {
    pub route_name: String,
    pub stop_names: Vec<String>,
    pub breakdown: CostBreakdown,
    pub budget: f64,
    pub verdict: BudgetVerdict,
}

impl TripSummary {
    pub fn new(
        route_name: &str,
        stop_names: Vec<String>,
        breakdown: CostBreakdown,
        budget: f64,
    ) -> Self {
        let verdict = compare_budget(&breakdown, budget);
        TripSummary {
            route_name: route_name.to_string(),
            stop_names,
            breakdown,
            budget,
            verdict,
        }
    }
}

impl std::fmt::Display for TripSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let b = &self.breakdown;

        writeln!(f, "=== Trip: {} ===", self.route_name)?;
        writeln!(f, "Route: {}", self.stop_names.join(" -> "))?;
        writeln!(f)?;

        writeln!(f, "Costs:")?;
        writeln!(
            f,
            "  Transport ({}, {:.0} km): {:.2}",
            b.transport.display_name(),
            b.distance_km,
            b.transport_cost
        )?;
        writeln!(f, "  Food:    {:.2}", b.total_food_cost)?;
        writeln!(f, "  Hotels:  {:.2}", b.total_hotel_cost)?;
        for hotel in &b.per_city_hotel_cost {
            writeln!(f, "    {:<20} {:>10.2}", hotel.city_id, hotel.amount)?;
        }
        writeln!(f)?;

        writeln!(f, "Total:  {:.2}", b.total_cost)?;
        writeln!(f, "Budget: {:.2}", self.budget)?;
        match self.verdict {
            BudgetVerdict::Surplus(left) => {
                writeln!(f, "Budget is sufficient, {:.2} left over. Have a nice trip!", left)?
            }
            BudgetVerdict::Shortfall(missing) => writeln!(
                f,
                "Budget falls short by {:.2}. Consider cheaper transport or fewer days.",
                missing
            )?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Coordinate, HotelTier, TransportMode};
    use proptest::prelude::*;

    fn city(id: &str, hotel: f64, food: f64) -> CityRecord {
        CityRecord {
            id: id.to_string(),
            name: id.to_string(),
            hotel_name: format!("{} Hotel", id),
            hotel_price: hotel,
            food_name: "Local food".to_string(),
            food_per_day: food,
            sight: "Old town".to_string(),
            location: Coordinate {
                latitude: 0.0,
                longitude: 0.0,
            },
        }
    }

    fn sample_data() -> HashMap<String, CityRecord> {
        [city("A", 70.0, 20.0), city("B", 65.0, 22.0), city("C", 90.0, 30.0)]
            .into_iter()
            .map(|c| (c.id.clone(), c))
            .collect()
    }

    fn config(stops: &[&str], transport: TransportMode, tier: HotelTier, days: u32) -> TripConfig {
        TripConfig {
            stops: stops.iter().map(|s| s.to_string()).collect(),
            transport,
            hotel_tier: tier,
            days,
        }
    }

    #[test]
    fn three_city_car_trip() {
        let cfg = config(&["A", "B", "C"], TransportMode::Car, HotelTier::Standard, 4);
        let b = estimate(&cfg, &sample_data()).unwrap();

        assert_eq!(b.distance_km, 600.0);
        assert!((b.transport_cost - 150.0).abs() < 1e-9);
        assert!((b.total_hotel_cost - 900.0).abs() < 1e-9);
        assert!((b.total_food_cost - 288.0).abs() < 1e-9);
        assert!((b.total_cost - 1338.0).abs() < 1e-9);

        let per_city: Vec<_> = b
            .per_city_hotel_cost
            .iter()
            .map(|h| (h.city_id.as_str(), h.amount))
            .collect();
        assert_eq!(per_city, vec![("A", 280.0), ("B", 260.0), ("C", 360.0)]);
    }

    #[test]
    fn repeated_city_is_charged_per_visit() {
        let cfg = config(&["A", "B", "A"], TransportMode::Train, HotelTier::Standard, 2);
        let b = estimate(&cfg, &sample_data()).unwrap();

        assert_eq!(b.per_city_hotel_cost.len(), 3);
        assert!((b.total_hotel_cost - (70.0 + 65.0 + 70.0) * 2.0).abs() < 1e-9);
        assert!((b.total_food_cost - (20.0 + 22.0 + 20.0) * 2.0).abs() < 1e-9);
    }

    #[test]
    fn empty_route_is_rejected() {
        let cfg = config(&[], TransportMode::Car, HotelTier::Standard, 4);
        let err = estimate(&cfg, &sample_data()).unwrap_err();
        assert_eq!(err, EstimateError::EmptyRoute);
    }

    #[test]
    fn unknown_city_is_rejected() {
        let cfg = config(&["A", "Nowhere", "C"], TransportMode::Car, HotelTier::Standard, 4);
        let err = estimate(&cfg, &sample_data()).unwrap_err();
        assert_eq!(err, EstimateError::UnknownCity("Nowhere".to_string()));
    }

    #[test]
    fn zero_days_is_rejected() {
        let cfg = config(&["A"], TransportMode::Car, HotelTier::Standard, 0);
        let err = estimate(&cfg, &sample_data()).unwrap_err();
        assert_eq!(err, EstimateError::NonPositiveDays(0));
    }

    #[test]
    fn budget_verdict() {
        let cfg = config(&["A", "B", "C"], TransportMode::Car, HotelTier::Standard, 4);
        let b = estimate(&cfg, &sample_data()).unwrap();

        assert_eq!(compare_budget(&b, 1500.0), BudgetVerdict::Surplus(1500.0 - b.total_cost));
        assert_eq!(compare_budget(&b, b.total_cost), BudgetVerdict::Surplus(0.0));
        match compare_budget(&b, 1000.0) {
            BudgetVerdict::Shortfall(missing) => assert!((missing - 338.0).abs() < 1e-9),
            other => panic!("expected shortfall, got {:?}", other),
        }
    }

    #[test]
    fn summary_rounds_to_cents() {
        let cfg = config(&["A", "B"], TransportMode::Train, HotelTier::Budget, 3);
        let b = estimate(&cfg, &sample_data()).unwrap();
        let summary = TripSummary::new("A to B", vec!["A".into(), "B".into()], b, 300.0);
        let text = summary.to_string();

        assert!(text.contains("Route: A -> B"));
        assert!(text.contains("Transport (Train, 300 km): 54.00"));
        assert!(text.contains("Budget falls short"));
    }

    #[test]
    fn stop_lists_images() {
        let images = vec!["https://example.org/a.jpg".to_string()];
        let text = format_stop(&city("A", 70.0, 20.0), &images);
        assert!(text.contains("Hotel: A Hotel - 70.00/night"));
        assert!(text.contains("Image: https://example.org/a.jpg"));
    }

    fn arb_mode() -> impl Strategy<Value = TransportMode> {
        prop_oneof![
            Just(TransportMode::Car),
            Just(TransportMode::Train),
            Just(TransportMode::Plane),
        ]
    }

    fn arb_tier() -> impl Strategy<Value = HotelTier> {
        prop_oneof![
            Just(HotelTier::Budget),
            Just(HotelTier::Standard),
            Just(HotelTier::Luxury),
        ]
    }

    fn arb_cities() -> impl Strategy<Value = Vec<(f64, f64)>> {
        prop::collection::vec((1.0f64..500.0, 1.0f64..100.0), 1..8)
    }

    fn build(prices: &[(f64, f64)]) -> (Vec<String>, HashMap<String, CityRecord>) {
        let mut stops = Vec::new();
        let mut data = HashMap::new();
        for (i, (hotel, food)) in prices.iter().enumerate() {
            let id = format!("city{}", i);
            data.insert(id.clone(), city(&id, *hotel, *food));
            stops.push(id);
        }
        (stops, data)
    }

    proptest! {
        #[test]
        fn total_is_sum_of_parts(prices in arb_cities(), mode in arb_mode(), tier in arb_tier(), days in 1u32..30) {
            let (stops, data) = build(&prices);
            let cfg = TripConfig { stops, transport: mode, hotel_tier: tier, days };
            let b = estimate(&cfg, &data).unwrap();
            let sum = b.transport_cost + b.total_hotel_cost + b.total_food_cost;
            prop_assert!((b.total_cost - sum).abs() < 1e-9);
            prop_assert!(b.total_cost >= 0.0);
        }

        #[test]
        fn total_grows_with_days(prices in arb_cities(), mode in arb_mode(), tier in arb_tier(), days in 1u32..30) {
            let (stops, data) = build(&prices);
            let shorter = TripConfig { stops, transport: mode, hotel_tier: tier, days };
            let longer = TripConfig { days: days + 1, ..shorter.clone() };
            let a = estimate(&shorter, &data).unwrap();
            let b = estimate(&longer, &data).unwrap();
            prop_assert!(b.total_cost > a.total_cost);
        }

        #[test]
        fn each_extra_stop_adds_one_hop(prices in arb_cities(), mode in arb_mode(), days in 1u32..30) {
            let (stops, mut data) = build(&prices);
            let extra = city("extra", 50.0, 10.0);
            data.insert(extra.id.clone(), extra);
            let mut longer_stops = stops.clone();
            longer_stops.push("extra".to_string());

            let short = TripConfig { stops, transport: mode, hotel_tier: HotelTier::Standard, days };
            let long = TripConfig { stops: longer_stops, ..short.clone() };
            let a = estimate(&short, &data).unwrap();
            let b = estimate(&long, &data).unwrap();
            let hop = SEGMENT_DISTANCE_KM * mode.rate_per_km();
            prop_assert!((b.transport_cost - a.transport_cost - hop).abs() < 1e-9);
        }

        #[test]
        fn luxury_costs_1_875_times_budget(prices in arb_cities(), mode in arb_mode(), days in 1u32..30) {
            let (stops, data) = build(&prices);
            let budget = TripConfig { stops, transport: mode, hotel_tier: HotelTier::Budget, days };
            let luxury = TripConfig { hotel_tier: HotelTier::Luxury, ..budget.clone() };
            let a = estimate(&budget, &data).unwrap();
            let b = estimate(&luxury, &data).unwrap();
            let expected = a.total_hotel_cost * 1.875;
            prop_assert!((b.total_hotel_cost - expected).abs() <= 1e-9 * expected.max(1.0));
            prop_assert_eq!(a.transport_cost, b.transport_cost);
            prop_assert_eq!(a.total_food_cost, b.total_food_cost);
        }

        #[test]
        fn single_stop_has_no_transport_cost(hotel in 0.0f64..500.0, food in 0.0f64..100.0, mode in arb_mode(), days in 1u32..30) {
            let (stops, data) = build(&[(hotel, food)]);
            let cfg = TripConfig { stops, transport: mode, hotel_tier: HotelTier::Standard, days };
            let b = estimate(&cfg, &data).unwrap();
            prop_assert_eq!(b.distance_km, 0.0);
            prop_assert_eq!(b.transport_cost, 0.0);
        }
    }
}
