//! Database schema and operations for the route and city catalog

use std::collections::HashMap;

use anyhow::Result;
use rusqlite::{Connection, OptionalExtension, Row};

use crate::models::{CityRecord, Coordinate, Route};

/// Initialize the database schema
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Per-city reference data
        CREATE TABLE IF NOT EXISTS cities (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            hotel_name TEXT NOT NULL,
            hotel_price REAL NOT NULL,
            food_name TEXT NOT NULL,
            food_per_day REAL NOT NULL,
            sight TEXT NOT NULL,
            latitude REAL NOT NULL,
            longitude REAL NOT NULL
        );

        -- Hotel pictures, shown in insertion order
        CREATE TABLE IF NOT EXISTS city_images (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            city_id TEXT NOT NULL,
            url TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS routes (
            name TEXT PRIMARY KEY
        );

        CREATE TABLE IF NOT EXISTS route_stops (
            route_name TEXT NOT NULL,
            position INTEGER NOT NULL,
            city_id TEXT NOT NULL,
            PRIMARY KEY (route_name, position)
        );

        CREATE INDEX IF NOT EXISTS idx_city_images_city ON city_images(city_id);
        "#,
    )?;
    Ok(())
}

/// Remove all catalog data
pub fn clear_catalog(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        DELETE FROM route_stops;
        DELETE FROM routes;
        DELETE FROM city_images;
        DELETE FROM cities;
        "#,
    )?;
    Ok(())
}

/// Insert or replace a city
pub fn upsert_city(conn: &Connection, city: &CityRecord) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO cities
            (id, name, hotel_name, hotel_price, food_name, food_per_day, sight, latitude, longitude)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        (
            &city.id,
            &city.name,
            &city.hotel_name,
            city.hotel_price,
            &city.food_name,
            city.food_per_day,
            &city.sight,
            city.location.latitude,
            city.location.longitude,
        ),
    )?;
    Ok(())
}

pub fn insert_city_image(conn: &Connection, city_id: &str, url: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO city_images (city_id, url) VALUES (?1, ?2)",
        (city_id, url),
    )?;
    Ok(())
}

/// Insert a route, replacing any stops it already had
///
/// All or nothing: on error the previous stops are kept.
pub fn insert_route(conn: &Connection, route: &Route) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute("INSERT OR IGNORE INTO routes (name) VALUES (?1)", [&route.name])?;
    tx.execute("DELETE FROM route_stops WHERE route_name = ?1", [&route.name])?;
    for (position, city_id) in route.stops.iter().enumerate() {
        tx.execute(
            "INSERT INTO route_stops (route_name, position, city_id) VALUES (?1, ?2, ?3)",
            (&route.name, position as i64, city_id),
        )?;
    }
    tx.commit()?;
    Ok(())
}

fn get_stops(conn: &Connection, route_name: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT city_id FROM route_stops WHERE route_name = ?1 ORDER BY position",
    )?;

    let rows = stmt.query_map([route_name], |row| row.get(0))?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row?);
    }
    Ok(results)
}

/// Look up a route by name
pub fn get_route(conn: &Connection, name: &str) -> Result<Option<Route>> {
    let found: Option<String> = conn
        .query_row("SELECT name FROM routes WHERE name = ?1", [name], |row| row.get(0))
        .optional()?;

    match found {
        Some(name) => {
            let stops = get_stops(conn, &name)?;
            Ok(Some(Route { name, stops }))
        }
        None => Ok(None),
    }
}

/// List all routes with their stops
pub fn list_routes(conn: &Connection) -> Result<Vec<Route>> {
    let mut stmt = conn.prepare("SELECT name FROM routes ORDER BY name")?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut results = Vec::new();
    for row in rows {
        let name = row?;
        let stops = get_stops(conn, &name)?;
        results.push(Route { name, stops });
    }
    Ok(results)
}

fn city_from_row(row: &Row<'_>) -> rusqlite::Result<CityRecord> {
    Ok(CityRecord {
        id: row.get(0)?,
        name: row.get(1)?,
        hotel_name: row.get(2)?,
        hotel_price: row.get(3)?,
        food_name: row.get(4)?,
        food_per_day: row.get(5)?,
        sight: row.get(6)?,
        location: Coordinate {
            latitude: row.get(7)?,
            longitude: row.get(8)?,
        },
    })
}

const CITY_COLUMNS: &str =
    "id, name, hotel_name, hotel_price, food_name, food_per_day, sight, latitude, longitude";

pub fn get_city(conn: &Connection, id: &str) -> Result<Option<CityRecord>> {
    let city = conn
        .query_row(
            &format!("SELECT {} FROM cities WHERE id = ?1", CITY_COLUMNS),
            [id],
            city_from_row,
        )
        .optional()?;
    Ok(city)
}

/// List all cities in the catalog
pub fn list_cities(conn: &Connection) -> Result<Vec<CityRecord>> {
    let mut stmt = conn.prepare(&format!("SELECT {} FROM cities ORDER BY name", CITY_COLUMNS))?;
    let rows = stmt.query_map([], city_from_row)?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row?);
    }
    Ok(results)
}

pub fn get_city_images(conn: &Connection, city_id: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT url FROM city_images WHERE city_id = ?1 ORDER BY id")?;
    let rows = stmt.query_map([city_id], |row| row.get(0))?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row?);
    }
    Ok(results)
}

/// Fetch the records for every city on a route
///
/// Cities missing from the catalog are left out of the map.
pub fn load_city_data(conn: &Connection, route: &Route) -> Result<HashMap<String, CityRecord>> {
    let mut data = HashMap::new();
    for id in &route.stops {
        if data.contains_key(id) {
            continue;
        }
        if let Some(city) = get_city(conn, id)? {
            data.insert(id.clone(), city);
        }
    }
    Ok(data)
}
