//! Testing utilities: a controllable orbit source and launch fixtures.
//!
//! # Example
//!
//! ```rust,ignore
//! use launchlog_core::testing::{fixtures, MockOrbitSource};
//!
//! let source = MockOrbitSource::new();
//! source.set_snapshots(vec![fixtures::snapshot("100", "15.5")]).await;
//!
//! let store = SqliteLaunchStore::in_memory()?;
//! for launch in fixtures::launches() {
//!     store.upsert(&launch)?;
//! }
//! ```

mod mock_orbit_source;

pub use mock_orbit_source::MockOrbitSource;

/// Test fixtures and helper functions.
pub mod fixtures {
    use serde_json::{json, Value};

    use crate::launches::OrbitUpdate;
    use crate::orbits::ElementSnapshot;

    /// Minimal launch document with one payload per entry of `norad_ids`.
    pub fn launch(flight_number: i64, upcoming: bool, norad_ids: &[&[u64]]) -> Value {
        let payloads: Vec<Value> = norad_ids
            .iter()
            .enumerate()
            .map(|(i, ids)| {
                json!({
                    "payload_id": format!("payload-{}-{}", flight_number, i),
                    "norad_id": ids,
                    "orbit_params": {}
                })
            })
            .collect();

        json!({
            "flight_number": flight_number,
            "mission_name": format!("Mission {}", flight_number),
            "upcoming": upcoming,
            "reuse": {"core": false},
            "rocket": {
                "rocket_id": "falcon9",
                "first_stage": {"cores": []},
                "second_stage": {"payloads": payloads}
            }
        })
    }

    /// Five launches: three flown (1-3), two upcoming (4-5).
    pub fn launches() -> Vec<Value> {
        vec![
            json!({
                "flight_number": 1,
                "mission_name": "FalconSat",
                "upcoming": false,
                "launch_year": "2006",
                "launch_date_utc": "2006-03-24T22:30:00.000Z",
                "launch_date_unix": 1143239400,
                "launch_success": false,
                "reuse": {"core": false, "side_core1": false, "side_core2": false, "fairings": false, "capsule": false},
                "launch_site": {"site_id": "kwajalein_atoll", "site_name": "Kwajalein Atoll"},
                "rocket": {
                    "rocket_id": "falcon1",
                    "rocket_name": "Falcon 1",
                    "first_stage": {"cores": [
                        {"core_serial": "Merlin1A", "flight": 1, "reused": false, "land_success": null}
                    ]},
                    "second_stage": {"block": 1, "payloads": [{
                        "payload_id": "FalconSAT-2",
                        "norad_id": [],
                        "customers": ["DARPA"],
                        "payload_mass_kg": 20.0,
                        "orbit": "LEO",
                        "orbit_params": {"reference_system": "geocentric", "regime": "low-earth"}
                    }]}
                }
            }),
            json!({
                "flight_number": 2,
                "mission_name": "CRS-1",
                "upcoming": false,
                "launch_year": "2012",
                "launch_date_utc": "2012-10-08T00:35:00.000Z",
                "launch_date_unix": 1349656500,
                "launch_success": true,
                "reuse": {"core": false, "side_core1": false, "side_core2": false, "fairings": false, "capsule": false},
                "launch_site": {"site_id": "ccafs_slc_40", "site_name": "CCAFS SLC 40"},
                "rocket": {
                    "rocket_id": "falcon9",
                    "rocket_name": "Falcon 9",
                    "first_stage": {"cores": [
                        {"core_serial": "B0006", "flight": 1, "reused": false, "land_success": true}
                    ]},
                    "second_stage": {"block": 1, "payloads": [{
                        "payload_id": "CRS-1",
                        "norad_id": [100],
                        "customers": ["NASA"],
                        "payload_mass_kg": 4700.0,
                        "orbit": "ISS",
                        "orbit_params": {"reference_system": "geocentric", "regime": "low-earth"}
                    }]}
                }
            }),
            json!({
                "flight_number": 3,
                "mission_name": "Thaicom 8",
                "upcoming": false,
                "launch_year": "2016",
                "launch_date_utc": "2016-05-27T21:39:00.000Z",
                "launch_date_unix": 1464385140,
                "launch_success": true,
                "reuse": {"core": false, "side_core1": false, "side_core2": false, "fairings": false, "capsule": false},
                "launch_site": {"site_id": "ccafs_slc_40", "site_name": "CCAFS SLC 40"},
                "rocket": {
                    "rocket_id": "falcon9",
                    "rocket_name": "Falcon 9",
                    "first_stage": {"cores": [
                        {"core_serial": "B1021", "flight": 1, "reused": false, "land_success": true}
                    ]},
                    "second_stage": {"block": 3, "payloads": [
                        {
                            "payload_id": "Thaicom 8",
                            "norad_id": [200],
                            "customers": ["Thaicom"],
                            "payload_mass_kg": 3100.0,
                            "orbit": "GTO",
                            "orbit_params": {"reference_system": "geocentric", "regime": "geostationary"}
                        },
                        {
                            "payload_id": "Rideshare",
                            "norad_id": [300],
                            "customers": ["SpaceX"],
                            "orbit": "LEO",
                            "orbit_params": {"reference_system": "geocentric", "regime": "low-earth"}
                        }
                    ]}
                }
            }),
            json!({
                "flight_number": 4,
                "mission_name": "CRS-40",
                "upcoming": true,
                "launch_year": "2030",
                "launch_date_utc": "2030-01-15T12:00:00.000Z",
                "launch_date_unix": 1894708800,
                "launch_success": null,
                "reuse": {"core": true, "side_core1": false, "side_core2": false, "fairings": false, "capsule": true},
                "launch_site": {"site_id": "ksc_lc_39a", "site_name": "KSC LC 39A"},
                "rocket": {
                    "rocket_id": "falcon9",
                    "rocket_name": "Falcon 9",
                    "first_stage": {"cores": [
                        {"core_serial": null, "flight": null, "reused": true, "land_success": null}
                    ]},
                    "second_stage": {"block": 5, "payloads": [{
                        "payload_id": "CRS-40",
                        "norad_id": [],
                        "customers": ["NASA"],
                        "orbit": "ISS",
                        "orbit_params": {"reference_system": "geocentric", "regime": "low-earth"}
                    }]}
                }
            }),
            json!({
                "flight_number": 5,
                "mission_name": "Deep Space Demo",
                "upcoming": true,
                "launch_year": "2031",
                "launch_date_utc": "2031-06-01T00:00:00.000Z",
                "launch_date_unix": 1938124800,
                "launch_success": null,
                "reuse": {"core": false, "side_core1": true, "side_core2": true, "fairings": false, "capsule": false},
                "launch_site": {"site_id": "ksc_lc_39a", "site_name": "KSC LC 39A"},
                "rocket": {
                    "rocket_id": "falconheavy",
                    "rocket_name": "Falcon Heavy",
                    "first_stage": {"cores": [
                        {"core_serial": null, "flight": null, "reused": false, "land_success": null}
                    ]},
                    "second_stage": {"block": 5, "payloads": [{
                        "payload_id": "Deep Space Demo",
                        "customers": ["SpaceX"],
                        "orbit": "HEO",
                        "orbit_params": {}
                    }]}
                }
            }),
        ]
    }

    /// Orbit update with fixed, recognizable values.
    pub fn orbit_update() -> OrbitUpdate {
        OrbitUpdate {
            epoch: "2018-04-01T12:00:00.000Z".to_string(),
            mean_motion: 15.5,
            raan: 120.25,
            arg_of_pericenter: 90.0,
            mean_anomaly: 270.0,
            semi_major_axis_km: 6778.0,
            eccentricity: 0.0005,
            periapsis_km: 396.0,
            apoapsis_km: 404.0,
            inclination_deg: 51.64,
            period_min: 92.5,
        }
    }

    /// Space-Track snapshot as the API sends it (numbers as strings), with
    /// the values of [`orbit_update`] apart from `mean_motion`.
    pub fn snapshot(norad_cat_id: &str, mean_motion: &str) -> ElementSnapshot {
        ElementSnapshot {
            norad_cat_id: Some(norad_cat_id.to_string()),
            object_name: Some(format!("OBJECT {}", norad_cat_id)),
            epoch: Some("2018-04-01 12:00:00".to_string()),
            mean_motion: Some(mean_motion.to_string()),
            ra_of_asc_node: Some("120.25".to_string()),
            arg_of_pericenter: Some("90.0".to_string()),
            mean_anomaly: Some("270.0".to_string()),
            semimajor_axis: Some("6778.0".to_string()),
            eccentricity: Some("0.0005".to_string()),
            perigee: Some("396.0".to_string()),
            apogee: Some("404.0".to_string()),
            inclination: Some("51.64".to_string()),
            period: Some("92.5".to_string()),
        }
    }
}
