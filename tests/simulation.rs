//! End-to-end runs of the simulation driver

use ecplan::common::{DisplayUnit, SimConfig};
use ecplan::{Error, Simulation};

fn seeded_config() -> SimConfig {
    let mut config = SimConfig::default();
    config.traffic.seed = Some(2020);
    config
}

#[test]
fn test_reference_run() {
    let outcome = Simulation::new(seeded_config()).run().unwrap();
    assert_eq!(outcome.placed.len(), 4);

    // 600 up over 4 clusters of 12+4: 150 each, stored at 1.5x
    let totals = outcome.region.io_totals();
    assert!((totals.disk_write - 900.0).abs() < 1e-6);
    assert!((totals.disk_read - 300.0).abs() < 1e-6);

    let report = outcome.report(DisplayUnit::Byte);
    assert!((report.totals.disk_write - 900.0 / 8.0).abs() < 1e-6);
    assert_eq!(report.allocated_machines, 48);
    assert!(report.allocation_error.is_none());
}

#[test]
fn test_rack_locality_run() {
    let mut config = seeded_config();
    config.placement.rack_locality = true;
    let outcome = Simulation::new(config).run().unwrap();

    assert_eq!(outcome.placed.len(), 4);
    for cluster in outcome.region.clusters() {
        for dc in 0..3 {
            let racks: Vec<usize> = cluster
                .placement()
                .iter()
                .filter(|p| p.addr.datacenter == dc)
                .map(|p| p.addr.rack)
                .collect();
            assert_eq!(racks.len(), 4);
            assert!(racks.windows(2).all(|w| w[0] == w[1]));
        }
    }
}

#[test]
fn test_partial_allocation_keeps_placed_clusters() {
    let mut config = seeded_config();
    config.topology.machines_per_rack = 2;
    // 24 machines fit 2 clusters of 12
    let outcome = Simulation::new(config).run().unwrap();

    assert_eq!(outcome.placed.len(), 2);
    assert!(outcome.allocation_error.is_some());
    assert_eq!(outcome.region.allocated_machine_count(), 24);

    let text = outcome.report(DisplayUnit::Bit).to_string();
    assert!(text.contains("error allocating storage cluster"));
}

#[test]
fn test_nothing_placed_is_surfaced() {
    let mut config = seeded_config();
    config.placement.rack_locality = true;
    config.topology.machines_per_rack = 3;
    assert!(matches!(
        Simulation::new(config).run(),
        Err(Error::InsufficientRackCapacity { .. })
    ));
}

#[test]
fn test_json_report_round_trips_through_serde() {
    let outcome = Simulation::new(seeded_config()).run().unwrap();
    let json = outcome.report(DisplayUnit::Bit).to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["clusters"].as_array().unwrap().len(), 4);
    assert_eq!(value["datacenters"].as_array().unwrap().len(), 3);
    assert_eq!(value["machines"], 48);
    assert_eq!(value["clusters"][0]["storage_overhead"], 1.5);
    assert_eq!(value["datacenters"][0]["free"], 0);
}
