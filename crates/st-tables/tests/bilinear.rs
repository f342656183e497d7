//! Grid interpolation against the bundled steam tables.
//!
//! Reference values are the tabulated nodes themselves or hand-computed
//! linear blends of neighbouring nodes.

use st_tables::{InputPair, Property, Region, SinglePhaseGrid, TableError, TableStore};

fn grid(store: &TableStore, region: Region) -> &SinglePhaseGrid {
    store.grid(region).unwrap()
}

fn lookup(grid: &SinglePhaseGrid, a: (Property, f64), b: (Property, f64)) -> st_tables::Properties {
    grid.bilinear(InputPair::new(a, b).unwrap()).unwrap()
}

#[test]
fn every_node_round_trips_through_temperature_pressure() {
    let store = TableStore::bundled().unwrap();
    for region in [Region::Superheated, Region::Subcooled] {
        let grid = grid(&store, region);
        for block in grid.blocks() {
            for row in &block.rows {
                let got = lookup(grid, (Property::T, row.t), (Property::P, row.p));
                assert_eq!(got, *row, "{region} node T = {}, P = {}", row.t, row.p);
            }
        }
    }
}

#[test]
fn every_node_round_trips_through_pressure_enthalpy() {
    let store = TableStore::bundled().unwrap();
    for region in [Region::Superheated, Region::Subcooled] {
        let grid = grid(&store, region);
        for block in grid.blocks() {
            for row in &block.rows {
                let got = lookup(grid, (Property::P, row.p), (Property::H, row.h));
                assert_eq!(got, *row, "{region} node P = {}, h = {}", row.p, row.h);
            }
        }
    }
}

#[test]
fn superheated_exact_nodes() {
    let store = TableStore::bundled().unwrap();
    let suph = grid(&store, Region::Superheated);

    assert_eq!(lookup(suph, (Property::P, 0.1), (Property::T, 300.0)).h, 3074.3);
    assert_eq!(lookup(suph, (Property::P, 1.0), (Property::T, 500.0)).s, 7.7622);
    assert_eq!(lookup(suph, (Property::P, 12.5), (Property::T, 600.0)).u, 3225.4);
}

#[test]
fn superheated_interpolated_in_temperature_and_pressure() {
    let store = TableStore::bundled().unwrap();
    let suph = grid(&store, Region::Superheated);

    // Inside the 0.5 MPa block, halfway between 350 and 400 °C.
    let props = lookup(suph, (Property::P, 0.5), (Property::T, 375.0));
    assert!((props.h - 3219.8).abs() < 1e-6, "h = {}", props.h);

    // Between the 0.6 and 0.8 MPa blocks.
    let props = lookup(suph, (Property::P, 0.7), (Property::T, 450.0));
    assert!((props.s - 7.787225).abs() < 1e-6, "s = {}", props.s);
    assert_eq!(props.p, 0.7);
    assert_eq!(props.t, 450.0);
}

#[test]
fn superheated_temperature_enthalpy_sweeps_blocks() {
    let store = TableStore::bundled().unwrap();
    let props = lookup(
        grid(&store, Region::Superheated),
        (Property::T, 400.0),
        (Property::H, 3269.0),
    );
    assert!((props.p - 0.68125).abs() < 1e-6, "P = {}", props.p);
}

#[test]
fn superheated_pressure_entropy_inside_block() {
    let store = TableStore::bundled().unwrap();
    let props = lookup(
        grid(&store, Region::Superheated),
        (Property::P, 2.0),
        (Property::S, 6.5),
    );
    assert!((props.t - 241.32848).abs() < 1e-3, "T = {}", props.t);
}

#[test]
fn superheated_enthalpy_entropy_falls_back_to_isobars() {
    let store = TableStore::bundled().unwrap();
    let props = lookup(
        grid(&store, Region::Superheated),
        (Property::H, 3500.0),
        (Property::S, 7.5),
    );
    assert!(props.p > 1.6 && props.p < 2.0, "P = {}", props.p);
    assert!(props.t > 512.0 && props.t < 515.0, "T = {}", props.t);
    assert_eq!(props.h, 3500.0);
    assert_eq!(props.s, 7.5);
}

#[test]
fn subcooled_lookups() {
    let store = TableStore::bundled().unwrap();
    let subc = grid(&store, Region::Subcooled);

    let node = lookup(subc, (Property::P, 10.0), (Property::T, 100.0));
    assert_eq!(node.h, 426.50);
    assert_eq!(node.s, 1.2992);

    let between = lookup(subc, (Property::P, 12.5), (Property::T, 100.0));
    assert!((between.h - 0.5 * (426.50 + 430.28)).abs() < 1e-9);
}

#[test]
fn outside_envelope_is_rejected() {
    let store = TableStore::bundled().unwrap();
    let suph = grid(&store, Region::Superheated);

    let err = suph
        .bilinear(InputPair::new((Property::T, 1500.0), (Property::P, 1.0)).unwrap())
        .unwrap_err();
    assert!(matches!(err, TableError::OutOfRange { what: "T", .. }));

    let err = suph
        .bilinear(InputPair::new((Property::T, 300.0), (Property::P, 0.001)).unwrap())
        .unwrap_err();
    assert!(matches!(err, TableError::OutOfRange { what: "P", .. }));

    let err = grid(&store, Region::Subcooled)
        .bilinear(InputPair::new((Property::H, 3500.0), (Property::S, 7.5)).unwrap())
        .unwrap_err();
    assert!(matches!(err, TableError::OutOfRange { what: "h", .. }));
}

#[test]
fn inside_envelope_without_bracket() {
    let store = TableStore::bundled().unwrap();
    // 50 °C is below saturation at 0.1 MPa: the block starts at 99.63 °C.
    let err = grid(&store, Region::Superheated)
        .bilinear(InputPair::new((Property::T, 50.0), (Property::P, 0.1)).unwrap())
        .unwrap_err();
    assert!(matches!(err, TableError::NoBracket { .. }));
}
