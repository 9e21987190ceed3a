use approx::assert_relative_eq;
use serde_json::{json, Value};

use rust_gpx_reducer::neighbour_filter::filter_optional;
use rust_gpx_reducer::{
    bounding_box_of, build_grid, cell_for, centroid, distances_from_center, drms, expanded_cell, flatten_corners,
    near_point_removal, outlier_point_removal, outlier_point_removal_cascading, outlier_point_removal_multiple,
    BoundingBox, CellIndex, FieldPath, GeoError, Identity, NearPointOptions, OutlierOptions, Point,
};

const DEG_PER_METRE: f64 = 1.0 / 111_195.08;

fn north(metres: f64) -> Point {
    Point::new(51.5 + metres * DEG_PER_METRE, -0.12)
}

fn track(offsets: &[f64]) -> Vec<Point> {
    offsets.iter().map(|&m| north(m)).collect()
}

fn records(offsets: &[f64]) -> Vec<Value> {
    offsets
        .iter()
        .enumerate()
        .map(|(i, &m)| {
            let p = north(m);
            json!({"id": i, "fix": {"lat": p.latitude, "lon": p.longitude}})
        })
        .collect()
}

fn ids(kept: &[Value]) -> Vec<u64> {
    kept.iter().filter_map(|r| r["id"].as_u64()).collect()
}

#[test]
fn test_near_points_dropped_from_json_records() {
    let track = records(&[0.0, 2.0, 12.0, 12.5, 30.0]);
    let options = NearPointOptions::default().with_threshold(5.0);
    let kept = near_point_removal(&track, &options, &FieldPath::dotted("fix")).unwrap();
    assert_eq!(ids(&kept), vec![0, 2, 4]);
    // records come back untouched
    assert_eq!(kept[1], track[2]);
}

#[test]
fn test_first_point_always_kept() {
    let track = track(&[0.0, 0.1, 0.2, 0.3]);
    let near = NearPointOptions::default().with_keep_last_point(false);
    let outlier = OutlierOptions::default();

    assert_eq!(near_point_removal(&track, &near, &Identity).unwrap(), vec![track[0]]);
    assert_eq!(outlier_point_removal(&track, &outlier, &Identity).unwrap()[0], track[0]);
    assert_eq!(outlier_point_removal_multiple(&track, &outlier, &Identity).unwrap()[0], track[0]);
}

#[test]
fn test_zero_threshold_keeps_every_point() {
    let track = track(&[0.0, 0.0, 0.0, 3.0]);
    let options = NearPointOptions::default().with_threshold(0.0);
    assert_eq!(near_point_removal(&track, &options, &Identity).unwrap(), track);
}

#[test]
fn test_spike_removed_by_both_variants() {
    let track = track(&[0.0, 10.0, 200.0, 20.0, 30.0]);
    let options = OutlierOptions::default();

    let single = outlier_point_removal(&track, &options, &Identity).unwrap();
    assert_eq!(single, vec![track[0], track[1], track[3], track[4]]);

    // The successor test also drops the fix leading into the spike.
    let multiple = outlier_point_removal_multiple(&track, &options, &Identity).unwrap();
    assert_eq!(multiple, vec![track[0], track[3], track[4]]);
}

#[test]
fn test_multiple_pass_is_idempotent() {
    let track = track(&[0.0, 10.0, 300.0, 600.0, 20.0, 25.0, 900.0]);
    let options = OutlierOptions::default();

    let once = outlier_point_removal_multiple(&track, &options, &Identity).unwrap();
    let twice = outlier_point_removal_multiple(&once, &options, &Identity).unwrap();
    assert_eq!(once, twice);
    assert_eq!(outlier_point_removal_cascading(&once, &options, &Identity).unwrap(), once);
}

#[test]
fn test_unknown_distance_function_fails_for_empty_track() {
    let empty: Vec<Point> = Vec::new();
    let result = OutlierOptions::default()
        .with_distance_function("manhattan")
        .and_then(|options| outlier_point_removal(&empty, &options, &Identity));
    let err = result.unwrap_err();
    assert!(err.is_configuration());
    assert!(err.to_string().contains("manhattan"));

    let parsed: Result<NearPointOptions, _> = serde_json::from_value(json!({"distanceFunction": "manhattan"}));
    assert!(parsed.is_err());
}

#[test]
fn test_absent_track_stays_absent() {
    let out = filter_optional(None::<&[Point]>, true, &Identity, |_: &Point, _: &Point, _: Option<&Point>| false)
        .unwrap();
    assert_eq!(out, None);
}

#[test]
fn test_unresolvable_records() {
    let options = NearPointOptions::default();
    let locator = FieldPath::dotted("fix");

    let mut missing_first = records(&[0.0, 10.0]);
    missing_first[0] = json!({"id": 0});
    assert!(matches!(
        near_point_removal(&missing_first, &options, &locator),
        Err(GeoError::PathNotFound { .. })
    ));

    let mut missing_later = records(&[0.0, 10.0, 20.0]);
    missing_later[2] = json!({"id": 2, "fix": {}});
    assert!(matches!(
        near_point_removal(&missing_later, &options, &locator),
        Err(GeoError::UnresolvedRecord { index: 2, .. })
    ));
}

#[test]
fn test_cluster_statistics() {
    let fixes = vec![Point::new(55.9127785941194, -3.2038732176474194); 4];
    let center = centroid(&fixes).unwrap();
    assert_relative_eq!(center.latitude, fixes[0].latitude, epsilon = 1e-9);
    assert_relative_eq!(center.longitude, fixes[0].longitude, epsilon = 1e-9);

    let distances: Vec<f64> = distances_from_center(&fixes, &center)
        .iter()
        .map(|d| d.distance)
        .collect();
    assert_relative_eq!(drms(&distances).unwrap(), 0.0, epsilon = 1e-6);

    assert_relative_eq!(drms(&[3.0, 4.0]).unwrap(), 3.5355339, epsilon = 1e-6);
    assert_eq!(drms(&[5.0]).unwrap(), 5.0);
    assert!(drms(&[]).unwrap_err().is_precondition());
}

#[test]
fn test_grid_over_city_box() {
    let (lat1, lon1, lat2, lon2) = (55.9128213, -3.2036907, 55.9071, -3.1879);
    let grid = build_grid(lat1, lon1, lat2, lon2, 100.0).unwrap();
    assert_eq!(grid.rows(), 7);
    assert_eq!(grid.columns(), 10);

    let corners: Vec<Point> = flatten_corners(&grid).into_iter().map(Point::from).collect();
    assert_eq!(corners.len(), 2 * 7 * 10 + 2 * 10);
    assert_eq!(
        bounding_box_of(&corners).unwrap(),
        BoundingBox::from_corners(lat1, lon1, lat2, lon2)
    );

    let cell = grid.cell(4, 2).unwrap();
    let center = cell.center();
    assert_eq!(
        cell_for(&grid, center.latitude, center.longitude),
        Some(CellIndex { x: 4, y: 2 })
    );
    assert_eq!(cell_for(&grid, lat1 + 0.01, lon1), None);

    let expanded = expanded_cell(&grid, 4, 2).unwrap();
    assert!(expanded.contains(cell.nw.latitude, cell.nw.longitude));
    assert!(expanded.contains(cell.se.latitude, cell.se.longitude));
    assert!(expanded_cell(&grid, 10, 0).is_err());
}

#[test]
fn test_invalid_grid_spacing() {
    assert_eq!(
        build_grid(55.9, -3.2, 55.8, -3.1, 0.0),
        Err(GeoError::InvalidGridSpacing(0.0))
    );
}
