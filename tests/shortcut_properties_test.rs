// Geometric properties of the shortcut construction
use tz_compiler::geometry::{inside_polygon, to_fixed, to_float, winding_number, FixedRing, Polygon};
use tz_compiler::shortcuts::{
    build_shortcut_table, is_big_zone, polygon_shortcuts, Cell, CellRange, SweepContext,
    COLUMN_WIDTH, ROW_HEIGHT,
};

/// True if any sample point in the cells within `radius` of `cell` lies
/// inside the polygon
fn near_polygon(cell: Cell, ring: &FixedRing, radius: i32) -> bool {
    let fractions = [0.1, 0.3, 0.5, 0.7, 0.9];
    for dc in -radius..=radius {
        for dr in -radius..=radius {
            let column = cell.column + dc;
            let row = cell.row + dr;
            for fx in fractions {
                for fy in fractions {
                    let lng = (column as f64 + fx) * COLUMN_WIDTH - 180.0;
                    let lat = 90.0 - (row as f64 + fy) * ROW_HEIGHT;
                    if inside_polygon(to_fixed(lng), to_fixed(lat), ring) {
                        return true;
                    }
                }
            }
        }
    }
    false
}

fn test_polygons() -> Vec<Polygon> {
    vec![
        // right triangle, empty north-east half of its bounding box
        Polygon::new(0, 0, vec![(20.2, 30.1), (29.8, 30.1), (20.2, 34.9)]).unwrap(),
        // concave "L" shape
        Polygon::new(
            1,
            1,
            vec![(-10.3, -5.2), (-2.1, -5.2), (-2.1, -3.3), (-7.6, -3.3), (-7.6, 2.4), (-10.3, 2.4)],
        )
        .unwrap(),
        // small sliver
        Polygon::new(2, 2, vec![(100.1, 10.1), (100.9, 10.2), (100.4, 10.3)]).unwrap(),
        // big diamond whose vertices sit on grid lines
        Polygon::new(3, 0, vec![(50.0, 20.0), (55.0, 25.0), (50.0, 30.0), (45.0, 25.0)]).unwrap(),
    ]
}

#[test]
fn test_codec_round_trip() {
    let mut v = -180.0;
    while v <= 180.0 {
        let back = to_float(to_fixed(v));
        assert!((back - v).abs() <= 1e-7, "{} came back as {}", v, back);
        v += 0.123_456_7;
    }
}

#[test]
fn test_winding_is_invariant_under_rotation() {
    let points = vec![(-10.3, -5.2), (-2.1, -5.2), (-2.1, -3.3), (-7.6, -3.3), (-7.6, 2.4), (-10.3, 2.4)];
    let probes = [(-9.0, 0.0), (-5.0, -4.0), (-5.0, 0.0), (-2.0, -4.0), (-8.0, -3.3)];

    let reference: Vec<i32> = {
        let ring = FixedRing::closed_from(&points);
        probes.iter().map(|&(x, y)| winding_number(to_fixed(x), to_fixed(y), &ring)).collect()
    };
    assert_eq!(&reference[..3], &[1, 1, 0]);

    for shift in 1..points.len() {
        let mut rotated = points.clone();
        rotated.rotate_left(shift);
        let ring = FixedRing::closed_from(&rotated);
        let numbers: Vec<i32> = probes
            .iter()
            .map(|&(x, y)| winding_number(to_fixed(x), to_fixed(y), &ring))
            .collect();
        assert_eq!(numbers, reference, "rotation by {} changed the result", shift);
    }
}

#[test]
fn test_registered_cells_are_never_impossible() {
    let polygons = test_polygons();
    for polygon in &polygons {
        let bounds = polygon.bounds();
        let range = CellRange::of_bounds(&bounds);
        let ring = polygon.fixed_ring();
        let cells = polygon_shortcuts(polygon, &bounds).unwrap();
        assert!(!cells.is_empty());

        for cell in &cells {
            assert!(range.contains(cell), "polygon {} registered outside its bounds: {:?}", polygon.id, cell);
            assert!(
                near_polygon(*cell, &ring, 2),
                "polygon {} registered under {:?} far away from it",
                polygon.id,
                cell
            );
        }
    }
}

#[test]
fn test_big_polygons_cover_their_interior() {
    for polygon in test_polygons() {
        let bounds = polygon.bounds();
        if !is_big_zone(&bounds) {
            continue;
        }
        let ring = polygon.fixed_ring();
        let cells = polygon_shortcuts(&polygon, &bounds).unwrap();
        // every cell whose centre is inside the polygon must be registered
        for cell in CellRange::of_bounds(&bounds).cells() {
            let (lng, lat) = cell.center();
            if inside_polygon(to_fixed(lng), to_fixed(lat), &ring) {
                assert!(cells.contains(&cell), "polygon {} misses {:?}", polygon.id, cell);
            }
        }
    }
}

#[test]
fn test_small_polygon_gets_its_bounding_box_range() {
    let polygon = &test_polygons()[2];
    let bounds = polygon.bounds();
    assert!(!is_big_zone(&bounds));
    let cells = polygon_shortcuts(polygon, &bounds).unwrap();
    let expected: Vec<Cell> = CellRange::of_bounds(&bounds).cells().collect();
    assert_eq!(cells, expected);
}

#[test]
fn test_refinement_drops_empty_corner() {
    let polygon = &test_polygons()[0];
    let bounds = polygon.bounds();
    let range = CellRange::of_bounds(&bounds);
    assert_eq!(range.len(), 100, "bounding box spans 10 × 10 cells");
    let cells = polygon_shortcuts(polygon, &bounds).unwrap();
    assert!(cells.len() < range.len());
    assert!(!cells.contains(&Cell::of(29.5, 34.7)), "north-east corner is empty");
    assert!(cells.contains(&Cell::of(20.5, 34.7)));
}

#[test]
fn test_bottom_vertex_on_latitude_line_selects_cell_above() {
    // diamond whose southern vertex sits exactly on the 45° row boundary
    let ring = FixedRing::closed_from(&[(10.5, 45.0), (11.4, 45.7), (10.5, 46.4), (9.6, 45.7)]);
    let mut sweep = SweepContext::new(&ring);
    sweep.sweep_latitude(45.0).unwrap();
    let cells: Vec<Cell> = sweep.into_cells().into_iter().collect();
    // row 89 lies north of the line and holds the polygon, row 90 is the
    // line's own row which is always taken
    assert_eq!(cells, vec![Cell::new(190, 89), Cell::new(190, 90)]);
}

#[test]
fn test_west_vertex_on_longitude_line_skips_empty_column() {
    // diamond whose western vertex sits exactly on the 10° column boundary
    let ring = FixedRing::closed_from(&[(10.0, 45.2), (10.9, 44.7), (11.8, 45.2), (10.9, 45.7)]);
    let mut sweep = SweepContext::new(&ring);
    sweep.sweep_longitude(10.0).unwrap();
    let cells: Vec<Cell> = sweep.into_cells().into_iter().collect();
    // the polygon extends east into column 190, column 189 west of the line is empty
    assert_eq!(cells, vec![Cell::new(190, 89)]);
}

#[test]
fn test_sequential_and_parallel_builds_match() {
    let polygons = test_polygons();
    let bounds: Vec<_> = polygons.iter().map(Polygon::bounds).collect();
    let parallel = build_shortcut_table(&polygons, &bounds, true).unwrap();
    let sequential = build_shortcut_table(&polygons, &bounds, false).unwrap();

    for (cell, ids) in parallel.iter_grid() {
        assert_eq!(ids, sequential.polygons_in(cell), "cell {:?} differs", cell);
    }
    assert_eq!(parallel.total_entries(), sequential.total_entries());

    for (polygon, bounds) in polygons.iter().zip(&bounds) {
        let cells = polygon_shortcuts(polygon, bounds).unwrap();
        assert_eq!(parallel.cells_of(polygon.id), cells);
    }
}
