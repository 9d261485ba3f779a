use navkit::mesh::CompositePolygon;
use navkit::{CancelToken, GridNavigator, MeshNavigator, NavVariant, Pathfinder, QueryOptions, Vector};

fn rect(w: f32, h: f32) -> Vec<Vector> {
    vec![
        Vector::new(0.0, 0.0),
        Vector::new(w, 0.0),
        Vector::new(w, h),
        Vector::new(0.0, h),
    ]
}

#[test]
fn facade_dispatches_across_heterogeneous_navigators_by_index() {
    let mut pf = Pathfinder::new(vec![
        NavVariant::Grid(GridNavigator::new(rect(100.0, 100.0), vec![], 20.0)),
        NavVariant::Mesh(MeshNavigator::new(vec![CompositePolygon::new(
            rect(100.0, 100.0),
            0.0,
        )])),
    ]);
    pf.initialize(&CancelToken::new()).unwrap();

    let start = Vector::new(10.0, 10.0);
    let dest = Vector::new(90.0, 90.0);

    let grid_path = pf.path(0, start, dest, &QueryOptions::default()).unwrap();
    let mesh_path = pf.path(1, start, dest, &QueryOptions::default()).unwrap();

    assert_eq!(grid_path.first().copied(), Some(start));
    assert_eq!(mesh_path.first().copied(), Some(start));
    assert_eq!(grid_path.last().copied(), Some(dest));
    assert_eq!(mesh_path.last().copied(), Some(dest));
}

#[test]
fn second_identical_query_returns_the_identical_sequence() {
    let mut pf = Pathfinder::new(vec![NavVariant::Grid(GridNavigator::new(
        rect(100.0, 100.0),
        vec![],
        20.0,
    ))]);
    pf.initialize(&CancelToken::new()).unwrap();

    let start = Vector::new(10.0, 10.0);
    let dest = Vector::new(90.0, 90.0);
    let a = pf.path(0, start, dest, &QueryOptions::default()).unwrap();
    let b = pf.path(0, start, dest, &QueryOptions::default()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn out_of_bounds_graph_id_returns_invalid_graph_id_error() {
    let pf = Pathfinder::new(Vec::new());
    let result = pf.graph(3);
    assert!(result.is_err());
}
