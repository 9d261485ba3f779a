use navkit::{CancelToken, Circle, GridNavigator, NavGraph, QueryOptions, Vector};

fn rect(w: f32, h: f32) -> Vec<Vector> {
    vec![
        Vector::new(0.0, 0.0),
        Vector::new(w, 0.0),
        Vector::new(w, h),
        Vector::new(0.0, h),
    ]
}

#[test]
fn visible_squares_are_a_subset_with_every_flag_set() {
    let mut nav = GridNavigator::new(rect(60.0, 60.0), vec![], 15.0);
    nav.generate(&CancelToken::new()).unwrap();

    let total = nav.squares().len();
    let visible = nav.visible_squares().count();
    assert!(visible <= total);
    for square in nav.visible_squares() {
        assert!(square.is_visible());
    }
}

#[test]
fn dynamic_circle_obstacle_forces_a_detour_and_removal_restores_the_baseline() {
    let _ = env_logger::try_init();
    let mut nav = GridNavigator::new(rect(200.0, 60.0), vec![], 10.0);
    nav.generate(&CancelToken::new()).unwrap();

    let start = Vector::new(5.0, 30.0);
    let dest = Vector::new(195.0, 30.0);
    let cost = |a: Vector, b: Vector| nav.cost(a, b);

    let baseline_graph = nav.aggregation_graph(start, dest, &QueryOptions::default());
    let baseline = navkit::astar::find_path(&baseline_graph, start, dest, cost);
    assert!(!baseline.is_empty());

    let blocker = Circle::new(Vector::new(100.0, 30.0), 20.0);
    let blockers: [&dyn navkit::DynamicObstacle; 1] = [&blocker];
    let opts = QueryOptions {
        obstacles: &blockers,
        agent_radius: 0.0,
    };
    let detour_graph = nav.aggregation_graph(start, dest, &opts);
    let detour = navkit::astar::find_path(&detour_graph, start, dest, cost);
    assert!(!detour.is_empty());

    for w in detour.windows(2) {
        let midpoint = (w[0] + w[1]) / 2.0;
        assert!(!blocker.is_point_around(midpoint, 0.0));
    }

    let restored_graph = nav.aggregation_graph(start, dest, &QueryOptions::default());
    let restored = navkit::astar::find_path(&restored_graph, start, dest, cost);
    assert_eq!(restored, baseline);
}

#[test]
fn contains_point_is_false_outside_the_outer_ring() {
    let nav = GridNavigator::new(rect(40.0, 40.0), vec![], 10.0);
    assert!(!nav.contains_point(Vector::new(100.0, 100.0)));
}
