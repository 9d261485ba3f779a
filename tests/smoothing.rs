use navkit::smoothing::{smooth, Subdivision};
use navkit::Vector;

#[test]
fn smoothing_a_right_angle_corner_pulls_it_toward_the_midpoint() {
    let path = vec![
        Vector::new(0.0, 0.0),
        Vector::new(10.0, 0.0),
        Vector::new(10.0, 10.0),
    ];
    let out = smooth(&path, Subdivision::PowerOfTwo { subdivisions: 3 }, 0.5, 4);

    assert_eq!(out.first().copied(), Some(Vector::new(0.0, 0.0)));
    assert_eq!(out.last().copied(), Some(Vector::new(10.0, 10.0)));

    let corner_index = out.len() / 2;
    let original_corner = Vector::new(10.0, 0.0);
    let smoothed_corner = out[corner_index];
    assert!(smoothed_corner.distance(original_corner) > 0.0);
}

#[test]
fn uniform_length_subdivision_keeps_segments_short() {
    let path = vec![Vector::new(0.0, 0.0), Vector::new(50.0, 0.0)];
    let out = smooth(
        &path,
        Subdivision::UniformLength { max_segment_length: 2.0 },
        0.0,
        0,
    );
    for w in out.windows(2) {
        assert!(w[0].distance(w[1]) <= 2.001);
    }
}
