#![allow(dead_code)]

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use quadratic_rtree::utils::rectangles_from_coordinates;
use quadratic_rtree::{Coordinate, Rectangle};

//// Utility functions

/// Closed random-walk polylines, one per requested size.
pub(crate) fn get_positions_list(sizes: &[usize], seed: u64) -> Vec<Vec<Coordinate>> {
    let mut rng = SmallRng::seed_from_u64(seed);
    sizes
        .iter()
        .map(|&n| {
            let mut coords = Vec::with_capacity(n + 1);
            let mut current = Coordinate::new(0., 0.);
            for _i in 0..n {
                coords.push(current);
                current = Coordinate::new(
                    current.x + rng.gen_range(-1., 1.),
                    current.y + rng.gen_range(-1., 1.),
                );
            }
            coords.push(coords[0]);
            coords
        })
        .collect()
}

pub(crate) fn make_rectangles_list(positions_list: &[Vec<Coordinate>]) -> Vec<Vec<Rectangle>> {
    positions_list
        .iter()
        .map(|coords| rectangles_from_coordinates(coords))
        .collect()
}

pub(crate) fn get_random_points(rect: Rectangle, n: usize, seed: u64) -> Vec<Coordinate> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut results = Vec::new();
    for _i in 0..n {
        results.push(Coordinate::new(
            rng.gen_range(rect.x_min, rect.x_max),
            rng.gen_range(rect.y_min, rect.y_max),
        ));
    }

    results
}
