use crate::{Coordinate, Rectangle};

pub fn rectangles_from_coordinates(coords: &[Coordinate]) -> Vec<Rectangle> {
    coords
        .windows(2)
        .map(|c| Rectangle::new(c[0], c[1]))
        .collect()
}

pub(crate) fn divup(dividend: usize, divisor: usize) -> usize {
    let quotient = dividend / divisor;
    match dividend % divisor {
        0 => quotient,
        _ => quotient + 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_divup() {
        assert_eq!(divup(9, 2), 5);
        assert_eq!(divup(8, 2), 4);
        assert_eq!(divup(0, 2), 0);
    }

    #[test]
    fn test_rectangles_from_coordinates() {
        let coords: Vec<Coordinate> = vec![(0., 0.).into(), (2., 1.).into(), (1., 3.).into()];
        let rects = rectangles_from_coordinates(&coords);
        assert_eq!(
            rects,
            vec![
                Rectangle::from_corners(0., 0., 2., 1.),
                Rectangle::from_corners(1., 1., 2., 3.),
            ]
        );
        assert!(rectangles_from_coordinates(&coords[..1]).is_empty());
    }
}
