//! Load items from Well-Known Text.
//!
//! Geometries are indexed by their envelope. Input may hold several
//! geometries separated by blank lines.

use wkt::types::{Coord, LineString};
use wkt::{Geometry, Wkt};

use crate::{RTree, RTreeError, RTreeResult, Rectangle};

/// The envelope of each geometry in `text`, in input order. Geometries with no
/// coordinates (`POINT EMPTY` and the like) get the empty rectangle.
pub fn envelopes_from_wkt(text: &str) -> RTreeResult<Vec<Rectangle>> {
    let mut envelopes = Vec::new();
    for block in text.split("\n\n").map(str::trim).filter(|b| !b.is_empty()) {
        let parsed: Wkt<f64> = Wkt::from_str(block).map_err(|e| RTreeError::Wkt(e.to_string()))?;
        envelopes.extend(parsed.items.iter().map(geometry_envelope));
    }
    Ok(envelopes)
}

fn geometry_envelope(geometry: &Geometry<f64>) -> Rectangle {
    let mut envelope = Rectangle::new_empty();
    match geometry {
        Geometry::Point(point) => expand_coords(&mut envelope, point.0.iter()),
        Geometry::LineString(line) => expand_line(&mut envelope, line),
        Geometry::Polygon(polygon) => {
            for ring in &polygon.0 {
                expand_line(&mut envelope, ring);
            }
        }
        Geometry::MultiPoint(points) => {
            expand_coords(&mut envelope, points.0.iter().filter_map(|p| p.0.as_ref()))
        }
        Geometry::MultiLineString(lines) => {
            for line in &lines.0 {
                expand_line(&mut envelope, line);
            }
        }
        Geometry::MultiPolygon(polygons) => {
            for ring in polygons.0.iter().flat_map(|p| p.0.iter()) {
                expand_line(&mut envelope, ring);
            }
        }
        Geometry::GeometryCollection(collection) => {
            for child in &collection.0 {
                envelope.expand(geometry_envelope(child));
            }
        }
    }
    envelope
}

fn expand_line(envelope: &mut Rectangle, line: &LineString<f64>) {
    expand_coords(envelope, line.0.iter());
}

fn expand_coords<'a>(envelope: &mut Rectangle, coords: impl Iterator<Item = &'a Coord<f64>>) {
    for coord in coords {
        envelope.expand(Rectangle::from((coord.x, coord.y)));
    }
}

impl<T> RTree<T> {
    /// Insert one item per non-empty geometry in `text`. `make_data` receives
    /// the geometry's position in the input. Returns the number inserted.
    pub fn insert_wkt<F>(&mut self, text: &str, mut make_data: F) -> RTreeResult<usize>
    where
        F: FnMut(usize) -> T,
    {
        let envelopes = envelopes_from_wkt(text)?;
        let mut inserted = 0;
        for (index, envelope) in envelopes.into_iter().enumerate() {
            if envelope.is_empty() {
                log::debug!("skipping empty geometry {}", index);
                continue;
            }
            self.insert(make_data(index), envelope);
            inserted += 1;
        }
        Ok(inserted)
    }
}
