use ndarray::Array2;

use crate::LabelRaster;

/// Even-odd ray casting test.
pub fn contains_point(vertices: &[[f64; 2]], px: f64, py: f64) -> bool {
    if vertices.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let [xi, yi] = vertices[i];
        let [xj, yj] = vertices[j];
        if ((yi > py) != (yj > py)) && (px < (xj - xi) * (py - yi) / (yj - yi) + xi) {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Foreground pixels whose centre lies inside the polygon.
///
/// Vertices are in data coordinates, pixel `(x, y)` has its centre at
/// `ceil(origin) + (x, y)`. Only the polygon's bounding box is scanned.
pub fn polygon_mask(labels: &LabelRaster, vertices: &[[f64; 2]], origin: [f64; 2]) -> Array2<bool> {
    let (height, width) = labels.dim();
    let mut mask = Array2::from_elem((height, width), false);
    if vertices.len() < 3 || height == 0 || width == 0 {
        return mask;
    }
    let origin = [origin[0].ceil(), origin[1].ceil()];

    let (min_x, max_x) = bounds(vertices.iter().map(|p| p[0] - origin[0]));
    let (min_y, max_y) = bounds(vertices.iter().map(|p| p[1] - origin[1]));
    let cols = search_sorted(min_x, width)..search_sorted(max_x, width);
    let rows = search_sorted(min_y, height)..search_sorted(max_y, height);

    let data = labels.view();
    for y in rows {
        for x in cols.clone() {
            if data[[y, x]] > 0
                && contains_point(vertices, x as f64 + origin[0], y as f64 + origin[1])
            {
                mask[[y, x]] = true;
            }
        }
    }
    mask
}

fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

/// First pixel index whose coordinate is not below `value`.
fn search_sorted(value: f64, len: usize) -> usize {
    if value <= 0.0 {
        0
    } else {
        (value.ceil() as usize).min(len)
    }
}
