//! Small geometry helpers shared by the session and the exports.

/// Euclidean distance between two points in pixel space.
pub fn distance(a: [f64; 2], b: [f64; 2]) -> f64 {
    (b[0] - a[0]).hypot(b[1] - a[1])
}
