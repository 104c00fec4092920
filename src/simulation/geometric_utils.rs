//! Small geometric helpers shared by movement, biting and vision.

/// Point reached from `(x, y)` after travelling `distance` along `angle`.
///
/// # Arguments
///
/// * `x`, `y` - Starting point
/// * `angle` - Heading in radians, 0 along +x
/// * `distance` - Signed travel distance
#[inline]
pub fn project(x: f32, y: f32, angle: f32, distance: f32) -> (f32, f32) {
    let (sin, cos) = angle.sin_cos();
    (x + distance * cos, y + distance * sin)
}
