use ndarray::{arr1, arr2, Array2};

pub struct MatrixHelper;

impl MatrixHelper {
    /// Counter-clockwise 2D rotation matrix for an angle in radians.
    pub fn rotation(angle_rad: f64) -> Array2<f64> {
        let (sin, cos) = angle_rad.sin_cos();
        arr2(&[[cos, -sin], [sin, cos]])
    }

    /// Rotates the vector `(x, y)` by `angle_rad`.
    pub fn rotate(angle_rad: f64, x: f64, y: f64) -> (f64, f64) {
        if angle_rad == 0.0 {
            return (x, y);
        }
        let rotated = Self::rotation(angle_rad).dot(&arr1(&[x, y]));
        (rotated[0], rotated[1])
    }
}
