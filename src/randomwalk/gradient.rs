use crate::randomwalk::matrix::{Direction, Matrix};

/// Normalized squared intensity differences toward the four neighbors
///
/// `right` and `top` are computed from the image; `left` and `bottom` are
/// derived from them by a circular shift, so that
/// `left == right.shift_circular(Left)` and
/// `bottom == top.shift_circular(Bottom)` hold exactly.
///
/// All four fields share one normalization: the global maximum over
/// `right` and `top`. A constant image has no gradient to normalize and
/// yields four zero fields.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientField {
    right: Matrix,
    left: Matrix,
    top: Matrix,
    bottom: Matrix,
}

impl GradientField {
    #[must_use]
    pub fn new(image: &Matrix) -> Self {
        let mut right = squared_difference(image, &image.shift_circular(Direction::Right));
        let mut top = squared_difference(image, &image.shift_circular(Direction::Top));

        let max = right.max().max(top.max());
        if max > 0.0 {
            right.map_in_place(|v| v / max);
            top.map_in_place(|v| v / max);
        }

        let left = right.shift_circular(Direction::Left);
        let bottom = top.shift_circular(Direction::Bottom);

        Self {
            right,
            left,
            top,
            bottom,
        }
    }

    /// Field for `direction`
    #[must_use]
    pub const fn get(&self, direction: Direction) -> &Matrix {
        match direction {
            Direction::Right => &self.right,
            Direction::Left => &self.left,
            Direction::Top => &self.top,
            Direction::Bottom => &self.bottom,
        }
    }

    #[must_use]
    pub const fn right(&self) -> &Matrix {
        &self.right
    }

    #[must_use]
    pub const fn left(&self) -> &Matrix {
        &self.left
    }

    #[must_use]
    pub const fn top(&self) -> &Matrix {
        &self.top
    }

    #[must_use]
    pub const fn bottom(&self) -> &Matrix {
        &self.bottom
    }
}

fn squared_difference(image: &Matrix, shifted: &Matrix) -> Matrix {
    Matrix::from_fn(image.width(), image.height(), |x, y| {
        let d = image.get(x, y) - shifted.get(x, y);
        d * d
    })
}
