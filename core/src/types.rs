use ndarray::Array2;

/// Single coordinate axis used for the board dimension and tile positions.
pub type Coord = u8;

/// Count type used for mine counts and total-tile counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(x, y)`.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

/// Row-major: `(x, y)` lands at flat offset `y * size + x`.
impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.1.into(), self.0.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// The 8-neighborhood, `(0, 0)` left out.
pub const SURROUNDING: &[(isize, isize)] = &[
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Up, left, right, down.
pub const ORTHOGONAL: &[(isize, isize)] = &[(0, -1), (-1, 0), (1, 0), (0, 1)];

pub trait NeighborIterExt {
    /// Bounds of the grid as `(width, height)`.
    fn bounds(&self) -> Coord2;

    fn iter_neighbors(&self, index: Coord2) -> NeighborIter {
        NeighborIter::new(index, self.bounds(), SURROUNDING)
    }

    fn iter_orthogonal(&self, index: Coord2) -> NeighborIter {
        NeighborIter::new(index, self.bounds(), ORTHOGONAL)
    }
}

impl<T> NeighborIterExt for Array2<T> {
    fn bounds(&self) -> Coord2 {
        let (rows, cols) = self.dim();
        (
            cols.try_into().unwrap_or(Coord::MAX),
            rows.try_into().unwrap_or(Coord::MAX),
        )
    }
}

/// Whether `coords` lies inside a grid of the given `(width, height)`.
pub const fn in_bounds(coords: Coord2, bounds: Coord2) -> bool {
    coords.0 < bounds.0 && coords.1 < bounds.1
}

/// Applies `delta` to `coords`, returning a value only when it remains in bounds.
fn apply_delta(coords: Coord2, delta: (isize, isize), bounds: Coord2) -> Option<Coord2> {
    let (x, y) = coords;
    let (dx, dy) = delta;
    let (max_x, max_y) = bounds;

    let next_x = x.checked_add_signed(dx.try_into().ok()?)?;
    if next_x >= max_x {
        return None;
    }

    let next_y = y.checked_add_signed(dy.try_into().ok()?)?;
    if next_y >= max_y {
        return None;
    }

    Some((next_x, next_y))
}

#[derive(Debug)]
pub struct NeighborIter {
    center: Coord2,
    bounds: Coord2,
    displacements: &'static [(isize, isize)],
    index: u8,
}

impl NeighborIter {
    pub fn new(center: Coord2, bounds: Coord2, displacements: &'static [(isize, isize)]) -> Self {
        Self {
            center,
            bounds,
            displacements,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let delta = *self.displacements.get(usize::from(self.index))?;
            self.index += 1;

            if let Some(next_item) = apply_delta(self.center, delta, self.bounds) {
                return Some(next_item);
            }
        }
    }
}
