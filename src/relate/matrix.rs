//! The DE-9IM intersection matrix.

use crate::algorithm::locate::Location;
use crate::error::{GeometryError, Result};
use crate::geom::Dim;
use std::fmt;
use std::str::FromStr;

const I: usize = 0;
const B: usize = 1;
const E: usize = 2;

/// Dimensions of the pairwise intersections between the interior, boundary
/// and exterior of two geometries. Rows belong to the first geometry,
/// columns to the second.
///
/// # Examples
///
/// ```
/// use planar::relate::IntersectionMatrix;
///
/// let im: IntersectionMatrix = "212101212".parse().unwrap();
/// assert!(im.matches("T*T***T**").unwrap());
/// assert!(im.is_overlaps(planar::geom::Dim::Two, planar::geom::Dim::Two));
/// assert_eq!(im.to_string(), "212101212");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntersectionMatrix {
    cells: [[Dim; 3]; 3],
}

impl Default for IntersectionMatrix {
    fn default() -> Self {
        Self::new()
    }
}

fn is_true(d: Dim) -> bool {
    d != Dim::False
}

impl IntersectionMatrix {
    /// A matrix with every cell `F`.
    pub fn new() -> Self {
        Self {
            cells: [[Dim::False; 3]; 3],
        }
    }

    pub fn get(&self, row: Location, col: Location) -> Dim {
        self.cells[row.index()][col.index()]
    }

    pub fn set(&mut self, row: Location, col: Location, dim: Dim) {
        self.cells[row.index()][col.index()] = dim;
    }

    /// Raise a cell to `dim` if it is currently lower.
    pub fn set_at_least(&mut self, row: Location, col: Location, dim: Dim) {
        let cell = &mut self.cells[row.index()][col.index()];
        if *cell < dim {
            *cell = dim;
        }
    }

    /// The matrix of the relation with the operands swapped.
    pub fn transpose(&self) -> Self {
        let mut out = Self::new();
        for r in 0..3 {
            for c in 0..3 {
                out.cells[c][r] = self.cells[r][c];
            }
        }
        out
    }

    /// Test against a 9-character pattern of `T`, `F`, `*`, `0`, `1`, `2`.
    ///
    /// # Errors
    ///
    /// `InvalidInput` when the pattern has the wrong length or an unknown
    /// character.
    pub fn matches(&self, pattern: &str) -> Result<bool> {
        let chars: Vec<char> = pattern.chars().collect();
        if chars.len() != 9 {
            return Err(GeometryError::InvalidInput(format!(
                "intersection matrix pattern must have 9 characters, got {:?}",
                pattern
            )));
        }
        let mut ok = true;
        for (i, ch) in chars.iter().enumerate() {
            let cell = self.cells[i / 3][i % 3];
            let hit = match ch.to_ascii_uppercase() {
                '*' => true,
                'T' => is_true(cell),
                'F' => cell == Dim::False,
                '0' => cell == Dim::Zero,
                '1' => cell == Dim::One,
                '2' => cell == Dim::Two,
                other => {
                    return Err(GeometryError::InvalidInput(format!(
                        "invalid intersection matrix pattern symbol '{}'",
                        other
                    )));
                }
            };
            ok &= hit;
        }
        Ok(ok)
    }

    pub fn is_disjoint(&self) -> bool {
        self.cells[I][I] == Dim::False
            && self.cells[I][B] == Dim::False
            && self.cells[B][I] == Dim::False
            && self.cells[B][B] == Dim::False
    }

    pub fn is_intersects(&self) -> bool {
        !self.is_disjoint()
    }

    /// Touches: the geometries meet only on boundaries. Never true for two
    /// puntal geometries, which have no boundary.
    pub fn is_touches(&self, dim_a: Dim, dim_b: Dim) -> bool {
        if dim_a == Dim::Zero && dim_b == Dim::Zero {
            return false;
        }
        self.cells[I][I] == Dim::False
            && (is_true(self.cells[I][B]) || is_true(self.cells[B][I]) || is_true(self.cells[B][B]))
    }

    pub fn is_crosses(&self, dim_a: Dim, dim_b: Dim) -> bool {
        match (dim_a, dim_b) {
            (Dim::Zero, Dim::One) | (Dim::Zero, Dim::Two) | (Dim::One, Dim::Two) => {
                is_true(self.cells[I][I]) && is_true(self.cells[I][E])
            }
            (Dim::One, Dim::Zero) | (Dim::Two, Dim::Zero) | (Dim::Two, Dim::One) => {
                is_true(self.cells[I][I]) && is_true(self.cells[E][I])
            }
            (Dim::One, Dim::One) => self.cells[I][I] == Dim::Zero,
            _ => false,
        }
    }

    pub fn is_within(&self) -> bool {
        is_true(self.cells[I][I])
            && self.cells[I][E] == Dim::False
            && self.cells[B][E] == Dim::False
    }

    pub fn is_contains(&self) -> bool {
        is_true(self.cells[I][I])
            && self.cells[E][I] == Dim::False
            && self.cells[E][B] == Dim::False
    }

    /// Contains without touching the boundary: `T**FF*FF*`.
    pub fn is_contains_properly(&self) -> bool {
        is_true(self.cells[I][I])
            && self.cells[B][I] == Dim::False
            && self.cells[B][B] == Dim::False
            && self.cells[E][I] == Dim::False
            && self.cells[E][B] == Dim::False
    }

    fn has_shared_point(&self) -> bool {
        is_true(self.cells[I][I])
            || is_true(self.cells[I][B])
            || is_true(self.cells[B][I])
            || is_true(self.cells[B][B])
    }

    pub fn is_covers(&self) -> bool {
        self.has_shared_point() && self.cells[E][I] == Dim::False && self.cells[E][B] == Dim::False
    }

    pub fn is_covered_by(&self) -> bool {
        self.has_shared_point() && self.cells[I][E] == Dim::False && self.cells[B][E] == Dim::False
    }

    pub fn is_equals(&self, dim_a: Dim, dim_b: Dim) -> bool {
        dim_a == dim_b
            && is_true(self.cells[I][I])
            && self.cells[I][E] == Dim::False
            && self.cells[B][E] == Dim::False
            && self.cells[E][I] == Dim::False
            && self.cells[E][B] == Dim::False
    }

    pub fn is_overlaps(&self, dim_a: Dim, dim_b: Dim) -> bool {
        match (dim_a, dim_b) {
            (Dim::Zero, Dim::Zero) | (Dim::Two, Dim::Two) => {
                is_true(self.cells[I][I]) && is_true(self.cells[I][E]) && is_true(self.cells[E][I])
            }
            (Dim::One, Dim::One) => {
                self.cells[I][I] == Dim::One
                    && is_true(self.cells[I][E])
                    && is_true(self.cells[E][I])
            }
            _ => false,
        }
    }
}

impl fmt::Display for IntersectionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            for d in row {
                write!(f, "{}", d.symbol())?;
            }
        }
        Ok(())
    }
}

impl FromStr for IntersectionMatrix {
    type Err = GeometryError;

    /// Parse nine dimension symbols (`F`, `0`, `1`, `2`).
    fn from_str(s: &str) -> Result<Self> {
        let chars: Vec<char> = s.chars().collect();
        if chars.len() != 9 {
            return Err(GeometryError::InvalidInput(format!(
                "intersection matrix must have 9 cells, got {:?}",
                s
            )));
        }
        let mut im = Self::new();
        for (i, ch) in chars.iter().enumerate() {
            im.cells[i / 3][i % 3] = match ch.to_ascii_uppercase() {
                'F' => Dim::False,
                '0' => Dim::Zero,
                '1' => Dim::One,
                '2' => Dim::Two,
                other => {
                    return Err(GeometryError::InvalidInput(format!(
                        "invalid intersection matrix symbol '{}'",
                        other
                    )));
                }
            };
        }
        Ok(im)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_parse() {
        let im: IntersectionMatrix = "FF1FF0102".parse().unwrap();
        assert_eq!(im.to_string(), "FF1FF0102");
        assert_eq!(im.get(Location::Interior, Location::Exterior), Dim::One);
        assert!("FF1".parse::<IntersectionMatrix>().is_err());
        assert!("FF1FF010X".parse::<IntersectionMatrix>().is_err());
    }

    #[test]
    fn test_pattern_matching() {
        let im: IntersectionMatrix = "212101212".parse().unwrap();
        assert!(im.matches("T*T***T**").unwrap());
        assert!(im.matches("2121*1212").unwrap());
        assert!(!im.matches("F********").unwrap());
        assert!(im.matches("T*T***T*").is_err());
        assert!(im.matches("T*T***T*X").is_err());
    }

    #[test]
    fn test_set_at_least_never_lowers() {
        let mut im = IntersectionMatrix::new();
        im.set_at_least(Location::Interior, Location::Interior, Dim::Two);
        im.set_at_least(Location::Interior, Location::Interior, Dim::Zero);
        assert_eq!(im.get(Location::Interior, Location::Interior), Dim::Two);
    }

    #[test]
    fn test_named_predicates() {
        // polygon containing a smaller polygon
        let contains: IntersectionMatrix = "212FF1FF2".parse().unwrap();
        assert!(contains.is_contains());
        assert!(contains.is_covers());
        assert!(contains.is_contains_properly());
        assert!(!contains.is_within());
        assert!(contains.transpose().is_within());

        // polygon and a point on its boundary
        let boundary_point: IntersectionMatrix = "FF20F1FF2".parse().unwrap();
        assert!(!boundary_point.is_contains());
        assert!(boundary_point.is_covers());
        assert!(!boundary_point.is_contains_properly());
        assert!(boundary_point.is_touches(Dim::Two, Dim::Zero));

        let crossing_lines: IntersectionMatrix = "0F1FF0102".parse().unwrap();
        assert!(crossing_lines.is_crosses(Dim::One, Dim::One));
        assert!(!crossing_lines.is_touches(Dim::One, Dim::One));

        let disjoint: IntersectionMatrix = "FF2FF1212".parse().unwrap();
        assert!(disjoint.is_disjoint());
        assert!(!disjoint.is_intersects());
    }
}
