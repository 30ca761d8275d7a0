use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{FilterError, Result};

/// How neighbours outside the array are treated when eroding a mask.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgePolicy {
    /// Out-of-range neighbours count as outside the cell.
    #[default]
    Clamp,
    /// Indices wrap around both axes, as if the array were a torus.
    /// Matches masks produced by older tooling that relied on negative indexing.
    Wrap,
}

impl std::fmt::Display for EdgePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Clamp => write!(f, "Clamp"),
            Self::Wrap => write!(f, "Wrap"),
        }
    }
}

/// Binary mask of the pixels inside a cell. Nonzero means inside.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundaryMask {
    pub data: Array2<f64>,
}

impl BoundaryMask {
    pub fn new(data: Array2<f64>) -> Self {
        Self { data }
    }

    pub fn dim(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Number of pixels inside the cell.
    pub fn inside_count(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0.0).count()
    }

    pub fn check_shape(&self, found: (usize, usize)) -> Result<()> {
        if self.dim() != found {
            return Err(FilterError::ShapeMismatch {
                expected: self.dim(),
                found,
            });
        }
        Ok(())
    }

    /// Elementwise product of `data` with the mask.
    pub fn apply(&self, data: &Array2<f64>) -> Result<Array2<f64>> {
        self.check_shape(data.dim())?;
        Ok(data * &self.data)
    }

    pub fn buffered(&self, policy: EdgePolicy) -> BoundaryMask {
        buffer_boundary(self, policy)
    }
}

/// Shrink the mask by one pixel: an inside pixel with any zero 4-neighbour
/// is dropped.
pub fn buffer_boundary(mask: &BoundaryMask, policy: EdgePolicy) -> BoundaryMask {
    let (h, w) = mask.dim();
    let mut buff = mask.data.clone();

    for row in 0..h {
        for col in 0..w {
            if mask.data[[row, col]] == 0.0 {
                continue;
            }
            let (r, c) = (row as isize, col as isize);
            let touches_outside = [(r - 1, c), (r, c - 1), (r + 1, c), (r, c + 1)]
                .into_iter()
                .any(|(nr, nc)| neighbor(&mask.data, nr, nc, policy) == 0.0);
            if touches_outside {
                buff[[row, col]] = 0.0;
            }
        }
    }

    BoundaryMask::new(buff)
}

fn neighbor(data: &Array2<f64>, row: isize, col: isize, policy: EdgePolicy) -> f64 {
    let (h, w) = (data.nrows() as isize, data.ncols() as isize);
    match policy {
        EdgePolicy::Clamp => {
            if row < 0 || row >= h || col < 0 || col >= w {
                0.0
            } else {
                data[[row as usize, col as usize]]
            }
        }
        EdgePolicy::Wrap => data[[row.rem_euclid(h) as usize, col.rem_euclid(w) as usize]],
    }
}

/// A cell's boundary mask together with its eroded variant.
///
/// Built once per cell and shared read-only by every frame of that cell.
#[derive(Clone, Debug)]
pub struct CellBoundary {
    /// Unbuffered mask, used for cropping.
    pub raw: BoundaryMask,
    /// One-pixel eroded mask, applied to the raw image before filtering.
    pub buffered: BoundaryMask,
}

impl CellBoundary {
    pub fn new(raw: BoundaryMask, policy: EdgePolicy) -> Result<Self> {
        let (h, w) = raw.dim();
        if h == 0 || w == 0 {
            return Err(FilterError::InvalidParameter(
                "boundary mask has no pixels".into(),
            ));
        }
        let buffered = raw.buffered(policy);
        Ok(Self { raw, buffered })
    }

    pub fn dim(&self) -> (usize, usize) {
        self.raw.dim()
    }
}
