mod common;

use ndarray::{array, Array2};

use rbcfilt_core::error::FilterError;
use rbcfilt_core::mask::{buffer_boundary, BoundaryMask, CellBoundary, EdgePolicy};

use common::bordered_mask;

fn nonzero(data: &Array2<f64>) -> Vec<(usize, usize)> {
    data.indexed_iter()
        .filter(|(_, &v)| v != 0.0)
        .map(|(idx, _)| idx)
        .collect()
}

// ---------------------------------------------------------------------------
// Erosion
// ---------------------------------------------------------------------------

#[test]
fn test_bordered_square_erodes_to_center() {
    let mask = BoundaryMask::new(bordered_mask(5, 5, 1));
    assert_eq!(mask.inside_count(), 9);

    let buffered = buffer_boundary(&mask, EdgePolicy::Clamp);
    assert_eq!(nonzero(&buffered.data), vec![(2, 2)]);
}

#[test]
fn test_erosion_does_not_mutate_input() {
    let mask = BoundaryMask::new(bordered_mask(5, 5, 1));
    let before = mask.clone();
    let _ = mask.buffered(EdgePolicy::Clamp);
    assert_eq!(mask, before);
}

#[test]
fn test_erosion_keeps_original_values() {
    let mut data = bordered_mask(5, 5, 1);
    data[[2, 2]] = 7.0;
    let buffered = BoundaryMask::new(data).buffered(EdgePolicy::Clamp);
    assert_eq!(buffered.data[[2, 2]], 7.0);
}

#[test]
fn test_diagonal_neighbours_are_ignored() {
    // A plus shape: the center has four inside neighbours, diagonals are out.
    let data = array![[0.0, 1.0, 0.0], [1.0, 1.0, 1.0], [0.0, 1.0, 0.0]];
    let buffered = buffer_boundary(&BoundaryMask::new(data), EdgePolicy::Wrap);
    assert_eq!(nonzero(&buffered.data), vec![(1, 1)]);
}

// ---------------------------------------------------------------------------
// Edge policy
// ---------------------------------------------------------------------------

#[test]
fn test_clamp_treats_outside_as_background() {
    let mask = BoundaryMask::new(Array2::ones((4, 4)));
    let buffered = mask.buffered(EdgePolicy::Clamp);
    assert_eq!(nonzero(&buffered.data), vec![(1, 1), (1, 2), (2, 1), (2, 2)]);
}

#[test]
fn test_wrap_treats_array_as_torus() {
    let mask = BoundaryMask::new(Array2::ones((4, 4)));
    let buffered = mask.buffered(EdgePolicy::Wrap);
    assert_eq!(buffered.inside_count(), 16);
}

#[test]
fn test_wrap_reads_opposite_edge() {
    // Column 0 is inside; under Wrap its left neighbour is column 3.
    let mut data = Array2::zeros((3, 4));
    data.column_mut(0).fill(1.0);
    data.column_mut(1).fill(1.0);

    let clamp = BoundaryMask::new(data.clone()).buffered(EdgePolicy::Clamp);
    assert_eq!(clamp.inside_count(), 0);

    data.column_mut(3).fill(1.0);
    let wrap = BoundaryMask::new(data).buffered(EdgePolicy::Wrap);
    assert_eq!(nonzero(&wrap.data), vec![(0, 0), (1, 0), (2, 0)]);
}

#[test]
fn test_edge_policy_default_is_clamp() {
    assert_eq!(EdgePolicy::default(), EdgePolicy::Clamp);
    assert_eq!(format!("{}", EdgePolicy::Wrap), "Wrap");
}

// ---------------------------------------------------------------------------
// CellBoundary
// ---------------------------------------------------------------------------

#[test]
fn test_cell_boundary_holds_both_masks() {
    let cell = CellBoundary::new(BoundaryMask::new(bordered_mask(5, 5, 1)), EdgePolicy::Clamp)
        .unwrap();
    assert_eq!(cell.dim(), (5, 5));
    assert_eq!(cell.raw.inside_count(), 9);
    assert_eq!(cell.buffered.inside_count(), 1);
}

#[test]
fn test_cell_boundary_rejects_empty_mask() {
    let err = CellBoundary::new(BoundaryMask::new(Array2::zeros((0, 3))), EdgePolicy::Clamp)
        .unwrap_err();
    assert!(matches!(err, FilterError::InvalidParameter(_)));
}

#[test]
fn test_apply_checks_shape() {
    let mask = BoundaryMask::new(bordered_mask(5, 5, 1));
    let err = mask.apply(&Array2::ones((5, 6))).unwrap_err();
    assert!(matches!(
        err,
        FilterError::ShapeMismatch {
            expected: (5, 5),
            found: (5, 6)
        }
    ));
    assert!(!err.is_frame_local());
}

#[test]
fn test_apply_multiplies_elementwise() {
    let mask = BoundaryMask::new(bordered_mask(4, 4, 1));
    let out = mask.apply(&Array2::from_elem((4, 4), 3.0)).unwrap();
    assert_eq!(out.sum(), 12.0);
    assert_eq!(out[[0, 0]], 0.0);
    assert_eq!(out[[1, 2]], 3.0);
}
