use std::sync::Arc;

use ndarray::parallel::prelude::*;
use ndarray::{Array2, ArrayViewMut1, Axis};
use num_complex::Complex;
use rustfft::{Fft, FftPlanner};

use crate::consts::PARALLEL_PIXEL_THRESHOLD;

/// Centered 2D spectrum: zero frequency sits at [`center_index`].
pub type Spectrum = Array2<Complex<f64>>;

/// Location of the zero-frequency bin after [`fftshift`]: `(rows / 2, cols / 2)`.
pub fn center_index(dim: (usize, usize)) -> (usize, usize) {
    (dim.0 / 2, dim.1 / 2)
}

/// Forward 2D DFT of a real image, shifted so zero frequency is centered.
pub fn forward(img: &Array2<f64>) -> Spectrum {
    let complex = img.mapv(|v| Complex::new(v, 0.0));
    fftshift(&fft2d(&complex))
}

/// Undo the centering shift, then apply the inverse 2D DFT (scaled by `1/(h*w)`).
pub fn inverse(spectrum: &Spectrum) -> Array2<Complex<f64>> {
    ifft2d(&ifftshift(spectrum))
}

/// `ln(1 + |z|^2)` elementwise.
pub fn log_power(data: &Array2<Complex<f64>>) -> Array2<f64> {
    data.mapv(|z| z.norm_sqr().ln_1p())
}

/// Unnormalized 2D forward FFT: row transforms, then column transforms.
pub fn fft2d(data: &Array2<Complex<f64>>) -> Array2<Complex<f64>> {
    let (h, w) = data.dim();
    let mut work = data.as_standard_layout().into_owned();
    if h == 0 || w == 0 {
        return work;
    }

    let mut planner = FftPlanner::new();
    let fft_row = planner.plan_fft_forward(w);
    let fft_col = planner.plan_fft_forward(h);

    transform_lanes(&mut work, &fft_row, Axis(0));
    transform_lanes(&mut work, &fft_col, Axis(1));
    work
}

/// 2D inverse FFT normalized by `1/(h*w)`, keeping the complex result.
pub fn ifft2d(data: &Array2<Complex<f64>>) -> Array2<Complex<f64>> {
    let (h, w) = data.dim();
    let mut work = data.as_standard_layout().into_owned();
    if h == 0 || w == 0 {
        return work;
    }

    let mut planner = FftPlanner::new();
    let ifft_row = planner.plan_fft_inverse(w);
    let ifft_col = planner.plan_fft_inverse(h);

    transform_lanes(&mut work, &ifft_col, Axis(1));
    transform_lanes(&mut work, &ifft_row, Axis(0));

    let scale = 1.0 / (h * w) as f64;
    work.mapv_inplace(|z| z * scale);
    work
}

/// Run `fft` over every 1D lane of `work`. `Axis(0)` visits rows, `Axis(1)` columns.
fn transform_lanes(work: &mut Array2<Complex<f64>>, fft: &Arc<dyn Fft<f64>>, axis: Axis) {
    if work.len() >= PARALLEL_PIXEL_THRESHOLD {
        work.axis_iter_mut(axis)
            .into_par_iter()
            .for_each(|lane| transform_lane(lane, fft));
    } else {
        for lane in work.axis_iter_mut(axis) {
            transform_lane(lane, fft);
        }
    }
}

fn transform_lane(mut lane: ArrayViewMut1<'_, Complex<f64>>, fft: &Arc<dyn Fft<f64>>) {
    let mut buffer = lane.to_vec();
    fft.process(&mut buffer);
    for (dst, src) in lane.iter_mut().zip(buffer) {
        *dst = src;
    }
}

/// Move bin `(0, 0)` to `(h / 2, w / 2)`.
pub fn fftshift<T: Clone>(data: &Array2<T>) -> Array2<T> {
    let (h, w) = data.dim();
    roll(data, h / 2, w / 2)
}

/// Inverse of [`fftshift`]; differs from it for odd dimensions.
pub fn ifftshift<T: Clone>(data: &Array2<T>) -> Array2<T> {
    let (h, w) = data.dim();
    roll(data, h - h / 2, w - w / 2)
}

/// Cyclic shift: element `(r, c)` moves to `((r + dr) % h, (c + dc) % w)`.
fn roll<T: Clone>(data: &Array2<T>, dr: usize, dc: usize) -> Array2<T> {
    let (h, w) = data.dim();
    Array2::from_shape_fn((h, w), |(r, c)| {
        data[[(r + h - dr % h) % h, (c + w - dc % w) % w]].clone()
    })
}
