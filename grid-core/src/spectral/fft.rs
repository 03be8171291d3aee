//! Forward and inverse 2D transforms over a grid's complex store.

use std::f64::consts::PI;

use num_complex::Complex64;
use rustfft::FftPlanner;
use tracing::debug;

use crate::error::{GridFourierError, Result};
use crate::grid::Grid;
use crate::spectral::plan::TransformPlan;

/// Forward 2D transform, in place.
///
/// The store is read as a complex field over the padded dimensions and
/// overwritten with its unnormalized spectrum in standard unshifted layout:
/// bin 0 is zero wavenumber and indices wrap at the Nyquist boundary in
/// each axis. When the plan asks for them, a least-squares plane is removed
/// and a cosine edge taper applied before transforming.
pub fn forward(grid: &mut Grid, plan: &TransformPlan) -> Result<()> {
    plan.verify_store(grid)?;
    if grid.samples().iter().any(|v| !v.is_finite()) {
        return Err(GridFourierError::transform(
            "grid contains non-finite samples, cannot transform",
        ));
    }

    if plan.detrend {
        remove_plane(grid);
    }
    if let Some(width) = plan.taper {
        apply_edge_taper(grid, width);
    }

    transform(grid, plan, true);
    Ok(())
}

/// Inverse 2D transform, in place, normalized by `1/(nx * ny)` so that an
/// unmodified forward/inverse round trip reconstructs the original samples
/// up to floating-point tolerance.
pub fn inverse(grid: &mut Grid, plan: &TransformPlan) -> Result<()> {
    plan.verify_store(grid)?;

    transform(grid, plan, false);
    let scale = 1.0 / (plan.nx * plan.ny) as f64;
    for value in grid.samples_mut() {
        *value *= scale;
    }
    Ok(())
}

/// 1D passes over every row, then gather/scatter passes over every column
/// through a single scratch line.
fn transform(grid: &mut Grid, plan: &TransformPlan, forward: bool) {
    let (nx, ny) = (plan.nx, plan.ny);
    let mut planner = FftPlanner::new();
    let (fft_row, fft_col) = if forward {
        (planner.plan_fft_forward(nx), planner.plan_fft_forward(ny))
    } else {
        (planner.plan_fft_inverse(nx), planner.plan_fft_inverse(ny))
    };

    let data = grid.samples_mut();
    let mut line = vec![Complex64::new(0.0, 0.0); nx.max(ny)];

    for row in 0..ny {
        let base = 2 * row * nx;
        for col in 0..nx {
            line[col] = Complex64::new(data[base + 2 * col], data[base + 2 * col + 1]);
        }
        fft_row.process(&mut line[..nx]);
        for col in 0..nx {
            data[base + 2 * col] = line[col].re;
            data[base + 2 * col + 1] = line[col].im;
        }
    }

    for col in 0..nx {
        for row in 0..ny {
            let node = 2 * (row * nx + col);
            line[row] = Complex64::new(data[node], data[node + 1]);
        }
        fft_col.process(&mut line[..ny]);
        for row in 0..ny {
            let node = 2 * (row * nx + col);
            data[node] = line[row].re;
            data[node + 1] = line[row].im;
        }
    }
}

/// Remove the least-squares plane `a + b*u + c*v` from the real channel of
/// the logical region, with u/v the column/row indices centered at zero.
/// The normal equations decouple on centered indices of a complete grid, so
/// the fit is closed-form.
fn remove_plane(grid: &mut Grid) {
    let (nx, ny) = (grid.geometry().nx, grid.geometry().ny);
    let u0 = (nx as f64 - 1.0) / 2.0;
    let v0 = (ny as f64 - 1.0) / 2.0;

    let (mut sum, mut sum_u, mut sum_v) = (0.0, 0.0, 0.0);
    let (mut sum_uu, mut sum_vv) = (0.0, 0.0);
    for row in 0..ny {
        let v = row as f64 - v0;
        for col in 0..nx {
            let u = col as f64 - u0;
            let z = grid.samples()[grid.node(row, col)];
            sum += z;
            sum_u += z * u;
            sum_v += z * v;
            sum_uu += u * u;
            sum_vv += v * v;
        }
    }

    let n = (nx * ny) as f64;
    let a = sum / n;
    let b = if sum_uu > 0.0 { sum_u / sum_uu } else { 0.0 };
    let c = if sum_vv > 0.0 { sum_v / sum_vv } else { 0.0 };
    debug!(mean = a, slope_x = b, slope_y = c, "removed plane before transform");

    for row in 0..ny {
        let v = row as f64 - v0;
        for col in 0..nx {
            let u = col as f64 - u0;
            let node = grid.node(row, col);
            grid.samples_mut()[node] -= a + b * u + c * v;
        }
    }
}

/// Cosine-taper the outermost `width` cells of the logical region: the real
/// channel rolls off from full weight at the flat-top boundary to zero at
/// the grid edge.
fn apply_edge_taper(grid: &mut Grid, width: usize) {
    if width == 0 {
        return;
    }
    let (nx, ny) = (grid.geometry().nx, grid.geometry().ny);

    for row in 0..ny {
        let wy = edge_weight(row, ny, width);
        for col in 0..nx {
            let weight = wy * edge_weight(col, nx, width);
            if weight < 1.0 {
                let node = grid.node(row, col);
                grid.samples_mut()[node] *= weight;
            }
        }
    }
}

fn edge_weight(index: usize, n: usize, width: usize) -> f64 {
    let distance = index.min(n - 1 - index);
    if distance >= width {
        1.0
    } else {
        0.5 * (1.0 - (PI * distance as f64 / width as f64).cos())
    }
}
