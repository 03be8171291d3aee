//! Mapping from spectral storage index to physical wavenumber.

use std::f64::consts::PI;

use crate::spectral::plan::{Direction, TransformPlan};

/// Physical wavenumber of the frequency bin holding real-channel storage
/// index `re_index` (an even offset into the interleaved store).
///
/// The bin `re_index / 2` decomposes row-major by the padded column count
/// into an (fx, fy) coordinate. Each axis coordinate folds at the Nyquist
/// boundary: indices in the upper half of the axis (`> n/2`) represent
/// negative frequencies and map to `index - n`. The signed index converts
/// to an angular wavenumber `2 pi * signed / (n * inc)`, and the plan's
/// direction mode selects the radial magnitude or a signed axis component.
pub fn wavenumber(re_index: usize, plan: &TransformPlan) -> f64 {
    let bin = re_index / 2;
    let kx = axis_wavenumber(bin % plan.nx, plan.nx, plan.dx);
    let ky = axis_wavenumber(bin / plan.nx, plan.ny, plan.dy);

    match plan.direction {
        Direction::Radial => kx.hypot(ky),
        Direction::X => kx,
        Direction::Y => ky,
    }
}

fn axis_wavenumber(bin: usize, n: usize, inc: f64) -> f64 {
    let signed = if bin > n / 2 {
        bin as i64 - n as i64
    } else {
        bin as i64
    };
    2.0 * PI * signed as f64 / (n as f64 * inc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{GridGeometry, Region, Registration};

    fn plan(nx: usize, ny: usize, dx: f64, dy: f64, direction: Direction) -> TransformPlan {
        let geometry = GridGeometry::new(
            Region::new(0.0, (nx - 1) as f64 * dx, 0.0, (ny - 1) as f64 * dy),
            dx,
            dy,
            Registration::Gridline,
        )
        .unwrap();
        TransformPlan::new(&geometry, direction, Some("f")).unwrap()
    }

    #[test]
    fn test_zero_bin_has_zero_wavenumber() {
        let plan = plan(16, 16, 1.0, 1.0, Direction::Radial);
        assert_eq!(wavenumber(0, &plan), 0.0);
    }

    #[test]
    fn test_first_bin_matches_fundamental() {
        let plan = plan(32, 16, 2.0, 1.0, Direction::X);
        // fx = 1 corresponds to one cycle over the grid span.
        let expected = 2.0 * PI / (32.0 * 2.0);
        assert!((wavenumber(2, &plan) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_upper_half_folds_negative() {
        let plan = plan(16, 16, 1.0, 1.0, Direction::X);
        let k_pos = wavenumber(2, &plan); // fx = 1
        let k_neg = wavenumber(2 * 15, &plan); // fx = 15 -> -1
        assert!((k_neg + k_pos).abs() < 1e-12);
        assert!(k_neg < 0.0);
    }

    #[test]
    fn test_fold_boundary() {
        let n = 16;
        let plan = plan(n, n, 1.0, 1.0, Direction::X);
        // fx = n/2 is the Nyquist bin and stays positive; fx = n/2 + 1 folds.
        let nyquist = wavenumber(2 * (n / 2), &plan);
        let beyond = wavenumber(2 * (n / 2 + 1), &plan);
        assert!((nyquist - PI).abs() < 1e-12);
        assert!((beyond - 2.0 * PI * (-(n as f64) / 2.0 + 1.0) / n as f64).abs() < 1e-12);
    }

    #[test]
    fn test_radial_symmetry_at_mirrored_bins() {
        // Every bin and its Nyquist-folded mirror carry the same radial
        // wavenumber.
        let (nx, ny) = (12, 10);
        let plan = plan(nx, ny, 3.0, 7.0, Direction::Radial);
        for fy in 0..ny {
            for fx in 0..nx {
                let bin = fy * nx + fx;
                let mirror = ((ny - fy) % ny) * nx + (nx - fx) % nx;
                let k = wavenumber(2 * bin, &plan);
                let k_mirror = wavenumber(2 * mirror, &plan);
                assert!(
                    (k - k_mirror).abs() < 1e-12,
                    "bin ({fx}, {fy}): {k} vs {k_mirror}"
                );
            }
        }
    }

    #[test]
    fn test_y_direction_uses_row_coordinate() {
        let plan = plan(8, 32, 1.0, 0.5, Direction::Y);
        // Bin in row 2, column 3: only fy matters in y mode.
        let bin = 2 * 8 + 3;
        let expected = 2.0 * PI * 2.0 / (32.0 * 0.5);
        assert!((wavenumber(2 * bin, &plan) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_anisotropic_increments_scale_axes() {
        let plan_x = plan(16, 16, 2.0, 1.0, Direction::X);
        let plan_y = plan(16, 16, 2.0, 1.0, Direction::Y);
        let kx = wavenumber(2, &plan_x);
        let ky = wavenumber(2 * 16, &plan_y); // fy = 1
        assert!((ky / kx - 2.0).abs() < 1e-12);
    }
}
