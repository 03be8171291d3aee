//! Transform planning: padded dimensions and pre-transform conditioning.

use std::fmt;
use std::str::FromStr;

use crate::error::{GridFourierError, Result};
use crate::grid::{Grid, GridGeometry};

/// Direction along which wavenumbers are measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Radial wavenumber `sqrt(kx^2 + ky^2)`.
    #[default]
    Radial,
    /// The signed x component only.
    X,
    /// The signed y component only.
    Y,
}

impl FromStr for Direction {
    type Err = GridFourierError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "r" => Ok(Self::Radial),
            "x" => Ok(Self::X),
            "y" => Ok(Self::Y),
            other => Err(GridFourierError::config(format!(
                "unknown wavenumber direction '{other}', expected r, x, or y"
            ))),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Radial => write!(f, "r"),
            Self::X => write!(f, "x"),
            Self::Y => write!(f, "y"),
        }
    }
}

/// Sizing and conditioning modifiers parsed from a plan spec string.
///
/// Grammar: `[f | <nx>/<ny>] [+d] [+t<width>] [+w]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct PlanModifiers {
    /// Explicit transform dimensions.
    forced: Option<(usize, usize)>,
    /// Keep the grid's actual dimensions, no padding.
    no_padding: bool,
    /// Remove a least-squares plane before the forward transform.
    detrend: bool,
    /// Cosine-taper the outermost cells before the forward transform.
    taper: Option<usize>,
    /// Write the amplitude spectrum grid beside the output.
    save_spectrum: bool,
}

fn parse_modifiers(spec: &str) -> Result<PlanModifiers> {
    let mut modifiers = PlanModifiers::default();
    let mut parts = spec.split('+');

    let head = parts.next().unwrap_or("");
    match head {
        "" => {}
        "f" => modifiers.no_padding = true,
        dims => {
            let (nx, ny) = dims.split_once('/').ok_or_else(|| {
                GridFourierError::config(format!(
                    "invalid transform dimensions '{dims}', expected <nx>/<ny>"
                ))
            })?;
            let nx = nx.parse::<usize>().map_err(|_| bad_dims(dims))?;
            let ny = ny.parse::<usize>().map_err(|_| bad_dims(dims))?;
            modifiers.forced = Some((nx, ny));
        }
    }

    for part in parts {
        match part.chars().next() {
            Some('d') if part.len() == 1 => modifiers.detrend = true,
            Some('w') if part.len() == 1 => modifiers.save_spectrum = true,
            Some('t') => {
                let width = part[1..].parse::<usize>().map_err(|_| {
                    GridFourierError::config(format!(
                        "modifier +t requires a cell count, got '+{part}'"
                    ))
                })?;
                modifiers.taper = Some(width);
            }
            _ => {
                return Err(GridFourierError::config(format!(
                    "unrecognized transform modifier '+{part}'"
                )))
            }
        }
    }

    Ok(modifiers)
}

fn bad_dims(dims: &str) -> GridFourierError {
    GridFourierError::config(format!(
        "invalid transform dimensions '{dims}', expected <nx>/<ny>"
    ))
}

/// Read-only description of a planned 2D transform.
///
/// Owned by the pipeline invocation that created it; the padded `nx`/`ny`
/// size the grid's backing store for the transform.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformPlan {
    /// Padded column count.
    pub nx: usize,
    /// Padded row count.
    pub ny: usize,
    /// Cell increment in x, carried over from the grid geometry.
    pub dx: f64,
    /// Cell increment in y, carried over from the grid geometry.
    pub dy: f64,
    pub direction: Direction,
    pub detrend: bool,
    pub taper: Option<usize>,
    pub save_spectrum: bool,
}

impl TransformPlan {
    /// Negotiate a plan for the given grid geometry.
    ///
    /// Without an explicit size in `spec`, each padded dimension is the
    /// smallest 5-smooth integer >= the logical dimension; rustfft is
    /// fastest when sizes factor into small primes, and the extra cells
    /// are silently zero-filled.
    pub fn new(geometry: &GridGeometry, direction: Direction, spec: Option<&str>) -> Result<Self> {
        let modifiers = spec.map(parse_modifiers).transpose()?.unwrap_or_default();

        let (nx, ny) = if modifiers.no_padding {
            (geometry.nx, geometry.ny)
        } else if let Some((nx, ny)) = modifiers.forced {
            if nx < geometry.nx || ny < geometry.ny {
                return Err(GridFourierError::config(format!(
                    "forced transform dimensions {nx} x {ny} are smaller than the grid ({} x {})",
                    geometry.nx, geometry.ny
                )));
            }
            (nx, ny)
        } else {
            (next_smooth(geometry.nx), next_smooth(geometry.ny))
        };

        if let Some(width) = modifiers.taper {
            if 2 * width >= geometry.nx.min(geometry.ny) {
                return Err(GridFourierError::config(format!(
                    "taper width {width} is too large for a {} x {} grid",
                    geometry.nx, geometry.ny
                )));
            }
        }

        Ok(Self {
            nx,
            ny,
            dx: geometry.dx,
            dy: geometry.dy,
            direction,
            detrend: modifiers.detrend,
            taper: modifiers.taper,
            save_spectrum: modifiers.save_spectrum,
        })
    }

    /// Check that a grid's backing store matches the planned dimensions.
    pub fn verify_store(&self, grid: &Grid) -> Result<()> {
        if grid.nx_padded() != self.nx || grid.ny_padded() != self.ny {
            return Err(GridFourierError::transform(format!(
                "plan is for {} x {} but the grid store is {} x {}",
                self.nx,
                self.ny,
                grid.nx_padded(),
                grid.ny_padded()
            )));
        }
        Ok(())
    }
}

/// Smallest 5-smooth integer (prime factors 2, 3, 5 only) >= `n`.
fn next_smooth(n: usize) -> usize {
    (n..).find(|&candidate| is_smooth(candidate)).unwrap_or(n)
}

fn is_smooth(mut n: usize) -> bool {
    if n == 0 {
        return false;
    }
    for divisor in [2, 3, 5] {
        while n % divisor == 0 {
            n /= divisor;
        }
    }
    n == 1
}
