//! Native binary raster format.
//!
//! Layout, all little-endian:
//!
//! ```text
//! magic "GFR1"                     4 bytes
//! registration                     u8   (0 = gridline, 1 = pixel)
//! west east south north dx dy      6 x f64
//! nodata                           f64
//! nx ny                            2 x u32
//! samples                          nx * ny x f64, row-major, row 0 north
//! ```
//!
//! Only the real channel of a grid is persisted; padding introduced for a
//! transform is cropped away before encoding.

use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use ndarray::Array2;

use crate::error::{GridFourierError, Result};
use crate::grid::geometry::{GridGeometry, Region, Registration};
use crate::grid::raster::Grid;

const MAGIC: [u8; 4] = *b"GFR1";

/// Read a grid from `path`.
///
/// The samples become the real channel of a complex-interleaved store; the
/// imaginary channel starts out zero.
pub fn load(path: &Path) -> Result<Grid> {
    let file = File::open(path).map_err(|err| {
        GridFourierError::input(format!("cannot open grid file {}: {err}", path.display()))
    })?;
    let mut reader = BufReader::new(file);

    let mut magic = [0u8; 4];
    reader
        .read_exact(&mut magic)
        .map_err(|err| read_error(path, err))?;
    if magic != MAGIC {
        return Err(GridFourierError::input(format!(
            "{} is not a grid file (bad magic)",
            path.display()
        )));
    }

    let registration = match reader.read_u8().map_err(|err| read_error(path, err))? {
        0 => Registration::Gridline,
        1 => Registration::Pixel,
        other => {
            return Err(GridFourierError::input(format!(
                "{}: unknown registration code {other}",
                path.display()
            )))
        }
    };

    let mut header = [0.0f64; 7];
    reader
        .read_f64_into::<LittleEndian>(&mut header)
        .map_err(|err| read_error(path, err))?;
    let [west, east, south, north, dx, dy, nodata] = header;

    let nx = reader.read_u32::<LittleEndian>().map_err(|err| read_error(path, err))? as usize;
    let ny = reader.read_u32::<LittleEndian>().map_err(|err| read_error(path, err))? as usize;

    let mut geometry = GridGeometry::new(Region::new(west, east, south, north), dx, dy, registration)
        .map_err(|err| {
            GridFourierError::input(format!("{}: invalid grid header: {err}", path.display()))
        })?;
    if geometry.nx != nx || geometry.ny != ny {
        return Err(GridFourierError::input(format!(
            "{}: header claims {nx} x {ny} nodes but region and increments give {} x {}",
            path.display(),
            geometry.nx,
            geometry.ny
        )));
    }
    geometry.nodata = nodata;

    let mut samples = vec![0.0f64; nx * ny];
    reader
        .read_f64_into::<LittleEndian>(&mut samples)
        .map_err(|err| read_error(path, err))?;

    Grid::from_real(geometry, &samples)
}

/// Persist a grid's real channel, cropped to its logical dimensions.
pub fn write(grid: &Grid, path: &Path) -> Result<()> {
    write_real(grid.geometry(), &grid.real_channel(), path)
}

/// Persist `values` (row-major, row 0 north) under the given geometry.
///
/// The file is encoded fully in memory, written to a sibling temp file, and
/// renamed into place, so a failed run leaves no partial output behind.
pub fn write_real(geometry: &GridGeometry, values: &Array2<f64>, path: &Path) -> Result<()> {
    debug_assert_eq!(values.dim(), (geometry.ny, geometry.nx));

    let mut buf = Vec::with_capacity(4 + 1 + 7 * 8 + 2 * 4 + values.len() * 8);
    buf.extend_from_slice(&MAGIC);
    let registration = match geometry.registration {
        Registration::Gridline => 0u8,
        Registration::Pixel => 1u8,
    };
    encode(&mut buf, registration, geometry, values)
        .map_err(|err| GridFourierError::output(format!("encoding grid failed: {err}")))?;

    let staging = path.with_extension("partial");
    fs::write(&staging, &buf).map_err(|err| {
        GridFourierError::output(format!("cannot write {}: {err}", staging.display()))
    })?;
    fs::rename(&staging, path).map_err(|err| {
        let _ = fs::remove_file(&staging);
        GridFourierError::output(format!("cannot write {}: {err}", path.display()))
    })
}

fn encode(
    buf: &mut Vec<u8>,
    registration: u8,
    geometry: &GridGeometry,
    values: &Array2<f64>,
) -> std::io::Result<()> {
    buf.write_u8(registration)?;
    for value in [
        geometry.region.west,
        geometry.region.east,
        geometry.region.south,
        geometry.region.north,
        geometry.dx,
        geometry.dy,
        geometry.nodata,
    ] {
        buf.write_f64::<LittleEndian>(value)?;
    }
    buf.write_u32::<LittleEndian>(geometry.nx as u32)?;
    buf.write_u32::<LittleEndian>(geometry.ny as u32)?;
    for &value in values.iter() {
        buf.write_f64::<LittleEndian>(value)?;
    }
    Ok(())
}

fn read_error(path: &Path, err: std::io::Error) -> GridFourierError {
    GridFourierError::input(format!("cannot read grid file {}: {err}", path.display()))
}
