// SPDX-License-Identifier: GPL-3.0-only

//! COFF mesh export
//!
//! Writes a [`Mesh`] as colored OFF text:
//!
//! ```text
//! COFF
//! <vertices> <faces> 0
//! <x> <y> <z> <r> <g> <b> <a>     one line per grid point
//! 3 <i0> <i1> <i2>                one line per triangle
//! ```
//!
//! Invalid grid points are written as `0 0 0 0 0 0 0` so that face indices
//! stay equal to pixel indices.

use super::triangulation::Mesh;
use crate::constants::mesh_output;
use crate::errors::{ReconstructionError, ReconstructionResult};
use std::ffi::OsString;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Serialize a mesh as COFF text
pub fn write_off<W: Write>(mesh: &Mesh, out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", mesh_output::FORMAT_TAG)?;
    writeln!(out, "{} {} 0", mesh.vertex_count(), mesh.face_count())?;

    for point in mesh.points() {
        if point.is_valid() {
            let [r, g, b, a] = point.color;
            writeln!(
                out,
                "{} {} {} {} {} {} {}",
                point.position.x, point.position.y, point.position.z, r, g, b, a
            )?;
        } else {
            writeln!(out, "0 0 0 0 0 0 0")?;
        }
    }

    for [i0, i1, i2] in mesh.triangles() {
        writeln!(out, "{} {} {} {}", mesh_output::FACE_ARITY, i0, i1, i2)?;
    }

    Ok(())
}

/// Scratch path next to the destination: `<path>.tmp`
fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".");
    name.push(mesh_output::TEMP_SUFFIX);
    PathBuf::from(name)
}

/// Write a mesh to `path`
///
/// The file only appears at `path` once it has been written completely; on
/// any failure the scratch file is removed and nothing is left at `path`.
pub fn export_mesh_off(mesh: &Mesh, path: &Path) -> ReconstructionResult<()> {
    let scratch = temp_path(path);

    let file = File::create(&scratch).map_err(|e| ReconstructionError::write(path, e))?;
    let mut writer = BufWriter::new(file);

    let written = write_off(mesh, &mut writer).and_then(|()| writer.flush());
    // Close the handle before renaming
    drop(writer);
    let written = written.and_then(|()| std::fs::rename(&scratch, path));

    if let Err(e) = written {
        if let Err(cleanup) = std::fs::remove_file(&scratch) {
            warn!(path = %scratch.display(), error = %cleanup, "Failed to remove partial mesh");
        }
        return Err(ReconstructionError::write(path, e));
    }

    debug!(
        path = %path.display(),
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        "OFF export complete"
    );

    Ok(())
}
