// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! STL importer for brush source meshes and decal targets

use crate::geometry::{Mesh, Triangle, Vertex};
use anyhow::{Context, Result};
use nalgebra::{Point3, Vector3};
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;
use tracing::info;

/// Import a binary or ASCII STL file as an indexed mesh with smooth normals
pub fn import_stl(path: impl AsRef<Path>) -> Result<Mesh> {
    let path = path.as_ref();
    let mut file = File::open(path).with_context(|| format!("Failed to open STL file: {:?}", path))?;
    let mesh = read_stl(&mut file).with_context(|| format!("Failed to read STL file: {:?}", path))?;
    info!(
        path = %path.display(),
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        "Imported STL"
    );
    Ok(mesh)
}

/// Read STL data from any seekable source
pub fn read_stl<R: Read + Seek>(reader: &mut R) -> Result<Mesh> {
    let stl = stl_io::read_stl(reader).context("Failed to parse STL data")?;

    let mut mesh = Mesh::with_capacity(stl.vertices.len(), stl.faces.len());
    for vertex in &stl.vertices {
        mesh.add_vertex(Vertex::new(
            Point3::new(vertex[0], vertex[1], vertex[2]),
            Vector3::zeros(),
        ));
    }
    for face in &stl.faces {
        mesh.add_triangle(Triangle::new(face.vertices));
    }

    // STL stores one normal per facet; shared vertices get area-weighted normals
    mesh.recompute_normals();
    Ok(mesh)
}
