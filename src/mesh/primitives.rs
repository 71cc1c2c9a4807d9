//! Primitive mesh builders used by the resource pool.
//!
//! All builders assume validated, finite dimensions; segment counts are
//! clamped to the smallest sensible value.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::Vec3;

use super::MeshData;

/// Push one flat-shaded triangle, flipping winding so the face points away
/// from `inside`.
fn push_flat_triangle(mesh: &mut MeshData, a: Vec3, b: Vec3, c: Vec3, inside: Vec3) {
    let (b, c) = {
        let normal = (b - a).cross(c - a);
        let centroid = (a + b + c) / 3.0;
        if normal.dot(centroid - inside) < 0.0 { (c, b) } else { (b, c) }
    };
    let normal = (b - a).cross(c - a).normalize_or_zero().to_array();
    let base = mesh.positions.len() as u32;
    for p in [a, b, c] {
        mesh.positions.push(p.to_array());
        mesh.normals.push(normal);
    }
    mesh.indices.extend_from_slice(&[base, base + 1, base + 2]);
}

/// Faceted cone with its base ring on y = 0 and apex at y = `height`.
pub fn cone(radius: f32, height: f32, radial_segments: u32) -> MeshData {
    let seg = radial_segments.max(3);
    let mut mesh = MeshData::default();
    let apex = Vec3::new(0.0, height, 0.0);
    let inside = Vec3::new(0.0, height * 0.25, 0.0);

    for i in 0..seg {
        let a0 = i as f32 / seg as f32 * TAU;
        let a1 = (i + 1) as f32 / seg as f32 * TAU;
        let p0 = Vec3::new(radius * a0.cos(), 0.0, radius * a0.sin());
        let p1 = Vec3::new(radius * a1.cos(), 0.0, radius * a1.sin());
        push_flat_triangle(&mut mesh, apex, p0, p1, inside);
        push_flat_triangle(&mut mesh, Vec3::ZERO, p1, p0, apex);
    }
    mesh
}

/// UV sphere centred on the origin.
pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> MeshData {
    let lon = width_segments.max(3);
    let lat = height_segments.max(2);
    let mut mesh = MeshData::default();

    for y in 0..=lat {
        let phi = y as f32 / lat as f32 * PI;
        let (sin_phi, cos_phi) = phi.sin_cos();
        for x in 0..=lon {
            let theta = x as f32 / lon as f32 * TAU;
            let n = Vec3::new(sin_phi * theta.cos(), cos_phi, sin_phi * theta.sin());
            mesh.positions.push((n * radius).to_array());
            mesh.normals.push(n.to_array());
        }
    }

    let row = lon + 1;
    for y in 0..lat {
        for x in 0..lon {
            let i0 = y * row + x;
            let i1 = i0 + 1;
            let i2 = i0 + row;
            let i3 = i2 + 1;
            mesh.indices.extend_from_slice(&[i0, i1, i2, i1, i3, i2]);
        }
    }
    mesh
}

/// Flat grid on the XZ plane centred on the origin, `segments` quads per side.
pub fn grid(width: f32, depth: f32, segments: u32) -> MeshData {
    let seg = segments.max(1);
    let verts = seg + 1;
    let mut mesh = MeshData {
        positions: Vec::with_capacity((verts * verts) as usize),
        normals: Vec::with_capacity((verts * verts) as usize),
        indices: Vec::with_capacity((seg * seg * 6) as usize),
    };

    for row in 0..verts {
        let z = (row as f32 / seg as f32 - 0.5) * depth;
        for col in 0..verts {
            let x = (col as f32 / seg as f32 - 0.5) * width;
            mesh.positions.push([x, 0.0, z]);
            mesh.normals.push([0.0, 1.0, 0.0]);
        }
    }

    for row in 0..seg {
        for col in 0..seg {
            let i0 = row * verts + col;
            let i1 = i0 + 1;
            let i2 = i0 + verts;
            let i3 = i2 + 1;
            mesh.indices.extend_from_slice(&[i0, i2, i1, i1, i2, i3]);
        }
    }
    mesh
}

/// Upper hemisphere viewed from inside (normals point at the centre).
pub fn dome(radius: f32, segments: u32) -> MeshData {
    let lon = segments.max(3);
    let lat = (segments / 2).max(2);
    let mut mesh = MeshData::default();

    for y in 0..=lat {
        // From the zenith (0) down to slightly below the horizon
        let phi = y as f32 / lat as f32 * (FRAC_PI_2 + 0.1);
        let (sin_phi, cos_phi) = phi.sin_cos();
        for x in 0..=lon {
            let theta = x as f32 / lon as f32 * TAU;
            let n = Vec3::new(sin_phi * theta.cos(), cos_phi, sin_phi * theta.sin());
            mesh.positions.push((n * radius).to_array());
            mesh.normals.push((-n).to_array());
        }
    }

    let row = lon + 1;
    for y in 0..lat {
        for x in 0..lon {
            let i0 = y * row + x;
            let i1 = i0 + 1;
            let i2 = i0 + row;
            let i3 = i2 + 1;
            // Reversed winding relative to `sphere`
            mesh.indices.extend_from_slice(&[i0, i2, i1, i1, i2, i3]);
        }
    }
    mesh
}
