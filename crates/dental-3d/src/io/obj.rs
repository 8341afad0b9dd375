use std::io::{BufRead, Write};
use std::path::Path;

use crate::pointcloud::PointCloud;

/// Error types for the OBJ module.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ObjError {
    /// Failed to read or write the OBJ file
    #[error("Failed to read OBJ file")]
    Io(#[from] std::io::Error),

    /// A vertex line without three numeric coordinates
    #[error("Malformed vertex at line {0}")]
    MalformedVertex(usize),

    /// A face line with a missing or non-positive index
    #[error("Malformed face at line {0}")]
    MalformedFace(usize),

    /// Per-vertex labels do not match the vertex count
    #[error("Got {labels} labels for {vertices} vertices")]
    LabelCountMismatch {
        /// Number of vertices.
        vertices: usize,
        /// Number of labels.
        labels: usize,
    },
}

/// A triangle mesh: vertex positions and zero-based face indices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex positions.
    pub vertices: Vec<[f64; 3]>,
    /// Faces as zero-based vertex indices.
    pub faces: Vec<Vec<usize>>,
}

impl Mesh {
    /// Take the vertices as a point cloud, dropping the faces.
    pub fn into_pointcloud(self) -> PointCloud {
        PointCloud::new(self.vertices)
    }
}

fn parse_vertex<'a>(
    mut fields: impl Iterator<Item = &'a str>,
    line_no: usize,
) -> Result<[f64; 3], ObjError> {
    let mut vertex = [0.0; 3];
    for v in vertex.iter_mut() {
        *v = fields
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or(ObjError::MalformedVertex(line_no))?;
    }
    Ok(vertex)
}

fn parse_face<'a>(
    fields: impl Iterator<Item = &'a str>,
    line_no: usize,
) -> Result<Vec<usize>, ObjError> {
    // `f 1/1/1 2/2/2 3/3/3` keeps the position index only
    let face = fields
        .map(|token| {
            token
                .split('/')
                .next()
                .and_then(|s| s.parse::<usize>().ok())
                .and_then(|i| i.checked_sub(1))
                .ok_or(ObjError::MalformedFace(line_no))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if face.is_empty() {
        return Err(ObjError::MalformedFace(line_no));
    }
    Ok(face)
}

/// Parse an OBJ mesh from a reader.
///
/// Only `v` and `f` records are read; any other record is ignored.
pub fn parse_obj<R: BufRead>(reader: R) -> Result<Mesh, ObjError> {
    let mut mesh = Mesh::default();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let mut fields = line.split_whitespace();
        match fields.next() {
            Some("v") => mesh.vertices.push(parse_vertex(fields, i + 1)?),
            Some("f") => mesh.faces.push(parse_face(fields, i + 1)?),
            _ => {}
        }
    }

    Ok(mesh)
}

/// Read an OBJ mesh from a file.
pub fn read_obj(path: impl AsRef<Path>) -> Result<Mesh, ObjError> {
    let file = std::fs::File::open(path)?;
    parse_obj(std::io::BufReader::new(file))
}

/// Read the vertices of an OBJ file as a point cloud.
pub fn read_obj_points(path: impl AsRef<Path>) -> Result<PointCloud, ObjError> {
    Ok(read_obj(path)?.into_pointcloud())
}

/// Write an OBJ mesh to a file.
///
/// When `labels` is given, each vertex line carries a `# label: <n>` comment.
pub fn write_obj(
    path: impl AsRef<Path>,
    mesh: &Mesh,
    labels: Option<&[usize]>,
) -> Result<(), ObjError> {
    if let Some(labels) = labels {
        if labels.len() != mesh.vertices.len() {
            return Err(ObjError::LabelCountMismatch {
                vertices: mesh.vertices.len(),
                labels: labels.len(),
            });
        }
    }

    let file = std::fs::File::create(path)?;
    let mut writer = std::io::BufWriter::new(file);

    for (i, v) in mesh.vertices.iter().enumerate() {
        match labels {
            Some(labels) => writeln!(writer, "v {} {} {} # label: {}", v[0], v[1], v[2], labels[i])?,
            None => writeln!(writer, "v {} {} {}", v[0], v[1], v[2])?,
        }
    }

    for face in &mesh.faces {
        write!(writer, "f")?;
        for idx in face {
            write!(writer, " {}", idx + 1)?;
        }
        writeln!(writer)?;
    }

    writer.flush()?;
    Ok(())
}
