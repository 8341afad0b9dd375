/// Wavefront OBJ text mesh reader and writer.
pub mod obj;
