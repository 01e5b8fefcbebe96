use std::io::BufRead;
use std::path::Path;

use log::{trace, warn};

use crate::assets::{mtl, utils};

use super::builder::{ObjBuilder, ObjFace, ObjFaceIndex};
use super::{ObjError, ObjResult};

/// Feeds every line of `reader` into `builder`.
///
/// `path` is the location of the model file; `mtllib` statements are resolved against it.
pub(crate) fn parse_lines<R: BufRead>(
    reader: R,
    path: &Path,
    builder: &mut ObjBuilder,
) -> ObjResult<()> {
    for (number, line) in utils::lossy_lines(reader).enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (token, value) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        parse_token(token, value.trim(), number + 1, path, builder)?;
    }

    Ok(())
}

pub(crate) fn parse_token(
    token: &str,
    value: &str,
    line: usize,
    path: &Path,
    builder: &mut ObjBuilder,
) -> ObjResult<()> {
    match token {
        // vertex
        "v" => builder.push_position(parse_vec3(value, token, line)?),
        // texture coordinates
        "vt" => builder.push_tex_coord(parse_tex_coord(value, line)?),
        // vertex normals
        "vn" => builder.push_normal(parse_vec3(value, token, line)?),
        "f" => {
            let face = parse_face(value, line)?;
            builder.push_face(&face, line)?;
        }
        // material libraries, possibly several per statement
        "mtllib" => {
            for library in value.split_whitespace() {
                builder.add_materials(mtl::load(path, library));
            }
        }
        "usemtl" => match value.split_whitespace().next() {
            Some(name) => builder.use_material(name),
            None => warn!(
                "`usemtl` without a name on line {}, keeping the current material",
                line
            ),
        },
        _ => trace!("Ignoring statement `{}` on line {}", token, line),
    };

    Ok(())
}

/// Parses whitespace separated floats
fn parse_numbers(value: &str, line: usize) -> ObjResult<Vec<f32>> {
    value
        .split_whitespace()
        .map(|x| x.parse().map_err(|source| ObjError::ParseFloat { line, source }))
        .collect()
}

fn parse_vec3(value: &str, statement: &str, line: usize) -> ObjResult<[f32; 3]> {
    match parse_numbers(value, line)?[..] {
        [x, y, z, ..] => Ok([x, y, z]),
        _ => Err(ObjError::MissingComponents {
            line,
            statement: statement.into(),
        }),
    }
}

// a missing v component defaults to 0, any w component is dropped
fn parse_tex_coord(value: &str, line: usize) -> ObjResult<[f32; 2]> {
    match parse_numbers(value, line)?[..] {
        [u, v, ..] => Ok([u, v]),
        [u] => Ok([u, 0.0]),
        [] => Err(ObjError::MissingComponents {
            line,
            statement: "vt".into(),
        }),
    }
}

/// Parses the corners of a face, separated by whitespace
pub(crate) fn parse_face(value: &str, line: usize) -> ObjResult<ObjFace> {
    let face_i = value
        .split_whitespace()
        .map(|x| parse_face_index(x, line))
        .collect::<ObjResult<_>>()?;
    Ok(ObjFace { face_i })
}

// parses a single corner; the position index is mandatory
fn parse_face_index(value: &str, line: usize) -> ObjResult<ObjFaceIndex> {
    let triplet = parse_triplet(value, line)?;

    Ok(ObjFaceIndex {
        position: triplet[0].ok_or(ObjError::EmptyReference { line })?,
        tex_coord: triplet[1],
        normal: triplet[2],
    })
}

// parses up to three slash separated, possibly empty, signed indices
fn parse_triplet(value: &str, line: usize) -> ObjResult<[Option<i64>; 3]> {
    let mut ret = [None; 3];

    for (a, b) in ret.iter_mut().zip(value.split('/')) {
        *a = if b.is_empty() {
            None
        } else {
            Some(b.parse().map_err(|source| ObjError::ParseInt { line, source })?)
        }
    }

    Ok(ret)
}
