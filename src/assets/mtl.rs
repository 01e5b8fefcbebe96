//! Parses Wavefront material libraries (`.mtl`).
//!
//! Only the statements the viewer renders are interpreted: `newmtl`, `Ka`, `Kd`, `Ks`, `Ns`
//! and `map_Kd`. Everything else is ignored.

use std::collections::HashMap;
use std::fs;
use std::io::{self, BufRead};
use std::path::Path;

use glam::Vec3;
use log::{debug, info, trace, warn};

use crate::scene::material::Material;

use super::utils;

pub type MaterialMap = HashMap<String, Material>;

/// Loads the library `library` (as written in a `mtllib` statement) next to `model_path`.
///
/// A library that cannot be opened is logged and yields no materials; the model still loads.
pub fn load(model_path: &Path, library: &str) -> MaterialMap {
    let mtl_path = utils::sibling_path(model_path, library);

    let file = match fs::File::open(&mtl_path) {
        Ok(file) => file,
        Err(e) => {
            warn!(
                "Could not open material library `{}`: {}",
                mtl_path.display(),
                e
            );
            return MaterialMap::new();
        }
    };

    info!("Loading material library: {}", mtl_path.display());
    parse(io::BufReader::new(file), &mtl_path)
}

/// Parses material statements from `reader`; `map_Kd` paths are resolved against `mtl_path`.
pub fn parse<R: BufRead>(reader: R, mtl_path: &Path) -> MaterialMap {
    let mut materials = MaterialMap::new();
    let mut current: Option<Material> = None;

    for (number, line) in utils::lossy_lines(reader).enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!(
                    "Stopped reading `{}` at line {}: {}",
                    mtl_path.display(),
                    number + 1,
                    e
                );
                break;
            }
        };

        let mut words = line.split_whitespace();
        let token = match words.next() {
            Some(token) => token,
            None => continue,
        };

        if token == "newmtl" {
            if let Some(material) = current.take() {
                flush(&mut materials, material);
            }
            current = words.next().map(Material::new);
            continue;
        }

        let material = match current.as_mut() {
            Some(material) => material,
            None => {
                trace!("Statement `{}` outside of a material, ignoring", token);
                continue;
            }
        };

        let result = match token {
            "Ka" => parse_color(words).map(|c| material.ambient = c),
            "Kd" => parse_color(words).map(|c| material.diffuse = c),
            "Ks" => parse_color(words).map(|c| material.specular = c),
            "Ns" => parse_float(words.next()).map(|ns| material.shininess = ns),
            "map_Kd" => match words.last() {
                Some(texture) => {
                    material.diffuse_map = Some(utils::sibling_path(mtl_path, texture));
                    Ok(())
                }
                None => Err("missing texture path".into()),
            },
            _ => {
                trace!("Ignoring material statement `{}`", token);
                Ok(())
            }
        };

        if let Err(reason) = result {
            warn!(
                "Skipping `{}` in {}:{}: {}",
                token,
                mtl_path.display(),
                number + 1,
                reason
            );
        }
    }

    if let Some(material) = current {
        flush(&mut materials, material);
    }

    materials
}

fn flush(materials: &mut MaterialMap, material: Material) {
    debug!("Material `{}`: {:?}", material.name, material);
    materials.insert(material.name.clone(), material);
}

fn parse_float(word: Option<&str>) -> Result<f32, String> {
    word.ok_or_else(|| "missing value".to_owned())?
        .parse()
        .map_err(|e| format!("{}", e))
}

fn parse_color<'a>(mut words: impl Iterator<Item = &'a str>) -> Result<Vec3, String> {
    let r = parse_float(words.next())?;
    let g = parse_float(words.next())?;
    let b = parse_float(words.next())?;
    Ok(Vec3::new(r, g, b))
}
