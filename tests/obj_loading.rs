use std::path::{Path, PathBuf};

use glam::Vec3;
use scop::assets::obj::{IndexKind, ObjError, ObjModel, SplitPolicy};
use scop::scene::material::Material;

fn asset(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/assets")
        .join(name)
}

#[test]
fn test_single_triangle() {
    let model = ObjModel::load(asset("triangle.obj")).unwrap();

    assert_eq!(model.objects.len(), 1);
    let object = &model.objects[0];
    assert_eq!(object.name, "triangle");
    assert_eq!(object.vertices.len(), 3);
    assert_eq!(object.submeshes.len(), 1);
    assert_eq!(object.submeshes[0].indices, vec![0, 1, 2]);
    assert!(model.materials.is_empty());
}

#[test]
fn test_quad_with_material() {
    let model = ObjModel::load(asset("quad/quad.obj")).unwrap();

    let submeshes = &model.objects[0].submeshes;
    assert_eq!(submeshes.len(), 1);
    assert_eq!(submeshes[0].material_name.as_deref(), Some("Red"));
    assert_eq!(submeshes[0].triangle_count(), 2);
    assert_eq!(submeshes[0].indices, vec![0, 1, 2, 0, 2, 3]);

    let red = model.material(Some("Red"));
    assert_eq!(red.diffuse, Vec3::new(1.0, 0.0, 0.0));
    assert_eq!(red.diffuse_map, Some(asset("quad/textures/red.png")));
}

#[test]
fn test_material_library_in_other_directory() {
    let model = ObjModel::load(asset("nested/model.obj")).unwrap();

    // the missing library is skipped, the other one still loads
    assert_eq!(model.materials.len(), 1);
    let wood = model.material(Some("Wood"));
    assert_eq!(wood.shininess, 12.0);
    assert_eq!(
        wood.diffuse_map,
        Some(asset("nested/../materials/textures/wood.png"))
    );

    let submeshes = &model.objects[0].submeshes;
    assert_eq!(submeshes.len(), 2);
    assert_eq!(submeshes[1].material_name.as_deref(), Some("Unknown"));
    assert_eq!(model.material(Some("Unknown")), Material::default());
    assert_eq!(model.material(None), Material::default());
}

#[test]
fn test_cube_deduplicates_corners() {
    let model = ObjModel::load(asset("cube.obj")).unwrap();
    let object = &model.objects[0];

    // 8 positions, but every face has its own normal
    assert_eq!(object.vertices.len(), 24);
    assert_eq!(object.index_count(), 36);
    assert_eq!(object.submeshes.len(), 2);
    assert_eq!(object.submeshes[0].material_name.as_deref(), Some("Orange"));
    assert_eq!(object.submeshes[0].triangle_count(), 8);
    assert_eq!(object.submeshes[1].material_name.as_deref(), Some("Grey"));
    assert_eq!(object.submeshes[1].triangle_count(), 4);
    assert_eq!(model.materials.len(), 2);

    for submesh in &object.submeshes {
        assert!(submesh
            .indices
            .iter()
            .all(|&i| (i as usize) < object.vertices.len()));
    }
}

#[test]
fn test_split_policies() {
    let path = asset("two_blocks.obj");

    let single = ObjModel::load_with_policy(&path, SplitPolicy::Material).unwrap();
    assert_eq!(single.objects.len(), 1);
    assert_eq!(single.objects[0].vertices.len(), 10);
    assert_eq!(single.objects[0].index_count(), 12);

    let blocks = ObjModel::load_with_policy(&path, SplitPolicy::VertexBlock).unwrap();
    assert_eq!(blocks.objects.len(), 2);
    assert_eq!(blocks.objects[0].name, "two_blocks");
    assert_eq!(blocks.objects[0].vertices.len(), 3);
    assert_eq!(blocks.objects[0].index_count(), 3);
    assert_eq!(blocks.objects[1].name, "two_blocks.1");
    assert_eq!(blocks.objects[1].vertices.len(), 7);
    assert_eq!(blocks.objects[1].index_count(), 9);
    assert_eq!(blocks.objects[1].vertices[4].position, [0.0, 0.0, 1.0]);
}

#[test]
fn test_negative_indices() {
    let model = ObjModel::load(asset("negative.obj")).unwrap();
    let vertices = &model.objects[0].vertices;

    assert_eq!(vertices[0].position, [0.0, 0.0, 0.0]);
    assert_eq!(vertices[2].position, [2.0, 0.0, 0.0]);
    assert_eq!(vertices[2].tex_coords, [0.25, 0.75]);
    assert_eq!(vertices[2].normal, [0.0, 1.0, 0.0]);
}

#[test]
fn test_negative_indices_follow_the_pools() {
    let model = ObjModel::load(asset("relative_blocks.obj")).unwrap();
    let object = &model.objects[0];

    assert_eq!(object.vertices.len(), 6);
    assert_eq!(object.submeshes[0].indices, vec![0, 1, 2, 3, 4, 5]);
    let second: Vec<_> = object.submeshes[0].indices[3..]
        .iter()
        .map(|&i| object.vertices[i as usize].position)
        .collect();
    assert_eq!(second, vec![[5.0, 5.0, 5.0], [6.0, 5.0, 5.0], [5.0, 6.0, 5.0]]);
}

#[test]
fn test_errors() {
    assert!(matches!(
        ObjModel::load(asset("missing.obj")),
        Err(ObjError::FileNotFound { .. })
    ));
    assert!(matches!(
        ObjModel::load(asset("out_of_range.obj")),
        Err(ObjError::IndexOutOfRange {
            line: 4,
            kind: IndexKind::Position,
            index: 4,
            len: 3
        })
    ));
}

#[test]
fn test_reparsing_is_identical() {
    for name in ["cube.obj", "quad/quad.obj", "two_blocks.obj"] {
        let first = ObjModel::load(asset(name)).unwrap();
        let second = ObjModel::load(asset(name)).unwrap();
        assert_eq!(first.objects, second.objects);
        assert_eq!(first.materials, second.materials);
    }
}
