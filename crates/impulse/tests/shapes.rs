//! World bounds and mass properties of the non-spherical shapes.

use std::f32::consts::FRAC_PI_2;
use std::sync::Arc;

use impulse::{BoundingBox, Mat4, Material, RigidBody, Shape, TriangleMesh, Vec3};

fn assert_bounds(aabb: &BoundingBox, min: Vec3, max: Vec3) {
    println!("bounds {aabb:?}");
    assert!((aabb.min - min).length() < 1e-5, "min {:?} != {min:?}", aabb.min);
    assert!((aabb.max - max).length() < 1e-5, "max {:?} != {max:?}", aabb.max);
}

fn quarter_turn_about_z() -> Mat4 {
    Mat4::rotation(Vec3::Z, FRAC_PI_2)
}

#[test]
fn mesh_bounds_follow_the_transformed_vertices() {
    let triangle = TriangleMesh::new(
        vec![Vec3::ZERO, Vec3::X, Vec3::new(0.0, 2.0, 0.0)],
        vec![0, 1, 2],
    );
    assert_eq!(triangle.triangle_count(), 1);

    let mut body = RigidBody::mesh(triangle, Arc::new(Material::default()))
        .with_position(Vec3::new(2.0, 0.0, 0.0));
    body.set_rotation(&quarter_turn_about_z());

    // (x, y) -> (-y, x), then shifted by +2 along x
    let aabb = body.compute_aabb();
    assert_bounds(&aabb, Vec3::ZERO, Vec3::new(2.0, 1.0, 0.0));
    assert_eq!(*body.aabb(), aabb);
}

#[test]
fn empty_mesh_collapses_to_its_position() {
    let empty = TriangleMesh::new(Vec::new(), Vec::new());
    assert_eq!(empty.triangle_count(), 0);

    let at = Vec3::new(1.0, 2.0, 3.0);
    let mut body = RigidBody::mesh(empty, Arc::new(Material::default())).with_position(at);
    let aabb = body.compute_aabb();
    assert_bounds(&aabb, at, at);
    assert_eq!(aabb.center(), at);
}

#[test]
fn upright_cylinder_bounds() {
    let mut body = RigidBody::cylinder(2.0, 0.5, 16, Arc::new(Material::default()))
        .with_position(Vec3::Y);
    let aabb = body.compute_aabb();
    assert_bounds(&aabb, Vec3::new(-0.5, 0.0, -0.5), Vec3::new(0.5, 2.0, 0.5));
}

#[test]
fn tipped_cylinder_bounds_lie_along_x() {
    let mut body = RigidBody::cylinder(2.0, 0.5, 16, Arc::new(Material::default()))
        .with_position(Vec3::Y);
    body.set_rotation(&quarter_turn_about_z());
    let aabb = body.compute_aabb();
    assert_bounds(&aabb, Vec3::new(-1.0, 0.5, -0.5), Vec3::new(1.0, 1.5, 0.5));
}

#[test]
fn rotated_cuboid_bounds_swap_extents() {
    let mut body = RigidBody::cuboid(Vec3::new(2.0, 0.5, 1.0), Arc::new(Material::default()));
    body.set_rotation(&quarter_turn_about_z());
    let aabb = body.compute_aabb();
    assert_bounds(&aabb, Vec3::new(-0.5, -2.0, -1.0), Vec3::new(0.5, 2.0, 1.0));
}

#[test]
fn cylinder_body_inertia() {
    // r = 1, h = 2, m = 12: Iyy = ½mr² = 6, Ixx = Izz = m/12 · (3r² + h²) = 7
    let body = RigidBody::cylinder(2.0, 1.0, 24, Arc::new(Material::default().with_mass(12.0)));
    let inertia = body.mass_properties().inertia;
    assert!((inertia.m[0][0] - 7.0).abs() < 1e-4);
    assert!((inertia.m[1][1] - 6.0).abs() < 1e-4);
    assert!((inertia.m[2][2] - 7.0).abs() < 1e-4);
    assert!(matches!(body.shape(), Shape::Cylinder { sides: 24, .. }));
    assert_eq!(body.shape().name(), "cylinder");
}
