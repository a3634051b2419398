use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};
use impulse::{CompositeBody, Material, RigidBody, Scene, Vec3};

fn ground() -> RigidBody {
    RigidBody::cuboid(Vec3::new(20.0, 0.5, 20.0), Arc::new(Material::immovable()))
}

fn sphere_pile() -> Scene {
    let mut scene = Scene::new();
    scene.add_body(ground());
    let mat = Arc::new(Material::default());
    for i in 0..64u8 {
        let (x, z) = (f32::from(i % 8), f32::from(i / 8));
        let position = Vec3::new(x - 4.0, 2.0 + x * 0.1, z - 4.0);
        scene.add_body(RigidBody::sphere(0.4, mat.clone()).with_position(position));
    }
    scene
}

fn bench_sphere_pile(c: &mut Criterion) {
    c.bench_function("sphere_pile_60_steps", |b| {
        b.iter(|| {
            let mut scene = sphere_pile();
            scene.run(1.0 / 60.0, 60);
        });
    });
}

fn bench_motor_cart(c: &mut Criterion) {
    c.bench_function("motor_cart_60_steps", |b| {
        b.iter(|| {
            let mat = Arc::new(Material::default());
            let mut scene = Scene::new();
            scene.add_body(ground());
            let mut chassis = CompositeBody::new();
            let deck = RigidBody::cuboid(Vec3::new(1.0, 0.2, 0.5), mat.clone());
            chassis.add_part(deck, Vec3::ZERO, Vec3::ZERO, 0.0);
            let cab = RigidBody::sphere(0.3, mat.clone());
            chassis.add_part(cab, Vec3::new(0.0, 0.5, 0.0), Vec3::ZERO, 0.0);
            let chassis = RigidBody::composite(chassis, mat.clone());
            let body = scene.add_body(chassis.with_position(Vec3::new(0.0, 1.5, 0.0)));
            let axle = Vec3::new(1.2, 1.0, 0.0);
            let wheel = scene.add_body(RigidBody::sphere(0.4, mat).with_position(axle));
            if let Some(hinge) = scene.add_revolute_joint(body, wheel, axle, Vec3::Z) {
                if let Some(j) = scene.joint_mut(hinge).and_then(|j| j.as_revolute_mut()) {
                    j.set_motor(5.0, 20.0);
                }
            }
            scene.run(1.0 / 60.0, 60);
        });
    });
}

criterion_group!(benches, bench_sphere_pile, bench_motor_cart);
criterion_main!(benches);
