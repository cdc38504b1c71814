//! A headless scene with prefabs for the feature tiles.
use diorama_gen::catalog::{ZONE_NO_CLUTTER, ZONE_NO_GRASS};
use diorama_gen::scene::memory::{MemoryScene, Prefab, PrefabCollider, PrefabNode};
use diorama_gen::scene::EntityTag;
use glam::Vec3;

fn props(name: &str, children: &[(&str, Vec3)]) -> PrefabNode {
    children.iter().fold(
        PrefabNode::new(name).with_tag(EntityTag::RandomFeatureSet),
        |node, (child, offset)| node.with_child(PrefabNode::new(*child).with_offset(*offset)),
    )
}

fn clearing(radius: f32) -> PrefabCollider {
    PrefabCollider::zone(ZONE_NO_CLUTTER, Vec3::new(0.0, 2.5, 0.0), Vec3::new(radius, 3.0, radius))
}

/// Scene whose feature tiles carry clearings, solid props, highlanders and random
/// prop sets, so every filter and occlusion path is exercised.
pub fn demo_scene() -> MemoryScene {
    MemoryScene::new()
        .with_prefab(
            "Feature Camp",
            Prefab::new()
                .with_collider(clearing(6.0))
                .with_node(PrefabNode::new("Campfire").with_tag(EntityTag::Highlander))
                .with_node(props(
                    "Camp Props",
                    &[
                        ("Log Seat", Vec3::new(2.5, 0.0, 0.0)),
                        ("Log Seat", Vec3::new(-2.5, 0.0, 0.0)),
                        ("Lantern", Vec3::new(0.0, 0.0, 2.5)),
                        ("Bedroll", Vec3::new(3.0, 0.0, 3.0)),
                    ],
                )),
        )
        .with_prefab(
            "Feature Boulder",
            Prefab::new().with_collider(PrefabCollider::solid(
                Vec3::new(0.0, 4.0, 0.0),
                Vec3::new(4.0, 4.0, 3.0),
            )),
        )
        .with_prefab(
            "Feature Stone Ring",
            Prefab::new()
                .with_collider(clearing(5.0))
                .with_node(PrefabNode::new("Standing Stone Altar").with_tag(EntityTag::Highlander))
                .with_node(props(
                    "Fallen Stones",
                    &[
                        ("Fallen Stone", Vec3::new(4.0, 0.0, 1.0)),
                        ("Fallen Stone", Vec3::new(-3.0, 0.0, -2.0)),
                    ],
                )),
        )
        .with_prefab(
            "Feature Logging",
            Prefab::new()
                .with_collider(clearing(5.0))
                .with_collider(PrefabCollider::solid(
                    Vec3::new(2.0, 1.0, 0.0),
                    Vec3::new(3.0, 1.0, 1.0),
                ))
                .with_node(PrefabNode::new("Campfire").with_tag(EntityTag::Highlander))
                .with_node(props(
                    "Log Piles",
                    &[
                        ("Log Pile", Vec3::new(-3.0, 0.0, 2.0)),
                        ("Axe Stump", Vec3::new(-1.0, 0.0, -3.0)),
                    ],
                )),
        )
        .with_prefab(
            "Feature Pond",
            Prefab::new()
                .with_collider(clearing(7.0))
                .with_collider(PrefabCollider::zone(
                    ZONE_NO_GRASS,
                    Vec3::new(0.0, 2.5, 0.0),
                    Vec3::new(6.0, 3.0, 6.0),
                ))
                .with_node(props(
                    "Reeds",
                    &[
                        ("Reed Clump", Vec3::new(6.0, 0.0, 0.0)),
                        ("Reed Clump", Vec3::new(-6.0, 0.0, 1.0)),
                        ("Reed Clump", Vec3::new(0.0, 0.0, 6.0)),
                    ],
                )),
        )
        .with_prefab(
            "Feature Flower Patch",
            Prefab::new().with_collider(clearing(4.0)).with_node(props(
                "Flowers",
                &[
                    ("Flower Bed", Vec3::new(1.0, 0.0, 1.0)),
                    ("Flower Bed", Vec3::new(-1.0, 0.0, -1.0)),
                    ("Beehive", Vec3::new(2.0, 0.0, -2.0)),
                ],
            )),
        )
}
