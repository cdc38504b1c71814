//! Asset keys the engine may request from a placement sink.
//!
//! Every key handed to [`crate::scene::PlacementSink::place`] comes from one of these
//! tables, so a sink can validate its asset library against [`all_asset_keys`] up front.
use crate::selection::Weighted;

pub const GROUND: &str = "Ground";

pub const RIVER: &str = "River";
pub const RIVER_BANKS: &str = "River Banks";
pub const RIVER_BEND: &str = "River Bend";
pub const RIVER_BEND_BANK: &str = "River Bend Bank";
pub const RIVER_BRIDGE_ARCH: &str = "River Bridge Arch";
pub const RIVER_BRIDGE_STRAIGHT: &str = "River Bridge Straight";
pub const RIVER_SPRING: &str = "River Spring";

pub const RIVER_TILES: [&str; 7] = [
    RIVER,
    RIVER_BANKS,
    RIVER_BEND,
    RIVER_BEND_BANK,
    RIVER_BRIDGE_ARCH,
    RIVER_BRIDGE_STRAIGHT,
    RIVER_SPRING,
];

pub const BRIDGE_TILES: [&str; 2] = [RIVER_BRIDGE_ARCH, RIVER_BRIDGE_STRAIGHT];

/// Feature tiles, each used at most once per generation.
pub const FEATURE_TILES: [&str; 6] = [
    "Feature Camp",
    "Feature Boulder",
    "Feature Stone Ring",
    "Feature Logging",
    "Feature Pond",
    "Feature Flower Patch",
];

pub const MOUNTAINS: [&str; 6] = [
    "Mountain Big 1",
    "Mountain Big 2",
    "Mountain Big 3",
    "Mountain Big 4",
    "Mountain Big 5",
    "Mountain Big 6",
];

pub const TALL_TREES: [&str; 2] = ["Pine Tall 1", "Pine Tall 2"];

/// Shared by the medium and small tree bands. Duplicates skew the draw toward mediums.
pub const MEDIUM_TREES: [&str; 5] = [
    "Pine Medium 1",
    "Pine Medium 2",
    "Pine Medium 1",
    "Pine Medium 2",
    "Pine Small 3",
];

pub const CLUTTER: [Weighted<&str>; 32] = [
    Weighted::new(1, "Stone Large 1"),
    Weighted::new(1, "Stone Large 2"),
    Weighted::new(1, "Stone Large 3"),
    Weighted::new(1, "Stone Large 4"),
    Weighted::new(1, "Stone Large 5"),
    Weighted::new(1, "Stone Large 6"),
    Weighted::new(2, "Stone Flat 1"),
    Weighted::new(2, "Stone Flat 2"),
    Weighted::new(2, "Stone Flat 3"),
    Weighted::new(4, "Stone Small 1"),
    Weighted::new(4, "Stone Small 2"),
    Weighted::new(4, "Stone Small 3"),
    Weighted::new(3, "Stump 1"),
    Weighted::new(3, "Stump 2"),
    Weighted::new(3, "Stump 3"),
    Weighted::new(2, "Mushroom Clump 1"),
    Weighted::new(2, "Mushroom Clump 2"),
    Weighted::new(2, "Mushroom Clump 3"),
    Weighted::new(2, "Mushroom Clump 4"),
    Weighted::new(3, "Flower Clump 1"),
    Weighted::new(3, "Flower Clump 2"),
    Weighted::new(3, "Flower Clump 3"),
    Weighted::new(3, "Flower Clump 4"),
    Weighted::new(3, "Flower Clump 5"),
    Weighted::new(4, "Bush 1"),
    Weighted::new(4, "Bush 2"),
    Weighted::new(4, "Bush 3"),
    Weighted::new(4, "Bush 4"),
    Weighted::new(2, "Bush 5"),
    Weighted::new(2, "Bush 6"),
    Weighted::new(2, "Bush 7"),
    Weighted::new(2, "Bush 8"),
];

pub const GRASS_FILLERS: [&str; 4] = [
    "Grass Filler 1",
    "Grass Filler 2",
    "Grass Filler 3",
    "Grass Filler 4",
];

pub const GRASS_CLUMPS: [&str; 4] = [
    "Grass Clump 1",
    "Grass Clump 2",
    "Grass Clump 3",
    "Grass Clump 4",
];

/// Zone volume name that keeps trees and clutter away.
pub const ZONE_NO_CLUTTER: &str = "No Clutter";
/// Zone volume name that keeps grass away.
pub const ZONE_NO_GRASS: &str = "No Grass";

/// Every distinct asset key, in catalog order.
pub fn all_asset_keys() -> Vec<&'static str> {
    let mut keys: Vec<&'static str> = Vec::new();
    let every = std::iter::once(GROUND)
        .chain(RIVER_TILES)
        .chain(FEATURE_TILES)
        .chain(MOUNTAINS)
        .chain(TALL_TREES)
        .chain(MEDIUM_TREES)
        .chain(CLUTTER.into_iter().map(|entry| entry.value))
        .chain(GRASS_FILLERS)
        .chain(GRASS_CLUMPS);
    for key in every {
        if !keys.contains(&key) {
            keys.push(key);
        }
    }
    keys
}

/// `true` if `key` is something the engine can ask a sink to place.
pub fn is_known_asset(key: &str) -> bool {
    key == GROUND
        || RIVER_TILES.contains(&key)
        || FEATURE_TILES.contains(&key)
        || MOUNTAINS.contains(&key)
        || TALL_TREES.contains(&key)
        || MEDIUM_TREES.contains(&key)
        || CLUTTER.iter().any(|entry| entry.value == key)
        || GRASS_FILLERS.contains(&key)
        || GRASS_CLUMPS.contains(&key)
}
