//! Planning module for defining scatter layers and plans.
use glam::{Vec2, Vec3};
use rand::Rng;

use crate::error::{Error, Result};
use crate::events::EventSink;
use crate::rng::RngStream;
use crate::sampling::PositionSampling;
use crate::scatter::SCATTER_BASE_HEIGHT;
use crate::selection::{pick_uniform, pick_weighted, Weighted};

/// Assets a layer chooses from for each accepted point.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AssetPool {
    /// Every entry equally likely. Repeated entries count once per occurrence.
    Uniform(Vec<String>),
    /// Integer-weighted table scanned in order.
    Weighted(Vec<Weighted<String>>),
}

impl AssetPool {
    pub fn uniform<I, S>(assets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Uniform(assets.into_iter().map(Into::into).collect())
    }

    pub fn weighted<'a, 's: 'a, I>(table: I) -> Self
    where
        I: IntoIterator<Item = &'a Weighted<&'s str>>,
    {
        Self::Weighted(
            table
                .into_iter()
                .map(|e| Weighted::new(e.weight, e.value.to_owned()))
                .collect(),
        )
    }

    /// Consumes exactly one draw. An exhausted weighted table is reported to `sink`.
    pub fn pick(&self, rng: &mut dyn Rng, sink: &mut dyn EventSink) -> Option<&str> {
        match self {
            AssetPool::Uniform(assets) => pick_uniform(assets, rng).map(String::as_str),
            AssetPool::Weighted(table) => pick_weighted(table, rng, sink).map(String::as_str),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            AssetPool::Uniform(assets) => assets.len(),
            AssetPool::Weighted(table) => table.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Closed range a jitter value is drawn from.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JitterRange {
    pub min: f32,
    pub max: f32,
}

impl JitterRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn sample(&self, rng: &mut dyn Rng) -> f32 {
        rng.range_f32(self.min, self.max)
    }

    fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }
}

/// How an object's scale is jittered.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScaleJitter {
    /// One factor on all three axes.
    Uniform(JitterRange),
    /// Height on y, then width on x and z.
    HeightWidth {
        height: JitterRange,
        width: JitterRange,
    },
}

impl ScaleJitter {
    fn sample(&self, rng: &mut dyn Rng) -> Vec3 {
        match self {
            ScaleJitter::Uniform(range) => Vec3::splat(range.sample(rng)),
            ScaleJitter::HeightWidth { height, width } => {
                let h = height.sample(rng);
                let w = width.sample(rng);
                Vec3::new(w, h, w)
            }
        }
    }
}

/// Per-object jitter drawn after the asset: scale, then rotation, then height offset.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransformJitter {
    pub scale: ScaleJitter,
    /// Tilt about x, then about z, in degrees.
    pub tilt: Option<JitterRange>,
    /// Rotation about y in degrees.
    pub yaw: JitterRange,
    /// Added to the point's height.
    pub vertical_offset: Option<JitterRange>,
}

const UNIT_JITTER: JitterRange = JitterRange::new(0.9, 1.1);
const FULL_TURN: JitterRange = JitterRange::new(0.0, 360.0);
const TREE_TILT: JitterRange = JitterRange::new(-4.0, 4.0);

impl TransformJitter {
    /// Tilted, stretched trees sunk into the ground by up to `sink_depth`.
    pub const fn tree(sink_depth: f32) -> Self {
        Self {
            scale: ScaleJitter::HeightWidth {
                height: UNIT_JITTER,
                width: UNIT_JITTER,
            },
            tilt: Some(TREE_TILT),
            yaw: FULL_TURN,
            vertical_offset: Some(JitterRange::new(-sink_depth, 0.0)),
        }
    }

    pub const fn clutter() -> Self {
        Self {
            scale: ScaleJitter::Uniform(UNIT_JITTER),
            tilt: None,
            yaw: FULL_TURN,
            vertical_offset: None,
        }
    }

    pub const fn grass() -> Self {
        Self {
            scale: ScaleJitter::HeightWidth {
                height: UNIT_JITTER,
                width: UNIT_JITTER,
            },
            tilt: None,
            yaw: FULL_TURN,
            vertical_offset: None,
        }
    }

    /// Returns `(position, rotation, scale)` for an object at `position`.
    pub fn sample(&self, position: Vec3, rng: &mut dyn Rng) -> (Vec3, Vec3, Vec3) {
        let scale = self.scale.sample(rng);
        let (tilt_x, tilt_z) = match &self.tilt {
            Some(range) => {
                let x = range.sample(rng);
                let z = range.sample(rng);
                (x, z)
            }
            None => (0.0, 0.0),
        };
        let yaw = self.yaw.sample(rng);
        let offset = self.vertical_offset.map_or(0.0, |range| range.sample(rng));
        (
            position + Vec3::new(0.0, offset, 0.0),
            Vec3::new(tilt_x, yaw, tilt_z),
            scale,
        )
    }

    fn ranges(&self) -> Vec<JitterRange> {
        let mut ranges = match self.scale {
            ScaleJitter::Uniform(range) => vec![range],
            ScaleJitter::HeightWidth { height, width } => vec![height, width],
        };
        ranges.extend(self.tilt);
        ranges.push(self.yaw);
        ranges.extend(self.vertical_offset);
        ranges
    }
}

/// A layer in a scatter plan.
#[non_exhaustive]
pub struct ScatterLayer {
    /// Unique identifier for this layer.
    pub id: String,
    /// Size of the sampled rectangle (width along x, height along z).
    pub extent: Vec2,
    /// World (x, z) of the rectangle's corner.
    pub anchor: Vec2,
    /// Height candidate points are tested at.
    pub base_height: f32,
    /// Sampling strategy to generate candidate positions.
    pub sampling: Box<dyn PositionSampling>,
    pub assets: AssetPool,
    pub jitter: TransformJitter,
    /// Zone whose columns reject candidates, if any.
    pub exclusion_zone: Option<String>,
}

impl ScatterLayer {
    /// Create a new layer with required fields.
    pub fn new(
        id: impl Into<String>,
        extent: Vec2,
        anchor: Vec2,
        sampling: Box<dyn PositionSampling>,
        assets: AssetPool,
        jitter: TransformJitter,
    ) -> Self {
        Self {
            id: id.into(),
            extent,
            anchor,
            base_height: SCATTER_BASE_HEIGHT,
            sampling,
            assets,
            jitter,
            exclusion_zone: None,
        }
    }

    /// Create a new layer with required fields and a concrete sampling strategy.
    pub fn new_with<S: PositionSampling + 'static>(
        id: impl Into<String>,
        extent: Vec2,
        anchor: Vec2,
        sampling: S,
        assets: AssetPool,
        jitter: TransformJitter,
    ) -> Self {
        Self::new(id, extent, anchor, Box::new(sampling), assets, jitter)
    }

    pub fn with_exclusion_zone(mut self, zone: impl Into<String>) -> Self {
        self.exclusion_zone = Some(zone.into());
        self
    }

    pub fn with_base_height(mut self, base_height: f32) -> Self {
        self.base_height = base_height;
        self
    }

    /// World position of a local sample point.
    pub fn world_point(&self, local: Vec2) -> Vec3 {
        Vec3::new(
            local.x + self.anchor.x,
            self.base_height,
            local.y + self.anchor.y,
        )
    }

    /// Validates the layer, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(Error::InvalidConfig("layer id must not be empty".into()));
        }
        if !self.extent.is_finite() || self.extent.x <= 0.0 || self.extent.y <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "layer '{}': extent must be > 0 in both components",
                self.id
            )));
        }
        if !self.anchor.is_finite() || !self.base_height.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "layer '{}': anchor and base height must be finite",
                self.id
            )));
        }
        if self.assets.is_empty() {
            return Err(Error::EmptyTable {
                table: self.id.clone(),
            });
        }
        if let AssetPool::Weighted(table) = &self.assets {
            if table.iter().all(|e| e.weight == 0) {
                return Err(Error::EmptyTable {
                    table: self.id.clone(),
                });
            }
        }
        if !self.jitter.ranges().iter().all(JitterRange::is_valid) {
            return Err(Error::InvalidConfig(format!(
                "layer '{}': jitter ranges must be finite with min <= max",
                self.id
            )));
        }
        Ok(())
    }
}

/// A scatter plan composed of one or more [`ScatterLayer`]s, run in order.
#[derive(Default)]
#[non_exhaustive]
pub struct ScatterPlan {
    pub layers: Vec<ScatterLayer>,
}

impl ScatterPlan {
    /// Create a new empty plan.
    pub fn new() -> Self {
        Self { layers: Vec::new() }
    }

    /// Add a single layer to the plan.
    pub fn with_layer(mut self, layer: ScatterLayer) -> Self {
        self.layers.push(layer);
        self
    }

    /// Add multiple layers to the plan.
    pub fn with_layers(mut self, layers: Vec<ScatterLayer>) -> Self {
        self.layers.extend(layers);
        self
    }

    /// Validates every layer and rejects duplicate ids.
    pub fn validate(&self) -> Result<()> {
        for (i, layer) in self.layers.iter().enumerate() {
            layer.validate()?;
            if self.layers[..i].iter().any(|other| other.id == layer.id) {
                return Err(Error::InvalidConfig(format!(
                    "duplicate layer id '{}'",
                    layer.id
                )));
            }
        }
        Ok(())
    }
}
