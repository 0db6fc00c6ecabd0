//! Iteration driver for space-colonization growth.

use crate::{
    attractor::{AttractionPoint, AttractorSet},
    config::TreeSettings,
    error::Result,
    influence_buffer::InfluenceBuffer,
    phases,
    tree::TreeSkeleton,
    types::NodeId,
};
use glam::Vec3;
use rand::Rng;
use tracing::{debug, info};

/// Where a growth run stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GrowthStatus {
    Growing,
    /// Every attraction point was reached.
    Exhausted,
    /// No node was influenced or no node could be added; further iterations
    /// would not change anything.
    Stalled,
    /// `max_iterations` was reached.
    IterationCap,
}

impl GrowthStatus {
    pub fn is_finished(self) -> bool {
        self != GrowthStatus::Growing
    }
}

/// What one call to [`Grower::step`] did.
#[derive(Debug)]
pub struct StepReport {
    pub influenced: usize,
    pub new_nodes: Vec<NodeId>,
    pub removed: Vec<AttractionPoint>,
    pub status: GrowthStatus,
}

/// Runs the attraction / growth / kill loop over a [`TreeSkeleton`].
#[derive(Debug)]
pub struct Grower {
    cfg: TreeSettings,
    skeleton: TreeSkeleton,
    acc: InfluenceBuffer,
    iterations: usize,
    status: GrowthStatus,
}

impl Grower {
    /// Creates a grower with a root at `origin` and a crown of random points
    /// centred at `origin + cfg.crown_centre`.
    pub fn new(cfg: TreeSettings, origin: Vec3, rng: &mut impl Rng) -> Result<Self> {
        cfg.validate()?;
        let attractors = AttractorSet::random_in_box(
            origin + cfg.crown_centre,
            cfg.crown_size,
            cfg.attraction_point_count,
            rng,
        );
        Self::from_skeleton(cfg, TreeSkeleton::new(origin, attractors))
    }

    /// Creates a grower over an existing skeleton.
    pub fn from_skeleton(cfg: TreeSettings, skeleton: TreeSkeleton) -> Result<Self> {
        cfg.validate()?;
        let acc = InfluenceBuffer::with_len(skeleton.node_count());
        let mut grower = Self {
            cfg,
            skeleton,
            acc,
            iterations: 0,
            status: GrowthStatus::Growing,
        };
        grower.status = grower.check_limits();
        Ok(grower)
    }

    pub fn skeleton(&self) -> &TreeSkeleton {
        &self.skeleton
    }

    pub fn into_skeleton(self) -> TreeSkeleton {
        self.skeleton
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn status(&self) -> GrowthStatus {
        self.status
    }

    /// Runs one iteration unless growth has already finished.
    pub fn step(&mut self) -> StepReport {
        if self.status.is_finished() {
            return StepReport {
                influenced: 0,
                new_nodes: Vec::new(),
                removed: Vec::new(),
                status: self.status,
            };
        }

        let TreeSkeleton { tree, attractors } = &mut self.skeleton;
        let influenced = phases::attraction_phase(tree, attractors, &self.cfg, &mut self.acc);
        let new_nodes = phases::growth_phase(tree, attractors, &self.acc, &self.cfg);
        let removed = phases::kill_phase(tree, attractors, &self.cfg);
        let remaining = attractors.len();
        self.iterations += 1;

        self.status = if influenced == 0 || new_nodes.is_empty() {
            if remaining == 0 {
                GrowthStatus::Exhausted
            } else {
                GrowthStatus::Stalled
            }
        } else {
            self.check_limits()
        };

        debug!(
            iteration = self.iterations,
            influenced,
            new_nodes = new_nodes.len(),
            removed = removed.len(),
            remaining,
            "growth step"
        );

        StepReport {
            influenced,
            new_nodes,
            removed,
            status: self.status,
        }
    }

    /// Steps until growth finishes.
    pub fn run(&mut self) -> GrowthStatus {
        while !self.status.is_finished() {
            self.step();
        }
        info!(
            status = ?self.status,
            iterations = self.iterations,
            nodes = self.skeleton.node_count(),
            remaining = self.skeleton.attractors.len(),
            "tree growth finished"
        );
        self.status
    }

    fn check_limits(&self) -> GrowthStatus {
        if self.skeleton.attractors.is_empty() {
            GrowthStatus::Exhausted
        } else if self.iterations >= self.cfg.max_iterations {
            GrowthStatus::IterationCap
        } else {
            GrowthStatus::Growing
        }
    }
}

/// Grows a complete tree skeleton rooted at `origin`.
///
/// A skeleton that never grew past its root is still returned; check
/// [`TreeSkeleton::ensure_grown`] before building meshes from it.
pub fn grow(cfg: &TreeSettings, origin: Vec3, rng: &mut impl Rng) -> Result<TreeSkeleton> {
    let mut grower = Grower::new(*cfg, origin, rng)?;
    grower.run();
    Ok(grower.into_skeleton())
}
