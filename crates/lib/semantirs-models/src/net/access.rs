use kiddo::{KdTree, SquaredEuclidean};
use log::debug;

use semantirs_core::agent::AgentId;
use semantirs_core::error::ModelError;
use semantirs_core::metrics::Meters;

use crate::device::node::{Point2D, Rsu};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestAccess {
    pub rsu_id: AgentId,
    pub distance: Meters,
}

/// Spatial index over the roadside units, used to find the closest one to a vehicle.
pub struct AccessPoints {
    rsu_ids: Vec<AgentId>,
    tree: KdTree<f64, 2>,
}

impl AccessPoints {
    pub fn new(rsus: &[Rsu]) -> Result<Self, ModelError> {
        if rsus.is_empty() {
            return Err(ModelError::config(
                "field.rsu_count",
                "at least one roadside unit is required",
            ));
        }
        let mut tree: KdTree<f64, 2> = KdTree::default();
        for (idx, rsu) in rsus.iter().enumerate() {
            tree.add(&rsu.position.as_array(), idx as u64);
        }
        debug!("Indexed {} roadside units", rsus.len());
        Ok(Self {
            rsu_ids: rsus.iter().map(|rsu| rsu.id).collect(),
            tree,
        })
    }

    pub fn len(&self) -> usize {
        self.rsu_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rsu_ids.is_empty()
    }

    pub fn nearest(&self, position: &Point2D) -> NearestAccess {
        let neighbour = self
            .tree
            .nearest_one::<SquaredEuclidean>(&position.as_array());
        NearestAccess {
            rsu_id: self.rsu_ids[neighbour.item as usize],
            distance: Meters::new(neighbour.distance.sqrt()),
        }
    }
}
