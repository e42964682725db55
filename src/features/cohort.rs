//! Ordered peer cohort for one (industry, year) key, target included.

use super::{EntityId, FeatureVector, FEATURE_DIM};
use crate::error::{Result, RiskError};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PeerCohort {
    members: Vec<(EntityId, FeatureVector)>,
}

impl PeerCohort {
    /// Build a cohort, rejecting repeated entity ids.
    pub fn new(members: Vec<(EntityId, FeatureVector)>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(members.len());
        for (id, _) in &members {
            if !seen.insert(id) {
                return Err(RiskError::DuplicateEntity {
                    entity: id.to_string(),
                });
            }
        }
        Ok(Self { members })
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EntityId, &FeatureVector)> {
        self.members.iter().map(|(id, v)| (id, v))
    }

    pub fn ids(&self) -> impl Iterator<Item = &EntityId> {
        self.members.iter().map(|(id, _)| id)
    }

    pub fn get(&self, entity: &EntityId) -> Option<&FeatureVector> {
        self.members.iter().find(|(id, _)| id == entity).map(|(_, v)| v)
    }

    pub fn contains(&self, entity: &EntityId) -> bool {
        self.get(entity).is_some()
    }

    /// Same cohort without `entity`, order preserved.
    pub fn without(&self, entity: &EntityId) -> Self {
        Self {
            members: self
                .members
                .iter()
                .filter(|(id, _)| id != entity)
                .cloned()
                .collect(),
        }
    }

    /// Every member must carry finite ratios.
    pub fn validate(&self) -> Result<()> {
        for (id, v) in &self.members {
            v.validate(id)?;
        }
        Ok(())
    }

    /// Row-per-member feature matrix, shape `[len, FEATURE_DIM]`.
    pub fn to_matrix(&self) -> Array2<f64> {
        let mut m = Array2::zeros((self.members.len(), FEATURE_DIM));
        for (mut row, (_, v)) in m.rows_mut().into_iter().zip(&self.members) {
            for (cell, value) in row.iter_mut().zip(v.to_array()) {
                *cell = value;
            }
        }
        m
    }
}
