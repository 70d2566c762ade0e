// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Exclusive actuator groups
//!
//! A [`Resource`] names a physically exclusive group of actuators such as
//! "drivebase" or "arm". The scheduler guarantees that at most one active
//! task requires a given resource at any instant.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Identifier of an exclusive actuator group
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Resource(pub String);

impl Resource {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Resource {
    fn from(s: &str) -> Self {
        Resource(s.to_string())
    }
}

impl From<String> for Resource {
    fn from(s: String) -> Self {
        Resource(s)
    }
}

/// Ordered set of resources a task requires
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceSet(BTreeSet<Resource>);

impl ResourceSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, resource: Resource) -> bool {
        self.0.insert(resource)
    }

    pub fn contains(&self, resource: &Resource) -> bool {
        self.0.contains(resource)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.0.iter()
    }

    /// Add every resource of `other` to this set
    pub fn extend_from(&mut self, other: &ResourceSet) {
        self.0.extend(other.0.iter().cloned());
    }

    pub fn union(&self, other: &ResourceSet) -> ResourceSet {
        ResourceSet(self.0.union(&other.0).cloned().collect())
    }

    /// Resources present in both sets
    pub fn overlap(&self, other: &ResourceSet) -> ResourceSet {
        ResourceSet(self.0.intersection(&other.0).cloned().collect())
    }

    pub fn intersects(&self, other: &ResourceSet) -> bool {
        self.0.iter().any(|r| other.0.contains(r))
    }

    pub fn is_subset(&self, other: &ResourceSet) -> bool {
        self.0.is_subset(&other.0)
    }
}

impl std::fmt::Display for ResourceSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.0.iter().map(Resource::name).collect();
        write!(f, "{{{}}}", names.join(", "))
    }
}

impl FromIterator<Resource> for ResourceSet {
    fn from_iter<I: IntoIterator<Item = Resource>>(iter: I) -> Self {
        ResourceSet(iter.into_iter().collect())
    }
}

impl From<Resource> for ResourceSet {
    fn from(resource: Resource) -> Self {
        std::iter::once(resource).collect()
    }
}

impl From<&Resource> for ResourceSet {
    fn from(resource: &Resource) -> Self {
        std::iter::once(resource.clone()).collect()
    }
}

impl<const N: usize> From<[Resource; N]> for ResourceSet {
    fn from(resources: [Resource; N]) -> Self {
        resources.into_iter().collect()
    }
}

impl From<Vec<Resource>> for ResourceSet {
    fn from(resources: Vec<Resource>) -> Self {
        resources.into_iter().collect()
    }
}

impl<'a> IntoIterator for &'a ResourceSet {
    type Item = &'a Resource;
    type IntoIter = std::collections::btree_set::Iter<'a, Resource>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
#[path = "resource_tests.rs"]
mod tests;
