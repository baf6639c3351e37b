// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Owning storage for mesh objects, addressed by handle

use super::object::MeshObject;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle to a [`MeshObject`] in an [`ObjectArena`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(usize);

impl ObjectId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Objects are never removed, so handles stay valid for the arena's lifetime
#[derive(Debug, Default)]
pub struct ObjectArena {
    objects: Vec<MeshObject>,
}

impl ObjectArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, object: MeshObject) -> ObjectId {
        self.objects.push(object);
        ObjectId(self.objects.len() - 1)
    }

    pub fn get(&self, id: ObjectId) -> Option<&MeshObject> {
        self.objects.get(id.0)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut MeshObject> {
        self.objects.get_mut(id.0)
    }

    /// Mutable access to two distinct objects at once
    pub fn get_pair_mut(
        &mut self,
        a: ObjectId,
        b: ObjectId,
    ) -> Option<(&mut MeshObject, &mut MeshObject)> {
        let len = self.objects.len();
        if a == b || a.0 >= len || b.0 >= len {
            return None;
        }
        if a.0 < b.0 {
            let (low, high) = self.objects.split_at_mut(b.0);
            Some((&mut low[a.0], &mut high[0]))
        } else {
            let (low, high) = self.objects.split_at_mut(a.0);
            Some((&mut high[0], &mut low[b.0]))
        }
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = ObjectId> {
        (0..self.objects.len()).map(ObjectId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &MeshObject)> {
        self.objects
            .iter()
            .enumerate()
            .map(|(index, object)| (ObjectId(index), object))
    }
}
