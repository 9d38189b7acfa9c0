//! Node id allocation

use crate::error::{Result, VfsError};
use crate::types::NodeId;

/// Hands out node ids for one build or decode session.
///
/// Ids start at zero and increase by one per node. The id `u32::MAX` is never
/// issued, so a default allocator serves at most 2^32 - 1 nodes.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: u64,
    limit: u64,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdAllocator {
    pub fn new() -> Self {
        IdAllocator {
            next: 0,
            limit: u32::MAX as u64,
        }
    }

    /// Allocator that refuses to issue more than `limit` ids.
    pub fn with_capacity(limit: u32) -> Self {
        IdAllocator {
            next: 0,
            limit: limit as u64,
        }
    }

    pub fn allocate(&mut self) -> Result<NodeId> {
        if self.next >= self.limit {
            return Err(VfsError::CapacityExceeded { limit: self.limit });
        }
        let id = self.next as NodeId;
        self.next += 1;
        Ok(id)
    }

    /// Number of ids issued so far
    pub fn allocated(&self) -> u64 {
        self.next
    }

    pub fn remaining(&self) -> u64 {
        self.limit - self.next
    }
}
