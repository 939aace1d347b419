//! Resource quantities for quota limits and usage.
//!
//! A [`Quota`] is used both as a limit (what a region grants a user) and
//! as an amount of consumption (baseline usage, per-flavor unit usage,
//! projected totals). All arithmetic saturates; a projection never wraps.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Four non-negative resource counters.
///
/// Field names on the wire follow the region API (`num_vcpus`, `ram_mb`,
/// `volumes_gb`, `num_volumes`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quota {
    #[serde(rename = "num_vcpus", default)]
    pub vcpu_count: u64,
    #[serde(default)]
    pub ram_mb: u64,
    #[serde(default)]
    pub volumes_gb: u64,
    #[serde(rename = "num_volumes", default)]
    pub volume_count: u64,
}

/// One of the four counters of a [`Quota`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Vcpus,
    RamMb,
    VolumesGb,
    Volumes,
}

impl Resource {
    /// All resources in display order.
    pub const ALL: [Resource; 4] = [
        Resource::Vcpus,
        Resource::RamMb,
        Resource::VolumesGb,
        Resource::Volumes,
    ];

    /// Human-readable label used in user-facing messages.
    pub fn label(self) -> &'static str {
        match self {
            Resource::Vcpus => "vCPUs",
            Resource::RamMb => "RAM (MB)",
            Resource::VolumesGb => "Volumes (GB)",
            Resource::Volumes => "Volumes",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Quota {
    /// The all-zero quantity.
    pub const ZERO: Quota = Quota {
        vcpu_count: 0,
        ram_mb: 0,
        volumes_gb: 0,
        volume_count: 0,
    };

    pub fn new(vcpu_count: u64, ram_mb: u64, volumes_gb: u64, volume_count: u64) -> Self {
        Quota {
            vcpu_count,
            ram_mb,
            volumes_gb,
            volume_count,
        }
    }

    /// Reads a single counter.
    pub fn get(&self, resource: Resource) -> u64 {
        match resource {
            Resource::Vcpus => self.vcpu_count,
            Resource::RamMb => self.ram_mb,
            Resource::VolumesGb => self.volumes_gb,
            Resource::Volumes => self.volume_count,
        }
    }

    /// Field-wise saturating sum.
    pub fn saturating_add(self, other: Quota) -> Quota {
        Quota {
            vcpu_count: self.vcpu_count.saturating_add(other.vcpu_count),
            ram_mb: self.ram_mb.saturating_add(other.ram_mb),
            volumes_gb: self.volumes_gb.saturating_add(other.volumes_gb),
            volume_count: self.volume_count.saturating_add(other.volume_count),
        }
    }

    /// Every counter multiplied by `count` (saturating).
    pub fn scaled(self, count: u64) -> Quota {
        Quota {
            vcpu_count: self.vcpu_count.saturating_mul(count),
            ram_mb: self.ram_mb.saturating_mul(count),
            volumes_gb: self.volumes_gb.saturating_mul(count),
            volume_count: self.volume_count.saturating_mul(count),
        }
    }

    /// Headroom left under `limit`, zero where usage already meets or
    /// exceeds it.
    pub fn remaining(self, limit: Quota) -> Quota {
        Quota {
            vcpu_count: limit.vcpu_count.saturating_sub(self.vcpu_count),
            ram_mb: limit.ram_mb.saturating_sub(self.ram_mb),
            volumes_gb: limit.volumes_gb.saturating_sub(self.volumes_gb),
            volume_count: limit.volume_count.saturating_sub(self.volume_count),
        }
    }
}

impl std::iter::Sum for Quota {
    fn sum<I: Iterator<Item = Quota>>(iter: I) -> Quota {
        iter.fold(Quota::ZERO, Quota::saturating_add)
    }
}

/// Quota granted in a region together with what is already consumed there.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionQuota {
    pub quota: Quota,
    pub usage_baseline: Quota,
}
