//! Host description recorded alongside a sweep.

use serde::Serialize;
use sysinfo::System;

/// Machine the sweep ran on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HostInfo {
    pub cpu_brand: String,
    pub logical_cpus: usize,
    pub total_memory_mib: u64,
}

impl HostInfo {
    /// Probe the current machine.
    #[must_use]
    pub fn collect() -> Self {
        let sys = System::new_all();
        Self {
            cpu_brand: sys
                .cpus()
                .first()
                .map(|cpu| cpu.brand().trim().to_string())
                .unwrap_or_default(),
            logical_cpus: sys.cpus().len(),
            total_memory_mib: sys.total_memory() / (1024 * 1024),
        }
    }

    /// One-line summary for report headers.
    #[must_use]
    pub fn summary(&self) -> String {
        let brand = if self.cpu_brand.is_empty() {
            "unknown CPU"
        } else {
            &self.cpu_brand
        };
        format!(
            "{brand}, {} logical CPUs, {} MiB RAM",
            self.logical_cpus, self.total_memory_mib
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collect_does_not_panic() {
        let host = HostInfo::collect();
        assert!(host.summary().contains("logical CPUs"));
    }

    #[test]
    fn summary_without_brand() {
        let host = HostInfo {
            cpu_brand: String::new(),
            logical_cpus: 8,
            total_memory_mib: 16384,
        };
        assert_eq!(host.summary(), "unknown CPU, 8 logical CPUs, 16384 MiB RAM");
    }
}
