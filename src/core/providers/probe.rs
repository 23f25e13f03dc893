//! Host and process statistics read through sysinfo
//!
//! These functions provide real readings when the metrics feature is enabled
//! and zeroed samples otherwise.

#[cfg(feature = "metrics")]
use sysinfo::{ProcessesToUpdate, System};

/// Host-wide memory and per-CPU utilisation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostSample {
    pub total_memory: u64,
    pub free_memory: u64,
    pub cpu_utilization: Vec<f64>,
}

/// Statistics of the current process
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProcessSample {
    pub resident_memory: u64,
    pub virtual_memory: u64,
    pub cpu_percent: f64,
    pub disk_read_bytes: u64,
    pub disk_written_bytes: u64,
    pub run_time_secs: u64,
    pub start_time_secs: u64,
}

#[cfg(feature = "metrics")]
pub struct Probe {
    system: System,
}

#[cfg(feature = "metrics")]
impl Probe {
    pub fn new() -> Self {
        Self {
            system: System::new_all(),
        }
    }

    pub fn cpu_count(&self) -> usize {
        self.system.cpus().len()
    }

    pub fn host(&mut self) -> HostSample {
        self.system.refresh_memory();
        self.system.refresh_cpu_usage();

        HostSample {
            total_memory: self.system.total_memory(),
            free_memory: self.system.free_memory(),
            cpu_utilization: self
                .system
                .cpus()
                .iter()
                .map(|cpu| cpu.cpu_usage() as f64)
                .collect(),
        }
    }

    pub fn process(&mut self) -> ProcessSample {
        let Ok(pid) = sysinfo::get_current_pid() else {
            return ProcessSample::default();
        };

        self.system.refresh_cpu_usage();
        self.system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
        match self.system.process(pid) {
            Some(process) => {
                let disk = process.disk_usage();
                ProcessSample {
                    resident_memory: process.memory(),
                    virtual_memory: process.virtual_memory(),
                    cpu_percent: process.cpu_usage() as f64,
                    disk_read_bytes: disk.total_read_bytes,
                    disk_written_bytes: disk.total_written_bytes,
                    run_time_secs: process.run_time(),
                    start_time_secs: process.start_time(),
                }
            }
            None => ProcessSample::default(),
        }
    }
}

#[cfg(not(feature = "metrics"))]
pub struct Probe;

#[cfg(not(feature = "metrics"))]
impl Probe {
    pub fn new() -> Self {
        Self
    }

    pub fn cpu_count(&self) -> usize {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }

    pub fn host(&mut self) -> HostSample {
        HostSample {
            cpu_utilization: vec![0.0; self.cpu_count()],
            ..HostSample::default()
        }
    }

    pub fn process(&mut self) -> ProcessSample {
        ProcessSample::default()
    }
}

impl Default for Probe {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "metrics")]
    #[test]
    fn test_process_sample_finds_current_process() {
        let sample = Probe::new().process();
        assert!(sample.resident_memory > 0);
        assert!(sample.start_time_secs > 0);
    }

    #[test]
    fn test_host_sample_has_one_entry_per_cpu() {
        let mut probe = Probe::new();
        let sample = probe.host();
        assert_eq!(sample.cpu_utilization.len(), probe.cpu_count());
    }
}
