//! Liveness storage configuration
//!
//! Settings that control where behavior graph nodes are paged to and how
//! noisy the allocation diagnostics are. Every field has a sensible default,
//! so most callers use `LivenessConfig::default()` and override one or two
//! values with the `with_*` setters.
//!
//! ```
//! use tla_liveness::LivenessConfig;
//!
//! let config = LivenessConfig::default()
//!     .with_write_buffer_bytes(1 << 20)
//!     .with_overhead_warning_ratio(0.25);
//! assert_eq!(config.write_buffer_bytes, 1 << 20);
//! ```

use std::path::{Path, PathBuf};

/// Default `BufWriter` capacity for node files (64 KiB)
pub const DEFAULT_WRITE_BUFFER_BYTES: usize = 64 * 1024;

/// Default consumed/allocated ratio below which `realign_with` warns
pub const DEFAULT_OVERHEAD_WARNING_RATIO: f64 = 0.5;

/// Configuration for behavior graph storage
#[derive(Debug, Clone, PartialEq)]
pub struct LivenessConfig {
    /// Directory for temporary node files.
    ///
    /// `None` means the system temp directory.
    pub spill_dir: Option<PathBuf>,
    /// Buffer size used when appending node records
    pub write_buffer_bytes: usize,
    /// Threshold for the pre-allocation overhead warning.
    ///
    /// When a node is realigned and fewer than this fraction of the slots
    /// reserved by `allocate` were actually used, a warning is logged.
    pub overhead_warning_ratio: f64,
}

impl Default for LivenessConfig {
    fn default() -> Self {
        Self {
            spill_dir: None,
            write_buffer_bytes: DEFAULT_WRITE_BUFFER_BYTES,
            overhead_warning_ratio: DEFAULT_OVERHEAD_WARNING_RATIO,
        }
    }
}

impl LivenessConfig {
    pub fn with_spill_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.spill_dir = Some(dir.into());
        self
    }

    pub fn with_write_buffer_bytes(mut self, bytes: usize) -> Self {
        self.write_buffer_bytes = bytes;
        self
    }

    pub fn with_overhead_warning_ratio(mut self, ratio: f64) -> Self {
        self.overhead_warning_ratio = ratio;
        self
    }

    /// Directory temporary node files are created in
    pub fn spill_dir(&self) -> PathBuf {
        self.spill_dir
            .as_deref()
            .map(Path::to_path_buf)
            .unwrap_or_else(std::env::temp_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LivenessConfig::default();
        assert_eq!(config.spill_dir, None);
        assert_eq!(config.write_buffer_bytes, DEFAULT_WRITE_BUFFER_BYTES);
        assert_eq!(config.overhead_warning_ratio, 0.5);
        assert_eq!(config.spill_dir(), std::env::temp_dir());
    }

    #[test]
    fn test_setters() {
        let config = LivenessConfig::default()
            .with_spill_dir("/var/tmp/tla")
            .with_write_buffer_bytes(4096)
            .with_overhead_warning_ratio(0.1);
        assert_eq!(config.spill_dir(), PathBuf::from("/var/tmp/tla"));
        assert_eq!(config.write_buffer_bytes, 4096);
        assert_eq!(config.overhead_warning_ratio, 0.1);
    }
}
