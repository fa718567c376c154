// src/core/thread_pool.rs

use log::{info, warn};

use crate::core::error::{ExplorerError, Result};

/// Builds the global rayon pool used to fan a unit's solves out.
///
/// `None` (or zero) uses every logical core. Fails when the global pool was
/// already built; callers may treat that as a warning.
pub fn configure(threads: Option<usize>) -> Result<usize> {
    let num_threads = threads.filter(|&t| t > 0).unwrap_or_else(num_cpus::get);

    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()
        .map_err(|e| {
            warn!("Rayon pool already configured ({} threads): {}", rayon::current_num_threads(), e);
            ExplorerError::ThreadPool(e.to_string())
        })?;

    info!("Rayon configured with {} threads (total cores: {})", num_threads, num_cpus::get());
    Ok(num_threads)
}
