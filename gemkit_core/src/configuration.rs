//! Crate wide defaults, read by the builders and by the evidence repairs
use std::sync::{LazyLock, RwLock};

pub static CONFIGURATION: LazyLock<RwLock<Configuration>> =
    LazyLock::new(|| RwLock::new(Configuration::default()));

#[derive(Clone, Debug)]
pub struct Configuration {
    /// Default lower flux bound for new reactions, also used when a reaction is made reversible
    pub lower_bound: f64,
    /// Default upper flux bound for new reactions, also used when a reaction is made reversible
    pub upper_bound: f64,
    /// Default precision used when checking flux outcomes
    pub tolerance: f64,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            lower_bound: -1000.,
            upper_bound: 1000.,
            tolerance: 1e-07,
        }
    }
}

/// Get a copy of the current configuration
///
/// If the lock has been poisoned, the configuration last written is returned.
pub fn current() -> Configuration {
    read_config(&CONFIGURATION)
}

fn read_config(lock: &RwLock<Configuration>) -> Configuration {
    match lock.read() {
        Ok(config) => config.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}
