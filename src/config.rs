//! Engine configuration

use tally_core::store::GrowthPolicy;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Growth policy for the registry and the diagnostic log
    pub growth: GrowthPolicy,
    /// Report the init and teardown lines
    pub banners: bool,
    /// Isolate panicking test bodies instead of letting the panic end the run
    pub catch_panics: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            growth: GrowthPolicy::default(),
            banners: true,
            catch_panics: true,
        }
    }
}

impl EngineConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the growth policy
    pub fn with_growth(mut self, growth: GrowthPolicy) -> Self {
        self.growth = growth;
        self
    }

    /// Enable or disable the init/teardown lines
    pub fn with_banners(mut self, banners: bool) -> Self {
        self.banners = banners;
        self
    }

    /// Enable or disable panic isolation
    pub fn with_catch_panics(mut self, catch_panics: bool) -> Self {
        self.catch_panics = catch_panics;
        self
    }
}
