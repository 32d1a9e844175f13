//! Layered configuration trait

use crate::Result;

/// Configuration that is resolved from defaults, then environment overrides,
/// then validated.
///
/// File and command-line layers are specific to each binary, so they are
/// applied by the caller between `Default::default()` and `apply_env`, or
/// after `load`.
pub trait ConfigBuilder: Default + Clone {
    /// Overwrite fields from `{prefix}{FIELD}` environment variables.
    ///
    /// Variables that are not set leave the current value untouched.
    fn apply_env(&mut self, prefix: &str) -> Result<()>;

    /// Check ranges and cross-field constraints.
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Defaults overlaid with the environment, validated.
    fn load(prefix: &str) -> Result<Self> {
        let mut config = Self::default();
        config.apply_env(prefix)?;
        config.validate()?;
        Ok(config)
    }

    /// `self` overlaid with the environment, validated.
    fn with_env(mut self, prefix: &str) -> Result<Self> {
        self.apply_env(prefix)?;
        self.validate()?;
        Ok(self)
    }
}
