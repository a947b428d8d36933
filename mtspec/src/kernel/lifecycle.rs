use super::ConfigError;

/// Validated construction of an estimation kernel from its config record.
///
/// Every check on parameters that do not depend on the input data happens
/// here, so a constructed kernel only fails on data-dependent conditions
/// (series length, bin groups).
pub trait KernelLifecycle: Sized {
    /// Plain config record the kernel is built from.
    type Config;

    /// Validate `config` and build the kernel.
    fn try_new(config: Self::Config) -> Result<Self, ConfigError>;
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, KernelLifecycle};
    use crate::signal::demod::{DemodulateConfig, DemodulateKernel};
    use crate::signal::multitaper::{MultitaperConfig, MultitaperKernel};
    use crate::signal::windows::{DpssConfig, DpssKernel};

    fn rejected_arg<K: KernelLifecycle>(config: K::Config) -> &'static str {
        match K::try_new(config) {
            Err(ConfigError::InvalidArgument { arg, .. }) => arg,
            Err(other) => panic!("unexpected error {other:?}"),
            Ok(_) => panic!("config was accepted"),
        }
    }

    #[test]
    fn every_kernel_validates_at_construction() {
        assert_eq!(rejected_arg::<DpssKernel>(DpssConfig { n: 32, nw: 0.0, k: 2 }), "nw");
        assert_eq!(
            rejected_arg::<MultitaperKernel>(MultitaperConfig {
                n: 64,
                dt: -1.0,
                ..MultitaperConfig::default()
            }),
            "dt"
        );
        assert_eq!(
            rejected_arg::<DemodulateKernel>(DemodulateConfig {
                f0: f64::INFINITY,
                ..DemodulateConfig::default()
            }),
            "f0"
        );
    }

    #[test]
    fn valid_configs_build() {
        assert!(DpssKernel::try_new(DpssConfig { n: 32, nw: 2.0, k: 3 }).is_ok());
        assert!(MultitaperKernel::try_new(MultitaperConfig {
            n: 64,
            ..MultitaperConfig::default()
        })
        .is_ok());
        assert!(DemodulateKernel::try_new(DemodulateConfig::default()).is_ok());
    }
}
