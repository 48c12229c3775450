use std::sync::Arc;

use tracing::subscriber::SetGlobalDefaultError;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

use crate::layer::TeavetLayer;
use crate::logger::Teavet;

/// Configuration of the `tracing` bridge.
///
/// **Fields**
/// - `min_level`: least severe level persisted to `teavet.log`.
/// - `enable_stdout`: if `true`, a `tracing_subscriber::fmt::Layer` is
///   installed next to [`TeavetLayer`] so events also show up on the
///   console.
#[derive(Clone, Debug)]
pub struct LayerConfig {
    pub min_level: Level,
    pub enable_stdout: bool,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            min_level: Level::WARN,
            enable_stdout: true,
        }
    }
}

/// Install a global `tracing` subscriber whose events are persisted
/// through `logger`.
///
/// **Effects**
///
/// Installs a [`Registry`] combined with [`TeavetLayer`] (and optionally a
/// `fmt` layer) as the global default subscriber. Fails if a global
/// subscriber is already set.
pub fn init_tracing_with_config(
    logger: Arc<Teavet>,
    config: LayerConfig,
) -> Result<(), SetGlobalDefaultError> {
    let layer = TeavetLayer::new(logger, config.min_level);

    // The two subscriber shapes have different types, so each branch
    // installs its own.
    if config.enable_stdout {
        let fmt_layer = tracing_subscriber::fmt::layer();
        let subscriber = Registry::default().with(layer).with(fmt_layer);
        tracing::subscriber::set_global_default(subscriber)
    } else {
        let subscriber = Registry::default().with(layer);
        tracing::subscriber::set_global_default(subscriber)
    }
}

/// [`init_tracing_with_config`] with [`LayerConfig::default`].
pub fn init_tracing(logger: Arc<Teavet>) -> Result<(), SetGlobalDefaultError> {
    init_tracing_with_config(logger, LayerConfig::default())
}
