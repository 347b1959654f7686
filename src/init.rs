use crate::error::LogError;
use crate::layer::FacadeLayer;
use crate::logger::Log;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

/// Configuration of the global `tracing` subscriber installed by
/// [`init_tracing_with_config`].
///
/// **Fields**
/// - `enable_stdout`: if `true`, a `tracing_subscriber::fmt::Layer` is
///   stacked on top of [`FacadeLayer`] and events are also printed to the
///   console.
#[derive(Clone, Debug, Default)]
pub struct BridgeConfig {
    pub enable_stdout: bool,
}

/// Route every `tracing` event in the process through `log`.
///
/// **Parameters**
/// - `log`: facade whose base logger (global prefix, caller annotation and
///   sink) receives the events.
/// - `config`: [`BridgeConfig`] controlling the extra console output.
///
/// **Errors**
/// - [`LogError::SubscriberInit`] if a global subscriber is already set.
pub fn init_tracing_with_config(log: &Log, config: BridgeConfig) -> Result<(), LogError> {
    let layer = FacadeLayer::new(log.writer().clone());

    // The two subscriber stacks have different types.
    let installed = if config.enable_stdout {
        let fmt_layer = tracing_subscriber::fmt::layer();
        let subscriber = Registry::default().with(layer).with(fmt_layer);
        tracing::subscriber::set_global_default(subscriber)
    } else {
        let subscriber = Registry::default().with(layer);
        tracing::subscriber::set_global_default(subscriber)
    };
    installed.map_err(|e| LogError::SubscriberInit(e.to_string()))
}

/// Equivalent to [`init_tracing_with_config`] with
/// [`BridgeConfig::default`]: file output only.
pub fn init_tracing(log: &Log) -> Result<(), LogError> {
    init_tracing_with_config(log, BridgeConfig::default())
}
