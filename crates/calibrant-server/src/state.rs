//! Shared application state

use calibrant_core::{Result, Temperature};
use calibrant_model::TextClassifier;
use metrics_exporter_prometheus::PrometheusHandle;
use parking_lot::RwLock;
use std::sync::Arc;

/// Shared application state.
///
/// The calibration temperature is the only mutable piece: handlers snapshot
/// it once at request entry, so an update never affects an in-flight
/// prediction.
#[derive(Clone)]
pub struct AppState {
    /// The loaded classifier (BERT or lexicon fallback)
    pub classifier: Arc<dyn TextClassifier>,

    /// Process-wide default calibration temperature
    temperature: Arc<RwLock<Temperature>>,

    /// Prometheus render handle for the /metrics endpoint
    pub metrics: PrometheusHandle,

    /// Inference device, for /health reporting
    pub device: String,
}

impl AppState {
    pub fn new(
        classifier: Arc<dyn TextClassifier>,
        temperature: Temperature,
        metrics: PrometheusHandle,
        device: impl Into<String>,
    ) -> Self {
        Self {
            classifier,
            temperature: Arc::new(RwLock::new(temperature)),
            metrics,
            device: device.into(),
        }
    }

    /// Snapshot the current temperature
    pub fn temperature(&self) -> Temperature {
        *self.temperature.read()
    }

    /// Update the process-wide temperature. A rejected value leaves the
    /// current setting unchanged.
    pub fn set_temperature(&self, value: f32) -> Result<Temperature> {
        let new = Temperature::new(value)?;
        *self.temperature.write() = new;
        tracing::info!("calibration temperature set to {}", new.get());
        Ok(new)
    }
}
