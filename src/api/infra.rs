use crate::config::ScreeningConfig;
use crate::error::AppError;
use crate::screening::{DiagnosticEngine, KnowledgeBase};
use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Loads the configured knowledge base once and wraps it in an engine.
pub(crate) fn build_engine(config: &ScreeningConfig) -> Result<DiagnosticEngine, AppError> {
    let knowledge = KnowledgeBase::load(config.knowledge_base.as_deref())?;
    Ok(DiagnosticEngine::new(Arc::new(knowledge)).with_mode(config.condition_mode))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn deserialize_optional_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}
