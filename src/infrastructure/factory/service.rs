//! Classification service construction.

use std::sync::Arc;

use super::llm::OpenAiFactory;
use crate::adapter::outbound::dataset::CsvDataset;
use crate::application::classify::ClassifyService;
use crate::infrastructure::config::settings::Config;

/// Wire the CSV dataset adapter and the provider client factory into a
/// [`ClassifyService`].
#[must_use]
pub fn build_classify_service(config: &Config) -> ClassifyService {
    let dataset = Arc::new(CsvDataset::new());
    ClassifyService::new(
        dataset.clone(),
        dataset,
        Arc::new(OpenAiFactory::from_config(config)),
    )
    .with_max_concurrency(config.batch.max_concurrency)
}
