use crate::output::keyframes::OutputFormat;
use anyhow::Context;
use deshakecore::config::{PipelineConfig, SincConfig, SmoothingStrategy};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    #[serde(flatten)]
    pub pipeline: PipelineConfig,
    pub output_format: OutputFormat,
    /// Accept logs that produce no keyframes instead of failing the import.
    pub allow_empty: bool,
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        config
            .pipeline
            .validate()
            .with_context(|| format!("validating workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(
        smoothing: SmoothingStrategy,
        sinc: SincConfig,
        reset_to_zero_on_new_scene: bool,
        output_format: OutputFormat,
        allow_empty: bool,
    ) -> Self {
        Self {
            pipeline: PipelineConfig {
                reset_to_zero_on_new_scene,
                smoothing,
                sinc,
                ..Default::default()
            },
            output_format,
            allow_empty,
        }
    }

    pub fn to_pipeline_config(&self) -> PipelineConfig {
        self.pipeline
    }
}
