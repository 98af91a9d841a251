//! 会话配置文件 (JSON).
//!
//! ```json
//! {
//!   "sample_rate": 48000,
//!   "band_edges": [16, 64, 256],
//!   "codebooks": [1, 5, 9],
//!   "steps": { "mode": "adaptive", "max_quantized": 120 }
//! }
//! ```

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use dra_codec::{CodebookSelection, FrameConfig, SampleRateIndex, StepSelection};

/// 缺省自适应步长的量化值上限
pub const DEFAULT_MAX_QUANTIZED: u32 = 127;

/// 步长策略
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum StepConfig {
    Uniform { index: u8 },
    PerBand { indices: Vec<u8> },
    Adaptive { max_quantized: u32 },
}

/// 会话配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// 采样率 (Hz)
    pub sample_rate: u32,
    /// 码本频带上边界 (以 4 个频点为单位)
    pub band_edges: Vec<usize>,
    /// 每个码本频带的码本索引, 缺省时自动选择
    pub codebooks: Option<Vec<u8>>,
    /// 缺省为自适应步长, 量化值不超过 8 号码本的范围 (|q| <= 127)
    pub steps: StepConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            sample_rate: 8000,
            band_edges: vec![256],
            codebooks: None,
            steps: StepConfig::Adaptive { max_quantized: DEFAULT_MAX_QUANTIZED },
        }
    }
}

impl SessionConfig {
    /// 从 JSON 文件加载
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("读取配置文件失败: {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("解析配置文件失败: {}", path.display()))
    }

    /// 转换为帧配置
    pub fn to_frame_config(&self) -> anyhow::Result<FrameConfig> {
        let sample_rate = SampleRateIndex::from_hz(self.sample_rate)?;
        let codebooks = match &self.codebooks {
            Some(books) => CodebookSelection::Fixed(books.clone()),
            None => CodebookSelection::Auto,
        };
        let steps = match &self.steps {
            StepConfig::Uniform { index } => StepSelection::Uniform(*index),
            StepConfig::PerBand { indices } => StepSelection::PerBand(indices.clone()),
            StepConfig::Adaptive { max_quantized } => StepSelection::Adaptive {
                max_quantized: *max_quantized,
            },
        };

        let config = FrameConfig::mono(sample_rate)
            .with_band_edges(self.band_edges.clone())
            .with_codebooks(codebooks)
            .with_steps(steps);
        config.validate().context("帧配置无效")?;
        Ok(config)
    }
}
