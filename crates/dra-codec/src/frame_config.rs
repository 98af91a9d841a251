//! 帧配置.
//!
//! 一个编码会话使用固定的帧配置. 当前只支持单声道, 长窗, 单簇的标准帧;
//! 其余组合在 [`FrameConfig::validate`] 中以 `UnsupportedConfiguration`
//! 拒绝, 不会写出任何位.

use std::fmt;

use dra_core::{DraError, DraResult};

use crate::codebook::NUM_QINDEX_CODEBOOKS;
use crate::tables::SAMPLE_RATES;

/// 码本频带数上限 (5 位字段)
pub const MAX_CODEBOOK_BANDS: usize = 31;

/// 帧头类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderType {
    /// 标准帧头 (1 位类型 + 10 位字数)
    #[default]
    Standard,
    /// 扩展帧头 (13 位字数, 更多声道)
    Extended,
}

impl HeaderType {
    /// 帧头类型位
    pub fn bit(self) -> u32 {
        match self {
            Self::Standard => 0,
            Self::Extended => 1,
        }
    }
}

/// 窗类型 (4 位字段)
///
/// 0-8 为长窗及其过渡窗, 9-12 为短窗.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum WindowType {
    #[default]
    LongLong2Long = 0,
    LongLong2Short = 1,
    LongShort2Short = 2,
    LongShort2Long = 3,
    ShortLong2Long = 4,
    ShortLong2Short = 5,
    ShortShort2Long = 6,
    ShortShort2Short = 7,
    LongBrief2Brief = 8,
    ShortShort2ShortS = 9,
    ShortShort2LongS = 10,
    ShortLong2ShortS = 11,
    ShortLong2LongS = 12,
}

impl WindowType {
    /// 从 4 位字段值解析
    pub fn from_index(index: u8) -> DraResult<Self> {
        use WindowType::*;
        const ALL: [WindowType; 13] = [
            LongLong2Long,
            LongLong2Short,
            LongShort2Short,
            LongShort2Long,
            ShortLong2Long,
            ShortLong2Short,
            ShortShort2Long,
            ShortShort2Short,
            LongBrief2Brief,
            ShortShort2ShortS,
            ShortShort2LongS,
            ShortLong2ShortS,
            ShortLong2LongS,
        ];
        ALL.get(index as usize)
            .copied()
            .ok_or_else(|| DraError::InvalidArgument(format!("无效窗类型: {}", index)))
    }

    /// 字段值
    pub fn index(self) -> u8 {
        self as u8
    }

    /// 是否为短窗 (需要多簇帧结构)
    pub fn is_short(self) -> bool {
        self.index() > 8
    }
}

/// 采样率索引 (4 位字段)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleRateIndex(u8);

impl SampleRateIndex {
    /// 由采样率 (Hz) 查找索引
    pub fn from_hz(hz: u32) -> DraResult<Self> {
        SAMPLE_RATES
            .iter()
            .position(|&sr| sr == hz)
            .map(|i| Self(i as u8))
            .ok_or_else(|| DraError::InvalidArgument(format!("不支持的采样率: {} Hz", hz)))
    }

    /// 由索引构造
    pub fn from_index(index: u8) -> DraResult<Self> {
        if (index as usize) < SAMPLE_RATES.len() {
            Ok(Self(index))
        } else {
            Err(DraError::InvalidArgument(format!("无效采样率索引: {}", index)))
        }
    }

    /// 字段值
    pub fn index(self) -> u8 {
        self.0
    }

    /// 采样率 (Hz)
    pub fn hz(self) -> u32 {
        SAMPLE_RATES[self.0 as usize]
    }
}

impl Default for SampleRateIndex {
    fn default() -> Self {
        Self(0)
    }
}

impl fmt::Display for SampleRateIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Hz", self.hz())
    }
}

/// 码本选择策略
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CodebookSelection {
    /// 每个频带试编码, 选用位数最少的码本; 全零频带用码本 0
    #[default]
    Auto,
    /// 调用方为每个码本频带指定码本索引 (0-9)
    Fixed(Vec<u8>),
}

/// 步长索引选择策略
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepSelection {
    /// 所有激活频带使用同一步长索引
    Uniform(u8),
    /// 每个激活频带一个步长索引
    PerBand(Vec<u8>),
    /// 每个激活频带选择使 |量化值| <= max_quantized 的最小步长
    Adaptive { max_quantized: u32 },
}

impl Default for StepSelection {
    fn default() -> Self {
        Self::Uniform(0)
    }
}

/// 簇配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterConfig {
    /// 簇内块数
    pub num_blocks: usize,
    /// 码本频带上边界 (以 4 个频点为单位, 严格递增)
    pub band_edges: Vec<usize>,
    /// 码本选择策略
    pub codebooks: CodebookSelection,
    /// 步长索引选择策略
    pub steps: StepSelection,
}

/// 帧配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameConfig {
    pub header_type: HeaderType,
    pub num_normal_channels: usize,
    pub num_lfe_channels: usize,
    /// 每帧块数 (1, 2, 4, 8)
    pub blocks_per_frame: usize,
    pub sample_rate: SampleRateIndex,
    /// 是否携带辅助数据
    pub aux_data: bool,
    /// 和差编码
    pub use_sum_diff: bool,
    /// 联合强度编码
    pub use_joint_intensity: bool,
    pub window: WindowType,
    pub clusters: Vec<ClusterConfig>,
}

impl FrameConfig {
    /// 单声道标准帧: 1 块/帧, 长窗, 单簇单频带 (256 × 4 = 1024 个频点)
    pub fn mono(sample_rate: SampleRateIndex) -> Self {
        Self {
            header_type: HeaderType::Standard,
            num_normal_channels: 1,
            num_lfe_channels: 0,
            blocks_per_frame: 1,
            sample_rate,
            aux_data: false,
            use_sum_diff: false,
            use_joint_intensity: false,
            window: WindowType::LongLong2Long,
            clusters: vec![ClusterConfig {
                num_blocks: 1,
                band_edges: vec![256],
                codebooks: CodebookSelection::Auto,
                steps: StepSelection::Uniform(0),
            }],
        }
    }

    /// 设置第一个簇的码本频带边界
    pub fn with_band_edges(mut self, band_edges: Vec<usize>) -> Self {
        if let Some(c) = self.clusters.first_mut() {
            c.band_edges = band_edges;
        }
        self
    }

    /// 设置第一个簇的码本选择策略
    pub fn with_codebooks(mut self, codebooks: CodebookSelection) -> Self {
        if let Some(c) = self.clusters.first_mut() {
            c.codebooks = codebooks;
        }
        self
    }

    /// 设置第一个簇的步长索引策略
    pub fn with_steps(mut self, steps: StepSelection) -> Self {
        if let Some(c) = self.clusters.first_mut() {
            c.steps = steps;
        }
        self
    }

    /// 设置窗类型
    pub fn with_window(mut self, window: WindowType) -> Self {
        self.window = window;
        self
    }

    /// 校验配置
    ///
    /// 帧结构支持但尚未实现的组合返回 `UnsupportedConfiguration`,
    /// 不合法的字段值返回 `InvalidArgument`.
    pub fn validate(&self) -> DraResult<()> {
        if self.header_type == HeaderType::Extended {
            return Err(unsupported("扩展帧头"));
        }
        if !matches!(self.blocks_per_frame, 1 | 2 | 4 | 8) {
            return Err(DraError::InvalidArgument(format!(
                "每帧块数必须为 1/2/4/8, 当前为 {}",
                self.blocks_per_frame
            )));
        }
        if !(1..=8).contains(&self.num_normal_channels) {
            return Err(DraError::InvalidArgument(format!(
                "普通声道数必须为 1-8, 当前为 {}",
                self.num_normal_channels
            )));
        }
        if self.num_normal_channels > 1 {
            return Err(unsupported("多声道帧"));
        }
        if self.num_lfe_channels > 1 {
            return Err(DraError::InvalidArgument(format!(
                "LFE 声道数必须为 0 或 1, 当前为 {}",
                self.num_lfe_channels
            )));
        }
        if self.num_lfe_channels > 0 {
            return Err(unsupported("LFE 声道"));
        }
        if self.use_sum_diff {
            return Err(unsupported("和差编码"));
        }
        if self.use_joint_intensity {
            return Err(unsupported("联合强度编码"));
        }
        if self.aux_data {
            return Err(unsupported("辅助数据"));
        }
        if self.window.is_short() {
            return Err(unsupported("短窗"));
        }
        if self.clusters.len() != 1 {
            return Err(unsupported(&format!("{} 个簇", self.clusters.len())));
        }

        let cluster = &self.clusters[0];
        if cluster.num_blocks != 1 {
            return Err(unsupported(&format!("簇内 {} 个块", cluster.num_blocks)));
        }
        validate_band_edges(&cluster.band_edges)?;

        if let CodebookSelection::Fixed(books) = &cluster.codebooks {
            if books.len() != cluster.band_edges.len() {
                return Err(DraError::InvalidArgument(format!(
                    "码本索引个数 {} 与码本频带数 {} 不一致",
                    books.len(),
                    cluster.band_edges.len()
                )));
            }
            if let Some(&b) = books.iter().find(|&&b| b as usize > NUM_QINDEX_CODEBOOKS) {
                return Err(DraError::InvalidArgument(format!("无效码本索引: {}", b)));
            }
        }
        Ok(())
    }

    /// 唯一簇
    pub fn cluster(&self) -> DraResult<&ClusterConfig> {
        self.clusters
            .first()
            .ok_or_else(|| DraError::InvalidArgument("帧配置没有簇".into()))
    }

    /// 每帧系数个数
    pub fn num_bins(&self) -> usize {
        self.clusters
            .iter()
            .map(|c| c.band_edges.last().copied().unwrap_or(0) * 4 * c.num_blocks)
            .sum()
    }
}

fn unsupported(what: &str) -> DraError {
    DraError::UnsupportedConfiguration(format!("暂不支持{}", what))
}

fn validate_band_edges(edges: &[usize]) -> DraResult<()> {
    if edges.is_empty() || edges.len() > MAX_CODEBOOK_BANDS {
        return Err(DraError::InvalidArgument(format!(
            "码本频带数必须为 1-{}, 当前为 {}",
            MAX_CODEBOOK_BANDS,
            edges.len()
        )));
    }
    let mut last = 0usize;
    for &e in edges {
        if e <= last {
            return Err(DraError::InvalidArgument(format!(
                "码本频带边界必须严格递增: {:?}",
                edges
            )));
        }
        last = e;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mono() -> FrameConfig {
        FrameConfig::mono(SampleRateIndex::default())
    }

    #[test]
    fn test_mono_默认配置() {
        let cfg = mono();
        cfg.validate().unwrap();
        assert_eq!(cfg.num_bins(), 1024);
        assert_eq!(cfg.sample_rate.hz(), 8000);
        assert_eq!(cfg.window.index(), 0);
    }

    #[test]
    fn test_采样率索引() {
        assert_eq!(SampleRateIndex::from_hz(48000).unwrap().index(), 8);
        assert_eq!(SampleRateIndex::from_index(12).unwrap().hz(), 192000);
        assert!(SampleRateIndex::from_hz(44000).is_err());
        assert!(SampleRateIndex::from_index(13).is_err());
    }

    #[test]
    fn test_窗类型() {
        assert!(!WindowType::from_index(8).unwrap().is_short());
        assert!(WindowType::from_index(9).unwrap().is_short());
        assert_eq!(WindowType::from_index(12).unwrap(), WindowType::ShortLong2LongS);
        assert!(WindowType::from_index(13).is_err());
    }

    #[test]
    fn test_不支持的配置() {
        let cases = [
            FrameConfig { header_type: HeaderType::Extended, ..mono() },
            FrameConfig { num_normal_channels: 2, ..mono() },
            FrameConfig { num_lfe_channels: 1, ..mono() },
            FrameConfig { use_sum_diff: true, ..mono() },
            FrameConfig { use_joint_intensity: true, ..mono() },
            FrameConfig { aux_data: true, ..mono() },
            mono().with_window(WindowType::ShortShort2ShortS),
            FrameConfig { clusters: vec![mono().clusters[0].clone(); 2], ..mono() },
        ];
        for cfg in &cases {
            assert!(
                matches!(cfg.validate(), Err(DraError::UnsupportedConfiguration(_))),
                "{:?}",
                cfg
            );
        }
    }

    #[test]
    fn test_无效参数() {
        let cases = [
            FrameConfig { blocks_per_frame: 3, ..mono() },
            FrameConfig { num_normal_channels: 0, ..mono() },
            FrameConfig { num_lfe_channels: 2, ..mono() },
            mono().with_band_edges(vec![]),
            mono().with_band_edges(vec![16, 16]),
            mono().with_band_edges((1..=32).collect()),
            mono().with_codebooks(CodebookSelection::Fixed(vec![1, 2])),
            mono().with_codebooks(CodebookSelection::Fixed(vec![10])),
        ];
        for cfg in &cases {
            assert!(
                matches!(cfg.validate(), Err(DraError::InvalidArgument(_))),
                "{:?}",
                cfg
            );
        }
    }

    #[test]
    fn test_多频带配置() {
        let cfg = mono()
            .with_band_edges(vec![8, 64, 128, 256])
            .with_codebooks(CodebookSelection::Fixed(vec![0, 1, 5, 9]))
            .with_steps(StepSelection::Adaptive { max_quantized: 200 });
        cfg.validate().unwrap();
        assert_eq!(cfg.num_bins(), 1024);
        assert_eq!(cfg.cluster().unwrap().band_edges.len(), 4);
    }
}
