//! 编码资源.
//!
//! 码本, 步长表和粗分频带边界表在会话开始时构建一次, 之后只读共享.

use dra_core::{DraError, DraResult};

use crate::codebook::CodebookSet;
use crate::tables::{LONG_WINDOW_BAND_EDGES, STEP_SIZES};

/// 编码资源 (只读, 可跨线程共享)
#[derive(Debug, Clone)]
pub struct CodecResources {
    /// 全部码本
    pub codebooks: CodebookSet,
    /// 步长表, 由步长索引查询
    pub step_sizes: Vec<u32>,
    /// 长窗粗分频带边界 (频点)
    pub band_edges: Vec<usize>,
}

impl CodecResources {
    /// 标准资源
    pub fn standard() -> Self {
        Self {
            codebooks: CodebookSet::standard(),
            step_sizes: STEP_SIZES.to_vec(),
            band_edges: LONG_WINDOW_BAND_EDGES.to_vec(),
        }
    }

    /// 替换步长表
    ///
    /// 步长表长度不能超过步长索引码本的符号数.
    pub fn with_step_sizes(mut self, step_sizes: Vec<u32>) -> DraResult<Self> {
        let limit = self.codebooks.step_index.num_codes() as usize;
        if step_sizes.is_empty() || step_sizes.len() > limit {
            return Err(DraError::InvalidArgument(format!(
                "步长表长度 {} 不在 1..={} 范围内",
                step_sizes.len(),
                limit
            )));
        }
        self.step_sizes = step_sizes;
        Ok(self)
    }

    /// 单块帧的频点数 (粗分频带的最后一个边界)
    pub fn num_bins(&self) -> usize {
        self.band_edges.last().copied().unwrap_or(0)
    }
}

impl Default for CodecResources {
    fn default() -> Self {
        Self::standard()
    }
}
