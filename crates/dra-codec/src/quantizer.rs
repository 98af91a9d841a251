//! 量化单元构建与系数量化.
//!
//! 量化单元把簇的频点范围划分为粗分频带, 每个激活频带对应一个步长索引.
//! 激活频带数由码本频带的最大边界 (按块数向上取整) 决定.

use std::ops::Range;

use dra_core::{DraError, DraResult};

/// 向上取整除法: 返回满足 t >= x / y 的最小整数 t
pub fn ceil_div(x: usize, y: usize) -> DraResult<usize> {
    if y == 0 {
        return Err(DraError::InvalidArgument(format!("ceil_div({}, 0): 除数为 0", x)));
    }
    Ok(x.div_ceil(y))
}

/// 量化单元 (单个簇)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantizationUnit {
    /// 每个激活频带的频点范围
    bands: Vec<Range<usize>>,
    /// 每个激活频带的步长索引
    step_indices: Vec<u8>,
}

impl QuantizationUnit {
    /// 构建量化单元
    ///
    /// - `band_edges`: 粗分频带边界表 (频点)
    /// - `bin0`: 簇的起始频点
    /// - `codebook_edge`: 簇内最后一个码本频带边界 (以 4 个频点为单位)
    /// - `num_blocks`: 簇的块数
    pub fn construct(
        band_edges: &[usize],
        bin0: usize,
        codebook_edge: usize,
        num_blocks: usize,
    ) -> DraResult<Self> {
        let max_bin = ceil_div(codebook_edge * 4, num_blocks)?;

        let mut active = 0usize;
        while active + 1 < band_edges.len() && band_edges[active + 1] <= max_bin {
            active += 1;
        }

        let bands = (0..active)
            .map(|b| bin0 + num_blocks * band_edges[b]..bin0 + num_blocks * band_edges[b + 1])
            .collect();
        Ok(Self {
            bands,
            step_indices: vec![0; active],
        })
    }

    /// 激活频带数
    pub fn active_bands(&self) -> usize {
        self.bands.len()
    }

    /// 激活频带的频点范围
    pub fn bands(&self) -> &[Range<usize>] {
        &self.bands
    }

    /// 激活频带的步长索引
    pub fn step_indices(&self) -> &[u8] {
        &self.step_indices
    }

    /// 设置每个激活频带的步长索引
    pub fn set_step_indices(&mut self, step_indices: Vec<u8>) -> DraResult<()> {
        if step_indices.len() != self.bands.len() {
            return Err(DraError::InvalidArgument(format!(
                "步长索引个数 {} 与激活频带数 {} 不一致",
                step_indices.len(),
                self.bands.len()
            )));
        }
        self.step_indices = step_indices;
        Ok(())
    }
}

/// 查询步长, 索引越界或步长为 0 都是配置错误
pub fn step_size(step_sizes: &[u32], index: u8) -> DraResult<u32> {
    match step_sizes.get(index as usize) {
        Some(&0) => Err(DraError::InvalidStepSize(format!("步长索引 {} 对应步长为 0", index))),
        Some(&s) => Ok(s),
        None => Err(DraError::InvalidStepSize(format!(
            "步长索引 {} 超出步长表范围 0..{}",
            index,
            step_sizes.len()
        ))),
    }
}

/// 量化一帧系数
///
/// 激活频带内 index = trunc(coefficient / step), 其余频点为 0.
pub fn quantize(
    coefficients: &[f64],
    unit: &QuantizationUnit,
    step_sizes: &[u32],
) -> DraResult<Vec<i32>> {
    let mut indices = vec![0i32; coefficients.len()];

    for (band, &step_index) in unit.bands.iter().zip(unit.step_indices.iter()) {
        let step = f64::from(step_size(step_sizes, step_index)?);
        if band.end > coefficients.len() {
            return Err(DraError::InvalidArgument(format!(
                "频带 {:?} 超出系数个数 {}",
                band,
                coefficients.len()
            )));
        }
        for bin in band.clone() {
            indices[bin] = quantize_one(coefficients[bin], step, bin)?;
        }
    }

    Ok(indices)
}

fn quantize_one(coefficient: f64, step: f64, bin: usize) -> DraResult<i32> {
    if !coefficient.is_finite() {
        return Err(DraError::InvalidArgument(format!(
            "频点 {} 的系数 {} 不是有限值",
            bin, coefficient
        )));
    }
    let q = (coefficient / step).trunc();
    if q.abs() > f64::from(i32::MAX) {
        return Err(DraError::InvalidArgument(format!(
            "频点 {} 的量化值 {} 超出 i32 范围",
            bin, q
        )));
    }
    Ok(q as i32)
}

/// 自适应选择步长索引
///
/// 每个激活频带取能使 |index| <= `max_quantized` 的最小步长.
pub fn adaptive_step_indices(
    coefficients: &[f64],
    unit: &QuantizationUnit,
    step_sizes: &[u32],
    max_quantized: u32,
) -> DraResult<Vec<u8>> {
    let limit = f64::from(max_quantized) + 1.0;
    let mut out = Vec::with_capacity(unit.active_bands());

    for band in &unit.bands {
        let peak = coefficients
            .get(band.clone())
            .ok_or_else(|| DraError::InvalidArgument(format!("频带 {:?} 超出系数范围", band)))?
            .iter()
            .map(|c| c.abs())
            .fold(0.0f64, f64::max);

        let index = step_sizes
            .iter()
            .take(usize::from(u8::MAX) + 1)
            .position(|&s| s > 0 && peak / f64::from(s) < limit)
            .ok_or_else(|| {
                DraError::InvalidStepSize(format!("没有步长能把峰值 {} 量化到 {} 以内", peak, max_quantized))
            })?;
        out.push(index as u8);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::{LONG_WINDOW_BAND_EDGES, STEP_SIZES};

    #[test]
    fn test_ceil_div() {
        assert_eq!(ceil_div(1024, 1).unwrap(), 1024);
        assert_eq!(ceil_div(1024, 3).unwrap(), 342);
        assert_eq!(ceil_div(0, 8).unwrap(), 0);
        assert!(matches!(ceil_div(7, 0), Err(DraError::InvalidArgument(_))));
    }

    #[test]
    fn test_单频带_256_激活全部粗分频带() {
        let unit = QuantizationUnit::construct(&LONG_WINDOW_BAND_EDGES, 0, 256, 1).unwrap();
        assert_eq!(unit.active_bands(), LONG_WINDOW_BAND_EDGES.len() - 1);
        assert_eq!(unit.bands()[0], 0..4);
        assert_eq!(unit.bands().last().unwrap(), &(896..1024));
        assert_eq!(unit.step_indices(), vec![0; 28].as_slice());
    }

    #[test]
    fn test_部分频点范围() {
        // 码本边界 50 → 200 个频点, 上边界 <= 200 的粗分频带为前 18 个 (边界 192)
        let unit = QuantizationUnit::construct(&LONG_WINDOW_BAND_EDGES, 0, 50, 1).unwrap();
        assert_eq!(unit.active_bands(), 18);
        assert_eq!(unit.bands().last().unwrap(), &(160..192));
    }

    #[test]
    fn test_块数为_0() {
        let err = QuantizationUnit::construct(&LONG_WINDOW_BAND_EDGES, 0, 256, 0).unwrap_err();
        assert!(matches!(err, DraError::InvalidArgument(_)));
    }

    #[test]
    fn test_quantize_向零截断() {
        let mut unit = QuantizationUnit::construct(&[0, 4, 8], 0, 2, 1).unwrap();
        unit.set_step_indices(vec![0, 8]).unwrap();
        let coeffs = [2.9, -2.9, 0.4, -0.4, 9.0, -9.0, 3.99, 4.0];
        let q = quantize(&coeffs, &unit, &STEP_SIZES).unwrap();
        // 步长 1 和 4
        assert_eq!(q, vec![2, -2, 0, 0, 2, -2, 0, 1]);
    }

    #[test]
    fn test_quantize_零步长() {
        let unit = QuantizationUnit::construct(&[0, 4], 0, 1, 1).unwrap();
        let err = quantize(&[1.0; 4], &unit, &[0, 1]).unwrap_err();
        assert!(matches!(err, DraError::InvalidStepSize(_)));
    }

    #[test]
    fn test_quantize_步长索引越界() {
        let mut unit = QuantizationUnit::construct(&[0, 4], 0, 1, 1).unwrap();
        unit.set_step_indices(vec![200]).unwrap();
        let err = quantize(&[1.0; 4], &unit, &STEP_SIZES).unwrap_err();
        assert!(matches!(err, DraError::InvalidStepSize(_)));
    }

    #[test]
    fn test_quantize_非有限值() {
        let unit = QuantizationUnit::construct(&[0, 4], 0, 1, 1).unwrap();
        let err = quantize(&[1.0, f64::NAN, 0.0, 0.0], &unit, &STEP_SIZES).unwrap_err();
        assert!(matches!(err, DraError::InvalidArgument(_)));
    }

    #[test]
    fn test_步长索引个数不一致() {
        let mut unit = QuantizationUnit::construct(&[0, 4, 8], 0, 2, 1).unwrap();
        assert!(unit.set_step_indices(vec![1]).is_err());
    }

    #[test]
    fn test_自适应步长() {
        let unit = QuantizationUnit::construct(&[0, 4, 8], 0, 2, 1).unwrap();
        let coeffs = [100.0, -3.0, 0.0, 0.0, 0.5, 0.0, 0.0, 0.0];
        let steps = adaptive_step_indices(&coeffs, &unit, &STEP_SIZES, 15).unwrap();
        // 100 / 8 = 12.5 < 16, 100 / 7 = 14.3 < 16, 100 / 6 = 16.7 不满足 → 步长 7 (索引 11)
        assert_eq!(steps, vec![11, 0]);
    }
}
