//! DRA 帧编码器.
//!
//! 按固定协议打包一帧:
//! 配置 → 帧头 → {每声道: 窗序列 → 码本 → 量化索引 → 步长索引}
//! → 位填充 → 辅助数据.
//!
//! 帧体先写入帧内写入器, 得到总位数后再写帧头中的字数字段,
//! 最后把帧头和帧体拼接. 任何一步失败都不会影响会话码流.

use log::{debug, trace};

use dra_core::bitwriter::BitWriter;
use dra_core::{DraError, DraResult, WORD_BITS};

use crate::codebook::{Codebook, NUM_QINDEX_CODEBOOKS};
use crate::frame_config::{CodebookSelection, FrameConfig, StepSelection};
use crate::huffman::{DiffCoder, encode_band, encode_recursive};
use crate::quantizer::{QuantizationUnit, adaptive_step_indices, quantize, step_size};
use crate::resources::CodecResources;

/// 标准帧头位数
pub const HEADER_BITS: usize = 22;

/// 标准帧头字数字段 (10 位) 的上限
pub const MAX_FRAME_WORDS: usize = 1023;

/// 一帧的编码结果统计, 用于校验和日志
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameReport {
    /// 实际编码的量化索引 (码本 0 频带已置零)
    pub indices: Vec<i32>,
    /// 合并后的码本频带上边界 (以 4 个频点为单位)
    pub band_edges: Vec<usize>,
    /// 每个码本频带的码本索引
    pub codebooks: Vec<u8>,
    /// 每个激活量化频带的步长索引
    pub step_indices: Vec<u8>,
    /// 帧头 + 帧体的总位数 (不含字对齐填充)
    pub num_bits: usize,
    /// 帧占用的字数 (写入帧头)
    pub num_words: usize,
    /// 被转义的系数个数
    pub escaped: usize,
}

/// 编码完成的一帧
#[derive(Debug, Clone)]
pub struct EncodedFrame {
    /// 帧头 + 帧体, 未做字对齐
    pub writer: BitWriter,
    pub report: FrameReport,
}

/// 帧内状态: 量化单元, 量化索引和码本分配
struct FrameContext {
    unit: QuantizationUnit,
    indices: Vec<i32>,
    band_edges: Vec<usize>,
    codebooks: Vec<u8>,
}

/// 帧编码器
///
/// 持有只读资源和已校验的配置, `encode_frame` 不修改任何共享状态,
/// 可以从多个线程同时调用.
#[derive(Debug, Clone)]
pub struct FrameEncoder<'a> {
    resources: &'a CodecResources,
    config: FrameConfig,
}

impl<'a> FrameEncoder<'a> {
    /// 创建帧编码器, 校验配置与资源是否匹配
    pub fn new(resources: &'a CodecResources, config: FrameConfig) -> DraResult<Self> {
        config.validate()?;

        let num_bins = config.num_bins();
        if num_bins > resources.num_bins() {
            return Err(DraError::InvalidArgument(format!(
                "帧频点数 {} 超过粗分频带范围 {}",
                num_bins,
                resources.num_bins()
            )));
        }

        let encoder = Self { resources, config };
        let unit = encoder.quantization_unit()?;
        match &encoder.config.cluster()?.steps {
            StepSelection::Uniform(index) => {
                step_size(&resources.step_sizes, *index)?;
            }
            StepSelection::PerBand(indices) => {
                if indices.len() != unit.active_bands() {
                    return Err(DraError::InvalidArgument(format!(
                        "步长索引个数 {} 与激活频带数 {} 不一致",
                        indices.len(),
                        unit.active_bands()
                    )));
                }
                for &index in indices {
                    step_size(&resources.step_sizes, index)?;
                }
            }
            StepSelection::Adaptive { .. } => {}
        }

        debug!(
            "帧编码器: {}, {} 个频点, {} 个码本频带, {} 个激活量化频带",
            encoder.config.sample_rate,
            num_bins,
            encoder.config.cluster()?.band_edges.len(),
            unit.active_bands()
        );
        Ok(encoder)
    }

    /// 帧配置
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }

    /// 每帧系数个数
    pub fn num_bins(&self) -> usize {
        self.config.num_bins()
    }

    /// 编码一帧系数
    pub fn encode_frame(&self, coefficients: &[f64]) -> DraResult<EncodedFrame> {
        if coefficients.len() != self.num_bins() {
            return Err(DraError::InvalidArgument(format!(
                "系数个数 {} 与帧频点数 {} 不一致",
                coefficients.len(),
                self.num_bins()
            )));
        }

        let ctx = self.configure(coefficients)?;

        let mut body = BitWriter::with_capacity(self.num_bins() / 8);
        let mut escaped = 0usize;
        for ch in 0..self.config.num_normal_channels {
            trace!("声道 {}: 起始位 {}", ch, body.bits_written());
            self.pack_window_sequence(&mut body)?;
            self.pack_codebooks(&mut body, &ctx)?;
            escaped += self.pack_qindex(&mut body, &ctx)?;
            self.pack_qstep_index(&mut body, &ctx)?;
        }
        // 和差编码, 联合强度和 LFE 声道已在配置校验时拒绝
        self.pack_bit_pad(&mut body);
        self.pack_auxiliary_data(&mut body);

        let num_bits = HEADER_BITS + body.bits_written();
        let num_words = frame_words(num_bits)?;

        let mut writer = BitWriter::with_capacity(num_words);
        self.pack_header(&mut writer, num_words)?;
        writer.append(&body);

        debug!(
            "帧编码完成: {} 位, {} 字, {} 个码本频带, {} 个转义系数",
            num_bits,
            num_words,
            ctx.codebooks.len(),
            escaped
        );

        Ok(EncodedFrame {
            writer,
            report: FrameReport {
                step_indices: ctx.unit.step_indices().to_vec(),
                indices: ctx.indices,
                band_edges: ctx.band_edges,
                codebooks: ctx.codebooks,
                num_bits,
                num_words,
                escaped,
            },
        })
    }

    // ========================================================
    // 配置阶段
    // ========================================================

    fn quantization_unit(&self) -> DraResult<QuantizationUnit> {
        let cluster = self.config.cluster()?;
        let last_edge = cluster.band_edges.last().copied().unwrap_or(0);
        QuantizationUnit::construct(&self.resources.band_edges, 0, last_edge, cluster.num_blocks)
    }

    /// 构建量化单元, 量化系数并为每个码本频带分配码本
    fn configure(&self, coefficients: &[f64]) -> DraResult<FrameContext> {
        let cluster = self.config.cluster()?;
        let step_sizes = &self.resources.step_sizes;

        let mut unit = self.quantization_unit()?;
        let steps = match &cluster.steps {
            StepSelection::Uniform(index) => vec![*index; unit.active_bands()],
            StepSelection::PerBand(indices) => indices.clone(),
            StepSelection::Adaptive { max_quantized } => {
                adaptive_step_indices(coefficients, &unit, step_sizes, *max_quantized)?
            }
        };
        unit.set_step_indices(steps)?;

        let mut indices = quantize(coefficients, &unit, step_sizes)?;

        // 与 pack_qindex 同序推进的商位宽差分状态, 供试编码使用
        let mut quotient_width = DiffCoder::new(&self.resources.codebooks.quotient_width);
        let mut codebooks = Vec::with_capacity(cluster.band_edges.len());
        let mut start = 0usize;
        for (band, &edge) in cluster.band_edges.iter().enumerate() {
            let end = edge * 4;
            let book = match &cluster.codebooks {
                CodebookSelection::Fixed(books) => books[band],
                CodebookSelection::Auto => {
                    let values = &indices[start..end];
                    let select = self.select_codebook(values, &quotient_width)?;
                    if let Some(book) = self.resources.codebooks.qindex(select)? {
                        encode_band(book, &mut BitWriter::new(), values, &mut quotient_width)?;
                    }
                    select
                }
            };
            if book == 0 {
                indices[start..end].fill(0);
            }
            trace!("码本频带 {}: 频点 {}..{}, 码本 {}", band, start, end, book);
            codebooks.push(book);
            start = end;
        }

        let (band_edges, codebooks) = merge_bands(&cluster.band_edges, &codebooks);
        Ok(FrameContext {
            unit,
            indices,
            band_edges,
            codebooks,
        })
    }

    /// 试编码选择位数最少的码本, 全零频带返回 0
    ///
    /// `quotient_width` 为此前各频带留下的商位宽差分状态, 试编码不修改它.
    /// 相邻同码本频带随后会被合并, 合并后的转义位宽可能与试编码不同.
    fn select_codebook(&self, values: &[i32], quotient_width: &DiffCoder) -> DraResult<u8> {
        if values.iter().all(|&v| v == 0) {
            return Ok(0);
        }

        let books = &self.resources.codebooks;
        let mut best: Option<(usize, u8)> = None;
        for select in 1..=NUM_QINDEX_CODEBOOKS as u8 {
            let Some(book) = books.qindex(select)? else {
                continue;
            };
            if book.escape_symbol().is_none() && !values.iter().all(|&v| book.can_represent(v)) {
                continue;
            }
            let Some(cost) = trial_cost(book, quotient_width, values) else {
                continue;
            };
            if best.is_none_or(|(c, _)| cost < c) {
                best = Some((cost, select));
            }
        }

        best.map(|(_, select)| select).ok_or_else(|| {
            DraError::InvalidSymbol("频带量化值超出所有码本的表示范围".into())
        })
    }

    // ========================================================
    // 打包阶段
    // ========================================================

    fn pack_header(&self, bw: &mut BitWriter, num_words: usize) -> DraResult<()> {
        let cfg = &self.config;
        bw.push(cfg.header_type.bit(), 1)?;
        bw.push(num_words as u32, 10)?;
        bw.push(cfg.blocks_per_frame.trailing_zeros(), 2)?;
        bw.push(u32::from(cfg.sample_rate.index()), 4)?;
        bw.push((cfg.num_normal_channels - 1) as u32, 3)?;
        bw.push(cfg.num_lfe_channels as u32, 1)?;
        bw.push(u32::from(cfg.aux_data), 1)?;
        // 多声道时的和差 / 联合强度标志已在配置校验时拒绝
        trace!("帧头: {} 字", num_words);
        Ok(())
    }

    fn pack_window_sequence(&self, bw: &mut BitWriter) -> DraResult<()> {
        // 短窗的簇信息已在配置校验时拒绝
        bw.push(u32::from(self.config.window.index()), 4)
    }

    fn pack_codebooks(&self, bw: &mut BitWriter, ctx: &FrameContext) -> DraResult<()> {
        let books = &self.resources.codebooks;
        let start = bw.bits_written();

        bw.push(ctx.band_edges.len() as u32, 5)?;
        let mut last = 0usize;
        for &edge in &ctx.band_edges {
            encode_recursive(&books.run_length, bw, (edge - last - 1) as u32)?;
            last = edge;
        }

        if let Some((&first, rest)) = ctx.codebooks.split_first() {
            bw.push(u32::from(first), 4)?;
            let mut prev = first;
            for &book in rest {
                books.codebook_index.encode(bw, codebook_diff_symbol(prev, book)?)?;
                prev = book;
            }
        }

        trace!("码本: {} 个频带, {} 位", ctx.band_edges.len(), bw.bits_written() - start);
        Ok(())
    }

    /// 写入量化索引, 返回被转义的系数个数
    fn pack_qindex(&self, bw: &mut BitWriter, ctx: &FrameContext) -> DraResult<usize> {
        let books = &self.resources.codebooks;
        let start_bits = bw.bits_written();

        let mut quotient_width = DiffCoder::new(&books.quotient_width);
        quotient_width.reset();

        let mut escaped = 0usize;
        let mut start = 0usize;
        for (&edge, &select) in ctx.band_edges.iter().zip(ctx.codebooks.iter()) {
            let end = edge * 4;
            if let Some(book) = books.qindex(select)? {
                escaped += encode_band(book, bw, &ctx.indices[start..end], &mut quotient_width)?;
            }
            start = end;
        }

        trace!("量化索引: {} 位", bw.bits_written() - start_bits);
        Ok(escaped)
    }

    fn pack_qstep_index(&self, bw: &mut BitWriter, ctx: &FrameContext) -> DraResult<()> {
        let mut coder = DiffCoder::new(&self.resources.codebooks.step_index);
        coder.reset();
        for &index in ctx.unit.step_indices() {
            coder.encode(bw, u32::from(index))?;
        }
        Ok(())
    }

    /// 位填充 (保留, 不写入任何位)
    fn pack_bit_pad(&self, _bw: &mut BitWriter) {}

    /// 辅助数据 (保留, 不写入任何位)
    fn pack_auxiliary_data(&self, _bw: &mut BitWriter) {}
}

/// 帧总位数对应的字数, 超过帧头字段上限时报错
pub fn frame_words(num_bits: usize) -> DraResult<usize> {
    let words = num_bits.div_ceil(WORD_BITS as usize);
    if words > MAX_FRAME_WORDS {
        return Err(DraError::InvalidArgument(format!(
            "帧长 {} 字超过帧头上限 {} 字",
            words, MAX_FRAME_WORDS
        )));
    }
    Ok(words)
}

/// 相邻码本索引的差分符号: 正差 +8, 负差 +9
pub fn codebook_diff_symbol(prev: u8, current: u8) -> DraResult<u32> {
    let diff = i32::from(current) - i32::from(prev);
    let symbol = match diff {
        d if d > 0 => d + 8,
        d if d < 0 => d + 9,
        _ => {
            return Err(DraError::InvalidSymbol(format!(
                "相邻码本频带使用相同码本 {}",
                current
            )));
        }
    };
    Ok(symbol as u32)
}

/// 合并使用相同码本的相邻频带
fn merge_bands(edges: &[usize], books: &[u8]) -> (Vec<usize>, Vec<u8>) {
    let mut out_edges: Vec<usize> = Vec::with_capacity(edges.len());
    let mut out_books: Vec<u8> = Vec::with_capacity(books.len());
    for (&edge, &book) in edges.iter().zip(books.iter()) {
        match (out_edges.last_mut(), out_books.last()) {
            (Some(last_edge), Some(&last_book)) if last_book == book => *last_edge = edge,
            _ => {
                out_edges.push(edge);
                out_books.push(book);
            }
        }
    }
    (out_edges, out_books)
}

/// 试编码一个频带的位数, 码本无法表示时返回 None
fn trial_cost(book: &Codebook, quotient_width: &DiffCoder, values: &[i32]) -> Option<usize> {
    let mut scratch = BitWriter::new();
    let mut coder = quotient_width.clone();
    encode_band(book, &mut scratch, values, &mut coder).ok()?;
    Some(scratch.bits_written())
}
