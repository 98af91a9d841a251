//! DRA Huffman 码本.
//!
//! 码本是只读资源: 进程内构建一次, 被所有帧编码器共享.
//! 码字由码长表按规范 Huffman 规则生成, 解码侧使用运行时构建的二叉树.

use dra_core::bitreader::BitReader;
use dra_core::bitwriter::BitWriter;
use dra_core::{DraError, DraResult};

use crate::tables;

/// 溢出码本的码本索引 (1-based, 与帧内码本索引一致)
pub const OVERFLOW_CODEBOOK: u8 = 9;

/// 量化码本数量 (不含表示全零的索引 0)
pub const NUM_QINDEX_CODEBOOKS: usize = 9;

/// 解码时允许的最长码字
const MAX_CODE_LENGTH: u8 = 32;

// ============================================================
// Huffman 二叉树
// ============================================================

/// Huffman 二叉树 (运行时构建)
#[derive(Debug, Clone)]
struct HuffTree {
    /// 节点数组: 每个节点 = [bit0_child, bit1_child]
    /// 正值: 子节点索引
    /// 负值: 叶子, 解码值 = -(value + 1)
    nodes: Vec<[i32; 2]>,
}

impl HuffTree {
    /// 从 (码字, 码字长度, 叶子值) 表构建二叉树
    fn build(entries: impl Iterator<Item = (u32, u8, i32)>) -> Self {
        let mut nodes = vec![[0i32; 2]];
        for (code, len, value) in entries {
            let leaf = -(value + 1);
            let mut idx = 0usize;
            for bit_pos in (0..len).rev() {
                let bit = ((code >> bit_pos) & 1) as usize;
                if bit_pos == 0 {
                    nodes[idx][bit] = leaf;
                } else if nodes[idx][bit] > 0 {
                    idx = nodes[idx][bit] as usize;
                } else {
                    let new_idx = nodes.len();
                    nodes.push([0; 2]);
                    nodes[idx][bit] = new_idx as i32;
                    idx = new_idx;
                }
            }
        }
        Self { nodes }
    }

    /// 从比特流解码一个符号
    fn decode(&self, br: &mut BitReader) -> DraResult<u32> {
        let mut idx = 0usize;
        for _ in 0..MAX_CODE_LENGTH {
            let bit = br.read_bit()? as usize;
            let child = self.nodes[idx][bit];
            if child < 0 {
                return Ok((-(child + 1)) as u32);
            }
            if child == 0 {
                return Err(DraError::InvalidData("Huffman 树无效节点".into()));
            }
            idx = child as usize;
        }
        Err(DraError::InvalidData(format!(
            "Huffman 码字超过 {} 位",
            MAX_CODE_LENGTH
        )))
    }
}

// ============================================================
// 码本
// ============================================================

/// 码本描述 (静态表 + 元数据)
#[derive(Debug, Clone, Copy)]
pub struct CodebookDesc {
    /// 码本名称 (日志用)
    pub name: &'static str,
    /// 每个符号的码字长度
    pub lengths: &'static [u8],
    /// 维度: 每个符号联合编码的系数个数
    pub dim: usize,
    /// 是否为 mid-tread 码本 (关于 0 对称, 无需符号位)
    pub mid_tread: bool,
    /// 是否为溢出码本 (最大符号作为转义哨兵)
    pub overflow: bool,
}

/// Huffman 码本
#[derive(Debug, Clone)]
pub struct Codebook {
    name: &'static str,
    /// 每个符号的码字
    codes: Vec<u32>,
    /// 每个符号的码字长度
    lengths: Vec<u8>,
    dim: usize,
    /// 每个系数的电平数 (levels^dim == 符号数)
    levels: u32,
    mid_tread: bool,
    /// 溢出哨兵符号
    escape: Option<u32>,
    tree: HuffTree,
}

impl Codebook {
    /// 按规范 Huffman 规则由码长表构建码本
    ///
    /// 码长相同的符号按符号序分配连续码字, 码长增加时左移.
    pub fn from_lengths(desc: &CodebookDesc) -> Self {
        let lengths = desc.lengths.to_vec();
        let mut order: Vec<usize> = (0..lengths.len()).collect();
        order.sort_by_key(|&s| (lengths[s], s));

        let mut codes = vec![0u32; lengths.len()];
        let mut code = 0u32;
        let mut prev_len = lengths[order[0]];
        for (i, &sym) in order.iter().enumerate() {
            let len = lengths[sym];
            if i > 0 {
                code = (code + 1) << (len - prev_len);
            }
            codes[sym] = code;
            prev_len = len;
        }

        let tree = HuffTree::build(
            codes
                .iter()
                .zip(lengths.iter())
                .enumerate()
                .map(|(sym, (&c, &l))| (c, l, sym as i32)),
        );

        let num_codes = lengths.len() as u32;
        Self {
            name: desc.name,
            levels: integer_root(num_codes, desc.dim),
            escape: desc.overflow.then(|| num_codes - 1),
            codes,
            lengths,
            dim: desc.dim,
            mid_tread: desc.mid_tread,
            tree,
        }
    }

    /// 码本名称
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// 可表示的符号数
    pub fn num_codes(&self) -> u32 {
        self.codes.len() as u32
    }

    /// 维度
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// 每个系数的电平数
    pub fn levels(&self) -> u32 {
        self.levels
    }

    /// 是否为 mid-tread 码本
    pub fn is_mid_tread(&self) -> bool {
        self.mid_tread
    }

    /// 溢出哨兵符号 (仅溢出码本)
    pub fn escape_symbol(&self) -> Option<u32> {
        self.escape
    }

    /// 查询符号的 (码字, 码字长度)
    pub fn code(&self, symbol: u32) -> DraResult<(u32, u8)> {
        let i = symbol as usize;
        if i >= self.codes.len() {
            return Err(DraError::InvalidSymbol(format!(
                "码本 {}: 符号 {} 超出范围 0..{}",
                self.name,
                symbol,
                self.codes.len()
            )));
        }
        Ok((self.codes[i], self.lengths[i]))
    }

    /// 写入一个符号的码字
    pub fn encode(&self, bw: &mut BitWriter, symbol: u32) -> DraResult<()> {
        let (code, len) = self.code(symbol)?;
        bw.push(code, u32::from(len))
    }

    /// 从比特流解码一个符号
    pub fn decode(&self, br: &mut BitReader) -> DraResult<u32> {
        self.tree.decode(br)
    }

    /// 将单个系数的电平索引还原为有符号值
    ///
    /// mid-tread 码本减去电平数的一半, 其余码本原样返回幅度.
    pub fn recenter(&self, index: u32) -> i32 {
        if self.mid_tread {
            index as i32 - (self.levels / 2) as i32
        } else {
            index as i32
        }
    }

    /// 将有符号量化值映射为单个系数的电平索引
    ///
    /// 幅度码本只编码绝对值, 符号位由调用方另行写入.
    pub fn level_index(&self, value: i32) -> DraResult<u32> {
        let index = if self.mid_tread {
            i64::from(value) + i64::from(self.levels / 2)
        } else {
            i64::from(value.unsigned_abs())
        };
        if index < 0 || index >= i64::from(self.levels) {
            return Err(DraError::InvalidSymbol(format!(
                "码本 {}: 量化值 {} 超出可表示范围",
                self.name, value
            )));
        }
        Ok(index as u32)
    }

    /// 能否直接 (不经转义) 表示该量化值
    pub fn can_represent(&self, value: i32) -> bool {
        self.level_index(value).is_ok()
    }
}

/// 求 n 的 dim 次整数根 (n 必须是完全幂)
fn integer_root(n: u32, dim: usize) -> u32 {
    let mut root = 1u32;
    while (root as u64).pow(dim as u32) < n as u64 {
        root += 1;
    }
    debug_assert_eq!((root as u64).pow(dim as u32), n as u64);
    root
}

// ============================================================
// 码本集合
// ============================================================

/// 量化码本描述, 顺序与帧内码本索引 1..=9 对应
#[rustfmt::skip]
const QINDEX_DESCS: [CodebookDesc; NUM_QINDEX_CODEBOOKS] = [
    CodebookDesc { name: "qindex1_81x4", lengths: &tables::QINDEX_1_LENGTHS, dim: 4, mid_tread: true, overflow: false },
    CodebookDesc { name: "qindex2_25x2", lengths: &tables::QINDEX_2_LENGTHS, dim: 2, mid_tread: true, overflow: false },
    CodebookDesc { name: "qindex3_81x2", lengths: &tables::QINDEX_3_LENGTHS, dim: 2, mid_tread: true, overflow: false },
    CodebookDesc { name: "qindex4_289x2", lengths: &tables::QINDEX_4_LENGTHS, dim: 2, mid_tread: false, overflow: false },
    CodebookDesc { name: "qindex5_31x1", lengths: &tables::QINDEX_5_LENGTHS, dim: 1, mid_tread: true, overflow: false },
    CodebookDesc { name: "qindex6_63x1", lengths: &tables::QINDEX_6_LENGTHS, dim: 1, mid_tread: true, overflow: false },
    CodebookDesc { name: "qindex7_127x1", lengths: &tables::QINDEX_7_LENGTHS, dim: 1, mid_tread: true, overflow: false },
    CodebookDesc { name: "qindex8_255x1", lengths: &tables::QINDEX_8_LENGTHS, dim: 1, mid_tread: true, overflow: false },
    CodebookDesc { name: "qindex9_256x1", lengths: &tables::QINDEX_9_LENGTHS, dim: 1, mid_tread: false, overflow: true },
];

/// 所有 DRA 码本集合
#[derive(Debug, Clone)]
pub struct CodebookSet {
    /// 游程码本 (码本频带边界)
    pub run_length: Codebook,
    /// 码本索引差分码本
    pub codebook_index: Codebook,
    /// 溢出商位宽码本
    pub quotient_width: Codebook,
    /// 步长索引码本
    pub step_index: Codebook,
    /// 量化码本 1-9 (索引 0 = 码本 1)
    qindex: Vec<Codebook>,
}

impl CodebookSet {
    /// 构建标准码本 (在编码会话开始前调用一次)
    pub fn standard() -> Self {
        fn scalar(name: &'static str, lengths: &'static [u8]) -> Codebook {
            Codebook::from_lengths(&CodebookDesc {
                name,
                lengths,
                dim: 1,
                mid_tread: false,
                overflow: false,
            })
        }

        Self {
            run_length: scalar("run_length_64x1", &tables::RUN_LENGTH_LENGTHS),
            codebook_index: scalar("codebook_index_18x1", &tables::CODEBOOK_INDEX_LENGTHS),
            quotient_width: scalar("quotient_width_16x1", &tables::QUOTIENT_WIDTH_LENGTHS),
            step_index: scalar("step_index_116x1", &tables::STEP_INDEX_LENGTHS),
            qindex: QINDEX_DESCS.iter().map(Codebook::from_lengths).collect(),
        }
    }

    /// 按帧内码本索引取量化码本
    ///
    /// 索引 0 表示频带全零, 返回 `None`.
    pub fn qindex(&self, select: u8) -> DraResult<Option<&Codebook>> {
        match select {
            0 => Ok(None),
            s if (s as usize) <= self.qindex.len() => Ok(Some(&self.qindex[s as usize - 1])),
            s => Err(DraError::InvalidSymbol(format!(
                "码本索引 {} 超出范围 0..={}",
                s,
                self.qindex.len()
            ))),
        }
    }
}
