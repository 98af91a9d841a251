//! DRA 码本与量化静态表.
//!
//! 码本只保存码字长度, 码字在 [`crate::codebook::Codebook::from_lengths`] 中按
//! 规范 Huffman (canonical) 规则生成, 每张表都满足 Kraft 等式.
//!
//! 量化码本 (QINDEX_1 ~ QINDEX_9) 的维度与取值范围:
//!
//! | 码本 | 维度 | 每系数电平数 | 类型 |
//! |------|------|--------------|------|
//! | 1 | 4 | 3 | mid-tread |
//! | 2 | 2 | 5 | mid-tread |
//! | 3 | 2 | 9 | mid-tread |
//! | 4 | 2 | 17 | 幅度 + 符号位 |
//! | 5 | 1 | 31 | mid-tread |
//! | 6 | 1 | 63 | mid-tread |
//! | 7 | 1 | 127 | mid-tread |
//! | 8 | 1 | 255 | mid-tread |
//! | 9 | 1 | 256 | 幅度 + 符号位, 溢出码本 (哨兵 255) |

// ============================================================
// 码字长度表
// ============================================================

/// 游程码本: 码本频带边界间距 (递归编码), 64 个符号, 最长码字 15 位
#[rustfmt::skip]
pub const RUN_LENGTH_LENGTHS: [u8; 64] = [
    3, 3, 4, 4, 4, 4, 4, 4, 5, 5, 5, 5, 5, 5, 6, 6, 6, 6, 6, 7, 7, 7, 7, 7,
    8, 8, 8, 8, 8, 9, 9, 9, 9, 9, 10, 10, 10, 10, 10, 11, 11, 11, 11, 11, 12, 12, 12, 12,
    12, 12, 13, 13, 13, 13, 13, 14, 14, 14, 14, 15, 15, 15, 15, 5,
];

/// 码本索引差分码本: 差值以 +8/+9 偏移折叠符号, 18 个符号, 最长码字 9 位
#[rustfmt::skip]
pub const CODEBOOK_INDEX_LENGTHS: [u8; 18] = [
    9, 9, 8, 7, 6, 5, 4, 3, 2, 2, 3, 4, 5, 6, 7, 8, 9, 9,
];

/// 商位宽码本: 溢出商位宽 - 1 (差分编码), 16 个符号, 最长码字 9 位
#[rustfmt::skip]
pub const QUOTIENT_WIDTH_LENGTHS: [u8; 16] = [
    2, 3, 4, 5, 6, 7, 7, 9, 9, 8, 7, 6, 5, 4, 3, 2,
];

/// 步长索引码本 (差分编码), 116 个符号, 最长码字 18 位
#[rustfmt::skip]
pub const STEP_INDEX_LENGTHS: [u8; 116] = [
    2, 3, 4, 4, 5, 5, 6, 6, 7, 7, 8, 8, 9, 9, 10, 10, 11, 11, 12, 12, 13, 14, 14, 15,
    15, 16, 16, 17, 17, 18, 18, 18, 18, 18, 18, 18, 18, 18, 18, 18, 18, 18, 18, 18, 18, 18, 18, 18,
    18, 18, 18, 18, 18, 18, 18, 18, 18, 18, 18, 18, 18, 18, 18, 18, 18, 18, 18, 18, 18, 18, 18, 18,
    18, 18, 18, 18, 18, 18, 18, 18, 18, 18, 18, 18, 18, 18, 18, 17, 17, 17, 16, 15, 15, 14, 14, 14,
    13, 12, 12, 11, 11, 10, 10, 9, 9, 8, 8, 7, 7, 6, 6, 5, 5, 4, 4, 3,
];

/// 量化码本 1, 81 个符号, 最长码字 9 位
#[rustfmt::skip]
pub const QINDEX_1_LENGTHS: [u8; 81] = [
    9, 8, 9, 8, 6, 8, 9, 8, 9, 8, 6, 8, 6, 5, 6, 8, 6, 8, 9, 7, 9, 7, 6, 7,
    9, 7, 9, 7, 6, 7, 6, 5, 6, 7, 6, 7, 6, 5, 6, 5, 3, 5, 6, 5, 6, 7, 6, 7,
    6, 5, 6, 7, 6, 7, 9, 7, 9, 7, 6, 7, 9, 7, 9, 7, 6, 7, 6, 5, 6, 7, 6, 7,
    9, 7, 9, 7, 6, 7, 9, 7, 9,
];

/// 量化码本 2, 25 个符号, 最长码字 6 位
#[rustfmt::skip]
pub const QINDEX_2_LENGTHS: [u8; 25] = [
    6, 5, 5, 5, 6, 5, 5, 4, 5, 5, 5, 4, 3, 4, 5, 5, 5, 4, 4, 5, 6, 5, 4, 5,
    6,
];

/// 量化码本 3, 81 个符号, 最长码字 9 位
#[rustfmt::skip]
pub const QINDEX_3_LENGTHS: [u8; 81] = [
    9, 8, 8, 7, 7, 7, 8, 8, 9, 8, 8, 7, 7, 6, 7, 7, 8, 8, 8, 7, 7, 6, 5, 6,
    7, 7, 8, 7, 7, 6, 5, 5, 5, 6, 7, 7, 6, 6, 5, 5, 4, 5, 5, 6, 6, 7, 7, 6,
    5, 5, 5, 6, 7, 7, 8, 7, 6, 6, 5, 6, 6, 7, 8, 8, 8, 7, 7, 6, 7, 7, 8, 8,
    9, 8, 8, 7, 6, 7, 8, 8, 9,
];

/// 量化码本 4, 289 个符号, 最长码字 17 位
#[rustfmt::skip]
pub const QINDEX_4_LENGTHS: [u8; 289] = [
    4, 4, 5, 5, 6, 6, 7, 7, 7, 8, 8, 9, 9, 10, 10, 10, 11, 4, 5, 5, 6, 6, 7, 7,
    7, 8, 8, 9, 9, 9, 10, 10, 11, 11, 5, 5, 6, 6, 7, 7, 7, 8, 8, 9, 9, 9, 10, 10,
    11, 11, 12, 5, 6, 6, 7, 7, 7, 8, 8, 9, 9, 9, 10, 10, 11, 11, 12, 12, 6, 6, 7, 7,
    7, 8, 8, 9, 9, 9, 10, 10, 11, 11, 12, 12, 12, 6, 6, 7, 7, 8, 8, 9, 9, 9, 10, 10,
    11, 11, 12, 12, 12, 13, 6, 7, 7, 8, 8, 9, 9, 9, 10, 10, 11, 11, 12, 12, 12, 13, 13, 7,
    7, 8, 8, 9, 9, 9, 10, 10, 11, 11, 12, 12, 12, 13, 13, 14, 7, 8, 8, 9, 9, 9, 10, 10,
    11, 11, 12, 12, 12, 13, 13, 14, 14, 8, 8, 9, 9, 9, 10, 10, 11, 11, 12, 12, 12, 13, 13, 14,
    14, 15, 8, 9, 9, 9, 10, 10, 11, 11, 12, 12, 12, 13, 13, 14, 14, 15, 15, 9, 9, 9, 10, 10,
    11, 11, 12, 12, 12, 13, 13, 14, 14, 15, 15, 15, 9, 9, 10, 10, 11, 11, 12, 12, 12, 13, 13, 14,
    14, 15, 15, 15, 16, 9, 10, 10, 11, 11, 12, 12, 12, 13, 13, 14, 14, 15, 15, 15, 16, 16, 10, 10,
    11, 11, 12, 12, 12, 13, 13, 14, 14, 14, 15, 15, 16, 16, 17, 10, 11, 11, 12, 12, 12, 13, 13, 14,
    14, 14, 15, 15, 16, 16, 17, 17, 11, 11, 12, 12, 12, 13, 13, 14, 14, 14, 15, 15, 16, 16, 17, 17,
    17,
];

/// 量化码本 5, 31 个符号, 最长码字 8 位
#[rustfmt::skip]
pub const QINDEX_5_LENGTHS: [u8; 31] = [
    8, 8, 7, 7, 7, 6, 6, 6, 5, 5, 5, 5, 4, 4, 4, 3, 3, 4, 4, 4, 5, 5, 5, 6,
    6, 6, 7, 7, 7, 8, 8,
];

/// 量化码本 6, 63 个符号, 最长码字 10 位
#[rustfmt::skip]
pub const QINDEX_6_LENGTHS: [u8; 63] = [
    10, 10, 9, 9, 9, 9, 9, 8, 8, 8, 8, 8, 7, 7, 7, 7, 7, 7, 6, 6, 6, 6, 6, 5,
    5, 5, 5, 5, 5, 4, 4, 4, 4, 4, 5, 5, 5, 5, 5, 5, 6, 6, 6, 6, 6, 7, 7, 7,
    7, 7, 7, 8, 8, 8, 8, 8, 9, 9, 9, 9, 9, 10, 10,
];

/// 量化码本 7, 127 个符号, 最长码字 11 位
#[rustfmt::skip]
pub const QINDEX_7_LENGTHS: [u8; 127] = [
    11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 10, 10, 10, 10, 10, 10, 10, 10, 10, 9, 9, 9, 9, 9,
    9, 9, 9, 9, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 7, 7, 7, 7, 7, 7, 7, 7, 7, 6,
    6, 6, 6, 6, 6, 6, 6, 6, 6, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 6, 6,
    6, 6, 6, 6, 6, 6, 6, 6, 7, 7, 7, 7, 7, 7, 7, 7, 7, 8, 8, 8, 8, 8, 8, 8,
    8, 8, 8, 9, 9, 9, 9, 9, 9, 9, 9, 9, 10, 10, 10, 10, 10, 10, 10, 10, 10, 11, 11, 11,
    11, 11, 11, 11, 11, 11, 11,
];

/// 量化码本 8, 255 个符号, 最长码字 13 位
#[rustfmt::skip]
pub const QINDEX_8_LENGTHS: [u8; 255] = [
    13, 13, 13, 13, 13, 13, 13, 13, 13, 13, 13, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12,
    12, 12, 12, 12, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 10, 10, 10,
    10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9,
    9, 9, 9, 9, 9, 9, 9, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8,
    7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 6, 6, 6, 6, 6, 6, 6, 6,
    6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 7,
    7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 8, 8, 8, 8, 8, 8, 8, 8,
    8, 8, 8, 8, 8, 8, 8, 8, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9,
    9, 9, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 11, 11, 11, 11, 11,
    11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12,
    12, 12, 12, 12, 13, 13, 13, 13, 13, 13, 13, 13, 13, 13, 13,
];

/// 量化码本 9, 256 个符号, 最长码字 12 位
#[rustfmt::skip]
pub const QINDEX_9_LENGTHS: [u8; 256] = [
    6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 7, 7, 7, 7, 7,
    7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7,
    7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 8, 8, 8, 8, 8, 8, 8,
    8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8,
    8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9,
    9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9,
    9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10,
    10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10,
    10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11,
    11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11,
    11, 11, 11, 11, 11, 11, 11, 11, 11, 12, 12, 12, 12, 12, 12, 7,
];

// ============================================================
// 量化步长表 (步长 = round(2^(i/4)))
// ============================================================

/// 量化步长表, 由频带的步长索引选择
#[rustfmt::skip]
pub const STEP_SIZES: [u32; 116] = [
    1, 1, 1, 2, 2, 2, 3, 3, 4, 5,
    6, 7, 8, 10, 11, 13, 16, 19, 23, 27,
    32, 38, 45, 54, 64, 76, 91, 108, 128, 152,
    181, 215, 256, 304, 362, 431, 512, 609, 724, 861,
    1024, 1218, 1448, 1722, 2048, 2435, 2896, 3444, 4096, 4871,
    5793, 6889, 8192, 9742, 11585, 13777, 16384, 19484, 23170, 27554,
    32768, 38968, 46341, 55109, 65536, 77936, 92682, 110218, 131072, 155872,
    185364, 220436, 262144, 311744, 370728, 440872, 524288, 623487, 741455, 881744,
    1048576, 1246974, 1482910, 1763488, 2097152, 2493948, 2965821, 3526975, 4194304, 4987896,
    5931642, 7053950, 8388608, 9975792, 11863283, 14107901, 16777216, 19951585, 23726566, 28215802,
    33554432, 39903169, 47453133, 56431603, 67108864, 79806339, 94906266, 112863206, 134217728, 159612677,
    189812531, 225726413, 268435456, 319225354, 379625062, 451452825,
];

// ============================================================
// 粗分带边界 (长窗, 以频点为单位, 共 1024 个频点)
// ============================================================

/// 长窗量化单元的频带边界, 相邻两项构成一个频带 [edge[b], edge[b + 1])
#[rustfmt::skip]
pub const LONG_WINDOW_BAND_EDGES: [usize; 29] = [
    0, 4, 8, 12, 16, 20, 24, 28, 32, 40,
    48, 56, 64, 80, 96, 112, 128, 160, 192, 224,
    256, 320, 384, 448, 512, 640, 768, 896, 1024,
];

/// 采样率索引表 (Hz), 头部写入 4 位索引
pub const SAMPLE_RATES: [u32; 13] = [
    8000, 11025, 12000, 16000, 22050, 24000, 32000, 44100, 48000, 88200, 96000, 176400, 192000,
];
