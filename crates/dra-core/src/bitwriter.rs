//! 比特流写入器.
//!
//! 按位累积定宽整数字段, 输出按 32 位字对齐的字序列, 是帧打包器的基础设施.
//!
//! 按大端位序写入 (MSB first), 与 BitReader 对应.

use crate::{DraError, DraResult, WORD_BITS};

/// 比特流写入器
///
/// 向 32 位字序列按位写入数据, 使用大端位序 (MSB first).
/// 累加器中未满一个字的位数始终小于 32.
///
/// # 示例
/// ```
/// use dra_core::bitwriter::BitWriter;
///
/// let mut bw = BitWriter::new();
/// bw.push(0b1011, 4).unwrap();
/// bw.push(0xFFFF_FFFF, 4).unwrap(); // 只写入低 4 位
/// let words = bw.finish();
/// assert_eq!(words, vec![0b1011_1111 << 24]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitWriter {
    /// 已完成的字
    words: Vec<u32>,
    /// 累加器 (正在填充的字, 右对齐)
    acc: u32,
    /// 累加器中已填充的位数 (0-31)
    pending: u32,
}

impl BitWriter {
    /// 创建新的比特流写入器
    pub fn new() -> Self {
        Self::default()
    }

    /// 以指定字容量创建比特流写入器
    pub fn with_capacity(words: usize) -> Self {
        Self {
            words: Vec::with_capacity(words),
            acc: 0,
            pending: 0,
        }
    }

    /// 获取已写入的总位数
    pub fn bits_written(&self) -> usize {
        self.words.len() * WORD_BITS as usize + self.pending as usize
    }

    /// 写入 `value` 的低 `width` 位 (最多 32 位)
    ///
    /// 高于 `width` 的位被忽略. 跨字边界的字段拆分到当前字和下一个字.
    pub fn push(&mut self, value: u32, width: u32) -> DraResult<()> {
        if width > WORD_BITS {
            return Err(DraError::InvalidArgument(format!(
                "push: width={} 超过字宽 {} 位",
                width, WORD_BITS,
            )));
        }
        self.put(value, width);
        Ok(())
    }

    /// 写入 1 个位
    pub fn push_bit(&mut self, bit: bool) {
        self.put(u32::from(bit), 1);
    }

    fn put(&mut self, value: u32, width: u32) {
        if width == 0 {
            return;
        }
        let value = value & low_mask(width);
        let free = WORD_BITS - self.pending;

        if width < free {
            self.acc = (self.acc << width) | value;
            self.pending += width;
            return;
        }

        // 填满当前字, 余下的位进入新字
        let spill = width - free;
        let head = value >> spill;
        let word = if free == WORD_BITS {
            head
        } else {
            (self.acc << free) | head
        };
        self.words.push(word);
        self.acc = value & low_mask(spill);
        self.pending = spill;
    }

    /// 对齐到字边界 (用 0 填充)
    pub fn align_to_word(&mut self) {
        if self.pending > 0 {
            let pad = WORD_BITS - self.pending;
            self.words.push(self.acc << pad);
            self.acc = 0;
            self.pending = 0;
        }
    }

    /// 按位拼接另一个写入器的全部内容
    pub fn append(&mut self, other: &BitWriter) {
        if self.pending == 0 {
            self.words.extend_from_slice(&other.words);
        } else {
            for &word in &other.words {
                self.put(word, WORD_BITS);
            }
        }
        self.put(other.acc, other.pending);
    }

    /// 获取当前已完成的字
    ///
    /// 注意: 不包括累加器中未满的字.
    pub fn words(&self) -> &[u32] {
        &self.words
    }

    /// 完成写入, 返回字序列
    ///
    /// 如果当前不在字边界, 自动用 0 填充. 写入器被消耗, 之后无法继续写入.
    pub fn finish(mut self) -> Vec<u32> {
        self.align_to_word();
        self.words
    }
}

fn low_mask(n: u32) -> u32 {
    if n >= WORD_BITS {
        u32::MAX
    } else {
        (1u32 << n) - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitreader::BitReader;

    #[test]
    fn test_push_basic() {
        let mut bw = BitWriter::new();
        bw.push(0b1, 1).unwrap();
        bw.push(0b0000000011, 10).unwrap();
        assert_eq!(bw.bits_written(), 11);
        let words = bw.finish();
        assert_eq!(words, vec![0b1000_0000_0110_0000 << 16]);
    }

    #[test]
    fn test_push_cross_word() {
        let mut bw = BitWriter::new();
        bw.push(0, 28).unwrap();
        bw.push(0xAB, 8).unwrap();
        assert_eq!(bw.words(), &[0x0000_000A]);
        assert_eq!(bw.bits_written(), 36);
        let words = bw.finish();
        assert_eq!(words, vec![0x0000_000A, 0xB000_0000]);
    }

    #[test]
    fn test_push_32_bit_unaligned() {
        let mut bw = BitWriter::new();
        bw.push(0b101, 3).unwrap();
        bw.push(0xDEAD_BEEF, 32).unwrap();
        let words = bw.finish();
        assert_eq!(words, vec![0xBBD5_B7DD, 0xE000_0000]);
    }

    #[test]
    fn test_push_truncates_high_bits() {
        let mut bw = BitWriter::new();
        bw.push(0xFFFF_FFF0, 4).unwrap();
        bw.push(0xFFFF_FFFF, 4).unwrap();
        assert_eq!(bw.finish(), vec![0x0F00_0000]);
    }

    #[test]
    fn test_push_width_超过字宽() {
        let mut bw = BitWriter::new();
        let err = bw.push(1, 33).unwrap_err();
        assert!(matches!(err, DraError::InvalidArgument(_)));
        assert_eq!(bw.bits_written(), 0);
    }

    #[test]
    fn test_push_zero_width() {
        let mut bw = BitWriter::new();
        bw.push(0xFF, 0).unwrap();
        assert_eq!(bw.bits_written(), 0);
        assert!(bw.finish().is_empty());
    }

    #[test]
    fn test_每次写入恰好_width_位() {
        let mut bw = BitWriter::new();
        let mut expected = 0usize;
        for width in 0..=32u32 {
            bw.push(u32::MAX, width).unwrap();
            expected += width as usize;
            assert_eq!(bw.bits_written(), expected, "width={}", width);
        }
    }

    #[test]
    fn test_align_to_word() {
        let mut bw = BitWriter::new();
        bw.push(0b11, 2).unwrap();
        bw.align_to_word();
        assert_eq!(bw.bits_written(), 32);
        bw.push(1, 1).unwrap();
        assert_eq!(bw.finish(), vec![0xC000_0000, 0x8000_0000]);
    }

    #[test]
    fn test_append_equals_direct_write() {
        let fields = [(0x3u32, 2u32), (0x1FF, 9), (0xDEAD_BEEF, 32), (0x5, 3)];

        let mut direct = BitWriter::new();
        direct.push(0b10101, 5).unwrap();
        for &(v, w) in &fields {
            direct.push(v, w).unwrap();
        }

        let mut body = BitWriter::new();
        for &(v, w) in &fields {
            body.push(v, w).unwrap();
        }
        let mut spliced = BitWriter::new();
        spliced.push(0b10101, 5).unwrap();
        spliced.append(&body);

        assert_eq!(spliced.bits_written(), direct.bits_written());
        assert_eq!(spliced.finish(), direct.finish());
    }

    #[test]
    fn test_read_write_roundtrip() {
        let mut bw = BitWriter::new();
        bw.push(0b10110, 5).unwrap();
        bw.push(0x1234_5678, 32).unwrap();
        bw.push(0, 3).unwrap();
        bw.push(0x3FF, 10).unwrap();
        let words = bw.finish();

        let mut br = BitReader::new(&words);
        assert_eq!(br.read_bits(5).unwrap(), 0b10110);
        assert_eq!(br.read_bits(32).unwrap(), 0x1234_5678);
        assert_eq!(br.read_bits(3).unwrap(), 0);
        assert_eq!(br.read_bits(10).unwrap(), 0x3FF);
    }
}
