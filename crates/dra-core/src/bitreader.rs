//! 比特流读取器.
//!
//! 从 32 位字序列中按位读取数据, 与 BitWriter 对应, 按大端位序 (MSB first).
//! 码本的符号解码和码流校验都建立在它之上.

use crate::{DraError, DraResult, WORD_BITS};

/// 比特流读取器
///
/// # 示例
/// ```
/// use dra_core::bitreader::BitReader;
///
/// let words = [0xB000_0000u32];
/// let mut br = BitReader::new(&words);
/// assert_eq!(br.read_bits(4).unwrap(), 0b1011);
/// assert_eq!(br.bits_left(), 28);
/// ```
pub struct BitReader<'a> {
    /// 源数据
    words: &'a [u32],
    /// 当前位位置 (从第一个字的最高位起算)
    pos: usize,
}

impl<'a> BitReader<'a> {
    /// 创建新的比特流读取器
    pub fn new(words: &'a [u32]) -> Self {
        Self { words, pos: 0 }
    }

    /// 获取已读取的总位数
    pub fn bits_read(&self) -> usize {
        self.pos
    }

    /// 获取剩余可读位数
    pub fn bits_left(&self) -> usize {
        (self.words.len() * WORD_BITS as usize).saturating_sub(self.pos)
    }

    /// 读取 1 个位
    pub fn read_bit(&mut self) -> DraResult<u32> {
        if self.bits_left() == 0 {
            return Err(DraError::Eof);
        }
        let word = self.words[self.pos / WORD_BITS as usize];
        let offset = (self.pos % WORD_BITS as usize) as u32;
        self.pos += 1;
        Ok((word >> (WORD_BITS - 1 - offset)) & 1)
    }

    /// 读取 N 个位 (最多 32 位)
    ///
    /// 按大端位序读取, 返回值的低 N 位有效.
    pub fn read_bits(&mut self, n: u32) -> DraResult<u32> {
        if n == 0 {
            return Ok(0);
        }
        if n > WORD_BITS {
            return Err(DraError::InvalidArgument(format!(
                "read_bits: n={} 超过 32 位",
                n,
            )));
        }
        if (n as usize) > self.bits_left() {
            return Err(DraError::Eof);
        }

        let mut result: u64 = 0;
        let mut remaining = n;
        while remaining > 0 {
            let word = self.words[self.pos / WORD_BITS as usize];
            let offset = (self.pos % WORD_BITS as usize) as u32;
            let available = WORD_BITS - offset;
            let to_read = remaining.min(available);

            let shift = available - to_read;
            let mask = (1u64 << to_read) - 1;
            let bits = (u64::from(word) >> shift) & mask;
            result = (result << to_read) | bits;

            self.pos += to_read as usize;
            remaining -= to_read;
        }

        Ok(result as u32)
    }

    /// 跳过 N 个位
    pub fn skip_bits(&mut self, n: usize) -> DraResult<()> {
        if n > self.bits_left() {
            return Err(DraError::Eof);
        }
        self.pos += n;
        Ok(())
    }

    /// 对齐到下一个字边界
    pub fn align_to_word(&mut self) {
        let rem = self.pos % WORD_BITS as usize;
        if rem != 0 {
            self.pos += WORD_BITS as usize - rem;
        }
    }
}
