//! DRA Huffman 编码模式.
//!
//! 所有模式共享只读 [`Codebook`]:
//! - 直接模式: 符号查表写入
//! - 递归模式: 超过最大符号的值拆成若干个最大符号 + 余数 (码本频带间距)
//! - 差分模式: 编码 (当前值 - 前值) mod 符号数, 状态由 [`DiffCoder`] 持有
//! - 转义扩展模式: 仅用于溢出码本, 哨兵符号之后为每个被转义系数写全 1 标记,
//!   定宽商与余数码字
//!
//! 解码函数只用于校验编码结果, 不构成完整的码流解码器.

use dra_core::bitreader::BitReader;
use dra_core::bitwriter::BitWriter;
use dra_core::{DraError, DraResult};

use crate::codebook::Codebook;

// ============================================================
// 递归模式
// ============================================================

/// 递归写入: value = k * M + r, 写 k 个 M (M = 最大符号) 再写 r
pub fn encode_recursive(book: &Codebook, bw: &mut BitWriter, value: u32) -> DraResult<()> {
    let max = book.num_codes() - 1;
    let mut remaining = value;
    while remaining >= max {
        book.encode(bw, max)?;
        remaining -= max;
    }
    book.encode(bw, remaining)
}

/// 递归读取: 累加符号直到读到非最大符号
pub fn decode_recursive(book: &Codebook, br: &mut BitReader) -> DraResult<u32> {
    let max = book.num_codes() - 1;
    let mut total = 0u32;
    loop {
        let symbol = book.decode(br)?;
        total = total
            .checked_add(symbol)
            .ok_or_else(|| DraError::InvalidData("递归码值溢出".into()))?;
        if symbol != max {
            return Ok(total);
        }
    }
}

// ============================================================
// 差分模式
// ============================================================

/// 差分编码器
///
/// 每个独立的编码遍 (步长索引一遍, 商位宽一遍) 使用自己的实例,
/// 前值从 0 开始.
#[derive(Debug, Clone)]
pub struct DiffCoder<'a> {
    book: &'a Codebook,
    prev: u32,
}

impl<'a> DiffCoder<'a> {
    /// 创建差分编码器, 前值为 0
    pub fn new(book: &'a Codebook) -> Self {
        Self { book, prev: 0 }
    }

    /// 重置前值为 0
    pub fn reset(&mut self) {
        self.prev = 0;
    }

    /// 当前前值
    pub fn prev(&self) -> u32 {
        self.prev
    }

    /// 写入 (value - prev) mod 符号数, 并更新前值
    pub fn encode(&mut self, bw: &mut BitWriter, value: u32) -> DraResult<()> {
        let n = self.book.num_codes();
        if value >= n {
            return Err(DraError::InvalidSymbol(format!(
                "码本 {}: 差分值 {} 超出范围 0..{}",
                self.book.name(),
                value,
                n
            )));
        }
        let diff = (value + n - self.prev) % n;
        self.book.encode(bw, diff)?;
        self.prev = value;
        Ok(())
    }

    /// 读取差分并还原为绝对值
    pub fn decode(&mut self, br: &mut BitReader) -> DraResult<u32> {
        let n = self.book.num_codes();
        let diff = self.book.decode(br)?;
        let value = (self.prev + diff) % n;
        self.prev = value;
        Ok(value)
    }
}

// ============================================================
// 频带编码
// ============================================================

/// 用量化码本写入一个频带的量化值
///
/// 码字之后, 幅度码本为每个非零值写 1 个符号位 (1 = 正, 0 = 负).
/// 返回被转义的系数个数 (非溢出码本恒为 0).
pub fn encode_band(
    book: &Codebook,
    bw: &mut BitWriter,
    values: &[i32],
    quotient_width: &mut DiffCoder,
) -> DraResult<usize> {
    let dim = book.dim();
    if values.len() % dim != 0 {
        return Err(DraError::InvalidArgument(format!(
            "频带长度 {} 不是码本 {} 维度 {} 的整数倍",
            values.len(),
            book.name(),
            dim
        )));
    }

    let escaped = if book.escape_symbol().is_some() {
        encode_escaped(book, bw, values, quotient_width)?
    } else {
        let levels = book.levels();
        for group in values.chunks(dim) {
            // 第一个系数为最低位
            let mut symbol = 0u32;
            let mut scale = 1u32;
            for &v in group {
                symbol += book.level_index(v)? * scale;
                scale *= levels;
            }
            book.encode(bw, symbol)?;
        }
        0
    };

    if !book.is_mid_tread() {
        for &v in values.iter().filter(|&&v| v != 0) {
            bw.push_bit(v > 0);
        }
    }
    Ok(escaped)
}

/// 转义扩展模式 (幅度域)
///
/// 第一遍写 min(m, S), S 为哨兵符号; 没有 m >= S 的系数时到此结束.
/// 否则以差分模式写入 (商位宽 - 1), 再按频点顺序为每个被转义系数写入
/// 位宽个 1 的标记, 定宽商 m / S 和余数 m % S 的码字.
pub fn encode_escaped(
    book: &Codebook,
    bw: &mut BitWriter,
    values: &[i32],
    quotient_width: &mut DiffCoder,
) -> DraResult<usize> {
    let sentinel = book.escape_symbol().ok_or_else(|| {
        DraError::InvalidArgument(format!("码本 {} 不是溢出码本", book.name()))
    })?;

    let mut escaped = 0usize;
    let mut max_quotient = 0u32;
    for &v in values {
        let m = v.unsigned_abs();
        book.encode(bw, m.min(sentinel))?;
        if m >= sentinel {
            escaped += 1;
            max_quotient = max_quotient.max(m / sentinel);
        }
    }
    if escaped == 0 {
        return Ok(0);
    }

    let width = u32::BITS - max_quotient.leading_zeros();
    quotient_width.encode(bw, width - 1)?;
    // 位宽不超过 16, 移位不会溢出
    let marker = (1u32 << width) - 1;
    for m in values.iter().map(|v| v.unsigned_abs()).filter(|&m| m >= sentinel) {
        bw.push(marker, width)?;
        bw.push(m / sentinel, width)?;
        book.encode(bw, m % sentinel)?;
    }
    Ok(escaped)
}

/// 读取一个频带的量化值, 与 [`encode_band`] 对应
pub fn decode_band(
    book: &Codebook,
    br: &mut BitReader,
    len: usize,
    quotient_width: &mut DiffCoder,
) -> DraResult<Vec<i32>> {
    let dim = book.dim();
    if len % dim != 0 {
        return Err(DraError::InvalidArgument(format!(
            "频带长度 {} 不是维度 {} 的整数倍",
            len, dim
        )));
    }
    let mut out = vec![0i32; len];

    if let Some(sentinel) = book.escape_symbol() {
        for o in out.iter_mut() {
            *o = book.decode(br)? as i32;
        }
        if out.iter().any(|&m| m as u32 == sentinel) {
            let width = quotient_width.decode(br)? + 1;
            let marker = (1u32 << width) - 1;
            for o in out.iter_mut().filter(|o| **o as u32 == sentinel) {
                let mark = br.read_bits(width)?;
                if mark != marker {
                    return Err(DraError::InvalidData(format!(
                        "转义标记 {:#x} 不是 {} 位全 1",
                        mark, width
                    )));
                }
                let q = u64::from(br.read_bits(width)?);
                let r = u64::from(book.decode(br)?);
                let m = q * u64::from(sentinel) + r;
                *o = i32::try_from(m)
                    .map_err(|_| DraError::InvalidData(format!("转义幅度 {} 溢出", m)))?;
            }
        }
    } else {
        let levels = book.levels();
        for group in out.chunks_mut(dim) {
            let mut symbol = book.decode(br)?;
            for o in group {
                *o = book.recenter(symbol % levels);
                symbol /= levels;
            }
        }
    }

    if !book.is_mid_tread() {
        for o in out.iter_mut().filter(|o| **o != 0) {
            if br.read_bit()? == 0 {
                *o = -*o;
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codebook::{CodebookSet, OVERFLOW_CODEBOOK};

    fn encode_to_words(f: impl FnOnce(&mut BitWriter)) -> (Vec<u32>, usize) {
        let mut bw = BitWriter::new();
        f(&mut bw);
        let bits = bw.bits_written();
        (bw.finish(), bits)
    }

    #[test]
    fn test_差分重置后_555_编码为_500() {
        let books = CodebookSet::standard();
        let book = &books.step_index;

        // 先跑一遍无关的编码, 留下前值
        let mut coder = DiffCoder::new(book);
        let mut scratch = BitWriter::new();
        coder.encode(&mut scratch, 42).unwrap();
        coder.reset();

        let mut bw = BitWriter::new();
        for v in [5, 5, 5] {
            coder.encode(&mut bw, v).unwrap();
        }

        let mut expected = BitWriter::new();
        for s in [5, 0, 0] {
            book.encode(&mut expected, s).unwrap();
        }
        assert_eq!(bw, expected);
    }

    #[test]
    fn test_差分负差值取模() {
        let books = CodebookSet::standard();
        let book = &books.step_index;
        let (words, _) = encode_to_words(|bw| {
            let mut coder = DiffCoder::new(book);
            coder.encode(bw, 10).unwrap();
            coder.encode(bw, 7).unwrap();
        });
        let mut br = BitReader::new(&words);
        assert_eq!(book.decode(&mut br).unwrap(), 10);
        assert_eq!(book.decode(&mut br).unwrap(), 113);

        let mut br = BitReader::new(&words);
        let mut coder = DiffCoder::new(book);
        assert_eq!(coder.decode(&mut br).unwrap(), 10);
        assert_eq!(coder.decode(&mut br).unwrap(), 7);
    }

    #[test]
    fn test_差分值越界() {
        let books = CodebookSet::standard();
        let mut coder = DiffCoder::new(&books.step_index);
        let mut bw = BitWriter::new();
        assert!(matches!(
            coder.encode(&mut bw, 116),
            Err(DraError::InvalidSymbol(_))
        ));
        assert_eq!(coder.prev(), 0);
    }

    #[test]
    fn test_递归编码() {
        let books = CodebookSet::standard();
        let book = &books.run_length;
        for value in [0u32, 62, 63, 64, 255, 63 * 3] {
            let (words, bits) = encode_to_words(|bw| encode_recursive(book, bw, value).unwrap());
            let mut br = BitReader::new(&words);
            assert_eq!(decode_recursive(book, &mut br).unwrap(), value);
            assert_eq!(br.bits_read(), bits);
        }

        // 255 = 4 * 63 + 3
        let (_, bits) = encode_to_words(|bw| encode_recursive(book, bw, 255).unwrap());
        let expected = 4 * book.code(63).unwrap().1 as usize + book.code(3).unwrap().1 as usize;
        assert_eq!(bits, expected);
    }

    #[test]
    fn test_mid_tread_频带() {
        let books = CodebookSet::standard();
        let book = books.qindex(1).unwrap().unwrap();
        let values = [1, 0, -1, 1, 0, 0, 0, 0];
        let mut width = DiffCoder::new(&books.quotient_width);
        let (words, bits) = encode_to_words(|bw| {
            assert_eq!(encode_band(book, bw, &values, &mut width).unwrap(), 0);
        });

        // 第一组: 电平 [2, 1, 0, 2] → 2 + 1*3 + 0*9 + 2*27 = 59
        let mut br = BitReader::new(&words);
        assert_eq!(book.decode(&mut br).unwrap(), 59);
        // 第二组全零: 电平 [1, 1, 1, 1] → 40
        assert_eq!(book.decode(&mut br).unwrap(), 40);
        assert_eq!(br.bits_read(), bits, "mid-tread 码本不写符号位");
    }

    #[test]
    fn test_幅度码本符号位() {
        let books = CodebookSet::standard();
        let book = books.qindex(4).unwrap().unwrap();
        let values = [-3, 0, 16, -16];
        let mut width = DiffCoder::new(&books.quotient_width);
        let (words, bits) = encode_to_words(|bw| {
            encode_band(book, bw, &values, &mut width).unwrap();
        });

        let mut br = BitReader::new(&words);
        assert_eq!(book.decode(&mut br).unwrap(), 3);
        assert_eq!(book.decode(&mut br).unwrap(), 16 + 16 * 17);
        assert_eq!(br.read_bits(3).unwrap(), 0b010);
        assert_eq!(br.bits_read(), bits);

        let mut br = BitReader::new(&words);
        let mut width = DiffCoder::new(&books.quotient_width);
        assert_eq!(decode_band(book, &mut br, 4, &mut width).unwrap(), values);
    }

    #[test]
    fn test_量化值超出码本范围() {
        let books = CodebookSet::standard();
        let book = books.qindex(2).unwrap().unwrap();
        let mut width = DiffCoder::new(&books.quotient_width);
        let mut bw = BitWriter::new();
        let err = encode_band(book, &mut bw, &[3, 0], &mut width).unwrap_err();
        assert!(matches!(err, DraError::InvalidSymbol(_)));
    }

    #[test]
    fn test_转义_无溢出时不写位宽() {
        let books = CodebookSet::standard();
        let book = books.qindex(OVERFLOW_CODEBOOK).unwrap().unwrap();
        let values = [254, -1, 0, 17];
        let mut width = DiffCoder::new(&books.quotient_width);
        let (_, bits) = encode_to_words(|bw| {
            assert_eq!(encode_escaped(book, bw, &values, &mut width).unwrap(), 0);
        });
        let codes: usize = values
            .iter()
            .map(|v| book.code(v.unsigned_abs()).unwrap().1 as usize)
            .sum();
        assert_eq!(bits, codes);
        assert_eq!(width.prev(), 0);
    }

    #[test]
    fn test_转义_商定宽且可还原() {
        let books = CodebookSet::standard();
        let book = books.qindex(OVERFLOW_CODEBOOK).unwrap().unwrap();
        // 255 → q=1 r=0; 1000 → q=3 r=235; -600 → q=2 r=90
        let values = [255, 3, 1000, 0, -600, 7, 0, 0];
        let mut width = DiffCoder::new(&books.quotient_width);
        let (words, bits) = encode_to_words(|bw| {
            assert_eq!(encode_band(book, bw, &values, &mut width).unwrap(), 3);
        });

        let mut br = BitReader::new(&words);
        let first: Vec<u32> = (0..values.len()).map(|_| book.decode(&mut br).unwrap()).collect();
        assert_eq!(first, vec![255, 3, 255, 0, 255, 7, 0, 0]);
        // 最大商 3 → 位宽 2, 写入 width - 1 = 1
        assert_eq!(books.quotient_width.decode(&mut br).unwrap(), 1);
        for (q, r) in [(1, 0), (3, 235), (2, 90)] {
            assert_eq!(br.read_bits(2).unwrap(), 0b11, "被转义系数前应为全 1 标记");
            assert_eq!(br.read_bits(2).unwrap(), q);
            assert_eq!(book.decode(&mut br).unwrap(), r);
        }

        let mut br = BitReader::new(&words);
        let mut width = DiffCoder::new(&books.quotient_width);
        assert_eq!(decode_band(book, &mut br, values.len(), &mut width).unwrap(), values);
        assert_eq!(br.bits_read(), bits);
    }

    #[test]
    fn test_转义_标记损坏() {
        let books = CodebookSet::standard();
        let book = books.qindex(OVERFLOW_CODEBOOK).unwrap().unwrap();
        // 300 = 1 * 255 + 45, 手工拼出标记为 0 的码流: 哨兵, 位宽 1, 标记 0, 商 1, 余数 45
        let mut bw = BitWriter::new();
        book.encode(&mut bw, 255).unwrap();
        books.quotient_width.encode(&mut bw, 0).unwrap();
        bw.push(0, 1).unwrap();
        bw.push(1, 1).unwrap();
        book.encode(&mut bw, 45).unwrap();
        bw.push_bit(true);
        let words = bw.finish();

        let mut br = BitReader::new(&words);
        let mut width = DiffCoder::new(&books.quotient_width);
        assert!(matches!(
            decode_band(book, &mut br, 1, &mut width),
            Err(DraError::InvalidData(_))
        ));
    }

    #[test]
    fn test_转义_商位宽超出码本() {
        let books = CodebookSet::standard();
        let book = books.qindex(OVERFLOW_CODEBOOK).unwrap().unwrap();
        let mut width = DiffCoder::new(&books.quotient_width);
        let mut bw = BitWriter::new();
        let err = encode_escaped(book, &mut bw, &[255 << 16], &mut width).unwrap_err();
        assert!(matches!(err, DraError::InvalidSymbol(_)));
    }

    #[test]
    fn test_非溢出码本不能转义() {
        let books = CodebookSet::standard();
        let book = books.qindex(5).unwrap().unwrap();
        let mut width = DiffCoder::new(&books.quotient_width);
        let mut bw = BitWriter::new();
        assert!(matches!(
            encode_escaped(book, &mut bw, &[1], &mut width),
            Err(DraError::InvalidArgument(_))
        ));
    }
}
