//! 系数输入与码流输出.
//!
//! 输入文件为小端 f32 系数, 每帧 N 个, 最后一帧不足时补 0.
//! 输出文件为大端序的 32 位字.

use std::path::Path;

use anyhow::{Context, bail};

/// 读取系数文件并按帧切分
pub fn read_frames(path: &Path, bins_per_frame: usize) -> anyhow::Result<Vec<Vec<f64>>> {
    let bytes =
        std::fs::read(path).with_context(|| format!("读取系数文件失败: {}", path.display()))?;
    frames_from_bytes(&bytes, bins_per_frame)
}

/// 将小端 f32 字节流切分为帧
pub fn frames_from_bytes(bytes: &[u8], bins_per_frame: usize) -> anyhow::Result<Vec<Vec<f64>>> {
    if bins_per_frame == 0 {
        bail!("每帧频点数不能为 0");
    }
    if bytes.len() % 4 != 0 {
        bail!("系数文件长度 {} 不是 4 的整数倍", bytes.len());
    }

    let samples: Vec<f64> = bytes
        .chunks_exact(4)
        .map(|b| f64::from(f32::from_le_bytes([b[0], b[1], b[2], b[3]])))
        .collect();

    Ok(samples
        .chunks(bins_per_frame)
        .map(|chunk| {
            let mut frame = chunk.to_vec();
            frame.resize(bins_per_frame, 0.0);
            frame
        })
        .collect())
}

/// 以大端序写出字序列
pub fn write_words(path: &Path, words: &[u32]) -> anyhow::Result<()> {
    let bytes: Vec<u8> = words.iter().flat_map(|w| w.to_be_bytes()).collect();
    std::fs::write(path, bytes).with_context(|| format!("写入码流失败: {}", path.display()))
}
