//! # DRA
//!
//! 纯 Rust 实现的 DRA 变换音频帧打包器.
//!
//! 给定每帧的频域系数, 生成逐位确定的 DRA 码流: 帧头, 码本选择信息,
//! Huffman 编码的量化索引和量化步长索引.
//!
//! # 快速开始
//!
//! ```rust
//! use dra::codec::{FrameConfig, SampleRateIndex};
//!
//! let config = FrameConfig::mono(SampleRateIndex::from_hz(48000).unwrap());
//! let frames = vec![vec![0.0f64; 1024]; 4];
//! let words = dra::encode(&config, &frames).unwrap();
//! assert!(!words.is_empty());
//! ```
//!
//! # Crate 结构
//!
//! | Crate | 功能 |
//! |-------|------|
//! | `dra-core` | 比特流读写与错误类型 |
//! | `dra-codec` | 码本, Huffman 编码, 量化与帧编码 |

/// 比特流读写与错误类型
pub use dra_core as core;

/// 码本, Huffman 编码, 量化与帧编码
pub use dra_codec as codec;

/// 获取版本号
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// 使用标准资源逐帧编码, 返回会话字序列
pub fn encode<F: AsRef<[f64]>>(
    config: &dra_codec::FrameConfig,
    frames: &[F],
) -> dra_core::DraResult<Vec<u32>> {
    let resources = dra_codec::CodecResources::standard();
    dra_codec::encode_frames(&resources, config.clone(), frames)
}
