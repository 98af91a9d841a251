//! # dra-codec
//!
//! DRA 变换音频帧打包器: 码本, Huffman 编码, 量化和帧编码.
//!
//! 输入为每帧的频域系数, 输出为按 32 位字组织的 DRA 码流.
//!
//! ## 支持的帧结构
//!
//! - 标准帧头, 单声道, 长窗, 单簇
//! - 每簇最多 31 个码本频带, 码本 0-9 (9 为溢出码本)
//! - 统一, 逐频带或自适应的量化步长
//!
//! ## 使用示例
//!
//! ```rust
//! use dra_codec::{CodecResources, DraEncoder, FrameConfig, SampleRateIndex};
//!
//! let res = CodecResources::standard();
//! let config = FrameConfig::mono(SampleRateIndex::from_hz(8000).unwrap());
//! let mut enc = DraEncoder::new(&res, config).unwrap();
//! let report = enc.encode_frame(&[0.0; 1024]).unwrap();
//! assert_eq!(report.codebooks, vec![0]);
//! let words = enc.finish();
//! assert_eq!(words.len(), report.num_words);
//! ```

pub mod codebook;
pub mod encoder;
pub mod frame_config;
pub mod frame_encoder;
pub mod huffman;
pub mod quantizer;
pub mod resources;
pub mod tables;

// 重导出常用类型
pub use codebook::{Codebook, CodebookSet};
pub use encoder::{DraEncoder, encode_frames};
pub use frame_config::{
    ClusterConfig, CodebookSelection, FrameConfig, HeaderType, SampleRateIndex, StepSelection,
    WindowType,
};
pub use frame_encoder::{EncodedFrame, FrameEncoder, FrameReport};
pub use huffman::DiffCoder;
pub use quantizer::QuantizationUnit;
pub use resources::CodecResources;
