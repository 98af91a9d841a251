//! # dra-core
//!
//! DRA 帧打包器核心库, 提供按 32 位字组织的比特流读写器和统一错误类型.

pub mod bitreader;
pub mod bitwriter;
pub mod error;

// 重导出常用类型
pub use bitreader::BitReader;
pub use bitwriter::BitWriter;
pub use error::{DraError, DraResult};

/// 比特流字宽 (位)
pub const WORD_BITS: u32 = 32;
