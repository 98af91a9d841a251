//! 统一错误类型定义.
//!
//! 所有 DRA crate 共用的错误类型. 错误对当前帧是致命的, 编码器不做帧内恢复.

use thiserror::Error;

/// DRA 编码核心统一错误类型
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DraError {
    /// 无效参数 (如除数为 0, 位宽超过字宽)
    #[error("无效参数: {0}")]
    InvalidArgument(String),

    /// 量化步长无效 (步长为 0 或步长索引越界)
    #[error("无效量化步长: {0}")]
    InvalidStepSize(String),

    /// 符号超出码本可表示范围
    #[error("无效符号: {0}")]
    InvalidSymbol(String),

    /// 未实现的配置 (和差编码, 联合强度编码, LFE, 短窗, 多簇)
    #[error("不支持的配置: {0}")]
    UnsupportedConfiguration(String),

    /// 无效数据 (损坏的码字等)
    #[error("无效数据: {0}")]
    InvalidData(String),

    /// 已到达比特流末尾
    #[error("已到达比特流末尾")]
    Eof,
}

/// DRA 统一 Result 类型
pub type DraResult<T> = Result<T, DraError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_错误信息() {
        assert_eq!(
            DraError::InvalidArgument("除数为 0".into()).to_string(),
            "无效参数: 除数为 0"
        );
        assert_eq!(DraError::Eof.to_string(), "已到达比特流末尾");
    }
}
