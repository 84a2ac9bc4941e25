use std::fmt;

/// 定义从字符串解析 [`crate::SectionType`] 时可能发生的错误。
#[derive(Debug, PartialEq, Eq, Clone, thiserror::Error)]
#[error("未知或无效的段落类型: {0}")]
pub struct ParseSectionTypeError(pub String);

/// 定义从字符串解析 [`crate::CanonicalDirectiveKey`] 时可能发生的错误。
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ParseCanonicalDirectiveKeyError(pub String); // 存储无法解析的原始键字符串

impl fmt::Display for ParseCanonicalDirectiveKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "未知或无效的元数据键: {}", self.0)
    }
}
impl std::error::Error for ParseCanonicalDirectiveKeyError {}
