//! # 元数据累加器
//!
//! 在扫描期间收集元数据指令，扫描结束后冻结为 [`ParsedDocument`] 的元数据字段。

use crate::types::{CanonicalDirectiveKey, ParsedDocument, Section};

/// 元数据累加器。
///
/// 同一字段被多次设置时，后写入者获胜，不视为错误。
#[derive(Debug, Default, Clone)]
pub struct MetadataAccumulator {
    title: Option<String>,
    subtitle: Option<String>,
    artist: Option<String>,
    album: Option<String>,
    key: Option<String>,
    original_key: Option<String>,
    composer: Option<String>,
    lyricist: Option<String>,
    arranger: Option<String>,
    copyright: Option<String>,
    ccli_id: Option<String>,
    tempo: Option<u32>,
    capo: Option<u32>,
    year: Option<u32>,
    time_signature: Option<String>,
}

impl MetadataAccumulator {
    /// 创建一个新的、空的累加器。
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置一条元数据。
    ///
    /// `normalized_name` 应当已经过规范化（小写、无下划线和连字符）。
    /// 无法识别的键被丢弃并记录警告；整数字段遇到非数字值时
    /// 本次设置不生效，同样记录警告，绝不报错。
    pub fn set(
        &mut self,
        normalized_name: &str,
        value: &str,
        line_num: usize,
        warnings: &mut Vec<String>,
    ) {
        let Ok(canonical_key) = normalized_name.parse::<CanonicalDirectiveKey>() else {
            tracing::debug!("行 {line_num}: 跳过未知指令 '{normalized_name}'");
            warnings.push(format!("行 {line_num}: 未知指令 '{normalized_name}' 已被忽略"));
            return;
        };

        let trimmed_value = value.trim();
        if trimmed_value.is_empty() {
            // 空值不覆盖已有内容，与 MetadataStore::add 的行为一致
            return;
        }

        match canonical_key {
            CanonicalDirectiveKey::Title => self.title = Some(trimmed_value.to_string()),
            CanonicalDirectiveKey::Subtitle => self.subtitle = Some(trimmed_value.to_string()),
            CanonicalDirectiveKey::Artist => self.artist = Some(trimmed_value.to_string()),
            CanonicalDirectiveKey::Album => self.album = Some(trimmed_value.to_string()),
            CanonicalDirectiveKey::Key => self.key = Some(trimmed_value.to_string()),
            CanonicalDirectiveKey::OriginalKey => {
                self.original_key = Some(trimmed_value.to_string());
            }
            CanonicalDirectiveKey::Composer => self.composer = Some(trimmed_value.to_string()),
            CanonicalDirectiveKey::Lyricist => self.lyricist = Some(trimmed_value.to_string()),
            CanonicalDirectiveKey::Arranger => self.arranger = Some(trimmed_value.to_string()),
            CanonicalDirectiveKey::Copyright => self.copyright = Some(trimmed_value.to_string()),
            CanonicalDirectiveKey::CcliId => self.ccli_id = Some(trimmed_value.to_string()),
            CanonicalDirectiveKey::TimeSignature => {
                self.time_signature = Some(trimmed_value.to_string());
            }
            CanonicalDirectiveKey::Tempo => {
                if let Some(parsed) = parse_integer(trimmed_value, "tempo", line_num, warnings) {
                    self.tempo = Some(parsed);
                }
            }
            CanonicalDirectiveKey::Capo => {
                if let Some(parsed) = parse_integer(trimmed_value, "capo", line_num, warnings) {
                    self.capo = Some(parsed);
                }
            }
            CanonicalDirectiveKey::Year => {
                if let Some(parsed) = parse_integer(trimmed_value, "year", line_num, warnings) {
                    self.year = Some(parsed);
                }
            }
        }
    }

    /// 将累加器冻结为最终的 [`ParsedDocument`]。
    #[must_use]
    pub fn into_document(
        self,
        sections: Vec<Section>,
        raw_text: String,
        warnings: Vec<String>,
    ) -> ParsedDocument {
        ParsedDocument {
            title: self.title,
            subtitle: self.subtitle,
            artist: self.artist,
            album: self.album,
            key: self.key,
            original_key: self.original_key,
            composer: self.composer,
            lyricist: self.lyricist,
            arranger: self.arranger,
            copyright: self.copyright,
            ccli_id: self.ccli_id,
            tempo: self.tempo,
            capo: self.capo,
            year: self.year,
            time_signature: self.time_signature,
            sections,
            raw_text,
            warnings,
        }
    }
}

/// 把指令值解析为十进制整数。失败时记录警告并返回 `None`。
fn parse_integer(
    value: &str,
    field_name: &str,
    line_num: usize,
    warnings: &mut Vec<String>,
) -> Option<u32> {
    match value.parse::<u32>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            tracing::warn!("行 {line_num}: {field_name} 的值 '{value}' 不是有效的整数");
            warnings.push(format!(
                "行 {line_num}: {field_name} 的值 '{value}' 不是有效的整数，已被忽略"
            ));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(accumulator: &mut MetadataAccumulator, name: &str, value: &str) -> Vec<String> {
        let mut warnings = Vec::new();
        accumulator.set(name, value, 1, &mut warnings);
        warnings
    }

    fn freeze(accumulator: MetadataAccumulator) -> ParsedDocument {
        accumulator.into_document(Vec::new(), String::new(), Vec::new())
    }

    #[test]
    fn test_alias_and_full_name_set_the_same_field() {
        let mut a = MetadataAccumulator::new();
        set(&mut a, "t", "Foo");
        let mut b = MetadataAccumulator::new();
        set(&mut b, "title", "Foo");
        assert_eq!(freeze(a).title.as_deref(), Some("Foo"));
        assert_eq!(freeze(b).title.as_deref(), Some("Foo"));
    }

    #[test]
    fn test_last_directive_wins() {
        let mut accumulator = MetadataAccumulator::new();
        set(&mut accumulator, "key", "C");
        set(&mut accumulator, "k", "G");
        assert_eq!(freeze(accumulator).key.as_deref(), Some("G"));
    }

    #[test]
    fn test_empty_value_does_not_clear_previous_value() {
        let mut accumulator = MetadataAccumulator::new();
        set(&mut accumulator, "title", "A");
        let warnings = set(&mut accumulator, "title", "   ");
        assert!(warnings.is_empty());
        assert_eq!(freeze(accumulator).title.as_deref(), Some("A"));
    }

    #[test]
    fn test_integer_fields() {
        let mut accumulator = MetadataAccumulator::new();
        set(&mut accumulator, "tempo", "120");
        set(&mut accumulator, "capo", "2");
        set(&mut accumulator, "year", "1987");
        let doc = freeze(accumulator);
        assert_eq!(doc.tempo, Some(120));
        assert_eq!(doc.capo, Some(2));
        assert_eq!(doc.year, Some(1987));
    }

    #[test]
    fn test_non_numeric_integer_value_is_ignored_with_warning() {
        let mut accumulator = MetadataAccumulator::new();
        let warnings = set(&mut accumulator, "tempo", "fast");
        assert_eq!(warnings.len(), 1);
        assert_eq!(freeze(accumulator).tempo, None);
    }

    #[test]
    fn test_unknown_directive_is_dropped_with_warning() {
        let mut accumulator = MetadataAccumulator::new();
        let warnings = set(&mut accumulator, "definedby", "nobody");
        assert_eq!(warnings.len(), 1);
        assert_eq!(freeze(accumulator), ParsedDocument::default());
    }

    #[test]
    fn test_time_signature() {
        let mut accumulator = MetadataAccumulator::new();
        set(&mut accumulator, "timesignature", "3/4");
        assert_eq!(freeze(accumulator).time_signature.as_deref(), Some("3/4"));
    }
}
