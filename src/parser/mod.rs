//! # ChordPro 解析器
//!
//! 顶层驱动：逐行喂入段落状态机，装配最终的 [`ParsedDocument`]。

mod directive;
mod merge;
mod metadata;
mod section;
mod tokenizer;

pub use directive::{normalize_directive_name, parse_directive};
pub use merge::merge_chords_into_lyrics;
pub use metadata::MetadataAccumulator;
pub use section::{ScanOutput, SectionAccumulator};
pub use tokenizer::tokenize_line;

use std::collections::HashMap;

use crate::types::{ParsedDocument, Section, SectionType};

/// 解析 ChordPro 风格的和弦谱文本。
///
/// 这是一个纯函数：对任意字符串输入都是全函数，没有可失败的返回路径。
/// 畸形的结构会平滑降级而不是报错，必要时在
/// [`ParsedDocument::warnings`] 中留下诊断信息。
///
/// 空输入产生零个段落和全空的元数据。
#[must_use]
pub fn parse_chordpro(content: &str) -> ParsedDocument {
    let mut accumulator = SectionAccumulator::new();
    let mut sections: Vec<Section> = Vec::new();

    for line in content.lines() {
        if let Some(section) = accumulator.feed(line) {
            sections.push(section);
        }
    }

    let output = accumulator.finish();
    if let Some(section) = output.final_section {
        sections.push(section);
    }

    assign_labels(&mut sections);

    output
        .metadata
        .into_document(sections, content.to_string(), output.warnings)
}

/// 为所有段落分配最终标签。
///
/// 参与编号的类型（主歌、副歌、桥段、预副歌）只有在文档中出现多于一次时
/// 才带数字后缀；其它类型始终使用裸名称，即使重复出现造成标签相同。
/// 后缀取决于各类型的最终出现次数，因此只能在整个扫描结束后分配。
fn assign_labels(sections: &mut [Section]) {
    let mut totals: HashMap<SectionType, u32> = HashMap::new();
    for section in sections.iter() {
        let total = totals.entry(section.section_type).or_insert(0);
        *total = (*total).max(section.index);
    }

    for section in sections.iter_mut() {
        let name = section.section_type.display_name();
        section.label = if section.section_type.is_numbered() && totals[&section.section_type] > 1 {
            format!("{name} {}", section.index)
        } else {
            name.to_string()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        let doc = parse_chordpro("");
        assert!(doc.sections.is_empty());
        assert_eq!(doc.title, None);
        assert_eq!(doc.tempo, None);
        assert!(doc.warnings.is_empty());
    }

    #[test]
    fn test_section_auto_numbering_labels() {
        let doc = parse_chordpro("{verse}\nA\n{verse}\nB\n{chorus}\nC");
        let labels: Vec<_> = doc.sections.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Verse 1", "Verse 2", "Chorus"]);
    }

    #[test]
    fn test_non_numbered_types_keep_bare_labels() {
        let doc = parse_chordpro("{intro}\nA\n{verse}\nB\n{intro}\nC");
        let labels: Vec<_> = doc.sections.iter().map(|s| s.label.as_str()).collect();
        // intro 重复出现也不编号，产生重复标签是已知且有意的行为
        assert_eq!(labels, vec!["Intro", "Verse", "Intro"]);
    }

    #[test]
    fn test_raw_text_is_preserved() {
        let content = "{title: X}\nHello";
        let doc = parse_chordpro(content);
        assert_eq!(doc.raw_text, content);
    }

    #[test]
    fn test_reparse_is_deterministic() {
        let content = "{title: X}\n{verse}\n[G]He[C]llo\n\n{chorus}\nLa la";
        assert_eq!(parse_chordpro(content), parse_chordpro(content));
    }

    #[test]
    fn test_crlf_line_endings() {
        let doc = parse_chordpro("{verse}\r\nA\r\n{chorus}\r\nB\r\n");
        assert_eq!(doc.sections.len(), 2);
        assert_eq!(doc.sections[0].lines[0].text(), "A");
    }
}
