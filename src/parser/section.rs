//! # 段落状态机
//!
//! 把指令解释为段落边界，缓冲可视行，并在边界处冲刷出带自动序号的段落。
//! 纯和弦行会被持有一行，等待下一行歌词给予合并的机会。

use std::collections::HashMap;

use crate::parser::directive::{normalize_directive_name, parse_directive};
use crate::parser::merge::merge_chords_into_lyrics;
use crate::parser::metadata::MetadataAccumulator;
use crate::parser::tokenizer::tokenize_line;
use crate::types::{Line, LineKind, Section, SectionType};

/// 扫描结束时 [`SectionAccumulator::finish`] 的产出。
#[derive(Debug)]
pub struct ScanOutput {
    /// 输入结束时残留缓冲冲刷出的最后一个段落（如果有）。
    pub final_section: Option<Section>,
    /// 扫描期间累积的元数据。
    pub metadata: MetadataAccumulator,
    /// 扫描期间产生的警告。
    pub warnings: Vec<String>,
}

/// 段落累加器：逐行喂入输入，在段落边界处返回冲刷完成的段落。
///
/// 初始状态为主歌类型、空缓冲、所有计数器为零。
/// 每种段落类型的出现序号独立计数，从 1 开始。
#[derive(Debug)]
pub struct SectionAccumulator {
    current_type: SectionType,
    buffer: Vec<Line>,
    counters: HashMap<SectionType, u32>,
    /// 至多持有一行的待合并纯和弦行（单行前瞻）。
    held_chords: Option<Line>,
    /// 是否已经有可视行进入过缓冲（或持有槽）。
    seen_content: bool,
    line_num: usize,
    metadata: MetadataAccumulator,
    warnings: Vec<String>,
}

impl Default for SectionAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionAccumulator {
    /// 创建一个新的段落累加器。
    #[must_use]
    pub fn new() -> Self {
        Self {
            current_type: SectionType::Verse,
            buffer: Vec::new(),
            counters: HashMap::new(),
            held_chords: None,
            seen_content: false,
            line_num: 0,
            metadata: MetadataAccumulator::new(),
            warnings: Vec::new(),
        }
    }

    /// 喂入一行输入。
    ///
    /// 如果这一行触发了段落边界并且缓冲非空，返回冲刷完成的段落。
    pub fn feed(&mut self, raw_line: &str) -> Option<Section> {
        self.line_num += 1;
        let trimmed = raw_line.trim();

        // 首个可视行出现之前的空行整体跳过，连 Blank 行都不产生
        if trimmed.is_empty() && !self.seen_content {
            return None;
        }

        if let Some((name, value)) = parse_directive(trimmed) {
            return self.feed_directive(&name, &value, raw_line);
        }

        if let Some(comment_text) = trimmed.strip_prefix('#') {
            self.release_held_chords();
            self.push_line(Line::comment(comment_text.trim(), raw_line));
            return None;
        }

        if trimmed.is_empty() {
            self.release_held_chords();
            self.push_line(Line::blank(raw_line));
            return None;
        }

        let line = tokenize_line(raw_line, self.line_num, &mut self.warnings);
        if line.kind == LineKind::ChordsOnly {
            // 持有这一行，把合并的机会留给下一行歌词
            self.release_held_chords();
            self.held_chords = Some(line);
            self.seen_content = true;
        } else {
            let merged = match self.held_chords.take() {
                Some(chords) => merge_chords_into_lyrics(&chords, line),
                None => line,
            };
            self.push_line(merged);
        }
        None
    }

    /// 输入结束：持有的纯和弦行原样入缓冲，冲刷最后的段落。
    ///
    /// 文档末尾的空行属于边缘空白，在这里裁掉；裁剪后为空的缓冲
    /// 不产生段落，也不消耗序号。段落内部的空行不受影响。
    #[must_use]
    pub fn finish(mut self) -> ScanOutput {
        self.release_held_chords();
        while matches!(self.buffer.last(), Some(line) if line.kind == LineKind::Blank) {
            self.buffer.pop();
        }
        let final_section = self.flush_section();
        ScanOutput {
            final_section,
            metadata: self.metadata,
            warnings: self.warnings,
        }
    }

    fn feed_directive(&mut self, name: &str, value: &str, raw_line: &str) -> Option<Section> {
        let normalized = normalize_directive_name(name);

        // 任何指令都会打断纯和弦行与下一行歌词的相邻关系，
        // 持有的纯和弦行一律先按后备路径入缓冲
        self.release_held_chords();

        // 注释指令作为 Comment 行进入缓冲，不影响段落状态
        if normalized == "c" || normalized == "comment" {
            self.push_line(Line::comment(value, raw_line));
            return None;
        }

        // 段落结束指令：识别但不冲刷，冲刷由下一个边界（或输入结束）完成
        if is_section_end(&normalized) {
            return None;
        }

        if let Some(new_type) = section_boundary(&normalized) {
            let flushed = self.flush_section();
            self.current_type = new_type;
            return flushed;
        }

        // 其余指令只更新元数据累加器，不产生任何行
        self.metadata
            .set(&normalized, value, self.line_num, &mut self.warnings);
        None
    }

    fn push_line(&mut self, line: Line) {
        self.seen_content = true;
        self.buffer.push(line);
    }

    /// 把持有的纯和弦行不经合并地放入缓冲（后备路径）。
    fn release_held_chords(&mut self) {
        if let Some(chords) = self.held_chords.take() {
            self.buffer.push(chords);
        }
    }

    /// 冲刷当前缓冲为一个段落。空缓冲不产生段落，也不消耗序号。
    ///
    /// 缓冲里的空行原样保留：边界指令前的空行是段落内部内容，
    /// 只有文档末尾的空行才由 [`Self::finish`] 裁掉。
    fn flush_section(&mut self) -> Option<Section> {
        if self.buffer.is_empty() {
            return None;
        }

        let counter = self.counters.entry(self.current_type).or_insert(0);
        *counter += 1;
        let index = *counter;
        tracing::debug!("冲刷段落 {} #{index}，共 {} 行", self.current_type, self.buffer.len());

        Some(Section {
            section_type: self.current_type,
            label: self.current_type.display_name().to_string(),
            lines: std::mem::take(&mut self.buffer),
            index,
        })
    }
}

/// 判断规范化指令名是否构成段落边界，返回新段落的类型。
///
/// 接受 `soc`/`sov`/`sob` 缩写、`start_of_<type>` 形式
/// （未知的 `<type>` 归入 [`SectionType::Unknown`]，仍然是边界），
/// 以及完整的段落类型名。短别名（`c`、`v` 等）不是边界。
fn section_boundary(normalized: &str) -> Option<SectionType> {
    match normalized {
        "soc" => Some(SectionType::Chorus),
        "sov" => Some(SectionType::Verse),
        "sob" => Some(SectionType::Bridge),
        _ => {
            if let Some(type_name) = normalized.strip_prefix("startof") {
                Some(SectionType::from_alias(type_name).unwrap_or(SectionType::Unknown))
            } else {
                SectionType::from_exact_name(normalized)
            }
        }
    }
}

/// 判断规范化指令名是否为段落结束指令（`end_of_*` 及其缩写）。
fn is_section_end(normalized: &str) -> bool {
    matches!(normalized, "eoc" | "eov" | "eob") || normalized.starts_with("endof")
}
