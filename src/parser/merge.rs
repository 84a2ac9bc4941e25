//! # 和弦合并算法
//!
//! ChordPro 风格的源文件经常把和弦单独放在歌词行的正上方，用水平空白对齐。
//! 本模块把这样的一对行融合为一个带位置标注的歌词行。

use crate::types::{Line, LineKind, LineSegment};

/// 把一个纯和弦行合并进紧随其后的歌词行。
///
/// 从纯和弦行提取 `(position, chord)` 断点（按位置升序），
/// 再沿歌词行的去和弦文本推进游标，把每个和弦附着到对应偏移处的文本段上。
/// 超出歌词文本末尾的和弦以空文本段的形式追加在 `len(L)` 处。
///
/// 纯和弦行没有任何可用和弦时，歌词行原样返回（保留它自己的内联和弦）。
/// 结果的种类恒为 [`LineKind::Lyrics`]。
#[must_use]
pub fn merge_chords_into_lyrics(chords_line: &Line, lyrics_line: Line) -> Line {
    let mut breakpoints: Vec<(usize, String)> = chords_line
        .chord_breakpoints()
        .map(|(position, chord)| (position, chord.to_string()))
        .collect();
    if breakpoints.is_empty() {
        return lyrics_line;
    }
    breakpoints.sort_by_key(|&(position, _)| position);

    let text: Vec<char> = lyrics_line.text().chars().collect();
    let len = text.len();

    let mut segments: Vec<LineSegment> = Vec::new();
    let mut cursor: usize = 0;
    let mut bp_idx: usize = 0;

    while cursor < len || bp_idx < breakpoints.len() {
        let Some((bp_position, chord)) = breakpoints.get(bp_idx) else {
            // 没有剩余断点：一个纯文本段覆盖余下的全部文本
            let tail: String = text[cursor..].iter().collect();
            segments.push(LineSegment::plain(tail, cursor));
            break;
        };

        if cursor >= len {
            // 歌词已耗尽但断点还有剩余：尾随和弦以空文本段追加
            segments.push(LineSegment::with_chord("", chord.clone(), len));
            bp_idx += 1;
        } else if *bp_position <= cursor {
            // 断点已到达：发出带和弦的段，延伸到下一个断点（或文本末尾）
            let next_position = breakpoints
                .get(bp_idx + 1)
                .map_or(len, |&(position, _)| position)
                .min(len);
            let segment_text: String = text[cursor..next_position].iter().collect();
            let char_count = next_position - cursor;
            segments.push(LineSegment::with_chord(segment_text, chord.clone(), cursor));
            cursor += char_count;
            bp_idx += 1;
        } else {
            // 断点还在前方：先发出一个纯文本段补齐到断点位置
            let end = (*bp_position).min(len);
            let segment_text: String = text[cursor..end].iter().collect();
            segments.push(LineSegment::plain(segment_text, cursor));
            cursor = end;
        }
    }

    Line {
        segments,
        kind: LineKind::Lyrics,
        raw: lyrics_line.raw,
    }
}
