use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use strum_macros::EnumIter;

use crate::error::{ParseCanonicalDirectiveKeyError, ParseSectionTypeError};

/// 枚举：表示歌曲段落的类型。
///
/// 这是一个封闭的集合，无法识别的段落指令会解析为 [`SectionType::Unknown`]，
/// 而不会产生错误。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, Default)]
pub enum SectionType {
    /// 主歌。
    #[default]
    Verse,
    /// 副歌。
    Chorus,
    /// 桥段。
    Bridge,
    /// 预副歌。
    PreChorus,
    /// 器乐段。
    Instrumental,
    /// 前奏。
    Intro,
    /// 尾奏。
    Outro,
    /// 间奏。
    Interlude,
    /// 结尾标记段 (Tag)。
    Tag,
    /// 循环段 (Vamp)。
    Vamp,
    /// 终止段 (Coda)。
    Coda,
    /// 独奏段。
    Solo,
    /// 无法识别的段落类型。
    Unknown,
}

impl SectionType {
    /// 返回该段落类型的显示名称，用于生成段落标签。
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            SectionType::Verse => "Verse",
            SectionType::Chorus => "Chorus",
            SectionType::Bridge => "Bridge",
            SectionType::PreChorus => "Pre-Chorus",
            SectionType::Instrumental => "Instrumental",
            SectionType::Intro => "Intro",
            SectionType::Outro => "Outro",
            SectionType::Interlude => "Interlude",
            SectionType::Tag => "Tag",
            SectionType::Vamp => "Vamp",
            SectionType::Coda => "Coda",
            SectionType::Solo => "Solo",
            SectionType::Unknown => "Unknown",
        }
    }

    /// 指示该类型是否参与自动编号。
    ///
    /// 只有主歌、副歌、桥段和预副歌会获得数字后缀；
    /// 其它类型即使重复出现也始终使用裸名称。
    #[must_use]
    pub const fn is_numbered(self) -> bool {
        matches!(
            self,
            SectionType::Verse | SectionType::Chorus | SectionType::Bridge | SectionType::PreChorus
        )
    }

    /// 从别名解析段落类型。
    ///
    /// 输入应当是规范化后的指令名（小写、无下划线和连字符）。
    /// 包括短别名，例如 `v`、`c`、`pc`。无法识别时返回 `None`。
    #[must_use]
    pub fn from_alias(s: &str) -> Option<Self> {
        match s {
            "verse" | "v" => Some(SectionType::Verse),
            "chorus" | "c" | "refrain" => Some(SectionType::Chorus),
            "bridge" | "b" => Some(SectionType::Bridge),
            "prechorus" | "pc" => Some(SectionType::PreChorus),
            "instrumental" => Some(SectionType::Instrumental),
            "intro" => Some(SectionType::Intro),
            "outro" => Some(SectionType::Outro),
            "interlude" => Some(SectionType::Interlude),
            "tag" => Some(SectionType::Tag),
            "vamp" => Some(SectionType::Vamp),
            "coda" => Some(SectionType::Coda),
            "solo" => Some(SectionType::Solo),
            _ => None,
        }
    }

    /// 从完整的类型名解析段落类型，不接受短别名。
    ///
    /// 用于判断裸指令（例如 `{verse}`）是否构成段落边界。
    /// 短别名被排除在外，因为 `{c}` 是注释指令而非副歌边界。
    #[must_use]
    pub fn from_exact_name(s: &str) -> Option<Self> {
        match s {
            "verse" => Some(SectionType::Verse),
            "chorus" | "refrain" => Some(SectionType::Chorus),
            "bridge" => Some(SectionType::Bridge),
            "prechorus" => Some(SectionType::PreChorus),
            "instrumental" => Some(SectionType::Instrumental),
            "intro" => Some(SectionType::Intro),
            "outro" => Some(SectionType::Outro),
            "interlude" => Some(SectionType::Interlude),
            "tag" => Some(SectionType::Tag),
            "vamp" => Some(SectionType::Vamp),
            "coda" => Some(SectionType::Coda),
            "solo" => Some(SectionType::Solo),
            _ => None,
        }
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for SectionType {
    type Err = ParseSectionTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_alias(s).ok_or_else(|| ParseSectionTypeError(s.to_string()))
    }
}

/// 枚举：表示一行的种类。
///
/// 指令行在解析期间被内部消耗，永远不会以 [`Line`] 的形式出现。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineKind {
    /// 带有可选内联和弦的歌词行。
    Lyrics,
    /// 只包含和弦、文本部分为空白的行。
    ChordsOnly,
    /// 空行。
    Blank,
    /// 注释行（来自 `#` 前缀或 `{comment: ...}` 指令）。
    Comment,
}

/// 最小的可渲染单元：一段文本，以及可选的附着在文本开头的和弦。
///
/// `position` 是该段文本在所属行的去和弦文本中的字符偏移量。
/// 同一行内所有段的文本按顺序拼接，应精确还原该行的去和弦文本。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSegment {
    /// 文本内容，可以为空（例如纯和弦段）。
    pub text: String,
    /// 可选的和弦符号，附着于文本开头。
    pub chord: Option<String>,
    /// 该段文本在所属行去和弦文本中的起始字符偏移。
    pub position: usize,
}

impl LineSegment {
    /// 创建一个不带和弦的纯文本段。
    #[must_use]
    pub fn plain(text: impl Into<String>, position: usize) -> Self {
        Self {
            text: text.into(),
            chord: None,
            position,
        }
    }

    /// 创建一个带和弦的段。
    #[must_use]
    pub fn with_chord(text: impl Into<String>, chord: impl Into<String>, position: usize) -> Self {
        Self {
            text: text.into(),
            chord: Some(chord.into()),
            position,
        }
    }
}

/// 表示一个可视行。
///
/// 相等性是结构化的：只比较 `segments` 与 `kind`，
/// `raw` 仅用于诊断，不参与比较。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Line {
    /// 组成该行的段列表。
    pub segments: Vec<LineSegment>,
    /// 该行的种类。
    pub kind: LineKind,
    /// 可选的原始源文本，用于诊断。
    pub raw: Option<String>,
}

impl PartialEq for Line {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.segments == other.segments
    }
}

impl Line {
    /// 创建一个空行。
    #[must_use]
    pub fn blank(raw: impl Into<String>) -> Self {
        Self {
            segments: Vec::new(),
            kind: LineKind::Blank,
            raw: Some(raw.into()),
        }
    }

    /// 创建一个注释行。注释文本作为位置 0 处的单个无和弦段存储。
    #[must_use]
    pub fn comment(text: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            segments: vec![LineSegment::plain(text, 0)],
            kind: LineKind::Comment,
            raw: Some(raw.into()),
        }
    }

    /// 将所有段的文本按顺序拼接，得到该行的去和弦文本。
    #[must_use]
    pub fn text(&self) -> String {
        self.segments.iter().map(|seg| seg.text.as_str()).collect()
    }

    /// 返回该行所有和弦断点的迭代器，每项为 `(position, chord)`。
    pub fn chord_breakpoints(&self) -> impl Iterator<Item = (usize, &str)> {
        self.segments
            .iter()
            .filter_map(|seg| seg.chord.as_deref().map(|chord| (seg.position, chord)))
    }
}

/// 表示一个歌曲段落（主歌、副歌等）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// 段落类型。
    pub section_type: SectionType,
    /// 人类可读的段落标签，例如 "Verse 1" 或 "Chorus"。
    pub label: String,
    /// 段落内的行列表。
    pub lines: Vec<Line>,
    /// 该类型在文档内的出现序号（从 1 开始，各类型独立计数）。
    pub index: u32,
}

/// 解析结果的根结构：歌曲元数据与有序的段落列表。
///
/// 一次解析调用构造完成后不再变动。
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedDocument {
    /// 歌曲标题。
    pub title: Option<String>,
    /// 副标题。
    pub subtitle: Option<String>,
    /// 艺术家。
    pub artist: Option<String>,
    /// 专辑名。
    pub album: Option<String>,
    /// 调性。
    pub key: Option<String>,
    /// 原调。
    pub original_key: Option<String>,
    /// 作曲者。
    pub composer: Option<String>,
    /// 作词者。
    pub lyricist: Option<String>,
    /// 编曲者。
    pub arranger: Option<String>,
    /// 版权信息。
    pub copyright: Option<String>,
    /// CCLI 编号。
    pub ccli_id: Option<String>,
    /// 速度（BPM）。
    pub tempo: Option<u32>,
    /// 变调夹品位。
    pub capo: Option<u32>,
    /// 年份。
    pub year: Option<u32>,
    /// 拍号，例如 "4/4"。
    pub time_signature: Option<String>,
    /// 有序的段落列表。
    pub sections: Vec<Section>,
    /// 原始输入文本，用于追溯。
    pub raw_text: String,
    /// 解析过程中产生的警告信息列表。
    #[serde(default)]
    pub warnings: Vec<String>,
}

/// 定义元数据指令的规范化键。
///
/// 用于在内部统一表示各种别名写法的指令，方便查询和处理。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
pub enum CanonicalDirectiveKey {
    /// 歌曲标题。
    Title,
    /// 副标题。
    Subtitle,
    /// 艺术家。
    Artist,
    /// 专辑名。
    Album,
    /// 调性。
    Key,
    /// 原调。
    OriginalKey,
    /// 作曲者。
    Composer,
    /// 作词者。
    Lyricist,
    /// 编曲者。
    Arranger,
    /// 版权信息。
    Copyright,
    /// CCLI 编号。
    CcliId,
    /// 速度（BPM，整数）。
    Tempo,
    /// 变调夹品位（整数）。
    Capo,
    /// 年份（整数）。
    Year,
    /// 拍号。
    TimeSignature,
}

impl fmt::Display for CanonicalDirectiveKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key_name = match self {
            CanonicalDirectiveKey::Title => "Title",
            CanonicalDirectiveKey::Subtitle => "Subtitle",
            CanonicalDirectiveKey::Artist => "Artist",
            CanonicalDirectiveKey::Album => "Album",
            CanonicalDirectiveKey::Key => "Key",
            CanonicalDirectiveKey::OriginalKey => "OriginalKey",
            CanonicalDirectiveKey::Composer => "Composer",
            CanonicalDirectiveKey::Lyricist => "Lyricist",
            CanonicalDirectiveKey::Arranger => "Arranger",
            CanonicalDirectiveKey::Copyright => "Copyright",
            CanonicalDirectiveKey::CcliId => "CcliId",
            CanonicalDirectiveKey::Tempo => "Tempo",
            CanonicalDirectiveKey::Capo => "Capo",
            CanonicalDirectiveKey::Year => "Year",
            CanonicalDirectiveKey::TimeSignature => "TimeSignature",
        };
        write!(f, "{key_name}")
    }
}

impl FromStr for CanonicalDirectiveKey {
    type Err = ParseCanonicalDirectiveKeyError;

    /// 从规范化后的指令名（小写、无下划线和连字符）解析规范化键。
    ///
    /// 注意 `c`/`comment` 不是元数据键，它们由段落状态机作为注释指令处理。
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "t" | "title" => Ok(Self::Title),
            "st" | "su" | "subtitle" => Ok(Self::Subtitle),
            "a" | "artist" => Ok(Self::Artist),
            "album" => Ok(Self::Album),
            "k" | "key" => Ok(Self::Key),
            "ok" | "originalkey" => Ok(Self::OriginalKey),
            "composer" => Ok(Self::Composer),
            "lyricist" => Ok(Self::Lyricist),
            "arranger" => Ok(Self::Arranger),
            "copyright" => Ok(Self::Copyright),
            "ccli" | "ccliid" | "cclinumber" => Ok(Self::CcliId),
            "tempo" | "bpm" => Ok(Self::Tempo),
            "capo" => Ok(Self::Capo),
            "year" => Ok(Self::Year),
            "time" | "timesig" | "timesignature" => Ok(Self::TimeSignature),
            _ => Err(ParseCanonicalDirectiveKeyError(s.to_string())),
        }
    }
}
