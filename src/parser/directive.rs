//! # 指令识别器
//!
//! 识别 `{name: value}` / `{name}` 形式的控制行。

use std::sync::LazyLock;

use regex::Regex;

/// 匹配被 `{` 和 `}` 包裹的指令行，捕获大括号内的内容。
/// 不处理嵌套大括号。
static DIRECTIVE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\{(?<content>.*)\}$").expect("未能编译 DIRECTIVE_REGEX"));

/// 尝试将一行解析为指令。
///
/// 输入应当已经去除首尾空白。只有同时存在 `{` 前缀和 `}` 后缀的行
/// 才被视为指令；缺少任一定界符的行返回 `None`，交由普通行分类处理。
///
/// 内容在第一个 `:` 处拆分为 `(名称, 值)`，两侧均去除空白；
/// 没有 `:` 时返回 `(内容, "")`。
///
/// # 返回
/// `Option<(String, String)>` - 指令的名称与值，或 `None`。
#[must_use]
pub fn parse_directive(line: &str) -> Option<(String, String)> {
    let caps = DIRECTIVE_REGEX.captures(line)?;
    let content = caps.name("content").map_or("", |m| m.as_str());

    match content.split_once(':') {
        Some((name, value)) => Some((name.trim().to_string(), value.trim().to_string())),
        None => Some((content.trim().to_string(), String::new())),
    }
}

/// 规范化指令名：转小写并移除下划线和连字符。
///
/// 这样 `start_of_chorus`、`Start-Of-Chorus` 与 `startofchorus`
/// 都会归一为同一形式，`pre-chorus` 与 `prechorus` 亦然。
#[must_use]
pub fn normalize_directive_name(name: &str) -> String {
    name.to_lowercase().replace(['_', '-'], "")
}
