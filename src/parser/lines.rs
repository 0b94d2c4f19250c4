use std::sync::LazyLock;

use regex::Regex;

static HEXAGRAM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^([0-9０-９]{2})\x{3000}(.*)$").unwrap());
// Wider than the canonical tokens; near-misses become `Line::StrayToken`.
static LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([初九六上用][九六二三四五])[:：;；,，](.*)$").unwrap());

/// Separator written into every line label, whatever the source used.
pub const LABEL_SEPARATOR: char = '：';

/// One of the six line positions, or the "use nine / use six" variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LinePosition {
    First,
    Second,
    Third,
    Fourth,
    Fifth,
    Top,
    AllLines,
}

impl LinePosition {
    /// Yang and yin forms of a position share one key.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "初九" | "初六" => Some(Self::First),
            "九二" | "六二" => Some(Self::Second),
            "九三" | "六三" => Some(Self::Third),
            "九四" | "六四" => Some(Self::Fourth),
            "九五" | "六五" => Some(Self::Fifth),
            "上九" | "上六" => Some(Self::Top),
            "用九" | "用六" => Some(Self::AllLines),
            _ => None,
        }
    }

    pub fn key(self) -> u8 {
        match self {
            Self::First => 1,
            Self::Second => 2,
            Self::Third => 3,
            Self::Fourth => 4,
            Self::Fifth => 5,
            Self::Top => 6,
            Self::AllLines => 7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// `01　乾为天`
    Hexagram { id: u8, name: String },
    /// `初九：潜龙，勿用。`
    LineHeader {
        position: LinePosition,
        token: String,
        rest: String,
    },
    /// Shaped like a line header but the token is not a real position.
    StrayToken { token: String, text: String },
    Text(String),
    Empty,
}

impl Line {
    /// Label stored on the line entry: token, separator, remainder.
    pub fn label(token: &str, rest: &str) -> String {
        format!("{}{}{}", token, LABEL_SEPARATOR, rest)
    }
}

/// Two-digit counter, ASCII or full-width digits.
fn parse_counter(digits: &str) -> Option<u8> {
    digits.chars().try_fold(0u8, |acc, c| {
        let d = match c {
            '0'..='9' => c as u32 - '0' as u32,
            '０'..='９' => c as u32 - '０' as u32,
            _ => return None,
        };
        acc.checked_mul(10)?.checked_add(d as u8)
    })
}

pub fn classify_line(raw: &str) -> Line {
    let line = raw.trim();
    if line.is_empty() {
        return Line::Empty;
    }

    if let Some(caps) = HEXAGRAM_RE.captures(line) {
        if let Some(id @ 1..=64) = parse_counter(&caps[1]) {
            return Line::Hexagram {
                id,
                name: caps[2].trim().to_string(),
            };
        }
    }

    if let Some(caps) = LINE_RE.captures(line) {
        let token = caps[1].to_string();
        return match LinePosition::from_token(&token) {
            Some(position) => Line::LineHeader {
                position,
                token,
                rest: caps[2].trim().to_string(),
            },
            None => Line::StrayToken {
                token,
                text: line.to_string(),
            },
        };
    }

    Line::Text(line.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hexagram_header() {
        let line = classify_line("01　乾为天");
        assert_eq!(
            line,
            Line::Hexagram {
                id: 1,
                name: "乾为天".into()
            }
        );
    }

    #[test]
    fn hexagram_header_surrounding_whitespace() {
        let line = classify_line("  64　火水未济  \r");
        assert!(matches!(line, Line::Hexagram { id: 64, name } if name == "火水未济"));
    }

    #[test]
    fn hexagram_counter_out_of_range_is_text() {
        assert!(matches!(classify_line("00　序"), Line::Text(_)));
        assert!(matches!(classify_line("65　附录"), Line::Text(_)));
    }

    #[test]
    fn full_width_counter() {
        assert!(matches!(classify_line("０１　乾为天"), Line::Hexagram { id: 1, name } if name == "乾为天"));
        assert!(matches!(classify_line("6４　火水未济"), Line::Hexagram { id: 64, .. }));
        assert!(matches!(classify_line("６５　附录"), Line::Text(_)));
    }

    #[test]
    fn ascii_space_is_not_a_header() {
        assert!(matches!(classify_line("01 乾为天"), Line::Text(_)));
    }

    #[test]
    fn line_header_separators() {
        for sep in [":", "：", ";", "；", ",", "，"] {
            let line = classify_line(&format!("初九{} 潜龙，勿用。", sep));
            assert!(
                matches!(&line, Line::LineHeader { position: LinePosition::First, token, rest }
                    if token == "初九" && rest == "潜龙，勿用。"),
                "separator {sep:?} gave {line:?}"
            );
        }
    }

    #[test]
    fn yin_and_yang_share_a_key() {
        for (token, key) in [
            ("初六", 1),
            ("九二", 2),
            ("六三", 3),
            ("九四", 4),
            ("六五", 5),
            ("上九", 6),
            ("用六", 7),
        ] {
            assert_eq!(LinePosition::from_token(token).map(LinePosition::key), Some(key));
        }
    }

    #[test]
    fn stray_token() {
        let line = classify_line("初二：不是爻辞");
        assert!(matches!(line, Line::StrayToken { token, .. } if token == "初二"));
    }

    #[test]
    fn token_without_separator_is_text() {
        assert!(matches!(classify_line("初九潜龙"), Line::Text(_)));
    }

    #[test]
    fn blank_line() {
        assert_eq!(classify_line("　 \t"), Line::Empty);
    }

    #[test]
    fn label_uses_full_width_colon() {
        assert_eq!(Line::label("用九", "见群龙无首，吉。"), "用九：见群龙无首，吉。");
    }
}
