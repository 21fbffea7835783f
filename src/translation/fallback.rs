//! 静态兜底翻译表
//!
//! 上游不可用或返回无效结果时使用。

/// 短语 → (语言, 译文)
const FALLBACK_TABLE: &[(&str, &[(&str, &str)])] = &[
    (
        "hello world",
        &[("fr", "bonjour le monde"), ("es", "hola mundo"), ("de", "hallo welt")],
    ),
    ("hello", &[("fr", "bonjour"), ("es", "hola"), ("de", "hallo")]),
    (
        "good morning",
        &[("fr", "bonjour"), ("es", "buenos días"), ("de", "guten morgen")],
    ),
    (
        "i love programming",
        &[
            ("fr", "j'adore programmer"),
            ("es", "me encanta programar"),
            ("de", "ich liebe Programmierung"),
        ],
    ),
    ("thank you", &[("fr", "merci"), ("es", "gracias"), ("de", "danke")]),
    (
        "how are you",
        &[("fr", "comment ça va"), ("es", "cómo estás"), ("de", "wie geht es dir")],
    ),
    (
        "goodbye",
        &[("fr", "au revoir"), ("es", "adiós"), ("de", "auf wiedersehen")],
    ),
];

/// 在兜底表中查找译文，短语忽略大小写和首尾空白
pub fn lookup(text: &str, target_lang: &str) -> Option<&'static str> {
    let phrase = text.trim().to_lowercase();
    FALLBACK_TABLE
        .iter()
        .find(|(known, _)| *known == phrase)
        .and_then(|(_, translations)| {
            translations
                .iter()
                .find(|(lang, _)| *lang == target_lang)
                .map(|(_, translated)| *translated)
        })
}

/// 未命中兜底表时返回的占位文本
pub fn passthrough(text: &str, target_lang: &str) -> String {
    format!("[TEST] {} → {}", text, target_lang)
}

/// 兜底翻译：命中表返回译文，否则返回带标记的原文
pub fn mock_translation(text: &str, target_lang: &str) -> String {
    match lookup(text, target_lang) {
        Some(translated) => translated.to_string(),
        None => passthrough(text, target_lang),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_phrases() {
        assert_eq!(mock_translation("hello", "fr"), "bonjour");
        assert_eq!(mock_translation("hello", "es"), "hola");
        assert_eq!(mock_translation("hello world", "de"), "hallo welt");
        assert_eq!(mock_translation("I love programming", "fr"), "j'adore programmer");
    }

    #[test]
    fn test_lookup_normalizes_case_and_whitespace() {
        assert_eq!(lookup("  Thank You \n", "es"), Some("gracias"));
        assert_eq!(lookup("GOODBYE", "de"), Some("auf wiedersehen"));
    }

    #[test]
    fn test_unknown_phrase_is_marked() {
        let result = mock_translation("the quick brown fox", "fr");
        assert_eq!(result, "[TEST] the quick brown fox → fr");
    }

    #[test]
    fn test_unknown_language_is_marked() {
        let result = mock_translation("hello", "ja");
        assert!(result.contains("hello"));
        assert!(result.contains("ja"));
        assert!(result.starts_with("[TEST]"));
    }
}
