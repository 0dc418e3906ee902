// src/code_snippet.rs

/// A language-tagged code block from a bot reply. It can be copied by number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeSnippet {
    /// 1-based position among the copyable blocks of the transcript.
    pub number: usize,
    pub language: String,
    pub content: String,
}

impl CodeSnippet {
    pub fn new(number: usize, language: String, content: String) -> Self {
        Self {
            number,
            language,
            content,
        }
    }

    /// First word of a fence info string, e.g. `rust` from ```` ```rust ignore ````.
    pub fn detect_language(info: &str) -> Option<String> {
        info.split_whitespace().next().map(str::to_string)
    }

    /// Cleans block text for display and copying.
    ///
    /// Trailing spaces are stripped from each line (replies carry hard-break
    /// markers), and blank lines at either end are dropped.
    pub fn clean(raw: &str) -> String {
        raw.lines()
            .map(str::trim_end)
            .collect::<Vec<_>>()
            .join("\n")
            .trim_matches('\n')
            .to_string()
    }
}

/// Copyable blocks, looked up by the number shown in their `[copy N]` label.
#[derive(Debug, Clone, Default)]
pub struct SnippetManager {
    pub snippets: Vec<CodeSnippet>,
}

impl SnippetManager {
    pub fn new(snippets: Vec<CodeSnippet>) -> Self {
        Self { snippets }
    }

    pub fn len(&self) -> usize {
        self.snippets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }

    pub fn get(&self, number: usize) -> Option<&CodeSnippet> {
        number
            .checked_sub(1)
            .and_then(|idx| self.snippets.get(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_first_word_of_info_string() {
        assert_eq!(CodeSnippet::detect_language("rust"), Some("rust".to_string()));
        assert_eq!(
            CodeSnippet::detect_language("python  title=x.py"),
            Some("python".to_string())
        );
        assert_eq!(CodeSnippet::detect_language("   "), None);
    }

    #[test]
    fn clean_strips_hard_break_markers() {
        let raw = "\nfn main() {  \n    println!(\"hi\");  \n}  \n";
        assert_eq!(
            CodeSnippet::clean(raw),
            "fn main() {\n    println!(\"hi\");\n}"
        );
    }

    #[test]
    fn lookup_is_one_based() {
        let manager = SnippetManager::new(vec![
            CodeSnippet::new(1, "rust".into(), "a".into()),
            CodeSnippet::new(2, "sh".into(), "b".into()),
        ]);
        assert_eq!(manager.get(0), None);
        assert_eq!(manager.get(2).map(|s| s.content.as_str()), Some("b"));
        assert_eq!(manager.get(3), None);
    }
}
