//! Prompt templates for note analysis.
//!
//! Each builder embeds the note content verbatim into a fixed instruction.
//! Nothing is escaped here: JSON encoding happens when the request body is
//! serialized. List-style answers are parsed back with
//! [`split_list_answer`].

use std::fmt;

/// Generates a prompt asking for a short summary of a note.
pub fn summary_prompt(content: &str) -> String {
    format!(
        "请为以下技术笔记生成一个简洁的摘要，突出核心知识点和要点，控制在200字以内：\n\n{}",
        content
    )
}

/// Generates a prompt asking for 3-5 comma-separated categories.
pub fn category_prompt(content: &str) -> String {
    format!(
        "请分析以下技术笔记内容，建议3-5个合适的分类标签，用逗号分隔：\n\n{}",
        content
    )
}

/// Generates a prompt asking for 5-10 comma-separated tags.
pub fn tags_prompt(content: &str) -> String {
    format!(
        "请为以下技术笔记推荐5-10个相关的技术标签，用逗号分隔：\n\n{}",
        content
    )
}

pub fn optimize_prompt(content: &str) -> String {
    format!(
        "请帮助优化以下技术笔记内容，使其更加清晰、有条理、易于理解：\n\n{}",
        content
    )
}

/// Generates a prompt explaining `code`, fenced with the detected language.
pub fn explain_code_prompt(code: &str, language: CodeLanguage) -> String {
    let lang = language.as_str();
    format!(
        "请详细解释以下{}代码的功能、实现原理和关键技术点：\n\n```{}\n{}\n```",
        lang, lang, code
    )
}

pub fn outline_prompt(content: &str) -> String {
    format!(
        "请为以下技术内容生成一个清晰的大纲结构，包含主要章节和子章节：\n\n{}",
        content
    )
}

pub fn find_errors_prompt(content: &str) -> String {
    format!(
        "请仔细检查以下技术内容，指出可能存在的错误、不准确的地方或可以改进的地方：\n\n{}",
        content
    )
}

/// Generates a prompt asking for 5-8 comma-separated related topics.
pub fn related_topics_prompt(content: &str) -> String {
    format!(
        "请分析以下技术内容，推荐5-8个相关的技术主题或概念，用逗号分隔：\n\n{}",
        content
    )
}

/// Programming language guessed from a code snippet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeLanguage {
    Java,
    JavaScript,
    Python,
    Cpp,
    Sql,
    Unknown,
}

impl CodeLanguage {
    pub fn as_str(&self) -> &'static str {
        match self {
            CodeLanguage::Java => "Java",
            CodeLanguage::JavaScript => "JavaScript",
            CodeLanguage::Python => "Python",
            CodeLanguage::Cpp => "C++",
            CodeLanguage::Sql => "SQL",
            CodeLanguage::Unknown => "unknown",
        }
    }
}

impl fmt::Display for CodeLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Guesses the language of a snippet with substring heuristics.
///
/// Rules are checked in order over the lower-cased content and the first
/// match wins, so `import java` beats the Python `import ` rule.
pub fn detect_code_language(content: &str) -> CodeLanguage {
    let lower = content.to_lowercase();

    if lower.contains("public class") || lower.contains("import java") {
        CodeLanguage::Java
    } else if lower.contains("function") && lower.contains("var") {
        CodeLanguage::JavaScript
    } else if lower.contains("def ") || lower.contains("import ") {
        CodeLanguage::Python
    } else if lower.contains("#include") || lower.contains("int main") {
        CodeLanguage::Cpp
    } else if lower.contains("select") && lower.contains("from") {
        CodeLanguage::Sql
    } else {
        CodeLanguage::Unknown
    }
}

/// Splits a list answer on ASCII or full-width commas.
///
/// Segments are trimmed and empty ones dropped. Order is kept and duplicates
/// are not removed.
pub fn split_list_answer(answer: &str) -> Vec<String> {
    answer
        .split(|c: char| c == ',' || c == '，')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompts_embed_content_verbatim() {
        let content = "二分查找 \"quoted\" {braces}";
        for prompt in [
            summary_prompt(content),
            category_prompt(content),
            tags_prompt(content),
            optimize_prompt(content),
            outline_prompt(content),
            find_errors_prompt(content),
            related_topics_prompt(content),
        ] {
            assert!(prompt.ends_with(content), "prompt: {}", prompt);
        }
    }

    #[test]
    fn test_list_prompts_ask_for_commas() {
        assert!(category_prompt("x").contains("用逗号分隔"));
        assert!(tags_prompt("x").contains("用逗号分隔"));
        assert!(related_topics_prompt("x").contains("用逗号分隔"));
    }

    #[test]
    fn test_explain_code_prompt_fences_language() {
        let prompt = explain_code_prompt("SELECT 1", CodeLanguage::Sql);
        assert!(prompt.contains("以下SQL代码"));
        assert!(prompt.contains("```SQL\nSELECT 1\n```"));
    }

    #[test]
    fn test_detect_java() {
        assert_eq!(
            detect_code_language("public class Foo { }"),
            CodeLanguage::Java
        );
        assert_eq!(
            detect_code_language("import java.util.List;"),
            CodeLanguage::Java
        );
    }

    #[test]
    fn test_detect_javascript() {
        assert_eq!(
            detect_code_language("function f() { var x = 1; }"),
            CodeLanguage::JavaScript
        );
    }

    #[test]
    fn test_detect_python() {
        assert_eq!(
            detect_code_language("def add(a, b):\n    return a + b"),
            CodeLanguage::Python
        );
        assert_eq!(detect_code_language("import os"), CodeLanguage::Python);
    }

    #[test]
    fn test_detect_cpp() {
        assert_eq!(
            detect_code_language("#include <stdio.h>"),
            CodeLanguage::Cpp
        );
        assert_eq!(
            detect_code_language("int main() { return 0; }"),
            CodeLanguage::Cpp
        );
    }

    #[test]
    fn test_detect_sql_case_insensitive() {
        assert_eq!(detect_code_language("SELECT * FROM t"), CodeLanguage::Sql);
    }

    #[test]
    fn test_detect_unknown() {
        assert_eq!(
            detect_code_language("just some prose"),
            CodeLanguage::Unknown
        );
        assert_eq!(CodeLanguage::Unknown.to_string(), "unknown");
    }

    #[test]
    fn test_detect_first_rule_wins() {
        // Matches both the Java and the Python import rules.
        assert_eq!(
            detect_code_language("import java.io.File;\ndef "),
            CodeLanguage::Java
        );
        // "function" + "var" plus a SQL select: JavaScript is checked first.
        assert_eq!(
            detect_code_language("function q() { var s = 'select a from b'; }"),
            CodeLanguage::JavaScript
        );
    }

    #[test]
    fn test_split_mixed_commas() {
        assert_eq!(split_list_answer("A, B，C ,  "), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_split_keeps_order_and_duplicates() {
        assert_eq!(
            split_list_answer("rust,go,rust"),
            vec!["rust", "go", "rust"]
        );
    }

    #[test]
    fn test_split_empty_answer() {
        assert!(split_list_answer("").is_empty());
        assert!(split_list_answer(" ,，, ").is_empty());
    }

    #[test]
    fn test_split_chinese_tags() {
        assert_eq!(
            split_list_answer("算法, 二分查找,数据结构"),
            vec!["算法", "二分查找", "数据结构"]
        );
    }
}
