use crate::error::{QuireError, Result};
use crate::types::Frontmatter;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd, html};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

const HIGHLIGHT_THEME: &str = "InspiredGitHub";

pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme: Theme,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        let mut theme_set = ThemeSet::load_defaults();
        let theme = theme_set
            .themes
            .remove(HIGHLIGHT_THEME)
            .unwrap_or_default();
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme,
        }
    }

    pub fn render(&self, source: &str) -> String {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);

        let mut events = Vec::new();
        let mut code_block: Option<(Option<String>, String)> = None;

        for event in Parser::new_ext(source, options) {
            if let Some((language, buffer)) = code_block.as_mut() {
                match event {
                    Event::Text(text) => buffer.push_str(&text),
                    Event::End(TagEnd::CodeBlock) => {
                        let highlighted = self.highlight(language.as_deref(), buffer);
                        events.push(Event::Html(highlighted.into()));
                        code_block = None;
                    }
                    _ => {}
                }
                continue;
            }

            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let language = match kind {
                        CodeBlockKind::Fenced(language) if !language.is_empty() => {
                            Some(language.to_string())
                        }
                        _ => None,
                    };
                    code_block = Some((language, String::new()));
                }
                other => events.push(other),
            }
        }

        let mut output = String::with_capacity(source.len() * 3 / 2);
        html::push_html(&mut output, events.into_iter());
        output
    }

    fn highlight(&self, language: Option<&str>, code: &str) -> String {
        let syntax = language.and_then(|token| self.syntax_set.find_syntax_by_token(token));
        match syntax {
            Some(syntax) => highlighted_html_for_string(code, &self.syntax_set, syntax, &self.theme)
                .unwrap_or_else(|_| plain_code_block(language, code)),
            None => plain_code_block(language, code),
        }
    }
}

fn plain_code_block(language: Option<&str>, code: &str) -> String {
    match language {
        Some(language) => format!(
            "<pre><code class=\"language-{}\">{}</code></pre>",
            escape_html(language),
            escape_html(code)
        ),
        None => format!("<pre><code>{}</code></pre>", escape_html(code)),
    }
}

fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub fn extract_frontmatter(content: &str, path: &Path) -> Result<(Frontmatter, String)> {
    let content = content.replace("\r\n", "\n");
    let content = content.trim_start();

    if let Some(rest) = content.strip_prefix("+++") {
        let (header, body) = split_header(rest, "+++", path)?;
        let raw: HashMap<String, Value> =
            toml::from_str(header).map_err(|error| QuireError::TomlParse {
                path: path.to_path_buf(),
                message: error.to_string(),
            })?;
        Ok((Frontmatter { raw }, body))
    } else if let Some(rest) = content.strip_prefix("---") {
        let (header, body) = split_header(rest, "---", path)?;
        let raw: HashMap<String, Value> = if header.trim().is_empty() {
            HashMap::new()
        } else {
            serde_yml::from_str(header).map_err(|error| QuireError::YamlParse {
                path: path.to_path_buf(),
                message: error.to_string(),
            })?
        };
        Ok((Frontmatter { raw }, body))
    } else {
        Ok((Frontmatter::default(), content.to_string()))
    }
}

fn split_header<'a>(rest: &'a str, delimiter: &str, path: &Path) -> Result<(&'a str, String)> {
    let mut position = 0;

    for line in rest.split_inclusive('\n') {
        if line.trim() == delimiter {
            let body = &rest[position + line.len()..];
            return Ok((&rest[..position], body.trim().to_string()));
        }
        position += line.len();
    }

    Err(QuireError::InvalidFrontmatter {
        path: path.to_path_buf(),
    })
}

pub fn extract_summary(source: &str, max_chars: usize) -> Option<String> {
    let first_paragraph = source
        .split("\n\n")
        .map(str::trim)
        .find(|paragraph| !paragraph.is_empty() && !paragraph.starts_with("```"))?;

    let text: String = first_paragraph
        .chars()
        .filter(|character| !['#', '*', '_', '`', '[', ']', '(', ')'].contains(character))
        .map(|character| if character == '\n' { ' ' } else { character })
        .collect();
    let text = text.trim();

    if text.chars().count() <= max_chars {
        return Some(text.to_string());
    }

    let truncated: String = text.chars().take(max_chars).collect();
    let cut = truncated.rfind(' ').unwrap_or(truncated.len());
    Some(format!("{}...", truncated[..cut].trim_end()))
}

/// Parses a front matter date, returning the calendar date and, when a time
/// of day was present, the full creation instant.
pub fn parse_content_date(value: &str) -> Option<(NaiveDate, Option<NaiveDateTime>)> {
    let value = value.trim();

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some((date, None));
    }

    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        let naive = instant.naive_local();
        return Some((naive.date(), Some(naive)));
    }

    const FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];
    FORMATS.iter().find_map(|format| {
        NaiveDateTime::parse_from_str(value, format)
            .ok()
            .map(|naive| (naive.date(), Some(naive)))
    })
}

pub fn slugify(text: &str) -> String {
    let ascii = deunicode::deunicode(text.trim()).to_lowercase();
    let mut slug = String::with_capacity(ascii.len());

    for character in ascii.chars() {
        let mapped = match character {
            ' ' | '-' => '-',
            'a'..='z' | '0'..='9' => character,
            _ => continue,
        };
        if mapped == '-' && slug.ends_with('-') {
            continue;
        }
        slug.push(mapped);
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_render_markdown() {
        let renderer = MarkdownRenderer::new();
        let output = renderer.render("# Hello\n\nThis is **bold**.");
        assert!(output.contains("<h1>Hello</h1>"));
        assert!(output.contains("<strong>bold</strong>"));
    }

    #[test]
    fn test_render_code_block_without_language() {
        let renderer = MarkdownRenderer::new();
        let output = renderer.render("```\na < b\n```");
        assert!(output.contains("<pre><code>a &lt; b"));
    }

    #[test]
    fn test_render_code_block_unknown_language() {
        let renderer = MarkdownRenderer::new();
        let output = renderer.render("```nosuchlang\nx\n```");
        assert!(output.contains("language-nosuchlang"));
    }

    #[test]
    fn test_render_highlighted_code() {
        let renderer = MarkdownRenderer::new();
        let output = renderer.render("```rust\nfn main() {}\n```");
        assert!(output.contains("main"));
        assert!(output.contains("<pre"));
    }

    #[test]
    fn test_toml_frontmatter() {
        let content = "+++\ntitle = \"Test\"\n+++\n\nBody content";
        let (fm, body) = extract_frontmatter(content, &PathBuf::from("test.md")).unwrap();
        assert_eq!(fm.get_string("title"), Some("Test".to_string()));
        assert_eq!(body, "Body content");
    }

    #[test]
    fn test_yaml_frontmatter_with_dashes_in_body() {
        let content = "---\ntitle: Test\ntags: [a, b]\n---\n\nContent with --- dashes";
        let (fm, body) = extract_frontmatter(content, &PathBuf::from("test.md")).unwrap();
        assert_eq!(fm.get_string("title"), Some("Test".to_string()));
        assert_eq!(fm.get_list("tags").unwrap(), vec!["a", "b"]);
        assert!(body.contains("---"));
    }

    #[test]
    fn test_unterminated_frontmatter() {
        let result = extract_frontmatter("+++\ntitle = \"x\"\n", &PathBuf::from("x.md"));
        assert!(matches!(result, Err(QuireError::InvalidFrontmatter { .. })));
    }

    #[test]
    fn test_no_frontmatter() {
        let (fm, body) = extract_frontmatter("just text", &PathBuf::from("x.md")).unwrap();
        assert!(fm.raw.is_empty());
        assert_eq!(body, "just text");
    }

    #[test]
    fn test_extract_summary() {
        let summary = extract_summary("First *paragraph*.\n\nSecond.", 100);
        assert_eq!(summary.as_deref(), Some("First paragraph."));
    }

    #[test]
    fn test_extract_summary_truncates_on_word() {
        let summary = extract_summary("one two three four five six", 12).unwrap();
        assert_eq!(summary, "one two...");
        assert!(extract_summary("   ", 10).is_none());
    }

    #[test]
    fn test_parse_content_date() {
        let (date, created) = parse_content_date("2015-01-12").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2015, 1, 12).unwrap());
        assert!(created.is_none());

        let (date, created) = parse_content_date("2015-01-12 10:55").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2015, 1, 12).unwrap());
        assert_eq!(created.unwrap().format("%H:%M").to_string(), "10:55");

        assert!(parse_content_date("2015-01-12T08:00:00+05:30").is_some());
        assert!(parse_content_date("12/01/2015").is_none());
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("  Rust -- is  Fun! "), "rust-is-fun");
        assert_eq!(slugify("Café déjà vu"), "cafe-deja-vu");
    }
}
