//! Markdown post parsing and rendering.
//!
//! Posts are markdown files with an optional author front-matter block:
//!
//! ```text
//! ---
//! author: Jane Doe
//! ---
//!
//! # Post title
//!
//! Body...
//! ```
//!
//! Everything here is a pure text transform; the API layer owns the
//! filesystem reads.

use pulldown_cmark::{html, Options, Parser};

/// Author used when a post carries no front-matter block.
pub const DEFAULT_AUTHOR: &str = "Site admin";

/// A post split into its author and markdown body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPost {
    pub author: String,
    /// Markdown content with the front-matter block removed.
    pub body: String,
}

/// Extract the author front-matter block and return the cleaned body.
///
/// The block must sit at the very start of the file: a `---` line, an
/// `author:` line, and a closing `---` line. Files without a well-formed
/// block keep their full content and get [`DEFAULT_AUTHOR`].
pub fn parse_front_matter(content: &str) -> ParsedPost {
    let Some(rest) = content.strip_prefix("---") else {
        return no_front_matter(content);
    };
    let rest = rest.trim_start_matches(['\r', '\n', ' ', '\t']);
    let Some(rest) = rest.strip_prefix("author:") else {
        return no_front_matter(content);
    };
    let Some((author_line, rest)) = rest.split_once("---") else {
        return no_front_matter(content);
    };
    let author = author_line.trim();
    if author.is_empty() {
        return no_front_matter(content);
    }
    ParsedPost {
        author: author.to_string(),
        body: rest.trim_start_matches(['\r', '\n']).to_string(),
    }
}

fn no_front_matter(content: &str) -> ParsedPost {
    ParsedPost {
        author: DEFAULT_AUTHOR.to_string(),
        body: content.to_string(),
    }
}

/// Derive a display title from a cleaned markdown body.
///
/// The first non-blank line wins; a leading chain of `#` is stripped. When
/// the body is entirely blank, `fallback` (normally the slug) is used.
pub fn derive_title(body: &str, fallback: &str) -> String {
    for line in body.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        return trimmed.trim_start_matches('#').trim().to_string();
    }
    fallback.to_string()
}

/// Render markdown to HTML.
pub fn render_markdown(body: &str) -> String {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
    let parser = Parser::new_ext(body, options);
    let mut out = String::with_capacity(body.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Compose the on-disk representation of a new post.
///
/// Mirrors what [`parse_front_matter`] reads back: author front matter,
/// a level-one heading with the title, then the body.
pub fn compose_post(author: &str, title: &str, body: &str) -> String {
    format!("---\nauthor: {author}\n---\n\n# {title}\n\n{body}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn front_matter_extracted() {
        let parsed = parse_front_matter("---\nauthor: Jane\n---\n\n# Hi\n\nBody");
        assert_eq!(parsed.author, "Jane");
        assert_eq!(parsed.body, "# Hi\n\nBody");
    }

    #[test]
    fn missing_front_matter_gets_default_author() {
        let parsed = parse_front_matter("# Hi\n\nBody");
        assert_eq!(parsed.author, DEFAULT_AUTHOR);
        assert_eq!(parsed.body, "# Hi\n\nBody");
    }

    #[test]
    fn malformed_front_matter_left_intact() {
        let content = "---\ntitle: nope\n---\nBody";
        let parsed = parse_front_matter(content);
        assert_eq!(parsed.author, DEFAULT_AUTHOR);
        assert_eq!(parsed.body, content);
    }

    #[test]
    fn empty_author_left_intact() {
        let content = "---\nauthor:\n---\nBody";
        let parsed = parse_front_matter(content);
        assert_eq!(parsed.author, DEFAULT_AUTHOR);
    }

    #[test]
    fn title_from_heading() {
        assert_eq!(derive_title("\n\n## My Title\n\nBody", "slug"), "My Title");
    }

    #[test]
    fn title_from_plain_first_line() {
        assert_eq!(derive_title("Just text\nmore", "slug"), "Just text");
    }

    #[test]
    fn title_falls_back_to_slug() {
        assert_eq!(derive_title("   \n\n", "my-slug"), "my-slug");
    }

    #[test]
    fn markdown_renders_to_html() {
        let html = render_markdown("# Hello\n\nSome *emphasis*.");
        assert!(html.contains("<h1>Hello</h1>"));
        assert!(html.contains("<em>emphasis</em>"));
    }

    #[test]
    fn compose_round_trips_through_parse() {
        let composed = compose_post("Jane", "A Title", "Body text");
        let parsed = parse_front_matter(&composed);
        assert_eq!(parsed.author, "Jane");
        assert_eq!(derive_title(&parsed.body, "slug"), "A Title");
        assert!(parsed.body.contains("Body text"));
    }
}
