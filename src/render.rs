// src/render.rs
//! Serializes a [`DigestDocument`] into one self-contained HTML page with an
//! embedded stylesheet carrying the e-reader pagination hints.

use std::fmt::Write;

use crate::digest::{effective_content, strip_tags, table_of_contents, DigestDocument};

const STYLESHEET: &str = r#"
body {
    font-family: Georgia, serif;
    line-height: 1.6;
    max-width: 800px;
    margin: 0 auto;
    padding: 20px;
}
h1 {
    color: #333;
    border-bottom: 3px solid #333;
    padding-bottom: 10px;
    page-break-after: avoid;
}
h2 {
    color: #555;
    margin-top: 40px;
    border-bottom: 2px solid #ddd;
    padding-bottom: 5px;
    page-break-after: avoid;
}
.article {
    margin-bottom: 40px;
    padding-bottom: 20px;
    border-bottom: 2px solid #ddd;
    page-break-inside: avoid;
}
.article-title {
    font-size: 20px;
    font-weight: bold;
    color: #000;
    margin-bottom: 8px;
    page-break-after: avoid;
}
.article-meta {
    color: #666;
    font-size: 14px;
    margin-bottom: 15px;
    font-style: italic;
}
.article-content {
    color: #333;
    text-align: justify;
    margin-bottom: 15px;
}
.article-link {
    color: #0066cc;
    text-decoration: none;
    font-size: 14px;
    display: block;
    margin-top: 10px;
}
.source-divider {
    margin: 50px 0 30px 0;
    page-break-before: always;
}
.toc {
    margin: 30px 0;
    padding: 20px;
    background-color: #f9f9f9;
    border: 1px solid #ddd;
    page-break-after: always;
}
.toc h3 {
    color: #333;
    margin-top: 20px;
    margin-bottom: 10px;
    font-size: 18px;
}
.toc-item {
    margin-bottom: 15px;
    padding-bottom: 10px;
    border-bottom: 1px solid #e0e0e0;
}
.toc-title {
    font-weight: bold;
    color: #0066cc;
    text-decoration: none;
    display: block;
    margin-bottom: 5px;
}
.toc-summary {
    font-size: 14px;
    color: #666;
    line-height: 1.4;
}
"#;

fn esc(s: &str) -> String {
    html_escape::encode_text(s).to_string()
}

fn esc_attr(s: &str) -> String {
    html_escape::encode_double_quoted_attribute(s).to_string()
}

/// Render the digest. Output depends only on the document, so rendering the
/// same document twice is byte-identical.
pub fn render(doc: &DigestDocument) -> String {
    let date = doc.generated_at.format("%B %d, %Y").to_string();
    let mut html = String::with_capacity(16 * 1024);

    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">\n\
         <title>Daily News Digest - {date}</title>\n<style>{STYLESHEET}</style>\n\
         </head>\n<body>\n<h1>Daily News Digest</h1>\n\
         <p style=\"color: #666; font-style: italic;\">{date}</p>\n",
        date = esc(&date),
    );

    // Table of contents, one subsection per feed that produced articles.
    html.push_str("<div class=\"toc\">\n<h2>Table of Contents</h2>\n");
    for section in table_of_contents(doc) {
        let _ = writeln!(html, "<h3>{}</h3>", esc(&section.source_name));
        for entry in &section.entries {
            let _ = write!(
                html,
                "<div class=\"toc-item\">\n\
                 <a href=\"#article-{id}\" class=\"toc-title\">{title}</a>\n\
                 <div class=\"toc-summary\">{summary}</div>\n</div>\n",
                id = entry.id,
                title = esc(&entry.title),
                summary = esc(&entry.short_summary),
            );
        }
    }
    html.push_str("</div>\n");

    // Article bodies. The id counter retraces the TOC assignment exactly.
    let mut counter = 0usize;
    let mut first_section = true;
    for section in &doc.sections {
        if section.articles.is_empty() {
            continue;
        }
        let divider_class = if first_section { "" } else { " class=\"source-divider\"" };
        first_section = false;
        let _ = writeln!(html, "<h2{divider_class}>{}</h2>", esc(&section.source.name));

        for article in &section.articles {
            counter += 1;
            let content = strip_tags(&effective_content(article));
            let formatted: String = content
                .split("\n\n")
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(|p| format!("<p>{}</p>", esc(p)))
                .collect();

            let _ = write!(
                html,
                "<div class=\"article\" id=\"article-{id}\">\n\
                 <div class=\"article-title\">{title}</div>\n\
                 <div class=\"article-meta\">{meta}</div>\n\
                 <div class=\"article-content\">{content}</div>\n\
                 <a href=\"{href}\" class=\"article-link\">Original article: {link}</a>\n\
                 </div>\n",
                id = counter,
                title = esc(&article.title),
                meta = esc(&article.published),
                content = formatted,
                href = esc_attr(&article.link),
                link = esc(&article.link),
            );
        }
    }

    html.push_str("</body>\n</html>\n");
    html
}
