//! InoSMI article sanitizer.
//!
//! [InoSMI](https://inosmi.ru) wraps the body of every article page in a
//! single `<article>` element. Anything else (the home page, rubric indexes,
//! error pages, other sites) is rejected as not an article.
//!
//! Inside the article, advertising and media blocks are dropped: scripts,
//! styles, asides, footers, figures, images and the legal disclaimer.

use super::SanitizeError;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

/// Registry key of this sanitizer.
pub const SOURCE_KEY: &str = "inosmi_ru";

static ARTICLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("article").expect("static selector is valid"));

const SKIPPED_TAGS: &[&str] = &[
    "script", "style", "noscript", "aside", "footer", "figure", "img", "svg", "iframe", "form",
];
const SKIPPED_CLASSES: &[&str] = &["article-disclaimer"];
const BLOCK_TAGS: &[&str] = &[
    "p", "div", "section", "h1", "h2", "h3", "h4", "h5", "h6", "li", "ul", "ol", "blockquote",
    "br", "header", "table", "tr",
];

/// Extract the article text from an InoSMI page, one block per line.
///
/// # Errors
///
/// [`SanitizeError::ArticleNotFound`] unless the page holds exactly one
/// `<article>` element.
pub fn sanitize(html: &str) -> Result<String, SanitizeError> {
    let document = Html::parse_document(html);
    let mut articles = document.select(&ARTICLE_SELECTOR);
    let (Some(article), None) = (articles.next(), articles.next()) else {
        debug!("page does not hold exactly one <article>");
        return Err(SanitizeError::ArticleNotFound);
    };

    let mut out = String::new();
    collect_text(article, &mut out);
    Ok(tidy_lines(&out))
}

fn is_skipped(element: &ElementRef<'_>) -> bool {
    let value = element.value();
    SKIPPED_TAGS.contains(&value.name()) || value.classes().any(|c| SKIPPED_CLASSES.contains(&c))
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            if is_skipped(&child_element) {
                continue;
            }
            let block = BLOCK_TAGS.contains(&child_element.value().name());
            if block {
                out.push('\n');
            }
            collect_text(child_element, out);
            if block {
                out.push('\n');
            }
        } else if let Some(text) = child.value().as_text() {
            out.push_str(text);
        }
    }
}

/// Collapse whitespace inside each line and drop empty lines.
fn tidy_lines(text: &str) -> String {
    text.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTICLE_PAGE: &str = r#"
        <html><head><title>ИноСМИ</title><script>var x = 1;</script></head>
        <body>
          <nav><a href="/">Главная</a></nav>
          <article class="article">
            <h1>Трамп встретился с Си</h1>
            <figure><img src="/photo.jpg"><figcaption>Фото</figcaption></figure>
            <div class="article-body">
              <p>В субботу, 29 июня, президент США Дональд Трамп <a href="/x">заявил</a>.</p>
              <script>track();</script>
              <p>За несколько часов до встречи с Си</p>
            </div>
            <div class="article-disclaimer">Материалы ИноСМИ содержат оценки</div>
            <aside>Читайте также</aside>
          </article>
          <footer>© ИноСМИ</footer>
        </body></html>
    "#;

    #[test]
    fn test_plaintext_extraction() {
        let text = sanitize(ARTICLE_PAGE).unwrap();
        assert!(text.contains("В субботу, 29 июня, президент США Дональд Трамп заявил."));
        assert!(text.contains("За несколько часов до встречи с Си"));
        assert!(text.contains("Трамп встретился с Си"));
        assert!(!text.contains('<'));
        assert!(!text.contains("track()"));
        assert!(!text.contains("Фото"));
        assert!(!text.contains("Материалы ИноСМИ"));
        assert!(!text.contains("Читайте также"));
        assert!(!text.contains("Главная"));
    }

    #[test]
    fn test_plaintext_has_no_blank_lines() {
        let text = sanitize(ARTICLE_PAGE).unwrap();
        assert!(text.lines().all(|line| !line.trim().is_empty()));
    }

    #[test]
    fn test_rejects_page_without_article() {
        let html = r#"<html><body><div><h1>Example Domain</h1>
            <p>This domain is for use in illustrative examples.</p></div></body></html>"#;
        assert_eq!(sanitize(html), Err(SanitizeError::ArticleNotFound));
    }

    #[test]
    fn test_rejects_page_with_many_articles() {
        let html = "<html><body><article>one</article><article>two</article></body></html>";
        assert_eq!(sanitize(html), Err(SanitizeError::ArticleNotFound));
    }
}
