use ammonia::clean_text;

use crate::models::article::Article;
use crate::rendering::blocks::{blocks, Block};

/// Image shown when an article has none.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

/// Render an article body to HTML, one element per block.
///
/// All text goes through `ammonia::clean_text`, which escapes every
/// character with meaning in HTML (whitespace included), so the body
/// cannot inject markup.
pub fn render_content(content: &str) -> String {
    let mut html = String::new();
    for block in blocks(content) {
        push_block(&mut html, &block);
    }
    html
}

fn push_block(html: &mut String, block: &Block) {
    match block {
        Block::Paragraph { text } => html.push_str(&format!("<p>{}</p>", clean_text(text))),
        Block::Heading { text } => html.push_str(&format!("<h2>{}</h2>", clean_text(text))),
        Block::BulletList { items } => push_list(html, "ul", items),
        Block::NumberedList { items } => push_list(html, "ol", items),
    }
}

fn push_list(html: &mut String, tag: &str, items: &[String]) {
    html.push_str(&format!("<{tag}>"));
    for item in items {
        html.push_str(&format!("<li>{}</li>", clean_text(item)));
    }
    html.push_str(&format!("</{tag}>"));
}

/// Render the card shown in the article list.
///
/// The read time is only shown on the selected card.
pub fn render_card(article: &Article, selected: bool) -> String {
    let mut html = format!(
        r#"<a class="card{}" href="/?selected={id}"><div class="card-meta"><span class="{}">{}</span><span class="date">{}</span></div><h3>{}</h3><p>{}</p>"#,
        if selected { " card-selected" } else { "" },
        article.category.badge_class(),
        clean_text(article.category.as_str()),
        clean_text(&article.date),
        clean_text(&article.title),
        clean_text(&article.description),
        id = article.id,
    );
    if selected {
        html.push_str(&format!(
            r#"<p class="read-time">{}</p>"#,
            clean_text(&article.read_time)
        ));
    }
    html.push_str("</a>");
    html
}

/// Render the full article view: header, author line, image and body.
pub fn render_article(article: &Article) -> String {
    let image = if article.image.trim().is_empty() {
        PLACEHOLDER_IMAGE
    } else {
        article.image.as_str()
    };
    let initial = article
        .author_initial()
        .map(|c| c.to_string())
        .unwrap_or_default();

    format!(
        concat!(
            r#"<article class="article">"#,
            r#"<header><div class="article-meta"><span class="{badge}">{category}</span><span class="read-time">{read_time}</span></div>"#,
            r#"<h1>{title}</h1>"#,
            r#"<div class="byline"><span class="avatar">{initial}</span><div><p class="author">{author}</p><p class="role">{role}</p></div><span class="date">{date}</span></div></header>"#,
            r#"<img class="featured" src="{image}" alt="{title}" width="700" height="400">"#,
            r#"<div class="content">{content}</div>"#,
            r#"</article>"#,
        ),
        badge = article.category.badge_class(),
        category = clean_text(article.category.as_str()),
        read_time = clean_text(&article.read_time),
        title = clean_text(&article.title),
        initial = clean_text(&initial),
        author = clean_text(&article.author),
        role = clean_text(&article.author_role),
        date = clean_text(&article.date),
        image = clean_text(image),
        content = render_content(&article.content),
    )
}
