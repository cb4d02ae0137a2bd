//! Escaping markup builder.
//!
//! Tag and attribute names are `&'static str`, so only compile-time strings
//! ever become structure. Text content and attribute values always pass
//! through [`escape`]. Trusted fragments (fixed CSS and scripts) go in via
//! [`Markup::trusted`], which also only accepts `&'static str`.

use url::Url;

pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Only `http`/`https` absolute URLs and relative references survive;
/// everything else (`javascript:`, `data:`, ...) collapses to `#`.
pub fn safe_href(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return "#".to_string();
    }
    match Url::parse(trimmed) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => url.to_string(),
        Ok(_) => "#".to_string(),
        Err(url::ParseError::RelativeUrlWithoutBase) => trimmed.to_string(),
        Err(_) => "#".to_string(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markup {
    buf: String,
}

impl Markup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn into_string(self) -> String {
        self.buf
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Escaped text node.
    pub fn text(&mut self, text: &str) -> &mut Self {
        self.buf.push_str(&escape(text));
        self
    }

    pub fn trusted(&mut self, fragment: &'static str) -> &mut Self {
        self.buf.push_str(fragment);
        self
    }

    pub fn append(&mut self, other: Markup) -> &mut Self {
        self.buf.push_str(&other.buf);
        self
    }

    pub fn open(&mut self, tag: &'static str, attrs: &[(&'static str, &str)]) -> &mut Self {
        self.buf.push('<');
        self.buf.push_str(tag);
        for (name, value) in attrs {
            self.buf.push(' ');
            self.buf.push_str(name);
            self.buf.push_str("=\"");
            self.buf.push_str(&escape(value));
            self.buf.push('"');
        }
        self.buf.push('>');
        self
    }

    pub fn close(&mut self, tag: &'static str) -> &mut Self {
        self.buf.push_str("</");
        self.buf.push_str(tag);
        self.buf.push('>');
        self
    }

    /// Element with nested content built by `body`.
    pub fn el<F>(&mut self, tag: &'static str, attrs: &[(&'static str, &str)], body: F) -> &mut Self
    where
        F: FnOnce(&mut Markup),
    {
        self.open(tag, attrs);
        body(self);
        self.close(tag)
    }

    /// Element whose only child is escaped text.
    pub fn text_el(&mut self, tag: &'static str, attrs: &[(&'static str, &str)], text: &str) -> &mut Self {
        self.open(tag, attrs);
        self.text(text);
        self.close(tag)
    }

    /// Link with a sanitized href; opens in a new tab like every outbound link on the site.
    pub fn link(&mut self, href: &str, text: &str) -> &mut Self {
        let href = safe_href(href);
        self.text_el(
            "a",
            &[("href", &href), ("target", "_blank"), ("rel", "noopener noreferrer")],
            text,
        )
    }
}

/// Render `items` as a `<ul>` using `format` for each `<li>`, or a single
/// empty-state paragraph when there is nothing to show.
pub fn render_list<T, F>(items: &[T], empty_message: &str, mut format: F) -> Markup
where
    F: FnMut(&mut Markup, &T),
{
    let mut m = Markup::new();
    if items.is_empty() {
        m.text_el("p", &[("class", "empty")], empty_message);
        return m;
    }
    m.el("ul", &[("class", "items")], |m| {
        for item in items {
            m.el("li", &[], |m| format(m, item));
        }
    });
    m
}
