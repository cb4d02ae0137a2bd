use crate::logging::log_view_failed;
use crate::markup::Markup;

pub const ERROR_BANNER: &str = "Unable to load data for this page. Please try again later.";

const STYLE: &str = "body{font-family:system-ui,sans-serif;margin:0 auto;max-width:980px;padding:16px;color:#1f2328}\
h1{margin-bottom:4px}.status{color:#57606a;margin-top:0}.status.error{color:#b42318;font-weight:600}\
.empty{color:#57606a;font-style:italic}table{border-collapse:collapse;width:100%;margin:8px 0}\
th,td{border:1px solid #d0d7de;padding:4px 8px;text-align:left}th{background:#f6f8fa}\
.race-card{border:1px solid #d0d7de;border-radius:8px;padding:12px;margin:12px 0}\
.tooltip{position:absolute;pointer-events:none;background:#fff;border:1px solid #8c959f;border-radius:4px;padding:6px 8px;font-size:13px}\
.legend span{display:inline-block;width:12px;height:12px;margin:0 4px 0 12px;vertical-align:middle}\
.meta{color:#57606a;font-size:13px}";

/// One rendered HTML document: a heading, a status line, and a body.
#[derive(Debug, Clone)]
pub struct Page {
    pub title: String,
    pub status: String,
    pub body: Markup,
    pub script: Option<&'static str>,
    /// Set when the status line is the load-failure banner.
    pub failed: bool,
}

impl Page {
    pub fn new(title: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            status: status.into(),
            body: Markup::new(),
            script: None,
            failed: false,
        }
    }

    pub fn render(&self) -> String {
        let mut m = Markup::new();
        m.trusted("<!DOCTYPE html>");
        m.el("html", &[("lang", "en")], |m| {
            m.el("head", &[], |m| {
                m.open("meta", &[("charset", "utf-8")]);
                m.open(
                    "meta",
                    &[("name", "viewport"), ("content", "width=device-width, initial-scale=1")],
                );
                m.text_el("title", &[], &self.title);
                m.el("style", &[], |m| {
                    m.trusted(STYLE);
                });
            });
            m.el("body", &[], |m| {
                m.text_el("h1", &[("id", "title")], &self.title);
                let class = if self.failed { "status error" } else { "status" };
                m.text_el("p", &[("id", "status"), ("class", class)], &self.status);
                m.el("main", &[], |m| {
                    m.append(self.body.clone());
                });
                if let Some(script) = self.script {
                    m.el("script", &[], |m| {
                        m.trusted(script);
                    });
                }
            });
        });
        m.into_string()
    }
}

/// Banner page for a view whose documents failed to load.
pub fn error_page(view: &str, title: &str, err: &anyhow::Error) -> Page {
    log_view_failed(view, &format!("{:#}", err));
    Page {
        failed: true,
        ..Page::new(title, ERROR_BANNER)
    }
}
