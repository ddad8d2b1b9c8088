//! # Dashboard Page
//!
//! Static HTML page: one panel per chart, ECharts loaded from a CDN.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;

use charming::Chart;
use tracing::info;

pub const ECHARTS_CDN: &str = "https://cdn.jsdelivr.net/npm/echarts@5.5.1/dist/echarts.min.js";

/// Notice severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warning,
}

impl Level {
    fn class(self) -> &'static str {
        match self {
            Self::Info => "notice",
            Self::Warning => "notice warning",
        }
    }
}

/// One panel of the page
#[derive(Debug, Clone)]
pub enum Section {
    Chart {
        id: String,
        heading: String,
        /// ECharts option JSON
        option: String,
        /// Image drawn behind the chart, relative to the page
        background: Option<String>,
    },
    Notice {
        heading: String,
        level: Level,
        message: String,
    },
}

impl Section {
    pub fn chart(id: impl Into<String>, heading: impl Into<String>, chart: &Chart) -> Self {
        Self::Chart {
            id: id.into(),
            heading: heading.into(),
            option: chart.to_string(),
            background: None,
        }
    }

    pub fn notice(heading: impl Into<String>, level: Level, message: impl Into<String>) -> Self {
        Self::Notice {
            heading: heading.into(),
            level,
            message: message.into(),
        }
    }

    /// Attach a background image; no-op on notices.
    #[must_use]
    pub fn with_background(mut self, url: impl Into<String>) -> Self {
        if let Self::Chart { ref mut background, .. } = self {
            *background = Some(url.into());
        }
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct DashboardPage {
    pub title: String,
    pub subtitle: Option<String>,
    pub sections: Vec<Section>,
}

impl DashboardPage {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn push(&mut self, section: Section) {
        self.sections.push(section);
    }

    /// Render the full HTML document.
    pub fn render(&self) -> String {
        let mut html = String::new();
        let title = escape_html(&self.title);

        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        html.push_str("<meta charset=\"utf-8\">\n");
        let _ = writeln!(html, "<title>{title}</title>");
        let _ = writeln!(html, "<script src=\"{ECHARTS_CDN}\"></script>");
        html.push_str(STYLE);
        html.push_str("</head>\n<body>\n");
        let _ = writeln!(html, "<h1>{title}</h1>");
        if let Some(ref subtitle) = self.subtitle {
            let _ = writeln!(html, "<p class=\"subtitle\">{}</p>", escape_html(subtitle));
        }
        html.push_str("<main>\n");

        let mut scripts = String::new();
        for section in &self.sections {
            match section {
                Section::Chart {
                    id,
                    heading,
                    option,
                    background,
                } => {
                    let id = escape_html(id);
                    let style = background
                        .as_deref()
                        .map(|url| format!(" style=\"background-image: url('{}')\"", escape_html(url)))
                        .unwrap_or_default();
                    let _ = writeln!(
                        html,
                        "<section class=\"panel\">\n<h2>{}</h2>\n<div id=\"{id}\" class=\"chart\"{style}></div>\n</section>",
                        escape_html(heading)
                    );
                    let _ = writeln!(
                        scripts,
                        "echarts.init(document.getElementById(\"{id}\")).setOption({});",
                        escape_script(option)
                    );
                }
                Section::Notice {
                    heading,
                    level,
                    message,
                } => {
                    let _ = writeln!(
                        html,
                        "<section class=\"panel\">\n<h2>{}</h2>\n<p class=\"{}\">{}</p>\n</section>",
                        escape_html(heading),
                        level.class(),
                        escape_html(message)
                    );
                }
            }
        }

        html.push_str("</main>\n<script>\n");
        html.push_str(&scripts);
        html.push_str("</script>\n</body>\n</html>\n");
        html
    }

    pub fn write(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.render())?;
        info!(path = %path.display(), sections = self.sections.len(), "Dashboard page written");
        Ok(())
    }
}

const STYLE: &str = r"<style>
body { font-family: sans-serif; margin: 0 2rem 2rem; background: #f5f7fa; color: #1f2933; }
main { display: grid; grid-template-columns: repeat(auto-fit, minmax(520px, 1fr)); gap: 1rem; }
.panel { background: #fff; border-radius: 6px; padding: 0.5rem 1rem; box-shadow: 0 1px 3px rgba(0,0,0,0.1); }
.chart { height: 420px; background-size: 100% 100%; background-repeat: no-repeat; }
.subtitle { color: #52606d; }
.notice { color: #52606d; font-style: italic; }
.notice.warning { color: #b44d12; font-style: normal; }
</style>
";

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Keep JSON from closing the surrounding script element.
fn escape_script(json: &str) -> String {
    json.replace("</", "<\\/")
}
