//! Page chrome and small HTML components shared by the console pages.

use backfill_console_core::backfill::paths;

/// Breadcrumb entry.
#[derive(Debug, Clone)]
pub struct Link {
    pub label: String,
    pub href: String,
}

impl Link {
    pub fn new(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: href.into(),
        }
    }
}

/// Options for [`base_template`].
#[derive(Debug, Clone, Default)]
pub struct Page<'a> {
    pub title: &'a str,
    pub product: &'a str,
    pub breadcrumbs: &'a [Link],
    /// Seconds between automatic reloads; `None` or zero disables.
    pub auto_reload_secs: Option<u64>,
}

/// Base HTML template.
pub fn base_template(page: &Page<'_>, content: &str) -> String {
    let refresh = match page.auto_reload_secs {
        Some(secs) if secs > 0 => format!(r#"<meta http-equiv="refresh" content="{}">"#, secs),
        _ => String::new(),
    };

    let crumbs = if page.breadcrumbs.is_empty() {
        String::new()
    } else {
        let items: Vec<String> = page
            .breadcrumbs
            .iter()
            .map(|link| {
                format!(
                    r#"<li><a href="{}">{}</a></li>"#,
                    html_escape(&link.href),
                    html_escape(&link.label)
                )
            })
            .collect();
        format!(
            r#"<nav class="breadcrumbs" aria-label="Breadcrumb"><ol>{}</ol></nav>"#,
            items.join("")
        )
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    {refresh}
    <title>{title}</title>
</head>
<body>
    <div class="dashboard">
        <nav class="sidebar">
            <div class="sidebar-header">
                <h1><a href="{services}">{product}</a></h1>
                <span class="version">v{version}</span>
            </div>
        </nav>
        <main class="content">
            {crumbs}
            <div class="content-body">
                {content}
            </div>
        </main>
    </div>
</body>
</html>"#,
        refresh = refresh,
        title = html_escape(page.title),
        services = paths::SERVICES_PATH,
        product = html_escape(page.product),
        version = env!("CARGO_PKG_VERSION"),
        crumbs = crumbs,
        content = content,
    )
}

/// Bordered panel around a page section.
pub fn card(content: &str) -> String {
    format!(r#"<div class="card">{}</div>"#, content)
}

/// Page heading with a subtitle and optional trailing controls.
pub fn page_title(title: &str, subtitle: &str, detail: &str, controls: &str) -> String {
    format!(
        r#"<header class="page-title">
    <div>
        <h2>{title} <span class="subtitle">{subtitle}</span></h2>
        <p class="detail">{detail}</p>
    </div>
    <div class="page-controls">{controls}</div>
</header>"#,
        title = html_escape(title),
        subtitle = html_escape(subtitle),
        detail = html_escape(detail),
        controls = controls,
    )
}

/// Red alert box with a single button. `on_click` is inline script.
pub fn alert_error(message: &str, label: &str, on_click: &str) -> String {
    format!(
        r#"<div class="alert alert-error" role="alert">
    <p class="alert-message">{message}</p>
    <button type="button" class="btn btn-secondary" onclick="{on_click}">{label}</button>
</div>"#,
        message = html_escape(message),
        on_click = html_escape(on_click),
        label = html_escape(label),
    )
}

/// Escape text for use in element content and quoted attributes.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_base_template_auto_reload() {
        let page = Page {
            title: "T",
            product: "P",
            breadcrumbs: &[],
            auto_reload_secs: Some(5),
        };
        let html = base_template(&page, "<p>body</p>");
        assert!(html.contains(r#"<meta http-equiv="refresh" content="5">"#));
        assert!(html.contains("<p>body</p>"));

        let page = Page {
            auto_reload_secs: Some(0),
            ..page
        };
        assert!(!base_template(&page, "").contains("http-equiv"));
    }

    #[test]
    fn test_breadcrumbs_are_escaped() {
        let crumbs = [Link::new("a<b", "/x?y=1&z=2")];
        let page = Page {
            title: "T",
            product: "P",
            breadcrumbs: &crumbs,
            auto_reload_secs: None,
        };
        let html = base_template(&page, "");
        assert!(html.contains(r#"<a href="/x?y=1&amp;z=2">a&lt;b</a>"#));
    }

    #[test]
    fn test_alert_error() {
        let html = alert_error("boom <x>", "Try Again", "history.back(); return false;");
        assert!(html.contains("boom &lt;x&gt;"));
        assert!(html.contains(r#"onclick="history.back(); return false;""#));
    }
}
