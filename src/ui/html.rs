//! Shared HTML building blocks.

use std::fmt::Write as _;

/// Escape text for use in element content and quoted attributes.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Button visual variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ButtonVariant {
    /// Primary action button.
    #[default]
    Primary,
    /// Subtle ghost button.
    Ghost,
}

impl ButtonVariant {
    /// Get CSS classes for this variant.
    #[must_use]
    pub fn classes(self) -> &'static str {
        match self {
            Self::Primary => "bg-primary text-white hover:bg-primaryMuted",
            Self::Ghost => "bg-transparent text-textPrimary hover:bg-panel",
        }
    }
}

/// Classes added to a disabled button.
pub const DISABLED_CLASSES: &str = "opacity-50 cursor-not-allowed";

/// Wrap `body` in a modal dialog with a header.
///
/// `max_width` is a Tailwind width class such as `max-w-2xl`.
#[must_use]
pub fn dialog(id: &str, title: &str, max_width: &str, body: &str) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        r##"<div id="{id}" class="fixed inset-0 z-50 flex items-center justify-center bg-black/50" role="dialog" aria-modal="true" aria-labelledby="{id}-title">
    <div class="w-full {max_width} max-h-[80vh] overflow-y-auto rounded-lg bg-background p-6 shadow-lg">
        <div class="flex items-center justify-between mb-4">
            <h2 id="{id}-title" class="text-lg font-semibold">{title}</h2>
            <button type="button" class="dialog-close rounded-md px-2 {ghost}" aria-label="关闭"
                hx-get="/api/dialogs/{id}/close" hx-target="#{id}" hx-swap="outerHTML">✕</button>
        </div>
        {body}
    </div>
</div>"##,
        id = escape(id),
        title = escape(title),
        ghost = ButtonVariant::Ghost.classes(),
    );
    out
}

/// Placeholder left in the page when a dialog is closed.
#[must_use]
pub fn closed_dialog(id: &str) -> String {
    format!(r#"<div id="{}" hidden></div>"#, escape(id))
}

/// Generate the HTML shell for a full page.
#[must_use]
pub fn html_shell(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="zh-CN">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title} - 随访助手</title>

    <!-- HTMX and Extensions -->
    <script src="https://unpkg.com/htmx.org@2.0.8/dist/htmx.min.js"></script>
    <script src="https://unpkg.com/htmx-ext-json-enc@2.0.1/json-enc.js"></script>
    <link rel="stylesheet" href="/static/app.css">
</head>
<body class="min-h-screen bg-background text-textPrimary antialiased">
    <main id="app" class="container mx-auto px-4 md:px-6 py-4 md:py-8 max-w-5xl space-y-6">
        {content}
    </main>
</body>
</html>"#,
        title = escape(title),
    )
}
