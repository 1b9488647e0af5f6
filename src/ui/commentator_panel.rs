//! Commentator panel.

use crate::commentator::CommentarySnapshot;

use super::html::escape;

pub const PANEL_TITLE: &str = "评论员的思考";
pub const LOADING_TEXT: &str = "正在分析对话...";

/// Render the commentator panel for `conversation_id`.
///
/// The panel id is stable per conversation so HTMX can swap it in place.
#[must_use]
pub fn render_commentator_panel(conversation_id: &str, snapshot: &CommentarySnapshot) -> String {
    let body = if snapshot.is_loading {
        format!(r#"<p class="text-gray-500">{LOADING_TEXT}</p>"#)
    } else {
        format!(
            r#"<p class="text-gray-700">{}</p>"#,
            escape(&snapshot.comment)
        )
    };

    format!(
        r#"<div id="commentator-{id}" class="commentator-panel p-4 bg-gray-100 rounded-lg shadow-md">
    <h3 class="font-bold mb-2">{PANEL_TITLE}</h3>
    {body}
</div>"#,
        id = escape(conversation_id),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loading_hides_comment() {
        let snap = CommentarySnapshot {
            comment: "旧评论".into(),
            is_loading: true,
            last_commented_id: Some(1),
        };
        let html = render_commentator_panel("c1", &snap);
        assert!(html.contains(LOADING_TEXT));
        assert!(!html.contains("旧评论"));
        assert!(html.contains(r#"id="commentator-c1""#));
    }

    #[test]
    fn test_comment_is_escaped() {
        let snap = CommentarySnapshot {
            comment: "<script>真的吗</script> 🙄".into(),
            ..CommentarySnapshot::default()
        };
        let html = render_commentator_panel("c1", &snap);
        assert!(html.contains("&lt;script&gt;真的吗&lt;/script&gt; 🙄"));
        assert!(!html.contains(LOADING_TEXT));
    }
}
