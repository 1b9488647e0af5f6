//! Star rating dialog.

use std::fmt::Write as _;

use crate::rating::RatingDialog;

use super::html::{ButtonVariant, DISABLED_CLASSES, closed_dialog, dialog};

pub const DIALOG_ID: &str = "rating-dialog";
pub const DIALOG_TITLE: &str = "您对本次随访体验满意度怎么样？";
pub const SUBMIT_LABEL: &str = "提交";

const STAR_PATH: &str = "M12 2l3.09 6.26L22 9.27l-5 4.87 1.18 6.88L12 17.77l-6.18 3.25L7 14.14 2 9.27l6.91-1.01L12 2z";

/// Render `state`. A closed dialog renders as an empty placeholder.
#[must_use]
pub fn render_rating_dialog(state: &RatingDialog) -> String {
    if !state.is_open() {
        return closed_dialog(DIALOG_ID);
    }

    let mut stars = String::new();
    let ghost = ButtonVariant::Ghost.classes();
    for (i, filled) in state.stars().into_iter().enumerate() {
        let n = i + 1;
        let (class, fill) = if filled {
            ("star-filled w-8 h-8 text-yellow-400", "currentColor")
        } else {
            ("star-empty w-8 h-8 text-gray-300", "none")
        };
        let _ = write!(
            stars,
            r##"<button type="button" class="rounded-md {ghost} hover:scale-110 transition-transform" aria-label="{n} 星"
        hx-get="/api/rating/dialog?rating={n}" hx-target="#{DIALOG_ID}" hx-swap="outerHTML">
        <svg class="{class}" xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="{fill}" stroke="currentColor" stroke-width="2"><path d="{STAR_PATH}"/></svg>
    </button>"##
        );
    }

    let submit = match state.rating() {
        Some(rating) => format!(
            r##"<button type="button" class="w-full h-10 px-4 rounded-md {variant}"
        hx-post="/api/rating" hx-ext="json-enc" hx-vals='{{"rating": {rating}}}' hx-target="#{DIALOG_ID}" hx-swap="outerHTML">{SUBMIT_LABEL}</button>"##,
            variant = ButtonVariant::Primary.classes(),
        ),
        None => format!(
            r#"<button type="button" class="w-full h-10 px-4 rounded-md {variant} {DISABLED_CLASSES}" disabled>{SUBMIT_LABEL}</button>"#,
            variant = ButtonVariant::Primary.classes(),
        ),
    };

    let body = format!(
        r#"<div class="flex flex-col items-center gap-4 py-4">
    <div class="flex gap-2">{stars}</div>
    {submit}
</div>"#
    );
    dialog(DIALOG_ID, DIALOG_TITLE, "sm:max-w-md", &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_renders_placeholder() {
        let html = render_rating_dialog(&RatingDialog::new());
        assert_eq!(html, r#"<div id="rating-dialog" hidden></div>"#);
    }

    #[test]
    fn test_submit_disabled_without_selection() {
        let html = render_rating_dialog(&RatingDialog::opened());
        assert!(html.contains(DIALOG_TITLE));
        assert!(html.contains(" disabled>提交</button>"));
        assert_eq!(html.matches("star-empty").count(), 5);
        assert!(!html.contains("hx-post"));
    }

    #[test]
    fn test_selection_fills_stars_and_enables_submit() {
        let mut state = RatingDialog::opened();
        state.select(2).unwrap();
        let html = render_rating_dialog(&state);
        assert_eq!(html.matches("star-filled").count(), 2);
        assert_eq!(html.matches("star-empty").count(), 3);
        assert!(html.contains(r#"hx-vals='{"rating": 2}'"#));
        assert!(!html.contains(" disabled>"));
    }
}
