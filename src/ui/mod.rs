//! HTML fragments for the widgets.
//!
//! Everything here renders plain strings that HTMX swaps into the chat page.
//!
//! # Structure
//!
//! - [`html`]: escaping, buttons, dialog and page shells
//! - [`commentator_panel`]: commentator widget
//! - [`patient_dialog`]: patient record dialog
//! - [`rating_dialog`]: star rating dialog

pub mod commentator_panel;
pub mod html;
pub mod patient_dialog;
pub mod rating_dialog;

pub use commentator_panel::render_commentator_panel;
pub use patient_dialog::render_patient_dialog;
pub use rating_dialog::render_rating_dialog;
