//! Alert messages shown in the alert container at the bottom of the page.
//!
//! Alerts are swapped into `#alert-container` by htmx when a board request
//! fails, so the rest of the board stays as it was.

use axum::response::Html;
use maud::{Markup, html};

/// Alert message types for styling
#[derive(Debug, Clone, Copy)]
pub enum AlertType {
    Error,
}

/// An alert with a short message and optional details.
#[derive(Debug, Clone)]
pub struct Alert<'a> {
    pub alert_type: AlertType,
    pub message: &'a str,
    pub details: &'a str,
}

impl<'a> Alert<'a> {
    /// Create a new error alert
    pub fn error(message: &'a str, details: &'a str) -> Self {
        Self {
            alert_type: AlertType::Error,
            message,
            details,
        }
    }

    pub fn into_markup(self) -> Markup {
        let style = match self.alert_type {
            AlertType::Error => {
                "p-4 mb-4 text-sm text-red-800 rounded-lg bg-red-50 dark:bg-gray-800 dark:text-red-400"
            }
        };

        html!(
            div class=(style) role="alert"
            {
                span class="font-medium" { (self.message) }

                @if !self.details.is_empty() {
                    " " (self.details)
                }
            }
        )
    }

    pub fn into_html(self) -> Html<String> {
        Html(self.into_markup().into_string())
    }
}
