//! services/console/src/view.rs
//!
//! Renders the console state as text. Rendering has no side effects; the
//! caller decides when notices are consumed.

use std::fmt;

use catalog_core::domain::{Product, ProductDraft, MAX_IMAGES};
use catalog_core::modal::ModalMode;
use colored::Colorize;

use crate::app::state::{ConsoleState, Notice, NoticeLevel};

const RULE: &str = "------------------------------------------------------------------------";

/// Renders the whole screen: notices, then the login prompt or the product
/// table, then the dialog if it is open.
pub fn render(state: &ConsoleState) -> String {
    Screen(state).to_string()
}

struct Screen<'a>(&'a ConsoleState);

impl fmt::Display for Screen<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.0;
        write_notices(f, &state.notices)?;

        if !state.is_authenticated() {
            return write_login(f);
        }

        write_table(f, &state.products)?;
        if state.editor.is_open() {
            write_dialog(f, state.editor.mode(), state.editor.draft())?;
        }
        Ok(())
    }
}

fn write_notices(f: &mut fmt::Formatter<'_>, notices: &[Notice]) -> fmt::Result {
    for notice in notices {
        let line = match notice.level {
            NoticeLevel::Info => notice.text.normal(),
            NoticeLevel::Error => notice.text.red(),
        };
        writeln!(f, "{}", line)?;
    }
    Ok(())
}

fn write_login(f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "{}", "Please sign in".bold())?;
    writeln!(f, "  login <email> <password>")
}

fn write_table(f: &mut fmt::Formatter<'_>, products: &[Product]) -> fmt::Result {
    writeln!(f, "{}", "Products".bold())?;
    writeln!(f, "{:>60}", "[new] create a product")?;
    writeln!(
        f,
        "{:<4} {:<12} {:<24} {:>10} {:>10} {:<9} Actions",
        "Row", "Category", "Title", "Origin", "Price", "Enabled"
    )?;
    writeln!(f, "{}", RULE)?;

    if products.is_empty() {
        return writeln!(f, "  (no products)");
    }

    for (index, product) in products.iter().enumerate() {
        // Pad before colouring so the escape codes do not skew the columns.
        let enabled = if product.is_enabled {
            format!("{:<9}", "Enabled").green().bold()
        } else {
            format!("{:<9}", "Disabled").dimmed()
        };
        let row = index + 1;
        writeln!(
            f,
            "{:<4} {:<12} {:<24} {:>10} {:>10} {} [edit {}] [delete {}]",
            row,
            truncate(&product.category, 12),
            truncate(&product.title, 24),
            product.origin_price,
            product.price,
            enabled,
            row,
            row
        )?;
    }
    Ok(())
}

fn write_dialog(f: &mut fmt::Formatter<'_>, mode: ModalMode, draft: &ProductDraft) -> fmt::Result {
    writeln!(f, "{}", RULE)?;
    match mode {
        ModalMode::Delete => {
            writeln!(f, "{}", "Delete product".red().bold())?;
            writeln!(
                f,
                "Delete \"{}\"? This cannot be undone. [save] to confirm, [cancel] to keep it.",
                draft.title
            )
        }
        ModalMode::Create | ModalMode::Edit => {
            let heading = if mode == ModalMode::Create {
                "New product".to_string()
            } else {
                format!("Edit product {}", draft.id)
            };
            writeln!(f, "{}", heading.bold())?;
            let fields = [
                ("title", draft.title.as_str()),
                ("category", draft.category.as_str()),
                ("unit", draft.unit.as_str()),
                ("origin_price", draft.origin_price.as_str()),
                ("price", draft.price.as_str()),
                ("description", draft.description.as_str()),
                ("content", draft.content.as_str()),
                ("imageUrl", draft.image_url.as_str()),
            ];
            for (name, value) in fields {
                writeln!(f, "  {:<13} {}", name, value)?;
            }
            let checkbox = if draft.is_enabled { "[x]" } else { "[ ]" };
            writeln!(f, "  {:<13} {}", "is_enabled", checkbox)?;

            writeln!(f, "  images ({}/{})", draft.images_url.len(), MAX_IMAGES)?;
            for (index, url) in draft.images_url.iter().enumerate() {
                let shown = if url.is_empty() { "(empty)" } else { url.as_str() };
                writeln!(f, "    {}. {}", index + 1, shown)?;
            }
            writeln!(f, "[save] to confirm, [cancel] to discard.")
        }
        ModalMode::None => Ok(()),
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}
