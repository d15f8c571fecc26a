use axum::{extract::State, http::header, response::IntoResponse};
use printpdf::{BuiltinFont, Mm, PdfDocument};
use tracing::info;

use cinerent_core::types::DelinquentCustomer;

use crate::errors::{AppError, AppResult};
use crate::infra::app_state::AppState;

pub async fn customer_report_handler(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let customers = state.customers.delinquents().await?;
    info!(customers = customers.len(), "rendering customer report");

    let pdf = render_customer_report(&customers)
        .map_err(|e| AppError::internal(format!("Failed to render report: {e}")))?;

    Ok(([(header::CONTENT_TYPE, "application/pdf")], pdf))
}

/// Lays out one line per customer with open rentals, paginating when the
/// cursor reaches the bottom margin.
fn render_customer_report(customers: &[DelinquentCustomer]) -> anyhow::Result<Vec<u8>> {
    // A4 portrait, 15mm margins, 6mm line height.
    let (doc, first_page, first_layer) =
        PdfDocument::new("Customers with open rentals", Mm(210.0), Mm(297.0), "Layer 1");
    let font = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let heading_font = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;

    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    let mut cursor = 297.0 - 15.0;

    layer.use_text(
        "Customers with open rentals",
        14.0,
        Mm(15.0),
        Mm(cursor),
        &heading_font,
    );
    cursor -= 12.0;

    if customers.is_empty() {
        layer.use_text(
            "No customers currently hold an open rental.",
            11.0,
            Mm(15.0),
            Mm(cursor),
            &font,
        );
    }

    for customer in customers {
        if cursor < 15.0 {
            let (page, page_layer) = doc.add_page(Mm(210.0), Mm(297.0), "Layer 1");
            layer = doc.get_page(page).get_layer(page_layer);
            cursor = 297.0 - 15.0;
        }

        let line = format!(
            "#{} {} {} <{}>: {} open rental(s)",
            customer.customer_id,
            customer.first_name,
            customer.last_name,
            customer.email.as_deref().unwrap_or("no email"),
            customer.open_rentals,
        );
        layer.use_text(line, 11.0, Mm(15.0), Mm(cursor), &font);
        cursor -= 6.0;
    }

    Ok(doc.save_to_bytes()?)
}
