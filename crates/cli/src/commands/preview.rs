//! Render the order email for a JSON order file.

use std::path::Path;

use coffey_core::OrderRequest;
use coffey_storefront::services::compose_order_email;
use tracing::info;

/// Print the rendered email to stdout.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not a valid order, or the
/// templates fail to render.
#[allow(clippy::print_stdout)]
pub async fn render(file: &Path, text: bool) -> Result<(), Box<dyn std::error::Error>> {
    let content = tokio::fs::read_to_string(file).await?;
    let order: OrderRequest = serde_json::from_str(&content)?;
    info!(path = %file.display(), items = order.cookie_list.len(), "Loaded order");

    let email = compose_order_email(&order)?;
    if text {
        println!("{}", email.text);
    } else {
        println!("{}", email.html);
    }
    Ok(())
}
