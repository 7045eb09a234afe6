//! Print the Google consent URL used to mint a new `REFRESH_TOKEN`.

use coffey_storefront::services::oauth::authorization_url;
use url::Url;

/// Print the consent URL to stdout.
///
/// # Errors
///
/// Returns an error if the URL cannot be built.
#[allow(clippy::print_stdout)]
pub fn print(client_id: &str, redirect_uri: &Url) -> Result<(), url::ParseError> {
    let url = authorization_url(client_id, redirect_uri)?;
    println!("{url}");
    Ok(())
}
