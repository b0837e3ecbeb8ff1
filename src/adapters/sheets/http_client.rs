use error_stack::ResultExt;
use google_sheets4::{hyper, hyper_rustls};

use crate::ports::worksheet::AuthError;

pub type HttpsConnector = hyper_rustls::HttpsConnector<hyper::client::HttpConnector>;
pub type HttpClient = hyper::Client<HttpsConnector>;

pub fn http_client() -> error_stack::Result<HttpClient, AuthError> {
    let connector = hyper_rustls::HttpsConnectorBuilder::new()
        .with_native_roots()
        .change_context(AuthError::Authenticator)
        .attach_printable("Could not load the native TLS root certificates")?
        .https_or_http()
        .enable_http1()
        .build();

    Ok(hyper::Client::builder().build(connector))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_client_failure_is_an_authenticator_error() {
        // Hosts without a root store fail here instead of panicking.
        if let Err(report) = http_client() {
            assert!(matches!(report.current_context(), AuthError::Authenticator));
            assert!(format!("{report:?}").contains("root certificates"));
        }
    }
}
