//! Define our own macro to simplify the code
//!

/// Call the HTTP client with the proper arguments
///
/// - anonymous GET with query parameters, works for both the blocking and async clients.
///
#[macro_export]
macro_rules! http_get_query {
    ($self:ident, $url:expr, $query:expr) => {
        $self
            .client
            .get($url)
            .header(
                "user-agent",
                format!("{}/{}", crate_name!(), crate_version!()),
            )
            .header("accept", "application/json")
            .query($query)
            .send()
    };
}
