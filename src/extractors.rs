use axum::{
    extract::{FromRequestParts, Path, Query},
    http::request::Parts,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct LocationQuery {
    location: Option<String>,
}

/// Location taken from the path, falling back to `?location=`
///
/// `None` when neither is given; handlers substitute the configured default.
#[derive(Debug)]
pub struct LocationParam(pub Option<String>);

impl LocationParam {
    pub fn or_default(self, default: impl Into<String>) -> String {
        self.0.unwrap_or_else(|| default.into())
    }
}

impl<S> FromRequestParts<S> for LocationParam
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Ok(Path(location)) = Path::<String>::from_request_parts(parts, state).await {
            if !location.is_empty() {
                return Ok(LocationParam(Some(location)));
            }
        }

        if let Ok(Query(query)) = Query::<LocationQuery>::from_request_parts(parts, state).await {
            // `?location=` with nothing in it means "use the default"
            let location = query.location.filter(|l| !l.trim().is_empty());
            return Ok(LocationParam(location));
        }

        Ok(LocationParam(None))
    }
}
