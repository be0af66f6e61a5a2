use actix_web::http::header;
use actix_web::HttpRequest;

/// The token after a `Bearer ` prefix, if the header has one.
///
/// A missing header, a non-UTF-8 value, another scheme, or an empty token
/// all read as "no credential".
pub fn bearer_from_request(req: &HttpRequest) -> Option<&str> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use actix_web::test::TestRequest;

    use super::*;

    #[test]
    fn test_bearer_prefix_is_required() {
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer abc.def.ghi"))
            .to_http_request();
        assert_eq!(bearer_from_request(&req), Some("abc.def.ghi"));

        for value in ["abc.def.ghi", "Basic dXNlcjpwYXNz", "bearer abc", "Bearer ", "Bearer    "] {
            let req = TestRequest::default()
                .insert_header((header::AUTHORIZATION, value))
                .to_http_request();
            assert_eq!(bearer_from_request(&req), None, "header {value:?}");
        }
    }

    #[test]
    fn test_missing_header() {
        let req = TestRequest::default().to_http_request();
        assert_eq!(bearer_from_request(&req), None);
    }
}
