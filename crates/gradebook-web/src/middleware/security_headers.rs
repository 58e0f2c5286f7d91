use axum::body::Body;
use axum::http::{header, header::HeaderValue, Request};
use axum::middleware::Next;
use axum::response::Response;

fn add_common_headers(response: &mut Response, is_api: bool) {
    let headers = response.headers_mut();

    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );

    // Dashboards and login responses carry personal data.
    if is_api {
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    }
}

fn is_api_path(req: &Request<Body>) -> bool {
    req.uri().path().starts_with("/api/")
}

pub async fn security_headers(req: Request<Body>, next: Next) -> Response {
    let is_api = is_api_path(&req);
    let mut response = next.run(req).await;
    add_common_headers(&mut response, is_api);
    response
}

pub async fn security_headers_with_hsts(req: Request<Body>, next: Next) -> Response {
    let is_api = is_api_path(&req);
    let mut response = next.run(req).await;
    add_common_headers(&mut response, is_api);
    response.headers_mut().insert(
        header::STRICT_TRANSPORT_SECURITY,
        HeaderValue::from_static("max-age=31536000; includeSubDomains"),
    );
    response
}
