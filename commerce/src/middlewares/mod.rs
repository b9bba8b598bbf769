use axum::{extract::Request, middleware::Next, response::Response};
use lambda_http::{request::RequestContext, tracing};

pub mod auth;

/// Logs caller, route and outcome for requests arriving through API Gateway.
pub async fn trace_client(req: Request, next: Next) -> Response {
    let caller = match req.extensions().get::<RequestContext>() {
        Some(RequestContext::ApiGatewayV2(ctx)) => {
            Some(ctx.http.source_ip.clone().unwrap_or_else(|| "unknown".to_string()))
        }
        _ => None,
    };
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let resp = next.run(req).await;
    if let Some(source_ip) = caller {
        tracing::info!("{} -> {} {} = {}", source_ip, method, path, resp.status().as_u16());
    }
    resp
}
