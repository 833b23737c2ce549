// File: ./src/client/redirect.rs
// Follows 3xx responses for page fetches; hyper's legacy client does not.
use http::{Request, Response, Uri};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tower_layer::Layer;
use tower_service::Service;

#[derive(Clone, Debug)]
pub struct FollowRedirectLayer {
    max_redirects: usize,
}

impl FollowRedirectLayer {
    pub fn new(max_redirects: usize) -> Self {
        Self { max_redirects }
    }
}

impl<S> Layer<S> for FollowRedirectLayer {
    type Service = FollowRedirectService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        FollowRedirectService {
            inner,
            max_redirects: self.max_redirects,
        }
    }
}

#[derive(Clone, Debug)]
pub struct FollowRedirectService<S> {
    inner: S,
    max_redirects: usize,
}

/// Resolves a Location header against the URI that produced it.
/// Scheme and authority are inherited when the header omits them.
pub fn resolve_location(base: &Uri, location: &str) -> Uri {
    let Ok(parsed) = location.parse::<Uri>() else {
        return base.clone();
    };
    let parts = parsed.into_parts();
    let mut builder = Uri::builder();

    if let Some(scheme) = parts.scheme {
        builder = builder.scheme(scheme);
    } else if let Some(s) = base.scheme() {
        builder = builder.scheme(s.clone());
    }

    if let Some(authority) = parts.authority {
        builder = builder.authority(authority);
    } else if let Some(a) = base.authority() {
        builder = builder.authority(a.clone());
    }

    if let Some(pq) = parts.path_and_query {
        builder = builder.path_and_query(pq);
    }

    builder.build().unwrap_or_else(|_| base.clone())
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for FollowRedirectService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: std::error::Error + Send + Sync + 'static,
    ReqBody: Clone + Send + 'static,
    ResBody: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        let mut inner = self.inner.clone();
        let max_redirects = self.max_redirects;

        Box::pin(async move {
            let mut current_req = req;
            let mut hops = 0;

            loop {
                // Request<String> is Clone; keep a copy to re-issue on redirect.
                let req_clone = current_req.clone();

                let response = inner.call(current_req).await?;

                if hops >= max_redirects {
                    return Ok(response);
                }

                if response.status().is_redirection()
                    && let Some(location) = response.headers().get(http::header::LOCATION)
                    && let Ok(loc_str) = location.to_str()
                {
                    let new_uri = resolve_location(req_clone.uri(), loc_str);
                    log::debug!("Following redirect {} -> {}", req_clone.uri(), new_uri);
                    current_req = req_clone;
                    *current_req.uri_mut() = new_uri;
                    hops += 1;
                    continue;
                }

                return Ok(response);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_location_keeps_host() {
        let base: Uri = "https://school.example/page/?pid=49".parse().unwrap();
        let next = resolve_location(&base, "/term-dates");
        assert_eq!(next.to_string(), "https://school.example/term-dates");
    }

    #[test]
    fn absolute_location_replaces_host() {
        let base: Uri = "http://school.example/old".parse().unwrap();
        let next = resolve_location(&base, "https://www.school.example/new?x=1");
        assert_eq!(next.to_string(), "https://www.school.example/new?x=1");
    }
}
