//! Transport seam between the broker client and the network
//!
//! Everything above this trait is pure request construction and response
//! classification, which keeps the signer and the 401 handling testable
//! without sockets.

use crate::errors::Result;
use crate::http::{HttpRequest, HttpResponse};
use async_trait::async_trait;

/// Sends one HTTP request and returns the raw response
///
/// Implementations put `path_and_query` on the request line exactly as
/// given and report network failures as `NetworkError` or `Timeout`.
/// Non-2xx statuses are not errors at this layer.
#[async_trait(?Send)]
pub trait HttpTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

#[async_trait(?Send)]
impl<T: HttpTransport + ?Sized> HttpTransport for &T {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        (**self).send(request).await
    }
}

#[async_trait(?Send)]
impl<T: HttpTransport + ?Sized> HttpTransport for std::rc::Rc<T> {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        (**self).send(request).await
    }
}
