use reqwest::Client;
use std::time::Duration;

pub struct HttpClientFactory;

impl HttpClientFactory {
    /// Creates the HTTP client used for prediction exchanges.
    ///
    /// Deliberately carries NO retry layer: a failed exchange is surfaced to
    /// the caller, who may re-trigger manually. The request timeout bounds a
    /// hung exchange; predictions are slow, so the default is generous.
    pub fn create_client(request_timeout: Duration) -> Client {
        Client::builder()
            .pool_max_idle_per_host(5)
            .timeout(request_timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new())
    }
}
