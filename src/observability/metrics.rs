use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use tracing::info;
use std::sync::Arc;
use tokio::sync::OnceCell;


// Declare the static OnceCell to hold the Metrics.
static METRICS_INSTANCE: OnceCell<Arc<Metrics>> = OnceCell::const_new();

/// Asynchronously initializes and gets a reference to the static `Metrics`.
pub async fn get_metrics() -> &'static Arc<Metrics> {
    METRICS_INSTANCE.get_or_init(|| async {
        info!("Initializing Metrics ...");
        Metrics::new()}
    ).await
}

/// Text exposition of every registered metric.
pub async fn render() -> anyhow::Result<String> {
    let metrics = get_metrics().await;
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&metrics.registry.gather(), &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}


#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Identity service
    pub sign_in_requests: IntCounter,
    pub sign_in_failures: IntCounterVec,
    pub sign_in_duration: Histogram,
    pub sign_out_requests: IntCounter,

    // Cache
    pub cache_hits: IntCounter,
}

impl Metrics {
    fn new() -> Arc<Self> {
        let registry = Registry::new_custom(Some("idm".into()), None).unwrap();

        let metrics: Arc<Metrics> = Arc::new(Self {
            sign_in_requests: IntCounter::new("sign_in_requests_total", "Total sign-in attempts").unwrap(),
            sign_in_failures: IntCounterVec::new(Opts::new("sign_in_failures_total", "Sign-in failures by reason"),&["reason"],).unwrap(),
            sign_in_duration: Histogram::with_opts(HistogramOpts::new("sign_in_duration_seconds", "Sign-in round trip seconds").buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 30.0])).unwrap(),
            sign_out_requests: IntCounter::new("sign_out_requests_total", "Total sign-out attempts").unwrap(),

            cache_hits: IntCounter::new("token_cache_hits_total", "Tokens served from cache without sign-in").unwrap(),

            registry,
        });

        // Register all metrics in the registry
        let reg = &metrics.registry;
        reg.register(Box::new(metrics.sign_in_requests.clone())).unwrap();
        reg.register(Box::new(metrics.sign_in_failures.clone())).unwrap();
        reg.register(Box::new(metrics.sign_in_duration.clone())).unwrap();
        reg.register(Box::new(metrics.sign_out_requests.clone())).unwrap();
        reg.register(Box::new(metrics.cache_hits.clone())).unwrap();

        metrics
    }
}
