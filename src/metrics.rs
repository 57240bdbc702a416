//! Prometheus metrics for the HTTP surface and the model calls

use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, IntGauge, Registry, TextEncoder};

pub struct Metrics {
    registry: Registry,
    pub http_requests_total: IntCounter,
    pub http_requests_in_flight: IntGauge,
    pub http_request_duration_seconds: Histogram,
    pub chart_analyses_total: IntCounter,
    pub chart_analysis_failures_total: IntCounter,
    pub chart_analysis_duration_seconds: Histogram,
    pub sentiment_requests_total: IntCounter,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total =
            IntCounter::new("http_requests_total", "Total HTTP requests served")?;
        let http_requests_in_flight =
            IntGauge::new("http_requests_in_flight", "HTTP requests currently in flight")?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        ))?;
        let chart_analyses_total =
            IntCounter::new("chart_analyses_total", "Chart analyses requested")?;
        let chart_analysis_failures_total = IntCounter::new(
            "chart_analysis_failures_total",
            "Chart analyses that ended in an error",
        )?;
        // Model round trips for vision requests are slow; widen the buckets.
        let chart_analysis_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "chart_analysis_duration_seconds",
                "Chart analysis latency in seconds",
            )
            .buckets(vec![0.5, 1.0, 2.5, 5.0, 10.0, 20.0, 40.0, 80.0]),
        )?;
        let sentiment_requests_total =
            IntCounter::new("sentiment_requests_total", "Market sentiment requests served")?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(chart_analyses_total.clone()))?;
        registry.register(Box::new(chart_analysis_failures_total.clone()))?;
        registry.register(Box::new(chart_analysis_duration_seconds.clone()))?;
        registry.register(Box::new(sentiment_requests_total.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_requests_in_flight,
            http_request_duration_seconds,
            chart_analyses_total,
            chart_analysis_failures_total,
            chart_analysis_duration_seconds,
            sentiment_requests_total,
        })
    }

    /// Render all registered metrics in the Prometheus text format
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
