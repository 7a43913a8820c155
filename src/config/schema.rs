//! Configuration section definitions.
//!
//! Each type here is one independently updated section. All of them parse
//! from a flat raw bundle, fill omitted keys with defaults, and derive
//! `Serialize` so snapshots can be dumped as JSON.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;

use crate::config::raw::RawData;
use crate::error::SectionError;
use crate::store::section::Section;

/// Deployment settings for revision workloads.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeploymentConfig {
    /// Image used for the queue-proxy sidecar. Required.
    pub queue_sidecar_image: String,

    /// Registries whose image tags are not resolved to digests.
    pub registries_skipping_tag_resolving: BTreeSet<String>,

    /// How long a rollout may take before it is considered failed.
    #[serde(with = "humantime_format")]
    pub progress_deadline: Duration,
}

impl DeploymentConfig {
    pub const QUEUE_SIDECAR_IMAGE_KEY: &'static str = "queueSidecarImage";
    pub const REGISTRIES_SKIPPING_TAG_RESOLVING_KEY: &'static str = "registriesSkippingTagResolving";
    pub const PROGRESS_DEADLINE_KEY: &'static str = "progressDeadline";
}

impl Section for DeploymentConfig {
    const NAME: &'static str = "config-deployment";

    fn from_raw(data: &RawData) -> Result<Self, SectionError> {
        let registries = data.string(Self::REGISTRIES_SKIPPING_TAG_RESOLVING_KEY, "ko.local,dev.local");
        let progress_deadline = data.duration(Self::PROGRESS_DEADLINE_KEY, Duration::from_secs(600))?;
        if progress_deadline.is_zero() {
            return Err(SectionError::invalid(
                Self::PROGRESS_DEADLINE_KEY,
                data.get(Self::PROGRESS_DEADLINE_KEY).unwrap_or_default(),
                "must be positive",
            ));
        }

        Ok(Self {
            queue_sidecar_image: data.required_string(Self::QUEUE_SIDECAR_IMAGE_KEY)?,
            registries_skipping_tag_resolving: split_list(&registries).map(str::to_string).collect(),
            progress_deadline,
        })
    }
}

/// Whether HTTP traffic is served, redirected to HTTPS, or refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpProtocol {
    Enabled,
    Redirected,
    Disabled,
}

impl FromStr for HttpProtocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "enabled" => Ok(HttpProtocol::Enabled),
            "redirected" => Ok(HttpProtocol::Redirected),
            "disabled" => Ok(HttpProtocol::Disabled),
            _ => Err("expected Enabled, Redirected or Disabled".to_string()),
        }
    }
}

/// Network settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkConfig {
    /// IP ranges whose outbound traffic goes through the sidecar.
    /// `*` means all, empty means none.
    pub outbound_ip_ranges: String,

    /// Ingress implementation used for routes.
    pub ingress_class: String,

    /// Template for generated domain names.
    pub domain_template: String,

    pub http_protocol: HttpProtocol,

    /// Provision certificates automatically.
    pub auto_tls: bool,
}

impl NetworkConfig {
    pub const OUTBOUND_IP_RANGES_KEY: &'static str = "outboundIPRanges";
    /// Older key for [`Self::OUTBOUND_IP_RANGES_KEY`], read when the new one is absent.
    pub const LEGACY_OUTBOUND_IP_RANGES_KEY: &'static str = "istio.sidecar.includeOutboundIPRanges";
    pub const INGRESS_CLASS_KEY: &'static str = "ingress.class";
    pub const DOMAIN_TEMPLATE_KEY: &'static str = "domainTemplate";
    pub const HTTP_PROTOCOL_KEY: &'static str = "httpProtocol";
    pub const AUTO_TLS_KEY: &'static str = "autoTLS";

    pub const DEFAULT_INGRESS_CLASS: &'static str = "istio.ingress.networking.knative.dev";
    pub const DEFAULT_DOMAIN_TEMPLATE: &'static str = "{{.Name}}.{{.Namespace}}.{{.Domain}}";
}

impl Section for NetworkConfig {
    const NAME: &'static str = "config-network";

    fn from_raw(data: &RawData) -> Result<Self, SectionError> {
        let (key, ranges) = match data.get(Self::OUTBOUND_IP_RANGES_KEY) {
            Some(v) => (Self::OUTBOUND_IP_RANGES_KEY, v),
            None => (
                Self::LEGACY_OUTBOUND_IP_RANGES_KEY,
                data.get(Self::LEGACY_OUTBOUND_IP_RANGES_KEY).unwrap_or("*"),
            ),
        };
        let outbound_ip_ranges = validate_ip_ranges(ranges).map_err(|reason| SectionError::invalid(key, ranges, reason))?;

        let domain_template = data.string(Self::DOMAIN_TEMPLATE_KEY, Self::DEFAULT_DOMAIN_TEMPLATE);
        if !domain_template.contains("{{.Name}}") {
            return Err(SectionError::invalid(
                Self::DOMAIN_TEMPLATE_KEY,
                &domain_template,
                "must reference {{.Name}}",
            ));
        }

        let auto_tls = match data.get(Self::AUTO_TLS_KEY) {
            None => false,
            Some(v) if v.eq_ignore_ascii_case("enabled") => true,
            Some(v) if v.eq_ignore_ascii_case("disabled") => false,
            Some(v) => return Err(SectionError::invalid(Self::AUTO_TLS_KEY, v, "expected Enabled or Disabled")),
        };

        Ok(Self {
            outbound_ip_ranges,
            ingress_class: data.string(Self::INGRESS_CLASS_KEY, Self::DEFAULT_INGRESS_CLASS),
            domain_template,
            http_protocol: data.parsed(Self::HTTP_PROTOCOL_KEY, HttpProtocol::Enabled)?,
            auto_tls,
        })
    }
}

/// Accepts `*`, an empty string, or a comma separated list of CIDRs.
/// Returns the normalized list.
fn validate_ip_ranges(ranges: &str) -> Result<String, String> {
    let ranges = ranges.trim();
    if ranges == "*" || ranges.is_empty() {
        return Ok(ranges.to_string());
    }

    let mut normalized = Vec::new();
    for cidr in split_list(ranges) {
        let (addr, prefix) = cidr
            .split_once('/')
            .ok_or_else(|| format!("{:?} is not a CIDR", cidr))?;
        let addr: IpAddr = addr
            .parse()
            .map_err(|_| format!("{:?} is not a CIDR", cidr))?;
        let prefix: u8 = prefix
            .parse()
            .map_err(|_| format!("{:?} has an invalid prefix length", cidr))?;
        let max = if addr.is_ipv4() { 32 } else { 128 };
        if prefix > max {
            return Err(format!("{:?} has an invalid prefix length", cidr));
        }
        normalized.push(cidr);
    }
    Ok(normalized.join(","))
}

/// Request logging, metrics and profiling settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObservabilityConfig {
    /// Collect logs written under `/var/log`.
    pub enable_var_log_collection: bool,

    /// Link template for revision logs.
    pub log_url_template: String,

    /// Template for request log lines; `None` disables request logging.
    pub request_log_template: Option<String>,

    /// Where request metrics are exported.
    pub request_metrics_backend: String,

    pub enable_profiling: bool,
}

impl ObservabilityConfig {
    pub const ENABLE_VAR_LOG_COLLECTION_KEY: &'static str = "logging.enable-var-log-collection";
    pub const LOG_URL_TEMPLATE_KEY: &'static str = "logging.revision-url-template";
    pub const REQUEST_LOG_TEMPLATE_KEY: &'static str = "logging.request-log-template";
    pub const REQUEST_METRICS_BACKEND_KEY: &'static str = "metrics.request-metrics-backend-destination";
    pub const ENABLE_PROFILING_KEY: &'static str = "profiling.enable";

    pub const DEFAULT_LOG_URL_TEMPLATE: &'static str =
        "http://localhost:8001/api/v1/namespaces/logging/services/kibana-logging/proxy/app/kibana#/discover";
}

impl Section for ObservabilityConfig {
    const NAME: &'static str = "config-observability";

    fn from_raw(data: &RawData) -> Result<Self, SectionError> {
        let backend = data.string(Self::REQUEST_METRICS_BACKEND_KEY, "prometheus");
        if !matches!(backend.as_str(), "prometheus" | "stackdriver" | "opencensus") {
            return Err(SectionError::invalid(
                Self::REQUEST_METRICS_BACKEND_KEY,
                &backend,
                "expected prometheus, stackdriver or opencensus",
            ));
        }

        Ok(Self {
            enable_var_log_collection: data.bool(Self::ENABLE_VAR_LOG_COLLECTION_KEY, false)?,
            log_url_template: data.string(Self::LOG_URL_TEMPLATE_KEY, Self::DEFAULT_LOG_URL_TEMPLATE),
            request_log_template: data.optional_string(Self::REQUEST_LOG_TEMPLATE_KEY),
            request_metrics_backend: backend,
            enable_profiling: data.bool(Self::ENABLE_PROFILING_KEY, false)?,
        })
    }
}

/// Log verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err("expected trace, debug, info, warn or error".to_string()),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoggingConfig {
    /// Base level for every component.
    pub level: LogLevel,

    /// Opaque logger configuration passed through to components.
    pub logging_config: String,

    /// Per-component overrides from `loglevel.<component>` keys.
    pub component_levels: BTreeMap<String, LogLevel>,
}

impl LoggingConfig {
    pub const LEVEL_KEY: &'static str = "level";
    pub const LOGGER_CONFIG_KEY: &'static str = "zap-logger-config";
    pub const COMPONENT_LEVEL_PREFIX: &'static str = "loglevel.";
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            logging_config: "{}".to_string(),
            component_levels: BTreeMap::new(),
        }
    }
}

impl Section for LoggingConfig {
    const NAME: &'static str = "config-logging";

    fn from_raw(data: &RawData) -> Result<Self, SectionError> {
        let mut component_levels = BTreeMap::new();
        for (component, level) in data.with_prefix(Self::COMPONENT_LEVEL_PREFIX) {
            let parsed: LogLevel = level.parse().map_err(|reason: String| {
                SectionError::invalid(&format!("{}{}", Self::COMPONENT_LEVEL_PREFIX, component), level, reason)
            })?;
            component_levels.insert(component.to_string(), parsed);
        }

        Ok(Self {
            level: data.parsed(Self::LEVEL_KEY, LogLevel::Info)?,
            logging_config: data.string(Self::LOGGER_CONFIG_KEY, "{}"),
            component_levels,
        })
    }
}

/// Trace exporter backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TracingBackend {
    None,
    Zipkin,
    Stackdriver,
}

impl FromStr for TracingBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" | "" => Ok(TracingBackend::None),
            "zipkin" => Ok(TracingBackend::Zipkin),
            "stackdriver" => Ok(TracingBackend::Stackdriver),
            _ => Err("expected none, zipkin or stackdriver".to_string()),
        }
    }
}

/// Distributed tracing settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TracingConfig {
    pub backend: TracingBackend,

    /// Collector endpoint; required for the zipkin backend.
    pub zipkin_endpoint: Option<String>,

    /// Sample every request regardless of `sample_rate`.
    pub debug: bool,

    /// Fraction of requests sampled, in `[0, 1]`.
    pub sample_rate: f64,
}

impl TracingConfig {
    pub const BACKEND_KEY: &'static str = "backend";
    pub const ZIPKIN_ENDPOINT_KEY: &'static str = "zipkin-endpoint";
    pub const DEBUG_KEY: &'static str = "debug";
    pub const SAMPLE_RATE_KEY: &'static str = "sample-rate";
}

impl Section for TracingConfig {
    const NAME: &'static str = "config-tracing";

    fn from_raw(data: &RawData) -> Result<Self, SectionError> {
        let backend = data.parsed(Self::BACKEND_KEY, TracingBackend::None)?;
        let zipkin_endpoint = data.optional_string(Self::ZIPKIN_ENDPOINT_KEY);
        if backend == TracingBackend::Zipkin && zipkin_endpoint.is_none() {
            return Err(SectionError::MissingKey(Self::ZIPKIN_ENDPOINT_KEY.to_string()));
        }

        let sample_rate = data.parsed(Self::SAMPLE_RATE_KEY, 0.1)?;
        check_range(Self::SAMPLE_RATE_KEY, sample_rate, 0.0, 1.0)?;

        Ok(Self {
            backend,
            zipkin_endpoint,
            debug: data.bool(Self::DEBUG_KEY, false)?,
            sample_rate,
        })
    }
}

/// Autoscaler tunables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AutoscalerConfig {
    pub enable_scale_to_zero: bool,

    /// Share of the concurrency limit the autoscaler targets, in percent.
    pub container_concurrency_target_percentage: f64,

    /// Target concurrency when a revision sets no limit.
    pub container_concurrency_target_default: f64,

    /// Upper bound on the ratio between desired and current pods per tick.
    pub max_scale_up_rate: f64,

    #[serde(with = "humantime_format")]
    pub stable_window: Duration,

    /// Panic window as a percentage of the stable window.
    pub panic_window_percentage: f64,

    /// Load, as a percentage of target, that triggers panic mode.
    pub panic_threshold_percentage: f64,

    #[serde(with = "humantime_format")]
    pub scale_to_zero_grace_period: Duration,

    #[serde(with = "humantime_format")]
    pub tick_interval: Duration,
}

impl AutoscalerConfig {
    pub const ENABLE_SCALE_TO_ZERO_KEY: &'static str = "enable-scale-to-zero";
    pub const TARGET_PERCENTAGE_KEY: &'static str = "container-concurrency-target-percentage";
    pub const TARGET_DEFAULT_KEY: &'static str = "container-concurrency-target-default";
    pub const MAX_SCALE_UP_RATE_KEY: &'static str = "max-scale-up-rate";
    pub const STABLE_WINDOW_KEY: &'static str = "stable-window";
    pub const PANIC_WINDOW_PERCENTAGE_KEY: &'static str = "panic-window-percentage";
    pub const PANIC_THRESHOLD_PERCENTAGE_KEY: &'static str = "panic-threshold-percentage";
    pub const SCALE_TO_ZERO_GRACE_PERIOD_KEY: &'static str = "scale-to-zero-grace-period";
    pub const TICK_INTERVAL_KEY: &'static str = "tick-interval";

    const MIN_WINDOW: Duration = Duration::from_secs(6);
}

impl Section for AutoscalerConfig {
    const NAME: &'static str = "config-autoscaler";

    fn from_raw(data: &RawData) -> Result<Self, SectionError> {
        let config = Self {
            enable_scale_to_zero: data.bool(Self::ENABLE_SCALE_TO_ZERO_KEY, true)?,
            container_concurrency_target_percentage: data.parsed(Self::TARGET_PERCENTAGE_KEY, 70.0)?,
            container_concurrency_target_default: data.parsed(Self::TARGET_DEFAULT_KEY, 100.0)?,
            max_scale_up_rate: data.parsed(Self::MAX_SCALE_UP_RATE_KEY, 1000.0)?,
            stable_window: data.duration(Self::STABLE_WINDOW_KEY, Duration::from_secs(60))?,
            panic_window_percentage: data.parsed(Self::PANIC_WINDOW_PERCENTAGE_KEY, 10.0)?,
            panic_threshold_percentage: data.parsed(Self::PANIC_THRESHOLD_PERCENTAGE_KEY, 200.0)?,
            scale_to_zero_grace_period: data.duration(Self::SCALE_TO_ZERO_GRACE_PERIOD_KEY, Duration::from_secs(30))?,
            tick_interval: data.duration(Self::TICK_INTERVAL_KEY, Duration::from_secs(2))?,
        };

        check_range(Self::TARGET_PERCENTAGE_KEY, config.container_concurrency_target_percentage, 1.0, 100.0)?;
        check_range(Self::TARGET_DEFAULT_KEY, config.container_concurrency_target_default, 0.01, f64::MAX)?;
        check_range(Self::PANIC_WINDOW_PERCENTAGE_KEY, config.panic_window_percentage, 1.0, 100.0)?;
        check_range(Self::PANIC_THRESHOLD_PERCENTAGE_KEY, config.panic_threshold_percentage, 110.0, 1000.0)?;
        if !(config.max_scale_up_rate.is_finite() && config.max_scale_up_rate > 1.0) {
            return Err(SectionError::invalid(
                Self::MAX_SCALE_UP_RATE_KEY,
                &config.max_scale_up_rate.to_string(),
                "must be a finite number greater than 1",
            ));
        }
        for (key, window) in [
            (Self::STABLE_WINDOW_KEY, config.stable_window),
            (Self::SCALE_TO_ZERO_GRACE_PERIOD_KEY, config.scale_to_zero_grace_period),
        ] {
            if window < Self::MIN_WINDOW {
                return Err(SectionError::invalid(
                    key,
                    &humantime::format_duration(window).to_string(),
                    "must be at least 6s",
                ));
            }
        }
        if config.tick_interval.is_zero() {
            return Err(SectionError::invalid(Self::TICK_INTERVAL_KEY, "0s", "must be positive"));
        }

        Ok(config)
    }
}

fn check_range(key: &str, value: f64, min: f64, max: f64) -> Result<(), SectionError> {
    if value.is_nan() || value < min || value > max {
        return Err(SectionError::invalid(
            key,
            &value.to_string(),
            format!("must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

fn split_list(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').map(str::trim).filter(|s| !s.is_empty())
}

/// Serializes durations in humantime form (`1m 30s`).
mod humantime_format {
    use std::time::Duration;

    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&humantime::format_duration(*value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, &str)]) -> RawData {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_deployment_requires_queue_image() {
        let err = DeploymentConfig::from_raw(&raw(&[])).unwrap_err();
        assert_eq!(err, SectionError::MissingKey("queueSidecarImage".into()));

        let config = DeploymentConfig::from_raw(&raw(&[
            ("queueSidecarImage", "gcr.io/queue:latest"),
            ("registriesSkippingTagResolving", "ko.local, example.com"),
        ]))
        .unwrap();
        assert_eq!(config.queue_sidecar_image, "gcr.io/queue:latest");
        assert!(config.registries_skipping_tag_resolving.contains("example.com"));
        assert_eq!(config.progress_deadline, Duration::from_secs(600));
    }

    #[test]
    fn test_network_ip_ranges() {
        let config = NetworkConfig::from_raw(&raw(&[("outboundIPRanges", "10.0.0.0/8, 172.16.0.0/12")])).unwrap();
        assert_eq!(config.outbound_ip_ranges, "10.0.0.0/8,172.16.0.0/12");

        let config = NetworkConfig::from_raw(&raw(&[])).unwrap();
        assert_eq!(config.outbound_ip_ranges, "*");
        assert_eq!(config.http_protocol, HttpProtocol::Enabled);

        let config = NetworkConfig::from_raw(&raw(&[("istio.sidecar.includeOutboundIPRanges", "")])).unwrap();
        assert_eq!(config.outbound_ip_ranges, "");

        for bad in ["10.0.0.0", "10.0.0.0/33", "garbage/8", "::1/129"] {
            assert!(
                NetworkConfig::from_raw(&raw(&[("outboundIPRanges", bad)])).is_err(),
                "{} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_network_auto_tls_and_protocol() {
        let config = NetworkConfig::from_raw(&raw(&[("autoTLS", "Enabled"), ("httpProtocol", "Redirected")])).unwrap();
        assert!(config.auto_tls);
        assert_eq!(config.http_protocol, HttpProtocol::Redirected);
        assert!(NetworkConfig::from_raw(&raw(&[("autoTLS", "maybe")])).is_err());
        assert!(NetworkConfig::from_raw(&raw(&[("domainTemplate", "static.example.com")])).is_err());
    }

    #[test]
    fn test_logging_levels() {
        let config = LoggingConfig::from_raw(&raw(&[
            ("level", "debug"),
            ("loglevel.controller", "WARN"),
        ]))
        .unwrap();
        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(config.component_levels["controller"], LogLevel::Warn);

        let err = LoggingConfig::from_raw(&raw(&[("loglevel.webhook", "loud")])).unwrap_err();
        assert!(matches!(err, SectionError::InvalidValue { ref key, .. } if key == "loglevel.webhook"));
    }

    #[test]
    fn test_tracing_validation() {
        assert!(TracingConfig::from_raw(&raw(&[("backend", "zipkin")])).is_err());
        assert!(TracingConfig::from_raw(&raw(&[("sample-rate", "1.5")])).is_err());

        let config = TracingConfig::from_raw(&raw(&[
            ("backend", "zipkin"),
            ("zipkin-endpoint", "http://zipkin:9411/api/v2/spans"),
            ("debug", "true"),
        ]))
        .unwrap();
        assert_eq!(config.backend, TracingBackend::Zipkin);
        assert!(config.debug);
        assert_eq!(config.sample_rate, 0.1);
    }

    #[test]
    fn test_autoscaler_defaults_and_bounds() {
        let config = AutoscalerConfig::from_raw(&raw(&[])).unwrap();
        assert_eq!(config.stable_window, Duration::from_secs(60));
        assert_eq!(config.max_scale_up_rate, 1000.0);
        assert!(config.enable_scale_to_zero);

        assert!(AutoscalerConfig::from_raw(&raw(&[("max-scale-up-rate", "1.0")])).is_err());
        assert!(AutoscalerConfig::from_raw(&raw(&[("max-scale-up-rate", "NaN")])).is_err());
        assert!(AutoscalerConfig::from_raw(&raw(&[("max-scale-up-rate", "inf")])).is_err());
        assert!(AutoscalerConfig::from_raw(&raw(&[("stable-window", "5s")])).is_err());
        assert!(AutoscalerConfig::from_raw(&raw(&[("panic-threshold-percentage", "100")])).is_err());
        assert!(AutoscalerConfig::from_raw(&raw(&[("tick-interval", "soon")])).is_err());
    }

    #[test]
    fn test_observability_backend() {
        let config = ObservabilityConfig::from_raw(&raw(&[("profiling.enable", "true")])).unwrap();
        assert!(config.enable_profiling);
        assert_eq!(config.request_metrics_backend, "prometheus");
        assert!(config.request_log_template.is_none());
        assert!(ObservabilityConfig::from_raw(&raw(&[(
            "metrics.request-metrics-backend-destination",
            "carrier-pigeon"
        )]))
        .is_err());
    }
}
