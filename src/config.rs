use std::net::{IpAddr, SocketAddr};

use url::Url;

use crate::external::yahoo::DEFAULT_CHART_URL;
use crate::models::LookbackPolicy;

/// Process-wide settings, built once in `main` and handed to the router.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub upstream_url: Url,
    pub upstream_user_agent: String,
    pub intraday_lookback_days: u32,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST")
            .unwrap_or_else(|| "0.0.0.0".to_string())
            .parse::<IpAddr>()
            .map_err(|e| format!("HOST is not a valid IP address: {}", e))?;

        let port = lookup("PORT")
            .unwrap_or_else(|| "5000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("PORT is not a valid port: {}", e))?;

        let upstream_url = Url::parse(
            &lookup("YAHOO_CHART_URL").unwrap_or_else(|| DEFAULT_CHART_URL.to_string()),
        )
        .map_err(|e| format!("YAHOO_CHART_URL is not a valid URL: {}", e))?;

        let upstream_user_agent = lookup("UPSTREAM_USER_AGENT")
            .unwrap_or_else(|| "Mozilla/5.0 (compatible; market-data-proxy/0.1)".to_string());

        let intraday_lookback_days = match lookup("INTRADAY_LOOKBACK_DAYS") {
            Some(raw) => raw
                .parse::<u32>()
                .map_err(|e| format!("INTRADAY_LOOKBACK_DAYS is not a number: {}", e))?,
            None => LookbackPolicy::MAX_INTRADAY_DAYS,
        };

        let config = Self {
            host,
            port,
            upstream_url,
            upstream_user_agent,
            intraday_lookback_days,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !matches!(self.upstream_url.scheme(), "http" | "https") {
            return Err(format!(
                "YAHOO_CHART_URL must be http(s), got {}",
                self.upstream_url
            ));
        }
        if self.upstream_url.cannot_be_a_base() {
            return Err(format!("YAHOO_CHART_URL cannot be a base URL: {}", self.upstream_url));
        }
        if !(1..=LookbackPolicy::MAX_INTRADAY_DAYS).contains(&self.intraday_lookback_days) {
            return Err(format!(
                "INTRADAY_LOOKBACK_DAYS must be between 1 and {}, got {}",
                LookbackPolicy::MAX_INTRADAY_DAYS,
                self.intraday_lookback_days
            ));
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn lookback_policy(&self) -> LookbackPolicy {
        LookbackPolicy::new(self.intraday_lookback_days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<ServerConfig, String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.bind_addr().to_string(), "0.0.0.0:5000");
        assert_eq!(config.upstream_url.as_str(), DEFAULT_CHART_URL);
        assert_eq!(config.lookback_policy(), LookbackPolicy::new(60));
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("INTRADAY_LOOKBACK_DAYS", "7"),
            ("YAHOO_CHART_URL", "http://localhost:9000/chart/"),
        ])
        .unwrap();

        assert_eq!(config.bind_addr().to_string(), "127.0.0.1:8080");
        assert_eq!(config.intraday_lookback_days, 7);
        assert_eq!(config.upstream_url.as_str(), "http://localhost:9000/chart/");
    }

    #[test]
    fn test_rejects_out_of_range_lookback() {
        assert!(config_from(&[("INTRADAY_LOOKBACK_DAYS", "0")]).is_err());
        assert!(config_from(&[("INTRADAY_LOOKBACK_DAYS", "61")]).is_err());
        assert!(config_from(&[("INTRADAY_LOOKBACK_DAYS", "week")]).is_err());
    }

    #[test]
    fn test_rejects_bad_port_and_url() {
        assert!(config_from(&[("PORT", "99999")]).is_err());
        assert!(config_from(&[("YAHOO_CHART_URL", "not a url")]).is_err());
        assert!(config_from(&[("YAHOO_CHART_URL", "ftp://example.com/chart/")]).is_err());
    }
}
