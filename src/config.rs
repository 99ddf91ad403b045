use anyhow::Context;
use time::{macros::format_description, UtcOffset};
use tracing::warn;

pub const DEFAULT_JWT_SECRET: &str = "super-secret-key";
const DEFAULT_EXPIRES_IN: &str = "90d";

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_seconds: i64,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    /// Offset used to decide where a "calendar day" starts for the daily quota.
    pub local_offset: UtcOffset,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(get: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = get("DATABASE_URL").unwrap_or_else(|| "sqlite://civicpulse.db".into());

        let secret = match get("JWT_SECRET") {
            Some(s) if !s.is_empty() => s,
            _ => {
                warn!("JWT_SECRET not set; falling back to the built-in development secret");
                DEFAULT_JWT_SECRET.to_string()
            }
        };
        let expires_in = get("JWT_EXPIRES_IN").unwrap_or_else(|| DEFAULT_EXPIRES_IN.into());
        let jwt = JwtConfig {
            secret,
            issuer: get("JWT_ISSUER").unwrap_or_else(|| "civicpulse".into()),
            audience: get("JWT_AUDIENCE").unwrap_or_else(|| "civicpulse-users".into()),
            ttl_seconds: parse_expires_in(&expires_in)
                .with_context(|| format!("invalid JWT_EXPIRES_IN {expires_in:?}"))?,
        };

        let local_offset = match get("LOCAL_UTC_OFFSET") {
            Some(raw) => parse_utc_offset(&raw)
                .with_context(|| format!("invalid LOCAL_UTC_OFFSET {raw:?}"))?,
            // Fails on multi-threaded unix processes; quota days then follow UTC.
            None => UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC),
        };

        let port = match get("APP_PORT") {
            Some(p) => p.parse::<u16>().with_context(|| format!("invalid APP_PORT {p:?}"))?,
            None => 8080,
        };

        Ok(Self {
            database_url,
            jwt,
            local_offset,
            host: get("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
        })
    }
}

/// Parses token lifetimes such as `90d`, `12h`, `30m`, `45s` or a bare number of seconds.
pub fn parse_expires_in(raw: &str) -> anyhow::Result<i64> {
    let raw = raw.trim();
    let (digits, unit) = match raw.char_indices().last() {
        Some((idx, c)) if c.is_ascii_alphabetic() => (&raw[..idx], Some(c)),
        Some(_) => (raw, None),
        None => anyhow::bail!("empty duration"),
    };
    let n: i64 = digits.parse().context("duration must start with a number")?;
    anyhow::ensure!(n > 0, "duration must be positive");
    let multiplier = match unit {
        None | Some('s') => 1,
        Some('m') => 60,
        Some('h') => 60 * 60,
        Some('d') => 24 * 60 * 60,
        Some(other) => anyhow::bail!("unknown duration unit '{other}'"),
    };
    n.checked_mul(multiplier)
        .ok_or_else(|| anyhow::anyhow!("duration overflows"))
}

pub fn parse_utc_offset(raw: &str) -> anyhow::Result<UtcOffset> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
        return Ok(UtcOffset::UTC);
    }
    let format = format_description!("[offset_hour sign:mandatory]:[offset_minute]");
    Ok(UtcOffset::parse(raw, &format)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k: &str| map.get(k).cloned()
    }

    #[test]
    fn expires_in_units() {
        assert_eq!(parse_expires_in("90d").unwrap(), 90 * 86_400);
        assert_eq!(parse_expires_in("12h").unwrap(), 12 * 3_600);
        assert_eq!(parse_expires_in("30m").unwrap(), 1_800);
        assert_eq!(parse_expires_in("45s").unwrap(), 45);
        assert_eq!(parse_expires_in("3600").unwrap(), 3_600);
    }

    #[test]
    fn expires_in_rejects_garbage() {
        assert!(parse_expires_in("").is_err());
        assert!(parse_expires_in("d").is_err());
        assert!(parse_expires_in("10w").is_err());
        assert!(parse_expires_in("-5m").is_err());
        assert!(parse_expires_in("0").is_err());
    }

    #[test]
    fn utc_offset_parsing() {
        assert_eq!(parse_utc_offset("Z").unwrap(), UtcOffset::UTC);
        assert_eq!(
            parse_utc_offset("+05:30").unwrap(),
            UtcOffset::from_hms(5, 30, 0).unwrap()
        );
        assert_eq!(
            parse_utc_offset("-08:00").unwrap(),
            UtcOffset::from_hms(-8, 0, 0).unwrap()
        );
        assert!(parse_utc_offset("tomorrow").is_err());
    }

    #[test]
    fn defaults_apply_when_env_is_empty() {
        let cfg = AppConfig::from_lookup(lookup(&[("LOCAL_UTC_OFFSET", "+00:00")])).unwrap();
        assert_eq!(cfg.database_url, "sqlite://civicpulse.db");
        assert_eq!(cfg.jwt.secret, DEFAULT_JWT_SECRET);
        assert_eq!(cfg.jwt.ttl_seconds, 90 * 86_400);
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.local_offset, UtcOffset::UTC);
    }

    #[test]
    fn explicit_values_override_defaults() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("JWT_SECRET", "s3cret"),
            ("JWT_EXPIRES_IN", "1h"),
            ("LOCAL_UTC_OFFSET", "+02:00"),
            ("APP_PORT", "9000"),
        ]))
        .unwrap();
        assert_eq!(cfg.database_url, "sqlite::memory:");
        assert_eq!(cfg.jwt.secret, "s3cret");
        assert_eq!(cfg.jwt.ttl_seconds, 3_600);
        assert_eq!(cfg.local_offset, UtcOffset::from_hms(2, 0, 0).unwrap());
        assert_eq!(cfg.port, 9000);
    }

    #[test]
    fn bad_port_is_an_error() {
        let err = AppConfig::from_lookup(lookup(&[
            ("APP_PORT", "eighty"),
            ("LOCAL_UTC_OFFSET", "Z"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("APP_PORT"));
    }
}
