use axum::http::{HeaderMap, HeaderValue, header, header::InvalidHeaderValue};

use crate::config::AuthConfig;

pub const REFRESH_COOKIE_NAME: &str = "refreshToken";

pub fn refresh_cookie(cfg: &AuthConfig, token: &str) -> Result<HeaderValue, InvalidHeaderValue> {
    build_cookie(cfg, token, cfg.refresh_ttl_secs())
}

pub fn clear_refresh_cookie(cfg: &AuthConfig) -> Result<HeaderValue, InvalidHeaderValue> {
    build_cookie(cfg, "", 0)
}

fn build_cookie(
    cfg: &AuthConfig,
    value: &str,
    max_age: u64,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie =
        format!("{REFRESH_COOKIE_NAME}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}");
    if cfg.cookie_secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// Value of the refresh cookie, if the request carries one.
pub fn refresh_token_from(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|pair| {
            let mut parts = pair.trim().splitn(2, '=');
            let key = parts.next()?.trim();
            let val = parts.next()?.trim();
            (key == REFRESH_COOKIE_NAME).then(|| val.to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_carries_flags_and_ttl() {
        let cfg = AuthConfig::default();
        let cookie = refresh_cookie(&cfg, "abc").expect("cookie should build");
        assert_eq!(
            cookie.to_str().expect("cookie should be ascii"),
            "refreshToken=abc; Path=/; HttpOnly; SameSite=Lax; Max-Age=2592000"
        );
    }

    #[test]
    fn secure_flag_and_clearing() {
        let cfg = AuthConfig {
            cookie_secure: true,
            ..AuthConfig::default()
        };
        let cookie = clear_refresh_cookie(&cfg).expect("cookie should build");
        let cookie = cookie.to_str().expect("cookie should be ascii");
        assert!(cookie.starts_with("refreshToken=;"));
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.ends_with("; Secure"));
    }

    #[test]
    fn reads_token_among_other_cookies() {
        let mut headers = HeaderMap::new();
        assert_eq!(refresh_token_from(&headers), None);

        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; refreshToken=a.b=c; lang=en"),
        );
        assert_eq!(refresh_token_from(&headers).as_deref(), Some("a.b=c"));
    }
}
