use rand::Rng;
use rand::seq::SliceRandom;
use reqwest::header::{
    ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderName, HeaderValue, ORIGIN, REFERER, USER_AGENT,
};

/// Browser fingerprints rotated between attempts.
pub const USER_AGENTS: [&str; 5] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1",
    "Mozilla/5.0 (iPad; CPU OS 17_4 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) CriOS/123.0.6312.87 Mobile/15E148 Safari/604.1",
];

/// The simulated client presented to the marketplace on one attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity {
    pub user_agent: &'static str,
}

impl ClientIdentity {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            user_agent: USER_AGENTS.choose(rng).copied().unwrap_or(USER_AGENTS[0]),
        }
    }

    pub fn headers(&self, base_url: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(self.user_agent));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json, text/plain, */*"));
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("en-GB,en-US;q=0.9,en;q=0.8"),
        );

        let origin = base_url.trim_end_matches('/');
        if let Ok(value) = HeaderValue::from_str(origin) {
            headers.insert(ORIGIN, value);
        }
        if let Ok(value) = HeaderValue::from_str(&format!("{}/catalog", origin)) {
            headers.insert(REFERER, value);
        }

        headers.insert(HeaderName::from_static("sec-fetch-dest"), HeaderValue::from_static("empty"));
        headers.insert(HeaderName::from_static("sec-fetch-mode"), HeaderValue::from_static("cors"));
        headers.insert(
            HeaderName::from_static("sec-fetch-site"),
            HeaderValue::from_static("same-origin"),
        );
        headers.insert(HeaderName::from_static("dnt"), HeaderValue::from_static("1"));
        headers
    }
}
