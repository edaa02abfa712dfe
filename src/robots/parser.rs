//! robots.txt rules
//!
//! Allow/disallow matching is delegated to the `robotstxt` crate. The
//! `Crawl-delay` extension is not covered by that crate, so it is read here
//! group by group.

use robotstxt::DefaultMatcher;
use std::time::Duration;
use url::Url;

/// Rules from one robots.txt file
#[derive(Debug, Clone, Default)]
pub struct RobotsRules {
    /// Raw body; `None` allows everything
    body: Option<String>,
}

impl RobotsRules {
    /// Rules from a robots.txt body
    pub fn parse(body: &str) -> Self {
        Self {
            body: Some(body.to_string()),
        }
    }

    /// Rules that allow every URL, used when robots.txt is missing
    pub fn allow_all() -> Self {
        Self { body: None }
    }

    /// Checks whether `agent` may fetch `url`
    pub fn is_allowed(&self, url: &Url, agent: &str) -> bool {
        match self.body.as_deref() {
            None => true,
            Some(body) if body.trim().is_empty() => true,
            Some(body) => {
                let mut matcher = DefaultMatcher::default();
                matcher.one_agent_allowed_by_robots(body, product_token(agent), url.as_str())
            }
        }
    }

    /// Crawl delay for `agent`
    ///
    /// A group naming the agent wins over the `*` group. Negative or
    /// unparsable values are ignored.
    pub fn crawl_delay(&self, agent: &str) -> Option<Duration> {
        let body = self.body.as_deref()?;
        let token = product_token(agent).to_lowercase();

        let mut group: Vec<String> = Vec::new();
        let mut group_open = false;
        let mut specific = None;
        let mut wildcard = None;

        for line in body.lines() {
            let line = line.split('#').next().unwrap_or("").trim();
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim();

            match key.trim().to_lowercase().as_str() {
                "user-agent" => {
                    if !group_open {
                        group.clear();
                        group_open = true;
                    }
                    group.push(value.to_lowercase());
                }
                "crawl-delay" => {
                    group_open = false;
                    let Some(delay) = value
                        .parse::<f64>()
                        .ok()
                        .filter(|d| d.is_finite() && *d >= 0.0)
                    else {
                        continue;
                    };
                    if group.iter().any(|ua| !ua.is_empty() && *ua != "*" && token == *ua) {
                        specific = Some(delay);
                    } else if group.iter().any(|ua| ua == "*") {
                        wildcard = Some(delay);
                    }
                }
                _ => group_open = false,
            }
        }

        specific.or(wildcard).map(Duration::from_secs_f64)
    }
}

/// Product token of a user agent string (`sift-crawl/0.1` → `sift-crawl`)
fn product_token(agent: &str) -> &str {
    agent
        .split(|c: char| c == '/' || c.is_whitespace())
        .next()
        .unwrap_or(agent)
}
