use once_cell::sync::Lazy;
use regex::Regex;

/// `scheme://host[:port][/path]`, HTTP and HTTPS only
static URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^https?://(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9-]*[a-z0-9])?)*|\[[0-9a-f:.]+\])(?::(?P<port>\d{1,5}))?(?:[/?#]\S*)?$",
    )
    .expect("valid regex")
});

pub fn is_valid_url(url: &str) -> bool {
    let Some(captures) = URL_PATTERN.captures(url) else {
        return false;
    };

    match captures.name("port") {
        Some(port) => port.as_str().parse::<u16>().is_ok(),
        None => true,
    }
}

pub fn is_valid_name(name: &str) -> bool {
    !name.trim().is_empty()
}
