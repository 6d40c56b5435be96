use std::env;

/// Server URL from the `--server` flag, then `ORGRES_SERVER`, then the local API port
pub fn resolve_server_url(flag: Option<&str>) -> String {
    if let Some(url) = flag {
        return url.to_string();
    }
    match env::var("ORGRES_SERVER") {
        Ok(url) if !url.trim().is_empty() => url,
        _ => format!("http://localhost:{}", crate::config::config().api.port),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_wins() {
        assert_eq!(
            resolve_server_url(Some("http://api.example.com")),
            "http://api.example.com"
        );
    }
}
