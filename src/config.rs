#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_maxage: i64,
    pub port: u16,
    /// Base URL of the external auth + digipogs service.
    pub auth_url: String,
    /// URL the identity provider redirects back to after login.
    pub this_url: String,
    /// Account that collects posting fees.
    pub pool_account: String,
    /// Flat fee charged for creating a company.
    pub company_fee: i64,
    /// Flat fee charged for posting a job.
    pub job_fee: i64,
    /// Subject ids allowed to create companies.
    pub managers: Vec<String>,
}

impl Config {
    pub fn init() -> Config {
        let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let jwt_secret = std::env::var("JWT_SECRET_KEY").expect("JWT_SECRET_KEY must be set");
        let jwt_maxage = std::env::var("JWT_MAXAGE")
            .unwrap_or_else(|_| "60".to_string());
        let auth_url = std::env::var("AUTH_URL")
            .unwrap_or_else(|_| "http://localhost:4000/auth".to_string());
        let this_url = std::env::var("THIS_URL")
            .unwrap_or_else(|_| "http://localhost:3000/login".to_string());
        let pool_account = std::env::var("POOL").expect("POOL must be set");
        let company_fee = std::env::var("CPOST")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(300);
        let job_fee = std::env::var("JPOST")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(100);
        let managers = std::env::var("MANAGERS")
            .map(|v| parse_manager_list(&v))
            .unwrap_or_default();

        Config {
            database_url,
            jwt_secret,
            jwt_maxage: jwt_maxage.parse::<i64>().unwrap(),
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse::<u16>().ok())
                .unwrap_or(8000),
            auth_url,
            this_url,
            pool_account,
            company_fee,
            job_fee,
            managers,
        }
    }
}

/// The manager allowlist is accepted as a JSON array, a comma list, or a
/// single id.
pub fn parse_manager_list(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    if let Ok(serde_json::Value::Array(items)) = serde_json::from_str::<serde_json::Value>(trimmed) {
        return items
            .into_iter()
            .filter_map(|v| match v {
                serde_json::Value::String(s) => Some(s),
                serde_json::Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }

    trimmed
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manager_list_from_json_array() {
        let managers = parse_manager_list(r#"["42", "7", 13]"#);
        assert_eq!(managers, vec!["42", "7", "13"]);
    }

    #[test]
    fn manager_list_from_comma_list() {
        let managers = parse_manager_list("42, 7 ,13");
        assert_eq!(managers, vec!["42", "7", "13"]);
    }

    #[test]
    fn manager_list_from_single_id() {
        assert_eq!(parse_manager_list("42"), vec!["42"]);
    }

    #[test]
    fn manager_list_empty() {
        assert!(parse_manager_list("").is_empty());
        assert!(parse_manager_list("   ").is_empty());
    }
}
