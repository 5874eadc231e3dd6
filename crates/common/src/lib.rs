pub mod types;
pub mod utils;
pub mod validation;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_serializes_status() {
        let json = serde_json::to_string(&types::Health { status: "ok" }).unwrap();
        assert_eq!(json, r#"{"status":"ok"}"#);
    }

    #[test]
    fn log_format_defaults_to_compact() {
        std::env::remove_var("LOG_FORMAT");
        assert_eq!(utils::logging::LogFormat::from_env(), utils::logging::LogFormat::Compact);
    }
}
