use appenv::{ConfigLoader, HttpMethod, SettingKey, TypedConfig};
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};

fn base_environment() -> HashMap<String, String> {
    [
        ("SECRET_KEY", "prop-secret"),
        ("EMAIL_HOST", "smtp.example.com"),
        ("DEFAULT_FROM_EMAIL", "noreply@example.com"),
        ("FRONTEND_URL", "https://app.example.com"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn load_with(key: SettingKey, literal: String) -> TypedConfig {
    let mut env = base_environment();
    env.insert(key.as_str().to_string(), literal);
    ConfigLoader::load(&env).unwrap()
}

fn host_label() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,10}(\\.[a-z]{2,5}){1,2}"
}

fn origin() -> impl Strategy<Value = String> {
    ("https?", "[a-z][a-z0-9]{0,8}\\.example\\.com").prop_map(|(s, h)| format!("{s}://{h}"))
}

/// A method with each letter randomly lowercased.
fn mixed_case_method() -> impl Strategy<Value = (HttpMethod, String)> {
    (
        prop::sample::select(HttpMethod::ALL.to_vec()),
        prop::collection::vec(any::<bool>(), 7),
    )
        .prop_map(|(method, upper)| {
            let spelled = method
                .as_str()
                .chars()
                .zip(upper)
                .map(|(c, up)| if up { c } else { c.to_ascii_lowercase() })
                .collect();
            (method, spelled)
        })
}

fn header_name() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9-]{0,15}"
}

fn ipv4() -> impl Strategy<Value = String> {
    any::<[u8; 4]>().prop_map(|[a, b, c, d]| format!("{a}.{b}.{c}.{d}"))
}

fn reparse(literal: &str) -> Vec<String> {
    serde_json::from_str(literal).unwrap()
}

proptest! {
    /// Property: identical input gives a field-for-field identical config
    #[test]
    fn prop_load_is_deterministic(
        hosts in prop::collection::vec(host_label(), 0..6),
        port in 1u16..=65535,
        debug in any::<bool>(),
    ) {
        let mut env = base_environment();
        env.insert("ALLOWED_HOSTS".to_string(), serde_json::to_string(&hosts).unwrap());
        env.insert("EMAIL_PORT".to_string(), port.to_string());
        env.insert("DEBUG".to_string(), debug.to_string());

        let first = ConfigLoader::load(&env).unwrap();
        let second = ConfigLoader::load(&env).unwrap();
        prop_assert_eq!(first.email().port(), port);
        prop_assert_eq!(first, second);
    }

    /// Property: sets round-trip through render_value as the same set
    #[test]
    fn prop_host_set_round_trip(hosts in prop::collection::vec(host_label(), 0..8)) {
        let config = load_with(SettingKey::AllowedHosts, serde_json::to_string(&hosts).unwrap());
        let rendered = config.render_value(SettingKey::AllowedHosts);
        let reparsed: Vec<String> = serde_json::from_str(&rendered).unwrap();

        let expected: BTreeSet<&String> = hosts.iter().collect();
        let actual: BTreeSet<&String> = reparsed.iter().collect();
        prop_assert_eq!(actual, expected.clone());
        prop_assert_eq!(reparsed.len(), expected.len());

        let again = load_with(SettingKey::AllowedHosts, rendered);
        prop_assert_eq!(again.allowed_hosts(), config.allowed_hosts());
    }

    /// Property: sequences round-trip with order and duplicates intact
    #[test]
    fn prop_origin_sequence_round_trip(origins in prop::collection::vec(origin(), 0..8)) {
        let config = load_with(
            SettingKey::CsrfTrustedOrigins,
            serde_json::to_string(&origins).unwrap(),
        );
        let rendered = config.render_value(SettingKey::CsrfTrustedOrigins);
        let reparsed: Vec<String> = serde_json::from_str(&rendered).unwrap();
        prop_assert_eq!(reparsed, origins);
    }

    /// Property: any value outside the boolean vocabulary is rejected
    #[test]
    fn prop_bad_boolean_rejected(value in "[a-z]{2,8}") {
        prop_assume!(!matches!(value.as_str(), "true" | "false" | "yes" | "no"));
        let mut env = base_environment();
        env.insert("EMAIL_USE_TLS".to_string(), value);
        let err = ConfigLoader::load(&env).unwrap_err();
        prop_assert_eq!(err.keys(), vec![SettingKey::EmailUseTls]);
    }

    /// Property: methods canonicalize to uppercase, drop repeats, and reload unchanged
    #[test]
    fn prop_method_round_trip(entries in prop::collection::vec(mixed_case_method(), 0..10)) {
        let spelled: Vec<&String> = entries.iter().map(|(_, s)| s).collect();
        let config = load_with(SettingKey::CorsAllowMethods, serde_json::to_string(&spelled).unwrap());

        let mut expected: Vec<HttpMethod> = Vec::new();
        for (method, _) in &entries {
            if !expected.contains(method) {
                expected.push(*method);
            }
        }
        prop_assert_eq!(config.cors().allow_methods(), expected.as_slice());

        let rendered = config.render_value(SettingKey::CorsAllowMethods);
        let canonical: Vec<&str> = expected.iter().map(|m| m.as_str()).collect();
        prop_assert_eq!(reparse(&rendered), canonical);

        let again = load_with(SettingKey::CorsAllowMethods, rendered);
        prop_assert_eq!(again.cors().allow_methods(), config.cors().allow_methods());
    }

    /// Property: headers drop case-insensitive repeats, keep the first spelling, and reload unchanged
    #[test]
    fn prop_header_round_trip(headers in prop::collection::vec(header_name(), 0..8)) {
        let config = load_with(SettingKey::CorsAllowHeaders, serde_json::to_string(&headers).unwrap());

        let mut expected: Vec<&String> = Vec::new();
        for header in &headers {
            if !expected.iter().any(|h| h.eq_ignore_ascii_case(header)) {
                expected.push(header);
            }
        }
        prop_assert_eq!(config.cors().allow_headers().iter().collect::<Vec<_>>(), expected);

        let rendered = config.render_value(SettingKey::CorsAllowHeaders);
        let again = load_with(SettingKey::CorsAllowHeaders, rendered);
        prop_assert_eq!(again.cors().allow_headers(), config.cors().allow_headers());
    }

    /// Property: internal addresses round-trip as the same set
    #[test]
    fn prop_internal_ips_round_trip(ips in prop::collection::vec(ipv4(), 0..8)) {
        let config = load_with(SettingKey::InternalIps, serde_json::to_string(&ips).unwrap());
        let reparsed = reparse(&config.render_value(SettingKey::InternalIps));

        let expected: BTreeSet<&String> = ips.iter().collect();
        prop_assert_eq!(reparsed.iter().collect::<BTreeSet<_>>(), expected.clone());
        prop_assert_eq!(reparsed.len(), expected.len());
    }

    /// Property: CORS origins keep order and duplicates through a round trip
    #[test]
    fn prop_cors_origins_round_trip(origins in prop::collection::vec(origin(), 0..8)) {
        let config = load_with(
            SettingKey::CorsAllowedOrigins,
            serde_json::to_string(&origins).unwrap(),
        );
        let rendered = config.render_value(SettingKey::CorsAllowedOrigins);
        prop_assert_eq!(reparse(&rendered), origins.clone());

        let again = load_with(SettingKey::CorsAllowedOrigins, rendered);
        prop_assert_eq!(again.cors().allowed_origins(), origins.as_slice());
    }
}
