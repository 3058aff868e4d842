//! Integration tests for configuration validation

#![allow(clippy::expect_used, clippy::unwrap_used)]

use borsh_codec::config::{BoolPolicy, CodecConfig, DEFAULT_MAX_LENGTH};
use borsh_codec::{decode_with_config, encode, BorshError};

#[test]
fn test_default_config_validates() {
    let config = CodecConfig::default();
    let errors = config.validate();
    assert!(
        errors.is_empty(),
        "Default config should be valid, but got errors: {:?}",
        errors
    );
    assert_eq!(config.max_length, DEFAULT_MAX_LENGTH);
    assert_eq!(config.bool_policy, BoolPolicy::Strict);
}

#[test]
fn test_zero_max_length() {
    let config = CodecConfig::default_with_overrides(|c| c.max_length = 0);
    let errors = config.validate();
    assert!(errors
        .iter()
        .any(|e| e.contains("Max length must be greater than 0")));
}

#[test]
fn test_excessive_max_length() {
    let config = CodecConfig::default_with_overrides(|c| c.max_length = u32::MAX);
    let errors = config.validate();
    assert!(errors.iter().any(|e| e.contains("Max length very high")));
}

#[test]
fn test_lenient_policy_warns() {
    let config = CodecConfig::default_with_overrides(|c| c.bool_policy = BoolPolicy::Lenient);
    let errors = config.validate();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("WARNING"));
}

#[test]
fn test_validate_strict_collects_all_errors() {
    let config = CodecConfig::default_with_overrides(|c| {
        c.max_length = 0;
        c.bool_policy = BoolPolicy::Lenient;
    });
    let err = config.validate_strict().unwrap_err();
    let BorshError::ConfigError(message) = err else {
        panic!("expected ConfigError");
    };
    assert!(message.contains("Max length must be greater than 0"));
    assert!(message.contains("Lenient boolean policy"));
}

#[test]
fn test_from_toml() {
    let config = CodecConfig::from_toml(
        r#"
        max_length = 4096
        bool_policy = "lenient"
        reject_trailing_bytes = true
        "#,
    )
    .expect("valid TOML");
    assert_eq!(config.max_length, 4096);
    assert_eq!(config.bool_policy, BoolPolicy::Lenient);
    assert!(config.reject_trailing_bytes);
}

#[test]
fn test_from_toml_rejects_bad_policy() {
    let err = CodecConfig::from_toml("max_length = 1\nbool_policy = \"sloppy\"").unwrap_err();
    assert!(matches!(err, BorshError::ConfigError(_)));
}

#[test]
fn test_save_and_load_round_trip() {
    let path = std::env::temp_dir().join(format!("borsh-codec-{}.toml", std::process::id()));
    let config = CodecConfig::default_with_overrides(|c| {
        c.max_length = 512;
        c.reject_trailing_bytes = true;
    });

    config.save_to_file(&path).expect("write config");
    let loaded = CodecConfig::from_file(&path).expect("read config");
    let _ = std::fs::remove_file(&path);

    assert_eq!(loaded, config);
}

#[test]
fn test_missing_file() {
    let err = CodecConfig::from_file("/nonexistent/borsh-codec.toml").unwrap_err();
    assert!(matches!(err, BorshError::ConfigError(_)));
}

#[test]
fn test_loaded_config_drives_decode() {
    let config = CodecConfig::from_toml("max_length = 2\nreject_trailing_bytes = true").unwrap();

    let bytes = encode(&vec![1u8, 2, 3]).unwrap();
    assert!(matches!(
        decode_with_config::<Vec<u8>>(&bytes, &config),
        Err(BorshError::MalformedLength { declared: 3, limit: 2 })
    ));

    let mut short = encode(&vec![1u8]).unwrap();
    short.push(0);
    assert_eq!(
        decode_with_config::<Vec<u8>>(&short, &config).unwrap_err(),
        BorshError::TrailingBytes(1)
    );
}

// Every environment variable is exercised in one test so parallel tests never
// observe each other's settings.
#[test]
fn test_from_env() {
    const VARS: [&str; 3] = [
        "BORSH_CODEC_MAX_LENGTH",
        "BORSH_CODEC_BOOL_POLICY",
        "BORSH_CODEC_REJECT_TRAILING_BYTES",
    ];
    let clear = || VARS.iter().for_each(|var| std::env::remove_var(var));

    clear();
    assert_eq!(CodecConfig::from_env().unwrap(), CodecConfig::default());

    std::env::set_var("BORSH_CODEC_MAX_LENGTH", "2048");
    std::env::set_var("BORSH_CODEC_BOOL_POLICY", "Lenient");
    std::env::set_var("BORSH_CODEC_REJECT_TRAILING_BYTES", "true");
    let config = CodecConfig::from_env().unwrap();
    assert_eq!(config.max_length, 2048);
    assert_eq!(config.bool_policy, BoolPolicy::Lenient);
    assert!(config.reject_trailing_bytes);

    for (var, bad) in [
        ("BORSH_CODEC_MAX_LENGTH", "lots"),
        ("BORSH_CODEC_BOOL_POLICY", "sloppy"),
        ("BORSH_CODEC_REJECT_TRAILING_BYTES", "yes"),
    ] {
        clear();
        std::env::set_var(var, bad);
        let err = CodecConfig::from_env().unwrap_err();
        let BorshError::ConfigError(message) = err else {
            panic!("expected ConfigError for {var}");
        };
        assert!(message.contains(var), "{message}");
    }

    clear();
}
