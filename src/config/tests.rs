use std::path::Path;

use anyhow::Result;

use crate::{
    ArcPath, ArcStr,
    config::{Config, Data, PathOpt, StrOpt, USizeOpt},
    fs::Fs,
    log::LogLevel,
};

const SAMPLE: &str = r#"
api_root = "https://prices.example.co.ke/api/v1"
timeout = 10
debounce_ms = 250
session_dir = "/var/lib/pricewatch/sessions"
log_dir = "/var/log/pricewatch"
log_level = "Info"
max_age = 14
"#;

#[tokio::test]
async fn test_mock_config_roundtrips_values() {
    let config = Config::mock(Data::default());
    assert!(matches!(config, Config::Mock(_)));

    config.set_usize(USizeOpt::DebounceMs, 120).await;
    config.set_log_level(LogLevel::Error).await;
    assert_eq!(config.usize(USizeOpt::DebounceMs).await, 120);
    assert_eq!(config.log_level().await, LogLevel::Error);
    config.load().await.unwrap();
    config.save().await.unwrap();
}

#[tokio::test]
async fn test_actual_config_load() -> Result<()> {
    let fs = Fs::mock()?;
    let path = ArcPath::from(Path::new("/etc/pricewatch/config.toml"));
    fs.mkdir(ArcPath::from(Path::new("/etc/pricewatch"))).await?;
    fs.write(path.clone(), ArcStr::from(SAMPLE)).await?;

    let config = Config::spawn(fs, path);
    config.load().await?;

    assert_eq!(
        &*config.string(StrOpt::ApiRoot).await,
        "https://prices.example.co.ke/api/v1"
    );
    assert_eq!(config.usize(USizeOpt::Timeout).await, 10);
    assert_eq!(config.usize(USizeOpt::DebounceMs).await, 250);
    assert_eq!(config.usize(USizeOpt::MaxAge).await, 14);
    assert_eq!(config.log_level().await, LogLevel::Info);
    assert_eq!(
        config.path(PathOpt::SessionDir).await,
        ArcPath::from(Path::new("/var/lib/pricewatch/sessions"))
    );
    Ok(())
}

#[tokio::test]
async fn test_actual_config_missing_file_then_save() -> Result<()> {
    let fs = Fs::mock()?;
    let path = ArcPath::from(Path::new("/home/user/.config/pricewatch/config.toml"));
    let config = Config::spawn(fs.clone(), path.clone());

    assert!(config.load().await.is_err());
    config.set_usize(USizeOpt::Timeout, 5).await;
    config.save().await?;

    let written = fs.read_to_string(path.clone()).await?;
    assert!(written.contains("timeout = 5"));

    let reloaded = Config::spawn(fs, path);
    reloaded.load().await?;
    assert_eq!(reloaded.usize(USizeOpt::Timeout).await, 5);
    Ok(())
}

#[tokio::test]
async fn test_actual_config_rejects_invalid_toml() -> Result<()> {
    let fs = Fs::mock()?;
    let path = ArcPath::from(Path::new("/broken.toml"));
    fs.write(path.clone(), ArcStr::from("timeout = [")).await?;

    let config = Config::spawn(fs, path);
    let err = config.load().await.unwrap_err();
    assert!(format!("{err:#}").contains("Parsing config file"));
    // defaults are kept
    assert_eq!(config.usize(USizeOpt::Timeout).await, 30);
    Ok(())
}
