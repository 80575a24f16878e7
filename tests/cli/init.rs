use anyhow::Result;
use pretty_assertions::assert_eq;

use crate::CliTest;

const CONFIG: &str = "i18n-xy.config.json";

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.run(&["init"])?;

    assert_eq!(output.code, Some(0));
    assert_eq!(output.stdout, "✓ Created i18n-xy.config.json\n");

    let config = test.read_json(CONFIG)?;
    assert_eq!(config["locale"], "zh-CN");
    assert_eq!(config["fallbackLocale"], "en-US");
    assert_eq!(config["outputDir"], "locales");
    assert_eq!(config["replacement"]["functionName"], "$t");
    assert_eq!(config["translation"]["concurrency"], 10);

    let content = test.read_file(CONFIG)?;
    assert!(content.contains("\n  \"locale\""), "2-space indentation");
    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::with_file(CONFIG, "{}")?;

    let output = test.run(&["init"])?;

    assert_eq!(output.code, Some(1));
    assert!(output.stdout.contains("already exists"));
    assert_eq!(test.read_file(CONFIG)?, "{}");
    Ok(())
}

#[test]
fn test_init_force_overwrites() -> Result<()> {
    let test = CliTest::with_file(CONFIG, "{}")?;

    let output = test.run(&["init", "--force"])?;

    assert_eq!(output.code, Some(0));
    assert_eq!(output.stdout, "✓ Overwrote i18n-xy.config.json\n");
    assert_eq!(test.read_json(CONFIG)?["locale"], "zh-CN");
    Ok(())
}

#[test]
fn test_no_command_prints_help() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.run(&[])?;

    assert_eq!(output.code, Some(0));
    assert!(output.stdout.contains("Usage:"));
    assert!(output.stdout.contains("extract"));
    Ok(())
}
