use anyhow::Result;
use pretty_assertions::assert_eq;

use crate::CliTest;

#[test]
fn test_translate_requires_enabled_or_locales() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.run(&["translate"])?;

    assert_eq!(output.code, Some(2));
    assert!(output.stderr.contains("Translation is disabled"));
    Ok(())
}

#[test]
fn test_translate_requires_credentials() -> Result<()> {
    let test = CliTest::with_file("locales/zh-CN.json", r#"{ "nihao": "你好" }"#)?;

    let output = test.run(&["translate", "-l", "en-US"])?;

    assert_eq!(output.code, Some(2));
    assert!(output.stderr.contains("Failed to create translation provider"));
    assert!(output.stderr.contains("missing credentials"));
    assert!(!test.root().join("locales/en-US.json").exists());
    Ok(())
}
