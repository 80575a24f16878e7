use anyhow::Result;
use pretty_assertions::assert_eq;

use crate::CliTest;

const SOURCE: &str = r#"export function Greeting() {
  const title = '欢迎';
  return <h1 title="标题">你好</h1>;
}
"#;

#[test]
fn test_extract_writes_locale_files() -> Result<()> {
    let test = CliTest::with_file("src/Greeting.tsx", SOURCE)?;

    let output = test.run(&["extract"])?;

    assert_eq!(output.code, Some(0), "stderr: {}", output.stderr);
    assert!(output.stdout.contains("✓ Scanned 1 file, extracted 3 texts"));

    let zh = test.read_json("locales/zh-CN.json")?;
    assert_eq!(zh["huanying"], "欢迎");
    assert_eq!(zh["biaoti"], "标题");
    assert_eq!(zh["nihao"], "你好");
    assert_eq!(test.read_json("locales/en-US.json")?, serde_json::json!({}));

    // Sources are untouched.
    assert_eq!(test.read_file("src/Greeting.tsx")?, SOURCE);
    Ok(())
}

#[test]
fn test_extract_dry_run_writes_nothing() -> Result<()> {
    let test = CliTest::with_file("src/Greeting.tsx", SOURCE)?;

    let output = test.run(&["extract", "--dry-run"])?;

    assert_eq!(output.code, Some(0));
    assert!(output.stdout.contains("Dry run"));
    assert!(!test.root().join("locales").exists());
    Ok(())
}

#[test]
fn test_extract_pattern_ignore_and_output() -> Result<()> {
    let test = CliTest::with_file("app/page.ts", "export const a = '页面';\n")?;
    test.write_file("app/page.test.ts", "export const b = '测试';\n")?;
    test.write_file("src/other.ts", "export const c = '其他';\n")?;

    let output = test.run(&[
        "extract",
        "-p",
        "app/**/*.ts",
        "-i",
        "**/*.test.ts",
        "-o",
        "i18n",
    ])?;

    assert_eq!(output.code, Some(0));
    let zh = test.read_json("i18n/zh-CN.json")?;
    assert_eq!(zh, serde_json::json!({ "yemian": "页面" }));
    Ok(())
}

#[test]
fn test_extract_uses_config_file() -> Result<()> {
    let test = CliTest::with_file(
        "i18n-xy.config.json",
        r#"{
  "locale": "zh-TW",
  "outputDir": "lang",
  "include": ["web/**/*.js"],
  "keyGeneration": { "keyPrefix": "app" }
}"#,
    )?;
    test.write_file("web/index.js", "alert('保存');\n")?;

    let output = test.run(&["extract"])?;

    assert_eq!(output.code, Some(0), "stderr: {}", output.stderr);
    let table = test.read_json("lang/zh-TW.json")?;
    assert_eq!(table["app_baocun"], "保存");
    Ok(())
}

#[test]
fn test_parse_error_exits_with_failure() -> Result<()> {
    let test = CliTest::with_file("src/broken.ts", "const = '坏';\n")?;
    test.write_file("src/ok.ts", "export const a = '好';\n")?;

    let output = test.run(&["extract"])?;

    assert_eq!(output.code, Some(1));
    assert!(output.stdout.contains("error: Failed to parse"));
    assert!(output.stdout.contains("src/broken.ts"));
    assert_eq!(test.read_json("locales/zh-CN.json")?["hao"], "好");
    Ok(())
}

#[test]
fn test_invalid_config_exits_with_error() -> Result<()> {
    let test = CliTest::with_file(
        "i18n-xy.config.json",
        r#"{ "translation": { "provider": "nope" } }"#,
    )?;

    let output = test.run(&["extract"])?;

    assert_eq!(output.code, Some(2));
    assert!(output.stderr.contains("Error:"));
    assert!(output.stderr.contains("nope"));
    Ok(())
}
