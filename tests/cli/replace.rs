use anyhow::Result;
use pretty_assertions::assert_eq;

use crate::CliTest;

#[test]
fn test_replace_rewrites_sources() -> Result<()> {
    let test = CliTest::with_file(
        "src/App.tsx",
        r#"import React from 'react';

export const App = ({ name }) => (
  <div>
    <input placeholder="请输入" />
    {`你好${name}，欢迎`}
    <p>保存</p>
  </div>
);
"#,
    )?;

    let output = test.run(&["replace"])?;

    assert_eq!(output.code, Some(0), "stderr: {}", output.stderr);
    assert!(output.stdout.contains("Replaced text in 1 file:"));
    insta::assert_snapshot!(test.read_file("src/App.tsx")?, @r#"
    import React from 'react';

    export const App = ({ name }) => (
      <div>
        <input placeholder={$t("qingshuru")} />
        {`${$t('nihao')}${name}${$t('huanying')}`}
        <p>{$t('baocun')}</p>
      </div>
    );
    "#);
    Ok(())
}

#[test]
fn test_replace_is_idempotent() -> Result<()> {
    let test = CliTest::with_file("src/a.ts", "export const a = \"你好\";\n")?;

    test.run(&["replace"])?;
    let first = test.read_file("src/a.ts")?;
    assert_eq!(first, "export const a = $t(\"nihao\");\n");

    let output = test.run(&["replace"])?;
    assert_eq!(output.code, Some(0));
    assert!(output.stdout.contains("extracted 0 texts"));
    assert_eq!(test.read_file("src/a.ts")?, first);
    assert_eq!(test.read_json("locales/zh-CN.json")?["nihao"], "你好");
    Ok(())
}

#[test]
fn test_replace_dry_run() -> Result<()> {
    let source = "export const a = '你好';\n";
    let test = CliTest::with_file("src/a.ts", source)?;

    let output = test.run(&["replace", "--dry-run"])?;

    assert_eq!(output.code, Some(0));
    assert!(output.stdout.contains("Would replace text in 1 file:"));
    assert_eq!(test.read_file("src/a.ts")?, source);
    assert!(!test.root().join("locales").exists());
    Ok(())
}

#[test]
fn test_replace_with_auto_import() -> Result<()> {
    let test = CliTest::with_file(
        "i18n-xy.config.json",
        r#"{
  "replacement": {
    "functionName": "t",
    "quote": "double",
    "autoImport": {
      "imports": { "t": { "importStatement": "import { t } from '@/i18n';" } }
    }
  }
}"#,
    )?;
    test.write_file(
        "src/a.tsx",
        "import React from 'react';\nexport const A = () => <b>确定</b>;\n",
    )?;
    test.write_file("src/b.ts", "import { t } from 'elsewhere';\nt('x'); const b = '取消';\n")?;

    let output = test.run(&["replace", "--auto-import"])?;

    assert_eq!(output.code, Some(0), "stderr: {}", output.stderr);
    assert_eq!(
        test.read_file("src/a.tsx")?,
        "import React from 'react';\nimport { t } from '@/i18n';\nexport const A = () => <b>{t(\"queding\")}</b>;\n"
    );
    assert_eq!(
        test.read_file("src/b.ts")?,
        "import { t } from 'elsewhere';\nt('x'); const b = t('quxiao');\n"
    );
    Ok(())
}
