use anyhow::Result;
use pretty_assertions::assert_eq;

use crate::{CliTest, run, stderr};

#[test]
fn test_config_file_supplies_settings() -> Result<()> {
    let test = CliTest::with_file(
        ".extractrc.json",
        r#"{
            "input": ["./src"],
            "output": ["./i18n/en.json"],
            "sort": true,
            "keyAsDefaultValue": true,
            "markerName": "t"
        }"#,
    )?;
    test.write_file(
        "src/keys.ts",
        r#"import { t } from './t';
export const KEYS = [t('ZULU'), t('ALPHA')];
"#,
    )?;

    let output = run(test.command())?;

    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(
        test.read_file("i18n/en.json")?,
        "{\n\t\"ALPHA\": \"ALPHA\",\n\t\"ZULU\": \"ZULU\"\n}\n"
    );
    Ok(())
}

#[test]
fn test_arguments_override_config_file() -> Result<()> {
    let test = CliTest::with_file(
        ".extractrc.json",
        r#"{ "input": ["./src"], "output": ["./i18n/en.json"], "format": "pot" }"#,
    )?;
    test.write_file("src/app.html", "{{ 'KEY' | translate }}")?;

    let output = run(test.extract_command("out.json", &["-f", "json"]))?;

    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(test.read_file("out.json")?, "{\n\t\"KEY\": \"\"\n}\n");
    assert!(!test.root().join("i18n/en.json").exists());
    Ok(())
}

#[test]
fn test_invalid_config_file() -> Result<()> {
    let test = CliTest::with_file(".extractrc.json", r#"{ "format": "xliff" }"#)?;

    let output = run(test.command())?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Failed to parse config file"));
    Ok(())
}
