use anyhow::Result;
use pretty_assertions::assert_eq;

use crate::{CliTest, run, stderr};

fn project() -> Result<CliTest> {
    CliTest::with_file(
        "src/app.component.html",
        r#"<h1>{{ 'HOME.TITLE' | translate }}</h1>
<p>{{ "HOME.BODY" | translate:params }}</p>
<footer translate>FOOTER</footer>
"#,
    )
}

#[test]
fn test_namespaced_json_with_indentation() -> Result<()> {
    let test = project()?;

    let output = run(test.extract_command(
        "en.json",
        &["--format", "namespaced-json", "--fi", "  "],
    ))?;

    assert!(output.status.success(), "{}", stderr(&output));
    insta::assert_snapshot!(test.read_file("en.json")?, @r#"
    {
      "HOME": {
        "TITLE": "",
        "BODY": ""
      },
      "FOOTER": ""
    }
    "#);
    Ok(())
}

#[test]
fn test_namespaced_json_merges_nested_file() -> Result<()> {
    let test = project()?;
    test.write_file("en.json", r#"{ "HOME": { "TITLE": "Welcome" } }"#)?;

    let output = run(test.extract_command("en.json", &["-f", "namespaced-json", "--fi", "  "]))?;

    assert!(output.status.success(), "{}", stderr(&output));
    insta::assert_snapshot!(test.read_file("en.json")?, @r#"
    {
      "HOME": {
        "TITLE": "Welcome",
        "BODY": ""
      },
      "FOOTER": ""
    }
    "#);
    Ok(())
}

#[test]
fn test_pot_output_in_directory() -> Result<()> {
    let test = project()?;
    std::fs::create_dir_all(test.root().join("i18n"))?;

    let output = run(test.extract_command("i18n", &["-f", "pot", "-s"]))?;

    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(
        test.read_file("i18n/strings.pot")?,
        concat!(
            "msgid \"\"\n",
            "msgstr \"\"\n",
            "\"Content-Type: text/plain; charset=utf-8\\n\"\n",
            "\"Content-Transfer-Encoding: 8bit\\n\"\n",
            "\n",
            "msgid \"FOOTER\"\n",
            "msgstr \"\"\n",
            "\n",
            "msgid \"HOME.BODY\"\n",
            "msgstr \"\"\n",
            "\n",
            "msgid \"HOME.TITLE\"\n",
            "msgstr \"\"\n",
        )
    );
    Ok(())
}

#[test]
fn test_pot_keeps_existing_translations() -> Result<()> {
    let test = project()?;
    test.write_file(
        "de.pot",
        "msgid \"\"\nmsgstr \"\"\n\nmsgid \"FOOTER\"\nmsgstr \"Fußzeile\"\n",
    )?;

    let output = run(test.extract_command("de.pot", &["-f", "pot"]))?;

    assert!(output.status.success(), "{}", stderr(&output));
    assert!(test.read_file("de.pot")?.contains("msgid \"FOOTER\"\nmsgstr \"Fußzeile\"\n"));
    Ok(())
}

#[test]
fn test_malformed_existing_output_is_fatal() -> Result<()> {
    let test = project()?;
    test.write_file("en.json", "[1, 2, 3]")?;

    let output = run(test.extract_command("en.json", &[]))?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Failed to parse existing output"));
    assert_eq!(test.read_file("en.json")?, "[1, 2, 3]");
    Ok(())
}
