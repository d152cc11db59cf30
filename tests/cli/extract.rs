use anyhow::Result;
use pretty_assertions::assert_eq;

use crate::{CliTest, run, stderr, stdout};

const TEMPLATE: &str = r#"<h1>{{ 'HOME.TITLE' | translate }}</h1>
<p translate>HOME.INTRO</p>
<button [translate]="'ACTIONS.SAVE'"></button>
"#;

const COMPONENT: &str = r#"import { Component, inject } from '@angular/core';
import { TranslateService } from '@ngx-translate/core';
import { marker as _ } from '@biesbjerg/ngx-translate-extract-marker';

const TITLES = [_('TITLES.FIRST'), _('TITLES.SECOND')];

@Component({
  selector: 'app-home',
  template: `<span>{{ 'HOME.INLINE' | translate }}</span>`,
})
export class HomeComponent {
  private readonly translate = inject(TranslateService);

  save(): void {
    this.translate.instant('ACTIONS.SAVED');
  }
}
"#;

fn project() -> Result<CliTest> {
    let test = CliTest::with_file("src/app/home.component.html", TEMPLATE)?;
    test.write_file("src/app/home.component.ts", COMPONENT)?;
    Ok(test)
}

#[test]
fn test_extract_to_new_file() -> Result<()> {
    let test = project()?;

    let output = run(test.extract_command("src/assets/i18n/en.json", &[]))?;

    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(
        test.read_file("src/assets/i18n/en.json")?,
        concat!(
            "{\n",
            "\t\"HOME.TITLE\": \"\",\n",
            "\t\"HOME.INTRO\": \"\",\n",
            "\t\"ACTIONS.SAVE\": \"\",\n",
            "\t\"HOME.INLINE\": \"\",\n",
            "\t\"ACTIONS.SAVED\": \"\",\n",
            "\t\"TITLES.FIRST\": \"\",\n",
            "\t\"TITLES.SECOND\": \"\"\n",
            "}\n",
        )
    );
    assert_eq!(
        stdout(&output),
        "\u{2713} Extracted 7 keys from 2 files\n  --> src/assets/i18n/en.json (7 keys)\n"
    );
    Ok(())
}

#[test]
fn test_merge_keeps_existing_translations() -> Result<()> {
    let test = project()?;
    test.write_file(
        "i18n/de.json",
        r#"{ "HOME.TITLE": "Startseite", "LEGACY": "Alt" }"#,
    )?;

    let output = run(test.extract_command("i18n/de.json", &["--sort"]))?;

    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(
        test.read_file("i18n/de.json")?,
        concat!(
            "{\n",
            "\t\"ACTIONS.SAVE\": \"\",\n",
            "\t\"ACTIONS.SAVED\": \"\",\n",
            "\t\"HOME.INLINE\": \"\",\n",
            "\t\"HOME.INTRO\": \"\",\n",
            "\t\"HOME.TITLE\": \"Startseite\",\n",
            "\t\"LEGACY\": \"Alt\",\n",
            "\t\"TITLES.FIRST\": \"\",\n",
            "\t\"TITLES.SECOND\": \"\"\n",
            "}\n",
        )
    );
    Ok(())
}

#[test]
fn test_clean_with_key_as_default_value() -> Result<()> {
    let test = project()?;
    test.write_file(
        "i18n/en.json",
        r#"{ "HOME.TITLE": "Home", "LEGACY": "Old" }"#,
    )?;

    let output = run(test.extract_command("i18n/en.json", &["-c", "-k", "-s"]))?;

    assert!(output.status.success(), "{}", stderr(&output));
    let written = test.read_file("i18n/en.json")?;
    assert!(!written.contains("LEGACY"));
    assert!(written.contains("\"HOME.TITLE\": \"Home\""));
    assert!(written.contains("\"HOME.INTRO\": \"HOME.INTRO\""));
    Ok(())
}

#[test]
fn test_replace_discards_existing_file() -> Result<()> {
    let test = project()?;
    test.write_file("i18n/en.json", r#"{ "HOME.TITLE": "Home", "LEGACY": "Old" }"#)?;

    let output = run(test.extract_command("i18n/en.json", &["--replace"]))?;

    assert!(output.status.success(), "{}", stderr(&output));
    let written = test.read_file("i18n/en.json")?;
    assert!(!written.contains("LEGACY"));
    assert!(written.contains("\"HOME.TITLE\": \"\""));
    Ok(())
}

#[test]
fn test_second_run_is_byte_identical() -> Result<()> {
    let test = project()?;

    run(test.extract_command("i18n/en.json", &["-k"]))?;
    let first = test.read_file("i18n/en.json")?;
    run(test.extract_command("i18n/en.json", &["-k"]))?;
    let second = test.read_file("i18n/en.json")?;

    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_custom_service_and_method_names() -> Result<()> {
    let test = CliTest::with_file(
        "src/labels.ts",
        r#"
export class Labels {
  constructor(private i18n: I18nService) {}

  load() {
    this.i18n.lookup('CUSTOM.KEY');
    this.i18n.get('DEFAULT.KEY');
  }
}
"#,
    )?;

    let output = run(test.extract_command(
        "en.json",
        &["--sn", "I18nService", "--mn", "lookup"],
    ))?;

    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(
        test.read_file("en.json")?,
        "{\n\t\"CUSTOM.KEY\": \"\",\n\t\"DEFAULT.KEY\": \"\"\n}\n"
    );
    Ok(())
}

#[test]
fn test_verbose_lists_files() -> Result<()> {
    let test = project()?;

    let output = run(test.extract_command("en.json", &["-v"]))?;

    assert!(output.status.success(), "{}", stderr(&output));
    let stdout = stdout(&output);
    assert!(stdout.contains("src/app/home.component.html  3 keys"));
    assert!(stdout.contains("src/app/home.component.ts    4 keys"));
    Ok(())
}

#[test]
fn test_unmatched_pattern_warns() -> Result<()> {
    let test = project()?;

    let output = run(test.extract_command("en.json", &["-p", "/**/*.html", "/**/*.vue"]))?;

    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stderr(&output).contains("warning: no files found matching"));
    assert!(test.read_file("en.json")?.contains("HOME.TITLE"));
    assert!(!test.read_file("en.json")?.contains("ACTIONS.SAVED"));
    Ok(())
}

#[test]
fn test_missing_input_directory() -> Result<()> {
    let test = CliTest::new()?;

    let output = run(test.extract_command("en.json", &[]))?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("The path you supplied was not found: 'src'"));
    assert!(!test.root().join("en.json").exists());
    Ok(())
}

#[test]
fn test_missing_output() -> Result<()> {
    let test = project()?;

    let mut cmd = test.command();
    cmd.args(["--input", "src"]);
    let output = run(cmd)?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("No output path given"));
    Ok(())
}

#[test]
fn test_default_value_flags_conflict() -> Result<()> {
    let test = project()?;

    let output = run(test.extract_command("en.json", &["-k", "-n"]))?;

    assert_eq!(output.status.code(), Some(2));
    assert!(!test.root().join("en.json").exists());
    Ok(())
}

#[test]
fn test_null_as_default_value_keeps_unset_values_null() -> Result<()> {
    let test = CliTest::with_file("src/app.html", "<p>{{ 'NEW' | translate }}</p>")?;
    test.write_file("en.json", "{\n\t\"OLD\": \"x\",\n\t\"NEW\": null\n}\n")?;

    let output = run(test.extract_command("en.json", &["-n", "-s"]))?;
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(
        test.read_file("en.json")?,
        "{\n\t\"NEW\": null,\n\t\"OLD\": \"x\"\n}\n"
    );

    let output = run(test.extract_command("en.json", &["-s"]))?;
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(
        test.read_file("en.json")?,
        "{\n\t\"NEW\": \"\",\n\t\"OLD\": \"x\"\n}\n"
    );
    Ok(())
}

#[test]
fn test_parse_error_aborts_without_writing() -> Result<()> {
    let test = project()?;
    test.write_file("src/app/broken.ts", "export class {")?;
    test.write_file("en.json", "{\n\t\"KEEP\": \"me\"\n}\n")?;

    let output = run(test.extract_command("en.json", &[]))?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("broken.ts"));
    assert_eq!(test.read_file("en.json")?, "{\n\t\"KEEP\": \"me\"\n}\n");
    Ok(())
}
