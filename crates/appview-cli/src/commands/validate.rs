//! Validate command implementation
//!
//! Validates one appearance document, or every document of a category.

use anyhow::{Context, Result};
use appview_model::{validate_appearance, Category};
use appview_preview::{AssetBackend, DirectoryBackend};
use colored::Colorize;
use std::process::ExitCode;

use super::json_output::{error_codes, JsonIssue, ValidateItem, ValidateOutput};
use super::Workspace;

/// Run the validate command
///
/// # Arguments
/// * `id` - Appearance to validate; every document of `category` when `None`
///
/// # Returns
/// Exit code: 0 if all valid, 1 if any document is invalid or unreadable
pub fn run(
    workspace: &Workspace,
    category: Category,
    id: Option<u32>,
    json_output: bool,
) -> Result<ExitCode> {
    let backend = workspace.backend();
    let ids = match id {
        Some(id) => vec![id],
        None => backend
            .list_ids(category)
            .with_context(|| format!("Failed to list {} in {}", category, workspace.assets))?,
    };

    let report = validate_ids(&backend, category, &ids);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(if report.ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

/// Validates the given documents; unreadable ones are reported, not raised.
pub fn validate_ids(backend: &DirectoryBackend, category: Category, ids: &[u32]) -> ValidateOutput {
    let items: Vec<ValidateItem> = ids
        .iter()
        .map(|&id| match backend.appearance_details(category, id) {
            Ok(item) => {
                let result = validate_appearance(&item);
                ValidateItem {
                    id,
                    ok: result.is_ok(),
                    errors: result.errors.iter().map(JsonIssue::from).collect(),
                    warnings: result.warnings.iter().map(JsonIssue::from).collect(),
                }
            }
            Err(e) => ValidateItem {
                id,
                ok: false,
                errors: vec![JsonIssue::new(error_codes::LOAD_FAILED, e.to_string())],
                warnings: Vec::new(),
            },
        })
        .collect();

    ValidateOutput {
        category,
        ok: items.iter().all(|item| item.ok),
        items,
    }
}

fn print_report(report: &ValidateOutput) {
    println!(
        "{} {} ({} document(s))",
        "Validating:".cyan().bold(),
        report.category,
        report.items.len()
    );

    for item in &report.items {
        let status = if item.ok { "ok".green() } else { "FAIL".red() };
        println!("  {} #{}", status, item.id);
        for error in &item.errors {
            print_issue(&error.code.red().to_string(), error);
        }
        for warning in &item.warnings {
            print_issue(&warning.code.yellow().to_string(), warning);
        }
    }

    let invalid = report.items.iter().filter(|item| !item.ok).count();
    if invalid == 0 {
        println!("\n{} All documents are valid", "SUCCESS".green().bold());
    } else {
        println!(
            "\n{} {} of {} document(s) invalid",
            "FAILED".red().bold(),
            invalid,
            report.items.len()
        );
    }
}

fn print_issue(code: &str, issue: &JsonIssue) {
    let path = issue
        .path
        .as_ref()
        .map(|p| format!(" at {}", p))
        .unwrap_or_default();
    println!("      [{}]{}: {}", code, path.dimmed(), issue.message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use appview_model::{AppearanceItem, FrameGroup, SpriteInfo};
    use pretty_assertions::assert_eq;
    use std::fs;

    #[test]
    fn test_validate_directory() {
        let dir = tempfile::tempdir().unwrap();
        let backend = DirectoryBackend::new(dir.path());
        fs::create_dir_all(dir.path().join("Effects")).unwrap();

        let good = AppearanceItem::new(1)
            .with_name("Spark")
            .with_group(FrameGroup::new(SpriteInfo::new(vec![9])));
        let bad = AppearanceItem::new(2)
            .with_name("Broken")
            .with_group(FrameGroup::new(SpriteInfo::new(vec![9]).with_layers(2)));
        for item in [good, bad] {
            fs::write(
                backend.appearance_path(Category::Effects, item.id),
                item.to_json_pretty().unwrap(),
            )
            .unwrap();
        }
        fs::write(backend.appearance_path(Category::Effects, 3), "{ not json").unwrap();

        let ids = backend.list_ids(Category::Effects).unwrap();
        let report = validate_ids(&backend, Category::Effects, &ids);

        assert!(!report.ok);
        let status: Vec<(u32, bool)> = report.items.iter().map(|i| (i.id, i.ok)).collect();
        assert_eq!(status, vec![(1, true), (2, false), (3, false)]);
        assert_eq!(report.items[1].errors[0].code, "E001");
        assert_eq!(report.items[2].errors[0].code, "CLI_001");
    }
}
