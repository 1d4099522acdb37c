use std::io::Write;

use anyhow::Result;
use berth::application::check::CheckUseCase;
use berth::infrastructure::{LocalFs, LocalPackageIndex, TomlLockRepository};

use crate::commands::context::CommandContext;
use crate::ui::ci::{in_github_actions, Annotation};
use crate::ui::views::check::{render_check_header, render_check_item, render_check_summary};

/// Returns the exit code: 0 when the project would build.
pub fn cmd_check(ctx: &CommandContext, strict_warnings: bool) -> Result<i32> {
    let settings = ctx.settings()?;
    let ui = &ctx.ui;

    if ui.json {
        let mut out = std::io::stdout().lock();
        let _ = crate::ui::json::write_event(
            &mut out,
            &serde_json::json!({
                "event": "start",
                "command": "check",
                "project": settings.project_name,
                "strict_warnings": strict_warnings,
            }),
        );
    } else {
        print!(
            "{}",
            render_check_header(&settings.project_name, ui.color, ui.unicode)
        );
    }

    let use_case = CheckUseCase::new(
        TomlLockRepository::new(),
        LocalPackageIndex::new(&settings.index_dir),
        LocalFs::new(),
    );

    let mut out = std::io::stdout().lock();
    let result = use_case.execute_with_callback(&settings, &ctx.warnings, |item| {
        if ui.json {
            let _ = crate::ui::json::write_event(
                &mut out,
                &serde_json::json!({
                    "event": "check",
                    "command": "check",
                    "name": item.name,
                    "status": item.status.as_str(),
                    "message": item.message,
                    "recommendation": item.recommendation,
                    "details": item.details,
                }),
            );
        } else {
            let _ = write!(
                out,
                "{}",
                render_check_item(item, ui.verbose > 0, ui.color, ui.unicode)
            );
        }
    });

    let has_issues = if strict_warnings {
        !result.is_clean()
    } else {
        !result.is_success()
    };

    if ui.json {
        let _ = crate::ui::json::write_event(
            &mut out,
            &serde_json::json!({
                "event": "complete",
                "command": "check",
                "passes": result.passed,
                "warnings": result.warnings,
                "errors": result.errors,
                "success": !has_issues,
            }),
        );
    } else {
        let _ = write!(out, "{}", render_check_summary(&result, ui.color, ui.unicode));
    }
    let _ = out.flush();
    drop(out);

    if !ui.json && in_github_actions() {
        for annotation in result.items.iter().filter_map(Annotation::for_check_item) {
            println!("{}", annotation.render());
        }
    }

    Ok(if has_issues { 1 } else { 0 })
}
