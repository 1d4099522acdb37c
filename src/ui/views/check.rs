use berth::application::check::{CheckItem, CheckResult, CheckStatus};

use crate::ui::primitives::icon::Icon;

pub fn render_check_header(project: &str, supports_color: bool, supports_unicode: bool) -> String {
    format!(
        "{} Berth Check: {}\n\n",
        Icon::Check.colored(supports_color, supports_unicode),
        project
    )
}

pub fn render_check_item(
    item: &CheckItem,
    verbose: bool,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let icon = match item.status {
        CheckStatus::Pass => Icon::Success,
        CheckStatus::Warning => Icon::Warning,
        CheckStatus::Error => Icon::Error,
    }
    .colored(supports_color, supports_unicode);
    let arrow = Icon::Arrow.colored(supports_color, supports_unicode);

    let mut out = format!("  {} {} - {}\n", icon, item.name, item.message);
    if let Some(rec) = &item.recommendation {
        out.push_str(&format!("    {} {}\n", arrow, rec));
    }
    // Failures always show their details.
    if verbose || item.status == CheckStatus::Error {
        for detail in &item.details {
            out.push_str(&format!("    {} {}\n", arrow, detail));
        }
    }
    out
}

pub fn render_check_summary(
    result: &CheckResult,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let (icon, title) = if !result.is_success() {
        (Icon::Error, "Check FAILED")
    } else if result.warnings > 0 {
        (Icon::Warning, "Check passed with warnings")
    } else {
        (Icon::Success, "All checks passed")
    };

    format!(
        "\n{} {}: {} passed, {} warning(s), {} error(s)\n",
        icon.colored(supports_color, supports_unicode),
        title,
        result.passed,
        result.warnings,
        result.errors
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(status: CheckStatus) -> CheckItem {
        CheckItem {
            name: "package anyio".to_string(),
            status,
            message: "anyio==4.9.0 not found in wheelhouse".to_string(),
            recommendation: None,
            details: vec!["available: 4.8.0".to_string()],
        }
    }

    #[test]
    fn error_item_shows_details() {
        let rendered = render_check_item(&item(CheckStatus::Error), false, false, false);
        assert_eq!(
            rendered,
            "  [FAIL] package anyio - anyio==4.9.0 not found in wheelhouse\n    [>] available: 4.8.0\n"
        );
    }

    #[test]
    fn passing_item_hides_details_unless_verbose() {
        let quiet = render_check_item(&item(CheckStatus::Pass), false, false, false);
        assert!(!quiet.contains("available"));

        let verbose = render_check_item(&item(CheckStatus::Pass), true, false, false);
        assert!(verbose.contains("[>] available: 4.8.0"));
    }

    #[test]
    fn summary_reflects_counts() {
        let result = CheckResult {
            items: Vec::new(),
            passed: 4,
            warnings: 1,
            errors: 0,
        };
        insta::assert_snapshot!(
            render_check_summary(&result, false, false).trim(),
            @"[WARN] Check passed with warnings: 4 passed, 1 warning(s), 0 error(s)"
        );
    }
}
