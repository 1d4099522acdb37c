use std::path::Path;

use berth::error::{ArtifactCopyError, DependencyResolutionError, ProcessStartupError};
use berth::{BerthError, JsonEventSink};

use crate::ui::ci::{in_github_actions, Annotation, AnnotationLevel};
use crate::ui::primitives::icon::{dim, Icon};

pub fn format_berth_error(err: &BerthError) -> String {
    let caps = crate::ui::terminal::detect_capabilities();
    format_berth_error_with(err, caps.supports_color, caps.supports_unicode)
}

fn format_berth_error_with(err: &BerthError, supports_color: bool, supports_unicode: bool) -> String {
    let mut out = format!(
        "{} {}\n",
        Icon::Error.colored(supports_color, supports_unicode),
        err
    );
    if let Some(fix) = fix_hint(err) {
        out.push_str(&format!(
            "  {} {}\n",
            Icon::Arrow.render(supports_unicode),
            dim(&fix, supports_color)
        ));
    }
    out
}

/// One line telling the user what to do next
fn fix_hint(err: &BerthError) -> Option<String> {
    match err {
        BerthError::DependencyResolution(e) => match e {
            DependencyResolutionError::LockMissing { .. } => {
                Some("Lock the project dependencies, then build again.".to_string())
            }
            DependencyResolutionError::NotLocked { .. } => {
                Some("Re-lock after changing [project].dependencies.".to_string())
            }
            DependencyResolutionError::Unavailable { .. } => {
                Some("Add the pinned version to the index or point --index elsewhere.".to_string())
            }
            DependencyResolutionError::IntegrityMismatch { .. } => {
                Some("The index content changed since locking; re-lock or restore it.".to_string())
            }
            _ => None,
        },
        BerthError::ArtifactCopy(ArtifactCopyError::MissingArtifact { artifact, .. })
            if *artifact == "installed package set" =>
        {
            Some("Run 'berth stage' (or 'berth build') first.".to_string())
        }
        BerthError::ProcessStartup(e) => match e {
            ProcessStartupError::InvalidImage { .. } => {
                Some("Run 'berth build' to produce an image.".to_string())
            }
            ProcessStartupError::PortInUse { .. } => {
                Some("Stop the other listener or rebuild with --port.".to_string())
            }
            ProcessStartupError::ModuleNotFound { .. } => {
                Some("Check [runtime].module and [build].source in berth.toml.".to_string())
            }
            _ => None,
        },
        BerthError::BuildLocked { .. } => {
            Some("Wait for the other build to finish.".to_string())
        }
        _ => None,
    }
}

pub fn format_error(err: &anyhow::Error) -> String {
    if let Some(berth) = err.downcast_ref::<BerthError>() {
        return format_berth_error(berth);
    }

    format!("[ERROR] {:#}\n", err)
}

fn error_kind(err: &anyhow::Error) -> &'static str {
    err.downcast_ref::<BerthError>()
        .map(BerthError::kind)
        .unwrap_or("internal")
}

fn error_file(err: &anyhow::Error) -> Option<&Path> {
    match err.downcast_ref::<BerthError>()? {
        BerthError::Config { file, .. } => Some(file.as_path()),
        BerthError::DependencyResolution(DependencyResolutionError::LockMissing { path })
        | BerthError::DependencyResolution(DependencyResolutionError::LockMalformed {
            path, ..
        }) => Some(path.as_path()),
        _ => None,
    }
}

pub fn print_error(err: &anyhow::Error, json: bool) {
    if json {
        JsonEventSink::stdout(true).error(error_kind(err), &format!("{:#}", err));
        return;
    }

    if in_github_actions() {
        let mut annotation =
            Annotation::new(AnnotationLevel::Error, err.to_string()).with_title("berth");
        if let Some(file) = error_file(err) {
            annotation = annotation.with_file(file);
        }
        println!("{}", annotation.render());
    }

    eprint!("{}", format_error(err));
}
