use berth::config::ConfigWarning;

use crate::ui::primitives::icon::Icon;

pub fn print_config_warnings(warnings: &[ConfigWarning], color: bool, unicode: bool) {
    let icon = Icon::Warning.colored(color, unicode);
    for w in warnings {
        match w.line {
            Some(line) => eprintln!(
                "{} Unknown config key '{}' in {}:{}",
                icon,
                w.key,
                w.file.display(),
                line
            ),
            None => eprintln!(
                "{} Unknown config key '{}' in {}",
                icon,
                w.key,
                w.file.display()
            ),
        }

        if let Some(suggestion) = &w.suggestion {
            eprintln!("   Did you mean '{}'?", suggestion);
        }
    }
}
