use std::io::IsTerminal;

use log::debug;
use zowe_core::HostCapability;

/// Decide once, at startup, what kind of pickers this terminal gets.
///
/// The interactive list needs raw mode on a real terminal for both input and
/// output; pipes, `TERM=dumb` and `--plain` fall back to numbered prompts.
pub fn detect(force_plain: bool) -> HostCapability {
    let term = std::env::var("TERM").unwrap_or_default();
    let capability = capability_for(
        force_plain,
        std::io::stdin().is_terminal(),
        std::io::stderr().is_terminal(),
        &term,
    );
    debug!("Host capability: {:?} (TERM={:?})", capability, term);
    capability
}

fn capability_for(force_plain: bool, stdin_tty: bool, stderr_tty: bool, term: &str) -> HostCapability {
    if force_plain || !stdin_tty || !stderr_tty || term == "dumb" {
        HostCapability::Restricted
    } else {
        HostCapability::RichPicker
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anything_short_of_a_real_terminal_is_restricted() {
        assert_eq!(capability_for(false, true, true, "xterm-256color"), HostCapability::RichPicker);
        assert_eq!(capability_for(true, true, true, "xterm"), HostCapability::Restricted);
        assert_eq!(capability_for(false, false, true, "xterm"), HostCapability::Restricted);
        assert_eq!(capability_for(false, true, false, "xterm"), HostCapability::Restricted);
        assert_eq!(capability_for(false, true, true, "dumb"), HostCapability::Restricted);
    }
}
