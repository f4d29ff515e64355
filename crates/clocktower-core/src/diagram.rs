//! Mermaid rendering of the phase machine.

use crate::TransitionTable;

/// Render the table as a Mermaid `stateDiagram-v2`.
pub fn mermaid(table: &TransitionTable) -> String {
    let mut lines = Vec::new();
    lines.push("stateDiagram-v2".to_string());

    for phase in table.phases() {
        lines.push(format!("    state \"{}\" as {}", phase.label(), phase.as_str()));
    }

    lines.push(format!("    [*] --> {}", table.initial().as_str()));

    for t in table.transitions() {
        lines.push(format!(
            "    {} --> {} : {}",
            t.from.as_str(),
            t.to.as_str(),
            t.event.as_str()
        ));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MachineOptions;

    #[test]
    fn test_full_diagram() {
        let out = mermaid(&TransitionTable::new(MachineOptions::full()));
        assert!(out.starts_with("stateDiagram-v2\n"));
        assert!(out.contains("    [*] --> configuration"));
        assert!(out.contains("    state \"Pre-Day Reveal Phase\" as pre_reveal"));
        assert!(out.contains("    post_game --> configuration : restart_game"));
        assert_eq!(out.matches("-->").count(), 13);
    }

    #[test]
    fn test_reduced_diagram_has_no_configuration() {
        let out = mermaid(&TransitionTable::new(MachineOptions::reduced()));
        assert!(out.contains("    [*] --> pre_game"));
        assert!(out.contains("    night --> day : start_day"));
        assert!(!out.contains("configuration"));
    }
}
