//! Which menu is active.

/// What the user is currently interacting with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuSituation {
    SessionFocused { modal_open: bool },
    ChatInputFocused,
    ChatInputBlurred { modal_open: bool },
    NoSessions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveMenu {
    Document,
    ChatInput,
    Modal,
    Application,
}

pub fn resolve(situation: MenuSituation) -> ActiveMenu {
    match situation {
        MenuSituation::SessionFocused { modal_open: true }
        | MenuSituation::ChatInputBlurred { modal_open: true } => ActiveMenu::Modal,
        MenuSituation::SessionFocused { modal_open: false }
        | MenuSituation::ChatInputBlurred { modal_open: false } => ActiveMenu::Document,
        MenuSituation::ChatInputFocused => ActiveMenu::ChatInput,
        MenuSituation::NoSessions => ActiveMenu::Application,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_table() {
        let table = [
            (MenuSituation::SessionFocused { modal_open: false }, ActiveMenu::Document),
            (MenuSituation::SessionFocused { modal_open: true }, ActiveMenu::Modal),
            (MenuSituation::ChatInputFocused, ActiveMenu::ChatInput),
            (MenuSituation::ChatInputBlurred { modal_open: true }, ActiveMenu::Modal),
            (MenuSituation::ChatInputBlurred { modal_open: false }, ActiveMenu::Document),
            (MenuSituation::NoSessions, ActiveMenu::Application),
        ];
        for (situation, expected) in table {
            assert_eq!(resolve(situation), expected, "{situation:?}");
        }
    }
}
