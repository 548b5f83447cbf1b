//! Global key bindings
//!
//! | key | action |
//! |---|---|
//! | Ctrl+h / Backspace / Shift+Left | focus left |
//! | Ctrl+j / Shift+Down | focus down |
//! | Ctrl+k / Shift+Up | focus up |
//! | Ctrl+l / Shift+Right | focus right |
//! | `1`-`9` | switch tab |
//! | Tab / Shift+Tab | next / previous tab |
//! | `?` | toggle help |
//! | `q` / Ctrl+c | quit |
//!
//! Everything else goes to the active widget.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use panedeck_core::{Direction, Message};

/// Key hints shown in the status bar.
pub const HINTS: &str = "^hjkl:move 1-9:tab ?:help q:quit";

/// Full help text shown while help is toggled on.
pub const HELP: &str =
    "Ctrl+h/j/k/l or Shift+arrows: move focus | 1-9, Tab, Shift+Tab: tabs | q: quit";

/// Maps a key press to the dashboard message it triggers.
///
/// Keys without a global binding come back as [`Message::Key`]; key
/// releases map to [`Message::None`].
///
/// ```
/// use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
/// use panedeck_core::{Direction, Message};
/// use panedeck_ui::keymap::message_for_key;
///
/// let key = KeyEvent::new(KeyCode::Char('l'), KeyModifiers::CONTROL);
/// assert_eq!(message_for_key(key), Message::Focus(Direction::Right));
/// assert_eq!(
///     message_for_key(KeyEvent::from(KeyCode::Char('3'))),
///     Message::SwitchTab(2)
/// );
/// ```
#[must_use]
pub fn message_for_key(key: KeyEvent) -> Message {
    if key.kind == KeyEventKind::Release {
        return Message::None;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);

    match key.code {
        KeyCode::Char('h') if ctrl => Message::Focus(Direction::Left),
        KeyCode::Char('j') if ctrl => Message::Focus(Direction::Bottom),
        KeyCode::Char('k') if ctrl => Message::Focus(Direction::Top),
        KeyCode::Char('l') if ctrl => Message::Focus(Direction::Right),
        KeyCode::Char('c') if ctrl => Message::Quit,
        KeyCode::Backspace => Message::Focus(Direction::Left),
        KeyCode::Left if shift => Message::Focus(Direction::Left),
        KeyCode::Down if shift => Message::Focus(Direction::Bottom),
        KeyCode::Up if shift => Message::Focus(Direction::Top),
        KeyCode::Right if shift => Message::Focus(Direction::Right),
        KeyCode::Tab => Message::NextTab,
        KeyCode::BackTab => Message::PrevTab,
        KeyCode::Char(c @ '1'..='9') if !ctrl => {
            Message::SwitchTab(c as usize - '1' as usize)
        }
        KeyCode::Char('?') => Message::ToggleHelp,
        KeyCode::Char('q') if !ctrl => Message::Quit,
        _ => Message::Key(key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_ctrl_hjkl_move_focus() {
        assert_eq!(message_for_key(ctrl('h')), Message::Focus(Direction::Left));
        assert_eq!(message_for_key(ctrl('j')), Message::Focus(Direction::Bottom));
        assert_eq!(message_for_key(ctrl('k')), Message::Focus(Direction::Top));
        assert_eq!(message_for_key(ctrl('l')), Message::Focus(Direction::Right));
    }

    #[test]
    fn test_shift_arrows_move_focus() {
        let key = KeyEvent::new(KeyCode::Down, KeyModifiers::SHIFT);
        assert_eq!(message_for_key(key), Message::Focus(Direction::Bottom));
        let key = KeyEvent::new(KeyCode::Left, KeyModifiers::SHIFT);
        assert_eq!(message_for_key(key), Message::Focus(Direction::Left));
    }

    #[test]
    fn test_backspace_moves_left() {
        assert_eq!(
            message_for_key(KeyEvent::from(KeyCode::Backspace)),
            Message::Focus(Direction::Left)
        );
    }

    #[test]
    fn test_plain_arrows_go_to_widget() {
        let key = KeyEvent::from(KeyCode::Down);
        assert_eq!(message_for_key(key), Message::Key(key));
    }

    #[test]
    fn test_digits_switch_tabs() {
        assert_eq!(message_for_key(KeyEvent::from(KeyCode::Char('1'))), Message::SwitchTab(0));
        assert_eq!(message_for_key(KeyEvent::from(KeyCode::Char('9'))), Message::SwitchTab(8));
        let zero = KeyEvent::from(KeyCode::Char('0'));
        assert_eq!(message_for_key(zero), Message::Key(zero));
    }

    #[test]
    fn test_tab_cycling() {
        assert_eq!(message_for_key(KeyEvent::from(KeyCode::Tab)), Message::NextTab);
        let back = KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT);
        assert_eq!(message_for_key(back), Message::PrevTab);
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(message_for_key(KeyEvent::from(KeyCode::Char('q'))), Message::Quit);
        assert_eq!(message_for_key(ctrl('c')), Message::Quit);
    }

    #[test]
    fn test_release_is_ignored() {
        let mut key = ctrl('l');
        key.kind = KeyEventKind::Release;
        assert_eq!(message_for_key(key), Message::None);
    }

    #[test]
    fn test_unbound_key_is_forwarded() {
        let key = KeyEvent::from(KeyCode::Enter);
        assert_eq!(message_for_key(key), Message::Key(key));
    }
}
