//! Keyboard input mapping

use winit::keyboard::{Key, NamedKey};

/// Something the user asked the viewer to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerCommand {
    /// Morph to the model at this index
    SwitchModel(usize),
    IncreasePointSize,
    DecreasePointSize,
    Exit,
}

/// Map a pressed key to a command.
///
/// `F1`..`F9` select models 0..8, `P` shrinks points, `Shift+P` grows them
/// and `Escape` quits.
pub fn command_for_key(key: &Key, shift: bool) -> Option<ViewerCommand> {
    match key {
        Key::Named(named) => match named {
            NamedKey::Escape => Some(ViewerCommand::Exit),
            NamedKey::F1 => Some(ViewerCommand::SwitchModel(0)),
            NamedKey::F2 => Some(ViewerCommand::SwitchModel(1)),
            NamedKey::F3 => Some(ViewerCommand::SwitchModel(2)),
            NamedKey::F4 => Some(ViewerCommand::SwitchModel(3)),
            NamedKey::F5 => Some(ViewerCommand::SwitchModel(4)),
            NamedKey::F6 => Some(ViewerCommand::SwitchModel(5)),
            NamedKey::F7 => Some(ViewerCommand::SwitchModel(6)),
            NamedKey::F8 => Some(ViewerCommand::SwitchModel(7)),
            NamedKey::F9 => Some(ViewerCommand::SwitchModel(8)),
            _ => None,
        },
        Key::Character(c) if c.eq_ignore_ascii_case("p") => Some(if shift {
            ViewerCommand::IncreasePointSize
        } else {
            ViewerCommand::DecreasePointSize
        }),
        _ => None,
    }
}
