use super::{Modifiers, PointerButton, ToolKey};

pub fn modifiers_from_gdk(modifier: gtk4::gdk::ModifierType) -> Modifiers {
    Modifiers::new(
        modifier.contains(gtk4::gdk::ModifierType::SHIFT_MASK),
        modifier.contains(gtk4::gdk::ModifierType::CONTROL_MASK),
    )
}

pub fn tool_key_from_gdk(key: gtk4::gdk::Key) -> Option<ToolKey> {
    match key {
        gtk4::gdk::Key::Up | gtk4::gdk::Key::KP_Up => Some(ToolKey::Up),
        gtk4::gdk::Key::Down | gtk4::gdk::Key::KP_Down => Some(ToolKey::Down),
        gtk4::gdk::Key::Left | gtk4::gdk::Key::KP_Left => Some(ToolKey::Left),
        gtk4::gdk::Key::Right | gtk4::gdk::Key::KP_Right => Some(ToolKey::Right),
        gtk4::gdk::Key::Return | gtk4::gdk::Key::KP_Enter => Some(ToolKey::Enter),
        gtk4::gdk::Key::Escape => Some(ToolKey::Escape),
        _ => None,
    }
}

pub fn pointer_button_from_gesture(button: u32) -> Option<PointerButton> {
    PointerButton::from_number(button)
}
