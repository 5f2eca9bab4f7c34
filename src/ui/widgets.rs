use gtk4::prelude::*;
use gtk4::{Box as GtkBox, Button, Label, Orientation, ToggleButton};

pub fn icon_button(
    icon_name: &str,
    label: &str,
    control_size: i32,
    extra_classes: &[&str],
) -> Button {
    let content = GtkBox::new(Orientation::Horizontal, 8);
    content.set_halign(gtk4::Align::Center);
    content.append(&gtk4::Image::from_icon_name(icon_name));
    content.append(&Label::new(Some(label)));

    let button = Button::new();
    button.set_child(Some(&content));
    button.set_focus_on_click(false);
    button.add_css_class("icon-button");
    for css_class in extra_classes {
        button.add_css_class(css_class);
    }
    button.set_size_request(-1, control_size);
    button
}

/// Toggle used by the segmented selectors; `active` state is driven by the store.
pub fn choice_button(label: &str, control_size: i32, extra_classes: &[&str]) -> ToggleButton {
    let button = ToggleButton::with_label(label);
    button.set_focus_on_click(false);
    button.set_active(false);
    button.add_css_class("choice-button");
    for css_class in extra_classes {
        button.add_css_class(css_class);
    }
    button.set_size_request(-1, control_size);
    button
}

pub fn section_label(text: &str) -> Label {
    let label = Label::new(Some(text));
    label.set_xalign(0.0);
    label.add_css_class("section-label");
    label
}
