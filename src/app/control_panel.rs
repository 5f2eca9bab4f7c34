use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::compositor::{paint_swatch, resolve_background};
use crate::controls::{
    aspect_label, aspect_patch, background_image_patch, custom_color_patch, custom_color_value,
    export_button_state, gradient_swatch_patch, is_swatch_active, solid_swatch_patch,
    theme_label, theme_patch, watermark_patch, ControlMode, SliderField, Template,
    BACKGROUND_IMAGE_LABEL, FOOTER_NOTE, UPLOAD_LABEL, WATERMARK_TOGGLE_LABEL,
};
use crate::geometry::{Rgba, Size};
use crate::model::{
    AspectRatio, BackgroundType, ConfigPatch, WindowTheme, PRESET_GRADIENTS, PRESET_SOLIDS,
};
use crate::store::{Coordinator, StoreSnapshot};
use crate::ui::{choice_button, icon_button, section_label, StyleTokens};
use gtk4::prelude::*;
use gtk4::{
    gdk, gio, Align, ApplicationWindow, Box as GtkBox, Button, ColorButton, DrawingArea,
    FileChooserAction, FileChooserNative, FileFilter, Grid, Label, Orientation, Overlay,
    PolicyType, ResponseType, Scale, ScrolledWindow, Spinner, Stack, StackSwitcher, Switch,
    ToggleButton,
};

use super::worker::ImageRequest;

const TEMPLATE_TILE_HEIGHT: i32 = 48;
const GRADIENT_COLUMNS: usize = 4;
const SOLID_COLUMNS: usize = 5;
const ASPECT_COLUMNS: usize = 3;
const THEME_COLUMNS: usize = 2;
const TEMPLATE_COLUMNS: usize = 2;

pub(super) type ImageRequestHandler = Rc<dyn Fn(ImageRequest)>;

#[derive(Clone)]
pub(super) struct ControlPanelContext {
    pub(super) style_tokens: StyleTokens,
    pub(super) coordinator: Coordinator,
    pub(super) window: ApplicationWindow,
    pub(super) on_image_request: ImageRequestHandler,
}

struct SliderRow {
    field: SliderField,
    scale: Scale,
    value_label: Label,
}

pub(super) struct ControlPanelUi {
    pub(super) root: GtkBox,
    sliders: Vec<SliderRow>,
    aspect_buttons: Vec<(AspectRatio, ToggleButton)>,
    theme_buttons: Vec<(WindowTheme, ToggleButton)>,
    swatch_buttons: Vec<(&'static str, Button)>,
    custom_color: ColorButton,
    custom_color_label: Label,
    watermark_switch: Switch,
    export_button: Button,
    export_label: Label,
    export_spinner: Spinner,
    status_label: Label,
    /// Set while widgets are pushed from the store, so their signals do not echo back.
    syncing: Rc<Cell<bool>>,
}

impl ControlPanelUi {
    pub(super) fn sync(&self, snapshot: &StoreSnapshot) {
        self.syncing.set(true);
        let config = &snapshot.config;

        for row in &self.sliders {
            let value = row.field.value_of(config);
            if (row.scale.value() - value).abs() > f64::EPSILON {
                row.scale.set_value(value);
            }
            row.value_label.set_text(&row.field.format(value));
        }
        for (aspect, button) in &self.aspect_buttons {
            button.set_active(*aspect == config.aspect_ratio);
        }
        for (theme, button) in &self.theme_buttons {
            button.set_active(*theme == config.window_theme);
        }
        for (value, button) in &self.swatch_buttons {
            if is_swatch_active(config, value) {
                button.add_css_class("swatch-active");
            } else {
                button.remove_css_class("swatch-active");
            }
        }

        let custom = custom_color_value(config);
        match gdk::RGBA::parse(custom) {
            Ok(rgba) => self.custom_color.set_rgba(&rgba),
            Err(err) => tracing::debug!(value = custom, %err, "custom color not parseable"),
        }
        self.custom_color_label.set_text(custom);
        self.watermark_switch.set_active(config.show_watermark);

        let export_state = export_button_state(snapshot.is_busy());
        self.export_button.set_sensitive(export_state.sensitive);
        self.export_label.set_text(export_state.label);
        self.export_spinner.set_visible(export_state.spinning);
        self.export_spinner.set_spinning(export_state.spinning);

        self.syncing.set(false);
    }

    pub(super) fn set_status_text(&self, message: &str) {
        self.status_label.set_text(message);
        self.status_label.set_visible(!message.is_empty());
    }
}

/// Collects the widgets `sync` drives while the pages are built.
struct PanelParts {
    sliders: Vec<SliderRow>,
    aspect_buttons: Vec<(AspectRatio, ToggleButton)>,
    theme_buttons: Vec<(WindowTheme, ToggleButton)>,
    swatch_buttons: Vec<(&'static str, Button)>,
    syncing: Rc<Cell<bool>>,
}

pub(super) fn build_control_panel(context: &ControlPanelContext) -> ControlPanelUi {
    let tokens = context.style_tokens;
    let mut parts = PanelParts {
        sliders: Vec::new(),
        aspect_buttons: Vec::new(),
        theme_buttons: Vec::new(),
        swatch_buttons: Vec::new(),
        syncing: Rc::new(Cell::new(false)),
    };

    let root = GtkBox::new(Orientation::Vertical, 0);
    root.add_css_class("control-panel");
    root.set_width_request(tokens.sidebar_width);
    root.append(&build_header(tokens));

    let stack = Stack::new();
    stack.set_vhomogeneous(false);
    stack.set_vexpand(true);
    let (custom_color, custom_color_label) = custom_color_widgets(context, &parts.syncing);
    let watermark_switch = Switch::new();
    for mode in ControlMode::ALL {
        let page = match mode {
            ControlMode::Templates => build_templates_page(context, &parts),
            ControlMode::Canvas => build_canvas_page(context, &mut parts, &watermark_switch),
            ControlMode::Mockup => build_mockup_page(context, &mut parts),
            ControlMode::Background => {
                build_background_page(context, &mut parts, &custom_color, &custom_color_label)
            }
        };
        let scroller = ScrolledWindow::new();
        scroller.set_policy(PolicyType::Never, PolicyType::Automatic);
        scroller.set_child(Some(&page));
        stack.add_titled(&scroller, Some(mode.page_name()), mode.label());
    }
    let switcher = StackSwitcher::new();
    switcher.set_stack(Some(&stack));
    switcher.add_css_class("mode-tabs");
    switcher.set_hexpand(true);
    root.append(&switcher);

    let upload_row = GtkBox::new(Orientation::Vertical, 0);
    upload_row.add_css_class("mode-page");
    upload_row.append(&build_upload_button(context));
    root.append(&upload_row);
    root.append(&stack);

    let export_spinner = Spinner::new();
    export_spinner.set_visible(false);
    let export_label = Label::new(Some(export_button_state(false).label));
    let export_content = GtkBox::new(Orientation::Horizontal, tokens.spacing_8);
    export_content.set_halign(Align::Center);
    export_content.append(&export_spinner);
    export_content.append(&export_label);
    let export_button = Button::new();
    export_button.set_child(Some(&export_content));
    export_button.add_css_class("primary-button");
    export_button.set_size_request(-1, i32::from(tokens.control_size) + tokens.spacing_4);
    {
        let coordinator = context.coordinator.clone();
        export_button.connect_clicked(move |_| {
            if let Err(err) = coordinator.request_export() {
                tracing::warn!(%err, "export request rejected");
            }
        });
    }

    let footer_note = Label::new(Some(FOOTER_NOTE));
    footer_note.add_css_class("footer-note");
    let status_label = Label::new(None);
    status_label.add_css_class("status-label");
    status_label.set_wrap(true);
    status_label.set_visible(false);

    let footer = GtkBox::new(Orientation::Vertical, tokens.spacing_8);
    footer.add_css_class("panel-footer");
    footer.append(&export_button);
    footer.append(&footer_note);
    footer.append(&status_label);
    root.append(&footer);

    let PanelParts {
        sliders,
        aspect_buttons,
        theme_buttons,
        swatch_buttons,
        syncing,
    } = parts;
    ControlPanelUi {
        root,
        sliders,
        aspect_buttons,
        theme_buttons,
        swatch_buttons,
        custom_color,
        custom_color_label,
        watermark_switch,
        export_button,
        export_label,
        export_spinner,
        status_label,
        syncing,
    }
}

fn build_header(tokens: StyleTokens) -> GtkBox {
    let mark = gtk4::Image::from_icon_name("starred-symbolic");
    mark.add_css_class("brand-mark");
    let title = Label::new(Some("ScreenGlow"));
    title.add_css_class("brand-title");

    let header = GtkBox::new(Orientation::Horizontal, tokens.spacing_8);
    header.add_css_class("panel-header");
    header.append(&mark);
    header.append(&title);
    header
}

fn page_box(tokens: StyleTokens) -> GtkBox {
    let page = GtkBox::new(Orientation::Vertical, tokens.spacing_24);
    page.add_css_class("mode-page");
    page
}

fn section(tokens: StyleTokens, title: &str, child: &impl IsA<gtk4::Widget>) -> GtkBox {
    let section = GtkBox::new(Orientation::Vertical, tokens.spacing_12);
    section.append(&section_label(&title.to_uppercase()));
    section.append(child);
    section
}

fn option_grid(tokens: StyleTokens) -> Grid {
    let grid = Grid::new();
    grid.set_column_spacing(tokens.spacing_8 as u32);
    grid.set_row_spacing(tokens.spacing_8 as u32);
    grid.set_column_homogeneous(true);
    grid
}

fn attach_in_grid(grid: &Grid, widget: &impl IsA<gtk4::Widget>, index: usize, columns: usize) {
    let column = (index % columns) as i32;
    let row = (index / columns) as i32;
    grid.attach(widget, column, row, 1, 1);
}

fn connect_patch_on_click<B, F>(
    button: &B,
    context: &ControlPanelContext,
    syncing: &Rc<Cell<bool>>,
    patch: F,
) where
    B: IsA<Button>,
    F: Fn() -> ConfigPatch + 'static,
{
    let coordinator = context.coordinator.clone();
    let syncing = syncing.clone();
    button.connect_clicked(move |_| {
        if syncing.get() {
            return;
        }
        coordinator.update_config(patch());
    });
}

fn build_upload_button(context: &ControlPanelContext) -> Button {
    let tokens = context.style_tokens;
    let button = icon_button(
        "document-open-symbolic",
        UPLOAD_LABEL,
        i32::from(tokens.control_size),
        &["upload-button"],
    );
    let window = context.window.clone();
    let on_image_request = context.on_image_request.clone();
    button.connect_clicked(move |_| {
        let on_image_request = on_image_request.clone();
        choose_image_file(&window, UPLOAD_LABEL, move |file| match file.path() {
            Some(path) => on_image_request(ImageRequest::Picked(path)),
            None => tracing::debug!(uri = %file.uri(), "ignoring non-local upload"),
        });
    });
    button
}

fn build_templates_page(context: &ControlPanelContext, parts: &PanelParts) -> GtkBox {
    let tokens = context.style_tokens;
    let grid = option_grid(tokens);
    for (index, template) in Template::ALL.into_iter().enumerate() {
        let card = template_card(tokens, template);
        connect_patch_on_click(&card, context, &parts.syncing, move || template.patch());
        attach_in_grid(&grid, &card, index, TEMPLATE_COLUMNS);
    }

    let page = page_box(tokens);
    page.append(&section(tokens, "Quick Start", &grid));
    page
}

fn template_card(tokens: StyleTokens, template: Template) -> Button {
    let radius = f64::from(tokens.control_radius) / 2.0;
    let background = resolve_background(BackgroundType::Gradient, template.gradient());
    let tile = DrawingArea::new();
    tile.set_content_height(TEMPLATE_TILE_HEIGHT);
    tile.set_hexpand(true);
    tile.set_can_target(false);
    tile.set_draw_func(move |_, context, width, height| {
        let size = Size::new(f64::from(width), f64::from(height));
        if let Err(err) = paint_swatch(context, &background, size, radius) {
            tracing::warn!(%err, "failed to paint template tile");
        }
    });

    let icon = gtk4::Image::from_icon_name(template.icon_name());
    icon.set_halign(Align::Center);
    icon.set_valign(Align::Center);
    icon.set_opacity(0.5);
    let overlay = Overlay::new();
    overlay.set_child(Some(&tile));
    overlay.add_overlay(&icon);

    let label = Label::new(Some(template.label()));
    label.set_xalign(0.0);
    let content = GtkBox::new(Orientation::Vertical, tokens.spacing_8);
    content.append(&overlay);
    content.append(&label);

    let card = Button::new();
    card.set_child(Some(&content));
    card.set_focus_on_click(false);
    card.add_css_class("template-card");
    card
}

fn build_canvas_page(
    context: &ControlPanelContext,
    parts: &mut PanelParts,
    watermark_switch: &Switch,
) -> GtkBox {
    let tokens = context.style_tokens;
    let page = page_box(tokens);
    for field in SliderField::CANVAS {
        page.append(&build_slider_row(context, field, parts));
    }

    let grid = option_grid(tokens);
    for (index, aspect) in AspectRatio::ALL.into_iter().enumerate() {
        let button = choice_button(aspect_label(aspect), i32::from(tokens.control_size), &[]);
        connect_patch_on_click(&button, context, &parts.syncing, move || aspect_patch(aspect));
        attach_in_grid(&grid, &button, index, ASPECT_COLUMNS);
        parts.aspect_buttons.push((aspect, button));
    }
    page.append(&section(tokens, "Aspect Ratio", &grid));

    let label = Label::new(Some(WATERMARK_TOGGLE_LABEL));
    label.set_xalign(0.0);
    label.set_hexpand(true);
    watermark_switch.set_valign(Align::Center);
    {
        let coordinator = context.coordinator.clone();
        let syncing = parts.syncing.clone();
        watermark_switch.connect_active_notify(move |switch| {
            if syncing.get() {
                return;
            }
            coordinator.update_config(watermark_patch(switch.is_active()));
        });
    }
    let row = GtkBox::new(Orientation::Horizontal, tokens.spacing_8);
    row.append(&label);
    row.append(watermark_switch);
    page.append(&row);
    page
}

fn build_mockup_page(context: &ControlPanelContext, parts: &mut PanelParts) -> GtkBox {
    let tokens = context.style_tokens;
    let page = page_box(tokens);

    let grid = option_grid(tokens);
    for (index, theme) in WindowTheme::ALL.into_iter().enumerate() {
        let button = choice_button(theme_label(theme), i32::from(tokens.control_size), &[]);
        connect_patch_on_click(&button, context, &parts.syncing, move || theme_patch(theme));
        attach_in_grid(&grid, &button, index, THEME_COLUMNS);
        parts.theme_buttons.push((theme, button));
    }
    page.append(&section(tokens, "Window Style", &grid));

    for field in SliderField::MOCKUP {
        page.append(&build_slider_row(context, field, parts));
    }

    let transforms = GtkBox::new(Orientation::Vertical, tokens.spacing_16);
    for field in SliderField::TRANSFORM {
        transforms.append(&build_slider_row(context, field, parts));
    }
    page.append(&section(tokens, "3D Transforms", &transforms));
    page
}

fn build_background_page(
    context: &ControlPanelContext,
    parts: &mut PanelParts,
    custom_color: &ColorButton,
    custom_color_label: &Label,
) -> GtkBox {
    let tokens = context.style_tokens;
    let page = page_box(tokens);

    let gradients = option_grid(tokens);
    for (index, value) in PRESET_GRADIENTS.into_iter().enumerate() {
        let button = swatch_button(tokens, BackgroundType::Gradient, value);
        connect_swatch(&button, context, &parts.syncing, gradient_swatch_patch(index));
        attach_in_grid(&gradients, &button, index, GRADIENT_COLUMNS);
        parts.swatch_buttons.push((value, button));
    }
    page.append(&section(tokens, "Gradients", &gradients));

    let solids = option_grid(tokens);
    for (index, value) in PRESET_SOLIDS.into_iter().enumerate() {
        let button = swatch_button(tokens, BackgroundType::Solid, value);
        connect_swatch(&button, context, &parts.syncing, solid_swatch_patch(index));
        attach_in_grid(&solids, &button, index, SOLID_COLUMNS);
        parts.swatch_buttons.push((value, button));
    }
    page.append(&section(tokens, "Solid Colors", &solids));

    let custom_row = GtkBox::new(Orientation::Horizontal, tokens.spacing_12);
    custom_color_label.set_xalign(0.0);
    custom_color_label.add_css_class("slider-value");
    custom_row.append(custom_color);
    custom_row.append(custom_color_label);
    page.append(&section(tokens, "Custom Color", &custom_row));

    let image_button = icon_button(
        "image-x-generic-symbolic",
        BACKGROUND_IMAGE_LABEL,
        i32::from(tokens.control_size),
        &[],
    );
    {
        let window = context.window.clone();
        let coordinator = context.coordinator.clone();
        image_button.connect_clicked(move |_| {
            let coordinator = coordinator.clone();
            choose_image_file(&window, BACKGROUND_IMAGE_LABEL, move |file| {
                coordinator.update_config(background_image_patch(file.uri().as_str()));
            });
        });
    }
    page.append(&section(tokens, "Image", &image_button));
    page
}

fn connect_swatch(
    button: &Button,
    context: &ControlPanelContext,
    syncing: &Rc<Cell<bool>>,
    patch: Option<ConfigPatch>,
) {
    if let Some(patch) = patch {
        connect_patch_on_click(button, context, syncing, move || patch.clone());
    }
}

fn swatch_button(tokens: StyleTokens, kind: BackgroundType, value: &'static str) -> Button {
    let size = i32::from(tokens.swatch_size);
    let radius = f64::from(tokens.control_radius) - 2.0;
    let background = resolve_background(kind, value);
    let area = DrawingArea::new();
    area.set_content_width(size);
    area.set_content_height(size);
    area.set_can_target(false);
    area.set_draw_func(move |_, context, width, height| {
        let size = Size::new(f64::from(width), f64::from(height));
        if let Err(err) = paint_swatch(context, &background, size, radius) {
            tracing::warn!(%err, "failed to paint background swatch");
        }
    });

    let button = Button::new();
    button.set_child(Some(&area));
    button.set_focus_on_click(false);
    button.set_tooltip_text(Some(value));
    button.add_css_class("swatch-button");
    button
}

fn custom_color_widgets(
    context: &ControlPanelContext,
    syncing: &Rc<Cell<bool>>,
) -> (ColorButton, Label) {
    let initial = context.coordinator.config();
    let initial = custom_color_value(&initial).to_string();
    let button = ColorButton::new();
    button.set_use_alpha(false);
    button.set_title("Custom Color");
    if let Ok(rgba) = gdk::RGBA::parse(initial.as_str()) {
        button.set_rgba(&rgba);
    }
    {
        let coordinator = context.coordinator.clone();
        let syncing = syncing.clone();
        button.connect_color_set(move |button| {
            if syncing.get() {
                return;
            }
            coordinator.update_config(custom_color_patch(&rgba_to_hex(&button.rgba())));
        });
    }
    (button, Label::new(Some(initial.as_str())))
}

fn rgba_to_hex(rgba: &gdk::RGBA) -> String {
    let channel = |value: f32| (f64::from(value).clamp(0.0, 1.0) * 255.0).round() as u8;
    Rgba::rgb(channel(rgba.red()), channel(rgba.green()), channel(rgba.blue())).to_hex()
}

fn build_slider_row(
    context: &ControlPanelContext,
    field: SliderField,
    parts: &mut PanelParts,
) -> GtkBox {
    let tokens = context.style_tokens;
    let (min, max) = field.range();
    let initial = field.value_of(&context.coordinator.config());

    let name = Label::new(Some(field.label()));
    name.set_xalign(0.0);
    name.set_hexpand(true);
    let value_label = Label::new(Some(field.format(initial).as_str()));
    value_label.add_css_class("slider-value");
    let header = GtkBox::new(Orientation::Horizontal, tokens.spacing_8);
    header.append(&name);
    header.append(&value_label);

    let scale = Scale::with_range(Orientation::Horizontal, min, max, field.step());
    scale.add_css_class("accent-slider");
    scale.set_draw_value(false);
    scale.set_digits(if field.step() < 1.0 { 2 } else { 0 });
    scale.set_hexpand(true);
    scale.set_value(initial);
    {
        let coordinator = context.coordinator.clone();
        let syncing = parts.syncing.clone();
        scale.connect_value_changed(move |scale| {
            if syncing.get() {
                return;
            }
            coordinator.update_config(field.patch(scale.value()));
        });
    }

    let row = GtkBox::new(Orientation::Vertical, tokens.spacing_8);
    row.add_css_class("slider-row");
    row.append(&header);
    row.append(&scale);
    parts.sliders.push(SliderRow {
        field,
        scale,
        value_label,
    });
    row
}

/// Opens a native chooser filtered to images; `on_chosen` runs only on accept.
#[allow(deprecated)]
pub(super) fn choose_image_file<F>(parent: &ApplicationWindow, title: &str, on_chosen: F)
where
    F: Fn(gio::File) + 'static,
{
    let dialog = FileChooserNative::new(
        Some(title),
        Some(parent),
        FileChooserAction::Open,
        Some("_Open"),
        Some("_Cancel"),
    );
    dialog.set_modal(true);
    let filter = FileFilter::new();
    filter.set_name(Some("Images"));
    filter.add_mime_type("image/*");
    dialog.add_filter(&filter);

    // Native dialogs are not kept alive by GTK while shown.
    let keep_alive = Rc::new(RefCell::new(None::<FileChooserNative>));
    {
        let keep_alive = keep_alive.clone();
        dialog.connect_response(move |dialog, response| {
            if response == ResponseType::Accept {
                match dialog.file() {
                    Some(file) => on_chosen(file),
                    None => tracing::debug!("file chooser accepted without a file"),
                }
            }
            keep_alive.borrow_mut().take();
        });
    }
    dialog.show();
    keep_alive.borrow_mut().replace(dialog);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba_to_hex_rounds_channels() {
        let rgba = gdk::RGBA::new(1.0, 0.5, 0.0, 1.0);
        assert_eq!(rgba_to_hex(&rgba), "#ff8000");
    }
}
