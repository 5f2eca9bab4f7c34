use crate::ui::{ColorTokens, StyleTokens};
use gtk4::CssProvider;

pub(super) fn runtime_css(tokens: StyleTokens, colors: &ColorTokens, motion_enabled: bool) -> String {
    let motion_hover_ms = if motion_enabled {
        tokens.motion_hover_ms
    } else {
        0
    };
    format!(
        "
window.screenglow-root {{
  background: {window_background};
  color: {text_color};
}}
.screenglow-root label {{
  color: {text_color};
}}
.control-panel {{
  background: {panel_background};
  border-right: {border_width}px solid {border_color};
}}
.panel-header,
.panel-footer {{
  padding: {spacing_16}px;
}}
.panel-header {{
  border-bottom: {border_width}px solid {border_color};
}}
.panel-footer {{
  border-top: {border_width}px solid {border_color};
}}
.brand-mark {{
  min-width: 28px;
  min-height: 28px;
  border-radius: {control_radius}px;
  background-image: linear-gradient(45deg, #a855f7, #ec4899);
  color: #ffffff;
}}
.brand-title {{
  font-size: 18px;
  font-weight: 700;
}}
.mode-tabs button {{
  border-radius: 0;
  border: none;
  border-bottom: 2px solid transparent;
  background: transparent;
  box-shadow: none;
  padding: {spacing_12}px {spacing_4}px;
  transition: border-color {motion_hover_ms}ms cubic-bezier(0.4, 0, 0.2, 1);
}}
.mode-tabs button label {{
  color: {muted_text_color};
}}
.mode-tabs button:checked {{
  border-bottom-color: {focus_ring_color};
}}
.mode-tabs button:checked label {{
  color: {text_color};
}}
.mode-page {{
  padding: {spacing_16}px;
}}
.section-label {{
  font-size: 11px;
  font-weight: 600;
  letter-spacing: 1px;
  color: {muted_text_color};
}}
.slider-row .slider-value {{
  color: {muted_text_color};
  font-size: 12px;
}}
scale.accent-slider highlight {{
  background: {focus_ring_color};
}}
button.choice-button,
button.template-card,
button.icon-button {{
  border-radius: {control_radius}px;
  border: {border_width}px solid {border_color};
  background: transparent;
  box-shadow: none;
  transition: border-color {motion_hover_ms}ms cubic-bezier(0.4, 0, 0.2, 1),
              background {motion_hover_ms}ms cubic-bezier(0.4, 0, 0.2, 1);
}}
button.choice-button:hover,
button.template-card:hover,
button.icon-button:hover {{
  border-color: {focus_ring_color};
}}
button.template-card {{
  border-radius: {panel_radius}px;
  padding: {spacing_8}px;
}}
button.choice-button:checked {{
  background: {accent_background};
  border-color: {accent_background};
}}
button.choice-button:checked label {{
  color: {accent_text_color};
}}
button.swatch-button {{
  padding: 0;
  min-width: {swatch_size}px;
  min-height: {swatch_size}px;
  border-radius: {control_radius}px;
  border: 2px solid transparent;
  background: transparent;
  box-shadow: none;
}}
button.swatch-button.swatch-active {{
  border-color: {text_color};
}}
button.primary-button {{
  border-radius: {control_radius}px;
  background: {accent_background};
  border: none;
  font-weight: 600;
}}
button.primary-button label {{
  color: {accent_text_color};
}}
button.primary-button:disabled {{
  opacity: 0.5;
}}
.footer-note,
.status-label {{
  font-size: 11px;
  color: {muted_text_color};
}}
.preview-stage {{
  background: {stage_background};
}}
.preview-stage.drop-active {{
  box-shadow: inset 0 0 0 2px {focus_ring_color};
}}
.screenglow-root button:focus-visible,
.screenglow-root scale:focus-visible {{
  box-shadow: 0 0 0 2px {focus_ring_color};
}}
",
        window_background = colors.window_background,
        panel_background = colors.panel_background,
        border_color = colors.border_color,
        text_color = colors.text_color,
        muted_text_color = colors.muted_text_color,
        focus_ring_color = colors.focus_ring_color,
        accent_background = colors.accent_background,
        accent_text_color = colors.accent_text_color,
        stage_background = colors.stage_background,
        border_width = tokens.border_width,
        control_radius = tokens.control_radius,
        panel_radius = tokens.panel_radius,
        swatch_size = tokens.swatch_size,
        spacing_4 = tokens.spacing_4,
        spacing_8 = tokens.spacing_8,
        spacing_12 = tokens.spacing_12,
        spacing_16 = tokens.spacing_16,
        motion_hover_ms = motion_hover_ms,
    )
}

pub(super) fn install_runtime_css(tokens: StyleTokens, colors: &ColorTokens, motion_enabled: bool) {
    let provider = CssProvider::new();
    provider.load_from_data(&runtime_css(tokens, colors, motion_enabled));
    if let Some(display) = gtk4::gdk::Display::default() {
        gtk4::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk4::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    } else {
        tracing::warn!("no default display; runtime css not installed");
    }
}
