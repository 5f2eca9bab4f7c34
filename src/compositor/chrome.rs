//! Window and device chrome, one derivation per theme variant.

use crate::geometry::{Rect, Rgba, Size};
use crate::model::WindowTheme;

pub const IPHONE_CORNER_RADIUS: f64 = 48.0;
pub const IPHONE_MAX_WIDTH: f64 = 400.0;

const MAC_BAR_HEIGHT: f64 = 32.0;
const WINDOWS_BAR_HEIGHT: f64 = 32.0;
const CODE_BAR_HEIGHT: f64 = 40.0;
const BAR_PADDING_X: f64 = 16.0;
const LIGHT_DIAMETER: f64 = 12.0;
const LIGHT_GAP: f64 = 8.0;
const IPHONE_BEZEL: f64 = 12.0;
const IPHONE_STATUS_BAR_HEIGHT: f64 = 48.0;
const IPHONE_HOME_BAR_HEIGHT: f64 = 24.0;

const TRAFFIC_LIGHT_FILLS: [Rgba; 3] = [
    Rgba::rgb(0xff, 0x5f, 0x56),
    Rgba::rgb(0xff, 0xbd, 0x2e),
    Rgba::rgb(0x27, 0xc9, 0x3f),
];
const TRAFFIC_LIGHT_BORDERS: [Rgba; 3] = [
    Rgba::rgb(0xe0, 0x44, 0x3e),
    Rgba::rgb(0xde, 0xa1, 0x23),
    Rgba::rgb(0x1a, 0xab, 0x29),
];

/// Space chrome takes away from the content on each side.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChromeMetrics {
    pub top: f64,
    pub bottom: f64,
    pub side: f64,
}

impl ChromeMetrics {
    pub fn content_rect(self, frame: Size) -> Rect {
        Rect::new(
            self.side,
            self.top,
            (frame.width - self.side * 2.0).max(0.0),
            (frame.height - self.top - self.bottom).max(0.0),
        )
    }

    pub fn frame_size_for(self, content: Size) -> Size {
        Size::new(
            content.width + self.side * 2.0,
            content.height + self.top + self.bottom,
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TitleBar {
    pub rect: Rect,
    pub fill: Rgba,
    pub bottom_border: Rgba,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrafficLight {
    pub center: (f64, f64),
    pub radius: f64,
    pub fill: Rgba,
    pub border: Option<Rgba>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelPill {
    pub rect: Rect,
    pub fill: Rgba,
    pub label: &'static str,
    pub text: Rgba,
    pub font_size: f64,
    pub monospace: bool,
    /// Leading status dot, if any.
    pub dot: Option<Rgba>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptionGlyphKind {
    Minimize,
    Maximize,
    Close,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaptionGlyph {
    pub kind: CaptionGlyphKind,
    pub rect: Rect,
    pub color: Rgba,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MacWindowChrome {
    pub bar: TitleBar,
    pub lights: [TrafficLight; 3],
    pub address_bar: LabelPill,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindowsChrome {
    pub bar: TitleBar,
    pub glyphs: [CaptionGlyph; 3],
}

#[derive(Debug, Clone, PartialEq)]
pub struct CodeChrome {
    pub bar: TitleBar,
    pub lights: [TrafficLight; 3],
    pub file_tab: LabelPill,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeviceShell {
    pub outer: Rect,
    pub bezel: f64,
    pub bezel_color: Rgba,
    pub corner_radius: f64,
    pub notch: Rect,
    pub notch_speaker: Rect,
    pub status_bar: Rect,
    pub status_time: &'static str,
    pub battery: Rect,
    pub battery_cap: Rect,
    pub home_bar: Rect,
    pub home_indicator: Rect,
    pub screen_fill: Rgba,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Chrome {
    None,
    MacWindow(MacWindowChrome),
    Windows(WindowsChrome),
    Code(CodeChrome),
    IPhone(DeviceShell),
}

pub fn metrics_for(theme: WindowTheme) -> ChromeMetrics {
    match theme {
        WindowTheme::None => ChromeMetrics::default(),
        WindowTheme::MacOsDark | WindowTheme::MacOsLight => ChromeMetrics {
            top: MAC_BAR_HEIGHT,
            ..ChromeMetrics::default()
        },
        WindowTheme::Windows => ChromeMetrics {
            top: WINDOWS_BAR_HEIGHT,
            ..ChromeMetrics::default()
        },
        WindowTheme::Code => ChromeMetrics {
            top: CODE_BAR_HEIGHT,
            ..ChromeMetrics::default()
        },
        WindowTheme::IPhone => ChromeMetrics {
            top: IPHONE_BEZEL + IPHONE_STATUS_BAR_HEIGHT,
            bottom: IPHONE_BEZEL + IPHONE_HOME_BAR_HEIGHT,
            side: IPHONE_BEZEL,
        },
    }
}

/// Chrome geometry in frame-local coordinates for a frame of `frame` size.
pub fn chrome_for(theme: WindowTheme, frame: Size) -> Chrome {
    match theme {
        WindowTheme::None => Chrome::None,
        WindowTheme::MacOsDark => Chrome::MacWindow(mac_window(frame, false)),
        WindowTheme::MacOsLight => Chrome::MacWindow(mac_window(frame, true)),
        WindowTheme::Windows => Chrome::Windows(windows_window(frame)),
        WindowTheme::Code => Chrome::Code(code_window(frame)),
        WindowTheme::IPhone => Chrome::IPhone(iphone_shell(frame)),
    }
}

fn traffic_lights(bar_height: f64, with_borders: bool) -> [TrafficLight; 3] {
    let radius = LIGHT_DIAMETER / 2.0;
    let light = |index: usize| TrafficLight {
        center: (
            BAR_PADDING_X + radius + index as f64 * (LIGHT_DIAMETER + LIGHT_GAP),
            bar_height / 2.0,
        ),
        radius,
        fill: TRAFFIC_LIGHT_FILLS[index],
        border: with_borders.then_some(TRAFFIC_LIGHT_BORDERS[index]),
    };
    [light(0), light(1), light(2)]
}

fn mac_window(frame: Size, light: bool) -> MacWindowChrome {
    let bar = TitleBar {
        rect: Rect::new(0.0, 0.0, frame.width, MAC_BAR_HEIGHT),
        fill: if light {
            Rgba::WHITE
        } else {
            Rgba::rgb(0x2a, 0x2a, 0x2a)
        },
        bottom_border: Rgba::BLACK.with_alpha(if light { 0.05 } else { 0.2 }),
    };
    let lights_end = BAR_PADDING_X + LIGHT_DIAMETER * 3.0 + LIGHT_GAP * 2.0;
    let address_x = lights_end + LIGHT_GAP + 16.0;
    let address_width = (frame.width - BAR_PADDING_X - 16.0 - address_x).max(0.0);
    let address_bar = LabelPill {
        rect: Rect::new(address_x, (MAC_BAR_HEIGHT - 20.0) / 2.0, address_width, 20.0),
        fill: Rgba::BLACK.with_alpha(if light { 0.05 } else { 0.2 }),
        label: "mysite.com",
        text: if light { Rgba::BLACK } else { Rgba::WHITE }.with_alpha(0.5),
        font_size: 10.0,
        monospace: false,
        dot: None,
    };

    MacWindowChrome {
        bar,
        lights: traffic_lights(MAC_BAR_HEIGHT, true),
        address_bar,
    }
}

fn windows_window(frame: Size) -> WindowsChrome {
    const GLYPH: f64 = 10.0;
    const GLYPH_GAP: f64 = 16.0;
    const PADDING_X: f64 = 12.0;
    let top = (WINDOWS_BAR_HEIGHT - GLYPH) / 2.0;
    let close_x = frame.width - PADDING_X - GLYPH;
    let glyph = |kind: CaptionGlyphKind, x: f64| CaptionGlyph {
        kind,
        rect: Rect::new(x, top, GLYPH, GLYPH),
        color: Rgba::BLACK,
    };

    WindowsChrome {
        bar: TitleBar {
            rect: Rect::new(0.0, 0.0, frame.width, WINDOWS_BAR_HEIGHT),
            fill: Rgba::rgb(0xf3, 0xf3, 0xf3),
            bottom_border: Rgba::BLACK.with_alpha(0.05),
        },
        glyphs: [
            glyph(
                CaptionGlyphKind::Minimize,
                close_x - (GLYPH + GLYPH_GAP) * 2.0,
            ),
            glyph(CaptionGlyphKind::Maximize, close_x - (GLYPH + GLYPH_GAP)),
            glyph(CaptionGlyphKind::Close, close_x),
        ],
    }
}

fn code_window(frame: Size) -> CodeChrome {
    const TAB_WIDTH: f64 = 96.0;
    const TAB_HEIGHT: f64 = 22.0;
    CodeChrome {
        bar: TitleBar {
            rect: Rect::new(0.0, 0.0, frame.width, CODE_BAR_HEIGHT),
            fill: Rgba::rgb(0x1e, 0x1e, 0x1e),
            bottom_border: Rgba::BLACK.with_alpha(0.0),
        },
        lights: traffic_lights(CODE_BAR_HEIGHT, false),
        file_tab: LabelPill {
            rect: Rect::new(
                (frame.width - TAB_WIDTH) / 2.0,
                (CODE_BAR_HEIGHT - TAB_HEIGHT) / 2.0,
                TAB_WIDTH,
                TAB_HEIGHT,
            ),
            fill: Rgba::rgb(0x2d, 0x2d, 0x2d),
            label: "index.tsx",
            text: Rgba::rgb(0xa1, 0xa1, 0xaa),
            font_size: 10.0,
            monospace: true,
            dot: Some(Rgba::rgb(0x60, 0xa5, 0xfa)),
        },
    }
}

/// Fixed device shell; nothing here depends on the editor configuration.
fn iphone_shell(frame: Size) -> DeviceShell {
    let outer = Rect::from_size(frame);
    let screen = outer.inset(IPHONE_BEZEL);
    let notch = Rect::new(screen.x + (screen.width - 120.0) / 2.0, screen.y, 120.0, 30.0);
    let status_bar = Rect::new(screen.x, screen.y, screen.width, IPHONE_STATUS_BAR_HEIGHT);
    let home_bar = Rect::new(
        screen.x,
        screen.y + screen.height - IPHONE_HOME_BAR_HEIGHT,
        screen.width,
        IPHONE_HOME_BAR_HEIGHT,
    );
    let battery_x = screen.x + screen.width - 32.0 - 2.0 - 6.0 - 16.0;
    let status_center_y = status_bar.y + 4.0 + (IPHONE_STATUS_BAR_HEIGHT - 4.0) / 2.0;

    DeviceShell {
        outer,
        bezel: IPHONE_BEZEL,
        bezel_color: Rgba::rgb(0x12, 0x12, 0x12),
        corner_radius: IPHONE_CORNER_RADIUS,
        notch,
        notch_speaker: Rect::new(notch.x + (120.0 - 64.0) / 2.0, notch.y + 13.0, 64.0, 4.0),
        status_bar,
        status_time: "9:41",
        battery: Rect::new(battery_x, status_center_y - 5.0, 16.0, 10.0),
        battery_cap: Rect::new(battery_x + 16.0 + 6.0, status_center_y - 5.0, 2.0, 10.0),
        home_bar,
        home_indicator: home_bar.centered(Size::new(128.0, 4.0)),
        screen_fill: Rgba::WHITE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_shrink_content_by_chrome_size() {
        let frame = Size::new(400.0, 300.0);
        assert_eq!(
            metrics_for(WindowTheme::MacOsDark).content_rect(frame),
            Rect::new(0.0, 32.0, 400.0, 268.0)
        );
        assert_eq!(
            metrics_for(WindowTheme::Code).content_rect(frame),
            Rect::new(0.0, 40.0, 400.0, 260.0)
        );
        assert_eq!(
            metrics_for(WindowTheme::None).content_rect(frame),
            Rect::from_size(frame)
        );
        assert_eq!(
            metrics_for(WindowTheme::IPhone).content_rect(frame),
            Rect::new(12.0, 60.0, 376.0, 204.0)
        );
    }

    #[test]
    fn dispatch_picks_one_variant_per_theme() {
        let frame = Size::new(640.0, 400.0);
        assert_eq!(chrome_for(WindowTheme::None, frame), Chrome::None);
        assert!(matches!(
            chrome_for(WindowTheme::MacOsDark, frame),
            Chrome::MacWindow(_)
        ));
        assert!(matches!(
            chrome_for(WindowTheme::Windows, frame),
            Chrome::Windows(_)
        ));
        assert!(matches!(chrome_for(WindowTheme::Code, frame), Chrome::Code(_)));
        assert!(matches!(
            chrome_for(WindowTheme::IPhone, frame),
            Chrome::IPhone(_)
        ));
    }

    #[test]
    fn mac_bar_colors_differ_between_light_and_dark() {
        let frame = Size::new(640.0, 400.0);
        let (Chrome::MacWindow(dark), Chrome::MacWindow(light)) = (
            chrome_for(WindowTheme::MacOsDark, frame),
            chrome_for(WindowTheme::MacOsLight, frame),
        ) else {
            panic!("mac themes should produce mac chrome");
        };
        assert_ne!(dark.bar.fill, light.bar.fill);
        assert_eq!(dark.lights, light.lights);
        assert_eq!(dark.address_bar.label, "mysite.com");
        assert!(dark.address_bar.rect.x > dark.lights[2].center.0);
    }

    #[test]
    fn windows_glyphs_are_right_aligned_in_order() {
        let Chrome::Windows(chrome) = chrome_for(WindowTheme::Windows, Size::new(500.0, 300.0))
        else {
            panic!("windows theme should produce windows chrome");
        };
        let kinds = chrome.glyphs.iter().map(|glyph| glyph.kind).collect::<Vec<_>>();
        assert_eq!(
            kinds,
            vec![
                CaptionGlyphKind::Minimize,
                CaptionGlyphKind::Maximize,
                CaptionGlyphKind::Close
            ]
        );
        let close = &chrome.glyphs[2].rect;
        assert_eq!(close.x + close.width, 488.0);
        assert!(chrome.glyphs[0].rect.x > 250.0);
    }

    #[test]
    fn code_tab_is_centered_with_filename() {
        let Chrome::Code(chrome) = chrome_for(WindowTheme::Code, Size::new(600.0, 300.0)) else {
            panic!("code theme should produce code chrome");
        };
        assert_eq!(chrome.file_tab.label, "index.tsx");
        assert_eq!(chrome.file_tab.rect.center().0, 300.0);
        assert!(chrome.lights.iter().all(|light| light.border.is_none()));
    }

    #[test]
    fn iphone_shell_has_notch_status_bar_and_home_indicator() {
        let Chrome::IPhone(shell) = chrome_for(WindowTheme::IPhone, Size::new(400.0, 800.0))
        else {
            panic!("iphone theme should produce device shell");
        };
        assert_eq!(shell.corner_radius, IPHONE_CORNER_RADIUS);
        assert_eq!(shell.notch.size(), Size::new(120.0, 30.0));
        assert_eq!(shell.notch.center().0, 200.0);
        assert_eq!(shell.status_time, "9:41");
        assert_eq!(shell.status_bar.height, 48.0);
        assert_eq!(shell.home_indicator.size(), Size::new(128.0, 4.0));
        assert_eq!(shell.home_bar.y + shell.home_bar.height, 788.0);
    }
}
