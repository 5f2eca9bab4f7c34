/// Compile-time layout tokens, not user-overridable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleTokens {
    pub spacing_4: i32,
    pub spacing_8: i32,
    pub spacing_12: i32,
    pub spacing_16: i32,
    pub spacing_24: i32,
    pub control_radius: u16,
    pub panel_radius: u16,
    pub control_size: u16,
    pub swatch_size: u16,
    pub border_width: u16,
    pub sidebar_width: i32,
    pub window_default_width: i32,
    pub window_default_height: i32,
    pub window_min_width: i32,
    pub window_min_height: i32,
    pub motion_hover_ms: u32,
}

pub const LAYOUT_TOKENS: StyleTokens = StyleTokens {
    spacing_4: 4,
    spacing_8: 8,
    spacing_12: 12,
    spacing_16: 16,
    spacing_24: 24,
    control_radius: 8,
    panel_radius: 12,
    control_size: 36,
    swatch_size: 32,
    border_width: 1,
    sidebar_width: 320,
    window_default_width: 1440,
    window_default_height: 900,
    window_min_width: 960,
    window_min_height: 600,
    motion_hover_ms: 160,
};

#[cfg(test)]
mod tests {
    use super::LAYOUT_TOKENS;

    #[test]
    fn sidebar_fits_inside_minimum_window() {
        let tokens = LAYOUT_TOKENS;
        assert!(tokens.sidebar_width * 2 < tokens.window_min_width);
        assert!(tokens.window_min_height <= tokens.window_default_height);
    }

    #[test]
    fn swatches_are_not_larger_than_controls() {
        assert!(LAYOUT_TOKENS.swatch_size <= LAYOUT_TOKENS.control_size);
    }
}
