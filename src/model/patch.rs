use super::{AspectRatio, BackgroundType, EditorConfig, WindowTheme};

/// Partial configuration record; `apply` replaces exactly the fields that are set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigPatch {
    pub padding: Option<f64>,
    pub inset: Option<f64>,
    pub shadow: Option<f64>,
    pub border_radius: Option<f64>,
    pub window_theme: Option<WindowTheme>,
    pub background_type: Option<BackgroundType>,
    pub background_value: Option<String>,
    pub aspect_ratio: Option<AspectRatio>,
    pub scale: Option<f64>,
    pub rotate_x: Option<f64>,
    pub rotate_y: Option<f64>,
    pub rotate_z: Option<f64>,
    pub show_watermark: Option<bool>,
}

macro_rules! patch_setter {
    ($name:ident, $ty:ty) => {
        pub fn $name(mut self, value: $ty) -> Self {
            self.$name = Some(value);
            self
        }
    };
}

impl ConfigPatch {
    pub fn new() -> Self {
        Self::default()
    }

    patch_setter!(padding, f64);
    patch_setter!(inset, f64);
    patch_setter!(shadow, f64);
    patch_setter!(border_radius, f64);
    patch_setter!(window_theme, WindowTheme);
    patch_setter!(background_type, BackgroundType);
    patch_setter!(aspect_ratio, AspectRatio);
    patch_setter!(scale, f64);
    patch_setter!(rotate_x, f64);
    patch_setter!(rotate_y, f64);
    patch_setter!(rotate_z, f64);
    patch_setter!(show_watermark, bool);

    pub fn background_value(mut self, value: impl Into<String>) -> Self {
        self.background_value = Some(value.into());
        self
    }

    /// Sets type and value together so the pair never diverges.
    pub fn background(self, kind: BackgroundType, value: impl Into<String>) -> Self {
        self.background_type(kind).background_value(value)
    }

    pub fn is_empty(&self) -> bool {
        self.field_names().is_empty()
    }

    /// Names of the fields this patch replaces, in record order.
    pub fn field_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        let mut push = |set: bool, name: &'static str| {
            if set {
                names.push(name);
            }
        };
        push(self.padding.is_some(), "padding");
        push(self.inset.is_some(), "inset");
        push(self.shadow.is_some(), "shadow");
        push(self.border_radius.is_some(), "borderRadius");
        push(self.window_theme.is_some(), "windowTheme");
        push(self.background_type.is_some(), "backgroundType");
        push(self.background_value.is_some(), "backgroundValue");
        push(self.aspect_ratio.is_some(), "aspectRatio");
        push(self.scale.is_some(), "scale");
        push(self.rotate_x.is_some(), "rotateX");
        push(self.rotate_y.is_some(), "rotateY");
        push(self.rotate_z.is_some(), "rotateZ");
        push(self.show_watermark.is_some(), "showWatermark");
        names
    }

    pub fn apply(&self, config: &mut EditorConfig) {
        if let Some(value) = self.padding {
            config.padding = value;
        }
        if let Some(value) = self.inset {
            config.inset = value;
        }
        if let Some(value) = self.shadow {
            config.shadow = value;
        }
        if let Some(value) = self.border_radius {
            config.border_radius = value;
        }
        if let Some(value) = self.window_theme {
            config.window_theme = value;
        }
        if let Some(value) = self.background_type {
            config.background_type = value;
        }
        if let Some(ref value) = self.background_value {
            config.background_value = value.clone();
        }
        if let Some(value) = self.aspect_ratio {
            config.aspect_ratio = value;
        }
        if let Some(value) = self.scale {
            config.scale = value;
        }
        if let Some(value) = self.rotate_x {
            config.rotate_x = value;
        }
        if let Some(value) = self.rotate_y {
            config.rotate_y = value;
        }
        if let Some(value) = self.rotate_z {
            config.rotate_z = value;
        }
        if let Some(value) = self.show_watermark {
            config.show_watermark = value;
        }
    }

    pub fn applied_to(&self, config: &EditorConfig) -> EditorConfig {
        let mut next = config.clone();
        self.apply(&mut next);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_replaces_only_named_fields() {
        let base = EditorConfig::default();
        let next = ConfigPatch::new().padding(120.0).rotate_y(-15.0).applied_to(&base);

        assert_eq!(next.padding, 120.0);
        assert_eq!(next.rotate_y, -15.0);
        assert_eq!(
            EditorConfig {
                padding: base.padding,
                rotate_y: base.rotate_y,
                ..next
            },
            base
        );
    }

    #[test]
    fn field_names_list_set_fields_in_record_order() {
        let patch = ConfigPatch::new()
            .show_watermark(false)
            .background(BackgroundType::Solid, "#ffffff")
            .padding(10.0);
        assert_eq!(
            patch.field_names(),
            vec!["padding", "backgroundType", "backgroundValue", "showWatermark"]
        );
        assert!(!patch.is_empty());
        assert!(ConfigPatch::new().is_empty());
    }

    #[test]
    fn out_of_range_values_are_accepted_as_is() {
        let next = ConfigPatch::new()
            .padding(900.0)
            .scale(4.0)
            .applied_to(&EditorConfig::default());
        assert_eq!(next.padding, 900.0);
        assert_eq!(next.scale, 4.0);
    }
}
