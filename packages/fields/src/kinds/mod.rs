//! Builtin field kinds.

pub mod background;
pub mod border;
pub mod color;
pub mod composite;
pub mod dimension;
pub mod icon;
pub mod link;
pub mod number;
pub mod select;
pub mod text;
pub mod toggle;
pub mod typography;

use crate::registry::{FieldKind, FieldRegistry};
use std::sync::Arc;

/// Install every builtin kind into the registry
pub(crate) fn register_builtins(registry: &mut FieldRegistry) {
    let builtins: Vec<Arc<dyn FieldKind>> = vec![
        Arc::new(text::TextField::single_line()),
        Arc::new(text::TextField::multi_line()),
        Arc::new(number::NumberField),
        Arc::new(toggle::ToggleField),
        Arc::new(color::ColorField),
        Arc::new(select::SelectField),
        Arc::new(link::LinkField),
        Arc::new(icon::IconField),
        Arc::new(dimension::DimensionField),
        Arc::new(dimension::SpacingField),
        Arc::new(typography::TypographyField),
        Arc::new(background::BackgroundField),
        Arc::new(border::BorderField),
        Arc::new(border::ShadowField),
        Arc::new(composite::GroupField),
        Arc::new(composite::RepeaterField),
    ];

    for kind in builtins {
        registry
            .register(kind)
            .expect("builtin kind names are unique");
    }
}
