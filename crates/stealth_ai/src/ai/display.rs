//! Display sink для state label (информационный, не влияет на поведение).

use bevy::prelude::*;

pub trait StateDisplay {
    fn show(&mut self, label: &str);
}

/// ECS компонент-label над головой агента (рендерит хост)
#[derive(Component, Debug, Clone, PartialEq, Default, Reflect)]
#[reflect(Component)]
pub struct StateLabel {
    pub text: String,
}

impl StateDisplay for StateLabel {
    fn show(&mut self, label: &str) {
        if self.text != label {
            self.text.clear();
            self.text.push_str(label);
        }
    }
}
