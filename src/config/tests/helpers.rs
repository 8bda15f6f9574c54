//! Layer composition for export configuration tests.

use ortho_config::MergeComposer;
use serde_json::Value;

use crate::ExportConfig;

/// Source of a configuration layer, lowest precedence first.
#[derive(Clone, Copy, Debug)]
pub enum Layer {
    Defaults,
    File,
    Environment,
    Cli,
}

impl Layer {
    fn push(self, composer: &mut MergeComposer, value: Value) {
        match self {
            Self::Defaults => composer.push_defaults(value),
            Self::File => composer.push_file(value, None),
            Self::Environment => composer.push_environment(value),
            Self::Cli => composer.push_cli(value),
        }
    }
}

/// Merges `layers` in the given order into an [`ExportConfig`].
pub fn compose_export_config(layers: &[(Layer, Value)]) -> ExportConfig {
    let mut composer = MergeComposer::new();
    for (layer, value) in layers {
        layer.push(&mut composer, value.clone());
    }

    ExportConfig::merge_from_layers(composer.layers())
        .expect("export configuration layers should merge")
}
