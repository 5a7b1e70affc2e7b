//! Test data builders for creating test objects

use lrcurve_rs::{
    AxisLimit, ChannelTarget, ChartSettings, Dimensions, FacetConfig, LineConfig, Sample, ScaleKind,
};

/// Builder for creating test ChartSettings
///
/// Starts from an empty chart; the height follows the number of facets
/// unless set explicitly.
pub struct SettingsBuilder {
    settings: ChartSettings,
    height: Option<f64>,
}

impl SettingsBuilder {
    pub fn new() -> Self {
        let mut settings = ChartSettings::default();
        settings.mappings.clear();
        settings.facet_config.clear();
        settings.line_config.clear();
        Self {
            settings,
            height: None,
        }
    }

    pub fn facet(mut self, key: &str, scale: ScaleKind, limit: AxisLimit) -> Self {
        self.settings
            .facet_config
            .insert(key.to_string(), FacetConfig::new(key, scale, limit));
        self
    }

    pub fn line(mut self, key: &str, color: &str) -> Self {
        self.settings
            .line_config
            .insert(key.to_string(), LineConfig::new(key, color));
        self
    }

    pub fn map(mut self, channel: &str, facet: &str, line: &str) -> Self {
        self.settings
            .mappings
            .insert(channel.to_string(), ChannelTarget::new(facet, line));
        self
    }

    pub fn x_limit(mut self, limit: AxisLimit) -> Self {
        self.settings.x_axis_config.limit = limit;
        self
    }

    pub fn width(mut self, width: f64) -> Self {
        self.settings.dimensions.width = width;
        self
    }

    pub fn height(mut self, height: f64) -> Self {
        self.height = Some(height);
        self
    }

    pub fn build(mut self) -> ChartSettings {
        let facets = self.settings.facet_order().len().max(1);
        self.settings.dimensions = Dimensions {
            height: self
                .height
                .unwrap_or(Dimensions::for_facets(facets).height),
            width: self.settings.dimensions.width,
        };
        self.settings
    }
}

/// Loss and accuracy facets, each with train and validation lines
pub fn loss_and_accuracy() -> ChartSettings {
    SettingsBuilder::new()
        .facet("loss", ScaleKind::Linear, AxisLimit::from_lower(0.0))
        .facet("acc", ScaleKind::Linear, AxisLimit::fixed(0.0, 1.0))
        .line("train", "#F8766D")
        .line("validation", "#00BFC4")
        .map("loss", "loss", "train")
        .map("val_loss", "loss", "validation")
        .map("acc", "acc", "train")
        .map("val_acc", "acc", "validation")
        .build()
}

/// Rows of a decaying loss curve for epochs `0..epochs`
pub fn loss_rows(epochs: usize) -> Vec<Sample> {
    (0..epochs)
        .map(|epoch| {
            let x = epoch as f64;
            Sample::new(x)
                .with("loss", 1.0 / (x + 1.0))
                .with("val_loss", 1.2 / (x + 1.0))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_builder() {
        let settings = loss_and_accuracy();
        assert_eq!(settings.facet_order(), vec!["acc", "loss"]);
        assert_eq!(settings.dimensions.height, 490.0);
        settings.validate().unwrap();
    }
}
