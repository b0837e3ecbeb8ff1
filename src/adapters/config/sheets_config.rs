use crate::application::publish::demo_noise::{DemoNoise, DEFAULT_VARIATION};

#[derive(serde::Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SpreadsheetConfig {
    /// Key of the target spreadsheet, the id in its URL. Required to publish.
    pub spreadsheet_id: Option<Box<str>>,
    pub worksheet_name: Box<str>,
    pub demo_noise: bool,
    pub demo_noise_variation: f64,
}

impl Default for SpreadsheetConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: None,
            worksheet_name: "Campaigns".into(),
            demo_noise: false,
            demo_noise_variation: DEFAULT_VARIATION,
        }
    }
}

impl SpreadsheetConfig {
    pub fn demo_noise(&self) -> Option<DemoNoise> {
        self.demo_noise
            .then(|| DemoNoise::new(self.demo_noise_variation))
    }
}
