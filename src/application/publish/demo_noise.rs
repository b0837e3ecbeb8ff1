use rand::Rng;

use crate::domain::campaign::CampaignColumn;
use crate::domain::sheets::table::Table;

pub const DEFAULT_VARIATION: f64 = 0.1;

/// Replaces campaign statistics with plausible random values so a sheet can be shown
/// without exposing real numbers. Only statistics columns holding integers are touched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DemoNoise {
    variation: f64,
}

impl Default for DemoNoise {
    fn default() -> Self {
        Self::new(DEFAULT_VARIATION)
    }
}

impl DemoNoise {
    pub fn new(variation: f64) -> Self {
        Self {
            variation: variation.abs(),
        }
    }

    pub fn variation(&self) -> f64 {
        self.variation
    }

    pub fn apply<R: Rng>(&self, table: &mut Table, rng: &mut R) {
        let statistics = table
            .header()
            .iter()
            .enumerate()
            .filter_map(|(index, header)| {
                CampaignColumn::from_header(header)
                    .filter(|column| column.is_statistic())
                    .map(|column| (index, column))
            });

        // Delivered goes last so it can be bounded by the new Sent value.
        let (delivered, mut ordered): (Vec<_>, Vec<_>) =
            statistics.partition(|(_, column)| *column == CampaignColumn::Delivered);
        ordered.extend(delivered);

        let sent_index = table.column_index(CampaignColumn::Sent.header());

        for row in table.rows_mut() {
            for &(index, column) in &ordered {
                let Some(value) = row.get(index).and_then(|cell| cell.parse::<u64>().ok()) else {
                    continue;
                };

                let mut noised = self.noise(column, value, rng);

                if column == CampaignColumn::Delivered {
                    let sent = sent_index
                        .and_then(|sent_index| row.get(sent_index))
                        .and_then(|cell| cell.parse::<u64>().ok());
                    if let Some(sent) = sent.filter(|sent| noised > *sent) {
                        noised = (sent as f64 * (0.9 + rng.gen::<f64>() * 0.1)).round() as u64;
                    }
                }

                row[index] = noised.to_string();
            }
        }
    }

    fn noise<R: Rng>(&self, column: CampaignColumn, value: u64, rng: &mut R) -> u64 {
        use CampaignColumn::*;
        match (column, value) {
            (UniqueClicks | Clickers, 0) => {
                if rng.gen_bool(0.8) {
                    0
                } else {
                    rng.gen_range(1..=50)
                }
            }
            (UniqueClicks | Clickers, _) => self.jitter(value, 2.0, rng),
            (Sent | Delivered, _) => self.jitter(value, 1.0, rng),
            (_, 0) => {
                if rng.gen_bool(0.95) {
                    0
                } else {
                    rng.gen_range(1..=3)
                }
            }
            (_, 1) => {
                if rng.gen_bool(0.7) {
                    1
                } else if rng.gen_bool(0.9) {
                    0
                } else {
                    rng.gen_range(1..=3)
                }
            }
            _ => self.jitter(value, 1.0, rng),
        }
    }

    /// `value` scaled by a uniform factor in `1 ± variation * scale`.
    fn jitter<R: Rng>(&self, value: u64, scale: f64, rng: &mut R) -> u64 {
        let factor = 1.0 + (rng.gen::<f64>() - 0.5) * 2.0 * self.variation * scale;
        (value as f64 * factor).round().max(0.0) as u64
    }
}
