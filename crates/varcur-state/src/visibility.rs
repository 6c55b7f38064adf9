//! Frequency based visibility rules.
//!
//! The configured provider groups decide which populations count; the
//! thresholds split the highest of those frequencies into commonness classes.

use std::fmt;

use serde::Serialize;

use varcur_config::{FrequencyConfig, FrequencyThresholds};
use varcur_model::Allele;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FrequencyClass {
    Common,
    LessCommon,
    Rare,
}

impl fmt::Display for FrequencyClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Common => f.write_str("common"),
            Self::LessCommon => f.write_str("less common"),
            Self::Rare => f.write_str("rare"),
        }
    }
}

/// Highest observed frequency among configured providers and populations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaxFrequency {
    pub provider: String,
    pub population: String,
    pub freq: f64,
}

pub fn max_frequency(allele: &Allele, config: &FrequencyConfig) -> Option<MaxFrequency> {
    let mut best: Option<MaxFrequency> = None;
    for (provider, populations) in &config.groups {
        let Some(record) = allele.annotation.frequencies.get(provider) else {
            continue;
        };
        for population in populations {
            let Some(freq) = record.freq.get(population).copied() else {
                continue;
            };
            if best.as_ref().is_none_or(|b| freq > b.freq) {
                best = Some(MaxFrequency {
                    provider: provider.clone(),
                    population: population.clone(),
                    freq,
                });
            }
        }
    }
    best
}

pub fn frequency_class(freq: f64, thresholds: &FrequencyThresholds) -> FrequencyClass {
    if freq >= thresholds.hi_freq_cutoff {
        FrequencyClass::Common
    } else if freq >= thresholds.lo_freq_cutoff {
        FrequencyClass::LessCommon
    } else {
        FrequencyClass::Rare
    }
}

/// Commonness of an allele, or `None` without configured frequency data.
pub fn allele_frequency_class(allele: &Allele, config: &FrequencyConfig) -> Option<FrequencyClass> {
    max_frequency(allele, config).map(|max| frequency_class(max.freq, &config.thresholds))
}
