//! Command implementations. Each returns the text to print.

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde_json::json;
use tracing::{info, warn};

use varcur_config::{AppConfig, load_config_or_default};
use varcur_ingest::{
    AnalysisRef, CreateOrAppend, GenepanelRef, ImportJobs, ImportSelection, ImportType, Technology,
};
use varcur_model::{Allele, AlleleState, UserId};
use varcur_state::{
    allele_frequency_class, get_classification, is_allele_assessment_outdated, max_frequency,
    prepare_allele_state,
};
use varcur_workflow::build_finalize_allele_payload;

use crate::report::{
    acmg_code_table, acmg_orderings_table, classification_table, import_job_heading,
    import_job_table,
};

pub fn load_app_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = load_config_or_default(path).context("load config")?;
    Ok(config)
}

pub fn run_config(config: &AppConfig) -> String {
    format!(
        "Classifications\n{}\n\nACMG strengths\n{}",
        classification_table(config),
        acmg_orderings_table(config)
    )
}

pub fn run_acmg(codes: &[String], config: &AppConfig) -> String {
    acmg_code_table(codes, config).to_string()
}

/// Parse `NAME:VERSION`.
pub fn parse_genepanel(value: &str) -> Result<GenepanelRef> {
    match value.split_once(':') {
        Some((name, version)) if !name.is_empty() && !version.is_empty() => {
            Ok(GenepanelRef::new(name, version))
        }
        _ => bail!("genepanel must be given as NAME:VERSION, got '{value}'"),
    }
}

#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub import_type: ImportType,
    pub mode: CreateOrAppend,
    pub technology: Technology,
    pub genepanel: Option<GenepanelRef>,
    pub analysis_name: Option<String>,
    /// Existing analysis to append to.
    pub analysis_id: Option<i64>,
    pub priority: u8,
    /// Print only the payloads.
    pub json: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            import_type: ImportType::Variants,
            mode: CreateOrAppend::Create,
            technology: Technology::Hts,
            genepanel: None,
            analysis_name: None,
            analysis_id: None,
            priority: 1,
            json: false,
        }
    }
}

impl ImportOptions {
    fn selection(&self) -> ImportSelection {
        let analysis = match (self.mode, self.analysis_id, &self.analysis_name, &self.genepanel) {
            (CreateOrAppend::Append, Some(id), Some(name), Some(genepanel)) => Some(AnalysisRef {
                id,
                name: name.clone(),
                genepanel: genepanel.clone(),
            }),
            _ => None,
        };
        ImportSelection {
            import_type: self.import_type,
            mode: self.mode,
            technology: self.technology,
            analysis_name: self.analysis_name.clone(),
            genepanel: self.genepanel.clone(),
            analysis,
            priority: self.priority,
        }
    }
}

#[derive(Debug)]
pub struct ImportOutcome {
    pub output: String,
    pub complete: bool,
}

/// Parse pasted import text, apply one selection to every job and report
/// the jobs plus, when all are complete, their payloads.
pub fn run_import(text: &str, options: &ImportOptions) -> Result<ImportOutcome> {
    let mut jobs = ImportJobs::parse(text).context("parse import input")?;
    if jobs.is_empty() {
        bail!("no variants found in input");
    }
    jobs.apply_selection(&options.selection());

    let complete = jobs.all_complete();
    let payloads = if complete {
        Some(jobs.payloads().context("build import payloads")?)
    } else {
        warn!(
            complete = jobs.complete_count(),
            total = jobs.len(),
            "import selection incomplete"
        );
        None
    };
    info!(jobs = jobs.len(), complete, "import parsed");

    let payload_json = payloads
        .as_ref()
        .map(serde_json::to_string_pretty)
        .transpose()
        .context("serialize import payloads")?;

    if options.json {
        return Ok(ImportOutcome {
            output: payload_json.unwrap_or_else(|| "[]".to_string()),
            complete,
        });
    }

    let mut sections = Vec::new();
    for (index, job) in jobs.jobs.iter().enumerate() {
        sections.push(format!(
            "{}\n{}",
            import_job_heading(index, job),
            import_job_table(job)
        ));
    }
    match payload_json {
        Some(json) => sections.push(format!("Payloads\n{json}")),
        None => sections.push(format!(
            "{} of {} jobs have a complete selection; no payloads built",
            jobs.complete_count(),
            jobs.len()
        )),
    }
    Ok(ImportOutcome {
        output: sections.join("\n\n"),
        complete,
    })
}

/// Bring a draft up to date with an allele and show what would be submitted.
pub fn run_state(
    allele_json: &str,
    state_json: Option<&str>,
    user_id: UserId,
    config: &AppConfig,
) -> Result<String> {
    let allele = Allele::from_json(allele_json).context("parse allele")?;
    let mut state = match state_json {
        Some(text) => {
            let value = serde_json::from_str(text).context("parse allele state")?;
            AlleleState::from_value(value).context("parse allele state")?
        }
        None => AlleleState::new(allele.id),
    };
    prepare_allele_state(&allele, &mut state, config).context("prepare allele state")?;

    let classification = get_classification(&allele, &state)?.map(str::to_owned);
    let finalize = match classification {
        Some(_) => Some(build_finalize_allele_payload(&allele, &state, user_id)?),
        None => None,
    };
    let summary = json!({
        "allele": {
            "id": allele.id,
            "hgvsg": allele.hgvsg(),
            "classification": classification,
            "outdated": is_allele_assessment_outdated(&allele, config)?,
            "max_frequency": max_frequency(&allele, &config.frequencies),
            "frequency_class": allele_frequency_class(&allele, &config.frequencies),
        },
        "state": state,
        "finalize": finalize,
    });
    Ok(serde_json::to_string_pretty(&summary)?)
}
