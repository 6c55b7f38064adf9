//! Import jobs: parsed segments plus the curator's import selection.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::dialect::{ParsedInput, parse_segment};
use crate::error::{ImportError, Result};
use crate::split::{ImportData, split_input};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImportType {
    #[default]
    Variants,
    Analysis,
}

impl fmt::Display for ImportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Variants => f.write_str("Variants"),
            Self::Analysis => f.write_str("Analysis"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CreateOrAppend {
    #[default]
    Create,
    Append,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Technology {
    #[default]
    #[serde(rename = "HTS")]
    Hts,
    Sanger,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenepanelRef {
    pub name: String,
    pub version: String,
}

impl GenepanelRef {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for GenepanelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.version)
    }
}

/// An existing analysis that variants can be appended to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRef {
    pub id: i64,
    pub name: String,
    pub genepanel: GenepanelRef,
}

/// Where and how a job's variants should be imported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSelection {
    #[serde(rename = "type")]
    pub import_type: ImportType,
    pub mode: CreateOrAppend,
    pub technology: Technology,
    pub analysis_name: Option<String>,
    pub genepanel: Option<GenepanelRef>,
    pub analysis: Option<AnalysisRef>,
    pub priority: u8,
}

impl Default for ImportSelection {
    fn default() -> Self {
        Self {
            import_type: ImportType::default(),
            mode: CreateOrAppend::default(),
            technology: Technology::default(),
            analysis_name: None,
            genepanel: None,
            analysis: None,
            priority: 1,
        }
    }
}

impl ImportSelection {
    /// Whether the selection names a complete import target: standalone
    /// variants with a genepanel, a new named analysis with a genepanel, or an
    /// existing analysis to append to.
    pub fn has_complete_target(&self) -> bool {
        match (self.import_type, self.mode) {
            (ImportType::Variants, _) => self.genepanel.is_some(),
            (ImportType::Analysis, CreateOrAppend::Create) => {
                self.analysis_name
                    .as_deref()
                    .is_some_and(|name| !name.trim().is_empty())
                    && self.genepanel.is_some()
            }
            (ImportType::Analysis, CreateOrAppend::Append) => self.analysis.is_some(),
        }
    }
}

/// Properties block of an import payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportProperties {
    pub sample_type: Technology,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_or_append: Option<CreateOrAppend>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,
}

/// Body of an import job submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportPayload {
    pub mode: ImportType,
    pub data: String,
    pub genepanel_name: String,
    pub genepanel_version: String,
    pub properties: ImportProperties,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportJob {
    pub data: ImportData,
    pub parsed: ParsedInput,
    pub selection: ImportSelection,
}

impl ImportJob {
    pub fn parse(data: ImportData) -> Result<Self> {
        let parsed = parse_segment(&data.raw_input)?;
        Ok(Self {
            data,
            parsed,
            selection: ImportSelection::default(),
        })
    }

    pub fn included_count(&self) -> usize {
        self.parsed
            .variant_data_lines
            .iter()
            .filter(|line| line.include)
            .count()
    }

    pub fn set_all_included(&mut self, include: bool) {
        for line in &mut self.parsed.variant_data_lines {
            line.include = include;
        }
    }

    /// Returns `false` when `index` is out of range.
    pub fn set_included(&mut self, index: usize, include: bool) -> bool {
        match self.parsed.variant_data_lines.get_mut(index) {
            Some(line) => {
                line.include = include;
                true
            }
            None => false,
        }
    }

    /// Header plus included lines, newline terminated.
    pub fn reassembled_data(&self) -> String {
        let mut data = String::new();
        if !self.parsed.header.is_empty() {
            data.push_str(&self.parsed.header);
            data.push('\n');
        }
        for line in self.parsed.variant_data_lines.iter().filter(|l| l.include) {
            data.push_str(&line.raw);
            data.push('\n');
        }
        data
    }
}

/// A job is complete when its target is complete and at least one line is
/// included.
pub fn is_selection_complete(job: &ImportJob) -> bool {
    job.selection.has_complete_target() && job.included_count() > 0
}

/// Build the submission payload for a complete job.
pub fn build_import_payload(job: &ImportJob) -> Result<ImportPayload> {
    let incomplete = || ImportError::IncompleteSelection {
        filename: job.data.display_name().to_string(),
    };
    if !is_selection_complete(job) {
        return Err(incomplete());
    }
    let selection = &job.selection;
    let (genepanel, properties) = match (selection.import_type, selection.mode) {
        (ImportType::Variants, _) => (
            selection.genepanel.as_ref().ok_or_else(incomplete)?,
            ImportProperties {
                sample_type: selection.technology,
                create_or_append: None,
                analysis_name: None,
                priority: None,
            },
        ),
        (ImportType::Analysis, CreateOrAppend::Create) => (
            selection.genepanel.as_ref().ok_or_else(incomplete)?,
            ImportProperties {
                sample_type: selection.technology,
                create_or_append: Some(CreateOrAppend::Create),
                analysis_name: selection.analysis_name.as_ref().map(|n| n.trim().to_string()),
                priority: Some(selection.priority),
            },
        ),
        (ImportType::Analysis, CreateOrAppend::Append) => {
            let analysis = selection.analysis.as_ref().ok_or_else(incomplete)?;
            (
                &analysis.genepanel,
                ImportProperties {
                    sample_type: selection.technology,
                    create_or_append: Some(CreateOrAppend::Append),
                    analysis_name: Some(analysis.name.clone()),
                    priority: None,
                },
            )
        }
    };
    Ok(ImportPayload {
        mode: selection.import_type,
        data: job.reassembled_data(),
        genepanel_name: genepanel.name.clone(),
        genepanel_version: genepanel.version.clone(),
        properties,
    })
}

/// All jobs parsed from one paste.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportJobs {
    pub jobs: Vec<ImportJob>,
}

impl ImportJobs {
    /// Split and parse pasted text. A malformed segment aborts the whole parse.
    pub fn parse(text: &str) -> Result<Self> {
        let jobs = split_input(text)
            .into_iter()
            .map(ImportJob::parse)
            .collect::<Result<Vec<_>>>()?;
        info!(jobs = jobs.len(), "parsed import input");
        Ok(Self { jobs })
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn job_mut(&mut self, index: usize) -> Result<&mut ImportJob> {
        self.jobs
            .get_mut(index)
            .ok_or(ImportError::UnknownJob { index })
    }

    /// Apply the same selection to every job.
    pub fn apply_selection(&mut self, selection: &ImportSelection) {
        for job in &mut self.jobs {
            job.selection = selection.clone();
        }
    }

    pub fn complete_count(&self) -> usize {
        self.jobs.iter().filter(|job| is_selection_complete(job)).count()
    }

    pub fn all_complete(&self) -> bool {
        !self.jobs.is_empty() && self.complete_count() == self.jobs.len()
    }

    pub fn payloads(&self) -> Result<Vec<ImportPayload>> {
        let payloads = self
            .jobs
            .iter()
            .map(build_import_payload)
            .collect::<Result<Vec<_>>>()?;
        debug!(payloads = payloads.len(), "built import payloads");
        Ok(payloads)
    }
}
