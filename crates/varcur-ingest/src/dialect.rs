//! Per-segment parsing of the three supported input dialects.
//!
//! The dialect is detected once per segment from its header and every line is
//! then parsed by that dialect's parser:
//! - `Vcf`: a line starts with `#CHROM`; data lines are tab separated VCF
//! - `SeqPilot`: a line starts with `Index`; that row names the columns
//! - `FreeText`: anything else; one genomic or HGVS expression per line
//!
//! VCF and SeqPilot parsers reject malformed lines, which aborts the whole
//! segment. Free text never fails.

use std::fmt;
use std::sync::OnceLock;

use csv::ReaderBuilder;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ImportError, Result};

const VCF_HEADER_MARKER: &str = "#CHROM";
const SEQPILOT_HEADER_MARKER: &str = "Index";
const VCF_MIN_FIELDS: usize = 8;
const SEQPILOT_NUC_CHANGE: &str = "Nuc Change";

fn genotype_regex() -> &'static Regex {
    static GENOTYPE: OnceLock<Regex> = OnceLock::new();
    GENOTYPE.get_or_init(|| Regex::new(r"\((het|homo)\)").expect("valid genotype regex"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dialect {
    Vcf,
    SeqPilot,
    FreeText,
}

impl Dialect {
    pub fn detect(raw: &str) -> Self {
        if raw.lines().any(|line| line.starts_with(VCF_HEADER_MARKER)) {
            Self::Vcf
        } else if raw.lines().any(|line| line.starts_with(SEQPILOT_HEADER_MARKER)) {
            Self::SeqPilot
        } else {
            Self::FreeText
        }
    }

    fn header_marker(self) -> Option<&'static str> {
        match self {
            Self::Vcf => Some(VCF_HEADER_MARKER),
            Self::SeqPilot => Some(SEQPILOT_HEADER_MARKER),
            Self::FreeText => None,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vcf => f.write_str("VCF"),
            Self::SeqPilot => f.write_str("SeqPilot"),
            Self::FreeText => f.write_str("Text"),
        }
    }
}

/// One variant line of a segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantDataLine {
    /// The line as pasted; reassembled into the import payload.
    pub raw: String,
    pub display: String,
    pub has_genotype: bool,
    /// Selected for import.
    pub include: bool,
}

impl VariantDataLine {
    fn new(raw: &str, display: String, has_genotype: bool) -> Self {
        Self {
            raw: raw.to_string(),
            display,
            has_genotype,
            include: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedInput {
    pub dialect: Dialect,
    /// Header lines joined with newlines; empty for free text.
    pub header: String,
    pub variant_data_lines: Vec<VariantDataLine>,
}

/// Parse one segment's raw text.
pub fn parse_segment(raw: &str) -> Result<ParsedInput> {
    let dialect = Dialect::detect(raw);
    let lines: Vec<&str> = raw.lines().collect();
    let header_end = dialect
        .header_marker()
        .and_then(|marker| lines.iter().position(|line| line.starts_with(marker)))
        .map_or(0, |index| index + 1);
    let header = lines[..header_end].join("\n");
    // (1-based line number, line) for every non-blank data line
    let data: Vec<(usize, &str)> = lines[header_end..]
        .iter()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(offset, line)| (header_end + offset + 1, *line))
        .collect();

    let variant_data_lines = match dialect {
        Dialect::Vcf => data
            .iter()
            .filter(|(_, line)| !line.starts_with('#'))
            .map(|&(line_no, line)| parse_vcf_line(line, line_no))
            .collect::<Result<Vec<_>>>()?,
        Dialect::SeqPilot => parse_seqpilot_lines(lines[header_end - 1], &data, header_end)?,
        Dialect::FreeText => data
            .iter()
            .map(|&(_, line)| parse_free_text_line(line))
            .collect(),
    };

    tracing::debug!(
        %dialect,
        lines = variant_data_lines.len(),
        "parsed import segment"
    );
    Ok(ParsedInput {
        dialect,
        header,
        variant_data_lines,
    })
}

/// Parse a VCF data line. `line_no` is 1-based within the segment.
pub fn parse_vcf_line(line: &str, line_no: usize) -> Result<VariantDataLine> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < VCF_MIN_FIELDS {
        return Err(ImportError::MalformedVcfLine {
            line: line_no,
            found: fields.len(),
        });
    }
    let (chrom, pos, reference, alt) = (fields[0], fields[1], fields[3], fields[4]);
    let gt_index = fields
        .get(8)
        .and_then(|format| format.split(':').position(|key| key == "GT"));
    let genotype = gt_index.and_then(|index| {
        fields
            .get(9)
            .and_then(|sample| sample.split(':').nth(index))
    });

    let mut display = format!("{chrom}:{pos} {reference}>{alt}");
    if let Some(genotype) = genotype {
        display.push_str(&format!(" ({genotype})"));
    }
    Ok(VariantDataLine::new(line, display, gt_index.is_some()))
}

fn parse_seqpilot_lines(
    header: &str,
    data: &[(usize, &str)],
    header_line_no: usize,
) -> Result<Vec<VariantDataLine>> {
    let mut text = String::from(header);
    for (_, line) in data {
        text.push('\n');
        text.push_str(line);
    }
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .quoting(false)
        .flexible(false)
        .has_headers(true)
        .from_reader(text.as_bytes());
    let columns = reader
        .headers()
        .map_err(|source| ImportError::MalformedSeqPilotRow {
            line: header_line_no,
            source,
        })?
        .clone();
    let column = |name: &str| columns.iter().position(|c| c.trim() == name);
    let gene_idx = column("Gene");
    let transcript_idx = column("Transcript");
    let nuc_idx = column(SEQPILOT_NUC_CHANGE);

    let mut parsed = Vec::with_capacity(data.len());
    for (record, &(line_no, line)) in reader.records().zip(data) {
        let record = record.map_err(|source| ImportError::MalformedSeqPilotRow {
            line: line_no,
            source,
        })?;
        let value = |idx: Option<usize>| {
            idx.and_then(|i| record.get(i))
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };
        let nuc_change = value(nuc_idx);
        let display = match (value(gene_idx), value(transcript_idx), nuc_change) {
            (Some(gene), Some(transcript), Some(nuc)) => format!("{gene} {transcript}:{nuc}"),
            (None, Some(transcript), Some(nuc)) => format!("{transcript}:{nuc}"),
            (Some(gene), None, Some(nuc)) => format!("{gene} {nuc}"),
            _ => line.replace('\t', " "),
        };
        let has_genotype = nuc_change.is_some_and(|nuc| genotype_regex().is_match(nuc));
        parsed.push(VariantDataLine::new(line, display, has_genotype));
    }
    Ok(parsed)
}

/// Parse a free-text genomic or HGVS line. Never fails.
pub fn parse_free_text_line(line: &str) -> VariantDataLine {
    let has_genotype = genotype_regex().is_match(line);
    VariantDataLine::new(line, line.trim().to_string(), has_genotype)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vcf_line_with_genotype() {
        let line = parse_vcf_line("chr1\t100\t.\tA\tT\t.\t.\t.\tGT:AD\t0/1:10,5", 2).unwrap();
        assert!(line.has_genotype);
        assert!(line.display.contains("0/1"));
        assert_eq!(line.display, "chr1:100 A>T (0/1)");
    }

    #[test]
    fn vcf_line_without_format_has_no_genotype() {
        let line = parse_vcf_line("2\t5\trs1\tG\tC\t50\tPASS\tDP=3", 1).unwrap();
        assert!(!line.has_genotype);
        assert_eq!(line.display, "2:5 G>C");
    }

    #[test]
    fn short_vcf_line_is_rejected() {
        let err = parse_vcf_line("1\t100\t.\tA", 4).unwrap_err();
        assert!(matches!(err, ImportError::MalformedVcfLine { line: 4, found: 4 }));
    }

    #[test]
    fn free_text_genotype_anywhere() {
        assert!(parse_free_text_line("NM_000059.3:c.68-7T>A (het)").has_genotype);
        assert!(parse_free_text_line("(homo) 13-32890572-G-A").has_genotype);
        assert!(!parse_free_text_line("NM_000059.3:c.68-7T>A het").has_genotype);
    }
}
