//! Input/output tables.
//!
//! The input is a CSV with one candidate per row. Header matching is
//! case-insensitive and whitespace-trimmed; extra columns are carried through
//! to the output untouched.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::path::Path;

use csv::StringRecord;
use thiserror::Error;

use crate::generation::generator::GeneratedSummaries;
use crate::models::candidate::RawCandidate;
use crate::models::competency::Competency;

pub const NAME_COLUMN: &str = "Name";
pub const GENDER_COLUMN: &str = "Gender";
pub const LEVEL_COLUMN: &str = "Level";

/// Appended to every output table, in `summary_200/150/100` order.
pub const OUTPUT_COLUMNS: [&str; 3] = [
    "Summary (200 words)",
    "Summary (150 words)",
    "Summary (100 words)",
];

/// Header spellings accepted in place of the canonical competency name.
const HEADER_ALIASES: &[(&str, Competency)] =
    &[("manages stakeholder", Competency::ManagesStakeholders)];

#[derive(Debug, Error)]
pub enum TableError {
    #[error("failed to read table: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid CSV data: {0}")]
    Csv(#[from] csv::Error),

    #[error("required column '{0}' is missing")]
    MissingColumn(String),

    #[error("expected {expected} output rows, got {actual}")]
    RowCount { expected: usize, actual: usize },
}

/// Positions of the required columns within the input header.
#[derive(Debug, Clone)]
struct ColumnMap {
    name: usize,
    gender: usize,
    level: usize,
    scores: [usize; 8],
}

impl ColumnMap {
    fn resolve(headers: &StringRecord) -> Result<Self, TableError> {
        let mut index: HashMap<String, usize> = HashMap::new();
        for (i, header) in headers.iter().enumerate() {
            // First occurrence wins when a header is duplicated.
            index.entry(normalize_header(header)).or_insert(i);
        }

        let find = |column: &str| -> Result<usize, TableError> {
            index
                .get(&normalize_header(column))
                .copied()
                .ok_or_else(|| TableError::MissingColumn(column.to_string()))
        };

        let mut scores = [0usize; 8];
        for competency in Competency::ALL {
            let position = find(competency.name()).or_else(|err| {
                HEADER_ALIASES
                    .iter()
                    .filter(|(_, target)| *target == competency)
                    .find_map(|(alias, _)| index.get(*alias).copied())
                    .ok_or(err)
            })?;
            scores[competency.priority()] = position;
        }

        Ok(Self {
            name: find(NAME_COLUMN)?,
            gender: find(GENDER_COLUMN)?,
            level: find(LEVEL_COLUMN)?,
            scores,
        })
    }
}

fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase()
}

/// A parsed input table. Rows keep every original cell so the output can
/// reproduce them verbatim.
#[derive(Debug, Clone)]
pub struct InputTable {
    headers: StringRecord,
    rows: Vec<StringRecord>,
    columns: ColumnMap,
}

impl InputTable {
    pub fn read<R: Read>(reader: R) -> Result<Self, TableError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let columns = ColumnMap::resolve(&headers)?;

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            // Spreadsheet exports often end with rows of empty cells.
            if record.iter().all(str::is_empty) {
                continue;
            }
            rows.push(record);
        }

        Ok(Self {
            headers,
            rows,
            columns,
        })
    }

    pub fn from_path(path: &Path) -> Result<Self, TableError> {
        let file = std::fs::File::open(path)?;
        Self::read(file)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Raw candidates in input order. Short rows read as empty cells.
    pub fn candidates(&self) -> Vec<RawCandidate> {
        let columns = &self.columns;
        self.rows
            .iter()
            .map(|row| {
                let cell = |i: usize| row.get(i).unwrap_or("").to_string();
                RawCandidate {
                    name: cell(columns.name),
                    gender: cell(columns.gender),
                    level: cell(columns.level),
                    scores: columns.scores.map(cell),
                }
            })
            .collect()
    }

    /// Writes every input column followed by the three summary columns.
    /// `summaries[i]` belongs to input row `i`.
    pub fn write_output<W: Write>(
        &self,
        writer: W,
        summaries: &[GeneratedSummaries],
    ) -> Result<(), TableError> {
        if summaries.len() != self.rows.len() {
            return Err(TableError::RowCount {
                expected: self.rows.len(),
                actual: summaries.len(),
            });
        }

        let width = self.headers.len();
        let mut csv_writer = csv::WriterBuilder::new().flexible(true).from_writer(writer);

        let mut header: Vec<&str> = self.headers.iter().collect();
        header.extend(OUTPUT_COLUMNS);
        csv_writer.write_record(&header)?;

        for (row, summary) in self.rows.iter().zip(summaries) {
            let mut record: Vec<&str> = (0..width).map(|i| row.get(i).unwrap_or("")).collect();
            record.extend(summary.variants().map(|(_, text)| text));
            csv_writer.write_record(&record)?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}

/// Writes the sample input file: canonical headers plus two example candidates.
pub fn write_template<W: Write>(writer: W) -> Result<(), TableError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header = vec![NAME_COLUMN, GENDER_COLUMN, LEVEL_COLUMN];
    header.extend(Competency::ALL.map(Competency::name));
    csv_writer.write_record(&header)?;

    csv_writer.write_record([
        "Jane Doe", "She/Her", "Apply", "4.1", "3.5", "4.5", "3.9", "4.2", "3.8", "4.0", "3.7",
    ])?;
    csv_writer.write_record([
        "John Smith", "He/Him", "Shape", "2.8", "3.1", "2.5", "3.2", "2.9", "3.4", "3.8", "2.7",
    ])?;

    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::candidate::CandidateRecord;

    const HEADER: &str = "Name,Gender,Level,Overall Leadership,Reasoning & Problem Solving,\
        Drives Results,Develops Talent,Manages Stakeholders,Thinks Strategically,\
        Solves Challenges,Steers Change";

    fn summaries(text: &str) -> GeneratedSummaries {
        GeneratedSummaries {
            summary_200: format!("{text} 200"),
            summary_150: format!("{text} 150"),
            summary_100: format!("{text} 100"),
        }
    }

    #[test]
    fn test_reads_canonical_header() {
        let csv = format!("{HEADER}\nSub,she/her,Apply,4,3.6,3.9,3,3.8,4.2,5,3.1\n");
        let table = InputTable::read(csv.as_bytes()).unwrap();
        assert_eq!(table.len(), 1);

        let raw = &table.candidates()[0];
        assert_eq!(raw.name, "Sub");
        assert_eq!(raw.gender, "she/her");
        assert_eq!(raw.level, "Apply");
        assert_eq!(raw.scores[Competency::SolvesChallenges.priority()], "5");

        let record = CandidateRecord::from_raw(raw).unwrap();
        assert_eq!(record.score(Competency::DevelopsTalent), 3.0);
    }

    #[test]
    fn test_header_matching_ignores_case_order_and_whitespace() {
        let csv = "  steers change ,LEVEL,name,gender,OVERALL LEADERSHIP,reasoning & problem solving,\
            drives results,develops talent,Manages Stakeholder,thinks strategically,solves challenges,Notes\n\
            2.7,shape,John Smith,He/Him,2.8,3.1,2.5,3.2,2.9,3.4,3.8,keep me\n";
        let table = InputTable::read(csv.as_bytes()).unwrap();
        let raw = &table.candidates()[0];

        assert_eq!(raw.name, "John Smith");
        assert_eq!(raw.level, "shape");
        assert_eq!(raw.scores[Competency::SteersChange.priority()], "2.7");
        assert_eq!(raw.scores[Competency::ManagesStakeholders.priority()], "2.9");
    }

    #[test]
    fn test_missing_column_is_fatal() {
        let csv = HEADER.replace(",Steers Change", "") + "\n";
        let err = InputTable::read(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, TableError::MissingColumn(ref c) if c == "Steers Change"));
    }

    #[test]
    fn test_blank_rows_skipped_short_rows_padded() {
        let csv = format!("{HEADER}\n,,,,,,,,,,,\nAna,They/Them,Guide,3\n");
        let table = InputTable::read(csv.as_bytes()).unwrap();
        assert_eq!(table.len(), 1);
        let raw = &table.candidates()[0];
        assert_eq!(raw.name, "Ana");
        assert_eq!(raw.scores[Competency::SteersChange.priority()], "");
    }

    #[test]
    fn test_output_preserves_columns_and_appends_summaries() {
        let csv = format!(
            "{HEADER},Notes\nSub,she/her,Apply,4,3.6,3.9,3,3.8,4.2,5,3.1,first\n\
             Bad,he/him,Lead,4,4,4,4,4,4,4,4,second\n"
        );
        let table = InputTable::read(csv.as_bytes()).unwrap();

        let mut out = Vec::new();
        table
            .write_output(
                &mut out,
                &[summaries("Sub"), GeneratedSummaries::error_marker()],
            )
            .unwrap();

        let mut reader = csv::Reader::from_reader(out.as_slice());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.len(), 12 + 3);
        assert_eq!(&headers[11], "Notes");
        assert_eq!(&headers[12], "Summary (200 words)");
        assert_eq!(&headers[14], "Summary (100 words)");

        let rows: Vec<StringRecord> = reader.records().map(Result::unwrap).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][11], "first");
        assert_eq!(&rows[0][13], "Sub 150");
        assert_eq!(&rows[1][2], "Lead");
        assert!((12..15).all(|i| &rows[1][i] == "Error"));
    }

    #[test]
    fn test_output_row_count_mismatch() {
        let csv = format!("{HEADER}\nSub,she/her,Apply,4,3.6,3.9,3,3.8,4.2,5,3.1\n");
        let table = InputTable::read(csv.as_bytes()).unwrap();
        let err = table.write_output(Vec::new(), &[]).unwrap_err();
        assert!(matches!(err, TableError::RowCount { expected: 1, actual: 0 }));
    }

    #[test]
    fn test_template_reads_back_as_valid_candidates() {
        let mut out = Vec::new();
        write_template(&mut out).unwrap();

        let table = InputTable::read(out.as_slice()).unwrap();
        let records: Vec<CandidateRecord> = table
            .candidates()
            .iter()
            .map(|raw| CandidateRecord::from_raw(raw).unwrap())
            .collect();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Jane Doe");
        assert_eq!(records[1].score(Competency::SolvesChallenges), 3.8);
    }
}
