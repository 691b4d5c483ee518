use std::fmt;

use csv::{ReaderBuilder, StringRecord, Terminator, Trim};

use super::model::{Sample, STC_IRRADIANCE, STC_TEMPERATURE};

/// Rows with fewer fields than this carry no usable sample.
const MIN_FIELDS: usize = 4;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// What to do with a sample cell that is not a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumberPolicy {
    /// Malformed voltage/current cells read as 0 and the row is kept.
    #[default]
    Lenient,
    /// A row with any malformed sample cell is dropped.
    Strict,
}

/// Parser configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOptions {
    pub numbers: NumberPolicy,
    /// Irradiance used when no row carries the irradiance column (W/m²).
    pub default_irradiance: f64,
    /// Temperature used when no row carries the temperature column (°C).
    pub default_temperature: f64,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            numbers: NumberPolicy::Lenient,
            default_irradiance: STC_IRRADIANCE,
            default_temperature: STC_TEMPERATURE,
        }
    }
}

// ---------------------------------------------------------------------------
// Row layout and diagnostics
// ---------------------------------------------------------------------------

/// Positional columns of a tracer export row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Voltage,
    Current,
    VoltageCorrected,
    CurrentCorrected,
    Irradiance,
    Temperature,
}

impl Column {
    fn index(self) -> usize {
        match self {
            Column::Voltage => 0,
            Column::Current => 1,
            Column::VoltageCorrected => 2,
            Column::CurrentCorrected => 3,
            Column::Irradiance => 4,
            Column::Temperature => 5,
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Column::Voltage => "voltage",
            Column::Current => "current",
            Column::VoltageCorrected => "corrected voltage",
            Column::CurrentCorrected => "corrected current",
            Column::Irradiance => "irradiance",
            Column::Temperature => "temperature",
        };
        f.write_str(name)
    }
}

/// A problem found in one row. None of these abort parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowIssue {
    /// Row skipped: too few fields.
    MalformedRow { fields: usize },
    /// Cell was not a number; the row was kept with a fallback value.
    MalformedNumber { column: Column },
    /// Cell was not a number and the strict policy dropped the row.
    RejectedNumber { column: Column },
}

/// A [`RowIssue`] located by 1-based line number in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowDiagnostic {
    pub line: usize,
    pub issue: RowIssue,
}

impl fmt::Display for RowDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.issue {
            RowIssue::MalformedRow { fields } => {
                write!(f, "line {}: {fields} field(s), row skipped", self.line)
            }
            RowIssue::MalformedNumber { column } => {
                write!(f, "line {}: {column} is not a number", self.line)
            }
            RowIssue::RejectedNumber { column } => {
                write!(f, "line {}: {column} is not a number, row dropped", self.line)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// ParsedRecords – fold accumulator and result
// ---------------------------------------------------------------------------

/// Everything the parser recovers from one file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedRecords {
    /// Samples in file row order.
    pub samples: Vec<Sample>,
    /// Last numeric irradiance cell of the file, if any.
    pub irradiance: Option<f64>,
    /// Last numeric temperature cell of the file, if any.
    pub temperature: Option<f64>,
    pub diagnostics: Vec<RowDiagnostic>,
}

impl ParsedRecords {
    fn note(&mut self, line: usize, issue: RowIssue) {
        let diagnostic = RowDiagnostic { line, issue };
        log::debug!("{diagnostic}");
        self.diagnostics.push(diagnostic);
    }

    /// Fold one row into the accumulator.
    fn absorb(mut self, record: &StringRecord, line: usize, policy: NumberPolicy) -> Self {
        if record.len() < MIN_FIELDS {
            self.note(
                line,
                RowIssue::MalformedRow {
                    fields: record.len(),
                },
            );
            return self;
        }

        let voltage = Cell::read(record, Column::Voltage);
        let current = Cell::read(record, Column::Current);
        let voltage_corrected = Cell::read(record, Column::VoltageCorrected);
        let current_corrected = Cell::read(record, Column::CurrentCorrected);

        if policy == NumberPolicy::Strict {
            let rejected: Vec<Column> = [
                (Column::Voltage, voltage.is_number()),
                (Column::Current, current.is_number()),
                (Column::VoltageCorrected, !voltage_corrected.is_malformed()),
                (Column::CurrentCorrected, !current_corrected.is_malformed()),
            ]
            .into_iter()
            .filter(|(_, ok)| !ok)
            .map(|(column, _)| column)
            .collect();
            if !rejected.is_empty() {
                for column in rejected {
                    self.note(line, RowIssue::RejectedNumber { column });
                }
                return self;
            }
        }

        let voltage = self.required(voltage, Column::Voltage, line);
        let current = self.required(current, Column::Current, line);
        let voltage_corrected =
            self.with_fallback(voltage_corrected, voltage, Column::VoltageCorrected, line);
        let current_corrected =
            self.with_fallback(current_corrected, current, Column::CurrentCorrected, line);

        if let Some(irradiance) = self.optional(record, Column::Irradiance, line) {
            self.irradiance = Some(irradiance);
        }
        if let Some(temperature) = self.optional(record, Column::Temperature, line) {
            self.temperature = Some(temperature);
        }

        self.samples.push(Sample::new(
            voltage,
            current,
            voltage_corrected,
            current_corrected,
        ));
        self
    }

    /// Voltage and current degrade to 0 when unreadable.
    fn required(&mut self, cell: Cell, column: Column, line: usize) -> f64 {
        match cell {
            Cell::Number(value) => value,
            Cell::Empty | Cell::Malformed => {
                self.note(line, RowIssue::MalformedNumber { column });
                0.0
            }
        }
    }

    /// Corrected values fall back to their measured counterpart.
    fn with_fallback(&mut self, cell: Cell, fallback: f64, column: Column, line: usize) -> f64 {
        match cell {
            Cell::Number(value) => value,
            Cell::Empty => fallback,
            Cell::Malformed => {
                self.note(line, RowIssue::MalformedNumber { column });
                fallback
            }
        }
    }

    fn optional(&mut self, record: &StringRecord, column: Column, line: usize) -> Option<f64> {
        match Cell::read(record, column) {
            Cell::Number(value) => Some(value),
            Cell::Empty => None,
            Cell::Malformed => {
                self.note(line, RowIssue::MalformedNumber { column });
                None
            }
        }
    }
}

/// Classification of one trimmed cell.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Cell {
    Number(f64),
    Empty,
    Malformed,
}

impl Cell {
    fn read(record: &StringRecord, column: Column) -> Self {
        match record.get(column.index()) {
            None | Some("") => Cell::Empty,
            Some(text) => match text.parse::<f64>() {
                Ok(value) if value.is_finite() => Cell::Number(value),
                _ => Cell::Malformed,
            },
        }
    }

    fn is_number(self) -> bool {
        matches!(self, Cell::Number(_))
    }

    fn is_malformed(self) -> bool {
        matches!(self, Cell::Malformed)
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Parse the text of one tracer export.
///
/// Row layout (positional, the first line is a header and always dropped):
///
/// ```text
/// voltage, current, voltage_stc, current_stc[, irradiance[, temperature]]
/// ```
///
/// Rows with fewer than four fields are skipped. The last numeric
/// irradiance/temperature cell in the file wins.
pub fn parse(text: &str, options: &ParseOptions) -> ParsedRecords {
    // Rows end at '\n' only; a stray '\r' stays inside its row.
    let mut splitter = ReaderBuilder::new();
    splitter
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(Trim::All)
        .terminator(Terminator::Any(b'\n'));

    text.split('\n')
        .enumerate()
        // The header is whatever the first line holds, even if blank.
        .skip(1)
        .filter(|(_, row)| !row.trim().is_empty())
        .filter_map(|(idx, row)| {
            let line = idx + 1;
            match splitter.from_reader(row.as_bytes()).records().next() {
                Some(Ok(record)) => Some((line, record)),
                Some(Err(err)) => {
                    log::debug!("line {line}: skipping unreadable row: {err}");
                    None
                }
                None => None,
            }
        })
        .fold(ParsedRecords::default(), |acc, (line, record)| {
            acc.absorb(&record, line, options.numbers)
        })
}
