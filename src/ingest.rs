//! Reading telemetry exports and writing lifetime series
//!
//! Telemetry arrives as header-less `tag;timestamp;value` records, one per line, with any
//! further columns ignored. Archived exports are not clean: values may use a decimal comma and
//! rows may be truncated or carry placeholders, so unparseable rows are dropped rather than
//! failing the whole file.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use chrono::NaiveDateTime;
use log::debug;

use crate::series::{LifetimeSeries, Sample, TimeSeries};
use crate::{Error, Result};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Read a telemetry export from `path`
///
/// Rows without a tag take the file stem as their tag.
///
/// # Errors
/// Returns an error if the file cannot be read or contains no valid rows.
pub fn read_series(path: &Path) -> Result<TimeSeries> {
    let fallback_tag = path
        .file_stem()
        .map_or_else(String::new, |stem| stem.to_string_lossy().into_owned());
    parse_series(File::open(path)?, &fallback_tag)
}

/// Parse a telemetry export
///
/// Valid rows are sorted by timestamp; where timestamps repeat, the first row wins.
///
/// # Errors
/// Returns [`Error::Csv`] on a read failure and [`Error::InvalidSeries`] if no row is valid.
pub fn parse_series<R: Read>(reader: R, fallback_tag: &str) -> Result<TimeSeries> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut tag = None;
    let mut samples = vec![];
    let mut dropped = 0_usize;

    for record in rdr.byte_records() {
        let record = record?;
        let Some((row_tag, sample)) = parse_record(&record) else {
            dropped += 1;
            continue;
        };
        if tag.is_none() && !row_tag.is_empty() {
            tag = Some(row_tag.to_owned());
        }
        samples.push(sample);
    }

    if samples.is_empty() {
        return Err(Error::InvalidSeries(format!(
            "no valid samples in {fallback_tag} ({dropped} rows dropped)"
        )));
    }

    samples.sort_by_key(|s| s.timestamp);
    let parsed = samples.len();
    samples.dedup_by_key(|s| s.timestamp);
    debug!(
        "read {} samples, dropped {dropped} malformed and {} duplicate rows",
        samples.len(),
        parsed - samples.len()
    );

    TimeSeries::new(tag.unwrap_or_else(|| fallback_tag.to_owned()), samples)
}

/// A row which is not valid UTF-8 in its first three columns is malformed
fn text_field(record: &csv::ByteRecord, index: usize) -> Option<&str> {
    std::str::from_utf8(record.get(index)?).ok()
}

fn parse_record(record: &csv::ByteRecord) -> Option<(&str, Sample)> {
    let tag = text_field(record, 0)?;
    let timestamp = NaiveDateTime::parse_from_str(text_field(record, 1)?, TIMESTAMP_FORMAT).ok()?;
    let value = text_field(record, 2)?.replace(',', ".").parse::<f64>().ok()?;
    value.is_finite().then_some((tag, Sample { timestamp, value }))
}

/// Write lifetime series as `method;timestamp;hours` rows, one series after another, leaving
/// gaps empty
///
/// # Errors
/// Returns an error if the file cannot be created or written.
pub fn write_lifetimes(path: &Path, series: &[LifetimeSeries]) -> Result<()> {
    write_lifetimes_to(File::create(path)?, series)
}

/// # Errors
/// Returns an error if the writer fails.
pub fn write_lifetimes_to<W: Write>(writer: W, series: &[LifetimeSeries]) -> Result<()> {
    let mut wtr = export_writer(writer);
    for lifetimes in series {
        let rows = lifetimes.points().iter().map(|point| {
            (
                point.timestamp,
                point.lifetime.hours().map(|h| h.to_string()).unwrap_or_default(),
            )
        });
        write_rows(&mut wtr, lifetimes.method(), rows)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write a telemetry series, e.g. a smoothed current, in the export layout
///
/// # Errors
/// Returns an error if the file cannot be created or written.
pub fn write_series(path: &Path, series: &TimeSeries) -> Result<()> {
    write_series_to(File::create(path)?, series)
}

/// # Errors
/// Returns an error if the writer fails.
pub fn write_series_to<W: Write>(writer: W, series: &TimeSeries) -> Result<()> {
    let mut wtr = export_writer(writer);
    let rows = series
        .samples()
        .iter()
        .map(|s| (s.timestamp, s.value.to_string()));
    write_rows(&mut wtr, series.tag(), rows)?;
    wtr.flush()?;
    Ok(())
}

fn export_writer<W: Write>(writer: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .from_writer(writer)
}

fn write_rows<W: Write>(
    wtr: &mut csv::Writer<W>,
    tag: &str,
    rows: impl Iterator<Item = (NaiveDateTime, String)>,
) -> Result<()> {
    for (timestamp, value) in rows {
        let timestamp = timestamp.format(TIMESTAMP_FORMAT).to_string();
        wtr.write_record([tag, timestamp.as_str(), value.as_str()])?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{parse_series, write_lifetimes_to, write_series_to};
    use crate::series::{GapReason, Lifetime, LifetimeSeries};
    use crate::{Error, Result};

    const EXPORT: &str = "\
i5beam; 2025-07-02 00:00:01.500; 0,1995;
i5beam; 2025-07-02 00:00:00.500; 0,2000;
i5beam; not a time; 0,1990;
i5beam; 2025-07-02 00:00:02.500; ;
i5beam; 2025-07-02 00:00:02.500; 0,1990;
i5beam; 2025-07-02 00:00:02.500; 0,1111;
i5beam; 2025-07-02 00:00:03.500; nan;
";

    #[test]
    fn export_rows_are_cleaned_sorted_and_deduplicated() -> Result<()> {
        let series = parse_series(EXPORT.as_bytes(), "fallback")?;

        assert_eq!(series.tag(), "i5beam");
        assert_eq!(series.values(), vec![0.2, 0.1995, 0.199]);
        let times = series
            .samples()
            .iter()
            .map(|s| s.timestamp.format("%H:%M:%S%.3f").to_string())
            .collect::<Vec<_>>();
        assert_eq!(times, ["00:00:00.500", "00:00:01.500", "00:00:02.500"]);
        Ok(())
    }

    #[test]
    fn rows_with_invalid_utf8_are_dropped() -> Result<()> {
        let export: &[u8] = b"i5beam; 2025-07-02 00:00:00.500; 0,2000;\n\
            i5\xffbeam; 2025-07-02 00:00:01.500; 0,1999;\n\
            i5beam; 2025-07-02 00:00:02.500; 0,1998;\n";
        let series = parse_series(export, "fallback")?;
        assert_eq!(series.tag(), "i5beam");
        assert_eq!(series.values(), vec![0.2, 0.1998]);
        Ok(())
    }

    #[test]
    fn untagged_rows_take_the_fallback_tag() -> Result<()> {
        let series = parse_series("; 2025-07-02 10:00:00.000; 1.5\n".as_bytes(), "beam_data")?;
        assert_eq!(series.tag(), "beam_data");
        Ok(())
    }

    #[test]
    fn export_without_valid_rows_is_rejected() {
        assert!(matches!(
            parse_series("tag; garbage; 1\n".as_bytes(), "empty"),
            Err(Error::InvalidSeries(_))
        ));
    }

    #[test]
    fn lifetimes_are_written_with_empty_gaps() -> Result<()> {
        let current = parse_series(EXPORT.as_bytes(), "fallback")?;
        let lifetimes = LifetimeSeries::from_lifetimes(
            "simple",
            &current,
            [
                Lifetime::Gap(GapReason::NoPredecessor),
                Lifetime::Hours(12.5),
                Lifetime::Gap(GapReason::UnitRatio),
            ],
        );

        let predicted = LifetimeSeries::constant("coulomb_chao", &current, 40.);

        let mut out = vec![];
        write_lifetimes_to(&mut out, &[lifetimes, predicted])?;
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "simple;2025-07-02 00:00:00.500;\n\
             simple;2025-07-02 00:00:01.500;12.5\n\
             simple;2025-07-02 00:00:02.500;\n\
             coulomb_chao;2025-07-02 00:00:00.500;40\n\
             coulomb_chao;2025-07-02 00:00:01.500;40\n\
             coulomb_chao;2025-07-02 00:00:02.500;40\n"
        );
        Ok(())
    }

    #[test]
    fn written_series_reads_back() -> Result<()> {
        let series = parse_series(EXPORT.as_bytes(), "fallback")?;
        let mut out = vec![];
        write_series_to(&mut out, &series)?;
        assert_eq!(parse_series(out.as_slice(), "fallback")?, series);
        Ok(())
    }
}
