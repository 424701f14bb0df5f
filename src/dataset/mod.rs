// src/dataset/mod.rs

use anyhow::{anyhow, bail, Context, Result};
use arrow::array::{Array, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, TimeUnit};
use arrow::record_batch::RecordBatch;
use bytes::Bytes;
use chrono::NaiveDate;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use tracing::info;

pub const CITY_COL: &str = "city";
pub const DATE_COL: &str = "date";
pub const MEDIAN_COL: &str = "Median Permit Issue Time";
pub const COUNT_COL: &str = "application_count";

/// Cities dropped at load. Auburn's records-request extract is incomplete
/// and produces a misleading series.
const EXCLUDED_CITIES: &[&str] = &["Auburn"];

/// One aggregated row of the upstream time series: for `date`, the median
/// issue time over the trailing 365-day window and the number of
/// applications in that window.
#[derive(Debug, Clone, PartialEq)]
pub struct PermitRecord {
    pub city: String,
    pub date: NaiveDate,
    pub median_issue_days: f64,
    pub application_count: i64,
}

/// The dataset, loaded once and never mutated. Shared across the process as
/// `Arc<PermitTable>`; readers only ever see this one immutable value.
#[derive(Debug)]
pub struct PermitTable {
    records: Vec<PermitRecord>,
    cities: Vec<String>,
}

impl PermitTable {
    /// Decode an in-memory Parquet file into a `PermitTable`.
    ///
    /// Fails fast on a malformed file or a schema missing the expected
    /// columns; there is no partial-result mode.
    pub fn from_parquet_bytes(data: Bytes) -> Result<Self> {
        let builder = ParquetRecordBatchReaderBuilder::try_new(data)
            .context("opening permit dataset as Parquet")?;

        let schema = builder.schema().clone();
        for col in [CITY_COL, DATE_COL, MEDIAN_COL, COUNT_COL] {
            if schema.field_with_name(col).is_err() {
                bail!(
                    "permit dataset is missing column {:?}; found {:?}",
                    col,
                    schema
                        .fields()
                        .iter()
                        .map(|f| f.name().as_str())
                        .collect::<Vec<_>>()
                );
            }
        }

        let reader = builder.build().context("reading permit dataset")?;
        let mut records = Vec::new();
        for batch in reader {
            let batch = batch.context("decoding permit dataset batch")?;
            decode_batch(&batch, &mut records)?;
        }

        let table = Self::from_records(records);
        info!(
            rows = table.records.len(),
            cities = table.cities.len(),
            "loaded permit table"
        );
        Ok(table)
    }

    /// Build a table from already-decoded rows, applying the same load-time
    /// row filter as the Parquet path.
    pub fn from_records(records: Vec<PermitRecord>) -> Self {
        let records: Vec<PermitRecord> = records
            .into_iter()
            .filter(|r| !EXCLUDED_CITIES.contains(&r.city.as_str()))
            .collect();

        let mut cities: Vec<String> = records.iter().map(|r| r.city.clone()).collect();
        cities.sort();
        cities.dedup();

        Self { records, cities }
    }

    pub fn records(&self) -> &[PermitRecord] {
        &self.records
    }

    /// Distinct cities present, sorted. Drives filter-widget options.
    pub fn cities(&self) -> &[String] {
        &self.cities
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Append one record batch's rows, downcasting each column to its expected
/// Arrow type. A type mismatch is a hard error naming the column.
fn decode_batch(batch: &RecordBatch, records: &mut Vec<PermitRecord>) -> Result<()> {
    let cities = column::<StringArray>(batch, CITY_COL)?;
    let medians = column::<Float64Array>(batch, MEDIAN_COL)?;
    let counts = column::<Int64Array>(batch, COUNT_COL)?;

    let date_idx = batch
        .schema()
        .index_of(DATE_COL)
        .context("locating date column")?;
    let dates = batch.column(date_idx).clone();

    records.reserve(batch.num_rows());
    for row in 0..batch.num_rows() {
        // Null anywhere in a row means the upstream aggregation had no data
        // for that (city, date); skip rather than fabricate a point.
        if cities.is_null(row) || dates.is_null(row) || medians.is_null(row) || counts.is_null(row)
        {
            continue;
        }
        records.push(PermitRecord {
            city: cities.value(row).to_string(),
            date: decode_date(&dates, row)?,
            median_issue_days: medians.value(row),
            application_count: counts.value(row),
        });
    }
    Ok(())
}

fn column<'a, T: 'static>(batch: &'a RecordBatch, name: &str) -> Result<&'a T> {
    let idx = batch
        .schema()
        .index_of(name)
        .with_context(|| format!("locating column {name:?}"))?;
    batch.column(idx).as_any().downcast_ref::<T>().ok_or_else(|| {
        anyhow!(
            "column {:?} has unexpected type {:?}",
            name,
            batch.column(idx).data_type()
        )
    })
}

/// Read the date column at `row` as a calendar date. The upstream file has
/// been written both as Date32 and as pandas-style timestamps, so accept
/// either encoding.
fn decode_date(dates: &arrow::array::ArrayRef, row: usize) -> Result<NaiveDate> {
    use arrow::array::{
        Date32Array, TimestampMicrosecondArray, TimestampMillisecondArray,
        TimestampNanosecondArray, TimestampSecondArray,
    };

    const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

    fn ts_value<T: Array + 'static>(
        dates: &arrow::array::ArrayRef,
        row: usize,
        value: impl Fn(&T, usize) -> i64,
    ) -> Result<i64> {
        let arr = dates
            .as_any()
            .downcast_ref::<T>()
            .ok_or_else(|| anyhow!("timestamp column downcast failed"))?;
        Ok(value(arr, row))
    }

    let date = match dates.data_type() {
        DataType::Date32 => {
            let arr = dates
                .as_any()
                .downcast_ref::<Date32Array>()
                .ok_or_else(|| anyhow!("date column downcast failed"))?;
            NaiveDate::from_num_days_from_ce_opt(arr.value(row) + UNIX_EPOCH_DAYS_FROM_CE)
        }
        DataType::Timestamp(unit, _) => {
            let secs = match unit {
                TimeUnit::Second => ts_value::<TimestampSecondArray>(dates, row, |a, r| a.value(r))?,
                TimeUnit::Millisecond => {
                    ts_value::<TimestampMillisecondArray>(dates, row, |a, r| a.value(r))? / 1_000
                }
                TimeUnit::Microsecond => {
                    ts_value::<TimestampMicrosecondArray>(dates, row, |a, r| a.value(r))?
                        / 1_000_000
                }
                TimeUnit::Nanosecond => {
                    ts_value::<TimestampNanosecondArray>(dates, row, |a, r| a.value(r))?
                        / 1_000_000_000
                }
            };
            chrono::DateTime::from_timestamp(secs, 0).map(|dt| dt.date_naive())
        }
        other => bail!("date column has unsupported type {other:?}"),
    };

    date.ok_or_else(|| anyhow!("date value out of range at row {row}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Date32Array, Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use parquet::arrow::ArrowWriter;
    use std::sync::Arc;

    fn day(d: &str) -> NaiveDate {
        d.parse().unwrap()
    }

    fn rec(city: &str, date: &str, median: f64, count: i64) -> PermitRecord {
        PermitRecord {
            city: city.to_string(),
            date: day(date),
            median_issue_days: median,
            application_count: count,
        }
    }

    /// Round-trips a small table through an in-memory Parquet file.
    fn parquet_fixture() -> Bytes {
        let schema = Arc::new(Schema::new(vec![
            Field::new(CITY_COL, DataType::Utf8, false),
            Field::new(DATE_COL, DataType::Date32, false),
            Field::new(MEDIAN_COL, DataType::Float64, false),
            Field::new(COUNT_COL, DataType::Int64, false),
        ]));
        // 2020-01-01 is 18262 days after the Unix epoch.
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["Kirkland", "Bellevue", "Auburn"])),
                Arc::new(Date32Array::from(vec![18262, 18262, 18262])),
                Arc::new(Float64Array::from(vec![100.0, 80.0, 40.0])),
                Arc::new(Int64Array::from(vec![5, 3, 1])),
            ],
        )
        .unwrap();

        let mut buf = Vec::new();
        let mut writer = ArrowWriter::try_new(&mut buf, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();
        Bytes::from(buf)
    }

    #[test]
    fn loads_parquet_and_drops_excluded_cities() -> Result<()> {
        let table = PermitTable::from_parquet_bytes(parquet_fixture())?;

        assert_eq!(table.cities(), ["Bellevue", "Kirkland"]);
        assert_eq!(table.records().len(), 2);
        assert_eq!(
            table.records()[0],
            rec("Kirkland", "2020-01-01", 100.0, 5)
        );
        Ok(())
    }

    #[test]
    fn missing_column_is_a_clear_error() {
        let schema = Arc::new(Schema::new(vec![Field::new(
            CITY_COL,
            DataType::Utf8,
            false,
        )]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![Arc::new(StringArray::from(vec!["Kirkland"])) as _],
        )
        .unwrap();
        let mut buf = Vec::new();
        let mut writer = ArrowWriter::try_new(&mut buf, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let err = PermitTable::from_parquet_bytes(Bytes::from(buf)).unwrap_err();
        assert!(err.to_string().contains("missing column"), "{err}");
        assert!(err.to_string().contains(DATE_COL), "{err}");
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        let err = PermitTable::from_parquet_bytes(Bytes::from_static(b"not parquet")).unwrap_err();
        assert!(err.to_string().contains("Parquet"), "{err}");
    }

    #[test]
    fn from_records_sorts_and_dedups_cities() {
        let table = PermitTable::from_records(vec![
            rec("Kirkland", "2020-01-01", 100.0, 5),
            rec("Bellevue", "2020-01-01", 80.0, 3),
            rec("Kirkland", "2020-01-08", 101.0, 6),
            rec("Auburn", "2020-01-01", 40.0, 1),
        ]);
        assert_eq!(table.cities(), ["Bellevue", "Kirkland"]);
        assert_eq!(table.records().len(), 3);
    }
}
