//! The `SoilTable`, one `ReducedRow` per fetched point with a fixed four columns schema.
//!
//! Absent cells are written as `NA` in CSV files and when displayed, reading accepts both
//! `NA` and empty fields.
//!

use std::io::{Read, Write};

use serde::Serialize;
use tabled::builder::Builder;
use tabled::settings::Style;
use tracing::{debug, trace};

use transect_sources::{PointRecord, Property};

use crate::{process_point, ReducedRow, TableError};

/// Column names, in order.
pub const COLUMNS: [&str; 4] = ["clay", "sand", "silt", "ocs"];

/// How absent values are written
const NA: &str = "NA";

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SoilTable {
    rows: Vec<ReducedRow>,
}

impl SoilTable {
    /// One row per record, same order.
    ///
    #[tracing::instrument(skip(records))]
    pub fn from_records(records: &[PointRecord]) -> Self {
        trace!("enter");

        let rows: Vec<ReducedRow> = records.iter().map(process_point).collect();
        debug!("{} rows", rows.len());
        SoilTable { rows }
    }

    #[inline]
    pub fn columns(&self) -> [&'static str; 4] {
        COLUMNS
    }

    /// (rows, columns)
    ///
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), COLUMNS.len())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[ReducedRow] {
        &self.rows
    }

    pub fn row(&self, i: usize) -> Option<&ReducedRow> {
        self.rows.get(i)
    }

    /// One column, absent cells included.
    ///
    pub fn column(&self, p: Property) -> Vec<Option<f64>> {
        self.rows.iter().map(|r| r.get(p)).collect()
    }

    /// Write as CSV with a header line.
    ///
    #[tracing::instrument(skip(self, out))]
    pub fn write_csv<W: Write>(&self, out: W) -> Result<(), TableError> {
        let mut wtr = csv::Writer::from_writer(out);

        wtr.write_record(COLUMNS)?;
        for row in &self.rows {
            wtr.write_record(row.values().iter().map(|v| cell(*v)))?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Read back a CSV file.  Columns are found by name so extra columns (like an index)
    /// are ignored.
    ///
    #[tracing::instrument(skip(input))]
    pub fn read_csv<R: Read>(input: R) -> Result<Self, TableError> {
        let mut rdr = csv::Reader::from_reader(input);

        let headers = rdr.headers()?.clone();
        let idx = COLUMNS
            .iter()
            .map(|name| {
                headers
                    .iter()
                    .position(|h| h.trim() == *name)
                    .ok_or_else(|| TableError::MissingColumn(name.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut rows = vec![];
        for (n, rec) in rdr.records().enumerate() {
            let rec = rec?;
            let mut v = [None; 4];
            for (col, &i) in idx.iter().enumerate() {
                let field = rec.get(i).unwrap_or("").trim();
                v[col] = parse_cell(field).ok_or_else(|| TableError::BadValue {
                    row: n,
                    column: COLUMNS[col].to_string(),
                    value: field.to_string(),
                })?;
            }
            rows.push(ReducedRow::from(v));
        }
        debug!("{} rows read", rows.len());
        Ok(SoilTable { rows })
    }

    /// Pretty-print the table.
    ///
    pub fn render(&self) -> String {
        let mut header = vec![""];
        header.extend(COLUMNS);

        let mut builder = Builder::default();
        builder.push_record(header);

        self.rows.iter().enumerate().for_each(|(i, r)| {
            let mut row = vec![format!("{i}")];
            row.extend(r.values().iter().map(|v| cell(*v)));
            builder.push_record(row);
        });

        builder.build().with(Style::modern()).to_string()
    }
}

impl FromIterator<ReducedRow> for SoilTable {
    fn from_iter<T: IntoIterator<Item = ReducedRow>>(iter: T) -> Self {
        SoilTable {
            rows: iter.into_iter().collect(),
        }
    }
}

#[inline]
fn cell(v: Option<f64>) -> String {
    v.map_or(NA.to_string(), |v| v.to_string())
}

/// `Some(None)` for an absent value, `None` for garbage, `NaN` and infinities included.
///
fn parse_cell(s: &str) -> Option<Option<f64>> {
    if s.is_empty() || s == NA {
        return Some(None);
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite()).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs;

    fn soil_data() -> Vec<PointRecord> {
        let s = fs::read_to_string("testdata/soil_data.json").unwrap();
        serde_json::from_str(&s).unwrap()
    }

    #[test_pretty_log::test]
    fn test_create_soil_table() {
        let t = SoilTable::from_records(&soil_data());

        assert_eq!((5, 4), t.shape());
        assert_eq!(["clay", "sand", "silt", "ocs"], t.columns());
        assert_eq!(
            [Some(86.), Some(787.), Some(134.), Some(63.)],
            t.row(0).unwrap().values()
        );
        assert_eq!(
            [Some(75.), Some(833.), Some(120.), Some(66.)],
            t.row(1).unwrap().values()
        );
        assert_eq!(
            [Some(87.), Some(840.), Some(96.), Some(61.)],
            t.row(2).unwrap().values()
        );
    }

    #[test]
    fn test_soil_table_empty() {
        let t = SoilTable::from_records(&[]);
        assert_eq!((0, 4), t.shape());
        assert!(t.is_empty());
    }

    #[test]
    fn test_soil_table_column() {
        let t = SoilTable::from_records(&soil_data());
        assert_eq!(
            vec![Some(63.), Some(66.), Some(61.), Some(70.), Some(74.)],
            t.column(Property::Ocs)
        );
    }

    #[test]
    fn test_write_csv_with_absent() {
        let t: SoilTable = vec![
            ReducedRow::from([Some(86.), Some(787.), Some(134.), Some(63.)]),
            ReducedRow::from([Some(75.), None, Some(120.5), None]),
        ]
        .into_iter()
        .collect();

        let mut out = vec![];
        t.write_csv(&mut out).unwrap();
        let s = String::from_utf8(out).unwrap();
        assert_eq!("clay,sand,silt,ocs\n86,787,134,63\n75,NA,120.5,NA\n", s);
    }

    #[test]
    fn test_read_csv_fixture() {
        let fh = fs::File::open("testdata/soil_data.csv").unwrap();
        let t = SoilTable::read_csv(fh).unwrap();

        assert_eq!(SoilTable::from_records(&soil_data()), t);
    }

    #[test]
    fn test_read_csv_index_and_empty() {
        let data = ",ocs,clay,silt,sand\n0,63,86,,787\n1,NA,75,120,833\n";
        let t = SoilTable::read_csv(data.as_bytes()).unwrap();

        assert_eq!(
            [Some(86.), Some(787.), None, Some(63.)],
            t.row(0).unwrap().values()
        );
        assert_eq!(None, t.row(1).unwrap().ocs);
    }

    #[test]
    fn test_read_csv_missing_column() {
        let data = "clay,sand,silt\n1,2,3\n";
        let t = SoilTable::read_csv(data.as_bytes());
        assert!(matches!(t, Err(TableError::MissingColumn(c)) if c == "ocs"));
    }

    #[test]
    fn test_read_csv_bad_value() {
        let data = "clay,sand,silt,ocs\n1,2,x,4\n";
        let t = SoilTable::read_csv(data.as_bytes());
        assert!(matches!(t, Err(TableError::BadValue { row: 0, .. })));
    }

    #[rstest]
    #[case("NaN")]
    #[case("nan")]
    #[case("inf")]
    #[case("-infinity")]
    fn test_read_csv_not_finite(#[case] bad: &str) {
        let data = format!("clay,sand,silt,ocs\n1,2,3,4\n5,{bad},7,8\n");
        let t = SoilTable::read_csv(data.as_bytes());
        assert!(matches!(
            t,
            Err(TableError::BadValue { row: 1, ref column, ref value }) if column == "sand" && value == bad
        ));
    }

    #[test]
    fn test_render() {
        let t: SoilTable = vec![ReducedRow::from([Some(86.), None, Some(134.), Some(63.)])]
            .into_iter()
            .collect();
        let s = t.render();
        assert!(s.contains("clay"));
        assert!(s.contains("NA"));
        assert!(s.contains("134"));
    }
}
