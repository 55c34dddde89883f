use super::*;
use std::io::Cursor;
use thiserror::Error;

/// These values are the spellings of a missing cell.
const MISSING_VALUES: &[&str] = &[
	"", "null", "NULL", "n/a", "N/A", "nan", "-nan", "NaN", "-NaN", "?",
];

#[derive(Debug, Error)]
pub enum ParseError {
	#[error("dataset has no header row")]
	MissingHeader,
	#[error("{0}")]
	Csv(#[from] csv::Error),
}

impl Table {
	/// Parse raw csv bytes into a table, inferring each column's type. Two
	/// passes are made over the input: the first accumulates infer stats for
	/// every column, the second fills the typed columns.
	pub fn from_csv(bytes: &[u8]) -> Result<Self, ParseError> {
		let mut reader = csv::Reader::from_reader(Cursor::new(bytes));
		let column_names: Vec<String> = reader
			.headers()?
			.into_iter()
			.map(|column_name| column_name.to_owned())
			.collect();
		if column_names.is_empty() {
			return Err(ParseError::MissingHeader);
		}
		let n_columns = column_names.len();
		let start_position = reader.position().clone();
		// Pass over the csv and update the infer stats for every column.
		let mut infer_stats = vec![InferStats::new(); n_columns];
		let mut record = csv::StringRecord::new();
		let mut n_rows = 0;
		while reader.read_record(&mut record)? {
			n_rows += 1;
			for (index, infer_stats) in infer_stats.iter_mut().enumerate() {
				let value = record.get(index).unwrap_or("");
				infer_stats.update(value);
			}
		}
		let column_types: Vec<ColumnType> = infer_stats
			.into_iter()
			.map(|infer_stats| infer_stats.finalize())
			.collect();
		// After inference, return to the beginning of the csv to load the values.
		reader.seek(start_position)?;
		let mut table = Self::new(column_names, column_types);
		for column in table.columns.iter_mut() {
			match column {
				Column::Number(column) => column.data.reserve_exact(n_rows),
				Column::Text(column) => column.data.reserve_exact(n_rows),
			}
		}
		let mut record = csv::StringRecord::new();
		while reader.read_record(&mut record)? {
			for (column, value) in table.columns.iter_mut().zip(record.iter()) {
				match column {
					Column::Number(column) => {
						let value = if MISSING_VALUES.contains(&value) {
							None
						} else {
							match lexical::parse::<f64, _>(value) {
								Ok(value) if value.is_finite() => Some(value),
								_ => None,
							}
						};
						column.data.push(value);
					}
					Column::Text(column) => {
						let value = if MISSING_VALUES.contains(&value) {
							None
						} else {
							Some(value.to_owned())
						};
						column.data.push(value);
					}
				}
			}
		}
		Ok(table)
	}
}

#[derive(Clone, Debug)]
struct InferStats {
	column_type: InferColumnType,
}

#[derive(PartialEq, Clone, Copy, Debug)]
enum InferColumnType {
	Unknown,
	Number,
	Text,
}

impl InferStats {
	fn new() -> Self {
		Self {
			column_type: InferColumnType::Unknown,
		}
	}

	fn update(&mut self, value: &str) {
		if MISSING_VALUES.contains(&value) {
			return;
		}
		match self.column_type {
			InferColumnType::Unknown | InferColumnType::Number => {
				if lexical::parse::<f64, _>(value)
					.map(|v: f64| v.is_finite())
					.unwrap_or(false)
				{
					self.column_type = InferColumnType::Number;
				} else {
					self.column_type = InferColumnType::Text;
				}
			}
			InferColumnType::Text => {}
		}
	}

	fn finalize(self) -> ColumnType {
		match self.column_type {
			// A column with no values at all is numeric, matching the
			// all-missing-column-is-a-float-column convention.
			InferColumnType::Unknown => ColumnType::Number,
			InferColumnType::Number => ColumnType::Number,
			InferColumnType::Text => ColumnType::Text,
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_infer() {
		let csv = b"Type,Flowrate,Note\nA,10,hello\nB,20.5,world\n";
		let table = Table::from_csv(csv).unwrap();
		insta::assert_debug_snapshot!(table, @r###"
  Table {
      columns: [
          Text(
              TextColumn {
                  name: "Type",
                  data: [
                      Some(
                          "A",
                      ),
                      Some(
                          "B",
                      ),
                  ],
              },
          ),
          Number(
              NumberColumn {
                  name: "Flowrate",
                  data: [
                      Some(
                          10.0,
                      ),
                      Some(
                          20.5,
                      ),
                  ],
              },
          ),
          Text(
              TextColumn {
                  name: "Note",
                  data: [
                      Some(
                          "hello",
                      ),
                      Some(
                          "world",
                      ),
                  ],
              },
          ),
      ],
  }
  "###);
	}

	#[test]
	fn test_missing_values() {
		let csv = b"Type,Pressure\nA,1.5\nB,\nC,n/a\n";
		let table = Table::from_csv(csv).unwrap();
		assert_eq!(table.nrows(), 3);
		let pressure = table.columns[1].as_number().unwrap();
		assert_eq!(pressure.data, vec![Some(1.5), None, None]);
	}

	#[test]
	fn test_all_missing_column_is_numeric() {
		let csv = b"Type,Empty\nA,\nB,\n";
		let table = Table::from_csv(csv).unwrap();
		assert_eq!(table.columns[1].column_type(), ColumnType::Number);
		assert_eq!(table.columns[1].as_number().unwrap().present().count(), 0);
	}

	#[test]
	fn test_header_only() {
		let csv = b"Type,Flowrate\n";
		let table = Table::from_csv(csv).unwrap();
		assert_eq!(table.ncols(), 2);
		assert_eq!(table.nrows(), 0);
	}

	#[test]
	fn test_empty_input() {
		let table = Table::from_csv(b"");
		assert!(matches!(table, Err(ParseError::MissingHeader)));
	}

	#[test]
	fn test_inconsistent_field_count() {
		let csv = b"Type,Flowrate\nA,10\nB\n";
		let table = Table::from_csv(csv);
		assert!(matches!(table, Err(ParseError::Csv(_))));
	}

	#[test]
	fn test_mixed_column_is_text() {
		let csv = b"Type,Code\nA,10\nB,x9\n";
		let table = Table::from_csv(csv).unwrap();
		assert_eq!(table.columns[1].column_type(), ColumnType::Text);
	}
}
