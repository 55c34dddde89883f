/*!
This crate provides a basic implementation of column-oriented tables, where each
column is either numeric or categorical. Types are inferred once when a table is
loaded from csv bytes and never re-inferred downstream. Missing cells are
represented explicitly as `None`.
*/

pub mod load;

pub use self::load::*;

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
	pub columns: Vec<Column>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Column {
	Number(NumberColumn),
	Text(TextColumn),
}

#[derive(Debug, Clone, PartialEq)]
pub struct NumberColumn {
	pub name: String,
	pub data: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextColumn {
	pub name: String,
	pub data: Vec<Option<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnType {
	Number,
	Text,
}

/// A single cell of a table.
#[derive(Clone, Debug, PartialEq)]
pub enum Value<'a> {
	Missing,
	Number(f64),
	Text(&'a str),
}

impl Table {
	pub fn new(column_names: Vec<String>, column_types: Vec<ColumnType>) -> Self {
		let columns = column_names
			.into_iter()
			.zip(column_types.into_iter())
			.map(|(column_name, column_type)| match column_type {
				ColumnType::Number => Column::Number(NumberColumn::new(column_name)),
				ColumnType::Text => Column::Text(TextColumn::new(column_name)),
			})
			.collect();
		Self { columns }
	}

	pub fn ncols(&self) -> usize {
		self.columns.len()
	}

	pub fn nrows(&self) -> usize {
		self.columns.first().map(|column| column.len()).unwrap_or(0)
	}

	pub fn column_names(&self) -> Vec<String> {
		self.columns
			.iter()
			.map(|column| column.name().to_owned())
			.collect()
	}
}

impl Column {
	pub fn len(&self) -> usize {
		match self {
			Self::Number(s) => s.data.len(),
			Self::Text(s) => s.data.len(),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn name(&self) -> &str {
		match self {
			Self::Number(s) => s.name.as_str(),
			Self::Text(s) => s.name.as_str(),
		}
	}

	pub fn column_type(&self) -> ColumnType {
		match self {
			Self::Number(_) => ColumnType::Number,
			Self::Text(_) => ColumnType::Text,
		}
	}

	pub fn as_number(&self) -> Option<&NumberColumn> {
		match self {
			Self::Number(s) => Some(s),
			_ => None,
		}
	}

	pub fn as_text(&self) -> Option<&TextColumn> {
		match self {
			Self::Text(s) => Some(s),
			_ => None,
		}
	}

	pub fn get(&self, index: usize) -> Value {
		match self {
			Self::Number(column) => match column.data[index] {
				Some(value) => Value::Number(value),
				None => Value::Missing,
			},
			Self::Text(column) => match &column.data[index] {
				Some(value) => Value::Text(value),
				None => Value::Missing,
			},
		}
	}
}

impl NumberColumn {
	pub fn new(name: String) -> Self {
		Self {
			name,
			data: Vec::new(),
		}
	}

	/// Iterate over the non-missing values of this column.
	pub fn present(&self) -> impl Iterator<Item = f64> + '_ {
		self.data.iter().filter_map(|value| *value)
	}
}

impl TextColumn {
	pub fn new(name: String) -> Self {
		Self {
			name,
			data: Vec::new(),
		}
	}
}

impl<'a> Value<'a> {
	pub fn is_missing(&self) -> bool {
		matches!(self, Value::Missing)
	}

	pub fn as_number(&self) -> Option<f64> {
		match self {
			Self::Number(s) => Some(*s),
			_ => None,
		}
	}

	pub fn as_text(&self) -> Option<&str> {
		match self {
			Self::Text(s) => Some(s),
			_ => None,
		}
	}
}
