/*!
This crate persists dataset records and enforces the per-owner retention
policy: an owner holds at most [`HISTORY_LIMIT`] datasets, the oldest beyond
that are evicted when a new one is inserted. All reads and deletes are
ownership-checked, and an absent record is indistinguishable from someone
else's record.
*/

use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use gauge_util::id::Id;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;

pub mod migrations;

/// The number of datasets retained per owner.
pub const HISTORY_LIMIT: i64 = 5;

/// One persisted dataset. The summary is carried as an opaque json document;
/// interpreting its shape belongs to the summary and report layers.
#[derive(Clone, Debug)]
pub struct DatasetRecord {
	pub id: Id,
	pub owner_id: Id,
	pub filename: String,
	pub uploaded_at: DateTime<Utc>,
	pub summary: serde_json::Value,
}

/// The listing view of a dataset: everything except the summary document.
#[derive(Clone, Debug, serde::Serialize)]
pub struct DatasetMeta {
	pub id: Id,
	pub filename: String,
	pub uploaded_at: DateTime<Utc>,
}

/// Open a pool for the given database url and apply migrations.
pub async fn connect(database_url: &str) -> Result<SqlitePool> {
	let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
	let pool = SqlitePoolOptions::new().connect_with(options).await?;
	migrations::run(&pool).await?;
	Ok(pool)
}

// Timestamps are stored as fixed-width rfc 3339 text so that lexicographic
// order is chronological order.
fn encode_uploaded_at(uploaded_at: &DateTime<Utc>) -> String {
	uploaded_at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn decode_uploaded_at(uploaded_at: &str) -> Result<DateTime<Utc>> {
	Ok(DateTime::parse_from_rfc3339(uploaded_at)?.with_timezone(&Utc))
}

/// Insert a dataset and evict this owner's oldest records beyond
/// [`HISTORY_LIMIT`]. Running both statements in the caller's transaction
/// serializes concurrent insert bursts against the cap.
pub async fn insert_dataset(
	db: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
	record: &DatasetRecord,
) -> Result<()> {
	sqlx::query(
		"
			insert into datasets
				(id, owner_id, filename, uploaded_at, summary)
			values
				(?1, ?2, ?3, ?4, ?5)
		",
	)
	.bind(record.id.to_string())
	.bind(record.owner_id.to_string())
	.bind(&record.filename)
	.bind(encode_uploaded_at(&record.uploaded_at))
	.bind(serde_json::to_string(&record.summary)?)
	.execute(&mut **db)
	.await?;
	let evicted = sqlx::query(
		"
			delete from datasets
			where
				owner_id = ?1 and
				id in (
					select id from datasets
					where owner_id = ?1
					order by uploaded_at desc, rowid desc
					limit -1 offset ?2
				)
		",
	)
	.bind(record.owner_id.to_string())
	.bind(HISTORY_LIMIT)
	.execute(&mut **db)
	.await?;
	if evicted.rows_affected() > 0 {
		tracing::info!(
			owner_id = %record.owner_id,
			evicted = evicted.rows_affected(),
			"evicted datasets beyond the retention limit",
		);
	}
	Ok(())
}

/// List an owner's datasets, newest first, at most [`HISTORY_LIMIT`].
pub async fn list_recent(
	db: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
	owner_id: Id,
) -> Result<Vec<DatasetMeta>> {
	let rows = sqlx::query(
		"
			select
				id, filename, uploaded_at
			from datasets
			where owner_id = ?1
			order by uploaded_at desc, rowid desc
			limit ?2
		",
	)
	.bind(owner_id.to_string())
	.bind(HISTORY_LIMIT)
	.fetch_all(&mut **db)
	.await?;
	rows.iter()
		.map(|row| {
			let id: String = row.get(0);
			let filename: String = row.get(1);
			let uploaded_at: String = row.get(2);
			Ok(DatasetMeta {
				id: id.parse()?,
				filename,
				uploaded_at: decode_uploaded_at(&uploaded_at)?,
			})
		})
		.collect()
}

/// Fetch one dataset, checking ownership. Returns `None` when the record is
/// absent or owned by someone else; callers cannot tell the two apart.
pub async fn get_dataset(
	db: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
	dataset_id: Id,
	owner_id: Id,
) -> Result<Option<DatasetRecord>> {
	let row = sqlx::query(
		"
			select
				id, owner_id, filename, uploaded_at, summary
			from datasets
			where
				id = ?1 and
				owner_id = ?2
		",
	)
	.bind(dataset_id.to_string())
	.bind(owner_id.to_string())
	.fetch_optional(&mut **db)
	.await?;
	let row = match row {
		Some(row) => row,
		None => return Ok(None),
	};
	let id: String = row.get(0);
	let record_owner_id: String = row.get(1);
	let filename: String = row.get(2);
	let uploaded_at: String = row.get(3);
	let summary: String = row.get(4);
	Ok(Some(DatasetRecord {
		id: id.parse()?,
		owner_id: record_owner_id.parse()?,
		filename,
		uploaded_at: decode_uploaded_at(&uploaded_at)?,
		summary: serde_json::from_str(&summary)?,
	}))
}

/// Delete one dataset, checking ownership. Returns whether a record was
/// deleted; `false` covers both absent and foreign records.
pub async fn delete_dataset(
	db: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
	dataset_id: Id,
	owner_id: Id,
) -> Result<bool> {
	let result = sqlx::query(
		"
			delete from datasets
			where
				id = ?1 and
				owner_id = ?2
		",
	)
	.bind(dataset_id.to_string())
	.bind(owner_id.to_string())
	.execute(&mut **db)
	.await?;
	Ok(result.rows_affected() > 0)
}
