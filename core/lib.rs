/*!
This crate ties the pipeline together: parse an uploaded csv, compute its
summary document, persist it with the owner's history, and later list,
delete, or render a report for a stored dataset. Every operation runs in a
single database transaction.
*/

use chrono::{DateTime, Utc};
use gauge_dataframe::Table;
use gauge_report::RenderError;
use gauge_stats::{Summary, SummarySettings};
use gauge_store::{DatasetMeta, DatasetRecord};
use gauge_util::id::Id;
use sqlx::SqlitePool;

pub mod error;

pub use self::error::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// One ingested dataset with its decoded summary document.
#[derive(Clone, Debug)]
pub struct Dataset {
	pub id: Id,
	pub filename: String,
	pub uploaded_at: DateTime<Utc>,
	pub summary: Summary,
}

/// Parse the uploaded bytes, compute the summary, and persist the dataset,
/// evicting this owner's oldest datasets beyond the retention limit. The
/// original bytes are not stored; the summary document is all that later
/// operations read.
pub async fn ingest_and_summarize(
	pool: &SqlitePool,
	owner_id: Id,
	filename: &str,
	bytes: &[u8],
	settings: &SummarySettings,
) -> Result<Dataset> {
	let table = Table::from_csv(bytes)?;
	let summary = Summary::compute(&table, settings);
	let record = DatasetRecord {
		id: Id::new(),
		owner_id,
		filename: filename.to_owned(),
		uploaded_at: Utc::now(),
		summary: serde_json::to_value(&summary).map_err(anyhow::Error::from)?,
	};
	let mut db = pool.begin().await?;
	gauge_store::insert_dataset(&mut db, &record).await?;
	db.commit().await?;
	tracing::info!(
		dataset_id = %record.id,
		owner_id = %owner_id,
		rows = summary.rows,
		columns = summary.columns.len(),
		"ingested dataset",
	);
	Ok(Dataset {
		id: record.id,
		filename: record.filename,
		uploaded_at: record.uploaded_at,
		summary,
	})
}

/// List the owner's stored datasets, newest first.
pub async fn list_recent(pool: &SqlitePool, owner_id: Id) -> Result<Vec<DatasetMeta>> {
	let mut db = pool.begin().await?;
	let datasets = gauge_store::list_recent(&mut db, owner_id).await?;
	db.commit().await?;
	Ok(datasets)
}

/// Delete one of the owner's datasets.
pub async fn delete(pool: &SqlitePool, dataset_id: Id, owner_id: Id) -> Result<()> {
	let mut db = pool.begin().await?;
	let deleted = gauge_store::delete_dataset(&mut db, dataset_id, owner_id).await?;
	db.commit().await?;
	if !deleted {
		return Err(Error::NotFoundOrForbidden);
	}
	tracing::info!(dataset_id = %dataset_id, owner_id = %owner_id, "deleted dataset");
	Ok(())
}

/// Render the report for a stored dataset from its summary document alone.
/// The output depends only on the stored record, so regeneration is
/// deterministic.
pub async fn render_report(pool: &SqlitePool, dataset_id: Id, owner_id: Id) -> Result<Vec<u8>> {
	let mut db = pool.begin().await?;
	let record = gauge_store::get_dataset(&mut db, dataset_id, owner_id)
		.await?
		.ok_or(Error::NotFoundOrForbidden)?;
	db.commit().await?;
	let summary: Summary = serde_json::from_value(record.summary)
		.map_err(|error| RenderError::MalformedSummary(error.to_string()))?;
	let html = gauge_report::render(&record.filename, &record.uploaded_at, &summary)?;
	tracing::info!(
		dataset_id = %dataset_id,
		owner_id = %owner_id,
		bytes = html.len(),
		"rendered report",
	);
	Ok(html)
}

#[cfg(test)]
mod test {
	use super::*;
	use sqlx::sqlite::SqlitePoolOptions;

	const CSV: &[u8] = b"Type,Flowrate\nPump,10\nValve,20\nPump,30\n";

	async fn test_pool() -> SqlitePool {
		let pool = SqlitePoolOptions::new()
			.max_connections(1)
			.connect("sqlite::memory:")
			.await
			.unwrap();
		gauge_store::migrations::run(&pool).await.unwrap();
		pool
	}

	#[tokio::test]
	async fn test_ingest_and_summarize() {
		let pool = test_pool().await;
		let owner_id = Id::new();
		let settings = SummarySettings::default();
		let dataset = ingest_and_summarize(&pool, owner_id, "pumps.csv", CSV, &settings)
			.await
			.unwrap();
		assert_eq!(dataset.summary.rows, 3);
		assert_eq!(dataset.summary.distribution.get("Pump"), Some(&2));
		assert_eq!(dataset.summary.distribution.get("Valve"), Some(&1));
		assert_eq!(dataset.summary.stats.get("Flowrate").unwrap().mean, 20.0);
		let recent = list_recent(&pool, owner_id).await.unwrap();
		assert_eq!(recent.len(), 1);
		assert_eq!(recent[0].filename, "pumps.csv");
	}

	#[tokio::test]
	async fn test_ingest_header_only() {
		let pool = test_pool().await;
		let owner_id = Id::new();
		let settings = SummarySettings::default();
		let dataset =
			ingest_and_summarize(&pool, owner_id, "empty.csv", b"Type,Flowrate\n", &settings)
				.await
				.unwrap();
		assert_eq!(dataset.summary.rows, 0);
		assert!(dataset.summary.distribution.is_empty());
	}

	#[tokio::test]
	async fn test_ingest_rejects_empty_input() {
		let pool = test_pool().await;
		let owner_id = Id::new();
		let settings = SummarySettings::default();
		let result = ingest_and_summarize(&pool, owner_id, "empty.csv", b"", &settings).await;
		assert!(matches!(result, Err(Error::Parse(_))));
		assert!(list_recent(&pool, owner_id).await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn test_history_is_capped() {
		let pool = test_pool().await;
		let owner_id = Id::new();
		let settings = SummarySettings::default();
		for i in 0..6 {
			ingest_and_summarize(&pool, owner_id, &format!("{}.csv", i), CSV, &settings)
				.await
				.unwrap();
		}
		let recent = list_recent(&pool, owner_id).await.unwrap();
		assert_eq!(recent.len(), 5);
	}

	#[tokio::test]
	async fn test_delete_foreign_dataset() {
		let pool = test_pool().await;
		let owner_id = Id::new();
		let settings = SummarySettings::default();
		let dataset = ingest_and_summarize(&pool, owner_id, "pumps.csv", CSV, &settings)
			.await
			.unwrap();
		let result = delete(&pool, dataset.id, Id::new()).await;
		assert!(matches!(result, Err(Error::NotFoundOrForbidden)));
		// The record survives a foreign delete attempt.
		assert_eq!(list_recent(&pool, owner_id).await.unwrap().len(), 1);
		delete(&pool, dataset.id, owner_id).await.unwrap();
		assert!(list_recent(&pool, owner_id).await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn test_render_report_from_stored_summary() {
		let pool = test_pool().await;
		let owner_id = Id::new();
		let settings = SummarySettings::default();
		let dataset = ingest_and_summarize(&pool, owner_id, "pumps.csv", CSV, &settings)
			.await
			.unwrap();
		let html = render_report(&pool, dataset.id, owner_id).await.unwrap();
		let html = String::from_utf8(html).unwrap();
		assert!(html.contains("Report for: pumps.csv"));
		assert!(html.contains("<td>20.00</td>"));
		// Regeneration is deterministic.
		let again = render_report(&pool, dataset.id, owner_id).await.unwrap();
		assert_eq!(String::from_utf8(again).unwrap(), html);
	}

	#[tokio::test]
	async fn test_render_report_foreign_dataset() {
		let pool = test_pool().await;
		let owner_id = Id::new();
		let settings = SummarySettings::default();
		let dataset = ingest_and_summarize(&pool, owner_id, "pumps.csv", CSV, &settings)
			.await
			.unwrap();
		let result = render_report(&pool, dataset.id, Id::new()).await;
		assert!(matches!(result, Err(Error::NotFoundOrForbidden)));
	}
}
