use gauge_dataframe::load::ParseError;
use gauge_report::RenderError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
	#[error("{0}")]
	Parse(#[from] ParseError),
	/// The dataset does not exist or belongs to another owner. The two cases
	/// are deliberately not distinguished.
	#[error("dataset not found")]
	NotFoundOrForbidden,
	#[error("{0}")]
	Render(#[from] RenderError),
	#[error("{0}")]
	Database(#[from] sqlx::Error),
	#[error("{0}")]
	Other(#[from] anyhow::Error),
}
