use anyhow::Result;
use sqlx::SqlitePool;
use std::collections::BTreeMap;

fn migrations() -> BTreeMap<&'static str, &'static str> {
	let mut migrations: BTreeMap<&str, &str> = BTreeMap::new();
	migrations.insert(
		"2026-08-01-000000-init.sql",
		include_str!("./migrations/2026-08-01-000000-init.sql"),
	);
	migrations
}

pub async fn run(pool: &SqlitePool) -> Result<()> {
	let migrations = migrations();

	// create the _migrations table if necessary
	sqlx::query("create table if not exists _migrations ( name text primary key )")
		.execute(pool)
		.await?;

	// apply each migration in a transaction if it has not been applied already
	for (name, sql) in migrations.iter() {
		let mut db = pool.begin().await?;
		let migration_has_run: bool =
			sqlx::query_scalar("select count(*) > 0 from _migrations where name = ?1")
				.bind(name)
				.fetch_one(&mut *db)
				.await?;
		if !migration_has_run {
			sqlx::raw_sql(sql).execute(&mut *db).await?;
			sqlx::query("insert into _migrations (name) values (?1)")
				.bind(name)
				.execute(&mut *db)
				.await?;
		}
		db.commit().await?;
	}

	Ok(())
}
