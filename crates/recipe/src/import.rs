//! Bulk loading of reference data from header-less CSV.
//!
//! Ingredients are `name,measurement_unit` rows, tags are `name,slug` rows.
//! Rows that already exist are skipped, so imports can be re-run.

use std::io::Read;

use foodgram_db::table::{Ingredient, Tag};
use sea_query::{OnConflict, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::SqlitePool;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    pub inserted: u64,
    pub skipped: u64,
}

fn records<R: Read>(reader: R) -> foodgram_shared::Result<Vec<(String, String)>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = vec![];
    for (line, record) in reader.deserialize::<(String, String)>().enumerate() {
        let (first, second) =
            record.map_err(|e| anyhow::anyhow!("invalid row {}: {e}", line + 1))?;

        if first.is_empty() || second.is_empty() {
            foodgram_shared::user!("row {} has an empty column", line + 1);
        }

        rows.push((first, second));
    }

    Ok(rows)
}

pub async fn ingredients<R: Read>(
    pool: &SqlitePool,
    reader: R,
) -> foodgram_shared::Result<ImportReport> {
    let mut report = ImportReport::default();

    for (name, unit) in records(reader)? {
        let statement = Query::insert()
            .into_table(Ingredient::Table)
            .columns([Ingredient::Name, Ingredient::MeasurementUnit])
            .values_panic([name.into(), unit.into()])
            .on_conflict(
                OnConflict::columns([Ingredient::Name, Ingredient::MeasurementUnit])
                    .do_nothing()
                    .to_owned(),
            )
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        if sqlx::query_with(&sql, values).execute(pool).await?.rows_affected() > 0 {
            report.inserted += 1;
        } else {
            report.skipped += 1;
        }
    }

    tracing::info!(
        inserted = report.inserted,
        skipped = report.skipped,
        "ingredients imported"
    );

    Ok(report)
}

pub async fn tags<R: Read>(pool: &SqlitePool, reader: R) -> foodgram_shared::Result<ImportReport> {
    let mut report = ImportReport::default();

    for (name, slug) in records(reader)? {
        let statement = Query::insert()
            .into_table(Tag::Table)
            .columns([Tag::Name, Tag::Slug])
            .values_panic([name.into(), slug.into()])
            .on_conflict(OnConflict::column(Tag::Slug).do_nothing().to_owned())
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        if sqlx::query_with(&sql, values).execute(pool).await?.rows_affected() > 0 {
            report.inserted += 1;
        } else {
            report.skipped += 1;
        }
    }

    tracing::info!(
        inserted = report.inserted,
        skipped = report.skipped,
        "tags imported"
    );

    Ok(report)
}
