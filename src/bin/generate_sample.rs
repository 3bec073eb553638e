//! Writes a synthetic, denormalised TV show table for trying the explorer.
//!
//! Each show gets one to three genres, one or two networks and one or two
//! spoken languages; the output has one row per combination, like the
//! Kaggle export the dashboard was built around.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use clap::Parser;
use parquet::arrow::ArrowWriter;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;

const GENRES: [&str; 10] = [
    "Drama", "Comedy", "Crime", "Documentary", "Animation", "Mystery", "Reality",
    "Sci-Fi & Fantasy", "Action & Adventure", "Family",
];
const STATUSES: [&str; 4] = ["Ended", "Returning Series", "Canceled", "In Production"];
const NETWORKS: [&str; 8] = [
    "Netflix", "HBO", "BBC One", "ABC", "NBC", "Amazon", "Hulu", "Disney+",
];
const LANGUAGES: [&str; 7] = [
    "English", "Spanish", "Japanese", "Korean", "German", "French", "No Language",
];
const WORDS: [&str; 16] = [
    "Dark", "House", "Lost", "City", "Night", "Crown", "Stranger", "Blue", "Broken", "Wild",
    "Silent", "Empire", "Signal", "Garden", "Iron", "Mirror",
];

/// Generate sample data for tv-show-explorer
#[derive(Parser, Debug)]
struct Args {
    /// Number of distinct shows
    #[arg(long, default_value_t = 400)]
    shows: usize,

    /// CSV output path
    #[arg(long, default_value = "data/df.csv")]
    out: PathBuf,

    /// Also write a Parquet copy next to the CSV
    #[arg(long)]
    parquet: bool,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

#[derive(Debug, Clone, Serialize)]
struct Row {
    show_id: i64,
    name: String,
    genre_name: &'static str,
    status_name: &'static str,
    network_name: &'static str,
    spoken_language_name: &'static str,
    number_of_seasons: i64,
    vote_average: f64,
    vote_count: i64,
    popularity: f64,
}

fn pick_some(rng: &mut StdRng, pool: &[&'static str], max: usize) -> Vec<&'static str> {
    let n = rng.random_range(1..=max);
    pool.choose_multiple(rng, n).copied().collect()
}

fn generate(rng: &mut StdRng, shows: usize) -> Vec<Row> {
    let mut rows = Vec::new();

    for id in 1..=shows as i64 {
        let name = format!(
            "{} {}",
            WORDS.choose(rng).copied().unwrap_or("Untitled"),
            WORDS.choose(rng).copied().unwrap_or("Show")
        );
        let status = STATUSES.choose(rng).copied().unwrap_or("Ended");
        let seasons = rng.random_range(1..=12);

        // About one show in eight has no ratings yet.
        let (vote_average, vote_count) = if rng.random_bool(0.125) {
            (0.0, 0)
        } else {
            let centred: f64 = (0..4).map(|_| rng.random_range(0.0..1.0)).sum::<f64>() / 4.0;
            let rating = (4.0 + centred * 5.5 * 10.0).round() / 10.0;
            (rating.min(10.0), rng.random_range(1..5000))
        };
        let popularity = (rng.random_range(0.5_f64..6.0).exp() * 100.0).round() / 100.0;

        let genres = pick_some(rng, &GENRES, 3);
        let networks = pick_some(rng, &NETWORKS, 2);
        let languages = pick_some(rng, &LANGUAGES, 2);

        for &genre in &genres {
            for &network in &networks {
                for &language in &languages {
                    rows.push(Row {
                        show_id: id,
                        name: name.clone(),
                        genre_name: genre,
                        status_name: status,
                        network_name: network,
                        spoken_language_name: language,
                        number_of_seasons: seasons,
                        vote_average,
                        vote_count,
                        popularity,
                    });
                }
            }
        }
    }
    rows
}

fn write_csv(path: &Path, rows: &[Row]) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    for row in rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(path: &Path, rows: &[Row]) -> Result<()> {
    let text = |f: fn(&Row) -> &str| StringArray::from(rows.iter().map(f).collect::<Vec<_>>());

    let schema = Arc::new(Schema::new(vec![
        Field::new("show_id", DataType::Int64, false),
        Field::new("name", DataType::Utf8, false),
        Field::new("genre_name", DataType::Utf8, false),
        Field::new("status_name", DataType::Utf8, false),
        Field::new("network_name", DataType::Utf8, false),
        Field::new("spoken_language_name", DataType::Utf8, true),
        Field::new("number_of_seasons", DataType::Int64, false),
        Field::new("vote_average", DataType::Float64, false),
        Field::new("vote_count", DataType::Int64, false),
        Field::new("popularity", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.show_id))),
            Arc::new(text(|r| r.name.as_str())),
            Arc::new(text(|r| r.genre_name)),
            Arc::new(text(|r| r.status_name)),
            Arc::new(text(|r| r.network_name)),
            Arc::new(text(|r| r.spoken_language_name)),
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.number_of_seasons))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.vote_average))),
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.vote_count))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.popularity))),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = StdRng::seed_from_u64(args.seed);
    let rows = generate(&mut rng, args.shows);

    write_csv(&args.out, &rows)?;
    println!("Wrote {} rows for {} shows to {}", rows.len(), args.shows, args.out.display());

    if args.parquet {
        let path = args.out.with_extension("parquet");
        write_parquet(&path, &rows)?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}
