//! Import command implementation

use crate::archive::{recycle_moves, ArchivePlan};
use crate::catalog::{insert_episode, CatalogDb};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::normalize;
use crate::probe::Prober;
use crate::reconcile::{resolve_series, SeriesAllocator};
use crate::walk;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use tracing::info;

/// Statistics from an import run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportStats {
    pub episodes_imported: usize,
    pub series_created: usize,
    pub series_reused: usize,
    pub sidecars_archived: usize,
    /// Statements and file moves a dry run would have performed
    pub planned_actions: Vec<String>,
}

/// Import options
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Plan and print the work without touching the catalog or the library
    pub dry_run: bool,
    /// Print each video file while processing
    pub verbose: bool,
}

/// Execute import command - fold every sidecar pair in the library into the catalog
pub async fn cmd_import(config: &Config, root: &Path, options: ImportOptions) -> Result<ImportStats> {
    info!(root = %root.display(), dry_run = options.dry_run, "Starting library import");

    let db_path = root.join(&config.library.database_name);
    let db = if options.dry_run {
        // A dry run must not create the catalog as a side effect.
        if !db_path.exists() {
            return Err(Error::InvalidPath(format!(
                "catalog database not found: {}",
                db_path.display()
            )));
        }
        CatalogDb::open_read_only(&db_path).await?
    } else {
        CatalogDb::open(&db_path).await?
    };

    let mut allocator = SeriesAllocator::load(&db).await?;
    let prober = Prober::new(&config.probe)?;

    let triples = walk::discover(root)?;
    info!(count = triples.len(), "Discovered importable recordings");

    let mut stats = ImportStats::default();

    for triple in &triples {
        if options.verbose {
            println!("{}", triple.video.display());
        }

        let episode_doc = read_sidecar(&triple.episode_sidecar)?;
        let storage_doc = read_sidecar(&triple.storage_sidecar)?;

        let play_url = normalize::play_url(&episode_doc)?;
        let delete_reason = prober.classify(&play_url).await?;

        let record =
            normalize::episode_record(&storage_doc, &episode_doc, &triple.video, delete_reason)?;
        let resolution = resolve_series(&db, &mut allocator, &record.series).await?;
        let created = resolution.is_new();

        let mut statements = Vec::new();
        if let Some(insert) = resolution.insert {
            statements.push(insert);
        }
        statements.push(insert_episode(resolution.series_id, &record));

        let plan = ArchivePlan {
            statements,
            moves: recycle_moves(root, &config.library.recycle_dir, triple)?,
        };

        if options.dry_run {
            for line in plan.preview() {
                println!("{}", line);
                stats.planned_actions.push(line);
            }
        } else {
            plan.commit(&db).await?;
            stats.sidecars_archived += 2;
        }

        if created {
            stats.series_created += 1;
        } else {
            stats.series_reused += 1;
        }
        stats.episodes_imported += 1;
    }

    Ok(stats)
}

fn read_sidecar(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Print import stats to console
pub fn print_import_stats(stats: &ImportStats, dry_run: bool) {
    println!("\n📼 Import {}\n", if dry_run { "(Dry Run)" } else { "Complete" });
    println!(
        "Episodes {}: {}",
        if dry_run { "to import" } else { "imported" },
        stats.episodes_imported
    );
    println!(
        "Series {}: {}",
        if dry_run { "to create" } else { "created" },
        stats.series_created
    );
    println!("Series reused: {}", stats.series_reused);
    if dry_run {
        println!("Planned actions: {}", stats.planned_actions.len());
    } else {
        println!("Sidecars archived: {}", stats.sidecars_archived);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config() -> Config {
        let mut config = Config::default();
        config.probe.backoff_secs = 0;
        config
    }

    /// Lay down one recording: the video plus both sidecars, with the
    /// playback URL pointed wherever the test wants the probe to land.
    fn write_recording(root: &Path, name: &str, series_id: &str, play_url: &str) {
        std::fs::write(root.join(format!("{}.mpg", name)), b"mpeg").unwrap();

        let episode = json!({
            "Category": "series",
            "ChannelName": "WXYZ",
            "ChannelNumber": "6.1",
            "EndTime": 1_700_001_800,
            "EpisodeTitle": name,
            "ImageURL": "http://guide/img/ep",
            "OriginalAirdate": 1_699_900_000,
            "ProgramID": "EP0001",
            "RecordEndTime": 1_700_001_900,
            "RecordStartTime": 1_699_999_900,
            "SeriesID": series_id,
            "StartTime": 1_700_000_000,
            "Synopsis": "A storm strands everyone in the courthouse.",
            "Title": "Night Court",
            "Filename": format!("{}.mpg", name),
            "PlayURL": play_url,
            "CmdURL": "http://dvr/cmd/1",
        });
        let storage = json!({
            "SeriesID": series_id,
            "Title": "Night Court",
            "Category": "series",
            "ImageURL": "http://guide/img/series",
            "StartTime": 1_699_999_000,
            "New": 1,
            "EpisodesURL": "http://dvr/episodes",
        });

        std::fs::write(
            root.join(format!("{}.mpg.episode.json", name)),
            serde_json::to_vec(&episode).unwrap(),
        )
        .unwrap();
        std::fs::write(
            root.join(format!("{}.mpg.storage.json", name)),
            serde_json::to_vec(&storage).unwrap(),
        )
        .unwrap();
    }

    async fn mock_dvr(status: u16) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;
        server
    }

    #[test]
    fn test_read_sidecar_rejects_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{not json").unwrap();
        let result = read_sidecar(file.path());
        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[test]
    fn test_read_sidecar_parses_object() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"Title": "Jeopardy"}"#).unwrap();
        let doc = read_sidecar(file.path()).unwrap();
        assert_eq!(doc["Title"], "Jeopardy");
    }

    #[test]
    fn test_options_default_to_real_run() {
        let options = ImportOptions::default();
        assert!(!options.dry_run);
        assert!(!options.verbose);
    }

    #[tokio::test]
    async fn test_import_end_to_end() {
        let server = mock_dvr(200).await;
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        write_recording(root, "Night Court S01E02", "C100", &format!("{}/play/1", server.uri()));

        let config = test_config();
        let stats = cmd_import(&config, root, ImportOptions::default())
            .await
            .unwrap();

        assert_eq!(stats.episodes_imported, 1);
        assert_eq!(stats.series_created, 1);
        assert_eq!(stats.series_reused, 0);
        assert_eq!(stats.sidecars_archived, 2);

        let db = CatalogDb::open(&root.join(&config.library.database_name))
            .await
            .unwrap();
        let row: (i64, i64) = sqlx::query_as("SELECT SeriesId, DeleteReason FROM Episodes")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(row, (1, 0));

        // Sidecars are retired into the recycle tree; the video stays put.
        assert!(root.join("Night Court S01E02.mpg").is_file());
        assert!(!root.join("Night Court S01E02.mpg.episode.json").exists());
        assert!(root
            .join(".recycle-bin/Night Court S01E02.mpg.episode.json")
            .is_file());
        assert!(root
            .join(".recycle-bin/Night Court S01E02.mpg.storage.json")
            .is_file());
    }

    #[tokio::test]
    async fn test_import_dedupes_series() {
        let server = mock_dvr(200).await;
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        let play = format!("{}/play", server.uri());
        write_recording(root, "Ep1", "C100", &play);
        write_recording(root, "Ep2", "C100", &play);

        let config = test_config();
        let stats = cmd_import(&config, root, ImportOptions::default())
            .await
            .unwrap();
        assert_eq!(stats.episodes_imported, 2);
        assert_eq!(stats.series_created, 1);
        assert_eq!(stats.series_reused, 1);

        let db = CatalogDb::open(&root.join(&config.library.database_name))
            .await
            .unwrap();
        let series: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM Series")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(series, 1);
        let ids: Vec<(i64,)> = sqlx::query_as("SELECT DISTINCT SeriesId FROM Episodes")
            .fetch_all(db.pool())
            .await
            .unwrap();
        assert_eq!(ids, vec![(1,)]);
    }

    #[tokio::test]
    async fn test_rerun_finds_nothing_new() {
        let server = mock_dvr(200).await;
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        write_recording(root, "Ep1", "C100", &format!("{}/play", server.uri()));

        let config = test_config();
        let first = cmd_import(&config, root, ImportOptions::default())
            .await
            .unwrap();
        assert_eq!(first.episodes_imported, 1);

        // The sidecars moved, so a second pass has nothing to do.
        let second = cmd_import(&config, root, ImportOptions::default())
            .await
            .unwrap();
        assert_eq!(second.episodes_imported, 0);
        assert_eq!(second.sidecars_archived, 0);
    }

    #[tokio::test]
    async fn test_dry_run_plans_without_touching_anything() {
        let server = mock_dvr(404).await;
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        write_recording(root, "Ep1", "C100", &format!("{}/play", server.uri()));

        let config = test_config();
        let db_path = root.join(&config.library.database_name);
        CatalogDb::open(&db_path).await.unwrap();

        let options = ImportOptions {
            dry_run: true,
            verbose: false,
        };
        let stats = cmd_import(&config, root, options).await.unwrap();

        assert_eq!(stats.episodes_imported, 1);
        assert_eq!(stats.sidecars_archived, 0);
        assert!(stats
            .planned_actions
            .iter()
            .any(|a| a.starts_with("INSERT INTO Series ")));
        assert!(stats
            .planned_actions
            .iter()
            .any(|a| a.starts_with("INSERT INTO Episodes ")));
        assert!(stats.planned_actions.iter().any(|a| a.starts_with("mv ")));

        assert!(root.join("Ep1.mpg.episode.json").is_file());
        assert!(!root.join(".recycle-bin").exists());

        let db = CatalogDb::open(&db_path).await.unwrap();
        let episodes: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM Episodes")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(episodes, 0);
    }

    #[tokio::test]
    async fn test_dry_run_requires_existing_catalog() {
        let tmp = TempDir::new().unwrap();
        let config = test_config();
        let options = ImportOptions {
            dry_run: true,
            verbose: false,
        };
        let err = cmd_import(&config, tmp.path(), options).await.unwrap_err();
        assert!(matches!(err, Error::InvalidPath(_)));
        assert!(!tmp.path().join(&config.library.database_name).exists());
    }

    #[tokio::test]
    async fn test_fatal_probe_aborts_the_run() {
        let server = mock_dvr(500).await;
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        write_recording(root, "Ep1", "C100", &format!("{}/play", server.uri()));

        let config = test_config();
        let err = cmd_import(&config, root, ImportOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ProbeStatus { status: 500, .. }));

        // Nothing was archived.
        assert!(root.join("Ep1.mpg.episode.json").is_file());
        assert!(root.join("Ep1.mpg.storage.json").is_file());
    }
}
