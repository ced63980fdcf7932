//! Tests for ibm-output.

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use crate::csv::CsvWriter;
    use crate::row::{StateCountRow, StepSummaryRow};
    use crate::writer::OutputWriter;
    use crate::OutputError;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn read(dir: &TempDir, file: &str) -> (Vec<String>, Vec<csv::StringRecord>) {
        let mut rdr = csv::Reader::from_path(dir.path().join(file)).unwrap();
        let headers = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        let rows = rdr.records().map(|r| r.unwrap()).collect();
        (headers, rows)
    }

    #[test]
    fn headers_include_state_labels() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path(), &["S", "I", "R"]).unwrap();
        w.finish().unwrap();

        let (headers, rows) = read(&dir, "state_counts.csv");
        assert_eq!(headers, ["tick", "time", "S", "I", "R"]);
        assert!(rows.is_empty());
        let (headers, _) = read(&dir, "step_summaries.csv");
        assert_eq!(headers, ["tick", "time", "fired", "applied"]);
    }

    #[test]
    fn count_rows_written_in_label_order() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path(), &["S", "I", "R"]).unwrap();
        w.write_state_counts(&StateCountRow { tick: 10, time: 1.0, counts: vec![90, 7, 3] })
            .unwrap();
        w.finish().unwrap();

        let (_, rows) = read(&dir, "state_counts.csv");
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "10");
        assert_eq!(&rows[0][1], "1");
        assert_eq!(&rows[0][2], "90");
        assert_eq!(&rows[0][4], "3");
    }

    #[test]
    fn summary_row_written() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path(), &["S"]).unwrap();
        w.write_step_summary(&StepSummaryRow { tick: 3, time: 0.75, fired: 4, applied: 6 })
            .unwrap();
        w.finish().unwrap();

        let (_, rows) = read(&dir, "step_summaries.csv");
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][1], "0.75");
        assert_eq!(&rows[0][2], "4");
        assert_eq!(&rows[0][3], "6");
    }

    #[test]
    fn wrong_width_rejected() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path(), &["S", "I"]).unwrap();
        let err = w
            .write_state_counts(&StateCountRow { tick: 0, time: 0.0, counts: vec![1] })
            .unwrap_err();
        assert!(matches!(err, OutputError::Width { expected: 2, got: 1 }));
    }

    #[test]
    fn finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path(), &["S"]).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn missing_directory_is_error() {
        let dir = tmp();
        let result = CsvWriter::new(&dir.path().join("nope"), &["S"]);
        assert!(result.is_err());
    }
}

#[cfg(test)]
mod observer_tests {
    use ibm_core::{IbmResult, SimConfig};
    use ibm_sampling::bernoulli_select_rate;
    use ibm_sim::{ModelBuilder, StepContext};

    use crate::csv::CsvWriter;
    use crate::observer::SimOutputObserver;

    #[test]
    fn run_writes_counts_at_interval() {
        let config = SimConfig {
            population:            20,
            steps:                 6,
            dt:                    0.5,
            seed:                  9,
            output_interval_steps: 2,
        };
        let initial: Vec<&str> = (0..20).map(|i| if i < 4 { "I" } else { "S" }).collect();
        let mut model = ModelBuilder::new(config.clone())
            .states(["S", "I", "R"])
            .initial_states(&initial)
            .process(|ctx: &mut StepContext<'_>| -> IbmResult<()> {
                let infectious = ctx.state.query_by_state(&["I"])?;
                let recovered = bernoulli_select_rate(&infectious, 0.5, ctx.dt, ctx.rng)?;
                ctx.state.queue_update(&recovered, "R")
            })
            .build()
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let writer = CsvWriter::new(dir.path(), model.state().state_labels()).unwrap();
        let mut obs = SimOutputObserver::new(writer, &config);
        model.run(&mut obs).unwrap();
        assert!(obs.take_error().is_none(), "no write errors expected");

        let mut rdr = csv::Reader::from_path(dir.path().join("state_counts.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        let ticks: Vec<&str> = rows.iter().map(|r| &r[0]).collect();
        assert_eq!(ticks, ["0", "2", "4", "6"]);
        assert_eq!(&rows[0][3], "4");
        for row in &rows {
            let total: u64 = (2..5).map(|c| row[c].parse::<u64>().unwrap()).sum();
            assert_eq!(total, 20);
        }

        let mut rdr = csv::Reader::from_path(dir.path().join("step_summaries.csv")).unwrap();
        assert_eq!(rdr.records().count(), 6);
    }

    #[test]
    fn count_rows_hold_committed_state() {
        let config = SimConfig {
            population:            3,
            steps:                 2,
            dt:                    1.0,
            seed:                  0,
            output_interval_steps: 1,
        };
        let mut model = ModelBuilder::new(config.clone())
            .states(["S", "I"])
            .process(|ctx: &mut StepContext<'_>| -> IbmResult<()> {
                if ctx.tick.0 == 1 {
                    let everyone = ctx.state.query_all();
                    ctx.state.queue_update(&everyone, "I")?;
                }
                Ok(())
            })
            .build()
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let writer = CsvWriter::new(dir.path(), model.state().state_labels()).unwrap();
        let mut obs = SimOutputObserver::new(writer, &config);
        model.run(&mut obs).unwrap();
        assert!(obs.take_error().is_none());

        let mut rdr = csv::Reader::from_path(dir.path().join("state_counts.csv")).unwrap();
        let rows: Vec<Vec<String>> = rdr
            .records()
            .map(|r| r.unwrap().iter().map(str::to_owned).collect())
            .collect();
        assert_eq!(rows[0], ["0", "0", "3", "0"]);
        // Step 1's transitions are already in step 1's row.
        assert_eq!(rows[1], ["1", "1", "0", "3"]);
        assert_eq!(rows[2], ["2", "2", "0", "3"]);
    }

    #[test]
    fn zero_interval_writes_summaries_only() {
        let config = SimConfig {
            population:            3,
            steps:                 4,
            dt:                    1.0,
            seed:                  0,
            output_interval_steps: 0,
        };
        let mut model = ModelBuilder::new(config.clone()).states(["S"]).build().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let writer = CsvWriter::new(dir.path(), model.state().state_labels()).unwrap();
        let mut obs = SimOutputObserver::new(writer, &config);
        model.run(&mut obs).unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("state_counts.csv")).unwrap();
        assert_eq!(rdr.records().count(), 0);
        let mut rdr = csv::Reader::from_path(dir.path().join("step_summaries.csv")).unwrap();
        assert_eq!(rdr.records().count(), 4);
    }
}

// ── SQLite tests ──────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "sqlite"))]
mod sqlite_tests {
    use tempfile::TempDir;

    use crate::row::{StateCountRow, StepSummaryRow};
    use crate::sqlite::SqliteWriter;
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn db_created_with_labels() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path(), &["S", "I", "R"]).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let label: String = conn
            .query_row("SELECT label FROM state_labels WHERE code = 1", [], |r| r.get(0))
            .unwrap();
        assert_eq!(label, "I");
    }

    #[test]
    fn counts_stored_long_format() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path(), &["S", "I", "R"]).unwrap();
        w.write_state_counts(&StateCountRow { tick: 5, time: 0.5, counts: vec![7, 2, 1] })
            .unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM state_counts WHERE tick = 5", [], |r| r.get(0))
            .unwrap();
        assert_eq!(rows, 3);
        let infected: i64 = conn
            .query_row(
                "SELECT c.count FROM state_counts c JOIN state_labels l ON l.code = c.state \
                 WHERE l.label = 'I'",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(infected, 2);
    }

    #[test]
    fn summary_stored() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path(), &["S"]).unwrap();
        w.write_step_summary(&StepSummaryRow { tick: 1, time: 0.1, fired: 2, applied: 3 })
            .unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let applied: i64 = conn
            .query_row("SELECT applied FROM step_summaries WHERE tick = 1", [], |r| r.get(0))
            .unwrap();
        assert_eq!(applied, 3);
    }

    #[test]
    fn finish_idempotent() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path(), &["S"]).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }
}
