//! End-to-end flows against a file-backed database.

#![allow(clippy::cast_precision_loss)]

use std::sync::Arc;

use assert_matches::assert_matches;
use facegate::{
    EmbeddingEncoding, EnrollError, Facegate, FacegateSettings, MatchResult, StoreError,
    load_settings_from_path,
};

fn settings_in(dir: &tempfile::TempDir, encoding: EmbeddingEncoding) -> FacegateSettings {
    let mut settings = FacegateSettings::default();
    settings.store.database_path = dir.path().join("faces.db").to_string_lossy().into_owned();
    settings.store.encoding = encoding;
    settings.store.dimensions = 4;
    settings
}

fn face(seed: f64) -> Vec<f64> {
    (0..4).map(|i| (seed + f64::from(i)).sin()).collect()
}

fn nudged(v: &[f64], by: f64) -> Vec<f64> {
    v.iter().map(|x| x + by).collect()
}

#[test]
fn enroll_then_recognize_each_identity() {
    for encoding in [EmbeddingEncoding::Text, EmbeddingEncoding::Binary] {
        let dir = tempfile::tempdir().unwrap();
        let fg = Facegate::open(&settings_in(&dir, encoding)).unwrap();

        let people = [("101", "Ada"), ("102", "Grace"), ("103", "Edsger")];
        for (i, (id, name)) in people.iter().enumerate() {
            fg.enroll(id, name, face(i as f64 * 10.0)).unwrap();
        }

        for (i, (id, name)) in people.iter().enumerate() {
            let query = nudged(&face(i as f64 * 10.0), 0.01);
            assert_matches!(
                fg.identify(query).unwrap(),
                MatchResult::Matched { id: got, name: ref got_name, distance }
                    if got.to_string() == *id && got_name.as_str() == *name && distance < 0.6,
                "{encoding}: {name}"
            );
        }
        assert_matches!(
            fg.identify(vec![50.0; 4]).unwrap(),
            MatchResult::NoMatch { distance } if distance > 0.6
        );
    }
}

#[test]
fn enrollments_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings_in(&dir, EmbeddingEncoding::Binary);
    let original = face(3.0);

    {
        let fg = Facegate::open(&settings).unwrap();
        fg.enroll("7", "Ada", original.clone()).unwrap();
    }

    let fg = Facegate::open(&settings).unwrap();
    let records = fg.store().scan_all();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].embedding.as_slice(), original.as_slice());
    assert!(fg.identify(original).unwrap().is_match());
}

#[test]
fn reopening_with_other_encoding_fails() {
    let dir = tempfile::tempdir().unwrap();
    drop(Facegate::open(&settings_in(&dir, EmbeddingEncoding::Text)).unwrap());

    assert_matches!(
        Facegate::open(&settings_in(&dir, EmbeddingEncoding::Binary)),
        Err(facegate::OpenError::Store(StoreError::EncodingMismatch { .. }))
    );
}

#[test]
fn concurrent_enrollment_of_one_name() {
    let dir = tempfile::tempdir().unwrap();
    let fg = Arc::new(Facegate::open(&settings_in(&dir, EmbeddingEncoding::Text)).unwrap());

    let handles: Vec<_> = (0..6)
        .map(|i| {
            let fg = Arc::clone(&fg);
            std::thread::spawn(move || fg.enroll(&(200 + i).to_string(), "Shared Name", face(0.0)))
        })
        .collect();
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    for r in results.iter().filter(|r| r.is_err()) {
        assert_matches!(r, Err(EnrollError::Store(StoreError::AlreadyEnrolled { .. })));
    }
    assert_eq!(fg.store().count().unwrap(), 1);
}

#[test]
fn settings_file_drives_open() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("from-file.db");
    let path = dir.path().join("settings.json");
    std::fs::write(
        &path,
        format!(
            r#"{{"store": {{"databasePath": {db:?}, "encoding": "binary", "dimensions": 0}},
                "matcher": {{"tolerance": 0.25}}}}"#,
            db = db.to_string_lossy()
        ),
    )
    .unwrap();

    let settings = load_settings_from_path(&path).unwrap();
    let fg = Facegate::open(&settings).unwrap();

    assert_eq!(fg.store().encoding(), EmbeddingEncoding::Binary);
    assert_eq!(fg.store().dimensions(), None);
    assert!((fg.matcher().tolerance() - 0.25).abs() < f64::EPSILON);
    assert!(db.exists());

    // any length is accepted when dimensions is 0
    fg.enroll("1", "Ada", vec![0.0; 7]).unwrap();
    assert_matches!(
        fg.identify(vec![0.3; 7]).unwrap(),
        MatchResult::NoMatch { .. }
    );
}
