//! End-to-end run of the local pipeline: glob expansion, descriptor
//! building, diffing, and report rendering against files on disk.

use std::fs;

use sizereport::artifact::paths_to_artifacts;
use sizereport::diff::get_changes;
use sizereport::report::{render_changes, NO_CHANGES_NOTICE};
use sizereport::rename::SimilarityResolver;
use sizereport::scanner::expand_globs;

fn write_artifact(dir: &std::path::Path, name: &str, len: usize) {
    // High-entropy content so size deltas track payload length instead of
    // collapsing under compression. Fixed seed keeps the gzip size
    // deterministic for a given length.
    let mut state: u32 = 0x2545_f491;
    let content: String = (0..len)
        .map(|_| {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            char::from(b'!' + ((state >> 24) & 0x3f) as u8)
        })
        .collect();
    fs::write(dir.join(name), content).unwrap();
}

#[tokio::test]
async fn unchanged_build_reports_no_changes() {
    let dir = tempfile::tempdir().unwrap();
    write_artifact(dir.path(), "app-abc.js", 4000);
    write_artifact(dir.path(), "vendor-abc.js", 9000);

    let base = dir.path().to_string_lossy().replace('\\', "/");
    let paths = expand_globs(&[format!("{base}/*.js")]).unwrap();
    assert_eq!(paths.len(), 2);

    let artifacts = paths_to_artifacts(&paths).await.unwrap();
    let changes = get_changes(&artifacts, &artifacts, None).await.unwrap();
    let report = render_changes(&changes);

    assert_eq!(report.to_markdown(), format!("\n{NO_CHANGES_NOTICE}"));
}

#[tokio::test]
async fn grown_artifact_shows_up_as_a_major_increase() {
    let dir = tempfile::tempdir().unwrap();
    write_artifact(dir.path(), "app-abc.js", 1000);

    let base = dir.path().to_string_lossy().replace('\\', "/");
    let paths = expand_globs(&[format!("{base}/*.js")]).unwrap();
    let previous = paths_to_artifacts(&paths).await.unwrap();

    // Same path, much bigger payload.
    write_artifact(dir.path(), "app-abc.js", 20_000);
    let current = paths_to_artifacts(&paths).await.unwrap();
    assert!(current[0].gzip_size > previous[0].gzip_size + 100);

    let changes = get_changes(&previous, &current, None).await.unwrap();
    assert_eq!(changes.changed_items.len(), 1);

    let report = render_changes(&changes);
    assert!(report.major().contains("### Changes in existing chunks :pencil2:"));
    assert!(report.major().contains(":small_red_triangle:"));
    assert!(report.major().contains("| app"));
}

#[tokio::test]
async fn hashed_rename_is_paired_by_the_similarity_resolver() {
    let dir = tempfile::tempdir().unwrap();
    write_artifact(dir.path(), "app-aaa111.js", 5000);

    let base = dir.path().to_string_lossy().replace('\\', "/");
    let previous_paths = expand_globs(&[format!("{base}/*.js")]).unwrap();
    let previous = paths_to_artifacts(&previous_paths).await.unwrap();

    fs::remove_file(dir.path().join("app-aaa111.js")).unwrap();
    write_artifact(dir.path(), "app-bbb222.js", 5000);
    let current_paths = expand_globs(&[format!("{base}/*.js")]).unwrap();
    let current = paths_to_artifacts(&current_paths).await.unwrap();

    // Without a resolver: one removal, one addition.
    let plain = get_changes(&previous, &current, None).await.unwrap();
    assert_eq!(plain.deleted_items.len(), 1);
    assert_eq!(plain.new_items.len(), 1);
    assert!(plain.changed_items.is_empty());

    // With the builtin resolver: a single changed pair.
    let resolver = SimilarityResolver::default();
    let resolved = get_changes(&previous, &current, Some(&resolver))
        .await
        .unwrap();
    assert!(resolved.deleted_items.is_empty());
    assert!(resolved.new_items.is_empty());
    assert_eq!(resolved.changed_items.len(), 1);

    let report = render_changes(&resolved);
    // Identical content, identical gzip size: a zero-delta rename row.
    assert!(report.minor().contains(":o:"));
    assert!(report.minor().contains(" 0 B"));
}
