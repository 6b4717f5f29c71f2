//! End-to-end tests: synthetic DR1-geometry images on disk, walked through
//! the local reader and exported the way the binary does it.

use std::sync::Arc;

use pakmap::{Build, LocalFileReader, MappingExporter, PakError};

/// Where synthetic file names are laid down (rebased through the rdata
/// delta) and where the per-pak pointer arrays go (rebased through the
/// data delta). Both sit well below the root array for the DR1 geometry.
const STRINGS_AT: usize = 0x10_0000;
const ARRAYS_AT: usize = 0x20_0000;

/// Encode a synthetic image with the real DR1_us table geometry.
///
/// `slots` maps one-to-one onto root-array slots: `None` is an unused
/// (all-zero) slot, `Some(files)` a populated pak. With `use_terminal`
/// the root array is left to run to the configured terminal offset
/// (remaining slots zero); otherwise it is closed with the sentinel.
fn build_dr1_image(slots: &[Option<&[&str]>], use_terminal: bool) -> Vec<u8> {
    let table = Build::Dr1Us.offsets();
    let sentinel = Build::Dr1Us.sentinel();

    let mut image = vec![0u8; table.terminal_offset as usize + 0x100];
    let mut strings_at = STRINGS_AT;
    let mut arrays_at = ARRAYS_AT;
    let mut root_at = table.root_offset as usize;

    for slot in slots {
        match slot {
            // Unused slot: leave the four zero bytes in place
            None => root_at += 4,
            Some(files) => {
                let array_offset = arrays_at as i64;

                let mut pointers = Vec::new();
                for file in *files {
                    image[strings_at..strings_at + file.len()].copy_from_slice(file.as_bytes());
                    // The terminating NUL is already there
                    pointers.push((strings_at as i64 + table.rdata_delta) as i32);
                    strings_at += file.len() + 1;
                }

                for pointer in pointers {
                    image[arrays_at..arrays_at + 4].copy_from_slice(&pointer.to_le_bytes());
                    arrays_at += 4;
                }
                image[arrays_at..arrays_at + 4].copy_from_slice(&sentinel);
                arrays_at += 4;

                let root_pointer = (array_offset + table.data_delta) as i32;
                image[root_at..root_at + 4].copy_from_slice(&root_pointer.to_le_bytes());
                root_at += 4;
            }
        }
    }

    if !use_terminal {
        image[root_at..root_at + 4].copy_from_slice(&sentinel);
    }

    image
}

fn reader_for(dir: &tempfile::TempDir, image: &[u8]) -> Arc<LocalFileReader> {
    let path = dir.path().join("DR1_us.exe");
    std::fs::write(&path, image).unwrap();
    Arc::new(LocalFileReader::new(&path).unwrap())
}

#[tokio::test]
async fn exports_the_expected_mapping_file() {
    let image = build_dr1_image(
        &[
            Some(&["a.txt", "b.txt"] as &[&str]),
            None,
            Some(&["c.txt"] as &[&str]),
        ],
        false,
    );

    let dir = tempfile::tempdir().unwrap();
    let exporter = MappingExporter::new(reader_for(&dir, &image), Build::Dr1Us);

    let entries = exporter.walk().await.unwrap();
    let written_to = exporter
        .export_to_file(entries, Some(dir.path()))
        .await
        .unwrap();

    assert_eq!(
        written_to.file_name().unwrap().to_str().unwrap(),
        "dr1_us.mappings.json"
    );

    let json = std::fs::read_to_string(&written_to).unwrap();
    let mapping: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(
        mapping,
        serde_json::json!({
            "bg_000": ["a.txt", "b.txt"],
            "bg_002": ["c.txt"],
        })
    );

    // Keys come out in slot order
    assert!(json.find("bg_000").unwrap() < json.find("bg_002").unwrap());
}

#[tokio::test]
async fn terminal_mode_round_trips_the_listing() {
    let slots: &[Option<&[&str]>] = &[
        Some(&["system/init.dat", "system/boot.dat", "system/font.dat"]),
        Some(&[]),
        None,
        Some(&["bgm/track_01.ogg"]),
    ];

    let image = build_dr1_image(slots, true);
    let dir = tempfile::tempdir().unwrap();
    let exporter = MappingExporter::new(reader_for(&dir, &image), Build::Dr1Us);

    let entries = exporter.walk().await.unwrap();

    let expected: Vec<(String, Vec<String>)> = slots
        .iter()
        .enumerate()
        .filter_map(|(index, slot)| {
            slot.map(|files| {
                (
                    format!("bg_{index:03}"),
                    files.iter().map(|f| f.to_string()).collect(),
                )
            })
        })
        .collect();

    let walked: Vec<(String, Vec<String>)> = entries
        .into_iter()
        .map(|e| (e.name, e.files))
        .collect();

    assert_eq!(walked, expected);
}

#[tokio::test]
async fn empty_listing_exports_an_empty_mapping() {
    let image = build_dr1_image(&[], false);

    let dir = tempfile::tempdir().unwrap();
    let exporter = MappingExporter::new(reader_for(&dir, &image), Build::Dr1Us);

    let entries = exporter.walk().await.unwrap();
    assert!(entries.is_empty());

    let written_to = exporter
        .export_to_file(entries, Some(dir.path()))
        .await
        .unwrap();
    let mapping: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&written_to).unwrap()).unwrap();
    assert_eq!(mapping, serde_json::json!({}));
}

#[tokio::test]
async fn truncated_root_array_fails_the_walk() {
    let image = build_dr1_image(&[Some(&["a.txt"] as &[&str])], false);
    let table = Build::Dr1Us.offsets();

    // Cut the image off mid-slot, before any end marker is reachable
    let truncated = &image[..table.root_offset as usize + 2];

    let dir = tempfile::tempdir().unwrap();
    let exporter = MappingExporter::new(reader_for(&dir, truncated), Build::Dr1Us);

    let err = exporter.walk().await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<PakError>(),
        Some(PakError::TruncatedTable { .. })
    ));
}
