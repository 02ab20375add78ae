// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Persistence round trip and identifier uniqueness under concurrency

use bytes::Bytes;
use omokage_node::media::{MediaResolver, MediaStore, Subcategory, UrlNormalizer};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

#[tokio::test]
async fn test_saved_bytes_resolve_identically() {
    let dir = TempDir::new().unwrap();
    let store = MediaStore::new(dir.path());
    let urls = UrlNormalizer::new("/media/", false);
    let resolver = MediaResolver::new(dir.path(), "/media/", Duration::from_secs(2)).unwrap();

    let contents = [
        Bytes::from_static(b""),
        Bytes::from_static(b"\x89PNG\r\n\x1a\n"),
        Bytes::from((0..=255u8).cycle().take(64 * 1024).collect::<Vec<u8>>()),
    ];

    for content in contents {
        for subcategory in [Subcategory::Generated, Subcategory::Refined] {
            let stored = store.save(content.clone(), subcategory).await.unwrap();
            let public = urls.to_public_url(None, &stored.relative_path());
            assert!(public.starts_with(&format!("/media/{}/", subcategory)));

            let resolved = resolver.resolve(&public).await.unwrap();
            assert_eq!(resolved.content, content);
            assert_eq!(resolved.extension, ".png");
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_saves_never_collide() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(MediaStore::new(dir.path()));

    let mut tasks = tokio::task::JoinSet::new();
    for i in 0..1000u32 {
        let store = store.clone();
        tasks.spawn(async move {
            let content = Bytes::from(i.to_be_bytes().to_vec());
            let stored = store.save(content, Subcategory::Generated).await.unwrap();
            (i, stored.relative_path())
        });
    }

    let mut paths = HashSet::new();
    while let Some(joined) = tasks.join_next().await {
        let (i, path) = joined.unwrap();
        // Each file still holds its own writer's bytes
        let on_disk = std::fs::read(store.absolute_path(&path)).unwrap();
        assert_eq!(on_disk, i.to_be_bytes());
        assert!(paths.insert(path), "duplicate path");
    }
    assert_eq!(paths.len(), 1000);
    assert_eq!(
        std::fs::read_dir(dir.path().join("generated")).unwrap().count(),
        1000
    );
}
