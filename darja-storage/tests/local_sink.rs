use std::fs;
use std::sync::Arc;
use std::thread;

use darja_segmenter::{Category, CategoryBuckets};
use darja_storage::{CategorySink, LocalCategoryStore, SinkFormat};

fn buckets(entries: &[(Category, &str)]) -> CategoryBuckets {
    let mut buckets = CategoryBuckets::new();
    for (category, word) in entries {
        buckets.push(*category, *word);
    }
    buckets
}

#[test]
fn persist_writes_one_file_per_category() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalCategoryStore::new(dir.path()).unwrap();

    store
        .persist(&buckets(&[
            (Category::PrefixAndSuffix, "ي+كتب+و"),
            (Category::SuffixOnly, "خدم+ت+لهم"),
        ]))
        .unwrap();

    for category in Category::ALL {
        assert!(store.path_for(category).is_file(), "{category} missing");
    }
    assert_eq!(
        fs::read_to_string(store.path_for(Category::SuffixOnly)).unwrap(),
        "خدم+ت+لهم\n"
    );
    assert!(store.read_category(Category::PrefixOnly).unwrap().is_empty());
}

#[test]
fn later_requests_overwrite_earlier_ones() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalCategoryStore::new(dir.path()).unwrap();

    store
        .persist(&buckets(&[(Category::PrefixOnly, "ال+باب")]))
        .unwrap();
    store
        .persist(&buckets(&[(Category::None, "دار")]))
        .unwrap();

    assert!(store.read_category(Category::PrefixOnly).unwrap().is_empty());
    assert_eq!(store.read_category(Category::None).unwrap(), vec!["دار"]);
}

#[test]
fn json_format_reads_back() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalCategoryStore::new(dir.path())
        .unwrap()
        .with_format(SinkFormat::Json);

    let words = vec!["ما+كتب+ش".to_string(), "و ي+كتب".to_string()];
    store.write_category(Category::PrefixAndSuffix, &words).unwrap();

    let raw = fs::read_to_string(store.path_for(Category::PrefixAndSuffix)).unwrap();
    let parsed: Vec<String> = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed, words);
    assert_eq!(store.read_category(Category::PrefixAndSuffix).unwrap(), words);
}

#[test]
fn no_staging_files_left_behind() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalCategoryStore::new(dir.path()).unwrap();
    store.persist(&CategoryBuckets::new()).unwrap();

    let mut names: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .filter_map(Result::ok)
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(
        names,
        ["none.txt", "prefix_and_suffix.txt", "prefix_only.txt", "suffix_only.txt"]
    );
}

#[test]
fn concurrent_writes_to_one_category_all_succeed() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(LocalCategoryStore::new(dir.path()).unwrap());
    let words: Vec<String> = (0..200).map(|i| format!("كلمه{i}")).collect();

    for _ in 0..50 {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                let words = words.clone();
                thread::spawn(move || store.write_category(Category::None, &words))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap().unwrap();
        }
        assert_eq!(store.read_category(Category::None).unwrap(), words);
    }
}

#[test]
fn concurrent_persists_never_mix_requests() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(LocalCategoryStore::new(dir.path()).unwrap());

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for round in 0..25 {
                    let tag = format!("{t}-{round}");
                    let mut buckets = CategoryBuckets::new();
                    for category in Category::ALL {
                        buckets.push(category, format!("{tag}+{}", category.name()));
                    }
                    store.persist(&buckets).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let tags: Vec<String> = Category::ALL
        .into_iter()
        .map(|category| {
            let words = store.read_category(category).unwrap();
            assert_eq!(words.len(), 1);
            words[0].split('+').next().unwrap().to_string()
        })
        .collect();
    assert!(tags.iter().all(|tag| tag == &tags[0]), "mixed files: {tags:?}");
}

#[test]
fn sink_format_parses_from_cli_values() {
    assert_eq!("json".parse::<SinkFormat>().unwrap(), SinkFormat::Json);
    assert_eq!("lines".parse::<SinkFormat>().unwrap(), SinkFormat::Lines);
    assert!("xml".parse::<SinkFormat>().is_err());
}
