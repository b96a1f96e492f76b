use super::{
    encode, normalize_query, strip_ordinal, Catalog, SearchHit, SearchIndex, SearchOptions,
    SearchPartition,
};
use crate::error::DoxnavError;
use std::collections::BTreeSet;
use std::fs;
use tempfile::TempDir;

const CLASSES_M: &str = include_str!("fixtures/classes_c.js");

fn sample_index(options: SearchOptions) -> SearchIndex {
    let partition = SearchPartition::parse("classes_c.js", CLASSES_M).unwrap();
    SearchIndex::from_partitions(vec![partition], options)
}

fn unlimited() -> SearchOptions {
    SearchOptions {
        max_results: 0,
        ..SearchOptions::default()
    }
}

fn names(hits: &[SearchHit]) -> Vec<&str> {
    hits.iter().map(|hit| hit.name.as_str()).collect()
}

// ═══════════════════════════════════════════════════════════════════════
// Keys
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_encode_matches_stored_keys() {
    assert_eq!(encode("make_signed"), "make_5fsigned");
    assert_eq!(encode("mt19937_64"), "mt19937_5f64");
    assert_eq!(
        encode("map< std::wstring, bit7z::BitPropVariant >"),
        "map_3c_20std_3a_3awstring_2c_20bit7z_3a_3abitpropvariant_20_3e"
    );
    assert_eq!(encode("Größe"), "größe");
}

#[test]
fn test_normalize_query_strips_boundaries_and_folds_case() {
    assert_eq!(normalize_query("  MUTEX  "), "mutex");
    assert_eq!(normalize_query("::mutex()"), "mutex");
    assert_eq!(normalize_query("minstd_rand"), "minstd_5frand");
    assert_eq!(normalize_query("__"), "");
    assert_eq!(normalize_query(""), "");
}

#[test]
fn test_strip_ordinal() {
    assert_eq!(strip_ordinal("mutex_34"), "mutex");
    assert_eq!(strip_ordinal("mt19937_5f64_30"), "mt19937_5f64");
    assert_eq!(strip_ordinal("minstd_5frand0_19"), "minstd_5frand0");
    assert_eq!(strip_ordinal("plain"), "plain");
    assert_eq!(strip_ordinal("trailing_"), "trailing_");
}

// ═══════════════════════════════════════════════════════════════════════
// Partitions
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_parse_generated_partition() {
    let partition = SearchPartition::parse("classes_c.js", CLASSES_M).unwrap();

    assert_eq!(partition.name(), "classes_c.js");
    assert_eq!(partition.len(), 35);

    let mask = &partition.entries()[5];
    assert_eq!(mask.key, "mask_5");
    assert_eq!(mask.stem(), "mask");
    assert_eq!(mask.name, "mask");
    let scopes: Vec<Option<&str>> = mask.records.iter().map(|r| r.scope.as_deref()).collect();
    assert_eq!(
        scopes,
        vec![
            Some("ctype::mask"),
            Some("ctype_base::mask"),
            Some("ctype_byname::mask")
        ]
    );
    assert!(mask.records.iter().all(|r| r.parent_frame));

    assert_eq!(
        partition.entries()[3].name,
        "map&lt; BitProperty, bit7z::BitPropVariant &gt;"
    );
}

#[test]
fn test_partition_round_trip_is_byte_identical() {
    let partition = SearchPartition::parse("classes_c.js", CLASSES_M).unwrap();
    let written = partition.to_js();

    assert_eq!(written, CLASSES_M);

    let reparsed = SearchPartition::parse("classes_c.js", &written).unwrap();
    let keys = |p: &SearchPartition| {
        p.entries()
            .iter()
            .map(|e| e.key.clone())
            .collect::<BTreeSet<_>>()
    };
    assert_eq!(keys(&reparsed), keys(&partition));
    assert_eq!(reparsed, partition);
}

#[test]
fn test_duplicate_keys_are_rejected() {
    let source = "var searchData = [ ['a_0',['a',['a.html',1,'']]], \
                  ['a_0',['a',['b.html',1,'']]] ];";
    let err = SearchPartition::parse("all_0.js", source).unwrap_err();
    assert!(
        matches!(err, DoxnavError::PartitionLoad { ref partition, .. } if partition == "all_0.js"),
        "got {err}"
    );
}

#[test]
fn test_malformed_entries_are_rejected() {
    let cases = [
        "var other = [];",
        "var searchData = {};",
        "var searchData = [ ['a_0'] ];",
        "var searchData = [ ['a_0', ['a']] ];",
        "var searchData = [ ['a_0', ['a', ['a.html', 'yes', 'std']]] ];",
        "var searchData = [ [",
    ];
    for source in cases {
        let err = SearchPartition::parse("all_0.js", source).unwrap_err();
        assert!(
            matches!(err, DoxnavError::PartitionLoad { .. }),
            "{source} gave {err}"
        );
    }
}

#[test]
fn test_records_without_scope() {
    let source = "var searchData=\n[\n  ['main_0',['main',['main_8cpp.html#a0',0]]]\n];\n";
    let partition = SearchPartition::parse("all_c.js", source).unwrap();

    let record = &partition.entries()[0].records[0];
    assert_eq!(record.scope, None);
    assert!(!record.parent_frame);
    assert_eq!(partition.to_js(), source);
}

// ═══════════════════════════════════════════════════════════════════════
// Queries
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_search_mutex() {
    let hits = sample_index(SearchOptions::default()).search("mutex");

    assert_eq!(
        hits,
        vec![SearchHit {
            name: "mutex".to_string(),
            link: "http://en.cppreference.com/w/cpp/thread/mutex.html".to_string(),
            scope: "std".to_string(),
        }]
    );
}

#[test]
fn test_exact_matches_precede_prefix_matches() {
    let index = sample_index(SearchOptions::default());

    let hits = index.search("map");
    assert_eq!(
        names(&hits),
        vec![
            "map",
            "map&lt; BitProperty, bit7z::BitPropVariant &gt;",
            "map&lt; std::wstring, bit7z::BitPropVariant &gt;",
        ]
    );

    let hits = index.search("MINSTD_RAND");
    assert_eq!(names(&hits), vec!["minstd_rand", "minstd_rand0"]);

    let hits = index.search("money");
    assert_eq!(
        names(&hits),
        vec!["money_base", "money_get", "money_put", "moneypunct", "moneypunct_byname"]
    );
}

#[test]
fn test_exact_order_across_partitions() {
    let first = SearchPartition::parse(
        "all_0.js",
        "var searchData = [ ['mutexes_0',['mutexes',['a.html',1,'']]], \
         ['mutex_1',['mutex',['b.html',1,'first']]] ];",
    )
    .unwrap();
    let second = SearchPartition::parse(
        "classes_c.js",
        "var searchData = [ ['mutex_0',['Mutex',['c.html',1,'second']]] ];",
    )
    .unwrap();
    let index = SearchIndex::from_partitions(vec![first, second], SearchOptions::default());

    let hits = index.search("mutex");
    let scopes: Vec<&str> = hits.iter().map(|h| h.scope.as_str()).collect();
    assert_eq!(scopes, vec!["first", "second", ""]);
}

#[test]
fn test_each_record_is_a_hit() {
    let hits = sample_index(SearchOptions::default()).search("mask");

    assert_eq!(hits.len(), 3);
    assert!(hits.iter().all(|h| h.name == "mask"));
    assert_eq!(hits[1].scope, "ctype_base::mask");
}

#[test]
fn test_duplicate_hits_are_merged() {
    let source = "var searchData = [ ['x_0',['x',['x.html',1,'ns']]] ];";
    let a = SearchPartition::parse("all_0.js", source).unwrap();
    let b = SearchPartition::parse("classes_0.js", source).unwrap();
    let index = SearchIndex::from_partitions(vec![a, b], SearchOptions::default());

    assert_eq!(index.search("x").len(), 1);
}

#[test]
fn test_single_letter_query_and_limit() {
    let hits = sample_index(unlimited()).search("m");
    // 34 single-record entries plus the three records of `mask`
    assert_eq!(hits.len(), 37);

    let limited = sample_index(SearchOptions {
        max_results: 4,
        ..SearchOptions::default()
    })
    .search("m");
    assert_eq!(
        names(&limited),
        vec![
            "make_signed",
            "make_unsigned",
            "map",
            "map&lt; BitProperty, bit7z::BitPropVariant &gt;"
        ]
    );
}

#[test]
fn test_queries_without_matches_are_empty() {
    let index = sample_index(SearchOptions::default());

    assert!(index.search("zzz").is_empty());
    assert!(index.search("").is_empty());
    assert!(index.search("  ::  ").is_empty());
    assert!(index.search("mutexes").is_empty());
}

#[test]
fn test_default_options_do_not_truncate() {
    let entries: Vec<String> = (0..60)
        .map(|i| format!("  ['x{i}_{i}',['x{i}',['x{i}.html',1,'ns']]]"))
        .collect();
    let source = format!("var searchData=\n[\n{}\n];\n", entries.join(",\n"));
    let partition = SearchPartition::parse("all_17.js", &source).unwrap();
    let index = SearchIndex::from_partitions(vec![partition], SearchOptions::default());

    let hits = index.search("x");
    assert_eq!(hits.len(), 60);
    assert_eq!(hits[0].name, "x0");
    assert_eq!(hits[59].name, "x59");
}

#[test]
fn test_empty_partition_yields_no_hits() {
    let partition = SearchPartition::parse("all_0.js", "var searchData=\n[\n];\n").unwrap();
    assert!(partition.is_empty());
    assert_eq!(partition.to_js(), "var searchData=\n[\n];\n");

    let index = SearchIndex::from_partitions(vec![partition], SearchOptions::default());
    assert_eq!(index.search("mutex"), Vec::<SearchHit>::new());
}

// ═══════════════════════════════════════════════════════════════════════
// Loading from disk
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_missing_directory_yields_empty_results() {
    let index = SearchIndex::open(
        std::path::Path::new("/nonexistent/search"),
        SearchOptions::default(),
    );

    assert!(index.partition_files().is_empty());
    assert!(index.search("mutex").is_empty());
}

#[test]
fn test_empty_partition_file_loads() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("all_c.js"), "var searchData=\n[\n];\n").unwrap();

    let index = SearchIndex::open(dir.path(), SearchOptions::default());
    assert!(index.search("mutex").is_empty());
    assert_eq!(index.loaded_partitions(), 1);
}

#[test]
fn test_discovered_partitions_load_lazily() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("classes_c.js"), CLASSES_M).unwrap();
    fs::write(dir.path().join("search.js"), "function init_search() {}").unwrap();
    fs::write(dir.path().join("nomatches.html"), "<html></html>").unwrap();

    let index = SearchIndex::open(dir.path(), SearchOptions::default());
    assert_eq!(index.partition_files(), vec!["classes_c.js"]);
    assert_eq!(index.loaded_partitions(), 0);

    assert_eq!(names(&index.search("mutex")), vec!["mutex"]);
    assert_eq!(index.loaded_partitions(), 1);
}

#[test]
fn test_malformed_partition_degrades_to_partial_results() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("all_0.js"), "var searchData = [ [ 'broken'").unwrap();
    fs::write(dir.path().join("classes_c.js"), CLASSES_M).unwrap();

    let index = SearchIndex::open(
        dir.path(),
        SearchOptions {
            lazy: false,
            ..SearchOptions::default()
        },
    );

    assert_eq!(index.loaded_partitions(), 1);
    assert_eq!(names(&index.search("mutex")), vec!["mutex"]);
}

#[test]
fn test_catalog_selects_partitions_by_initial() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("searchdata.js"),
        "var indexSectionsWithContent =\n{\n  0: \"am\",\n  1: \"bm\"\n};\n\n\
         var indexSectionNames =\n{\n  0: \"all\",\n  1: \"classes\"\n};\n\n\
         var indexSectionLabels =\n{\n  0: \"All\",\n  1: \"Classes\"\n};\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("all_0.js"),
        "var searchData = [ ['archive_0',['archive',['a.html',1,'']]] ];",
    )
    .unwrap();
    fs::write(dir.path().join("classes_1.js"), CLASSES_M).unwrap();
    // all_1.js and classes_0.js are listed but missing.

    let index = SearchIndex::open(dir.path(), SearchOptions::default());
    assert_eq!(
        index.partition_files(),
        vec!["all_0.js", "all_1.js", "classes_0.js", "classes_1.js"]
    );

    assert_eq!(names(&index.search("mutex")), vec!["mutex"]);
    assert_eq!(index.loaded_partitions(), 1);

    assert_eq!(names(&index.search("Archive")), vec!["archive"]);
    assert_eq!(index.loaded_partitions(), 2);
}

#[test]
fn test_section_filter() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("all_c.js"),
        "var searchData = [ ['mutex_0',['mutex',['other.html',1,'all']]] ];",
    )
    .unwrap();
    fs::write(dir.path().join("classes_c.js"), CLASSES_M).unwrap();

    let index = SearchIndex::open(
        dir.path(),
        SearchOptions {
            sections: vec!["classes".to_string()],
            ..SearchOptions::default()
        },
    );

    assert_eq!(index.partition_files(), vec!["classes_c.js"]);
    let hits = index.search("mutex");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].scope, "std");
}

#[test]
fn test_catalog_parse() {
    let catalog = Catalog::parse(
        "var indexSectionsWithContent = { 0: \"abc~\", 1: \"m\" };\n\
         var indexSectionNames = { 0: \"all\", 1: \"classes\" };",
    )
    .unwrap();

    let all = catalog.section("all").unwrap();
    assert_eq!(all.initials, vec!['a', 'b', 'c', '~']);
    assert_eq!(all.label, None);
    let files: Vec<String> = all.partitions().map(|(_, f)| f).collect();
    assert_eq!(files, vec!["all_0.js", "all_1.js", "all_2.js", "all_3.js"]);

    assert_eq!(catalog.sections().len(), 2);
    assert!(Catalog::parse("var indexSectionsWithContent = { 0: \"a\" };").is_err());
}

#[test]
fn test_concurrent_queries_share_one_load() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("classes_c.js"), CLASSES_M).unwrap();
    let index = SearchIndex::open(dir.path(), SearchOptions::default());

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| assert_eq!(index.search("mutex").len(), 1));
        }
    });
    assert_eq!(index.loaded_partitions(), 1);
}
