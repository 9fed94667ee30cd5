use pretty_assertions::assert_eq;
use proptest::prelude::*;
use retrieval_text_chunker::{Chunker, ChunkerConfig, Document, SplitMode, SOURCE_KEY};
use retrieval_vector_store::{
    CosineSimilarity, HashEmbedder, Metadata, MetadataFilter, Metric, SearchOutput, VectorStore,
};
use std::sync::Arc;

const FOODS: &str = "I like to eat broccoli and bananas. \n\
                     I ate a banana and spinach smoothie for breakfast.";
const PETS: &str = "Chinchillas and kittens are cute. \n\
                    My sister adopted a kitten yesterday. \n\
                    Look at this cute hamster munching on a piece of broccoli.";

async fn build_store() -> VectorStore {
    let chunker = Chunker::new(ChunkerConfig::new(60, 0, SplitMode::Paragraph)).unwrap();
    let chunks = chunker.chunk_documents(&[
        Document::new(FOODS, "foods.txt"),
        Document::new(PETS, "pets.txt"),
    ]);
    VectorStore::build_from_chunks(chunks, Arc::new(HashEmbedder::new(64)))
        .await
        .expect("build store")
}

#[tokio::test]
async fn chunk_embed_and_query_end_to_end() {
    let store = build_store().await;
    assert_eq!(store.len(), 5);

    let mut sources: Vec<String> = store
        .get_unique_metadata_values(SOURCE_KEY)
        .into_iter()
        .collect();
    sources.sort();
    assert_eq!(sources, vec!["foods.txt", "pets.txt"]);

    // Every chunk is its own nearest neighbour under both built-in metrics
    for key in store.keys() {
        for metric in [Metric::Pearson, Metric::Cosine] {
            let texts = store
                .search_by_text(key, 1, &metric, true, None)
                .await
                .unwrap()
                .into_texts();
            assert_eq!(texts, vec![key.to_string()], "metric {metric}");
        }
    }

    let entry = store
        .retrieve_from_key("My sister adopted a kitten yesterday.")
        .expect("chunk stored under its text");
    assert_eq!(entry.vector.len(), 64);
    assert_eq!(entry.metadata[SOURCE_KEY], "pets.txt");
}

#[tokio::test]
async fn source_filter_restricts_results() {
    let store = build_store().await;
    let filter = MetadataFilter::new().field(SOURCE_KEY, "foods.txt");

    let output = store
        .search_by_text(
            "Chinchillas and kittens are cute.",
            10,
            &CosineSimilarity,
            false,
            Some(&filter),
        )
        .await
        .unwrap();
    let SearchOutput::Results(results) = output else {
        panic!("expected scored results");
    };
    assert_eq!(results.len(), 2);
    assert!(results
        .iter()
        .all(|r| r.metadata.get(SOURCE_KEY).map(String::as_str) == Some("foods.txt")));
}

#[tokio::test]
async fn repeated_searches_are_identical() {
    let store = build_store().await;
    let first = store
        .search_by_text("fruit is awesome", 3, &Metric::default(), false, None)
        .await
        .unwrap();
    let second = store
        .search_by_text("fruit is awesome", 3, &Metric::default(), false, None)
        .await
        .unwrap();
    assert_eq!(first, second);
    assert_eq!(first.len(), 3);
}

fn vector() -> impl Strategy<Value = Vec<f32>> {
    prop::collection::vec(-10.0f32..10.0, 4)
}

proptest! {
    #[test]
    fn search_is_bounded_eligible_and_sorted(
        rows in prop::collection::vec((vector(), 0u8..3), 1..30),
        query in vector(),
        k in 1usize..12,
        wanted in 0u8..3,
        use_filter in any::<bool>(),
    ) {
        let mut store = VectorStore::new(Arc::new(HashEmbedder::new(4)));
        for (idx, (vector, group)) in rows.iter().enumerate() {
            let mut metadata = Metadata::new();
            metadata.insert("group".to_string(), group.to_string());
            store.insert(format!("row-{idx}"), vector.clone(), metadata).unwrap();
        }
        let filter = MetadataFilter::new().field("group", wanted.to_string());
        let filter = use_filter.then_some(&filter);

        let results = store.search(&query, k, &Metric::Pearson, filter).unwrap();

        let eligible = rows
            .iter()
            .filter(|(_, group)| !use_filter || *group == wanted)
            .count();
        prop_assert_eq!(results.len(), k.min(eligible));
        for result in &results {
            if let Some(filter) = filter {
                prop_assert!(filter.matches(&result.metadata));
            }
        }
        for pair in results.windows(2) {
            let (a, b) = (pair[0].score, pair[1].score);
            prop_assert!(b.is_nan() || a >= b, "not descending: {} then {}", a, b);
        }
    }
}
